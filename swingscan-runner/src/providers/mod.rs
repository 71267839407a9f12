//! Concrete `DataProvider` implementations.

pub mod csv_dir;
pub mod polygon;
pub mod synthetic;

pub use csv_dir::CsvDirProvider;
pub use polygon::{PolygonConfig, PolygonProvider};
pub use synthetic::SyntheticProvider;
