//! Domain types for SwingScan

pub mod bar;
pub mod series;

pub use bar::Bar;
pub use series::{PriceSeries, SeriesError};
