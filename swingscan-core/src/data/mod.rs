//! Collaborator contracts for market data and the instrument universe.
//!
//! The core only defines the traits; concrete sources live in the runner.

pub mod provider;
pub mod universe;

pub use provider::{DataError, DataProvider, UniverseProvider};
pub use universe::{parse_symbol_list, Universe};
