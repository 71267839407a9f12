//! `UniverseProvider` adapters over the core `Universe` model.

use std::path::PathBuf;
use swingscan_core::data::{parse_symbol_list, DataError, Universe, UniverseProvider};

/// Symbols given inline, e.g. from a config file or command line.
#[derive(Debug, Clone, Default)]
pub struct StaticUniverse {
    symbols: Vec<String>,
}

impl StaticUniverse {
    pub fn new<S: AsRef<str>>(symbols: impl IntoIterator<Item = S>) -> Self {
        let joined = symbols
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect::<Vec<_>>()
            .join("\n");
        Self {
            symbols: parse_symbol_list(&joined),
        }
    }
}

impl UniverseProvider for StaticUniverse {
    fn symbols(&self) -> Result<Vec<String>, DataError> {
        Ok(self.symbols.clone())
    }
}

/// Symbols read from disk on every call: a plain list, or a `.toml` sector map.
#[derive(Debug, Clone)]
pub struct FileUniverse {
    path: PathBuf,
    sector: Option<String>,
}

impl FileUniverse {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sector: None,
        }
    }

    /// Restrict a sector map to one sector.
    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    pub fn load(&self) -> Result<Universe, DataError> {
        Universe::from_file(&self.path)
    }
}

impl UniverseProvider for FileUniverse {
    fn symbols(&self) -> Result<Vec<String>, DataError> {
        let universe = self.load()?;
        match &self.sector {
            None => Ok(universe.symbols()),
            Some(name) => universe
                .sector_symbols(name)
                .map(|s| s.to_vec())
                .ok_or_else(|| {
                    DataError::Universe(format!(
                        "sector '{name}' not found in {}",
                        self.path.display()
                    ))
                }),
        }
    }
}
