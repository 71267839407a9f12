//! Universe definitions: plain symbol lists or sector-organized TOML maps.
//!
//! A plain list has one symbol per line; blank lines and `#` comments are
//! ignored. A sector map is a TOML file with a `[sectors]` table of arrays.
//! Either way symbols are upper-cased and de-duplicated keeping first
//! occurrence.

use crate::data::provider::DataError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Sector name → member symbols.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Universe {
    pub sectors: BTreeMap<String, Vec<String>>,
}

impl Universe {
    /// Load a universe file, picking the format by extension (`.toml` = sector map).
    pub fn from_file(path: &Path) -> Result<Self, DataError> {
        let content = std::fs::read_to_string(path).map_err(|e| DataError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if path.extension().and_then(|e| e.to_str()) == Some("toml") {
            Self::from_toml(&content)
        } else {
            Ok(Self::from_list(&content))
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, DataError> {
        toml::from_str(content).map_err(|e| DataError::Universe(format!("parse universe TOML: {e}")))
    }

    /// A plain list goes into a single "all" sector.
    pub fn from_list(content: &str) -> Self {
        let mut sectors = BTreeMap::new();
        sectors.insert("all".to_string(), parse_symbol_list(content));
        Self { sectors }
    }

    /// Every symbol across all sectors, sector order then file order, without duplicates.
    pub fn symbols(&self) -> Vec<String> {
        dedup_symbols(self.sectors.values().flatten().map(String::as_str))
    }

    pub fn sector_symbols(&self, sector: &str) -> Option<&[String]> {
        self.sectors.get(sector).map(|v| v.as_slice())
    }

    pub fn sector_names(&self) -> Vec<&str> {
        self.sectors.keys().map(|s| s.as_str()).collect()
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.symbols().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.values().all(|v| v.is_empty())
    }
}

/// Parse a newline-separated symbol list.
pub fn parse_symbol_list(content: &str) -> Vec<String> {
    dedup_symbols(content.lines().map(|line| {
        let line = line.split('#').next().unwrap_or("");
        line.trim()
    }))
}

fn dedup_symbols<'a>(symbols: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    symbols
        .map(|s| s.trim().to_ascii_uppercase())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.clone()))
        .collect()
}
