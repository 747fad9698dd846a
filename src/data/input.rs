//! Search input files: a ship name on the first line, then outfits already fitted to it.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::data::catalog::Catalog;
use crate::data::ship::Ship;
use crate::error::{OutfitterError, Result};

/// Parsed input before it is resolved against a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadoutInput {
    pub ship: String,
    pub preinstalled: Vec<String>,
}

pub fn parse_input(text: &str) -> Option<LoadoutInput> {
    let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());
    let ship = lines.next()?.to_string();
    Some(LoadoutInput {
        ship,
        preinstalled: lines.map(str::to_string).collect(),
    })
}

impl LoadoutInput {
    /// Fresh copy of the named hull with every pre-installed outfit fitted.
    pub fn resolve(&self, catalog: &Catalog) -> Result<Ship> {
        let mut ship = catalog
            .ship(&self.ship)
            .cloned()
            .ok_or_else(|| OutfitterError::UnknownShip(self.ship.clone()))?;
        for outfit in &self.preinstalled {
            ship.install_named(catalog, outfit)?;
        }
        debug!(
            ship = %ship.name,
            preinstalled = self.preinstalled.len(),
            "resolved input ship"
        );
        Ok(ship)
    }
}

pub fn load_input(path: &Path, catalog: &Catalog) -> Result<Ship> {
    let raw = fs::read_to_string(path).map_err(|source| OutfitterError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let input = parse_input(&raw).ok_or_else(|| OutfitterError::EmptyInput(path.to_path_buf()))?;
    input.resolve(catalog)
}
