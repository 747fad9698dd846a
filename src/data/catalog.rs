//! Outfit and ship catalog loaded once per run, plus the denylist of outfits that exist in
//! the game files but cannot be bought.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::data::item::Item;
use crate::data::ship::Ship;
use crate::error::{OutfitterError, Result};

const DEFAULT_DENYLIST: &[&str] = &[
    "Antimatter Core",
    "Large Reactor Module",
    "Small Reactor Module",
];

/// Outfits and ships in load order. Name lookups go through the index; iteration keeps
/// load order so filtering and search stay deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    outfits: Vec<Item>,
    outfit_index: HashMap<String, usize>,
    ships: Vec<Ship>,
    ship_index: HashMap<String, usize>,
}

/// On-disk JSON shape written by `normalize_game_data`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub outfits: Vec<Item>,
    #[serde(default)]
    pub ships: Vec<Ship>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(
        outfits: impl IntoIterator<Item = Item>,
        ships: impl IntoIterator<Item = Ship>,
    ) -> Self {
        let mut catalog = Self::new();
        for outfit in outfits {
            catalog.insert_outfit(outfit);
        }
        for ship in ships {
            catalog.insert_ship(ship);
        }
        catalog
    }

    pub fn from_items(outfits: impl IntoIterator<Item = Item>) -> Self {
        Self::from_parts(outfits, std::iter::empty())
    }

    /// A later definition with the same name replaces the earlier one in place.
    pub fn insert_outfit(&mut self, outfit: Item) {
        match self.outfit_index.get(&outfit.name) {
            Some(&slot) => self.outfits[slot] = outfit,
            None => {
                self.outfit_index.insert(outfit.name.clone(), self.outfits.len());
                self.outfits.push(outfit);
            }
        }
    }

    pub fn insert_ship(&mut self, ship: Ship) {
        match self.ship_index.get(&ship.name) {
            Some(&slot) => self.ships[slot] = ship,
            None => {
                self.ship_index.insert(ship.name.clone(), self.ships.len());
                self.ships.push(ship);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Item> {
        self.outfit_index.get(name).map(|&slot| &self.outfits[slot])
    }

    pub fn ship(&self, name: &str) -> Option<&Ship> {
        self.ship_index.get(name).map(|&slot| &self.ships[slot])
    }

    pub fn outfits(&self) -> &[Item] {
        &self.outfits
    }

    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    pub fn len(&self) -> usize {
        self.outfits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outfits.is_empty()
    }

    pub fn to_file(&self) -> CatalogFile {
        CatalogFile {
            outfits: self.outfits.clone(),
            ships: self.ships.clone(),
        }
    }
}

impl From<CatalogFile> for Catalog {
    fn from(file: CatalogFile) -> Self {
        Self::from_parts(file.outfits, file.ships)
    }
}

pub fn load_catalog_json(path: &Path) -> Result<Catalog> {
    let raw = fs::read_to_string(path).map_err(|source| OutfitterError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file: CatalogFile = serde_json::from_str(&raw)?;
    let catalog = Catalog::from(file);
    info!(
        outfits = catalog.len(),
        ships = catalog.ships().len(),
        "loaded catalog from {}",
        path.display()
    );
    Ok(catalog)
}

pub fn save_catalog_json(catalog: &Catalog, path: &Path) -> Result<()> {
    let payload = serde_json::to_string_pretty(&catalog.to_file())?;
    fs::write(path, payload).map_err(|source| OutfitterError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Outfit names that must never be offered to the search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denylist {
    names: HashSet<String>,
}

impl Default for Denylist {
    fn default() -> Self {
        Self::from_names(DEFAULT_DENYLIST.iter().copied())
    }
}

impl Denylist {
    pub fn empty() -> Self {
        Self {
            names: HashSet::new(),
        }
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One name per line, blank lines ignored. A missing file yields the built-in list.
pub fn load_denylist(path: &Path) -> Result<Denylist> {
    if !path.exists() {
        debug!("no denylist at {}, using built-in list", path.display());
        return Ok(Denylist::default());
    }
    let raw = fs::read_to_string(path).map_err(|source| OutfitterError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let denylist = Denylist::from_names(
        raw.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string),
    );
    debug!(entries = denylist.len(), "loaded denylist from {}", path.display());
    Ok(denylist)
}
