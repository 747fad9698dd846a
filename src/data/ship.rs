//! Ship hulls: a base stat vector plus whatever has been installed on it.

use serde::{Deserialize, Serialize};

use crate::data::catalog::Catalog;
use crate::data::item::{Item, ItemStats};
use crate::error::{OutfitterError, Result};
use crate::optimizer::heat::PlatformCoefficients;

/// Cooling effectiveness multiplier over the number of installed expansions. Zero
/// expansions gives exactly 1.0; the S-curve falls toward 0.0 as expansions pile up.
pub fn cooling_inefficiency(expansions: i32) -> f64 {
    let x = f64::from(expansions);
    2.0 + 2.0 / (1.0 + (-x / 2.0).exp()) - 4.0 / (1.0 + (-x / 4.0).exp())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    pub name: String,
    #[serde(default)]
    pub stats: ItemStats,
}

impl Ship {
    pub fn new(name: impl Into<String>, stats: ItemStats) -> Self {
        Self {
            name: name.into(),
            stats,
        }
    }

    pub fn install(&mut self, item: &Item) {
        self.stats += item.stats;
    }

    pub fn uninstall(&mut self, item: &Item) {
        self.stats -= item.stats;
    }

    /// Install a catalog item by name.
    pub fn install_named(&mut self, catalog: &Catalog, name: &str) -> Result<()> {
        let item = catalog
            .get(name)
            .ok_or_else(|| OutfitterError::UnknownItem(name.to_string()))?;
        self.install(item);
        Ok(())
    }

    pub fn uninstall_named(&mut self, catalog: &Catalog, name: &str) -> Result<()> {
        let item = catalog
            .get(name)
            .ok_or_else(|| OutfitterError::UnknownItem(name.to_string()))?;
        self.uninstall(item);
        Ok(())
    }

    pub fn inefficiency(&self) -> f64 {
        cooling_inefficiency(self.stats.expansions)
    }

    /// Maximum internal heat as the shipyard reports it. Positive means the ship can
    /// overheat from its own equipment.
    pub fn net_heat(&self) -> f64 {
        self.stats.heat
            - 6.0 * self.stats.mass * self.stats.heat_dissipation
            - self.inefficiency() * self.stats.cooling
    }

    /// Coefficients frozen for one filter + search pass.
    pub fn coefficients(&self) -> PlatformCoefficients {
        PlatformCoefficients {
            cooling_inefficiency: self.inefficiency(),
            heat_dissipation: self.stats.heat_dissipation,
        }
    }
}
