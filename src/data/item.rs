//! Outfit stat vectors. Items are read-only once loaded; ships accumulate them.

use std::ops::{Add, AddAssign, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// Stat vector shared by outfits and ships. `space` is a signed delta: outfits that take
/// room carry a negative value, hulls and expansions a positive one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemStats {
    #[serde(default)]
    pub space: i32,
    /// Net energy per second (generation minus use). The quantity the search maximizes.
    #[serde(default)]
    pub energy: f64,
    #[serde(default)]
    pub energy_generation: f64,
    #[serde(default)]
    pub energy_use: f64,
    #[serde(default)]
    pub heat: f64,
    #[serde(default)]
    pub cooling: f64,
    #[serde(default)]
    pub mass: f64,
    #[serde(default)]
    pub heat_dissipation: f64,
    #[serde(default)]
    pub cargo_space: i32,
    /// Counts toward the cooling inefficiency curve.
    #[serde(default)]
    pub expansions: i32,
}

impl AddAssign for ItemStats {
    fn add_assign(&mut self, rhs: Self) {
        self.space += rhs.space;
        self.energy += rhs.energy;
        self.energy_generation += rhs.energy_generation;
        self.energy_use += rhs.energy_use;
        self.heat += rhs.heat;
        self.cooling += rhs.cooling;
        self.mass += rhs.mass;
        self.heat_dissipation += rhs.heat_dissipation;
        self.cargo_space += rhs.cargo_space;
        self.expansions += rhs.expansions;
    }
}

impl SubAssign for ItemStats {
    fn sub_assign(&mut self, rhs: Self) {
        self.space -= rhs.space;
        self.energy -= rhs.energy;
        self.energy_generation -= rhs.energy_generation;
        self.energy_use -= rhs.energy_use;
        self.heat -= rhs.heat;
        self.cooling -= rhs.cooling;
        self.mass -= rhs.mass;
        self.heat_dissipation -= rhs.heat_dissipation;
        self.cargo_space -= rhs.cargo_space;
        self.expansions -= rhs.expansions;
    }
}

impl Add for ItemStats {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl Sub for ItemStats {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self {
        self -= rhs;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    #[serde(default)]
    pub stats: ItemStats,
}

impl Item {
    pub fn new(name: impl Into<String>, stats: ItemStats) -> Self {
        Self {
            name: name.into(),
            stats,
        }
    }

    /// Outfits worth offering to the search produce energy or remove heat.
    pub fn is_productive(&self) -> bool {
        self.stats.energy > 0.0 || self.stats.cooling > 0.0
    }
}
