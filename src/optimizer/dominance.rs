//! Dominance pruning: shrink the outfit universe before the search.
//!
//! An outfit is dropped when some combination of two other entries from the eligible list
//! (either of which may be "install nothing") takes no more space, yields at least as much
//! energy and runs no hotter. The test is a single pass over the full eligible list, so an
//! outfit is pruned if any pair from that list dominates it, regardless of what else is
//! pruned.

use std::collections::HashMap;

use rayon::prelude::*;
use tracing::debug;

use crate::data::catalog::{Catalog, Denylist};
use crate::data::item::{Item, ItemStats};
use crate::optimizer::heat::PlatformCoefficients;

/// Outfits that survived filtering, in catalog order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateSet {
    items: Vec<Item>,
    index: HashMap<String, usize>,
}

impl CandidateSet {
    pub fn from_items(items: Vec<Item>) -> Self {
        let index = items
            .iter()
            .enumerate()
            .map(|(slot, item)| (item.name.clone(), slot))
            .collect();
        Self { items, index }
    }

    pub fn get(&self, name: &str) -> Option<&Item> {
        self.index.get(name).map(|&slot| &self.items[slot])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Rebuild a catalog from the survivors, e.g. to run the filter again.
    pub fn to_catalog(&self) -> Catalog {
        Catalog::from_items(self.items.iter().cloned())
    }
}

/// Space, energy and heat of one working-list entry. `None` entries stand for the null item.
#[derive(Debug, Clone, Copy)]
struct Profile {
    space: i32,
    energy: f64,
    net_heat: f64,
}

impl Profile {
    fn of(stats: &ItemStats, coefficients: &PlatformCoefficients) -> Self {
        Self {
            space: stats.space,
            energy: stats.energy,
            net_heat: coefficients.net_heat(stats),
        }
    }
}

/// True when the stat sum of `left` and `right` is at least as good as `target` on space,
/// energy and heat.
fn pair_dominates(
    target: &ItemStats,
    left: Option<&ItemStats>,
    right: Option<&ItemStats>,
    coefficients: &PlatformCoefficients,
) -> bool {
    let mut combined = ItemStats::default();
    if let Some(stats) = left {
        combined += *stats;
    }
    if let Some(stats) = right {
        combined += *stats;
    }
    let target = Profile::of(target, coefficients);
    let combined = Profile::of(&combined, coefficients);
    combined.space >= target.space
        && combined.energy >= target.energy
        && combined.net_heat <= target.net_heat
}

fn is_dominated(
    slot: usize,
    working: &[Option<&Item>],
    coefficients: &PlatformCoefficients,
) -> bool {
    let Some(target) = working[slot] else {
        return false;
    };
    for (left_slot, left) in working.iter().enumerate() {
        if left_slot == slot {
            continue;
        }
        for (right_slot, right) in working.iter().enumerate() {
            if right_slot == slot || right_slot == left_slot {
                continue;
            }
            if pair_dominates(
                &target.stats,
                left.map(|item| &item.stats),
                right.map(|item| &item.stats),
                coefficients,
            ) {
                return true;
            }
        }
    }
    false
}

/// Outfits worth searching over for a ship with the given coefficients.
///
/// Eligible outfits are those not on the denylist that produce energy or provide cooling.
/// Of those, only outfits no pair of other eligible entries dominates are kept.
pub fn filter_candidates(
    catalog: &Catalog,
    coefficients: PlatformCoefficients,
    denylist: &Denylist,
) -> CandidateSet {
    let mut working: Vec<Option<&Item>> = catalog
        .outfits()
        .iter()
        .filter(|item| !denylist.contains(&item.name) && item.is_productive())
        .map(Some)
        .collect();
    let eligible = working.len();
    working.push(None);

    let survivors: Vec<Item> = (0..eligible)
        .into_par_iter()
        .filter(|&slot| !is_dominated(slot, &working, &coefficients))
        .filter_map(|slot| working[slot].cloned())
        .collect();

    debug!(
        catalog = catalog.len(),
        eligible,
        kept = survivors.len(),
        %coefficients,
        "dominance filter"
    );
    CandidateSet::from_items(survivors)
}
