pub mod dominance;
pub mod heat;
pub mod memo;
pub mod search;

pub use dominance::{filter_candidates, CandidateSet};
pub use heat::{round_heat, HeatStep, PlatformCoefficients, DEFAULT_HEAT_STEP};
pub use memo::{MemoCache, Outcome, StateKey};
pub use search::{search, SearchEngine, SearchMode, SearchResult, SearchStats};

use serde::Serialize;
use tracing::{info, warn};

use crate::data::catalog::{Catalog, Denylist};
use crate::data::ship::Ship;
use crate::error::{OutfitterError, Result};
use crate::parallel::WorkerPool;

/// Outfit installed between sweep steps.
pub const DEFAULT_EXPANSION_ITEM: &str = "Outfits Expansion";

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    pub heat_step: f64,
    pub mode: SearchMode,
    pub pool: WorkerPool,
    pub expansion_item: String,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            heat_step: DEFAULT_HEAT_STEP,
            mode: SearchMode::Sequential,
            pool: WorkerPool::default(),
            expansion_item: DEFAULT_EXPANSION_ITEM.to_string(),
        }
    }
}

/// A ship before and after fitting the best loadout found for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadoutReport {
    pub before: Ship,
    /// `before` with the chosen outfits installed. Equal to `before` when infeasible.
    pub after: Ship,
    pub coefficients: PlatformCoefficients,
    pub candidate_count: usize,
    pub result: SearchResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepStep {
    pub expansions: i32,
    pub report: LoadoutReport,
}

/// Candidates the dominance filter keeps for `ship` as it stands.
pub fn prune_for_ship(ship: &Ship, catalog: &Catalog, denylist: &Denylist) -> CandidateSet {
    filter_candidates(catalog, ship.coefficients(), denylist)
}

/// Filter for the ship's current coefficients, search from its current space and heat,
/// and fit the result to a copy of the ship.
pub fn single_search(
    ship: &Ship,
    catalog: &Catalog,
    denylist: &Denylist,
    options: &SearchOptions,
) -> Result<LoadoutReport> {
    let step = HeatStep::new(options.heat_step)?;
    let coefficients = ship.coefficients();
    let candidates = filter_candidates(catalog, coefficients, denylist);
    let engine = SearchEngine::new(&candidates, coefficients).with_heat_step(step);
    let result = engine.search_with_mode(
        ship.stats.space,
        ship.net_heat(),
        options.mode,
        &options.pool,
    );

    if result.is_truncated() {
        warn!(
            ship = %ship.name,
            cutoffs = result.stats.depth_cutoffs,
            "install cap reached; loadout may not be optimal"
        );
    }

    let mut after = ship.clone();
    for name in result.items() {
        let item = candidates
            .get(name)
            .ok_or_else(|| OutfitterError::UnknownItem(name.clone()))?;
        after.install(item);
    }

    info!(
        ship = %ship.name,
        candidates = candidates.len(),
        feasible = result.is_feasible(),
        energy = result.output.unwrap_or_default(),
        installs = result.items().len(),
        "single search finished"
    );
    Ok(LoadoutReport {
        before: ship.clone(),
        after,
        coefficients,
        candidate_count: candidates.len(),
        result,
    })
}

/// Search at every expansion count the ship's cargo space allows: search, record, then
/// install one more expansion and repeat until cargo space runs out.
pub fn expansion_sweep(
    ship: &Ship,
    catalog: &Catalog,
    denylist: &Denylist,
    options: &SearchOptions,
) -> Result<Vec<SweepStep>> {
    let expansion = catalog
        .get(&options.expansion_item)
        .ok_or_else(|| OutfitterError::MissingExpansion(options.expansion_item.clone()))?;
    if expansion.stats.cargo_space >= 0 {
        return Err(OutfitterError::InvalidExpansion {
            name: expansion.name.clone(),
            cargo_space: expansion.stats.cargo_space,
        });
    }

    let mut current = ship.clone();
    let mut steps = Vec::new();
    while current.stats.cargo_space > 0 {
        let report = single_search(&current, catalog, denylist, options)?;
        info!(
            expansions = current.stats.expansions,
            energy = report.result.output.unwrap_or_default(),
            "sweep step"
        );
        steps.push(SweepStep {
            expansions: current.stats.expansions,
            report,
        });
        current.install(expansion);
    }
    Ok(steps)
}
