//! Memoized maximizer over outfit combinations.
//!
//! From a state `(remaining space, net heat)` every candidate is tried as the next install.
//! The best completion maximizes energy, then leftover space, subject to the final heat
//! being <= 0. Outfits may be installed any number of times. Sub-results are cached under
//! `(space, quantized heat)` for the whole search, so a state reached again in the same
//! bucket is served from the cache instead of being explored again.
//!
//! The traversal is depth-first with an explicit frame stack rather than call recursion, so
//! large space budgets do not grow the thread stack. A state that is reached again while it
//! is still being solved (possible when outfits add space back) has no finished answer yet;
//! that branch is skipped.
//!
//! When every candidate consumes space the state space is finite. Candidates that add or
//! keep space can repeat forever, so those searches cap the number of installs at the
//! starting space plus one lift from each space-adding candidate.

use std::collections::HashSet;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{OutfitterError, Result};
use crate::optimizer::dominance::CandidateSet;
use crate::optimizer::heat::{HeatStep, PlatformCoefficients};
use crate::optimizer::memo::{MemoCache, Outcome, StateKey};
use crate::parallel::WorkerPool;

/// Best loadout completion for a starting state. `output` and `items` are `None` when no
/// combination brings heat to zero or below within the space budget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub output: Option<f64>,
    pub leftover: i32,
    /// Outfits to install, deepest choice first; names repeat for multiple copies.
    pub items: Option<Vec<String>>,
    pub stats: SearchStats,
}

impl SearchResult {
    pub fn is_feasible(&self) -> bool {
        self.output.is_some()
    }

    pub fn items(&self) -> &[String] {
        self.items.as_deref().unwrap_or_default()
    }

    /// True when the install cap stopped at least one branch, so a longer loadout may beat
    /// this one.
    pub fn is_truncated(&self) -> bool {
        self.stats.depth_cutoffs > 0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// States solved from scratch (including the starting state).
    pub states_expanded: u64,
    pub memo_hits: u64,
    /// Branches dropped because they led back into a state still being solved.
    pub cycle_skips: u64,
    /// Branches stopped by the install cap.
    pub depth_cutoffs: u64,
    pub memo_entries: usize,
}

impl SearchStats {
    fn absorb(&mut self, other: SearchStats) {
        self.states_expanded += other.states_expanded;
        self.memo_hits += other.memo_hits;
        self.cycle_skips += other.cycle_skips;
        self.depth_cutoffs += other.depth_cutoffs;
        self.memo_entries += other.memo_entries;
    }
}

/// How a top-level search runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SearchMode {
    #[default]
    Sequential,
    /// Fan the first install out across rayon workers, one memo cache per branch.
    Parallel,
}

/// What installing one candidate does to the search state.
#[derive(Debug, Clone, Copy)]
struct Delta {
    space: i32,
    energy: f64,
    heat: f64,
}

/// Where a solve begins and how deep it may go.
#[derive(Debug, Clone, Copy)]
struct Start {
    capacity: i32,
    heat: f64,
    /// Installs already made above this state.
    installs: usize,
    limit: Option<usize>,
}

#[derive(Debug)]
struct Frame {
    key: StateKey,
    capacity: i32,
    heat: f64,
    next: usize,
    /// Candidate whose sub-state is being solved on the frame above.
    pending: Option<usize>,
    best: Outcome,
}

impl Frame {
    fn open(capacity: i32, heat: f64, key: StateKey) -> Self {
        Self {
            key,
            capacity,
            heat,
            next: 0,
            pending: None,
            best: Outcome::baseline(capacity, heat),
        }
    }
}

/// Search over a fixed candidate set with frozen coefficients.
#[derive(Debug, Clone)]
pub struct SearchEngine<'a> {
    candidates: &'a CandidateSet,
    coefficients: PlatformCoefficients,
    step: HeatStep,
    deltas: Vec<Delta>,
    max_installs: Option<usize>,
}

impl<'a> SearchEngine<'a> {
    pub fn new(candidates: &'a CandidateSet, coefficients: PlatformCoefficients) -> Self {
        let deltas = candidates
            .items()
            .iter()
            .map(|item| Delta {
                space: item.stats.space,
                energy: item.stats.energy,
                heat: coefficients.net_heat(&item.stats),
            })
            .collect();
        Self {
            candidates,
            coefficients,
            step: HeatStep::default(),
            deltas,
            max_installs: None,
        }
    }

    pub fn with_heat_step(mut self, step: HeatStep) -> Self {
        self.step = step;
        self
    }

    /// Override the install cap, which otherwise only applies when some candidate does not
    /// consume space.
    pub fn with_max_installs(mut self, max_installs: usize) -> Self {
        self.max_installs = Some(max_installs);
        self
    }

    pub fn coefficients(&self) -> PlatformCoefficients {
        self.coefficients
    }

    fn install_limit(&self, capacity: i32) -> Option<usize> {
        if self.max_installs.is_some() {
            return self.max_installs;
        }
        if self.deltas.iter().all(|delta| delta.space < 0) {
            return None;
        }
        let lift: i64 = self
            .deltas
            .iter()
            .map(|delta| i64::from(delta.space.max(0)))
            .sum();
        Some((i64::from(capacity.max(0)) + lift).max(1) as usize)
    }

    pub fn step(&self) -> HeatStep {
        self.step
    }

    /// A cache that this engine will accept.
    pub fn new_memo(&self) -> MemoCache {
        MemoCache::new(self.coefficients, self.step)
    }

    /// Run a search with a cache that lives only for this call.
    pub fn search(&self, capacity: i32, net_heat: f64) -> SearchResult {
        let mut memo = self.new_memo();
        self.run(capacity, net_heat, &mut memo)
    }

    /// Run a search that reads and fills `memo`. The cache must have been built for the same
    /// coefficients and heat step.
    pub fn search_with_memo(
        &self,
        capacity: i32,
        net_heat: f64,
        memo: &mut MemoCache,
    ) -> Result<SearchResult> {
        if memo.coefficients() != self.coefficients || memo.step() != self.step {
            return Err(OutfitterError::MemoMismatch {
                expected: format!("{} step={}", memo.coefficients(), memo.step().value()),
                actual: format!("{} step={}", self.coefficients, self.step.value()),
            });
        }
        Ok(self.run(capacity, net_heat, memo))
    }

    pub fn search_with_mode(
        &self,
        capacity: i32,
        net_heat: f64,
        mode: SearchMode,
        pool: &WorkerPool,
    ) -> SearchResult {
        match mode {
            SearchMode::Sequential => self.search(capacity, net_heat),
            SearchMode::Parallel => self.search_parallel(capacity, net_heat, pool),
        }
    }

    /// Solve each first install on its own worker with its own cache, then merge the
    /// branches in candidate order so ties resolve as a sequential scan would.
    pub fn search_parallel(&self, capacity: i32, net_heat: f64, pool: &WorkerPool) -> SearchResult {
        if capacity == 0 {
            return self.search(capacity, net_heat);
        }
        check_start(capacity);
        let root_key = StateKey::new(capacity, net_heat, self.step);
        let limit = self.install_limit(capacity);

        let branches: Vec<(usize, Outcome, SearchStats)> = pool.install(|| {
            (0..self.deltas.len())
                .into_par_iter()
                .filter_map(|pick| {
                    let (new_capacity, new_heat) = self.advance(capacity, net_heat, pick)?;
                    if new_capacity == 0 {
                        let outcome = Outcome::baseline(0, new_heat);
                        return Some((pick, outcome, SearchStats::default()));
                    }
                    if limit.is_some_and(|limit| limit <= 1) {
                        let stats = SearchStats {
                            depth_cutoffs: 1,
                            ..SearchStats::default()
                        };
                        return Some((pick, Outcome::baseline(new_capacity, new_heat), stats));
                    }
                    if StateKey::new(new_capacity, new_heat, self.step) == root_key {
                        let stats = SearchStats {
                            cycle_skips: 1,
                            ..SearchStats::default()
                        };
                        return Some((pick, Outcome::infeasible(new_capacity), stats));
                    }
                    let mut memo = self.new_memo();
                    let mut active = HashSet::from([root_key]);
                    let mut stats = SearchStats::default();
                    let start = Start {
                        capacity: new_capacity,
                        heat: new_heat,
                        installs: 1,
                        limit,
                    };
                    let outcome = self.solve(start, &mut memo, &mut active, &mut stats);
                    stats.memo_entries = memo.len();
                    Some((pick, outcome, stats))
                })
                .collect()
        });

        let mut best = Outcome::baseline(capacity, net_heat);
        let mut stats = SearchStats {
            states_expanded: 1,
            ..SearchStats::default()
        };
        for (pick, outcome, branch_stats) in &branches {
            best.consider(*pick, self.deltas[*pick].energy, outcome);
            stats.absorb(*branch_stats);
        }
        debug!(
            branches = branches.len(),
            expanded = stats.states_expanded,
            memo_hits = stats.memo_hits,
            "parallel search finished"
        );
        self.finish(best, stats)
    }

    fn run(&self, capacity: i32, net_heat: f64, memo: &mut MemoCache) -> SearchResult {
        check_start(capacity);
        let mut active = HashSet::new();
        let mut stats = SearchStats::default();
        let start = Start {
            capacity,
            heat: net_heat,
            installs: 0,
            limit: self.install_limit(capacity),
        };
        let best = self.solve(start, memo, &mut active, &mut stats);
        stats.memo_entries = memo.len();
        debug!(
            capacity,
            net_heat,
            candidates = self.deltas.len(),
            expanded = stats.states_expanded,
            memo_hits = stats.memo_hits,
            cycle_skips = stats.cycle_skips,
            feasible = best.is_feasible(),
            "search finished"
        );
        self.finish(best, stats)
    }

    /// State after installing `pick`, or `None` when it does not fit.
    fn advance(&self, capacity: i32, heat: f64, pick: usize) -> Option<(i32, f64)> {
        let delta = &self.deltas[pick];
        let new_capacity = capacity.checked_add(delta.space).filter(|&c| c >= 0)?;
        Some((new_capacity, heat + delta.heat))
    }

    /// Best completion from `start`. Every state solved along the way is cached; states in
    /// `active` are treated as unreachable.
    fn solve(
        &self,
        start: Start,
        memo: &mut MemoCache,
        active: &mut HashSet<StateKey>,
        stats: &mut SearchStats,
    ) -> Outcome {
        let Start {
            capacity,
            heat,
            installs,
            limit,
        } = start;
        if capacity == 0 {
            return Outcome::baseline(0, heat);
        }

        let root_key = StateKey::new(capacity, heat, self.step);
        active.insert(root_key);
        stats.states_expanded += 1;
        let mut stack = vec![Frame::open(capacity, heat, root_key)];
        let mut returned: Option<Outcome> = None;

        loop {
            let child_installs = installs + stack.len();
            let Some(frame) = stack.last_mut() else {
                break;
            };
            if let (Some(sub), Some(pick)) = (returned.take(), frame.pending.take()) {
                frame.best.consider(pick, self.deltas[pick].energy, &sub);
            }

            let mut descend = None;
            while frame.next < self.deltas.len() {
                let pick = frame.next;
                frame.next += 1;
                let Some((new_capacity, new_heat)) = self.advance(frame.capacity, frame.heat, pick)
                else {
                    continue;
                };
                let energy = self.deltas[pick].energy;
                let key = StateKey::new(new_capacity, new_heat, self.step);

                if let Some(cached) = memo.get(&key) {
                    stats.memo_hits += 1;
                    frame.best.consider(pick, energy, cached);
                } else if new_capacity == 0 {
                    frame.best.consider(pick, energy, &Outcome::baseline(0, new_heat));
                } else if limit.is_some_and(|limit| child_installs >= limit) {
                    stats.depth_cutoffs += 1;
                    frame.best.consider(pick, energy, &Outcome::baseline(new_capacity, new_heat));
                } else if active.contains(&key) {
                    stats.cycle_skips += 1;
                } else {
                    frame.pending = Some(pick);
                    descend = Some(Frame::open(new_capacity, new_heat, key));
                    break;
                }
            }

            if let Some(child) = descend {
                active.insert(child.key);
                stats.states_expanded += 1;
                stack.push(child);
                continue;
            }

            let Some(done) = stack.pop() else {
                break;
            };
            active.remove(&done.key);
            memo.insert(done.key, done.best.clone());
            if stack.is_empty() {
                return done.best;
            }
            returned = Some(done.best);
        }

        Outcome::infeasible(capacity)
    }

    fn finish(&self, best: Outcome, stats: SearchStats) -> SearchResult {
        let items = best.picks.map(|picks| {
            picks
                .into_iter()
                .map(|pick| self.candidates.items()[pick].name.clone())
                .collect()
        });
        SearchResult {
            output: best.output,
            leftover: best.leftover,
            items,
            stats,
        }
    }
}

fn check_start(capacity: i32) {
    if capacity < 0 {
        warn!(capacity, "search started with negative space; only space-adding outfits fit");
    }
}

/// Search with an explicit caller-owned cache. The cache must have been created for
/// `coefficients`; its heat step is used for quantization.
pub fn search(
    capacity: i32,
    net_heat: f64,
    coefficients: PlatformCoefficients,
    candidates: &CandidateSet,
    memo: &mut MemoCache,
) -> Result<SearchResult> {
    SearchEngine::new(candidates, coefficients)
        .with_heat_step(memo.step())
        .search_with_memo(capacity, net_heat, memo)
}
