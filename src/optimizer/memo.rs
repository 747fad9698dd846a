//! Per-search memo of solved states.
//!
//! A cache is bound to the coefficients and heat step it was created with. Results are only
//! valid for those, so a search refuses a cache built for anything else.

use std::collections::HashMap;

use crate::optimizer::heat::{HeatStep, PlatformCoefficients};

/// Remaining space plus quantized heat. Heats that round up to the same multiple of the
/// step share a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateKey {
    pub capacity: i32,
    pub heat_bucket: i64,
}

impl StateKey {
    pub fn new(capacity: i32, heat: f64, step: HeatStep) -> Self {
        Self {
            capacity,
            heat_bucket: step.bucket(heat),
        }
    }
}

/// Best completion found from a state. `picks` indexes into the candidate set, most
/// recently chosen outfit last; `None` output means no completion reaches heat <= 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub output: Option<f64>,
    pub leftover: i32,
    pub picks: Option<Vec<usize>>,
}

impl Outcome {
    /// Installing nothing more: feasible with zero output when already cool enough.
    pub fn baseline(capacity: i32, net_heat: f64) -> Self {
        if net_heat <= 0.0 {
            Self {
                output: Some(0.0),
                leftover: capacity,
                picks: Some(Vec::new()),
            }
        } else {
            Self {
                output: None,
                leftover: capacity,
                picks: None,
            }
        }
    }

    pub fn infeasible(capacity: i32) -> Self {
        Self {
            output: None,
            leftover: capacity,
            picks: None,
        }
    }

    pub fn is_feasible(&self) -> bool {
        self.output.is_some()
    }

    /// Fold in the completion reached by installing `pick` (worth `energy`) ahead of `sub`.
    /// Higher output wins; equal output wins only with strictly more leftover space.
    pub fn consider(&mut self, pick: usize, energy: f64, sub: &Outcome) -> bool {
        let (Some(sub_output), Some(sub_picks)) = (sub.output, sub.picks.as_ref()) else {
            return false;
        };
        let total = sub_output + energy;
        let improves = match self.output {
            None => true,
            Some(best) => total > best || (total == best && sub.leftover > self.leftover),
        };
        if improves {
            let mut picks = Vec::with_capacity(sub_picks.len() + 1);
            picks.extend_from_slice(sub_picks);
            picks.push(pick);
            self.output = Some(total);
            self.leftover = sub.leftover;
            self.picks = Some(picks);
        }
        improves
    }
}

#[derive(Debug, Clone)]
pub struct MemoCache {
    coefficients: PlatformCoefficients,
    step: HeatStep,
    entries: HashMap<StateKey, Outcome>,
}

impl MemoCache {
    pub fn new(coefficients: PlatformCoefficients, step: HeatStep) -> Self {
        Self {
            coefficients,
            step,
            entries: HashMap::new(),
        }
    }

    pub fn coefficients(&self) -> PlatformCoefficients {
        self.coefficients
    }

    pub fn step(&self) -> HeatStep {
        self.step
    }

    pub fn get(&self, key: &StateKey) -> Option<&Outcome> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &StateKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: StateKey, outcome: Outcome) {
        self.entries.insert(key, outcome);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
