//! Heat model shared by the dominance filter and the search: the frozen platform
//! coefficients and the quantization that turns continuous heat into memo buckets.

use std::fmt;

use serde::Serialize;

use crate::data::item::ItemStats;
use crate::error::{OutfitterError, Result};

pub const DEFAULT_HEAT_STEP: f64 = 10.0;

/// Per-ship multipliers, computed once before a search and never updated inside it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlatformCoefficients {
    /// Scales every point of cooling an outfit provides.
    pub cooling_inefficiency: f64,
    /// Scales the dissipation gained from added mass.
    pub heat_dissipation: f64,
}

impl PlatformCoefficients {
    pub fn new(cooling_inefficiency: f64, heat_dissipation: f64) -> Self {
        Self {
            cooling_inefficiency,
            heat_dissipation,
        }
    }

    /// Heat an outfit adds once installed: generation minus effective cooling minus the
    /// dissipation its mass brings.
    pub fn net_heat(&self, stats: &ItemStats) -> f64 {
        stats.heat
            - self.cooling_inefficiency * stats.cooling
            - 6.0 * self.heat_dissipation * stats.mass
    }
}

impl fmt::Display for PlatformCoefficients {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cooling_inefficiency={} heat_dissipation={}",
            self.cooling_inefficiency, self.heat_dissipation
        )
    }
}

/// Round `heat` up to the next multiple of `step`.
///
/// ```
/// # use outfitter::optimizer::heat::round_heat;
/// assert_eq!(round_heat(11.0, 10.0), 20.0);
/// assert_eq!(round_heat(-11.0, 10.0), -10.0);
/// assert_eq!(round_heat(20.0, 10.0), 20.0);
/// ```
pub fn round_heat(heat: f64, step: f64) -> f64 {
    (heat / step).ceil() * step
}

/// Validated quantization step. Buckets are `ceil(heat / step)`, so two heats share a bucket
/// exactly when [round_heat] maps them to the same value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatStep(f64);

impl HeatStep {
    pub fn new(step: f64) -> Result<Self> {
        if step.is_finite() && step > 0.0 {
            Ok(Self(step))
        } else {
            Err(OutfitterError::InvalidHeatStep(step))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn bucket(&self, heat: f64) -> i64 {
        (heat / self.0).ceil() as i64
    }

    pub fn round(&self, heat: f64) -> f64 {
        round_heat(heat, self.0)
    }
}

impl Default for HeatStep {
    fn default() -> Self {
        Self(DEFAULT_HEAT_STEP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_heat_bounds_hold_over_a_sweep() {
        let step = 10.0;
        let mut previous = f64::NEG_INFINITY;
        let mut h = -250.0;
        while h <= 250.0 {
            let rounded = round_heat(h, step);
            assert!(rounded >= h, "round_heat({h}) = {rounded} below input");
            assert!(rounded <= h + step, "round_heat({h}) = {rounded} beyond one step");
            assert!(rounded >= previous, "round_heat not monotone at {h}");
            previous = rounded;
            h += 0.37;
        }
    }

    #[test]
    fn buckets_agree_with_round_heat() {
        let step = HeatStep::new(2.5).expect("valid step");
        for h in [-7.6, -5.0, -0.1, 0.0, 0.1, 2.5, 2.6, 9.9] {
            assert_eq!(step.bucket(h) as f64 * step.value(), step.round(h));
        }
    }

    #[test]
    fn non_positive_steps_are_rejected() {
        assert!(HeatStep::new(0.0).is_err());
        assert!(HeatStep::new(-1.0).is_err());
        assert!(HeatStep::new(f64::NAN).is_err());
        assert_eq!(HeatStep::default().value(), DEFAULT_HEAT_STEP);
    }

    #[test]
    fn net_heat_combines_cooling_and_mass() {
        let coefficients = PlatformCoefficients::new(0.5, 0.1);
        let stats = ItemStats {
            heat: 10.0,
            cooling: 4.0,
            mass: 5.0,
            ..ItemStats::default()
        };
        // 10 - 0.5*4 - 6*0.1*5
        assert!((coefficients.net_heat(&stats) - 5.0).abs() < 1e-12);
    }
}
