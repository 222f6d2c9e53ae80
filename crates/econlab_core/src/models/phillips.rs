//! Backward-looking New Keynesian Phillips curve, the teaching form
//! `π[t] = β·π[t−1] + κ·y_gap + shock[t]`.

use super::Shock;
use crate::curve::EPS;
use crate::solvers::{DiscreteMap, PeriodMap};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NkpcParams {
    pub beta: f64,
    pub kappa: f64,
}

impl Default for NkpcParams {
    fn default() -> Self {
        Self {
            beta: 0.9,
            kappa: 0.2,
        }
    }
}

impl NkpcParams {
    /// Fixed point `κ·y_gap/(1−β)` with no shocks; `None` when β is 1.
    pub fn long_run_inflation(&self, y_gap: f64) -> Option<f64> {
        let persistence_gap = 1.0 - self.beta;
        if persistence_gap.abs() < EPS {
            return None;
        }
        Some(self.kappa * y_gap / persistence_gap)
    }
}

pub fn nkpc_next(pi_prev: f64, y_gap: f64, shock: f64, params: &NkpcParams) -> f64 {
    params.beta * pi_prev + params.kappa * y_gap + shock
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhillipsPath {
    pub pi: Vec<f64>,
    pub shock: Vec<f64>,
}

struct PhillipsMap<'a> {
    params: &'a NkpcParams,
    y_gap: f64,
    shock: &'a [f64],
}

impl PeriodMap for PhillipsMap<'_> {
    fn dimension(&self) -> usize {
        1
    }

    fn apply(&self, period: usize, x: &[f64], out: &mut [f64]) {
        // Applied in period t, the map produces π[t + 1].
        let shock = self.shock.get(period + 1).copied().unwrap_or(0.0);
        out[0] = nkpc_next(x[0], self.y_gap, shock, self.params);
    }
}

/// Inflation path from `π[0] = 0` over `horizon` periods under a constant
/// output gap and an AR(1) cost-push shock.
pub fn simulate_phillips(
    horizon: usize,
    y_gap: f64,
    shock: &Shock,
    params: &NkpcParams,
) -> PhillipsPath {
    let shock = shock.path(horizon);
    let map = PhillipsMap {
        params,
        y_gap,
        shock: &shock,
    };
    let pi = DiscreteMap::new(1)
        .orbit(&map, &[0.0], horizon)
        .into_iter()
        .map(|state| state[0])
        .collect();
    PhillipsPath { pi, shock }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_step_matches_formula() {
        let params = NkpcParams::default();
        let pi = nkpc_next(1.0, 2.0, 0.5, &params);
        assert!((pi - (0.9 + 0.4 + 0.5)).abs() < 1e-12);
    }

    #[test]
    fn inflation_rises_monotonically_to_fixed_point() {
        let params = NkpcParams::default();
        let path = simulate_phillips(200, 1.0, &Shock::none(), &params);
        assert_eq!(path.pi[0], 0.0);
        assert!(path.pi.windows(2).all(|w| w[1] > w[0]));
        let target = params.long_run_inflation(1.0).expect("finite fixed point");
        assert!((target - 2.0).abs() < 1e-12);
        assert!(path.pi.iter().all(|&pi| pi < target));
        assert!((path.pi[199] - target).abs() < 1e-6);
    }

    #[test]
    fn cost_push_shock_lifts_inflation_at_impact() {
        let params = NkpcParams::default();
        let shock = Shock {
            at: 5,
            size: 1.0,
            decay: 0.5,
        };
        let base = simulate_phillips(20, 0.0, &Shock::none(), &params);
        let hit = simulate_phillips(20, 0.0, &shock, &params);
        assert!(base.pi.iter().all(|&pi| pi == 0.0));
        assert_eq!(hit.pi[4], 0.0);
        assert!((hit.pi[5] - 1.0).abs() < 1e-12);
        assert!((hit.pi[6] - (0.9 + 0.5)).abs() < 1e-12);
        assert_eq!(hit.shock.len(), 20);
    }

    #[test]
    fn unit_persistence_has_no_fixed_point() {
        let params = NkpcParams {
            beta: 1.0,
            kappa: 0.2,
        };
        assert!(params.long_run_inflation(1.0).is_none());
    }
}
