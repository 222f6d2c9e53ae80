//! Solow growth in capital per effective worker.

use crate::curve::EPS;
use crate::solvers::{DiscreteMap, PeriodMap};
use serde::{Deserialize, Serialize};
use tracing::{event, Level};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolowParams {
    /// Saving rate.
    pub s: f64,
    /// Depreciation.
    pub delta: f64,
    /// Population growth.
    pub n: f64,
    /// Technology growth.
    pub g: f64,
    /// Capital share.
    pub alpha: f64,
}

impl Default for SolowParams {
    fn default() -> Self {
        Self {
            s: 0.2,
            delta: 0.05,
            n: 0.01,
            g: 0.02,
            alpha: 0.33,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteadyState {
    pub k: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolowPath {
    pub k: Vec<f64>,
    pub y: Vec<f64>,
}

impl SolowParams {
    pub fn output(&self, k: f64) -> f64 {
        k.powf(self.alpha)
    }

    /// `k[t+1] = (s·k^α + (1−δ)·k) / (1+n+g)`.
    pub fn next_capital(&self, k: f64) -> f64 {
        (self.s * self.output(k) + (1.0 - self.delta) * k) / (1.0 + self.n + self.g)
    }

    /// Break-even investment `(n+g+δ)·k`, the line the saving curve crosses at k*.
    pub fn break_even(&self, k: f64) -> f64 {
        (self.n + self.g + self.delta) * k
    }

    /// `k* = (s/(n+g+δ))^(1/(1−α))`, or `None` when the effective
    /// depreciation is not positive or the power is undefined.
    pub fn steady_state(&self) -> Option<SteadyState> {
        let effective = self.n + self.g + self.delta;
        if effective <= 0.0 {
            event!(
                Level::DEBUG,
                effective,
                "solow steady state undefined: n + g + delta is not positive"
            );
            return None;
        }
        let base = self.s / effective;
        if base < 0.0 || (1.0 - self.alpha).abs() < EPS {
            event!(
                Level::DEBUG,
                base,
                alpha = self.alpha,
                "solow steady state undefined"
            );
            return None;
        }
        let k = base.powf(1.0 / (1.0 - self.alpha));
        if !k.is_finite() {
            return None;
        }
        Some(SteadyState {
            k,
            y: self.output(k),
        })
    }
}

impl PeriodMap for SolowParams {
    fn dimension(&self) -> usize {
        1
    }

    fn apply(&self, _period: usize, x: &[f64], out: &mut [f64]) {
        out[0] = self.next_capital(x[0]);
    }
}

/// Transition path of `horizon` periods starting from `k0`.
pub fn simulate_solow(k0: f64, horizon: usize, params: &SolowParams) -> SolowPath {
    let mut stepper = DiscreteMap::new(params.dimension());
    let k: Vec<f64> = stepper
        .orbit(params, &[k0], horizon)
        .into_iter()
        .map(|state| state[0])
        .collect();
    let y = k.iter().map(|&k| params.output(k)).collect();
    SolowPath { k, y }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_approaches_steady_state() {
        let params = SolowParams::default();
        let path = simulate_solow(2.0, 120, &params);
        assert_eq!(path.k.len(), 120);
        assert_eq!(path.y.len(), 120);
        assert_eq!(path.k[0], 2.0);

        let ss = params.steady_state().expect("steady state");
        assert!((ss.k - 3.9259).abs() < 1e-3, "k* = {}", ss.k);
        let last = path.k[119];
        assert!((last - ss.k).abs() < 1e-2, "k[T-1] = {last}");
        assert!((path.k[119] - path.k[118]).abs() < 1e-3);
        assert!(path.k.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn longer_horizon_meets_tight_convergence() {
        let params = SolowParams::default();
        let path = simulate_solow(2.0, 200, &params);
        assert!((path.k[199] - path.k[198]).abs() < 1e-4);
    }

    #[test]
    fn steady_state_is_a_fixed_point() {
        let params = SolowParams {
            s: 0.3,
            alpha: 0.4,
            ..SolowParams::default()
        };
        let ss = params.steady_state().expect("steady state");
        assert!((params.next_capital(ss.k) - ss.k).abs() < 1e-9);
        assert!((params.s * ss.y - params.break_even(ss.k)).abs() < 1e-9);
    }

    #[test]
    fn shrinking_economy_has_no_steady_state() {
        let params = SolowParams {
            n: -0.05,
            g: -0.02,
            delta: 0.0,
            ..SolowParams::default()
        };
        assert!(params.steady_state().is_none());
        let path = simulate_solow(2.0, 10, &params);
        assert_eq!(path.k.len(), 10);
        assert!(path.k.iter().all(|k| k.is_finite()));
    }

    #[test]
    fn zero_horizon_is_empty() {
        let path = simulate_solow(2.0, 0, &SolowParams::default());
        assert!(path.k.is_empty() && path.y.is_empty());
    }
}
