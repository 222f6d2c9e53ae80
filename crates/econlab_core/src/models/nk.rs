//! Three-equation New Keynesian model in lagged form: a backward IS curve,
//! the Phillips curve and a Taylor rule, hit by a one-time shock.

use crate::curve::floor_abs;
use crate::solvers::{DiscreteMap, PeriodMap};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NkParams {
    /// Intertemporal elasticity denominator.
    pub sigma: f64,
    pub beta: f64,
    pub kappa: f64,
    pub phi_pi: f64,
    pub phi_y: f64,
    /// Neutral real rate.
    pub r_natural: f64,
}

impl Default for NkParams {
    fn default() -> Self {
        Self {
            sigma: 1.0,
            beta: 0.99,
            kappa: 0.2,
            phi_pi: 1.5,
            phi_y: 0.5,
            r_natural: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NkShockTarget {
    /// Shock to the IS curve.
    Demand,
    /// Shock to the Phillips curve.
    CostPush,
    /// Shock to the Taylor rule.
    Policy,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NkShock {
    pub target: NkShockTarget,
    pub at: usize,
    pub size: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NkPath {
    pub output_gap: Vec<f64>,
    pub inflation: Vec<f64>,
    pub rate: Vec<f64>,
}

struct NkSystem<'a> {
    params: &'a NkParams,
    shock: &'a NkShock,
}

impl NkSystem<'_> {
    fn impulse(&self, period: usize, target: NkShockTarget) -> f64 {
        if period == self.shock.at && self.shock.target == target {
            self.shock.size
        } else {
            0.0
        }
    }
}

impl PeriodMap for NkSystem<'_> {
    fn dimension(&self) -> usize {
        3
    }

    /// State is `(y, π, i)`; applied in period `t` the map yields period `t`'s values.
    fn apply(&self, period: usize, x: &[f64], out: &mut [f64]) {
        let p = self.params;
        let (y_prev, pi_prev, i_prev) = (x[0], x[1], x[2]);

        let demand = self.impulse(period, NkShockTarget::Demand);
        let cost_push = self.impulse(period, NkShockTarget::CostPush);
        let policy = self.impulse(period, NkShockTarget::Policy);

        let real_gap = i_prev - pi_prev - p.r_natural;
        let y = y_prev - real_gap / floor_abs(p.sigma) + demand;
        let pi = p.beta * pi_prev + p.kappa * y + cost_push;
        let i = p.r_natural + p.phi_pi * pi + p.phi_y * y + policy;

        out[0] = y;
        out[1] = pi;
        out[2] = i;
    }
}

/// Responses for periods `0..horizon`. Every pre-sample value is zero, so a
/// non-zero `r_natural` alone moves period 0 by `r_natural/σ`.
pub fn simulate_nk(horizon: usize, shock: &NkShock, params: &NkParams) -> NkPath {
    let system = NkSystem { params, shock };
    let states = DiscreteMap::new(3).orbit(&system, &[0.0; 3], horizon + 1);

    let mut path = NkPath::default();
    for state in states.into_iter().skip(1) {
        path.output_gap.push(state[0]);
        path.inflation.push(state[1]);
        path.rate.push(state[2]);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shock(target: NkShockTarget) -> NkShock {
        NkShock {
            target,
            at: 3,
            size: 1.0,
        }
    }

    #[test]
    fn quiet_economy_stays_at_rest() {
        let path = simulate_nk(
            12,
            &NkShock {
                target: NkShockTarget::Demand,
                at: 0,
                size: 0.0,
            },
            &NkParams::default(),
        );
        assert_eq!(path.output_gap.len(), 12);
        assert!(path.output_gap.iter().all(|&y| y == 0.0));
        assert!(path.rate.iter().all(|&i| i == 0.0));
    }

    #[test]
    fn demand_shock_raises_gap_inflation_and_rate_on_impact() {
        let params = NkParams::default();
        let path = simulate_nk(20, &shock(NkShockTarget::Demand), &params);
        assert_eq!(path.output_gap[2], 0.0);
        assert!((path.output_gap[3] - 1.0).abs() < 1e-12);
        assert!((path.inflation[3] - 0.2).abs() < 1e-12);
        assert!((path.rate[3] - (1.5 * 0.2 + 0.5)).abs() < 1e-12);
        // The policy response pulls output back the next period.
        assert!(path.output_gap[4] < path.output_gap[3]);
    }

    #[test]
    fn policy_shock_tightens_then_cools_output() {
        let path = simulate_nk(20, &shock(NkShockTarget::Policy), &NkParams::default());
        assert!((path.rate[3] - 1.0).abs() < 1e-12);
        assert_eq!(path.output_gap[3], 0.0);
        assert!(path.output_gap[4] < 0.0);
        assert!(path.inflation[4] < 0.0);
    }

    #[test]
    fn cost_push_shock_moves_inflation_first() {
        let path = simulate_nk(20, &shock(NkShockTarget::CostPush), &NkParams::default());
        assert!((path.inflation[3] - 1.0).abs() < 1e-12);
        assert_eq!(path.output_gap[3], 0.0);
        assert!(path.rate[3] > 0.0);
    }

    #[test]
    fn neutral_rate_feeds_period_zero_from_zero_start() {
        let params = NkParams {
            r_natural: 2.0,
            sigma: 2.0,
            ..NkParams::default()
        };
        let quiet = NkShock {
            target: NkShockTarget::Policy,
            at: 0,
            size: 0.0,
        };
        let path = simulate_nk(3, &quiet, &params);
        // y[0] = r*/σ, π[0] = κ·y[0], i[0] = r* + φπ·π[0] + φy·y[0]
        assert!((path.output_gap[0] - 1.0).abs() < 1e-12);
        assert!((path.inflation[0] - 0.2).abs() < 1e-12);
        assert!((path.rate[0] - (2.0 + 1.5 * 0.2 + 0.5)).abs() < 1e-12);
        // y[1] = y[0] − (i[0] − π[0] − r*)/σ
        let expected = 1.0 - (path.rate[0] - path.inflation[0] - 2.0) / 2.0;
        assert!((path.output_gap[1] - expected).abs() < 1e-12);
    }
}
