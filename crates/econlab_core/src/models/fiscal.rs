use crate::curve::floor_abs;
use crate::solvers::{DiscreteMap, PeriodMap};
use serde::{Deserialize, Serialize};

/// Output after a change of `dg_pct` percent in government purchases,
/// scaled by `multiplier`, starting from output `y0`.
pub fn multiplier_output(y0: f64, multiplier: f64, dg_pct: f64) -> f64 {
    y0 * (1.0 + multiplier * dg_pct / 100.0)
}

/// Debt-to-GDP accumulation `d[t] = ((1+i)/(1+g))·d[t−1] − primary`, rates in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DebtParams {
    /// Initial debt, percent of GDP.
    pub initial: f64,
    pub interest: f64,
    pub growth: f64,
    /// Primary balance, percent of GDP; positive is a surplus.
    pub primary_balance: f64,
}

impl Default for DebtParams {
    fn default() -> Self {
        Self {
            initial: 60.0,
            interest: 3.0,
            growth: 2.0,
            primary_balance: 0.0,
        }
    }
}

impl DebtParams {
    pub fn growth_factor(&self) -> f64 {
        (1.0 + self.interest / 100.0) / floor_abs(1.0 + self.growth / 100.0)
    }
}

impl PeriodMap for DebtParams {
    fn dimension(&self) -> usize {
        1
    }

    fn apply(&self, _period: usize, x: &[f64], out: &mut [f64]) {
        out[0] = self.growth_factor() * x[0] - self.primary_balance;
    }
}

/// Debt ratio for `years + 1` points, the initial ratio first.
pub fn simulate_debt(years: usize, params: &DebtParams) -> Vec<f64> {
    DiscreteMap::new(1)
        .orbit(params, &[params.initial], years + 1)
        .into_iter()
        .map(|state| state[0])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplier_scales_output_index() {
        assert!((multiplier_output(100.0, 1.5, 2.0) - 103.0).abs() < 1e-12);
        assert_eq!(multiplier_output(100.0, 1.5, 0.0), 100.0);
        assert!(multiplier_output(100.0, 0.8, -5.0) < 100.0);
    }

    #[test]
    fn debt_ratio_drifts_with_r_minus_g() {
        let path = simulate_debt(10, &DebtParams::default());
        assert_eq!(path.len(), 11);
        assert_eq!(path[0], 60.0);
        assert!(path.windows(2).all(|w| w[1] > w[0]));
        assert!((path[1] - 60.0 * 1.03 / 1.02).abs() < 1e-9);
    }

    #[test]
    fn primary_surplus_stabilizes_debt() {
        let params = DebtParams {
            primary_balance: 60.0 * (1.03 / 1.02 - 1.0),
            ..DebtParams::default()
        };
        let path = simulate_debt(30, &params);
        assert!(path.iter().all(|d| (d - 60.0).abs() < 1e-9));
    }
}
