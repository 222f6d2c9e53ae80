use crate::curve::floor_abs;
use crate::error::ModelError;
use crate::grid::{argmin_abs_diff, GridSettings};
use serde::{Deserialize, Serialize};

/// Closed-economy IS-LM with linear consumption, investment and money demand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IsLmParams {
    /// Autonomous consumption.
    pub c0: f64,
    /// Marginal propensity to consume.
    pub c1: f64,
    /// Autonomous investment.
    pub i0: f64,
    /// Interest sensitivity of investment.
    pub i1: f64,
    /// Government purchases.
    pub g: f64,
    /// Income tax rate.
    pub t: f64,
    /// Real money balances M/P.
    pub m: f64,
    /// Income sensitivity of money demand.
    pub k: f64,
    /// Interest sensitivity of money demand.
    pub h: f64,
}

impl Default for IsLmParams {
    fn default() -> Self {
        Self {
            c0: 50.0,
            c1: 0.6,
            i0: 40.0,
            i1: 20.0,
            g: 100.0,
            t: 0.2,
            m: 300.0,
            k: 0.5,
            h: 40.0,
        }
    }
}

impl IsLmParams {
    /// Output on the IS curve at interest rate `r`.
    pub fn is_output(&self, r: f64) -> f64 {
        let autonomous = self.c0 + self.i0 + self.g - self.i1 * r;
        autonomous / floor_abs(1.0 - self.c1 * (1.0 - self.t))
    }

    /// Output on the LM curve at interest rate `r`.
    pub fn lm_output(&self, r: f64) -> f64 {
        (self.m + self.h * r) / floor_abs(self.k)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsLmSolution {
    pub r_star: f64,
    pub y_star: f64,
    pub r_grid: Vec<f64>,
    pub y_is: Vec<f64>,
    pub y_lm: Vec<f64>,
}

/// Nearest-grid-point equilibrium over the default `r ∈ [0, 20]`, 400 points.
pub fn solve_is_lm(params: &IsLmParams) -> IsLmSolution {
    let grid = GridSettings::default().points().unwrap_or_default();
    solve_on_points(params, grid)
}

pub fn solve_is_lm_on(
    params: &IsLmParams,
    grid: &GridSettings,
) -> Result<IsLmSolution, ModelError> {
    Ok(solve_on_points(params, grid.points()?))
}

fn solve_on_points(params: &IsLmParams, r_grid: Vec<f64>) -> IsLmSolution {
    let y_is: Vec<f64> = r_grid.iter().map(|&r| params.is_output(r)).collect();
    let y_lm: Vec<f64> = r_grid.iter().map(|&r| params.lm_output(r)).collect();
    let (r_star, y_star) = match argmin_abs_diff(&y_is, &y_lm) {
        Some(idx) => (r_grid[idx], y_is[idx]),
        None => (f64::NAN, f64::NAN),
    };
    IsLmSolution {
        r_star,
        y_star,
        r_grid,
        y_is,
        y_lm,
    }
}
