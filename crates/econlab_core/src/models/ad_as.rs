use crate::error::ModelError;
use crate::grid::{argmin_abs_diff, GridSettings};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdAsParams {
    /// AD intercept.
    pub a: f64,
    /// AD slope in P.
    pub b: f64,
    /// Potential output; the LRAS line.
    pub y_potential: f64,
    pub sras_slope: f64,
    /// Expected price level.
    pub p_expected: f64,
}

impl Default for AdAsParams {
    fn default() -> Self {
        Self {
            a: 200.0,
            b: 1.0,
            y_potential: 100.0,
            sras_slope: 1.0,
            p_expected: 100.0,
        }
    }
}

impl AdAsParams {
    pub fn aggregate_demand(&self, p: f64) -> f64 {
        self.a - self.b * p
    }

    pub fn short_run_supply(&self, p: f64) -> f64 {
        self.y_potential + self.sras_slope * (p - self.p_expected)
    }

    /// Price grid used by [`solve_ad_as`]: 400 points over `[50, 150]`.
    pub fn default_grid() -> GridSettings {
        GridSettings::new(50.0, 150.0, 400)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdAsSolution {
    pub p_star: f64,
    pub y_star: f64,
    pub p_grid: Vec<f64>,
    pub y_ad: Vec<f64>,
    pub y_sras: Vec<f64>,
    /// Vertical long-run supply at potential output.
    pub y_lras: f64,
}

impl AdAsSolution {
    /// `y* − y_potential`; positive is an inflationary gap.
    pub fn output_gap(&self) -> f64 {
        self.y_star - self.y_lras
    }
}

pub fn solve_ad_as(params: &AdAsParams) -> AdAsSolution {
    let grid = AdAsParams::default_grid().points().unwrap_or_default();
    solve_on_points(params, grid)
}

pub fn solve_ad_as_on(
    params: &AdAsParams,
    grid: &GridSettings,
) -> Result<AdAsSolution, ModelError> {
    Ok(solve_on_points(params, grid.points()?))
}

fn solve_on_points(params: &AdAsParams, p_grid: Vec<f64>) -> AdAsSolution {
    let y_ad: Vec<f64> = p_grid.iter().map(|&p| params.aggregate_demand(p)).collect();
    let y_sras: Vec<f64> = p_grid.iter().map(|&p| params.short_run_supply(p)).collect();
    let (p_star, y_star) = match argmin_abs_diff(&y_ad, &y_sras) {
        Some(idx) => (p_grid[idx], y_ad[idx]),
        None => (f64::NAN, f64::NAN),
    };
    AdAsSolution {
        p_star,
        y_star,
        p_grid,
        y_ad,
        y_sras,
        y_lras: params.y_potential,
    }
}
