//! Two-household consumption response: hand-to-mouth spenders and savers
//! who also react to the interest-rate change. A heuristic, not a solved
//! heterogeneous-agent equilibrium.

use super::Shock;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HankTeaserParams {
    /// Population share of hand-to-mouth households.
    pub lambda: f64,
    pub mpc_htm: f64,
    pub mpc_saver: f64,
    /// Saver consumption response per percentage point of rate change.
    pub ir_elast_saver: f64,
    pub multiplier: f64,
    pub shock_decay: f64,
}

impl Default for HankTeaserParams {
    fn default() -> Self {
        Self {
            lambda: 0.4,
            mpc_htm: 0.9,
            mpc_saver: 0.3,
            ir_elast_saver: -0.5,
            multiplier: 1.2,
            shock_decay: 0.7,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HankPath {
    pub dc_htm: Vec<f64>,
    pub dc_saver: Vec<f64>,
    /// Population-weighted consumption response.
    pub dc: Vec<f64>,
    pub dy: Vec<f64>,
}

/// Impulse responses over `horizon` periods to a transitory income shock of
/// `dy_transitory` at `shock_t` and a rate change of `di_pp` percentage points.
pub fn simulate_hank(
    horizon: usize,
    shock_t: usize,
    dy_transitory: f64,
    di_pp: f64,
    params: &HankTeaserParams,
) -> HankPath {
    let income = Shock {
        at: shock_t,
        size: dy_transitory,
        decay: params.shock_decay,
    }
    .path(horizon);

    let mut path = HankPath {
        dc_htm: Vec::with_capacity(horizon),
        dc_saver: Vec::with_capacity(horizon),
        dc: Vec::with_capacity(horizon),
        dy: Vec::with_capacity(horizon),
    };
    for (t, shock) in income.into_iter().enumerate() {
        let htm = params.mpc_htm * shock;
        let rate_channel = params.ir_elast_saver * di_pp * (-0.2 * t as f64).exp();
        let saver = params.mpc_saver * shock + rate_channel;
        let aggregate = params.lambda * htm + (1.0 - params.lambda) * saver;
        path.dc_htm.push(htm);
        path.dc_saver.push(saver);
        path.dc.push(aggregate);
        path.dy.push(params.multiplier * aggregate);
    }
    path
}
