pub mod ad_as;
pub mod fiscal;
pub mod hank;
pub mod is_lm;
pub mod nk;
pub mod phillips;
pub mod solow;

pub use ad_as::{solve_ad_as, solve_ad_as_on, AdAsParams, AdAsSolution};
pub use fiscal::{multiplier_output, simulate_debt, DebtParams};
pub use hank::{simulate_hank, HankPath, HankTeaserParams};
pub use is_lm::{solve_is_lm, solve_is_lm_on, IsLmParams, IsLmSolution};
pub use nk::{simulate_nk, NkParams, NkPath, NkShock, NkShockTarget};
pub use phillips::{nkpc_next, simulate_phillips, NkpcParams, PhillipsPath};
pub use solow::{simulate_solow, SolowParams, SolowPath, SteadyState};

use serde::{Deserialize, Serialize};

/// A one-time impulse of `size` at period `at`, decaying by `decay` each
/// period afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shock {
    pub at: usize,
    pub size: f64,
    pub decay: f64,
}

impl Shock {
    pub const fn none() -> Self {
        Self {
            at: 0,
            size: 0.0,
            decay: 0.0,
        }
    }

    /// `shock[t] = decay·shock[t−1] + (size if t == at)` over `horizon` periods.
    ///
    /// A shock scheduled at or past the horizon never fires.
    pub fn path(&self, horizon: usize) -> Vec<f64> {
        let mut values = vec![0.0; horizon];
        for t in 0..horizon {
            let carried = if t > 0 {
                self.decay * values[t - 1]
            } else {
                0.0
            };
            let impulse = if t == self.at { self.size } else { 0.0 };
            values[t] = carried + impulse;
        }
        values
    }
}
