//! Two-good budget constraint `M = px·x + py·y`.

use crate::curve::{LinearCurve, EPS};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetLine {
    pub income: f64,
    pub px: f64,
    pub py: f64,
}

impl Default for BudgetLine {
    fn default() -> Self {
        Self {
            income: 30.0,
            px: 1.0,
            py: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetField {
    Income,
    PriceX,
    PriceY,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftMode {
    /// `delta` is a percentage: 10 means +10%.
    Percent,
    /// `delta` is added directly.
    Absolute,
}

impl BudgetLine {
    pub const fn new(income: f64, px: f64, py: f64) -> Self {
        Self { income, px, py }
    }

    /// (x-intercept, y-intercept); prices are floored at 1e-9.
    pub fn intercepts(&self) -> (f64, f64) {
        let px = self.px.max(EPS);
        let py = self.py.max(EPS);
        (self.income / px, self.income / py)
    }

    /// dy/dx = −px/py.
    pub fn slope(&self) -> f64 {
        -(self.px / self.py.max(EPS))
    }

    /// The line `y = M/py − (px/py)·x` in curve form, for clipping.
    pub fn as_curve(&self) -> LinearCurve {
        LinearCurve::new(self.intercepts().1, self.slope())
    }

    /// New budget after shifting one field; the result is floored at 1e-9.
    pub fn apply_shift(&self, field: BudgetField, mode: ShiftMode, delta: f64) -> Self {
        let mut next = *self;
        let target = match field {
            BudgetField::Income => &mut next.income,
            BudgetField::PriceX => &mut next.px,
            BudgetField::PriceY => &mut next.py,
        };
        *target = match mode {
            ShiftMode::Percent => (*target * (1.0 + delta / 100.0)).max(EPS),
            ShiftMode::Absolute => (*target + delta).max(EPS),
        };
        next
    }
}
