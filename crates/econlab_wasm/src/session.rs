use econlab_core::budget::BudgetLine;
use econlab_core::{LinearCurve, Point2D};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Demand,
    Supply,
}

impl Side {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "demand" => Some(Side::Demand),
            "supply" => Some(Side::Supply),
            _ => None,
        }
    }
}

/// Values carried between page views for one browser session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub demand: Option<LinearCurve>,
    pub supply: Option<LinearCurve>,
    /// Equilibrium from the previous market render, for direction arrows.
    pub prev_equilibrium: Option<Point2D>,
    pub budget_baseline: Option<BudgetLine>,
    pub budget_shifted: Option<BudgetLine>,
    nav_default: Option<String>,
}

impl Session {
    /// Stores a fitted schedule curve and points the next navigation at the market page.
    pub fn send(&mut self, side: Side, curve: LinearCurve) {
        match side {
            Side::Demand => self.demand = Some(curve),
            Side::Supply => self.supply = Some(curve),
        }
        self.nav_default = Some("market_model".to_string());
    }

    pub fn curve(&self, side: Side) -> Option<LinearCurve> {
        match side {
            Side::Demand => self.demand,
            Side::Supply => self.supply,
        }
    }

    /// Remembers a market equilibrium; a render without one keeps the last.
    pub fn record_equilibrium(&mut self, equilibrium: Option<Point2D>) {
        if equilibrium.is_some() {
            self.prev_equilibrium = equilibrium;
        }
    }

    /// The pending navigation target, cleared once read.
    pub fn take_nav_default(&mut self) -> Option<String> {
        self.nav_default.take()
    }
}
