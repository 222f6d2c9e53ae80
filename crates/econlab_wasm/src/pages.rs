//! Page controllers: each turns resolved control values into core calls
//! and chart geometry.
//!
//! Pages are grouped by teaching module; the registry is built once and
//! dispatches by page id.

mod elasticity;
mod foundations;
mod macroeconomics;
mod market;
mod welfare;

use crate::controls::{ControlSpec, ResolvedControls};
use crate::figure::PageView;
use crate::session::{Session, Side};
use anyhow::{bail, Result};
use econlab_core::{intersect, LinearCurve, Point2D, Viewport};
use serde::Serialize;
use std::collections::BTreeMap;

pub trait Page {
    fn id(&self) -> &'static str;

    fn title(&self) -> &'static str;

    /// Controls for the current session; defaults may come from earlier pages.
    fn controls(&self, session: &Session) -> Vec<ControlSpec>;

    fn render(&self, controls: &ResolvedControls, session: &mut Session) -> Result<PageView>;

    /// Button-style actions that only change the session.
    fn act(
        &self,
        action: &str,
        _controls: &ResolvedControls,
        _session: &mut Session,
    ) -> Result<()> {
        bail!("Page '{}' has no action '{}'", self.id(), action)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageEntry {
    pub id: &'static str,
    pub title: &'static str,
    pub controls: Vec<ControlSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleEntry {
    pub title: &'static str,
    pub pages: Vec<PageEntry>,
}

const MODULES: &[(&str, &[&str])] = &[
    ("Foundations", &["budget_constraint", "ppc", "comparative_advantage"]),
    (
        "Markets",
        &[
            "demand_schedule",
            "supply_schedule",
            "market_model",
            "single_shifts",
            "double_shifts",
        ],
    ),
    ("Elasticity", &["price_elasticity", "elasticity_total_revenue"]),
    (
        "Welfare",
        &[
            "surplus",
            "price_floor",
            "price_ceiling",
            "externality_tax",
            "externality_subsidy",
        ],
    ),
    (
        "Macroeconomics",
        &[
            "is_lm",
            "ad_as",
            "solow",
            "phillips_curve",
            "nk_dsge",
            "fiscal_multipliers",
            "hank",
        ],
    ),
];

pub struct PageRegistry {
    pages: BTreeMap<&'static str, Box<dyn Page>>,
}

impl PageRegistry {
    pub fn new() -> Self {
        let all: Vec<Box<dyn Page>> = vec![
            Box::new(foundations::BudgetConstraintPage),
            Box::new(foundations::PpcPage),
            Box::new(foundations::ComparativeAdvantagePage),
            Box::new(market::SchedulePage { side: Side::Demand }),
            Box::new(market::SchedulePage { side: Side::Supply }),
            Box::new(market::MarketModelPage),
            Box::new(market::SingleShiftsPage),
            Box::new(market::DoubleShiftsPage),
            Box::new(elasticity::PriceElasticityPage),
            Box::new(elasticity::TotalRevenuePage),
            Box::new(welfare::SurplusPage),
            Box::new(welfare::PriceControlPage::floor()),
            Box::new(welfare::PriceControlPage::ceiling()),
            Box::new(welfare::ExternalityPage::tax()),
            Box::new(welfare::ExternalityPage::subsidy()),
            Box::new(macroeconomics::IsLmPage),
            Box::new(macroeconomics::AdAsPage),
            Box::new(macroeconomics::SolowPage),
            Box::new(macroeconomics::PhillipsPage),
            Box::new(macroeconomics::NkDsgePage),
            Box::new(macroeconomics::FiscalPage),
            Box::new(macroeconomics::HankPage),
        ];
        let pages = all.into_iter().map(|page| (page.id(), page)).collect();
        Self { pages }
    }

    pub fn get(&self, id: &str) -> Result<&dyn Page> {
        match self.pages.get(id) {
            Some(page) => Ok(page.as_ref()),
            None => bail!("Unknown page '{}'", id),
        }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Modules in teaching order, each page with its current controls.
    pub fn catalog(&self, session: &Session) -> Vec<ModuleEntry> {
        MODULES
            .iter()
            .map(|&(title, ids)| ModuleEntry {
                title,
                pages: ids
                    .iter()
                    .filter_map(|id| self.pages.get(id))
                    .map(|page| PageEntry {
                        id: page.id(),
                        title: page.title(),
                        controls: page.controls(session),
                    })
                    .collect(),
            })
            .collect()
    }
}

impl Default for PageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// Shared market helpers.

pub(crate) const DEFAULT_DEMAND: LinearCurve = LinearCurve::new(30.0, -0.2);
pub(crate) const DEFAULT_SUPPLY: LinearCurve = LinearCurve::new(5.0, 0.1);

/// Intercept and slope sliders for both curves, seeded from `demand`/`supply`.
pub(crate) fn market_controls(demand: LinearCurve, supply: LinearCurve) -> Vec<ControlSpec> {
    vec![
        ControlSpec::slider(
            "demand_intercept",
            "Demand intercept",
            0.0,
            100.0,
            demand.intercept,
            0.5,
        ),
        ControlSpec::slider("demand_slope", "Demand slope", -5.0, -0.01, demand.slope, 0.01),
        ControlSpec::slider(
            "supply_intercept",
            "Supply intercept",
            -20.0,
            100.0,
            supply.intercept,
            0.5,
        ),
        ControlSpec::slider("supply_slope", "Supply slope", 0.01, 5.0, supply.slope, 0.01),
    ]
}

pub(crate) fn market_curves(controls: &ResolvedControls) -> Result<(LinearCurve, LinearCurve)> {
    let demand = LinearCurve::new(
        controls.get("demand_intercept")?,
        controls.get("demand_slope")?,
    );
    let supply = LinearCurve::new(
        controls.get("supply_intercept")?,
        controls.get("supply_slope")?,
    );
    Ok((demand, supply))
}

/// Quadrant wide enough for the demand curve's quantity intercept and tall
/// enough for both price intercepts and any extra prices.
pub(crate) fn market_viewport(curves: &[LinearCurve], extra_prices: &[f64]) -> Result<Viewport> {
    let mut xmax: f64 = 10.0;
    let mut ymax: f64 = 10.0;
    for curve in curves {
        ymax = ymax.max(curve.intercept);
        if curve.slope < 0.0 {
            if let Some(q) = curve.quantity_at(0.0) {
                xmax = xmax.max(q);
            }
        }
    }
    for curve in curves.iter().filter(|c| c.slope < 0.0) {
        for other in curves.iter().filter(|c| c.slope >= 0.0) {
            if let Some(eq) = intersect(curve, other) {
                xmax = xmax.max(eq.x);
                ymax = ymax.max(eq.y);
            }
        }
    }
    let viewport = Viewport::quadrant(xmax * 1.1, ymax * 1.2)?;
    let padded = extra_prices.iter().map(|p| p * 1.2);
    Ok(viewport.expanded_to_include_y(padded))
}

pub(crate) fn fmt_point(point: Option<Point2D>) -> String {
    match point {
        Some(p) => format!("Q = {:.2}, P = {:.2}", p.x, p.y),
        None => "none".to_string(),
    }
}
