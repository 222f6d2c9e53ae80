use super::Page;
use crate::controls::{ControlSpec, ResolvedControls};
use crate::figure::{Figure, PageView};
use crate::session::Session;
use anyhow::{Context, Result};
use econlab_core::grid::linspace;
use econlab_core::{LinearCurve, Point2D, Viewport};

fn demand_controls(extra: impl IntoIterator<Item = ControlSpec>) -> Vec<ControlSpec> {
    let mut specs = vec![
        ControlSpec::slider("intercept", "Demand intercept", 10.0, 100.0, 30.0, 0.5),
        ControlSpec::slider("slope", "Demand slope", -2.0, -0.01, -0.2, 0.01),
    ];
    specs.extend(extra);
    specs
}

fn demand(controls: &ResolvedControls) -> Result<LinearCurve> {
    let intercept = controls.get("intercept")?;
    Ok(LinearCurve::new(intercept, controls.get("slope")?))
}

/// Quantity intercept of a downward demand curve.
fn max_quantity(demand: &LinearCurve) -> Result<f64> {
    demand
        .quantity_at(0.0)
        .filter(|q| q.is_finite() && *q > 0.0)
        .context("Demand must reach the quantity axis at a positive quantity")
}

fn classify(elasticity: f64) -> &'static str {
    let magnitude = elasticity.abs();
    if (magnitude - 1.0).abs() < 1e-6 {
        "unit elastic"
    } else if magnitude > 1.0 {
        "elastic"
    } else {
        "inelastic"
    }
}

pub struct PriceElasticityPage;

impl Page for PriceElasticityPage {
    fn id(&self) -> &'static str {
        "price_elasticity"
    }

    fn title(&self) -> &'static str {
        "Price elasticity of demand"
    }

    fn controls(&self, _session: &Session) -> Vec<ControlSpec> {
        demand_controls([
            ControlSpec::slider("q0", "Quantity A", 0.0, 500.0, 50.0, 1.0),
            ControlSpec::slider("q1", "Quantity B", 0.0, 500.0, 70.0, 1.0),
        ])
    }

    fn render(&self, controls: &ResolvedControls, _session: &mut Session) -> Result<PageView> {
        let demand = demand(controls)?;
        let q_max = max_quantity(&demand)?;
        let (q0, q1) = (controls.get("q0")?.min(q_max), controls.get("q1")?.min(q_max));

        let mut figure = Figure::new(
            "Demand",
            "Quantity",
            "Price",
            Viewport::quadrant(q_max * 1.1, demand.intercept * 1.1)?,
        );
        figure.curve("Demand", &demand, false);
        figure.point_with_guides("A", Point2D::new(q0, demand.eval(q0)));
        figure.point_with_guides("B", Point2D::new(q1, demand.eval(q1)));
        figure.marker("Unit elastic", Point2D::new(q_max / 2.0, demand.intercept / 2.0));

        let mut view = PageView::default();
        let point = demand.point_elasticity(q0);
        match point {
            Some(e) => view.metric_with("Point elasticity at A", Some(e), classify(e)),
            None => view.metric("Point elasticity at A", None),
        }
        let arc = demand.arc_elasticity(q0, q1);
        match arc {
            Some(e) => view.metric_with("Arc elasticity A→B", Some(e), classify(e)),
            None => view.metric("Arc elasticity A→B", None),
        }
        if arc.is_none() {
            view.note("Pick two different points on the visible part of the curve.");
        }
        Ok(view.panel(figure))
    }
}

pub struct TotalRevenuePage;

impl Page for TotalRevenuePage {
    fn id(&self) -> &'static str {
        "elasticity_total_revenue"
    }

    fn title(&self) -> &'static str {
        "Elasticity and total revenue"
    }

    fn controls(&self, _session: &Session) -> Vec<ControlSpec> {
        let q = ControlSpec::slider("q", "Quantity", 0.0, 500.0, 50.0, 1.0);
        demand_controls([q])
    }

    fn render(&self, controls: &ResolvedControls, _session: &mut Session) -> Result<PageView> {
        let demand = demand(controls)?;
        let q_max = max_quantity(&demand)?;
        let q = controls.get("q")?.min(q_max);
        let price = demand.eval(q);

        let mut demand_fig = Figure::new(
            "Demand",
            "Quantity",
            "Price",
            Viewport::quadrant(q_max * 1.1, demand.intercept * 1.1)?,
        );
        demand_fig.curve("Demand", &demand, false);
        demand_fig.region(
            "Total revenue",
            Some(vec![
                Point2D::new(0.0, 0.0),
                Point2D::new(q, 0.0),
                Point2D::new(q, price),
                Point2D::new(0.0, price),
            ]),
        );
        demand_fig.point_with_guides("Selected", Point2D::new(q, price));

        let q_peak = demand.revenue_maximizing_quantity();
        let peak_revenue = q_peak.map(|qp| demand.revenue_at(qp)).unwrap_or(0.0);
        let mut revenue_fig = Figure::new(
            "Total revenue",
            "Quantity",
            "Revenue",
            Viewport::quadrant(q_max * 1.1, peak_revenue.max(1.0) * 1.2)?,
        );
        let samples = linspace(0.0, q_max, 200)
            .into_iter()
            .map(|x| Point2D::new(x, demand.revenue_at(x)));
        revenue_fig.polyline("TR", samples, false);
        revenue_fig.point_with_guides("Selected", Point2D::new(q, demand.revenue_at(q)));

        let mut view = PageView::default();
        view.metric("Total revenue", Some(demand.revenue_at(q)));
        view.metric("Revenue-maximizing quantity", q_peak);
        if let Some(e) = demand.point_elasticity(q) {
            view.metric_with("Elasticity", Some(e), classify(e));
            let hint = match classify(e) {
                "elastic" => "Demand is elastic here: cutting the price raises revenue.",
                "inelastic" => "Demand is inelastic here: raising the price raises revenue.",
                _ => "Revenue is at its peak where demand is unit elastic.",
            };
            view.note(hint);
        }
        Ok(view.panel(demand_fig).panel(revenue_fig))
    }
}
