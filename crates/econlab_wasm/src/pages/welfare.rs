use super::{market_controls, market_curves, market_viewport, Page, DEFAULT_DEMAND, DEFAULT_SUPPLY};
use crate::controls::{ControlSpec, ResolvedControls};
use crate::figure::{Figure, PageView};
use crate::session::Session;
use anyhow::{Context, Result};
use econlab_core::surplus::{
    consumer_surplus, consumer_surplus_region, producer_surplus, producer_surplus_region,
};
use econlab_core::welfare::{
    analyze_externality, apply_price_control, wedge, ExternalityKind, PriceControl,
};
use econlab_core::{intersect, LinearCurve, Point2D};

pub struct SurplusPage;

impl Page for SurplusPage {
    fn id(&self) -> &'static str {
        "surplus"
    }

    fn title(&self) -> &'static str {
        "Consumer and producer surplus"
    }

    fn controls(&self, _session: &Session) -> Vec<ControlSpec> {
        market_controls(DEFAULT_DEMAND, DEFAULT_SUPPLY)
    }

    fn render(&self, controls: &ResolvedControls, _session: &mut Session) -> Result<PageView> {
        let (demand, supply) = market_curves(controls)?;
        let eq = intersect(&demand, &supply).context("Demand and supply never cross")?;

        let viewport = market_viewport(&[demand, supply], &[])?;
        let mut figure = Figure::new("Surplus", "Quantity", "Price", viewport);
        figure.curve("Demand", &demand, false);
        figure.curve("Supply", &supply, false);
        figure.region("Consumer surplus", consumer_surplus_region(&demand, eq.x, eq.y));
        figure.region("Producer surplus", producer_surplus_region(&supply, eq.x, eq.y));
        figure.point_with_guides("Equilibrium", eq);

        let cs = consumer_surplus(&demand, eq.x, eq.y);
        let ps = producer_surplus(&supply, eq.x, eq.y);
        let mut view = PageView::default();
        view.metric("Consumer surplus", Some(cs));
        view.metric("Producer surplus", Some(ps));
        view.metric("Total surplus", Some(cs + ps));
        Ok(view.panel(figure))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ControlSide {
    Floor,
    Ceiling,
}

pub struct PriceControlPage {
    side: ControlSide,
}

impl PriceControlPage {
    pub fn floor() -> Self {
        Self {
            side: ControlSide::Floor,
        }
    }

    pub fn ceiling() -> Self {
        Self {
            side: ControlSide::Ceiling,
        }
    }
}

impl Page for PriceControlPage {
    fn id(&self) -> &'static str {
        match self.side {
            ControlSide::Floor => "price_floor",
            ControlSide::Ceiling => "price_ceiling",
        }
    }

    fn title(&self) -> &'static str {
        match self.side {
            ControlSide::Floor => "Price floor",
            ControlSide::Ceiling => "Price ceiling",
        }
    }

    fn controls(&self, _session: &Session) -> Vec<ControlSpec> {
        let default = match self.side {
            ControlSide::Floor => 20.0,
            ControlSide::Ceiling => 10.0,
        };
        let mut specs = market_controls(DEFAULT_DEMAND, DEFAULT_SUPPLY);
        let price = ControlSpec::slider("price", "Controlled price", 0.0, 60.0, default, 0.5);
        specs.push(price);
        specs
    }

    fn render(&self, controls: &ResolvedControls, _session: &mut Session) -> Result<PageView> {
        let (demand, supply) = market_curves(controls)?;
        let price = controls.get("price")?;
        let control = match self.side {
            ControlSide::Floor => PriceControl::Floor(price),
            ControlSide::Ceiling => PriceControl::Ceiling(price),
        };
        let outcome = apply_price_control(&demand, &supply, control)
            .context("Demand and supply never cross")?;

        let mut figure = Figure::new(
            self.title(),
            "Quantity",
            "Price",
            market_viewport(&[demand, supply], &[price])?,
        );
        figure.curve("Demand", &demand, false);
        figure.curve("Supply", &supply, false);
        figure.curve(self.title(), &LinearCurve::flat(price), true);
        figure.marker("Free-market equilibrium", outcome.equilibrium);

        let price_line = LinearCurve::flat(outcome.price);
        figure.region("Consumer surplus", wedge(&price_line, &demand, 0.0, outcome.traded));
        figure.region("Producer surplus", wedge(&supply, &price_line, 0.0, outcome.traded));
        figure.region("Deadweight loss", outcome.deadweight_region.clone());
        if outcome.binding {
            figure.marker("Quantity demanded", Point2D::new(outcome.quantity_demanded, price));
            figure.marker("Quantity supplied", Point2D::new(outcome.quantity_supplied, price));
        }

        let mut view = PageView::default();
        view.metric("Quantity traded", Some(outcome.traded));
        let imbalance_label = match self.side {
            ControlSide::Floor => "Surplus (excess supply)",
            ControlSide::Ceiling => "Shortage (excess demand)",
        };
        view.metric(imbalance_label, Some(outcome.imbalance));
        view.metric("Consumer surplus", Some(outcome.consumer_surplus));
        view.metric("Producer surplus", Some(outcome.producer_surplus));
        view.metric("Deadweight loss", Some(outcome.deadweight_loss));
        if !outcome.binding {
            view.note(match self.side {
                ControlSide::Floor => {
                    "The floor is below the equilibrium price, so it does not bind."
                }
                ControlSide::Ceiling => {
                    "The ceiling is above the equilibrium price, so it does not bind."
                }
            });
        }
        Ok(view.panel(figure))
    }
}

pub struct ExternalityPage {
    kind: ExternalityKind,
}

impl ExternalityPage {
    pub fn tax() -> Self {
        Self {
            kind: ExternalityKind::ExternalCost,
        }
    }

    pub fn subsidy() -> Self {
        Self {
            kind: ExternalityKind::ExternalBenefit,
        }
    }
}

impl Page for ExternalityPage {
    fn id(&self) -> &'static str {
        match self.kind {
            ExternalityKind::ExternalCost => "externality_tax",
            ExternalityKind::ExternalBenefit => "externality_subsidy",
        }
    }

    fn title(&self) -> &'static str {
        match self.kind {
            ExternalityKind::ExternalCost => "Negative externality and Pigouvian tax",
            ExternalityKind::ExternalBenefit => "Positive externality and Pigouvian subsidy",
        }
    }

    fn controls(&self, _session: &Session) -> Vec<ControlSpec> {
        let (label, default) = match self.kind {
            ExternalityKind::ExternalCost => ("External cost per unit", 9.0),
            ExternalityKind::ExternalBenefit => ("External benefit per unit", 6.0),
        };
        let mut specs = market_controls(DEFAULT_DEMAND, DEFAULT_SUPPLY);
        let per_unit = ControlSpec::slider("per_unit", label, 0.0, 30.0, default, 0.5);
        specs.push(per_unit);
        specs
    }

    fn render(&self, controls: &ResolvedControls, _session: &mut Session) -> Result<PageView> {
        let (demand, supply) = market_curves(controls)?;
        let analysis = analyze_externality(&demand, &supply, self.kind, controls.get("per_unit")?);

        let social_name = match self.kind {
            ExternalityKind::ExternalCost => "Marginal social cost",
            ExternalityKind::ExternalBenefit => "Marginal social benefit",
        };
        let viewport = market_viewport(&[demand, supply, analysis.social_curve], &[])?;
        let mut figure = Figure::new(self.title(), "Quantity", "Price", viewport);
        figure.curve("Demand", &demand, false);
        figure.curve("Supply", &supply, false);
        figure.curve(social_name, &analysis.social_curve, true);
        if let Some(eq) = analysis.private_equilibrium {
            figure.marker("Market outcome", eq);
        }
        if let Some(eq) = analysis.social_equilibrium {
            figure.point_with_guides("Social optimum", eq);
        }
        figure.region("Deadweight loss", analysis.deadweight_region.clone());

        let mut view = PageView::default();
        view.metric("Market quantity", analysis.private_equilibrium.map(|p| p.x));
        view.metric("Efficient quantity", analysis.social_equilibrium.map(|p| p.x));
        let rate_label = match self.kind {
            ExternalityKind::ExternalCost => "Corrective tax per unit",
            ExternalityKind::ExternalBenefit => "Corrective subsidy per unit",
        };
        view.metric(rate_label, analysis.corrective_rate);
        view.metric("Deadweight loss", Some(analysis.deadweight_loss));
        Ok(view.panel(figure))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::Controls;

    fn render(page: &dyn Page, controls: Controls) -> Result<PageView> {
        let mut session = Session::default();
        let resolved = ResolvedControls::resolve(&page.controls(&session), &controls)?;
        page.render(&resolved, &mut session)
    }

    fn value(view: &PageView, label: &str) -> f64 {
        view.find_metric(label).and_then(|m| m.value).expect(label)
    }

    #[test]
    fn surplus_page_totals() {
        let view = render(&SurplusPage, Controls::default()).expect("render");
        assert!((value(&view, "Total surplus") - 1041.667).abs() < 1e-2);
        assert_eq!(view.panels[0].regions.len(), 2);
    }

    #[test]
    fn market_without_positive_trade_has_no_surplus() {
        // Supply starts above the demand intercept: the curves cross at Q < 0.
        let controls = Controls::default().with("supply_intercept", 40.0);
        let view = render(&SurplusPage, controls).expect("render");
        assert_eq!(value(&view, "Total surplus"), 0.0);
        assert!(view.panels[0].regions.is_empty());
    }

    #[test]
    fn binding_floor_creates_surplus_and_deadweight_loss() {
        let view = render(&PriceControlPage::floor(), Controls::default()).expect("render");
        assert!((value(&view, "Quantity traded") - 50.0).abs() < 1e-9);
        let excess = value(&view, "Surplus (excess supply)");
        assert!((excess - 100.0).abs() < 1e-9);
        assert!((value(&view, "Deadweight loss") - 500.0 / 3.0).abs() < 1e-6);
        let regions = &view.panels[0].regions;
        assert!(regions.iter().any(|r| r.name == "Deadweight loss"));
        assert!(view.notes.is_empty());
    }

    #[test]
    fn loose_ceiling_does_not_bind() {
        let controls = Controls::default().with("price", 25.0);
        let view = render(&PriceControlPage::ceiling(), controls).expect("render");
        assert_eq!(value(&view, "Deadweight loss"), 0.0);
        assert_eq!(value(&view, "Shortage (excess demand)"), 0.0);
        assert_eq!(view.notes.len(), 1);
    }

    #[test]
    fn externality_pages_report_pigouvian_rates() {
        let tax = render(&ExternalityPage::tax(), Controls::default()).expect("tax");
        assert!((value(&tax, "Corrective tax per unit") - 9.0).abs() < 1e-9);
        assert!((value(&tax, "Deadweight loss") - 135.0).abs() < 1e-6);

        let subsidy = render(&ExternalityPage::subsidy(), Controls::default()).expect("subsidy");
        let rate = value(&subsidy, "Corrective subsidy per unit");
        assert!((rate - 6.0).abs() < 1e-9);
        assert!((value(&subsidy, "Deadweight loss") - 60.0).abs() < 1e-6);
        let efficient = value(&subsidy, "Efficient quantity");
        assert!(efficient > value(&subsidy, "Market quantity"));
    }
}
