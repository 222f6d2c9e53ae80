use super::{
    fmt_point, market_controls, market_curves, market_viewport, Page, DEFAULT_DEMAND,
    DEFAULT_SUPPLY,
};
use crate::controls::{ControlSpec, ResolvedControls};
use crate::figure::{Figure, PageView};
use crate::session::{Session, Side};
use anyhow::{bail, Context, Result};
use econlab_core::curve::Direction;
use econlab_core::surplus::{
    consumer_surplus, consumer_surplus_region, producer_surplus, producer_surplus_region,
};
use econlab_core::{intersect, LinearCurve, Point2D, Viewport};
use tracing::{event, Level};

const DEMAND_ROWS: [[f64; 2]; 3] = [[10.0, 28.0], [50.0, 20.0], [90.0, 12.0]];
const SUPPLY_ROWS: [[f64; 2]; 3] = [[10.0, 8.0], [30.0, 15.0], [50.0, 24.0]];

/// Editable (Q, P) table fitted to a straight line, which can be sent to
/// the market page.
pub struct SchedulePage {
    pub side: Side,
}

impl SchedulePage {
    fn rows(&self, controls: &ResolvedControls) -> Vec<Point2D> {
        if !controls.table().is_empty() {
            return controls.table().to_vec();
        }
        let defaults = match self.side {
            Side::Demand => DEMAND_ROWS,
            Side::Supply => SUPPLY_ROWS,
        };
        defaults.iter().map(|&row| Point2D::from(row)).collect()
    }

    fn label(&self) -> &'static str {
        match self.side {
            Side::Demand => "Demand",
            Side::Supply => "Supply",
        }
    }
}

impl Page for SchedulePage {
    fn id(&self) -> &'static str {
        match self.side {
            Side::Demand => "demand_schedule",
            Side::Supply => "supply_schedule",
        }
    }

    fn title(&self) -> &'static str {
        match self.side {
            Side::Demand => "Demand schedule",
            Side::Supply => "Supply schedule",
        }
    }

    fn controls(&self, _session: &Session) -> Vec<ControlSpec> {
        vec![ControlSpec::toggle("show_fit", "Show fitted line", true)]
    }

    fn render(&self, controls: &ResolvedControls, _session: &mut Session) -> Result<PageView> {
        let rows = self.rows(controls);
        let fit = LinearCurve::fit_schedule(&rows);

        let finite = rows.iter().filter(|p| p.x.is_finite() && p.y.is_finite());
        let (mut xmax, mut ymax) = (10.0_f64, 10.0_f64);
        for p in finite.clone() {
            xmax = xmax.max(p.x);
            ymax = ymax.max(p.y);
        }
        if let Some(curve) = fit {
            ymax = ymax.max(curve.intercept);
        }
        let viewport = Viewport::quadrant(xmax * 1.2, ymax * 1.2)?;

        let mut figure = Figure::new(self.title(), "Quantity", "Price", viewport);
        for (i, p) in finite.enumerate() {
            figure.marker(&format!("Row {}", i + 1), *p);
        }

        let mut view = PageView::default();
        match fit {
            Some(curve) => {
                if controls.flag("show_fit")? {
                    figure.curve(&format!("{} (fitted)", self.label()), &curve, false);
                }
                view.metric("Intercept", Some(curve.intercept));
                view.metric("Slope", Some(curve.slope));
                let expected_sign = match self.side {
                    Side::Demand => curve.slope < 0.0,
                    Side::Supply => curve.slope > 0.0,
                };
                if !expected_sign {
                    view.note(format!(
                        "The fitted {} curve slopes the unusual way.",
                        self.label().to_lowercase()
                    ));
                }
            }
            None => view.note("Enter at least two complete rows to fit a line."),
        }
        Ok(view.panel(figure))
    }

    fn act(&self, action: &str, controls: &ResolvedControls, session: &mut Session) -> Result<()> {
        match action {
            "send" => {
                let curve = LinearCurve::fit_schedule(&self.rows(controls))
                    .context("Need at least two complete rows before sending the curve")?;
                event!(
                    Level::DEBUG,
                    side = self.label(),
                    intercept = curve.intercept,
                    slope = curve.slope,
                    "schedule sent to market"
                );
                session.send(self.side, curve);
                Ok(())
            }
            other => bail!("Page '{}' has no action '{}'", self.id(), other),
        }
    }
}

pub struct MarketModelPage;

impl Page for MarketModelPage {
    fn id(&self) -> &'static str {
        "market_model"
    }

    fn title(&self) -> &'static str {
        "Market model"
    }

    fn controls(&self, session: &Session) -> Vec<ControlSpec> {
        let mut specs = market_controls(
            session.curve(Side::Demand).unwrap_or(DEFAULT_DEMAND),
            session.curve(Side::Supply).unwrap_or(DEFAULT_SUPPLY),
        );
        specs.push(ControlSpec::toggle("show_surplus", "Shade surplus", true));
        specs
    }

    fn render(&self, controls: &ResolvedControls, session: &mut Session) -> Result<PageView> {
        let (demand, supply) = market_curves(controls)?;
        let equilibrium = intersect(&demand, &supply);

        let viewport = market_viewport(&[demand, supply], &[])?;
        let mut figure = Figure::new("Market", "Quantity", "Price", viewport);
        figure.curve("Demand", &demand, false);
        figure.curve("Supply", &supply, false);

        let mut view = PageView::default();
        match equilibrium {
            Some(eq) => {
                figure.point_with_guides("Equilibrium", eq);
                if controls.flag("show_surplus")? {
                    figure.region("Consumer surplus", consumer_surplus_region(&demand, eq.x, eq.y));
                    figure.region("Producer surplus", producer_surplus_region(&supply, eq.x, eq.y));
                }
                if eq.x < 0.0 || eq.y < 0.0 {
                    view.note("The curves cross outside the non-negative quadrant.");
                }
                view.metric("Equilibrium quantity", Some(eq.x));
                view.metric("Equilibrium price", Some(eq.y));
                view.metric("Consumer surplus", Some(consumer_surplus(&demand, eq.x, eq.y)));
                view.metric("Producer surplus", Some(producer_surplus(&supply, eq.x, eq.y)));
            }
            None => {
                view.note("The curves are parallel, so there is no equilibrium.");
                view.metric("Equilibrium quantity", None);
                view.metric("Equilibrium price", None);
            }
        }

        if let Some(prev) = session.prev_equilibrium {
            let dq = Direction::between(Some(prev.x), equilibrium.map(|e| e.x));
            let dp = Direction::between(Some(prev.y), equilibrium.map(|e| e.y));
            view.metric_with("Quantity change", equilibrium.map(|e| e.x - prev.x), dq.arrow());
            view.metric_with("Price change", equilibrium.map(|e| e.y - prev.y), dp.arrow());
            view.note(format!("Previous equilibrium: {}", fmt_point(Some(prev))));
        }
        session.record_equilibrium(equilibrium);

        Ok(view.panel(figure))
    }
}

fn shift_metrics(view: &mut PageView, before: Option<Point2D>, after: Option<Point2D>) {
    let dq = Direction::between(before.map(|p| p.x), after.map(|p| p.x));
    let dp = Direction::between(before.map(|p| p.y), after.map(|p| p.y));
    let delta = |f: fn(Point2D) -> f64| before.zip(after).map(|(b, a)| f(a) - f(b));
    view.metric_with("Quantity change", delta(|p| p.x), dq.arrow());
    view.metric_with("Price change", delta(|p| p.y), dp.arrow());
    view.note(format!("Before: {}", fmt_point(before)));
    view.note(format!("After: {}", fmt_point(after)));
}

fn draw_shift(
    title: &str,
    before: (LinearCurve, LinearCurve),
    after: (LinearCurve, LinearCurve),
) -> Result<(Figure, Option<Point2D>, Option<Point2D>)> {
    let viewport = market_viewport(&[before.0, before.1, after.0, after.1], &[])?;
    let mut figure = Figure::new(title, "Quantity", "Price", viewport);
    let old_eq = intersect(&before.0, &before.1);
    let new_eq = intersect(&after.0, &after.1);

    if before.0 != after.0 {
        figure.curve("Demand (before)", &before.0, true);
    }
    if before.1 != after.1 {
        figure.curve("Supply (before)", &before.1, true);
    }
    figure.curve("Demand", &after.0, false);
    figure.curve("Supply", &after.1, false);
    if let Some(eq) = old_eq {
        figure.marker("E0", eq);
    }
    if let Some(eq) = new_eq {
        figure.point_with_guides("E1", eq);
    }
    Ok((figure, old_eq, new_eq))
}

/// One curve shifts or pivots against a fixed other curve.
pub struct SingleShiftsPage;

impl Page for SingleShiftsPage {
    fn id(&self) -> &'static str {
        "single_shifts"
    }

    fn title(&self) -> &'static str {
        "Single shifts"
    }

    fn controls(&self, _session: &Session) -> Vec<ControlSpec> {
        let mut specs = market_controls(DEFAULT_DEMAND, DEFAULT_SUPPLY);
        specs.extend([
            ControlSpec::choice("curve", "Curve to move", &["demand", "supply"], 0),
            ControlSpec::slider("shift", "Vertical shift", -20.0, 20.0, 5.0, 0.5),
            ControlSpec::slider("pivot", "Slope change", -0.15, 0.15, 0.0, 0.01),
        ]);
        specs
    }

    fn render(&self, controls: &ResolvedControls, _session: &mut Session) -> Result<PageView> {
        let (demand, supply) = market_curves(controls)?;
        let (shift, pivot) = (controls.get("shift")?, controls.get("pivot")?);
        let after = match controls.index("curve")? {
            0 => (demand.shifted(shift).pivoted(pivot), supply),
            _ => (demand, supply.shifted(shift).pivoted(pivot)),
        };

        let (figure, old_eq, new_eq) = draw_shift("Single shift", (demand, supply), after)?;
        let mut view = PageView::default();
        shift_metrics(&mut view, old_eq, new_eq);
        Ok(view.panel(figure))
    }
}

/// Both curves shift at once; one of the two directions is theoretically ambiguous.
pub struct DoubleShiftsPage;

impl Page for DoubleShiftsPage {
    fn id(&self) -> &'static str {
        "double_shifts"
    }

    fn title(&self) -> &'static str {
        "Double shifts"
    }

    fn controls(&self, _session: &Session) -> Vec<ControlSpec> {
        let mut specs = market_controls(DEFAULT_DEMAND, DEFAULT_SUPPLY);
        specs.extend([
            ControlSpec::slider("demand_shift", "Demand shift", -20.0, 20.0, 5.0, 0.5),
            ControlSpec::slider("supply_shift", "Supply shift", -20.0, 20.0, -5.0, 0.5),
        ]);
        specs
    }

    fn render(&self, controls: &ResolvedControls, _session: &mut Session) -> Result<PageView> {
        let (demand, supply) = market_curves(controls)?;
        let (dd, ds) = (controls.get("demand_shift")?, controls.get("supply_shift")?);
        let after = (demand.shifted(dd), supply.shifted(ds));

        let (figure, old_eq, new_eq) = draw_shift("Double shift", (demand, supply), after)?;
        let mut view = PageView::default();
        shift_metrics(&mut view, old_eq, new_eq);
        if let Some(text) = ambiguity_note(dd, ds) {
            view.note(text);
        }
        Ok(view.panel(figure))
    }
}

/// A positive supply shift raises the supply price, i.e. supply decreases.
fn ambiguity_note(demand_shift: f64, supply_shift: f64) -> Option<&'static str> {
    if demand_shift == 0.0 || supply_shift == 0.0 {
        return None;
    }
    Some(match (demand_shift > 0.0, supply_shift > 0.0) {
        (true, false) => {
            "Demand and supply both rise: quantity rises, the price change depends on the sizes."
        }
        (true, true) => {
            "Demand rises, supply falls: price rises, the quantity change depends on the sizes."
        }
        (false, false) => {
            "Demand falls, supply rises: price falls, the quantity change depends on the sizes."
        }
        (false, true) => {
            "Demand and supply both fall: quantity falls, the price change depends on the sizes."
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::Controls;

    fn resolve(page: &dyn Page, session: &Session, controls: Controls) -> ResolvedControls {
        ResolvedControls::resolve(&page.controls(session), &controls).expect("controls")
    }

    #[test]
    fn schedule_fits_default_rows_and_sends() {
        let page = SchedulePage { side: Side::Demand };
        let mut session = Session::default();
        let controls = resolve(&page, &session, Controls::default());
        let view = page.render(&controls, &mut session).expect("render");
        let slope = view
            .find_metric("Slope")
            .and_then(|m| m.value)
            .expect("slope");
        assert!((slope + 0.2).abs() < 1e-12);
        assert_eq!(view.panels[0].markers.len(), 3);

        page.act("send", &controls, &mut session).expect("send");
        let demand = session.demand.expect("demand stored");
        assert!((demand.intercept - 30.0).abs() < 1e-9);
        assert_eq!(session.take_nav_default().as_deref(), Some("market_model"));
    }

    #[test]
    fn schedule_rejects_single_row() {
        let page = SchedulePage { side: Side::Supply };
        let mut session = Session::default();
        let rows = [[1.0, 2.0], [f64::NAN, 3.0]];
        let controls = resolve(&page, &session, Controls::default().with_table(&rows));
        let view = page.render(&controls, &mut session).expect("render");
        assert!(view.find_metric("Slope").is_none());
        assert!(page.act("send", &controls, &mut session).is_err());
        assert!(page.act("bogus", &controls, &mut session).is_err());
        assert!(session.supply.is_none());
    }

    #[test]
    fn market_uses_sent_curves_as_defaults() {
        let page = MarketModelPage;
        let mut session = Session::default();
        session.send(Side::Demand, LinearCurve::new(40.0, -0.5));
        let specs = page.controls(&session);
        let default_of = |key: &str| specs.iter().find(|s| s.key == key).map(|s| s.default);
        assert_eq!(default_of("demand_intercept"), Some(40.0));
        assert_eq!(default_of("supply_slope"), Some(DEFAULT_SUPPLY.slope));
    }

    #[test]
    fn market_reports_textbook_equilibrium_and_direction() {
        let page = MarketModelPage;
        let mut session = Session::default();
        let controls = resolve(&page, &session, Controls::default());
        let view = page.render(&controls, &mut session).expect("render");
        let cs = view
            .find_metric("Consumer surplus")
            .and_then(|m| m.value)
            .expect("cs");
        assert!((cs - 694.444).abs() < 1e-2);
        assert_eq!(view.panels[0].regions.len(), 2);
        assert!(view.find_metric("Price change").is_none());

        let higher = Controls::default().with("demand_intercept", 40.0);
        let richer = resolve(&page, &session, higher);
        let view = page.render(&richer, &mut session).expect("render");
        let dp = view.find_metric("Price change").expect("direction");
        assert_eq!(dp.detail.as_deref(), Some("↑"));
        assert!(dp.value.expect("dp") > 0.0);
    }

    #[test]
    fn demand_increase_raises_price_and_quantity() {
        let page = SingleShiftsPage;
        let mut session = Session::default();
        let controls = resolve(&page, &session, Controls::default());
        let view = page.render(&controls, &mut session).expect("render");
        let dq = view.find_metric("Quantity change").expect("dq");
        let dp = view.find_metric("Price change").expect("dp");
        assert_eq!(dq.detail.as_deref(), Some("↑"));
        assert_eq!(dp.detail.as_deref(), Some("↑"));
        let lines = &view.panels[0].lines;
        assert!(lines.iter().any(|l| l.name == "Demand (before)"));
    }

    #[test]
    fn double_shift_flags_ambiguity() {
        let page = DoubleShiftsPage;
        let mut session = Session::default();
        let controls = resolve(&page, &session, Controls::default());
        let view = page.render(&controls, &mut session).expect("render");
        let notes = &view.notes;
        assert!(notes.iter().any(|n| n.contains("price change depends")));
        assert_eq!(ambiguity_note(0.0, 3.0), None);
    }
}
