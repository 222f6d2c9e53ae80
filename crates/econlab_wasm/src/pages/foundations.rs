use super::Page;
use crate::controls::{ControlSpec, ResolvedControls};
use crate::figure::{Figure, PageView};
use crate::session::Session;
use anyhow::{bail, Result};
use econlab_core::budget::{BudgetField, BudgetLine, ShiftMode};
use econlab_core::production::{
    comparative_advantage, production_points, trade_line, Frontier, LinearProducer, ProducerId,
};
use econlab_core::{Point2D, Viewport};

const BUDGET_FIELDS: [BudgetField; 3] = [
    BudgetField::Income,
    BudgetField::PriceX,
    BudgetField::PriceY,
];
const SHIFT_MODES: [ShiftMode; 2] = [ShiftMode::Percent, ShiftMode::Absolute];

pub struct BudgetConstraintPage;

impl BudgetConstraintPage {
    fn budget(controls: &ResolvedControls) -> Result<BudgetLine> {
        Ok(BudgetLine::new(
            controls.get("income")?,
            controls.get("px")?,
            controls.get("py")?,
        ))
    }
}

impl Page for BudgetConstraintPage {
    fn id(&self) -> &'static str {
        "budget_constraint"
    }

    fn title(&self) -> &'static str {
        "Budget constraint"
    }

    fn controls(&self, _session: &Session) -> Vec<ControlSpec> {
        let default = BudgetLine::default();
        vec![
            ControlSpec::slider("income", "Income (M)", 1.0, 200.0, default.income, 1.0),
            ControlSpec::slider("px", "Price of X", 0.1, 20.0, default.px, 0.1),
            ControlSpec::slider("py", "Price of Y", 0.1, 20.0, default.py, 0.1),
            ControlSpec::choice("shift_field", "Shift", &["income", "price_x", "price_y"], 0),
            ControlSpec::choice("shift_mode", "Shift by", &["percent", "absolute"], 0),
            ControlSpec::slider("shift_delta", "Shift size", -100.0, 100.0, 10.0, 0.5),
        ]
    }

    fn render(&self, controls: &ResolvedControls, session: &mut Session) -> Result<PageView> {
        let current = Self::budget(controls)?;
        let drawn: Vec<BudgetLine> = [
            Some(current),
            session.budget_baseline,
            session.budget_shifted,
        ]
        .into_iter()
        .flatten()
        .collect();

        let (mut xmax, mut ymax) = (1.0_f64, 1.0_f64);
        for line in &drawn {
            let (x_int, y_int) = line.intercepts();
            xmax = xmax.max(x_int);
            ymax = ymax.max(y_int);
        }
        let viewport = Viewport::quadrant(xmax * 1.1, ymax * 1.1)?;
        let mut figure = Figure::new("Budget set", "Good X", "Good Y", viewport);
        figure.curve("Budget", &current.as_curve(), false);
        if let Some(baseline) = session.budget_baseline {
            figure.curve("Baseline", &baseline.as_curve(), true);
        }
        if let Some(shifted) = session.budget_shifted {
            figure.curve("After shift", &shifted.as_curve(), false);
        }
        let (x_int, y_int) = current.intercepts();
        let affordable = vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(x_int, 0.0),
            Point2D::new(0.0, y_int),
        ];
        figure.region("Affordable set", Some(affordable));

        let mut view = PageView::default();
        view.metric("Max X", Some(x_int));
        view.metric("Max Y", Some(y_int));
        view.metric_with("Slope", Some(current.slope()), "−Px/Py");
        if let Some(shifted) = session.budget_shifted {
            let (sx, sy) = shifted.intercepts();
            view.metric("Max X after shift", Some(sx));
            view.metric("Max Y after shift", Some(sy));
        }
        Ok(view.panel(figure))
    }

    fn act(&self, action: &str, controls: &ResolvedControls, session: &mut Session) -> Result<()> {
        let current = Self::budget(controls)?;
        match action {
            "set_baseline" => session.budget_baseline = Some(current),
            "clear_baseline" => {
                session.budget_baseline = None;
                session.budget_shifted = None;
            }
            "apply_shift" => {
                let field = controls.index("shift_field")?;
                let mode = controls.index("shift_mode")?;
                let field = BUDGET_FIELDS[field.min(BUDGET_FIELDS.len() - 1)];
                let mode = SHIFT_MODES[mode.min(SHIFT_MODES.len() - 1)];
                let delta = controls.get("shift_delta")?;
                session.budget_baseline = Some(current);
                session.budget_shifted = Some(current.apply_shift(field, mode, delta));
            }
            other => bail!("Page '{}' has no action '{}'", self.id(), other),
        }
        Ok(())
    }
}

pub struct PpcPage;

impl Page for PpcPage {
    fn id(&self) -> &'static str {
        "ppc"
    }

    fn title(&self) -> &'static str {
        "Production possibilities"
    }

    fn controls(&self, _session: &Session) -> Vec<ControlSpec> {
        vec![
            ControlSpec::slider("x_max", "Max X", 10.0, 200.0, 100.0, 1.0),
            ControlSpec::slider("y_max", "Max Y", 10.0, 200.0, 100.0, 1.0),
            ControlSpec::slider("curvature", "Curvature", 1.0, 4.0, 2.0, 0.1),
            ControlSpec::slider("x", "Produce X", 0.0, 200.0, 50.0, 1.0),
            ControlSpec::slider("growth", "Growth (%)", -50.0, 100.0, 0.0, 1.0),
        ]
    }

    fn render(&self, controls: &ResolvedControls, _session: &mut Session) -> Result<PageView> {
        let frontier = Frontier::new(
            controls.get("x_max")?,
            controls.get("y_max")?,
            controls.get("curvature")?,
        )?;
        let growth = controls.get("growth")?;
        let grown = if growth != 0.0 {
            Some(frontier.scaled(growth)?)
        } else {
            None
        };

        let scale = grown.map_or(1.0, |g| (g.x_max() / frontier.x_max()).max(1.0));
        let extent = scale * 1.1;
        let viewport = Viewport::quadrant(frontier.x_max() * extent, frontier.y_max() * extent)?;
        let mut figure = Figure::new("Production possibilities", "Good X", "Good Y", viewport);
        figure.polyline("Frontier", frontier.sample(200), false);
        if let Some(grown) = grown {
            figure.polyline("After growth", grown.sample(200), true);
        }

        let x = controls.get("x")?.min(frontier.x_max());
        let point = Point2D::new(x, frontier.y_at(x));
        figure.point_with_guides("Production", point);

        let mut view = PageView::default();
        view.metric("Y produced", Some(point.y));
        view.metric_with(
            "Opportunity cost of X",
            Some(frontier.opportunity_cost(x)),
            "units of Y per unit of X",
        );
        if controls.get("x")? > frontier.x_max() {
            view.note("X is capped at the frontier's maximum.");
        }
        Ok(view.panel(figure))
    }
}

pub struct ComparativeAdvantagePage;

impl Page for ComparativeAdvantagePage {
    fn id(&self) -> &'static str {
        "comparative_advantage"
    }

    fn title(&self) -> &'static str {
        "Comparative advantage"
    }

    fn controls(&self, _session: &Session) -> Vec<ControlSpec> {
        vec![
            ControlSpec::slider("a_x", "A: max X", 1.0, 200.0, 100.0, 1.0),
            ControlSpec::slider("a_y", "A: max Y", 1.0, 200.0, 100.0, 1.0),
            ControlSpec::slider("b_x", "B: max X", 1.0, 200.0, 60.0, 1.0),
            ControlSpec::slider("b_y", "B: max Y", 1.0, 200.0, 140.0, 1.0),
            ControlSpec::slider("share_a", "A specialization", 0.0, 1.0, 1.0, 0.05),
            ControlSpec::slider("share_b", "B specialization", 0.0, 1.0, 1.0, 0.05),
            ControlSpec::slider("terms", "Terms of trade (Px/Py)", 0.1, 5.0, 1.5, 0.05),
        ]
    }

    fn render(&self, controls: &ResolvedControls, _session: &mut Session) -> Result<PageView> {
        let a = LinearProducer::new(controls.get("a_x")?, controls.get("a_y")?)?;
        let b = LinearProducer::new(controls.get("b_x")?, controls.get("b_y")?)?;
        let advantage = comparative_advantage(&a, &b);
        let (point_a, point_b) =
            production_points(&a, &b, controls.get("share_a")?, controls.get("share_b")?);

        let xmax = a.x_max.max(b.x_max);
        let ymax = a.y_max.max(b.y_max);
        let mut figure = Figure::new(
            "Production frontiers",
            "Good X",
            "Good Y",
            Viewport::quadrant(xmax * 1.1, ymax * 1.1)?,
        );
        figure.curve("Producer A", &a.frontier(), false);
        figure.curve("Producer B", &b.frontier(), false);
        figure.marker("A produces", point_a);
        figure.marker("B produces", point_b);

        let exporter = match advantage.in_x {
            ProducerId::A => point_a,
            ProducerId::B => point_b,
        };
        figure.curve("Trade line", &trade_line(exporter, controls.get("terms")?), true);

        let name = |id: ProducerId| match id {
            ProducerId::A => "A",
            ProducerId::B => "B",
        };
        let mut view = PageView::default();
        view.metric_with("A: cost of X", Some(advantage.cost_of_x_a), "units of Y");
        view.metric_with("B: cost of X", Some(advantage.cost_of_x_b), "units of Y");
        view.note(format!(
            "{} has the comparative advantage in X; {} in Y.",
            name(advantage.in_x),
            name(advantage.in_y)
        ));
        let terms = controls.get("terms")?;
        let (lo, hi) = if advantage.cost_of_x_a < advantage.cost_of_x_b {
            (advantage.cost_of_x_a, advantage.cost_of_x_b)
        } else {
            (advantage.cost_of_x_b, advantage.cost_of_x_a)
        };
        if terms <= lo || terms >= hi {
            view.note("These terms of trade do not benefit both producers.");
        }
        Ok(view.panel(figure))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::Controls;

    fn resolve(page: &dyn Page, controls: Controls) -> ResolvedControls {
        ResolvedControls::resolve(&page.controls(&Session::default()), &controls).expect("controls")
    }

    fn rendered(page: &dyn Page, session: &mut Session, controls: Controls) -> PageView {
        let resolved = resolve(page, controls);
        page.render(&resolved, session).expect("render")
    }

    fn value(view: &PageView, label: &str) -> f64 {
        view.find_metric(label).and_then(|m| m.value).expect(label)
    }

    #[test]
    fn budget_shift_keeps_baseline() {
        let page = BudgetConstraintPage;
        let mut session = Session::default();
        let controls = resolve(&page, Controls::default());
        page.act("apply_shift", &controls, &mut session).expect("shift");
        assert_eq!(session.budget_baseline, Some(BudgetLine::default()));
        let shifted = session.budget_shifted.expect("shifted");
        assert!((shifted.income - 33.0).abs() < 1e-12);

        let view = page.render(&controls, &mut session).expect("render");
        let lines = &view.panels[0].lines;
        let names: Vec<&str> = lines.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Budget", "Baseline", "After shift"]);
        assert!((value(&view, "Max X after shift") - 33.0).abs() < 1e-9);

        page.act("clear_baseline", &controls, &mut session).expect("clear");
        assert!(session.budget_baseline.is_none());
        assert!(session.budget_shifted.is_none());
        assert!(page.act("explode", &controls, &mut session).is_err());
    }

    #[test]
    fn budget_price_shift_in_absolute_units() {
        let page = BudgetConstraintPage;
        let mut session = Session::default();
        let controls = resolve(
            &page,
            Controls::default()
                .with("shift_field", 2.0)
                .with("shift_mode", 1.0)
                .with("shift_delta", 1.0),
        );
        page.act("apply_shift", &controls, &mut session).expect("shift");
        assert_eq!(session.budget_shifted.map(|b| b.py), Some(2.0));
    }

    #[test]
    fn ppc_reports_rising_cost() {
        let page = PpcPage;
        let mut session = Session::default();
        let low = rendered(&page, &mut session, Controls::default().with("x", 20.0));
        let high = rendered(&page, &mut session, Controls::default().with("x", 80.0));
        let cost = |view: &PageView| value(view, "Opportunity cost of X");
        assert!(cost(&high) > cost(&low));

        let growth = Controls::default().with("growth", 20.0);
        let grown = rendered(&page, &mut session, growth);
        let lines = &grown.panels[0].lines;
        assert_eq!(lines.iter().filter(|l| l.name == "After growth").count(), 1);
    }

    #[test]
    fn comparative_advantage_note_names_producers() {
        let page = ComparativeAdvantagePage;
        let mut session = Session::default();
        let view = rendered(&page, &mut session, Controls::default());
        let note = &view.notes[0];
        assert!(note.starts_with("A has the comparative advantage in X"));
        assert_eq!(view.notes.len(), 1);
        let steep = Controls::default().with("terms", 4.0);
        let bad_terms = rendered(&page, &mut session, steep);
        assert_eq!(bad_terms.notes.len(), 2);
    }
}
