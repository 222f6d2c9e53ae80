//! Deadweight-loss wedges, externalities and price controls.

use crate::curve::{intersect, LinearCurve, Point2D};
use crate::surplus::{consumer_surplus, producer_surplus, Polygon};
use serde::{Deserialize, Serialize};

/// Region between `lower` and `upper` over `[q0, q1]`.
pub fn wedge(lower: &LinearCurve, upper: &LinearCurve, q0: f64, q1: f64) -> Option<Polygon> {
    if q0 >= q1 {
        return None;
    }
    Some(vec![
        Point2D::new(q0, lower.eval(q0)),
        Point2D::new(q1, lower.eval(q1)),
        Point2D::new(q1, upper.eval(q1)),
        Point2D::new(q0, upper.eval(q0)),
    ])
}

/// Signed area `∫(upper − lower) dq` over `[q0, q1]`; zero for an empty
/// interval. Exact for linear curves.
pub fn wedge_area(lower: &LinearCurve, upper: &LinearCurve, q0: f64, q1: f64) -> f64 {
    if q0 >= q1 {
        return 0.0;
    }
    let gap0 = upper.eval(q0) - lower.eval(q0);
    let gap1 = upper.eval(q1) - lower.eval(q1);
    0.5 * (gap0 + gap1) * (q1 - q0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExternalityKind {
    /// Marginal social cost lies above private supply (overproduction).
    ExternalCost,
    /// Marginal social benefit lies above private demand (underproduction).
    ExternalBenefit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalityAnalysis {
    /// The shifted curve: MSC for a cost, SMB for a benefit.
    pub social_curve: LinearCurve,
    pub private_equilibrium: Option<Point2D>,
    pub social_equilibrium: Option<Point2D>,
    /// Per-unit Pigouvian tax (cost) or subsidy (benefit) at the social quantity.
    pub corrective_rate: Option<f64>,
    /// Wedge between private demand and supply across the misallocated units.
    pub deadweight_region: Option<Polygon>,
    pub deadweight_loss: f64,
}

/// Compares the private market outcome with the socially efficient one.
pub fn analyze_externality(
    demand: &LinearCurve,
    supply: &LinearCurve,
    kind: ExternalityKind,
    per_unit: f64,
) -> ExternalityAnalysis {
    let private_equilibrium = intersect(demand, supply);
    let (social_curve, social_equilibrium, private_at_social) = match kind {
        ExternalityKind::ExternalCost => {
            let msc = supply.shifted(per_unit);
            (msc, intersect(demand, &msc), *supply)
        }
        ExternalityKind::ExternalBenefit => {
            let smb = demand.shifted(per_unit);
            (smb, intersect(&smb, supply), *demand)
        }
    };

    let corrective_rate = social_equilibrium.map(|eq| {
        let gap = social_curve.eval(eq.x) - private_at_social.eval(eq.x);
        gap.max(0.0)
    });

    let (q_low, q_high) = match (kind, private_equilibrium.zip(social_equilibrium)) {
        (ExternalityKind::ExternalCost, Some((private, social))) => (social.x, private.x),
        (ExternalityKind::ExternalBenefit, Some((private, social))) => (private.x, social.x),
        (_, None) => (0.0, 0.0),
    };
    let deadweight_region = wedge(supply, demand, q_low, q_high);
    let deadweight_loss = wedge_area(supply, demand, q_low, q_high).abs();

    ExternalityAnalysis {
        social_curve,
        private_equilibrium,
        social_equilibrium,
        corrective_rate,
        deadweight_region,
        deadweight_loss,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "price", rename_all = "snake_case")]
pub enum PriceControl {
    Floor(f64),
    Ceiling(f64),
}

impl PriceControl {
    pub fn price(&self) -> f64 {
        match *self {
            PriceControl::Floor(p) | PriceControl::Ceiling(p) => p,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceControlOutcome {
    pub equilibrium: Point2D,
    pub binding: bool,
    /// Price at which trade happens.
    pub price: f64,
    /// Quantity actually traded (the short side of the market).
    pub traded: f64,
    pub quantity_demanded: f64,
    pub quantity_supplied: f64,
    /// Excess supply under a floor, excess demand under a ceiling.
    pub imbalance: f64,
    pub consumer_surplus: f64,
    pub producer_surplus: f64,
    pub deadweight_region: Option<Polygon>,
    pub deadweight_loss: f64,
}

/// Market outcome under a legal price floor or ceiling.
///
/// Returns `None` when the market has no equilibrium or either curve is
/// flat, since quantities at the controlled price are then undefined.
pub fn apply_price_control(
    demand: &LinearCurve,
    supply: &LinearCurve,
    control: PriceControl,
) -> Option<PriceControlOutcome> {
    let equilibrium = intersect(demand, supply)?;
    let binding = match control {
        PriceControl::Floor(p) => p > equilibrium.y,
        PriceControl::Ceiling(p) => p < equilibrium.y,
    };
    let price = if binding {
        control.price()
    } else {
        equilibrium.y
    };

    let quantity_demanded = demand.quantity_at(price)?.max(0.0);
    let quantity_supplied = supply.quantity_at(price)?.max(0.0);
    let traded = if binding {
        quantity_demanded.min(quantity_supplied)
    } else {
        equilibrium.x.max(0.0)
    };
    let imbalance = match (binding, control) {
        (false, _) => 0.0,
        (true, PriceControl::Floor(_)) => (quantity_supplied - quantity_demanded).max(0.0),
        (true, PriceControl::Ceiling(_)) => (quantity_demanded - quantity_supplied).max(0.0),
    };

    let price_line = LinearCurve::flat(price);
    let (consumer, producer) = if binding {
        (
            wedge_area(&price_line, demand, 0.0, traded).max(0.0),
            wedge_area(supply, &price_line, 0.0, traded).max(0.0),
        )
    } else {
        (
            consumer_surplus(demand, equilibrium.x, equilibrium.y),
            producer_surplus(supply, equilibrium.x, equilibrium.y),
        )
    };

    let (deadweight_region, deadweight_loss) = if binding {
        (
            wedge(supply, demand, traded, equilibrium.x),
            wedge_area(supply, demand, traded, equilibrium.x).max(0.0),
        )
    } else {
        (None, 0.0)
    };

    Some(PriceControlOutcome {
        equilibrium,
        binding,
        price,
        traded,
        quantity_demanded,
        quantity_supplied,
        imbalance,
        consumer_surplus: consumer,
        producer_surplus: producer,
        deadweight_region,
        deadweight_loss,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demand() -> LinearCurve {
        LinearCurve::new(30.0, -0.2)
    }

    fn supply() -> LinearCurve {
        LinearCurve::new(5.0, 0.1)
    }

    fn controlled(control: PriceControl) -> PriceControlOutcome {
        let outcome = apply_price_control(&demand(), &supply(), control);
        outcome.expect("market")
    }

    #[test]
    fn wedge_area_is_trapezoid_between_lines() {
        // Gap at q=0 is 25, at q=50 is 10: 0.5 * 35 * 50.
        let area = wedge_area(&supply(), &demand(), 0.0, 50.0);
        assert!((area - 875.0).abs() < 1e-9);
        assert_eq!(wedge_area(&supply(), &demand(), 50.0, 50.0), 0.0);
        assert!(wedge(&supply(), &demand(), 10.0, 5.0).is_none());
    }

    #[test]
    fn external_cost_overproduces_and_needs_tax() {
        let analysis =
            analyze_externality(&demand(), &supply(), ExternalityKind::ExternalCost, 9.0);
        let private = analysis.private_equilibrium.expect("private");
        let social = analysis.social_equilibrium.expect("social");
        assert!(social.x < private.x);
        // Q_soc = (30 - 14) / 0.3.
        assert!((social.x - 160.0 / 3.0).abs() < 1e-9);
        assert!((analysis.corrective_rate.expect("tax") - 9.0).abs() < 1e-9);
        // Triangle: 0.5 * base (Q_priv - Q_soc = 30) * height (gap at Q_soc = 9).
        assert!((analysis.deadweight_loss - 135.0).abs() < 1e-6);
        assert_eq!(analysis.deadweight_region.expect("region").len(), 4);
    }

    #[test]
    fn external_benefit_underproduces_and_needs_subsidy() {
        let analysis =
            analyze_externality(&demand(), &supply(), ExternalityKind::ExternalBenefit, 6.0);
        let private = analysis.private_equilibrium.expect("private");
        let social = analysis.social_equilibrium.expect("social");
        assert!(social.x > private.x);
        let subsidy = analysis.corrective_rate.expect("subsidy");
        assert!((subsidy - 6.0).abs() < 1e-9);
        assert_eq!(analysis.social_curve, LinearCurve::new(36.0, -0.2));
        // Base 20 units, height 6 at Q_soc.
        assert!((analysis.deadweight_loss - 60.0).abs() < 1e-6);
    }

    #[test]
    fn zero_externality_has_no_deadweight_loss() {
        let analysis =
            analyze_externality(&demand(), &supply(), ExternalityKind::ExternalCost, 0.0);
        assert_eq!(analysis.deadweight_loss, 0.0);
        assert!(analysis.deadweight_region.is_none());
        assert_eq!(analysis.corrective_rate, Some(0.0));
    }

    #[test]
    fn parallel_market_has_no_equilibria() {
        let analysis = analyze_externality(
            &demand(),
            &LinearCurve::new(5.0, -0.2),
            ExternalityKind::ExternalCost,
            3.0,
        );
        assert!(analysis.private_equilibrium.is_none());
        assert!(analysis.social_equilibrium.is_none());
        assert!(analysis.corrective_rate.is_none());
        assert_eq!(analysis.deadweight_loss, 0.0);
    }

    #[test]
    fn binding_floor_creates_surplus_and_deadweight_loss() {
        let outcome = controlled(PriceControl::Floor(20.0));
        assert!(outcome.binding);
        assert!((outcome.quantity_demanded - 50.0).abs() < 1e-9);
        assert!((outcome.quantity_supplied - 150.0).abs() < 1e-9);
        assert!((outcome.traded - 50.0).abs() < 1e-9);
        assert!((outcome.imbalance - 100.0).abs() < 1e-9);
        // CS: 0.5 * 10 * 50; PS: 50 * 15 - 0.5 * 0.1 * 2500.
        assert!((outcome.consumer_surplus - 250.0).abs() < 1e-9);
        assert!((outcome.producer_surplus - 625.0).abs() < 1e-9);
        // Gap at Q=50 is 10; base to Q*=83.33 is 33.33.
        assert!((outcome.deadweight_loss - 500.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn binding_ceiling_creates_shortage() {
        let outcome = controlled(PriceControl::Ceiling(10.0));
        assert!(outcome.binding);
        assert!((outcome.traded - 50.0).abs() < 1e-9);
        assert!((outcome.imbalance - 50.0).abs() < 1e-9);
        assert!((outcome.producer_surplus - 125.0).abs() < 1e-9);
        assert!((outcome.consumer_surplus - 750.0).abs() < 1e-9);
        assert!(outcome.deadweight_loss > 0.0);
    }

    #[test]
    fn welfare_is_conserved_up_to_deadweight_loss() {
        let free = controlled(PriceControl::Floor(0.0));
        assert!(!free.binding);
        let total = free.consumer_surplus + free.producer_surplus;
        for control in [PriceControl::Floor(18.0), PriceControl::Ceiling(9.0)] {
            let outcome = controlled(control);
            let sum = outcome.consumer_surplus + outcome.producer_surplus + outcome.deadweight_loss;
            assert!((sum - total).abs() < 1e-6, "{control:?}: {sum} vs {total}");
        }
    }

    #[test]
    fn non_binding_ceiling_keeps_equilibrium() {
        let outcome = controlled(PriceControl::Ceiling(25.0));
        assert!(!outcome.binding);
        assert!((outcome.price - 40.0 / 3.0).abs() < 1e-9);
        assert_eq!(outcome.deadweight_loss, 0.0);
        assert_eq!(outcome.imbalance, 0.0);
    }
}
