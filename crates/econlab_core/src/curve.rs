//! Linear market curves `P = a + b·Q` and the algebra shared by every
//! supply/demand page: evaluation, shifts, intersection and schedule fitting.

use serde::{Deserialize, Serialize};
use tracing::{event, Level};

/// Tolerance below which slopes, slope differences and denominators are
/// treated as zero.
pub const EPS: f64 = 1e-9;

/// Replaces a near-zero denominator with `±EPS`, keeping its sign.
pub(crate) fn floor_abs(value: f64) -> f64 {
    if value.abs() < EPS {
        EPS.copysign(value)
    } else {
        value
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<Point2D> for [f64; 2] {
    fn from(value: Point2D) -> Self {
        [value.x, value.y]
    }
}

impl From<[f64; 2]> for Point2D {
    fn from(value: [f64; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

/// A straight line `P = intercept + slope·Q`.
///
/// The sign of the slope carries no meaning here; callers read `slope < 0`
/// as demand-like and `slope > 0` as supply-like.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearCurve {
    pub intercept: f64,
    pub slope: f64,
}

impl LinearCurve {
    pub const fn new(intercept: f64, slope: f64) -> Self {
        Self { intercept, slope }
    }

    /// A horizontal price line `P = price`.
    pub const fn flat(price: f64) -> Self {
        Self::new(price, 0.0)
    }

    /// Price at quantity `q`.
    pub fn eval(&self, q: f64) -> f64 {
        self.intercept + self.slope * q
    }

    /// Quantity at which the curve reaches `price`, if the curve is not flat.
    pub fn quantity_at(&self, price: f64) -> Option<f64> {
        if self.slope.abs() < EPS {
            return None;
        }
        Some((price - self.intercept) / self.slope)
    }

    /// Parallel vertical shift by `delta`.
    pub fn shifted(&self, delta: f64) -> Self {
        Self::new(self.intercept + delta, self.slope)
    }

    /// Slope change by `delta`, keeping the vertical intercept.
    pub fn pivoted(&self, delta: f64) -> Self {
        Self::new(self.intercept, self.slope + delta)
    }

    /// Point price elasticity `(dQ/dP)·(P/Q)` at quantity `q`.
    pub fn point_elasticity(&self, q: f64) -> Option<f64> {
        if self.slope.abs() < EPS || q.abs() < EPS {
            return None;
        }
        Some(self.eval(q) / (self.slope * q))
    }

    /// Midpoint (arc) elasticity between quantities `q0` and `q1`.
    pub fn arc_elasticity(&self, q0: f64, q1: f64) -> Option<f64> {
        let (p0, p1) = (self.eval(q0), self.eval(q1));
        let q_mid = 0.5 * (q0 + q1);
        let p_mid = 0.5 * (p0 + p1);
        if q_mid.abs() < EPS || p_mid.abs() < EPS || (p1 - p0).abs() < EPS {
            return None;
        }
        Some(((q1 - q0) / q_mid) / ((p1 - p0) / p_mid))
    }

    /// Total revenue `P(q)·q`.
    pub fn revenue_at(&self, q: f64) -> f64 {
        self.eval(q) * q
    }

    /// Quantity maximizing total revenue on a downward-sloping curve.
    pub fn revenue_maximizing_quantity(&self) -> Option<f64> {
        if self.slope > -EPS {
            return None;
        }
        Some(-self.intercept / (2.0 * self.slope))
    }

    /// Least-squares fit of `P = a + b·Q` through a schedule of (Q, P) rows.
    ///
    /// Rows with a non-finite entry are skipped. Returns `None` when fewer
    /// than two usable rows remain.
    pub fn fit_schedule(rows: &[Point2D]) -> Option<Self> {
        let usable: Vec<Point2D> = rows
            .iter()
            .copied()
            .filter(|p| p.x.is_finite() && p.y.is_finite())
            .collect();
        if usable.len() < 2 {
            event!(
                Level::DEBUG,
                rows = usable.len(),
                "schedule has fewer than two usable rows"
            );
            return None;
        }

        let n = usable.len() as f64;
        let q_mean = usable.iter().map(|p| p.x).sum::<f64>() / n;
        let p_mean = usable.iter().map(|p| p.y).sum::<f64>() / n;
        let covariance: f64 = usable
            .iter()
            .map(|p| (p.x - q_mean) * (p.y - p_mean))
            .sum();
        let variance: f64 = usable.iter().map(|p| (p.x - q_mean).powi(2)).sum();

        let slope = covariance / variance.max(EPS);
        Some(Self::new(p_mean - slope * q_mean, slope))
    }
}

/// Finds the (Q*, P*) crossing of two curves.
///
/// Parallel and coincident curves (|b2 − b1| < 1e-9) have no unique
/// crossing and yield `None`. No clamping to the non-negative quadrant.
pub fn intersect(first: &LinearCurve, second: &LinearCurve) -> Option<Point2D> {
    let den = second.slope - first.slope;
    if den.abs() < EPS {
        event!(
            Level::DEBUG,
            slope = first.slope,
            "curves are parallel; no intersection"
        );
        return None;
    }
    let q_star = (first.intercept - second.intercept) / den;
    Some(Point2D::new(q_star, first.eval(q_star)))
}

/// Direction of change between two readouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Unchanged,
    /// One of the two values does not exist.
    Ambiguous,
}

impl Direction {
    pub fn between(before: Option<f64>, after: Option<f64>) -> Self {
        match (before, after) {
            (Some(b), Some(a)) if a > b => Direction::Up,
            (Some(b), Some(a)) if a < b => Direction::Down,
            (Some(_), Some(_)) => Direction::Unchanged,
            _ => Direction::Ambiguous,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Direction::Up => "↑",
            Direction::Down => "↓",
            Direction::Unchanged => "no change",
            Direction::Ambiguous => "ambiguous",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{floor_abs, intersect, Direction, LinearCurve, Point2D, EPS};

    fn demand() -> LinearCurve {
        LinearCurve::new(30.0, -0.2)
    }

    fn supply() -> LinearCurve {
        LinearCurve::new(5.0, 0.1)
    }

    #[test]
    fn intersection_lies_on_both_curves() {
        let pairs = [
            (demand(), supply()),
            (LinearCurve::new(-3.0, 2.5), LinearCurve::new(7.0, -0.75)),
            (LinearCurve::new(100.0, -1.0), LinearCurve::new(0.0, 1e-3)),
            (LinearCurve::new(1.0, 0.0), LinearCurve::new(4.0, 3.0)),
        ];
        for (d, s) in pairs {
            let point = intersect(&d, &s).expect("non-parallel curves intersect");
            assert!((d.eval(point.x) - point.y).abs() < 1e-6);
            assert!((s.eval(point.x) - point.y).abs() < 1e-6);
        }
    }

    #[test]
    fn intersection_matches_textbook_equilibrium() {
        let point = intersect(&demand(), &supply()).expect("equilibrium");
        assert!((point.x - 250.0 / 3.0).abs() < 1e-9);
        assert!((point.y - 40.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn intersection_is_symmetric() {
        let a = intersect(&demand(), &supply()).expect("equilibrium");
        let b = intersect(&supply(), &demand()).expect("equilibrium");
        assert!((a.x - b.x).abs() < 1e-9);
        assert!((a.y - b.y).abs() < 1e-9);
    }

    #[test]
    fn parallel_and_identical_curves_have_no_intersection() {
        assert!(intersect(&demand(), &demand().shifted(4.0)).is_none());
        assert!(intersect(&supply(), &supply()).is_none());
        let nearly_parallel = LinearCurve::new(5.0, 0.1 + EPS / 2.0);
        assert!(intersect(&supply(), &nearly_parallel).is_none());
    }

    #[test]
    fn quantity_at_inverts_eval() {
        let q = demand().quantity_at(10.0).expect("sloped curve");
        assert!((demand().eval(q) - 10.0).abs() < 1e-12);
        assert!(LinearCurve::flat(3.0).quantity_at(3.0).is_none());
    }

    #[test]
    fn shift_and_pivot_change_one_coefficient() {
        let shifted = demand().shifted(5.0);
        assert_eq!(shifted, LinearCurve::new(35.0, -0.2));
        let pivoted = demand().pivoted(0.05);
        assert!((pivoted.slope + 0.15).abs() < 1e-12);
        assert_eq!(pivoted.intercept, 30.0);
    }

    #[test]
    fn fit_schedule_recovers_exact_line() {
        let rows = [
            Point2D::new(10.0, 28.0),
            Point2D::new(50.0, 20.0),
            Point2D::new(90.0, 12.0),
        ];
        let fit = LinearCurve::fit_schedule(&rows).expect("fit");
        assert!((fit.intercept - 30.0).abs() < 1e-9);
        assert!((fit.slope + 0.2).abs() < 1e-12);
    }

    #[test]
    fn fit_schedule_matches_least_squares() {
        let rows = [
            Point2D::new(10.0, 8.0),
            Point2D::new(30.0, 15.0),
            Point2D::new(50.0, 24.0),
        ];
        let fit = LinearCurve::fit_schedule(&rows).expect("fit");
        assert!((fit.slope - 0.4).abs() < 1e-12);
        assert!((fit.intercept - (47.0 / 3.0 - 12.0)).abs() < 1e-9);
    }

    #[test]
    fn fit_schedule_skips_blank_rows_and_needs_two() {
        let rows = [Point2D::new(10.0, 8.0), Point2D::new(f64::NAN, 3.0)];
        assert!(LinearCurve::fit_schedule(&rows).is_none());
        assert!(LinearCurve::fit_schedule(&[]).is_none());
    }

    #[test]
    fn fit_schedule_with_repeated_quantity_stays_finite() {
        let rows = [Point2D::new(5.0, 8.0), Point2D::new(5.0, 12.0)];
        let fit = LinearCurve::fit_schedule(&rows).expect("fit");
        assert_eq!(fit.slope, 0.0);
        assert!((fit.intercept - 10.0).abs() < 1e-12);
    }

    #[test]
    fn point_elasticity_on_linear_demand() {
        // At Q = 75 on P = 30 - 0.2Q, P = 15 and dQ/dP = -5: e = -5 * 15 / 75 = -1.
        let e = demand().point_elasticity(75.0).expect("elasticity");
        assert!((e + 1.0).abs() < 1e-12);
        assert!(demand().point_elasticity(0.0).is_none());
        assert!(LinearCurve::flat(5.0).point_elasticity(10.0).is_none());
    }

    #[test]
    fn arc_elasticity_uses_midpoints() {
        let e = demand().arc_elasticity(50.0, 100.0).expect("elasticity");
        // P goes 20 -> 10: (50/75) / (-10/15) = -1.
        assert!((e + 1.0).abs() < 1e-12);
    }

    #[test]
    fn revenue_peaks_at_unit_elastic_point() {
        let q = demand()
            .revenue_maximizing_quantity()
            .expect("downward sloping");
        assert!((q - 75.0).abs() < 1e-12);
        assert!(demand().revenue_at(q) >= demand().revenue_at(q + 1.0));
        assert!(demand().revenue_at(q) >= demand().revenue_at(q - 1.0));
        assert!(supply().revenue_maximizing_quantity().is_none());
    }

    #[test]
    fn direction_readouts() {
        assert_eq!(Direction::between(Some(1.0), Some(2.0)), Direction::Up);
        assert_eq!(Direction::between(Some(2.0), Some(1.0)), Direction::Down);
        assert_eq!(
            Direction::between(Some(2.0), Some(2.0)),
            Direction::Unchanged
        );
        assert_eq!(Direction::between(None, Some(2.0)), Direction::Ambiguous);
    }

    #[test]
    fn floor_abs_keeps_sign() {
        assert_eq!(floor_abs(0.0), EPS);
        assert_eq!(floor_abs(-1e-12), -EPS);
        assert_eq!(floor_abs(0.5), 0.5);
    }
}
