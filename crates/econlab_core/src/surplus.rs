//! Consumer and producer surplus triangles at an equilibrium.

use crate::curve::{LinearCurve, Point2D};

/// Closed polygon, vertices in drawing order.
pub type Polygon = Vec<Point2D>;

fn consumer_surplus_defined(demand: &LinearCurve, q_star: f64, p_star: f64) -> bool {
    q_star > 0.0 && demand.intercept > p_star
}

fn producer_surplus_defined(supply: &LinearCurve, q_star: f64, p_star: f64) -> bool {
    q_star > 0.0 && p_star > supply.intercept
}

/// Area between the demand curve and the price line `P = p_star` over
/// `[0, q_star]`. Zero when `q_star <= 0` or the demand intercept is not
/// above the price.
pub fn consumer_surplus(demand: &LinearCurve, q_star: f64, p_star: f64) -> f64 {
    if !consumer_surplus_defined(demand, q_star, p_star) {
        return 0.0;
    }
    0.5 * (demand.intercept - p_star).abs() * q_star
}

/// Area between the price line `P = p_star` and the supply curve over
/// `[0, q_star]`. Zero when `q_star <= 0` or the price is not above the
/// supply intercept.
pub fn producer_surplus(supply: &LinearCurve, q_star: f64, p_star: f64) -> f64 {
    if !producer_surplus_defined(supply, q_star, p_star) {
        return 0.0;
    }
    0.5 * (p_star - supply.intercept).abs() * q_star
}

/// Shaded consumer-surplus region, if the area is defined.
pub fn consumer_surplus_region(demand: &LinearCurve, q_star: f64, p_star: f64) -> Option<Polygon> {
    if !consumer_surplus_defined(demand, q_star, p_star) {
        return None;
    }
    Some(vec![
        Point2D::new(0.0, p_star),
        Point2D::new(q_star, p_star),
        Point2D::new(q_star, demand.eval(q_star)),
        Point2D::new(0.0, demand.intercept),
    ])
}

/// Shaded producer-surplus region, if the area is defined.
pub fn producer_surplus_region(supply: &LinearCurve, q_star: f64, p_star: f64) -> Option<Polygon> {
    if !producer_surplus_defined(supply, q_star, p_star) {
        return None;
    }
    Some(vec![
        Point2D::new(0.0, supply.intercept),
        Point2D::new(q_star, supply.eval(q_star)),
        Point2D::new(q_star, p_star),
        Point2D::new(0.0, p_star),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::intersect;

    #[test]
    fn textbook_market_surpluses() {
        let demand = LinearCurve::new(30.0, -0.2);
        let supply = LinearCurve::new(5.0, 0.1);
        let eq = intersect(&demand, &supply).expect("equilibrium");
        assert!((eq.x - 83.333_333).abs() < 1e-4);
        assert!((eq.y - 13.333_333).abs() < 1e-4);

        let cs = consumer_surplus(&demand, eq.x, eq.y);
        let ps = producer_surplus(&supply, eq.x, eq.y);
        assert!((cs - 694.444).abs() < 1e-2, "cs = {cs}");
        assert!((ps - 347.222).abs() < 1e-2, "ps = {ps}");
    }

    #[test]
    fn degenerate_geometry_has_zero_surplus() {
        let demand = LinearCurve::new(10.0, -1.0);
        assert_eq!(consumer_surplus(&demand, 0.0, 5.0), 0.0);
        assert_eq!(consumer_surplus(&demand, -3.0, 5.0), 0.0);
        assert_eq!(consumer_surplus(&demand, 4.0, 12.0), 0.0);

        let supply = LinearCurve::new(8.0, 1.0);
        assert_eq!(producer_surplus(&supply, 4.0, 6.0), 0.0);
        assert_eq!(producer_surplus(&supply, 0.0, 12.0), 0.0);
    }

    #[test]
    fn regions_trace_the_triangles() {
        let demand = LinearCurve::new(30.0, -0.2);
        let supply = LinearCurve::new(5.0, 0.1);
        let (q, p) = (250.0 / 3.0, 40.0 / 3.0);

        let cs = consumer_surplus_region(&demand, q, p).expect("cs region");
        assert_eq!(cs.len(), 4);
        assert_eq!(cs[0], Point2D::new(0.0, p));
        assert!((cs[2].y - p).abs() < 1e-9);
        assert_eq!(cs[3], Point2D::new(0.0, 30.0));

        let ps = producer_surplus_region(&supply, q, p).expect("ps region");
        assert_eq!(ps[0], Point2D::new(0.0, 5.0));
        assert!((ps[1].y - p).abs() < 1e-9);

        assert!(consumer_surplus_region(&demand, q, 40.0).is_none());
        assert!(producer_surplus_region(&supply, q, 1.0).is_none());
    }
}
