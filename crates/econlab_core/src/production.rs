//! Production possibilities: the bowed-out frontier and linear frontiers
//! for comparative advantage.

use crate::curve::{LinearCurve, Point2D, EPS};
use crate::error::ModelError;
use serde::{Deserialize, Serialize};

fn ensure_positive(name: &'static str, value: f64) -> Result<(), ModelError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ModelError::NonPositive { name, value })
    }
}

/// Superellipse frontier `(x/a)^k + (y/b)^k = 1`.
///
/// `k = 1` is a straight line; `k > 1` bows outward (increasing opportunity cost).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frontier {
    x_max: f64,
    y_max: f64,
    curvature: f64,
}

impl Frontier {
    pub fn new(x_max: f64, y_max: f64, curvature: f64) -> Result<Self, ModelError> {
        ensure_positive("x_max", x_max)?;
        ensure_positive("y_max", y_max)?;
        ensure_positive("curvature", curvature)?;
        Ok(Self {
            x_max,
            y_max,
            curvature,
        })
    }

    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    /// Both intercepts scaled by `1 + percent/100`, as after a technology
    /// or labor-force shift. Fails if the frontier would collapse.
    pub fn scaled(&self, percent: f64) -> Result<Self, ModelError> {
        let factor = 1.0 + percent / 100.0;
        Self::new(self.x_max * factor, self.y_max * factor, self.curvature)
    }

    /// Output of Y when producing `x` of X; `x` is clamped into `[0, x_max]`.
    pub fn y_at(&self, x: f64) -> f64 {
        let x = x.clamp(0.0, self.x_max);
        let share = (1.0 - (x / self.x_max).powf(self.curvature)).max(0.0);
        self.y_max * share.powf(1.0 / self.curvature)
    }

    /// `samples` evenly spaced points from `x = 0` to `x = x_max`.
    pub fn sample(&self, samples: usize) -> Vec<Point2D> {
        crate::grid::linspace(0.0, self.x_max, samples)
            .into_iter()
            .map(|x| Point2D::new(x, self.y_at(x)))
            .collect()
    }

    /// Units of Y given up for one more unit of X at `x`, by forward difference.
    pub fn opportunity_cost(&self, x: f64) -> f64 {
        let h = (0.001 * self.x_max).max(1e-6);
        let y1 = self.y_at(x);
        let y2 = self.y_at((x + h).min(self.x_max));
        -(y2 - y1) / h
    }
}

/// A producer with a straight-line frontier from `(0, y_max)` to `(x_max, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearProducer {
    pub x_max: f64,
    pub y_max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProducerId {
    A,
    B,
}

impl ProducerId {
    pub fn other(self) -> Self {
        match self {
            ProducerId::A => ProducerId::B,
            ProducerId::B => ProducerId::A,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparativeAdvantage {
    pub cost_of_x_a: f64,
    pub cost_of_x_b: f64,
    /// Producer with the lower opportunity cost of X.
    pub in_x: ProducerId,
    pub in_y: ProducerId,
}

impl LinearProducer {
    pub fn new(x_max: f64, y_max: f64) -> Result<Self, ModelError> {
        ensure_positive("x_max", x_max)?;
        ensure_positive("y_max", y_max)?;
        Ok(Self { x_max, y_max })
    }

    /// Units of Y per unit of X, constant along the frontier.
    pub fn cost_of_x(&self) -> f64 {
        self.y_max / self.x_max
    }

    pub fn frontier(&self) -> LinearCurve {
        LinearCurve::new(self.y_max, -self.cost_of_x())
    }
}

/// Ties go to B, matching a strict `<` on A's cost.
pub fn comparative_advantage(a: &LinearProducer, b: &LinearProducer) -> ComparativeAdvantage {
    let cost_of_x_a = a.cost_of_x();
    let cost_of_x_b = b.cost_of_x();
    let in_x = if cost_of_x_a < cost_of_x_b {
        ProducerId::A
    } else {
        ProducerId::B
    };
    ComparativeAdvantage {
        cost_of_x_a,
        cost_of_x_b,
        in_x,
        in_y: in_x.other(),
    }
}

/// Production points when each producer puts a share (0..=1) of its
/// capacity into the good it has the comparative advantage in.
pub fn production_points(
    a: &LinearProducer,
    b: &LinearProducer,
    share_a: f64,
    share_b: f64,
) -> (Point2D, Point2D) {
    let share_a = share_a.clamp(0.0, 1.0);
    let share_b = share_b.clamp(0.0, 1.0);
    match comparative_advantage(a, b).in_x {
        ProducerId::A => (
            Point2D::new(share_a * a.x_max, 0.0),
            Point2D::new(0.0, share_b * b.y_max),
        ),
        ProducerId::B => (
            Point2D::new(0.0, share_a * a.y_max),
            Point2D::new(share_b * b.x_max, 0.0),
        ),
    }
}

/// Line through `point` with slope `−px/py`; the relative price is floored at 1e-9.
pub fn trade_line(point: Point2D, px_over_py: f64) -> LinearCurve {
    let slope = -px_over_py.max(EPS);
    LinearCurve::new(point.y - slope * point.x, slope)
}
