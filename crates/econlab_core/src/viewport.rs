//! Clipping infinite curves to the rectangle currently on screen.

use crate::curve::{LinearCurve, Point2D, EPS};
use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{event, Level};

/// Axis-aligned display box `[xmin, xmax] × [ymin, ymax]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    xmin: f64,
    xmax: f64,
    ymin: f64,
    ymax: f64,
}

impl Viewport {
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Result<Self, ModelError> {
        let finite = [xmin, xmax, ymin, ymax].iter().all(|v| v.is_finite());
        if !finite || xmin >= xmax || ymin >= ymax {
            return Err(ModelError::InvalidViewport {
                xmin,
                xmax,
                ymin,
                ymax,
            });
        }
        Ok(Self {
            xmin,
            xmax,
            ymin,
            ymax,
        })
    }

    /// Box anchored at the origin, the usual non-negative teaching quadrant.
    pub fn quadrant(xmax: f64, ymax: f64) -> Result<Self, ModelError> {
        Self::new(0.0, xmax, 0.0, ymax)
    }

    pub fn xmin(&self) -> f64 {
        self.xmin
    }

    pub fn xmax(&self) -> f64 {
        self.xmax
    }

    pub fn ymin(&self) -> f64 {
        self.ymin
    }

    pub fn ymax(&self) -> f64 {
        self.ymax
    }

    /// Raises `ymax` so every finite value in `ys` is visible.
    pub fn expanded_to_include_y(&self, ys: impl IntoIterator<Item = f64>) -> Self {
        let ymax = ys
            .into_iter()
            .filter(|y| y.is_finite())
            .fold(self.ymax, f64::max);
        Self { ymax, ..*self }
    }

    pub fn contains(&self, point: Point2D) -> bool {
        point.x >= self.xmin - EPS
            && point.x <= self.xmax + EPS
            && point.y >= self.ymin - EPS
            && point.y <= self.ymax + EPS
    }
}

/// The visible part of a line, ordered left to right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point2D,
    pub end: Point2D,
}

impl Segment {
    pub fn points(&self) -> [Point2D; 2] {
        [self.start, self.end]
    }
}

fn round9(value: f64) -> f64 {
    (value * 1e9).round() / 1e9
}

/// Clips the infinite line `y = slope·x + intercept` to `viewport`.
///
/// Returns `None` when the line does not cross the box in two distinct
/// points. The endpoints are the lexicographic extremes of the border hits,
/// so corner crossings and repeated calls give the same segment.
pub fn clip_to_box(curve: &LinearCurve, viewport: &Viewport) -> Option<Segment> {
    let mut candidates: Vec<Point2D> = Vec::with_capacity(4);

    for x in [viewport.xmin, viewport.xmax] {
        let y = curve.eval(x);
        if viewport.ymin - EPS <= y && y <= viewport.ymax + EPS {
            candidates.push(Point2D::new(x, y));
        }
    }

    // Flat lines never reach the horizontal edges at a single point.
    if curve.slope.abs() > EPS {
        for y in [viewport.ymin, viewport.ymax] {
            let x = (y - curve.intercept) / curve.slope;
            if viewport.xmin - EPS <= x && x <= viewport.xmax + EPS {
                candidates.push(Point2D::new(x, y));
            }
        }
    }

    let mut unique: Vec<Point2D> = Vec::with_capacity(candidates.len());
    for point in candidates {
        let key = (round9(point.x), round9(point.y));
        if !unique
            .iter()
            .any(|seen| (round9(seen.x), round9(seen.y)) == key)
        {
            unique.push(point);
        }
    }

    if unique.len() < 2 {
        event!(
            Level::DEBUG,
            intercept = curve.intercept,
            slope = curve.slope,
            "line does not cross the viewport"
        );
        return None;
    }

    unique.sort_by(|a, b| match a.x.total_cmp(&b.x) {
        Ordering::Equal => a.y.total_cmp(&b.y),
        other => other,
    });
    Some(Segment {
        start: unique[0],
        end: unique[unique.len() - 1],
    })
}
