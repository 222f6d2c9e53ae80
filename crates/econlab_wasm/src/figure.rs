//! Chart geometry returned to the renderer. Coordinates only, no styling.

use anyhow::Result;
use econlab_core::{clip_to_box, LinearCurve, Point2D, Viewport};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub name: String,
    pub points: Vec<[f64; 2]>,
    pub dashed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    pub name: String,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub label: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub viewport: Viewport,
    pub lines: Vec<Line>,
    pub regions: Vec<Region>,
    pub markers: Vec<Marker>,
}

impl Figure {
    pub fn new(title: &str, x_title: &str, y_title: &str, viewport: Viewport) -> Self {
        Self {
            title: title.to_string(),
            x_title: x_title.to_string(),
            y_title: y_title.to_string(),
            viewport,
            lines: Vec::new(),
            regions: Vec::new(),
            markers: Vec::new(),
        }
    }

    /// Adds the visible part of `curve`. Returns false if nothing is visible.
    pub fn curve(&mut self, name: &str, curve: &LinearCurve, dashed: bool) -> bool {
        match clip_to_box(curve, &self.viewport) {
            Some(segment) => {
                self.lines.push(Line {
                    name: name.to_string(),
                    points: segment.points().iter().map(|&p| p.into()).collect(),
                    dashed,
                });
                true
            }
            None => false,
        }
    }

    pub fn polyline(
        &mut self,
        name: &str,
        points: impl IntoIterator<Item = Point2D>,
        dashed: bool,
    ) {
        self.lines.push(Line {
            name: name.to_string(),
            points: points.into_iter().map(<[f64; 2]>::from).collect(),
            dashed,
        });
    }

    /// Time series plotted against its period index.
    pub fn series(&mut self, name: &str, values: &[f64], dashed: bool) {
        let points = values
            .iter()
            .enumerate()
            .map(|(t, &v)| Point2D::new(t as f64, v));
        self.polyline(name, points, dashed);
    }

    pub fn vertical(&mut self, name: &str, x: f64, dashed: bool) {
        let (ymin, ymax) = (self.viewport.ymin(), self.viewport.ymax());
        self.polyline(name, [Point2D::new(x, ymin), Point2D::new(x, ymax)], dashed);
    }

    pub fn region(&mut self, name: &str, polygon: Option<Vec<Point2D>>) {
        if let Some(polygon) = polygon {
            self.regions.push(Region {
                name: name.to_string(),
                points: polygon.into_iter().map(<[f64; 2]>::from).collect(),
            });
        }
    }

    pub fn marker(&mut self, label: &str, point: Point2D) {
        self.markers.push(Marker {
            label: label.to_string(),
            x: point.x,
            y: point.y,
        });
    }

    /// Marker plus dashed guides dropped to both axes. Points off the box get
    /// the marker only.
    pub fn point_with_guides(&mut self, label: &str, point: Point2D) {
        if self.viewport.contains(point) {
            let (x0, y0) = (self.viewport.xmin(), self.viewport.ymin());
            self.polyline(
                &format!("{label} guide"),
                [Point2D::new(x0, point.y), point, Point2D::new(point.x, y0)],
                true,
            );
        }
        self.marker(label, point);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: String,
    /// `None` when the quantity is undefined for these inputs.
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Everything one page render produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageView {
    pub panels: Vec<Figure>,
    pub metrics: Vec<Metric>,
    pub notes: Vec<String>,
}

impl PageView {
    pub fn panel(mut self, figure: Figure) -> Self {
        self.panels.push(figure);
        self
    }

    pub fn metric(&mut self, label: &str, value: Option<f64>) {
        self.metrics.push(Metric {
            label: label.to_string(),
            value,
            detail: None,
        });
    }

    pub fn metric_with(&mut self, label: &str, value: Option<f64>, detail: impl Into<String>) {
        self.metrics.push(Metric {
            label: label.to_string(),
            value,
            detail: Some(detail.into()),
        });
    }

    pub fn note(&mut self, text: impl Into<String>) {
        self.notes.push(text.into());
    }

    pub fn find_metric(&self, label: &str) -> Option<&Metric> {
        self.metrics.iter().find(|m| m.label == label)
    }
}

/// Box spanning periods `0..len` and every finite value, padded by 10%.
pub fn series_viewport<'a>(
    len: usize,
    series: impl IntoIterator<Item = &'a [f64]>,
) -> Result<Viewport> {
    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for values in series {
        for &v in values.iter().filter(|v| v.is_finite()) {
            lo = lo.min(v);
            hi = hi.max(v);
        }
    }
    if !lo.is_finite() {
        (lo, hi) = (-1.0, 1.0);
    }
    let pad = ((hi - lo) * 0.1).max(0.1);
    let xmax = (len.saturating_sub(1) as f64).max(1.0);
    Ok(Viewport::new(0.0, xmax, lo - pad, hi + pad)?)
}
