use thiserror::Error;

/// Errors raised when user-supplied ranges or shapes cannot describe a model.
///
/// Degenerate outcomes of valid inputs (parallel curves, a line that misses
/// the viewport, an undefined steady state) are not errors; they are returned
/// as `None` by the functions that produce them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("viewport must be finite with xmin < xmax and ymin < ymax (got x: {xmin}..{xmax}, y: {ymin}..{ymax})")]
    InvalidViewport {
        xmin: f64,
        xmax: f64,
        ymin: f64,
        ymax: f64,
    },
    #[error("grid must span a finite range with end > start and at least 2 samples (got {start}..{end}, {samples} samples)")]
    InvalidGrid {
        start: f64,
        end: f64,
        samples: usize,
    },
    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f64 },
}
