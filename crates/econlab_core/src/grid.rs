use crate::error::ModelError;
use serde::{Deserialize, Serialize};

/// Sampling grid for the curve-crossing searches (IS-LM over `r`, AD-AS over `P`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSettings {
    pub start: f64,
    pub end: f64,
    pub samples: usize,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 20.0,
            samples: 400,
        }
    }
}

impl GridSettings {
    pub const fn new(start: f64, end: f64, samples: usize) -> Self {
        Self {
            start,
            end,
            samples,
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if !self.start.is_finite()
            || !self.end.is_finite()
            || self.end <= self.start
            || self.samples < 2
        {
            return Err(ModelError::InvalidGrid {
                start: self.start,
                end: self.end,
                samples: self.samples,
            });
        }
        Ok(())
    }

    pub fn points(&self) -> Result<Vec<f64>, ModelError> {
        self.validate()?;
        Ok(linspace(self.start, self.end, self.samples))
    }
}

/// `samples` evenly spaced values over `[start, end]`, both ends included.
/// The last value is exactly `end`.
pub fn linspace(start: f64, end: f64, samples: usize) -> Vec<f64> {
    match samples {
        0 => Vec::new(),
        1 => vec![start],
        n => {
            let step = (end - start) / (n - 1) as f64;
            let mut values: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            values[n - 1] = end;
            values
        }
    }
}

/// Index where `|a[i] − b[i]|` is smallest; the first such index wins ties.
/// Non-finite differences are skipped.
pub fn argmin_abs_diff(a: &[f64], b: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, (x, y)) in a.iter().zip(b).enumerate() {
        let gap = (x - y).abs();
        if !gap.is_finite() {
            continue;
        }
        match best {
            Some((_, smallest)) if gap >= smallest => {}
            _ => best = Some((i, gap)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_matches_endpoints() {
        let values = linspace(0.0, 20.0, 400);
        assert_eq!(values.len(), 400);
        assert_eq!(values[0], 0.0);
        assert_eq!(values[399], 20.0);
        assert!((values[1] - 20.0 / 399.0).abs() < 1e-12);
        assert_eq!(linspace(3.0, 4.0, 1), vec![3.0]);
        assert!(linspace(3.0, 4.0, 0).is_empty());
    }

    #[test]
    fn argmin_prefers_first_minimum() {
        let a = [5.0, 3.0, 1.0, 1.0, 4.0];
        let b = [0.0, 0.0, 0.0, 0.0, 0.0];
        assert_eq!(argmin_abs_diff(&a, &b), Some(2));
        assert_eq!(argmin_abs_diff(&[f64::NAN, 2.0], &[0.0, 1.0]), Some(1));
        assert_eq!(argmin_abs_diff(&[], &[]), None);
    }

    #[test]
    fn invalid_grids_are_rejected() {
        assert!(GridSettings::default().validate().is_ok());
        assert!(matches!(
            GridSettings::new(5.0, 5.0, 10).validate(),
            Err(ModelError::InvalidGrid { samples: 10, .. })
        ));
        assert!(GridSettings::new(0.0, 1.0, 1).points().is_err());
        assert!(GridSettings::new(f64::NAN, 1.0, 10).points().is_err());
    }
}
