//! Slider/toggle descriptions sent to the front end, and the values it sends back.

use anyhow::{anyhow, bail, Result};
use econlab_core::Point2D;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlKind {
    Slider,
    /// 0 or 1.
    Toggle,
    /// Index into `options`.
    Choice { options: Vec<&'static str> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
    pub kind: ControlKind,
}

impl ControlSpec {
    pub fn slider(
        key: &'static str,
        label: &'static str,
        min: f64,
        max: f64,
        default: f64,
        step: f64,
    ) -> Self {
        Self {
            key,
            label,
            min,
            max,
            default: default.clamp(min, max),
            step,
            kind: ControlKind::Slider,
        }
    }

    pub fn toggle(key: &'static str, label: &'static str, on: bool) -> Self {
        Self {
            key,
            label,
            min: 0.0,
            max: 1.0,
            default: if on { 1.0 } else { 0.0 },
            step: 1.0,
            kind: ControlKind::Toggle,
        }
    }

    pub fn choice(
        key: &'static str,
        label: &'static str,
        options: &[&'static str],
        default: usize,
    ) -> Self {
        let max = options.len().saturating_sub(1) as f64;
        Self {
            key,
            label,
            min: 0.0,
            max,
            default: (default as f64).min(max),
            step: 1.0,
            kind: ControlKind::Choice {
                options: options.to_vec(),
            },
        }
    }

    fn coerce(&self, value: f64) -> f64 {
        let value = value.clamp(self.min, self.max);
        match self.kind {
            ControlKind::Slider => value,
            ControlKind::Toggle | ControlKind::Choice { .. } => value.round(),
        }
    }
}

/// Raw values from the front end. Missing keys take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Controls {
    #[serde(default)]
    pub values: BTreeMap<String, f64>,
    /// Editable (Q, P) schedule rows, used by the schedule pages.
    #[serde(default)]
    pub table: Vec<[f64; 2]>,
}

impl Controls {
    pub fn with(mut self, key: &str, value: f64) -> Self {
        self.values.insert(key.to_string(), value);
        self
    }

    pub fn with_table(mut self, rows: &[[f64; 2]]) -> Self {
        self.table = rows.to_vec();
        self
    }
}

/// Control values checked against a page's specs, every key present.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedControls {
    values: BTreeMap<&'static str, f64>,
    table: Vec<Point2D>,
}

impl ResolvedControls {
    pub fn resolve(specs: &[ControlSpec], controls: &Controls) -> Result<Self> {
        for (key, value) in &controls.values {
            if !specs.iter().any(|spec| spec.key == key.as_str()) {
                bail!("Unknown control '{}'", key);
            }
            if !value.is_finite() {
                bail!("Control '{}' must be a finite number, got {}", key, value);
            }
        }

        let values = specs
            .iter()
            .map(|spec| {
                let raw = controls
                    .values
                    .get(spec.key)
                    .copied()
                    .unwrap_or(spec.default);
                (spec.key, spec.coerce(raw))
            })
            .collect();
        let table = controls
            .table
            .iter()
            .map(|&row| Point2D::from(row))
            .collect();
        Ok(Self { values, table })
    }

    pub fn get(&self, key: &str) -> Result<f64> {
        self.values
            .get(key)
            .copied()
            .ok_or_else(|| anyhow!("Control '{}' is not defined on this page", key))
    }

    pub fn flag(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)? >= 0.5)
    }

    pub fn index(&self, key: &str) -> Result<usize> {
        Ok(self.get(key)?.max(0.0) as usize)
    }

    /// Non-negative whole number, for horizons and shock periods.
    pub fn count(&self, key: &str) -> Result<usize> {
        self.index(key)
    }

    pub fn table(&self) -> &[Point2D] {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs() -> Vec<ControlSpec> {
        vec![
            ControlSpec::slider("price", "Price", 0.0, 50.0, 20.0, 0.5),
            ControlSpec::toggle("show", "Show surplus", true),
            ControlSpec::choice("curve", "Curve", &["demand", "supply"], 1),
        ]
    }

    #[test]
    fn missing_values_take_defaults() {
        let resolved = ResolvedControls::resolve(&specs(), &Controls::default()).expect("resolve");
        assert_eq!(resolved.get("price").expect("price"), 20.0);
        assert!(resolved.flag("show").expect("show"));
        assert_eq!(resolved.index("curve").expect("curve"), 1);
    }

    #[test]
    fn values_are_clamped_and_rounded() {
        let controls = Controls::default()
            .with("price", 80.0)
            .with("curve", 0.4)
            .with("show", 0.0);
        let resolved = ResolvedControls::resolve(&specs(), &controls).expect("resolve");
        assert_eq!(resolved.get("price").expect("price"), 50.0);
        assert_eq!(resolved.index("curve").expect("curve"), 0);
        assert!(!resolved.flag("show").expect("show"));
    }

    #[test]
    fn unknown_and_non_finite_values_are_rejected() {
        let unknown = Controls::default().with("prise", 1.0);
        let err = ResolvedControls::resolve(&specs(), &unknown).unwrap_err();
        assert!(err.to_string().contains("Unknown control 'prise'"));

        let nan = Controls::default().with("price", f64::NAN);
        assert!(ResolvedControls::resolve(&specs(), &nan).is_err());
    }

    #[test]
    fn undefined_key_lookup_fails() {
        let resolved = ResolvedControls::resolve(&specs(), &Controls::default()).expect("resolve");
        assert!(resolved.get("quantity").is_err());
    }

    #[test]
    fn slider_default_is_kept_in_range() {
        let spec = ControlSpec::slider("a", "A", 0.0, 10.0, 42.0, 1.0);
        assert_eq!(spec.default, 10.0);
        let choice = ControlSpec::choice("c", "C", &["x"], 3);
        assert_eq!(choice.default, 0.0);
    }
}
