//! Scalar values and the numeric modifiers steps use for cost and weight.

use serde::Serialize;
use std::fmt;

/// Format a number without trailing zeros (`10`, `0.8`, `12.25`)
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        return format!("{:.0}", value);
    }
    let text = format!("{:.3}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Format a number with an explicit sign (`+4`, `-1.5`)
pub fn format_signed(value: f64) -> String {
    if value < 0.0 {
        format_number(value)
    } else {
        format!("+{}", format_number(value))
    }
}

/// A number together with where it came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScalarValue {
    value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl ScalarValue {
    pub fn new(value: f64) -> Self {
        Self { value, name: None }
    }

    /// Attach a provenance name ("Handgun Receiver", "Total Cost")
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Copy of this value with a new number, keeping the provenance
    pub fn with_value(&self, value: f64) -> Self {
        Self {
            value,
            name: self.name.clone(),
        }
    }

    /// Sum a set of values under a new name
    pub fn sum<'a>(values: impl IntoIterator<Item = &'a ScalarValue>, name: &str) -> Self {
        let total = values.into_iter().map(|v| v.value).sum();
        Self::new(total).named(name)
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_number(self.value))
    }
}

/// Cost or weight contribution of a step
///
/// Percentages resolve against the owning sequence's base value (the sum of
/// constant modifiers recorded in the domain's cost-base phase).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum NumericModifier {
    Constant(f64),
    Percentage(f64),
}

impl NumericModifier {
    pub fn resolve(&self, base: f64) -> f64 {
        match self {
            NumericModifier::Constant(value) => *value,
            NumericModifier::Percentage(percent) => base * percent / 100.0,
        }
    }

    pub fn constant_value(&self) -> Option<f64> {
        match self {
            NumericModifier::Constant(value) => Some(*value),
            NumericModifier::Percentage(_) => None,
        }
    }
}

impl fmt::Display for NumericModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericModifier::Constant(value) => write!(f, "{}", format_number(*value)),
            NumericModifier::Percentage(percent) => write!(f, "{}%", format_signed(*percent)),
        }
    }
}
