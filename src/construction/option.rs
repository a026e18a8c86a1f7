//! User-editable component options.
//!
//! Options are the only mutable state a component carries. Their enabled
//! flag, range and choice list may be refreshed from the construction state,
//! but a refresh never discards a value that is still valid.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::error::{ForgeError, Result};

/// Serialisable option value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Choice(Option<String>),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(value) => write!(f, "{}", if *value { "yes" } else { "no" }),
            OptionValue::Int(value) => write!(f, "{}", value),
            OptionValue::Float(value) => write!(f, "{}", value),
            OptionValue::Choice(Some(value)) => write!(f, "{}", value),
            OptionValue::Choice(None) => write!(f, "none"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OptionKind {
    Boolean {
        value: bool,
    },
    Integer {
        value: i64,
        min: i64,
        max: i64,
    },
    Float {
        value: f64,
        min: f64,
        max: f64,
    },
    Choice {
        value: Option<String>,
        choices: Vec<String>,
        optional: bool,
    },
}

/// Descriptor for one option of a component
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentOption {
    id: &'static str,
    name: &'static str,
    description: String,
    enabled: bool,
    kind: OptionKind,
}

impl ComponentOption {
    fn with_kind(id: &'static str, name: &'static str, kind: OptionKind) -> Self {
        Self {
            id,
            name,
            description: String::new(),
            enabled: true,
            kind,
        }
    }

    pub fn boolean(id: &'static str, name: &'static str, value: bool) -> Self {
        Self::with_kind(id, name, OptionKind::Boolean { value })
    }

    pub fn integer(id: &'static str, name: &'static str, value: i64, min: i64, max: i64) -> Self {
        debug_assert!(min <= max);
        Self::with_kind(
            id,
            name,
            OptionKind::Integer {
                value: value.clamp(min, max),
                min,
                max,
            },
        )
    }

    pub fn float(id: &'static str, name: &'static str, value: f64, min: f64, max: f64) -> Self {
        debug_assert!(min <= max);
        Self::with_kind(
            id,
            name,
            OptionKind::Float {
                value: value.clamp(min, max),
                min,
                max,
            },
        )
    }

    /// A choice option. Non-optional choices start on `value` or the first choice.
    pub fn choice(
        id: &'static str,
        name: &'static str,
        value: Option<&str>,
        choices: Vec<String>,
        optional: bool,
    ) -> Self {
        let value = match value {
            Some(v) if choices.iter().any(|c| c == v) => Some(v.to_string()),
            _ if optional => None,
            _ => choices.first().cloned(),
        };
        Self::with_kind(
            id,
            name,
            OptionKind::Choice {
                value,
                choices,
                optional,
            },
        )
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn kind(&self) -> &OptionKind {
        &self.kind
    }

    pub fn value(&self) -> OptionValue {
        match &self.kind {
            OptionKind::Boolean { value } => OptionValue::Bool(*value),
            OptionKind::Integer { value, .. } => OptionValue::Int(*value),
            OptionKind::Float { value, .. } => OptionValue::Float(*value),
            OptionKind::Choice { value, .. } => OptionValue::Choice(value.clone()),
        }
    }

    pub fn bool_value(&self) -> bool {
        matches!(self.kind, OptionKind::Boolean { value: true })
    }

    pub fn int_value(&self) -> i64 {
        match self.kind {
            OptionKind::Integer { value, .. } => value,
            _ => 0,
        }
    }

    pub fn float_value(&self) -> f64 {
        match self.kind {
            OptionKind::Float { value, .. } => value,
            OptionKind::Integer { value, .. } => value as f64,
            _ => 0.0,
        }
    }

    pub fn choice_value(&self) -> Option<&str> {
        match &self.kind {
            OptionKind::Choice { value, .. } => value.as_deref(),
            _ => None,
        }
    }

    /// Set a new value, validating type, range and choice membership
    pub fn set_value(&mut self, new_value: OptionValue) -> Result<()> {
        let invalid = |reason: String| ForgeError::InvalidOptionValue {
            option: self.id.to_string(),
            reason,
        };

        match (&mut self.kind, new_value) {
            (OptionKind::Boolean { value }, OptionValue::Bool(v)) => *value = v,
            (OptionKind::Integer { value, min, max }, OptionValue::Int(v)) => {
                if v < *min || v > *max {
                    return Err(invalid(format!("{} is outside {}..={}", v, min, max)));
                }
                *value = v;
            }
            (OptionKind::Float { value, min, max }, OptionValue::Float(v)) => {
                if !(v >= *min && v <= *max) {
                    return Err(invalid(format!("{} is outside {}..={}", v, min, max)));
                }
                *value = v;
            }
            (
                OptionKind::Choice {
                    value,
                    choices,
                    optional,
                },
                OptionValue::Choice(v),
            ) => match v {
                Some(choice) if choices.contains(&choice) => *value = Some(choice),
                Some(choice) => return Err(invalid(format!("'{}' is not a valid choice", choice))),
                None if *optional => *value = None,
                None => return Err(invalid("a choice is required".to_string())),
            },
            (kind, v) => {
                return Err(invalid(format!("{} doesn't match option type {:?}", v, kind)));
            }
        }
        Ok(())
    }

    /// Change an integer option's range, clamping the current value into it
    pub fn set_integer_range(&mut self, new_min: i64, new_max: i64) {
        debug_assert!(new_min <= new_max);
        if let OptionKind::Integer { value, min, max } = &mut self.kind {
            *min = new_min;
            *max = new_max;
            *value = (*value).clamp(new_min, new_max);
        }
    }

    /// Change a float option's range, clamping the current value into it
    pub fn set_float_range(&mut self, new_min: f64, new_max: f64) {
        debug_assert!(new_min <= new_max);
        if let OptionKind::Float { value, min, max } = &mut self.kind {
            *min = new_min;
            *max = new_max;
            *value = value.clamp(new_min, new_max);
        }
    }

    /// Replace the choice list. A current value that is still offered is kept.
    pub fn set_choices(&mut self, new_choices: Vec<String>) {
        if let OptionKind::Choice {
            value,
            choices,
            optional,
        } = &mut self.kind
        {
            let still_valid = value
                .as_ref()
                .map_or(*optional, |current| new_choices.contains(current));
            if !still_valid {
                *value = if *optional {
                    None
                } else {
                    new_choices.first().cloned()
                };
            }
            *choices = new_choices;
        }
    }

    /// Choices currently offered (empty for non-choice options)
    pub fn choices(&self) -> &[String] {
        match &self.kind {
            OptionKind::Choice { choices, .. } => choices,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn levels() -> Vec<String> {
        vec!["Low".to_string(), "High".to_string()]
    }

    #[test]
    fn test_integer_range_validation() {
        let mut option = ComponentOption::integer("level", "Level", 2, 2, 4);
        assert!(option.set_value(OptionValue::Int(4)).is_ok());
        assert_eq!(option.int_value(), 4);

        let result = option.set_value(OptionValue::Int(5));
        assert!(matches!(result, Err(ForgeError::InvalidOptionValue { .. })));
        assert_eq!(option.int_value(), 4);
    }

    #[test]
    fn test_type_mismatch_rejected() {
        let mut option = ComponentOption::boolean("folded", "Folded", false);
        assert!(option.set_value(OptionValue::Int(1)).is_err());
        assert!(option.set_value(OptionValue::Bool(true)).is_ok());
        assert!(option.bool_value());
    }

    #[test]
    fn test_range_update_keeps_valid_value() {
        let mut option = ComponentOption::integer("level", "Level", 3, 2, 4);
        option.set_integer_range(2, 3);
        assert_eq!(option.int_value(), 3);
        option.set_integer_range(1, 2);
        assert_eq!(option.int_value(), 2);
    }

    #[test]
    fn test_choice_defaults_to_first_when_required() {
        let option = ComponentOption::choice("level", "Level", None, levels(), false);
        assert_eq!(option.choice_value(), Some("Low"));

        let optional = ComponentOption::choice("level", "Level", None, levels(), true);
        assert_eq!(optional.choice_value(), None);
    }

    #[test]
    fn test_choice_update_is_non_destructive() {
        let mut option = ComponentOption::choice("level", "Level", Some("High"), levels(), false);
        option.set_choices(vec!["Medium".to_string(), "High".to_string()]);
        assert_eq!(option.choice_value(), Some("High"));

        option.set_choices(vec!["Medium".to_string()]);
        assert_eq!(option.choice_value(), Some("Medium"));
    }

    #[test]
    fn test_choice_validation() {
        let mut option = ComponentOption::choice("level", "Level", None, levels(), false);
        assert!(option
            .set_value(OptionValue::Choice(Some("Extreme".to_string())))
            .is_err());
        assert!(option.set_value(OptionValue::Choice(None)).is_err());
        assert!(option
            .set_value(OptionValue::Choice(Some("High".to_string())))
            .is_ok());
        assert_eq!(option.value(), OptionValue::Choice(Some("High".to_string())));
    }
}
