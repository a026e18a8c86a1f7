//! Attribute values and the per-sequence attribute group.
//!
//! An `AttributeGroup` maps an attribute identifier to its current value. The
//! group is cleared on every regenerate and rebuilt purely from the factors of
//! the steps applied since, so the state at phase N is always a function of
//! the components applied in phases before it.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;

use super::dice::DiceRoll;
use super::scalar::{format_signed, ScalarValue};

/// Identifier type for a domain's attributes
pub trait AttributeId:
    Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
}

/// Current value of an attribute
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Scalar(ScalarValue),
    Dice(DiceRoll),
    Enum(&'static str),
}

impl AttributeValue {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            AttributeValue::Scalar(scalar) => Some(scalar.value()),
            _ => None,
        }
    }

    pub fn as_dice(&self) -> Option<DiceRoll> {
        match self {
            AttributeValue::Dice(roll) => Some(*roll),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&'static str> {
        match self {
            AttributeValue::Enum(value) => Some(value),
            _ => None,
        }
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Scalar(ScalarValue::new(value))
    }
}

impl From<ScalarValue> for AttributeValue {
    fn from(value: ScalarValue) -> Self {
        AttributeValue::Scalar(value)
    }
}

impl From<DiceRoll> for AttributeValue {
    fn from(value: DiceRoll) -> Self {
        AttributeValue::Dice(value)
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Scalar(scalar) => write!(f, "{}", scalar),
            AttributeValue::Dice(roll) => write!(f, "{}", roll),
            AttributeValue::Enum(value) => write!(f, "{}", value),
        }
    }
}

/// A change applied on top of an attribute's current value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttributeModifier {
    /// Add a constant (to a scalar, or to a dice roll's constant)
    Delta(f64),
    /// Change a scalar by a percentage of its current value
    Percentage { percent: f64, round_down: bool },
    /// Add dice to a dice roll
    Dice(DiceRoll),
}

impl AttributeModifier {
    pub fn percentage(percent: f64) -> Self {
        AttributeModifier::Percentage {
            percent,
            round_down: false,
        }
    }

    pub fn percentage_round_down(percent: f64) -> Self {
        AttributeModifier::Percentage {
            percent,
            round_down: true,
        }
    }

    /// Result of applying this modifier, `None` if it can't apply to the value
    pub fn apply(&self, current: Option<&AttributeValue>) -> Option<AttributeValue> {
        match (current, self) {
            (None, AttributeModifier::Delta(delta)) => Some(AttributeValue::from(*delta)),
            (None, AttributeModifier::Dice(roll)) => Some(AttributeValue::Dice(*roll)),
            (None, AttributeModifier::Percentage { .. }) => None,
            (Some(AttributeValue::Scalar(scalar)), AttributeModifier::Delta(delta)) => Some(
                AttributeValue::Scalar(scalar.with_value(scalar.value() + delta)),
            ),
            (
                Some(AttributeValue::Scalar(scalar)),
                AttributeModifier::Percentage {
                    percent,
                    round_down,
                },
            ) => {
                let mut value = scalar.value() * (100.0 + percent) / 100.0;
                if *round_down {
                    value = value.floor();
                }
                Some(AttributeValue::Scalar(scalar.with_value(value)))
            }
            (Some(AttributeValue::Dice(roll)), AttributeModifier::Delta(delta)) => {
                Some(AttributeValue::Dice(roll.add_constant(delta.round() as i32)))
            }
            (Some(AttributeValue::Dice(roll)), AttributeModifier::Dice(other)) => {
                Some(AttributeValue::Dice(roll.add_roll(other)))
            }
            _ => None,
        }
    }
}

impl fmt::Display for AttributeModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeModifier::Delta(delta) => write!(f, "{}", format_signed(*delta)),
            AttributeModifier::Percentage {
                percent,
                round_down,
            } => {
                write!(f, "{}%", format_signed(*percent))?;
                if *round_down {
                    write!(f, " (rounded down)")?;
                }
                Ok(())
            }
            AttributeModifier::Dice(roll) => write!(f, "{}", roll.signed_string()),
        }
    }
}

/// Attribute values for one sequence
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeGroup<A: AttributeId> {
    values: BTreeMap<A, AttributeValue>,
}

impl<A: AttributeId> Default for AttributeGroup<A> {
    fn default() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }
}

impl<A: AttributeId> AttributeGroup<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, attribute: A) -> Option<&AttributeValue> {
        self.values.get(&attribute)
    }

    /// Numeric value of a scalar attribute
    pub fn value(&self, attribute: A) -> Option<f64> {
        self.get(attribute).and_then(AttributeValue::as_scalar)
    }

    pub fn has(&self, attribute: A) -> bool {
        self.values.contains_key(&attribute)
    }

    pub fn set(&mut self, attribute: A, value: AttributeValue) {
        self.values.insert(attribute, value);
    }

    /// Apply a modifier to an attribute. Combinations that make no sense
    /// (a percentage of a dice roll, dice added to an enum) leave it unchanged.
    pub fn modify(&mut self, attribute: A, modifier: &AttributeModifier) {
        match modifier.apply(self.values.get(&attribute)) {
            Some(value) => {
                self.values.insert(attribute, value);
            }
            None if self.values.contains_key(&attribute) => {
                tracing::warn!(
                    "Can't apply modifier {} to {} ({:?})",
                    modifier,
                    attribute,
                    self.values.get(&attribute)
                );
            }
            None => {}
        }
    }

    pub fn clear(&mut self, attribute: A) -> Option<AttributeValue> {
        self.values.remove(&attribute)
    }

    pub fn clear_all(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (A, &AttributeValue)> {
        self.values.iter().map(|(id, value)| (*id, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    enum TestAttr {
        Capacity,
        Damage,
        Signature,
    }

    impl fmt::Display for TestAttr {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{:?}", self)
        }
    }

    impl AttributeId for TestAttr {}

    #[test]
    fn test_set_and_get() {
        let mut group = AttributeGroup::new();
        group.set(TestAttr::Capacity, 10.0.into());
        assert_eq!(group.value(TestAttr::Capacity), Some(10.0));
        assert!(group.has(TestAttr::Capacity));
        assert!(!group.has(TestAttr::Damage));
    }

    #[test]
    fn test_percentage_round_down() {
        let mut group = AttributeGroup::new();
        group.set(TestAttr::Capacity, 7.0.into());
        group.modify(
            TestAttr::Capacity,
            &AttributeModifier::percentage_round_down(50.0),
        );
        assert_eq!(group.value(TestAttr::Capacity), Some(10.0));
    }

    #[test]
    fn test_percentage_without_rounding_is_exact() {
        let mut group = AttributeGroup::new();
        group.set(TestAttr::Capacity, 7.0.into());
        group.modify(TestAttr::Capacity, &AttributeModifier::percentage(50.0));
        assert_eq!(group.value(TestAttr::Capacity), Some(10.5));
    }

    #[test]
    fn test_delta_on_absent_attribute_starts_from_zero() {
        let mut group = AttributeGroup::new();
        group.modify(TestAttr::Capacity, &AttributeModifier::Delta(-2.0));
        assert_eq!(group.value(TestAttr::Capacity), Some(-2.0));
    }

    #[test]
    fn test_percentage_on_absent_attribute_does_nothing() {
        let mut group: AttributeGroup<TestAttr> = AttributeGroup::new();
        group.modify(TestAttr::Capacity, &AttributeModifier::percentage(50.0));
        assert!(group.is_empty());
    }

    #[test]
    fn test_dice_modifiers() {
        let mut group = AttributeGroup::new();
        group.set(TestAttr::Damage, DiceRoll::new(3, -3).into());
        group.modify(TestAttr::Damage, &AttributeModifier::Delta(1.0));
        group.modify(TestAttr::Damage, &AttributeModifier::Dice(DiceRoll::new(1, 0)));
        assert_eq!(
            group.get(TestAttr::Damage).and_then(AttributeValue::as_dice),
            Some(DiceRoll::new(4, -2))
        );
    }

    #[test]
    fn test_unsupported_modifier_leaves_value() {
        let mut group = AttributeGroup::new();
        group.set(TestAttr::Signature, AttributeValue::Enum("Normal"));
        group.modify(TestAttr::Signature, &AttributeModifier::Delta(1.0));
        assert_eq!(
            group.get(TestAttr::Signature),
            Some(&AttributeValue::Enum("Normal"))
        );
    }

    #[test]
    fn test_modifier_display() {
        assert_eq!(AttributeModifier::Delta(4.0).to_string(), "+4");
        assert_eq!(
            AttributeModifier::percentage_round_down(50.0).to_string(),
            "+50% (rounded down)"
        );
        assert_eq!(AttributeModifier::percentage(-25.0).to_string(), "-25%");
        assert_eq!(
            AttributeModifier::Dice(DiceRoll::new(1, 0)).to_string(),
            "+1D"
        );
    }
}
