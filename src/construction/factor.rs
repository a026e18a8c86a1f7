//! Factors: the attribute mutations carried by a construction step.
//!
//! Every factor can both apply itself to an attribute group and describe
//! itself without touching any state. The two are used from different code
//! paths on the same instance, so neither may depend on the other having run.

use std::fmt;

use super::attribute::{AttributeGroup, AttributeId, AttributeModifier, AttributeValue};

#[derive(Debug, Clone, PartialEq)]
pub enum Factor<A: AttributeId> {
    /// Overwrite the attribute's value
    Set { attribute: A, value: AttributeValue },
    /// Change the attribute's current value
    Modify {
        attribute: A,
        modifier: AttributeModifier,
    },
    /// Shown in reports exactly like the wrapped factor but never applied
    NonModifying(Box<Factor<A>>),
}

impl<A: AttributeId> Factor<A> {
    pub fn set(attribute: A, value: impl Into<AttributeValue>) -> Self {
        Factor::Set {
            attribute,
            value: value.into(),
        }
    }

    pub fn modify(attribute: A, modifier: AttributeModifier) -> Self {
        Factor::Modify {
            attribute,
            modifier,
        }
    }

    pub fn delta(attribute: A, delta: f64) -> Self {
        Self::modify(attribute, AttributeModifier::Delta(delta))
    }

    /// Wrap this factor so it is reported but has no effect
    pub fn non_modifying(self) -> Self {
        match self {
            Factor::NonModifying(_) => self,
            other => Factor::NonModifying(Box::new(other)),
        }
    }

    pub fn attribute(&self) -> A {
        match self {
            Factor::Set { attribute, .. } | Factor::Modify { attribute, .. } => *attribute,
            Factor::NonModifying(inner) => inner.attribute(),
        }
    }

    pub fn is_modifying(&self) -> bool {
        !matches!(self, Factor::NonModifying(_))
    }

    pub fn apply_to(&self, attributes: &mut AttributeGroup<A>) {
        match self {
            Factor::Set { attribute, value } => attributes.set(*attribute, value.clone()),
            Factor::Modify {
                attribute,
                modifier,
            } => attributes.modify(*attribute, modifier),
            Factor::NonModifying(_) => {}
        }
    }

    pub fn display_string(&self) -> String {
        match self {
            Factor::Set { attribute, value } => format!("{} = {}", attribute, value),
            Factor::Modify {
                attribute,
                modifier,
            } => format!("{} {}", attribute, modifier),
            Factor::NonModifying(inner) => inner.display_string(),
        }
    }
}

impl<A: AttributeId> fmt::Display for Factor<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construction::dice::DiceRoll;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    enum TestAttr {
        AmmoCapacity,
        Damage,
    }

    impl fmt::Display for TestAttr {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                TestAttr::AmmoCapacity => write!(f, "Ammo Capacity"),
                TestAttr::Damage => write!(f, "Damage"),
            }
        }
    }

    impl AttributeId for TestAttr {}

    #[test]
    fn test_set_overwrites() {
        let mut group = AttributeGroup::new();
        group.set(TestAttr::AmmoCapacity, 5.0.into());
        Factor::set(TestAttr::AmmoCapacity, 10.0).apply_to(&mut group);
        assert_eq!(group.value(TestAttr::AmmoCapacity), Some(10.0));
    }

    #[test]
    fn test_display_strings() {
        assert_eq!(
            Factor::set(TestAttr::AmmoCapacity, 10.0).display_string(),
            "Ammo Capacity = 10"
        );
        assert_eq!(
            Factor::set(TestAttr::Damage, DiceRoll::new(3, -3)).display_string(),
            "Damage = 3D-3"
        );
        assert_eq!(
            Factor::modify(
                TestAttr::AmmoCapacity,
                AttributeModifier::percentage_round_down(50.0)
            )
            .display_string(),
            "Ammo Capacity +50% (rounded down)"
        );
    }

    #[test]
    fn test_non_modifying_displays_but_skips_apply() {
        let inner = Factor::delta(TestAttr::AmmoCapacity, 5.0);
        let wrapped = inner.clone().non_modifying();
        assert_eq!(wrapped.display_string(), inner.display_string());

        let mut group = AttributeGroup::new();
        group.set(TestAttr::AmmoCapacity, 10.0.into());
        wrapped.apply_to(&mut group);
        assert_eq!(group.value(TestAttr::AmmoCapacity), Some(10.0));
        assert!(!wrapped.is_modifying());
        assert_eq!(wrapped.attribute(), TestAttr::AmmoCapacity);
    }

    #[test]
    fn test_non_modifying_does_not_nest() {
        let wrapped = Factor::delta(TestAttr::AmmoCapacity, 1.0)
            .non_modifying()
            .non_modifying();
        match wrapped {
            Factor::NonModifying(inner) => assert!(inner.is_modifying()),
            _ => panic!("expected a non-modifying factor"),
        }
    }

    #[test]
    fn test_display_does_not_mutate() {
        let factor = Factor::delta(TestAttr::AmmoCapacity, 2.0);
        let mut group = AttributeGroup::new();
        group.set(TestAttr::AmmoCapacity, 1.0.into());
        let _ = factor.display_string();
        assert_eq!(group.value(TestAttr::AmmoCapacity), Some(1.0));
        factor.apply_to(&mut group);
        assert_eq!(group.value(TestAttr::AmmoCapacity), Some(3.0));
    }
}
