//! The component trait implemented by every selectable piece of domain logic.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;

use super::context::ConstructionContext;
use super::domain::{ComponentKind, ConstructionDomain};
use super::option::{ComponentOption, OptionValue};
use crate::core::error::{ForgeError, Result};
use crate::core::types::SequenceId;

/// Object-safe helpers every component gets for free
pub trait ComponentBase<D: ConstructionDomain> {
    fn clone_box(&self) -> Box<dyn Component<D>>;
    fn as_any(&self) -> &dyn Any;
}

impl<D, T> ComponentBase<D> for T
where
    D: ConstructionDomain,
    T: Component<D> + Clone + 'static,
{
    fn clone_box(&self) -> Box<dyn Component<D>> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A unit of domain rule logic occupying a stage
///
/// `is_compatible` must be free of side effects and must not assume the
/// component is attached to a stage: the engine calls it both for components
/// it has temporarily taken out of their stage and for fresh candidates.
pub trait Component<D: ConstructionDomain>: ComponentBase<D> + fmt::Debug + Send + Sync {
    /// Registry name of the concrete type
    fn type_name(&self) -> &'static str;

    /// Display name of the component type ("Handgun")
    fn component_string(&self) -> String;

    /// Display name of this instance, including option choices
    fn instance_string(&self) -> String {
        self.component_string()
    }

    fn kind(&self) -> D::Kind;

    fn is_compatible(&self, sequence: &SequenceId, context: &dyn ConstructionContext<D>) -> bool;

    fn options(&self) -> Vec<&ComponentOption> {
        Vec::new()
    }

    fn options_mut(&mut self) -> Vec<&mut ComponentOption> {
        Vec::new()
    }

    /// Refresh option ranges, choices and enabled state from the context
    fn update_options(&mut self, _sequence: &SequenceId, _context: &dyn ConstructionContext<D>) {}

    /// Build this component's steps and apply them through the context
    fn create_steps(&self, sequence: &SequenceId, context: &mut dyn ConstructionContext<D>);
}

impl<D: ConstructionDomain> Clone for Box<dyn Component<D>> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

impl<'a, D: ConstructionDomain> dyn Component<D> + 'a {
    pub fn option(&self, id: &str) -> Option<&ComponentOption> {
        self.options().into_iter().find(|option| option.id() == id)
    }

    pub fn set_option_value(&mut self, id: &str, value: OptionValue) -> Result<()> {
        let type_name = self.type_name();
        match self.options_mut().into_iter().find(|option| option.id() == id) {
            Some(option) => option.set_value(value),
            None => Err(ForgeError::UnknownOption {
                component: type_name.to_string(),
                option: id.to_string(),
            }),
        }
    }

    /// Current value of every option, keyed by option id
    pub fn option_values(&self) -> BTreeMap<String, OptionValue> {
        self.options()
            .into_iter()
            .map(|option| (option.id().to_string(), option.value()))
            .collect()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// Selects components either by base kind or by concrete type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentQuery<K> {
    Kind(K),
    Type(&'static str),
}

impl<K: ComponentKind> ComponentQuery<K> {
    pub fn matches<D>(&self, component: &dyn Component<D>) -> bool
    where
        D: ConstructionDomain<Kind = K>,
    {
        match self {
            ComponentQuery::Kind(kind) => component.kind().extends(*kind),
            ComponentQuery::Type(type_name) => component.type_name() == *type_name,
        }
    }
}

impl<K: ComponentKind> From<K> for ComponentQuery<K> {
    fn from(kind: K) -> Self {
        ComponentQuery::Kind(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construction::ConstructionDomain;
    use crate::robots::options::RobotOption;
    use crate::robots::{RobotComponentKind, Robotics, SkillPackage};

    /// Borrowed the way context queries hand components out
    fn as_option<'a>(component: &'a (dyn Component<Robotics> + 'a)) -> Option<&'a RobotOption> {
        component.downcast_ref::<RobotOption>()
    }

    #[test]
    fn test_downcast_through_short_borrow() {
        let armour = Robotics::registry().create("ArmourPlating").unwrap();
        let option = as_option(armour.as_ref()).unwrap();
        assert_eq!(option.data().type_name, "ArmourPlating");

        let package = Robotics::registry().create("SkillPackage").unwrap();
        assert!(as_option(package.as_ref()).is_none());
        assert!(package.downcast_ref::<SkillPackage>().is_some());
    }

    #[test]
    fn test_option_lookup_and_set() {
        let mut package = Robotics::registry().create("SkillPackage").unwrap();
        assert_eq!(package.option("level").unwrap().value(), OptionValue::Int(0));

        package.set_option_value("level", OptionValue::Int(2)).unwrap();
        assert_eq!(package.option_values().get("level"), Some(&OptionValue::Int(2)));

        let result = package.set_option_value("colour", OptionValue::Int(1));
        assert!(matches!(result, Err(ForgeError::UnknownOption { .. })));
    }

    #[test]
    fn test_query_matches() {
        let armour = Robotics::registry().create("ArmourPlating").unwrap();
        assert!(ComponentQuery::Kind(RobotComponentKind::RobotOption).matches(armour.as_ref()));
        assert!(ComponentQuery::<RobotComponentKind>::Type("ArmourPlating").matches(armour.as_ref()));
        assert!(!ComponentQuery::Kind(RobotComponentKind::Brain).matches(armour.as_ref()));
    }

    #[test]
    fn test_boxed_clone_is_independent() {
        let mut original = Robotics::registry().create("SkillPackage").unwrap();
        let copy = original.clone();
        original.set_option_value("level", OptionValue::Int(1)).unwrap();
        assert_eq!(copy.option("level").unwrap().value(), OptionValue::Int(0));
    }
}
