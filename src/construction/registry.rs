//! Static component registry.
//!
//! Every concrete component type is registered once, in a fixed order, as a
//! prototype instance with default options. Automatic selection walks the
//! registry in that order, so the order of registration is the
//! default-selection tie-break.

use ahash::AHashMap;
use std::fmt;

use super::component::Component;
use super::domain::{ComponentKind, ConstructionDomain};
use crate::core::error::{ForgeError, Result};

/// A registered component type
pub struct ComponentFactory<D: ConstructionDomain> {
    pub type_name: &'static str,
    pub kind: D::Kind,
    prototype: Box<dyn Component<D>>,
}

impl<D: ConstructionDomain> ComponentFactory<D> {
    /// New instance with default options
    pub fn create(&self) -> Box<dyn Component<D>> {
        self.prototype.clone_box()
    }

    pub fn prototype(&self) -> &dyn Component<D> {
        self.prototype.as_ref()
    }
}

impl<D: ConstructionDomain> fmt::Debug for ComponentFactory<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentFactory")
            .field("type_name", &self.type_name)
            .field("kind", &self.kind)
            .finish()
    }
}

#[derive(Debug)]
pub struct ComponentRegistry<D: ConstructionDomain> {
    factories: Vec<ComponentFactory<D>>,
    by_name: AHashMap<&'static str, usize>,
}

impl<D: ConstructionDomain> Default for ComponentRegistry<D> {
    fn default() -> Self {
        Self {
            factories: Vec::new(),
            by_name: AHashMap::new(),
        }
    }
}

impl<D: ConstructionDomain> ComponentRegistry<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component type constructed through `Default`
    pub fn register<C>(&mut self) -> &mut Self
    where
        C: Component<D> + Clone + Default + 'static,
    {
        self.register_prototype(Box::new(C::default()))
    }

    /// Register a table-driven component by example
    pub fn register_prototype(&mut self, prototype: Box<dyn Component<D>>) -> &mut Self {
        let type_name = prototype.type_name();
        debug_assert!(
            !self.by_name.contains_key(type_name),
            "component type {} registered twice",
            type_name
        );
        self.by_name.insert(type_name, self.factories.len());
        self.factories.push(ComponentFactory {
            type_name,
            kind: prototype.kind(),
            prototype,
        });
        self
    }

    pub fn get(&self, type_name: &str) -> Option<&ComponentFactory<D>> {
        self.by_name.get(type_name).map(|&index| &self.factories[index])
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.by_name.contains_key(type_name)
    }

    /// New instance of the named type with default options
    pub fn create(&self, type_name: &str) -> Result<Box<dyn Component<D>>> {
        self.get(type_name)
            .map(ComponentFactory::create)
            .ok_or_else(|| ForgeError::UnknownComponentType(type_name.to_string()))
    }

    /// Factories whose kind extends `base`, in registration order
    pub fn candidates(&self, base: D::Kind) -> impl Iterator<Item = &ComponentFactory<D>> + '_ {
        self.factories
            .iter()
            .filter(move |factory| factory.kind.extends(base))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComponentFactory<D>> {
        self.factories.iter()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construction::ConstructionDomain;
    use crate::robots::options::RobotOption;
    use crate::robots::{RobotComponentKind, Robotics, ROBOT_OPTIONS};

    #[test]
    fn test_candidates_follow_registration_order() {
        let names: Vec<&str> = Robotics::registry()
            .candidates(RobotComponentKind::RobotOption)
            .map(|factory| factory.type_name)
            .collect();
        let expected: Vec<&str> = ROBOT_OPTIONS.iter().map(|data| data.type_name).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_register_prototype_order() {
        let mut registry = ComponentRegistry::<Robotics>::new();
        assert!(registry.is_empty());
        registry
            .register_prototype(Box::new(RobotOption::new(&ROBOT_OPTIONS[2])))
            .register_prototype(Box::new(RobotOption::new(&ROBOT_OPTIONS[0])));

        let names: Vec<&str> = registry.iter().map(|factory| factory.type_name).collect();
        assert_eq!(names, vec![ROBOT_OPTIONS[2].type_name, ROBOT_OPTIONS[0].type_name]);
        assert_eq!(registry.len(), 2);
        assert!(registry.contains(ROBOT_OPTIONS[0].type_name));
        assert!(!registry.contains(ROBOT_OPTIONS[1].type_name));
    }

    #[test]
    fn test_create_clones_defaults() {
        let registry = Robotics::registry();
        let mut first = registry.create("SkillPackage").unwrap();
        first
            .set_option_value("level", crate::construction::OptionValue::Int(2))
            .unwrap();
        let second = registry.create("SkillPackage").unwrap();
        assert_eq!(second.option("level").unwrap().int_value(), 0);
        assert_eq!(registry.get("SkillPackage").unwrap().kind, RobotComponentKind::SkillPackage);
    }

    #[test]
    fn test_create_unknown_type() {
        let result = Robotics::registry().create("Jetpack");
        assert!(matches!(result, Err(ForgeError::UnknownComponentType(name)) if name == "Jetpack"));
    }
}
