//! Construction stages: the typed, ordered slots a sequence is built from.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::component::Component;
use super::domain::{ComponentKind, ConstructionDomain, ConstructionPhase};
use crate::core::types::SequenceId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StageRequirement {
    /// Must hold a component for the construction to be complete
    Mandatory,
    /// Filled automatically when a compatible component exists
    Desirable,
    Optional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StageCardinality {
    Singular,
    Multiple,
}

/// Address of a stage within a construction
///
/// `sequence` is `None` for stages shared by every sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StageId {
    pub sequence: Option<SequenceId>,
    pub index: usize,
}

impl StageId {
    pub fn sequence(sequence: SequenceId, index: usize) -> Self {
        Self {
            sequence: Some(sequence),
            index,
        }
    }

    pub fn common(index: usize) -> Self {
        Self {
            sequence: None,
            index,
        }
    }

    pub fn is_common(&self) -> bool {
        self.sequence.is_none()
    }
}

/// A slot in the build order holding components of one base kind
///
/// Phase, kind, requirement and cardinality are fixed at creation; only the
/// component list changes.
#[derive(Debug, Clone)]
pub struct ConstructionStage<D: ConstructionDomain> {
    name: &'static str,
    phase: D::Phase,
    base_kind: D::Kind,
    requirement: StageRequirement,
    cardinality: StageCardinality,
    default_type: Option<&'static str>,
    components: Vec<Box<dyn Component<D>>>,
}

impl<D: ConstructionDomain> ConstructionStage<D> {
    pub fn new(
        name: &'static str,
        phase: D::Phase,
        base_kind: D::Kind,
        requirement: StageRequirement,
        cardinality: StageCardinality,
    ) -> Self {
        Self {
            name,
            phase,
            base_kind,
            requirement,
            cardinality,
            default_type: None,
            components: Vec::new(),
        }
    }

    pub fn singular(
        name: &'static str,
        phase: D::Phase,
        base_kind: D::Kind,
        requirement: StageRequirement,
    ) -> Self {
        Self::new(name, phase, base_kind, requirement, StageCardinality::Singular)
    }

    pub fn multiple(name: &'static str, phase: D::Phase, base_kind: D::Kind) -> Self {
        Self::new(
            name,
            phase,
            base_kind,
            StageRequirement::Optional,
            StageCardinality::Multiple,
        )
    }

    /// Component type tried first when the stage is filled automatically
    pub fn with_default(mut self, type_name: &'static str) -> Self {
        self.default_type = Some(type_name);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn phase(&self) -> D::Phase {
        self.phase
    }

    pub fn base_kind(&self) -> D::Kind {
        self.base_kind
    }

    pub fn requirement(&self) -> StageRequirement {
        self.requirement
    }

    pub fn cardinality(&self) -> StageCardinality {
        self.cardinality
    }

    pub fn default_type(&self) -> Option<&'static str> {
        self.default_type
    }

    pub fn is_common(&self) -> bool {
        self.phase.is_common()
    }

    pub fn is_singular(&self) -> bool {
        self.cardinality == StageCardinality::Singular
    }

    pub fn components(&self) -> &[Box<dyn Component<D>>] {
        &self.components
    }

    pub fn component(&self, index: usize) -> Option<&dyn Component<D>> {
        self.components.get(index).map(|c| c.as_ref())
    }

    pub(crate) fn component_mut(&mut self, index: usize) -> Option<&mut Box<dyn Component<D>>> {
        self.components.get_mut(index)
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// True if the stage accepts components of this kind
    pub fn matches_kind(&self, kind: D::Kind) -> bool {
        kind.extends(self.base_kind)
    }

    pub fn matches_component(&self, component: &dyn Component<D>) -> bool {
        self.matches_kind(component.kind())
    }

    /// Append a component. A singular stage drops what it held.
    pub fn add_component(&mut self, component: Box<dyn Component<D>>) {
        debug_assert!(self.matches_component(component.as_ref()));
        if self.is_singular() {
            self.components.clear();
        }
        self.components.push(component);
    }

    /// Insert at `index`, clamped to the end of the list
    pub fn insert_component(&mut self, index: usize, component: Box<dyn Component<D>>) {
        debug_assert!(self.matches_component(component.as_ref()));
        let index = index.min(self.components.len());
        self.components.insert(index, component);
        debug_assert!(!self.is_singular() || self.components.len() <= 1);
    }

    /// Remove the component at `index`. Re-inserting it at the same index
    /// restores the original order.
    pub fn remove_component_at(&mut self, index: usize) -> Option<Box<dyn Component<D>>> {
        if index < self.components.len() {
            Some(self.components.remove(index))
        } else {
            None
        }
    }

    /// Index of the first component of the given type
    pub fn position_of(&self, type_name: &str) -> Option<usize> {
        self.components
            .iter()
            .position(|c| c.type_name() == type_name)
    }

    pub fn set_components(&mut self, components: Vec<Box<dyn Component<D>>>) {
        debug_assert!(components.iter().all(|c| self.matches_component(c.as_ref())));
        debug_assert!(!self.is_singular() || components.len() <= 1);
        self.components = components;
    }

    pub fn clear_components(&mut self) {
        self.components.clear();
    }

    pub(crate) fn take_components(&mut self) -> Vec<Box<dyn Component<D>>> {
        std::mem::take(&mut self.components)
    }
}

impl<D: ConstructionDomain> fmt::Display for ConstructionStage<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construction::ConstructionDomain;
    use crate::robots::{RobotComponentKind, RobotPhase, Robotics};

    fn options_stage(types: &[&str]) -> ConstructionStage<Robotics> {
        let mut stage =
            ConstructionStage::multiple("Options", RobotPhase::Options, RobotComponentKind::RobotOption);
        for name in types {
            stage.add_component(Robotics::registry().create(name).unwrap());
        }
        stage
    }

    fn type_names(stage: &ConstructionStage<Robotics>) -> Vec<&'static str> {
        stage.components().iter().map(|c| c.type_name()).collect()
    }

    #[test]
    fn test_remove_then_insert_restores_order() {
        let mut stage = options_stage(&["ArmourPlating", "Vocaliser", "VisualSensor"]);
        let before = type_names(&stage);

        let removed = stage.remove_component_at(1).unwrap();
        assert_eq!(type_names(&stage), vec!["ArmourPlating", "VisualSensor"]);
        stage.insert_component(1, removed);
        assert_eq!(type_names(&stage), before);
    }

    #[test]
    fn test_insert_clamps_and_remove_out_of_range() {
        let mut stage = options_stage(&["ArmourPlating"]);
        stage.insert_component(9, Robotics::registry().create("Vocaliser").unwrap());
        assert_eq!(type_names(&stage), vec!["ArmourPlating", "Vocaliser"]);
        assert!(stage.remove_component_at(2).is_none());
        assert_eq!(stage.position_of("Vocaliser"), Some(1));
        assert_eq!(stage.position_of("FireExtinguisher"), None);
    }

    #[test]
    fn test_singular_stage_replaces() {
        let mut stage = ConstructionStage::<Robotics>::singular(
            "Chassis",
            RobotPhase::Chassis,
            RobotComponentKind::Chassis,
            StageRequirement::Mandatory,
        )
        .with_default("Size5Chassis");
        assert_eq!(stage.default_type(), Some("Size5Chassis"));

        stage.add_component(Robotics::registry().create("Size5Chassis").unwrap());
        stage.add_component(Robotics::registry().create("Size3Chassis").unwrap());
        assert_eq!(type_names(&stage), vec!["Size3Chassis"]);

        let armour = Robotics::registry().create("ArmourPlating").unwrap();
        assert!(!stage.matches_component(armour.as_ref()));
    }

    #[test]
    fn test_stage_ids() {
        let id = SequenceId::new();
        assert!(StageId::common(2).is_common());
        assert!(!StageId::sequence(id, 2).is_common());
        assert_ne!(StageId::common(2), StageId::sequence(id, 2));
    }
}
