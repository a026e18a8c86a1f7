//! Per-sequence construction state.
//!
//! A `SequenceState` owns the stages of one sequence (a weapon mount, a
//! robot), the attributes accumulated during the last regenerate and the
//! steps that produced them. Attributes and steps are thrown away and rebuilt
//! on every regenerate; only the stage contents survive.

use super::attribute::{AttributeGroup, AttributeValue};
use super::component::{Component, ComponentQuery};
use super::domain::{ConstructionDomain, ConstructionPhase};
use super::stage::{ConstructionStage, StageId};
use super::step::ConstructionStep;
use crate::core::types::SequenceId;

/// Where a recorded step came from: the stage, the component's index in that
/// stage and the step's index among that component's steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StepOrigin {
    pub stage: StageId,
    pub component: usize,
    pub step: usize,
}

#[derive(Debug, Clone)]
pub struct RecordedStep<D: ConstructionDomain> {
    pub phase: D::Phase,
    pub origin: StepOrigin,
    pub step: ConstructionStep<D::Attribute>,
}

impl<D: ConstructionDomain> PartialEq for RecordedStep<D> {
    fn eq(&self, other: &Self) -> bool {
        self.phase == other.phase && self.origin == other.origin && self.step == other.step
    }
}

#[derive(Debug, Clone)]
pub struct SequenceState<D: ConstructionDomain> {
    id: SequenceId,
    kind: D::SequenceKind,
    stages: Vec<ConstructionStage<D>>,
    attributes: AttributeGroup<D::Attribute>,
    steps: Vec<RecordedStep<D>>,
}

impl<D: ConstructionDomain> SequenceState<D> {
    pub fn new(id: SequenceId, kind: D::SequenceKind) -> Self {
        Self {
            id,
            kind,
            stages: D::sequence_stages(kind),
            attributes: AttributeGroup::new(),
            steps: Vec::new(),
        }
    }

    pub fn id(&self) -> SequenceId {
        self.id
    }

    pub fn kind(&self) -> D::SequenceKind {
        self.kind
    }

    /// Rebuild the stage layout for a new kind. Components move to the stage
    /// with the same name if it still accepts them; the rest are dropped.
    pub fn set_kind(&mut self, kind: D::SequenceKind) {
        let mut stages = D::sequence_stages(kind);
        for old in &mut self.stages {
            let components = old.take_components();
            let Some(target) = stages.iter_mut().find(|stage| stage.name() == old.name()) else {
                continue;
            };
            for component in components {
                if target.matches_component(component.as_ref()) {
                    target.add_component(component);
                }
            }
        }
        self.kind = kind;
        self.stages = stages;
        self.reset();
    }

    pub fn stages(&self) -> &[ConstructionStage<D>] {
        &self.stages
    }

    pub(crate) fn stages_mut(&mut self) -> &mut [ConstructionStage<D>] {
        &mut self.stages
    }

    pub fn stage_by_name(&self, name: &str) -> Option<usize> {
        self.stages
            .iter()
            .position(|stage| stage.name().eq_ignore_ascii_case(name))
    }

    pub fn attributes(&self) -> &AttributeGroup<D::Attribute> {
        &self.attributes
    }

    pub fn attribute(&self, attribute: D::Attribute) -> Option<&AttributeValue> {
        self.attributes.get(attribute)
    }

    pub fn steps(&self) -> &[RecordedStep<D>] {
        &self.steps
    }

    pub fn phase_steps(&self, phase: D::Phase) -> impl Iterator<Item = &RecordedStep<D>> {
        self.steps.iter().filter(move |recorded| recorded.phase == phase)
    }

    /// Components held by this sequence's own stages
    pub fn components(&self) -> impl Iterator<Item = &dyn Component<D>> {
        self.stages
            .iter()
            .flat_map(|stage| stage.components().iter().map(|c| c.as_ref()))
    }

    pub fn has_component(&self, query: ComponentQuery<D::Kind>) -> bool {
        self.components().any(|component| query.matches(component))
    }

    pub fn find_components(&self, query: ComponentQuery<D::Kind>) -> Vec<&dyn Component<D>> {
        self.components()
            .filter(|component| query.matches(*component))
            .collect()
    }

    /// Sum of constant costs recorded in cost-base phases
    pub fn cost_base(&self) -> f64 {
        self.base_total(|step| step.cost())
    }

    /// Sum of constant weights recorded in cost-base phases
    pub fn weight_base(&self) -> f64 {
        self.base_total(|step| step.weight())
    }

    fn base_total<F>(&self, field: F) -> f64
    where
        F: Fn(&ConstructionStep<D::Attribute>) -> Option<super::scalar::NumericModifier>,
    {
        self.steps
            .iter()
            .filter(|recorded| recorded.phase.is_cost_base())
            .filter_map(|recorded| field(&recorded.step).and_then(|m| m.constant_value()))
            .sum()
    }

    /// Resolved cost of one step of this sequence
    pub fn step_cost(&self, step: &ConstructionStep<D::Attribute>) -> Option<f64> {
        step.cost().map(|modifier| modifier.resolve(self.cost_base()))
    }

    /// Resolved weight of one step of this sequence
    pub fn step_weight(&self, step: &ConstructionStep<D::Attribute>) -> Option<f64> {
        step.weight().map(|modifier| modifier.resolve(self.weight_base()))
    }

    pub fn phase_cost(&self, phase: D::Phase) -> f64 {
        let base = self.cost_base();
        self.phase_steps(phase)
            .filter_map(|recorded| recorded.step.cost())
            .map(|modifier| modifier.resolve(base))
            .sum()
    }

    pub fn phase_weight(&self, phase: D::Phase) -> f64 {
        let base = self.weight_base();
        self.phase_steps(phase)
            .filter_map(|recorded| recorded.step.weight())
            .map(|modifier| modifier.resolve(base))
            .sum()
    }

    /// Record a step and apply its factors
    pub(crate) fn record_step(
        &mut self,
        phase: D::Phase,
        stage: StageId,
        component: usize,
        step: ConstructionStep<D::Attribute>,
    ) {
        let index = self
            .steps
            .iter()
            .filter(|recorded| recorded.origin.stage == stage && recorded.origin.component == component)
            .count();
        step.apply_to(&mut self.attributes);
        self.steps.push(RecordedStep {
            phase,
            origin: StepOrigin {
                stage,
                component,
                step: index,
            },
            step,
        });
    }

    /// Forget attributes and steps from the last regenerate
    pub(crate) fn reset(&mut self) {
        self.attributes.clear_all();
        self.steps.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construction::{Factor, NumericModifier};
    use crate::gunsmith::domain::{RECEIVER_FEATURES_STAGE, RECEIVER_STAGE};
    use crate::gunsmith::{Gunsmith, WeaponAttribute, WeaponPhase, WeaponType};

    fn conventional() -> SequenceState<Gunsmith> {
        SequenceState::new(SequenceId::new(), WeaponType::Conventional)
    }

    fn add(state: &mut SequenceState<Gunsmith>, stage: &str, type_name: &str) {
        let index = state.stage_by_name(stage).unwrap();
        let component = Gunsmith::registry().create(type_name).unwrap();
        state.stages_mut()[index].add_component(component);
    }

    #[test]
    fn test_stage_lookup_ignores_case() {
        let state = conventional();
        assert_eq!(state.stage_by_name("receiver"), state.stage_by_name(RECEIVER_STAGE));
        assert!(state.stage_by_name("Turret").is_none());
    }

    #[test]
    fn test_set_kind_moves_matching_components() {
        let mut state = conventional();
        add(&mut state, RECEIVER_STAGE, "HandgunReceiver");
        add(&mut state, RECEIVER_FEATURES_STAGE, "AutoFeature");

        state.set_kind(WeaponType::Launcher);
        assert_eq!(state.kind(), WeaponType::Launcher);
        // A conventional receiver doesn't fit a launcher's receiver stage
        assert!(!state.has_component(ComponentQuery::Type("HandgunReceiver")));
        assert!(state.has_component(ComponentQuery::Type("AutoFeature")));
    }

    #[test]
    fn test_record_step_numbers_and_resolves() {
        let mut state = conventional();
        let receiver = StageId::sequence(state.id(), state.stage_by_name(RECEIVER_STAGE).unwrap());
        let features =
            StageId::sequence(state.id(), state.stage_by_name(RECEIVER_FEATURES_STAGE).unwrap());

        state.record_step(
            WeaponPhase::Receiver,
            receiver,
            0,
            ConstructionStep::new("Receiver", "Handgun")
                .with_cost(NumericModifier::Constant(200.0))
                .with_factor(Factor::set(WeaponAttribute::Quickdraw, 4.0)),
        );
        state.record_step(
            WeaponPhase::Receiver,
            features,
            0,
            ConstructionStep::new("Receiver Feature", "Lightweight")
                .with_cost(NumericModifier::Percentage(25.0))
                .with_factor(Factor::delta(WeaponAttribute::Quickdraw, 1.0)),
        );
        state.record_step(
            WeaponPhase::Receiver,
            features,
            0,
            ConstructionStep::new("Receiver Feature", "Note"),
        );

        let origins: Vec<usize> = state.steps().iter().map(|recorded| recorded.origin.step).collect();
        assert_eq!(origins, vec![0, 0, 1]);
        assert_eq!(state.cost_base(), 200.0);
        assert_eq!(state.phase_cost(WeaponPhase::Receiver), 250.0);
        assert_eq!(state.attributes().value(WeaponAttribute::Quickdraw), Some(5.0));

        state.reset();
        assert!(state.steps().is_empty());
        assert!(state.attributes().is_empty());
    }
}
