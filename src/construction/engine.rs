//! The construction orchestrator shared by every domain.
//!
//! `Construction<D>` owns the sequences and the common stages and drives the
//! regenerate algorithm. Regenerate is the only place attributes change:
//!
//! 1. every sequence forgets its attributes and steps
//! 2. phases are walked in order; within a phase sequence stages are walked
//!    sequence by sequence in declaration order, common stages once for all
//!    sequences
//! 3. each stage re-checks its components one at a time, fills an empty
//!    mandatory or desirable stage from the registry, then lets its components
//!    create their steps
//!
//! Speculative checks (is this component allowed here, what could replace
//! that one) run against a copy of the construction regenerated up to the
//! stage in question, so the construction itself is never disturbed.

use std::cell::OnceCell;

use super::attribute::AttributeValue;
use super::component::{Component, ComponentQuery};
use super::context::{ConstructionSettings, ConstructionState, ConstructionView};
use super::domain::{ComponentKind, ConstructionDomain, ConstructionPhase};
use super::manifest::Manifest;
use super::option::OptionValue;
use super::registry::ComponentFactory;
use super::sequence::{RecordedStep, SequenceState};
use super::stage::{ConstructionStage, StageId, StageRequirement};
use crate::core::error::{ForgeError, Result};
use crate::core::types::{SequenceId, TechLevel};

#[derive(Debug, Clone)]
pub struct Construction<D: ConstructionDomain> {
    settings: ConstructionSettings<D>,
    sequences: Vec<SequenceState<D>>,
    common_stages: Vec<ConstructionStage<D>>,
    incomplete: bool,
    manifest: OnceCell<Manifest>,
}

impl<D: ConstructionDomain> Construction<D> {
    /// An empty construction with no sequences
    pub fn new(name: impl Into<String>, tech_level: TechLevel) -> Self {
        Self {
            settings: ConstructionSettings::new(name, tech_level),
            sequences: Vec::new(),
            common_stages: D::common_stages(),
            incomplete: false,
            manifest: OnceCell::new(),
        }
    }

    /// A construction with one primary sequence, regenerated
    pub fn with_sequence(
        name: impl Into<String>,
        tech_level: TechLevel,
        kind: D::SequenceKind,
    ) -> Self {
        let mut construction = Self::new(name, tech_level);
        construction.add_sequence(kind, true);
        construction
    }

    /// Enable rule flags and regenerate
    pub fn with_rules(mut self, rules: impl IntoIterator<Item = D::Rule>) -> Self {
        self.settings.rules.extend(rules);
        self.regenerate();
        self
    }

    pub fn name(&self) -> &str {
        &self.settings.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.settings.name = name.into();
    }

    pub fn tech_level(&self) -> TechLevel {
        self.settings.tech_level
    }

    pub fn set_tech_level(&mut self, tech_level: TechLevel, regenerate: bool) {
        self.settings.tech_level = tech_level;
        if regenerate {
            self.regenerate();
        }
    }

    pub fn rules(&self) -> impl Iterator<Item = D::Rule> + '_ {
        self.settings.rules.iter().copied()
    }

    pub fn is_rule_enabled(&self, rule: D::Rule) -> bool {
        self.settings.rules.contains(&rule)
    }

    pub fn set_rule_enabled(&mut self, rule: D::Rule, enabled: bool, regenerate: bool) {
        if enabled {
            self.settings.rules.insert(rule);
        } else {
            self.settings.rules.remove(&rule);
        }
        if regenerate {
            self.regenerate();
        }
    }

    // Sequences

    /// Sequence ids, primary first
    pub fn sequences(&self) -> Vec<SequenceId> {
        self.sequences.iter().map(SequenceState::id).collect()
    }

    pub fn sequence_count(&self) -> usize {
        self.sequences.len()
    }

    pub fn primary_sequence(&self) -> Option<SequenceId> {
        self.sequences.first().map(SequenceState::id)
    }

    /// Panics on an id this construction didn't hand out
    pub fn sequence(&self, sequence: &SequenceId) -> &SequenceState<D> {
        self.view().sequence(sequence)
    }

    pub fn sequence_kind(&self, sequence: &SequenceId) -> D::SequenceKind {
        self.sequence(sequence).kind()
    }

    pub fn add_sequence(&mut self, kind: D::SequenceKind, regenerate: bool) -> SequenceId {
        let id = SequenceId::new();
        self.sequences.push(SequenceState::new(id, kind));
        if regenerate {
            self.regenerate();
        }
        id
    }

    pub fn remove_sequence(&mut self, sequence: &SequenceId, regenerate: bool) {
        let index = self.view().sequence_index(sequence);
        self.sequences.remove(index);
        if regenerate {
            self.regenerate();
        }
    }

    /// Change what a sequence is built as; its stages are rebuilt
    pub fn set_sequence_kind(
        &mut self,
        sequence: &SequenceId,
        kind: D::SequenceKind,
        regenerate: bool,
    ) {
        let index = self.view().sequence_index(sequence);
        self.sequences[index].set_kind(kind);
        if regenerate {
            self.regenerate();
        }
    }

    // Stages

    pub fn common_stages(&self) -> &[ConstructionStage<D>] {
        &self.common_stages
    }

    pub fn stage(&self, stage: StageId) -> &ConstructionStage<D> {
        match stage.sequence {
            Some(sequence) => &self.sequence(&sequence).stages()[stage.index],
            None => &self.common_stages[stage.index],
        }
    }

    fn stage_mut(&mut self, stage: StageId) -> &mut ConstructionStage<D> {
        match stage.sequence {
            Some(sequence) => {
                let index = self.view().sequence_index(&sequence);
                &mut self.sequences[index].stages_mut()[stage.index]
            }
            None => &mut self.common_stages[stage.index],
        }
    }

    /// Stage ids of a sequence, or of the common stages for `None`
    pub fn stage_ids(&self, sequence: Option<&SequenceId>) -> Vec<StageId> {
        match sequence {
            Some(id) => (0..self.sequence(id).stages().len())
                .map(|index| StageId::sequence(*id, index))
                .collect(),
            None => (0..self.common_stages.len()).map(StageId::common).collect(),
        }
    }

    /// Resolve a stage by name, searching the sequence's stages first and the
    /// common stages after. Names compare case-insensitively.
    pub fn find_stage(&self, sequence: Option<&SequenceId>, name: &str) -> Option<StageId> {
        if let Some(id) = sequence {
            if let Some(index) = self.sequence(id).stage_by_name(name) {
                return Some(StageId::sequence(*id, index));
            }
        }
        self.common_stages
            .iter()
            .position(|stage| stage.name().eq_ignore_ascii_case(name))
            .map(StageId::common)
    }

    // Component mutators

    /// Add a component to a stage. A singular stage's current component is
    /// replaced. With `regenerate` the component must be compatible with the
    /// construction as it stands at that stage.
    pub fn add_component(
        &mut self,
        stage: StageId,
        component: Box<dyn Component<D>>,
        regenerate: bool,
    ) -> Result<()> {
        self.check_stage_match(stage, component.as_ref())?;
        if regenerate {
            let mut trial = self.trial(stage, None);
            let mut candidate = component.clone();
            if !trial.candidate_compatible(stage, candidate.as_mut()) {
                return Err(self.compatibility_error(stage, component.as_ref()));
            }
        }

        self.stage_mut(stage).add_component(component);
        if regenerate {
            self.regenerate();
        }
        Ok(())
    }

    /// Create a registered component type and add it to the named stage,
    /// checking compatibility and regenerating
    pub fn add_component_by_name(
        &mut self,
        sequence: Option<&SequenceId>,
        stage: &str,
        type_name: &str,
    ) -> Result<StageId> {
        let stage_id = self
            .find_stage(sequence, stage)
            .ok_or_else(|| ForgeError::UnknownStage(stage.to_string()))?;
        let component = D::registry().create(type_name)?;
        self.add_component(stage_id, component, true)?;
        Ok(stage_id)
    }

    pub fn remove_component(
        &mut self,
        stage: StageId,
        index: usize,
        regenerate: bool,
    ) -> Option<Box<dyn Component<D>>> {
        let removed = self.stage_mut(stage).remove_component_at(index);
        if regenerate {
            self.regenerate();
        }
        removed
    }

    /// Swap the component at `index` for another, keeping its position
    pub fn replace_component(
        &mut self,
        stage: StageId,
        index: usize,
        component: Box<dyn Component<D>>,
        regenerate: bool,
    ) -> Result<()> {
        self.check_stage_match(stage, component.as_ref())?;
        if index >= self.stage(stage).len() {
            return Err(ForgeError::ComponentIndex {
                stage: self.stage(stage).name().to_string(),
                index,
            });
        }
        if regenerate {
            let mut trial = self.trial(stage, Some(index));
            let mut candidate = component.clone();
            if !trial.candidate_compatible(stage, candidate.as_mut()) {
                return Err(self.compatibility_error(stage, component.as_ref()));
            }
        }

        let target = self.stage_mut(stage);
        target.remove_component_at(index);
        target.insert_component(index, component);
        if regenerate {
            self.regenerate();
        }
        Ok(())
    }

    /// Empty every stage, optionally only those of one phase or one sequence.
    /// Common stages are only cleared when no sequence is given.
    pub fn clear_components(
        &mut self,
        phase: Option<D::Phase>,
        sequence: Option<&SequenceId>,
        regenerate: bool,
    ) {
        let in_phase = |stage: &ConstructionStage<D>| phase.map_or(true, |p| stage.phase() == p);
        let only = sequence.map(|id| self.view().sequence_index(id));

        for (index, state) in self.sequences.iter_mut().enumerate() {
            if only.map_or(false, |only| only != index) {
                continue;
            }
            for stage in state.stages_mut() {
                if in_phase(stage) {
                    stage.clear_components();
                }
            }
        }
        if only.is_none() {
            for stage in &mut self.common_stages {
                if in_phase(stage) {
                    stage.clear_components();
                }
            }
        }

        if regenerate {
            self.regenerate();
        }
    }

    pub fn set_component_option(
        &mut self,
        stage: StageId,
        index: usize,
        option: &str,
        value: OptionValue,
        regenerate: bool,
    ) -> Result<()> {
        let target = self.stage_mut(stage);
        let stage_name = target.name();
        let component = target
            .component_mut(index)
            .ok_or_else(|| ForgeError::ComponentIndex {
                stage: stage_name.to_string(),
                index,
            })?;
        component.as_mut().set_option_value(option, value)?;
        if regenerate {
            self.regenerate();
        }
        Ok(())
    }

    fn check_stage_match(&self, stage: StageId, component: &dyn Component<D>) -> Result<()> {
        let target = self.stage(stage);
        if target.matches_component(component) {
            Ok(())
        } else {
            Err(ForgeError::StageMismatch {
                component: component.component_string(),
                stage: target.name().to_string(),
            })
        }
    }

    fn compatibility_error(&self, stage: StageId, component: &dyn Component<D>) -> ForgeError {
        ForgeError::Compatibility {
            component: component.instance_string(),
            stage: self.stage(stage).name().to_string(),
        }
    }

    // Regenerate

    pub fn regenerate(&mut self) {
        self.run(None);
    }

    /// Regenerate up to, but not including, `stop`
    pub fn regenerate_until(&mut self, stop: StageId) {
        self.run(Some(stop));
    }

    fn run(&mut self, stop: Option<StageId>) {
        self.manifest = OnceCell::new();
        self.incomplete = false;
        for state in &mut self.sequences {
            state.reset();
        }

        for &phase in D::Phase::all() {
            for stage in self.phase_stages(phase) {
                if Some(stage) == stop {
                    return;
                }
                self.process_stage(stage, phase);
            }
        }

        if self.incomplete {
            tracing::debug!("{} '{}' is incomplete", D::NAME, self.settings.name);
        }
    }

    fn phase_stages(&self, phase: D::Phase) -> Vec<StageId> {
        if phase.is_common() {
            if self.sequences.is_empty() {
                return Vec::new();
            }
            return self
                .common_stages
                .iter()
                .enumerate()
                .filter(|(_, stage)| stage.phase() == phase)
                .map(|(index, _)| StageId::common(index))
                .collect();
        }

        let mut stages = Vec::new();
        for state in &self.sequences {
            for (index, stage) in state.stages().iter().enumerate() {
                debug_assert!(!stage.is_common(), "sequence stage {} in a common phase", stage.name());
                if stage.phase() == phase {
                    stages.push(StageId::sequence(state.id(), index));
                }
            }
        }
        stages
    }

    /// Sequences a stage's components apply to
    fn targets(&self, stage: StageId) -> Vec<SequenceId> {
        match stage.sequence {
            Some(sequence) => vec![sequence],
            None => self.sequences(),
        }
    }

    fn state(
        &mut self,
        phase: Option<D::Phase>,
        origin: Option<(StageId, usize)>,
    ) -> ConstructionState<'_, D> {
        ConstructionState {
            settings: &self.settings,
            sequences: &mut self.sequences,
            common_stages: &self.common_stages,
            phase,
            origin,
        }
    }

    fn view(&self) -> ConstructionView<'_, D> {
        ConstructionView {
            sequences: &self.sequences,
            common_stages: &self.common_stages,
        }
    }

    fn process_stage(&mut self, stage: StageId, phase: D::Phase) {
        let targets = self.targets(stage);
        let Some(primary) = targets.first().copied() else {
            return;
        };

        // One component at a time, so each is judged with the others present
        let mut index = 0;
        while let Some(mut component) = self.stage_mut(stage).remove_component_at(index) {
            let state = self.state(Some(phase), None);
            if targets.iter().all(|id| component.is_compatible(id, &state)) {
                component.update_options(&primary, &state);
                self.stage_mut(stage).insert_component(index, component);
                index += 1;
            } else {
                tracing::debug!(
                    "Dropping incompatible {} from {}",
                    component.instance_string(),
                    self.stage(stage).name()
                );
            }
        }

        let requirement = self.stage(stage).requirement();
        if !self.incomplete
            && self.stage(stage).is_empty()
            && requirement != StageRequirement::Optional
        {
            match self.select_default(stage, phase, &targets) {
                Some(component) => {
                    tracing::debug!(
                        "Selected {} for {}",
                        component.instance_string(),
                        self.stage(stage).name()
                    );
                    self.stage_mut(stage).add_component(component);
                }
                None if requirement == StageRequirement::Mandatory => {
                    tracing::debug!(
                        "No compatible component for mandatory stage {}",
                        self.stage(stage).name()
                    );
                    self.incomplete = true;
                }
                None => {}
            }
        }

        if self.incomplete {
            return;
        }

        let components = self.stage(stage).components().to_vec();
        for sequence in &targets {
            for (index, component) in components.iter().enumerate() {
                let mut state = self.state(Some(phase), Some((stage, index)));
                component.create_steps(sequence, &mut state);
            }
        }
    }

    /// First compatible candidate: the stage's default type, then every
    /// registered type of the stage's kind in registration order
    fn select_default(
        &mut self,
        stage: StageId,
        phase: D::Phase,
        targets: &[SequenceId],
    ) -> Option<Box<dyn Component<D>>> {
        let registry = D::registry();
        let base_kind = self.stage(stage).base_kind();
        let default_type = self.stage(stage).default_type();

        let mut factories: Vec<&ComponentFactory<D>> = Vec::new();
        if let Some(factory) = default_type.and_then(|name| registry.get(name)) {
            debug_assert!(factory.kind.extends(base_kind));
            factories.push(factory);
        }
        factories.extend(
            registry
                .candidates(base_kind)
                .filter(|factory| Some(factory.type_name) != default_type),
        );

        let primary = *targets.first()?;
        for factory in factories {
            let mut component = factory.create();
            let state = self.state(Some(phase), None);
            component.update_options(&primary, &state);
            if targets.iter().all(|id| component.is_compatible(id, &state)) {
                return Some(component);
            }
        }
        None
    }

    /// A copy of this construction regenerated up to `stage`, with the
    /// component being replaced taken out. Adding to a singular stage counts
    /// as replacing its component.
    fn trial(&self, stage: StageId, replacing: Option<usize>) -> Self {
        let mut trial = self.clone();
        let target = trial.stage_mut(stage);
        match replacing {
            Some(index) => {
                target.remove_component_at(index);
            }
            None if target.is_singular() => target.clear_components(),
            None => {}
        }
        trial.regenerate_until(stage);
        trial
    }

    fn candidate_compatible(&mut self, stage: StageId, candidate: &mut dyn Component<D>) -> bool {
        let phase = self.stage(stage).phase();
        let targets = self.targets(stage);
        let Some(primary) = targets.first().copied() else {
            return false;
        };
        let state = self.state(Some(phase), None);
        candidate.update_options(&primary, &state);
        targets.iter().all(|id| candidate.is_compatible(id, &state))
    }

    /// Every registered component that could go in `stage`, optionally in
    /// place of the component at `replacing`. Candidates carry options
    /// refreshed for the construction at that point.
    pub fn find_compatible_components(
        &self,
        stage: StageId,
        replacing: Option<usize>,
    ) -> Vec<Box<dyn Component<D>>> {
        let mut trial = self.trial(stage, replacing);
        let base_kind = trial.stage(stage).base_kind();
        D::registry()
            .candidates(base_kind)
            .filter_map(|factory| {
                let mut candidate = factory.create();
                trial
                    .candidate_compatible(stage, candidate.as_mut())
                    .then_some(candidate)
            })
            .collect()
    }

    /// True if a component could be added to `stage` as things stand
    pub fn is_component_compatible(&self, stage: StageId, component: &dyn Component<D>) -> bool {
        if !self.stage(stage).matches_component(component) {
            return false;
        }
        let mut candidate = component.clone_box();
        self.trial(stage, None)
            .candidate_compatible(stage, candidate.as_mut())
    }

    // Queries

    /// True when a mandatory stage couldn't be filled on the last regenerate
    pub fn is_incomplete(&self) -> bool {
        self.incomplete
    }

    pub fn attribute(
        &self,
        attribute: D::Attribute,
        sequence: Option<&SequenceId>,
    ) -> Option<AttributeValue> {
        self.view().attribute(attribute, sequence)
    }

    pub fn attribute_value(&self, attribute: D::Attribute, sequence: Option<&SequenceId>) -> Option<f64> {
        self.attribute(attribute, sequence)
            .and_then(|value| value.as_scalar())
    }

    pub fn has_attribute(&self, attribute: D::Attribute, sequence: Option<&SequenceId>) -> bool {
        self.attribute(attribute, sequence).is_some()
    }

    pub fn has_component(
        &self,
        query: impl Into<ComponentQuery<D::Kind>>,
        sequence: Option<&SequenceId>,
    ) -> bool {
        self.view().has_component(query.into(), sequence)
    }

    pub fn find_components(
        &self,
        query: impl Into<ComponentQuery<D::Kind>>,
        sequence: Option<&SequenceId>,
    ) -> Vec<&dyn Component<D>> {
        self.view().find_components(query.into(), sequence)
    }

    pub fn steps(&self, sequence: &SequenceId) -> &[RecordedStep<D>] {
        self.sequence(sequence).steps()
    }

    pub fn phase_cost(&self, phase: D::Phase, sequence: Option<&SequenceId>) -> f64 {
        self.view().phase_cost(phase, sequence)
    }

    pub fn phase_weight(&self, phase: D::Phase, sequence: Option<&SequenceId>) -> f64 {
        self.view().phase_weight(phase, sequence)
    }

    pub fn total_cost(&self) -> f64 {
        self.sum_phases(|_| true, |phase| self.phase_cost(phase, None))
    }

    pub fn total_weight(&self) -> f64 {
        self.sum_phases(|_| true, |phase| self.phase_weight(phase, None))
    }

    /// Cost of the combat-ready construction, without spare munitions
    pub fn combat_cost(&self) -> f64 {
        self.sum_phases(|phase| phase.is_combat(), |phase| self.phase_cost(phase, None))
    }

    pub fn combat_weight(&self) -> f64 {
        self.sum_phases(|phase| phase.is_combat(), |phase| self.phase_weight(phase, None))
    }

    fn sum_phases(
        &self,
        include: impl Fn(D::Phase) -> bool,
        value: impl Fn(D::Phase) -> f64,
    ) -> f64 {
        D::Phase::all()
            .iter()
            .copied()
            .filter(|&phase| include(phase))
            .map(value)
            .sum()
    }

    /// The cost, weight and factor report, cached until the next regenerate
    pub fn manifest(&self) -> &Manifest {
        self.manifest
            .get_or_init(|| Manifest::build(&self.sequences))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gunsmith::domain::{RECEIVER_FEATURES_STAGE, RECEIVER_STAGE};
    use crate::gunsmith::{Weapon, WeaponPhase, WeaponType};

    fn handgun() -> Weapon {
        Weapon::with_sequence("Pistol", 12, WeaponType::Conventional)
    }

    #[test]
    fn test_trial_clears_singular_stage_in_copy() {
        let weapon = handgun();
        let primary = weapon.primary_sequence().unwrap();
        let receiver = weapon.find_stage(Some(&primary), RECEIVER_STAGE).unwrap();

        let trial = weapon.trial(receiver, None);
        assert!(trial.stage(receiver).is_empty());
        assert!(trial
            .steps(&primary)
            .iter()
            .all(|recorded| recorded.phase == WeaponPhase::Initialisation));

        assert_eq!(weapon.stage(receiver).len(), 1);
        assert!(weapon.has_component(ComponentQuery::Type("HandgunReceiver"), Some(&primary)));
    }

    #[test]
    fn test_trial_on_multiple_stage() {
        let mut weapon = handgun();
        let primary = weapon.primary_sequence().unwrap();
        let features = weapon
            .add_component_by_name(Some(&primary), RECEIVER_FEATURES_STAGE, "AutoFeature")
            .unwrap();

        assert_eq!(weapon.trial(features, None).stage(features).len(), 1);
        assert!(weapon.trial(features, Some(0)).stage(features).is_empty());
        assert_eq!(weapon.stage(features).len(), 1);
    }

    #[test]
    fn test_phase_stages() {
        let mut weapon = handgun();
        let first = weapon.primary_sequence().unwrap();
        let second = weapon.add_sequence(WeaponType::Launcher, true);

        assert_eq!(weapon.phase_stages(WeaponPhase::Stock), vec![StageId::common(1)]);
        // Sequence order: five conventional stages, then the launcher's two
        let receiver = weapon.phase_stages(WeaponPhase::Receiver);
        assert_eq!(receiver.len(), 7);
        assert!(receiver[..5].iter().all(|stage| stage.sequence == Some(first)));
        assert!(receiver[5..].iter().all(|stage| stage.sequence == Some(second)));

        let empty = Weapon::new("Nothing", 12);
        assert!(empty.phase_stages(WeaponPhase::Stock).is_empty());
    }

    #[test]
    fn test_targets() {
        let mut weapon = handgun();
        let first = weapon.primary_sequence().unwrap();
        let second = weapon.add_sequence(WeaponType::Conventional, true);
        let receiver = weapon.find_stage(Some(&second), RECEIVER_STAGE).unwrap();

        assert_eq!(weapon.targets(StageId::common(0)), vec![first, second]);
        assert_eq!(weapon.targets(receiver), vec![second]);
    }
}
