//! The capability interface components see while a construction regenerates.

use std::collections::BTreeSet;

use super::attribute::AttributeValue;
use super::component::{Component, ComponentQuery};
use super::domain::{ConstructionDomain, ConstructionPhase};
use super::sequence::SequenceState;
use super::stage::{ConstructionStage, StageId};
use super::step::ConstructionStep;
use crate::core::types::{SequenceId, TechLevel};

/// Construction-wide settings
#[derive(Debug, Clone)]
pub struct ConstructionSettings<D: ConstructionDomain> {
    pub name: String,
    pub tech_level: TechLevel,
    pub rules: BTreeSet<D::Rule>,
}

impl<D: ConstructionDomain> ConstructionSettings<D> {
    pub fn new(name: impl Into<String>, tech_level: TechLevel) -> Self {
        Self {
            name: name.into(),
            tech_level,
            rules: BTreeSet::new(),
        }
    }
}

/// What a component may ask of, and do to, the construction it belongs to
///
/// A `None` sequence filter means "any sequence": numeric attributes are
/// summed across sequences, dice and enum attributes come from the first
/// sequence that has them.
pub trait ConstructionContext<D: ConstructionDomain> {
    fn tech_level(&self) -> TechLevel;

    fn is_rule_enabled(&self, rule: D::Rule) -> bool;

    /// Sequence ids, primary first
    fn sequences(&self) -> Vec<SequenceId>;

    fn is_primary(&self, sequence: &SequenceId) -> bool;

    fn sequence_kind(&self, sequence: &SequenceId) -> D::SequenceKind;

    /// Phase being processed, `None` outside a regenerate
    fn current_phase(&self) -> Option<D::Phase>;

    fn attribute(
        &self,
        attribute: D::Attribute,
        sequence: Option<&SequenceId>,
    ) -> Option<AttributeValue>;

    fn attribute_value(&self, attribute: D::Attribute, sequence: Option<&SequenceId>) -> Option<f64> {
        self.attribute(attribute, sequence)
            .and_then(|value| value.as_scalar())
    }

    fn has_attribute(&self, attribute: D::Attribute, sequence: Option<&SequenceId>) -> bool {
        self.attribute(attribute, sequence).is_some()
    }

    /// Searches the sequence's own stages and the common stages
    fn has_component(&self, query: ComponentQuery<D::Kind>, sequence: Option<&SequenceId>) -> bool;

    fn find_components(
        &self,
        query: ComponentQuery<D::Kind>,
        sequence: Option<&SequenceId>,
    ) -> Vec<&dyn Component<D>>;

    fn phase_cost(&self, phase: D::Phase, sequence: Option<&SequenceId>) -> f64;

    fn phase_weight(&self, phase: D::Phase, sequence: Option<&SequenceId>) -> f64;

    /// Record a step against a sequence and apply its factors
    fn apply_step(&mut self, sequence: &SequenceId, step: ConstructionStep<D::Attribute>);
}

/// Read-only queries over a construction's sequences and common stages
pub(crate) struct ConstructionView<'a, D: ConstructionDomain> {
    pub sequences: &'a [SequenceState<D>],
    pub common_stages: &'a [ConstructionStage<D>],
}

impl<'a, D: ConstructionDomain> ConstructionView<'a, D> {
    /// Panics on an id the construction didn't hand out
    pub fn sequence_index(&self, sequence: &SequenceId) -> usize {
        match self.sequences.iter().position(|state| state.id() == *sequence) {
            Some(index) => index,
            None => panic!("unknown sequence {}", sequence),
        }
    }

    pub fn sequence(&self, sequence: &SequenceId) -> &'a SequenceState<D> {
        &self.sequences[self.sequence_index(sequence)]
    }

    pub fn attribute(
        &self,
        attribute: D::Attribute,
        sequence: Option<&SequenceId>,
    ) -> Option<AttributeValue> {
        if let Some(id) = sequence {
            return self.sequence(id).attribute(attribute).cloned();
        }

        let mut values = self
            .sequences
            .iter()
            .filter_map(|state| state.attribute(attribute));
        match values.next()? {
            AttributeValue::Scalar(first) => {
                let rest: f64 = values.filter_map(AttributeValue::as_scalar).sum();
                Some(AttributeValue::Scalar(first.with_value(first.value() + rest)))
            }
            other => Some(other.clone()),
        }
    }

    fn stages_for(&self, sequence: Option<&SequenceId>) -> Vec<&'a ConstructionStage<D>> {
        let sequences: &'a [SequenceState<D>] = match sequence {
            Some(id) => std::slice::from_ref(self.sequence(id)),
            None => self.sequences,
        };
        let mut stages: Vec<&'a ConstructionStage<D>> = Vec::new();
        for state in sequences {
            stages.extend(state.stages());
        }
        stages.extend(self.common_stages);
        stages
    }

    pub fn find_components(
        &self,
        query: ComponentQuery<D::Kind>,
        sequence: Option<&SequenceId>,
    ) -> Vec<&'a dyn Component<D>> {
        let mut found: Vec<&'a dyn Component<D>> = Vec::new();
        for stage in self.stages_for(sequence) {
            for component in stage.components() {
                if query.matches(component.as_ref()) {
                    found.push(component.as_ref());
                }
            }
        }
        found
    }

    pub fn has_component(&self, query: ComponentQuery<D::Kind>, sequence: Option<&SequenceId>) -> bool {
        self.stages_for(sequence).into_iter().any(|stage| {
            stage
                .components()
                .iter()
                .any(|component| query.matches(component.as_ref()))
        })
    }

    /// Common-phase costs are borne by the primary sequence only
    fn counted(&self, index: usize, phase: D::Phase) -> bool {
        index == 0 || !phase.is_common()
    }

    pub fn phase_cost(&self, phase: D::Phase, sequence: Option<&SequenceId>) -> f64 {
        match sequence {
            Some(id) => {
                let index = self.sequence_index(id);
                if self.counted(index, phase) {
                    self.sequences[index].phase_cost(phase)
                } else {
                    0.0
                }
            }
            None => self
                .sequences
                .iter()
                .enumerate()
                .filter(|(index, _)| self.counted(*index, phase))
                .map(|(_, state)| state.phase_cost(phase))
                .sum(),
        }
    }

    pub fn phase_weight(&self, phase: D::Phase, sequence: Option<&SequenceId>) -> f64 {
        match sequence {
            Some(id) => {
                let index = self.sequence_index(id);
                if self.counted(index, phase) {
                    self.sequences[index].phase_weight(phase)
                } else {
                    0.0
                }
            }
            None => self
                .sequences
                .iter()
                .enumerate()
                .filter(|(index, _)| self.counted(*index, phase))
                .map(|(_, state)| state.phase_weight(phase))
                .sum(),
        }
    }
}

/// The context handed to components during a regenerate
pub(crate) struct ConstructionState<'a, D: ConstructionDomain> {
    pub settings: &'a ConstructionSettings<D>,
    pub sequences: &'a mut [SequenceState<D>],
    pub common_stages: &'a [ConstructionStage<D>],
    pub phase: Option<D::Phase>,
    /// Stage and component index steps are attributed to
    pub origin: Option<(StageId, usize)>,
}

impl<'a, D: ConstructionDomain> ConstructionState<'a, D> {
    fn view(&self) -> ConstructionView<'_, D> {
        ConstructionView {
            sequences: &*self.sequences,
            common_stages: self.common_stages,
        }
    }
}

impl<'a, D: ConstructionDomain> ConstructionContext<D> for ConstructionState<'a, D> {
    fn tech_level(&self) -> TechLevel {
        self.settings.tech_level
    }

    fn is_rule_enabled(&self, rule: D::Rule) -> bool {
        self.settings.rules.contains(&rule)
    }

    fn sequences(&self) -> Vec<SequenceId> {
        self.sequences.iter().map(SequenceState::id).collect()
    }

    fn is_primary(&self, sequence: &SequenceId) -> bool {
        self.view().sequence_index(sequence) == 0
    }

    fn sequence_kind(&self, sequence: &SequenceId) -> D::SequenceKind {
        self.view().sequence(sequence).kind()
    }

    fn current_phase(&self) -> Option<D::Phase> {
        self.phase
    }

    fn attribute(
        &self,
        attribute: D::Attribute,
        sequence: Option<&SequenceId>,
    ) -> Option<AttributeValue> {
        self.view().attribute(attribute, sequence)
    }

    fn has_component(&self, query: ComponentQuery<D::Kind>, sequence: Option<&SequenceId>) -> bool {
        self.view().has_component(query, sequence)
    }

    fn find_components(
        &self,
        query: ComponentQuery<D::Kind>,
        sequence: Option<&SequenceId>,
    ) -> Vec<&dyn Component<D>> {
        self.view().find_components(query, sequence)
    }

    fn phase_cost(&self, phase: D::Phase, sequence: Option<&SequenceId>) -> f64 {
        self.view().phase_cost(phase, sequence)
    }

    fn phase_weight(&self, phase: D::Phase, sequence: Option<&SequenceId>) -> f64 {
        self.view().phase_weight(phase, sequence)
    }

    fn apply_step(&mut self, sequence: &SequenceId, step: ConstructionStep<D::Attribute>) {
        let (Some(phase), Some((stage, component))) = (self.phase, self.origin) else {
            tracing::warn!("Step {} applied outside of step creation", step.display_name());
            return;
        };
        let index = self.view().sequence_index(sequence);
        self.sequences[index].record_step(phase, stage, component, step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construction::{ConstructionDomain, DiceRoll, Factor, NumericModifier};
    use crate::gunsmith::domain::STOCK_STAGE;
    use crate::gunsmith::{Gunsmith, WeaponAttribute, WeaponComponentKind, WeaponPhase, WeaponType};

    fn two_sequences() -> Vec<SequenceState<Gunsmith>> {
        let mut sequences = vec![
            SequenceState::new(SequenceId::new(), WeaponType::Conventional),
            SequenceState::new(SequenceId::new(), WeaponType::Conventional),
        ];
        let stock = StageId::common(1);
        for (index, state) in sequences.iter_mut().enumerate() {
            let receiver = StageId::sequence(state.id(), 1);
            state.record_step(
                WeaponPhase::Receiver,
                receiver,
                0,
                ConstructionStep::new("Receiver", "Handgun")
                    .with_cost(NumericModifier::Constant(175.0))
                    .with_factor(Factor::set(WeaponAttribute::Quickdraw, 4.0 - 4.0 * index as f64)),
            );
            state.record_step(
                WeaponPhase::Stock,
                stock,
                0,
                ConstructionStep::new("Stock", "Full").with_cost(NumericModifier::Constant(50.0)),
            );
        }
        let second_receiver = StageId::sequence(sequences[1].id(), 1);
        sequences[1].record_step(
            WeaponPhase::Receiver,
            second_receiver,
            1,
            ConstructionStep::new("Receiver", "Damage")
                .with_factor(Factor::set(WeaponAttribute::Damage, DiceRoll::new(3, -3))),
        );
        sequences
    }

    #[test]
    fn test_unfiltered_attributes() {
        let sequences = two_sequences();
        let common = Gunsmith::common_stages();
        let view = ConstructionView {
            sequences: &sequences,
            common_stages: &common,
        };

        let quickdraw = view.attribute(WeaponAttribute::Quickdraw, None).and_then(|v| v.as_scalar());
        assert_eq!(quickdraw, Some(4.0));
        // Dice come from the first sequence that has them
        let damage = view.attribute(WeaponAttribute::Damage, None).and_then(|v| v.as_dice());
        assert_eq!(damage, Some(DiceRoll::new(3, -3)));
        assert!(view.attribute(WeaponAttribute::Damage, Some(&sequences[0].id())).is_none());
    }

    #[test]
    fn test_common_phase_cost_counted_once() {
        let sequences = two_sequences();
        let common = Gunsmith::common_stages();
        let view = ConstructionView {
            sequences: &sequences,
            common_stages: &common,
        };

        assert_eq!(view.phase_cost(WeaponPhase::Stock, None), 50.0);
        assert_eq!(view.phase_cost(WeaponPhase::Stock, Some(&sequences[1].id())), 0.0);
        assert_eq!(view.phase_cost(WeaponPhase::Receiver, None), 350.0);
    }

    #[test]
    #[should_panic(expected = "unknown sequence")]
    fn test_unknown_sequence_panics() {
        let sequences = two_sequences();
        let view = ConstructionView::<Gunsmith> {
            sequences: &sequences,
            common_stages: &[],
        };
        view.sequence(&SequenceId::new());
    }

    #[test]
    fn test_state_applies_steps_only_with_origin() {
        let mut sequences = two_sequences();
        let mut common = Gunsmith::common_stages();
        common[1].add_component(Gunsmith::registry().create("FullStock").unwrap());
        assert_eq!(common[1].name(), STOCK_STAGE);

        let mut settings = ConstructionSettings::<Gunsmith>::new("Test", 12);
        settings.rules.insert(crate::gunsmith::WeaponRule::LimitedAutofire);
        let primary = sequences[0].id();
        let before = sequences[0].steps().len();

        let mut state = ConstructionState {
            settings: &settings,
            sequences: &mut sequences,
            common_stages: &common,
            phase: Some(WeaponPhase::Stock),
            origin: None,
        };
        assert!(state.is_rule_enabled(crate::gunsmith::WeaponRule::LimitedAutofire));
        assert!(state.is_primary(&primary));
        assert!(state.has_component(ComponentQuery::Kind(WeaponComponentKind::Stock), Some(&primary)));

        state.apply_step(&primary, ConstructionStep::new("Stock", "Ignored"));
        state.origin = Some((StageId::common(1), 0));
        state.apply_step(&primary, ConstructionStep::new("Stock", "Recorded"));
        assert_eq!(sequences[0].steps().len(), before + 1);
        assert_eq!(sequences[0].steps()[before].step.name(), "Recorded");
    }
}
