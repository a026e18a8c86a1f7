//! First and last steps of every weapon.

use crate::construction::{
    AttributeValue, Component, ComponentRegistry, ConstructionContext, ConstructionPhase,
    ConstructionStep, Factor,
};
use crate::core::types::SequenceId;

use super::domain::{
    Gunsmith, PhysicalSignature, WeaponAttribute, WeaponComponentKind, WeaponPhase, WeaponRule,
};

pub const INITIALISATION: &str = "WeaponInitialisation";
pub const FINALISATION: &str = "WeaponFinalisation";

/// Kilograms of combat weight per point of Quickdraw lost
const QUICKDRAW_WEIGHT_STEP: f64 = 5.0;

/// Baseline attributes every sequence starts from
#[derive(Debug, Clone, Default)]
pub struct Initialisation;

impl Component<Gunsmith> for Initialisation {
    fn type_name(&self) -> &'static str {
        INITIALISATION
    }

    fn component_string(&self) -> String {
        "Initialisation".to_string()
    }

    fn kind(&self) -> WeaponComponentKind {
        WeaponComponentKind::Initialisation
    }

    fn is_compatible(&self, _sequence: &SequenceId, _context: &dyn ConstructionContext<Gunsmith>) -> bool {
        true
    }

    fn create_steps(&self, sequence: &SequenceId, context: &mut dyn ConstructionContext<Gunsmith>) {
        let step = ConstructionStep::new("Initialisation", "Initialisation")
            .with_factor(Factor::set(
                WeaponAttribute::PhysicalSignature,
                AttributeValue::Enum(PhysicalSignature::Normal.label()),
            ))
            .with_factor(Factor::set(WeaponAttribute::Penetration, 0.0));
        context.apply_step(sequence, step);
    }
}

/// Clamps and rule-driven adjustments once everything else is fitted
#[derive(Debug, Clone, Default)]
pub struct Finalisation;

impl Finalisation {
    fn combat_weight(context: &dyn ConstructionContext<Gunsmith>) -> f64 {
        WeaponPhase::all()
            .iter()
            .copied()
            .filter(|phase| phase.is_combat() && *phase != WeaponPhase::Finalisation)
            .map(|phase| context.phase_weight(phase, None))
            .sum()
    }
}

impl Component<Gunsmith> for Finalisation {
    fn type_name(&self) -> &'static str {
        FINALISATION
    }

    fn component_string(&self) -> String {
        "Finalisation".to_string()
    }

    fn kind(&self) -> WeaponComponentKind {
        WeaponComponentKind::Finalisation
    }

    fn is_compatible(&self, _sequence: &SequenceId, _context: &dyn ConstructionContext<Gunsmith>) -> bool {
        true
    }

    fn create_steps(&self, sequence: &SequenceId, context: &mut dyn ConstructionContext<Gunsmith>) {
        let mut factors = Vec::new();

        let capacity = context.attribute_value(WeaponAttribute::AmmoCapacity, Some(sequence));
        if matches!(capacity, Some(value) if value < 1.0) {
            factors.push(Factor::set(WeaponAttribute::AmmoCapacity, 1.0));
        }

        if context.is_rule_enabled(WeaponRule::QuickdrawWeightPenalty) && context.is_primary(sequence) {
            let penalty = (Self::combat_weight(context) / QUICKDRAW_WEIGHT_STEP).floor();
            if penalty > 0.0 {
                factors.push(Factor::delta(WeaponAttribute::Quickdraw, -penalty));
            }
        }

        if factors.is_empty() {
            return;
        }
        let step = ConstructionStep::new("Finalisation", "Finalisation").with_factors(factors);
        context.apply_step(sequence, step);
    }
}

pub(crate) fn register_initialisation(registry: &mut ComponentRegistry<Gunsmith>) {
    registry.register::<Initialisation>();
}

pub(crate) fn register_finalisation(registry: &mut ComponentRegistry<Gunsmith>) {
    registry.register::<Finalisation>();
}
