//! Last step of every robot.

use crate::construction::scalar::format_number;
use crate::construction::{
    Component, ComponentRegistry, ConstructionContext, ConstructionStep,
};
use crate::core::types::SequenceId;

use super::domain::{RobotAttribute, RobotComponentKind, Robotics};

pub const FINALISATION: &str = "RobotFinalisation";

/// Flags slot overruns. Only emits a step when there is something to report.
#[derive(Debug, Clone, Default)]
pub struct Finalisation;

impl Component<Robotics> for Finalisation {
    fn type_name(&self) -> &'static str {
        FINALISATION
    }

    fn component_string(&self) -> String {
        "Finalisation".to_string()
    }

    fn kind(&self) -> RobotComponentKind {
        RobotComponentKind::Finalisation
    }

    fn is_compatible(&self, _sequence: &SequenceId, _context: &dyn ConstructionContext<Robotics>) -> bool {
        true
    }

    fn create_steps(&self, sequence: &SequenceId, context: &mut dyn ConstructionContext<Robotics>) {
        let slots = context.attribute_value(RobotAttribute::Slots, Some(sequence)).unwrap_or(0.0);
        let used = context.attribute_value(RobotAttribute::SlotsUsed, Some(sequence)).unwrap_or(0.0);
        if used <= slots {
            return;
        }
        let step = ConstructionStep::new("Finalisation", "Finalisation").with_note(format!(
            "Over capacity: {} of {} slots used",
            format_number(used),
            format_number(slots)
        ));
        context.apply_step(sequence, step);
    }
}

pub(crate) fn register(registry: &mut ComponentRegistry<Robotics>) {
    registry.register::<Finalisation>();
}
