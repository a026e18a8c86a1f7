//! Manipulators

use crate::construction::{
    Component, ComponentOption, ComponentRegistry, ConstructionContext, ConstructionStep, Factor,
    NumericModifier,
};
use crate::core::types::SequenceId;

use super::chassis::chassis_size;
use super::domain::{RobotAttribute, RobotComponentKind, Robotics};

const MAX_SIZE: i64 = 8;

/// An arm. Its size can't exceed the chassis size and defaults to it.
#[derive(Debug, Clone)]
pub struct Manipulator {
    size: ComponentOption,
}

impl Default for Manipulator {
    fn default() -> Self {
        Self {
            size: ComponentOption::integer("size", "Size", MAX_SIZE, 1, MAX_SIZE)
                .with_description("Manipulator size, up to the chassis size"),
        }
    }
}

impl Manipulator {
    pub fn size(&self) -> i64 {
        self.size.int_value()
    }

    pub fn strength(&self) -> i64 {
        2 * self.size() - 1
    }

    pub fn dexterity(&self) -> i64 {
        self.size()
    }
}

impl Component<Robotics> for Manipulator {
    fn type_name(&self) -> &'static str {
        "Manipulator"
    }

    fn component_string(&self) -> String {
        "Manipulator".to_string()
    }

    fn instance_string(&self) -> String {
        format!("Size {} Manipulator", self.size())
    }

    fn kind(&self) -> RobotComponentKind {
        RobotComponentKind::Manipulator
    }

    fn is_compatible(&self, sequence: &SequenceId, context: &dyn ConstructionContext<Robotics>) -> bool {
        chassis_size(sequence, context).is_some()
    }

    fn options(&self) -> Vec<&ComponentOption> {
        vec![&self.size]
    }

    fn options_mut(&mut self) -> Vec<&mut ComponentOption> {
        vec![&mut self.size]
    }

    fn update_options(&mut self, sequence: &SequenceId, context: &dyn ConstructionContext<Robotics>) {
        if let Some(size) = chassis_size(sequence, context) {
            self.size.set_integer_range(1, i64::from(size));
        }
    }

    fn create_steps(&self, sequence: &SequenceId, context: &mut dyn ConstructionContext<Robotics>) {
        let step = ConstructionStep::new("Manipulator", self.instance_string())
            .with_cost(NumericModifier::Constant(100.0 * self.size() as f64))
            .with_factor(Factor::delta(RobotAttribute::Manipulators, 1.0))
            .with_note(format!("STR {} DEX {}", self.strength(), self.dexterity()));
        context.apply_step(sequence, step);
    }
}

pub(crate) fn register(registry: &mut ComponentRegistry<Robotics>) {
    registry.register::<Manipulator>();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_characteristics_follow_size() {
        let mut arm = Manipulator::default();
        arm.size.set_integer_range(1, 5);
        assert_eq!(arm.size(), 5);
        assert_eq!(arm.strength(), 9);
        assert_eq!(arm.dexterity(), 5);
        assert_eq!(arm.instance_string(), "Size 5 Manipulator");
    }
}
