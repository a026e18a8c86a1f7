//! Slot options

use crate::construction::{
    AttributeModifier, Component, ComponentQuery, ComponentRegistry, ConstructionContext,
    ConstructionStep, Factor, NumericModifier,
};
use crate::core::types::{SequenceId, TechLevel};

use super::domain::{RobotAttribute, RobotComponentKind, RobotRule, Robotics};

#[derive(Debug)]
pub struct RobotOptionData {
    pub type_name: &'static str,
    pub name: &'static str,
    pub min_tech_level: TechLevel,
    pub slots: f64,
    pub cost: f64,
    pub armour: f64,
    /// Change to endurance
    pub endurance_percent: f64,
    pub note: Option<&'static str>,
    /// May be fitted more than once
    pub stackable: bool,
}

pub static ROBOT_OPTIONS: &[RobotOptionData] = &[
    RobotOptionData {
        type_name: "ArmourPlating",
        name: "Armour Plating",
        min_tech_level: 6,
        slots: 1.0,
        cost: 250.0,
        armour: 2.0,
        endurance_percent: 0.0,
        note: None,
        stackable: true,
    },
    RobotOptionData {
        type_name: "Vocaliser",
        name: "Vocaliser",
        min_tech_level: 8,
        slots: 0.0,
        cost: 500.0,
        armour: 0.0,
        endurance_percent: 0.0,
        note: Some("Can speak"),
        stackable: false,
    },
    RobotOptionData {
        type_name: "VisualSensor",
        name: "Visual Sensor",
        min_tech_level: 7,
        slots: 1.0,
        cost: 1000.0,
        armour: 0.0,
        endurance_percent: 0.0,
        note: Some("DM+1 to visual Recon checks"),
        stackable: false,
    },
    RobotOptionData {
        type_name: "FireExtinguisher",
        name: "Fire Extinguisher",
        min_tech_level: 6,
        slots: 1.0,
        cost: 100.0,
        armour: 0.0,
        endurance_percent: 0.0,
        note: None,
        stackable: false,
    },
    RobotOptionData {
        type_name: "ExtraPowerPack",
        name: "Extra Power Pack",
        min_tech_level: 8,
        slots: 2.0,
        cost: 2000.0,
        armour: 0.0,
        endurance_percent: 50.0,
        note: None,
        stackable: false,
    },
    RobotOptionData {
        type_name: "DroneInterface",
        name: "Drone Interface",
        min_tech_level: 9,
        slots: 1.0,
        cost: 100.0,
        armour: 0.0,
        endurance_percent: 0.0,
        note: Some("Controls drones through Electronics (Remote Ops)"),
        stackable: false,
    },
];

#[derive(Debug, Clone)]
pub struct RobotOption {
    data: &'static RobotOptionData,
}

impl RobotOption {
    pub fn new(data: &'static RobotOptionData) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &'static RobotOptionData {
        self.data
    }
}

impl Component<Robotics> for RobotOption {
    fn type_name(&self) -> &'static str {
        self.data.type_name
    }

    fn component_string(&self) -> String {
        self.data.name.to_string()
    }

    fn kind(&self) -> RobotComponentKind {
        RobotComponentKind::RobotOption
    }

    fn is_compatible(&self, sequence: &SequenceId, context: &dyn ConstructionContext<Robotics>) -> bool {
        let data = self.data;
        if context.tech_level() < data.min_tech_level {
            return false;
        }
        if !data.stackable && context.has_component(ComponentQuery::Type(data.type_name), Some(sequence)) {
            return false;
        }
        if !context.is_rule_enabled(RobotRule::StrictSlotLimits) {
            return true;
        }

        // Other options in the stage, this one is never among them
        let used: f64 = context
            .find_components(ComponentQuery::Kind(RobotComponentKind::RobotOption), Some(sequence))
            .into_iter()
            .filter_map(|component| component.downcast_ref::<RobotOption>())
            .map(|option| option.data.slots)
            .sum();
        let slots = context.attribute_value(RobotAttribute::Slots, Some(sequence)).unwrap_or(0.0);
        used + data.slots <= slots
    }

    fn create_steps(&self, sequence: &SequenceId, context: &mut dyn ConstructionContext<Robotics>) {
        let data = self.data;
        let mut step = ConstructionStep::new("Option", data.name)
            .with_cost(NumericModifier::Constant(data.cost));
        if data.slots != 0.0 {
            step = step.with_factor(Factor::delta(RobotAttribute::SlotsUsed, data.slots));
        }
        if data.armour != 0.0 {
            step = step.with_factor(Factor::delta(RobotAttribute::Armour, data.armour));
        }
        if data.endurance_percent != 0.0 {
            step = step.with_factor(Factor::modify(
                RobotAttribute::Endurance,
                AttributeModifier::percentage(data.endurance_percent),
            ));
        }
        if let Some(note) = data.note {
            step = step.with_note(note);
        }
        context.apply_step(sequence, step);
    }
}

pub(crate) fn register(registry: &mut ComponentRegistry<Robotics>) {
    for data in ROBOT_OPTIONS {
        registry.register_prototype(Box::new(RobotOption::new(data)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_armour_stacks() {
        let stackable: Vec<_> = ROBOT_OPTIONS.iter().filter(|o| o.stackable).map(|o| o.type_name).collect();
        assert_eq!(stackable, vec!["ArmourPlating"]);
    }

    #[test]
    fn test_type_names_unique() {
        let mut names: Vec<_> = ROBOT_OPTIONS.iter().map(|o| o.type_name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ROBOT_OPTIONS.len());
    }
}
