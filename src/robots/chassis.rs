//! Chassis sizes and locomotion.

use crate::construction::{
    AttributeModifier, Component, ComponentQuery, ComponentRegistry, ConstructionContext,
    ConstructionStep, Factor, NumericModifier,
};
use crate::core::types::{SequenceId, TechLevel};

use super::domain::{RobotAttribute, RobotComponentKind, Robotics};

#[derive(Debug)]
pub struct ChassisData {
    pub type_name: &'static str,
    pub size: u8,
    pub slots: f64,
    pub hits: f64,
    pub cost: f64,
    pub weight: f64,
}

pub static CHASSIS: &[ChassisData] = &[
    ChassisData { type_name: "Size1Chassis", size: 1, slots: 1.0, hits: 1.0, cost: 100.0, weight: 0.5 },
    ChassisData { type_name: "Size2Chassis", size: 2, slots: 2.0, hits: 4.0, cost: 200.0, weight: 2.0 },
    ChassisData { type_name: "Size3Chassis", size: 3, slots: 4.0, hits: 8.0, cost: 400.0, weight: 8.0 },
    ChassisData { type_name: "Size4Chassis", size: 4, slots: 8.0, hits: 12.0, cost: 800.0, weight: 25.0 },
    ChassisData { type_name: "Size5Chassis", size: 5, slots: 12.0, hits: 20.0, cost: 1000.0, weight: 60.0 },
    ChassisData { type_name: "Size6Chassis", size: 6, slots: 16.0, hits: 32.0, cost: 2000.0, weight: 150.0 },
    ChassisData { type_name: "Size7Chassis", size: 7, slots: 20.0, hits: 50.0, cost: 4000.0, weight: 400.0 },
    ChassisData { type_name: "Size8Chassis", size: 8, slots: 24.0, hits: 72.0, cost: 8000.0, weight: 1000.0 },
];

#[derive(Debug, Clone)]
pub struct Chassis {
    data: &'static ChassisData,
}

impl Chassis {
    pub fn new(data: &'static ChassisData) -> Self {
        Self { data }
    }

    pub fn size(&self) -> u8 {
        self.data.size
    }
}

impl Component<Robotics> for Chassis {
    fn type_name(&self) -> &'static str {
        self.data.type_name
    }

    fn component_string(&self) -> String {
        format!("Size {}", self.data.size)
    }

    fn kind(&self) -> RobotComponentKind {
        RobotComponentKind::Chassis
    }

    fn is_compatible(&self, _sequence: &SequenceId, _context: &dyn ConstructionContext<Robotics>) -> bool {
        true
    }

    fn create_steps(&self, sequence: &SequenceId, context: &mut dyn ConstructionContext<Robotics>) {
        let data = self.data;
        let step = ConstructionStep::new("Chassis", self.component_string())
            .with_cost(NumericModifier::Constant(data.cost))
            .with_weight(NumericModifier::Constant(data.weight))
            .with_factor(Factor::set(RobotAttribute::Size, data.size as f64))
            .with_factor(Factor::set(RobotAttribute::Slots, data.slots))
            .with_factor(Factor::set(RobotAttribute::Hits, data.hits))
            .with_factor(Factor::set(RobotAttribute::Armour, 0.0))
            .with_factor(Factor::set(RobotAttribute::SlotsUsed, 0.0));
        context.apply_step(sequence, step);
    }
}

/// Size of the chassis fitted to a sequence
pub fn chassis_size(sequence: &SequenceId, context: &dyn ConstructionContext<Robotics>) -> Option<u8> {
    context
        .find_components(ComponentQuery::Kind(RobotComponentKind::Chassis), Some(sequence))
        .into_iter()
        .find_map(|component| component.downcast_ref::<Chassis>())
        .map(Chassis::size)
}

#[derive(Debug)]
pub struct LocomotionData {
    pub type_name: &'static str,
    pub name: &'static str,
    pub min_tech_level: TechLevel,
    pub speed: f64,
    pub endurance: f64,
    /// Against the chassis cost
    pub cost_percent: f64,
    /// Change to the chassis slot count, rounded down
    pub slots_percent: f64,
}

pub static LOCOMOTION: &[LocomotionData] = &[
    LocomotionData {
        type_name: "WheelsLocomotion",
        name: "Wheels",
        min_tech_level: 5,
        speed: 5.0,
        endurance: 72.0,
        cost_percent: 0.0,
        slots_percent: 0.0,
    },
    LocomotionData {
        type_name: "TracksLocomotion",
        name: "Tracks",
        min_tech_level: 5,
        speed: 4.0,
        endurance: 72.0,
        cost_percent: 100.0,
        slots_percent: 0.0,
    },
    LocomotionData {
        type_name: "WalkerLocomotion",
        name: "Walker",
        min_tech_level: 8,
        speed: 5.0,
        endurance: 72.0,
        cost_percent: 200.0,
        slots_percent: -10.0,
    },
    LocomotionData {
        type_name: "GravLocomotion",
        name: "Grav",
        min_tech_level: 9,
        speed: 10.0,
        endurance: 24.0,
        cost_percent: 1900.0,
        slots_percent: -25.0,
    },
];

#[derive(Debug, Clone)]
pub struct Locomotion {
    data: &'static LocomotionData,
}

impl Locomotion {
    pub fn new(data: &'static LocomotionData) -> Self {
        Self { data }
    }
}

impl Component<Robotics> for Locomotion {
    fn type_name(&self) -> &'static str {
        self.data.type_name
    }

    fn component_string(&self) -> String {
        self.data.name.to_string()
    }

    fn kind(&self) -> RobotComponentKind {
        RobotComponentKind::Locomotion
    }

    fn is_compatible(&self, _sequence: &SequenceId, context: &dyn ConstructionContext<Robotics>) -> bool {
        context.tech_level() >= self.data.min_tech_level
    }

    fn create_steps(&self, sequence: &SequenceId, context: &mut dyn ConstructionContext<Robotics>) {
        let data = self.data;
        let mut step = ConstructionStep::new("Locomotion", data.name)
            .with_factor(Factor::set(RobotAttribute::Speed, data.speed))
            .with_factor(Factor::set(RobotAttribute::Endurance, data.endurance));
        if data.cost_percent != 0.0 {
            step = step.with_cost(NumericModifier::Percentage(data.cost_percent));
        }
        if data.slots_percent != 0.0 {
            step = step.with_factor(Factor::modify(
                RobotAttribute::Slots,
                AttributeModifier::percentage_round_down(data.slots_percent),
            ));
        }
        context.apply_step(sequence, step);
    }
}

pub(crate) fn register(registry: &mut ComponentRegistry<Robotics>) {
    for data in CHASSIS {
        registry.register_prototype(Box::new(Chassis::new(data)));
    }
    for data in LOCOMOTION {
        registry.register_prototype(Box::new(Locomotion::new(data)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chassis_sizes_in_order() {
        assert_eq!(CHASSIS.len(), 8);
        assert!(CHASSIS.iter().enumerate().all(|(i, c)| c.size as usize == i + 1));
    }

    #[test]
    fn test_chassis_names() {
        let chassis = Chassis::new(&CHASSIS[4]);
        assert_eq!(chassis.type_name(), "Size5Chassis");
        assert_eq!(chassis.component_string(), "Size 5");
    }
}
