//! Robot brains

use crate::construction::{
    Component, ComponentQuery, ComponentRegistry, ConstructionContext, ConstructionStep, Factor,
    NumericModifier,
};
use crate::core::types::{SequenceId, TechLevel};

use super::domain::{RobotAttribute, RobotComponentKind, Robotics};

#[derive(Debug)]
pub struct BrainData {
    pub type_name: &'static str,
    pub name: &'static str,
    pub min_tech_level: TechLevel,
    pub intelligence: f64,
    pub bandwidth: f64,
    /// Highest level a skill package may have
    pub skill_cap: i64,
    /// Primitive brains only run combat and physical packages
    pub primitive: bool,
    pub cost: f64,
}

pub static BRAINS: &[BrainData] = &[
    BrainData {
        type_name: "PrimitiveBrain",
        name: "Primitive",
        min_tech_level: 7,
        intelligence: 1.0,
        bandwidth: 1.0,
        skill_cap: 1,
        primitive: true,
        cost: 1000.0,
    },
    BrainData {
        type_name: "BasicBrain",
        name: "Basic",
        min_tech_level: 8,
        intelligence: 3.0,
        bandwidth: 2.0,
        skill_cap: 1,
        primitive: false,
        cost: 4000.0,
    },
    BrainData {
        type_name: "AdvancedBrain",
        name: "Advanced",
        min_tech_level: 10,
        intelligence: 6.0,
        bandwidth: 4.0,
        skill_cap: 2,
        primitive: false,
        cost: 10000.0,
    },
    BrainData {
        type_name: "VeryAdvancedBrain",
        name: "Very Advanced",
        min_tech_level: 12,
        intelligence: 8.0,
        bandwidth: 8.0,
        skill_cap: 3,
        primitive: false,
        cost: 20000.0,
    },
    BrainData {
        type_name: "SelfAwareBrain",
        name: "Self-Aware",
        min_tech_level: 15,
        intelligence: 10.0,
        bandwidth: 16.0,
        skill_cap: 4,
        primitive: false,
        cost: 50000.0,
    },
];

#[derive(Debug, Clone)]
pub struct Brain {
    data: &'static BrainData,
}

impl Brain {
    pub fn new(data: &'static BrainData) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &'static BrainData {
        self.data
    }
}

impl Component<Robotics> for Brain {
    fn type_name(&self) -> &'static str {
        self.data.type_name
    }

    fn component_string(&self) -> String {
        self.data.name.to_string()
    }

    fn kind(&self) -> RobotComponentKind {
        RobotComponentKind::Brain
    }

    fn is_compatible(&self, _sequence: &SequenceId, context: &dyn ConstructionContext<Robotics>) -> bool {
        context.tech_level() >= self.data.min_tech_level
    }

    fn create_steps(&self, sequence: &SequenceId, context: &mut dyn ConstructionContext<Robotics>) {
        let step = ConstructionStep::new("Brain", self.data.name)
            .with_cost(NumericModifier::Constant(self.data.cost))
            .with_factor(Factor::set(RobotAttribute::Intelligence, self.data.intelligence))
            .with_factor(Factor::set(RobotAttribute::Bandwidth, self.data.bandwidth))
            .with_factor(Factor::set(RobotAttribute::BandwidthUsed, 0.0));
        context.apply_step(sequence, step);
    }
}

/// The brain fitted to a sequence
pub fn fitted_brain(
    sequence: &SequenceId,
    context: &dyn ConstructionContext<Robotics>,
) -> Option<&'static BrainData> {
    context
        .find_components(ComponentQuery::Kind(RobotComponentKind::Brain), Some(sequence))
        .into_iter()
        .find_map(|component| component.downcast_ref::<Brain>())
        .map(Brain::data)
}

pub(crate) fn register(registry: &mut ComponentRegistry<Robotics>) {
    for data in BRAINS {
        registry.register_prototype(Box::new(Brain::new(data)));
    }
}
