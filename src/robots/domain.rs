//! Robot domain definition: phases, attributes, component kinds and the
//! stage layout for robots and drones.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::construction::{
    AttributeId, ComponentKind, ComponentRegistry, ConstructionDomain, ConstructionPhase,
    ConstructionStage, StageRequirement,
};
use crate::core::error::ForgeError;
use crate::skills::SkillKey;

use super::{brains, chassis, finalisation, manipulators, options, skill_packages};

/// Marker type for robot constructions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Robotics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RobotPhase {
    Chassis,
    Locomotion,
    Manipulators,
    Brain,
    Skills,
    Options,
    Finalisation,
}

impl RobotPhase {
    pub const ALL: [RobotPhase; 7] = [
        RobotPhase::Chassis,
        RobotPhase::Locomotion,
        RobotPhase::Manipulators,
        RobotPhase::Brain,
        RobotPhase::Skills,
        RobotPhase::Options,
        RobotPhase::Finalisation,
    ];
}

impl fmt::Display for RobotPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl ConstructionPhase for RobotPhase {
    fn all() -> &'static [Self] {
        &Self::ALL
    }

    fn is_common(self) -> bool {
        false
    }

    fn is_cost_base(self) -> bool {
        self == RobotPhase::Chassis
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RobotAttribute {
    Size,
    Hits,
    Armour,
    Speed,
    Endurance,
    Slots,
    SlotsUsed,
    Bandwidth,
    BandwidthUsed,
    Intelligence,
    Manipulators,
    Skill(SkillKey),
}

impl fmt::Display for RobotAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RobotAttribute::SlotsUsed => write!(f, "Slots Used"),
            RobotAttribute::BandwidthUsed => write!(f, "Bandwidth Used"),
            RobotAttribute::Intelligence => write!(f, "INT"),
            RobotAttribute::Skill(key) => write!(f, "{}", key),
            other => write!(f, "{:?}", other),
        }
    }
}

impl AttributeId for RobotAttribute {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RobotComponentKind {
    Chassis,
    Locomotion,
    Manipulator,
    Brain,
    SkillPackage,
    RobotOption,
    Finalisation,
}

impl fmt::Display for RobotComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl ComponentKind for RobotComponentKind {
    fn extends(self, base: Self) -> bool {
        self == base
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RobotType {
    /// Autonomous, with a brain and skill packages
    Robot,
    /// Remotely operated, no brain
    Drone,
}

impl fmt::Display for RobotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl FromStr for RobotType {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "robot" => Ok(RobotType::Robot),
            "drone" => Ok(RobotType::Drone),
            _ => Err(ForgeError::Config(format!("unknown robot type '{}'", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RobotRule {
    /// Options may never take more slots than the chassis has
    StrictSlotLimits,
}

impl FromStr for RobotRule {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "strict_slot_limits" => Ok(RobotRule::StrictSlotLimits),
            _ => Err(ForgeError::Config(format!("unknown robot rule '{}'", s))),
        }
    }
}

pub const CHASSIS_STAGE: &str = "Chassis";
pub const LOCOMOTION_STAGE: &str = "Locomotion";
pub const MANIPULATORS_STAGE: &str = "Manipulators";
pub const BRAIN_STAGE: &str = "Brain";
pub const SKILLS_STAGE: &str = "Skills";
pub const OPTIONS_STAGE: &str = "Options";
pub const FINALISATION_STAGE: &str = "Finalisation";

type Stage = ConstructionStage<Robotics>;
use RobotComponentKind as Kind;
use RobotPhase as Phase;

impl ConstructionDomain for Robotics {
    type Phase = RobotPhase;
    type Attribute = RobotAttribute;
    type Kind = RobotComponentKind;
    type SequenceKind = RobotType;
    type Rule = RobotRule;

    const NAME: &'static str = "Robot";

    fn registry() -> &'static ComponentRegistry<Self> {
        static REGISTRY: OnceLock<ComponentRegistry<Robotics>> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            let mut registry = ComponentRegistry::new();
            chassis::register(&mut registry);
            manipulators::register(&mut registry);
            brains::register(&mut registry);
            skill_packages::register(&mut registry);
            options::register(&mut registry);
            finalisation::register(&mut registry);
            registry
        })
    }

    fn sequence_stages(kind: RobotType) -> Vec<Stage> {
        let mut stages = vec![
            Stage::singular(CHASSIS_STAGE, Phase::Chassis, Kind::Chassis, StageRequirement::Mandatory)
                .with_default("Size5Chassis"),
            Stage::singular(
                LOCOMOTION_STAGE,
                Phase::Locomotion,
                Kind::Locomotion,
                StageRequirement::Mandatory,
            )
            .with_default("WheelsLocomotion"),
            Stage::multiple(MANIPULATORS_STAGE, Phase::Manipulators, Kind::Manipulator),
        ];
        if kind == RobotType::Robot {
            stages.push(
                Stage::singular(BRAIN_STAGE, Phase::Brain, Kind::Brain, StageRequirement::Mandatory)
                    .with_default("BasicBrain"),
            );
            stages.push(Stage::multiple(SKILLS_STAGE, Phase::Skills, Kind::SkillPackage));
        }
        stages.push(Stage::multiple(OPTIONS_STAGE, Phase::Options, Kind::RobotOption));
        stages.push(
            Stage::singular(
                FINALISATION_STAGE,
                Phase::Finalisation,
                Kind::Finalisation,
                StageRequirement::Mandatory,
            )
            .with_default(finalisation::FINALISATION),
        );
        stages
    }

    fn common_stages() -> Vec<Stage> {
        Vec::new()
    }
}
