//! Robot and drone construction
//!
//! Robots reuse the construction engine with their own phases: a chassis sets
//! the slot budget, locomotion and manipulators follow, and robots (but not
//! drones) carry a brain whose bandwidth limits their skill packages.

pub mod brains;
pub mod chassis;
pub mod domain;
pub mod finalisation;
pub mod manipulators;
pub mod options;
pub mod skill_packages;

pub use brains::{fitted_brain, BrainData, BRAINS};
pub use chassis::{chassis_size, CHASSIS, LOCOMOTION};
pub use domain::{RobotAttribute, RobotComponentKind, RobotPhase, RobotRule, RobotType, Robotics};
pub use options::ROBOT_OPTIONS;
pub use skill_packages::SkillPackage;

use crate::construction::Construction;
use crate::core::types::SequenceId;
use crate::skills::SkillKey;

pub type Robot = Construction<Robotics>;

impl Construction<Robotics> {
    /// Skill levels granted to a sequence, in key order
    pub fn skills(&self, sequence: &SequenceId) -> Vec<(SkillKey, i64)> {
        self.sequence(sequence)
            .attributes()
            .iter()
            .filter_map(|(attribute, value)| match attribute {
                RobotAttribute::Skill(key) => value.as_scalar().map(|level| (key, level as i64)),
                _ => None,
            })
            .collect()
    }
}
