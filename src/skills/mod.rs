//! Skill catalog
//!
//! An immutable table of Traveller skills and their specialities. Robot skill
//! packages pick from it through a single combined skill-and-speciality key.

pub mod catalog;
pub mod domain;
pub mod key;

pub use catalog::{find_skill, get_skill_definition, skills_in, SkillDefinition, SkillId, SKILL_CATALOG};
pub use domain::SkillCategory;
pub use key::SkillKey;
