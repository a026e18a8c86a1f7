//! Skill categories for catalog grouping

use serde::{Deserialize, Serialize};

/// Broad grouping of skills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillCategory {
    /// Combat: weapons and tactics
    Combat,
    /// Physical: athletics, stealth, survival
    Physical,
    /// Technical: electronics, engineering, repair
    Technical,
    /// Vehicle: driving, flying, piloting
    Vehicle,
    /// Knowledge: administration, medicine, navigation
    Knowledge,
}

impl SkillCategory {
    /// Get all categories
    pub fn all() -> &'static [SkillCategory] {
        &[
            SkillCategory::Combat,
            SkillCategory::Physical,
            SkillCategory::Technical,
            SkillCategory::Vehicle,
            SkillCategory::Knowledge,
        ]
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            SkillCategory::Combat => "Combat",
            SkillCategory::Physical => "Physical",
            SkillCategory::Technical => "Technical",
            SkillCategory::Vehicle => "Vehicle",
            SkillCategory::Knowledge => "Knowledge",
        }
    }

    /// Categories a primitive robot brain can run packages for
    pub fn is_primitive(&self) -> bool {
        matches!(self, SkillCategory::Combat | SkillCategory::Physical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_categories() {
        assert_eq!(SkillCategory::all().len(), 5);
    }

    #[test]
    fn test_category_names() {
        assert_eq!(SkillCategory::Combat.name(), "Combat");
        assert_eq!(SkillCategory::Vehicle.name(), "Vehicle");
    }
}
