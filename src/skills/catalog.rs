//! Static skill definitions - the catalog every skill package draws from

use serde::{Deserialize, Serialize};

use super::domain::SkillCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SkillId {
    Admin,
    Athletics,
    Drive,
    Electronics,
    Engineer,
    Explosives,
    Flyer,
    GunCombat,
    HeavyWeapons,
    Mechanic,
    Medic,
    Melee,
    Navigation,
    Pilot,
    Recon,
    Stealth,
    Survival,
    Tactics,
    VaccSuit,
}

/// Definition of a skill
#[derive(Debug, Clone)]
pub struct SkillDefinition {
    pub id: SkillId,
    pub name: &'static str,
    pub category: SkillCategory,
    /// Empty for skills without specialities
    pub specialities: &'static [&'static str],
}

impl SkillDefinition {
    pub fn has_specialities(&self) -> bool {
        !self.specialities.is_empty()
    }

    /// The catalog's copy of a speciality name
    pub fn speciality(&self, name: &str) -> Option<&'static str> {
        self.specialities
            .iter()
            .copied()
            .find(|speciality| speciality.eq_ignore_ascii_case(name))
    }
}

/// Global skill catalog - static definitions
pub static SKILL_CATALOG: &[SkillDefinition] = &[
    SkillDefinition {
        id: SkillId::Admin,
        name: "Admin",
        category: SkillCategory::Knowledge,
        specialities: &[],
    },
    SkillDefinition {
        id: SkillId::Athletics,
        name: "Athletics",
        category: SkillCategory::Physical,
        specialities: &["Dexterity", "Endurance", "Strength"],
    },
    SkillDefinition {
        id: SkillId::Drive,
        name: "Drive",
        category: SkillCategory::Vehicle,
        specialities: &["Hovercraft", "Mole", "Track", "Walker", "Wheel"],
    },
    SkillDefinition {
        id: SkillId::Electronics,
        name: "Electronics",
        category: SkillCategory::Technical,
        specialities: &["Comms", "Computers", "Remote Ops", "Sensors"],
    },
    SkillDefinition {
        id: SkillId::Engineer,
        name: "Engineer",
        category: SkillCategory::Technical,
        specialities: &["J-drive", "Life Support", "M-drive", "Power"],
    },
    SkillDefinition {
        id: SkillId::Explosives,
        name: "Explosives",
        category: SkillCategory::Combat,
        specialities: &[],
    },
    SkillDefinition {
        id: SkillId::Flyer,
        name: "Flyer",
        category: SkillCategory::Vehicle,
        specialities: &["Airship", "Grav", "Ornithopter", "Rotor", "Wing"],
    },
    SkillDefinition {
        id: SkillId::GunCombat,
        name: "Gun Combat",
        category: SkillCategory::Combat,
        specialities: &["Archaic", "Energy", "Slug"],
    },
    SkillDefinition {
        id: SkillId::HeavyWeapons,
        name: "Heavy Weapons",
        category: SkillCategory::Combat,
        specialities: &["Artillery", "Man Portable", "Vehicle"],
    },
    SkillDefinition {
        id: SkillId::Mechanic,
        name: "Mechanic",
        category: SkillCategory::Technical,
        specialities: &[],
    },
    SkillDefinition {
        id: SkillId::Medic,
        name: "Medic",
        category: SkillCategory::Knowledge,
        specialities: &[],
    },
    SkillDefinition {
        id: SkillId::Melee,
        name: "Melee",
        category: SkillCategory::Combat,
        specialities: &["Blade", "Bludgeon", "Natural", "Unarmed"],
    },
    SkillDefinition {
        id: SkillId::Navigation,
        name: "Navigation",
        category: SkillCategory::Knowledge,
        specialities: &[],
    },
    SkillDefinition {
        id: SkillId::Pilot,
        name: "Pilot",
        category: SkillCategory::Vehicle,
        specialities: &["Capital Ships", "Small Craft", "Spacecraft"],
    },
    SkillDefinition {
        id: SkillId::Recon,
        name: "Recon",
        category: SkillCategory::Physical,
        specialities: &[],
    },
    SkillDefinition {
        id: SkillId::Stealth,
        name: "Stealth",
        category: SkillCategory::Physical,
        specialities: &[],
    },
    SkillDefinition {
        id: SkillId::Survival,
        name: "Survival",
        category: SkillCategory::Physical,
        specialities: &[],
    },
    SkillDefinition {
        id: SkillId::Tactics,
        name: "Tactics",
        category: SkillCategory::Combat,
        specialities: &["Military", "Naval"],
    },
    SkillDefinition {
        id: SkillId::VaccSuit,
        name: "Vacc Suit",
        category: SkillCategory::Physical,
        specialities: &[],
    },
];

/// Get definition for a skill
pub fn get_skill_definition(id: SkillId) -> Option<&'static SkillDefinition> {
    SKILL_CATALOG.iter().find(|def| def.id == id)
}

/// Look a skill up by display name, ignoring case
pub fn find_skill(name: &str) -> Option<&'static SkillDefinition> {
    SKILL_CATALOG
        .iter()
        .find(|def| def.name.eq_ignore_ascii_case(name.trim()))
}

pub fn skills_in(category: SkillCategory) -> impl Iterator<Item = &'static SkillDefinition> {
    SKILL_CATALOG.iter().filter(move |def| def.category == category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_skill_defined_once() {
        let mut ids: Vec<_> = SKILL_CATALOG.iter().map(|def| def.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), SKILL_CATALOG.len());
    }

    #[test]
    fn test_get_skill_definition() {
        let def = get_skill_definition(SkillId::GunCombat).unwrap();
        assert_eq!(def.name, "Gun Combat");
        assert_eq!(def.speciality("slug"), Some("Slug"));
        assert_eq!(def.speciality("Laser"), None);
    }

    #[test]
    fn test_find_skill_by_name() {
        assert_eq!(find_skill("vacc suit").map(|def| def.id), Some(SkillId::VaccSuit));
        assert!(find_skill("Basket Weaving").is_none());
    }

    #[test]
    fn test_every_category_has_skills() {
        for category in SkillCategory::all() {
            assert!(skills_in(*category).next().is_some(), "{:?}", category);
        }
    }
}
