//! Skill plus optional speciality, the unit a skill package grants

use std::fmt;

use super::catalog::{find_skill, get_skill_definition, SkillDefinition, SkillId, SKILL_CATALOG};

/// A skill, optionally narrowed to one of its specialities
///
/// The speciality always points into the catalog, so keys are `Copy` and
/// two keys for the same speciality compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SkillKey {
    pub skill: SkillId,
    pub speciality: Option<&'static str>,
}

impl SkillKey {
    pub fn new(skill: SkillId) -> Self {
        Self {
            skill,
            speciality: None,
        }
    }

    /// None if the skill has no such speciality
    pub fn with_speciality(skill: SkillId, speciality: &str) -> Option<Self> {
        let speciality = get_skill_definition(skill)?.speciality(speciality)?;
        Some(Self {
            skill,
            speciality: Some(speciality),
        })
    }

    pub fn definition(&self) -> Option<&'static SkillDefinition> {
        get_skill_definition(self.skill)
    }

    /// A skill with specialities only goes above level 0 in one of them
    pub fn max_level(&self, cap: i64) -> i64 {
        match self.definition() {
            Some(def) if def.has_specialities() && self.speciality.is_none() => 0,
            _ => cap,
        }
    }

    /// Display label, also used as the value of the combined skill option
    pub fn label(&self) -> String {
        self.to_string()
    }

    /// Parse a label such as `Gun Combat (Slug)` or `Recon`
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        match label.split_once('(') {
            Some((skill, rest)) => {
                let speciality = rest.strip_suffix(')')?;
                let def = find_skill(skill)?;
                Self::with_speciality(def.id, speciality.trim())
            }
            None => find_skill(label).map(|def| Self::new(def.id)),
        }
    }

    /// Every skill and every speciality in catalog order
    pub fn all() -> Vec<SkillKey> {
        let mut keys = Vec::new();
        for def in SKILL_CATALOG {
            keys.push(SkillKey::new(def.id));
            keys.extend(def.specialities.iter().copied().map(|speciality| SkillKey {
                skill: def.id,
                speciality: Some(speciality),
            }));
        }
        keys
    }
}

impl fmt::Display for SkillKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.definition().map_or("Unknown", |def| def.name);
        match self.speciality {
            Some(speciality) => write!(f, "{} ({})", name, speciality),
            None => write!(f, "{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_round_trip() {
        let key = SkillKey::with_speciality(SkillId::GunCombat, "Slug").unwrap();
        assert_eq!(key.label(), "Gun Combat (Slug)");
        assert_eq!(SkillKey::from_label("Gun Combat (Slug)"), Some(key));
        assert_eq!(SkillKey::from_label("recon"), Some(SkillKey::new(SkillId::Recon)));
    }

    #[test]
    fn test_from_label_rejects_unknown() {
        assert_eq!(SkillKey::from_label("Gun Combat (Laser)"), None);
        assert_eq!(SkillKey::from_label("Gun Combat (Slug"), None);
        assert_eq!(SkillKey::from_label("Juggling"), None);
    }

    #[test]
    fn test_general_skill_capped_at_zero() {
        assert_eq!(SkillKey::new(SkillId::GunCombat).max_level(3), 0);
        assert_eq!(SkillKey::new(SkillId::Recon).max_level(3), 3);
    }

    #[test]
    fn test_all_keys_include_specialities() {
        let keys = SkillKey::all();
        assert!(keys.contains(&SkillKey::new(SkillId::Pilot)));
        assert!(keys.contains(&SkillKey::with_speciality(SkillId::Pilot, "Small Craft").unwrap()));
    }
}
