//! Skill packages
//!
//! A package grants one skill at one level. The skill and its speciality are
//! picked through a single choice option holding the combined label
//! (`Gun Combat (Slug)`), so a package can never name a speciality that
//! belongs to a different skill.

use crate::construction::{
    Component, ComponentOption, ComponentQuery, ComponentRegistry, ConstructionContext,
    ConstructionStep, Factor, NumericModifier, OptionValue,
};
use crate::core::error::Result;
use crate::core::types::SequenceId;
use crate::skills::SkillKey;

use super::brains::fitted_brain;
use super::domain::{RobotAttribute, RobotComponentKind, Robotics};

const MAX_LEVEL: i64 = 4;

fn skill_labels() -> Vec<String> {
    SkillKey::all().into_iter().map(|key| key.label()).collect()
}

fn is_primitive_skill(key: SkillKey) -> bool {
    key.definition().map_or(false, |def| def.category.is_primitive())
}

#[derive(Debug, Clone)]
pub struct SkillPackage {
    skill: ComponentOption,
    level: ComponentOption,
}

impl Default for SkillPackage {
    fn default() -> Self {
        Self {
            skill: ComponentOption::choice("skill", "Skill", Some("Recon"), skill_labels(), false),
            level: ComponentOption::integer("level", "Level", 0, 0, MAX_LEVEL),
        }
    }
}

impl SkillPackage {
    pub fn new(key: SkillKey, level: i64) -> Result<Self> {
        let mut package = Self::default();
        package.skill.set_value(OptionValue::Choice(Some(key.label())))?;
        package.level.set_value(OptionValue::Int(level))?;
        Ok(package)
    }

    pub fn key(&self) -> Option<SkillKey> {
        self.skill.choice_value().and_then(SkillKey::from_label)
    }

    pub fn level(&self) -> i64 {
        self.level.int_value()
    }

    fn effective_level(&self, cap: i64) -> i64 {
        let max = self.key().map_or(0, |key| key.max_level(cap));
        self.level().min(max)
    }

    fn cost(level: i64) -> f64 {
        100.0 * 10f64.powi(level as i32)
    }
}

/// Other packages fitted to the sequence; a package being checked is never
/// among them
fn fitted_packages<'a>(
    sequence: &SequenceId,
    context: &'a dyn ConstructionContext<Robotics>,
) -> Vec<&'a SkillPackage> {
    context
        .find_components(ComponentQuery::Kind(RobotComponentKind::SkillPackage), Some(sequence))
        .into_iter()
        .filter_map(|component| component.downcast_ref::<SkillPackage>())
        .collect()
}

impl Component<Robotics> for SkillPackage {
    fn type_name(&self) -> &'static str {
        "SkillPackage"
    }

    fn component_string(&self) -> String {
        "Skill Package".to_string()
    }

    fn instance_string(&self) -> String {
        match self.key() {
            Some(key) => format!("{} {}", key, self.level()),
            None => self.component_string(),
        }
    }

    fn kind(&self) -> RobotComponentKind {
        RobotComponentKind::SkillPackage
    }

    fn is_compatible(&self, sequence: &SequenceId, context: &dyn ConstructionContext<Robotics>) -> bool {
        let (Some(brain), Some(key)) = (fitted_brain(sequence, context), self.key()) else {
            return false;
        };
        if brain.primitive && !is_primitive_skill(key) {
            return false;
        }

        let others = fitted_packages(sequence, context);
        if others.iter().any(|other| other.key() == Some(key)) {
            return false;
        }

        let bandwidth = context
            .attribute_value(RobotAttribute::Bandwidth, Some(sequence))
            .unwrap_or(0.0);
        let used: i64 = others.iter().map(|other| other.level()).sum();
        (used + self.effective_level(brain.skill_cap)) as f64 <= bandwidth
    }

    fn options(&self) -> Vec<&ComponentOption> {
        vec![&self.skill, &self.level]
    }

    fn options_mut(&mut self) -> Vec<&mut ComponentOption> {
        vec![&mut self.skill, &mut self.level]
    }

    fn update_options(&mut self, sequence: &SequenceId, context: &dyn ConstructionContext<Robotics>) {
        let Some(brain) = fitted_brain(sequence, context) else {
            return;
        };
        let max = self.key().map_or(0, |key| key.max_level(brain.skill_cap));
        self.level.set_integer_range(0, max);
    }

    fn create_steps(&self, sequence: &SequenceId, context: &mut dyn ConstructionContext<Robotics>) {
        let Some(key) = self.key() else {
            return;
        };
        let level = self.level();
        let step = ConstructionStep::new("Skill Package", self.instance_string())
            .with_cost(NumericModifier::Constant(Self::cost(level)))
            .with_factor(Factor::set(RobotAttribute::Skill(key), level as f64))
            .with_factor(Factor::delta(RobotAttribute::BandwidthUsed, level as f64));
        context.apply_step(sequence, step);
    }
}

pub(crate) fn register(registry: &mut ComponentRegistry<Robotics>) {
    registry.register::<SkillPackage>();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::SkillId;

    #[test]
    fn test_new_package() {
        let key = SkillKey::with_speciality(SkillId::GunCombat, "Slug").unwrap();
        let package = SkillPackage::new(key, 1).unwrap();
        assert_eq!(package.key(), Some(key));
        assert_eq!(package.instance_string(), "Gun Combat (Slug) 1");
    }

    #[test]
    fn test_general_skill_with_specialities_stays_at_zero() {
        let package = SkillPackage::new(SkillKey::new(SkillId::GunCombat), 2).unwrap();
        assert_eq!(package.effective_level(3), 0);
    }

    #[test]
    fn test_primitive_skills() {
        assert!(is_primitive_skill(SkillKey::new(SkillId::Recon)));
        assert!(!is_primitive_skill(SkillKey::new(SkillId::Admin)));
        assert!(skill_labels().contains(&"Melee (Blade)".to_string()));
    }

    #[test]
    fn test_cost_scales_by_level() {
        assert_eq!(SkillPackage::cost(0), 100.0);
        assert_eq!(SkillPackage::cost(2), 10000.0);
    }
}
