//! Receiver features and fire rate.
//!
//! Fire rate runs after the receiver features so it sees the final Auto score.

use crate::construction::{
    Component, ComponentOption, ComponentQuery, ComponentRegistry, ConstructionContext,
    ConstructionStep, Factor, NumericModifier,
};
use crate::core::types::SequenceId;

use super::domain::{Gunsmith, WeaponAttribute, WeaponComponentKind, WeaponRule};
use super::receivers::receiver_class;

const MIN_AUTO: i64 = 2;
const MAX_AUTO: i64 = 4;
const LIMITED_MAX_AUTO: i64 = 3;

/// Selective fire with an Auto rating
#[derive(Debug, Clone)]
pub struct AutoFeature {
    level: ComponentOption,
}

impl Default for AutoFeature {
    fn default() -> Self {
        Self {
            level: ComponentOption::integer("level", "Auto Level", MIN_AUTO, MIN_AUTO, MAX_AUTO)
                .with_description("Number of attacks made with an automatic burst"),
        }
    }
}

impl AutoFeature {
    pub fn level(&self) -> i64 {
        self.level.int_value()
    }
}

impl Component<Gunsmith> for AutoFeature {
    fn type_name(&self) -> &'static str {
        "AutoFeature"
    }

    fn component_string(&self) -> String {
        "Auto".to_string()
    }

    fn instance_string(&self) -> String {
        format!("Auto {}", self.level())
    }

    fn kind(&self) -> WeaponComponentKind {
        WeaponComponentKind::ReceiverFeature
    }

    fn is_compatible(&self, sequence: &SequenceId, context: &dyn ConstructionContext<Gunsmith>) -> bool {
        context.tech_level() >= 6
            && matches!(receiver_class(sequence, context), Some(class) if !class.is_launcher())
            && !context.has_component(ComponentQuery::Type("AutoFeature"), Some(sequence))
    }

    fn options(&self) -> Vec<&ComponentOption> {
        vec![&self.level]
    }

    fn options_mut(&mut self) -> Vec<&mut ComponentOption> {
        vec![&mut self.level]
    }

    fn update_options(&mut self, _sequence: &SequenceId, context: &dyn ConstructionContext<Gunsmith>) {
        let max = if context.is_rule_enabled(WeaponRule::LimitedAutofire) {
            LIMITED_MAX_AUTO
        } else {
            MAX_AUTO
        };
        self.level.set_integer_range(MIN_AUTO, max);
    }

    fn create_steps(&self, sequence: &SequenceId, context: &mut dyn ConstructionContext<Gunsmith>) {
        let level = self.level();
        let step = ConstructionStep::new("Receiver Feature", self.instance_string())
            .with_cost(NumericModifier::Percentage(10.0 * level as f64))
            .with_factor(Factor::set(WeaponAttribute::Auto, level as f64));
        context.apply_step(sequence, step);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiverFeatureType {
    Lightweight,
    Bullpup,
}

#[derive(Debug, Clone)]
pub struct ReceiverFeature {
    feature: ReceiverFeatureType,
}

impl ReceiverFeature {
    pub fn new(feature: ReceiverFeatureType) -> Self {
        Self { feature }
    }
}

impl Component<Gunsmith> for ReceiverFeature {
    fn type_name(&self) -> &'static str {
        match self.feature {
            ReceiverFeatureType::Lightweight => "LightweightFeature",
            ReceiverFeatureType::Bullpup => "BullpupFeature",
        }
    }

    fn component_string(&self) -> String {
        match self.feature {
            ReceiverFeatureType::Lightweight => "Lightweight",
            ReceiverFeatureType::Bullpup => "Bullpup",
        }
        .to_string()
    }

    fn kind(&self) -> WeaponComponentKind {
        WeaponComponentKind::ReceiverFeature
    }

    fn is_compatible(&self, sequence: &SequenceId, context: &dyn ConstructionContext<Gunsmith>) -> bool {
        if context.has_component(ComponentQuery::Type(self.type_name()), Some(sequence)) {
            return false;
        }
        let Some(class) = receiver_class(sequence, context) else {
            return false;
        };
        match self.feature {
            ReceiverFeatureType::Lightweight => context.tech_level() >= 6,
            ReceiverFeatureType::Bullpup => {
                context.tech_level() >= 6 && !class.is_launcher() && !class.is_handgun()
            }
        }
    }

    fn create_steps(&self, sequence: &SequenceId, context: &mut dyn ConstructionContext<Gunsmith>) {
        let step = ConstructionStep::new("Receiver Feature", self.component_string());
        let step = match self.feature {
            ReceiverFeatureType::Lightweight => step
                .with_cost(NumericModifier::Percentage(25.0))
                .with_weight(NumericModifier::Percentage(-25.0))
                .with_factor(Factor::delta(WeaponAttribute::Quickdraw, 1.0)),
            ReceiverFeatureType::Bullpup => step
                .with_cost(NumericModifier::Percentage(25.0))
                .with_factor(Factor::delta(WeaponAttribute::Quickdraw, 2.0))
                .with_note("Awkward to fire from the off hand"),
        };
        context.apply_step(sequence, step);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireRateType {
    Rapid,
    VeryRapid,
}

impl FireRateType {
    fn auto_bonus(self) -> f64 {
        match self {
            FireRateType::Rapid => 1.0,
            FireRateType::VeryRapid => 2.0,
        }
    }
}

/// Increased rate of fire; only meaningful for weapons that already have Auto
#[derive(Debug, Clone)]
pub struct FireRate {
    rate: FireRateType,
}

impl FireRate {
    pub fn new(rate: FireRateType) -> Self {
        Self { rate }
    }
}

impl Component<Gunsmith> for FireRate {
    fn type_name(&self) -> &'static str {
        match self.rate {
            FireRateType::Rapid => "RapidFire",
            FireRateType::VeryRapid => "VeryRapidFire",
        }
    }

    fn component_string(&self) -> String {
        match self.rate {
            FireRateType::Rapid => "Rapid Fire",
            FireRateType::VeryRapid => "Very Rapid Fire",
        }
        .to_string()
    }

    fn kind(&self) -> WeaponComponentKind {
        WeaponComponentKind::FireRate
    }

    fn is_compatible(&self, sequence: &SequenceId, context: &dyn ConstructionContext<Gunsmith>) -> bool {
        let min_tech_level = match self.rate {
            FireRateType::Rapid => 7,
            FireRateType::VeryRapid => 8,
        };
        if context.tech_level() < min_tech_level {
            return false;
        }
        let Some(auto) = context.attribute_value(WeaponAttribute::Auto, Some(sequence)) else {
            return false;
        };
        !context.is_rule_enabled(WeaponRule::LimitedAutofire)
            || auto + self.rate.auto_bonus() <= LIMITED_MAX_AUTO as f64
    }

    fn create_steps(&self, sequence: &SequenceId, context: &mut dyn ConstructionContext<Gunsmith>) {
        let step = ConstructionStep::new("Fire Rate", self.component_string())
            .with_factor(Factor::delta(WeaponAttribute::Auto, self.rate.auto_bonus()));
        let step = match self.rate {
            FireRateType::Rapid => step.with_cost(NumericModifier::Percentage(20.0)),
            FireRateType::VeryRapid => step
                .with_cost(NumericModifier::Percentage(40.0))
                .with_note("Ammunition use is doubled"),
        };
        context.apply_step(sequence, step);
    }
}

pub(crate) fn register(registry: &mut ComponentRegistry<Gunsmith>) {
    registry.register::<AutoFeature>();
    registry.register_prototype(Box::new(ReceiverFeature::new(ReceiverFeatureType::Lightweight)));
    registry.register_prototype(Box::new(ReceiverFeature::new(ReceiverFeatureType::Bullpup)));
    registry.register_prototype(Box::new(FireRate::new(FireRateType::Rapid)));
    registry.register_prototype(Box::new(FireRate::new(FireRateType::VeryRapid)));
}
