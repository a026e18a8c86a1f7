//! Common-stage fittings: mounting, stock, weapon features, weapon
//! accessories and multi-mounting.
//!
//! These components sit in stages shared by every sequence, so each one must
//! suit every sequence it is checked against and creates its steps once per
//! sequence.

use crate::construction::{
    AttributeModifier, Component, ComponentOption, ComponentQuery, ComponentRegistry,
    ConstructionContext, ConstructionStep, DiceRoll, Factor, NumericModifier,
};
use crate::core::types::{SequenceId, TechLevel};

use super::domain::{Gunsmith, WeaponAttribute, WeaponComponentKind};
use super::receivers::{receiver_class, ReceiverClass};

fn not_duplicated(
    type_name: &'static str,
    sequence: &SequenceId,
    context: &dyn ConstructionContext<Gunsmith>,
) -> bool {
    !context.has_component(ComponentQuery::Type(type_name), Some(sequence))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountingType {
    Bipod,
    Tripod,
}

#[derive(Debug, Clone)]
pub struct Mounting {
    mounting: MountingType,
}

impl Mounting {
    pub fn new(mounting: MountingType) -> Self {
        Self { mounting }
    }
}

impl Component<Gunsmith> for Mounting {
    fn type_name(&self) -> &'static str {
        match self.mounting {
            MountingType::Bipod => "Bipod",
            MountingType::Tripod => "Tripod",
        }
    }

    fn component_string(&self) -> String {
        self.type_name().to_string()
    }

    fn kind(&self) -> WeaponComponentKind {
        WeaponComponentKind::Mounting
    }

    fn is_compatible(&self, sequence: &SequenceId, context: &dyn ConstructionContext<Gunsmith>) -> bool {
        match (self.mounting, receiver_class(sequence, context)) {
            (_, None) => false,
            (MountingType::Bipod, Some(class)) => !class.is_handgun(),
            (MountingType::Tripod, Some(class)) => matches!(
                class,
                ReceiverClass::LightSupport | ReceiverClass::SupportLauncher
            ),
        }
    }

    fn create_steps(&self, sequence: &SequenceId, context: &mut dyn ConstructionContext<Gunsmith>) {
        let step = ConstructionStep::new("Mounting", self.component_string());
        let step = match self.mounting {
            MountingType::Bipod => step
                .with_cost(NumericModifier::Constant(50.0))
                .with_weight(NumericModifier::Constant(1.0))
                .with_note("Recoil penalties are ignored while deployed"),
            MountingType::Tripod => step
                .with_cost(NumericModifier::Constant(200.0))
                .with_weight(NumericModifier::Constant(5.0))
                .with_factor(Factor::delta(WeaponAttribute::Quickdraw, -2.0))
                .with_note("Takes a minor action to deploy"),
        };
        context.apply_step(sequence, step);
    }
}

#[derive(Debug, Clone)]
pub struct NoStock;

impl Component<Gunsmith> for NoStock {
    fn type_name(&self) -> &'static str {
        "NoStock"
    }

    fn component_string(&self) -> String {
        "None".to_string()
    }

    fn kind(&self) -> WeaponComponentKind {
        WeaponComponentKind::Stock
    }

    fn is_compatible(&self, _sequence: &SequenceId, _context: &dyn ConstructionContext<Gunsmith>) -> bool {
        true
    }

    fn create_steps(&self, sequence: &SequenceId, context: &mut dyn ConstructionContext<Gunsmith>) {
        let mut step = ConstructionStep::new("Stock", self.component_string());
        if !matches!(receiver_class(sequence, context), Some(class) if class.is_handgun()) {
            step = step
                .with_factor(Factor::delta(WeaponAttribute::Quickdraw, 1.0))
                .with_note("Inaccurate beyond Short range");
        }
        context.apply_step(sequence, step);
    }
}

#[derive(Debug, Clone)]
pub struct FullStock;

impl Component<Gunsmith> for FullStock {
    fn type_name(&self) -> &'static str {
        "FullStock"
    }

    fn component_string(&self) -> String {
        "Full".to_string()
    }

    fn kind(&self) -> WeaponComponentKind {
        WeaponComponentKind::Stock
    }

    fn is_compatible(&self, sequence: &SequenceId, context: &dyn ConstructionContext<Gunsmith>) -> bool {
        matches!(receiver_class(sequence, context), Some(class) if !class.is_handgun())
    }

    fn create_steps(&self, sequence: &SequenceId, context: &mut dyn ConstructionContext<Gunsmith>) {
        context.apply_step(sequence, ConstructionStep::new("Stock", self.component_string()));
    }
}

#[derive(Debug, Clone)]
pub struct FoldingStock {
    folded: ComponentOption,
}

impl Default for FoldingStock {
    fn default() -> Self {
        Self {
            folded: ComponentOption::boolean("folded", "Folded", false),
        }
    }
}

impl Component<Gunsmith> for FoldingStock {
    fn type_name(&self) -> &'static str {
        "FoldingStock"
    }

    fn component_string(&self) -> String {
        "Folding".to_string()
    }

    fn instance_string(&self) -> String {
        if self.folded.bool_value() {
            "Folding (Folded)".to_string()
        } else {
            self.component_string()
        }
    }

    fn kind(&self) -> WeaponComponentKind {
        WeaponComponentKind::Stock
    }

    fn is_compatible(&self, sequence: &SequenceId, context: &dyn ConstructionContext<Gunsmith>) -> bool {
        context.tech_level() >= 6
            && matches!(receiver_class(sequence, context), Some(class) if !class.is_handgun())
    }

    fn options(&self) -> Vec<&ComponentOption> {
        vec![&self.folded]
    }

    fn options_mut(&mut self) -> Vec<&mut ComponentOption> {
        vec![&mut self.folded]
    }

    fn create_steps(&self, sequence: &SequenceId, context: &mut dyn ConstructionContext<Gunsmith>) {
        let mut step = ConstructionStep::new("Stock", self.instance_string())
            .with_cost(NumericModifier::Percentage(10.0));
        if self.folded.bool_value() {
            step = step
                .with_factor(Factor::delta(WeaponAttribute::Quickdraw, 1.0))
                .with_note("Inaccurate beyond Short range while folded");
        }
        context.apply_step(sequence, step);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponFeatureType {
    Secure,
    Rugged,
}

#[derive(Debug, Clone)]
pub struct WeaponFeature {
    feature: WeaponFeatureType,
}

impl WeaponFeature {
    pub fn new(feature: WeaponFeatureType) -> Self {
        Self { feature }
    }
}

impl Component<Gunsmith> for WeaponFeature {
    fn type_name(&self) -> &'static str {
        match self.feature {
            WeaponFeatureType::Secure => "SecureWeapon",
            WeaponFeatureType::Rugged => "RuggedWeapon",
        }
    }

    fn component_string(&self) -> String {
        match self.feature {
            WeaponFeatureType::Secure => "Secure",
            WeaponFeatureType::Rugged => "Rugged",
        }
        .to_string()
    }

    fn kind(&self) -> WeaponComponentKind {
        WeaponComponentKind::WeaponFeature
    }

    fn is_compatible(&self, sequence: &SequenceId, context: &dyn ConstructionContext<Gunsmith>) -> bool {
        let min_tech_level: TechLevel = match self.feature {
            WeaponFeatureType::Secure => 8,
            WeaponFeatureType::Rugged => 5,
        };
        context.tech_level() >= min_tech_level && not_duplicated(self.type_name(), sequence, context)
    }

    fn create_steps(&self, sequence: &SequenceId, context: &mut dyn ConstructionContext<Gunsmith>) {
        let step = ConstructionStep::new("Weapon Feature", self.component_string());
        let step = match self.feature {
            WeaponFeatureType::Secure => step
                .with_cost(NumericModifier::Percentage(10.0))
                .with_note("Only fires for authorised users"),
            WeaponFeatureType::Rugged => step
                .with_cost(NumericModifier::Percentage(10.0))
                .with_weight(NumericModifier::Percentage(10.0))
                .with_note("DM+2 to checks to avoid malfunction"),
        };
        context.apply_step(sequence, step);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponAccessoryType {
    Scope,
    LaserSight,
}

#[derive(Debug, Clone)]
pub struct WeaponAccessory {
    accessory: WeaponAccessoryType,
}

impl WeaponAccessory {
    pub fn new(accessory: WeaponAccessoryType) -> Self {
        Self { accessory }
    }
}

impl Component<Gunsmith> for WeaponAccessory {
    fn type_name(&self) -> &'static str {
        match self.accessory {
            WeaponAccessoryType::Scope => "Scope",
            WeaponAccessoryType::LaserSight => "LaserSight",
        }
    }

    fn component_string(&self) -> String {
        match self.accessory {
            WeaponAccessoryType::Scope => "Scope",
            WeaponAccessoryType::LaserSight => "Laser Sight",
        }
        .to_string()
    }

    fn kind(&self) -> WeaponComponentKind {
        WeaponComponentKind::WeaponAccessory
    }

    fn is_compatible(&self, sequence: &SequenceId, context: &dyn ConstructionContext<Gunsmith>) -> bool {
        let min_tech_level: TechLevel = match self.accessory {
            WeaponAccessoryType::Scope => 5,
            WeaponAccessoryType::LaserSight => 8,
        };
        context.tech_level() >= min_tech_level && not_duplicated(self.type_name(), sequence, context)
    }

    fn create_steps(&self, sequence: &SequenceId, context: &mut dyn ConstructionContext<Gunsmith>) {
        let step = ConstructionStep::new("Weapon Accessory", self.component_string());
        let step = match self.accessory {
            WeaponAccessoryType::Scope => step
                .with_cost(NumericModifier::Constant(200.0))
                .with_weight(NumericModifier::Constant(0.5))
                .with_note("Aimed shots ignore range DMs up to Long range"),
            WeaponAccessoryType::LaserSight => step
                .with_cost(NumericModifier::Constant(100.0))
                .with_weight(NumericModifier::Constant(0.1))
                .with_note("DM+1 to attacks at Short range"),
        };
        context.apply_step(sequence, step);
    }
}

const MIN_MOUNTED: i64 = 2;
const MAX_MOUNTED: i64 = 6;

/// Several copies of the weapon fired together
#[derive(Debug, Clone)]
pub struct MultiMount {
    count: ComponentOption,
}

impl Default for MultiMount {
    fn default() -> Self {
        Self {
            count: ComponentOption::integer("count", "Weapons", MIN_MOUNTED, MIN_MOUNTED, MAX_MOUNTED)
                .with_description("Number of weapons mounted together"),
        }
    }
}

impl MultiMount {
    pub fn count(&self) -> i64 {
        self.count.int_value()
    }
}

impl Component<Gunsmith> for MultiMount {
    fn type_name(&self) -> &'static str {
        "MultiMount"
    }

    fn component_string(&self) -> String {
        "Multi-Mount".to_string()
    }

    fn instance_string(&self) -> String {
        format!("Multi-Mount ({})", self.count())
    }

    fn kind(&self) -> WeaponComponentKind {
        WeaponComponentKind::MultiMount
    }

    // Adds dice, so every sequence must already roll dice for damage
    fn is_compatible(&self, sequence: &SequenceId, context: &dyn ConstructionContext<Gunsmith>) -> bool {
        context
            .attribute(WeaponAttribute::Damage, Some(sequence))
            .and_then(|value| value.as_dice())
            .is_some()
    }

    fn options(&self) -> Vec<&ComponentOption> {
        vec![&self.count]
    }

    fn options_mut(&mut self) -> Vec<&mut ComponentOption> {
        vec![&mut self.count]
    }

    fn create_steps(&self, sequence: &SequenceId, context: &mut dyn ConstructionContext<Gunsmith>) {
        let extra = self.count() - 1;
        let percent = 100.0 * extra as f64;
        let step = ConstructionStep::new("Multi-Mount", self.instance_string())
            .with_cost(NumericModifier::Percentage(percent))
            .with_weight(NumericModifier::Percentage(percent))
            .with_factor(Factor::modify(
                WeaponAttribute::Damage,
                AttributeModifier::Dice(DiceRoll::new(extra as i32, 0)),
            ))
            .with_factor(Factor::modify(
                WeaponAttribute::AmmoCapacity,
                AttributeModifier::percentage_round_down(percent),
            ));
        context.apply_step(sequence, step);
    }
}

pub(crate) fn register(registry: &mut ComponentRegistry<Gunsmith>) {
    registry.register_prototype(Box::new(Mounting::new(MountingType::Bipod)));
    registry.register_prototype(Box::new(Mounting::new(MountingType::Tripod)));
    // NoStock first: it is the fallback when the full stock doesn't fit
    registry.register_prototype(Box::new(NoStock));
    registry.register_prototype(Box::new(FullStock));
    registry.register::<FoldingStock>();
    registry.register_prototype(Box::new(WeaponFeature::new(WeaponFeatureType::Secure)));
    registry.register_prototype(Box::new(WeaponFeature::new(WeaponFeatureType::Rugged)));
    registry.register_prototype(Box::new(WeaponAccessory::new(WeaponAccessoryType::Scope)));
    registry.register_prototype(Box::new(WeaponAccessory::new(WeaponAccessoryType::LaserSight)));
    registry.register::<MultiMount>();
}
