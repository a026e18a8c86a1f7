//! Barrels and barrel accessories.

use crate::construction::{
    AttributeModifier, AttributeValue, Component, ComponentQuery, ComponentRegistry,
    ConstructionContext, ConstructionStep, Factor, NumericModifier,
};
use crate::core::types::SequenceId;

use super::domain::{Gunsmith, PhysicalSignature, WeaponAttribute, WeaponComponentKind};
use super::receivers::{receiver_class, ReceiverClass};

#[derive(Debug)]
pub struct BarrelData {
    pub type_name: &'static str,
    pub name: &'static str,
    pub receivers: &'static [ReceiverClass],
    pub range_percent: f64,
    pub quickdraw: f64,
    pub cost_percent: f64,
    pub weight_percent: f64,
}

// Registration order doubles as default selection: the standard barrel for
// each receiver comes before the shortened and lengthened variants.
pub static BARRELS: &[BarrelData] = &[
    BarrelData {
        type_name: "HandgunBarrel",
        name: "Handgun",
        receivers: &[ReceiverClass::Handgun],
        range_percent: 0.0,
        quickdraw: 0.0,
        cost_percent: 0.0,
        weight_percent: 0.0,
    },
    BarrelData {
        type_name: "AssaultBarrel",
        name: "Assault",
        receivers: &[ReceiverClass::Assault],
        range_percent: 0.0,
        quickdraw: 0.0,
        cost_percent: 0.0,
        weight_percent: 0.0,
    },
    BarrelData {
        type_name: "RifleBarrel",
        name: "Rifle",
        receivers: &[ReceiverClass::Longarm, ReceiverClass::LightSupport],
        range_percent: 0.0,
        quickdraw: 0.0,
        cost_percent: 0.0,
        weight_percent: 0.0,
    },
    BarrelData {
        type_name: "ShortBarrel",
        name: "Short",
        receivers: &[ReceiverClass::Handgun],
        range_percent: -50.0,
        quickdraw: 1.0,
        cost_percent: 0.0,
        weight_percent: -10.0,
    },
    BarrelData {
        type_name: "CarbineBarrel",
        name: "Carbine",
        receivers: &[ReceiverClass::Assault, ReceiverClass::Longarm],
        range_percent: -25.0,
        quickdraw: 1.0,
        cost_percent: 0.0,
        weight_percent: -10.0,
    },
    BarrelData {
        type_name: "LongBarrel",
        name: "Long",
        receivers: &[ReceiverClass::Longarm, ReceiverClass::LightSupport],
        range_percent: 25.0,
        quickdraw: -1.0,
        cost_percent: 10.0,
        weight_percent: 10.0,
    },
];

#[derive(Debug, Clone)]
pub struct Barrel {
    data: &'static BarrelData,
}

impl Barrel {
    pub fn new(data: &'static BarrelData) -> Self {
        Self { data }
    }
}

impl Component<Gunsmith> for Barrel {
    fn type_name(&self) -> &'static str {
        self.data.type_name
    }

    fn component_string(&self) -> String {
        self.data.name.to_string()
    }

    fn kind(&self) -> WeaponComponentKind {
        WeaponComponentKind::Barrel
    }

    fn is_compatible(&self, sequence: &SequenceId, context: &dyn ConstructionContext<Gunsmith>) -> bool {
        receiver_class(sequence, context).map_or(false, |class| self.data.receivers.contains(&class))
    }

    fn create_steps(&self, sequence: &SequenceId, context: &mut dyn ConstructionContext<Gunsmith>) {
        let data = self.data;
        let mut step = ConstructionStep::new("Barrel", data.name);
        if data.range_percent != 0.0 {
            // Shortened barrels lose whole metres of range
            let modifier = if data.range_percent < 0.0 {
                AttributeModifier::percentage_round_down(data.range_percent)
            } else {
                AttributeModifier::percentage(data.range_percent)
            };
            step = step.with_factor(Factor::modify(WeaponAttribute::Range, modifier));
        }
        if data.quickdraw != 0.0 {
            step = step.with_factor(Factor::delta(WeaponAttribute::Quickdraw, data.quickdraw));
        }
        if data.cost_percent != 0.0 {
            step = step.with_cost(NumericModifier::Percentage(data.cost_percent));
        }
        if data.weight_percent != 0.0 {
            step = step.with_weight(NumericModifier::Percentage(data.weight_percent));
        }
        context.apply_step(sequence, step);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarrelAccessoryType {
    Suppressor,
    MuzzleBrake,
}

impl BarrelAccessoryType {
    fn type_name(self) -> &'static str {
        match self {
            BarrelAccessoryType::Suppressor => "Suppressor",
            BarrelAccessoryType::MuzzleBrake => "MuzzleBrake",
        }
    }

    fn conflicts_with(self) -> BarrelAccessoryType {
        match self {
            BarrelAccessoryType::Suppressor => BarrelAccessoryType::MuzzleBrake,
            BarrelAccessoryType::MuzzleBrake => BarrelAccessoryType::Suppressor,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BarrelAccessory {
    accessory: BarrelAccessoryType,
}

impl BarrelAccessory {
    pub fn new(accessory: BarrelAccessoryType) -> Self {
        Self { accessory }
    }
}

impl Component<Gunsmith> for BarrelAccessory {
    fn type_name(&self) -> &'static str {
        self.accessory.type_name()
    }

    fn component_string(&self) -> String {
        match self.accessory {
            BarrelAccessoryType::Suppressor => "Suppressor",
            BarrelAccessoryType::MuzzleBrake => "Muzzle Brake",
        }
        .to_string()
    }

    fn kind(&self) -> WeaponComponentKind {
        WeaponComponentKind::BarrelAccessory
    }

    fn is_compatible(&self, sequence: &SequenceId, context: &dyn ConstructionContext<Gunsmith>) -> bool {
        let min_tech_level = match self.accessory {
            BarrelAccessoryType::Suppressor => 6,
            BarrelAccessoryType::MuzzleBrake => 5,
        };
        context.tech_level() >= min_tech_level
            && context.has_component(ComponentQuery::Kind(WeaponComponentKind::Barrel), Some(sequence))
            && !context.has_component(ComponentQuery::Type(self.accessory.type_name()), Some(sequence))
            && !context.has_component(
                ComponentQuery::Type(self.accessory.conflicts_with().type_name()),
                Some(sequence),
            )
    }

    fn create_steps(&self, sequence: &SequenceId, context: &mut dyn ConstructionContext<Gunsmith>) {
        let signature = context
            .attribute(WeaponAttribute::PhysicalSignature, Some(sequence))
            .and_then(|value| value.as_enum())
            .and_then(PhysicalSignature::from_label)
            .unwrap_or(PhysicalSignature::Normal);

        let step = ConstructionStep::new("Barrel Accessory", self.component_string());
        let step = match self.accessory {
            BarrelAccessoryType::Suppressor => step
                .with_cost(NumericModifier::Constant(250.0))
                .with_weight(NumericModifier::Constant(0.5))
                .with_factor(Factor::set(
                    WeaponAttribute::PhysicalSignature,
                    AttributeValue::Enum(signature.quieter().label()),
                ))
                .with_factor(Factor::delta(WeaponAttribute::Quickdraw, -1.0)),
            BarrelAccessoryType::MuzzleBrake => step
                .with_cost(NumericModifier::Constant(100.0))
                .with_weight(NumericModifier::Constant(0.2))
                .with_factor(Factor::set(
                    WeaponAttribute::PhysicalSignature,
                    AttributeValue::Enum(signature.louder().label()),
                ))
                .with_note("Recoil reduced"),
        };
        context.apply_step(sequence, step);
    }
}

pub(crate) fn register(registry: &mut ComponentRegistry<Gunsmith>) {
    for data in BARRELS {
        registry.register_prototype(Box::new(Barrel::new(data)));
    }
    registry.register_prototype(Box::new(BarrelAccessory::new(BarrelAccessoryType::Suppressor)));
    registry.register_prototype(Box::new(BarrelAccessory::new(BarrelAccessoryType::MuzzleBrake)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_conventional_receiver_has_a_barrel() {
        for class in [
            ReceiverClass::Handgun,
            ReceiverClass::Assault,
            ReceiverClass::Longarm,
            ReceiverClass::LightSupport,
        ] {
            assert!(BARRELS.iter().any(|b| b.receivers.contains(&class)), "{:?}", class);
        }
    }

    #[test]
    fn test_accessories_conflict() {
        assert_eq!(
            BarrelAccessoryType::Suppressor.conflicts_with(),
            BarrelAccessoryType::MuzzleBrake
        );
    }
}
