//! Ammunition for conventional weapons, loaded and spare.

use crate::construction::{
    Component, ComponentOption, ComponentQuery, ComponentRegistry, ConstructionContext,
    ConstructionStep, Factor, NumericModifier,
};
use crate::core::types::{SequenceId, TechLevel};

use super::domain::{Gunsmith, WeaponAttribute, WeaponComponentKind, LOADED_AMMO_STAGE};
use super::munitions::{quantity_option, MunitionQuantity};

#[derive(Debug)]
pub struct AmmoData {
    pub name: &'static str,
    pub loaded_type: &'static str,
    pub quantity_type: &'static str,
    pub min_tech_level: TechLevel,
    pub cost_per_round: f64,
    pub damage: f64,
    pub penetration: f64,
}

impl AmmoData {
    pub fn factors(&self) -> Vec<Factor<WeaponAttribute>> {
        let mut factors = Vec::new();
        if self.damage != 0.0 {
            factors.push(Factor::delta(WeaponAttribute::Damage, self.damage));
        }
        if self.penetration != 0.0 {
            factors.push(Factor::delta(WeaponAttribute::Penetration, self.penetration));
        }
        factors
    }

    fn is_compatible(&self, sequence: &SequenceId, context: &dyn ConstructionContext<Gunsmith>) -> bool {
        context.tech_level() >= self.min_tech_level
            && context.has_component(ComponentQuery::Kind(WeaponComponentKind::Calibre), Some(sequence))
    }
}

pub static AMMUNITION: &[AmmoData] = &[
    AmmoData {
        name: "Ball Ammunition",
        loaded_type: "LoadedBallAmmo",
        quantity_type: "BallAmmoQuantity",
        min_tech_level: 0,
        cost_per_round: 1.0,
        damage: 0.0,
        penetration: 0.0,
    },
    AmmoData {
        name: "Hollow Point Ammunition",
        loaded_type: "LoadedHollowPointAmmo",
        quantity_type: "HollowPointAmmoQuantity",
        min_tech_level: 5,
        cost_per_round: 2.0,
        damage: 1.0,
        penetration: -1.0,
    },
    AmmoData {
        name: "Armour Piercing Ammunition",
        loaded_type: "LoadedArmourPiercingAmmo",
        quantity_type: "ArmourPiercingAmmoQuantity",
        min_tech_level: 6,
        cost_per_round: 3.0,
        damage: 0.0,
        penetration: 2.0,
    },
];

/// A full load of the weapon's ammo capacity
#[derive(Debug, Clone)]
pub struct LoadedAmmo {
    ammo: &'static AmmoData,
}

impl LoadedAmmo {
    pub fn new(ammo: &'static AmmoData) -> Self {
        Self { ammo }
    }
}

impl Component<Gunsmith> for LoadedAmmo {
    fn type_name(&self) -> &'static str {
        self.ammo.loaded_type
    }

    fn component_string(&self) -> String {
        self.ammo.name.to_string()
    }

    fn kind(&self) -> WeaponComponentKind {
        WeaponComponentKind::LoadedAmmo
    }

    fn is_compatible(&self, sequence: &SequenceId, context: &dyn ConstructionContext<Gunsmith>) -> bool {
        self.ammo.is_compatible(sequence, context)
    }

    fn create_steps(&self, sequence: &SequenceId, context: &mut dyn ConstructionContext<Gunsmith>) {
        // Runs after the loaded magazine so the capacity is final
        let rounds = context
            .attribute_value(WeaponAttribute::AmmoCapacity, Some(sequence))
            .unwrap_or(0.0)
            .max(0.0);
        let step = ConstructionStep::new("Loaded Ammo", self.ammo.name)
            .with_cost(NumericModifier::Constant(rounds * self.ammo.cost_per_round))
            .with_factors(self.ammo.factors());
        context.apply_step(sequence, step);
    }
}

#[derive(Debug, Clone)]
pub struct AmmoQuantity {
    ammo: &'static AmmoData,
    count: ComponentOption,
}

impl AmmoQuantity {
    pub fn new(ammo: &'static AmmoData) -> Self {
        Self {
            ammo,
            count: quantity_option("Rounds", 100, 10_000),
        }
    }
}

impl Component<Gunsmith> for AmmoQuantity {
    fn type_name(&self) -> &'static str {
        self.ammo.quantity_type
    }

    fn component_string(&self) -> String {
        format!("Spare {}", self.ammo.name)
    }

    fn instance_string(&self) -> String {
        format!("{} x{}", self.ammo.name, self.count.int_value())
    }

    fn kind(&self) -> WeaponComponentKind {
        WeaponComponentKind::AmmoQuantity
    }

    fn is_compatible(&self, sequence: &SequenceId, context: &dyn ConstructionContext<Gunsmith>) -> bool {
        self.ammo.is_compatible(sequence, context)
    }

    fn options(&self) -> Vec<&ComponentOption> {
        vec![&self.count]
    }

    fn options_mut(&mut self) -> Vec<&mut ComponentOption> {
        vec![&mut self.count]
    }

    fn create_steps(&self, sequence: &SequenceId, context: &mut dyn ConstructionContext<Gunsmith>) {
        let rounds = self.count.int_value() as f64;
        let step = ConstructionStep::new("Spare Ammunition", self.instance_string())
            .with_cost(NumericModifier::Constant(rounds * self.ammo.cost_per_round))
            .with_factors(self.ammo.factors().into_iter().map(Factor::non_modifying));
        context.apply_step(sequence, step);
    }
}

impl MunitionQuantity for AmmoQuantity {
    fn quantity(&self) -> i64 {
        self.count.int_value()
    }

    fn loaded_stage(&self) -> &'static str {
        LOADED_AMMO_STAGE
    }

    fn create_loaded(&self) -> Box<dyn Component<Gunsmith>> {
        Box::new(LoadedAmmo::new(self.ammo))
    }
}

pub(crate) fn register_loaded(registry: &mut ComponentRegistry<Gunsmith>) {
    for ammo in AMMUNITION {
        registry.register_prototype(Box::new(LoadedAmmo::new(ammo)));
    }
}

pub(crate) fn register_quantities(registry: &mut ComponentRegistry<Gunsmith>) {
    for ammo in AMMUNITION {
        registry.register_prototype(Box::new(AmmoQuantity::new(ammo)));
    }
}
