//! Magazines, loaded and spare.
//!
//! Both forms share a `MagazineBehavior` row describing what a magazine of
//! that type does to the weapon.

use crate::construction::{
    AttributeModifier, Component, ComponentOption, ComponentRegistry, ConstructionContext,
    ConstructionStep, Factor, NumericModifier,
};
use crate::core::types::{SequenceId, TechLevel};

use super::domain::{Gunsmith, WeaponAttribute, WeaponComponentKind, LOADED_MAGAZINE_STAGE};
use super::munitions::{quantity_option, MunitionQuantity};
use super::receivers::uses_removable_magazines;

#[derive(Debug)]
pub struct MagazineBehavior {
    pub name: &'static str,
    pub loaded_type: &'static str,
    pub quantity_type: &'static str,
    pub min_tech_level: TechLevel,
    /// Rounded down
    pub capacity_percent: f64,
    pub quickdraw: f64,
    /// Per magazine, against the receiver cost
    pub cost_percent: f64,
    pub weight_percent: f64,
}

impl MagazineBehavior {
    pub fn is_compatible(&self, sequence: &SequenceId, context: &dyn ConstructionContext<Gunsmith>) -> bool {
        context.tech_level() >= self.min_tech_level && uses_removable_magazines(sequence, context)
    }

    pub fn factors(&self) -> Vec<Factor<WeaponAttribute>> {
        let mut factors = Vec::new();
        if self.capacity_percent != 0.0 {
            factors.push(Factor::modify(
                WeaponAttribute::AmmoCapacity,
                AttributeModifier::percentage_round_down(self.capacity_percent),
            ));
        }
        if self.quickdraw != 0.0 {
            factors.push(Factor::delta(WeaponAttribute::Quickdraw, self.quickdraw));
        }
        factors
    }

    pub fn cost(&self, count: i64) -> NumericModifier {
        NumericModifier::Percentage(self.cost_percent * count as f64)
    }

    pub fn weight(&self, count: i64) -> NumericModifier {
        NumericModifier::Percentage(self.weight_percent * count as f64)
    }
}

pub static MAGAZINES: &[MagazineBehavior] = &[
    MagazineBehavior {
        name: "Standard Magazine",
        loaded_type: "LoadedStandardMagazine",
        quantity_type: "StandardMagazineQuantity",
        min_tech_level: 0,
        capacity_percent: 0.0,
        quickdraw: 0.0,
        cost_percent: 5.0,
        weight_percent: 10.0,
    },
    MagazineBehavior {
        name: "Extended Magazine",
        loaded_type: "LoadedExtendedMagazine",
        quantity_type: "ExtendedMagazineQuantity",
        min_tech_level: 0,
        capacity_percent: 50.0,
        quickdraw: -1.0,
        cost_percent: 10.0,
        weight_percent: 15.0,
    },
    MagazineBehavior {
        name: "Drum Magazine",
        loaded_type: "LoadedDrumMagazine",
        quantity_type: "DrumMagazineQuantity",
        min_tech_level: 6,
        capacity_percent: 200.0,
        quickdraw: -2.0,
        cost_percent: 20.0,
        weight_percent: 40.0,
    },
];

#[derive(Debug, Clone)]
pub struct LoadedMagazine {
    behavior: &'static MagazineBehavior,
}

impl LoadedMagazine {
    pub fn new(behavior: &'static MagazineBehavior) -> Self {
        Self { behavior }
    }

    pub fn behavior(&self) -> &'static MagazineBehavior {
        self.behavior
    }
}

impl Component<Gunsmith> for LoadedMagazine {
    fn type_name(&self) -> &'static str {
        self.behavior.loaded_type
    }

    fn component_string(&self) -> String {
        self.behavior.name.to_string()
    }

    fn kind(&self) -> WeaponComponentKind {
        WeaponComponentKind::LoadedMagazine
    }

    fn is_compatible(&self, sequence: &SequenceId, context: &dyn ConstructionContext<Gunsmith>) -> bool {
        self.behavior.is_compatible(sequence, context)
    }

    fn create_steps(&self, sequence: &SequenceId, context: &mut dyn ConstructionContext<Gunsmith>) {
        let step = ConstructionStep::new("Loaded Magazine", self.behavior.name)
            .with_cost(self.behavior.cost(1))
            .with_weight(self.behavior.weight(1))
            .with_factors(self.behavior.factors());
        context.apply_step(sequence, step);
    }
}

#[derive(Debug, Clone)]
pub struct MagazineQuantity {
    behavior: &'static MagazineBehavior,
    count: ComponentOption,
}

impl MagazineQuantity {
    pub fn new(behavior: &'static MagazineBehavior) -> Self {
        Self {
            behavior,
            count: quantity_option("Magazines", 1, 100),
        }
    }
}

impl Component<Gunsmith> for MagazineQuantity {
    fn type_name(&self) -> &'static str {
        self.behavior.quantity_type
    }

    fn component_string(&self) -> String {
        format!("Spare {}", self.behavior.name)
    }

    fn instance_string(&self) -> String {
        format!("{} x{}", self.behavior.name, self.count.int_value())
    }

    fn kind(&self) -> WeaponComponentKind {
        WeaponComponentKind::MagazineQuantity
    }

    fn is_compatible(&self, sequence: &SequenceId, context: &dyn ConstructionContext<Gunsmith>) -> bool {
        self.behavior.is_compatible(sequence, context)
    }

    fn options(&self) -> Vec<&ComponentOption> {
        vec![&self.count]
    }

    fn options_mut(&mut self) -> Vec<&mut ComponentOption> {
        vec![&mut self.count]
    }

    fn create_steps(&self, sequence: &SequenceId, context: &mut dyn ConstructionContext<Gunsmith>) {
        let count = self.count.int_value();
        let step = ConstructionStep::new("Spare Magazines", self.instance_string())
            .with_cost(self.behavior.cost(count))
            .with_weight(self.behavior.weight(count))
            .with_factors(self.behavior.factors().into_iter().map(Factor::non_modifying));
        context.apply_step(sequence, step);
    }
}

impl MunitionQuantity for MagazineQuantity {
    fn quantity(&self) -> i64 {
        self.count.int_value()
    }

    fn loaded_stage(&self) -> &'static str {
        LOADED_MAGAZINE_STAGE
    }

    fn create_loaded(&self) -> Box<dyn Component<Gunsmith>> {
        Box::new(LoadedMagazine::new(self.behavior))
    }
}

pub(crate) fn register_loaded(registry: &mut ComponentRegistry<Gunsmith>) {
    for behavior in MAGAZINES {
        registry.register_prototype(Box::new(LoadedMagazine::new(behavior)));
    }
}

pub(crate) fn register_quantities(registry: &mut ComponentRegistry<Gunsmith>) {
    for behavior in MAGAZINES {
        registry.register_prototype(Box::new(MagazineQuantity::new(behavior)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extended_capacity_rounds_down() {
        let extended = &MAGAZINES[1];
        let factors = extended.factors();
        assert_eq!(factors[0].display_string(), "Ammo Capacity +50% (rounded down)");
    }

    #[test]
    fn test_spare_factors_are_reported_only() {
        let spare = MagazineQuantity::new(&MAGAZINES[1]);
        let factors: Vec<_> = spare
            .behavior
            .factors()
            .into_iter()
            .map(Factor::non_modifying)
            .collect();
        assert!(factors.iter().all(|factor| !factor.is_modifying()));
        assert_eq!(spare.quantity(), 1);
        assert_eq!(spare.create_loaded().type_name(), "LoadedExtendedMagazine");
    }
}
