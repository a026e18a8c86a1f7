//! Launcher payloads, loaded and spare.

use crate::construction::{
    Component, ComponentOption, ComponentRegistry, ConstructionContext,
    ConstructionStep, DiceRoll, Factor, NumericModifier,
};
use crate::core::types::{SequenceId, TechLevel};

use super::domain::{Gunsmith, WeaponAttribute, WeaponComponentKind, LOADED_PAYLOAD_STAGE};
use super::munitions::{quantity_option, MunitionQuantity};
use super::receivers::receiver_class;

#[derive(Debug)]
pub struct PayloadBehavior {
    pub name: &'static str,
    pub loaded_type: &'static str,
    pub quantity_type: &'static str,
    pub min_tech_level: TechLevel,
    pub damage: Option<DiceRoll>,
    pub blast: f64,
    pub penetration: f64,
    pub cost: f64,
    pub weight: f64,
    pub note: Option<&'static str>,
}

impl PayloadBehavior {
    pub fn is_compatible(&self, sequence: &SequenceId, context: &dyn ConstructionContext<Gunsmith>) -> bool {
        context.tech_level() >= self.min_tech_level
            && matches!(receiver_class(sequence, context), Some(class) if class.is_launcher())
    }

    pub fn factors(&self) -> Vec<Factor<WeaponAttribute>> {
        let mut factors = Vec::new();
        if let Some(damage) = self.damage {
            factors.push(Factor::set(WeaponAttribute::Damage, damage));
        }
        if self.blast > 0.0 {
            factors.push(Factor::set(WeaponAttribute::Blast, self.blast));
        }
        if self.penetration != 0.0 {
            factors.push(Factor::set(WeaponAttribute::Penetration, self.penetration));
        }
        factors
    }

    fn step(&self, step_type: &str, name: String, count: f64, modifying: bool) -> ConstructionStep<WeaponAttribute> {
        let factors = self.factors().into_iter().map(|factor| {
            if modifying {
                factor
            } else {
                factor.non_modifying()
            }
        });
        let mut step = ConstructionStep::new(step_type, name)
            .with_cost(NumericModifier::Constant(count * self.cost))
            .with_weight(NumericModifier::Constant(count * self.weight))
            .with_factors(factors);
        if let Some(note) = self.note {
            step = step.with_note(note);
        }
        step
    }
}

pub static PAYLOADS: &[PayloadBehavior] = &[
    PayloadBehavior {
        name: "Fragmentation Grenade",
        loaded_type: "LoadedFragGrenade",
        quantity_type: "FragGrenadeQuantity",
        min_tech_level: 6,
        damage: Some(DiceRoll::new(5, 0)),
        blast: 9.0,
        penetration: 0.0,
        cost: 30.0,
        weight: 0.25,
        note: None,
    },
    PayloadBehavior {
        name: "Smoke Grenade",
        loaded_type: "LoadedSmokeGrenade",
        quantity_type: "SmokeGrenadeQuantity",
        min_tech_level: 6,
        damage: None,
        blast: 9.0,
        penetration: 0.0,
        cost: 15.0,
        weight: 0.25,
        note: Some("Fills the blast radius with smoke"),
    },
    PayloadBehavior {
        name: "HEAP Grenade",
        loaded_type: "LoadedHeapGrenade",
        quantity_type: "HeapGrenadeQuantity",
        min_tech_level: 7,
        damage: Some(DiceRoll::new(4, 0)),
        blast: 0.0,
        penetration: 4.0,
        cost: 60.0,
        weight: 0.3,
        note: None,
    },
];

/// Grenades filling the launcher's capacity
#[derive(Debug, Clone)]
pub struct LoadedGrenade {
    payload: &'static PayloadBehavior,
}

impl LoadedGrenade {
    pub fn new(payload: &'static PayloadBehavior) -> Self {
        Self { payload }
    }
}

impl Component<Gunsmith> for LoadedGrenade {
    fn type_name(&self) -> &'static str {
        self.payload.loaded_type
    }

    fn component_string(&self) -> String {
        self.payload.name.to_string()
    }

    fn kind(&self) -> WeaponComponentKind {
        WeaponComponentKind::LoadedPayload
    }

    fn is_compatible(&self, sequence: &SequenceId, context: &dyn ConstructionContext<Gunsmith>) -> bool {
        self.payload.is_compatible(sequence, context)
    }

    fn create_steps(&self, sequence: &SequenceId, context: &mut dyn ConstructionContext<Gunsmith>) {
        let count = context
            .attribute_value(WeaponAttribute::AmmoCapacity, Some(sequence))
            .unwrap_or(0.0)
            .max(0.0);
        let step = self
            .payload
            .step("Loaded Payload", self.payload.name.to_string(), count, true);
        context.apply_step(sequence, step);
    }
}

#[derive(Debug, Clone)]
pub struct GrenadeQuantity {
    payload: &'static PayloadBehavior,
    count: ComponentOption,
}

impl GrenadeQuantity {
    pub fn new(payload: &'static PayloadBehavior) -> Self {
        Self {
            payload,
            count: quantity_option("Grenades", 6, 1_000),
        }
    }
}

impl Component<Gunsmith> for GrenadeQuantity {
    fn type_name(&self) -> &'static str {
        self.payload.quantity_type
    }

    fn component_string(&self) -> String {
        format!("Spare {}", self.payload.name)
    }

    fn instance_string(&self) -> String {
        format!("{} x{}", self.payload.name, self.count.int_value())
    }

    fn kind(&self) -> WeaponComponentKind {
        WeaponComponentKind::GrenadeQuantity
    }

    fn is_compatible(&self, sequence: &SequenceId, context: &dyn ConstructionContext<Gunsmith>) -> bool {
        self.payload.is_compatible(sequence, context)
    }

    fn options(&self) -> Vec<&ComponentOption> {
        vec![&self.count]
    }

    fn options_mut(&mut self) -> Vec<&mut ComponentOption> {
        vec![&mut self.count]
    }

    fn create_steps(&self, sequence: &SequenceId, context: &mut dyn ConstructionContext<Gunsmith>) {
        let count = self.count.int_value() as f64;
        let step = self
            .payload
            .step("Spare Grenades", self.instance_string(), count, false);
        context.apply_step(sequence, step);
    }
}

impl MunitionQuantity for GrenadeQuantity {
    fn quantity(&self) -> i64 {
        self.count.int_value()
    }

    fn loaded_stage(&self) -> &'static str {
        LOADED_PAYLOAD_STAGE
    }

    fn create_loaded(&self) -> Box<dyn Component<Gunsmith>> {
        Box::new(LoadedGrenade::new(self.payload))
    }
}

pub(crate) fn register_loaded(registry: &mut ComponentRegistry<Gunsmith>) {
    for payload in PAYLOADS {
        registry.register_prototype(Box::new(LoadedGrenade::new(payload)));
    }
}

pub(crate) fn register_quantities(registry: &mut ComponentRegistry<Gunsmith>) {
    for payload in PAYLOADS {
        registry.register_prototype(Box::new(GrenadeQuantity::new(payload)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construction::AttributeValue;

    #[test]
    fn test_smoke_has_no_damage() {
        let smoke = &PAYLOADS[1];
        let factors = smoke.factors();
        assert!(factors.iter().all(|f| f.attribute() != WeaponAttribute::Damage));
        assert_eq!(factors.len(), 1);
    }

    #[test]
    fn test_spare_step_cost_scales() {
        let step = PAYLOADS[0].step("Spare Grenades", "x".to_string(), 4.0, false);
        assert_eq!(step.cost(), Some(NumericModifier::Constant(120.0)));
        assert!(step.factors().iter().all(|f| !f.is_modifying()));
    }

    #[test]
    fn test_damage_value_is_dice() {
        let factors = PAYLOADS[0].factors();
        match &factors[0] {
            Factor::Set { value, .. } => assert_eq!(value, &AttributeValue::Dice(DiceRoll::new(5, 0))),
            other => panic!("unexpected factor {:?}", other),
        }
    }
}
