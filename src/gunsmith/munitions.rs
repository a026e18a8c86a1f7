//! Spare munitions carried with a weapon.
//!
//! A munition quantity reports the factors its loaded counterpart would apply
//! as non-modifying factors, and can produce that loaded component.

use crate::construction::{Component, ComponentOption};

use super::ammunition::AmmoQuantity;
use super::domain::Gunsmith;
use super::grenades::GrenadeQuantity;
use super::magazines::MagazineQuantity;

pub trait MunitionQuantity {
    fn quantity(&self) -> i64;

    /// Name of the sequence stage the loaded component goes in
    fn loaded_stage(&self) -> &'static str;

    /// A new loaded component of the same munition
    fn create_loaded(&self) -> Box<dyn Component<Gunsmith>>;
}

pub fn as_munition_quantity(component: &dyn Component<Gunsmith>) -> Option<&dyn MunitionQuantity> {
    if let Some(quantity) = component.downcast_ref::<MagazineQuantity>() {
        return Some(quantity);
    }
    if let Some(quantity) = component.downcast_ref::<AmmoQuantity>() {
        return Some(quantity);
    }
    component
        .downcast_ref::<GrenadeQuantity>()
        .map(|quantity| quantity as &dyn MunitionQuantity)
}

pub(crate) fn quantity_option(name: &'static str, default: i64, max: i64) -> ComponentOption {
    ComponentOption::integer("count", name, default, 1, max)
}
