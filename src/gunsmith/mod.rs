//! Weapon construction
//!
//! A weapon is a `Construction<Gunsmith>`: one sequence per weapon type
//! (Conventional or Launcher) plus the common stages (mounting, stock,
//! features, accessories, multi-mounting) shared by all of them.

pub mod ammunition;
pub mod barrels;
pub mod domain;
pub mod features;
pub mod finalisation;
pub mod fittings;
pub mod grenades;
pub mod magazines;
pub mod munitions;
pub mod receivers;

pub use domain::{
    Gunsmith, PhysicalSignature, WeaponAttribute, WeaponComponentKind, WeaponPhase, WeaponRule,
    WeaponType,
};
pub use munitions::{as_munition_quantity, MunitionQuantity};
pub use receivers::ReceiverClass;

use crate::construction::Construction;
use crate::core::error::{ForgeError, Result};
use crate::core::types::SequenceId;

pub type Weapon = Construction<Gunsmith>;

impl Construction<Gunsmith> {
    /// Load the spare munition at `index` of a sequence's Munitions stage:
    /// the matching loaded component replaces whatever is loaded now.
    pub fn load_munition(&mut self, sequence: &SequenceId, index: usize) -> Result<()> {
        let munitions = self
            .find_stage(Some(sequence), domain::MUNITIONS_STAGE)
            .ok_or_else(|| ForgeError::UnknownStage(domain::MUNITIONS_STAGE.to_string()))?;
        let component = self
            .stage(munitions)
            .component(index)
            .ok_or_else(|| ForgeError::ComponentIndex {
                stage: domain::MUNITIONS_STAGE.to_string(),
                index,
            })?;
        let quantity = as_munition_quantity(component).ok_or_else(|| ForgeError::StageMismatch {
            component: component.instance_string(),
            stage: domain::MUNITIONS_STAGE.to_string(),
        })?;

        let stage_name = quantity.loaded_stage();
        let loaded = quantity.create_loaded();
        let stage = self
            .find_stage(Some(sequence), stage_name)
            .ok_or_else(|| ForgeError::UnknownStage(stage_name.to_string()))?;
        self.add_component(stage, loaded, true)
    }
}
