//! Weapon domain definition: phases, attributes, component kinds and the
//! stage layout for each weapon type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::construction::{
    AttributeId, ComponentKind, ComponentRegistry, ConstructionDomain, ConstructionPhase,
    ConstructionStage, StageRequirement,
};
use crate::core::error::ForgeError;

use super::{
    ammunition, barrels, features, finalisation, fittings, grenades, magazines, receivers,
};

/// Marker type for weapon constructions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gunsmith;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WeaponPhase {
    Initialisation,
    Receiver,
    Barrel,
    BarrelAccessories,
    Mounting,
    Stock,
    WeaponFeatures,
    WeaponAccessories,
    MultiMount,
    Loading,
    Munitions,
    Finalisation,
}

impl WeaponPhase {
    pub const ALL: [WeaponPhase; 12] = [
        WeaponPhase::Initialisation,
        WeaponPhase::Receiver,
        WeaponPhase::Barrel,
        WeaponPhase::BarrelAccessories,
        WeaponPhase::Mounting,
        WeaponPhase::Stock,
        WeaponPhase::WeaponFeatures,
        WeaponPhase::WeaponAccessories,
        WeaponPhase::MultiMount,
        WeaponPhase::Loading,
        WeaponPhase::Munitions,
        WeaponPhase::Finalisation,
    ];
}

impl fmt::Display for WeaponPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WeaponPhase::Initialisation => "Initialisation",
            WeaponPhase::Receiver => "Receiver",
            WeaponPhase::Barrel => "Barrel",
            WeaponPhase::BarrelAccessories => "Barrel Accessories",
            WeaponPhase::Mounting => "Mounting",
            WeaponPhase::Stock => "Stock",
            WeaponPhase::WeaponFeatures => "Weapon Features",
            WeaponPhase::WeaponAccessories => "Weapon Accessories",
            WeaponPhase::MultiMount => "Multi-Mount",
            WeaponPhase::Loading => "Loading",
            WeaponPhase::Munitions => "Munitions",
            WeaponPhase::Finalisation => "Finalisation",
        };
        write!(f, "{}", name)
    }
}

impl ConstructionPhase for WeaponPhase {
    fn all() -> &'static [Self] {
        &Self::ALL
    }

    fn is_common(self) -> bool {
        matches!(
            self,
            WeaponPhase::Mounting
                | WeaponPhase::Stock
                | WeaponPhase::WeaponFeatures
                | WeaponPhase::WeaponAccessories
                | WeaponPhase::MultiMount
                | WeaponPhase::Finalisation
        )
    }

    /// Spare munitions are carried, not part of the weapon
    fn is_combat(self) -> bool {
        self != WeaponPhase::Munitions
    }

    fn is_cost_base(self) -> bool {
        self == WeaponPhase::Receiver
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WeaponAttribute {
    Damage,
    Range,
    AmmoCapacity,
    Quickdraw,
    Penetration,
    Auto,
    PhysicalSignature,
    Blast,
}

impl fmt::Display for WeaponAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WeaponAttribute::Damage => "Damage",
            WeaponAttribute::Range => "Range",
            WeaponAttribute::AmmoCapacity => "Ammo Capacity",
            WeaponAttribute::Quickdraw => "Quickdraw",
            WeaponAttribute::Penetration => "Penetration",
            WeaponAttribute::Auto => "Auto",
            WeaponAttribute::PhysicalSignature => "Physical Signature",
            WeaponAttribute::Blast => "Blast",
        };
        write!(f, "{}", name)
    }
}

impl AttributeId for WeaponAttribute {}

/// How detectable a weapon is when fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PhysicalSignature {
    Minimal,
    Small,
    Normal,
    High,
    Extreme,
}

impl PhysicalSignature {
    const LEVELS: [PhysicalSignature; 5] = [
        PhysicalSignature::Minimal,
        PhysicalSignature::Small,
        PhysicalSignature::Normal,
        PhysicalSignature::High,
        PhysicalSignature::Extreme,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PhysicalSignature::Minimal => "Minimal",
            PhysicalSignature::Small => "Small",
            PhysicalSignature::Normal => "Normal",
            PhysicalSignature::High => "High",
            PhysicalSignature::Extreme => "Extreme",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::LEVELS.iter().copied().find(|level| level.label() == label)
    }

    pub fn quieter(self) -> Self {
        let index = self as usize;
        Self::LEVELS[index.saturating_sub(1)]
    }

    pub fn louder(self) -> Self {
        let index = self as usize;
        Self::LEVELS[(index + 1).min(Self::LEVELS.len() - 1)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeaponComponentKind {
    Initialisation,
    Receiver,
    ConventionalReceiver,
    LauncherReceiver,
    Calibre,
    Feed,
    ReceiverFeature,
    FireRate,
    Barrel,
    BarrelAccessory,
    Mounting,
    Stock,
    WeaponFeature,
    WeaponAccessory,
    MultiMount,
    LoadedMagazine,
    LoadedAmmo,
    LoadedPayload,
    Munition,
    MagazineQuantity,
    AmmoQuantity,
    GrenadeQuantity,
    Finalisation,
}

impl WeaponComponentKind {
    fn parent(self) -> Option<Self> {
        match self {
            WeaponComponentKind::ConventionalReceiver | WeaponComponentKind::LauncherReceiver => {
                Some(WeaponComponentKind::Receiver)
            }
            WeaponComponentKind::MagazineQuantity
            | WeaponComponentKind::AmmoQuantity
            | WeaponComponentKind::GrenadeQuantity => Some(WeaponComponentKind::Munition),
            _ => None,
        }
    }
}

impl fmt::Display for WeaponComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl ComponentKind for WeaponComponentKind {
    fn extends(self, base: Self) -> bool {
        let mut current = Some(self);
        while let Some(kind) = current {
            if kind == base {
                return true;
            }
            current = kind.parent();
        }
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponType {
    Conventional,
    Launcher,
}

impl fmt::Display for WeaponType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeaponType::Conventional => write!(f, "Conventional"),
            WeaponType::Launcher => write!(f, "Launcher"),
        }
    }
}

impl FromStr for WeaponType {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "conventional" => Ok(WeaponType::Conventional),
            "launcher" => Ok(WeaponType::Launcher),
            _ => Err(ForgeError::Config(format!("unknown weapon type '{}'", s))),
        }
    }
}

/// Optional rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponRule {
    /// Heavy weapons are slower to draw: -1 Quickdraw per full 5kg
    QuickdrawWeightPenalty,
    /// Auto ratings above 3 aren't available
    LimitedAutofire,
}

impl FromStr for WeaponRule {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "quickdraw_weight_penalty" => Ok(WeaponRule::QuickdrawWeightPenalty),
            "limited_autofire" => Ok(WeaponRule::LimitedAutofire),
            _ => Err(ForgeError::Config(format!("unknown weapon rule '{}'", s))),
        }
    }
}

pub const INITIALISATION_STAGE: &str = "Initialisation";
pub const RECEIVER_STAGE: &str = "Receiver";
pub const CALIBRE_STAGE: &str = "Calibre";
pub const FEED_STAGE: &str = "Feed";
pub const RECEIVER_FEATURES_STAGE: &str = "Receiver Features";
pub const FIRE_RATE_STAGE: &str = "Fire Rate";
pub const BARREL_STAGE: &str = "Barrel";
pub const BARREL_ACCESSORIES_STAGE: &str = "Barrel Accessories";
pub const LOADED_MAGAZINE_STAGE: &str = "Loaded Magazine";
pub const LOADED_AMMO_STAGE: &str = "Loaded Ammo";
pub const LOADED_PAYLOAD_STAGE: &str = "Loaded Payload";
pub const MUNITIONS_STAGE: &str = "Munitions";
pub const MOUNTING_STAGE: &str = "Mounting";
pub const STOCK_STAGE: &str = "Stock";
pub const WEAPON_FEATURES_STAGE: &str = "Weapon Features";
pub const WEAPON_ACCESSORIES_STAGE: &str = "Weapon Accessories";
pub const MULTI_MOUNT_STAGE: &str = "Multi-Mount";
pub const FINALISATION_STAGE: &str = "Finalisation";

type Stage = ConstructionStage<Gunsmith>;
use WeaponComponentKind as Kind;
use WeaponPhase as Phase;

fn conventional_stages() -> Vec<Stage> {
    vec![
        Stage::singular(
            INITIALISATION_STAGE,
            Phase::Initialisation,
            Kind::Initialisation,
            StageRequirement::Mandatory,
        )
        .with_default(finalisation::INITIALISATION),
        // Receiver phase order matters: fire rate reads the final Auto score
        Stage::singular(
            RECEIVER_STAGE,
            Phase::Receiver,
            Kind::ConventionalReceiver,
            StageRequirement::Mandatory,
        )
        .with_default("HandgunReceiver"),
        Stage::singular(CALIBRE_STAGE, Phase::Receiver, Kind::Calibre, StageRequirement::Mandatory)
            .with_default("MediumHandgunCalibre"),
        Stage::singular(FEED_STAGE, Phase::Receiver, Kind::Feed, StageRequirement::Mandatory)
            .with_default("RemovableMagazineFeed"),
        Stage::multiple(RECEIVER_FEATURES_STAGE, Phase::Receiver, Kind::ReceiverFeature),
        Stage::singular(FIRE_RATE_STAGE, Phase::Receiver, Kind::FireRate, StageRequirement::Optional),
        Stage::singular(BARREL_STAGE, Phase::Barrel, Kind::Barrel, StageRequirement::Mandatory),
        Stage::multiple(
            BARREL_ACCESSORIES_STAGE,
            Phase::BarrelAccessories,
            Kind::BarrelAccessory,
        ),
        Stage::singular(
            LOADED_MAGAZINE_STAGE,
            Phase::Loading,
            Kind::LoadedMagazine,
            StageRequirement::Optional,
        ),
        Stage::singular(
            LOADED_AMMO_STAGE,
            Phase::Loading,
            Kind::LoadedAmmo,
            StageRequirement::Optional,
        ),
        Stage::multiple(MUNITIONS_STAGE, Phase::Munitions, Kind::Munition),
    ]
}

fn launcher_stages() -> Vec<Stage> {
    vec![
        Stage::singular(
            INITIALISATION_STAGE,
            Phase::Initialisation,
            Kind::Initialisation,
            StageRequirement::Mandatory,
        )
        .with_default(finalisation::INITIALISATION),
        Stage::singular(
            RECEIVER_STAGE,
            Phase::Receiver,
            Kind::LauncherReceiver,
            StageRequirement::Mandatory,
        )
        .with_default("LightLauncherReceiver"),
        Stage::multiple(RECEIVER_FEATURES_STAGE, Phase::Receiver, Kind::ReceiverFeature),
        Stage::singular(
            LOADED_PAYLOAD_STAGE,
            Phase::Loading,
            Kind::LoadedPayload,
            StageRequirement::Optional,
        ),
        Stage::multiple(MUNITIONS_STAGE, Phase::Munitions, Kind::Munition),
    ]
}

impl ConstructionDomain for Gunsmith {
    type Phase = WeaponPhase;
    type Attribute = WeaponAttribute;
    type Kind = WeaponComponentKind;
    type SequenceKind = WeaponType;
    type Rule = WeaponRule;

    const NAME: &'static str = "Weapon";

    fn registry() -> &'static ComponentRegistry<Self> {
        static REGISTRY: OnceLock<ComponentRegistry<Gunsmith>> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            let mut registry = ComponentRegistry::new();
            finalisation::register_initialisation(&mut registry);
            receivers::register(&mut registry);
            features::register(&mut registry);
            barrels::register(&mut registry);
            fittings::register(&mut registry);
            magazines::register_loaded(&mut registry);
            ammunition::register_loaded(&mut registry);
            grenades::register_loaded(&mut registry);
            magazines::register_quantities(&mut registry);
            ammunition::register_quantities(&mut registry);
            grenades::register_quantities(&mut registry);
            finalisation::register_finalisation(&mut registry);
            registry
        })
    }

    fn sequence_stages(kind: WeaponType) -> Vec<Stage> {
        match kind {
            WeaponType::Conventional => conventional_stages(),
            WeaponType::Launcher => launcher_stages(),
        }
    }

    fn common_stages() -> Vec<Stage> {
        vec![
            Stage::singular(MOUNTING_STAGE, Phase::Mounting, Kind::Mounting, StageRequirement::Optional),
            Stage::singular(STOCK_STAGE, Phase::Stock, Kind::Stock, StageRequirement::Desirable)
                .with_default("FullStock"),
            Stage::multiple(WEAPON_FEATURES_STAGE, Phase::WeaponFeatures, Kind::WeaponFeature),
            Stage::multiple(
                WEAPON_ACCESSORIES_STAGE,
                Phase::WeaponAccessories,
                Kind::WeaponAccessory,
            ),
            Stage::singular(
                MULTI_MOUNT_STAGE,
                Phase::MultiMount,
                Kind::MultiMount,
                StageRequirement::Optional,
            ),
            Stage::singular(
                FINALISATION_STAGE,
                Phase::Finalisation,
                Kind::Finalisation,
                StageRequirement::Mandatory,
            )
            .with_default(finalisation::FINALISATION),
        ]
    }
}
