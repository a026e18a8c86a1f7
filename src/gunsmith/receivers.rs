//! Receivers, calibres and feeds: the Receiver phase baseline.
//!
//! The receiver is the first component of a sequence to run in the Receiver
//! phase and sets the baseline scores every later component adjusts.

use crate::construction::{
    AttributeModifier, AttributeValue, Component, ComponentQuery, ComponentRegistry,
    ConstructionContext, ConstructionStep, DiceRoll, Factor, NumericModifier,
};
use crate::core::types::{SequenceId, TechLevel};

use super::domain::{Gunsmith, PhysicalSignature, WeaponAttribute, WeaponComponentKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReceiverClass {
    Handgun,
    Assault,
    Longarm,
    LightSupport,
    LightLauncher,
    SupportLauncher,
}

impl ReceiverClass {
    pub fn is_launcher(self) -> bool {
        matches!(self, ReceiverClass::LightLauncher | ReceiverClass::SupportLauncher)
    }

    pub fn is_handgun(self) -> bool {
        self == ReceiverClass::Handgun
    }
}

#[derive(Debug)]
pub struct ReceiverData {
    pub type_name: &'static str,
    pub name: &'static str,
    pub class: ReceiverClass,
    pub min_tech_level: TechLevel,
    pub cost: f64,
    pub weight: f64,
    pub ammo_capacity: f64,
    /// Only the primary receiver gets its Quickdraw score
    pub quickdraw: f64,
    pub range: f64,
}

pub static RECEIVERS: &[ReceiverData] = &[
    ReceiverData {
        type_name: "HandgunReceiver",
        name: "Handgun",
        class: ReceiverClass::Handgun,
        min_tech_level: 5,
        cost: 175.0,
        weight: 0.8,
        ammo_capacity: 10.0,
        quickdraw: 4.0,
        range: 20.0,
    },
    ReceiverData {
        type_name: "AssaultReceiver",
        name: "Assault Weapon",
        class: ReceiverClass::Assault,
        min_tech_level: 7,
        cost: 300.0,
        weight: 2.5,
        ammo_capacity: 30.0,
        quickdraw: 2.0,
        range: 150.0,
    },
    ReceiverData {
        type_name: "LongarmReceiver",
        name: "Longarm",
        class: ReceiverClass::Longarm,
        min_tech_level: 5,
        cost: 400.0,
        weight: 3.0,
        ammo_capacity: 5.0,
        quickdraw: 0.0,
        range: 300.0,
    },
    ReceiverData {
        type_name: "LightSupportReceiver",
        name: "Light Support Weapon",
        class: ReceiverClass::LightSupport,
        min_tech_level: 7,
        cost: 1500.0,
        weight: 6.0,
        ammo_capacity: 50.0,
        quickdraw: -4.0,
        range: 450.0,
    },
    ReceiverData {
        type_name: "LightLauncherReceiver",
        name: "Light Launcher",
        class: ReceiverClass::LightLauncher,
        min_tech_level: 6,
        cost: 400.0,
        weight: 3.0,
        ammo_capacity: 1.0,
        quickdraw: 0.0,
        range: 250.0,
    },
    ReceiverData {
        type_name: "SupportLauncherReceiver",
        name: "Support Launcher",
        class: ReceiverClass::SupportLauncher,
        min_tech_level: 7,
        cost: 1200.0,
        weight: 8.0,
        ammo_capacity: 6.0,
        quickdraw: -4.0,
        range: 500.0,
    },
];

#[derive(Debug, Clone)]
pub struct Receiver {
    data: &'static ReceiverData,
}

impl Receiver {
    pub fn new(data: &'static ReceiverData) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &'static ReceiverData {
        self.data
    }

    pub fn class(&self) -> ReceiverClass {
        self.data.class
    }
}

impl Component<Gunsmith> for Receiver {
    fn type_name(&self) -> &'static str {
        self.data.type_name
    }

    fn component_string(&self) -> String {
        self.data.name.to_string()
    }

    fn kind(&self) -> WeaponComponentKind {
        if self.data.class.is_launcher() {
            WeaponComponentKind::LauncherReceiver
        } else {
            WeaponComponentKind::ConventionalReceiver
        }
    }

    fn is_compatible(&self, _sequence: &SequenceId, context: &dyn ConstructionContext<Gunsmith>) -> bool {
        context.tech_level() >= self.data.min_tech_level
    }

    fn create_steps(&self, sequence: &SequenceId, context: &mut dyn ConstructionContext<Gunsmith>) {
        let quickdraw = if context.is_primary(sequence) {
            self.data.quickdraw
        } else {
            0.0
        };
        let step = ConstructionStep::new("Receiver", self.data.name)
            .with_cost(NumericModifier::Constant(self.data.cost))
            .with_weight(NumericModifier::Constant(self.data.weight))
            .with_factor(Factor::set(WeaponAttribute::AmmoCapacity, self.data.ammo_capacity))
            .with_factor(Factor::set(WeaponAttribute::Quickdraw, quickdraw))
            .with_factor(Factor::set(WeaponAttribute::Range, self.data.range));
        context.apply_step(sequence, step);
    }
}

/// Class of the receiver fitted to a sequence, if any
pub fn receiver_class(
    sequence: &SequenceId,
    context: &dyn ConstructionContext<Gunsmith>,
) -> Option<ReceiverClass> {
    context
        .find_components(
            ComponentQuery::Kind(WeaponComponentKind::Receiver),
            Some(sequence),
        )
        .into_iter()
        .find_map(|component| component.downcast_ref::<Receiver>())
        .map(Receiver::class)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibreClass {
    Handgun,
    Rifle,
}

#[derive(Debug)]
pub struct CalibreData {
    pub type_name: &'static str,
    pub name: &'static str,
    pub class: CalibreClass,
    pub min_tech_level: TechLevel,
    pub damage: DiceRoll,
    pub penetration: f64,
    pub signature: PhysicalSignature,
    /// Percentage change to ammo capacity, rounded down
    pub capacity_percent: f64,
    pub range_percent: f64,
    pub cost_percent: f64,
    pub weight_percent: f64,
}

pub static CALIBRES: &[CalibreData] = &[
    CalibreData {
        type_name: "LightHandgunCalibre",
        name: "Light Handgun",
        class: CalibreClass::Handgun,
        min_tech_level: 4,
        damage: DiceRoll::new(2, 0),
        penetration: 0.0,
        signature: PhysicalSignature::Small,
        capacity_percent: 20.0,
        range_percent: -25.0,
        cost_percent: -10.0,
        weight_percent: -10.0,
    },
    CalibreData {
        type_name: "MediumHandgunCalibre",
        name: "Medium Handgun",
        class: CalibreClass::Handgun,
        min_tech_level: 4,
        damage: DiceRoll::new(3, -3),
        penetration: 0.0,
        signature: PhysicalSignature::Normal,
        capacity_percent: 0.0,
        range_percent: 0.0,
        cost_percent: 0.0,
        weight_percent: 0.0,
    },
    CalibreData {
        type_name: "HeavyHandgunCalibre",
        name: "Heavy Handgun",
        class: CalibreClass::Handgun,
        min_tech_level: 5,
        damage: DiceRoll::new(3, -1),
        penetration: 0.0,
        signature: PhysicalSignature::High,
        capacity_percent: -20.0,
        range_percent: 25.0,
        cost_percent: 10.0,
        weight_percent: 10.0,
    },
    CalibreData {
        type_name: "IntermediateRifleCalibre",
        name: "Intermediate Rifle",
        class: CalibreClass::Rifle,
        min_tech_level: 5,
        damage: DiceRoll::new(3, 0),
        penetration: 0.0,
        signature: PhysicalSignature::Normal,
        capacity_percent: 0.0,
        range_percent: 0.0,
        cost_percent: 0.0,
        weight_percent: 0.0,
    },
    CalibreData {
        type_name: "BattleRifleCalibre",
        name: "Battle Rifle",
        class: CalibreClass::Rifle,
        min_tech_level: 5,
        damage: DiceRoll::new(3, 3),
        penetration: 1.0,
        signature: PhysicalSignature::High,
        capacity_percent: -20.0,
        range_percent: 20.0,
        cost_percent: 10.0,
        weight_percent: 10.0,
    },
];

#[derive(Debug, Clone)]
pub struct Calibre {
    data: &'static CalibreData,
}

impl Calibre {
    pub fn new(data: &'static CalibreData) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &'static CalibreData {
        self.data
    }
}

impl Component<Gunsmith> for Calibre {
    fn type_name(&self) -> &'static str {
        self.data.type_name
    }

    fn component_string(&self) -> String {
        self.data.name.to_string()
    }

    fn kind(&self) -> WeaponComponentKind {
        WeaponComponentKind::Calibre
    }

    fn is_compatible(&self, sequence: &SequenceId, context: &dyn ConstructionContext<Gunsmith>) -> bool {
        if context.tech_level() < self.data.min_tech_level {
            return false;
        }
        match receiver_class(sequence, context) {
            Some(class) if class.is_launcher() => false,
            Some(ReceiverClass::Handgun) => self.data.class == CalibreClass::Handgun,
            Some(_) => self.data.class == CalibreClass::Rifle,
            None => false,
        }
    }

    fn create_steps(&self, sequence: &SequenceId, context: &mut dyn ConstructionContext<Gunsmith>) {
        let data = self.data;
        let mut step = ConstructionStep::new("Calibre", data.name)
            .with_factor(Factor::set(WeaponAttribute::Damage, data.damage))
            .with_factor(Factor::set(
                WeaponAttribute::PhysicalSignature,
                AttributeValue::Enum(data.signature.label()),
            ));
        if data.penetration != 0.0 {
            step = step.with_factor(Factor::set(WeaponAttribute::Penetration, data.penetration));
        }
        if data.capacity_percent != 0.0 {
            step = step.with_factor(Factor::modify(
                WeaponAttribute::AmmoCapacity,
                AttributeModifier::percentage_round_down(data.capacity_percent),
            ));
        }
        if data.range_percent != 0.0 {
            step = step.with_factor(Factor::modify(
                WeaponAttribute::Range,
                AttributeModifier::percentage(data.range_percent),
            ));
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
pub enum FeedType {
    RemovableMagazine,
    FixedMagazine,
    Belt,
}

#[derive(Debug, Clone)]
pub struct Feed {
    feed: FeedType,
}

impl Feed {
    pub fn new(feed: FeedType) -> Self {
        Self { feed }
    }

    pub fn feed_type(&self) -> FeedType {
        self.feed
    }
}

impl Component<Gunsmith> for Feed {
    fn type_name(&self) -> &'static str {
        match self.feed {
            FeedType::RemovableMagazine => "RemovableMagazineFeed",
            FeedType::FixedMagazine => "FixedMagazineFeed",
            FeedType::Belt => "BeltFeed",
        }
    }

    fn component_string(&self) -> String {
        match self.feed {
            FeedType::RemovableMagazine => "Removable Magazine",
            FeedType::FixedMagazine => "Fixed Magazine",
            FeedType::Belt => "Belt",
        }
        .to_string()
    }

    fn kind(&self) -> WeaponComponentKind {
        WeaponComponentKind::Feed
    }

    fn is_compatible(&self, sequence: &SequenceId, context: &dyn ConstructionContext<Gunsmith>) -> bool {
        match (self.feed, receiver_class(sequence, context)) {
            (_, None) => false,
            (_, Some(class)) if class.is_launcher() => false,
            (FeedType::Belt, Some(class)) => class == ReceiverClass::LightSupport,
            _ => true,
        }
    }

    fn create_steps(&self, sequence: &SequenceId, context: &mut dyn ConstructionContext<Gunsmith>) {
        let step = ConstructionStep::new("Feed", self.component_string());
        let step = match self.feed {
            FeedType::RemovableMagazine => step,
            FeedType::FixedMagazine => step
                .with_cost(NumericModifier::Percentage(-10.0))
                .with_note("Reloading takes a full minor action per round"),
            FeedType::Belt => step
                .with_cost(NumericModifier::Percentage(10.0))
                .with_factor(Factor::set(WeaponAttribute::AmmoCapacity, 100.0))
                .with_note("Needs a second crew member to feed the belt when moving"),
        };
        context.apply_step(sequence, step);
    }
}

/// True if the sequence loads from removable magazines
pub fn uses_removable_magazines(
    sequence: &SequenceId,
    context: &dyn ConstructionContext<Gunsmith>,
) -> bool {
    context.has_component(ComponentQuery::Type("RemovableMagazineFeed"), Some(sequence))
}

pub(crate) fn register(registry: &mut ComponentRegistry<Gunsmith>) {
    for data in RECEIVERS {
        registry.register_prototype(Box::new(Receiver::new(data)));
    }
    for data in CALIBRES {
        registry.register_prototype(Box::new(Calibre::new(data)));
    }
    for feed in [FeedType::RemovableMagazine, FeedType::FixedMagazine, FeedType::Belt] {
        registry.register_prototype(Box::new(Feed::new(feed)));
    }
}
