//! The domain trait the generic engine is parameterised by.
//!
//! A domain (weapons, robots) supplies its phase order, attribute and
//! component-kind identifiers, the stage layout for each kind of sequence and
//! the static component registry. Everything else lives in the engine.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::hash::Hash;

use super::attribute::AttributeId;
use super::registry::ComponentRegistry;
use super::stage::ConstructionStage;

/// Totally ordered construction phase
pub trait ConstructionPhase:
    Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Every phase, in execution order
    fn all() -> &'static [Self];

    /// Stages of common phases are shared by every sequence
    fn is_common(self) -> bool;

    /// Whether the phase counts towards combat cost and weight
    fn is_combat(self) -> bool {
        true
    }

    /// Constant costs and weights recorded in this phase form the base that
    /// percentage modifiers resolve against
    fn is_cost_base(self) -> bool;
}

/// Component base type, used to match components against stages
pub trait ComponentKind: Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// True if this kind is `base` or one of its refinements
    fn extends(self, base: Self) -> bool;
}

pub trait ConstructionDomain: Sized + Clone + fmt::Debug + Send + Sync + 'static {
    type Phase: ConstructionPhase;
    type Attribute: AttributeId;
    type Kind: ComponentKind;
    /// What a sequence is built as (weapon type, robot frame)
    type SequenceKind: Copy
        + Eq
        + fmt::Debug
        + fmt::Display
        + Send
        + Sync
        + Serialize
        + DeserializeOwned
        + 'static;
    /// Optional rule flags
    type Rule: Copy + Eq + Ord + fmt::Debug + Send + Sync + Serialize + DeserializeOwned + 'static;

    /// Display name of a construction in this domain
    const NAME: &'static str;

    fn registry() -> &'static ComponentRegistry<Self>;

    /// Stage layout for a new sequence of the given kind
    fn sequence_stages(kind: Self::SequenceKind) -> Vec<ConstructionStage<Self>>;

    /// Stages shared by every sequence
    fn common_stages() -> Vec<ConstructionStage<Self>>;
}
