//! Generic staged construction engine
//!
//! Domains (weapons, robots) describe their phases, stages and components;
//! `Construction<D>` assembles them.

pub mod attribute;
pub mod component;
pub mod context;
pub mod dice;
pub mod domain;
pub mod engine;
pub mod factor;
pub mod manifest;
pub mod option;
pub mod persistence;
pub mod registry;
pub mod scalar;
pub mod sequence;
pub mod stage;
pub mod step;

pub use attribute::{AttributeGroup, AttributeId, AttributeModifier, AttributeValue};
pub use component::{Component, ComponentBase, ComponentQuery};
pub use context::{ConstructionContext, ConstructionSettings};
pub use dice::DiceRoll;
pub use domain::{ComponentKind, ConstructionDomain, ConstructionPhase};
pub use engine::Construction;
pub use factor::Factor;
pub use manifest::{Manifest, ManifestEntry, ManifestSection};
pub use option::{ComponentOption, OptionKind, OptionValue};
pub use persistence::{ComponentData, ConstructionData, SequenceData, StageData};
pub use registry::{ComponentFactory, ComponentRegistry};
pub use scalar::{NumericModifier, ScalarValue};
pub use sequence::{RecordedStep, SequenceState, StepOrigin};
pub use stage::{ConstructionStage, StageCardinality, StageId, StageRequirement};
pub use step::ConstructionStep;
