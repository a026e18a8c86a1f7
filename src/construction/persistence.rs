//! Saving and loading constructions.
//!
//! Only what is needed to rebuild a construction is stored: its name, tech
//! level and rule flags, each sequence's kind, and for every non-empty stage
//! the ordered component types with their option values. Everything else is
//! recomputed by a regenerate after loading.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::domain::ConstructionDomain;
use super::engine::Construction;
use super::option::OptionValue;
use super::stage::{ConstructionStage, StageId};
use crate::core::error::{ForgeError, Result};
use crate::core::types::TechLevel;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentData {
    pub component: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, OptionValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageData {
    pub stage: String,
    pub components: Vec<ComponentData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct SequenceData<D: ConstructionDomain> {
    pub kind: D::SequenceKind,
    pub stages: Vec<StageData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct ConstructionData<D: ConstructionDomain> {
    pub name: String,
    pub tech_level: TechLevel,
    #[serde(default)]
    pub rules: Vec<D::Rule>,
    pub sequences: Vec<SequenceData<D>>,
    #[serde(default)]
    pub common_stages: Vec<StageData>,
}

fn stages_data<D: ConstructionDomain>(stages: &[ConstructionStage<D>]) -> Vec<StageData> {
    stages
        .iter()
        .filter(|stage| !stage.is_empty())
        .map(|stage| StageData {
            stage: stage.name().to_string(),
            components: stage
                .components()
                .iter()
                .map(|component| ComponentData {
                    component: component.type_name().to_string(),
                    options: component.as_ref().option_values(),
                })
                .collect(),
        })
        .collect()
}

impl<D: ConstructionDomain> Construction<D> {
    pub fn to_data(&self) -> ConstructionData<D> {
        ConstructionData {
            name: self.name().to_string(),
            tech_level: self.tech_level(),
            rules: self.rules().collect(),
            sequences: self
                .sequences()
                .iter()
                .map(|id| {
                    let state = self.sequence(id);
                    SequenceData {
                        kind: state.kind(),
                        stages: stages_data(state.stages()),
                    }
                })
                .collect(),
            common_stages: stages_data(self.common_stages()),
        }
    }

    /// Rebuild a construction. Components are placed without compatibility
    /// checks; the single regenerate at the end drops anything that no longer
    /// fits.
    pub fn from_data(data: &ConstructionData<D>) -> Result<Self> {
        let mut construction = Self::new(data.name.clone(), data.tech_level);
        for rule in &data.rules {
            construction.set_rule_enabled(*rule, true, false);
        }

        for sequence in &data.sequences {
            let id = construction.add_sequence(sequence.kind, false);
            for stage_data in &sequence.stages {
                let stage = construction
                    .sequence(&id)
                    .stage_by_name(&stage_data.stage)
                    .map(|index| StageId::sequence(id, index))
                    .ok_or_else(|| ForgeError::UnknownStage(stage_data.stage.clone()))?;
                construction.load_stage(stage, stage_data)?;
            }
        }

        for stage_data in &data.common_stages {
            let stage = construction
                .find_stage(None, &stage_data.stage)
                .ok_or_else(|| ForgeError::UnknownStage(stage_data.stage.clone()))?;
            construction.load_stage(stage, stage_data)?;
        }

        construction.regenerate();
        Ok(construction)
    }

    fn load_stage(&mut self, stage: StageId, data: &StageData) -> Result<()> {
        for component_data in &data.components {
            let mut component = D::registry().create(&component_data.component)?;
            for (option, value) in &component_data.options {
                component.set_option_value(option, value.clone())?;
            }
            self.add_component(stage, component, false)?;
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_data())?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let data: ConstructionData<D> = serde_json::from_str(json)?;
        Self::from_data(&data)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
