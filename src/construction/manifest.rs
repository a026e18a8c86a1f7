//! Manifest: the cost, weight and factor report derived from recorded steps.
//!
//! Sections follow phase order. In common phases a component whose step reads
//! the same for every sequence is listed once; otherwise each sequence gets its
//! own prefixed entry. The comparison is on display text, so two different
//! factors that render identically are merged.

use serde::Serialize;
use std::fmt;

use super::domain::{ConstructionDomain, ConstructionPhase};
use super::scalar::{format_number, ScalarValue};
use super::sequence::{RecordedStep, SequenceState, StepOrigin};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManifestEntry {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<ScalarValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<ScalarValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub factors: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManifestSection {
    pub name: String,
    pub entries: Vec<ManifestEntry>,
}

impl ManifestSection {
    pub fn total_cost(&self) -> ScalarValue {
        ScalarValue::sum(
            self.entries.iter().filter_map(|entry| entry.cost.as_ref()),
            &format!("{} Cost", self.name),
        )
    }

    pub fn total_weight(&self) -> ScalarValue {
        ScalarValue::sum(
            self.entries.iter().filter_map(|entry| entry.weight.as_ref()),
            &format!("{} Weight", self.name),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Manifest {
    pub sections: Vec<ManifestSection>,
}

impl Manifest {
    pub fn sections(&self) -> &[ManifestSection] {
        &self.sections
    }

    pub fn section(&self, name: &str) -> Option<&ManifestSection> {
        self.sections.iter().find(|section| section.name == name)
    }

    pub fn entries(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.sections.iter().flat_map(|section| section.entries.iter())
    }

    pub fn total_cost(&self) -> ScalarValue {
        ScalarValue::sum(
            self.entries().filter_map(|entry| entry.cost.as_ref()),
            "Total Cost",
        )
    }

    pub fn total_weight(&self) -> ScalarValue {
        ScalarValue::sum(
            self.entries().filter_map(|entry| entry.weight.as_ref()),
            "Total Weight",
        )
    }

    pub(crate) fn build<D: ConstructionDomain>(sequences: &[SequenceState<D>]) -> Self {
        let mut sections = Vec::new();
        for &phase in D::Phase::all() {
            let entries = if phase.is_common() {
                common_entries(sequences, phase)
            } else {
                sequence_entries(sequences, phase)
            };
            if !entries.is_empty() {
                sections.push(ManifestSection {
                    name: phase.to_string(),
                    entries,
                });
            }
        }
        Self { sections }
    }
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            writeln!(f, "{}", section.name)?;
            for entry in &section.entries {
                write!(f, "  {}", entry.text)?;
                if let Some(cost) = &entry.cost {
                    write!(f, "  Cr{}", cost)?;
                }
                if let Some(weight) = &entry.weight {
                    write!(f, "  {}kg", weight)?;
                }
                writeln!(f)?;
                for factor in &entry.factors {
                    writeln!(f, "      {}", factor)?;
                }
                for note in &entry.notes {
                    writeln!(f, "      Note: {}", note)?;
                }
            }
        }
        write!(
            f,
            "Total: Cr{}, {}kg",
            format_number(self.total_cost().value()),
            format_number(self.total_weight().value())
        )
    }
}

/// Prefix naming a sequence, empty when there is only one
fn sequence_prefix(index: usize, count: usize) -> String {
    match (index, count) {
        (_, 0..=1) => String::new(),
        (0, _) => "Primary: ".to_string(),
        (_, 2) => "Secondary: ".to_string(),
        (index, _) => format!("Secondary {}: ", index),
    }
}

fn make_entry<D: ConstructionDomain>(
    state: &SequenceState<D>,
    recorded: &RecordedStep<D>,
    prefix: &str,
    with_totals: bool,
) -> ManifestEntry {
    let step = &recorded.step;
    let text = format!("{}{}", prefix, step.display_name());
    let (cost, weight) = if with_totals {
        (
            state
                .step_cost(step)
                .map(|value| ScalarValue::new(value).named(text.clone())),
            state
                .step_weight(step)
                .map(|value| ScalarValue::new(value).named(text.clone())),
        )
    } else {
        (None, None)
    };
    ManifestEntry {
        text,
        cost,
        weight,
        factors: step.factor_strings(),
        notes: step.notes().to_vec(),
    }
}

fn sequence_entries<D: ConstructionDomain>(
    sequences: &[SequenceState<D>],
    phase: D::Phase,
) -> Vec<ManifestEntry> {
    let mut entries = Vec::new();
    for (index, state) in sequences.iter().enumerate() {
        let prefix = sequence_prefix(index, sequences.len());
        for recorded in state.phase_steps(phase) {
            entries.push(make_entry(state, recorded, &prefix, true));
        }
    }
    entries
}

fn common_entries<D: ConstructionDomain>(
    sequences: &[SequenceState<D>],
    phase: D::Phase,
) -> Vec<ManifestEntry> {
    let mut origins: Vec<StepOrigin> = Vec::new();
    for state in sequences {
        for recorded in state.phase_steps(phase) {
            if !origins.contains(&recorded.origin) {
                origins.push(recorded.origin);
            }
        }
    }

    let mut entries = Vec::new();
    for origin in origins {
        let per_sequence: Vec<Option<&RecordedStep<D>>> = sequences
            .iter()
            .map(|state| {
                state
                    .phase_steps(phase)
                    .find(|recorded| recorded.origin == origin)
            })
            .collect();

        let texts: Vec<Option<(String, Vec<String>, &[String])>> = per_sequence
            .iter()
            .map(|recorded| {
                recorded.map(|r| (r.step.display_name(), r.step.factor_strings(), r.step.notes()))
            })
            .collect();
        let identical = texts.iter().all(Option::is_some) && texts.windows(2).all(|w| w[0] == w[1]);

        match (identical, per_sequence.first().copied().flatten()) {
            (true, Some(primary)) => {
                entries.push(make_entry(&sequences[0], primary, "", true));
            }
            _ => {
                for (index, recorded) in per_sequence.iter().copied().enumerate() {
                    if let Some(recorded) = recorded {
                        let prefix = sequence_prefix(index, sequences.len());
                        entries.push(make_entry(&sequences[index], recorded, &prefix, index == 0));
                    }
                }
            }
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_prefix() {
        assert_eq!(sequence_prefix(0, 1), "");
        assert_eq!(sequence_prefix(0, 2), "Primary: ");
        assert_eq!(sequence_prefix(1, 2), "Secondary: ");
        assert_eq!(sequence_prefix(2, 3), "Secondary 2: ");
    }

    #[test]
    fn test_totals_sum_entries() {
        let manifest = Manifest {
            sections: vec![ManifestSection {
                name: "Receiver".to_string(),
                entries: vec![
                    ManifestEntry {
                        text: "Receiver: Handgun".to_string(),
                        cost: Some(ScalarValue::new(175.0)),
                        weight: Some(ScalarValue::new(0.8)),
                        factors: vec!["Ammo Capacity = 10".to_string()],
                        notes: Vec::new(),
                    },
                    ManifestEntry {
                        text: "Calibre: Medium Handgun".to_string(),
                        cost: None,
                        weight: None,
                        factors: Vec::new(),
                        notes: Vec::new(),
                    },
                ],
            }],
        };
        assert_eq!(manifest.total_cost().value(), 175.0);
        assert_eq!(manifest.total_weight().value(), 0.8);
        assert_eq!(manifest.sections()[0].total_cost().value(), 175.0);

        let text = manifest.to_string();
        assert!(text.contains("Receiver: Handgun  Cr175  0.8kg"));
        assert!(text.ends_with("Total: Cr175, 0.8kg"));
    }
}
