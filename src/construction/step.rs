//! Construction steps: the recorded contribution of one component.

use super::attribute::{AttributeGroup, AttributeId};
use super::factor::Factor;
use super::scalar::NumericModifier;

/// One component's contribution to a sequence during a regenerate pass
///
/// Built by a component inside `create_steps`, handed to the construction
/// context and never changed afterwards. Steps are the only channel through
/// which a component affects attributes and the manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructionStep<A: AttributeId> {
    step_type: String,
    name: String,
    cost: Option<NumericModifier>,
    weight: Option<NumericModifier>,
    factors: Vec<Factor<A>>,
    notes: Vec<String>,
}

impl<A: AttributeId> ConstructionStep<A> {
    pub fn new(step_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            step_type: step_type.into(),
            name: name.into(),
            cost: None,
            weight: None,
            factors: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn with_cost(mut self, cost: NumericModifier) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn with_weight(mut self, weight: NumericModifier) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_factor(mut self, factor: Factor<A>) -> Self {
        self.factors.push(factor);
        self
    }

    pub fn with_factors(mut self, factors: impl IntoIterator<Item = Factor<A>>) -> Self {
        self.factors.extend(factors);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn step_type(&self) -> &str {
        &self.step_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cost(&self) -> Option<NumericModifier> {
        self.cost
    }

    pub fn weight(&self) -> Option<NumericModifier> {
        self.weight
    }

    pub fn factors(&self) -> &[Factor<A>] {
        &self.factors
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// Apply every factor in order
    pub fn apply_to(&self, attributes: &mut AttributeGroup<A>) {
        for factor in &self.factors {
            factor.apply_to(attributes);
        }
    }

    /// Text shown for this step in a manifest (`Receiver: Handgun`)
    pub fn display_name(&self) -> String {
        if self.step_type.is_empty() || self.step_type == self.name {
            self.name.clone()
        } else {
            format!("{}: {}", self.step_type, self.name)
        }
    }

    /// Display strings of every factor
    pub fn factor_strings(&self) -> Vec<String> {
        self.factors.iter().map(Factor::display_string).collect()
    }

    /// True when the step carries nothing worth reporting
    pub fn is_empty(&self) -> bool {
        self.cost.is_none() && self.weight.is_none() && self.factors.is_empty() && self.notes.is_empty()
    }
}
