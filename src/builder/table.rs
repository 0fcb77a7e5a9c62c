//! Builder for constructing transition tables.

use crate::builder::error::BuildError;
use crate::builder::state::StateBuilder;
use crate::builder::validation::validate_states;
use crate::core::{StateId, StateNode, TransitionTable};
use stillwater::validation::Validation;

/// Builder for constructing transition tables with a fluent API.
#[derive(Clone, Debug)]
pub struct TransitionTableBuilder {
    type_name: String,
    start: Option<StateId>,
    states: Vec<StateNode>,
}

impl TransitionTableBuilder {
    /// Create a builder for the state-machine type `type_name`.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            start: None,
            states: Vec::new(),
        }
    }

    /// Set the start state (required).
    pub fn start(mut self, id: StateId) -> Self {
        self.start = Some(id);
        self
    }

    /// Add a state using a builder.
    pub fn state(mut self, builder: StateBuilder) -> Self {
        self.states.push(builder.build());
        self
    }

    /// Add a pre-built state.
    pub fn add_state(mut self, state: StateNode) -> Self {
        self.states.push(state);
        self
    }

    /// Add multiple states at once.
    pub fn states(mut self, states: impl IntoIterator<Item = StateNode>) -> Self {
        self.states.extend(states);
        self
    }

    /// Build and validate the table.
    ///
    /// Structural problems are all reported at once in `BuildError::Invalid`.
    pub fn build(self) -> Result<TransitionTable, BuildError> {
        if self.type_name.trim().is_empty() {
            return Err(BuildError::MissingTypeName);
        }
        let start = self.start.ok_or(BuildError::MissingStartState)?;
        if self.states.is_empty() {
            return Err(BuildError::NoStates);
        }

        match validate_states(&self.states, start) {
            Validation::Success(()) => Ok(TransitionTable::from_validated(
                self.type_name,
                self.states,
                start,
            )),
            Validation::Failure(errors) => Err(BuildError::Invalid {
                type_name: self.type_name,
                violations: errors.iter().cloned().collect(),
            }),
        }
    }
}
