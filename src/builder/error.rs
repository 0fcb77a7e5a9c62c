//! Build errors for transition tables.

use crate::core::{EventId, StateId};
use thiserror::Error;

/// A single problem found while validating a transition table.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TableViolation {
    #[error("State {0} is defined more than once")]
    DuplicateState(StateId),

    #[error("State {0} has an empty name")]
    UnnamedState(StateId),

    #[error("Transition from {from} on {event} targets unknown {target}")]
    DanglingTransition {
        from: StateId,
        event: EventId,
        target: StateId,
    },

    #[error("Start {0} is not part of the table")]
    UnknownStartState(StateId),
}

/// Errors that can occur when building transition tables.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Type name not specified. Pass a non-empty name to TransitionTableBuilder::new")]
    MissingTypeName,

    #[error("Start state not specified. Call .start(id) before .build()")]
    MissingStartState,

    #[error("No states defined. Add at least one state")]
    NoStates,

    #[error("Transition table '{type_name}' is invalid: {}", describe(.violations))]
    Invalid {
        type_name: String,
        violations: Vec<TableViolation>,
    },
}

fn describe(violations: &[TableViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
