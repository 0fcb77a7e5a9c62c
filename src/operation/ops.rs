//! Reversible operations.

use crate::core::StateId;
use serde::{Deserialize, Serialize};

/// Tag describing what an operation does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    Nothing,
    StateChange,
    Custom,
}

/// Jump straight to `target`, bypassing the transition table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChangeOperation {
    pub target: StateId,
}

impl StateChangeOperation {
    pub fn new(target: StateId) -> Self {
        Self { target }
    }
}

/// Operation defined by some other producer (a tool, a data model, ...).
///
/// The payload is opaque to the undo machinery; only the actor that
/// recorded it knows how to interpret it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomOperation {
    pub kind: String,
    pub payload: Vec<u8>,
}

/// A value describing one change that an `OperationActor` can apply.
///
/// Operations are immutable once built; undo history stores them in
/// do/undo pairs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Nothing,
    StateChange(StateChangeOperation),
    Custom(CustomOperation),
}

impl Operation {
    pub fn state_change(target: StateId) -> Self {
        Self::StateChange(StateChangeOperation::new(target))
    }

    pub fn custom(kind: impl Into<String>, payload: Vec<u8>) -> Self {
        Self::Custom(CustomOperation {
            kind: kind.into(),
            payload,
        })
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Nothing => OperationKind::Nothing,
            Self::StateChange(_) => OperationKind::StateChange,
            Self::Custom(_) => OperationKind::Custom,
        }
    }
}
