//! Errors raised while setting up state machines.

use crate::core::ActorId;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MachineError {
    /// No transition table is registered under this type name.
    #[error("No transition table registered for state machine type '{0}'")]
    UnknownType(String),

    #[error("No actor registered for {0}")]
    UnknownActor(ActorId),

    #[error("{0} is not a state machine")]
    NotAMachine(ActorId),
}
