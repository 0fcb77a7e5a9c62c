//! Reversible operations and the actors that apply them.
//!
//! Every real state change is recorded as an `OperationEvent`: the operation
//! that performs it, the operation that reverts it, the actor that can apply
//! both, and the correlation ids used to undo related changes together.

mod actor;
mod event;
mod ops;

pub use actor::{ActorRegistry, NoActors, OperationActor, OperationError, WithActor};
pub use event::OperationEvent;
pub use ops::{CustomOperation, Operation, OperationKind, StateChangeOperation};
