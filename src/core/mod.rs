//! Core value types of the interaction engine.
//!
//! This module contains the read-only side of a state machine:
//! - Identifier newtypes and the correlation-id allocator
//! - States and transitions
//! - Transition tables and the registry binding them to type names
//! - The `Event` trait consumed by `StateMachine::handle_event`

mod event;
mod ids;
mod state;
mod table;

pub use event::{Event, StateEvent};
pub use ids::{
    ActorId, EventId, GroupEventId, IdAllocator, ObjectEventId, SideEffectId, StateId,
    NO_SIDE_EFFECT,
};
pub use state::{StateNode, Transition};
pub use table::{RegistryError, TableRegistry, TransitionTable};
