//! Event-driven state machines with compensating rollback.
//!
//! This module provides the imperative side of the engine:
//! - `StateMachine`: looks up transitions, records them, commits them
//! - `SideEffectExecutor`: domain callbacks run after each transition
//! - `StatusSink`: operator-facing diagnostics

mod error;
#[allow(clippy::module_inception)]
mod machine;
mod side_effect;
mod status;

pub use error::MachineError;
pub use machine::{StateMachine, FOREIGN_STATE_MESSAGE, SIDE_EFFECT_FAILED_MESSAGE};
pub use side_effect::{NoSideEffects, SideEffectContext, SideEffectExecutor, SideEffectTable};
pub use status::{MemoryStatusSink, StatusSink, TracingStatusSink, STATUS_MESSAGE_DURATION};
