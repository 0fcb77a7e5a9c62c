//! Retrace: interaction state machines with transactional undo
//!
//! Retrace decodes discrete events into state transitions, records every
//! real state change as an invertible operation in a shared undo history,
//! and rolls a change back automatically when the side effect attached to
//! its transition fails.
//!
//! # Core Concepts
//!
//! - **Transition tables**: per-type state graphs, built once and shared
//! - **State machines**: commit a transition, then run its side effect
//! - **Operations**: do/undo pairs recorded per actor with correlation ids
//! - **Undo controller**: linear history, undone one object or group at a time
//! - **Sessions**: many machines and custom actors behind one history
//!
//! # Example
//!
//! ```rust
//! use retrace::core::{EventId, SideEffectId, StateId, TableRegistry};
//! use retrace::machine::{SideEffectTable, TracingStatusSink};
//! use retrace::session::{InteractionSession, SessionConfig};
//! use retrace::transition_table;
//! use std::sync::Arc;
//!
//! let registry = Arc::new(TableRegistry::new());
//! registry
//!     .register(
//!         transition_table! {
//!             name "door";
//!             start 0;
//!             state 0 "Closed" { 1 => 1, 10; }
//!             state 1 "Open" { 2 => 0; }
//!         }
//!         .unwrap(),
//!     )
//!     .unwrap();
//!
//! let mut session =
//!     InteractionSession::new(SessionConfig::default(), registry, Arc::new(TracingStatusSink));
//!
//! // The motor is jammed: opening fails and is rolled back.
//! let door = session
//!     .spawn_machine("door", SideEffectTable::new().on(SideEffectId(10), |_| false))
//!     .unwrap();
//!
//! session.broadcast(&EventId(1));
//! assert_eq!(session.machine(door).unwrap().current_state_id(), StateId(0));
//! assert!(session.undo_controller().is_empty());
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod machine;
pub mod operation;
pub mod session;
pub mod undo;

// Re-export commonly used types
pub use crate::core::{Event, EventId, IdAllocator, StateId, TableRegistry, TransitionTable};
pub use machine::{SideEffectExecutor, StateMachine, StatusSink};
pub use operation::{Operation, OperationActor, OperationEvent};
pub use session::InteractionSession;
pub use undo::UndoController;
