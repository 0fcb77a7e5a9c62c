//! Undo controller and its configuration.
//!
//! The controller owns every recorded `OperationEvent`. It never applies
//! operations itself; replay goes through an `ActorRegistry` that resolves
//! the actor handle stored in each entry.

mod config;
mod controller;

pub use config::{UndoConfig, DEFAULT_MAX_HISTORY};
pub use controller::UndoController;
