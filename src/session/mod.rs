//! Sessions: many actors, one undo history.
//!
//! A session owns the state machines driven by one host (e.g. one editor
//! window), the shared `UndoController`, and the allocator that mints
//! correlation ids for user actions.

mod config;
mod interaction;

pub use config::SessionConfig;
pub use interaction::InteractionSession;
