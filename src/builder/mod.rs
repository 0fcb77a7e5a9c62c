//! Builder API for transition tables.
//!
//! Tables can be assembled with fluent builders, declared with the
//! `transition_table!` macro, or loaded from a serialized `TableDefinition`.
//! All three paths end in the same validation, which reports every
//! structural problem at once.

pub mod definition;
pub mod error;
pub mod macros;
pub mod state;
pub mod table;
pub mod validation;

pub use definition::{
    load_table, DefinitionError, StateDefinition, TableDefinition, TransitionDefinition,
};
pub use error::{BuildError, TableViolation};
pub use state::StateBuilder;
pub use table::TransitionTableBuilder;
