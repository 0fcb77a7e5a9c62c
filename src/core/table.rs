//! Transition tables and the registry that binds them to type names.
//!
//! A table is built (and validated) once per state-machine type and then
//! shared read-only, via `Arc`, by every machine of that type.

use super::ids::StateId;
use super::state::StateNode;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Arena of all states of one state-machine type.
///
/// Machines refer to states by `StateId`, never by pointer, so a table can be
/// shared freely between machines and threads once it is built.
#[derive(Clone, Debug)]
pub struct TransitionTable {
    type_name: String,
    states: Vec<StateNode>,
    index: HashMap<StateId, usize>,
    start: usize,
}

impl TransitionTable {
    /// Assemble a table from states that already passed validation.
    pub(crate) fn from_validated(type_name: String, states: Vec<StateNode>, start: StateId) -> Self {
        let index: HashMap<StateId, usize> = states
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id(), i))
            .collect();
        let start = index.get(&start).copied().unwrap_or_default();
        Self {
            type_name,
            states,
            index,
            start,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// State with the given id, if this table has one.
    pub fn state(&self, id: StateId) -> Option<&StateNode> {
        self.index.get(&id).map(|&i| &self.states[i])
    }

    pub fn start_state(&self) -> &StateNode {
        &self.states[self.start]
    }

    pub fn contains(&self, id: StateId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn states(&self) -> &[StateNode] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Errors raised while registering tables.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("A transition table is already registered for type '{0}'")]
    AlreadyRegistered(String),
}

/// Process-wide mapping from type name to transition table.
///
/// Registration is expected to happen up front; afterwards the registry is
/// only read, so lookups take a shared lock.
///
/// # Example
///
/// ```rust
/// use retrace::builder::{StateBuilder, TransitionTableBuilder};
/// use retrace::core::{EventId, StateId, TableRegistry, NO_SIDE_EFFECT};
///
/// let table = TransitionTableBuilder::new("toggle")
///     .start(StateId(0))
///     .state(StateBuilder::new(StateId(0), "Off").on(EventId(1), StateId(1), NO_SIDE_EFFECT))
///     .state(StateBuilder::new(StateId(1), "On").on(EventId(1), StateId(0), NO_SIDE_EFFECT))
///     .build()
///     .unwrap();
///
/// let registry = TableRegistry::new();
/// registry.register(table).unwrap();
///
/// assert_eq!(registry.lookup_start_state("toggle"), Some(StateId(0)));
/// assert_eq!(registry.lookup_start_state("unknown"), None);
/// ```
#[derive(Debug, Default)]
pub struct TableRegistry {
    tables: RwLock<HashMap<String, Arc<TransitionTable>>>,
}

impl TableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a table to its type name. A type can only be registered once.
    pub fn register(&self, table: TransitionTable) -> Result<Arc<TransitionTable>, RegistryError> {
        let mut tables = self.tables.write();
        if tables.contains_key(table.type_name()) {
            return Err(RegistryError::AlreadyRegistered(
                table.type_name().to_string(),
            ));
        }

        let table = Arc::new(table);
        tracing::debug!(
            machine_type = table.type_name(),
            states = table.len(),
            "registered transition table"
        );
        tables.insert(table.type_name().to_string(), Arc::clone(&table));
        Ok(table)
    }

    pub fn lookup(&self, type_name: &str) -> Option<Arc<TransitionTable>> {
        self.tables.read().get(type_name).cloned()
    }

    /// Start state of a registered type, `None` when the type is unknown.
    pub fn lookup_start_state(&self, type_name: &str) -> Option<StateId> {
        self.tables
            .read()
            .get(type_name)
            .map(|table| table.start_state().id())
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.tables.read().contains_key(type_name)
    }

    pub fn type_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.read().keys().cloned().collect();
        names.sort();
        names
    }
}
