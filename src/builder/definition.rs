//! Serializable transition-table definitions.
//!
//! Hosts that keep their interaction patterns in configuration files load
//! them through `TableDefinition`, which converts into a validated
//! `TransitionTable`.

use crate::builder::error::BuildError;
use crate::builder::state::StateBuilder;
use crate::builder::table::TransitionTableBuilder;
use crate::core::{EventId, SideEffectId, StateId, TransitionTable, NO_SIDE_EFFECT};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a definition.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("Failed to parse transition table definition: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Build(#[from] BuildError),
}

/// One outgoing edge of a state definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionDefinition {
    pub event: EventId,
    pub next: StateId,
    #[serde(default = "no_side_effect")]
    pub side_effect: SideEffectId,
}

fn no_side_effect() -> SideEffectId {
    NO_SIDE_EFFECT
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDefinition {
    pub id: StateId,
    pub name: String,
    #[serde(default)]
    pub transitions: Vec<TransitionDefinition>,
}

/// Definition of a whole state-machine type.
///
/// # Example
///
/// ```rust
/// use retrace::builder::TableDefinition;
/// use retrace::core::StateId;
///
/// let json = r#"{
///     "type_name": "toggle",
///     "start": 0,
///     "states": [
///         { "id": 0, "name": "Off", "transitions": [{ "event": 1, "next": 1, "side_effect": 3 }] },
///         { "id": 1, "name": "On", "transitions": [{ "event": 1, "next": 0 }] }
///     ]
/// }"#;
///
/// let table = TableDefinition::from_json(json).unwrap().into_table().unwrap();
/// assert_eq!(table.start_state().id(), StateId(0));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDefinition {
    pub type_name: String,
    pub start: StateId,
    pub states: Vec<StateDefinition>,
}

impl TableDefinition {
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Capture an existing table, e.g. to export it.
    pub fn from_table(table: &TransitionTable) -> Self {
        let states = table
            .states()
            .iter()
            .map(|state| {
                let mut transitions: Vec<TransitionDefinition> = state
                    .transitions()
                    .map(|(event, t)| TransitionDefinition {
                        event,
                        next: t.next,
                        side_effect: t.side_effect,
                    })
                    .collect();
                transitions.sort_by_key(|t| t.event);
                StateDefinition {
                    id: state.id(),
                    name: state.name().to_string(),
                    transitions,
                }
            })
            .collect();

        Self {
            type_name: table.type_name().to_string(),
            start: table.start_state().id(),
            states,
        }
    }

    pub fn to_json(&self) -> Result<String, DefinitionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the definition and build the table.
    pub fn into_table(self) -> Result<TransitionTable, DefinitionError> {
        let builder = self.states.into_iter().fold(
            TransitionTableBuilder::new(self.type_name).start(self.start),
            |builder, state| {
                let state_builder = state
                    .transitions
                    .into_iter()
                    .fold(StateBuilder::new(state.id, state.name), |b, t| {
                        b.on(t.event, t.next, t.side_effect)
                    });
                builder.state(state_builder)
            },
        );
        Ok(builder.build()?)
    }
}

/// Parse and build a table in one go.
pub fn load_table(json: &str) -> Result<TransitionTable, DefinitionError> {
    TableDefinition::from_json(json)?.into_table()
}
