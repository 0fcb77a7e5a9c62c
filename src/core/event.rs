//! Domain events fed into state machines.

use super::ids::EventId;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Input to a state machine.
///
/// The core only reads the id to pick a transition; everything else an event
/// carries is for the side-effect executor.
pub trait Event: Debug {
    fn id(&self) -> EventId;
}

/// Minimal event carrying just an id and an optional display name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateEvent {
    pub id: EventId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl StateEvent {
    pub fn new(id: EventId) -> Self {
        Self {
            id,
            name: None,
        }
    }

    pub fn named(id: EventId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: Some(name.into()),
        }
    }
}

impl Event for StateEvent {
    fn id(&self) -> EventId {
        self.id
    }
}

impl Event for EventId {
    fn id(&self) -> EventId {
        *self
    }
}
