//! States and transitions of a transition table.
//!
//! States are immutable once their table is built. They are shared
//! read-only by every state machine of the same type.

use super::ids::{EventId, SideEffectId, StateId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Edge of the state graph: where an event leads and what to run afterwards.
///
/// The source state is implied by the `StateNode` that owns the transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Target state, resolved through the owning table.
    pub next: StateId,
    /// Side effect executed after the state is committed.
    pub side_effect: SideEffectId,
}

impl Transition {
    pub fn new(next: StateId, side_effect: SideEffectId) -> Self {
        Self { next, side_effect }
    }
}

/// A node of the state graph.
///
/// A state without outgoing transitions is terminal; that is legal.
///
/// # Example
///
/// ```rust
/// use retrace::core::{EventId, SideEffectId, StateId, StateNode, Transition};
///
/// let idle = StateNode::new(StateId(1), "Idle")
///     .with_transition(EventId(10), Transition::new(StateId(2), SideEffectId(5)));
///
/// assert!(idle.transition(EventId(10)).is_some());
/// assert!(idle.transition(EventId(11)).is_none());
/// assert!(!idle.is_terminal());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateNode {
    id: StateId,
    name: String,
    transitions: HashMap<EventId, Transition>,
}

impl StateNode {
    pub fn new(id: StateId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            transitions: HashMap::new(),
        }
    }

    /// Add (or replace) the transition taken on `event`.
    pub fn with_transition(mut self, event: EventId, transition: Transition) -> Self {
        self.transitions.insert(event, transition);
        self
    }

    pub fn id(&self) -> StateId {
        self.id
    }

    /// Human-readable name used in logs and diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Transition for `event`, or `None` when the event does not apply here.
    ///
    /// `None` is distinct from a self-transition: it means "ignore the event".
    pub fn transition(&self, event: EventId) -> Option<&Transition> {
        self.transitions.get(&event)
    }

    pub fn transitions(&self) -> impl Iterator<Item = (EventId, &Transition)> {
        self.transitions.iter().map(|(event, t)| (*event, t))
    }

    /// True when no event leads out of this state.
    pub fn is_terminal(&self) -> bool {
        self.transitions.is_empty()
    }
}
