//! Builder for a single state and its outgoing transitions.

use crate::core::{EventId, SideEffectId, StateId, StateNode, Transition};

/// Builder for constructing states with a fluent API.
#[derive(Clone, Debug)]
pub struct StateBuilder {
    id: StateId,
    name: String,
    transitions: Vec<(EventId, Transition)>,
}

impl StateBuilder {
    /// Create a builder for the state `id` called `name`.
    pub fn new(id: StateId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            transitions: Vec::new(),
        }
    }

    /// On `event`, move to `next` and run `side_effect`.
    ///
    /// A later call for the same event replaces the earlier one.
    pub fn on(mut self, event: EventId, next: StateId, side_effect: SideEffectId) -> Self {
        self.transitions
            .push((event, Transition::new(next, side_effect)));
        self
    }

    /// On `event`, stay in this state and run `side_effect`.
    pub fn stay_on(self, event: EventId, side_effect: SideEffectId) -> Self {
        let id = self.id;
        self.on(event, id, side_effect)
    }

    pub fn id(&self) -> StateId {
        self.id
    }

    /// Build the state node.
    pub fn build(self) -> StateNode {
        self.transitions
            .into_iter()
            .fold(StateNode::new(self.id, self.name), |node, (event, t)| {
                node.with_transition(event, t)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NO_SIDE_EFFECT;

    #[test]
    fn builds_state_with_transitions() {
        let state = StateBuilder::new(StateId(1), "Idle")
            .on(EventId(1), StateId(2), SideEffectId(3))
            .stay_on(EventId(2), NO_SIDE_EFFECT)
            .build();

        assert_eq!(state.name(), "Idle");
        assert_eq!(
            state.transition(EventId(1)),
            Some(&Transition::new(StateId(2), SideEffectId(3)))
        );
        assert_eq!(state.transition(EventId(2)).unwrap().next, StateId(1));
    }

    #[test]
    fn later_transition_for_same_event_wins() {
        let state = StateBuilder::new(StateId(1), "Idle")
            .on(EventId(1), StateId(2), NO_SIDE_EFFECT)
            .on(EventId(1), StateId(3), NO_SIDE_EFFECT)
            .build();

        assert_eq!(state.transition(EventId(1)).unwrap().next, StateId(3));
    }
}
