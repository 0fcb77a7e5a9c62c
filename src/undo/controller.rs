//! Linear undo/redo history of operation events.

use super::config::UndoConfig;
use crate::core::{ActorId, GroupEventId, ObjectEventId};
use crate::operation::{ActorRegistry, OperationError, OperationEvent};
use std::collections::VecDeque;

/// Which correlation id decides how far one undo step reaches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Granularity {
    Object(ObjectEventId),
    Group(GroupEventId),
}

impl Granularity {
    fn of(event: &OperationEvent, fine: bool) -> Self {
        if fine {
            Self::Object(event.object_event_id)
        } else {
            Self::Group(event.group_event_id)
        }
    }

    fn matches(self, event: &OperationEvent) -> bool {
        match self {
            Self::Object(id) => event.object_event_id == id,
            Self::Group(id) => event.group_event_id == id,
        }
    }
}

/// Ordered history of recorded operation events.
///
/// The most recently pushed entry is always the first to be undone. Entries
/// sharing its object event id (fine undo) or group event id (coarse undo)
/// are undone together, newest first. Undone entries move to a redo list
/// until a new entry is recorded.
#[derive(Debug, Default)]
pub struct UndoController {
    config: UndoConfig,
    history: VecDeque<OperationEvent>,
    redo: Vec<OperationEvent>,
}

impl UndoController {
    pub fn new(config: UndoConfig) -> Self {
        Self {
            config,
            history: VecDeque::new(),
            redo: Vec::new(),
        }
    }

    pub fn config(&self) -> &UndoConfig {
        &self.config
    }

    /// Record one entry, evicting the oldest ones beyond the configured bound.
    ///
    /// Recording discards everything that could have been redone.
    pub fn set_operation_event(&mut self, event: OperationEvent) {
        self.redo.clear();
        self.history.push_back(event);

        if let Some(max) = self.config.max_history {
            while self.history.len() > max {
                if let Some(evicted) = self.history.pop_front() {
                    tracing::trace!(
                        actor = %evicted.actor,
                        object_event_id = %evicted.object_event_id,
                        "evicted oldest undo entry"
                    );
                }
            }
        }
    }

    /// Undo the trailing run of entries sharing the newest entry's id.
    ///
    /// `fine` groups by object event id, otherwise by group event id. Returns
    /// `false` on empty history, or when any entry could not be applied.
    ///
    /// An entry whose actor `actors` cannot resolve stops the run and stays
    /// in the history, together with everything older. Entries whose actor
    /// rejected the operation are still moved to the redo list.
    pub fn undo(&mut self, fine: bool, actors: &mut dyn ActorRegistry) -> bool {
        let Some(key) = self.history.back().map(|e| Granularity::of(e, fine)) else {
            return false;
        };

        let mut ok = true;
        while let Some(event) = self.history.back().filter(|e| key.matches(e)) {
            tracing::debug!(
                actor = %event.actor,
                object_event_id = %event.object_event_id,
                group_event_id = %event.group_event_id,
                operation = ?event.undo_operation.kind(),
                "undo"
            );
            match actors.execute(event.actor, &event.undo_operation) {
                Ok(()) => {}
                Err(OperationError::UnknownActor(actor)) if actor == event.actor => {
                    tracing::warn!(%actor, "undo stopped at entry of unreachable actor");
                    return false;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "undo operation could not be applied");
                    ok = false;
                }
            }
            if let Some(event) = self.history.pop_back() {
                self.redo.push(event);
            }
        }
        ok
    }

    /// Redo the most recently undone run, oldest entry first.
    ///
    /// Returns `false` when there is nothing to redo or an entry could not
    /// be applied. Unreachable actors stop the run like in [`Self::undo`].
    pub fn redo(&mut self, fine: bool, actors: &mut dyn ActorRegistry) -> bool {
        let Some(key) = self.redo.last().map(|e| Granularity::of(e, fine)) else {
            return false;
        };

        let mut ok = true;
        while let Some(event) = self.redo.last().filter(|e| key.matches(e)) {
            tracing::debug!(
                actor = %event.actor,
                object_event_id = %event.object_event_id,
                group_event_id = %event.group_event_id,
                operation = ?event.do_operation.kind(),
                "redo"
            );
            match actors.execute(event.actor, &event.do_operation) {
                Ok(()) => {}
                Err(OperationError::UnknownActor(actor)) if actor == event.actor => {
                    tracing::warn!(%actor, "redo stopped at entry of unreachable actor");
                    return false;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "redo operation could not be applied");
                    ok = false;
                }
            }
            if let Some(event) = self.redo.pop() {
                self.history.push_back(event);
            }
        }
        ok
    }

    /// Object event id of the newest entry, without removing it.
    pub fn last_object_event_id(&self) -> Option<ObjectEventId> {
        self.history.back().map(|e| e.object_event_id)
    }

    pub fn last_group_event_id(&self) -> Option<GroupEventId> {
        self.history.back().map(|e| e.group_event_id)
    }

    /// Drop every entry recorded for `actor`, e.g. when it is destroyed.
    pub fn forget_actor(&mut self, actor: ActorId) -> usize {
        let before = self.history.len() + self.redo.len();
        self.history.retain(|e| e.actor != actor);
        self.redo.retain(|e| e.actor != actor);
        before - self.history.len() - self.redo.len()
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.redo.clear();
    }

    /// Entries that can be undone, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &OperationEvent> {
        self.history.iter()
    }

    /// Entries that can be redone, next-to-redo last.
    pub fn redo_entries(&self) -> &[OperationEvent] {
        &self.redo
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Replace both lists, e.g. when restoring a checkpoint.
    pub(crate) fn replace(&mut self, history: Vec<OperationEvent>, redo: Vec<OperationEvent>) {
        self.history = history.into();
        self.redo = redo;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StateId;
    use crate::operation::{NoActors, Operation};

    /// Actor registry tracking the state of actor 1 only.
    struct Tracker {
        state: StateId,
        applied: usize,
    }

    impl ActorRegistry for Tracker {
        fn execute(&mut self, actor: ActorId, operation: &Operation) -> Result<(), OperationError> {
            if actor != ActorId(1) {
                return Err(OperationError::UnknownActor(actor));
            }
            if let Operation::StateChange(op) = operation {
                self.state = op.target;
            }
            self.applied += 1;
            Ok(())
        }
    }

    fn change(from: u32, to: u32, oid: u32, gid: u32) -> OperationEvent {
        OperationEvent::new(
            ActorId(1),
            Operation::state_change(StateId(to)),
            Operation::state_change(StateId(from)),
            ObjectEventId(oid),
            GroupEventId(gid),
        )
    }

    #[test]
    fn undo_on_empty_history_returns_false() {
        let mut undo = UndoController::default();
        assert!(!undo.undo(true, &mut NoActors));
        assert!(!undo.redo(true, &mut NoActors));
        assert_eq!(undo.last_object_event_id(), None);
    }

    #[test]
    fn fine_undo_stops_at_object_event_boundary() {
        let mut undo = UndoController::default();
        undo.set_operation_event(change(0, 1, 10, 1));
        undo.set_operation_event(change(1, 2, 10, 1));
        undo.set_operation_event(change(2, 3, 11, 1));
        let mut tracker = Tracker {
            state: StateId(3),
            applied: 0,
        };

        assert!(undo.undo(true, &mut tracker));
        assert_eq!(tracker.state, StateId(2));
        assert_eq!(undo.len(), 2);

        assert!(undo.undo(true, &mut tracker));
        assert_eq!(tracker.state, StateId(0));
        assert!(undo.is_empty());
        assert_eq!(tracker.applied, 3);
    }

    #[test]
    fn coarse_undo_uses_group_event_id() {
        let mut undo = UndoController::default();
        undo.set_operation_event(change(0, 1, 10, 1));
        undo.set_operation_event(change(1, 2, 11, 2));
        undo.set_operation_event(change(2, 3, 12, 2));
        let mut tracker = Tracker {
            state: StateId(3),
            applied: 0,
        };

        assert!(undo.undo(false, &mut tracker));
        assert_eq!(tracker.state, StateId(1));
        assert_eq!(undo.last_group_event_id(), Some(GroupEventId(1)));
    }

    #[test]
    fn redo_reapplies_undone_run_in_order() {
        let mut undo = UndoController::default();
        undo.set_operation_event(change(0, 1, 10, 1));
        undo.set_operation_event(change(1, 2, 10, 1));
        let mut tracker = Tracker {
            state: StateId(2),
            applied: 0,
        };

        assert!(undo.undo(true, &mut tracker));
        assert_eq!(tracker.state, StateId(0));
        assert!(undo.can_redo());

        assert!(undo.redo(true, &mut tracker));
        assert_eq!(tracker.state, StateId(2));
        assert_eq!(undo.len(), 2);
        assert!(!undo.can_redo());
    }

    #[test]
    fn recording_clears_redo() {
        let mut undo = UndoController::default();
        undo.set_operation_event(change(0, 1, 10, 1));
        let mut tracker = Tracker {
            state: StateId(1),
            applied: 0,
        };
        undo.undo(true, &mut tracker);
        assert!(undo.can_redo());

        undo.set_operation_event(change(0, 2, 11, 2));
        assert!(!undo.can_redo());
    }

    #[test]
    fn bounded_history_evicts_oldest_entry() {
        let mut undo = UndoController::new(UndoConfig::bounded(2));
        undo.set_operation_event(change(0, 1, 1, 1));
        undo.set_operation_event(change(1, 2, 2, 2));
        undo.set_operation_event(change(2, 3, 3, 3));

        let oids: Vec<_> = undo.history().map(|e| e.object_event_id).collect();
        assert_eq!(oids, vec![ObjectEventId(2), ObjectEventId(3)]);
    }

    #[test]
    fn unreachable_actor_stops_undo_and_keeps_its_entry() {
        let mut undo = UndoController::default();
        undo.set_operation_event(OperationEvent::new(
            ActorId(9),
            Operation::Nothing,
            Operation::Nothing,
            ObjectEventId(10),
            GroupEventId(1),
        ));
        undo.set_operation_event(change(0, 1, 10, 1));
        let mut tracker = Tracker {
            state: StateId(1),
            applied: 0,
        };

        assert!(!undo.undo(true, &mut tracker));
        assert_eq!(tracker.state, StateId(0));
        assert_eq!(undo.len(), 1);
        assert_eq!(undo.history().next().unwrap().actor, ActorId(9));
        assert_eq!(undo.redo_entries().len(), 1);
    }

    #[test]
    fn unreachable_actor_on_top_changes_nothing() {
        let mut undo = UndoController::default();
        undo.set_operation_event(change(0, 1, 10, 1));
        undo.set_operation_event(OperationEvent::new(
            ActorId(9),
            Operation::Nothing,
            Operation::Nothing,
            ObjectEventId(10),
            GroupEventId(1),
        ));
        let mut tracker = Tracker {
            state: StateId(1),
            applied: 0,
        };

        assert!(!undo.undo(true, &mut tracker));
        assert_eq!(undo.len(), 2);
        assert_eq!(tracker.applied, 0);
        assert!(!undo.can_redo());
    }

    /// Registry whose only actor refuses every operation.
    struct Refusing;

    impl ActorRegistry for Refusing {
        fn execute(&mut self, actor: ActorId, _operation: &Operation) -> Result<(), OperationError> {
            Err(OperationError::Rejected {
                actor,
                reason: "read only".to_string(),
            })
        }
    }

    #[test]
    fn rejected_operation_reports_false_but_moves_on() {
        let mut undo = UndoController::default();
        undo.set_operation_event(change(0, 1, 10, 1));
        undo.set_operation_event(change(1, 2, 10, 1));

        assert!(!undo.undo(true, &mut Refusing));
        assert!(undo.is_empty());
        assert_eq!(undo.redo_entries().len(), 2);
    }

    #[test]
    fn forget_actor_removes_its_entries() {
        let mut undo = UndoController::default();
        undo.set_operation_event(change(0, 1, 10, 1));
        undo.set_operation_event(OperationEvent::new(
            ActorId(2),
            Operation::Nothing,
            Operation::Nothing,
            ObjectEventId(11),
            GroupEventId(1),
        ));

        assert_eq!(undo.forget_actor(ActorId(2)), 1);
        assert_eq!(undo.last_object_event_id(), Some(ObjectEventId(10)));

        undo.clear();
        assert!(!undo.can_undo());
    }
}
