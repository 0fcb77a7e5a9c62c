//! State machine that records its transitions for undo.

use super::error::MachineError;
use super::side_effect::{SideEffectContext, SideEffectExecutor};
use super::status::{StatusSink, STATUS_MESSAGE_DURATION};
use crate::core::{
    ActorId, Event, GroupEventId, ObjectEventId, StateId, StateNode, TableRegistry,
    TransitionTable,
};
use crate::operation::{
    ActorRegistry, NoActors, Operation, OperationActor, OperationError, OperationEvent,
    WithActor,
};
use crate::undo::UndoController;
use std::fmt;
use std::sync::Arc;

/// Status message raised when a side effect fails and undo is disabled.
pub const SIDE_EFFECT_FAILED_MESSAGE: &str =
    "Error! Sender: StateMachine; Message: Operation could not be done!";

/// Status message raised when an operation names a state outside the table.
pub const FOREIGN_STATE_MESSAGE: &str =
    "Error! Sender: StateMachine; Message: Operation targets a state of another machine type!";

/// Finite state machine driven by events.
///
/// Every real state change is recorded in an `UndoController` before it is
/// committed. If the side effect attached to a transition fails, the change
/// is rolled back through that same history.
///
/// # Example
///
/// ```rust
/// use retrace::builder::{StateBuilder, TransitionTableBuilder};
/// use retrace::core::{ActorId, EventId, GroupEventId, ObjectEventId, StateId, TableRegistry, NO_SIDE_EFFECT};
/// use retrace::machine::{NoSideEffects, StateMachine, TracingStatusSink};
/// use retrace::undo::UndoController;
/// use std::sync::Arc;
///
/// let registry = TableRegistry::new();
/// registry
///     .register(
///         TransitionTableBuilder::new("toggle")
///             .start(StateId(0))
///             .state(StateBuilder::new(StateId(0), "Off").on(EventId(1), StateId(1), NO_SIDE_EFFECT))
///             .state(StateBuilder::new(StateId(1), "On").on(EventId(1), StateId(0), NO_SIDE_EFFECT))
///             .build()
///             .unwrap(),
///     )
///     .unwrap();
///
/// let mut machine = StateMachine::new(
///     ActorId(1),
///     "toggle",
///     &registry,
///     NoSideEffects,
///     Arc::new(TracingStatusSink),
/// )
/// .unwrap();
/// let mut undo = UndoController::default();
///
/// assert!(machine.handle_event(&EventId(1), ObjectEventId(1), GroupEventId(1), &mut undo));
/// assert_eq!(machine.current_state_id(), StateId(1));
/// assert_eq!(undo.len(), 1);
/// ```
pub struct StateMachine {
    actor: ActorId,
    table: Arc<TransitionTable>,
    current: StateId,
    undo_enabled: bool,
    executor: Box<dyn SideEffectExecutor>,
    status: Arc<dyn StatusSink>,
}

impl StateMachine {
    /// Create a machine of a registered type, positioned at its start state.
    ///
    /// Fails when no table is registered for `type_name`.
    pub fn new<X>(
        actor: ActorId,
        type_name: &str,
        registry: &TableRegistry,
        executor: X,
        status: Arc<dyn StatusSink>,
    ) -> Result<Self, MachineError>
    where
        X: SideEffectExecutor + 'static,
    {
        let table = registry
            .lookup(type_name)
            .ok_or_else(|| MachineError::UnknownType(type_name.to_string()))?;
        Ok(Self::from_table(actor, table, Box::new(executor), status))
    }

    /// Create a machine directly from a table.
    pub fn from_table(
        actor: ActorId,
        table: Arc<TransitionTable>,
        executor: Box<dyn SideEffectExecutor>,
        status: Arc<dyn StatusSink>,
    ) -> Self {
        let current = table.start_state().id();
        Self {
            actor,
            table,
            current,
            undo_enabled: true,
            executor,
            status,
        }
    }

    pub fn actor_id(&self) -> ActorId {
        self.actor
    }

    pub fn machine_type(&self) -> &str {
        self.table.type_name()
    }

    pub fn table(&self) -> &Arc<TransitionTable> {
        &self.table
    }

    pub fn current_state_id(&self) -> StateId {
        self.current
    }

    pub fn current_state(&self) -> &StateNode {
        self.table
            .state(self.current)
            .unwrap_or_else(|| self.table.start_state())
    }

    pub fn is_undo_enabled(&self) -> bool {
        self.undo_enabled
    }

    /// Toggle recording for future events. Existing history is untouched.
    pub fn enable_undo(&mut self, enable: bool) {
        self.undo_enabled = enable;
    }

    /// Feed one event into the machine.
    ///
    /// Returns `false` when the event does not apply in the current state, or
    /// when the side effect failed and could not be compensated. A failure
    /// rolled back completely reports `true`.
    ///
    /// Only this machine is reachable during rollback: entries of other
    /// actors sharing the object event id stay in the history and the call
    /// reports `false`. Use [`StateMachine::handle_event_with`] when several
    /// actors share object event ids.
    pub fn handle_event(
        &mut self,
        event: &dyn Event,
        object_event_id: ObjectEventId,
        group_event_id: GroupEventId,
        undo: &mut UndoController,
    ) -> bool {
        self.handle_event_with(event, object_event_id, group_event_id, undo, &mut NoActors)
    }

    /// Like [`StateMachine::handle_event`], resolving other actors of a
    /// rolled-back group through `others`.
    pub fn handle_event_with(
        &mut self,
        event: &dyn Event,
        object_event_id: ObjectEventId,
        group_event_id: GroupEventId,
        undo: &mut UndoController,
        others: &mut dyn ActorRegistry,
    ) -> bool {
        let table = Arc::clone(&self.table);
        let Some(current) = table.state(self.current) else {
            return false;
        };
        let Some(transition) = current.transition(event.id()).copied() else {
            tracing::trace!(
                machine_type = table.type_name(),
                state = current.name(),
                event = %event.id(),
                "event not handled in current state"
            );
            return false;
        };
        let Some(next) = table.state(transition.next) else {
            return false;
        };

        let changed = current.id() != next.id();
        if changed {
            if self.undo_enabled {
                undo.set_operation_event(OperationEvent::new(
                    self.actor,
                    Operation::state_change(next.id()),
                    Operation::state_change(current.id()),
                    object_event_id,
                    group_event_id,
                ));
            }
            tracing::debug!(
                machine_type = table.type_name(),
                from = current.name(),
                to = next.name(),
                "state change"
            );
            self.current = next.id();
        }

        let ok = self.executor.execute(&SideEffectContext {
            side_effect: transition.side_effect,
            event,
            object_event_id,
            group_event_id,
            machine_type: table.type_name(),
            state: next,
        });
        if ok {
            return true;
        }

        let correlated = undo.last_object_event_id() == Some(object_event_id);
        if self.undo_enabled && correlated {
            tracing::warn!(
                machine_type = table.type_name(),
                side_effect = %transition.side_effect,
                object_event_id = %object_event_id,
                "side effect failed, rolling back"
            );
            let mut actors = WithActor::new(self, others);
            let rolled_back = undo.undo(true, &mut actors);
            if !rolled_back {
                tracing::warn!(
                    machine_type = table.type_name(),
                    object_event_id = %object_event_id,
                    "rollback was incomplete"
                );
            }
            return rolled_back;
        }
        if !self.undo_enabled && (changed || correlated) {
            self.status
                .display_text(SIDE_EFFECT_FAILED_MESSAGE, STATUS_MESSAGE_DURATION);
        }
        false
    }

    /// Jump to `state` without consulting the transition table.
    pub(crate) fn set_current_state(&mut self, state: StateId) -> Result<(), OperationError> {
        if !self.table.contains(state) {
            return Err(OperationError::UnknownTarget {
                actor: self.actor,
                target: state,
            });
        }
        self.current = state;
        Ok(())
    }
}

impl OperationActor for StateMachine {
    fn actor_id(&self) -> ActorId {
        self.actor
    }

    fn execute_operation(&mut self, operation: &Operation) -> Result<(), OperationError> {
        match operation {
            Operation::Nothing => Ok(()),
            Operation::StateChange(change) => {
                let from = self.current_state().name().to_string();
                if let Err(err) = self.set_current_state(change.target) {
                    tracing::error!(
                        machine_type = self.machine_type(),
                        error = %err,
                        "state change operation does not belong to this machine"
                    );
                    self.status
                        .display_text(FOREIGN_STATE_MESSAGE, STATUS_MESSAGE_DURATION);
                    return Err(err);
                }
                tracing::debug!(
                    machine_type = self.machine_type(),
                    from = from.as_str(),
                    to = self.current_state().name(),
                    "state change replayed"
                );
                Ok(())
            }
            Operation::Custom(custom) => {
                tracing::trace!(
                    machine_type = self.machine_type(),
                    kind = custom.kind.as_str(),
                    "ignoring custom operation"
                );
                Ok(())
            }
        }
    }
}

impl fmt::Debug for StateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("actor", &self.actor)
            .field("machine_type", &self.machine_type())
            .field("current", &self.current)
            .field("undo_enabled", &self.undo_enabled)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{StateBuilder, TransitionTableBuilder};
    use crate::core::{EventId, SideEffectId, NO_SIDE_EFFECT};
    use crate::machine::side_effect::SideEffectTable;
    use crate::machine::status::MemoryStatusSink;

    const FAIL: SideEffectId = SideEffectId(1);

    /// Idle --1--> Busy (ok), Idle --2--> Busy (fails), Idle --3--> Idle (fails)
    fn registry() -> TableRegistry {
        let registry = TableRegistry::new();
        registry
            .register(
                TransitionTableBuilder::new("worker")
                    .start(StateId(0))
                    .state(
                        StateBuilder::new(StateId(0), "Idle")
                            .on(EventId(1), StateId(1), NO_SIDE_EFFECT)
                            .on(EventId(2), StateId(1), FAIL)
                            .stay_on(EventId(3), FAIL),
                    )
                    .state(StateBuilder::new(StateId(1), "Busy").on(
                        EventId(4),
                        StateId(0),
                        NO_SIDE_EFFECT,
                    ))
                    .build()
                    .unwrap(),
            )
            .unwrap();
        registry
    }

    fn machine(status: Arc<MemoryStatusSink>) -> StateMachine {
        let executor = SideEffectTable::new().on(FAIL, |_| false);
        StateMachine::new(ActorId(1), "worker", &registry(), executor, status).unwrap()
    }

    fn ids(n: u32) -> (ObjectEventId, GroupEventId) {
        (ObjectEventId(n), GroupEventId(n))
    }

    #[test]
    fn unknown_type_fails_construction() {
        let result = StateMachine::new(
            ActorId(1),
            "missing",
            &registry(),
            SideEffectTable::new(),
            Arc::new(MemoryStatusSink::new()),
        );
        assert_eq!(
            result.unwrap_err(),
            MachineError::UnknownType("missing".to_string())
        );
    }

    #[test]
    fn starts_in_start_state() {
        let machine = machine(Arc::new(MemoryStatusSink::new()));
        assert_eq!(machine.current_state().name(), "Idle");
        assert_eq!(machine.machine_type(), "worker");
        assert!(machine.is_undo_enabled());
    }

    #[test]
    fn real_transition_records_one_entry() {
        let mut machine = machine(Arc::new(MemoryStatusSink::new()));
        let mut undo = UndoController::default();
        let (oid, gid) = ids(1);

        assert!(machine.handle_event(&EventId(1), oid, gid, &mut undo));
        assert_eq!(machine.current_state_id(), StateId(1));
        assert_eq!(undo.len(), 1);

        let entry = undo.history().next().unwrap().clone();
        assert_eq!(entry.do_operation, Operation::state_change(StateId(1)));
        machine.execute_operation(&entry.undo_operation).unwrap();
        assert_eq!(machine.current_state_id(), StateId(0));
    }

    #[test]
    fn self_transition_is_invisible_to_undo() {
        let mut machine = machine(Arc::new(MemoryStatusSink::new()));
        let mut undo = UndoController::default();
        let (oid, gid) = ids(1);

        assert!(!machine.handle_event(&EventId(3), oid, gid, &mut undo));
        assert!(undo.is_empty());
        assert_eq!(machine.current_state_id(), StateId(0));
    }

    #[test]
    fn unknown_event_changes_nothing() {
        let mut machine = machine(Arc::new(MemoryStatusSink::new()));
        let mut undo = UndoController::default();
        let (oid, gid) = ids(1);

        assert!(!machine.handle_event(&EventId(4), oid, gid, &mut undo));
        assert_eq!(machine.current_state_id(), StateId(0));
        assert!(undo.is_empty());
    }

    #[test]
    fn failed_side_effect_rolls_back() {
        let status = Arc::new(MemoryStatusSink::new());
        let mut machine = machine(Arc::clone(&status));
        let mut undo = UndoController::default();
        let (oid, gid) = ids(1);

        // a complete compensation is reported as success
        assert!(machine.handle_event(&EventId(2), oid, gid, &mut undo));
        assert_eq!(machine.current_state_id(), StateId(0));
        assert!(undo.is_empty());
        assert!(status.is_empty());
    }

    #[test]
    fn failed_side_effect_without_undo_reports_once() {
        let status = Arc::new(MemoryStatusSink::new());
        let mut machine = machine(Arc::clone(&status));
        machine.enable_undo(false);
        let mut undo = UndoController::default();
        let (oid, gid) = ids(1);

        assert!(!machine.handle_event(&EventId(2), oid, gid, &mut undo));
        assert_eq!(machine.current_state_id(), StateId(1));
        assert!(undo.is_empty());
        assert_eq!(status.messages(), vec![SIDE_EFFECT_FAILED_MESSAGE]);
    }

    #[test]
    fn correlated_failure_without_undo_reports_once() {
        let status = Arc::new(MemoryStatusSink::new());
        let mut machine = machine(Arc::clone(&status));
        machine.enable_undo(false);
        let mut undo = UndoController::default();
        undo.set_operation_event(OperationEvent::new(
            ActorId(7),
            Operation::Nothing,
            Operation::Nothing,
            ObjectEventId(5),
            GroupEventId(5),
        ));

        // failing self transition, newest entry shares the object event id
        assert!(!machine.handle_event(&EventId(3), ObjectEventId(5), GroupEventId(5), &mut undo));
        assert_eq!(machine.current_state_id(), StateId(0));
        assert_eq!(undo.len(), 1);
        assert_eq!(status.messages(), vec![SIDE_EFFECT_FAILED_MESSAGE]);
    }

    #[test]
    fn uncorrelated_failed_self_transition_without_undo_is_silent() {
        let status = Arc::new(MemoryStatusSink::new());
        let mut machine = machine(Arc::clone(&status));
        machine.enable_undo(false);
        let mut undo = UndoController::default();
        undo.set_operation_event(OperationEvent::new(
            ActorId(7),
            Operation::Nothing,
            Operation::Nothing,
            ObjectEventId(5),
            GroupEventId(5),
        ));

        assert!(!machine.handle_event(&EventId(3), ObjectEventId(6), GroupEventId(6), &mut undo));
        assert_eq!(machine.current_state_id(), StateId(0));
        assert!(status.is_empty());
    }

    #[test]
    fn rollback_keeps_entries_of_unreachable_peers() {
        let status: Arc<dyn StatusSink> = Arc::new(MemoryStatusSink::new());
        let registry = registry();
        let mut peer = StateMachine::new(
            ActorId(2),
            "worker",
            &registry,
            SideEffectTable::new(),
            Arc::clone(&status),
        )
        .unwrap();
        let mut failing = StateMachine::new(
            ActorId(1),
            "worker",
            &registry,
            SideEffectTable::new().on(FAIL, |_| false),
            status,
        )
        .unwrap();
        let mut undo = UndoController::default();
        let (oid, gid) = ids(7);

        assert!(peer.handle_event(&EventId(1), oid, gid, &mut undo));
        assert!(!failing.handle_event(&EventId(2), oid, gid, &mut undo));

        // the failing machine is back, the peer's change is still undoable
        assert_eq!(failing.current_state_id(), StateId(0));
        assert_eq!(peer.current_state_id(), StateId(1));
        assert_eq!(undo.len(), 1);
        assert_eq!(undo.history().next().unwrap().actor, ActorId(2));

        let mut rest = NoActors;
        assert!(undo.undo(true, &mut WithActor::new(&mut peer, &mut rest)));
        assert_eq!(peer.current_state_id(), StateId(0));
    }

    #[test]
    fn rollback_through_registry_reaches_peers() {
        let status: Arc<dyn StatusSink> = Arc::new(MemoryStatusSink::new());
        let registry = registry();
        let mut peer = StateMachine::new(
            ActorId(2),
            "worker",
            &registry,
            SideEffectTable::new(),
            Arc::clone(&status),
        )
        .unwrap();
        let mut failing = StateMachine::new(
            ActorId(1),
            "worker",
            &registry,
            SideEffectTable::new().on(FAIL, |_| false),
            status,
        )
        .unwrap();
        let mut undo = UndoController::default();
        let (oid, gid) = ids(7);

        assert!(peer.handle_event(&EventId(1), oid, gid, &mut undo));
        let mut others = NoActors;
        let mut peers = WithActor::new(&mut peer, &mut others);
        assert!(failing.handle_event_with(&EventId(2), oid, gid, &mut undo, &mut peers));

        assert_eq!(failing.current_state_id(), StateId(0));
        assert_eq!(peer.current_state_id(), StateId(0));
        assert!(undo.is_empty());
    }

    #[test]
    fn failed_self_transition_does_not_roll_back_other_ids() {
        let mut machine = machine(Arc::new(MemoryStatusSink::new()));
        let mut undo = UndoController::default();

        assert!(machine.handle_event(&EventId(1), ObjectEventId(1), GroupEventId(1), &mut undo));
        assert!(machine.handle_event(&EventId(4), ObjectEventId(2), GroupEventId(2), &mut undo));
        assert!(!machine.handle_event(&EventId(3), ObjectEventId(3), GroupEventId(3), &mut undo));

        assert_eq!(undo.len(), 2);
        assert_eq!(machine.current_state_id(), StateId(0));
    }

    #[test]
    fn foreign_state_change_is_reported_and_ignored() {
        let status = Arc::new(MemoryStatusSink::new());
        let mut machine = machine(Arc::clone(&status));

        let result = machine.execute_operation(&Operation::state_change(StateId(42)));

        assert_eq!(
            result,
            Err(OperationError::UnknownTarget {
                actor: ActorId(1),
                target: StateId(42),
            })
        );
        assert_eq!(machine.current_state_id(), StateId(0));
        assert_eq!(status.messages(), vec![FOREIGN_STATE_MESSAGE]);
    }

    #[test]
    fn nothing_and_custom_operations_are_no_ops() {
        let mut machine = machine(Arc::new(MemoryStatusSink::new()));

        assert!(machine.execute_operation(&Operation::Nothing).is_ok());
        assert!(machine
            .execute_operation(&Operation::custom("label", vec![1]))
            .is_ok());
        assert_eq!(machine.current_state_id(), StateId(0));
    }

    #[test]
    fn disabling_undo_keeps_existing_history() {
        let mut machine = machine(Arc::new(MemoryStatusSink::new()));
        let mut undo = UndoController::default();

        machine.handle_event(&EventId(1), ObjectEventId(1), GroupEventId(1), &mut undo);
        machine.enable_undo(false);
        machine.handle_event(&EventId(4), ObjectEventId(2), GroupEventId(2), &mut undo);

        assert_eq!(undo.len(), 1);
        assert_eq!(machine.current_state_id(), StateId(0));
    }
}
