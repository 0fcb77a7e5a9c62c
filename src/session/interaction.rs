//! A set of actors sharing one undo history.

use super::config::SessionConfig;
use crate::checkpoint::{CheckpointError, MachineSnapshot, SessionCheckpoint};
use crate::core::{ActorId, Event, GroupEventId, IdAllocator, ObjectEventId, TableRegistry};
use crate::machine::{MachineError, SideEffectExecutor, StateMachine, StatusSink};
use crate::operation::{ActorRegistry, Operation, OperationActor, OperationError, OperationEvent};
use crate::undo::UndoController;
use std::sync::Arc;

enum Slot {
    Machine(StateMachine),
    Actor(Box<dyn OperationActor + Send>),
}

impl Slot {
    fn as_actor(&mut self) -> &mut dyn OperationActor {
        match self {
            Slot::Machine(machine) => machine as &mut dyn OperationActor,
            Slot::Actor(actor) => actor.as_mut(),
        }
    }
}

/// Resolves actor handles against the session's slots.
struct Slots<'a>(&'a mut [Option<Slot>]);

impl ActorRegistry for Slots<'_> {
    fn execute(&mut self, actor: ActorId, operation: &Operation) -> Result<(), OperationError> {
        match self.0.get_mut(actor.0 as usize) {
            Some(Some(slot)) => slot.as_actor().execute_operation(operation),
            _ => Err(OperationError::UnknownActor(actor)),
        }
    }
}

/// Several state machines (and other actors) driven together.
///
/// Actors are addressed by stable `ActorId`s that are never reused, so a
/// removed actor cannot be confused with a newer one. Removing an actor also
/// drops its undo entries.
///
/// # Example
///
/// ```rust
/// use retrace::core::{EventId, StateId, TableRegistry};
/// use retrace::machine::{NoSideEffects, TracingStatusSink};
/// use retrace::session::{InteractionSession, SessionConfig};
/// use retrace::transition_table;
/// use std::sync::Arc;
///
/// let registry = Arc::new(TableRegistry::new());
/// registry
///     .register(
///         transition_table! {
///             name "toggle";
///             start 0;
///             state 0 "Off" { 1 => 1; }
///             state 1 "On" { 1 => 0; }
///         }
///         .unwrap(),
///     )
///     .unwrap();
///
/// let mut session =
///     InteractionSession::new(SessionConfig::default(), registry, Arc::new(TracingStatusSink));
/// let light = session.spawn_machine("toggle", NoSideEffects).unwrap();
///
/// assert!(session.broadcast(&EventId(1)));
/// assert_eq!(session.machine(light).unwrap().current_state_id(), StateId(1));
///
/// assert!(session.undo(true));
/// assert_eq!(session.machine(light).unwrap().current_state_id(), StateId(0));
/// ```
pub struct InteractionSession {
    registry: Arc<TableRegistry>,
    status: Arc<dyn StatusSink>,
    ids: Arc<IdAllocator>,
    undo: UndoController,
    slots: Vec<Option<Slot>>,
}

impl InteractionSession {
    pub fn new(
        config: SessionConfig,
        registry: Arc<TableRegistry>,
        status: Arc<dyn StatusSink>,
    ) -> Self {
        Self::with_ids(config, registry, status, Arc::new(IdAllocator::new()))
    }

    /// Create a session minting correlation ids from a shared allocator.
    pub fn with_ids(
        config: SessionConfig,
        registry: Arc<TableRegistry>,
        status: Arc<dyn StatusSink>,
        ids: Arc<IdAllocator>,
    ) -> Self {
        Self {
            registry,
            status,
            ids,
            undo: UndoController::new(config.undo),
            slots: Vec::new(),
        }
    }

    fn next_actor_id(&self) -> ActorId {
        ActorId(self.slots.len() as u32)
    }

    /// Create a state machine of a registered type.
    pub fn spawn_machine<X>(&mut self, type_name: &str, executor: X) -> Result<ActorId, MachineError>
    where
        X: SideEffectExecutor + 'static,
    {
        let actor = self.next_actor_id();
        let machine = StateMachine::new(
            actor,
            type_name,
            &self.registry,
            executor,
            Arc::clone(&self.status),
        )?;
        self.slots.push(Some(Slot::Machine(machine)));
        tracing::debug!(%actor, machine_type = type_name, "spawned state machine");
        Ok(actor)
    }

    /// Register a custom actor built for the handle it is given.
    pub fn register_actor<A, F>(&mut self, make: F) -> ActorId
    where
        A: OperationActor + Send + 'static,
        F: FnOnce(ActorId) -> A,
    {
        let actor = self.next_actor_id();
        self.slots.push(Some(Slot::Actor(Box::new(make(actor)))));
        actor
    }

    /// Remove an actor and every undo entry it recorded.
    pub fn remove(&mut self, actor: ActorId) -> bool {
        let removed = self
            .slots
            .get_mut(actor.0 as usize)
            .and_then(Option::take)
            .is_some();
        if removed {
            let dropped = self.undo.forget_actor(actor);
            tracing::debug!(%actor, dropped, "removed actor");
        }
        removed
    }

    pub fn machine(&self, actor: ActorId) -> Option<&StateMachine> {
        match self.slots.get(actor.0 as usize) {
            Some(Some(Slot::Machine(machine))) => Some(machine),
            _ => None,
        }
    }

    pub fn machine_mut(&mut self, actor: ActorId) -> Option<&mut StateMachine> {
        match self.slots.get_mut(actor.0 as usize) {
            Some(Some(Slot::Machine(machine))) => Some(machine),
            _ => None,
        }
    }

    /// Handles of all live state machines, in creation order.
    pub fn machine_ids(&self) -> Vec<ActorId> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| matches!(slot, Some(Slot::Machine(_))))
            .map(|(i, _)| ActorId(i as u32))
            .collect()
    }

    /// Deliver `event` to one machine with caller-chosen correlation ids.
    ///
    /// A rollback triggered by a failed side effect can revert changes of
    /// any actor in the session that share `object_event_id`.
    pub fn handle_event(
        &mut self,
        actor: ActorId,
        event: &dyn Event,
        object_event_id: ObjectEventId,
        group_event_id: GroupEventId,
    ) -> Result<bool, MachineError> {
        let index = actor.0 as usize;
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(MachineError::UnknownActor(actor))?;
        let mut machine = match slot.take() {
            Some(Slot::Machine(machine)) => machine,
            Some(other) => {
                *slot = Some(other);
                return Err(MachineError::NotAMachine(actor));
            }
            None => return Err(MachineError::UnknownActor(actor)),
        };

        let handled = machine.handle_event_with(
            event,
            object_event_id,
            group_event_id,
            &mut self.undo,
            &mut Slots(&mut self.slots),
        );
        self.slots[index] = Some(Slot::Machine(machine));
        Ok(handled)
    }

    /// Deliver `event` to every machine as one user action.
    ///
    /// Mints one group id and one object id shared by all deliveries, so a
    /// single undo step reverts whatever the event changed. Returns whether
    /// any machine handled the event.
    pub fn broadcast(&mut self, event: &dyn Event) -> bool {
        let group_event_id = self.ids.inc_group_event_id();
        let object_event_id = self.ids.inc_object_event_id();

        let mut handled = false;
        for actor in self.machine_ids() {
            if let Ok(true) = self.handle_event(actor, event, object_event_id, group_event_id) {
                handled = true;
            }
        }
        handled
    }

    /// Record an operation produced by a custom actor.
    pub fn record(&mut self, event: OperationEvent) -> Result<(), MachineError> {
        match self.slots.get(event.actor.0 as usize) {
            Some(Some(_)) => {
                self.undo.set_operation_event(event);
                Ok(())
            }
            _ => Err(MachineError::UnknownActor(event.actor)),
        }
    }

    pub fn undo(&mut self, fine: bool) -> bool {
        self.undo.undo(fine, &mut Slots(&mut self.slots))
    }

    pub fn redo(&mut self, fine: bool) -> bool {
        self.undo.redo(fine, &mut Slots(&mut self.slots))
    }

    pub fn undo_controller(&self) -> &UndoController {
        &self.undo
    }

    pub fn ids(&self) -> &Arc<IdAllocator> {
        &self.ids
    }

    pub fn registry(&self) -> &Arc<TableRegistry> {
        &self.registry
    }

    /// Capture machine positions and undo history.
    pub fn checkpoint(&self) -> SessionCheckpoint {
        let machines = self
            .slots
            .iter()
            .filter_map(|slot| match slot {
                Some(Slot::Machine(machine)) => Some(MachineSnapshot {
                    actor: machine.actor_id(),
                    machine_type: machine.machine_type().to_string(),
                    state: machine.current_state_id(),
                    undo_enabled: machine.is_undo_enabled(),
                }),
                _ => None,
            })
            .collect();

        SessionCheckpoint::new(
            machines,
            self.undo.history().cloned().collect(),
            self.undo.redo_entries().to_vec(),
            self.ids.curr_object_event_id(),
            self.ids.curr_group_event_id(),
        )
    }

    /// Restore a checkpoint taken from a session with the same actors.
    ///
    /// Nothing is changed unless the whole checkpoint fits this session.
    pub fn restore(&mut self, checkpoint: SessionCheckpoint) -> Result<(), CheckpointError> {
        checkpoint.check_version()?;

        for snapshot in &checkpoint.machines {
            let machine = self.machine(snapshot.actor).ok_or_else(|| {
                CheckpointError::ValidationFailed(format!(
                    "{} is not a state machine of this session",
                    snapshot.actor
                ))
            })?;
            if machine.machine_type() != snapshot.machine_type {
                return Err(CheckpointError::ValidationFailed(format!(
                    "{} is of type '{}', checkpoint says '{}'",
                    snapshot.actor,
                    machine.machine_type(),
                    snapshot.machine_type
                )));
            }
            if !machine.table().contains(snapshot.state) {
                return Err(CheckpointError::ValidationFailed(format!(
                    "{} has no {}",
                    snapshot.machine_type, snapshot.state
                )));
            }
        }
        let live = |actor: ActorId| matches!(self.slots.get(actor.0 as usize), Some(Some(_)));
        if let Some(entry) = checkpoint
            .history
            .iter()
            .chain(&checkpoint.redo)
            .find(|entry| !live(entry.actor))
        {
            return Err(CheckpointError::ValidationFailed(format!(
                "undo entry refers to unknown {}",
                entry.actor
            )));
        }
        for entry in checkpoint.history.iter().chain(&checkpoint.redo) {
            let Some(machine) = self.machine(entry.actor) else {
                continue;
            };
            for operation in [&entry.do_operation, &entry.undo_operation] {
                if let Operation::StateChange(change) = operation {
                    if !machine.table().contains(change.target) {
                        return Err(CheckpointError::ValidationFailed(format!(
                            "undo entry of {} targets {}, which '{}' does not have",
                            entry.actor,
                            change.target,
                            machine.machine_type()
                        )));
                    }
                }
            }
        }

        for snapshot in &checkpoint.machines {
            if let Some(machine) = self.machine_mut(snapshot.actor) {
                machine
                    .set_current_state(snapshot.state)
                    .map_err(|e| CheckpointError::ValidationFailed(e.to_string()))?;
                machine.enable_undo(snapshot.undo_enabled);
            }
        }
        self.undo.replace(checkpoint.history, checkpoint.redo);
        self.ids
            .advance_past(checkpoint.last_object_event_id, checkpoint.last_group_event_id);
        tracing::debug!(checkpoint = %checkpoint.id, "restored checkpoint");
        Ok(())
    }
}
