//! Undo history entries.

use super::ops::Operation;
use crate::core::{ActorId, GroupEventId, ObjectEventId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A do/undo pair recorded for one actor, plus its correlation ids.
///
/// # Example
///
/// ```rust
/// use retrace::core::{ActorId, GroupEventId, ObjectEventId, StateId};
/// use retrace::operation::{Operation, OperationEvent};
///
/// let event = OperationEvent::new(
///     ActorId(1),
///     Operation::state_change(StateId(2)),
///     Operation::state_change(StateId(1)),
///     ObjectEventId(7),
///     GroupEventId(3),
/// );
/// assert_eq!(event.object_event_id, ObjectEventId(7));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OperationEvent {
    /// Actor able to apply both operations.
    pub actor: ActorId,
    pub do_operation: Operation,
    pub undo_operation: Operation,
    pub object_event_id: ObjectEventId,
    pub group_event_id: GroupEventId,
    /// When the change was recorded
    pub recorded_at: DateTime<Utc>,
}

impl OperationEvent {
    pub fn new(
        actor: ActorId,
        do_operation: Operation,
        undo_operation: Operation,
        object_event_id: ObjectEventId,
        group_event_id: GroupEventId,
    ) -> Self {
        Self {
            actor,
            do_operation,
            undo_operation,
            object_event_id,
            group_event_id,
            recorded_at: Utc::now(),
        }
    }
}
