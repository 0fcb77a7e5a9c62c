//! Identifier newtypes and the correlation-id allocator.
//!
//! State, event and side-effect ids are opaque integers chosen by whoever
//! defines a transition table. Object and group event ids correlate the
//! operations recorded for one user action so they can be undone together.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Raw integer value.
            pub fn get(self) -> u32 {
                self.0
            }
        }

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "#{}"), self.0)
            }
        }
    };
}

id_newtype!(
    /// Identifier of a state inside one transition table.
    StateId,
    "state"
);
id_newtype!(
    /// Identifier used to look up a transition from a state.
    EventId,
    "event"
);
id_newtype!(
    /// Identifier the side-effect executor dispatches on.
    SideEffectId,
    "side-effect"
);
id_newtype!(
    /// Stable handle of an operation actor (usually a state machine).
    ActorId,
    "actor"
);
id_newtype!(
    /// Groups the operations that belong to one logical user action.
    ObjectEventId,
    "object-event"
);
id_newtype!(
    /// Groups several object events into one user-visible undo step.
    GroupEventId,
    "group-event"
);

/// Side-effect id that every executor treats as a successful no-op.
pub const NO_SIDE_EFFECT: SideEffectId = SideEffectId(0);

/// Mints monotonically increasing correlation ids.
///
/// One allocator is shared (usually behind an `Arc`) by every caller that
/// drives state machines for the same undo history. Counters wrap on
/// overflow and are never reset.
///
/// # Example
///
/// ```rust
/// use retrace::core::IdAllocator;
///
/// let ids = IdAllocator::new();
/// let first = ids.inc_group_event_id();
/// let second = ids.inc_group_event_id();
/// assert!(second > first);
/// assert_eq!(ids.curr_group_event_id(), second);
/// ```
#[derive(Debug, Default)]
pub struct IdAllocator {
    group: AtomicU32,
    object: AtomicU32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting after the given ids, e.g. when resuming from a checkpoint.
    pub fn starting_after(object: ObjectEventId, group: GroupEventId) -> Self {
        Self {
            group: AtomicU32::new(group.0),
            object: AtomicU32::new(object.0),
        }
    }

    /// Advance the group counter and return the new value.
    pub fn inc_group_event_id(&self) -> GroupEventId {
        GroupEventId(self.group.fetch_add(1, Ordering::Relaxed).wrapping_add(1))
    }

    /// Most recently minted group id (zero before the first call).
    pub fn curr_group_event_id(&self) -> GroupEventId {
        GroupEventId(self.group.load(Ordering::Relaxed))
    }

    /// Advance the object counter and return the new value.
    pub fn inc_object_event_id(&self) -> ObjectEventId {
        ObjectEventId(self.object.fetch_add(1, Ordering::Relaxed).wrapping_add(1))
    }

    pub fn curr_object_event_id(&self) -> ObjectEventId {
        ObjectEventId(self.object.load(Ordering::Relaxed))
    }

    /// Make sure future ids are minted after the given ones.
    pub fn advance_past(&self, object: ObjectEventId, group: GroupEventId) {
        self.object.fetch_max(object.0, Ordering::Relaxed);
        self.group.fetch_max(group.0, Ordering::Relaxed);
    }
}
