//! Side effects executed after a state change is committed.

use crate::core::{Event, GroupEventId, ObjectEventId, SideEffectId, StateNode, NO_SIDE_EFFECT};
use std::collections::HashMap;
use std::fmt;

/// Everything a side effect may look at.
///
/// `state` is the state the machine is in *after* the transition was
/// committed.
pub struct SideEffectContext<'a> {
    pub side_effect: SideEffectId,
    pub event: &'a dyn Event,
    pub object_event_id: ObjectEventId,
    pub group_event_id: GroupEventId,
    pub machine_type: &'a str,
    pub state: &'a StateNode,
}

/// Domain-specific executor invoked with a side-effect id.
///
/// Must block until success or failure is known: the machine decides about
/// rollback as soon as this returns.
pub trait SideEffectExecutor: Send {
    fn execute(&mut self, context: &SideEffectContext<'_>) -> bool;
}

impl<F> SideEffectExecutor for F
where
    F: FnMut(&SideEffectContext<'_>) -> bool + Send,
{
    fn execute(&mut self, context: &SideEffectContext<'_>) -> bool {
        self(context)
    }
}

type Handler = Box<dyn FnMut(&SideEffectContext<'_>) -> bool + Send>;

/// Executor dispatching on side-effect id.
///
/// `NO_SIDE_EFFECT` always succeeds; ids without a handler fail.
///
/// # Example
///
/// ```rust
/// use retrace::core::SideEffectId;
/// use retrace::machine::SideEffectTable;
///
/// let executor = SideEffectTable::new()
///     .on(SideEffectId(1), |_ctx| true)
///     .on(SideEffectId(2), |_ctx| false);
/// assert!(executor.handles(SideEffectId(1)));
/// ```
#[derive(Default)]
pub struct SideEffectTable {
    handlers: HashMap<SideEffectId, Handler>,
}

impl SideEffectTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handler for `id`, replacing any earlier one.
    pub fn on<F>(mut self, id: SideEffectId, handler: F) -> Self
    where
        F: FnMut(&SideEffectContext<'_>) -> bool + Send + 'static,
    {
        self.handlers.insert(id, Box::new(handler));
        self
    }

    pub fn handles(&self, id: SideEffectId) -> bool {
        id == NO_SIDE_EFFECT || self.handlers.contains_key(&id)
    }
}

impl fmt::Debug for SideEffectTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.handlers.keys().copied().collect();
        ids.sort();
        f.debug_struct("SideEffectTable")
            .field("handlers", &ids)
            .finish()
    }
}

impl SideEffectExecutor for SideEffectTable {
    fn execute(&mut self, context: &SideEffectContext<'_>) -> bool {
        if context.side_effect == NO_SIDE_EFFECT {
            return true;
        }
        match self.handlers.get_mut(&context.side_effect) {
            Some(handler) => handler(context),
            None => {
                tracing::debug!(
                    machine_type = context.machine_type,
                    side_effect = %context.side_effect,
                    "no handler for side effect"
                );
                false
            }
        }
    }
}

/// Executor that accepts every side effect without doing anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSideEffects;

impl SideEffectExecutor for NoSideEffects {
    fn execute(&mut self, _context: &SideEffectContext<'_>) -> bool {
        true
    }
}
