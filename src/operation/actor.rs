//! Actors that apply operations during undo and redo.

use super::ops::{Operation, OperationKind};
use crate::core::{ActorId, StateId};
use thiserror::Error;

/// Errors raised while applying an operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OperationError {
    #[error("No actor registered for {0}")]
    UnknownActor(ActorId),

    #[error("{actor} cannot apply {kind:?} operations")]
    Unsupported { actor: ActorId, kind: OperationKind },

    #[error("{actor} has no {target} in its transition table")]
    UnknownTarget { actor: ActorId, target: StateId },

    #[error("{actor} rejected operation: {reason}")]
    Rejected { actor: ActorId, reason: String },
}

/// Something that can re-apply the operations it recorded.
///
/// State machines implement this; hosts may register their own actors for
/// `Operation::Custom` payloads.
pub trait OperationActor {
    fn actor_id(&self) -> ActorId;

    /// Apply `operation`. Must never panic; failures come back as errors.
    fn execute_operation(&mut self, operation: &Operation) -> Result<(), OperationError>;
}

/// Resolves actor handles stored in undo history back to live actors.
pub trait ActorRegistry {
    fn execute(&mut self, actor: ActorId, operation: &Operation) -> Result<(), OperationError>;
}

/// Registry that knows no actors.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoActors;

impl ActorRegistry for NoActors {
    fn execute(&mut self, actor: ActorId, _operation: &Operation) -> Result<(), OperationError> {
        Err(OperationError::UnknownActor(actor))
    }
}

/// One actor consulted before falling back to another registry.
pub struct WithActor<'a> {
    actor: &'a mut dyn OperationActor,
    rest: &'a mut dyn ActorRegistry,
}

impl<'a> WithActor<'a> {
    pub fn new(actor: &'a mut dyn OperationActor, rest: &'a mut dyn ActorRegistry) -> Self {
        Self { actor, rest }
    }
}

impl ActorRegistry for WithActor<'_> {
    fn execute(&mut self, actor: ActorId, operation: &Operation) -> Result<(), OperationError> {
        if self.actor.actor_id() == actor {
            self.actor.execute_operation(operation)
        } else {
            self.rest.execute(actor, operation)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        id: ActorId,
        applied: Vec<Operation>,
    }

    impl OperationActor for Counter {
        fn actor_id(&self) -> ActorId {
            self.id
        }

        fn execute_operation(&mut self, operation: &Operation) -> Result<(), OperationError> {
            self.applied.push(operation.clone());
            Ok(())
        }
    }

    #[test]
    fn no_actors_resolves_nothing() {
        let result = NoActors.execute(ActorId(1), &Operation::Nothing);
        assert_eq!(result, Err(OperationError::UnknownActor(ActorId(1))));
    }

    #[test]
    fn with_actor_prefers_its_own_actor() {
        let mut counter = Counter {
            id: ActorId(2),
            applied: Vec::new(),
        };
        let mut rest = NoActors;

        {
            let mut registry = WithActor::new(&mut counter, &mut rest);
            assert!(registry.execute(ActorId(2), &Operation::Nothing).is_ok());
            assert_eq!(
                registry.execute(ActorId(3), &Operation::Nothing),
                Err(OperationError::UnknownActor(ActorId(3)))
            );
        }

        assert_eq!(counter.applied, vec![Operation::Nothing]);
    }
}
