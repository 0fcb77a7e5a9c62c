//! Macros for declaring transition tables.

/// Declare a transition table inline.
///
/// Each state lists `event => next` edges, optionally followed by the side
/// effect to run. Edges without one use `NO_SIDE_EFFECT`. Expands to a
/// `Result<TransitionTable, BuildError>`.
///
/// # Example
///
/// ```
/// use retrace::transition_table;
/// use retrace::core::{EventId, SideEffectId, StateId};
///
/// let table = transition_table! {
///     name "selection";
///     start 1;
///     state 1 "Idle" {
///         10 => 2, 100;
///         11 => 1;
///     }
///     state 2 "Selected" {
///         12 => 1, 101;
///     }
/// }
/// .unwrap();
///
/// let idle = table.state(StateId(1)).unwrap();
/// assert_eq!(idle.transition(EventId(10)).unwrap().side_effect, SideEffectId(100));
/// ```
#[macro_export]
macro_rules! transition_table {
    (
        name $type_name:literal;
        start $start:literal;
        $(
            state $id:literal $state_name:literal {
                $( $event:literal => $next:literal $(, $effect:literal)? );* $(;)?
            }
        )*
    ) => {
        $crate::builder::TransitionTableBuilder::new($type_name)
            .start($crate::core::StateId($start))
            $(
                .state(
                    $crate::builder::StateBuilder::new($crate::core::StateId($id), $state_name)
                    $(
                        .on(
                            $crate::core::EventId($event),
                            $crate::core::StateId($next),
                            $crate::__side_effect!($($effect)?),
                        )
                    )*
                )
            )*
            .build()
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __side_effect {
    () => {
        $crate::core::NO_SIDE_EFFECT
    };
    ($effect:literal) => {
        $crate::core::SideEffectId($effect)
    };
}

#[cfg(test)]
mod tests {
    use crate::builder::BuildError;
    use crate::core::{EventId, SideEffectId, StateId, NO_SIDE_EFFECT};

    #[test]
    fn transition_table_macro_builds_table() {
        let table = transition_table! {
            name "line";
            start 0;
            state 0 "Empty" {
                1 => 1, 20;
            }
            state 1 "OnePoint" {
                1 => 2, 21;
                2 => 0;
            }
            state 2 "Done" {}
        }
        .unwrap();

        assert_eq!(table.type_name(), "line");
        assert_eq!(table.len(), 3);

        let one = table.state(StateId(1)).unwrap();
        assert_eq!(one.transition(EventId(1)).unwrap().side_effect, SideEffectId(21));
        assert_eq!(one.transition(EventId(2)).unwrap().side_effect, NO_SIDE_EFFECT);
        assert!(table.state(StateId(2)).unwrap().is_terminal());
    }

    #[test]
    fn transition_table_macro_validates() {
        let result = transition_table! {
            name "broken";
            start 5;
            state 0 "Only" {
                1 => 3
            }
        };

        assert!(matches!(result, Err(BuildError::Invalid { .. })));
    }
}
