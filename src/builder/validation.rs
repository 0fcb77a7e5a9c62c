//! Structural validation of transition tables using Validation.
//!
//! Every check runs; all violations are reported together instead of
//! stopping at the first one.

use crate::builder::error::TableViolation;
use crate::core::{StateId, StateNode};
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Result of a single validation check.
pub type Check = Validation<(), NonEmptyVec<TableViolation>>;

fn unique_ids(states: &[StateNode]) -> Vec<Check> {
    let mut seen = HashSet::new();
    states
        .iter()
        .filter(|state| !seen.insert(state.id()))
        .map(|state| Validation::fail(TableViolation::DuplicateState(state.id())))
        .collect()
}

fn named(states: &[StateNode]) -> Vec<Check> {
    states
        .iter()
        .filter(|state| state.name().trim().is_empty())
        .map(|state| Validation::fail(TableViolation::UnnamedState(state.id())))
        .collect()
}

fn targets_exist(states: &[StateNode], known: &HashSet<StateId>) -> Vec<Check> {
    let mut checks = Vec::new();
    for state in states {
        let mut edges: Vec<_> = state.transitions().collect();
        edges.sort_by_key(|(event, _)| *event);
        for (event, transition) in edges {
            if !known.contains(&transition.next) {
                checks.push(Validation::fail(TableViolation::DanglingTransition {
                    from: state.id(),
                    event,
                    target: transition.next,
                }));
            }
        }
    }
    checks
}

/// Validate a set of states and its start state, accumulating ALL violations.
///
/// Returns `Validation::Success(())` when the table is well formed.
pub fn validate_states(states: &[StateNode], start: StateId) -> Check {
    let known: HashSet<StateId> = states.iter().map(StateNode::id).collect();

    let mut checks: Vec<Check> = Vec::new();
    checks.extend(unique_ids(states));
    checks.extend(named(states));
    checks.extend(targets_exist(states, &known));

    if !known.contains(&start) {
        checks.push(Validation::fail(TableViolation::UnknownStartState(start)));
    }

    Validation::all_vec(checks).map(|_| ())
}
