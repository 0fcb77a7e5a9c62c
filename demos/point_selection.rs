//! Point Selection
//!
//! This example drives the selection state of points in a 3D viewer.
//!
//! Key concepts:
//! - Declaring a transition table with `transition_table!`
//! - Side effects that can fail (a locked point cannot be highlighted)
//! - Compensating rollback when a side effect fails
//! - One undo step per user action, across several points
//!
//! Run with: cargo run --example point_selection

use retrace::core::{EventId, SideEffectId, StateId, TableRegistry};
use retrace::machine::{SideEffectContext, SideEffectTable, TracingStatusSink};
use retrace::session::{InteractionSession, SessionConfig};
use retrace::transition_table;
use std::sync::Arc;

const SELECT: EventId = EventId(1);
const DESELECT: EventId = EventId(2);

const HIGHLIGHT: SideEffectId = SideEffectId(10);
const UNHIGHLIGHT: SideEffectId = SideEffectId(11);

fn highlighter(locked: bool) -> SideEffectTable {
    SideEffectTable::new()
        .on(HIGHLIGHT, move |ctx: &SideEffectContext<'_>| {
            println!(
                "  highlight ({} now {}): {}",
                ctx.machine_type,
                ctx.state.name(),
                if locked { "refused, point is locked" } else { "done" }
            );
            !locked
        })
        .on(UNHIGHLIGHT, |_| true)
}

fn print_points(session: &InteractionSession) {
    for id in session.machine_ids() {
        if let Some(machine) = session.machine(id) {
            println!("  {}: {}", id, machine.current_state().name());
        }
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    println!("=== Point Selection Example ===\n");

    let registry = Arc::new(TableRegistry::new());
    registry
        .register(
            transition_table! {
                name "point";
                start 0;
                state 0 "Unselected" { 1 => 1, 10; 2 => 0; }
                state 1 "Selected" { 2 => 0, 11; 1 => 1; }
            }
            .expect("point table is well formed"),
        )
        .expect("point table is registered once");

    let mut session = InteractionSession::new(
        SessionConfig::default(),
        registry,
        Arc::new(TracingStatusSink),
    );

    let free = session
        .spawn_machine("point", highlighter(false))
        .expect("point type is registered");
    session
        .spawn_machine("point", highlighter(false))
        .expect("point type is registered");

    println!("Select all points:");
    session.broadcast(&SELECT);
    print_points(&session);

    println!("\nDeselect all points:");
    session.broadcast(&DESELECT);
    print_points(&session);

    println!("\nUndo deselection (one step for both points):");
    session.undo(true);
    print_points(&session);

    println!("\nAdd a locked point and select everything again:");
    session.broadcast(&DESELECT);
    let locked = session
        .spawn_machine("point", highlighter(true))
        .expect("point type is registered");
    let handled = session.broadcast(&SELECT);
    println!("  handled: {handled}");
    print_points(&session);

    // The locked point's failure rolled back the whole action.
    assert_eq!(
        session.machine(free).map(|m| m.current_state_id()),
        Some(StateId(0))
    );
    assert_eq!(
        session.machine(locked).map(|m| m.current_state_id()),
        Some(StateId(0))
    );

    println!("\nUndo history holds {} entries", session.undo_controller().len());
    println!("\n=== Example Complete ===");
}
