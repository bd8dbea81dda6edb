//! Command pattern for circuit mutations.
//!
//! Every edit to a [`CircuitGraph`](crate::graph::CircuitGraph) is wrapped in
//! a [`Command`] that knows how to apply itself and reverse that exact
//! application, which is what [`EditorHistory`](crate::undo::EditorHistory)
//! replays on undo/redo.
//!
//! - [`CreateCommand`] - allocate one pin, gate, or branch
//! - [`DeleteCommand`] - remove a component, recording enough to restore it
//! - [`CreateGateCommand`] - freeze a recorded component list into a
//!   [`CompositeGate`](crate::composite::CompositeGate)

mod create;
mod create_gate;
mod delete;

pub use create::{CreateCommand, CreateRequest};
pub use create_gate::{CreateGateCommand, InternalWire};
pub use delete::DeleteCommand;

use crate::graph::CircuitGraph;
use scad_core::ScadResult;

/// A reversible operation on a [`CircuitGraph`].
///
/// `execute` may run more than once across an undo/redo cycle; each
/// implementation is responsible for restoring exactly the state `unexecute`
/// tore down, ids included.
pub trait Command: std::fmt::Debug {
    /// Human-readable label, used as the undo-menu entry and the status tag.
    fn name(&self) -> &str;

    /// Apply the command. On failure the graph must be left untouched.
    fn execute(&mut self, graph: &mut CircuitGraph) -> ScadResult<()>;

    /// Reverse a prior successful `execute`.
    fn unexecute(&mut self, graph: &mut CircuitGraph);
}
