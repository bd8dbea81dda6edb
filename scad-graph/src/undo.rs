//! Undo/redo history for [`Command`]s applied to a [`CircuitGraph`].
//!
//! # Example
//!
//! ```ignore
//! use scad_graph::graph::CircuitGraph;
//! use scad_graph::undo::EditorHistory;
//! use scad_graph::commands::{CreateCommand, CreateRequest};
//!
//! let mut graph = CircuitGraph::new();
//! let mut history = EditorHistory::new();
//!
//! history.execute(&mut graph, CreateCommand::new(CreateRequest::InputPin))?;
//! history.undo(&mut graph);
//! history.redo(&mut graph);
//!
//! assert!(history.can_undo());
//! assert!(!history.can_redo());
//! ```

use crate::commands::Command;
use crate::graph::CircuitGraph;
use scad_core::ScadResult;

/// A linear, stack-based undo/redo history.
///
/// Commands are stored oldest-first. `position` marks the boundary between
/// applied commands (`history[..position]`) and undone-but-retained ones
/// (`history[position..]`); executing a fresh command past that boundary
/// discards the retained future.
#[derive(Debug)]
pub struct EditorHistory {
    history: Vec<Box<dyn Command>>,
    position: usize,
    dirty: bool,
}

impl Default for EditorHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorHistory {
    pub fn new() -> Self {
        Self { history: Vec::new(), position: 0, dirty: false }
    }

    /// Execute a command and push it onto the history. Future (redo-able)
    /// commands are discarded first. If `execute` fails, the history is left
    /// untouched and the error is returned.
    pub fn execute<C: Command + 'static>(&mut self, graph: &mut CircuitGraph, mut command: C) -> ScadResult<()> {
        command.execute(graph)?;
        self.push(Box::new(command));
        Ok(())
    }

    /// Like [`Self::execute`], for a command already boxed.
    pub fn execute_boxed(&mut self, graph: &mut CircuitGraph, mut command: Box<dyn Command>) -> ScadResult<()> {
        command.execute(graph)?;
        self.push(command);
        Ok(())
    }

    fn push(&mut self, command: Box<dyn Command>) {
        if self.position < self.history.len() {
            self.history.truncate(self.position);
        }
        self.history.push(command);
        self.position = self.history.len();
        self.dirty = true;
    }

    /// Undo the most recently applied command. Returns `false` if there is
    /// nothing to undo.
    pub fn undo(&mut self, graph: &mut CircuitGraph) -> bool {
        if self.position == 0 {
            return false;
        }
        self.position -= 1;
        self.history[self.position].unexecute(graph);
        self.dirty = true;
        true
    }

    /// Redo the most recently undone command. Returns `false` if there is
    /// nothing to redo.
    ///
    /// A command that previously executed successfully is expected to
    /// execute successfully again; a redo failure leaves history position
    /// unchanged and the error is returned.
    pub fn redo(&mut self, graph: &mut CircuitGraph) -> ScadResult<bool> {
        if self.position >= self.history.len() {
            return Ok(false);
        }
        self.history[self.position].execute(graph)?;
        self.position += 1;
        self.dirty = true;
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        self.position > 0
    }

    pub fn can_redo(&self) -> bool {
        self.position < self.history.len()
    }

    pub fn undo_name(&self) -> Option<&str> {
        (self.position > 0).then(|| self.history[self.position - 1].name())
    }

    pub fn redo_name(&self) -> Option<&str> {
        (self.position < self.history.len()).then(|| self.history[self.position].name())
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the current position as saved; `is_dirty` reports `false` until
    /// the next command execute/undo/redo.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Drop all history. Used when opening a new document into the same
    /// editor. Marks dirty, same as execute/undo/redo.
    pub fn clear(&mut self) {
        self.history.clear();
        self.position = 0;
        self.dirty = true;
    }

    /// `(past, future)` command names for an undo/redo menu. Past is most
    /// recent first.
    pub fn command_names(&self) -> (Vec<&str>, Vec<&str>) {
        let past = self.history[..self.position].iter().rev().map(|c| c.name()).collect();
        let future = self.history[self.position..].iter().map(|c| c.name()).collect();
        (past, future)
    }
}
