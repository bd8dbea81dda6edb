//! The editor: one live [`CircuitGraph`], its undo history, and the command
//! log needed to persist it.

use tracing::{debug, warn};

use scad_core::{Id, ScadResult, Signal};

use crate::commands::{Command, CreateCommand, CreateGateCommand, CreateRequest, DeleteCommand, InternalWire};
use crate::graph::CircuitGraph;
use crate::serialization::{self, PersistedCommand};
use crate::undo::EditorHistory;

/// Where a document currently lives on disk, and whether it has unsaved
/// changes. `filename` is `None` for a document that has never been saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileInfo {
    pub filename: Option<String>,
    pub dirty: bool,
}

impl FileInfo {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Where an editor reports user-facing status lines. Kept as a trait so the
/// editor stays headless and testable: a CLI, a TUI, and a GUI can each
/// implement this without the editor knowing which.
pub trait StatusSink {
    fn status(&mut self, message: &str);
}

/// A [`StatusSink`] that drops every message, for headless use and tests.
#[derive(Debug, Default)]
pub struct NullStatusSink;

impl StatusSink for NullStatusSink {
    fn status(&mut self, _message: &str) {}
}

/// One open document: its live graph, undo history, and the parallel
/// top-level command log persistence needs.
///
/// `log` mirrors `history` index-for-index: undo/redo move `history`'s
/// cursor without touching `log`, exactly as `EditorHistory` itself retains
/// undone-but-not-yet-overwritten commands for redo. Only a fresh command
/// pushed past the cursor discards the stale future in both. SAVE persists
/// `log[..history.position()]`, the currently-applied prefix.
#[derive(Debug)]
pub struct Editor {
    graph: CircuitGraph,
    history: EditorHistory,
    log: Vec<PersistedCommand>,
    templates: Vec<CreateGateCommand>,
    file: FileInfo,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    pub fn new() -> Self {
        Self {
            graph: CircuitGraph::new(),
            history: EditorHistory::new(),
            log: Vec::new(),
            templates: Vec::new(),
            file: FileInfo::new(),
        }
    }

    pub fn graph(&self) -> &CircuitGraph {
        &self.graph
    }

    pub fn file(&self) -> &FileInfo {
        &self.file
    }

    pub fn is_dirty(&self) -> bool {
        self.history.is_dirty()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Registered [`CreateGateCommand`] templates, in registration order,
    /// by description. Used to populate CREATE's enumerated composite-kind
    /// requirement.
    pub fn template_names(&self) -> Vec<&str> {
        self.templates.iter().map(|t| t.description()).collect()
    }

    /// CREATE: allocate a fresh pin, gate, or branch.
    pub fn create(&mut self, request: CreateRequest, status: &mut impl StatusSink) -> ScadResult<Id> {
        let mut cmd = CreateCommand::new(request.clone());
        cmd.execute(&mut self.graph)?;
        let id = cmd.component_id().cloned().expect("just executed");
        self.history.execute_boxed(&mut self.graph, Box::new(cmd))?;
        self.push_log(PersistedCommand::Create(request));
        debug!(id = %id, "created component");
        status.status(&format!("created {id}"));
        Ok(id)
    }

    /// CREATE by template name: instantiate a registered composite gate.
    pub fn create_from_template(&mut self, description: &str, status: &mut impl StatusSink) -> ScadResult<Id> {
        let template = self
            .templates
            .iter()
            .find(|t| t.description() == description)
            .ok_or_else(|| scad_core::ScadError::requirement_unfulfilled(format!("no such template: {description}")))?
            .clone();
        self.create_gate_command(template, status)
    }

    /// DELETE: remove a component by id.
    pub fn delete(&mut self, target: Id, status: &mut impl StatusSink) -> ScadResult<()> {
        let mut cmd = DeleteCommand::new(target.clone());
        cmd.execute(&mut self.graph)?;
        self.history.execute_boxed(&mut self.graph, Box::new(cmd))?;
        self.push_log(PersistedCommand::Delete(target.clone()));
        debug!(id = %target, "deleted component");
        status.status(&format!("deleted {target}"));
        Ok(())
    }

    /// Build a composite gate out of a recorded sub-command list and
    /// register it as a reusable template, without touching the live graph.
    /// Corresponds to OPEN's "component" sub-mode.
    pub fn add_create_command(&mut self, cmd: CreateGateCommand) {
        self.templates.push(cmd);
    }

    /// Instantiate a [`CreateGateCommand`] (fresh or a template clone)
    /// directly into the live graph, recording it in history and the log.
    pub fn create_gate(
        &mut self,
        sub_commands: Vec<CreateRequest>,
        internal_wires: Vec<InternalWire>,
        description: impl Into<String>,
        status: &mut impl StatusSink,
    ) -> ScadResult<Id> {
        let description = description.into();
        let cmd = CreateGateCommand::new(
            sub_commands.iter().cloned().map(CreateCommand::new).collect(),
            internal_wires,
            description,
        );
        self.create_gate_command(cmd, status)
    }

    fn create_gate_command(&mut self, mut cmd: CreateGateCommand, status: &mut impl StatusSink) -> ScadResult<Id> {
        let sub_commands = cmd.sub_command_requests();
        let internal_wires = cmd.internal_wires().to_vec();
        let description = cmd.description().to_string();

        cmd.execute(&mut self.graph)?;
        let id = cmd.component_id().cloned().expect("just executed");
        let persisted = PersistedCommand::CreateGate { sub_commands, internal_wires, description };
        self.history.execute_boxed(&mut self.graph, Box::new(cmd))?;
        self.push_log(persisted);
        debug!(id = %id, "created composite gate");
        status.status(&format!("created {id}"));
        Ok(id)
    }

    /// Drive an input pin's level directly (not undoable, not logged - a
    /// level change is a simulation input, not an edit to the circuit).
    pub fn set_input_level(&mut self, id: &Id, signal: Signal) -> ScadResult<()> {
        self.graph.set_input_level(id, signal)
    }

    pub fn undo(&mut self, status: &mut impl StatusSink) -> bool {
        // `log` mirrors `history`'s own past-and-retained-future vector, so
        // a redo later finds its entry still there; only a fresh command
        // pushed past this point (see `push_log`) ever drops it for good.
        let undone = self.history.undo(&mut self.graph);
        if undone {
            status.status("undid last action");
        } else {
            warn!("nothing to undo");
            status.status("nothing to undo");
        }
        undone
    }

    pub fn redo(&mut self, status: &mut impl StatusSink) -> ScadResult<bool> {
        let redone = self.history.redo(&mut self.graph)?;
        if redone {
            status.status("redid last action");
        } else {
            status.status("nothing to redo");
        }
        Ok(redone)
    }

    /// CLEAR: drop the live graph and history entirely.
    pub fn clear(&mut self, status: &mut impl StatusSink) {
        self.graph = CircuitGraph::new();
        self.history.clear();
        self.log.clear();
        self.file = FileInfo::new();
        status.status("cleared");
    }

    /// SAVE: write the currently-applied command log to `directory/filename`.
    pub fn save(&mut self, directory: impl AsRef<std::path::Path>, filename: &str, status: &mut impl StatusSink) -> serialization::Result<()> {
        let path = serialization::circuit_path(directory, filename);
        serialization::save(&path, &self.log[..self.history.position()])?;
        self.history.mark_saved();
        self.file = FileInfo { filename: Some(filename.to_string()), dirty: false };
        status.status(&format!("saved {filename}"));
        Ok(())
    }

    /// OPEN (circuit mode): replace this editor's content by replaying the
    /// command log read back from `directory/filename`.
    pub fn open_circuit(
        &mut self,
        directory: impl AsRef<std::path::Path>,
        filename: &str,
        status: &mut impl StatusSink,
    ) -> ScadResult<()> {
        let path = serialization::circuit_path(directory, filename);
        let commands = serialization::load(&path).map_err(|e| scad_core::ScadError::requirement_unfulfilled(e.to_string()))?;

        self.graph = CircuitGraph::new();
        self.history.clear();
        self.log.clear();
        for persisted in &commands {
            self.apply_persisted(persisted)?;
        }
        self.history.mark_saved();
        self.file = FileInfo { filename: Some(filename.to_string()), dirty: false };
        status.status(&format!("opened {filename}"));
        Ok(())
    }

    /// OPEN (component mode): read a saved command log and register it as a
    /// reusable composite template, leaving this editor's live graph alone.
    pub fn open_as_template(
        &mut self,
        directory: impl AsRef<std::path::Path>,
        filename: &str,
        status: &mut impl StatusSink,
    ) -> ScadResult<()> {
        let path = serialization::circuit_path(directory, filename);
        let commands = serialization::load(&path).map_err(|e| scad_core::ScadError::requirement_unfulfilled(e.to_string()))?;

        // A saved circuit's Branch requests name fixed ids from that save.
        // Ids mint deterministically in replay order, so a scratch graph
        // replayed in the same order recovers exactly which saved id each
        // sub-command produced; that lets a Branch entry be translated into
        // a position-based wire (the same problem `InternalWire` solves for
        // a freshly-authored composite) instead of being replayed as-is.
        let mut scratch = CircuitGraph::new();
        let mut sub_commands = Vec::new();
        let mut internal_wires = Vec::new();
        let mut index_of: std::collections::HashMap<Id, usize> = std::collections::HashMap::new();
        for persisted in &commands {
            match persisted {
                PersistedCommand::Create(CreateRequest::Branch { source, source_slot, sink, sink_slot }) => {
                    let (Some(&source_index), Some(&sink_index)) = (index_of.get(source), index_of.get(sink)) else {
                        return Err(scad_core::ScadError::requirement_unfulfilled(
                            "component template branch references an id outside this file",
                        ));
                    };
                    internal_wires.push(InternalWire {
                        source_index,
                        source_slot: *source_slot,
                        sink_index,
                        sink_slot: *sink_slot,
                    });
                }
                PersistedCommand::Create(request) => {
                    let mut probe = CreateCommand::new(request.clone());
                    probe.execute(&mut scratch)?;
                    let id = probe.component_id().cloned().expect("just executed");
                    index_of.insert(id, sub_commands.len());
                    sub_commands.push(CreateCommand::new(request.clone()));
                }
                PersistedCommand::CreateGate { .. } | PersistedCommand::Delete(_) => {
                    return Err(scad_core::ScadError::requirement_unfulfilled(
                        "component templates may only contain Create commands",
                    ))
                }
            }
        }
        self.add_create_command(CreateGateCommand::new(sub_commands, internal_wires, filename));
        status.status(&format!("loaded {filename} as a component"));
        Ok(())
    }

    fn apply_persisted(&mut self, persisted: &PersistedCommand) -> ScadResult<()> {
        match persisted {
            PersistedCommand::Create(request) => {
                let mut cmd = CreateCommand::new(request.clone());
                cmd.execute(&mut self.graph)?;
                self.history.execute_boxed(&mut self.graph, Box::new(cmd))?;
            }
            PersistedCommand::Delete(target) => {
                let mut cmd = DeleteCommand::new(target.clone());
                cmd.execute(&mut self.graph)?;
                self.history.execute_boxed(&mut self.graph, Box::new(cmd))?;
            }
            PersistedCommand::CreateGate { sub_commands, internal_wires, description } => {
                let mut cmd = CreateGateCommand::new(
                    sub_commands.iter().cloned().map(CreateCommand::new).collect(),
                    internal_wires.clone(),
                    description.clone(),
                );
                cmd.execute(&mut self.graph)?;
                self.history.execute_boxed(&mut self.graph, Box::new(cmd))?;
            }
        }
        self.log.push(persisted.clone());
        Ok(())
    }

    fn push_log(&mut self, persisted: PersistedCommand) {
        // `history.position()` already reflects this command's push, so
        // `position - 1` is where the stale (undone) future, if any, began.
        let previous_position = self.history.position() - 1;
        self.log.truncate(previous_position);
        self.log.push(persisted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scad_components::GateKind;

    #[test]
    fn create_then_save_then_open_round_trips_s5() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = NullStatusSink;
        let mut editor = Editor::new();
        let i0 = editor.create(CreateRequest::InputPin, &mut sink).unwrap();
        let i1 = editor.create(CreateRequest::InputPin, &mut sink).unwrap();
        let g = editor.create(CreateRequest::PrimitiveGate(GateKind::And), &mut sink).unwrap();
        editor.create(CreateRequest::Branch { source: i0.clone(), source_slot: 0, sink: g.clone(), sink_slot: 0 }, &mut sink).unwrap();
        editor.create(CreateRequest::Branch { source: i1.clone(), source_slot: 0, sink: g.clone(), sink_slot: 1 }, &mut sink).unwrap();

        editor.save(dir.path(), "and_gate", &mut sink).unwrap();
        assert!(!editor.is_dirty());

        let mut reopened = Editor::new();
        reopened.open_circuit(dir.path(), "and_gate", &mut sink).unwrap();
        assert_eq!(reopened.graph().len(), editor.graph().len());
    }

    #[test]
    fn redo_after_undo_keeps_the_log_in_sync_with_history() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = NullStatusSink;
        let mut editor = Editor::new();
        editor.create(CreateRequest::InputPin, &mut sink).unwrap();
        editor.create(CreateRequest::OutputPin, &mut sink).unwrap();

        editor.undo(&mut sink);
        editor.redo(&mut sink).unwrap();

        editor.save(dir.path(), "two_pins", &mut sink).unwrap();
        let mut reopened = Editor::new();
        reopened.open_circuit(dir.path(), "two_pins", &mut sink).unwrap();
        assert_eq!(reopened.graph().len(), 2, "a redo must be reflected in what SAVE persists");
    }

    #[test]
    fn undo_after_create_matches_invariant_i_undo() {
        let mut sink = NullStatusSink;
        let mut editor = Editor::new();
        editor.create(CreateRequest::InputPin, &mut sink).unwrap();
        assert_eq!(editor.graph().len(), 1);

        editor.undo(&mut sink);
        assert_eq!(editor.graph().len(), 0);
        assert!(editor.is_dirty(), "undo always marks dirty, per the CLEAR/CREATE/DELETE/UNDO/REDO contract");
    }

    #[test]
    fn clear_drops_graph_and_history() {
        let mut sink = NullStatusSink;
        let mut editor = Editor::new();
        editor.create(CreateRequest::InputPin, &mut sink).unwrap();
        editor.clear(&mut sink);
        assert!(editor.graph().is_empty());
        assert!(!editor.can_undo());
        assert!(editor.is_dirty(), "clear always marks dirty");
    }

    #[test]
    fn add_create_command_registers_a_template_without_touching_the_graph() {
        let mut sink = NullStatusSink;
        let mut editor = Editor::new();
        let sub_commands = vec![CreateCommand::new(CreateRequest::InputPin)];
        editor.add_create_command(CreateGateCommand::new(sub_commands, vec![], "SINGLE_PIN"));
        assert!(editor.graph().is_empty());
        assert_eq!(editor.template_names(), vec!["SINGLE_PIN"]);
    }
}
