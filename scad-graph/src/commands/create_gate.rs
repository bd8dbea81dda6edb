//! CreateGateCommand - freeze a recorded component list into a CompositeGate.

use scad_core::{ComponentKind, Id, ScadResult};
use serde::{Deserialize, Serialize};

use super::create::{CreateCommand, CreateRequest};
use super::Command;
use crate::composite::CompositeGate;
use crate::graph::CircuitGraph;

/// An internal wire between two of a [`CreateGateCommand`]'s sub-commands,
/// named by their position in `sub_commands` rather than by id - a
/// sub-command's id is only known once it has executed, and is re-minted
/// fresh on every rebuild.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalWire {
    pub source_index: usize,
    pub source_slot: usize,
    pub sink_index: usize,
    pub sink_slot: usize,
}

/// Command that builds a [`CompositeGate`] out of a recorded list of
/// sub-commands (each an `InputPin`, `OutputPin`, or `PrimitiveGate` request)
/// plus the wiring between them, and treats the result as a first-class
/// createable component.
///
/// `sub_commands`/`internal_wires` are a template: every `execute` (including
/// a redo after `unexecute`) builds a brand new private [`CircuitGraph`] and
/// replays a fresh [`Clone`] of each sub-command against it, so the inner
/// wiring gets its own freshly generated ids each time. None of that matters
/// to callers outside the composite - only the composite's own id, which is
/// preserved across unexecute/execute, is ever visible to the outer graph.
///
/// `unexecute` removes the composite as a whole; the sub-commands are never
/// re-exposed to the outer undo history.
#[derive(Debug)]
pub struct CreateGateCommand {
    sub_commands: Vec<CreateCommand>,
    internal_wires: Vec<InternalWire>,
    description: String,
    id: Option<Id>,
    live: bool,
}

impl Clone for CreateGateCommand {
    /// A clone is always a fresh, un-executed template - same shape as
    /// [`CreateCommand`]'s `Clone`, for the same reason: an
    /// [`crate::editor::Editor`]-held template must mint its own composite id
    /// on each independent instantiation.
    fn clone(&self) -> Self {
        Self {
            sub_commands: self.sub_commands.clone(),
            internal_wires: self.internal_wires.clone(),
            description: self.description.clone(),
            id: None,
            live: false,
        }
    }
}

impl CreateGateCommand {
    pub fn new(sub_commands: Vec<CreateCommand>, internal_wires: Vec<InternalWire>, description: impl Into<String>) -> Self {
        Self { sub_commands, internal_wires, description: description.into(), id: None, live: false }
    }

    pub fn component_id(&self) -> Option<&Id> {
        self.id.as_ref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The sub-command templates this gate replays on every `execute`, for
    /// a caller (e.g. persistence) that needs to record them independently
    /// of the component this command built.
    pub fn sub_command_requests(&self) -> Vec<CreateRequest> {
        self.sub_commands.iter().map(|c| c.request().clone()).collect()
    }

    pub fn internal_wires(&self) -> &[InternalWire] {
        &self.internal_wires
    }
}

impl Command for CreateGateCommand {
    fn name(&self) -> &str {
        "Create Gate"
    }

    fn execute(&mut self, graph: &mut CircuitGraph) -> ScadResult<()> {
        if self.live {
            return Ok(());
        }

        let mut inner = CircuitGraph::new();
        let mut built_ids = Vec::with_capacity(self.sub_commands.len());
        let mut input_ids = Vec::new();
        let mut output_ids = Vec::new();
        for template in &self.sub_commands {
            let mut built = template.clone();
            built.execute(&mut inner)?;
            let built_id = built.component_id().cloned().expect("just executed");
            match built.request() {
                CreateRequest::InputPin => input_ids.push(built_id.clone()),
                CreateRequest::OutputPin => output_ids.push(built_id.clone()),
                _ => {}
            }
            built_ids.push(built_id);
        }
        for wire in &self.internal_wires {
            let source = built_ids[wire.source_index].clone();
            let sink = built_ids[wire.sink_index].clone();
            inner.connect(&source, wire.source_slot, &sink, wire.sink_slot)?;
        }
        inner.freeze_all();

        let id = match &self.id {
            Some(id) => id.clone(),
            None => graph.mint_id(ComponentKind::CompositeGate),
        };
        let composite = CompositeGate::new(id.clone(), inner, input_ids, output_ids, self.description.clone());
        graph.insert(Box::new(composite))?;
        self.id = Some(id);
        self.live = true;
        Ok(())
    }

    fn unexecute(&mut self, graph: &mut CircuitGraph) {
        if !self.live {
            return;
        }
        let Some(id) = self.id.clone() else { return };
        let _ = graph.destroy(&id);
        self.live = false;
    }
}
