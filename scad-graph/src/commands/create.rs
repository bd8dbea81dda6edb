//! CreateCommand - allocate a fresh pin, gate, or branch.

use scad_components::{GateKind, InputPin, OutputPin, PrimitiveGate};
use scad_core::{Component, ComponentKind, Id, ScadResult};
use serde::{Deserialize, Serialize};

use super::Command;
use crate::graph::CircuitGraph;

/// What kind of component a [`CreateCommand`] should build, and whatever
/// requirement values its construction needs.
///
/// Also the per-command payload persisted by [`crate::serialization`]: every
/// variant carries everything needed to rebuild the component, so it is
/// self-describing once wrapped in the byte frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CreateRequest {
    InputPin,
    OutputPin,
    PrimitiveGate(GateKind),
    /// `(source, source output slot, sink, sink input slot)`.
    Branch { source: Id, source_slot: usize, sink: Id, sink_slot: usize },
}

impl CreateRequest {
    fn kind(&self) -> ComponentKind {
        match self {
            CreateRequest::InputPin => ComponentKind::InputPin,
            CreateRequest::OutputPin => ComponentKind::OutputPin,
            CreateRequest::PrimitiveGate(_) => ComponentKind::PrimitiveGate,
            CreateRequest::Branch { .. } => ComponentKind::Branch,
        }
    }
}

/// Command to allocate a fresh component of the requested type and register
/// it in the editor's graph.
///
/// On `unexecute`, the component is removed and torn down along with any
/// branches it happens to carry at that moment; on a later `execute` it
/// comes back under the exact same id, which is what lets a sequence of
/// undo/redo leave ids untouched. A `CreateCommand` is also [`Clone`]: a
/// clone always starts `Fresh`, so one templated command (e.g. "create an
/// AND gate") can stamp out many independently-identified components without
/// re-prompting for requirement values.
#[derive(Debug)]
pub struct CreateCommand {
    request: CreateRequest,
    id: Option<Id>,
    stored: Option<Box<dyn Component>>,
    live: bool,
}

impl Clone for CreateCommand {
    fn clone(&self) -> Self {
        Self { request: self.request.clone(), id: None, stored: None, live: false }
    }
}

impl CreateCommand {
    pub fn new(request: CreateRequest) -> Self {
        Self { request, id: None, stored: None, live: false }
    }

    /// The id this command's component was assigned, once it has executed
    /// at least once.
    pub fn component_id(&self) -> Option<&Id> {
        self.id.as_ref()
    }

    pub fn request(&self) -> &CreateRequest {
        &self.request
    }
}

impl Command for CreateCommand {
    fn name(&self) -> &str {
        "Create"
    }

    fn execute(&mut self, graph: &mut CircuitGraph) -> ScadResult<()> {
        if self.live {
            return Ok(());
        }
        match &self.request {
            CreateRequest::Branch { source, source_slot, sink, sink_slot } => {
                let id = match &self.id {
                    Some(id) => id.clone(),
                    None => graph.mint_id(ComponentKind::Branch),
                };
                graph.connect_as(id.clone(), source, *source_slot, sink, *sink_slot)?;
                self.id = Some(id);
            }
            _ => {
                if let Some(component) = self.stored.take() {
                    graph.insert(component)?;
                } else {
                    let id = graph.mint_id(self.request.kind());
                    let component: Box<dyn Component> = match &self.request {
                        CreateRequest::InputPin => Box::new(InputPin::new(id.clone())),
                        CreateRequest::OutputPin => Box::new(OutputPin::new(id.clone())),
                        CreateRequest::PrimitiveGate(kind) => Box::new(PrimitiveGate::new(id.clone(), *kind)),
                        CreateRequest::Branch { .. } => unreachable!("handled above"),
                    };
                    graph.insert(component)?;
                    self.id = Some(id);
                }
            }
        }
        self.live = true;
        Ok(())
    }

    fn unexecute(&mut self, graph: &mut CircuitGraph) {
        if !self.live {
            return;
        }
        let Some(id) = self.id.clone() else { return };
        match &self.request {
            CreateRequest::Branch { .. } => {
                let _ = graph.disconnect(&id);
            }
            _ => {
                if let Ok(component) = graph.destroy(&id) {
                    self.stored = Some(component);
                }
            }
        }
        self.live = false;
    }
}
