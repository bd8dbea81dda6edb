//! Branch: the directed wire between two component slots.

use std::any::Any;

use scad_core::{BranchEndpoints, Component, ComponentKind, Id, MalformedBranchReason, Signal};

/// A directed wire from one component's output slot to another's input slot.
///
/// Carries exactly one signal, mirroring whatever its source last emitted.
/// Constructing a `Branch` does not by itself wire it into the graph — the
/// owning [`CircuitGraph`](../../scad_graph/struct.CircuitGraph.html) is
/// responsible for calling `connect_out` on the source and `set_in` on the
/// sink, then seeding this branch's level from the source's current level,
/// which is what "subscribes at both endpoints and immediately propagates
/// the source's current level" means operationally.
pub struct Branch {
    id: Id,
    changeable: bool,
    level: Signal,
    source: Id,
    source_slot: usize,
    sink: Id,
    sink_slot: usize,
}

impl Branch {
    pub fn new(id: Id, source: Id, source_slot: usize, sink: Id, sink_slot: usize) -> Self {
        Self { id, changeable: true, level: Signal::Low, source, source_slot, sink, sink_slot }
    }

    pub fn source(&self) -> (&Id, usize) {
        (&self.source, self.source_slot)
    }

    pub fn sink(&self) -> (&Id, usize) {
        (&self.sink, self.sink_slot)
    }
}

impl Component for Branch {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
    fn id(&self) -> &Id {
        &self.id
    }
    fn kind(&self) -> ComponentKind {
        ComponentKind::Branch
    }
    fn changeable(&self) -> bool {
        self.changeable
    }
    fn set_changeable(&mut self, changeable: bool) {
        self.changeable = changeable;
    }
    fn input_count(&self) -> usize {
        1
    }
    fn output_count(&self) -> usize {
        1
    }
    fn active(&self, slot: usize) -> Option<Signal> {
        (slot == 0).then_some(self.level)
    }
    fn incoming(&self, _slot: usize) -> Option<&Id> {
        // A branch's "incoming" is the source component it was built from,
        // not another branch; that relationship is exposed via `endpoints`.
        None
    }
    fn outgoing(&self, _slot: usize) -> &[Id] {
        // Likewise, a branch's downstream is a component+slot pair, not a
        // further branch id; the graph reads that via `endpoints`.
        &[]
    }
    fn set_in(&mut self, _branch: Id, _slot: usize) -> Result<(), MalformedBranchReason> {
        Err(MalformedBranchReason::SlotOutOfRange)
    }
    fn clear_in(&mut self, _slot: usize) {}
    fn connect_out(&mut self, _branch: Id, _slot: usize) -> Result<(), MalformedBranchReason> {
        Err(MalformedBranchReason::SlotOutOfRange)
    }
    fn disconnect_out(&mut self, _branch: Id, _slot: usize) {}
    fn wake_up(&mut self, new_signal: Signal, slot_index: usize, propagate_changeable: bool) -> Vec<usize> {
        if propagate_changeable {
            self.changeable = false;
        }
        if slot_index != 0 {
            return Vec::new();
        }
        if self.level == new_signal {
            Vec::new()
        } else {
            self.level = new_signal;
            vec![0]
        }
    }
    fn endpoints(&self) -> Option<BranchEndpoints> {
        Some(BranchEndpoints {
            source: self.source.clone(),
            source_slot: self.source_slot,
            sink: self.sink.clone(),
            sink_slot: self.sink_slot,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_mirrors_source_level_changed_only() {
        let mut branch = Branch::new(Id::new("B0"), Id::new("I0"), 0, Id::new("G0"), 1);
        assert_eq!(branch.wake_up(Signal::Low, 0, false), Vec::<usize>::new());
        assert_eq!(branch.wake_up(Signal::High, 0, false), vec![0]);
        assert_eq!(branch.wake_up(Signal::High, 0, false), Vec::<usize>::new());
    }

    #[test]
    fn branch_exposes_its_endpoints() {
        let branch = Branch::new(Id::new("B0"), Id::new("I0"), 0, Id::new("G0"), 1);
        let endpoints = branch.endpoints().unwrap();
        assert_eq!(endpoints.source, Id::new("I0"));
        assert_eq!(endpoints.source_slot, 0);
        assert_eq!(endpoints.sink, Id::new("G0"));
        assert_eq!(endpoints.sink_slot, 1);
    }
}
