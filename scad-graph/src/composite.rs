//! CompositeGate: a frozen sub-circuit exposed as a single component.

use std::any::Any;

use scad_core::{Component, ComponentKind, Id, MalformedBranchReason, Signal};

use crate::graph::CircuitGraph;

/// A gate built by freezing a private [`CircuitGraph`] and exposing a subset
/// of its `InputPin`/`OutputPin` components, in declaration order, as this
/// component's own input/output slots.
///
/// The inner graph is wholly owned and never touched from outside except
/// through [`CircuitGraph::force_input_level`], which is how `wake_up`
/// delegates a change on one of this gate's input slots to the corresponding
/// frozen inner input pin.
pub struct CompositeGate {
    id: Id,
    changeable: bool,
    description: String,
    inner: CircuitGraph,
    input_ids: Vec<Id>,
    output_ids: Vec<Id>,
    incoming: Vec<Option<Id>>,
    outgoing: Vec<Vec<Id>>,
}

impl CompositeGate {
    /// `inner` must already be frozen (see [`CircuitGraph::freeze_all`]);
    /// `input_ids`/`output_ids` name, in declaration order, which of its
    /// components this gate exposes.
    pub fn new(id: Id, inner: CircuitGraph, input_ids: Vec<Id>, output_ids: Vec<Id>, description: String) -> Self {
        let input_count = input_ids.len();
        let output_count = output_ids.len();
        Self {
            id,
            changeable: true,
            description,
            inner,
            input_ids,
            output_ids,
            incoming: vec![None; input_count],
            outgoing: vec![Vec::new(); output_count],
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The private sub-circuit, for inspection (e.g. by persistence).
    pub fn inner(&self) -> &CircuitGraph {
        &self.inner
    }
}

impl Component for CompositeGate {
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
        ComponentKind::CompositeGate
    }
    fn changeable(&self) -> bool {
        self.changeable
    }
    fn set_changeable(&mut self, changeable: bool) {
        self.changeable = changeable;
    }
    fn input_count(&self) -> usize {
        self.input_ids.len()
    }
    fn output_count(&self) -> usize {
        self.output_ids.len()
    }
    fn active(&self, slot: usize) -> Option<Signal> {
        let output_id = self.output_ids.get(slot)?;
        self.inner.active(output_id, 0).ok()
    }
    fn incoming(&self, slot: usize) -> Option<&Id> {
        self.incoming.get(slot).and_then(|b| b.as_ref())
    }
    fn outgoing(&self, slot: usize) -> &[Id] {
        self.outgoing.get(slot).map(|v| v.as_slice()).unwrap_or(&[])
    }
    fn set_in(&mut self, branch: Id, slot: usize) -> Result<(), MalformedBranchReason> {
        let Some(current) = self.incoming.get_mut(slot) else {
            return Err(MalformedBranchReason::SlotOutOfRange);
        };
        if current.is_some() {
            return Err(MalformedBranchReason::InputSlotAlreadyDriven);
        }
        *current = Some(branch);
        Ok(())
    }
    fn clear_in(&mut self, slot: usize) {
        if let Some(current) = self.incoming.get_mut(slot) {
            *current = None;
        }
    }
    fn connect_out(&mut self, branch: Id, slot: usize) -> Result<(), MalformedBranchReason> {
        let Some(bucket) = self.outgoing.get_mut(slot) else {
            return Err(MalformedBranchReason::SlotOutOfRange);
        };
        bucket.push(branch);
        Ok(())
    }
    fn disconnect_out(&mut self, branch: Id, slot: usize) {
        if let Some(bucket) = self.outgoing.get_mut(slot) {
            bucket.retain(|b| b != &branch);
        }
    }
    fn wake_up(&mut self, new_signal: Signal, slot_index: usize, propagate_changeable: bool) -> Vec<usize> {
        if propagate_changeable {
            self.changeable = false;
        }
        let Some(input_id) = self.input_ids.get(slot_index) else { return Vec::new() };

        let before: Vec<Signal> =
            self.output_ids.iter().map(|id| self.inner.active(id, 0).unwrap_or_default()).collect();
        let _ = self.inner.force_input_level(input_id, new_signal);

        self.output_ids
            .iter()
            .enumerate()
            .filter_map(|(slot, id)| {
                let after = self.inner.active(id, 0).unwrap_or_default();
                (after != before[slot]).then_some(slot)
            })
            .collect()
    }
    fn destroy(&mut self) {
        self.incoming.iter_mut().for_each(|b| *b = None);
        self.outgoing.iter_mut().for_each(|bucket| bucket.clear());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{Command, CreateCommand, CreateRequest};
    use scad_core::ComponentKind as Kind;

    fn and_gate_composite() -> (CircuitGraph, Id, Id, Id) {
        let mut inner = CircuitGraph::new();
        let i0 = inner.mint_id(Kind::InputPin);
        let i1 = inner.mint_id(Kind::InputPin);
        let g = inner.mint_id(Kind::PrimitiveGate);
        let o = inner.mint_id(Kind::OutputPin);
        inner.insert(Box::new(scad_components::InputPin::new(i0.clone()))).unwrap();
        inner.insert(Box::new(scad_components::InputPin::new(i1.clone()))).unwrap();
        inner
            .insert(Box::new(scad_components::PrimitiveGate::new(g.clone(), scad_components::GateKind::And)))
            .unwrap();
        inner.insert(Box::new(scad_components::OutputPin::new(o.clone()))).unwrap();
        inner.connect(&i0, 0, &g, 0).unwrap();
        inner.connect(&i1, 0, &g, 1).unwrap();
        inner.connect(&g, 0, &o, 0).unwrap();
        inner.freeze_all();

        let mut outer = CircuitGraph::new();
        let composite_id = outer.mint_id(Kind::CompositeGate);
        let composite =
            CompositeGate::new(composite_id.clone(), inner, vec![i0.clone(), i1.clone()], vec![o.clone()], "AND2".into());
        outer.insert(Box::new(composite)).unwrap();
        (outer, composite_id, i0, i1)
    }

    #[test]
    fn wake_up_delegates_to_frozen_inner_input_and_reports_changed_output() {
        let (mut outer, composite_id, _i0, _i1) = and_gate_composite();

        let changed = outer.get_mut(&composite_id).unwrap().wake_up(Signal::High, 0, false);
        assert!(changed.is_empty(), "single input cannot flip an AND gate alone");

        let changed = outer.get_mut(&composite_id).unwrap().wake_up(Signal::High, 1, false);
        assert_eq!(changed, vec![0]);
        assert_eq!(outer.active(&composite_id, 0).unwrap(), Signal::High);
    }

    #[test]
    fn inner_input_pins_stay_unreachable_and_frozen() {
        let (outer, composite_id, i0, _i1) = and_gate_composite();
        let composite = outer.get(&composite_id).unwrap().as_any().downcast_ref::<CompositeGate>().unwrap();
        assert!(!composite.inner().get(&i0).unwrap().changeable());
    }

    #[test]
    fn create_gate_command_builds_a_composite_with_fresh_inner_ids_on_rebuild() {
        let mut outer = CircuitGraph::new();
        let sub_commands = vec![
            CreateCommand::new(CreateRequest::InputPin),
            CreateCommand::new(CreateRequest::InputPin),
            CreateCommand::new(CreateRequest::PrimitiveGate(scad_components::GateKind::And)),
            CreateCommand::new(CreateRequest::OutputPin),
        ];
        let internal_wires = vec![
            crate::commands::InternalWire { source_index: 0, source_slot: 0, sink_index: 2, sink_slot: 0 },
            crate::commands::InternalWire { source_index: 1, source_slot: 0, sink_index: 2, sink_slot: 1 },
            crate::commands::InternalWire { source_index: 2, source_slot: 0, sink_index: 3, sink_slot: 0 },
        ];
        let mut cmd = crate::commands::CreateGateCommand::new(sub_commands, internal_wires, "AND2");
        cmd.execute(&mut outer).unwrap();
        let id = cmd.component_id().cloned().unwrap();
        assert!(outer.contains(&id));

        cmd.unexecute(&mut outer);
        assert!(!outer.contains(&id));

        cmd.execute(&mut outer).unwrap();
        assert_eq!(cmd.component_id(), Some(&id), "outer id is stable across rebuild");
    }
}
