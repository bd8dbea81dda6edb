//! Primitive gates: fixed-arity combinational functions over their inputs.

use std::any::Any;

use scad_core::{Component, ComponentKind, Id, MalformedBranchReason, Signal};
use serde::{Deserialize, Serialize};

/// Which truth table a [`PrimitiveGate`] evaluates. New kinds can be added
/// here without touching the graph or command layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateKind {
    And,
    Or,
    Not,
}

impl GateKind {
    /// Fixed input arity for this kind.
    pub fn arity(self) -> usize {
        match self {
            GateKind::And | GateKind::Or => 2,
            GateKind::Not => 1,
        }
    }

    fn evaluate(self, inputs: &[Signal]) -> Signal {
        match self {
            GateKind::And => Signal::from_bool(inputs.iter().all(|s| s.is_high())),
            GateKind::Or => Signal::from_bool(inputs.iter().any(|s| s.is_high())),
            GateKind::Not => inputs[0].toggled(),
        }
    }
}

/// A fixed-arity combinational gate. Holds `n` input slots (per
/// [`GateKind::arity`]) and exactly one output slot, recomputed whenever any
/// input slot receives a new signal.
pub struct PrimitiveGate {
    id: Id,
    changeable: bool,
    gate_kind: GateKind,
    inputs: Vec<Signal>,
    incoming: Vec<Option<Id>>,
    output: Signal,
    outgoing: Vec<Id>,
}

impl PrimitiveGate {
    pub fn new(id: Id, gate_kind: GateKind) -> Self {
        let arity = gate_kind.arity();
        Self {
            id,
            changeable: true,
            gate_kind,
            inputs: vec![Signal::Low; arity],
            incoming: vec![None; arity],
            output: gate_kind.evaluate(&vec![Signal::Low; arity]),
            outgoing: Vec::new(),
        }
    }

    pub fn gate_kind(&self) -> GateKind {
        self.gate_kind
    }
}

impl Component for PrimitiveGate {
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
        ComponentKind::PrimitiveGate
    }
    fn changeable(&self) -> bool {
        self.changeable
    }
    fn set_changeable(&mut self, changeable: bool) {
        self.changeable = changeable;
    }
    fn input_count(&self) -> usize {
        self.inputs.len()
    }
    fn output_count(&self) -> usize {
        1
    }
    fn active(&self, slot: usize) -> Option<Signal> {
        (slot == 0).then_some(self.output)
    }
    fn incoming(&self, slot: usize) -> Option<&Id> {
        self.incoming.get(slot).and_then(|b| b.as_ref())
    }
    fn outgoing(&self, slot: usize) -> &[Id] {
        if slot == 0 {
            &self.outgoing
        } else {
            &[]
        }
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
        if slot != 0 {
            return Err(MalformedBranchReason::SlotOutOfRange);
        }
        self.outgoing.push(branch);
        Ok(())
    }
    fn disconnect_out(&mut self, branch: Id, slot: usize) {
        if slot == 0 {
            self.outgoing.retain(|b| b != &branch);
        }
    }
    fn wake_up(&mut self, new_signal: Signal, slot_index: usize, propagate_changeable: bool) -> Vec<usize> {
        if propagate_changeable {
            self.changeable = false;
        }
        let Some(slot) = self.inputs.get_mut(slot_index) else {
            return Vec::new();
        };
        *slot = new_signal;
        let new_output = self.gate_kind.evaluate(&self.inputs);
        if new_output == self.output {
            Vec::new()
        } else {
            self.output = new_output;
            vec![0]
        }
    }
    fn destroy(&mut self) {
        self.incoming.iter_mut().for_each(|b| *b = None);
        self.outgoing.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_gate_truth_table() {
        let mut gate = PrimitiveGate::new(Id::new("G0"), GateKind::And);
        assert_eq!(gate.active(0), Some(Signal::Low));

        gate.wake_up(Signal::Low, 0, false);
        gate.wake_up(Signal::Low, 1, false);
        assert_eq!(gate.active(0), Some(Signal::Low));

        gate.wake_up(Signal::High, 0, false);
        assert_eq!(gate.active(0), Some(Signal::Low));

        gate.wake_up(Signal::High, 1, false);
        assert_eq!(gate.active(0), Some(Signal::High));
    }

    #[test]
    fn not_gate_inverts_single_input() {
        let mut gate = PrimitiveGate::new(Id::new("G0"), GateKind::Not);
        assert_eq!(gate.active(0), Some(Signal::High));
        let changed = gate.wake_up(Signal::High, 0, false);
        assert_eq!(changed, vec![0]);
        assert_eq!(gate.active(0), Some(Signal::Low));
    }

    #[test]
    fn wake_up_is_changed_only() {
        let mut gate = PrimitiveGate::new(Id::new("G0"), GateKind::Not);
        gate.wake_up(Signal::High, 0, false);
        let second = gate.wake_up(Signal::High, 0, false);
        assert!(second.is_empty(), "idempotent wake_up must not re-report a change");
    }

    #[test]
    fn second_connection_to_same_input_slot_is_rejected() {
        let mut gate = PrimitiveGate::new(Id::new("G0"), GateKind::And);
        gate.set_in(Id::new("B0"), 0).unwrap();
        let err = gate.set_in(Id::new("B1"), 0).unwrap_err();
        assert_eq!(err, MalformedBranchReason::InputSlotAlreadyDriven);
    }
}
