//! Input and output pins: the sources and sinks of the signal graph.

use std::any::Any;

use scad_core::{Component, ComponentKind, Id, MalformedBranchReason, Signal};

/// A source component: holds a level settable externally (through
/// [`InputPin::set_level`]), feeds zero or more outgoing branches.
///
/// Settable only while `changeable`; a frozen composite gate's input pins are
/// still driven (by the composite's own `wake_up` delegation, see
/// `scad-graph`'s `CompositeGate`), just not by an outside caller directly.
pub struct InputPin {
    id: Id,
    changeable: bool,
    level: Signal,
    outgoing: Vec<Id>,
}

impl InputPin {
    pub fn new(id: Id) -> Self {
        Self { id, changeable: true, level: Signal::Low, outgoing: Vec::new() }
    }

    /// Set this pin's level directly. Returns `true` if the level changed.
    ///
    /// Callers are expected to check `changeable()` first; this method does
    /// not enforce it so a composite gate can still drive its own frozen
    /// inner input pins through the same call.
    pub fn set_level(&mut self, signal: Signal) -> bool {
        if self.level == signal {
            false
        } else {
            self.level = signal;
            true
        }
    }

    pub fn level(&self) -> Signal {
        self.level
    }
}

impl Component for InputPin {
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
        ComponentKind::InputPin
    }
    fn changeable(&self) -> bool {
        self.changeable
    }
    fn set_changeable(&mut self, changeable: bool) {
        self.changeable = changeable;
    }
    fn input_count(&self) -> usize {
        0
    }
    fn output_count(&self) -> usize {
        1
    }
    fn active(&self, slot: usize) -> Option<Signal> {
        (slot == 0).then_some(self.level)
    }
    fn incoming(&self, _slot: usize) -> Option<&Id> {
        None
    }
    fn outgoing(&self, slot: usize) -> &[Id] {
        if slot == 0 {
            &self.outgoing
        } else {
            &[]
        }
    }
    fn set_in(&mut self, _branch: Id, _slot: usize) -> Result<(), MalformedBranchReason> {
        Err(MalformedBranchReason::SlotOutOfRange)
    }
    fn clear_in(&mut self, _slot: usize) {}
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
    fn wake_up(&mut self, _new_signal: Signal, _slot_index: usize, propagate_changeable: bool) -> Vec<usize> {
        if propagate_changeable {
            self.changeable = false;
        }
        Vec::new()
    }
    fn destroy(&mut self) {
        self.outgoing.clear();
    }
}

/// A sink component: exactly one incoming branch, zero or more outgoing
/// branches (used when this pin is a composite gate's exposed output and is
/// itself wired into an outer circuit).
pub struct OutputPin {
    id: Id,
    changeable: bool,
    level: Signal,
    incoming: Option<Id>,
    outgoing: Vec<Id>,
}

impl OutputPin {
    pub fn new(id: Id) -> Self {
        Self { id, changeable: true, level: Signal::Low, incoming: None, outgoing: Vec::new() }
    }

    pub fn level(&self) -> Signal {
        self.level
    }
}

impl Component for OutputPin {
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
        ComponentKind::OutputPin
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
    fn incoming(&self, slot: usize) -> Option<&Id> {
        if slot == 0 {
            self.incoming.as_ref()
        } else {
            None
        }
    }
    fn outgoing(&self, slot: usize) -> &[Id] {
        if slot == 0 {
            &self.outgoing
        } else {
            &[]
        }
    }
    fn set_in(&mut self, branch: Id, slot: usize) -> Result<(), MalformedBranchReason> {
        if slot != 0 {
            return Err(MalformedBranchReason::SlotOutOfRange);
        }
        if self.incoming.is_some() {
            return Err(MalformedBranchReason::InputSlotAlreadyDriven);
        }
        self.incoming = Some(branch);
        Ok(())
    }
    fn clear_in(&mut self, slot: usize) {
        if slot == 0 {
            self.incoming = None;
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
    fn destroy(&mut self) {
        self.incoming = None;
        self.outgoing.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_pin_set_level_reports_change() {
        let mut pin = InputPin::new(Id::new("I0"));
        assert!(!pin.set_level(Signal::Low));
        assert!(pin.set_level(Signal::High));
        assert!(!pin.set_level(Signal::High));
    }

    #[test]
    fn input_pin_rejects_incoming_branches() {
        let mut pin = InputPin::new(Id::new("I0"));
        assert!(pin.set_in(Id::new("B0"), 0).is_err());
    }

    #[test]
    fn output_pin_rejects_second_incoming_branch() {
        let mut pin = OutputPin::new(Id::new("O0"));
        pin.set_in(Id::new("B0"), 0).unwrap();
        let err = pin.set_in(Id::new("B1"), 0).unwrap_err();
        assert_eq!(err, MalformedBranchReason::InputSlotAlreadyDriven);
    }

    #[test]
    fn output_pin_wake_up_is_changed_only() {
        let mut pin = OutputPin::new(Id::new("O0"));
        assert_eq!(pin.wake_up(Signal::Low, 0, false), Vec::<usize>::new());
        assert_eq!(pin.wake_up(Signal::High, 0, false), vec![0]);
        assert_eq!(pin.wake_up(Signal::High, 0, false), Vec::<usize>::new());
    }
}
