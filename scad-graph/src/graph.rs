//! The signal graph: components linked by branches, propagating a
//! two-valued signal on change.

use std::collections::{HashMap, HashSet, VecDeque};

use scad_core::{Component, ComponentKind, Id, IdGenerator, MalformedBranchReason, ScadError, ScadResult, Signal};
use scad_components::{Branch, InputPin};

/// The live set of components for one editor, plus the machinery to wire
/// and unwire them with the pre-check cycle/arity policing the data model
/// requires.
///
/// Doubles as the item manager a caller resolves ids against: a dangling
/// lookup raises `MissingComponent`, a colliding insert raises `DuplicateId`.
pub struct CircuitGraph {
    nodes: HashMap<Id, Box<dyn Component>>,
    generator: IdGenerator,
}

impl CircuitGraph {
    pub fn new() -> Self {
        Self { nodes: HashMap::new(), generator: IdGenerator::new() }
    }

    /// Mint a fresh id for a new component of `kind`.
    pub fn mint_id(&mut self, kind: ComponentKind) -> Id {
        self.generator.next(kind)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: &Id) -> Option<&dyn Component> {
        self.nodes.get(id).map(|b| b.as_ref())
    }

    pub fn get_mut(&mut self, id: &Id) -> Option<&mut dyn Component> {
        self.nodes.get_mut(id).map(|b| b.as_mut())
    }

    pub fn ids(&self) -> impl Iterator<Item = &Id> {
        self.nodes.keys()
    }

    /// Register a fresh component. Fails with `DuplicateId` if its id is
    /// already live.
    pub fn insert(&mut self, component: Box<dyn Component>) -> ScadResult<()> {
        let id = component.id().clone();
        if self.nodes.contains_key(&id) {
            return Err(ScadError::duplicate_id(id));
        }
        self.nodes.insert(id, component);
        Ok(())
    }

    /// Remove a component without touching its neighbours' bookkeeping.
    /// Used when the caller has already detached every incident branch
    /// itself; prefer [`Self::destroy`] for the general case.
    pub fn take(&mut self, id: &Id) -> ScadResult<Box<dyn Component>> {
        self.nodes.remove(id).ok_or_else(|| ScadError::missing_component(id.clone()))
    }

    /// Set an [`InputPin`]'s level from outside the graph and propagate the
    /// change. A no-op, without mutation, if the pin is not `changeable`
    /// (i.e. frozen inside a composite gate).
    pub fn set_input_level(&mut self, id: &Id, signal: Signal) -> ScadResult<()> {
        let changeable = self
            .get(id)
            .ok_or_else(|| ScadError::missing_component(id.clone()))?
            .changeable();
        if !changeable {
            return Ok(());
        }
        self.force_input_level(id, signal)
    }

    /// Set an [`InputPin`]'s level regardless of its `changeable` flag.
    /// Used by a [`CompositeGate`](crate::composite::CompositeGate) to drive
    /// its own frozen inner input pins on `wake_up` delegation; everyone
    /// else should go through [`Self::set_input_level`].
    pub fn force_input_level(&mut self, id: &Id, signal: Signal) -> ScadResult<()> {
        let node = self.nodes.get_mut(id).ok_or_else(|| ScadError::missing_component(id.clone()))?;
        let pin = node
            .as_any_mut()
            .downcast_mut::<InputPin>()
            .expect("force_input_level called on a non-InputPin component");
        if !pin.set_level(signal) {
            return Ok(());
        }
        let seed: Vec<(Id, usize, Signal)> =
            pin.outgoing(0).iter().map(|b| (b.clone(), 0, signal)).collect();
        self.propagate(seed, false);
        Ok(())
    }

    /// Read a component's currently emitted signal on one of its output
    /// slots.
    pub fn active(&self, id: &Id, slot: usize) -> ScadResult<Signal> {
        self.get(id)
            .and_then(|c| c.active(slot))
            .ok_or_else(|| ScadError::missing_component(id.clone()))
    }

    /// Wire `source`'s output `source_slot` to `sink`'s input `sink_slot`
    /// with a fresh [`Branch`], performing every arity/cycle check *before*
    /// mutating anything. On success, immediately propagates the source's
    /// current level through the new branch and returns the branch's id.
    pub fn connect(
        &mut self,
        source: &Id,
        source_slot: usize,
        sink: &Id,
        sink_slot: usize,
    ) -> ScadResult<Id> {
        let branch_id = self.mint_id(ComponentKind::Branch);
        self.connect_as(branch_id.clone(), source, source_slot, sink, sink_slot)?;
        Ok(branch_id)
    }

    /// Like [`Self::connect`], but wires the branch under a caller-supplied
    /// id instead of minting a fresh one. Used by [`DeleteCommand`]'s undo
    /// and [`CreateCommand`]'s redo to restore a branch under the exact id
    /// it originally had, so a sequence of undo/redo leaves ids untouched.
    pub fn connect_as(
        &mut self,
        branch_id: Id,
        source: &Id,
        source_slot: usize,
        sink: &Id,
        sink_slot: usize,
    ) -> ScadResult<()> {
        let source_node = self.get(source).ok_or_else(|| ScadError::missing_component(source.clone()))?;
        if source_slot >= source_node.output_count() {
            return Err(ScadError::malformed_branch(MalformedBranchReason::SlotOutOfRange));
        }
        let sink_node = self.get(sink).ok_or_else(|| ScadError::missing_component(sink.clone()))?;
        if sink_slot >= sink_node.input_count() {
            return Err(ScadError::malformed_branch(MalformedBranchReason::SlotOutOfRange));
        }
        if sink_node.incoming(sink_slot).is_some() {
            return Err(ScadError::malformed_branch(MalformedBranchReason::InputSlotAlreadyDriven));
        }
        if self.reachable_from(sink).contains(source) {
            return Err(ScadError::malformed_branch(MalformedBranchReason::WouldCreateCycle));
        }

        let initial = source_node.active(source_slot).expect("slot already range-checked");
        let branch = Branch::new(branch_id.clone(), source.clone(), source_slot, sink.clone(), sink_slot);

        self.nodes
            .get_mut(source)
            .expect("source already range-checked")
            .connect_out(branch_id.clone(), source_slot)
            .expect("source slot already range-checked");
        self.nodes
            .get_mut(sink)
            .expect("sink already range-checked")
            .set_in(branch_id.clone(), sink_slot)
            .expect("sink slot already range-checked and vacant");
        self.nodes.insert(branch_id.clone(), Box::new(branch));

        self.propagate(vec![(branch_id, 0, initial)], false);
        Ok(())
    }

    /// Tear down an existing branch, detaching it from both endpoints.
    pub fn disconnect(&mut self, branch_id: &Id) -> ScadResult<()> {
        let branch = self.nodes.get(branch_id).ok_or_else(|| ScadError::missing_component(branch_id.clone()))?;
        let endpoints = branch.endpoints().expect("disconnect called on a non-Branch component");
        if let Some(source) = self.nodes.get_mut(&endpoints.source) {
            source.disconnect_out(branch_id.clone(), endpoints.source_slot);
        }
        if let Some(sink) = self.nodes.get_mut(&endpoints.sink) {
            sink.clear_in(endpoints.sink_slot);
        }
        self.nodes.remove(branch_id);
        Ok(())
    }

    /// Remove a component and every branch touching it. Must not be called
    /// on a non-`changeable` component.
    pub fn destroy(&mut self, id: &Id) -> ScadResult<Box<dyn Component>> {
        let node = self.nodes.get(id).ok_or_else(|| ScadError::missing_component(id.clone()))?;
        debug_assert!(node.changeable(), "destroy() must not be invoked on a non-changeable component");

        let mut touched_branches = Vec::new();
        for slot in 0..node.input_count() {
            if let Some(b) = node.incoming(slot) {
                touched_branches.push(b.clone());
            }
        }
        for slot in 0..node.output_count() {
            touched_branches.extend(node.outgoing(slot).iter().cloned());
        }
        for branch_id in touched_branches {
            let _ = self.disconnect(&branch_id);
        }

        let mut removed = self.nodes.remove(id).expect("looked up above");
        removed.destroy();
        Ok(removed)
    }

    /// Every component reachable by following branches forward from `start`,
    /// `start` included.
    pub fn reachable_from(&self, start: &Id) -> HashSet<Id> {
        let mut seen = HashSet::new();
        let mut stack = vec![start.clone()];
        while let Some(id) = stack.pop() {
            if seen.insert(id.clone()) {
                stack.extend(self.forward_neighbors(&id));
            }
        }
        seen
    }

    /// Freeze every component this graph owns. Used when a composite gate
    /// swallows its inner circuit: the private graph's entire membership
    /// becomes non-changeable at once, so no traversal-coverage argument is
    /// needed - everything inside is encapsulated.
    pub fn freeze_all(&mut self) {
        for node in self.nodes.values_mut() {
            node.set_changeable(false);
        }
    }

    fn forward_neighbors(&self, id: &Id) -> Vec<Id> {
        let Some(node) = self.nodes.get(id) else { return Vec::new() };
        if let Some(ep) = node.endpoints() {
            vec![ep.sink]
        } else {
            (0..node.output_count()).flat_map(|slot| node.outgoing(slot).to_vec()).collect()
        }
    }

    /// Event-driven, changed-only propagation from a worklist of
    /// `(component, input slot, new signal)` seeds.
    fn propagate(&mut self, seed: Vec<(Id, usize, Signal)>, propagate_changeable: bool) {
        let mut queue: VecDeque<(Id, usize, Signal)> = seed.into();
        while let Some((id, slot, signal)) = queue.pop_front() {
            for next in self.step(&id, slot, signal, propagate_changeable) {
                queue.push_back(next);
            }
        }
    }

    fn step(&mut self, id: &Id, slot: usize, signal: Signal, propagate_changeable: bool) -> Vec<(Id, usize, Signal)> {
        let Some(node) = self.nodes.get_mut(id) else { return Vec::new() };
        let changed = node.wake_up(signal, slot, propagate_changeable);
        if changed.is_empty() {
            return Vec::new();
        }
        let endpoints = node.endpoints();
        let mut next = Vec::new();
        for out_slot in changed {
            let emitted = node.active(out_slot).expect("wake_up reported a slot that doesn't exist");
            if let Some(ep) = &endpoints {
                next.push((ep.sink.clone(), ep.sink_slot, emitted));
            } else {
                next.extend(node.outgoing(out_slot).iter().map(|b| (b.clone(), 0, emitted)));
            }
        }
        next
    }
}

impl Default for CircuitGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scad_components::{GateKind, OutputPin, PrimitiveGate};

    fn and_gate_circuit() -> (CircuitGraph, Id, Id, Id, Id) {
        let mut graph = CircuitGraph::new();
        let i0 = graph.mint_id(ComponentKind::InputPin);
        let i1 = graph.mint_id(ComponentKind::InputPin);
        let g = graph.mint_id(ComponentKind::PrimitiveGate);
        let o = graph.mint_id(ComponentKind::OutputPin);
        graph.insert(Box::new(InputPin::new(i0.clone()))).unwrap();
        graph.insert(Box::new(InputPin::new(i1.clone()))).unwrap();
        graph.insert(Box::new(PrimitiveGate::new(g.clone(), GateKind::And))).unwrap();
        graph.insert(Box::new(OutputPin::new(o.clone()))).unwrap();
        graph.connect(&i0, 0, &g, 0).unwrap();
        graph.connect(&i1, 0, &g, 1).unwrap();
        graph.connect(&g, 0, &o, 0).unwrap();
        (graph, i0, i1, g, o)
    }

    #[test]
    fn and_gate_truth_table_s1() {
        let (mut graph, i0, i1, _g, o) = and_gate_circuit();

        let cases = [
            (Signal::Low, Signal::Low, Signal::Low),
            (Signal::Low, Signal::High, Signal::Low),
            (Signal::High, Signal::Low, Signal::Low),
            (Signal::High, Signal::High, Signal::High),
        ];
        for (a, b, expected) in cases {
            graph.set_input_level(&i0, a).unwrap();
            graph.set_input_level(&i1, b).unwrap();
            assert_eq!(graph.active(&o, 0).unwrap(), expected);
        }
    }

    #[test]
    fn not_gate_second_identical_set_is_idempotent_s2() {
        let mut graph = CircuitGraph::new();
        let i = graph.mint_id(ComponentKind::InputPin);
        let g = graph.mint_id(ComponentKind::PrimitiveGate);
        let o = graph.mint_id(ComponentKind::OutputPin);
        graph.insert(Box::new(InputPin::new(i.clone()))).unwrap();
        graph.insert(Box::new(PrimitiveGate::new(g.clone(), GateKind::Not))).unwrap();
        graph.insert(Box::new(OutputPin::new(o.clone()))).unwrap();
        graph.connect(&i, 0, &g, 0).unwrap();
        graph.connect(&g, 0, &o, 0).unwrap();

        graph.set_input_level(&i, Signal::High).unwrap();
        assert_eq!(graph.active(&o, 0).unwrap(), Signal::Low);

        graph.set_input_level(&i, Signal::High).unwrap();
        assert_eq!(graph.active(&o, 0).unwrap(), Signal::Low);
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut graph = CircuitGraph::new();
        let id = Id::new("I0");
        graph.insert(Box::new(InputPin::new(id.clone()))).unwrap();
        let err = graph.insert(Box::new(InputPin::new(id.clone()))).unwrap_err();
        assert_eq!(err, ScadError::duplicate_id(id));
    }

    #[test]
    fn connect_rejects_out_of_range_slot_without_mutating() {
        let mut graph = CircuitGraph::new();
        let i = graph.mint_id(ComponentKind::InputPin);
        let o = graph.mint_id(ComponentKind::OutputPin);
        graph.insert(Box::new(InputPin::new(i.clone()))).unwrap();
        graph.insert(Box::new(OutputPin::new(o.clone()))).unwrap();

        let err = graph.connect(&i, 5, &o, 0).unwrap_err();
        assert_eq!(err, ScadError::malformed_branch(MalformedBranchReason::SlotOutOfRange));
        assert_eq!(graph.len(), 2, "a failed connect must not add a branch node");
    }

    #[test]
    fn connect_rejects_double_driven_input_slot() {
        let mut graph = CircuitGraph::new();
        let i0 = graph.mint_id(ComponentKind::InputPin);
        let i1 = graph.mint_id(ComponentKind::InputPin);
        let o = graph.mint_id(ComponentKind::OutputPin);
        graph.insert(Box::new(InputPin::new(i0.clone()))).unwrap();
        graph.insert(Box::new(InputPin::new(i1.clone()))).unwrap();
        graph.insert(Box::new(OutputPin::new(o.clone()))).unwrap();
        graph.connect(&i0, 0, &o, 0).unwrap();

        let err = graph.connect(&i1, 0, &o, 0).unwrap_err();
        assert_eq!(
            err,
            ScadError::malformed_branch(MalformedBranchReason::InputSlotAlreadyDriven)
        );
    }

    #[test]
    fn connect_rejects_cycle_forming_branch_s6_invariant() {
        let mut graph = CircuitGraph::new();
        let g1 = graph.mint_id(ComponentKind::PrimitiveGate);
        let g2 = graph.mint_id(ComponentKind::PrimitiveGate);
        graph.insert(Box::new(PrimitiveGate::new(g1.clone(), GateKind::Not))).unwrap();
        graph.insert(Box::new(PrimitiveGate::new(g2.clone(), GateKind::Not))).unwrap();
        graph.connect(&g1, 0, &g2, 0).unwrap();

        let before = graph.len();
        let err = graph.connect(&g2, 0, &g1, 0).unwrap_err();
        assert_eq!(err, ScadError::malformed_branch(MalformedBranchReason::WouldCreateCycle));
        assert_eq!(graph.len(), before, "rejected cycle must leave the graph untouched");
    }

    #[test]
    fn destroy_tears_down_incident_branches() {
        let (mut graph, i0, i1, g, o) = and_gate_circuit();
        let total_before = graph.len();
        graph.destroy(&g).unwrap();
        assert!(!graph.contains(&g));
        assert_eq!(graph.get(&i0).unwrap().outgoing(0).len(), 0);
        assert_eq!(graph.get(&i1).unwrap().outgoing(0).len(), 0);
        assert!(graph.get(&o).unwrap().incoming(0).is_none());
        assert!(graph.len() < total_before);
    }
}
