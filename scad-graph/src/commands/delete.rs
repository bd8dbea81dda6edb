//! DeleteCommand - remove a component, recording enough to restore it.

use scad_core::{BranchEndpoints, Component, Id, ScadError, ScadResult};

use super::Command;
use crate::graph::CircuitGraph;

/// State captured on `execute` so `unexecute` can put the component, and
/// every branch that touched it, back exactly as they were.
#[derive(Debug)]
struct Restore {
    component: Box<dyn Component>,
    incoming: Vec<(Id, BranchEndpoints)>,
    outgoing: Vec<(Id, BranchEndpoints)>,
}

/// Command to remove a component by id.
///
/// `execute` resolves the target, snapshots its incoming and outgoing branch
/// endpoints generically (via [`Component::endpoints`] on whatever branch
/// ids `incoming`/`outgoing` name — no downcasting to `Branch` required),
/// then removes it. `unexecute` reinserts the component and re-creates the
/// recorded branches under their original ids.
#[derive(Debug)]
pub struct DeleteCommand {
    target: Id,
    restore: Option<Restore>,
}

impl DeleteCommand {
    pub fn new(target: Id) -> Self {
        Self { target, restore: None }
    }

    pub fn target(&self) -> &Id {
        &self.target
    }
}

impl Command for DeleteCommand {
    fn name(&self) -> &str {
        "Delete"
    }

    fn execute(&mut self, graph: &mut CircuitGraph) -> ScadResult<()> {
        let node = graph.get(&self.target).ok_or_else(|| ScadError::missing_component(self.target.clone()))?;

        let mut incoming = Vec::new();
        for slot in 0..node.input_count() {
            if let Some(branch_id) = node.incoming(slot) {
                let endpoints = graph
                    .get(branch_id)
                    .and_then(|b| b.endpoints())
                    .expect("incoming id must name a Branch with endpoints");
                incoming.push((branch_id.clone(), endpoints));
            }
        }
        let mut outgoing = Vec::new();
        for slot in 0..node.output_count() {
            for branch_id in node.outgoing(slot) {
                let endpoints = graph
                    .get(branch_id)
                    .and_then(|b| b.endpoints())
                    .expect("outgoing id must name a Branch with endpoints");
                outgoing.push((branch_id.clone(), endpoints));
            }
        }

        let component = graph.destroy(&self.target)?;
        self.restore = Some(Restore { component, incoming, outgoing });
        Ok(())
    }

    fn unexecute(&mut self, graph: &mut CircuitGraph) {
        let Some(restore) = self.restore.take() else { return };
        let _ = graph.insert(restore.component);
        for (branch_id, endpoints) in restore.incoming.into_iter().chain(restore.outgoing) {
            let _ = graph.connect_as(
                branch_id,
                &endpoints.source,
                endpoints.source_slot,
                &endpoints.sink,
                endpoints.sink_slot,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::and_gate_fixture;
    use crate::commands::{CreateCommand, CreateRequest};
    use scad_core::Signal;

    fn wired_and_gate() -> (CircuitGraph, Id, Id, Id, Id) {
        let mut graph = CircuitGraph::new();
        let (i0, i1, g, o) = and_gate_fixture(&mut graph);
        CreateCommand::new(CreateRequest::Branch { source: i0.clone(), source_slot: 0, sink: g.clone(), sink_slot: 0 })
            .execute(&mut graph)
            .unwrap();
        CreateCommand::new(CreateRequest::Branch { source: i1.clone(), source_slot: 0, sink: g.clone(), sink_slot: 1 })
            .execute(&mut graph)
            .unwrap();
        CreateCommand::new(CreateRequest::Branch { source: g.clone(), source_slot: 0, sink: o.clone(), sink_slot: 0 })
            .execute(&mut graph)
            .unwrap();
        (graph, i0, i1, g, o)
    }

    #[test]
    fn delete_tears_down_and_restores_incident_branches() {
        let (mut graph, i0, i1, g, o) = wired_and_gate();
        graph.set_input_level(&i0, Signal::High).unwrap();
        graph.set_input_level(&i1, Signal::High).unwrap();
        assert_eq!(graph.active(&o, 0).unwrap(), Signal::High);

        let total_before = graph.len();
        let mut cmd = DeleteCommand::new(g.clone());
        cmd.execute(&mut graph).unwrap();
        assert!(!graph.contains(&g));
        assert!(graph.len() < total_before);

        cmd.unexecute(&mut graph);
        assert_eq!(graph.len(), total_before);
        assert!(graph.contains(&g));
        assert_eq!(graph.get(&i0).unwrap().outgoing(0).len(), 1);
        assert_eq!(graph.active(&o, 0).unwrap(), Signal::High, "restored branches must resume current level");
    }

    #[test]
    fn delete_missing_component_is_an_error() {
        let mut graph = CircuitGraph::new();
        let mut cmd = DeleteCommand::new(Id::new("G99"));
        assert!(cmd.execute(&mut graph).is_err());
    }
}
