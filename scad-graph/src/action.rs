//! [`Action`]: a per-invocation value object bound to an [`Editor`] once its
//! requirements are fulfilled.
//!
//! Earlier revisions of this editor kept one global singleton per verb
//! (`CREATE`, `DELETE`, ...), which meant every requirement slot had to be
//! reset by hand before reuse and two callers invoking the same verb
//! concurrently would stomp on each other's in-progress requirements. An
//! `Action` is built fresh per invocation instead: construct it, fulfil its
//! requirements, then consume it with [`Action::run`].

use std::path::PathBuf;

use scad_core::{Id, ScadResult};

use crate::commands::CreateRequest;
use crate::editor::{Editor, StatusSink};
use crate::requirement::{filename, non_empty, numeric, RequirementKind, RequirementSet, RequirementValue};

/// Which sub-mode OPEN runs in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenMode {
    /// Replace the editor's live content by replaying the saved commands.
    Circuit,
    /// Register the saved commands as a reusable composite-gate template,
    /// leaving the editor's live content untouched.
    Component,
}

impl OpenMode {
    fn parse(raw: &str) -> Self {
        if raw == "component" {
            OpenMode::Component
        } else {
            OpenMode::Circuit
        }
    }
}

/// One of the editor's eight top-level verbs, carrying the requirements it
/// needs fulfilled before [`Action::run`] can execute it.
#[derive(Debug)]
pub enum Action {
    Create(RequirementSet),
    Delete(RequirementSet),
    Save(RequirementSet),
    Open(RequirementSet),
    Clear,
    Undo,
    Redo,
    Help,
}

/// What CREATE built, so a caller can report it or wire it into something
/// else (e.g. an OPEN-as-component reusing a freshly defined gate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedComponent {
    pub id: Id,
}

impl Action {
    /// A fresh CREATE action. `templates` names the composite templates
    /// currently registered on the target editor, for CREATE's "kind"
    /// requirement options. When "kind" is fulfilled as `"branch"`, the
    /// `source`/`source_slot`/`sink`/`sink_slot` slots must also be
    /// fulfilled before [`Action::ready`] returns true; for any other kind
    /// they're left unset and ignored.
    pub fn create(templates: &[&str]) -> Self {
        let mut reqs = RequirementSet::new();
        let mut options = vec![
            "input_pin".to_string(),
            "output_pin".to_string(),
            "and".to_string(),
            "or".to_string(),
            "not".to_string(),
            "branch".to_string(),
        ];
        options.extend(templates.iter().map(|t| t.to_string()));
        reqs.declare("kind", RequirementKind::Enumerated { options });
        reqs.declare("source", RequirementKind::FreeString { predicate: non_empty });
        reqs.declare("source_slot", RequirementKind::FreeString { predicate: numeric });
        reqs.declare("sink", RequirementKind::FreeString { predicate: non_empty });
        reqs.declare("sink_slot", RequirementKind::FreeString { predicate: numeric });
        Action::Create(reqs)
    }

    pub fn delete() -> Self {
        let mut reqs = RequirementSet::new();
        reqs.declare("target", RequirementKind::Object);
        Action::Delete(reqs)
    }

    pub fn save() -> Self {
        let mut reqs = RequirementSet::new();
        reqs.declare("filename", RequirementKind::FreeString { predicate: filename });
        Action::Save(reqs)
    }

    /// A fresh OPEN action. `available` should be refreshed (via
    /// [`RequirementSet::adjust_requirements`]) immediately before
    /// presenting the dialog, since it enumerates the `.scad` files
    /// currently on disk.
    pub fn open(available: Vec<String>) -> Self {
        let mut reqs = RequirementSet::new();
        reqs.declare("filename", RequirementKind::Enumerated { options: available });
        reqs.declare("mode", RequirementKind::Enumerated { options: vec!["circuit".into(), "component".into()] });
        Action::Open(reqs)
    }

    pub fn clear() -> Self {
        Action::Clear
    }

    pub fn undo() -> Self {
        Action::Undo
    }

    pub fn redo() -> Self {
        Action::Redo
    }

    pub fn help() -> Self {
        Action::Help
    }

    /// True once every requirement this action declared has been fulfilled.
    /// `Clear`/`Undo`/`Redo`/`Help` declare none, so they are always ready.
    /// CREATE is special-cased: the branch endpoint slots only gate
    /// readiness when `"kind"` was fulfilled as `"branch"`.
    pub fn ready(&self) -> bool {
        match self {
            Action::Create(r) => create_ready(r),
            Action::Delete(r) | Action::Save(r) | Action::Open(r) => r.fulfilled(),
            Action::Clear | Action::Undo | Action::Redo | Action::Help => true,
        }
    }

    /// Run the action against `editor`, reporting status via `status` and
    /// writing to/reading from `directory` for SAVE/OPEN. Consumes `self`:
    /// an `Action` is single-shot.
    pub fn run(
        self,
        editor: &mut Editor,
        directory: &PathBuf,
        status: &mut impl StatusSink,
    ) -> ScadResult<ActionOutcome> {
        if !self.ready() {
            return Err(scad_core::ScadError::requirement_unfulfilled(self.label().to_string()));
        }
        match self {
            Action::Create(reqs) => {
                let kind = text_value(&reqs, "kind").unwrap_or_default();
                if kind == "branch" {
                    let source = Id::new(text_value(&reqs, "source").expect("fulfilled above"));
                    let source_slot = parse_slot(&reqs, "source_slot");
                    let sink = Id::new(text_value(&reqs, "sink").expect("fulfilled above"));
                    let sink_slot = parse_slot(&reqs, "sink_slot");
                    let id = editor.create(branch_request(source, source_slot, sink, sink_slot), status)?;
                    return Ok(ActionOutcome::Created(CreatedComponent { id }));
                }
                if let Some(request) = simple_create_request(&kind) {
                    let id = editor.create(request, status)?;
                    return Ok(ActionOutcome::Created(CreatedComponent { id }));
                }
                let id = editor.create_from_template(&kind, status)?;
                Ok(ActionOutcome::Created(CreatedComponent { id }))
            }
            Action::Delete(reqs) => {
                let Some(RequirementValue::Text(raw)) = reqs.value("target") else {
                    return Err(scad_core::ScadError::requirement_unfulfilled("target".into()));
                };
                editor.delete(Id::new(raw.clone()), status)?;
                Ok(ActionOutcome::None)
            }
            Action::Save(reqs) => {
                let filename = text_value(&reqs, "filename").expect("fulfilled above");
                editor
                    .save(directory, &filename, status)
                    .map_err(|e| scad_core::ScadError::requirement_unfulfilled(e.to_string()))?;
                Ok(ActionOutcome::None)
            }
            Action::Open(reqs) => {
                let filename = text_value(&reqs, "filename").expect("fulfilled above");
                let mode = OpenMode::parse(&text_value(&reqs, "mode").expect("fulfilled above"));
                match mode {
                    OpenMode::Component => editor.open_as_template(directory, &filename, status)?,
                    OpenMode::Circuit => editor.open_circuit(directory, &filename, status)?,
                }
                Ok(ActionOutcome::None)
            }
            Action::Clear => {
                editor.clear(status);
                Ok(ActionOutcome::None)
            }
            Action::Undo => {
                editor.undo(status);
                Ok(ActionOutcome::None)
            }
            Action::Redo => {
                editor.redo(status)?;
                Ok(ActionOutcome::None)
            }
            Action::Help => {
                status.status("CREATE, DELETE, SAVE, OPEN, CLEAR, UNDO, REDO, HELP");
                Ok(ActionOutcome::None)
            }
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Action::Create(_) => "CREATE",
            Action::Delete(_) => "DELETE",
            Action::Save(_) => "SAVE",
            Action::Open(_) => "OPEN",
            Action::Clear => "CLEAR",
            Action::Undo => "UNDO",
            Action::Redo => "REDO",
            Action::Help => "HELP",
        }
    }
}

/// What an [`Action::run`] produced, for a caller that wants to chain a
/// follow-up (e.g. immediately wiring a newly created gate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Created(CreatedComponent),
    None,
}

fn text_value(reqs: &RequirementSet, key: &str) -> Option<String> {
    match reqs.value(key) {
        Some(RequirementValue::Text(s)) => Some(s.clone()),
        _ => None,
    }
}

/// `reqs.value(key)` parsed as a slot index; only called once the `numeric`
/// predicate has already validated the text at fulfil-time.
fn parse_slot(reqs: &RequirementSet, key: &str) -> usize {
    text_value(reqs, key).expect("fulfilled above").parse().expect("numeric predicate checked at fulfil time")
}

fn create_ready(reqs: &RequirementSet) -> bool {
    match reqs.value("kind") {
        Some(RequirementValue::Text(kind)) if kind == "branch" => {
            ["source", "source_slot", "sink", "sink_slot"]
                .iter()
                .all(|key| !matches!(reqs.value(key), None | Some(RequirementValue::Unset)))
        }
        Some(RequirementValue::Text(_)) => true,
        _ => false,
    }
}

/// Build a CREATE action whose "kind" choice is a fixed primitive rather
/// than a composite template, for callers that don't need to enumerate
/// templates first.
pub fn simple_create_request(kind: &str) -> Option<CreateRequest> {
    Some(match kind {
        "input_pin" => CreateRequest::InputPin,
        "output_pin" => CreateRequest::OutputPin,
        "and" => CreateRequest::PrimitiveGate(scad_components::GateKind::And),
        "or" => CreateRequest::PrimitiveGate(scad_components::GateKind::Or),
        "not" => CreateRequest::PrimitiveGate(scad_components::GateKind::Not),
        _ => return None,
    })
}

/// Build a branch CREATE request directly, bypassing the "kind" enumeration
/// (a branch's endpoints aren't a fixed option list).
pub fn branch_request(source: Id, source_slot: usize, sink: Id, sink_slot: usize) -> CreateRequest {
    CreateRequest::Branch { source, source_slot, sink, sink_slot }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::NullStatusSink;

    #[test]
    fn create_action_is_not_ready_until_kind_fulfilled() {
        let action = Action::create(&[]);
        assert!(!action.ready());
    }

    #[test]
    fn create_action_builds_an_input_pin() {
        let mut action = Action::create(&[]);
        let Action::Create(reqs) = &mut action else { unreachable!() };
        assert!(reqs.fulfil("kind", RequirementValue::Text("input_pin".into())));
        assert!(action.ready());

        let mut editor = Editor::new();
        let mut sink = NullStatusSink;
        let dir = std::env::temp_dir();
        let outcome = action.run(&mut editor, &dir, &mut sink).unwrap();
        assert!(matches!(outcome, ActionOutcome::Created(_)));
        assert_eq!(editor.graph().len(), 1);
    }

    #[test]
    fn create_action_branch_kind_requires_endpoint_slots() {
        let mut action = Action::create(&[]);
        let Action::Create(reqs) = &mut action else { unreachable!() };
        assert!(reqs.fulfil("kind", RequirementValue::Text("branch".into())));
        assert!(!action.ready(), "branch kind alone isn't enough, endpoints are still unset");
    }

    #[test]
    fn create_action_builds_a_branch_between_two_components() {
        let mut editor = Editor::new();
        let mut sink = NullStatusSink;
        let dir = std::env::temp_dir();

        let mut make_pin = Action::create(&[]);
        let Action::Create(reqs) = &mut make_pin else { unreachable!() };
        reqs.fulfil("kind", RequirementValue::Text("input_pin".into()));
        let source = match make_pin.run(&mut editor, &dir, &mut sink).unwrap() {
            ActionOutcome::Created(c) => c.id,
            _ => unreachable!(),
        };

        let mut make_out = Action::create(&[]);
        let Action::Create(reqs) = &mut make_out else { unreachable!() };
        reqs.fulfil("kind", RequirementValue::Text("output_pin".into()));
        let sink_id = match make_out.run(&mut editor, &dir, &mut sink).unwrap() {
            ActionOutcome::Created(c) => c.id,
            _ => unreachable!(),
        };

        let mut branch = Action::create(&[]);
        let Action::Create(reqs) = &mut branch else { unreachable!() };
        assert!(reqs.fulfil("kind", RequirementValue::Text("branch".into())));
        assert!(reqs.fulfil("source", RequirementValue::Text(source.to_string())));
        assert!(reqs.fulfil("source_slot", RequirementValue::Text("0".into())));
        assert!(reqs.fulfil("sink", RequirementValue::Text(sink_id.to_string())));
        assert!(reqs.fulfil("sink_slot", RequirementValue::Text("0".into())));
        assert!(branch.ready());

        let outcome = branch.run(&mut editor, &dir, &mut sink).unwrap();
        assert!(matches!(outcome, ActionOutcome::Created(_)));
        assert_eq!(editor.graph().len(), 3, "source pin, sink pin, and the new branch");
    }

    #[test]
    fn help_action_has_no_requirements_and_always_ready() {
        assert!(Action::help().ready());
    }

    #[test]
    fn clear_action_resets_editor() {
        let mut editor = Editor::new();
        let mut sink = NullStatusSink;
        let dir = std::env::temp_dir();
        Action::create(&[])
            .run(&mut editor, &dir, &mut sink)
            .unwrap_err(); // kind unfulfilled; nothing created yet.
        Action::clear().run(&mut editor, &dir, &mut sink).unwrap();
        assert!(editor.graph().is_empty());
    }
}
