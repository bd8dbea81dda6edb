//! scad-graph - the signal graph, command/undo model, composite gates, and
//! persistence for the circuit editor.
//!
//! # Modules
//!
//! - [`graph`] - the live signal graph components are registered and wired in
//! - [`commands`] - reversible edits (`CreateCommand`, `DeleteCommand`, `CreateGateCommand`)
//! - [`composite`] - [`composite::CompositeGate`], a frozen sub-circuit exposed as one component
//! - [`undo`] - [`undo::EditorHistory`], linear undo/redo over a sequence of commands
//! - [`requirement`] - declarative requirement sets an [`action::Action`] must fulfil before running
//! - [`editor`] - [`editor::Editor`], one open document: graph + history + command log
//! - [`action`] - [`action::Action`], the editor's eight top-level verbs as per-invocation values
//! - [`registry`] - [`registry::EditorRegistry`], the set of open editors a host UI drives
//! - [`serialization`] - the on-disk command-log frame format

pub mod action;
pub mod commands;
pub mod composite;
pub mod editor;
pub mod graph;
pub mod registry;
pub mod requirement;
pub mod serialization;
pub mod undo;

pub use action::{Action, ActionOutcome, OpenMode};
pub use commands::{Command, CreateCommand, CreateGateCommand, CreateRequest, DeleteCommand, InternalWire};
pub use composite::CompositeGate;
pub use editor::{Editor, FileInfo, NullStatusSink, StatusSink};
pub use graph::CircuitGraph;
pub use registry::EditorRegistry;
pub use requirement::{RequirementKind, RequirementSet, RequirementValue};
pub use undo::EditorHistory;
