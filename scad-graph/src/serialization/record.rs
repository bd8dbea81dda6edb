//! The persisted, self-describing form of a top-level command.

use scad_core::Id;
use serde::{Deserialize, Serialize};

use crate::commands::{CreateRequest, InternalWire};

/// One command as it appears inside a saved frame's command list.
///
/// Each variant carries everything a fresh [`Editor`](crate::editor::Editor)
/// needs to rebuild the original [`Command`](crate::commands::Command) and
/// execute it, which is what makes a saved file "self-describing enough to
/// be deserialised" per the persistence contract.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PersistedCommand {
    Create(CreateRequest),
    Delete(Id),
    CreateGate { sub_commands: Vec<CreateRequest>, internal_wires: Vec<InternalWire>, description: String },
}
