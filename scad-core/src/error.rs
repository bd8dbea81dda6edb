//! Domain error taxonomy for the signal graph and editor.
//!
//! Persistence has its own error enum (`scad_graph::serialization::PersistenceError`);
//! this one only covers the graph/editor-level failures of the table in the spec's
//! error-handling section, so a caller matching on a variant never has to account
//! for an I/O cause that can't occur at this boundary.

use std::fmt;

use thiserror::Error;

use crate::id::Id;

/// Errors raised by the signal graph and the editor that owns it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScadError {
    /// ID lookup on a removed/never-existing component.
    #[error("no component with id {0}")]
    MissingComponent(Id),

    /// Attempt to register a second component with the same id.
    #[error("component id {0} is already registered")]
    DuplicateId(Id),

    /// Cycle-forming, double-driven, or out-of-range branch connection.
    #[error("malformed branch: {reason}")]
    MalformedBranch { reason: MalformedBranchReason },

    /// An action ran without every requirement slot filled.
    #[error("action requirement not fulfilled: {0}")]
    RequirementUnfulfilled(String),
}

/// Why a branch construction was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedBranchReason {
    /// The connection would close a cycle among gates/composites.
    WouldCreateCycle,
    /// The target input slot already has an incoming branch.
    InputSlotAlreadyDriven,
    /// The referenced slot index does not exist on the component.
    SlotOutOfRange,
}

impl fmt::Display for MalformedBranchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MalformedBranchReason::WouldCreateCycle => "would create a cycle",
            MalformedBranchReason::InputSlotAlreadyDriven => "input slot already driven",
            MalformedBranchReason::SlotOutOfRange => "slot index out of range",
        })
    }
}

/// Convenience alias for results from the graph/editor layer.
pub type ScadResult<T> = Result<T, ScadError>;

impl ScadError {
    pub fn missing_component(id: Id) -> Self {
        Self::MissingComponent(id)
    }

    pub fn duplicate_id(id: Id) -> Self {
        Self::DuplicateId(id)
    }

    pub fn malformed_branch(reason: MalformedBranchReason) -> Self {
        Self::MalformedBranch { reason }
    }

    pub fn requirement_unfulfilled(detail: impl Into<String>) -> Self {
        Self::RequirementUnfulfilled(detail.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_component_displays_id() {
        let err = ScadError::missing_component(Id::new("I0"));
        assert!(err.to_string().contains("I0"));
    }

    #[test]
    fn malformed_branch_displays_reason() {
        let err = ScadError::malformed_branch(MalformedBranchReason::WouldCreateCycle);
        assert!(err.to_string().contains("cycle"));
    }

    #[test]
    fn duplicate_id_is_distinguishable_from_missing() {
        let id = Id::new("G0");
        assert_ne!(ScadError::duplicate_id(id.clone()), ScadError::missing_component(id));
    }
}
