//! Unique identifiers for circuit components
//!
//! Ids are opaque, unique strings rather than raw database keys, so a
//! persisted circuit can be re-loaded with the exact same ids its commands
//! recorded. Fresh ids are minted by [`IdGenerator`], one per component kind,
//! using a short prefix plus a monotonically increasing counter.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a component within one editor's live set.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Id(String);

impl Id {
    /// Wrap an explicit id, e.g. one read back from a persisted command.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the id as a plain string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Id {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&str> for Id {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

/// The kind of component an id was generated for; selects the id's prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    InputPin,
    OutputPin,
    PrimitiveGate,
    CompositeGate,
    Branch,
}

impl ComponentKind {
    fn prefix(self) -> &'static str {
        match self {
            ComponentKind::InputPin => "I",
            ComponentKind::OutputPin => "O",
            ComponentKind::PrimitiveGate => "G",
            ComponentKind::CompositeGate => "C",
            ComponentKind::Branch => "B",
        }
    }
}

/// Mints fresh, unique ids for newly created components.
///
/// One counter per [`ComponentKind`], so ids read `I0`, `I1`, `G0`, `B0`, ...
/// in the order each kind was first created. A generator is owned by one
/// [`crate::Editor`](../scad_graph/struct.Editor.html)-equivalent scope; it
/// never needs to be consulted when an explicit id is supplied (e.g. while
/// replaying persisted commands), only when minting a brand-new one.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct IdGenerator {
    counters: std::collections::BTreeMap<&'static str, u64>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint the next id for the given kind.
    pub fn next(&mut self, kind: ComponentKind) -> Id {
        let prefix = kind.prefix();
        let counter = self.counters.entry(prefix).or_insert(0);
        let id = Id(format!("{prefix}{counter}"));
        *counter += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_produces_prefixed_sequential_ids() {
        let mut gen = IdGenerator::new();
        assert_eq!(gen.next(ComponentKind::InputPin).as_str(), "I0");
        assert_eq!(gen.next(ComponentKind::InputPin).as_str(), "I1");
        assert_eq!(gen.next(ComponentKind::PrimitiveGate).as_str(), "G0");
    }

    #[test]
    fn generator_counters_are_independent_per_kind() {
        let mut gen = IdGenerator::new();
        gen.next(ComponentKind::InputPin);
        gen.next(ComponentKind::InputPin);
        assert_eq!(gen.next(ComponentKind::OutputPin).as_str(), "O0");
    }

    #[test]
    fn explicit_id_bypasses_generator() {
        let id = Id::new("I7");
        assert_eq!(id.as_str(), "I7");
    }

    #[test]
    fn id_display_matches_as_str() {
        let id = Id::new("B3");
        assert_eq!(format!("{id}"), "B3");
    }

    #[test]
    fn id_serialize_roundtrip() {
        let id = Id::new("G2");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"G2\"");
        let restored: Id = serde_json::from_str(&json).unwrap();
        assert_eq!(id, restored);
    }
}
