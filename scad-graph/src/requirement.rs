//! Declarative requirement sets for [`Action`](crate::action::Action)s.

use std::collections::BTreeMap;

/// A single requirement value's kind, and what would fulfil it.
#[derive(Clone, Debug, PartialEq)]
pub enum RequirementKind {
    /// A free string accepted by `predicate`.
    FreeString { predicate: fn(&str) -> bool },
    /// One of a fixed, possibly dynamically recomputed, list of options.
    Enumerated { options: Vec<String> },
    /// Any non-null value the caller supplies as-is (e.g. a built [`crate::commands::Command`]).
    Object,
}

/// A requirement value, fulfilled or not.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum RequirementValue {
    #[default]
    Unset,
    Text(String),
    Flag(bool),
}

struct Slot {
    kind: RequirementKind,
    value: RequirementValue,
}

impl std::fmt::Debug for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slot").field("kind", &self.kind).field("value", &self.value).finish()
    }
}

/// A mapping from a string key to a typed, possibly-unfilled slot.
///
/// `fulfilled()` is true iff every slot carries a value; `clear()` resets
/// every slot back to `Unset` without dropping the declared keys/kinds, so
/// the same `RequirementSet` can be reused across an action's next
/// invocation.
#[derive(Default)]
pub struct RequirementSet {
    slots: BTreeMap<String, Slot>,
}

impl std::fmt::Debug for RequirementSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequirementSet").field("slots", &self.slots.keys().collect::<Vec<_>>()).finish()
    }
}

impl RequirementSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a requirement key with no value assigned yet.
    pub fn declare(&mut self, key: impl Into<String>, kind: RequirementKind) {
        self.slots.insert(key.into(), Slot { kind, value: RequirementValue::Unset });
    }

    /// Assign a value, validating it against the slot's kind. Returns `false`
    /// (without mutating) if the key is undeclared or the value is rejected.
    pub fn fulfil(&mut self, key: &str, value: RequirementValue) -> bool {
        let Some(slot) = self.slots.get_mut(key) else { return false };
        let accepted = match (&slot.kind, &value) {
            (RequirementKind::FreeString { predicate }, RequirementValue::Text(text)) => predicate(text),
            (RequirementKind::Enumerated { options }, RequirementValue::Text(text)) => options.contains(text),
            (RequirementKind::Object, _) => !matches!(value, RequirementValue::Unset),
            _ => false,
        };
        if accepted {
            slot.value = value;
        }
        accepted
    }

    pub fn value(&self, key: &str) -> Option<&RequirementValue> {
        self.slots.get(key).map(|s| &s.value)
    }

    /// True iff every declared slot has been assigned.
    pub fn fulfilled(&self) -> bool {
        self.slots.values().all(|s| !matches!(s.value, RequirementValue::Unset))
    }

    /// Reset every slot to `Unset`, keeping declared keys/kinds.
    pub fn clear(&mut self) {
        for slot in self.slots.values_mut() {
            slot.value = RequirementValue::Unset;
        }
    }

    /// Recompute an `Enumerated` slot's options in place, e.g. before
    /// presenting an OPEN dialog's file list. No-op on any other kind or an
    /// undeclared key.
    pub fn adjust_requirements(&mut self, key: &str, options: Vec<String>) {
        if let Some(slot) = self.slots.get_mut(key) {
            if let RequirementKind::Enumerated { options: current } = &mut slot.kind {
                *current = options;
            }
        }
    }
}

/// `NON_EMPTY` predicate: accepts any non-empty string.
pub fn non_empty(s: &str) -> bool {
    !s.is_empty()
}

/// `FILENAME` predicate: non-empty and free of path separators, matching the
/// flat-filename constraint of the user-data directory (see §6).
pub fn filename(s: &str) -> bool {
    !s.is_empty() && !s.contains('/') && !s.contains('\\')
}

/// `NUMERIC` predicate: a non-empty run of ASCII digits, for a slot index
/// entered as free text (e.g. a branch's source/sink slot).
pub fn numeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}
