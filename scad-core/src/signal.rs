//! The two-valued logic level every pin and branch carries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A two-valued logical level. Defaults to [`Signal::Low`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signal {
    #[default]
    Low,
    High,
}

impl Signal {
    pub fn is_high(self) -> bool {
        matches!(self, Signal::High)
    }

    pub fn is_low(self) -> bool {
        matches!(self, Signal::Low)
    }

    pub fn from_bool(high: bool) -> Self {
        if high {
            Signal::High
        } else {
            Signal::Low
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Signal::Low => Signal::High,
            Signal::High => Signal::Low,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Signal::Low => "low",
            Signal::High => "high",
        })
    }
}

impl From<bool> for Signal {
    fn from(high: bool) -> Self {
        Signal::from_bool(high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_low() {
        assert_eq!(Signal::default(), Signal::Low);
    }

    #[test]
    fn from_bool_roundtrips() {
        assert_eq!(Signal::from(true), Signal::High);
        assert_eq!(Signal::from(false), Signal::Low);
    }

    #[test]
    fn toggled_flips() {
        assert_eq!(Signal::Low.toggled(), Signal::High);
        assert_eq!(Signal::High.toggled(), Signal::Low);
    }

    #[test]
    fn display_matches_glossary_wording() {
        assert_eq!(Signal::Low.to_string(), "low");
        assert_eq!(Signal::High.to_string(), "high");
    }
}
