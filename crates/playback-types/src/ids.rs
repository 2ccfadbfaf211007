//! Type-safe identifier wrappers around the raw integers of the wire format.
//!
//! Bodies and teams are both identified by plain `i32` values in the match
//! stream. Wrapping them keeps a body id from being passed where a team id
//! is expected.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Generates a newtype wrapper around `i32` with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[serde(transparent)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub i32);

        impl $name {
            /// Wrap a raw wire value.
            pub const fn new(raw: i32) -> Self {
                Self(raw)
            }

            /// Return the inner wire value.
            pub const fn into_inner(self) -> i32 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Identifier of a simulated body, unique within a match.
    BodyId
}

define_id! {
    /// One-based team identifier. `0` is the neutral team (cats) and never
    /// has a statistics slot.
    TeamId
}

impl TeamId {
    /// The neutral team.
    pub const NEUTRAL: Self = Self(0);

    /// Whether this id denotes the neutral team.
    pub const fn is_neutral(self) -> bool {
        self.0 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_serializes_as_bare_integer() {
        let json = serde_json::to_string(&BodyId::new(7)).ok();
        assert_eq!(json.as_deref(), Some("7"));
        let restored: Result<BodyId, _> = serde_json::from_str("7");
        assert_eq!(restored.ok(), Some(BodyId(7)));
    }

    #[test]
    fn neutral_team_is_zero() {
        assert!(TeamId::NEUTRAL.is_neutral());
        assert!(!TeamId::new(1).is_neutral());
        assert_eq!(TeamId::new(2).to_string(), "2");
    }
}
