//! Error types for the `playback-core` crate.
//!
//! Every error aborts materialization of the round being built. The round
//! under construction is a private copy, so nothing partially applied is
//! ever observable through the [`Match`](crate::replay::Match).

use playback_types::DecodeError;
use playback_world::WorldError;

/// Errors that can occur while replaying a match.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    /// A wire value could not be decoded.
    #[error("decode error: {source}")]
    Decode {
        /// The underlying decode error.
        #[from]
        source: DecodeError,
    },

    /// A body or map lookup failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// The delta declares a round id that does not follow the round being built.
    #[error("wrong round id: delta declares {found}, expected {expected}")]
    RoundIdMismatch {
        /// Zero-based id the delta should carry.
        expected: i32,
        /// Zero-based id the delta carries.
        found: i32,
    },

    /// A team id has no statistics slot. `0` is always rejected.
    #[error("team {0} not found")]
    TeamNotFound(i32),

    /// A round was requested that has no delta yet.
    #[error("round {requested} not available (have {available})")]
    RoundNotAvailable {
        /// The requested round number.
        requested: u32,
        /// The last round number with a delta.
        available: u32,
    },

    /// The round counter cannot advance further.
    #[error("round counter overflow after round {0}")]
    RoundOverflow(u32),
}
