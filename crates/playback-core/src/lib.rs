//! Replay engine for recorded two-team matches.
//!
//! The engine turns the ordered stream of round deltas produced by the match
//! engine into one immutable snapshot per round. Each round is built by
//! copying its predecessor and applying its own delta, so any materialized
//! round can be read back directly while new deltas keep arriving.
//!
//! # Modules
//!
//! - [`actions`] -- Action decoding, per-kind application, lifetime ticking,
//!   and renderer-neutral draw commands.
//! - [`config`] -- Configuration loading from `playback-config.yaml`.
//! - [`error`] -- [`ReplayError`], the error of every replay operation.
//! - [`replay`] -- [`Match`]: delta intake, forward materialization, seeking.
//! - [`round`] -- [`Round`]: one snapshot and the advance to the next one.
//! - [`stats`] -- [`RoundStat`]: per-team statistics aggregation.

pub mod actions;
pub mod config;
pub mod error;
pub mod replay;
pub mod round;
pub mod stats;

pub use actions::{Action, Actions, ApplyContext, DrawCommand, Marker};
pub use config::{ConfigError, LoggingConfig, PlaybackConfig, ReplaySettings};
pub use error::ReplayError;
pub use replay::Match;
pub use round::Round;
pub use stats::{AggregationContext, RoundStat};
