//! Error types for the replay runner binary.
//!
//! [`RunnerError`] wraps every failure mode of loading and replaying a match
//! so `main` can propagate them with `?`.

use std::path::PathBuf;

/// Top-level error for the replay runner.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: playback_core::ConfigError,
    },

    /// No replay file was given on the command line.
    #[error("usage: playback-runner <replay.json>")]
    Usage,

    /// The replay file could not be read.
    #[error("failed to read replay file {path}: {source}")]
    Io {
        /// Path of the replay file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The replay file is not valid JSON for the replay layout.
    #[error("failed to parse replay file: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// The replay file was written by an unsupported format version.
    #[error("unsupported replay version {found} (expected {expected})")]
    Version {
        /// Version this runner understands.
        expected: u32,
        /// Version found in the file.
        found: u32,
    },

    /// The map in the replay file is inconsistent.
    #[error("map error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: playback_world::WorldError,
    },

    /// Replaying the match failed.
    #[error("replay error: {source}")]
    Replay {
        /// The underlying replay error.
        #[from]
        source: playback_core::ReplayError,
    },
}
