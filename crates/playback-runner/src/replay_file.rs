//! On-disk replay layout.
//!
//! A replay file is a JSON document holding the match header (map, teams,
//! initial bodies) followed by the round deltas in order.

use std::path::Path;

use playback_core::{Match, ReplaySettings};
use playback_types::{RoundDeltaRecord, SpawnPayload, Team};
use playback_world::StaticMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::RunnerError;

/// Replay format version this runner reads.
pub const REPLAY_VERSION: u32 = 1;

/// A recorded match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayFile {
    /// Replay file schema version.
    pub version: u32,
    /// The match map.
    pub map: StaticMap,
    /// The two teams.
    pub teams: [Team; 2],
    /// Bodies present before the first round.
    #[serde(default)]
    pub initial_bodies: Vec<SpawnPayload>,
    /// Round deltas; entry `i` carries round id `i`.
    #[serde(default)]
    pub rounds: Vec<RoundDeltaRecord>,
}

impl ReplayFile {
    /// Read and parse a replay file.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Io`] if the file cannot be read and
    /// [`RunnerError::Json`] if it does not parse.
    pub fn from_path(path: &Path) -> Result<Self, RunnerError> {
        let contents = std::fs::read_to_string(path).map_err(|source| RunnerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parse a replay from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Json`] if the string does not parse.
    pub fn parse(json: &str) -> Result<Self, RunnerError> {
        let replay: Self = serde_json::from_str(json)?;
        Ok(replay)
    }

    /// Build a match from the header and queue every round delta.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Version`] for a foreign format version,
    /// [`RunnerError::World`] for an inconsistent map, and
    /// [`RunnerError::Replay`] if the initial bodies are invalid.
    pub fn into_match(
        self,
        settings: ReplaySettings,
    ) -> Result<Match<RoundDeltaRecord>, RunnerError> {
        if self.version != REPLAY_VERSION {
            return Err(RunnerError::Version {
                expected: REPLAY_VERSION,
                found: self.version,
            });
        }
        let map = self.map.validate()?;
        let mut replay = Match::new(map, self.teams, &self.initial_bodies, settings)?;
        let rounds = self.rounds.len();
        for delta in self.rounds {
            replay.push_delta(delta);
        }
        info!(rounds, "Replay loaded");
        Ok(replay)
    }
}
