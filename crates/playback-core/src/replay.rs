//! The match container: round deltas in, round snapshots out.
//!
//! A [`Match`] keeps every round delta received so far and every round
//! materialized from them. Reading a materialized round is a direct index.
//! Seeking past the last materialized round builds each intermediate round in
//! order, since a round is only derivable from its predecessor.

use std::sync::Arc;

use playback_types::{RoundDeltaView, SpawnPayload, Team, TeamId};
use playback_world::StaticMap;
use tracing::{debug, info};

use crate::config::ReplaySettings;
use crate::error::ReplayError;
use crate::round::Round;
use crate::stats::RoundStat;

/// A replayed match.
#[derive(Debug)]
pub struct Match<D: RoundDeltaView> {
    /// The two competing teams.
    teams: [Team; 2],
    /// Map shared by every round.
    map: Arc<StaticMap>,
    /// Replay settings.
    settings: ReplaySettings,
    /// Round 0, built from the match header.
    initial: Round,
    /// Deltas received so far; `deltas[n - 1]` builds round `n`.
    deltas: Vec<D>,
    /// Materialized rounds; `rounds[n - 1]` is round `n`.
    rounds: Vec<Round>,
    /// Round the viewer is positioned on.
    current: u32,
}

impl<D: RoundDeltaView> Match<D> {
    /// Create a match positioned on round 0.
    ///
    /// # Errors
    ///
    /// Fails like [`Round::initial`].
    pub fn new(
        map: StaticMap,
        teams: [Team; 2],
        initial_bodies: &[SpawnPayload],
        settings: ReplaySettings,
    ) -> Result<Self, ReplayError> {
        let map = Arc::new(map);
        let initial = Round::initial(Arc::clone(&map), &teams, initial_bodies)?;
        info!(
            map = %map.name,
            bodies = initial.bodies().len(),
            "Match created"
        );
        Ok(Self {
            teams,
            map,
            settings,
            initial,
            deltas: Vec::new(),
            rounds: Vec::new(),
            current: 0,
        })
    }

    /// Append the delta of the next round. Nothing is materialized yet.
    pub fn push_delta(&mut self, delta: D) {
        self.deltas.push(delta);
        debug!(rounds = self.deltas.len(), "Round delta received");
    }

    /// Highest round number that can be materialized with the deltas received.
    pub fn max_round(&self) -> u32 {
        u32::try_from(self.deltas.len()).unwrap_or(u32::MAX)
    }

    /// Highest round number already materialized.
    pub fn materialized_rounds(&self) -> u32 {
        u32::try_from(self.rounds.len()).unwrap_or(u32::MAX)
    }

    /// A materialized round; `0` is the initial round.
    pub fn round(&self, number: u32) -> Option<&Round> {
        let Some(index) = number.checked_sub(1) else {
            return Some(&self.initial);
        };
        self.rounds.get(usize::try_from(index).ok()?)
    }

    /// Statistics of a materialized round.
    pub fn stat_for(&self, number: u32) -> Option<&RoundStat> {
        self.round(number).map(Round::stat)
    }

    /// Materialize the round after the last materialized one.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::RoundNotAvailable`] if its delta has not been
    /// received, and any error of [`Round::next`]. On error the match is
    /// unchanged.
    pub fn materialize_next(&mut self) -> Result<&Round, ReplayError> {
        let built = self.rounds.len();
        let Some(delta) = self.deltas.get(built) else {
            return Err(ReplayError::RoundNotAvailable {
                requested: self.materialized_rounds().saturating_add(1),
                available: self.max_round(),
            });
        };
        let last = self.rounds.last().unwrap_or(&self.initial);
        let next = last.next(Some(delta), &self.settings)?;
        self.rounds.push(next);
        Ok(self.rounds.last().unwrap_or(&self.initial))
    }

    /// Position the match on round `number`, materializing forward as needed.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::RoundNotAvailable`] beyond the last received
    /// delta, and any error of [`Match::materialize_next`]. Rounds built
    /// before an error stay materialized.
    pub fn seek(&mut self, number: u32) -> Result<&Round, ReplayError> {
        if number > self.max_round() {
            return Err(ReplayError::RoundNotAvailable {
                requested: number,
                available: self.max_round(),
            });
        }
        while self.materialized_rounds() < number {
            self.materialize_next()?;
        }
        self.current = number;
        self.round(number).ok_or(ReplayError::RoundNotAvailable {
            requested: number,
            available: self.max_round(),
        })
    }

    /// Advance the match by one round.
    ///
    /// # Errors
    ///
    /// See [`Match::seek`].
    pub fn step(&mut self) -> Result<&Round, ReplayError> {
        let next = self
            .current
            .checked_add(1)
            .ok_or(ReplayError::RoundOverflow(self.current))?;
        self.seek(next)
    }

    /// The round the match is positioned on.
    pub fn current_round(&self) -> &Round {
        self.round(self.current).unwrap_or(&self.initial)
    }

    /// The two teams.
    pub const fn teams(&self) -> &[Team; 2] {
        &self.teams
    }

    /// Look up a team by id.
    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|team| team.id == id)
    }

    /// The match map.
    pub fn map(&self) -> &StaticMap {
        &self.map
    }

    /// The replay settings.
    pub const fn settings(&self) -> &ReplaySettings {
        &self.settings
    }
}
