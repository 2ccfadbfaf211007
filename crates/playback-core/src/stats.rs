//! Per-round team statistics.
//!
//! A [`RoundStat`] holds one [`TeamRoundStat`] per team. It is filled once per
//! round by [`RoundStat::apply_round_delta`], which splits its inputs in two:
//!
//! - economy numbers (cheese, rat kings, dirt, traps) are taken from the
//!   round delta as reported by the engine;
//! - the baby-rat population is recounted from the round's own body registry,
//!   so it always agrees with the spawn and death actions applied locally.
//!
//! Once applied, the stat is marked completed and later calls are no-ops.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use playback_types::{
    DecodeError, RobotType, RoundDeltaView, Team, TeamId, TeamRoundStat, TurnView,
};
use playback_world::BodyRegistry;
use tracing::warn;

use crate::error::ReplayError;

/// Inputs the aggregator reads besides the delta itself.
#[derive(Debug, Clone, Copy)]
pub struct AggregationContext<'a> {
    /// One-based number of the round being aggregated.
    pub round_number: u32,
    /// The round's body registry, after this round's actions.
    pub bodies: &'a BodyRegistry,
    /// The stat of the immediately preceding round, if there is one.
    pub previous: Option<&'a RoundStat>,
    /// Aggregation slower than this is logged.
    pub slow_threshold: Duration,
}

/// Statistics of both teams for one round.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RoundStat {
    /// Per-team aggregates keyed by team id.
    teams: BTreeMap<TeamId, TeamRoundStat>,
    /// Set once the round delta has been applied.
    completed: bool,
}

impl RoundStat {
    /// Create an empty stat with one slot per team.
    pub fn new(teams: &[Team; 2]) -> Self {
        Self {
            teams: teams
                .iter()
                .map(|team| (team.id, TeamRoundStat::default()))
                .collect(),
            completed: false,
        }
    }

    /// Whether the round delta has been applied.
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Mark the stat as final without applying a delta.
    pub(crate) const fn mark_completed(&mut self) {
        self.completed = true;
    }

    /// Statistics of one team.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::TeamNotFound`] for the neutral team or any id
    /// without a slot.
    pub fn team_stat(&self, team: TeamId) -> Result<&TeamRoundStat, ReplayError> {
        self.teams
            .get(&team)
            .ok_or(ReplayError::TeamNotFound(team.into_inner()))
    }

    fn team_stat_mut(&mut self, team: TeamId) -> Result<&mut TeamRoundStat, ReplayError> {
        self.teams
            .get_mut(&team)
            .ok_or(ReplayError::TeamNotFound(team.into_inner()))
    }

    /// Iterate over `(team, stat)` pairs in team id order.
    pub fn iter(&self) -> impl Iterator<Item = (TeamId, &TeamRoundStat)> {
        self.teams.iter().map(|(&id, stat)| (id, stat))
    }

    /// Copy the cumulative values into a fresh, not yet completed stat for
    /// the following round.
    #[must_use]
    pub fn copy_for_next_round(&self) -> Self {
        Self {
            teams: self.teams.clone(),
            completed: false,
        }
    }

    /// Credit damage dealt to a cat to `team`.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::TeamNotFound`] if `team` has no slot.
    pub fn record_cat_damage(&mut self, team: TeamId, damage: i32) -> Result<(), ReplayError> {
        let stat = self.team_stat_mut(team)?;
        stat.cat_damage_amount = stat.cat_damage_amount.saturating_add(damage);
        Ok(())
    }

    /// Fill this round's statistics from the round delta and the body
    /// registry.
    ///
    /// The delta, when present, must declare the zero-based id of
    /// `ctx.round_number`. A completed stat is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::RoundIdMismatch`] for a delta of another round,
    /// [`ReplayError::Decode`] for a missing mandatory field, and
    /// [`ReplayError::TeamNotFound`] for a team id without a slot.
    pub fn apply_round_delta<D: RoundDeltaView>(
        &mut self,
        ctx: AggregationContext<'_>,
        delta: Option<&D>,
    ) -> Result<(), ReplayError> {
        if let Some(delta) = delta {
            let expected = i32::try_from(ctx.round_number)
                .ok()
                .and_then(|n| n.checked_sub(1))
                .ok_or(ReplayError::RoundOverflow(ctx.round_number))?;
            if delta.round_id() != expected {
                return Err(ReplayError::RoundIdMismatch {
                    expected,
                    found: delta.round_id(),
                });
            }
        }

        if self.completed {
            return Ok(());
        }

        let started = Instant::now();

        if let Some(delta) = delta {
            self.apply_team_slots(delta, ctx.previous)?;
        }

        self.recount_baby_rats(ctx.bodies)?;

        let elapsed = started.elapsed();
        if is_slow(elapsed, ctx.slow_threshold) {
            warn!(
                round = ctx.round_number,
                elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                "Slow statistics aggregation"
            );
        }

        self.completed = true;
        Ok(())
    }

    /// Copy the wire-reported values of every team slot.
    fn apply_team_slots<D: RoundDeltaView>(
        &mut self,
        delta: &D,
        previous: Option<&Self>,
    ) -> Result<(), ReplayError> {
        let cooperation = (0..delta.turns_len())
            .filter_map(|i| delta.turns(i))
            .any(|turn| turn.is_cooperation());

        for slot in 0..delta.team_ids_len() {
            let team = resolve_team(required(delta.team_ids(slot), "team_ids", slot)?)?;
            let current_cheese = required(
                delta.team_cheese_transferred(slot),
                "team_cheese_transferred",
                slot,
            )?;
            let previous_cheese = match previous {
                Some(prev) => prev.team_stat(team)?.cheese_amount,
                None => current_cheese,
            };

            let stat = self.team_stat_mut(team)?;
            stat.cheese_amount = current_cheese;
            stat.cheese_percent = current_cheese.saturating_sub(previous_cheese);
            stat.rat_king_count =
                required(delta.team_alive_rat_kings(slot), "team_alive_rat_kings", slot)?;
            stat.dirt_amount = required(delta.team_dirt_amounts(slot), "team_dirt_amounts", slot)?;
            stat.rat_trap_amount =
                required(delta.team_rat_trap_count(slot), "team_rat_trap_count", slot)?;
            stat.cat_trap_amount =
                required(delta.team_cat_trap_count(slot), "team_cat_trap_count", slot)?;
            // Read for validation; the registry recount below replaces it.
            stat.baby_rat_count =
                required(delta.team_alive_baby_rats(slot), "team_alive_baby_rats", slot)?;
            stat.game_mode_cooperation = cooperation;
        }

        self.update_shares();
        Ok(())
    }

    /// Recompute each team's share of cat damage and of living rat kings.
    fn update_shares(&mut self) {
        let total_cat_damage = self
            .teams
            .values()
            .fold(0_i32, |sum, s| sum.saturating_add(s.cat_damage_amount));
        let total_rat_kings = self
            .teams
            .values()
            .fold(0_i32, |sum, s| sum.saturating_add(s.rat_king_count));

        for stat in self.teams.values_mut() {
            stat.cat_damage_percent = share(stat.cat_damage_amount, total_cat_damage);
            stat.rat_king_percent = share(stat.rat_king_count, total_rat_kings);
        }
    }

    /// Count living rats per team from the registry.
    fn recount_baby_rats(&mut self, bodies: &BodyRegistry) -> Result<(), ReplayError> {
        for stat in self.teams.values_mut() {
            stat.baby_rat_count = 0;
        }

        for body in bodies.iter() {
            if body.team.is_neutral() {
                continue;
            }
            let stat = self.team_stat_mut(body.team)?;
            if body.dead {
                continue;
            }
            if body.robot_type == RobotType::Rat {
                stat.baby_rat_count = stat.baby_rat_count.saturating_add(1);
            }
        }
        Ok(())
    }
}

/// Turn a one-based wire team id into a [`TeamId`]; `0` is reserved.
fn resolve_team(raw: i32) -> Result<TeamId, ReplayError> {
    if raw <= 0 {
        return Err(ReplayError::TeamNotFound(raw));
    }
    Ok(TeamId(raw))
}

/// Treat an absent accessor value as a malformed delta.
const fn required(value: Option<i32>, field: &'static str, index: usize) -> Result<i32, DecodeError> {
    match value {
        Some(v) => Ok(v),
        None => Err(DecodeError::MissingField { field, index }),
    }
}

/// Whether an aggregation took longer than `threshold`, in whole
/// milliseconds.
const fn is_slow(elapsed: Duration, threshold: Duration) -> bool {
    elapsed.as_millis() > threshold.as_millis()
}

/// `part / total`, or `0.0` when nothing was counted.
fn share(part: i32, total: i32) -> f64 {
    if total == 0 {
        0.0
    } else {
        f64::from(part) / f64::from(total)
    }
}
