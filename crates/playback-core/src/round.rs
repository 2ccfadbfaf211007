//! One frame of replayed simulation time.
//!
//! A [`Round`] owns its body registry, statistics and live action list. The
//! static map is shared across rounds behind an [`Arc`]. Rounds are built by
//! [`Round::next`], which copies the previous round and applies one round
//! delta to the copy, so a finished round is never mutated again.
//!
//! Round 0 holds the initial bodies of the match header and carries no
//! delta. Round `n >= 1` is built from the delta with zero-based id `n - 1`.

use std::sync::Arc;
use std::time::Duration;

use playback_types::{BodyId, DecodeError, RoundDeltaView, SpawnPayload, Team, TurnView};
use playback_world::{BodyRegistry, StaticMap};
use tracing::debug;

use crate::actions::{Actions, ApplyContext, DrawCommand};
use crate::config::ReplaySettings;
use crate::error::ReplayError;
use crate::stats::{AggregationContext, RoundStat};

/// The full state of one round.
#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    /// Zero for the initial round, then one-based.
    round_number: u32,
    /// Bodies of this round, dead ones included.
    bodies: BodyRegistry,
    /// Map shared by every round of the match.
    map: Arc<StaticMap>,
    /// Team statistics of this round.
    stat: RoundStat,
    /// Actions still being drawn.
    actions: Actions,
}

impl Round {
    /// Build round 0 from the match header.
    ///
    /// Its statistics are empty and already completed.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::World`] for a duplicate or off-map initial body
    /// and [`ReplayError::Decode`] for an unknown robot type.
    pub fn initial(
        map: Arc<StaticMap>,
        teams: &[Team; 2],
        spawns: &[SpawnPayload],
    ) -> Result<Self, ReplayError> {
        let bodies = BodyRegistry::from_initial(spawns, &map)?;
        let mut stat = RoundStat::new(teams);
        stat.mark_completed();
        Ok(Self {
            round_number: 0,
            bodies,
            map,
            stat,
            actions: Actions::new(),
        })
    }

    /// Build the following round from this one and its delta.
    ///
    /// `self` is left untouched; on error nothing of the half-built round
    /// escapes.
    ///
    /// # Errors
    ///
    /// Any error of [`Round::apply_turn`] or [`Round::apply_round_delta`], and
    /// [`ReplayError::RoundOverflow`] if the round counter cannot advance.
    pub fn next<D: RoundDeltaView>(
        &self,
        delta: Option<&D>,
        settings: &ReplaySettings,
    ) -> Result<Self, ReplayError> {
        let round_number = self
            .round_number
            .checked_add(1)
            .ok_or(ReplayError::RoundOverflow(self.round_number))?;

        let mut next = Self {
            round_number,
            bodies: self.bodies.copy_for_next_round(),
            map: Arc::clone(&self.map),
            stat: self.stat.copy_for_next_round(),
            actions: self.actions.clone(),
        };
        next.actions.tick_lifetimes();

        if let Some(delta) = delta {
            for index in 0..delta.turns_len() {
                let turn = delta
                    .turns(index)
                    .ok_or(DecodeError::MissingField {
                        field: "turns",
                        index,
                    })?;
                next.apply_turn(turn, settings.action_lifetime())?;
            }
        }

        // The initial round has no economy to diff against.
        let previous = (self.round_number >= 1).then_some(&self.stat);
        next.apply_round_delta(delta, previous, settings.slow_stat_threshold())?;

        debug!(
            round = round_number,
            bodies = next.bodies.len(),
            live_actions = next.actions.len(),
            "Round materialized"
        );
        Ok(next)
    }

    /// Move the acting body to its end-of-turn tile, then apply the turn's
    /// actions.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::World`] if the acting body is unknown or its end
    /// tile is off the map, and any error of [`Actions::apply_turn_delta`].
    pub fn apply_turn<T: TurnView>(&mut self, turn: &T, lifetime: u32) -> Result<(), ReplayError> {
        let Self {
            round_number,
            bodies,
            map,
            stat,
            actions,
        } = self;

        if let Some((x, y)) = turn.end_location() {
            bodies.move_body(BodyId(turn.robot_id()), x, y, &**map)?;
        }

        let mut ctx = ApplyContext {
            round_number: *round_number,
            bodies,
            map: &**map,
            stat,
        };
        actions.apply_turn_delta(&mut ctx, turn, lifetime)
    }

    /// Aggregate this round's statistics.
    ///
    /// # Errors
    ///
    /// See [`RoundStat::apply_round_delta`].
    pub fn apply_round_delta<D: RoundDeltaView>(
        &mut self,
        delta: Option<&D>,
        previous: Option<&RoundStat>,
        slow_threshold: Duration,
    ) -> Result<(), ReplayError> {
        let ctx = AggregationContext {
            round_number: self.round_number,
            bodies: &self.bodies,
            previous,
            slow_threshold,
        };
        self.stat.apply_round_delta(ctx, delta)
    }

    /// Draw commands of the live actions.
    pub fn draw(&self, interpolation: f64) -> Vec<DrawCommand> {
        self.actions.draw(self, interpolation)
    }

    /// The round number; `0` is the initial round.
    pub const fn round_number(&self) -> u32 {
        self.round_number
    }

    /// Bodies of this round.
    pub const fn bodies(&self) -> &BodyRegistry {
        &self.bodies
    }

    /// The match map.
    pub fn map(&self) -> &StaticMap {
        &self.map
    }

    /// Team statistics of this round.
    pub const fn stat(&self) -> &RoundStat {
        &self.stat
    }

    /// Live actions of this round.
    pub const fn actions(&self) -> &Actions {
        &self.actions
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use playback_types::{
        ActionPayload, DamagePayload, DiePayload, IndicatorStringPayload, RoundDeltaRecord,
        TeamId, TeamSlot, TurnRecord, Vector,
    };
    use playback_world::WorldError;

    use super::*;

    fn make_teams() -> [Team; 2] {
        [1, 2].map(|id| Team {
            id: TeamId(id),
            name: format!("team{id}"),
            package_name: String::new(),
            color: String::from("#abcdef"),
        })
    }

    fn make_initial() -> Round {
        let spawns = [
            SpawnPayload {
                id: 1,
                x: 0,
                y: 0,
                team: 1,
                robot_type: 1,
            },
            SpawnPayload {
                id: 2,
                x: 2,
                y: 2,
                team: 2,
                robot_type: 1,
            },
        ];
        let map = Arc::new(StaticMap::new("round", 5, 5).unwrap());
        Round::initial(map, &make_teams(), &spawns).unwrap()
    }

    fn slots(round_id: i32) -> RoundDeltaRecord {
        RoundDeltaRecord::new(round_id)
            .with_team(TeamSlot {
                team_id: 1,
                ..TeamSlot::default()
            })
            .with_team(TeamSlot {
                team_id: 2,
                ..TeamSlot::default()
            })
    }

    #[test]
    fn initial_round_is_completed() {
        let round = make_initial();
        assert_eq!(round.round_number(), 0);
        assert!(round.stat().is_completed());
        assert_eq!(round.bodies().len(), 2);
    }

    #[test]
    fn next_round_applies_turns_and_stats() {
        let initial = make_initial();
        let delta = slots(0).with_turn(TurnRecord::with_actions(
            1,
            [ActionPayload::DamageAction(DamagePayload { id: 2, damage: 10 })],
        ));
        let round = initial
            .next(Some(&delta), &ReplaySettings::default())
            .unwrap();
        assert_eq!(round.round_number(), 1);
        assert_eq!(round.bodies().get_by_id(BodyId(2)).unwrap().hp, 90);
        assert!(round.stat().is_completed());
        assert_eq!(round.actions().len(), 1);
        // The source round is untouched.
        assert_eq!(initial.bodies().get_by_id(BodyId(2)).unwrap().hp, 100);
    }

    #[test]
    fn end_location_moves_body_before_actions() {
        let initial = make_initial();
        let turn = TurnRecord {
            robot_id: 1,
            x: Some(3),
            y: Some(1),
            ..TurnRecord::default()
        };
        let round = initial
            .next(Some(&slots(0).with_turn(turn)), &ReplaySettings::default())
            .unwrap();
        let body = round.bodies().get_by_id(BodyId(1)).unwrap();
        assert_eq!(body.pos, Vector::from_tile(3, 1));
        assert_eq!(body.prev_pos, Vector::ZERO);
    }

    #[test]
    fn end_location_off_the_map_aborts_the_round() {
        let initial = make_initial();
        let turn = TurnRecord {
            robot_id: 1,
            x: Some(99),
            y: Some(-7),
            ..TurnRecord::default()
        };
        let result = initial.next(Some(&slots(0).with_turn(turn)), &ReplaySettings::default());
        assert!(matches!(
            result,
            Err(ReplayError::World {
                source: WorldError::CoordinateOutOfBounds { x: 99, y: -7 }
            })
        ));
    }

    #[test]
    fn initial_body_off_the_map_is_rejected() {
        let map = Arc::new(StaticMap::new("round", 5, 5).unwrap());
        let spawns = [SpawnPayload {
            id: 1,
            x: 5,
            y: 0,
            team: 1,
            robot_type: 1,
        }];
        assert!(matches!(
            Round::initial(map, &make_teams(), &spawns),
            Err(ReplayError::World {
                source: WorldError::CoordinateOutOfBounds { x: 5, y: 0 }
            })
        ));
    }

    #[test]
    fn dead_bodies_and_indicators_do_not_survive_advance() {
        let initial = make_initial();
        let delta = slots(0).with_turn(TurnRecord::with_actions(
            1,
            [
                ActionPayload::IndicatorStringAction(IndicatorStringPayload {
                    value: Some(String::from("here")),
                }),
                ActionPayload::DieAction(DiePayload { id: 2, die_type: 0 }),
            ],
        ));
        let settings = ReplaySettings::default();
        let first = initial.next(Some(&delta), &settings).unwrap();
        assert!(first.bodies().get_by_id(BodyId(2)).unwrap().dead);

        let second = first.next(Some(&slots(1)), &settings).unwrap();
        assert!(!second.bodies().contains(BodyId(2)));
        assert!(
            second
                .bodies()
                .get_by_id(BodyId(1))
                .unwrap()
                .indicator_string
                .is_empty()
        );
        assert!(second.actions().is_empty());
    }

    #[test]
    fn failed_round_leaves_source_untouched() {
        let initial = make_initial();
        let delta = slots(0).with_turn(TurnRecord::with_actions(
            1,
            [
                ActionPayload::DamageAction(DamagePayload { id: 2, damage: 10 }),
                ActionPayload::DamageAction(DamagePayload { id: 77, damage: 10 }),
            ],
        ));
        assert!(initial.next(Some(&delta), &ReplaySettings::default()).is_err());
        assert_eq!(initial.bodies().get_by_id(BodyId(2)).unwrap().hp, 100);
    }

    #[test]
    fn round_without_delta_still_recounts() {
        let initial = make_initial();
        let round = initial
            .next::<RoundDeltaRecord>(None, &ReplaySettings::default())
            .unwrap();
        assert_eq!(
            round.stat().team_stat(TeamId(1)).unwrap().baby_rat_count,
            1
        );
    }

    #[test]
    fn wrong_delta_round_id_fails() {
        let initial = make_initial();
        let result = initial.next(Some(&slots(4)), &ReplaySettings::default());
        assert!(matches!(result, Err(ReplayError::RoundIdMismatch { .. })));
    }
}
