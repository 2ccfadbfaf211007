//! A single decoded action and its state-mutation rule.
//!
//! [`Action::apply`] is one exhaustive match over [`ActionPayload`]. Most
//! kinds only resolve the bodies and tiles they reference; a failed lookup
//! still aborts the round, because it means the stream and the registry
//! disagree. The kinds that change state are damage, spawn, die and the
//! three indicator overlays.

use playback_types::{
    ActionPayload, ActionTag, BodyId, DamagePayload, DecodeError, DiePayload, DieType,
    IndicatorDot, IndicatorLine, RobotType, TeamId,
};
use playback_world::{BodyRegistry, StaticMap};
use tracing::{info, trace};

use crate::error::ReplayError;
use crate::stats::RoundStat;

/// Mutable view of the round being built, handed to [`Action::apply`].
#[derive(Debug)]
pub struct ApplyContext<'a> {
    /// Round number being built, for log context.
    pub round_number: u32,
    /// The round's body registry.
    pub bodies: &'a mut BodyRegistry,
    /// The match's static map.
    pub map: &'a StaticMap,
    /// The round's statistics, for cat-damage accounting.
    pub stat: &'a mut RoundStat,
}

/// One action decoded from a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// Id of the body whose turn produced the action.
    pub robot_id: BodyId,
    /// Kind-specific payload.
    pub payload: ActionPayload,
    /// Rounds the action stays in the live list.
    pub lifetime: u32,
}

impl Action {
    /// Create an action with the given lifetime.
    pub const fn new(robot_id: BodyId, payload: ActionPayload, lifetime: u32) -> Self {
        Self {
            robot_id,
            payload,
            lifetime,
        }
    }

    /// Kind of the action.
    pub const fn tag(&self) -> ActionTag {
        self.payload.tag()
    }

    /// Apply the action to the round being built.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::World`] when a referenced body or tile does not
    /// exist, [`ReplayError::Decode`] for an undecodable die or robot type, and
    /// [`ReplayError::TeamNotFound`] when cat damage is credited to a team
    /// without a slot.
    pub fn apply(&self, ctx: &mut ApplyContext<'_>) -> Result<(), ReplayError> {
        match &self.payload {
            ActionPayload::CatFeed(target) | ActionPayload::RatNap(target) => {
                ctx.bodies.get_by_id(self.robot_id)?;
                ctx.bodies.get_by_id(BodyId(target.id))?;
                self.trace_resolved();
            }
            ActionPayload::RatAttack(_) => {}
            ActionPayload::RatCollision(collision) => {
                ctx.bodies.get_by_id(self.robot_id)?;
                ctx.bodies.get_by_id(BodyId(collision.id))?;
                ctx.map.index_to_location(collision.loc)?;
                self.trace_resolved();
            }
            ActionPayload::PlaceDirt(at) | ActionPayload::BreakDirt(at) => {
                ctx.map.index_to_location(at.loc)?;
                self.trace_resolved();
            }
            ActionPayload::CheesePickup(at) | ActionPayload::CatScratch(at) => {
                ctx.bodies.get_by_id(self.robot_id)?;
                ctx.map.index_to_location(at.loc)?;
                self.trace_resolved();
            }
            ActionPayload::CheeseSpawn(spawn) => {
                ctx.bodies.get_by_id(self.robot_id)?;
                ctx.map.index_to_location(spawn.loc)?;
                trace!(
                    round = ctx.round_number,
                    robot = %self.robot_id,
                    amount = spawn.amount,
                    "Cheese spawned"
                );
            }
            ActionPayload::CatPounce(pounce) => {
                ctx.bodies.get_by_id(self.robot_id)?;
                ctx.map.index_to_location(pounce.start_loc)?;
                ctx.map.index_to_location(pounce.end_loc)?;
                self.trace_resolved();
            }
            ActionPayload::PlaceRatTrap(trap)
            | ActionPayload::PlaceCatTrap(trap)
            | ActionPayload::TriggerRatTrap(trap)
            | ActionPayload::TriggerCatTrap(trap) => {
                let owner = actor_team(ctx.bodies, self.robot_id)?;
                ctx.map.index_to_location(trap.loc)?;
                trace!(
                    round = ctx.round_number,
                    robot = %self.robot_id,
                    team = %owner,
                    tag = ?self.tag(),
                    "Trap action resolved"
                );
            }
            ActionPayload::DamageAction(damage) => self.apply_damage(ctx, *damage)?,
            ActionPayload::SpawnAction(spawn) => {
                ctx.bodies.spawn_body_from_action(spawn, ctx.map)?;
            }
            ActionPayload::DieAction(die) => self.apply_die(ctx, *die)?,
            ActionPayload::IndicatorStringAction(payload) => {
                let value = payload.value.clone().ok_or(DecodeError::MissingField {
                    field: "value",
                    index: 0,
                })?;
                ctx.bodies.get_by_id_mut(self.robot_id)?.indicator_string = value;
            }
            ActionPayload::IndicatorDotAction(dot) => {
                let location = ctx.map.index_to_location(dot.loc)?;
                ctx.bodies
                    .get_by_id_mut(self.robot_id)?
                    .indicator_dots
                    .push(IndicatorDot {
                        location,
                        color: color_to_hex_string(dot.color_hex),
                    });
            }
            ActionPayload::IndicatorLineAction(line) => {
                let start = ctx.map.index_to_location(line.start_loc)?;
                let end = ctx.map.index_to_location(line.end_loc)?;
                ctx.bodies
                    .get_by_id_mut(self.robot_id)?
                    .indicator_lines
                    .push(IndicatorLine {
                        start,
                        end,
                        color: color_to_hex_string(line.color_hex),
                    });
            }
        }
        Ok(())
    }

    /// Lower the target's health, clamped at zero, and credit damage dealt to
    /// a cat to the attacker's team.
    fn apply_damage(
        &self,
        ctx: &mut ApplyContext<'_>,
        damage: DamagePayload,
    ) -> Result<(), ReplayError> {
        let attacker_team = ctx.bodies.get_by_id(self.robot_id)?.team;
        let target = ctx.bodies.get_by_id_mut(BodyId(damage.id))?;

        let before = target.hp;
        target.hp = before.saturating_sub(damage.damage).max(0);
        let dealt = before.saturating_sub(target.hp).max(0);
        let hit_cat = target.robot_type == RobotType::Cat;

        if hit_cat && !attacker_team.is_neutral() && dealt > 0 {
            ctx.stat.record_cat_damage(attacker_team, dealt)?;
        }
        Ok(())
    }

    /// Flag the target dead. Death by exception is logged, not an error.
    fn apply_die(&self, ctx: &mut ApplyContext<'_>, die: DiePayload) -> Result<(), ReplayError> {
        if DieType::from_wire(die.die_type)? == DieType::Exception {
            info!(
                round = ctx.round_number,
                robot = %self.robot_id,
                body = die.id,
                "Robot died due to an exception"
            );
        }
        ctx.bodies.mark_body_as_dead(BodyId(die.id))?;
        Ok(())
    }

    fn trace_resolved(&self) {
        trace!(robot = %self.robot_id, tag = ?self.tag(), "Action resolved");
    }
}

/// Format a packed `0xRRGGBB` color as a lowercase `#rrggbb` string.
///
/// Bits above the low 24 are ignored.
pub fn color_to_hex_string(color: i32) -> String {
    format!("#{:06x}", color & 0x00FF_FFFF)
}

/// The team an action is attributed to: the acting body's own team.
///
/// # Errors
///
/// Returns [`ReplayError::World`] if the acting body is not registered.
pub fn actor_team(bodies: &BodyRegistry, robot_id: BodyId) -> Result<TeamId, ReplayError> {
    Ok(bodies.get_by_id(robot_id)?.team)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use playback_types::{
        CheeseSpawnPayload, IndicatorDotPayload, IndicatorLinePayload, IndicatorStringPayload,
        LocPayload, PouncePayload, RatCollisionPayload, SpawnPayload, Team, TargetPayload,
        TrapPayload, Vector,
    };
    use playback_world::WorldError;

    use super::*;

    struct Fixture {
        bodies: BodyRegistry,
        map: StaticMap,
        stat: RoundStat,
    }

    impl Fixture {
        fn ctx(&mut self) -> ApplyContext<'_> {
            ApplyContext {
                round_number: 1,
                bodies: &mut self.bodies,
                map: &self.map,
                stat: &mut self.stat,
            }
        }
    }

    fn spawn(id: i32, team: i32, robot_type: u8) -> SpawnPayload {
        SpawnPayload {
            id,
            x: 1,
            y: 1,
            team,
            robot_type,
        }
    }

    fn make_team(id: i32) -> Team {
        Team {
            id: TeamId(id),
            name: format!("team{id}"),
            package_name: String::new(),
            color: String::from("#ffffff"),
        }
    }

    fn make_fixture() -> Fixture {
        let map = StaticMap::new("arena", 4, 4).unwrap();
        Fixture {
            bodies: BodyRegistry::from_initial(
                &[spawn(1, 1, 1), spawn(2, 2, 1), spawn(3, 0, 3)],
                &map,
            )
            .unwrap(),
            map,
            stat: RoundStat::new(&[make_team(1), make_team(2)]),
        }
    }

    fn damage(robot: i32, target: i32, amount: i32) -> Action {
        Action::new(
            BodyId(robot),
            ActionPayload::DamageAction(DamagePayload {
                id: target,
                damage: amount,
            }),
            1,
        )
    }

    #[test]
    fn damage_is_clamped_at_zero() {
        let mut fx = make_fixture();
        damage(1, 2, 500).apply(&mut fx.ctx()).unwrap();
        assert_eq!(fx.bodies.get_by_id(BodyId(2)).unwrap().hp, 0);
    }

    #[test]
    fn damage_to_cat_is_credited_to_attacker_team() {
        let mut fx = make_fixture();
        damage(1, 3, 40).apply(&mut fx.ctx()).unwrap();
        let cat = fx.bodies.get_by_id(BodyId(3)).unwrap();
        assert_eq!(cat.hp, RobotType::Cat.starting_health() - 40);
        assert_eq!(fx.stat.team_stat(TeamId(1)).unwrap().cat_damage_amount, 40);
        assert_eq!(fx.stat.team_stat(TeamId(2)).unwrap().cat_damage_amount, 0);
    }

    #[test]
    fn cat_damage_credit_is_limited_to_remaining_hp() {
        let mut fx = make_fixture();
        fx.bodies.get_by_id_mut(BodyId(3)).unwrap().hp = 5;
        damage(2, 3, 40).apply(&mut fx.ctx()).unwrap();
        assert_eq!(fx.stat.team_stat(TeamId(2)).unwrap().cat_damage_amount, 5);
    }

    #[test]
    fn cat_hitting_rat_credits_nobody() {
        let mut fx = make_fixture();
        damage(3, 1, 10).apply(&mut fx.ctx()).unwrap();
        assert_eq!(fx.stat.team_stat(TeamId(1)).unwrap().cat_damage_amount, 0);
    }

    #[test]
    fn damage_to_unknown_body_fails() {
        let mut fx = make_fixture();
        let result = damage(1, 99, 1).apply(&mut fx.ctx());
        assert!(matches!(
            result,
            Err(ReplayError::World {
                source: WorldError::BodyNotFound(BodyId(99))
            })
        ));
    }

    #[test]
    fn die_keeps_body_and_health() {
        let mut fx = make_fixture();
        let die = Action::new(
            BodyId(2),
            ActionPayload::DieAction(DiePayload { id: 2, die_type: 1 }),
            1,
        );
        die.apply(&mut fx.ctx()).unwrap();
        let body = fx.bodies.get_by_id(BodyId(2)).unwrap();
        assert!(body.dead);
        assert_eq!(body.hp, RobotType::Rat.starting_health());
    }

    #[test]
    fn die_with_unknown_type_fails() {
        let mut fx = make_fixture();
        let die = Action::new(
            BodyId(2),
            ActionPayload::DieAction(DiePayload { id: 2, die_type: 9 }),
            1,
        );
        assert!(matches!(
            die.apply(&mut fx.ctx()),
            Err(ReplayError::Decode { .. })
        ));
        assert!(fx.bodies.get_by_id(BodyId(2)).unwrap().is_alive());
    }

    #[test]
    fn spawn_adds_body() {
        let mut fx = make_fixture();
        let action = Action::new(BodyId(1), ActionPayload::SpawnAction(spawn(10, 1, 1)), 1);
        action.apply(&mut fx.ctx()).unwrap();
        assert!(fx.bodies.contains(BodyId(10)));
        assert!(action.apply(&mut fx.ctx()).is_err());
    }

    #[test]
    fn spawn_off_the_map_fails() {
        let mut fx = make_fixture();
        let mut far = spawn(11, 1, 1);
        far.x = 500;
        far.y = 500;
        let action = Action::new(BodyId(1), ActionPayload::SpawnAction(far), 1);
        assert!(matches!(
            action.apply(&mut fx.ctx()),
            Err(ReplayError::World {
                source: WorldError::CoordinateOutOfBounds { x: 500, y: 500 }
            })
        ));
        assert!(!fx.bodies.contains(BodyId(11)));
    }

    #[test]
    fn indicator_string_overwrites() {
        let mut fx = make_fixture();
        for text in ["first", "second"] {
            Action::new(
                BodyId(1),
                ActionPayload::IndicatorStringAction(IndicatorStringPayload {
                    value: Some(text.to_owned()),
                }),
                1,
            )
            .apply(&mut fx.ctx())
            .unwrap();
        }
        assert_eq!(
            fx.bodies.get_by_id(BodyId(1)).unwrap().indicator_string,
            "second"
        );
    }

    #[test]
    fn indicator_string_without_value_fails() {
        let mut fx = make_fixture();
        let action = Action::new(
            BodyId(1),
            ActionPayload::IndicatorStringAction(IndicatorStringPayload { value: None }),
            1,
        );
        assert!(matches!(
            action.apply(&mut fx.ctx()),
            Err(ReplayError::Decode {
                source: DecodeError::MissingField { field: "value", .. }
            })
        ));
    }

    #[test]
    fn indicator_dots_and_lines_append() {
        let mut fx = make_fixture();
        for loc in [0, 5] {
            Action::new(
                BodyId(1),
                ActionPayload::IndicatorDotAction(IndicatorDotPayload {
                    loc,
                    color_hex: 0x00FF_8000,
                }),
                1,
            )
            .apply(&mut fx.ctx())
            .unwrap();
        }
        Action::new(
            BodyId(1),
            ActionPayload::IndicatorLineAction(IndicatorLinePayload {
                start_loc: 0,
                end_loc: 15,
                color_hex: 0x0A,
            }),
            1,
        )
        .apply(&mut fx.ctx())
        .unwrap();

        let body = fx.bodies.get_by_id(BodyId(1)).unwrap();
        assert_eq!(body.indicator_dots.len(), 2);
        assert_eq!(body.indicator_dots.get(1).unwrap().location, Vector::from_tile(1, 1));
        assert_eq!(body.indicator_dots.first().unwrap().color, "#ff8000");
        assert_eq!(body.indicator_lines.first().unwrap().end, Vector::from_tile(3, 3));
        assert_eq!(body.indicator_lines.first().unwrap().color, "#00000a");
    }

    #[test]
    fn location_outside_map_fails() {
        let mut fx = make_fixture();
        let action = Action::new(BodyId(1), ActionPayload::PlaceDirt(LocPayload { loc: 16 }), 1);
        assert!(matches!(
            action.apply(&mut fx.ctx()),
            Err(ReplayError::World {
                source: WorldError::LocationOutOfBounds { .. }
            })
        ));
    }

    /// Every kind that only resolves references, with `(actor, payload)`.
    fn resolve_only_actions() -> Vec<(i32, ActionPayload)> {
        let trap = TrapPayload { loc: 3, team: 2 };
        vec![
            (3, ActionPayload::CatFeed(TargetPayload { id: 1 })),
            (1, ActionPayload::RatAttack(TargetPayload { id: 99 })),
            (1, ActionPayload::RatNap(TargetPayload { id: 2 })),
            (
                1,
                ActionPayload::RatCollision(RatCollisionPayload { id: 2, loc: 5 }),
            ),
            (1, ActionPayload::PlaceDirt(LocPayload { loc: 6 })),
            (2, ActionPayload::BreakDirt(LocPayload { loc: 6 })),
            (1, ActionPayload::CheesePickup(LocPayload { loc: 7 })),
            (
                1,
                ActionPayload::CheeseSpawn(CheeseSpawnPayload { loc: 8, amount: 5 }),
            ),
            (3, ActionPayload::CatScratch(LocPayload { loc: 9 })),
            (
                3,
                ActionPayload::CatPounce(PouncePayload {
                    start_loc: 0,
                    end_loc: 15,
                }),
            ),
            (1, ActionPayload::PlaceRatTrap(trap)),
            (2, ActionPayload::PlaceCatTrap(trap)),
            (1, ActionPayload::TriggerRatTrap(trap)),
            (2, ActionPayload::TriggerCatTrap(trap)),
        ]
    }

    #[test]
    fn resolve_only_kinds_leave_state_untouched() {
        let mut fx = make_fixture();
        let bodies_before = fx.bodies.clone();
        let stat_before = fx.stat.clone();
        for (robot, payload) in resolve_only_actions() {
            let tag = payload.tag();
            let result = Action::new(BodyId(robot), payload, 1).apply(&mut fx.ctx());
            assert!(result.is_ok(), "{tag:?} failed: {result:?}");
        }
        assert_eq!(fx.bodies, bodies_before);
        assert_eq!(fx.stat, stat_before);
    }

    #[test]
    fn resolve_only_kinds_fail_on_bad_references() {
        let trap = TrapPayload { loc: 3, team: 1 };
        let body_missing = [
            (1, ActionPayload::RatNap(TargetPayload { id: 42 })),
            (42, ActionPayload::CatFeed(TargetPayload { id: 1 })),
            (
                1,
                ActionPayload::RatCollision(RatCollisionPayload { id: 42, loc: 5 }),
            ),
            (42, ActionPayload::CheesePickup(LocPayload { loc: 7 })),
            (
                42,
                ActionPayload::CheeseSpawn(CheeseSpawnPayload { loc: 8, amount: 5 }),
            ),
            (42, ActionPayload::CatScratch(LocPayload { loc: 9 })),
            (
                42,
                ActionPayload::CatPounce(PouncePayload {
                    start_loc: 0,
                    end_loc: 1,
                }),
            ),
            (42, ActionPayload::PlaceRatTrap(trap)),
            (42, ActionPayload::PlaceCatTrap(trap)),
            (42, ActionPayload::TriggerRatTrap(trap)),
            (42, ActionPayload::TriggerCatTrap(trap)),
        ];
        for (robot, payload) in body_missing {
            let tag = payload.tag();
            let result = Action::new(BodyId(robot), payload, 1).apply(&mut make_fixture().ctx());
            assert!(
                matches!(
                    result,
                    Err(ReplayError::World {
                        source: WorldError::BodyNotFound(BodyId(42))
                    })
                ),
                "{tag:?} returned {result:?}"
            );
        }

        let off_map = [
            ActionPayload::RatCollision(RatCollisionPayload { id: 2, loc: 16 }),
            ActionPayload::PlaceDirt(LocPayload { loc: 16 }),
            ActionPayload::BreakDirt(LocPayload { loc: -1 }),
            ActionPayload::CheesePickup(LocPayload { loc: 16 }),
            ActionPayload::CheeseSpawn(CheeseSpawnPayload { loc: 16, amount: 1 }),
            ActionPayload::CatScratch(LocPayload { loc: 16 }),
            ActionPayload::CatPounce(PouncePayload {
                start_loc: 0,
                end_loc: 16,
            }),
            ActionPayload::PlaceRatTrap(TrapPayload { loc: 16, team: 1 }),
            ActionPayload::TriggerCatTrap(TrapPayload { loc: 16, team: 1 }),
        ];
        for payload in off_map {
            let tag = payload.tag();
            let result = Action::new(BodyId(1), payload, 1).apply(&mut make_fixture().ctx());
            assert!(
                matches!(
                    result,
                    Err(ReplayError::World {
                        source: WorldError::LocationOutOfBounds { .. }
                    })
                ),
                "{tag:?} returned {result:?}"
            );
        }
    }

    #[test]
    fn actor_team_is_acting_body_team() {
        let fx = make_fixture();
        assert_eq!(actor_team(&fx.bodies, BodyId(2)).unwrap(), TeamId(2));
        assert!(actor_team(&fx.bodies, BodyId(50)).is_err());
    }

    #[test]
    fn colors_are_lowercase_and_padded() {
        assert_eq!(color_to_hex_string(0x00AB_CDEF), "#abcdef");
        assert_eq!(color_to_hex_string(0), "#000000");
        assert_eq!(color_to_hex_string(-1), "#ffffff");
    }
}
