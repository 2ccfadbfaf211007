//! Renderer-neutral drawing of live actions.
//!
//! A renderer walks the current round's live actions and turns each into a
//! handful of [`DrawCommand`]s. Coordinates are tile units; converting them
//! to screen space is the renderer's business. Actions whose bodies or tiles
//! cannot be resolved in the given round draw nothing.

use playback_types::{ActionPayload, BodyId, TeamId, Vector};
use serde::Serialize;

use super::action::{Action, actor_team};
use crate::round::Round;

/// Width of attack lines, in tiles.
const ATTACK_LINE_WIDTH: f64 = 0.06;

/// Opacity of the line showing an attack's true direction.
const ATTACK_TRACE_OPACITY: f64 = 0.5;

/// Length of the attack projectile, as a fraction of the attack distance.
const PROJECTILE_LENGTH: f64 = 0.2;

/// Symbol drawn on a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Marker {
    /// A cat ate a rat here.
    Feed,
    /// A rat was napped here.
    Nap,
    /// Two rats collided here.
    Collision,
    /// Dirt was placed.
    Dirt,
    /// Dirt was broken.
    BrokenDirt,
    /// Cheese appeared or was picked up.
    Cheese,
    /// A cat scratched the tile.
    Scratch,
    /// A rat trap was placed.
    RatTrap,
    /// A cat trap was placed.
    CatTrap,
    /// A trap went off.
    TrapTriggered,
}

/// One primitive for the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawCommand {
    /// A straight segment tinted with a team's color.
    Line {
        /// Start point.
        from: Vector,
        /// End point.
        to: Vector,
        /// Team whose color and offset are used.
        team: TeamId,
        /// Stroke width in tiles.
        width: f64,
        /// Opacity in `[0, 1]`.
        opacity: f64,
    },
    /// A symbol on one tile.
    TileMarker {
        /// Tile position.
        at: Vector,
        /// What to draw.
        marker: Marker,
        /// Team whose color is used.
        team: TeamId,
    },
}

impl Action {
    /// Draw commands for this action in `round`, with `interpolation` the
    /// progress in `[0, 1]` from the previous round to this one.
    pub fn draw(&self, round: &Round, interpolation: f64) -> Vec<DrawCommand> {
        let f = interpolation.clamp(0.0, 1.0);
        match &self.payload {
            ActionPayload::RatAttack(target) => self.draw_attack(round, BodyId(target.id), f),
            ActionPayload::CatFeed(target) => {
                self.body_marker(round, BodyId(target.id), Marker::Feed, f)
            }
            ActionPayload::RatNap(target) => {
                self.body_marker(round, BodyId(target.id), Marker::Nap, f)
            }
            ActionPayload::RatCollision(collision) => {
                self.tile_marker(round, collision.loc, Marker::Collision)
            }
            ActionPayload::PlaceDirt(at) => self.tile_marker(round, at.loc, Marker::Dirt),
            ActionPayload::BreakDirt(at) => self.tile_marker(round, at.loc, Marker::BrokenDirt),
            ActionPayload::CheesePickup(at) => self.tile_marker(round, at.loc, Marker::Cheese),
            ActionPayload::CheeseSpawn(spawn) => {
                self.tile_marker(round, spawn.loc, Marker::Cheese)
            }
            ActionPayload::CatScratch(at) => self.tile_marker(round, at.loc, Marker::Scratch),
            ActionPayload::CatPounce(pounce) => {
                let map = round.map();
                match (
                    map.index_to_location(pounce.start_loc),
                    map.index_to_location(pounce.end_loc),
                ) {
                    (Ok(from), Ok(to)) => vec![DrawCommand::Line {
                        from,
                        to,
                        team: TeamId::NEUTRAL,
                        width: ATTACK_LINE_WIDTH,
                        opacity: 1.0,
                    }],
                    _ => Vec::new(),
                }
            }
            ActionPayload::PlaceRatTrap(trap) => self.tile_marker(round, trap.loc, Marker::RatTrap),
            ActionPayload::PlaceCatTrap(trap) => self.tile_marker(round, trap.loc, Marker::CatTrap),
            ActionPayload::TriggerRatTrap(trap) | ActionPayload::TriggerCatTrap(trap) => {
                self.tile_marker(round, trap.loc, Marker::TrapTriggered)
            }
            // Bodies render their own health and overlays.
            ActionPayload::DamageAction(_)
            | ActionPayload::SpawnAction(_)
            | ActionPayload::DieAction(_)
            | ActionPayload::IndicatorStringAction(_)
            | ActionPayload::IndicatorDotAction(_)
            | ActionPayload::IndicatorLineAction(_) => Vec::new(),
        }
    }

    /// The true direction of the attack plus a short projectile travelling
    /// along it.
    fn draw_attack(&self, round: &Round, target: BodyId, f: f64) -> Vec<DrawCommand> {
        let bodies = round.bodies();
        let (Ok(src), Ok(dst)) = (bodies.get_by_id(self.robot_id), bodies.get_by_id(target))
        else {
            return Vec::new();
        };

        let from = src.interpolated_pos(f);
        let to = dst.interpolated_pos(f);
        let dir = to - from;
        let len = dir.length();
        let unit = dir.normalized();
        let projectile_start = from + unit * (len * f);
        let projectile_end = from + unit * (len * (f + PROJECTILE_LENGTH).min(1.0));

        vec![
            DrawCommand::Line {
                from,
                to,
                team: src.team,
                width: ATTACK_LINE_WIDTH,
                opacity: ATTACK_TRACE_OPACITY,
            },
            DrawCommand::Line {
                from: projectile_start,
                to: projectile_end,
                team: src.team,
                width: ATTACK_LINE_WIDTH,
                opacity: 1.0,
            },
        ]
    }

    fn body_marker(&self, round: &Round, target: BodyId, marker: Marker, f: f64) -> Vec<DrawCommand> {
        let bodies = round.bodies();
        let (Ok(actor), Ok(body)) = (bodies.get_by_id(self.robot_id), bodies.get_by_id(target))
        else {
            return Vec::new();
        };
        vec![DrawCommand::TileMarker {
            at: body.interpolated_pos(f),
            marker,
            team: actor.team,
        }]
    }

    fn tile_marker(&self, round: &Round, loc: i32, marker: Marker) -> Vec<DrawCommand> {
        let Ok(at) = round.map().index_to_location(loc) else {
            return Vec::new();
        };
        let team = actor_team(round.bodies(), self.robot_id).unwrap_or(TeamId::NEUTRAL);
        vec![DrawCommand::TileMarker { at, marker, team }]
    }
}
