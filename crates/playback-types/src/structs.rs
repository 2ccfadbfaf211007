//! Core entity structs shared by the world model, the playback engine, and
//! the dashboard bindings.
//!
//! Every struct here is a plain aggregate of owned values with no shared
//! mutable sub-structure, so `Clone` produces a fully independent copy. Round
//! snapshots rely on that.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::RobotType;
use crate::ids::{BodyId, TeamId};
use crate::vector::Vector;

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

/// One of the two competing teams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Team {
    /// One-based team identifier.
    pub id: TeamId,
    /// Display name.
    pub name: String,
    /// Name of the player package that controlled the team.
    #[serde(default)]
    pub package_name: String,
    /// Render color as `#rrggbb`.
    pub color: String,
}

// ---------------------------------------------------------------------------
// Bodies
// ---------------------------------------------------------------------------

/// A debug dot drawn by a body's controlling program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct IndicatorDot {
    /// Tile the dot is drawn on.
    pub location: Vector,
    /// Color as `#rrggbb`.
    pub color: String,
}

/// A debug line drawn by a body's controlling program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct IndicatorLine {
    /// Start tile.
    pub start: Vector,
    /// End tile.
    pub end: Vector,
    /// Color as `#rrggbb`.
    pub color: String,
}

/// A simulated entity.
///
/// Bodies are never removed from a round's registry once spawned; death is
/// the `dead` flag. Removal only happens when the registry is rebuilt for
/// the following round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Body {
    /// Identifier, unique within the match.
    pub id: BodyId,
    /// Owning team; [`TeamId::NEUTRAL`] for cats.
    pub team: TeamId,
    /// Kind of body.
    pub robot_type: RobotType,
    /// Health points, never negative.
    pub hp: i32,
    /// Whether the body has died this round or earlier.
    pub dead: bool,
    /// Tile position at the end of this round.
    pub pos: Vector,
    /// Tile position at the end of the previous round.
    pub prev_pos: Vector,
    /// Debug string set by the controlling program this round.
    pub indicator_string: String,
    /// Debug dots added this round.
    pub indicator_dots: Vec<IndicatorDot>,
    /// Debug lines added this round.
    pub indicator_lines: Vec<IndicatorLine>,
}

impl Body {
    /// Create a living body at `pos` with the starting health of its kind.
    pub fn new(id: BodyId, team: TeamId, robot_type: RobotType, pos: Vector) -> Self {
        Self {
            id,
            team,
            robot_type,
            hp: robot_type.starting_health(),
            dead: false,
            pos,
            prev_pos: pos,
            indicator_string: String::new(),
            indicator_dots: Vec::new(),
            indicator_lines: Vec::new(),
        }
    }

    /// Whether the body is still alive.
    pub const fn is_alive(&self) -> bool {
        !self.dead
    }

    /// Position between the previous and current round, `factor` in `[0, 1]`.
    pub fn interpolated_pos(&self, factor: f64) -> Vector {
        self.prev_pos.lerp(self.pos, factor.clamp(0.0, 1.0))
    }

    /// Drop this round's debug overlays.
    pub fn clear_indicators(&mut self) {
        self.indicator_string.clear();
        self.indicator_dots.clear();
        self.indicator_lines.clear();
    }
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Per-team aggregate for one round.
///
/// `cheese_percent` is, despite its name, the cheese gained this round: the
/// cumulative amount minus the previous round's cumulative amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TeamRoundStat {
    /// Whether any turn this round reported cooperative play.
    pub game_mode_cooperation: bool,
    /// Cumulative cheese transferred.
    pub cheese_amount: i32,
    /// Cheese gained since the previous round.
    pub cheese_percent: i32,
    /// Cumulative damage dealt to cats.
    pub cat_damage_amount: i32,
    /// This team's share of the cat damage dealt by both teams.
    pub cat_damage_percent: f64,
    /// Living rat kings.
    pub rat_king_count: i32,
    /// This team's share of the living rat kings of both teams.
    pub rat_king_percent: f64,
    /// Dirt held by the team.
    pub dirt_amount: i32,
    /// Living baby rats, recounted from the body registry.
    pub baby_rat_count: i32,
    /// Rat traps on the map.
    pub rat_trap_amount: i32,
    /// Cat traps on the map.
    pub cat_trap_amount: i32,
}

impl Default for TeamRoundStat {
    fn default() -> Self {
        Self {
            game_mode_cooperation: true,
            cheese_amount: 0,
            cheese_percent: 0,
            cat_damage_amount: 0,
            cat_damage_percent: 0.0,
            rat_king_count: 0,
            rat_king_percent: 0.0,
            dirt_amount: 0,
            baby_rat_count: 0,
            rat_trap_amount: 0,
            cat_trap_amount: 0,
        }
    }
}
