//! Closed enumerations of the match stream.
//!
//! Each enum mirrors a small-integer field of the wire schema. Decoding goes
//! through `from_wire`, which rejects the reserved zero value where the
//! schema reserves one and every value outside the set.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::DecodeError;

// ---------------------------------------------------------------------------
// Action tags
// ---------------------------------------------------------------------------

/// The kind of an action recorded in a turn.
///
/// The wire value `0` (`NONE`) is not representable: it is rejected during
/// decoding with [`DecodeError::NoneActionTag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ActionTag {
    /// A cat eats a rat.
    CatFeed,
    /// A rat attacks another body.
    RatAttack,
    /// A rat naps (carries) another rat.
    RatNap,
    /// Two rats collide on a tile.
    RatCollision,
    /// Dirt placed on a tile.
    PlaceDirt,
    /// Dirt removed from a tile.
    BreakDirt,
    /// A rat picks cheese up.
    CheesePickup,
    /// Cheese appears on a tile.
    CheeseSpawn,
    /// A cat scratches a tile.
    CatScratch,
    /// A cat pounces from one tile to another.
    CatPounce,
    /// A rat trap is placed.
    PlaceRatTrap,
    /// A cat trap is placed.
    PlaceCatTrap,
    /// A rat trap is triggered.
    TriggerRatTrap,
    /// A cat trap is triggered.
    TriggerCatTrap,
    /// A body takes damage.
    DamageAction,
    /// A body is created.
    SpawnAction,
    /// A body dies.
    DieAction,
    /// Debug overlay: indicator string.
    IndicatorStringAction,
    /// Debug overlay: indicator dot.
    IndicatorDotAction,
    /// Debug overlay: indicator line.
    IndicatorLineAction,
}

impl ActionTag {
    /// Decode a wire tag.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::NoneActionTag`] for `0` and
    /// [`DecodeError::UnknownActionTag`] for anything above `20`.
    pub const fn from_wire(raw: u8) -> Result<Self, DecodeError> {
        let tag = match raw {
            0 => return Err(DecodeError::NoneActionTag),
            1 => Self::CatFeed,
            2 => Self::RatAttack,
            3 => Self::RatNap,
            4 => Self::RatCollision,
            5 => Self::PlaceDirt,
            6 => Self::BreakDirt,
            7 => Self::CheesePickup,
            8 => Self::CheeseSpawn,
            9 => Self::CatScratch,
            10 => Self::CatPounce,
            11 => Self::PlaceRatTrap,
            12 => Self::PlaceCatTrap,
            13 => Self::TriggerRatTrap,
            14 => Self::TriggerCatTrap,
            15 => Self::DamageAction,
            16 => Self::SpawnAction,
            17 => Self::DieAction,
            18 => Self::IndicatorStringAction,
            19 => Self::IndicatorDotAction,
            20 => Self::IndicatorLineAction,
            other => return Err(DecodeError::UnknownActionTag(other)),
        };
        Ok(tag)
    }

    /// The wire value of this tag.
    pub const fn to_wire(self) -> u8 {
        match self {
            Self::CatFeed => 1,
            Self::RatAttack => 2,
            Self::RatNap => 3,
            Self::RatCollision => 4,
            Self::PlaceDirt => 5,
            Self::BreakDirt => 6,
            Self::CheesePickup => 7,
            Self::CheeseSpawn => 8,
            Self::CatScratch => 9,
            Self::CatPounce => 10,
            Self::PlaceRatTrap => 11,
            Self::PlaceCatTrap => 12,
            Self::TriggerRatTrap => 13,
            Self::TriggerCatTrap => 14,
            Self::DamageAction => 15,
            Self::SpawnAction => 16,
            Self::DieAction => 17,
            Self::IndicatorStringAction => 18,
            Self::IndicatorDotAction => 19,
            Self::IndicatorLineAction => 20,
        }
    }
}

// ---------------------------------------------------------------------------
// Robot types
// ---------------------------------------------------------------------------

/// The kind of a simulated body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum RobotType {
    /// A baby rat, the bulk of each team's population.
    Rat,
    /// A rat king.
    RatKing,
    /// A neutral cat.
    Cat,
}

impl RobotType {
    /// Decode a wire robot type. `0` (`NONE`) is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnknownRobotType`] for values outside `1..=3`.
    pub const fn from_wire(raw: u8) -> Result<Self, DecodeError> {
        match raw {
            1 => Ok(Self::Rat),
            2 => Ok(Self::RatKing),
            3 => Ok(Self::Cat),
            other => Err(DecodeError::UnknownRobotType(other)),
        }
    }

    /// Health a freshly spawned body of this kind starts with.
    pub const fn starting_health(self) -> i32 {
        match self {
            Self::Rat => 100,
            Self::RatKing => 500,
            Self::Cat => 10_000,
        }
    }
}

// ---------------------------------------------------------------------------
// Die types
// ---------------------------------------------------------------------------

/// Why a body died.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum DieType {
    /// Ordinary in-game death.
    Unknown,
    /// The controlling program threw an uncaught exception.
    Exception,
}

impl DieType {
    /// Decode a wire die type.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnknownDieType`] for values outside `0..=1`.
    pub const fn from_wire(raw: u8) -> Result<Self, DecodeError> {
        match raw {
            0 => Ok(Self::Unknown),
            1 => Ok(Self::Exception),
            other => Err(DecodeError::UnknownDieType(other)),
        }
    }
}
