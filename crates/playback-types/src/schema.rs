//! The schema-reader boundary.
//!
//! The binary reader of the match stream lives outside this workspace. What
//! the playback engine needs from it is captured by two traits:
//!
//! - [`TurnView`] -- one body's actions for one round, read through a tag
//!   array plus a tag-indexed payload accessor.
//! - [`RoundDeltaView`] -- per-team-slot economy and population arrays plus
//!   the round's turns.
//!
//! Accessors return `Option` the way the generated reader does. Callers treat
//! every numeric field as mandatory and turn a `None` into
//! [`DecodeError::MissingField`].
//!
//! [`TurnRecord`] and [`RoundDeltaRecord`] are owned, serde-friendly
//! implementations used by the runner binary and by tests.
//!
//! [`DecodeError::MissingField`]: crate::DecodeError::MissingField

use serde::{Deserialize, Serialize};

use crate::enums::ActionTag;

// ---------------------------------------------------------------------------
// Action payloads
// ---------------------------------------------------------------------------

/// Payload carrying only a target body id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetPayload {
    /// Target body id.
    pub id: i32,
}

/// Payload carrying only a map location index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocPayload {
    /// Flat map index.
    pub loc: i32,
}

/// Payload of [`ActionTag::RatCollision`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatCollisionPayload {
    /// The other body involved.
    pub id: i32,
    /// Flat map index of the collision.
    pub loc: i32,
}

/// Payload of [`ActionTag::CheeseSpawn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheeseSpawnPayload {
    /// Flat map index.
    pub loc: i32,
    /// Amount of cheese spawned.
    pub amount: i32,
}

/// Payload of [`ActionTag::CatPounce`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PouncePayload {
    /// Flat map index the pounce starts from.
    pub start_loc: i32,
    /// Flat map index the pounce lands on.
    pub end_loc: i32,
}

/// Payload of the four trap actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrapPayload {
    /// Flat map index of the trap.
    pub loc: i32,
    /// Team recorded by the engine. The acting body's own team is what
    /// playback uses.
    pub team: i32,
}

/// Payload of [`ActionTag::DamageAction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamagePayload {
    /// Body receiving the damage.
    pub id: i32,
    /// Damage amount.
    pub damage: i32,
}

/// Payload of [`ActionTag::SpawnAction`]; also used for the initial bodies
/// listed in the match header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnPayload {
    /// Id of the new body.
    pub id: i32,
    /// Tile column.
    pub x: i32,
    /// Tile row.
    pub y: i32,
    /// Owning team id, `0` for neutral.
    pub team: i32,
    /// Wire robot type.
    pub robot_type: u8,
}

/// Payload of [`ActionTag::DieAction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiePayload {
    /// Body that died.
    pub id: i32,
    /// Wire die type.
    pub die_type: u8,
}

/// Payload of [`ActionTag::IndicatorStringAction`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorStringPayload {
    /// The string. Mandatory despite the `Option`.
    pub value: Option<String>,
}

/// Payload of [`ActionTag::IndicatorDotAction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorDotPayload {
    /// Flat map index.
    pub loc: i32,
    /// Packed `0xRRGGBB` color.
    pub color_hex: i32,
}

/// Payload of [`ActionTag::IndicatorLineAction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorLinePayload {
    /// Flat map index of the start.
    pub start_loc: i32,
    /// Flat map index of the end.
    pub end_loc: i32,
    /// Packed `0xRRGGBB` color.
    pub color_hex: i32,
}

/// The decoded payload of one action, one variant per [`ActionTag`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionPayload {
    /// Cat eats the target rat.
    CatFeed(TargetPayload),
    /// Rat attacks the target.
    RatAttack(TargetPayload),
    /// Rat naps the target rat.
    RatNap(TargetPayload),
    /// Rats collide.
    RatCollision(RatCollisionPayload),
    /// Dirt placed.
    PlaceDirt(LocPayload),
    /// Dirt broken.
    BreakDirt(LocPayload),
    /// Cheese picked up.
    CheesePickup(LocPayload),
    /// Cheese spawned.
    CheeseSpawn(CheeseSpawnPayload),
    /// Cat scratches a tile.
    CatScratch(LocPayload),
    /// Cat pounces.
    CatPounce(PouncePayload),
    /// Rat trap placed.
    PlaceRatTrap(TrapPayload),
    /// Cat trap placed.
    PlaceCatTrap(TrapPayload),
    /// Rat trap triggered.
    TriggerRatTrap(TrapPayload),
    /// Cat trap triggered.
    TriggerCatTrap(TrapPayload),
    /// Damage dealt.
    DamageAction(DamagePayload),
    /// Body spawned.
    SpawnAction(SpawnPayload),
    /// Body died.
    DieAction(DiePayload),
    /// Indicator string set.
    IndicatorStringAction(IndicatorStringPayload),
    /// Indicator dot added.
    IndicatorDotAction(IndicatorDotPayload),
    /// Indicator line added.
    IndicatorLineAction(IndicatorLinePayload),
}

impl ActionPayload {
    /// The tag this payload belongs to.
    pub const fn tag(&self) -> ActionTag {
        match self {
            Self::CatFeed(_) => ActionTag::CatFeed,
            Self::RatAttack(_) => ActionTag::RatAttack,
            Self::RatNap(_) => ActionTag::RatNap,
            Self::RatCollision(_) => ActionTag::RatCollision,
            Self::PlaceDirt(_) => ActionTag::PlaceDirt,
            Self::BreakDirt(_) => ActionTag::BreakDirt,
            Self::CheesePickup(_) => ActionTag::CheesePickup,
            Self::CheeseSpawn(_) => ActionTag::CheeseSpawn,
            Self::CatScratch(_) => ActionTag::CatScratch,
            Self::CatPounce(_) => ActionTag::CatPounce,
            Self::PlaceRatTrap(_) => ActionTag::PlaceRatTrap,
            Self::PlaceCatTrap(_) => ActionTag::PlaceCatTrap,
            Self::TriggerRatTrap(_) => ActionTag::TriggerRatTrap,
            Self::TriggerCatTrap(_) => ActionTag::TriggerCatTrap,
            Self::DamageAction(_) => ActionTag::DamageAction,
            Self::SpawnAction(_) => ActionTag::SpawnAction,
            Self::DieAction(_) => ActionTag::DieAction,
            Self::IndicatorStringAction(_) => ActionTag::IndicatorStringAction,
            Self::IndicatorDotAction(_) => ActionTag::IndicatorDotAction,
            Self::IndicatorLineAction(_) => ActionTag::IndicatorLineAction,
        }
    }
}

// ---------------------------------------------------------------------------
// Reader traits
// ---------------------------------------------------------------------------

/// Read access to one turn: the actions one body produced in one round.
pub trait TurnView {
    /// Id of the acting body.
    fn robot_id(&self) -> i32;

    /// Number of entries in the action tag array.
    fn actions_type_len(&self) -> usize;

    /// Wire tag of the action at `index`.
    fn actions_type(&self, index: usize) -> Option<u8>;

    /// Payload of the action at `index`, read as the kind named by `tag`.
    fn actions(&self, index: usize, tag: ActionTag) -> Option<ActionPayload>;

    /// Whether the match is being played in cooperative mode.
    fn is_cooperation(&self) -> bool;

    /// Tile the acting body ended its turn on, when the turn records one.
    fn end_location(&self) -> Option<(i32, i32)>;
}

/// Read access to one round delta.
///
/// Per-team arrays are indexed by team slot `0..team_ids_len()`, which is
/// unrelated to the one-based team id stored in the slot.
pub trait RoundDeltaView {
    /// Turn type yielded by [`RoundDeltaView::turns`].
    type Turn: TurnView;

    /// Zero-based round id declared by the delta.
    fn round_id(&self) -> i32;

    /// Number of team slots.
    fn team_ids_len(&self) -> usize;

    /// One-based team id in `slot`.
    fn team_ids(&self, slot: usize) -> Option<i32>;

    /// Cumulative cheese transferred by the team in `slot`.
    fn team_cheese_transferred(&self, slot: usize) -> Option<i32>;

    /// Living rat kings of the team in `slot`.
    fn team_alive_rat_kings(&self, slot: usize) -> Option<i32>;

    /// Living baby rats of the team in `slot`, as reported by the engine.
    fn team_alive_baby_rats(&self, slot: usize) -> Option<i32>;

    /// Dirt held by the team in `slot`.
    fn team_dirt_amounts(&self, slot: usize) -> Option<i32>;

    /// Rat traps of the team in `slot`.
    fn team_rat_trap_count(&self, slot: usize) -> Option<i32>;

    /// Cat traps of the team in `slot`.
    fn team_cat_trap_count(&self, slot: usize) -> Option<i32>;

    /// Number of turns in the round.
    fn turns_len(&self) -> usize;

    /// Turn at `index`.
    fn turns(&self, index: usize) -> Option<&Self::Turn>;
}

// ---------------------------------------------------------------------------
// Owned records
// ---------------------------------------------------------------------------

/// One entry of a turn's action list as stored in an owned record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireAction {
    /// Raw wire tag.
    pub tag: u8,
    /// Decoded payload, absent when the record is malformed.
    #[serde(default)]
    pub payload: Option<ActionPayload>,
}

impl WireAction {
    /// Build a well-formed entry whose tag matches its payload.
    pub const fn from_payload(payload: ActionPayload) -> Self {
        Self {
            tag: payload.tag().to_wire(),
            payload: Some(payload),
        }
    }
}

/// Owned [`TurnView`] implementation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Acting body id.
    pub robot_id: i32,
    /// Cooperative-mode flag.
    #[serde(default)]
    pub cooperation: bool,
    /// End-of-turn tile column.
    #[serde(default)]
    pub x: Option<i32>,
    /// End-of-turn tile row.
    #[serde(default)]
    pub y: Option<i32>,
    /// Actions in the order the engine recorded them.
    #[serde(default)]
    pub actions: Vec<WireAction>,
}

impl TurnRecord {
    /// A turn for `robot_id` with the given payloads and no movement.
    pub fn with_actions(robot_id: i32, payloads: impl IntoIterator<Item = ActionPayload>) -> Self {
        Self {
            robot_id,
            actions: payloads.into_iter().map(WireAction::from_payload).collect(),
            ..Self::default()
        }
    }
}

impl TurnView for TurnRecord {
    fn robot_id(&self) -> i32 {
        self.robot_id
    }

    fn actions_type_len(&self) -> usize {
        self.actions.len()
    }

    fn actions_type(&self, index: usize) -> Option<u8> {
        self.actions.get(index).map(|a| a.tag)
    }

    fn actions(&self, index: usize, _tag: ActionTag) -> Option<ActionPayload> {
        self.actions.get(index).and_then(|a| a.payload.clone())
    }

    fn is_cooperation(&self) -> bool {
        self.cooperation
    }

    fn end_location(&self) -> Option<(i32, i32)> {
        self.x.zip(self.y)
    }
}

/// Values of one team slot, used to build a [`RoundDeltaRecord`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeamSlot {
    /// One-based team id.
    pub team_id: i32,
    /// Cumulative cheese transferred.
    pub cheese: i32,
    /// Living rat kings.
    pub rat_kings: i32,
    /// Living baby rats as reported by the engine.
    pub baby_rats: i32,
    /// Dirt held.
    pub dirt: i32,
    /// Rat traps.
    pub rat_traps: i32,
    /// Cat traps.
    pub cat_traps: i32,
}

/// Owned [`RoundDeltaView`] implementation laid out like the wire schema:
/// one array per field, indexed by team slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundDeltaRecord {
    /// Zero-based round id.
    pub round_id: i32,
    /// One-based team ids per slot.
    #[serde(default)]
    pub team_ids: Vec<i32>,
    /// Cumulative cheese per slot.
    #[serde(default)]
    pub team_cheese_transferred: Vec<i32>,
    /// Living rat kings per slot.
    #[serde(default)]
    pub team_alive_rat_kings: Vec<i32>,
    /// Living baby rats per slot (advisory).
    #[serde(default)]
    pub team_alive_baby_rats: Vec<i32>,
    /// Dirt per slot.
    #[serde(default)]
    pub team_dirt_amounts: Vec<i32>,
    /// Rat traps per slot.
    #[serde(default)]
    pub team_rat_trap_count: Vec<i32>,
    /// Cat traps per slot.
    #[serde(default)]
    pub team_cat_trap_count: Vec<i32>,
    /// Turns played this round.
    #[serde(default)]
    pub turns: Vec<TurnRecord>,
}

impl RoundDeltaRecord {
    /// An empty delta for the given zero-based round id.
    pub fn new(round_id: i32) -> Self {
        Self {
            round_id,
            ..Self::default()
        }
    }

    /// Append a team slot.
    #[must_use]
    pub fn with_team(mut self, slot: TeamSlot) -> Self {
        self.team_ids.push(slot.team_id);
        self.team_cheese_transferred.push(slot.cheese);
        self.team_alive_rat_kings.push(slot.rat_kings);
        self.team_alive_baby_rats.push(slot.baby_rats);
        self.team_dirt_amounts.push(slot.dirt);
        self.team_rat_trap_count.push(slot.rat_traps);
        self.team_cat_trap_count.push(slot.cat_traps);
        self
    }

    /// Append a turn.
    #[must_use]
    pub fn with_turn(mut self, turn: TurnRecord) -> Self {
        self.turns.push(turn);
        self
    }
}

impl RoundDeltaView for RoundDeltaRecord {
    type Turn = TurnRecord;

    fn round_id(&self) -> i32 {
        self.round_id
    }

    fn team_ids_len(&self) -> usize {
        self.team_ids.len()
    }

    fn team_ids(&self, slot: usize) -> Option<i32> {
        self.team_ids.get(slot).copied()
    }

    fn team_cheese_transferred(&self, slot: usize) -> Option<i32> {
        self.team_cheese_transferred.get(slot).copied()
    }

    fn team_alive_rat_kings(&self, slot: usize) -> Option<i32> {
        self.team_alive_rat_kings.get(slot).copied()
    }

    fn team_alive_baby_rats(&self, slot: usize) -> Option<i32> {
        self.team_alive_baby_rats.get(slot).copied()
    }

    fn team_dirt_amounts(&self, slot: usize) -> Option<i32> {
        self.team_dirt_amounts.get(slot).copied()
    }

    fn team_rat_trap_count(&self, slot: usize) -> Option<i32> {
        self.team_rat_trap_count.get(slot).copied()
    }

    fn team_cat_trap_count(&self, slot: usize) -> Option<i32> {
        self.team_cat_trap_count.get(slot).copied()
    }

    fn turns_len(&self) -> usize {
        self.turns.len()
    }

    fn turns(&self, index: usize) -> Option<&TurnRecord> {
        self.turns.get(index)
    }
}
