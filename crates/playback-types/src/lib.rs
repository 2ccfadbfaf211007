//! Shared type definitions for the match playback engine.
//!
//! This crate is the single source of truth for the values that flow between
//! the schema reader, the world model, the playback engine, and the
//! dashboard. Types consumed by the dashboard are exported to `TypeScript`
//! via `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe wrappers for body and team identifiers
//! - [`enums`] -- Closed wire enumerations (action tags, robot and die types)
//! - [`error`] -- [`DecodeError`] for malformed wire values
//! - [`schema`] -- Reader traits and owned records for turns and round deltas
//! - [`structs`] -- Bodies, indicator overlays, teams, per-team statistics
//! - [`vector`] -- 2D vector arithmetic

pub mod enums;
pub mod error;
pub mod ids;
pub mod schema;
pub mod structs;
pub mod vector;

// Re-export all public types at crate root for convenience.
pub use enums::{ActionTag, DieType, RobotType};
pub use error::DecodeError;
pub use ids::{BodyId, TeamId};
pub use schema::{
    ActionPayload, CheeseSpawnPayload, DamagePayload, DiePayload, IndicatorDotPayload,
    IndicatorLinePayload, IndicatorStringPayload, LocPayload, PouncePayload, RatCollisionPayload,
    RoundDeltaRecord, RoundDeltaView, SpawnPayload, TargetPayload, TeamSlot, TrapPayload,
    TurnRecord, TurnView, WireAction,
};
pub use structs::{Body, IndicatorDot, IndicatorLine, Team, TeamRoundStat};
pub use vector::Vector;
