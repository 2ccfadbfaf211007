//! Map geometry and body registry for the match playback engine.
//!
//! This crate models the physical side of a round: the static tile map that
//! every round shares, and the registry of bodies that each round owns.
//!
//! # Modules
//!
//! - [`bodies`] -- [`BodyRegistry`]: lookup, spawn, soft-death, movement,
//!   and the rebuild that starts the next round.
//! - [`error`] -- Error types for map and registry operations.
//! - [`map`] -- [`StaticMap`]: dimension, per-tile layers, and flat-index
//!   decoding.

pub mod bodies;
pub mod error;
pub mod map;

// Re-export primary types at crate root.
pub use bodies::BodyRegistry;
pub use error::WorldError;
pub use map::{Dimension, StaticMap};
