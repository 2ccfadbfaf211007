//! Error types for the `playback-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`].

use playback_types::{BodyId, DecodeError};

/// Errors that can occur during map and registry operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A body was not found in the registry.
    #[error("body not found: {0}")]
    BodyNotFound(BodyId),

    /// A body was spawned with an id that is already registered.
    #[error("duplicate body id: {0}")]
    DuplicateBody(BodyId),

    /// A flat map index lies outside the map.
    #[error("location index {index} outside {width}x{height} map")]
    LocationOutOfBounds {
        /// The offending index.
        index: i32,
        /// Map width.
        width: i32,
        /// Map height.
        height: i32,
    },

    /// A tile coordinate lies outside the map.
    #[error("coordinate ({x}, {y}) outside the map")]
    CoordinateOutOfBounds {
        /// Column.
        x: i32,
        /// Row.
        y: i32,
    },

    /// The map dimensions are not positive or their product overflows.
    #[error("invalid map dimension {width}x{height}")]
    InvalidDimension {
        /// Declared width.
        width: i32,
        /// Declared height.
        height: i32,
    },

    /// A per-tile layer does not have one entry per tile.
    #[error("map layer {layer} has {actual} entries, expected {expected}")]
    LayerSizeMismatch {
        /// Name of the layer.
        layer: &'static str,
        /// Number of tiles on the map.
        expected: usize,
        /// Number of entries in the layer.
        actual: usize,
    },

    /// A wire value in a spawn record could not be decoded.
    #[error("decode error: {source}")]
    Decode {
        /// The underlying decode error.
        #[from]
        source: DecodeError,
    },
}
