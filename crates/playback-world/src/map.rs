//! Static map data and flat-index geometry.
//!
//! The match stream addresses tiles by a flat index, `index = y * width + x`.
//! [`StaticMap`] owns the dimension plus the per-tile layers that never change
//! during a match, and decodes indices back into coordinates.
//!
//! A match shares one `StaticMap` across every round behind an `Arc`, so
//! snapshotting a round never copies map data.

use serde::{Deserialize, Serialize};

use playback_types::Vector;

use crate::error::WorldError;

/// Width and height of a map, in tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    /// Number of columns.
    pub width: i32,
    /// Number of rows.
    pub height: i32,
}

/// Immutable map data for a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticMap {
    /// Map name.
    pub name: String,
    /// Map size.
    pub dimension: Dimension,
    /// Impassable tiles, one entry per tile.
    #[serde(default)]
    pub walls: Vec<bool>,
    /// Tiles covered by dirt at the start of the match, one entry per tile.
    #[serde(default)]
    pub initial_dirt: Vec<bool>,
    /// Flat indices of cheese mines.
    #[serde(default)]
    pub cheese_mines: Vec<i32>,
}

impl StaticMap {
    /// Create an open map (no walls, no dirt, no mines).
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidDimension`] if either side is not
    /// positive or the tile count overflows.
    pub fn new(name: impl Into<String>, width: i32, height: i32) -> Result<Self, WorldError> {
        let dimension = Dimension { width, height };
        let tiles = tile_count(dimension)?;
        Ok(Self {
            name: name.into(),
            dimension,
            walls: vec![false; tiles],
            initial_dirt: vec![false; tiles],
            cheese_mines: Vec::new(),
        })
    }

    /// Check a deserialized map for consistency.
    ///
    /// Empty layers are accepted and filled with `false`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidDimension`], [`WorldError::LayerSizeMismatch`],
    /// or [`WorldError::LocationOutOfBounds`] for a mine outside the map.
    pub fn validate(mut self) -> Result<Self, WorldError> {
        let tiles = tile_count(self.dimension)?;
        for (layer, values) in [("walls", &mut self.walls), ("initial_dirt", &mut self.initial_dirt)] {
            if values.is_empty() {
                values.resize(tiles, false);
            } else if values.len() != tiles {
                return Err(WorldError::LayerSizeMismatch {
                    layer,
                    expected: tiles,
                    actual: values.len(),
                });
            }
        }
        for &mine in &self.cheese_mines {
            self.index_to_location(mine)?;
        }
        Ok(self)
    }

    /// The map size.
    pub const fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Decode a flat index into tile coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::LocationOutOfBounds`] if the index does not name
    /// a tile of this map.
    pub fn index_to_location(&self, index: i32) -> Result<Vector, WorldError> {
        let (x, y) = self.index_to_tile(index)?;
        Ok(Vector::from_tile(x, y))
    }

    /// Decode a flat index into integer tile coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::LocationOutOfBounds`] if the index does not name
    /// a tile of this map.
    pub fn index_to_tile(&self, index: i32) -> Result<(i32, i32), WorldError> {
        let Dimension { width, height } = self.dimension;
        let out_of_bounds = || WorldError::LocationOutOfBounds {
            index,
            width,
            height,
        };
        if index < 0 {
            return Err(out_of_bounds());
        }
        let x = index.checked_rem(width).ok_or_else(out_of_bounds)?;
        let y = index.checked_div(width).ok_or_else(out_of_bounds)?;
        if y >= height {
            return Err(out_of_bounds());
        }
        Ok((x, y))
    }

    /// Encode tile coordinates as a flat index.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::CoordinateOutOfBounds`] if the tile is off the map.
    pub fn location_to_index(&self, x: i32, y: i32) -> Result<i32, WorldError> {
        if !self.contains(x, y) {
            return Err(WorldError::CoordinateOutOfBounds { x, y });
        }
        y.checked_mul(self.dimension.width)
            .and_then(|row| row.checked_add(x))
            .ok_or(WorldError::CoordinateOutOfBounds { x, y })
    }

    /// Whether `(x, y)` is a tile of this map.
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.dimension.width && y < self.dimension.height
    }
}

/// Number of tiles for a dimension.
fn tile_count(dimension: Dimension) -> Result<usize, WorldError> {
    let Dimension { width, height } = dimension;
    let invalid = WorldError::InvalidDimension { width, height };
    if width <= 0 || height <= 0 {
        return Err(invalid);
    }
    width
        .checked_mul(height)
        .and_then(|tiles| usize::try_from(tiles).ok())
        .ok_or(invalid)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn make_map() -> StaticMap {
        StaticMap::new("test", 5, 4).unwrap()
    }

    #[test]
    fn index_decodes_row_major() {
        let map = make_map();
        assert_eq!(map.index_to_tile(0).unwrap(), (0, 0));
        assert_eq!(map.index_to_tile(7).unwrap(), (2, 1));
        assert_eq!(map.index_to_tile(19).unwrap(), (4, 3));
    }

    #[test]
    fn index_outside_map_is_rejected() {
        let map = make_map();
        assert!(matches!(
            map.index_to_location(20),
            Err(WorldError::LocationOutOfBounds { index: 20, .. })
        ));
        assert!(map.index_to_location(-1).is_err());
    }

    #[test]
    fn location_to_index_inverts_decode() {
        let map = make_map();
        let index = map.location_to_index(3, 2).unwrap();
        assert_eq!(index, 13);
        assert_eq!(map.index_to_tile(index).unwrap(), (3, 2));
        assert!(map.location_to_index(5, 0).is_err());
    }

    #[test]
    fn zero_dimension_is_invalid() {
        assert!(matches!(
            StaticMap::new("empty", 0, 3),
            Err(WorldError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn validate_fills_empty_layers_and_rejects_short_ones() {
        let json = r#"{ "name": "m", "dimension": { "width": 2, "height": 2 }, "cheese_mines": [3] }"#;
        let map: StaticMap = serde_json::from_str(json).unwrap();
        let map = map.validate().unwrap();
        assert_eq!(map.walls, vec![false; 4]);
        assert_eq!(map.initial_dirt.len(), 4);

        let mut bad = make_map();
        bad.walls.truncate(3);
        assert!(matches!(
            bad.validate(),
            Err(WorldError::LayerSizeMismatch { layer: "walls", .. })
        ));
    }

    #[test]
    fn mine_outside_map_fails_validation() {
        let mut map = make_map();
        map.cheese_mines.push(99);
        assert!(map.validate().is_err());
    }
}
