//! Per-round registry of simulated bodies.
//!
//! The [`BodyRegistry`] indexes every body of a round by its [`BodyId`].
//! Bodies are soft-deleted: [`BodyRegistry::mark_body_as_dead`] sets the
//! `dead` flag and keeps the entry so ids stay resolvable for the rest of the
//! round. Dead bodies are dropped only by [`BodyRegistry::copy_for_next_round`],
//! which remembers their ids so a later spawn cannot reuse them.

use std::collections::{BTreeMap, BTreeSet};

use playback_types::{Body, BodyId, RobotType, SpawnPayload, TeamId, Vector};
use tracing::debug;

use crate::error::WorldError;
use crate::map::StaticMap;

/// All bodies of one round, keyed by id.
///
/// Iteration order is ascending id, which keeps replays deterministic.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BodyRegistry {
    /// Bodies indexed by identifier.
    bodies: BTreeMap<BodyId, Body>,
    /// Ids of bodies that died in an earlier round of the match.
    #[serde(default)]
    retired: BTreeSet<BodyId>,
}

impl BodyRegistry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            bodies: BTreeMap::new(),
            retired: BTreeSet::new(),
        }
    }

    /// Build a registry from the initial bodies of a match header.
    ///
    /// # Errors
    ///
    /// Fails like [`BodyRegistry::spawn_body_from_action`].
    pub fn from_initial(spawns: &[SpawnPayload], map: &StaticMap) -> Result<Self, WorldError> {
        let mut registry = Self::new();
        for spawn in spawns {
            registry.spawn_body_from_action(spawn, map)?;
        }
        Ok(registry)
    }

    /// Look up a body.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::BodyNotFound`] if no body has this id.
    pub fn get_by_id(&self, id: BodyId) -> Result<&Body, WorldError> {
        self.bodies.get(&id).ok_or(WorldError::BodyNotFound(id))
    }

    /// Look up a body for mutation.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::BodyNotFound`] if no body has this id.
    pub fn get_by_id_mut(&mut self, id: BodyId) -> Result<&mut Body, WorldError> {
        self.bodies.get_mut(&id).ok_or(WorldError::BodyNotFound(id))
    }

    /// Whether a body with this id is registered, dead or alive.
    pub fn contains(&self, id: BodyId) -> bool {
        self.bodies.contains_key(&id)
    }

    /// Create a body from a spawn record.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateBody`] if the id is registered or was
    /// used by a body that died earlier in the match,
    /// [`WorldError::CoordinateOutOfBounds`] if the tile is off `map`, and
    /// [`WorldError::Decode`] if the robot type is not a known kind.
    pub fn spawn_body_from_action(
        &mut self,
        spawn: &SpawnPayload,
        map: &StaticMap,
    ) -> Result<&Body, WorldError> {
        let id = BodyId(spawn.id);
        if self.bodies.contains_key(&id) || self.retired.contains(&id) {
            return Err(WorldError::DuplicateBody(id));
        }
        map.location_to_index(spawn.x, spawn.y)?;
        let robot_type = RobotType::from_wire(spawn.robot_type)?;
        let body = Body::new(id, TeamId(spawn.team), robot_type, Vector::from_tile(spawn.x, spawn.y));
        debug!(body = %id, team = spawn.team, ?robot_type, "Body spawned");
        Ok(self.bodies.entry(id).or_insert(body))
    }

    /// Flag a body as dead. The entry stays in the registry.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::BodyNotFound`] if no body has this id.
    pub fn mark_body_as_dead(&mut self, id: BodyId) -> Result<(), WorldError> {
        let body = self.get_by_id_mut(id)?;
        body.dead = true;
        Ok(())
    }

    /// Move a body to the tile it ended its turn on.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::CoordinateOutOfBounds`] if the tile is off `map`
    /// and [`WorldError::BodyNotFound`] if no body has this id.
    pub fn move_body(
        &mut self,
        id: BodyId,
        x: i32,
        y: i32,
        map: &StaticMap,
    ) -> Result<(), WorldError> {
        map.location_to_index(x, y)?;
        let body = self.get_by_id_mut(id)?;
        body.pos = Vector::from_tile(x, y);
        Ok(())
    }

    /// Iterate over all bodies, dead ones included, in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Body> {
        self.bodies.values()
    }

    /// Number of registered bodies, dead ones included.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Build the registry the following round starts from.
    ///
    /// Bodies that died this round are dropped and their ids retired. Every
    /// surviving body's indicator overlays are cleared and its current
    /// position becomes its previous position.
    #[must_use]
    pub fn copy_for_next_round(&self) -> Self {
        let mut retired = self.retired.clone();
        retired.extend(
            self.bodies
                .values()
                .filter(|body| body.dead)
                .map(|body| body.id),
        );
        let bodies = self
            .bodies
            .iter()
            .filter(|(_, body)| body.is_alive())
            .map(|(&id, body)| {
                let mut next = body.clone();
                next.clear_indicators();
                next.prev_pos = next.pos;
                (id, next)
            })
            .collect();
        Self { bodies, retired }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use playback_types::IndicatorDot;

    use super::*;

    fn make_map() -> StaticMap {
        StaticMap::new("registry", 6, 6).unwrap()
    }

    fn spawn(id: i32, team: i32, robot_type: u8) -> SpawnPayload {
        SpawnPayload {
            id,
            x: 1,
            y: 2,
            team,
            robot_type,
        }
    }

    fn make_registry() -> BodyRegistry {
        BodyRegistry::from_initial(
            &[spawn(1, 1, 1), spawn(2, 2, 1), spawn(3, 0, 3)],
            &make_map(),
        )
        .unwrap()
    }

    #[test]
    fn spawned_body_is_resolvable() {
        let registry = make_registry();
        let body = registry.get_by_id(BodyId(2)).unwrap();
        assert_eq!(body.team, TeamId(2));
        assert_eq!(body.robot_type, RobotType::Rat);
        assert_eq!(body.pos, Vector::from_tile(1, 2));
    }

    #[test]
    fn duplicate_spawn_is_rejected() {
        let mut registry = make_registry();
        let result = registry.spawn_body_from_action(&spawn(1, 1, 1), &make_map());
        assert!(matches!(result, Err(WorldError::DuplicateBody(BodyId(1)))));
    }

    #[test]
    fn spawn_with_none_robot_type_fails() {
        let mut registry = BodyRegistry::new();
        assert!(matches!(
            registry.spawn_body_from_action(&spawn(9, 1, 0), &make_map()),
            Err(WorldError::Decode { .. })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn dead_body_stays_registered() {
        let mut registry = make_registry();
        registry.mark_body_as_dead(BodyId(1)).unwrap();
        let body = registry.get_by_id(BodyId(1)).unwrap();
        assert!(body.dead);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.iter().filter(|b| b.is_alive()).count(), 2);
    }

    #[test]
    fn unknown_body_lookup_fails() {
        let mut registry = make_registry();
        assert!(matches!(
            registry.mark_body_as_dead(BodyId(42)),
            Err(WorldError::BodyNotFound(BodyId(42)))
        ));
    }

    #[test]
    fn next_round_copy_drops_dead_and_clears_indicators() {
        let mut registry = make_registry();
        registry.mark_body_as_dead(BodyId(3)).unwrap();
        {
            let body = registry.get_by_id_mut(BodyId(1)).unwrap();
            body.indicator_string = String::from("hunting");
            body.indicator_dots.push(IndicatorDot {
                location: Vector::ZERO,
                color: String::from("#00ff00"),
            });
        }
        registry.move_body(BodyId(1), 4, 4, &make_map()).unwrap();

        let next = registry.copy_for_next_round();
        assert!(!next.contains(BodyId(3)));
        let body = next.get_by_id(BodyId(1)).unwrap();
        assert!(body.indicator_string.is_empty());
        assert!(body.indicator_dots.is_empty());
        assert_eq!(body.prev_pos, Vector::from_tile(4, 4));

        // The source registry is untouched.
        let original = registry.get_by_id(BodyId(1)).unwrap();
        assert_eq!(original.indicator_string, "hunting");
        assert!(registry.contains(BodyId(3)));
    }

    #[test]
    fn spawn_off_the_map_is_rejected() {
        let mut registry = BodyRegistry::new();
        let mut far = spawn(4, 1, 1);
        far.x = 500;
        far.y = 500;
        assert!(matches!(
            registry.spawn_body_from_action(&far, &make_map()),
            Err(WorldError::CoordinateOutOfBounds { x: 500, y: 500 })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn move_off_the_map_is_rejected() {
        let mut registry = make_registry();
        assert!(matches!(
            registry.move_body(BodyId(1), 99, -7, &make_map()),
            Err(WorldError::CoordinateOutOfBounds { x: 99, y: -7 })
        ));
        assert_eq!(registry.get_by_id(BodyId(1)).unwrap().pos, Vector::from_tile(1, 2));
    }

    #[test]
    fn id_of_dead_body_cannot_be_reused() {
        let map = make_map();
        let mut registry = make_registry();
        registry.mark_body_as_dead(BodyId(2)).unwrap();
        let mut later = registry.copy_for_next_round().copy_for_next_round();
        assert!(!later.contains(BodyId(2)));
        assert!(matches!(
            later.spawn_body_from_action(&spawn(2, 2, 1), &map),
            Err(WorldError::DuplicateBody(BodyId(2)))
        ));
        later.spawn_body_from_action(&spawn(7, 2, 1), &map).unwrap();
    }
}
