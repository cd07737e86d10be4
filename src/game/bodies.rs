// Gameplay view of physics bodies
//
// Every body gets an explicit kind when it is spawned. Collision handling
// reads that kind (plus obstacle tags) instead of inspecting engine types.

use glam::Vec2;

use crate::engine::physics::ColliderHandle;

/// Stable identity of a collision body, as assigned by the physics layer
pub type BodyId = ColliderHandle;

/// Identifier of a spawned game entity (player, enemy, pickup)
pub type EntityId = u32;

/// What a pickup gives when collected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupKind {
    Star,
    Health { amount: i32 },
}

/// Spawn-time description of a body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// A moving character (player or enemy)
    Actor,
    /// Tile ground converted from the level's static geometry
    Terrain,
    /// Standalone static rectangle with no entity behind it (spikes)
    Fixture,
    /// Collectible sensor
    Pickup(PickupKind),
}

/// One side of a collision as seen by gameplay code
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyInfo {
    pub id: BodyId,
    pub position: Vec2,
    pub kind: BodyKind,
    pub entity: Option<EntityId>,
}

impl BodyInfo {
    pub fn new(id: BodyId, position: Vec2, kind: BodyKind) -> Self {
        Self {
            id,
            position,
            kind,
            entity: None,
        }
    }

    pub fn with_entity(mut self, entity: EntityId) -> Self {
        self.entity = Some(entity);
        self
    }
}
