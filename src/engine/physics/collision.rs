use rapier2d::prelude::*;
use std::sync::{Arc, Mutex};

/// Collision groups for filtering what objects can collide with each other
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroups {
    /// The player character
    Player = 0b0000_0001,

    /// Patrolling enemies
    Enemy = 0b0000_0010,

    /// Static level geometry (tile ground, walls)
    Terrain = 0b0000_0100,

    /// Damaging level geometry (spikes)
    Hazard = 0b0000_1000,

    /// Collectibles (stars, health)
    Pickup = 0b0001_0000,
}

impl CollisionGroups {
    /// Convert to rapier2d's InteractionGroups
    pub fn to_interaction_groups(self) -> InteractionGroups {
        let memberships = Group::from_bits_truncate(self as u32);

        let filter = match self {
            // Player touches everything in the level
            CollisionGroups::Player => Group::from_bits_truncate(
                CollisionGroups::Enemy as u32
                    | CollisionGroups::Terrain as u32
                    | CollisionGroups::Hazard as u32
                    | CollisionGroups::Pickup as u32,
            ),

            // Enemies walk on terrain and hazards but ignore pickups
            CollisionGroups::Enemy => Group::from_bits_truncate(
                CollisionGroups::Player as u32
                    | CollisionGroups::Terrain as u32
                    | CollisionGroups::Hazard as u32,
            ),

            CollisionGroups::Terrain | CollisionGroups::Hazard => Group::from_bits_truncate(
                CollisionGroups::Player as u32 | CollisionGroups::Enemy as u32,
            ),

            // Pickups collide with the player only
            CollisionGroups::Pickup => Group::from_bits_truncate(CollisionGroups::Player as u32),
        };

        InteractionGroups::new(memberships, filter)
    }
}

/// Custom collision event for game logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionEvent {
    /// Two colliders started touching
    Started {
        collider1: ColliderHandle,
        collider2: ColliderHandle,
    },

    /// Two colliders stopped touching
    Stopped {
        collider1: ColliderHandle,
        collider2: ColliderHandle,
    },
}

impl CollisionEvent {
    /// If this is a start event involving `collider`, the other collider
    pub fn started_with(&self, collider: ColliderHandle) -> Option<ColliderHandle> {
        match *self {
            CollisionEvent::Started {
                collider1,
                collider2,
            } if collider1 == collider => Some(collider2),
            CollisionEvent::Started {
                collider1,
                collider2,
            } if collider2 == collider => Some(collider1),
            _ => None,
        }
    }
}

/// Queue for storing collision events during physics step
///
/// rapier requires event handlers to be `Send + Sync`, hence the mutex.
pub struct CollisionEventQueue {
    events: Arc<Mutex<Vec<CollisionEvent>>>,
}

impl CollisionEventQueue {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::with_capacity(32))),
        }
    }

    /// Clear all events (call at start of physics step)
    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }

    /// Get all collision events from this step
    pub fn events(&self) -> Vec<CollisionEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    fn push(&self, event: CollisionEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl Default for CollisionEventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler for CollisionEventQueue {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: rapier2d::prelude::CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        match event {
            rapier2d::prelude::CollisionEvent::Started(h1, h2, _flags) => {
                self.push(CollisionEvent::Started {
                    collider1: h1,
                    collider2: h2,
                });
            }
            rapier2d::prelude::CollisionEvent::Stopped(h1, h2, _flags) => {
                self.push(CollisionEvent::Stopped {
                    collider1: h1,
                    collider2: h2,
                });
            }
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}
