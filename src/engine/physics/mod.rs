// Physics layer using rapier2d
//
// Gameplay code never simulates anything itself: it reads contacts from
// `PhysicsWorld::collision_events` and writes velocities back.

pub mod body;
mod collision;
mod world;

pub use body::{presets, ColliderHandle, RigidBodyHandle};
pub use collision::{CollisionEvent, CollisionGroups};
pub use world::{PhysicsWorld, DEFAULT_GRAVITY};
