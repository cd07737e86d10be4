// Character system
//
// This module contains the actors driven by the state machine engine:
// - Player controller (movement, collisions, health, death)
// - Patrolling enemy controller
// - Stats, state identifiers and the commands both of them emit

pub mod collision;
pub mod command;
pub mod enemy;
pub mod player;
pub mod state;
pub mod stats;

// Re-export commonly used types
pub use collision::{classify, Reaction};
pub use command::ActorCommand;
pub use enemy::EnemyController;
pub use player::{EnemyContact, PlayerController, MAX_HEALTH};
pub use state::{EnemyState, PlayerState};
pub use stats::{EnemyStats, PlayerStats};
