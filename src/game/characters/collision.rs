// Player collision classification

use crate::core::math::is_above;
use crate::game::bodies::{BodyInfo, BodyKind, PickupKind};
use crate::game::obstacles::{ObstacleRegistry, ObstacleTag};

use super::state::PlayerState;

/// What a contact means for the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    SpikeHit,
    EnemyHit,
    EnemyStomp,
    /// Touched ground while jumping
    Land,
    Collect(PickupKind),
}

/// Classify a contact between `player` and `other`
///
/// Rules are checked in priority order and the first match wins: hazard
/// tag, enemy tag, terrain while jumping, pickup. Anything else is ignored.
pub fn classify(
    obstacles: &ObstacleRegistry,
    state: Option<PlayerState>,
    player: &BodyInfo,
    other: &BodyInfo,
) -> Option<Reaction> {
    if obstacles.is(ObstacleTag::Hazard, other.id) {
        return Some(Reaction::SpikeHit);
    }

    if obstacles.is(ObstacleTag::Enemy, other.id) {
        return Some(if is_above(player.position, other.position) {
            Reaction::EnemyStomp
        } else {
            Reaction::EnemyHit
        });
    }

    match other.kind {
        BodyKind::Terrain if state == Some(PlayerState::Jump) => Some(Reaction::Land),
        BodyKind::Pickup(pickup) => Some(Reaction::Collect(pickup)),
        BodyKind::Terrain | BodyKind::Fixture | BodyKind::Actor => None,
    }
}
