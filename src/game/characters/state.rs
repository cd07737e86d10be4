// Character state identifiers

use std::fmt;

/// States of the player's state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerState {
    /// Standing still
    Idle,
    /// Moving horizontally on the ground
    Walk,
    /// Airborne after a jump, until landing on terrain
    Jump,
    /// Touched a hazard; bounces, takes damage, returns to idle
    SpikeHit,
    /// Hit by an enemy from the side; knocked back, takes damage
    EnemyHit,
    /// Landed on an enemy from above
    EnemyStomp,
    /// Out of health. Terminal.
    Dead,
}

impl PlayerState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Walk => "walk",
            Self::Jump => "jump",
            Self::SpikeHit => "spike-hit",
            Self::EnemyHit => "enemy-hit",
            Self::EnemyStomp => "enemy-stomp",
            Self::Dead => "dead",
        }
    }

    /// Animation started on entering the state, if it has its own
    pub fn animation_name(&self) -> Option<&'static str> {
        match self {
            Self::Idle => Some("player-idle"),
            Self::Walk => Some("player-walk"),
            Self::Jump => Some("player-jump"),
            Self::Dead => Some("player-death"),
            Self::SpikeHit | Self::EnemyHit | Self::EnemyStomp => None,
        }
    }
}

impl fmt::Display for PlayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// States of a patrolling enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyState {
    Idle,
    MoveLeft,
    MoveRight,
    Dead,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(PlayerState::SpikeHit.name(), "spike-hit");
        assert_eq!(PlayerState::EnemyStomp.to_string(), "enemy-stomp");
    }

    #[test]
    fn test_animation_names() {
        assert_eq!(PlayerState::Idle.animation_name(), Some("player-idle"));
        assert_eq!(PlayerState::Walk.animation_name(), Some("player-walk"));
        assert_eq!(PlayerState::Dead.animation_name(), Some("player-death"));
        assert_eq!(PlayerState::EnemyHit.animation_name(), None);
    }
}
