// Gameplay events published for presentation and other listeners

use std::fmt;

use crate::engine::events::{Event, EventBus};

use super::bodies::{BodyId, EntityId};

/// The bus every gameplay component shares for one session
pub type GameEvents = EventBus<GameEvent>;

/// Reference to an enemy carried by `enemy-defeated`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyRef {
    pub body: BodyId,
    pub entity: Option<EntityId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A star pickup was collected
    StarCollected,
    /// Player health changed; carries the new clamped value
    HealthChanged(i32),
    /// The player stomped an enemy
    EnemyDefeated(EnemyRef),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameTopic {
    StarCollected,
    HealthChanged,
    EnemyDefeated,
}

impl GameTopic {
    pub fn name(&self) -> &'static str {
        match self {
            Self::StarCollected => "star-collected",
            Self::HealthChanged => "health-changed",
            Self::EnemyDefeated => "enemy-defeated",
        }
    }
}

impl fmt::Display for GameTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Event for GameEvent {
    type Topic = GameTopic;

    fn topic(&self) -> GameTopic {
        match self {
            GameEvent::StarCollected => GameTopic::StarCollected,
            GameEvent::HealthChanged(_) => GameTopic::HealthChanged,
            GameEvent::EnemyDefeated(_) => GameTopic::EnemyDefeated,
        }
    }
}
