// Out-of-band semantic tags for physics bodies

use std::collections::HashSet;
use std::fmt;

use super::bodies::BodyId;

/// Gameplay meaning attached to a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObstacleTag {
    /// Always damages the player on contact
    Hazard,
    /// Damages on side contact, defeated when stomped
    Enemy,
}

impl ObstacleTag {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hazard => "hazard",
            Self::Enemy => "enemy",
        }
    }
}

impl fmt::Display for ObstacleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObstacleError {
    #[error("obstacle '{tag}' already registered for body {body:?}")]
    Duplicate { tag: ObstacleTag, body: BodyId },
}

/// Set of `(tag, body)` pairs
#[derive(Debug, Default)]
pub struct ObstacleRegistry {
    obstacles: HashSet<(ObstacleTag, BodyId)>,
}

impl ObstacleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag `body`. Tagging the same body with the same tag twice is an error.
    pub fn add(&mut self, tag: ObstacleTag, body: BodyId) -> Result<(), ObstacleError> {
        if !self.obstacles.insert((tag, body)) {
            return Err(ObstacleError::Duplicate { tag, body });
        }
        log::trace!("tagged {:?} as {}", body, tag);
        Ok(())
    }

    /// Whether `body` carries `tag`
    pub fn is(&self, tag: ObstacleTag, body: BodyId) -> bool {
        self.obstacles.contains(&(tag, body))
    }

    /// Every tag carried by `body`
    pub fn tags_of(&self, body: BodyId) -> Vec<ObstacleTag> {
        [ObstacleTag::Hazard, ObstacleTag::Enemy]
            .into_iter()
            .filter(|tag| self.is(*tag, body))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}
