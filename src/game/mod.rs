// Gameplay: bodies, obstacle tags, events, characters, level and HUD

pub mod bodies;
pub mod characters;
pub mod events;
pub mod hud;
pub mod level;
pub mod obstacles;
