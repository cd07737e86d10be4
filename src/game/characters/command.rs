// Effects requested by character controllers
//
// Controllers never touch the physics world or the sprite directly. They
// queue commands and the level applies them after each call.

use crate::game::bodies::BodyId;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActorCommand {
    /// Overwrite the actor's horizontal velocity
    SetVelocityX(f32),
    /// Overwrite the actor's vertical velocity (negative is up)
    SetVelocityY(f32),
    /// Mirror the sprite horizontally
    SetFlipX(bool),
    /// Switch the sprite animation
    PlayAnimation(&'static str),
    /// Tint the sprite (0xRRGGBB) as damage feedback
    FlashTint { color: u32, duration: f32 },
    /// Remove the damage tint
    ClearTint,
    /// Remove a body (collected pickup, defeated enemy) from the world
    RemoveBody(BodyId),
    /// Tell the level controller the level is over
    EndLevel,
}
