// Input handling system
//
// Keyboard input for the single local player.
//
// ## Architecture
//
// - `action`: Defines game actions and default key bindings
// - `player`: Held / just-pressed state and the per-step `InputFrame`
// - `manager`: Maps winit key events onto actions
//
// ## Usage Example
//
// ```rust,ignore
// let mut input = InputManager::new();
//
// // In your event loop
// input.process_keyboard_event(&key_event);
//
// // Each logic step
// level.step(dt, input.frame())?;
// input.end_frame();
// ```

pub mod action;
pub mod manager;
pub mod player;

pub use action::Action;
pub use manager::InputManager;
pub use player::{InputFrame, PlayerInput};
