// Input manager - maps keyboard events onto player actions

use super::action::{default_bindings, Action};
use super::player::{InputFrame, PlayerInput};
use std::collections::HashMap;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Keyboard bindings plus the input state they drive
#[derive(Debug)]
pub struct InputManager {
    bindings: HashMap<KeyCode, Action>,
    player: PlayerInput,
}

impl InputManager {
    /// Create a manager with the default bindings
    pub fn new() -> Self {
        Self::with_bindings(default_bindings())
    }

    pub fn with_bindings(bindings: Vec<(KeyCode, Action)>) -> Self {
        Self {
            bindings: bindings.into_iter().collect(),
            player: PlayerInput::new(),
        }
    }

    /// Bind a key to an action, replacing whatever the key did before
    pub fn bind(&mut self, key: KeyCode, action: Action) {
        self.bindings.insert(key, action);
    }

    pub fn unbind(&mut self, key: KeyCode) {
        self.bindings.remove(&key);
    }

    pub fn action_for(&self, key: KeyCode) -> Option<Action> {
        self.bindings.get(&key).copied()
    }

    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(key_code) = event.physical_key {
            self.process_key(key_code, event.state, event.repeat);
        }
    }

    /// Apply a key transition. Key repeats never count as fresh presses.
    pub fn process_key(&mut self, key: KeyCode, state: ElementState, repeat: bool) {
        let Some(action) = self.action_for(key) else {
            return;
        };
        match state {
            ElementState::Pressed if !repeat => self.player.press(action),
            ElementState::Pressed => {}
            ElementState::Released => self.player.release(action),
        }
    }

    /// Snapshot for this logic step
    pub fn frame(&self) -> InputFrame {
        self.player.frame()
    }

    /// Call once per frame after gameplay has consumed the input
    pub fn end_frame(&mut self) {
        self.player.end_frame();
    }

    pub fn player(&self) -> &PlayerInput {
        &self.player
    }

    pub fn reset(&mut self) {
        self.player.reset();
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings_drive_frame() {
        let mut input = InputManager::new();
        input.process_key(KeyCode::ArrowRight, ElementState::Pressed, false);
        input.process_key(KeyCode::Space, ElementState::Pressed, false);

        let frame = input.frame();
        assert!(frame.right);
        assert!(frame.jump_pressed);

        input.end_frame();
        assert!(!input.frame().jump_pressed);
        assert!(input.frame().right);
    }

    #[test]
    fn test_repeat_ignored() {
        let mut input = InputManager::new();
        input.process_key(KeyCode::Space, ElementState::Pressed, true);
        assert!(!input.frame().jump_pressed);
    }

    #[test]
    fn test_release() {
        let mut input = InputManager::new();
        input.process_key(KeyCode::KeyA, ElementState::Pressed, false);
        input.process_key(KeyCode::KeyA, ElementState::Released, false);
        assert!(!input.frame().left);
        assert!(input.player().just_released(Action::MoveLeft));
    }

    #[test]
    fn test_unbound_keys_ignored() {
        let mut input = InputManager::new();
        input.process_key(KeyCode::KeyQ, ElementState::Pressed, false);
        assert_eq!(input.frame(), InputFrame::default());
    }

    #[test]
    fn test_rebind() {
        let mut input = InputManager::new();
        input.unbind(KeyCode::Space);
        input.bind(KeyCode::KeyW, Action::Jump);
        assert_eq!(input.action_for(KeyCode::Space), None);

        input.process_key(KeyCode::KeyW, ElementState::Pressed, false);
        assert!(input.frame().jump_pressed);
    }
}
