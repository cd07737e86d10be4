// Per-player input state management

use super::action::Action;
use std::collections::HashSet;

/// Input snapshot handed to gameplay code once per logic step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputFrame {
    /// Move-left is held
    pub left: bool,
    /// Move-right is held
    pub right: bool,
    /// Jump went down since the previous frame
    pub jump_pressed: bool,
}

impl InputFrame {
    /// Either horizontal direction is held
    pub fn moving(&self) -> bool {
        self.left || self.right
    }
}

/// Held and just-pressed state for one player
#[derive(Debug, Default)]
pub struct PlayerInput {
    /// Actions that are currently held
    pressed: HashSet<Action>,

    /// Actions that went down this frame
    just_pressed: HashSet<Action>,

    /// Actions that went up this frame
    just_released: HashSet<Action>,
}

impl PlayerInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an action is currently pressed
    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    /// Check if an action was just pressed this frame
    pub fn just_pressed(&self, action: Action) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Check if an action was just released this frame
    pub fn just_released(&self, action: Action) -> bool {
        self.just_released.contains(&action)
    }

    /// Register an action press
    pub fn press(&mut self, action: Action) {
        if self.pressed.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    /// Register an action release
    pub fn release(&mut self, action: Action) {
        if self.pressed.remove(&action) {
            self.just_released.insert(action);
        }
    }

    /// Clear per-frame edges. Call once after gameplay has read the frame.
    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }

    /// Reset all input state
    pub fn reset(&mut self) {
        self.pressed.clear();
        self.end_frame();
    }

    /// Snapshot for the character controller
    pub fn frame(&self) -> InputFrame {
        InputFrame {
            left: self.is_pressed(Action::MoveLeft),
            right: self.is_pressed(Action::MoveRight),
            jump_pressed: self.just_pressed(Action::Jump),
        }
    }
}
