// Game action definitions and default key bindings

use winit::keyboard::KeyCode;

/// Represents all possible in-game actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
}

/// Default keyboard bindings: arrow keys or A/D to walk, Space or Up to jump
pub fn default_bindings() -> Vec<(KeyCode, Action)> {
    vec![
        (KeyCode::ArrowLeft, Action::MoveLeft),
        (KeyCode::ArrowRight, Action::MoveRight),
        (KeyCode::KeyA, Action::MoveLeft),
        (KeyCode::KeyD, Action::MoveRight),
        (KeyCode::Space, Action::Jump),
        (KeyCode::ArrowUp, Action::Jump),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_action_has_a_binding() {
        let bindings = default_bindings();
        for action in [Action::MoveLeft, Action::MoveRight, Action::Jump] {
            assert!(bindings.iter().any(|(_, a)| *a == action), "{action:?} unbound");
        }
    }

    #[test]
    fn test_no_duplicate_keys() {
        let mut seen = HashSet::new();
        for (key, _) in default_bindings() {
            assert!(seen.insert(key), "Duplicate key {key:?} in default bindings");
        }
    }
}
