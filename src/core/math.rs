// Math utilities and helper functions

use glam::Vec2;

/// Clamp a value between min and max
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Horizontal direction pointing from `from` away from `source`.
///
/// Returns -1.0 when `from` is left of `source`, 1.0 otherwise (ties push right).
pub fn away_from_x(from: Vec2, source: Vec2) -> f32 {
    if from.x < source.x {
        -1.0
    } else {
        1.0
    }
}

/// Whether `a` sits above `b` in screen space (y grows downward)
pub fn is_above(a: Vec2, b: Vec2) -> bool {
    a.y < b.y
}
