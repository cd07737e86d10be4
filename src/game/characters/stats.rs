// Tunable character properties

/// Player movement, damage and feedback settings
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStats {
    // Movement
    /// Horizontal walking speed (units/second)
    pub move_speed: f32,
    /// Upward velocity applied when jumping
    pub jump_speed: f32,

    // Reactions
    /// Upward velocity applied when touching a hazard
    pub hazard_bounce: f32,
    /// Velocity pushing the player away from an enemy that hit it
    pub knockback_speed: f32,
    /// Upward velocity applied after stomping an enemy
    pub stomp_bounce: f32,

    // Combat
    /// Health lost per hazard or enemy hit
    pub hit_damage: i32,
    /// Health restored by a pickup that doesn't specify a value
    pub default_heal: i32,

    // Feedback
    /// Damage tint colour (0xRRGGBB)
    pub tint_color: u32,
    /// How long the damage tint stays on (seconds)
    pub tint_duration: f32,
    /// Delay between dying and the level-end signal (seconds)
    pub death_delay: f32,

    // Dimensions (for physics collider)
    pub width: f32,
    pub height: f32,
}

pub const BASE_STATS: PlayerStats = PlayerStats {
    move_speed: 5.0,
    jump_speed: 12.0,

    hazard_bounce: 12.0,
    knockback_speed: 20.0,
    stomp_bounce: 10.0,

    hit_damage: 10,
    default_heal: 10,

    tint_color: 0xff0000,
    // 100ms red, three flashes
    tint_duration: 0.6,
    death_delay: 1.5,

    width: 1.0,
    height: 2.0,
};

impl Default for PlayerStats {
    fn default() -> Self {
        BASE_STATS
    }
}

/// Patrolling enemy settings
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyStats {
    /// Horizontal patrol speed (units/second)
    pub patrol_speed: f32,
    /// Seconds spent walking in one direction before turning
    pub patrol_interval: f32,
    pub width: f32,
    pub height: f32,
}

pub const BASE_ENEMY_STATS: EnemyStats = EnemyStats {
    patrol_speed: 3.0,
    patrol_interval: 2.0,
    width: 1.0,
    height: 1.5,
};

impl Default for EnemyStats {
    fn default() -> Self {
        BASE_ENEMY_STATS
    }
}
