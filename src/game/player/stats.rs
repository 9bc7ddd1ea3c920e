// Player tuning constants

/// Fixed tuning values for the player character
#[derive(Debug, Clone)]
pub struct PlayerStats {
    /// Movement speed in world units per second
    pub move_speed: f32,

    /// How long an attack holds its pose, in seconds
    pub attack_duration: f32,

    /// Seconds per animation frame
    pub frame_interval: f32,

    /// Vertical inset into a frame's source rect, in pixels. Keeps the
    /// sampler off the first row of the next frame down the strip.
    pub frame_sample_inset: f32,

    /// Distance the player is pushed clear of a block after a collision
    /// snap, so exact edge contact doesn't re-trigger the overlap test on
    /// the next tick.
    pub collision_buffer: f32,
}

pub const BASE_STATS: PlayerStats = PlayerStats {
    move_speed: 150.0,
    attack_duration: 0.3,
    frame_interval: 0.15,
    frame_sample_inset: 0.5,
    collision_buffer: 1e-4,
};

impl Default for PlayerStats {
    fn default() -> Self {
        BASE_STATS
    }
}

impl PlayerStats {
    pub fn standard() -> Self {
        BASE_STATS
    }
}
