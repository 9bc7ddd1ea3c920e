// Player character
//
// Everything about the one playable entity:
// - player: position, velocity, collision resolution, draw emission
// - state: the Idle/Attacking state machine and facing
// - animation: sprite sheet regions and the frame clock
// - stats: tuning constants

pub mod animation;
pub mod player;
pub mod state;
pub mod stats;

// Re-export commonly used types
pub use animation::{AnimationClock, SpriteId, SpriteRegion};
pub use player::Player;
pub use state::{Facing, PlayerState};
pub use stats::PlayerStats;
