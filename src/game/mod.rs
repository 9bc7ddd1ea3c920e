// Game logic: the player character and the level it collides with

pub mod level;
pub mod player;

pub use level::{CollisionBlock, Level};
pub use player::Player;
