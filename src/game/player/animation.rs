// Sprite sheet regions and the animation clock

use super::state::Facing;
use crate::core::math::Rect;
use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, PI};

/// Immutable descriptor of one animation strip in the body sprite sheet.
/// Frames are stacked vertically below the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteRegion {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub frame_count: u32,
}

impl SpriteRegion {
    /// Source rect of one frame, inset vertically so the sampler stays off
    /// the first row of the next frame down the strip.
    pub fn frame_src(&self, frame: u32, sample_inset: f32) -> Rect {
        Rect::new(
            self.x,
            self.y + self.height * frame as f32 + sample_inset,
            self.width,
            self.height,
        )
    }
}

/// Names the eight regions of the body sprite sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteId {
    WalkDown,
    WalkUp,
    WalkLeft,
    WalkRight,
    AttackDown,
    AttackUp,
    AttackLeft,
    AttackRight,
}

impl SpriteId {
    /// The walk strip for a facing
    pub fn walk(facing: Facing) -> Self {
        match facing {
            Facing::Down => Self::WalkDown,
            Facing::Up => Self::WalkUp,
            Facing::Left => Self::WalkLeft,
            Facing::Right => Self::WalkRight,
        }
    }

    /// The attack pose for a facing
    pub fn attack(facing: Facing) -> Self {
        match facing {
            Facing::Down => Self::AttackDown,
            Facing::Up => Self::AttackUp,
            Facing::Left => Self::AttackLeft,
            Facing::Right => Self::AttackRight,
        }
    }

    /// Region geometry, matching the production sheet layout: walk strips
    /// in four 16-wide columns at the top, single-frame attack poses in a
    /// 15-tall row at y=64.
    pub fn region(self) -> SpriteRegion {
        match self {
            Self::WalkDown => SpriteRegion {
                x: 0.0,
                y: 0.0,
                width: 16.0,
                height: 16.0,
                frame_count: 4,
            },
            Self::WalkUp => SpriteRegion {
                x: 16.0,
                y: 0.0,
                width: 16.0,
                height: 16.0,
                frame_count: 4,
            },
            Self::WalkLeft => SpriteRegion {
                x: 32.0,
                y: 0.0,
                width: 16.0,
                height: 16.0,
                frame_count: 4,
            },
            Self::WalkRight => SpriteRegion {
                x: 48.0,
                y: 0.0,
                width: 16.0,
                height: 16.0,
                frame_count: 4,
            },
            Self::AttackDown => SpriteRegion {
                x: 0.0,
                y: 64.0,
                width: 16.0,
                height: 15.0,
                frame_count: 1,
            },
            Self::AttackUp => SpriteRegion {
                x: 16.0,
                y: 64.0,
                width: 16.0,
                height: 15.0,
                frame_count: 1,
            },
            Self::AttackLeft => SpriteRegion {
                x: 32.0,
                y: 64.0,
                width: 16.0,
                height: 15.0,
                frame_count: 1,
            },
            Self::AttackRight => SpriteRegion {
                x: 48.0,
                y: 64.0,
                width: 16.0,
                height: 15.0,
                frame_count: 1,
            },
        }
    }
}

/// Frame index and elapsed-time accumulator for the current strip
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimationClock {
    pub frame: u32,
    elapsed: f32,
}

impl AnimationClock {
    /// Advance the clock, stepping the frame once per full interval. A
    /// large delta advances several frames in one call rather than
    /// stretching a single frame.
    pub fn advance(&mut self, dt: f32, frame_count: u32, frame_interval: f32) {
        self.elapsed += dt;

        // The epsilon keeps accumulated float error from stalling a frame
        // boundary that equal-sized deltas land on exactly.
        while self.elapsed >= frame_interval - f32::EPSILON {
            self.frame = (self.frame + 1) % frame_count.max(1);
            self.elapsed -= frame_interval;
        }
    }

    /// Snap back to the first frame; the elapsed accumulator keeps running
    pub fn restart(&mut self) {
        self.frame = 0;
    }
}

/// Weapon overlay pose for one facing: rotation and the pivot's offset
/// from the player's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponPose {
    pub angle: f32,
    pub offset: Vec2,
}

/// Empirical per-facing weapon poses. These values are matched to the
/// lance art; nudging them separates the weapon from the body pose.
pub fn weapon_pose(facing: Facing) -> WeaponPose {
    match facing {
        Facing::Down => WeaponPose {
            angle: 0.0,
            offset: Vec2::new(5.0, 22.0),
        },
        Facing::Up => WeaponPose {
            angle: PI,
            offset: Vec2::new(4.0, -7.0),
        },
        Facing::Right => WeaponPose {
            angle: 3.0 * FRAC_PI_2,
            offset: Vec2::new(22.0, 11.0),
        },
        Facing::Left => WeaponPose {
            angle: FRAC_PI_2,
            offset: Vec2::new(-8.0, 12.0),
        },
    }
}

/// Rect the weapon image draws into, within its transform scope
pub const WEAPON_DST: Rect = Rect::new(-3.0, -8.0, 6.0, 16.0);
