// Math utilities and helper functions

use glam::Vec2;

/// Axis-aligned rectangle in world units, top-left origin, y down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Inclusive overlap test used by the collision broad phase.
    ///
    /// Edge contact counts as overlap, so a rect with zero extent on one
    /// axis still registers when it sits exactly on the other's boundary.
    pub fn touches(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && self.right() >= other.x
            && self.bottom() >= other.y
            && self.y <= other.bottom()
    }

    /// True when the rect cannot participate in collision: non-positive
    /// or non-finite extent.
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0) || !(self.height > 0.0)
    }
}
