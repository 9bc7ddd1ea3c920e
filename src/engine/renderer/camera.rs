// Camera for 2D rendering
//
// World coordinates are canvas-style: origin at the top-left, y growing
// downward. The projection is built to match, so sprite and collision code
// share one coordinate convention.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2};

/// 2D camera with a y-down orthographic projection
#[derive(Debug, Clone)]
pub struct Camera {
    /// World position of the top-left corner of the view
    pub position: Vec2,
    /// Zoom level (1.0 = one world unit per pixel, 4.0 = 4x magnification)
    pub zoom: f32,
    /// Viewport width in pixels
    viewport_width: f32,
    /// Viewport height in pixels
    viewport_height: f32,
    /// View-projection matrix
    view_proj: Mat4,
}

impl Camera {
    /// Create a new camera
    pub fn new(position: Vec2, viewport_width: f32, viewport_height: f32) -> Self {
        let mut camera = Self {
            position,
            zoom: 1.0,
            viewport_width,
            viewport_height,
            view_proj: Mat4::IDENTITY,
        };
        camera.update_view_proj();
        camera
    }

    fn update_view_proj(&mut self) {
        let view_width = self.viewport_width / self.zoom;
        let view_height = self.viewport_height / self.zoom;

        // bottom > top flips the y axis so world y grows downward on screen
        self.view_proj = Mat4::orthographic_rh(
            self.position.x,
            self.position.x + view_width,
            self.position.y + view_height,
            self.position.y,
            -100.0,
            100.0,
        );
    }

    /// Set camera position (top-left corner of the view)
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.update_view_proj();
    }

    /// Scroll so that `point` sits at the center of the view
    pub fn center_on(&mut self, point: Vec2) {
        let half_view =
            Vec2::new(self.viewport_width, self.viewport_height) / (2.0 * self.zoom);
        self.set_position(point - half_view);
    }

    /// Set camera zoom
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.max(0.1);
        self.update_view_proj();
    }

    /// Resize the viewport
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport_width = width;
        self.viewport_height = height;
        self.update_view_proj();
    }

    /// Get the view-projection matrix
    pub fn view_proj_matrix(&self) -> Mat4 {
        self.view_proj
    }
}

/// Camera data in the layout the shader expects
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new(camera: &Camera) -> Self {
        Self {
            view_proj: camera.view_proj_matrix().to_cols_array_2d(),
        }
    }
}
