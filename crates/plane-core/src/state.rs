//! Viewport, camera and input state owned by the render loop.
//!
//! These types avoid any platform API so both the web front end and host
//! tests can build them. The camera follows the pixel-perfect convention:
//! it sits on the +Z axis at the distance where one world unit covers one
//! CSS pixel at depth zero.

use crate::smoothing::Damped;
use glam::{Mat4, Vec2, Vec3};

/// Size of the drawing surface in CSS pixels plus the device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Backing-store size in physical pixels, never zero.
    pub fn physical_size(&self, max_pixel_ratio: f32) -> (u32, u32) {
        let ratio = self.pixel_ratio.clamp(1.0, max_pixel_ratio.max(1.0));
        let w = (self.width * ratio).round() as u32;
        let h = (self.height * ratio).round() as u32;
        (w.max(1), h.max(1))
    }
}

/// Rectangle in viewport pixels with the origin at the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ScreenRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ScreenRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x <= self.left + self.width && y >= self.top && y <= self.top + self.height
    }

    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}

/// Right-handed perspective camera.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Place a camera so that depth zero maps one world unit to one pixel.
    pub fn for_viewport(viewport: Viewport, fovy_radians: f32, znear: f32, zfar: f32) -> Self {
        let distance = crate::projection::camera_distance(viewport.height, fovy_radians);
        Self {
            eye: Vec3::new(0.0, 0.0, distance),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: viewport.aspect(),
            fovy_radians,
            znear,
            zfar: zfar.max(distance * crate::constants::FAR_DISTANCE_FACTOR),
        }
    }

    /// Recompute aspect and distance after the viewport changed.
    pub fn fit(&mut self, viewport: Viewport) {
        let distance = crate::projection::camera_distance(viewport.height, self.fovy_radians);
        self.eye = Vec3::new(0.0, 0.0, distance);
        self.aspect = viewport.aspect();
        self.zfar = self
            .zfar
            .max(distance * crate::constants::FAR_DISTANCE_FACTOR);
    }

    pub fn distance(&self) -> f32 {
        (self.eye - self.target).length()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Pointer position in viewport pixels; `current` trails `target`.
pub type PointerState = Damped<Vec2>;

/// Document scroll offset in pixels; `current` trails `target`.
pub type ScrollState = Damped<f32>;

/// Lifecycle of the render loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LoopState {
    #[default]
    Idle,
    Running,
    Stopped,
}
