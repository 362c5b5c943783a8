//! 2D Camera
//!
//! Everything is laid out in a fixed virtual resolution (y down) and
//! letterboxed into the window. The world camera centers on a target
//! point; the HUD camera is the same mapping pinned to the screen.

use macroquad::prelude::*;

/// Fit of the virtual screen inside the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    /// Window pixels per virtual unit
    pub scale: f32,
    /// Top-left of the drawn area in window pixels
    pub origin: Vec2,
    pub size: Vec2,
}

impl Letterbox {
    pub fn fit(virtual_size: Vec2, window: Vec2) -> Self {
        let scale = (window.x / virtual_size.x).min(window.y / virtual_size.y).max(1e-4);
        let size = virtual_size * scale;
        Self {
            scale,
            origin: (window - size) / 2.0,
            size,
        }
    }

    /// Window pixel to virtual screen coordinates.
    pub fn to_virtual(&self, window_point: Vec2) -> Vec2 {
        (window_point - self.origin) / self.scale
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameCamera {
    pub virtual_size: Vec2,
    /// World point shown at the center of the screen
    pub target: Vec2,
}

impl GameCamera {
    pub fn new(virtual_width: f32, virtual_height: f32) -> Self {
        let virtual_size = Vec2::new(virtual_width, virtual_height);
        Self {
            virtual_size,
            target: virtual_size / 2.0,
        }
    }

    pub fn set_target(&mut self, x: f32, y: f32) {
        self.target = Vec2::new(x, y);
    }

    /// Top-left world point of the visible area.
    pub fn top_left(&self) -> Vec2 {
        self.target - self.virtual_size / 2.0
    }

    /// Whether a world point is inside the view grown by `margin`.
    pub fn contains(&self, point: Vec2, margin: f32) -> bool {
        let min = self.top_left() - Vec2::splat(margin);
        let max = min + self.virtual_size + Vec2::splat(margin * 2.0);
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    fn camera_at(&self, target: Vec2) -> Camera2D {
        let letterbox = Letterbox::fit(self.virtual_size, vec2(screen_width(), screen_height()));
        Camera2D {
            target,
            // Positive y zoom keeps y pointing down on screen
            zoom: vec2(2.0 / self.virtual_size.x, 2.0 / self.virtual_size.y),
            viewport: Some((
                letterbox.origin.x as i32,
                letterbox.origin.y as i32,
                letterbox.size.x as i32,
                letterbox.size.y as i32,
            )),
            ..Default::default()
        }
    }

    /// Camera for world-space drawing.
    pub fn world(&self) -> Camera2D {
        self.camera_at(self.target)
    }

    /// Camera for screen-fixed drawing in virtual coordinates.
    pub fn hud(&self) -> Camera2D {
        self.camera_at(self.virtual_size / 2.0)
    }
}
