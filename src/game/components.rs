//! Game Components
//!
//! Plain data attached to entities. Behavior lives in `physics` and
//! `systems`; scenes only set inputs and read results.

use macroquad::prelude::{Color, Vec2, WHITE};
use serde::{Serialize, Deserialize};
use crate::platforming::{Locomotion, PlatformMotion};
use super::entity::Entity;

// =============================================================================
// Physics / Movement
// =============================================================================

/// Velocity in units per second (y down)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity(pub Vec2);

impl Velocity {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }
}

/// Axis-aligned box relative to the entity position.
///
/// A collider without a `Body` is a sensor: it reports contacts but is
/// never pushed and never pushes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub half_extents: Vec2,
    pub offset: Vec2,
}

impl Collider {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            half_extents: Vec2::new(width / 2.0, height / 2.0),
            offset: Vec2::ZERO,
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// `(min, max)` corners for an entity at `position`.
    pub fn aabb(&self, position: Vec2) -> (Vec2, Vec2) {
        let center = position + self.offset;
        (center - self.half_extents, center + self.half_extents)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    /// Never moves, blocks dynamic bodies
    Static,
    /// Gravity, velocity integration and static resolution
    Dynamic,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub kind: BodyKind,
    /// Standing on a static body this tick
    pub grounded: bool,
    pub gravity_scale: f32,
    pub max_fall_speed: f32,
}

impl Body {
    pub fn fixed() -> Self {
        Self {
            kind: BodyKind::Static,
            grounded: false,
            gravity_scale: 0.0,
            max_fall_speed: 0.0,
        }
    }

    pub fn dynamic(max_fall_speed: f32) -> Self {
        Self {
            kind: BodyKind::Dynamic,
            grounded: false,
            gravity_scale: 1.0,
            max_fall_speed,
        }
    }

    pub fn is_static(&self) -> bool {
        self.kind == BodyKind::Static
    }
}

// =============================================================================
// Platforming
// =============================================================================

/// Player-controlled character.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Actor {
    pub locomotion: Locomotion,
    /// Platform currently ridden. Non-owning: always check liveness.
    pub riding: Option<Entity>,
    /// Horizontal input this tick, -1..1 (facing)
    pub input_x: f32,
    /// Counts as walking when grounded
    pub moving: bool,
}

/// A one-way moving platform. Positioned at `(center_x, track_y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovingPlatform {
    pub motion: PlatformMotion,
    pub track_y: f32,
    pub width: f32,
    pub height: f32,
}

impl MovingPlatform {
    pub fn top(&self) -> f32 {
        self.track_y - self.height / 2.0
    }

    pub fn left(&self) -> f32 {
        self.motion.center_x() - self.width / 2.0
    }

    pub fn right(&self) -> f32 {
        self.motion.center_x() + self.width / 2.0
    }
}

// =============================================================================
// Presentation
// =============================================================================

/// What a sprite is drawn as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shape {
    Rect,
    Circle,
    /// Cat pose picked from the current frame
    Cat,
    Crosshair,
    Gun,
}

/// Frame range playing on a loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteAnim {
    pub first: usize,
    pub last: usize,
    pub fps: f32,
    elapsed: f32,
}

impl SpriteAnim {
    pub fn new(first: usize, last: usize, fps: f32) -> Self {
        Self { first, last, fps, elapsed: 0.0 }
    }

    /// Frame to show after `dt` more seconds.
    pub fn advance(&mut self, dt: f32) -> usize {
        self.elapsed += dt;
        let len = (self.last - self.first + 1) as f32;
        let step = (self.elapsed * self.fps) as usize % len as usize;
        self.first + step
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub shape: Shape,
    /// Drawn size before `scale`
    pub size: Vec2,
    pub scale: f32,
    pub tint: Color,
    pub opacity: f32,
    pub frame: usize,
    pub flip_x: bool,
    /// Higher draws on top
    pub z: i32,
    pub anim: Option<SpriteAnim>,
    /// Seconds left of the white hit flash
    pub flash: f32,
}

impl Sprite {
    pub fn new(shape: Shape, size: Vec2, tint: Color, z: i32) -> Self {
        Self {
            shape,
            size,
            scale: 1.0,
            tint,
            opacity: 1.0,
            frame: 0,
            flip_x: false,
            z,
            anim: None,
            flash: 0.0,
        }
    }

    pub fn cat(size: f32, scale: f32, tint: Color, idle_frame: usize) -> Self {
        Self {
            scale,
            frame: idle_frame,
            ..Self::new(Shape::Cat, Vec2::splat(size), tint, 10)
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Hold one frame and stop any animation.
    pub fn show_frame(&mut self, frame: usize) {
        self.frame = frame;
        self.anim = None;
    }

    pub fn play(&mut self, first: usize, last: usize, fps: f32) {
        self.frame = first;
        self.anim = Some(SpriteAnim::new(first, last, fps));
    }

    pub fn draw_color(&self) -> Color {
        let base = if self.flash > 0.0 { WHITE } else { self.tint };
        Color::new(base.r, base.g, base.b, base.a * self.opacity)
    }
}

impl Default for Sprite {
    fn default() -> Self {
        Self::new(Shape::Rect, Vec2::splat(16.0), WHITE, 0)
    }
}

// =============================================================================
// Tags
// =============================================================================

/// What an entity is, for contact filtering and cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    Player,
    Ground,
    Wall,
    Ceiling,
    Platform,
    WallSegment,
    Goal,
    Photon,
    Enemy,
    Bullet,
    Gun,
    Crosshair,
}

/// Photo-electric phase that owns an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Group {
    PhaseOne,
    PhaseTwo,
}

/// Vertical sine drift for floating pickups.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bob {
    pub phase: f32,
    pub frequency: f32,
    /// Units moved per tick at the crest
    pub amplitude: f32,
}

/// Hit points for damageable entities
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        Self { current: max, max }
    }

    /// Returns true if this hit was lethal
    pub fn damage(&mut self, amount: i32) -> bool {
        self.current = (self.current - amount).max(0);
        self.current == 0
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0
    }
}
