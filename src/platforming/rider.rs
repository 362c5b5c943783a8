//! Rider Attachment Resolver
//!
//! Decides, once per tick and per actor, whether the actor lands on (or
//! keeps standing on) a one-way platform. One-way platforms are only
//! solid from above: an actor jumping up through one is left alone, an
//! actor at or past the apex whose feet are within the landing window of
//! the platform top is snapped onto it and carried by its displacement.

use macroquad::prelude::Vec2;
use serde::{Serialize, Deserialize};
use crate::game::Entity;

/// Accepted range for `actor_bottom - platform_top` when landing.
///
/// Negative values mean the feet are still above the surface. The upper
/// bound absorbs one frame of integration overshoot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandingWindow {
    pub min_gap: f32,
    pub max_gap: f32,
}

impl LandingWindow {
    pub fn contains(&self, gap: f32) -> bool {
        gap >= self.min_gap && gap <= self.max_gap
    }
}

impl Default for LandingWindow {
    fn default() -> Self {
        Self { min_gap: -5.0, max_gap: 15.0 }
    }
}

/// An actor's collision box: center position, half extents and a
/// vertical offset of the box relative to the center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorBounds {
    pub center: Vec2,
    pub half_extents: Vec2,
    pub offset_y: f32,
}

impl ActorBounds {
    pub fn bottom(&self) -> f32 {
        self.center.y + self.half_extents.y + self.offset_y
    }

    pub fn left(&self) -> f32 {
        self.center.x - self.half_extents.x
    }

    pub fn right(&self) -> f32 {
        self.center.x + self.half_extents.x
    }

    /// Center y that puts the box bottom exactly at `surface_y`.
    pub fn center_y_for_bottom(&self, surface_y: f32) -> f32 {
        surface_y - self.half_extents.y - self.offset_y
    }
}

/// Snapshot of one live one-way platform for this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OneWaySurface {
    pub platform: Entity,
    pub top: f32,
    pub left: f32,
    pub right: f32,
    pub delta_x: f32,
}

impl OneWaySurface {
    fn overlaps(&self, bounds: &ActorBounds) -> bool {
        bounds.right() > self.left && bounds.left() < self.right
    }
}

/// Mutable slice of actor state the resolver is allowed to touch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiderBody {
    pub bounds: ActorBounds,
    pub velocity: Vec2,
}

/// First surface (in the given order) the actor can land on this tick.
pub fn find_landing<'a>(
    window: &LandingWindow,
    bounds: &ActorBounds,
    velocity_y: f32,
    surfaces: &'a [OneWaySurface],
) -> Option<&'a OneWaySurface> {
    // Still rising: pass through from below
    if velocity_y < 0.0 {
        return None;
    }
    let bottom = bounds.bottom();
    surfaces
        .iter()
        .find(|s| s.overlaps(bounds) && window.contains(bottom - s.top))
}

/// Resolve one actor against the tick's surface snapshot.
///
/// On a hit the actor is snapped onto the surface, its vertical velocity
/// is zeroed and it is carried by the surface's `delta_x` on top of
/// whatever horizontal movement physics already applied. Returns the
/// platform now being ridden, or `None` when the actor is airborne.
pub fn resolve_rider(
    window: &LandingWindow,
    body: &mut RiderBody,
    surfaces: &[OneWaySurface],
) -> Option<Entity> {
    let hit = *find_landing(window, &body.bounds, body.velocity.y, surfaces)?;

    body.bounds.center.y = body.bounds.center_y_for_bottom(hit.top);
    body.velocity.y = 0.0;
    if hit.delta_x != 0.0 {
        body.bounds.center.x += hit.delta_x;
    }
    Some(hit.platform)
}
