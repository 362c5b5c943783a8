//! Tick Systems
//!
//! Steps run by the platforming scenes every frame, in this order:
//! 1. `advance_platforms` - motion model, updates platform positions
//! 2. physics (`Physics::step`)
//! 3. `resolve_riders` - one-way landings and carry
//! 4. `update_locomotion` - state machine and sprite visuals
//! 5. `animate_sprites`

use macroquad::prelude::Vec2;
use crate::platforming::locomotion::{self, cat_frames, Visual};
use crate::platforming::rider::{self, ActorBounds, RiderBody};
use crate::platforming::{LandingWindow, LocomotionInput, LocomotionState, LocomotionThresholds};
use super::components::{Sprite, Velocity};
use super::context::PlatformRegistry;
use super::entity::Entity;
use super::event::{AnimationChangedEvent, Events};
use super::world::World;

/// Advance every moving platform and move its entity to the new center.
pub fn advance_platforms(world: &mut World, dt: f32) {
    for entity in world.platforms.entities() {
        let Some(platform) = world.platforms.get_mut(entity) else { continue };
        platform.motion.advance(dt);
        let position = Vec2::new(platform.motion.center_x(), platform.track_y);
        world.positions.insert(entity, position);
    }
}

/// Land actors on one-way platforms and carry riders.
///
/// Surfaces are snapshotted once before any actor is resolved, so two
/// actors on the same platform see the same `delta_x`.
pub fn resolve_riders(world: &mut World, registry: &PlatformRegistry, window: &LandingWindow, debug_log: bool) {
    let surfaces = registry.surfaces(world);

    for entity in world.actors.entities() {
        let (Some(position), Some(collider)) = (world.position(entity), world.colliders.get(entity).copied()) else {
            continue;
        };
        let mut body = RiderBody {
            bounds: ActorBounds {
                center: Vec2::new(position.x + collider.offset.x, position.y),
                half_extents: collider.half_extents,
                offset_y: collider.offset.y,
            },
            velocity: world.velocity(entity),
        };

        let ride = rider::resolve_rider(window, &mut body, &surfaces);

        if let Some(actor) = world.actors.get_mut(entity) {
            if debug_log && actor.riding != ride {
                println!("RIDE|{:?}|{:?}->{:?}", entity, actor.riding, ride);
            }
            actor.riding = ride;
        }
        if ride.is_some() {
            world.positions.insert(entity, Vec2::new(body.bounds.center.x - collider.offset.x, body.bounds.center.y));
            world.velocities.insert(entity, Velocity(body.velocity));
        }
    }
}

/// Switch a sprite to the visual of a locomotion state.
pub fn apply_visual(sprite: &mut Sprite, state: LocomotionState) {
    match locomotion::visual_for(state) {
        Visual::Animation { first, last, fps } => sprite.play(first, last, fps),
        Visual::Frame(frame) => sprite.show_frame(frame),
    }
}

/// Run every actor's state machine; visuals change only on transitions.
pub fn update_locomotion(world: &mut World, events: &mut Events, thresholds: &LocomotionThresholds) {
    for entity in world.actors.entities() {
        let grounded = world.bodies.get(entity).map(|b| b.grounded).unwrap_or(false);
        let riding = world.ride_of(entity).is_some();
        let velocity_y = world.velocity(entity).y;

        let Some(actor) = world.actors.get_mut(entity) else { continue };
        let input = LocomotionInput {
            grounded,
            riding,
            horizontal: actor.input_x,
            moving: actor.moving,
            velocity_y,
        };
        let from = actor.locomotion.state();
        let changed = actor.locomotion.update(thresholds, &input);
        let facing_right = actor.locomotion.facing_right();

        if let Some(sprite) = world.sprites.get_mut(entity) {
            if let Some(to) = changed {
                apply_visual(sprite, to);
            }
            sprite.flip_x = !facing_right;
        }
        if let Some(to) = changed {
            events.animation_changed.send(AnimationChangedEvent { entity, from, to });
        }
    }
}

/// Jump if grounded or riding a live platform. Clears the ride.
pub fn try_jump(world: &mut World, events: &mut Events, entity: Entity, force: f32) -> bool {
    if !world.is_supported(entity) {
        return false;
    }

    let velocity = world.velocity(entity);
    world.velocities.insert(entity, Velocity(Vec2::new(velocity.x, -force)));
    if let Some(body) = world.bodies.get_mut(entity) {
        body.grounded = false;
    }
    if let Some(actor) = world.actors.get_mut(entity) {
        actor.riding = None;
        let from = actor.locomotion.state();
        actor.locomotion.force(LocomotionState::RisingFast);
        if from != LocomotionState::RisingFast {
            events.animation_changed.send(AnimationChangedEvent {
                entity,
                from,
                to: LocomotionState::RisingFast,
            });
        }
    }
    if let Some(sprite) = world.sprites.get_mut(entity) {
        sprite.show_frame(cat_frames::JUMP_START);
    }
    true
}

/// Step looping sprite animations and hit flashes.
pub fn animate_sprites(world: &mut World, dt: f32) {
    for (_, sprite) in world.sprites.iter_mut() {
        if let Some(anim) = sprite.anim.as_mut() {
            sprite.frame = anim.advance(dt);
        }
        if sprite.flash > 0.0 {
            sprite.flash = (sprite.flash - dt).max(0.0);
        }
    }
}

/// Sine drift for bobbing pickups. `time` is scene time in seconds.
pub fn apply_bob(world: &mut World, time: f32) {
    for (entity, bob) in world.bobs.iter() {
        if let Some(position) = world.positions.get_mut(entity) {
            position.y += (time * bob.frequency + bob.phase).sin() * bob.amplitude;
        }
    }
}
