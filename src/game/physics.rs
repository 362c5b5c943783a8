//! Physics
//!
//! Axis-separated AABB movement for dynamic bodies against static ones:
//! gravity accumulates into vertical velocity, the body moves along x and
//! is pushed out of any static box it entered, then the same along y.
//! Being pushed up while falling sets `grounded`; being pushed down while
//! rising kills the upward velocity. Horizontal velocity is never touched,
//! scenes own it.
//!
//! Entities with a velocity but no body (bullets) just drift.
//!
//! After movement, every touching collider pair (at least one side
//! moving) is compared with the previous tick's set to produce
//! enter/exit events.

use std::collections::HashSet;
use macroquad::prelude::Vec2;
use serde::{Serialize, Deserialize};
use super::components::{Collider, Velocity};
use super::entity::Entity;
use super::event::{CollisionEvent, Events};
use super::world::World;

/// Boxes closer than this count as touching.
const CONTACT_SLOP: f32 = 0.5;
/// Penetration below this is rounding noise from the last push-out.
const RESOLVE_EPSILON: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Downward acceleration, units/s²
    pub gravity: f32,
    /// Longest tick integrated in one go; longer frames are clamped
    pub max_step: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: 1500.0,
            max_step: 1.0 / 20.0,
        }
    }
}

/// Result of moving one dynamic body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveResult {
    pub position: Vec2,
    pub velocity: Vec2,
    pub grounded: bool,
    pub hit_wall: bool,
    pub hit_ceiling: bool,
}

fn overlaps(a_min: Vec2, a_max: Vec2, b_min: Vec2, b_max: Vec2, slop: f32) -> bool {
    a_min.x < b_max.x + slop
        && a_max.x > b_min.x - slop
        && a_min.y < b_max.y + slop
        && a_max.y > b_min.y - slop
}

/// Move a box through the static set (`(min, max)` pairs), one axis at
/// a time.
pub fn move_and_collide(
    position: Vec2,
    velocity: Vec2,
    collider: &Collider,
    solids: &[(Vec2, Vec2)],
    dt: f32,
    debug_log: bool,
) -> MoveResult {
    let mut pos = position;
    let mut vel = velocity;
    let mut grounded = false;
    let mut hit_wall = false;
    let mut hit_ceiling = false;

    // Horizontal pass
    pos.x += vel.x * dt;
    for &(solid_min, solid_max) in solids {
        let (min, max) = collider.aabb(pos);
        if !overlaps(min, max, solid_min, solid_max, -RESOLVE_EPSILON) {
            continue;
        }
        let push_left = max.x - solid_min.x;
        let push_right = solid_max.x - min.x;
        // Resolve toward where we came from; fall back to the shallower side
        if vel.x > 0.0 || (vel.x == 0.0 && push_left < push_right) {
            pos.x -= push_left;
        } else {
            pos.x += push_right;
        }
        hit_wall = true;
    }

    // Vertical pass
    pos.y += vel.y * dt;
    for &(solid_min, solid_max) in solids {
        let (min, max) = collider.aabb(pos);
        if !overlaps(min, max, solid_min, solid_max, -RESOLVE_EPSILON) {
            continue;
        }
        let push_up = max.y - solid_min.y;
        let push_down = solid_max.y - min.y;
        if vel.y >= 0.0 && push_up <= push_down {
            pos.y -= push_up;
            vel.y = 0.0;
            grounded = true;
        } else {
            pos.y += push_down;
            if vel.y < 0.0 {
                vel.y = 0.0;
                hit_ceiling = true;
            }
        }
    }

    if debug_log && (hit_wall || hit_ceiling) {
        println!(
            "PHYS|in:({:.0},{:.0})|vel:({:.0},{:.0})|out:({:.0},{:.0})|g:{}|wall:{}|ceil:{}",
            position.x, position.y,
            velocity.x, velocity.y,
            pos.x, pos.y,
            if grounded { "Y" } else { "N" },
            if hit_wall { "Y" } else { "N" },
            if hit_ceiling { "Y" } else { "N" },
        );
    }

    MoveResult {
        position: pos,
        velocity: vel,
        grounded,
        hit_wall,
        hit_ceiling,
    }
}

/// Per-scene physics state: the contact set from the previous tick.
#[derive(Debug, Default)]
pub struct Physics {
    contacts: HashSet<CollisionEvent>,
}

impl Physics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Integrate every moving entity and emit contact changes.
    pub fn step(
        &mut self,
        world: &mut World,
        events: &mut Events,
        settings: &PhysicsSettings,
        dt: f32,
        debug_log: bool,
    ) {
        let dt = dt.min(settings.max_step);

        let solids: Vec<(Vec2, Vec2)> = world
            .bodies
            .iter()
            .filter(|(_, body)| body.is_static())
            .filter_map(|(e, _)| {
                let collider = world.colliders.get(e)?;
                let position = world.positions.get(e)?;
                Some(collider.aabb(*position))
            })
            .collect();

        for entity in world.velocities.entities() {
            let Some(position) = world.position(entity) else { continue };
            let mut velocity = world.velocity(entity);

            match world.bodies.get(entity).copied() {
                Some(body) if !body.is_static() => {
                    velocity.y += settings.gravity * body.gravity_scale * dt;
                    if body.max_fall_speed > 0.0 {
                        velocity.y = velocity.y.min(body.max_fall_speed);
                    }

                    let Some(collider) = world.colliders.get(entity).copied() else {
                        world.positions.insert(entity, position + velocity * dt);
                        world.velocities.insert(entity, Velocity(velocity));
                        continue;
                    };

                    let result = move_and_collide(position, velocity, &collider, &solids, dt, debug_log);
                    world.positions.insert(entity, result.position);
                    world.velocities.insert(entity, Velocity(result.velocity));
                    if let Some(body) = world.bodies.get_mut(entity) {
                        body.grounded = result.grounded;
                    }
                }
                Some(_) => {}
                None => {
                    world.positions.insert(entity, position + velocity * dt);
                }
            }
        }

        self.update_contacts(world, events);
    }

    /// Diff the touching pairs against last tick.
    fn update_contacts(&mut self, world: &World, events: &mut Events) {
        let boxes: Vec<(Entity, Vec2, Vec2, bool)> = world
            .colliders
            .iter()
            .filter_map(|(e, collider)| {
                let position = world.positions.get(e)?;
                let (min, max) = collider.aabb(*position);
                let moving = world.velocities.contains(e);
                Some((e, min, max, moving))
            })
            .collect();

        let mut current = HashSet::new();
        for (i, a) in boxes.iter().enumerate() {
            for b in &boxes[i + 1..] {
                if !a.3 && !b.3 {
                    continue;
                }
                if overlaps(a.1, a.2, b.1, b.2, CONTACT_SLOP) {
                    current.insert(CollisionEvent::new(a.0, b.0));
                }
            }
        }

        let mut entered: Vec<_> = current.difference(&self.contacts).copied().collect();
        let mut exited: Vec<_> = self.contacts.difference(&current).copied().collect();
        // HashSet order is arbitrary; keep event order stable
        entered.sort_by_key(|c| (c.entity_a, c.entity_b));
        exited.sort_by_key(|c| (c.entity_a, c.entity_b));
        for contact in entered {
            events.collision_enter.send(contact);
        }
        for contact in exited {
            events.collision_exit.send(contact);
        }
        self.contacts = current;
    }

    /// Whether two entities touched as of the last step.
    pub fn touching(&self, a: Entity, b: Entity) -> bool {
        self.contacts.contains(&CollisionEvent::new(a, b))
    }

    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroquad::prelude::WHITE;
    use crate::game::components::{Kind, Sprite};

    const DT: f32 = 1.0 / 60.0;

    fn world_with_ground() -> (World, Entity) {
        let mut world = World::new();
        let ground = world.spawn_solid(Kind::Ground, 0.0, 400.0, 1000.0, 40.0, WHITE);
        (world, ground)
    }

    fn spawn_cat(world: &mut World, x: f32, y: f32) -> Entity {
        world.spawn_cat(Vec2::new(x, y), Vec2::splat(60.0), Vec2::ZERO, 2000.0, Sprite::default())
    }

    #[test]
    fn test_falls_and_lands() {
        let (mut world, ground) = world_with_ground();
        let cat = spawn_cat(&mut world, 500.0, 200.0);
        let mut physics = Physics::new();
        let mut events = Events::new();
        let settings = PhysicsSettings::default();

        for _ in 0..120 {
            physics.step(&mut world, &mut events, &settings, DT, false);
        }

        let pos = world.position(cat).unwrap();
        assert!((pos.y - 370.0).abs() < 1e-3, "resting y {}", pos.y);
        assert!(world.bodies.get(cat).unwrap().grounded);
        assert_eq!(world.velocity(cat).y, 0.0);
        assert!(physics.touching(cat, ground));
    }

    #[test]
    fn test_contact_enter_and_exit_once() {
        let (mut world, ground) = world_with_ground();
        let cat = spawn_cat(&mut world, 500.0, 300.0);
        let mut physics = Physics::new();
        let mut events = Events::new();
        let settings = PhysicsSettings::default();

        // Land, then keep resting: exactly one enter
        for _ in 0..60 {
            physics.step(&mut world, &mut events, &settings, DT, false);
        }
        let entered: Vec<_> = events.collision_enter.drain().collect();
        assert_eq!(entered, vec![CollisionEvent::new(cat, ground)]);
        assert!(events.collision_exit.is_empty());

        // Jump away
        world.velocities.insert(cat, Velocity::new(0.0, -780.0));
        physics.step(&mut world, &mut events, &settings, DT, false);
        assert!(events.collision_enter.is_empty());
        assert_eq!(events.collision_exit.len(), 1);
        assert!(!world.bodies.get(cat).unwrap().grounded);
    }

    #[test]
    fn test_wall_stops_position_not_velocity() {
        let mut world = World::new();
        world.spawn_solid(Kind::Wall, 600.0, 0.0, 50.0, 1000.0, WHITE);
        let cat = spawn_cat(&mut world, 565.0, 500.0);
        world.bodies.get_mut(cat).unwrap().gravity_scale = 0.0;
        world.velocities.insert(cat, Velocity::new(600.0, 0.0));

        let mut physics = Physics::new();
        let mut events = Events::new();
        physics.step(&mut world, &mut events, &PhysicsSettings::default(), DT, false);

        // Right edge flush with the wall's left side
        assert!((world.position(cat).unwrap().x - 570.0).abs() < 1e-3);
        assert_eq!(world.velocity(cat).x, 600.0);
    }

    #[test]
    fn test_ceiling_kills_upward_velocity() {
        let collider = Collider::new(60.0, 60.0);
        let ceiling = [(Vec2::new(0.0, 0.0), Vec2::new(1000.0, 80.0))];
        let result = move_and_collide(Vec2::new(500.0, 115.0), Vec2::new(0.0, -600.0), &collider, &ceiling, DT, false);
        assert!(result.hit_ceiling);
        assert_eq!(result.velocity.y, 0.0);
        assert!((result.position.y - 110.0).abs() < 1e-3);
    }

    #[test]
    fn test_max_fall_speed() {
        let mut world = World::new();
        let cat = world.spawn_cat(Vec2::ZERO, Vec2::splat(60.0), Vec2::ZERO, 1000.0, Sprite::default());
        let mut physics = Physics::new();
        let mut events = Events::new();
        for _ in 0..200 {
            physics.step(&mut world, &mut events, &PhysicsSettings::default(), DT, false);
        }
        assert_eq!(world.velocity(cat).y, 1000.0);
    }

    #[test]
    fn test_sensor_reports_contact_without_blocking() {
        let mut world = World::new();
        let bullet = world.spawn_sensor(Kind::Bullet, Vec2::new(0.0, 100.0), Vec2::splat(16.0), Sprite::default());
        world.velocities.insert(bullet, Velocity::new(3000.0, 0.0));
        let enemy = world.spawn_sensor(Kind::Enemy, Vec2::new(50.0, 100.0), Vec2::splat(80.0), Sprite::default());

        let mut physics = Physics::new();
        let mut events = Events::new();
        physics.step(&mut world, &mut events, &PhysicsSettings::default(), DT, false);

        assert!((world.position(bullet).unwrap().x - 50.0).abs() < 1e-3);
        assert_eq!(events.collision_enter.len(), 1);
        assert!(events.collision_enter.iter().all(|c| c.involves(enemy)));
    }

    #[test]
    fn test_static_pairs_are_ignored() {
        let mut world = World::new();
        world.spawn_solid(Kind::Wall, 0.0, 0.0, 50.0, 500.0, WHITE);
        world.spawn_solid(Kind::Ground, 0.0, 480.0, 1000.0, 40.0, WHITE);
        let mut physics = Physics::new();
        let mut events = Events::new();
        physics.step(&mut world, &mut events, &PhysicsSettings::default(), DT, false);
        assert_eq!(physics.contact_count(), 0);
    }
}
