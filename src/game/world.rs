//! Game World
//!
//! The World is the central container for all scene state:
//! - Entity allocation and lifetime tracking
//! - Component storage for all component types
//! - Deferred entity despawn (to avoid iterator invalidation)
//!
//! Component types are fixed at compile time as typed fields.

use macroquad::prelude::{Color, Vec2};
use crate::platforming::{Locomotion, PlatformMotion, PlatformSpec};
use super::entity::{Entity, EntityAllocator};
use super::component::ComponentStorage;
use super::components::*;

/// All entities of one scene and their components.
pub struct World {
    entities: EntityAllocator,

    /// Entities queued for despawn at end of tick
    despawn_queue: Vec<Entity>,

    // =========================================================================
    // Core
    // =========================================================================

    /// World-space position (center of the entity, y down)
    pub positions: ComponentStorage<Vec2>,

    pub velocities: ComponentStorage<Velocity>,

    // =========================================================================
    // Physics
    // =========================================================================

    pub colliders: ComponentStorage<Collider>,

    pub bodies: ComponentStorage<Body>,

    // =========================================================================
    // Platforming
    // =========================================================================

    pub actors: ComponentStorage<Actor>,

    pub platforms: ComponentStorage<MovingPlatform>,

    // =========================================================================
    // Presentation and tags
    // =========================================================================

    pub sprites: ComponentStorage<Sprite>,

    pub kinds: ComponentStorage<Kind>,

    pub groups: ComponentStorage<Group>,

    pub bobs: ComponentStorage<Bob>,

    pub health: ComponentStorage<Health>,
}

impl World {
    pub fn new() -> Self {
        Self {
            entities: EntityAllocator::new(),
            despawn_queue: Vec::new(),

            positions: ComponentStorage::new(),
            velocities: ComponentStorage::new(),

            colliders: ComponentStorage::new(),
            bodies: ComponentStorage::new(),

            actors: ComponentStorage::new(),
            platforms: ComponentStorage::new(),

            sprites: ComponentStorage::new(),
            kinds: ComponentStorage::new(),
            groups: ComponentStorage::new(),
            bobs: ComponentStorage::new(),
            health: ComponentStorage::new(),
        }
    }

    // =========================================================================
    // Entity Management
    // =========================================================================

    /// Spawn an entity at the origin.
    pub fn spawn(&mut self) -> Entity {
        self.spawn_at(Vec2::ZERO)
    }

    /// Spawn an entity with just a position.
    pub fn spawn_at(&mut self, position: Vec2) -> Entity {
        let entity = self.entities.allocate();
        self.positions.insert(entity, position);
        entity
    }

    /// Queue an entity for despawn at end of tick.
    pub fn despawn(&mut self, entity: Entity) {
        if self.is_alive(entity) && !self.despawn_queue.contains(&entity) {
            self.despawn_queue.push(entity);
        }
    }

    /// Immediately despawn an entity and all its components.
    /// Prefer `despawn()` while iterating.
    pub fn despawn_immediate(&mut self, entity: Entity) {
        if !self.entities.free(entity) {
            return; // Already dead
        }

        let idx = entity.index();
        self.positions.clear_slot(idx);
        self.velocities.clear_slot(idx);
        self.colliders.clear_slot(idx);
        self.bodies.clear_slot(idx);
        self.actors.clear_slot(idx);
        self.platforms.clear_slot(idx);
        self.sprites.clear_slot(idx);
        self.kinds.clear_slot(idx);
        self.groups.clear_slot(idx);
        self.bobs.clear_slot(idx);
        self.health.clear_slot(idx);
    }

    /// Process all queued despawns. Call at end of tick.
    pub fn flush_despawns(&mut self) {
        let queue = std::mem::take(&mut self.despawn_queue);
        for entity in queue {
            self.despawn_immediate(entity);
        }
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    pub fn entity_count(&self) -> u32 {
        self.entities.alive_count()
    }

    /// Every live entity tagged `kind`.
    pub fn with_kind(&self, kind: Kind) -> Vec<Entity> {
        self.kinds
            .iter()
            .filter(|(_, k)| **k == kind)
            .map(|(e, _)| e)
            .collect()
    }

    /// Every live entity in `group`.
    pub fn in_group(&self, group: Group) -> Vec<Entity> {
        self.groups
            .iter()
            .filter(|(_, g)| **g == group)
            .map(|(e, _)| e)
            .collect()
    }

    pub fn position(&self, entity: Entity) -> Option<Vec2> {
        self.positions.get(entity).copied()
    }

    pub fn velocity(&self, entity: Entity) -> Vec2 {
        self.velocities.get(entity).map(|v| v.0).unwrap_or(Vec2::ZERO)
    }

    /// Liveness-checked ride handle of an actor.
    pub fn ride_of(&self, actor: Entity) -> Option<Entity> {
        self.actors
            .get(actor)
            .and_then(|a| a.riding)
            .filter(|platform| self.is_alive(*platform))
    }

    /// Grounded on a static body or riding a live platform.
    pub fn is_supported(&self, actor: Entity) -> bool {
        let grounded = self.bodies.get(actor).map(|b| b.grounded).unwrap_or(false);
        grounded || self.ride_of(actor).is_some()
    }

    // =========================================================================
    // Convenience Spawners
    // =========================================================================

    /// Static box with its top-left corner at `(x, y)`.
    pub fn spawn_solid(&mut self, kind: Kind, x: f32, y: f32, width: f32, height: f32, tint: Color) -> Entity {
        let entity = self.spawn_at(Vec2::new(x + width / 2.0, y + height / 2.0));
        self.colliders.insert(entity, Collider::new(width, height));
        self.bodies.insert(entity, Body::fixed());
        self.kinds.insert(entity, kind);
        self.sprites.insert(entity, Sprite::new(Shape::Rect, Vec2::new(width, height), tint, 1));
        entity
    }

    /// Player character with a dynamic body.
    pub fn spawn_cat(&mut self, position: Vec2, hitbox: Vec2, offset: Vec2, max_fall: f32, sprite: Sprite) -> Entity {
        let entity = self.spawn_at(position);
        self.velocities.insert(entity, Velocity::default());
        self.colliders.insert(entity, Collider::new(hitbox.x, hitbox.y).with_offset(offset));
        self.bodies.insert(entity, Body::dynamic(max_fall));
        self.actors.insert(entity, Actor {
            locomotion: Locomotion::new(),
            ..Default::default()
        });
        self.kinds.insert(entity, Kind::Player);
        self.sprites.insert(entity, sprite);
        entity
    }

    /// One-way moving platform. Has no collider: it is only solid to
    /// actors through the rider resolver.
    pub fn spawn_platform(&mut self, spec: &PlatformSpec, tint: Color) -> Entity {
        let entity = self.spawn_at(Vec2::new(spec.center_x, spec.track_y));
        self.platforms.insert(entity, MovingPlatform {
            motion: PlatformMotion::from_spec(spec),
            track_y: spec.track_y,
            width: spec.width,
            height: spec.height,
        });
        self.kinds.insert(entity, Kind::Platform);
        self.sprites.insert(entity, Sprite::new(Shape::Rect, Vec2::new(spec.width, spec.height), tint, 6));
        entity
    }

    /// Trigger area that reports contacts but never blocks.
    pub fn spawn_sensor(&mut self, kind: Kind, position: Vec2, size: Vec2, sprite: Sprite) -> Entity {
        let entity = self.spawn_at(position);
        self.colliders.insert(entity, Collider::new(size.x, size.y));
        self.kinds.insert(entity, kind);
        self.sprites.insert(entity, sprite);
        entity
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroquad::prelude::WHITE;

    fn spec() -> PlatformSpec {
        PlatformSpec {
            center_x: 300.0,
            track_y: 500.0,
            width: 180.0,
            height: 40.0,
            range: 100.0,
            speed: 50.0,
            active: true,
        }
    }

    #[test]
    fn test_spawn_and_despawn() {
        let mut world = World::new();

        let e1 = world.spawn();
        let e2 = world.spawn();
        assert_eq!(world.entity_count(), 2);

        world.despawn_immediate(e1);
        assert_eq!(world.entity_count(), 1);
        assert!(!world.is_alive(e1));
        assert!(world.is_alive(e2));
        assert!(world.position(e1).is_none());
    }

    #[test]
    fn test_deferred_despawn() {
        let mut world = World::new();
        let e = world.spawn();

        world.despawn(e);
        world.despawn(e);
        assert!(world.is_alive(e));

        world.flush_despawns();
        assert!(!world.is_alive(e));
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn test_ride_handle_goes_stale() {
        let mut world = World::new();
        let platform = world.spawn_platform(&spec(), WHITE);
        let cat = world.spawn_cat(
            Vec2::new(300.0, 400.0),
            Vec2::splat(60.0),
            Vec2::ZERO,
            2000.0,
            Sprite::default(),
        );
        world.actors.get_mut(cat).unwrap().riding = Some(platform);
        assert_eq!(world.ride_of(cat), Some(platform));
        assert!(world.is_supported(cat));

        world.despawn_immediate(platform);
        // A new entity may reuse the slot; the old handle still misses
        let reused = world.spawn();
        assert_eq!(reused.index(), platform.index());
        assert_eq!(world.ride_of(cat), None);
        assert!(!world.is_supported(cat));
    }

    #[test]
    fn test_solid_is_positioned_by_corner() {
        let mut world = World::new();
        let ground = world.spawn_solid(Kind::Ground, 0.0, 3960.0, 1000.0, 40.0, WHITE);
        assert_eq!(world.position(ground), Some(Vec2::new(500.0, 3980.0)));
        assert!(world.bodies.get(ground).unwrap().is_static());
        assert_eq!(world.with_kind(Kind::Ground), vec![ground]);
    }

    #[test]
    fn test_groups() {
        let mut world = World::new();
        let a = world.spawn();
        let b = world.spawn();
        world.groups.insert(a, Group::PhaseOne);
        world.groups.insert(b, Group::PhaseTwo);
        assert_eq!(world.in_group(Group::PhaseOne), vec![a]);
    }
}
