//! Scene Context
//!
//! Everything a running scene owns: its world, event queues, timers,
//! physics contacts, camera and the registry of live one-way platforms.
//! Dropping the context drops all of it, which is how switching scenes
//! cancels pending timers and releases every entity at once.

use crate::platforming::OneWaySurface;
use super::camera::GameCamera;
use super::entity::Entity;
use super::event::Events;
use super::physics::Physics;
use super::timer::Timers;
use super::world::World;

/// Live one-way platforms in declaration order.
///
/// Order matters: when an actor overlaps several landing windows, the
/// first registered platform wins.
#[derive(Debug, Default)]
pub struct PlatformRegistry {
    platforms: Vec<Entity>,
}

impl PlatformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, platform: Entity) {
        self.platforms.push(platform);
    }

    /// Forget platforms that no longer exist.
    pub fn prune(&mut self, world: &World) {
        self.platforms.retain(|p| world.is_alive(*p));
    }

    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.platforms.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    /// Snapshot of every live platform's surface for this tick.
    pub fn surfaces(&self, world: &World) -> Vec<OneWaySurface> {
        self.platforms
            .iter()
            .filter(|p| world.is_alive(**p))
            .filter_map(|&p| {
                let platform = world.platforms.get(p)?;
                Some(OneWaySurface {
                    platform: p,
                    top: platform.top(),
                    left: platform.left(),
                    right: platform.right(),
                    delta_x: platform.motion.delta_x(),
                })
            })
            .collect()
    }
}

/// Per-scene state. `T` is the scene's timer payload type.
pub struct SceneContext<T> {
    pub world: World,
    pub events: Events,
    pub timers: Timers<T>,
    pub physics: Physics,
    pub camera: GameCamera,
    pub platforms: PlatformRegistry,
    /// Seconds since the scene started
    pub elapsed: f32,
}

impl<T: Clone> SceneContext<T> {
    pub fn new(virtual_width: f32, virtual_height: f32) -> Self {
        Self {
            world: World::new(),
            events: Events::new(),
            timers: Timers::new(),
            physics: Physics::new(),
            camera: GameCamera::new(virtual_width, virtual_height),
            platforms: PlatformRegistry::new(),
            elapsed: 0.0,
        }
    }

    /// Apply deferred despawns and reset per-tick queues.
    pub fn end_tick(&mut self) {
        self.world.flush_despawns();
        self.platforms.prune(&self.world);
        self.events.clear_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroquad::prelude::WHITE;
    use crate::platforming::PlatformSpec;

    fn spec(x: f32, y: f32) -> PlatformSpec {
        PlatformSpec {
            center_x: x,
            track_y: y,
            width: 180.0,
            height: 40.0,
            range: 100.0,
            speed: 60.0,
            active: true,
        }
    }

    #[test]
    fn test_surfaces_skip_dead_platforms() {
        let mut world = World::new();
        let mut registry = PlatformRegistry::new();
        let a = world.spawn_platform(&spec(300.0, 500.0), WHITE);
        let b = world.spawn_platform(&spec(600.0, 300.0), WHITE);
        registry.register(a);
        registry.register(b);

        world.despawn_immediate(a);
        let surfaces = registry.surfaces(&world);
        assert_eq!(surfaces.len(), 1);
        assert_eq!(surfaces[0].platform, b);
        assert_eq!(surfaces[0].top, 280.0);
        assert_eq!((surfaces[0].left, surfaces[0].right), (510.0, 690.0));

        registry.prune(&world);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_end_tick_flushes() {
        let mut ctx: SceneContext<()> = SceneContext::new(1000.0, 480.0);
        let p = ctx.world.spawn_platform(&spec(300.0, 500.0), WHITE);
        ctx.platforms.register(p);
        ctx.world.despawn(p);
        ctx.timers.wait(1.0, ());

        ctx.end_tick();
        assert!(!ctx.world.is_alive(p));
        assert!(ctx.platforms.is_empty());
        assert_eq!(ctx.timers.len(), 1);
    }
}
