//! Entanglement
//!
//! Two cats climb a shaft of moving one-way platforms. The pink twin
//! steers mirrored, so every move helps one cat and fights the other.
//! Both have to get above the goal line. Side walls are streamed in
//! segments around the camera.

use macroquad::prelude::*;
use crate::config::GameConfig;
use crate::game::components::{Kind, Shape, Sprite, Velocity};
use crate::game::render::{self, draw_text_centered};
use crate::game::{systems, Entity, SceneContext, World};
use crate::input::FrameInput;
use crate::platforming::level::{self, QuadRng, RangeRng};
use crate::platforming::{SegmentBuilder, SegmentStreamer};
use super::{axis_direction, draw_hint, set_steering, set_velocity_x, spawn_player, SceneId};

const GROUND_HEIGHT: f32 = 40.0;
const GROUND_TINT: Color = Color::new(0.25, 0.22, 0.35, 1.0);
const WALL_TINT: Color = Color::new(0.18, 0.16, 0.3, 1.0);
const PLATFORM_TINT: Color = Color::new(0.55, 0.45, 0.8, 1.0);
const GOAL_TINT: Color = Color::new(0.39, 1.0, 0.39, 1.0);
const VICTORY_TINT: Color = Color::new(1.0, 0.78, 0.39, 1.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timer {
    ReturnToMenu,
}

/// Builds and removes the two wall slabs of one segment.
struct WallBuilder<'a> {
    world: &'a mut World,
    level_height: f32,
    arena_width: f32,
    wall_width: f32,
    segment_height: f32,
}

impl SegmentBuilder for WallBuilder<'_> {
    type Chunk = [Entity; 2];

    fn build(&mut self, index: i32) -> [Entity; 2] {
        let top = self.level_height - index as f32 * self.segment_height;
        let left = self.world.spawn_solid(Kind::WallSegment, 0.0, top, self.wall_width, self.segment_height, WALL_TINT);
        let right = self.world.spawn_solid(
            Kind::WallSegment,
            self.arena_width - self.wall_width,
            top,
            self.wall_width,
            self.segment_height,
            WALL_TINT,
        );
        [left, right]
    }

    fn destroy(&mut self, _index: i32, chunk: [Entity; 2]) {
        for entity in chunk {
            self.world.despawn(entity);
        }
    }
}

pub struct EntanglementScene {
    ctx: SceneContext<Timer>,
    config: GameConfig,
    walls: SegmentStreamer<[Entity; 2]>,
    /// Steers with the input
    normal: Entity,
    /// Steers mirrored
    twin: Entity,
    victory: bool,
}

impl EntanglementScene {
    pub fn new(config: &GameConfig) -> Self {
        Self::with_rng(config, &mut QuadRng)
    }

    pub fn with_rng(config: &GameConfig, rng: &mut impl RangeRng) -> Self {
        let width = config.display.virtual_width;
        let settings = &config.entanglement;
        let level_height = settings.tower.level_height;
        let mut ctx = SceneContext::new(width, config.display.virtual_height);

        ctx.world.spawn_solid(Kind::Ground, 0.0, level_height - GROUND_HEIGHT, width, GROUND_HEIGHT, GROUND_TINT);

        let layout = match settings.layout.as_deref() {
            Some(path) => match level::load_layout(path) {
                Ok(layout) => {
                    println!("[entanglement] loaded layout {}", path);
                    layout
                }
                Err(e) => {
                    eprintln!("[entanglement] {}: {}, generating tower instead", path, e);
                    level::generate_tower(&settings.tower, rng)
                }
            },
            None => level::generate_tower(&settings.tower, rng),
        };
        for spec in &layout.platforms {
            let platform = ctx.world.spawn_platform(spec, PLATFORM_TINT);
            ctx.platforms.register(platform);
        }

        let goal = ctx.world.spawn_at(vec2(width / 2.0, settings.goal_y));
        ctx.world.kinds.insert(goal, Kind::Goal);
        ctx.world.sprites.insert(goal, Sprite::new(Shape::Rect, vec2(width, 20.0), GOAL_TINT, 1).with_opacity(0.3));

        let scale = config.player.scale;
        let max_fall = config.player.max_fall_speed;
        let normal = spawn_player(&mut ctx.world, config, vec2(width / 3.0, level_height - 100.0), scale, max_fall, WHITE);
        let twin = spawn_player(
            &mut ctx.world,
            config,
            vec2(width / 3.0 * 2.0, level_height - 100.0),
            scale,
            max_fall,
            settings.twin_tint.color(),
        );

        println!(
            "[entanglement] {} platforms over a {} tall shaft",
            layout.platforms.len(),
            level_height
        );

        let mut scene = Self {
            ctx,
            config: config.clone(),
            walls: SegmentStreamer::new(settings.walls),
            normal,
            twin,
            victory: false,
        };
        scene.update_camera();
        scene.ctx.end_tick();
        scene
    }

    pub fn update(&mut self, input: &FrameInput, dt: f32) -> Option<SceneId> {
        if input.back_pressed {
            return Some(SceneId::Menu);
        }
        let debug_log = self.config.debug_log;
        self.ctx.elapsed += dt;

        let direction = axis_direction(input.horizontal);
        let speed = self.config.player.move_speed;
        for (cat, mirror) in [(self.normal, 1.0), (self.twin, -1.0)] {
            let steer = direction * mirror;
            set_steering(&mut self.ctx.world, cat, steer, steer != 0.0);
            set_velocity_x(&mut self.ctx.world, cat, steer * speed);
        }

        if input.jump_pressed {
            for cat in [self.normal, self.twin] {
                systems::try_jump(&mut self.ctx.world, &mut self.ctx.events, cat, self.config.player.jump_force);
            }
        }

        systems::advance_platforms(&mut self.ctx.world, dt);
        self.ctx.physics.step(&mut self.ctx.world, &mut self.ctx.events, &self.config.physics, dt, debug_log);
        systems::resolve_riders(&mut self.ctx.world, &self.ctx.platforms, &self.config.riding, debug_log);
        self.respawn_fallen();
        systems::update_locomotion(&mut self.ctx.world, &mut self.ctx.events, &self.config.locomotion);
        systems::animate_sprites(&mut self.ctx.world, dt);

        self.update_camera();
        self.check_victory();

        let mut next = None;
        for timer in self.ctx.timers.tick(dt) {
            match timer {
                Timer::ReturnToMenu => next = Some(SceneId::Menu),
            }
        }
        self.ctx.end_tick();
        next
    }

    /// Put a cat that fell out of the level back above the floor.
    fn respawn_fallen(&mut self) {
        let width = self.config.display.virtual_width;
        let settings = &self.config.entanglement;
        let floor = settings.tower.level_height;

        for (cat, column) in [(self.normal, 1.0), (self.twin, 2.0)] {
            let Some(position) = self.ctx.world.position(cat) else { continue };
            if position.y <= floor + settings.respawn_below {
                continue;
            }
            self.ctx.world.positions.insert(cat, vec2(width / 3.0 * column, floor - settings.respawn_height));
            self.ctx.world.velocities.insert(cat, Velocity::default());
            if let Some(actor) = self.ctx.world.actors.get_mut(cat) {
                actor.riding = None;
            }
            println!("[entanglement] respawned {:?}", cat);
        }
    }

    /// Follow the cats' average height and stream walls around it.
    fn update_camera(&mut self) {
        let width = self.config.display.virtual_width;
        let height = self.config.display.virtual_height;
        let level_height = self.config.entanglement.tower.level_height;

        let heights = [self.normal, self.twin].map(|cat| {
            self.ctx.world.position(cat).map(|p| p.y).unwrap_or(level_height)
        });
        let average = (heights[0] + heights[1]) / 2.0;
        let camera_y = (average + 50.0).max(height / 2.0);
        self.ctx.camera.set_target(width / 2.0, camera_y);

        let mut builder = WallBuilder {
            world: &mut self.ctx.world,
            level_height,
            arena_width: width,
            wall_width: self.config.entanglement.wall_width,
            segment_height: self.walls.config().segment_height,
        };
        match self.walls.update(level_height - camera_y, &mut builder) {
            Some(report) => {
                if self.config.debug_log && !report.is_empty() {
                    println!("WALL|seg {}|+{:?}|-{:?}", report.current, report.created, report.destroyed);
                }
            }
            None => {
                if self.config.debug_log {
                    println!("WALL|skip|camera_y {}", camera_y);
                }
            }
        }
    }

    fn check_victory(&mut self) {
        if self.victory || !self.both_above_goal() {
            return;
        }
        self.victory = true;
        println!("[entanglement] both cats reached the goal");
        self.ctx.timers.wait(self.config.entanglement.victory_delay, Timer::ReturnToMenu);
    }

    /// Both cats strictly above the goal line.
    pub fn both_above_goal(&self) -> bool {
        let goal_y = self.config.entanglement.goal_y;
        [self.normal, self.twin]
            .iter()
            .all(|&cat| self.ctx.world.position(cat).is_some_and(|p| p.y < goal_y))
    }

    pub fn is_won(&self) -> bool {
        self.victory
    }

    pub fn draw(&self) {
        let width = self.config.display.virtual_width;
        let height = self.config.display.virtual_height;
        let camera = &self.ctx.camera;

        set_camera(&camera.world());
        render::draw_world(&self.ctx.world);
        draw_text_centered("GOAL", width / 2.0, self.config.entanglement.goal_y, 32.0, WHITE);
        if self.victory {
            draw_text_centered("ENTANGLEMENT COMPLETE!", width / 2.0, camera.target.y - 100.0, 32.0, VICTORY_TINT);
        }

        set_camera(&camera.hud());
        draw_hint("ESC - Return to Menu", LIGHTGRAY);
        draw_text_centered("Normal Cat", width / 3.0, height - 30.0, 20.0, Color::new(1.0, 1.0, 1.0, 0.8));
        let twin = self.config.entanglement.twin_tint.color();
        draw_text_centered("Entangled Cat", width / 3.0 * 2.0, height - 30.0, 20.0, Color::new(twin.r, twin.g, twin.b, 0.8));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platforming::LocomotionState;

    const DT: f32 = 1.0 / 60.0;

    struct Midpoint;

    impl RangeRng for Midpoint {
        fn range(&mut self, lo: f32, hi: f32) -> f32 {
            (lo + hi) / 2.0
        }
    }

    fn scene() -> EntanglementScene {
        EntanglementScene::with_rng(&GameConfig::default(), &mut Midpoint)
    }

    fn idle() -> FrameInput {
        FrameInput::default()
    }

    fn teleport(scene: &mut EntanglementScene, cat: Entity, x: f32, y: f32) {
        scene.ctx.world.positions.insert(cat, vec2(x, y));
        scene.ctx.world.velocities.insert(cat, Velocity::default());
    }

    #[test]
    fn test_initial_layout() {
        let scene = scene();
        assert_eq!(scene.ctx.platforms.len(), 24);
        assert_eq!(scene.walls.live_indices(), vec![0, 1, 2]);
        assert_eq!(scene.ctx.world.with_kind(Kind::WallSegment).len(), 6);
        assert_eq!(scene.ctx.world.position(scene.normal).unwrap().x, 1000.0 / 3.0);
        assert!(!scene.is_won());
    }

    #[test]
    fn test_twin_steers_mirrored() {
        let mut scene = scene();
        for _ in 0..30 {
            scene.update(&idle(), DT);
        }
        let normal_start = scene.ctx.world.position(scene.normal).unwrap();
        let twin_start = scene.ctx.world.position(scene.twin).unwrap();
        assert!(scene.ctx.world.is_supported(scene.normal));

        let right = FrameInput { horizontal: 1.0, ..Default::default() };
        for _ in 0..30 {
            scene.update(&right, DT);
        }
        let normal = scene.ctx.world.position(scene.normal).unwrap();
        let twin = scene.ctx.world.position(scene.twin).unwrap();
        assert!(normal.x > normal_start.x + 200.0);
        assert!(twin.x < twin_start.x - 200.0);

        let twin_actor = scene.ctx.world.actors.get(scene.twin).unwrap();
        assert_eq!(twin_actor.locomotion.state(), LocomotionState::Walking);
        assert!(scene.ctx.world.sprites.get(scene.twin).unwrap().flip_x);
        assert!(!scene.ctx.world.sprites.get(scene.normal).unwrap().flip_x);
    }

    #[test]
    fn test_walls_follow_camera() {
        let mut scene = scene();
        let (normal, twin) = (scene.normal, scene.twin);
        teleport(&mut scene, normal, 300.0, 1000.0);
        teleport(&mut scene, twin, 700.0, 1000.0);
        scene.update(&idle(), DT);

        // Camera near 1050, distance 2950: segment 5. Segment 2 is one
        // past the buffer and survives; 0 and 1 are gone.
        assert_eq!(scene.walls.live_indices(), vec![2, 3, 4, 5, 6, 7]);
        assert_eq!(scene.ctx.world.with_kind(Kind::WallSegment).len(), 12);
    }

    #[test]
    fn test_victory_needs_both_cats() {
        let mut scene = scene();
        let (normal, twin) = (scene.normal, scene.twin);
        teleport(&mut scene, normal, 300.0, 50.0);
        scene.update(&idle(), DT);
        assert!(!scene.is_won());

        teleport(&mut scene, normal, 300.0, 50.0);
        teleport(&mut scene, twin, 700.0, 50.0);
        assert_eq!(scene.update(&idle(), DT), None);
        assert!(scene.is_won());

        // Back to the menu after the victory delay
        let mut frames = 0;
        let next = loop {
            frames += 1;
            if let Some(next) = scene.update(&idle(), DT) {
                break next;
            }
            assert!(frames < 400);
        };
        assert_eq!(next, SceneId::Menu);
        assert!(frames >= 170, "returned after {} frames", frames);
    }

    #[test]
    fn test_fallen_cat_respawns() {
        let mut scene = scene();
        let normal = scene.normal;
        teleport(&mut scene, normal, 300.0, 4301.0);
        scene.update(&idle(), DT);

        let position = scene.ctx.world.position(normal).unwrap();
        assert!((position.x - 1000.0 / 3.0).abs() < 1e-3);
        assert_eq!(position.y, 3800.0);
        assert_eq!(scene.ctx.world.ride_of(normal), None);
    }

    #[test]
    fn test_layout_file_replaces_tower() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tower.ron");
        std::fs::write(
            &path,
            "(platforms: [(center_x: 500.0, track_y: 3700.0, width: 180.0, height: 40.0, range: 100.0, speed: 50.0)])",
        )
        .unwrap();

        let mut config = GameConfig::default();
        config.entanglement.layout = Some(path.to_string_lossy().into_owned());
        let scene = EntanglementScene::with_rng(&config, &mut Midpoint);
        assert_eq!(scene.ctx.platforms.len(), 1);

        // A broken path falls back to the generated tower
        config.entanglement.layout = Some(dir.path().join("missing.ron").to_string_lossy().into_owned());
        let scene = EntanglementScene::with_rng(&config, &mut Midpoint);
        assert_eq!(scene.ctx.platforms.len(), 24);
    }

    #[test]
    fn test_escape_returns_to_menu() {
        let mut scene = scene();
        let back = FrameInput { back_pressed: true, ..Default::default() };
        assert_eq!(scene.update(&back, DT), Some(SceneId::Menu));
    }
}
