//! suPURR Fluid
//!
//! Frictionless momentum: holding a direction accelerates the cat,
//! letting go keeps the speed. The only brake is a wall, which damps the
//! velocity once per contact.

use macroquad::prelude::*;
use crate::config::GameConfig;
use crate::game::components::Kind;
use crate::game::render::{self, draw_text_centered};
use crate::game::{systems, Entity, SceneContext};
use crate::input::FrameInput;
use super::{axis_direction, draw_hint, set_steering, set_velocity_x, spawn_player, SceneId};

const FLOOR_TINT: Color = Color::new(0.2, 0.25, 0.4, 1.0);
const WALL_TINT: Color = Color::new(0.15, 0.2, 0.35, 1.0);
const TITLE_TINT: Color = Color::new(0.0, 0.78, 1.0, 0.9);
const SUBTITLE_TINT: Color = Color::new(0.59, 0.86, 1.0, 0.8);
const READOUT_TINT: Color = Color::new(0.0, 1.0, 1.0, 1.0);

const SLAB_THICKNESS: f32 = 80.0;
const WALL_WIDTH: f32 = 50.0;

pub struct SupurrFluidScene {
    ctx: SceneContext<()>,
    config: GameConfig,
    cat: Entity,
    /// Accumulated horizontal velocity, only changed by input and walls
    velocity_x: f32,
}

impl SupurrFluidScene {
    pub fn new(config: &GameConfig) -> Self {
        let width = config.display.virtual_width;
        let height = config.display.virtual_height;
        let arena = config.supurr_fluid.arena_width;
        let mut ctx = SceneContext::new(width, height);

        ctx.world.spawn_solid(Kind::Ground, 0.0, height, arena, SLAB_THICKNESS, FLOOR_TINT);
        ctx.world.spawn_solid(Kind::Ceiling, 0.0, 0.0, arena, SLAB_THICKNESS, FLOOR_TINT);
        ctx.world.spawn_solid(Kind::Wall, 0.0, 0.0, WALL_WIDTH, height, WALL_TINT);
        ctx.world.spawn_solid(Kind::Wall, arena - WALL_WIDTH, 0.0, WALL_WIDTH, height, WALL_TINT);

        let cat = spawn_player(
            &mut ctx.world,
            config,
            vec2(width / 2.0, height - 100.0),
            config.supurr_fluid.scale,
            config.player.max_fall_speed,
            WHITE,
        );
        println!("[supurr_fluid] arena {} wide", arena);

        let mut scene = Self {
            ctx,
            config: config.clone(),
            cat,
            velocity_x: 0.0,
        };
        scene.follow_cat();
        scene
    }

    pub fn update(&mut self, input: &FrameInput, dt: f32) -> Option<SceneId> {
        if input.back_pressed {
            return Some(SceneId::Menu);
        }
        let tuning = self.config.supurr_fluid;
        let debug_log = self.config.debug_log;
        self.ctx.elapsed += dt;

        let direction = axis_direction(input.horizontal);
        self.velocity_x = (self.velocity_x + direction * tuning.acceleration * dt)
            .clamp(-tuning.max_speed, tuning.max_speed);
        set_steering(&mut self.ctx.world, self.cat, direction, self.velocity_x.abs() > tuning.walk_threshold);

        if input.jump_pressed {
            systems::try_jump(&mut self.ctx.world, &mut self.ctx.events, self.cat, tuning.jump_force);
        }

        set_velocity_x(&mut self.ctx.world, self.cat, self.velocity_x);
        self.ctx.physics.step(&mut self.ctx.world, &mut self.ctx.events, &self.config.physics, dt, debug_log);
        self.damp_on_wall_hit();
        systems::update_locomotion(&mut self.ctx.world, &mut self.ctx.events, &self.config.locomotion);
        systems::animate_sprites(&mut self.ctx.world, dt);

        self.follow_cat();
        self.ctx.end_tick();
        None
    }

    fn damp_on_wall_hit(&mut self) {
        let hits = self
            .ctx
            .events
            .collision_enter
            .iter()
            .filter_map(|contact| contact.other(self.cat))
            .filter(|other| self.ctx.world.kinds.get(*other) == Some(&Kind::Wall))
            .count();
        for _ in 0..hits {
            self.velocity_x *= self.config.supurr_fluid.wall_damping;
            if self.config.debug_log {
                println!("FLUID|wall hit|vx {:.1}", self.velocity_x);
            }
        }
    }

    fn follow_cat(&mut self) {
        let x = self.ctx.world.position(self.cat).map(|p| p.x).unwrap_or(0.0);
        self.ctx.camera.set_target(x, self.config.display.virtual_height / 2.0 + 40.0);
    }

    pub fn velocity_x(&self) -> f32 {
        self.velocity_x
    }

    pub fn draw(&self) {
        let width = self.config.display.virtual_width;
        let height = self.config.display.virtual_height;

        set_camera(&self.ctx.camera.world());
        render::draw_world(&self.ctx.world);

        set_camera(&self.ctx.camera.hud());
        draw_hint("ESC - Return to Menu", LIGHTGRAY);
        draw_text_centered("suPURR Fluid Cat", width / 2.0, 30.0, 26.0, TITLE_TINT);
        draw_text_centered("Frictionless momentum! Hit walls to slow down.", width / 2.0, 55.0, 18.0, SUBTITLE_TINT);

        let position = self.ctx.world.position(self.cat).unwrap_or_default();
        let velocity_y = self.ctx.world.velocity(self.cat).y;
        draw_text(
            &format!("Velocity X: {:.1} | Velocity Y: {:.1}", self.velocity_x, velocity_y),
            10.0,
            height - 45.0,
            18.0,
            READOUT_TINT,
        );
        draw_text(
            &format!("Pos: ({:.0}, {:.0})", position.x, position.y),
            10.0,
            height - 25.0,
            18.0,
            READOUT_TINT,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platforming::LocomotionState;

    const DT: f32 = 1.0 / 60.0;

    fn settle(scene: &mut SupurrFluidScene) {
        for _ in 0..60 {
            scene.update(&FrameInput::default(), DT);
        }
    }

    fn state(scene: &SupurrFluidScene) -> LocomotionState {
        scene.ctx.world.actors.get(scene.cat).unwrap().locomotion.state()
    }

    #[test]
    fn test_momentum_is_kept() {
        let mut scene = SupurrFluidScene::new(&GameConfig::default());
        settle(&mut scene);

        let right = FrameInput { horizontal: 1.0, ..Default::default() };
        for _ in 0..60 {
            scene.update(&right, DT);
        }
        assert!((scene.velocity_x() - 30.0).abs() < 0.01);

        // No friction once released
        settle(&mut scene);
        assert!((scene.velocity_x() - 30.0).abs() < 0.01);
    }

    #[test]
    fn test_speed_is_clamped() {
        let mut scene = SupurrFluidScene::new(&GameConfig::default());
        scene.velocity_x = -599.9;
        let left = FrameInput { horizontal: -1.0, ..Default::default() };
        for _ in 0..10 {
            scene.update(&left, DT);
        }
        assert_eq!(scene.velocity_x(), -600.0);
    }

    #[test]
    fn test_wall_damps_once_per_contact() {
        let mut scene = SupurrFluidScene::new(&GameConfig::default());
        settle(&mut scene);
        let cat = scene.cat;
        let y = scene.ctx.world.position(cat).unwrap().y;
        scene.ctx.world.positions.insert(cat, vec2(120.0, y));
        scene.velocity_x = -400.0;

        for _ in 0..30 {
            scene.update(&FrameInput::default(), DT);
        }
        assert!((scene.velocity_x() + 120.0).abs() < 1e-3, "vx = {}", scene.velocity_x());
        // Pressed against the wall, not through it
        assert!((scene.ctx.world.position(cat).unwrap().x - 86.0).abs() < 1e-3);
    }

    #[test]
    fn test_walk_visual_follows_speed() {
        let mut scene = SupurrFluidScene::new(&GameConfig::default());
        settle(&mut scene);
        assert_eq!(state(&scene), LocomotionState::Idle);

        scene.velocity_x = 100.0;
        scene.update(&FrameInput::default(), DT);
        assert_eq!(state(&scene), LocomotionState::Walking);

        scene.velocity_x = 40.0;
        scene.update(&FrameInput::default(), DT);
        assert_eq!(state(&scene), LocomotionState::Idle);
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let mut scene = SupurrFluidScene::new(&GameConfig::default());
        let jump = FrameInput { jump_pressed: true, ..Default::default() };
        // Still falling from the spawn point
        scene.update(&jump, DT);
        assert!(scene.ctx.world.velocity(scene.cat).y > 0.0);

        settle(&mut scene);
        scene.update(&jump, DT);
        assert!(scene.ctx.world.velocity(scene.cat).y < -700.0);
        assert_eq!(state(&scene), LocomotionState::RisingFast);
    }
}
