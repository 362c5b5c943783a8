//! Photo-Electric
//!
//! Phase 1: run and jump to collect blinking photons before the
//! countdown runs out. Phase 2: every photon becomes an electron bullet
//! for the gun at the bottom of the screen, aimed at a teleporting enemy.

use macroquad::prelude::*;
use crate::config::GameConfig;
use crate::game::components::{Bob, Group, Health, Kind, Shape, Sprite, Velocity};
use crate::game::render;
use crate::game::timer::TimerId;
use crate::game::{systems, Entity, SceneContext};
use crate::input::FrameInput;
use crate::platforming::level::{QuadRng, RangeRng};
use super::{axis_direction, draw_end_screen, draw_hint, set_steering, set_velocity_x, spawn_player, SceneId};

const SLAB_TINT: Color = Color::new(0.2, 0.3, 0.35, 1.0);
const PHOTON_TINT: Color = Color::new(1.0, 0.95, 0.4, 1.0);
const ENEMY_TINT: Color = Color::new(0.78, 0.0, 1.0, 1.0);
const BULLET_TINT: Color = Color::new(0.39, 0.78, 1.0, 1.0);
const GUN_TINT: Color = Color::new(0.7, 0.7, 0.75, 1.0);
const HUD_TINT: Color = Color::new(0.0, 1.0, 1.0, 1.0);
const ENEMY_HP_TINT: Color = Color::new(1.0, 0.2, 0.39, 1.0);

const WALL_WIDTH: f32 = 50.0;
const PHOTON_SIZE: f32 = 24.0;
const ENEMY_SIZE: f32 = 60.0;
const BULLET_RADIUS: f32 = 8.0;
/// Crosshair keeps this far from the screen edges
const AIM_MARGIN: f32 = 50.0;
/// Bullets past this margin outside the screen are removed
const OFFSCREEN_MARGIN: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timer {
    Countdown,
    SpawnPhoton,
    ExpirePhoton(Entity),
    Teleport,
    CheckDefeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Victory,
    Defeat,
}

/// Phase 1 state
#[derive(Debug)]
struct Collecting {
    photons: u32,
    seconds_left: u32,
    countdown: TimerId,
    spawner: TimerId,
}

/// Phase 2 state
#[derive(Debug)]
struct Shooting {
    bullets: u32,
    aim: Vec2,
    gun: Entity,
    crosshair: Entity,
    enemy: Entity,
    outcome: Option<Outcome>,
}

#[derive(Debug)]
enum Phase {
    Collecting(Collecting),
    Shooting(Shooting),
}

pub struct PhotoElectricScene {
    ctx: SceneContext<Timer>,
    config: GameConfig,
    cat: Entity,
    phase: Phase,
    rng: QuadRng,
}

impl PhotoElectricScene {
    pub fn new(config: &GameConfig) -> Self {
        let width = config.display.virtual_width;
        let height = config.display.virtual_height;
        let tuning = &config.photo_electric;
        let arena = tuning.arena_width;
        let ground_y = height - 5.0;
        let mut ctx = SceneContext::new(width, height);

        let slabs = [
            ctx.world.spawn_solid(Kind::Ground, 0.0, ground_y, arena, 80.0, SLAB_TINT),
            ctx.world.spawn_solid(Kind::Ceiling, 0.0, -100.0, arena, 100.0, SLAB_TINT),
            ctx.world.spawn_solid(Kind::Wall, 0.0, 0.0, WALL_WIDTH, height, SLAB_TINT),
            ctx.world.spawn_solid(Kind::Wall, arena, 0.0, WALL_WIDTH, height, SLAB_TINT),
        ];
        let cat = spawn_player(
            &mut ctx.world,
            config,
            vec2(width / 2.0, ground_y - 100.0),
            0.8,
            tuning.max_fall_speed,
            WHITE,
        );
        for entity in slabs.into_iter().chain([cat]) {
            ctx.world.groups.insert(entity, Group::PhaseOne);
        }

        let countdown = ctx.timers.every(1.0, Timer::Countdown);
        let spawner = ctx.timers.every(tuning.spawn_interval, Timer::SpawnPhoton);
        println!("[photo_electric] phase 1: {} seconds to collect", tuning.countdown);

        let mut scene = Self {
            ctx,
            config: config.clone(),
            cat,
            phase: Phase::Collecting(Collecting {
                photons: 0,
                seconds_left: tuning.countdown,
                countdown,
                spawner,
            }),
            rng: QuadRng,
        };
        scene.follow_cat();
        scene
    }

    pub fn update(&mut self, input: &FrameInput, dt: f32) -> Option<SceneId> {
        if input.back_pressed {
            return Some(SceneId::Menu);
        }
        self.ctx.elapsed += dt;

        let next = match self.phase {
            Phase::Collecting(_) => {
                self.update_collecting(input, dt);
                None
            }
            Phase::Shooting(_) => self.update_shooting(input, dt),
        };
        if next.is_some() {
            return next;
        }

        for timer in self.ctx.timers.tick(dt) {
            self.on_timer(timer);
        }
        self.ctx.end_tick();
        None
    }

    // =========================================================================
    // Phase 1
    // =========================================================================

    fn update_collecting(&mut self, input: &FrameInput, dt: f32) {
        let debug_log = self.config.debug_log;
        let tuning = self.config.photo_electric;
        let world = &mut self.ctx.world;

        let direction = axis_direction(input.horizontal);
        set_steering(world, self.cat, direction, direction != 0.0);
        set_velocity_x(world, self.cat, direction * tuning.move_speed);
        if input.jump_held {
            systems::try_jump(world, &mut self.ctx.events, self.cat, tuning.jump_force);
        }

        systems::apply_bob(world, self.ctx.elapsed);
        self.ctx.physics.step(world, &mut self.ctx.events, &self.config.physics, dt, debug_log);
        systems::update_locomotion(world, &mut self.ctx.events, &self.config.locomotion);
        systems::animate_sprites(world, dt);

        let collected: Vec<Entity> = self
            .ctx
            .events
            .collision_enter
            .iter()
            .filter_map(|contact| contact.other(self.cat))
            .filter(|other| self.ctx.world.kinds.get(*other) == Some(&Kind::Photon))
            .collect();
        if let Phase::Collecting(state) = &mut self.phase {
            for photon in collected {
                state.photons += 1;
                self.ctx.world.despawn(photon);
            }
        }

        self.follow_cat();
    }

    fn follow_cat(&mut self) {
        let x = self.ctx.world.position(self.cat).map(|p| p.x).unwrap_or(0.0);
        self.ctx.camera.set_target(x, self.config.display.virtual_height / 2.0 + 40.0);
    }

    fn spawn_photon(&mut self) {
        let tuning = self.config.photo_electric;
        let height = self.config.display.virtual_height;
        let x = self.rng.range(120.0, tuning.arena_width - 60.0);
        let y = self.rng.range(140.0, height - 90.0 - 120.0);

        let photon = self.ctx.world.spawn_sensor(
            Kind::Photon,
            vec2(x, y),
            Vec2::splat(PHOTON_SIZE),
            Sprite::new(Shape::Circle, Vec2::splat(PHOTON_SIZE), PHOTON_TINT, 5),
        );
        self.ctx.world.groups.insert(photon, Group::PhaseOne);
        self.ctx.world.bobs.insert(photon, Bob {
            phase: self.rng.range(0.0, 100.0),
            frequency: 4.0,
            amplitude: 0.3,
        });

        let lifetime = self.rng.range(tuning.photon_lifetime_min, tuning.photon_lifetime_max);
        self.ctx.timers.wait(lifetime, Timer::ExpirePhoton(photon));
    }

    // =========================================================================
    // Phase 2
    // =========================================================================

    /// Tear down phase 1 and arm the gun with `bullets` electrons.
    fn start_shooting(&mut self, bullets: u32) {
        if let Phase::Collecting(state) = &self.phase {
            self.ctx.timers.cancel(state.countdown);
            self.ctx.timers.cancel(state.spawner);
        }
        for entity in self.ctx.world.in_group(Group::PhaseOne) {
            self.ctx.world.despawn(entity);
        }

        let width = self.config.display.virtual_width;
        let height = self.config.display.virtual_height;
        let tuning = self.config.photo_electric;
        self.ctx.camera.set_target(width / 2.0, height / 2.0);

        let world = &mut self.ctx.world;
        let aim = vec2(width / 2.0, height / 2.0);

        let gun = world.spawn_at(vec2(width / 2.0, height - 80.0));
        world.kinds.insert(gun, Kind::Gun);
        world.groups.insert(gun, Group::PhaseTwo);
        let mut gun_sprite = Sprite::new(Shape::Gun, vec2(50.0, 40.0), GUN_TINT, 11).with_scale(1.7);
        gun_sprite.show_frame(1);
        world.sprites.insert(gun, gun_sprite);

        let crosshair = world.spawn_at(aim);
        world.kinds.insert(crosshair, Kind::Crosshair);
        world.groups.insert(crosshair, Group::PhaseTwo);
        world.sprites.insert(crosshair, Sprite::new(Shape::Crosshair, Vec2::splat(12.0), WHITE, 10).with_scale(2.5));

        let enemy_position = self.random_enemy_position();
        let world = &mut self.ctx.world;
        let enemy = world.spawn_sensor(
            Kind::Enemy,
            enemy_position,
            Vec2::splat(ENEMY_SIZE),
            Sprite::new(Shape::Rect, Vec2::splat(ENEMY_SIZE), ENEMY_TINT, 5),
        );
        world.groups.insert(enemy, Group::PhaseTwo);
        world.health.insert(enemy, Health::new(tuning.enemy_health));

        let period = self.rng.range(tuning.teleport_min, tuning.teleport_max);
        self.ctx.timers.every(period, Timer::Teleport);
        if bullets == 0 {
            self.ctx.timers.wait(tuning.defeat_delay, Timer::CheckDefeat);
        }

        println!("[photo_electric] phase 2: {} electron bullets", bullets);
        self.phase = Phase::Shooting(Shooting {
            bullets,
            aim,
            gun,
            crosshair,
            enemy,
            outcome: None,
        });
    }

    fn random_enemy_position(&mut self) -> Vec2 {
        let width = self.config.display.virtual_width;
        let height = self.config.display.virtual_height;
        vec2(
            self.rng.range(100.0, width - 100.0),
            self.rng.range(100.0, height - 200.0),
        )
    }

    fn update_shooting(&mut self, input: &FrameInput, dt: f32) -> Option<SceneId> {
        let width = self.config.display.virtual_width;
        let height = self.config.display.virtual_height;
        let tuning = self.config.photo_electric;
        let debug_log = self.config.debug_log;
        let Phase::Shooting(state) = &mut self.phase else { return None };

        if state.outcome.is_some() {
            // End screen: Space plays again
            return input.jump_pressed.then_some(SceneId::PhotoElectric);
        }

        let step = vec2(axis_direction(input.horizontal), axis_direction(input.vertical)) * tuning.aim_speed * dt;
        state.aim = (state.aim + step).clamp(
            vec2(AIM_MARGIN, AIM_MARGIN),
            vec2(width - AIM_MARGIN, height - 150.0),
        );
        let world = &mut self.ctx.world;
        world.positions.insert(state.crosshair, state.aim);
        if let Some(sprite) = world.sprites.get_mut(state.gun) {
            sprite.frame = gun_frame(state.aim.x, width);
        }

        if input.jump_pressed && state.bullets > 0 && world.is_alive(state.enemy) {
            state.bullets -= 1;
            let muzzle = world.position(state.gun).unwrap_or_default() - vec2(0.0, 40.0);
            let direction = (state.aim - muzzle).normalize_or_zero();
            let bullet = world.spawn_sensor(
                Kind::Bullet,
                muzzle,
                Vec2::splat(BULLET_RADIUS * 2.0),
                Sprite::new(Shape::Circle, Vec2::splat(BULLET_RADIUS * 2.0), BULLET_TINT, 12),
            );
            world.velocities.insert(bullet, Velocity(direction * tuning.bullet_speed));
            world.groups.insert(bullet, Group::PhaseTwo);
            if debug_log {
                println!("SHOT|aim ({:.0},{:.0})|left {}", state.aim.x, state.aim.y, state.bullets);
            }
            if state.bullets == 0 {
                self.ctx.timers.wait(tuning.defeat_delay, Timer::CheckDefeat);
            }
        }

        self.ctx.physics.step(world, &mut self.ctx.events, &self.config.physics, dt, debug_log);
        systems::animate_sprites(world, dt);

        for contact in self.ctx.events.collision_enter.iter() {
            let Some(bullet) = contact.other(state.enemy) else { continue };
            if world.kinds.get(bullet) != Some(&Kind::Bullet) || !world.is_alive(state.enemy) {
                continue;
            }
            world.despawn(bullet);
            if let Some(sprite) = world.sprites.get_mut(state.enemy) {
                sprite.flash = tuning.hit_flash;
            }
            let lethal = world.health.get_mut(state.enemy).is_some_and(|hp| hp.damage(1));
            if lethal {
                world.despawn(state.enemy);
                state.outcome = Some(Outcome::Victory);
                println!("[photo_electric] enemy defeated");
            }
        }

        let bullets: Vec<(Entity, Vec2)> = world
            .with_kind(Kind::Bullet)
            .into_iter()
            .filter_map(|b| Some((b, world.position(b)?)))
            .collect();
        for (bullet, position) in bullets {
            let outside = position.x < -OFFSCREEN_MARGIN
                || position.x > width + OFFSCREEN_MARGIN
                || position.y < -OFFSCREEN_MARGIN
                || position.y > height + OFFSCREEN_MARGIN;
            if outside {
                world.despawn(bullet);
            }
        }
        None
    }

    fn on_timer(&mut self, timer: Timer) {
        match timer {
            Timer::Countdown => {
                let Phase::Collecting(state) = &mut self.phase else { return };
                state.seconds_left = state.seconds_left.saturating_sub(1);
                if state.seconds_left == 0 {
                    let photons = state.photons;
                    self.start_shooting(photons);
                }
            }
            Timer::SpawnPhoton => {
                if matches!(self.phase, Phase::Collecting(_)) {
                    self.spawn_photon();
                }
            }
            Timer::ExpirePhoton(photon) => self.ctx.world.despawn(photon),
            Timer::Teleport => {
                let Phase::Shooting(state) = &self.phase else { return };
                let enemy = state.enemy;
                if self.ctx.world.is_alive(enemy) {
                    let position = self.random_enemy_position();
                    self.ctx.world.positions.insert(enemy, position);
                }
            }
            Timer::CheckDefeat => {
                let Phase::Shooting(state) = &mut self.phase else { return };
                let alive = self.ctx.world.health.get(state.enemy).is_some_and(|hp| !hp.is_dead());
                if state.outcome.is_none() && alive {
                    state.outcome = Some(Outcome::Defeat);
                    println!("[photo_electric] out of bullets");
                }
            }
        }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match &self.phase {
            Phase::Shooting(state) => state.outcome,
            Phase::Collecting(_) => None,
        }
    }

    pub fn draw(&self) {
        let width = self.config.display.virtual_width;
        let height = self.config.display.virtual_height;

        set_camera(&self.ctx.camera.world());
        render::draw_world(&self.ctx.world);

        set_camera(&self.ctx.camera.hud());
        match &self.phase {
            Phase::Collecting(state) => {
                draw_hint("ESC - Menu", HUD_TINT);
                draw_text(&format!("TIME: {}", state.seconds_left), 50.0, 60.0, 40.0, HUD_TINT);
                draw_text(&format!("PHOTONS: {}", state.photons), 50.0, 100.0, 40.0, HUD_TINT);
            }
            Phase::Shooting(state) => {
                draw_text(&format!("ELECTRON BULLETS: {}", state.bullets), 15.0, 35.0, 30.0, HUD_TINT);
                let hp = self.ctx.world.health.get(state.enemy).map(|h| h.current).unwrap_or(0);
                draw_text(&format!("ENEMY HP: {}", hp), 700.0, 35.0, 30.0, ENEMY_HP_TINT);

                let size = vec2(width, height);
                let remaining = format!("Enemy Health Remaining: {}", hp);
                match state.outcome {
                    Some(Outcome::Victory) => draw_end_screen(
                        size,
                        "PURRFECT VICTORY!",
                        Color::new(0.39, 1.0, 0.39, 1.0),
                        &[("SPACE - Play Again | ESC - Menu", HUD_TINT)],
                    ),
                    Some(Outcome::Defeat) => draw_end_screen(
                        size,
                        "BUMMER!",
                        Color::new(1.0, 0.39, 0.39, 1.0),
                        &[
                            (remaining.as_str(), LIGHTGRAY),
                            ("SPACE - Try Again | ESC - Menu", LIGHTGRAY),
                        ],
                    ),
                    None => {}
                }
            }
        }
    }
}

/// Gun sprite frame by which third of the screen the aim is in.
fn gun_frame(aim_x: f32, width: f32) -> usize {
    if aim_x < width / 3.0 {
        0
    } else if aim_x < width * 2.0 / 3.0 {
        1
    } else {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn idle() -> FrameInput {
        FrameInput::default()
    }

    fn fire() -> FrameInput {
        FrameInput { jump_pressed: true, ..Default::default() }
    }

    fn shooting(scene: &PhotoElectricScene) -> &Shooting {
        match &scene.phase {
            Phase::Shooting(state) => state,
            Phase::Collecting(_) => panic!("still collecting"),
        }
    }

    #[test]
    fn test_countdown_switches_phase() {
        let mut scene = PhotoElectricScene::new(&GameConfig::default());
        let cat = scene.cat;
        let (countdown, spawner) = match &scene.phase {
            Phase::Collecting(state) => (state.countdown, state.spawner),
            Phase::Shooting(_) => unreachable!(),
        };
        let mut collected = 0;
        for _ in 0..880 {
            scene.update(&idle(), DT);
            if let Phase::Collecting(state) = &scene.phase {
                collected = state.photons;
            }
        }
        assert!(matches!(scene.phase, Phase::Collecting(_)));
        assert!(!scene.ctx.world.with_kind(Kind::Photon).is_empty());
        assert!(scene.ctx.timers.is_pending(countdown));
        assert!(scene.ctx.timers.is_pending(spawner));

        for _ in 0..30 {
            scene.update(&idle(), DT);
            if let Phase::Collecting(state) = &scene.phase {
                collected = state.photons;
            }
        }
        let state = shooting(&scene);
        assert_eq!(state.bullets, collected);
        // Both phase 1 loops stop with the phase
        assert!(!scene.ctx.timers.is_pending(countdown));
        assert!(!scene.ctx.timers.is_pending(spawner));
        assert!(scene.ctx.world.in_group(Group::PhaseOne).is_empty());
        assert!(!scene.ctx.world.is_alive(cat));
        assert!(scene.ctx.world.with_kind(Kind::Photon).is_empty());
        assert!(scene.ctx.world.is_alive(state.enemy));
    }

    #[test]
    fn test_photons_expire() {
        let mut scene = PhotoElectricScene::new(&GameConfig::default());
        scene.spawn_photon();
        let photon = scene.ctx.world.with_kind(Kind::Photon)[0];
        scene.ctx.timers.cancel(match &scene.phase {
            Phase::Collecting(state) => state.spawner,
            Phase::Shooting(_) => unreachable!(),
        });
        for _ in 0..120 {
            scene.update(&idle(), DT);
        }
        assert!(!scene.ctx.world.is_alive(photon));
    }

    #[test]
    fn test_hit_damages_and_flashes() {
        let mut scene = PhotoElectricScene::new(&GameConfig::default());
        scene.start_shooting(3);
        scene.update(&idle(), DT);
        let state = shooting(&scene);
        let (enemy, aim) = (state.enemy, state.aim);
        scene.ctx.world.positions.insert(enemy, aim);

        scene.update(&fire(), DT);
        assert_eq!(shooting(&scene).bullets, 2);
        for _ in 0..3 {
            scene.update(&idle(), DT);
        }
        assert_eq!(scene.ctx.world.health.get(enemy).unwrap().current, 9);
        assert!(scene.ctx.world.sprites.get(enemy).unwrap().flash > 0.0);
        assert!(scene.ctx.world.with_kind(Kind::Bullet).is_empty());
        assert_eq!(scene.outcome(), None);
    }

    #[test]
    fn test_last_hit_wins() {
        let mut scene = PhotoElectricScene::new(&GameConfig::default());
        scene.start_shooting(1);
        scene.update(&idle(), DT);
        let state = shooting(&scene);
        let (enemy, aim) = (state.enemy, state.aim);
        scene.ctx.world.positions.insert(enemy, aim);
        scene.ctx.world.health.insert(enemy, Health::new(1));

        scene.update(&fire(), DT);
        for _ in 0..3 {
            scene.update(&idle(), DT);
        }
        assert_eq!(scene.outcome(), Some(Outcome::Victory));
        assert!(!scene.ctx.world.is_alive(enemy));

        // The pending defeat check must not override the win
        for _ in 0..90 {
            scene.update(&idle(), DT);
        }
        assert_eq!(scene.outcome(), Some(Outcome::Victory));
        assert_eq!(scene.update(&fire(), DT), Some(SceneId::PhotoElectric));
    }

    #[test]
    fn test_miss_with_last_bullet_loses() {
        let mut scene = PhotoElectricScene::new(&GameConfig::default());
        scene.start_shooting(1);
        let enemy = shooting(&scene).enemy;
        scene.ctx.world.positions.insert(enemy, vec2(100.0, 100.0));

        scene.update(&fire(), DT);
        assert!(scene.ctx.world.with_kind(Kind::Bullet).len() == 1);
        for _ in 0..30 {
            scene.update(&idle(), DT);
        }
        // Bullet left the screen
        assert!(scene.ctx.world.with_kind(Kind::Bullet).is_empty());
        assert_eq!(scene.outcome(), None);

        for _ in 0..40 {
            scene.update(&idle(), DT);
        }
        assert_eq!(scene.outcome(), Some(Outcome::Defeat));
    }

    #[test]
    fn test_no_photons_means_defeat() {
        let mut scene = PhotoElectricScene::new(&GameConfig::default());
        scene.start_shooting(0);
        for _ in 0..70 {
            scene.update(&fire(), DT);
        }
        assert!(scene.ctx.world.with_kind(Kind::Bullet).is_empty());
        assert_eq!(scene.outcome(), Some(Outcome::Defeat));
    }

    #[test]
    fn test_aim_is_clamped_and_picks_gun_frame() {
        let mut scene = PhotoElectricScene::new(&GameConfig::default());
        scene.start_shooting(5);
        let up_left = FrameInput { horizontal: -1.0, vertical: -1.0, ..Default::default() };
        for _ in 0..300 {
            scene.update(&up_left, DT);
        }
        let state = shooting(&scene);
        assert_eq!(state.aim, vec2(AIM_MARGIN, AIM_MARGIN));
        assert_eq!(scene.ctx.world.sprites.get(state.gun).unwrap().frame, 0);
        assert_eq!(gun_frame(500.0, 1000.0), 1);
        assert_eq!(gun_frame(900.0, 1000.0), 2);
    }
}
