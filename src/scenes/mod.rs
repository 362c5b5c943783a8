//! Scenes
//!
//! The menu and the mini-games. Each scene owns a `SceneContext` and is
//! stepped with a `FrameInput` snapshot; `update` returns the scene to
//! switch to, if any. Switching drops the old scene with everything in it.

pub mod menu;
pub mod entanglement;
pub mod supurr_fluid;
pub mod photo_electric;

use macroquad::prelude::*;
use crate::config::GameConfig;
use crate::game::components::{Sprite, Velocity};
use crate::game::{Entity, World};
use crate::platforming::locomotion::cat_frames;

pub use menu::MenuScene;
pub use entanglement::EntanglementScene;
pub use supurr_fluid::SupurrFluidScene;
pub use photo_electric::PhotoElectricScene;

/// Every scene reachable from the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneId {
    Menu = 0,
    Entanglement = 1,
    SupurrFluid = 2,
    PhotoElectric = 3,
    ParticleAccelerator = 4,
    DoubleSlit = 5,
}

impl SceneId {
    pub const ALL: [SceneId; 6] = [
        SceneId::Menu,
        SceneId::Entanglement,
        SceneId::SupurrFluid,
        SceneId::PhotoElectric,
        SceneId::ParticleAccelerator,
        SceneId::DoubleSlit,
    ];

    /// Menu entries in display order
    pub const GAMES: [SceneId; 5] = [
        SceneId::Entanglement,
        SceneId::SupurrFluid,
        SceneId::PhotoElectric,
        SceneId::ParticleAccelerator,
        SceneId::DoubleSlit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SceneId::Menu => "Menu",
            SceneId::Entanglement => "Entanglement",
            SceneId::SupurrFluid => "suPURR Fluid",
            SceneId::PhotoElectric => "Photo-Electric",
            SceneId::ParticleAccelerator => "Particle Accelerator",
            SceneId::DoubleSlit => "Double Slit",
        }
    }

    /// Accent color of the menu button
    pub fn accent(&self) -> Color {
        match self {
            SceneId::Menu => Color::from_rgba(200, 200, 255, 255),
            SceneId::Entanglement => Color::from_rgba(255, 61, 170, 255),
            SceneId::SupurrFluid => Color::from_rgba(0, 200, 255, 255),
            SceneId::PhotoElectric => Color::from_rgba(100, 255, 100, 255),
            SceneId::ParticleAccelerator => Color::from_rgba(255, 200, 50, 255),
            SceneId::DoubleSlit => Color::from_rgba(200, 100, 255, 255),
        }
    }

    /// Whether the scene has a playable implementation
    pub fn is_playable(&self) -> bool {
        !matches!(self, SceneId::ParticleAccelerator | SceneId::DoubleSlit)
    }
}

/// Sprite size of the cat before scaling
pub const CAT_SPRITE_SIZE: f32 = 90.0;

/// Spawn a player cat standing idle at `position`.
pub fn spawn_player(world: &mut World, config: &GameConfig, position: Vec2, scale: f32, max_fall: f32, tint: Color) -> Entity {
    let side = config.player.hitbox * scale;
    world.spawn_cat(
        position,
        Vec2::splat(side),
        Vec2::ZERO,
        max_fall,
        Sprite::cat(CAT_SPRITE_SIZE, scale, tint, cat_frames::IDLE),
    )
}

/// Digital direction from an analog axis: -1, 0 or 1.
pub fn axis_direction(value: f32) -> f32 {
    const DEADZONE: f32 = 0.3;
    if value > DEADZONE {
        1.0
    } else if value < -DEADZONE {
        -1.0
    } else {
        0.0
    }
}

/// Store this frame's steering on an actor.
pub fn set_steering(world: &mut World, cat: Entity, input_x: f32, moving: bool) {
    if let Some(actor) = world.actors.get_mut(cat) {
        actor.input_x = input_x;
        actor.moving = moving;
    }
}

/// Set horizontal velocity, keeping vertical.
pub fn set_velocity_x(world: &mut World, entity: Entity, vx: f32) {
    let v = world.velocity(entity);
    world.velocities.insert(entity, Velocity(vec2(vx, v.y)));
}

/// Screen-fixed hint text in the top-left corner.
pub fn draw_hint(text: &str, color: Color) {
    draw_text(text, 10.0, 24.0, 18.0, Color::new(color.r, color.g, color.b, 0.7));
}

/// Dim the screen, show a title and the given lines under it.
pub fn draw_end_screen(size: Vec2, title: &str, title_color: Color, lines: &[(&str, Color)]) {
    draw_rectangle(0.0, 0.0, size.x, size.y, Color::new(0.0, 0.0, 0.0, 0.7));
    crate::game::render::draw_text_centered(title, size.x / 2.0, size.y / 2.0 - 80.0, 64.0, title_color);
    for (i, (line, color)) in lines.iter().enumerate() {
        crate::game::render::draw_text_centered(line, size.x / 2.0, size.y / 2.0 + i as f32 * 50.0, 26.0, *color);
    }
}
