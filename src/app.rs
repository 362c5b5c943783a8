//! Application state and scene management
//!
//! Exactly one scene is alive at a time. Switching builds the new scene
//! from the shared config and drops the old one, so no entity, timer or
//! event of a previous scene survives.

use macroquad::prelude::*;
use crate::config::GameConfig;
use crate::game::camera::Letterbox;
use crate::input::{FrameInput, InputState};
use crate::scenes::{EntanglementScene, MenuScene, PhotoElectricScene, SceneId, SupurrFluidScene};

/// The scene currently running
pub enum ActiveScene {
    Menu(MenuScene),
    Entanglement(Box<EntanglementScene>),
    SupurrFluid(Box<SupurrFluidScene>),
    PhotoElectric(Box<PhotoElectricScene>),
}

impl ActiveScene {
    fn build(id: SceneId, config: &GameConfig) -> Self {
        match id {
            SceneId::Entanglement => ActiveScene::Entanglement(Box::new(EntanglementScene::new(config))),
            SceneId::SupurrFluid => ActiveScene::SupurrFluid(Box::new(SupurrFluidScene::new(config))),
            SceneId::PhotoElectric => ActiveScene::PhotoElectric(Box::new(PhotoElectricScene::new(config))),
            // Placeholders never leave the menu
            SceneId::Menu | SceneId::ParticleAccelerator | SceneId::DoubleSlit => {
                ActiveScene::Menu(MenuScene::new(config))
            }
        }
    }

    pub fn id(&self) -> SceneId {
        match self {
            ActiveScene::Menu(_) => SceneId::Menu,
            ActiveScene::Entanglement(_) => SceneId::Entanglement,
            ActiveScene::SupurrFluid(_) => SceneId::SupurrFluid,
            ActiveScene::PhotoElectric(_) => SceneId::PhotoElectric,
        }
    }

    fn update(&mut self, input: &FrameInput, dt: f32) -> Option<SceneId> {
        match self {
            ActiveScene::Menu(scene) => scene.update(input, dt),
            ActiveScene::Entanglement(scene) => scene.update(input, dt),
            ActiveScene::SupurrFluid(scene) => scene.update(input, dt),
            ActiveScene::PhotoElectric(scene) => scene.update(input, dt),
        }
    }

    fn draw(&self) {
        match self {
            ActiveScene::Menu(scene) => scene.draw(),
            ActiveScene::Entanglement(scene) => scene.draw(),
            ActiveScene::SupurrFluid(scene) => scene.draw(),
            ActiveScene::PhotoElectric(scene) => scene.draw(),
        }
    }
}

/// Main application state
pub struct AppState {
    pub scene: ActiveScene,
    pub input: InputState,
    pub config: GameConfig,
}

impl AppState {
    pub fn new(config: GameConfig) -> Self {
        Self {
            scene: ActiveScene::Menu(MenuScene::new(&config)),
            input: InputState::new(),
            config,
        }
    }

    /// Replace the running scene.
    pub fn go(&mut self, id: SceneId) {
        if !id.is_playable() {
            eprintln!("[app] {} has no scene, staying put", id.label());
            return;
        }
        println!("[app] scene {} -> {}", self.scene.id().label(), id.label());
        self.scene = ActiveScene::build(id, &self.config);
    }

    /// Step the running scene with an already captured input snapshot.
    pub fn step(&mut self, input: &FrameInput, dt: f32) {
        if let Some(next) = self.scene.update(input, dt) {
            self.go(next);
        }
    }

    /// Sample devices and step one frame.
    pub fn update(&mut self, dt: f32) {
        let virtual_size = vec2(self.config.display.virtual_width, self.config.display.virtual_height);
        let (mouse_x, mouse_y) = mouse_position();
        let pointer = Letterbox::fit(virtual_size, vec2(screen_width(), screen_height()))
            .to_virtual(vec2(mouse_x, mouse_y));
        let frame = self.input.frame(pointer);
        self.step(&frame, dt);
    }

    pub fn draw(&self) {
        self.scene.draw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> AppState {
        AppState {
            scene: ActiveScene::Menu(MenuScene::new(&GameConfig::default())),
            input: InputState::default(),
            config: GameConfig::default(),
        }
    }

    #[test]
    fn test_menu_to_game_and_back() {
        let mut app = app();
        let confirm = FrameInput { confirm_pressed: true, ..Default::default() };
        app.step(&confirm, 1.0 / 60.0);
        assert_eq!(app.scene.id(), SceneId::Entanglement);

        let back = FrameInput { back_pressed: true, ..Default::default() };
        app.step(&back, 1.0 / 60.0);
        assert_eq!(app.scene.id(), SceneId::Menu);
    }

    #[test]
    fn test_placeholder_is_ignored() {
        let mut app = app();
        app.go(SceneId::DoubleSlit);
        assert_eq!(app.scene.id(), SceneId::Menu);
        app.go(SceneId::SupurrFluid);
        assert_eq!(app.scene.id(), SceneId::SupurrFluid);
    }
}
