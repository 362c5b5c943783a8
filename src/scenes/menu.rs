//! Main menu
//!
//! A column of buttons, one per mini-game. Mouse hover or Up/Down moves
//! the highlight; click, Enter or Space starts the game. Entries that
//! aren't built yet show a short "Coming Soon!" notice instead.

use macroquad::prelude::*;
use crate::config::GameConfig;
use crate::game::camera::GameCamera;
use crate::game::render::draw_text_centered;
use crate::input::FrameInput;
use super::SceneId;

const BUTTON_WIDTH: f32 = 350.0;
const BUTTON_HEIGHT: f32 = 45.0;
const FIRST_BUTTON_Y: f32 = 190.0;
const BUTTON_SPACING: f32 = 55.0;
const BUTTON_FILL: Color = Color::new(0.12, 0.12, 0.2, 1.0);

const NOTICE_FADE_IN: f32 = 0.3;
const NOTICE_HOLD: f32 = 1.5;
const NOTICE_FADE_OUT: f32 = 0.3;

/// Fading notice for an entry without a scene
#[derive(Debug, Clone, Copy, PartialEq)]
struct Notice {
    scene: SceneId,
    age: f32,
}

impl Notice {
    fn lifetime() -> f32 {
        NOTICE_FADE_IN + NOTICE_HOLD + NOTICE_FADE_OUT
    }

    /// Ease-out in, hold, ease-in out.
    fn opacity(&self) -> f32 {
        let t = self.age;
        if t < NOTICE_FADE_IN {
            let k = t / NOTICE_FADE_IN;
            1.0 - (1.0 - k) * (1.0 - k)
        } else if t < NOTICE_FADE_IN + NOTICE_HOLD {
            1.0
        } else {
            let k = ((t - NOTICE_FADE_IN - NOTICE_HOLD) / NOTICE_FADE_OUT).min(1.0);
            1.0 - k * k
        }
    }
}

pub struct MenuScene {
    camera: GameCamera,
    selected: usize,
    notice: Option<Notice>,
}

impl MenuScene {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            camera: GameCamera::new(config.display.virtual_width, config.display.virtual_height),
            selected: 0,
            notice: None,
        }
    }

    fn button_center(&self, index: usize) -> Vec2 {
        vec2(
            self.camera.virtual_size.x / 2.0,
            FIRST_BUTTON_Y + index as f32 * BUTTON_SPACING,
        )
    }

    /// Index of the button under `point`, if any.
    fn button_at(&self, point: Vec2) -> Option<usize> {
        (0..SceneId::GAMES.len()).find(|&i| {
            let center = self.button_center(i);
            (point.x - center.x).abs() <= BUTTON_WIDTH / 2.0
                && (point.y - center.y).abs() <= BUTTON_HEIGHT / 2.0
        })
    }

    pub fn update(&mut self, input: &FrameInput, dt: f32) -> Option<SceneId> {
        if let Some(notice) = self.notice.as_mut() {
            notice.age += dt;
            if notice.age >= Notice::lifetime() {
                self.notice = None;
            }
        }

        let count = SceneId::GAMES.len();
        if input.menu_up_pressed {
            self.selected = (self.selected + count - 1) % count;
        }
        if input.menu_down_pressed {
            self.selected = (self.selected + 1) % count;
        }

        let hovered = self.button_at(input.pointer);
        if let Some(index) = hovered {
            self.selected = index;
        }

        let activate = input.confirm_pressed || (input.click && hovered.is_some());
        if !activate {
            return None;
        }

        let scene = SceneId::GAMES[self.selected];
        if scene.is_playable() {
            return Some(scene);
        }
        println!("[menu] {} is not implemented yet", scene.label());
        self.notice = Some(Notice { scene, age: 0.0 });
        None
    }

    pub fn selected(&self) -> SceneId {
        SceneId::GAMES[self.selected]
    }

    pub fn draw(&self) {
        let width = self.camera.virtual_size.x;
        let height = self.camera.virtual_size.y;
        set_camera(&self.camera.hud());

        draw_text_centered("CATastrophe2", width / 2.0, 80.0, 64.0, SceneId::Entanglement.accent());
        draw_text_centered("Mini-Games", width / 2.0, 130.0, 32.0, SceneId::Menu.accent());

        for (i, scene) in SceneId::GAMES.iter().enumerate() {
            let center = self.button_center(i);
            let accent = scene.accent();
            let highlighted = i == self.selected;
            let x = center.x - BUTTON_WIDTH / 2.0;
            let y = center.y - BUTTON_HEIGHT / 2.0;

            let fill = if highlighted {
                Color::new(accent.r * 0.3, accent.g * 0.3, accent.b * 0.3, 1.0)
            } else {
                BUTTON_FILL
            };
            draw_rectangle(x, y, BUTTON_WIDTH, BUTTON_HEIGHT, fill);
            draw_rectangle_lines(x, y, BUTTON_WIDTH, BUTTON_HEIGHT, 3.0, accent);

            let (label_color, label_size) = if highlighted { (accent, 29.0) } else { (WHITE, 28.0) };
            draw_text_centered(scene.label(), center.x, center.y, label_size, label_color);
            let initial = &scene.label()[..1];
            draw_text_centered(initial, x + 15.0, center.y, 20.0, Color::new(accent.r, accent.g, accent.b, 0.5));
        }

        draw_text_centered(
            "Up/Down + Enter, or click",
            width / 2.0,
            height - 30.0,
            20.0,
            Color::new(0.6, 0.6, 0.6, 0.7),
        );

        if let Some(notice) = self.notice {
            let accent = notice.scene.accent();
            let color = Color::new(accent.r, accent.g, accent.b, notice.opacity());
            draw_text_centered(notice.scene.label(), width / 2.0, height / 2.0 - 20.0, 40.0, color);
            draw_text_centered("Coming Soon!", width / 2.0, height / 2.0 + 20.0, 40.0, color);
        }
    }
}
