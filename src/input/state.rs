//! Input state management
//!
//! Polls both keyboard (macroquad) and gamepad (gilrs on native) input,
//! combining them into a unified action-based API.

use macroquad::prelude::*;
use super::gamepad::{button, Gamepad};
use super::Action;

/// Everything a scene reads from input in one frame.
///
/// Scenes only see this snapshot, never the devices, so they can be
/// stepped in tests with scripted input.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// -1..1, left negative
    pub horizontal: f32,
    /// -1..1, up negative
    pub vertical: f32,
    pub jump_pressed: bool,
    pub jump_held: bool,
    pub back_pressed: bool,
    pub confirm_pressed: bool,
    pub menu_up_pressed: bool,
    pub menu_down_pressed: bool,
    /// Mouse in virtual screen coordinates
    pub pointer: Vec2,
    pub click: bool,
}

/// Unified input state that handles both keyboard/mouse and gamepad
pub struct InputState {
    gamepad: Gamepad,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            gamepad: Gamepad::new(),
        }
    }

    /// Call once per frame before checking actions
    pub fn poll(&mut self) {
        self.gamepad.poll();
    }

    /// Horizontal movement in -1..1.
    /// Arrows and A/D count as full deflection; the stick wins when larger.
    pub fn horizontal(&self) -> f32 {
        let mut x = 0.0;
        if self.action_down(Action::MoveLeft) { x -= 1.0; }
        if self.action_down(Action::MoveRight) { x += 1.0; }

        let stick = self.gamepad.left_stick().x;
        if stick.abs() > f32::abs(x) {
            x = stick;
        }
        x.clamp(-1.0, 1.0)
    }

    /// Vertical aim in -1..1, up negative
    pub fn vertical(&self) -> f32 {
        let mut y = 0.0;
        if self.action_down(Action::AimUp) { y -= 1.0; }
        if self.action_down(Action::AimDown) { y += 1.0; }

        let stick = self.gamepad.left_stick().y;
        if stick.abs() > f32::abs(y) {
            y = stick;
        }
        y.clamp(-1.0, 1.0)
    }

    /// Snapshot this frame's input. `pointer` is already mapped to
    /// virtual coordinates by the caller.
    pub fn frame(&self, pointer: Vec2) -> FrameInput {
        FrameInput {
            horizontal: self.horizontal(),
            vertical: self.vertical(),
            jump_pressed: self.action_pressed(Action::Jump),
            jump_held: self.action_down(Action::Jump),
            back_pressed: self.action_pressed(Action::Back),
            confirm_pressed: self.action_pressed(Action::Confirm),
            menu_up_pressed: self.action_pressed(Action::MenuUp),
            menu_down_pressed: self.action_pressed(Action::MenuDown),
            pointer,
            click: is_mouse_button_pressed(MouseButton::Left),
        }
    }

    /// Check if action is currently held down
    pub fn action_down(&self, action: Action) -> bool {
        self.keyboard_down(action) || self.gamepad_down(action)
    }

    /// Check if action was just pressed this frame
    pub fn action_pressed(&self, action: Action) -> bool {
        self.keyboard_pressed(action) || self.gamepad_pressed(action)
    }

    fn keyboard_down(&self, action: Action) -> bool {
        match action {
            Action::MoveLeft => is_key_down(KeyCode::Left) || is_key_down(KeyCode::A),
            Action::MoveRight => is_key_down(KeyCode::Right) || is_key_down(KeyCode::D),
            Action::AimUp => is_key_down(KeyCode::Up) || is_key_down(KeyCode::W),
            Action::AimDown => is_key_down(KeyCode::Down) || is_key_down(KeyCode::S),
            Action::Jump => is_key_down(KeyCode::Space),
            Action::MenuUp => is_key_down(KeyCode::Up) || is_key_down(KeyCode::W),
            Action::MenuDown => is_key_down(KeyCode::Down) || is_key_down(KeyCode::S),
            Action::Confirm => is_key_down(KeyCode::Enter) || is_key_down(KeyCode::Space),
            Action::Back => is_key_down(KeyCode::Escape),
        }
    }

    fn gamepad_down(&self, action: Action) -> bool {
        let buttons = self.gamepad.buttons();
        let stick = self.gamepad.left_stick();

        match action {
            Action::MoveLeft => buttons.is_down(button::DPAD_LEFT) || stick.x < -0.5,
            Action::MoveRight => buttons.is_down(button::DPAD_RIGHT) || stick.x > 0.5,
            Action::AimUp | Action::MenuUp => buttons.is_down(button::DPAD_UP) || stick.y < -0.5,
            Action::AimDown | Action::MenuDown => buttons.is_down(button::DPAD_DOWN) || stick.y > 0.5,
            Action::Jump | Action::Confirm => buttons.is_down(button::A),
            Action::Back => buttons.is_down(button::START) || buttons.is_down(button::SELECT) || buttons.is_down(button::B),
        }
    }

    fn keyboard_pressed(&self, action: Action) -> bool {
        match action {
            Action::Jump => is_key_pressed(KeyCode::Space),
            Action::Confirm => is_key_pressed(KeyCode::Enter) || is_key_pressed(KeyCode::Space),
            Action::Back => is_key_pressed(KeyCode::Escape),
            Action::MenuUp => is_key_pressed(KeyCode::Up) || is_key_pressed(KeyCode::W),
            Action::MenuDown => is_key_pressed(KeyCode::Down) || is_key_pressed(KeyCode::S),
            _ => false,
        }
    }

    fn gamepad_pressed(&self, action: Action) -> bool {
        let buttons = self.gamepad.buttons();

        match action {
            Action::Jump | Action::Confirm => buttons.is_pressed(button::A),
            Action::Back => {
                buttons.is_pressed(button::START) || buttons.is_pressed(button::SELECT) || buttons.is_pressed(button::B)
            }
            Action::MenuUp => buttons.is_pressed(button::DPAD_UP),
            Action::MenuDown => buttons.is_pressed(button::DPAD_DOWN),
            _ => false,
        }
    }

    /// Check if any gamepad is connected
    pub fn has_gamepad(&self) -> bool {
        self.gamepad.has_gamepad()
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
