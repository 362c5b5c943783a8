//! Game action definitions
//!
//! Button mappings (Xbox/PlayStation):
//! - A/X = Jump / Fire / Confirm
//! - B/O = Back
//! - D-pad or left stick = Move, Aim, Menu navigation
//! - Start = Back to menu

/// All possible actions that can be triggered by input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Movement (analog - left stick / arrows / A-D)
    MoveLeft,
    MoveRight,

    // Crosshair (photo-electric phase 2)
    AimUp,
    AimDown,

    // Face buttons
    Jump,           // A - also fires in phase 2

    // Menu
    MenuUp,
    MenuDown,
    Confirm,        // Enter / A

    // System
    Back,           // Escape / Start
}
