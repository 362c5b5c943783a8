//! Actor Locomotion State Machine
//!
//! Classifies an actor's motion each tick from ground contact, the
//! moving flag and vertical velocity, and maps the resulting state to a
//! sprite visual. Visual changes are reported only on transitions so a
//! walk cycle isn't restarted every frame while the actor keeps walking.

use serde::{Serialize, Deserialize};

/// Motion classification (y grows downward, so rising is negative vy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocomotionState {
    Idle,
    Walking,
    /// Jump start: rising faster than the fast-rise cutoff
    RisingFast,
    /// Top of the arc: between the two cutoffs
    RisingSlow,
    Falling,
}

impl LocomotionState {
    pub fn label(&self) -> &'static str {
        match self {
            LocomotionState::Idle => "idle",
            LocomotionState::Walking => "walk",
            LocomotionState::RisingFast => "jumpStart",
            LocomotionState::RisingSlow => "jumpMid",
            LocomotionState::Falling => "fall",
        }
    }
}

/// Tuned vertical velocity cutoffs for the airborne states.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionThresholds {
    /// `vy` below this is `RisingFast`
    pub rise_fast_below: f32,
    /// `vy` above this is `Falling`
    pub fall_above: f32,
}

impl Default for LocomotionThresholds {
    fn default() -> Self {
        Self {
            rise_fast_below: -700.0,
            fall_above: 20.0,
        }
    }
}

/// Everything the classifier looks at for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LocomotionInput {
    /// Engine ground contact
    pub grounded: bool,
    /// Standing on a live one-way platform
    pub riding: bool,
    /// Raw horizontal input this tick, only its sign matters (facing)
    pub horizontal: f32,
    /// Whether the actor counts as walking when grounded
    pub moving: bool,
    pub velocity_y: f32,
}

impl LocomotionInput {
    /// Input where walking means "horizontal input is held".
    pub fn from_controls(grounded: bool, riding: bool, horizontal: f32, velocity_y: f32) -> Self {
        Self {
            grounded,
            riding,
            horizontal,
            moving: horizontal != 0.0,
            velocity_y,
        }
    }
}

/// Pure transition function.
pub fn classify(thresholds: &LocomotionThresholds, input: &LocomotionInput) -> LocomotionState {
    if input.grounded || input.riding {
        if input.moving {
            LocomotionState::Walking
        } else {
            LocomotionState::Idle
        }
    } else if input.velocity_y < thresholds.rise_fast_below {
        LocomotionState::RisingFast
    } else if input.velocity_y > thresholds.fall_above {
        LocomotionState::Falling
    } else {
        LocomotionState::RisingSlow
    }
}

/// Which sprite frames to show for a state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Visual {
    /// Looping animation over `first..=last`
    Animation { first: usize, last: usize, fps: f32 },
    /// Single held frame
    Frame(usize),
}

/// Cat sheet layout: 8-frame walk cycle, then the pose frames.
pub mod cat_frames {
    pub const WALK_FIRST: usize = 0;
    pub const WALK_LAST: usize = 7;
    pub const WALK_FPS: f32 = 12.0;
    pub const JUMP_START: usize = 8;
    pub const JUMP_MID: usize = 9;
    pub const FALL: usize = 10;
    pub const IDLE: usize = 11;
}

/// Visual selector for the cat sprite sheet.
pub fn visual_for(state: LocomotionState) -> Visual {
    match state {
        LocomotionState::Walking => Visual::Animation {
            first: cat_frames::WALK_FIRST,
            last: cat_frames::WALK_LAST,
            fps: cat_frames::WALK_FPS,
        },
        LocomotionState::RisingFast => Visual::Frame(cat_frames::JUMP_START),
        LocomotionState::RisingSlow => Visual::Frame(cat_frames::JUMP_MID),
        LocomotionState::Falling => Visual::Frame(cat_frames::FALL),
        LocomotionState::Idle => Visual::Frame(cat_frames::IDLE),
    }
}

/// Per-actor state machine: current state plus the latched facing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Locomotion {
    state: LocomotionState,
    facing_right: bool,
}

impl Locomotion {
    pub fn new() -> Self {
        Self {
            state: LocomotionState::Idle,
            facing_right: true,
        }
    }

    pub fn state(&self) -> LocomotionState {
        self.state
    }

    pub fn facing_right(&self) -> bool {
        self.facing_right
    }

    /// Force a state without reporting a transition. Used when a jump
    /// already swapped the visual to the take-off frame.
    pub fn force(&mut self, state: LocomotionState) {
        self.state = state;
    }

    /// Run one tick. Returns the new state only when it changed.
    pub fn update(
        &mut self,
        thresholds: &LocomotionThresholds,
        input: &LocomotionInput,
    ) -> Option<LocomotionState> {
        // Latched: no input keeps the last facing
        if input.horizontal > 0.0 {
            self.facing_right = true;
        } else if input.horizontal < 0.0 {
            self.facing_right = false;
        }

        let next = classify(thresholds, input);
        if next == self.state {
            return None;
        }
        self.state = next;
        Some(next)
    }
}

impl Default for Locomotion {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(grounded: bool, riding: bool, horizontal: f32, velocity_y: f32) -> LocomotionInput {
        LocomotionInput::from_controls(grounded, riding, horizontal, velocity_y)
    }

    #[test]
    fn test_transition_table() {
        let t = LocomotionThresholds::default();
        let cases = [
            (input(true, false, 1.0, 0.0), LocomotionState::Walking),
            (input(false, true, -1.0, 0.0), LocomotionState::Walking),
            (input(true, false, 0.0, 0.0), LocomotionState::Idle),
            (input(false, true, 0.0, 35.0), LocomotionState::Idle),
            (input(false, false, 0.0, -780.0), LocomotionState::RisingFast),
            (input(false, false, 1.0, -700.0), LocomotionState::RisingSlow),
            (input(false, false, 0.0, -120.0), LocomotionState::RisingSlow),
            (input(false, false, 0.0, 20.0), LocomotionState::RisingSlow),
            (input(false, false, -1.0, 20.5), LocomotionState::Falling),
            (input(false, false, 0.0, 900.0), LocomotionState::Falling),
        ];
        for (case, expected) in cases {
            assert_eq!(classify(&t, &case), expected, "{:?}", case);
        }
    }

    #[test]
    fn test_repeated_input_reports_once() {
        let t = LocomotionThresholds::default();
        let mut machine = Locomotion::new();
        let walking = input(true, false, 1.0, 0.0);

        assert_eq!(machine.update(&t, &walking), Some(LocomotionState::Walking));
        for _ in 0..10 {
            assert_eq!(machine.update(&t, &walking), None);
        }
        assert_eq!(machine.update(&t, &input(true, false, 0.0, 0.0)), Some(LocomotionState::Idle));
    }

    #[test]
    fn test_initial_idle_is_not_a_transition() {
        let mut machine = Locomotion::new();
        let idle = input(true, false, 0.0, 0.0);
        assert_eq!(machine.update(&LocomotionThresholds::default(), &idle), None);
    }

    #[test]
    fn test_facing_is_latched() {
        let t = LocomotionThresholds::default();
        let mut machine = Locomotion::new();
        machine.update(&t, &input(true, false, -1.0, 0.0));
        assert!(!machine.facing_right());
        // Releasing input keeps facing left
        machine.update(&t, &input(true, false, 0.0, 0.0));
        assert!(!machine.facing_right());
        // Facing also follows input mid-air
        machine.update(&t, &input(false, false, 1.0, 300.0));
        assert!(machine.facing_right());
    }

    #[test]
    fn test_moving_flag_decides_walk() {
        // Momentum mode: input held but the actor barely moves
        let t = LocomotionThresholds::default();
        let slow = LocomotionInput {
            grounded: true,
            horizontal: 1.0,
            moving: false,
            ..Default::default()
        };
        assert_eq!(classify(&t, &slow), LocomotionState::Idle);
    }

    #[test]
    fn test_visuals() {
        assert_eq!(visual_for(LocomotionState::Idle), Visual::Frame(11));
        assert_eq!(visual_for(LocomotionState::Falling), Visual::Frame(10));
        assert!(matches!(
            visual_for(LocomotionState::Walking),
            Visual::Animation { first: 0, last: 7, .. }
        ));
    }
}
