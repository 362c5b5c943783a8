//! Platforming Core
//!
//! Engine-independent pieces shared by the mini-game scenes:
//! - `motion`: horizontal oscillation of moving platforms
//! - `rider`: one-way landing and carry on moving platforms
//! - `locomotion`: per-actor animation state machine
//! - `streamer`: sliding window of level segments around the camera
//! - `level`: authored/generated platform records

#![allow(dead_code)]

pub mod motion;
pub mod rider;
pub mod locomotion;
pub mod streamer;
pub mod level;

pub use motion::PlatformMotion;
pub use rider::{ActorBounds, LandingWindow, OneWaySurface, RiderBody};
pub use locomotion::{Locomotion, LocomotionInput, LocomotionState, LocomotionThresholds, Visual};
pub use streamer::{SegmentBuilder, SegmentStreamer, StreamerConfig};
pub use level::{PlatformSpec, PlatformLayout, TowerConfig};
