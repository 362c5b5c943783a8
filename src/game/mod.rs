//! Game Foundation Module
//!
//! A lightweight ECS-inspired layer the mini-game scenes run on. It plays
//! the host-engine role: entity lifetimes, physics bodies, sprite frame
//! playback, cancellable timers and the camera.
//!
//! Key concepts:
//! - Entity: Generational index for safe, non-owning references
//! - Component: Plain data structs attached to entities
//! - World: Container for all entities and their components
//! - Event: Decoupled communication between systems
//! - SceneContext: everything one scene owns, dropped with the scene
//!
//! Design philosophy:
//! - Simple over flexible (we know what games we're making)
//! - No runtime type registration (compile-time known components)

#![allow(dead_code)]

pub mod entity;
pub mod component;
pub mod components;
pub mod world;
pub mod event;
pub mod physics;
pub mod timer;
pub mod camera;
pub mod render;
pub mod context;
pub mod systems;

// Re-export main types
pub use entity::Entity;
pub use world::World;
pub use event::Events;
pub use context::SceneContext;
pub use physics::PhysicsSettings;
