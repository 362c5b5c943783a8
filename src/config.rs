//! Tuning configuration
//!
//! Every gameplay number lives in `assets/config/tuning.ron`. The file is
//! embedded at compile time so WASM builds work without file access;
//! native builds prefer the on-disk copy so values can be tweaked without
//! rebuilding. Every field has a default, so a partial file is fine.

use std::fs;
use std::path::Path;
use macroquad::prelude::Color;
use serde::{Serialize, Deserialize};
use crate::game::PhysicsSettings;
use crate::platforming::{LandingWindow, LocomotionThresholds, StreamerConfig, TowerConfig};

/// Path of the tuning file relative to the working directory
pub const TUNING_PATH: &str = "assets/config/tuning.ron";

const EMBEDDED_TUNING: &str = include_str!("../assets/config/tuning.ron");

/// Error type for config loading
#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    ValidationError(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::ParseError(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Parse error: {}", e),
            ConfigError::ValidationError(e) => write!(f, "Validation error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

/// RGB triple in 0-255, as written in the tuning file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn color(self) -> Color {
        Color::from_rgba(self.0, self.1, self.2, 255)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub virtual_width: f32,
    pub virtual_height: f32,
    pub background: Rgb,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            virtual_width: 1000.0,
            virtual_height: 480.0,
            background: Rgb(11, 11, 27),
        }
    }
}

/// Shared cat body tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub move_speed: f32,
    pub jump_force: f32,
    /// Square hitbox side before scaling
    pub hitbox: f32,
    pub scale: f32,
    pub max_fall_speed: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 500.0,
            jump_force: 780.0,
            hitbox: 90.0,
            scale: 0.7,
            max_fall_speed: 2000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntanglementConfig {
    pub tower: TowerConfig,
    /// RON platform layout used instead of the generated tower
    pub layout: Option<String>,
    pub walls: StreamerConfig,
    pub wall_width: f32,
    /// Both cats above this y wins
    pub goal_y: f32,
    /// Respawn when this far below the floor
    pub respawn_below: f32,
    /// Respawn this far above the floor
    pub respawn_height: f32,
    pub victory_delay: f32,
    pub twin_tint: Rgb,
}

impl Default for EntanglementConfig {
    fn default() -> Self {
        Self {
            tower: TowerConfig::default(),
            layout: None,
            walls: StreamerConfig::default(),
            wall_width: 40.0,
            goal_y: 100.0,
            respawn_below: 300.0,
            respawn_height: 200.0,
            victory_delay: 3.0,
            twin_tint: Rgb(255, 61, 170),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupurrFluidConfig {
    /// Horizontal acceleration while a direction is held, units/s²
    pub acceleration: f32,
    pub max_speed: f32,
    pub jump_force: f32,
    /// Velocity multiplier on wall contact
    pub wall_damping: f32,
    /// `|vx|` above this plays the walk cycle
    pub walk_threshold: f32,
    pub scale: f32,
    pub arena_width: f32,
}

impl Default for SupurrFluidConfig {
    fn default() -> Self {
        Self {
            acceleration: 30.0,
            max_speed: 600.0,
            jump_force: 780.0,
            wall_damping: 0.3,
            walk_threshold: 50.0,
            scale: 0.8,
            arena_width: 3250.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoElectricConfig {
    pub move_speed: f32,
    pub jump_force: f32,
    pub max_fall_speed: f32,
    pub arena_width: f32,
    /// Phase 1 length in whole seconds
    pub countdown: u32,
    pub spawn_interval: f32,
    pub photon_lifetime_min: f32,
    pub photon_lifetime_max: f32,
    pub aim_speed: f32,
    pub bullet_speed: f32,
    pub enemy_health: i32,
    pub teleport_min: f32,
    pub teleport_max: f32,
    pub hit_flash: f32,
    /// Wait after the last bullet before declaring defeat
    pub defeat_delay: f32,
}

impl Default for PhotoElectricConfig {
    fn default() -> Self {
        Self {
            move_speed: 550.0,
            jump_force: 900.0,
            max_fall_speed: 1000.0,
            arena_width: 1500.0,
            countdown: 15,
            spawn_interval: 0.4,
            photon_lifetime_min: 0.8,
            photon_lifetime_max: 1.8,
            aim_speed: 220.0,
            bullet_speed: 3200.0,
            enemy_health: 10,
            teleport_min: 1.0,
            teleport_max: 2.5,
            hit_flash: 0.1,
            defeat_delay: 1.0,
        }
    }
}

/// Complete tuning file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub display: DisplayConfig,
    pub physics: PhysicsSettings,
    pub player: PlayerConfig,
    pub riding: LandingWindow,
    pub locomotion: LocomotionThresholds,
    pub entanglement: EntanglementConfig,
    pub supurr_fluid: SupurrFluidConfig,
    pub photo_electric: PhotoElectricConfig,
    /// Per-tick trace lines on stdout
    pub debug_log: bool,
}

fn check_positive(name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(format!("{} must be positive, got {}", name, value)))
    }
}

fn check_order(name: &str, lo: f32, hi: f32) -> Result<(), ConfigError> {
    if lo <= hi {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(format!("{}: min {} is above max {}", name, lo, hi)))
    }
}

impl GameConfig {
    /// Parse and validate RON text.
    pub fn from_ron_str(s: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = ron::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a tuning file from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Startup loader: on-disk file (native), then the embedded copy,
    /// then built-in defaults. Never fails.
    pub fn load_or_default() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        if Path::new(TUNING_PATH).exists() {
            match Self::load(TUNING_PATH) {
                Ok(config) => {
                    println!("[config] loaded {}", TUNING_PATH);
                    return config;
                }
                Err(e) => eprintln!("[config] {}: {}, trying embedded copy", TUNING_PATH, e),
            }
        }

        match Self::from_ron_str(EMBEDDED_TUNING) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("[config] embedded tuning rejected: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Reject values the scenes can't run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("display.virtual_width", self.display.virtual_width)?;
        check_positive("display.virtual_height", self.display.virtual_height)?;
        check_positive("physics.max_step", self.physics.max_step)?;
        if !self.physics.gravity.is_finite() {
            return Err(ConfigError::ValidationError("physics.gravity is not finite".into()));
        }

        check_positive("player.hitbox", self.player.hitbox)?;
        check_positive("player.scale", self.player.scale)?;
        check_positive("player.jump_force", self.player.jump_force)?;
        check_order("riding", self.riding.min_gap, self.riding.max_gap)?;
        check_order(
            "locomotion",
            self.locomotion.rise_fast_below,
            self.locomotion.fall_above,
        )?;

        let e = &self.entanglement;
        check_positive("entanglement.tower.level_height", e.tower.level_height)?;
        if e.tower.platform_count == 0 {
            return Err(ConfigError::ValidationError("entanglement.tower.platform_count is 0".into()));
        }
        check_order("entanglement.tower.range", e.tower.range_min, e.tower.range_max)?;
        check_order("entanglement.tower.speed", e.tower.speed_min, e.tower.speed_max)?;
        if e.tower.range_min < 0.0 || e.tower.speed_min < 0.0 {
            return Err(ConfigError::ValidationError("entanglement.tower: negative range or speed".into()));
        }
        check_order(
            "entanglement.tower.margin_x",
            e.tower.margin_x,
            e.tower.arena_width - e.tower.margin_x,
        )?;
        check_positive("entanglement.walls.segment_height", e.walls.segment_height)?;
        if e.walls.buffer < 0 || e.walls.max_index < 0 {
            return Err(ConfigError::ValidationError("entanglement.walls: negative buffer or max_index".into()));
        }

        let s = &self.supurr_fluid;
        check_positive("supurr_fluid.max_speed", s.max_speed)?;
        if !(0.0..=1.0).contains(&s.wall_damping) {
            return Err(ConfigError::ValidationError(format!(
                "supurr_fluid.wall_damping must be in [0, 1], got {}",
                s.wall_damping
            )));
        }

        let p = &self.photo_electric;
        if p.countdown == 0 {
            return Err(ConfigError::ValidationError("photo_electric.countdown is 0".into()));
        }
        check_positive("photo_electric.spawn_interval", p.spawn_interval)?;
        check_order("photo_electric.photon_lifetime", p.photon_lifetime_min, p.photon_lifetime_max)?;
        check_order("photo_electric.teleport", p.teleport_min, p.teleport_max)?;
        check_positive("photo_electric.teleport_min", p.teleport_min)?;
        if p.enemy_health <= 0 {
            return Err(ConfigError::ValidationError("photo_electric.enemy_health must be positive".into()));
        }
        Ok(())
    }

    /// Serialize as pretty RON.
    pub fn to_ron_string(&self) -> Result<String, ron::Error> {
        let config = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .indentor("  ".to_string());
        ron::ser::to_string_pretty(self, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_tuning_is_valid() {
        let config = GameConfig::from_ron_str(EMBEDDED_TUNING).unwrap();
        assert_eq!(config.display.virtual_width, 1000.0);
        assert_eq!(config.player.jump_force, 780.0);
        assert_eq!(config.riding, LandingWindow::default());
        assert_eq!(config.entanglement.walls.max_index, 8);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = GameConfig::from_ron_str("(debug_log: true, supurr_fluid: (max_speed: 400.0))").unwrap();
        assert!(config.debug_log);
        assert_eq!(config.supurr_fluid.max_speed, 400.0);
        assert_eq!(config.supurr_fluid.acceleration, 30.0);
        assert_eq!(config.photo_electric, PhotoElectricConfig::default());
    }

    #[test]
    fn test_partial_section_keeps_other_fields() {
        let config = GameConfig::from_ron_str(
            "(riding: (max_gap: 20.0), locomotion: (fall_above: 40.0), entanglement: (walls: (buffer: 3)))",
        )
        .unwrap();
        assert_eq!(config.riding.max_gap, 20.0);
        assert_eq!(config.riding.min_gap, LandingWindow::default().min_gap);
        assert_eq!(config.locomotion.fall_above, 40.0);
        assert_eq!(config.locomotion.rise_fast_below, LocomotionThresholds::default().rise_fast_below);
        assert_eq!(config.entanglement.walls.buffer, 3);
        assert_eq!(config.entanglement.walls.segment_height, 500.0);
        assert_eq!(config.entanglement.walls.max_index, 8);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = GameConfig::default();
        config.riding = LandingWindow { min_gap: 10.0, max_gap: -5.0 };
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));

        let mut config = GameConfig::default();
        config.supurr_fluid.wall_damping = 1.5;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.photo_electric.countdown = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            GameConfig::from_ron_str("(display: (virtual_width: \"wide\"))"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_round_trip_through_file() {
        let mut config = GameConfig::default();
        config.debug_log = true;
        config.player.move_speed = 420.0;
        config.entanglement.twin_tint = Rgb(1, 2, 3);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tuning.ron");
        fs::write(&path, config.to_ron_string().unwrap()).unwrap();

        let loaded = GameConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            GameConfig::load(dir.path().join("nope.ron")),
            Err(ConfigError::IoError(_))
        ));
    }
}
