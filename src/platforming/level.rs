//! Platform Level Data
//!
//! Authoring-side records for moving platforms: the RON layout format,
//! validation that rejects unusable values before anything is spawned,
//! and the procedural tower generator used by the climbing scene.
//!
//! `track_y` is the platform's vertical center; its one-way surface is
//! the top edge at `track_y - height / 2`.

use std::fs;
use std::path::Path;
use serde::{Serialize, Deserialize};

/// One moving platform as authored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlatformSpec {
    pub center_x: f32,
    pub track_y: f32,
    pub width: f32,
    pub height: f32,
    /// Max horizontal excursion from `center_x`
    pub range: f32,
    /// Units per second
    pub speed: f32,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl PlatformSpec {
    /// Y of the one-way surface.
    pub fn top(&self) -> f32 {
        self.track_y - self.height / 2.0
    }
}

/// A list of platforms, as stored in a `.ron` layout file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformLayout {
    pub platforms: Vec<PlatformSpec>,
}

/// Error type for layout loading
#[derive(Debug)]
pub enum LevelError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    SerializeError(ron::Error),
    ValidationError(String),
}

impl From<std::io::Error> for LevelError {
    fn from(e: std::io::Error) -> Self {
        LevelError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for LevelError {
    fn from(e: ron::error::SpannedError) -> Self {
        LevelError::ParseError(e)
    }
}

impl From<ron::Error> for LevelError {
    fn from(e: ron::Error) -> Self {
        LevelError::SerializeError(e)
    }
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelError::IoError(e) => write!(f, "IO error: {}", e),
            LevelError::ParseError(e) => write!(f, "Parse error: {}", e),
            LevelError::SerializeError(e) => write!(f, "Serialize error: {}", e),
            LevelError::ValidationError(e) => write!(f, "Validation error: {}", e),
        }
    }
}

impl std::error::Error for LevelError {}

/// Limits for layout validation
pub mod limits {
    /// Max absolute coordinate value
    pub const MAX_COORD: f32 = 1_000_000.0;
    /// Max platforms in one layout
    pub const MAX_PLATFORMS: usize = 4096;
}

fn is_valid_float(f: f32) -> bool {
    f.is_finite() && f.abs() <= limits::MAX_COORD
}

/// Validate a single platform record.
pub fn validate_platform(spec: &PlatformSpec, context: &str) -> Result<(), String> {
    let fields = [
        ("center_x", spec.center_x),
        ("track_y", spec.track_y),
        ("width", spec.width),
        ("height", spec.height),
        ("range", spec.range),
        ("speed", spec.speed),
    ];
    for (name, value) in fields {
        if !is_valid_float(value) {
            return Err(format!("{}: invalid {} = {}", context, name, value));
        }
    }
    if spec.width <= 0.0 || spec.height <= 0.0 {
        return Err(format!(
            "{}: non-positive size {}x{}",
            context, spec.width, spec.height
        ));
    }
    if spec.range < 0.0 {
        return Err(format!("{}: negative range {}", context, spec.range));
    }
    if spec.speed < 0.0 {
        return Err(format!("{}: negative speed {}", context, spec.speed));
    }
    Ok(())
}

/// Validate a whole layout.
pub fn validate_layout(layout: &PlatformLayout) -> Result<(), LevelError> {
    if layout.platforms.len() > limits::MAX_PLATFORMS {
        return Err(LevelError::ValidationError(format!(
            "too many platforms ({} > {})",
            layout.platforms.len(),
            limits::MAX_PLATFORMS
        )));
    }
    for (i, spec) in layout.platforms.iter().enumerate() {
        validate_platform(spec, &format!("platform[{}]", i))
            .map_err(LevelError::ValidationError)?;
    }
    Ok(())
}

/// Parse and validate a layout from RON text.
pub fn load_layout_from_str(s: &str) -> Result<PlatformLayout, LevelError> {
    let layout: PlatformLayout = ron::from_str(s)?;
    validate_layout(&layout)?;
    Ok(layout)
}

/// Load a layout file from disk.
pub fn load_layout<P: AsRef<Path>>(path: P) -> Result<PlatformLayout, LevelError> {
    let contents = fs::read_to_string(path)?;
    load_layout_from_str(&contents)
}

/// Serialize a layout as pretty RON.
pub fn layout_to_string(layout: &PlatformLayout) -> Result<String, LevelError> {
    let config = ron::ser::PrettyConfig::new()
        .depth_limit(3)
        .indentor("  ".to_string());
    Ok(ron::ser::to_string_pretty(layout, config)?)
}

pub fn save_layout<P: AsRef<Path>>(layout: &PlatformLayout, path: P) -> Result<(), LevelError> {
    let text = layout_to_string(layout)?;
    fs::write(path, text)?;
    Ok(())
}

// =============================================================================
// Procedural tower
// =============================================================================

/// Uniform float source, so generation can be driven by a fixed sequence
/// in tests.
pub trait RangeRng {
    /// Uniform value in `[lo, hi)`.
    fn range(&mut self, lo: f32, hi: f32) -> f32;
}

/// Engine RNG (`macroquad::rand`).
pub struct QuadRng;

impl RangeRng for QuadRng {
    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        macroquad::rand::gen_range(lo, hi)
    }
}

/// Parameters for a vertical shaft of evenly spaced moving platforms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TowerConfig {
    /// Total shaft height; y = level_height is the floor
    pub level_height: f32,
    /// Spacing divisor; `platform_count - 1` platforms are placed
    pub platform_count: u32,
    /// Horizontal span platforms are centered in
    pub arena_width: f32,
    /// Keep centers this far from either side
    pub margin_x: f32,
    pub platform_width: f32,
    pub platform_height: f32,
    pub range_min: f32,
    pub range_max: f32,
    pub speed_min: f32,
    pub speed_max: f32,
}

impl Default for TowerConfig {
    fn default() -> Self {
        Self {
            level_height: 4000.0,
            platform_count: 25,
            arena_width: 1000.0,
            margin_x: 200.0,
            platform_width: 180.0,
            platform_height: 40.0,
            range_min: 150.0,
            range_max: 300.0,
            speed_min: 40.0,
            speed_max: 100.0,
        }
    }
}

impl TowerConfig {
    pub fn spacing(&self) -> f32 {
        self.level_height / self.platform_count.max(1) as f32
    }
}

/// Generate the tower bottom-up: platform `i` (1-based) sits at
/// `level_height - i * spacing`.
pub fn generate_tower(config: &TowerConfig, rng: &mut impl RangeRng) -> PlatformLayout {
    let spacing = config.spacing();
    let platforms = (1..config.platform_count)
        .map(|i| PlatformSpec {
            center_x: rng.range(config.margin_x, config.arena_width - config.margin_x),
            track_y: config.level_height - i as f32 * spacing,
            width: config.platform_width,
            height: config.platform_height,
            range: rng.range(config.range_min, config.range_max),
            speed: rng.range(config.speed_min, config.speed_max),
            active: true,
        })
        .collect();
    PlatformLayout { platforms }
}
