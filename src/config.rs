//! Game tuning
//!
//! Every option has a default, so a JSON file only needs the fields it changes.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating a [`GameConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Grid ===
    /// Columns in the initial level
    pub grid_width: u32,
    /// Rows in the initial level
    pub grid_height: u32,
    /// Distance between neighboring cell centers
    pub bubble_spacing: f32,
    /// Collision radius of bubbles and projectiles
    pub bubble_radius: f32,
    /// World position of the grid origin at level load
    pub grid_origin: Vec3,
    /// Grid descent speed (units/sec)
    pub descent_speed: f32,

    // === Shooting ===
    pub projectile_speed: f32,
    /// Where staged projectiles wait and fire from
    pub launch_point: Vec3,
    /// Cannon swing limit either side of straight up
    pub max_aim_degrees: f32,

    // === Rules ===
    pub palette_size: u8,
    pub match_threshold: usize,
    /// A bubble at or below this world Y ends the run
    pub game_over_y: f32,

    // === Arena (used by the built-in collider) ===
    pub wall_half_width: f32,
    pub floor_y: f32,

    /// RNG seed for colors
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: GRID_WIDTH,
            grid_height: GRID_HEIGHT,
            bubble_spacing: BUBBLE_SPACING,
            bubble_radius: BUBBLE_RADIUS,
            grid_origin: Vec3::new(0.0, 12.0, 0.0),
            descent_speed: DESCENT_SPEED,

            projectile_speed: PROJECTILE_SPEED,
            launch_point: Vec3::new(0.0, -20.0, 0.0),
            max_aim_degrees: MAX_AIM_DEGREES,

            palette_size: PALETTE_SIZE,
            match_threshold: MATCH_THRESHOLD,
            game_over_y: GAME_OVER_Y,

            wall_half_width: WALL_HALF_WIDTH,
            floor_y: FLOOR_Y,

            seed: 0,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid { field, reason })
        }

        if !(self.bubble_spacing > 0.0) {
            return invalid("bubble_spacing", "must be positive");
        }
        if !(self.bubble_radius > 0.0) {
            return invalid("bubble_radius", "must be positive");
        }
        if self.palette_size == 0 {
            return invalid("palette_size", "must be at least 1");
        }
        if self.match_threshold == 0 {
            return invalid("match_threshold", "must be at least 1");
        }
        if !(self.projectile_speed > 0.0) {
            return invalid("projectile_speed", "must be positive");
        }
        if self.descent_speed < 0.0 {
            return invalid("descent_speed", "must not be negative");
        }
        if !(0.0..90.0).contains(&self.max_aim_degrees) {
            return invalid("max_aim_degrees", "must be in [0, 90)");
        }
        if self.floor_y >= self.launch_point.y {
            return invalid("floor_y", "must be below the launch point");
        }
        Ok(())
    }

    /// Aim clamp in radians
    pub fn max_aim_radians(&self) -> f32 {
        self.max_aim_degrees.to_radians()
    }
}
