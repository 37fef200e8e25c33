//! Bubble Pop - grid and match engine for a bubble shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, matching, projectile, game state)
//! - `config`: Data-driven game tuning loaded from JSON
//! - `presenter`: Rendering/instantiation collaborator interface

pub mod config;
pub mod presenter;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use presenter::{LogPresenter, NullPresenter, Presenter};

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Simulation rate
    pub const SIM_HZ: u32 = 120;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / SIM_HZ as f32;

    /// Grid defaults
    pub const GRID_WIDTH: u32 = 8;
    pub const GRID_HEIGHT: u32 = 4;
    pub const BUBBLE_SPACING: f32 = 3.5;
    pub const BUBBLE_RADIUS: f32 = 1.7;

    /// Number of bubble colors
    pub const PALETTE_SIZE: u8 = 4;
    /// Minimum connected region size that pops
    pub const MATCH_THRESHOLD: usize = 3;

    /// Grid descent speed (world units per second)
    pub const DESCENT_SPEED: f32 = 0.25;
    /// Projectile launch speed (world units per second)
    pub const PROJECTILE_SPEED: f32 = 45.0;
    /// Cannon swing limit either side of straight up (degrees)
    pub const MAX_AIM_DEGREES: f32 = 80.0;

    /// Arena bounds
    pub const WALL_HALF_WIDTH: f32 = 16.0;
    pub const FLOOR_Y: f32 = -24.0;
    pub const GAME_OVER_Y: f32 = -14.0;
}

/// Angle of a planar direction measured from straight up (+Y), positive toward -X.
#[inline]
pub fn angle_from_up(dir: Vec3) -> f32 {
    (-dir.x).atan2(dir.y)
}

/// Planar unit direction for an angle measured from straight up (+Y)
#[inline]
pub fn direction_from_angle(angle: f32) -> Vec3 {
    Vec3::new(-angle.sin(), angle.cos(), 0.0)
}
