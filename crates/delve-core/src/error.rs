//! Error types
//!
//! Grid, selection and room-graph operations are total. Only configuration
//! and the world driver can fail.

use thiserror::Error;

/// Invalid or unreadable generation settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid map dimensions {width}x{height}: sides must be at least 3 and the area at most 4194304 cells")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("Invalid chance for {name}: {value} is outside [0, 1]")]
    InvalidChance { name: &'static str, value: f32 },

    #[error("Invalid fill target {0}: must be in (0, 1]")]
    InvalidFillTarget(f32),

    #[error("Invalid {name} room bounds: min {min} max {max}")]
    InvalidRoomBounds { name: &'static str, min: i32, max: i32 },

    #[error("Invalid BSP minimum room size {0}: must be at least 1")]
    InvalidMinimumRoomSize(i32),

    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// World generation errors
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Generation produced no rooms")]
    NoRooms,
}
