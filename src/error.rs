//! Error types for spine construction and muscle access.

use thiserror::Error;

/// Top-level error type for this crate.
#[derive(Debug, Error)]
pub enum SpineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("pair ({a}, {b}) references a missing node (structure has {node_count} nodes)")]
    NodeOutOfBounds {
        a: usize,
        b: usize,
        node_count: usize,
    },

    #[error("muscle key '{0}' not found in muscle map")]
    UnknownMuscle(String),

    #[error("timestep {0} is not positive")]
    InvalidTimestep(f32),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid value for {field}: {value} (must be positive)")]
    NonPositive { field: &'static str, value: f32 },

    #[error("invalid value for {field}: {value} (must not be negative)")]
    Negative { field: &'static str, value: f32 },

    #[error("a spine needs at least 2 segments, got {0}")]
    TooFewSegments(usize),
}
