//! Crate-wide error type.

use std::io;

use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by the simulator, registry, feature builder, and I/O helpers.
///
/// Stock underflow and overflow are deliberately absent: the tank clamps
/// silently to `[0, capacity]`.
#[derive(Debug, Error)]
pub enum SimError {
    /// A registry lookup named a station that was never added.
    #[error("unknown station \"{0}\"")]
    UnknownStation(String),

    /// A station id was registered twice.
    #[error("station \"{0}\" is already registered")]
    DuplicateStation(String),

    /// The lag history handed to the feature builder has the wrong length.
    #[error("flow history must contain exactly {expected} values, got {actual}")]
    InvalidHistoryLength { expected: usize, actual: usize },

    /// A timestamp string could not be parsed.
    #[error("invalid timestamp \"{0}\"")]
    InvalidTimestamp(String),

    /// Hourly weights or daily statistics that cannot describe a demand curve.
    #[error("invalid demand profile: {0}")]
    InvalidProfile(String),

    /// Tank capacity or refill parameters out of range.
    #[error("invalid tank: {0}")]
    InvalidTank(String),

    /// Scenario configuration failed to load or validate.
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("io: {0}")]
    Io(#[from] io::Error),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, SimError>;
