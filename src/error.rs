//! Error types for wave creation and command preconditions
//!
//! Losing the game is a normal `WaveOutcome`, never an error.

use std::fmt;

use crate::consts::{ALIEN_ROWS_MAX, ALIEN_SPEED_MAX, ALIENS_IN_ROW_MAX};

/// Out-of-range tuning parameters
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    RowsOutOfRange { rows: u32 },
    ColumnsOutOfRange { columns: u32 },
    AlienSpeedOutOfRange { speed: f32 },
    BoltRateZero,
    LevelZero,
    /// JSON configuration could not be parsed
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RowsOutOfRange { rows } => {
                write!(f, "alien rows out of range: {rows} (allowed 1..={ALIEN_ROWS_MAX})")
            }
            Self::ColumnsOutOfRange { columns } => write!(
                f,
                "aliens per row out of range: {columns} (allowed 1..={ALIENS_IN_ROW_MAX})"
            ),
            Self::AlienSpeedOutOfRange { speed } => write!(
                f,
                "alien step interval out of range: {speed} (allowed 0 < s <= {ALIEN_SPEED_MAX})"
            ),
            Self::BoltRateZero => write!(f, "bolt rate must be at least 1 step"),
            Self::LevelZero => write!(f, "levels start at 1"),
            Self::Parse(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

/// Errors reported by `Wave` operations
#[derive(Clone, Debug, PartialEq)]
pub enum WaveError {
    /// Wave creation was given tuning outside the supported bounds
    InvalidConfiguration(ConfigError),
    /// An operation was called in a state that breaks its contract.
    /// These are programming errors on the caller's side.
    PreconditionViolation {
        operation: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for WaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration(e) => write!(f, "invalid configuration: {e}"),
            Self::PreconditionViolation { operation, reason } => {
                write!(f, "precondition violated in {operation}: {reason}")
            }
        }
    }
}

impl std::error::Error for WaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidConfiguration(e) => Some(e),
            Self::PreconditionViolation { .. } => None,
        }
    }
}

impl From<ConfigError> for WaveError {
    fn from(e: ConfigError) -> Self {
        WaveError::InvalidConfiguration(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display_mentions_bounds() {
        let msg = ConfigError::RowsOutOfRange { rows: 11 }.to_string();
        assert!(msg.contains("11"), "got: {msg}");
        assert!(msg.contains("1..=10"), "got: {msg}");
    }

    #[test]
    fn test_wave_error_wraps_config_error() {
        let err: WaveError = ConfigError::BoltRateZero.into();
        assert!(matches!(err, WaveError::InvalidConfiguration(ConfigError::BoltRateZero)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_precondition_display() {
        let err = WaveError::PreconditionViolation {
            operation: "fire_ship_bolt",
            reason: "no ship present",
        };
        let msg = format!("{err}");
        assert!(msg.contains("fire_ship_bolt"), "got: {msg}");
        assert!(msg.contains("no ship present"), "got: {msg}");
    }
}
