//! Wave tuning configuration
//!
//! Values arrive already chosen by the host (defaults, a JSON file, or the
//! host's own flags) and are validated before any wave is built.

use serde::{Deserialize, Serialize};

use crate::consts::{ALIEN_ROWS_MAX, ALIEN_SPEED_MAX, ALIENS_IN_ROW_MAX};
use crate::error::ConfigError;

/// Tuning parameters shared by every wave of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Number of alien rows (1..=10)
    pub rows: u32,
    /// Aliens in each row (1..=15)
    pub aliens_per_row: u32,
    /// Seconds between alien steps at the start of level 1 (0 < s <= 3)
    pub alien_speed: f32,
    /// Alien steps (not frames) between alien bolts, upper bound of the roll
    pub bolt_rate: u32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            rows: 5,
            aliens_per_row: 12,
            alien_speed: 1.0,
            bolt_rate: 5,
        }
    }
}

impl WaveConfig {
    /// Check every field against its supported range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=ALIEN_ROWS_MAX).contains(&self.rows) {
            return Err(ConfigError::RowsOutOfRange { rows: self.rows });
        }
        if !(1..=ALIENS_IN_ROW_MAX).contains(&self.aliens_per_row) {
            return Err(ConfigError::ColumnsOutOfRange {
                columns: self.aliens_per_row,
            });
        }
        // NaN fails both comparisons
        if !(self.alien_speed > 0.0 && self.alien_speed <= ALIEN_SPEED_MAX) {
            return Err(ConfigError::AlienSpeedOutOfRange {
                speed: self.alien_speed,
            });
        }
        if self.bolt_rate == 0 {
            return Err(ConfigError::BoltRateZero);
        }
        Ok(())
    }

    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: WaveConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Total number of aliens in a fresh wave
    pub fn total_aliens(&self) -> u32 {
        self.rows * self.aliens_per_row
    }
}
