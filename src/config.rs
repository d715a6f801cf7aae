//! Review configuration.
//!
//! Loaded from scenario files through serde or changed one option at a
//! time with [`ReviewConfig::set_option`], which accepts the same names as
//! the command line `--option name=value`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of reasons one point may hold.
pub const DEFAULT_MAX_REASONS_PER_MOVE: usize = 120;

/// Default size of the shared reason table.
pub const DEFAULT_MAX_MOVE_REASONS: usize = 1000;

/// Errors from [`ReviewConfig::set_option`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("invalid value '{value}' for option '{name}'")]
    InvalidValue { name: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Seed for the tie-break numbers drawn at every reset.
    pub seed: u64,
    /// Engine strength. Owl upgrades of reasons only run above 5.
    pub level: u32,
    /// Scoring mode: reinforcing moves inside own territory earn nothing.
    pub doing_scoring: bool,
    pub max_reasons_per_move: usize,
    pub max_move_reasons: usize,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        ReviewConfig {
            seed: 0,
            level: 10,
            doing_scoring: false,
            max_reasons_per_move: DEFAULT_MAX_REASONS_PER_MOVE,
            max_move_reasons: DEFAULT_MAX_MOVE_REASONS,
        }
    }
}

impl ReviewConfig {
    /// Sets one option by name.
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        };
        match name.to_ascii_lowercase().as_str() {
            "seed" => self.seed = value.parse().map_err(|_| invalid())?,
            "level" => self.level = value.parse().map_err(|_| invalid())?,
            "doing_scoring" | "scoring" => {
                self.doing_scoring = parse_bool(value).ok_or_else(invalid)?
            }
            "max_reasons_per_move" => {
                self.max_reasons_per_move = value.parse().map_err(|_| invalid())?
            }
            "max_move_reasons" => self.max_move_reasons = value.parse().map_err(|_| invalid())?,
            _ => return Err(ConfigError::UnknownOption(name.to_string())),
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
