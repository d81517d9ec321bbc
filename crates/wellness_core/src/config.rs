//! Dashboard runtime configuration.
//!
//! # Responsibility
//! - Hold tunables for storage capacity, history trimming and UI delays.
//! - Load from JSON with per-field defaults.
//!
//! # Invariants
//! - A validated config never has zero capacity or zero retained entries.

use crate::schedule::MAX_DELAY_MS;
use crate::store::DEFAULT_CAPACITY_BYTES;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Entries kept when a mood snapshot no longer fits the store.
pub const DEFAULT_QUOTA_RETAIN_ENTRIES: usize = 50;
pub const DEFAULT_BANNER_VISIBLE_MS: u64 = 2_000;
pub const DEFAULT_BANNER_FADE_MS: u64 = 300;
pub const DEFAULT_REPLY_DELAY_MS: u64 = 500;

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Invalid {
        field: &'static str,
        message: &'static str,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid dashboard config: {err}"),
            Self::Invalid { field, message } => {
                write!(f, "invalid dashboard config field `{field}`: {message}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Byte budget of the key-value store.
    pub storage_capacity_bytes: u64,
    /// Newest mood entries kept after the store rejects a snapshot.
    pub quota_retain_entries: usize,
    /// How long the "Mood logged" banner stays fully visible.
    pub banner_visible_ms: u64,
    /// Fade-out duration after the visible phase.
    pub banner_fade_ms: u64,
    /// Simulated thinking time before a chat reply appears.
    pub reply_delay_ms: u64,
}

impl DashboardConfig {
    /// Parses a JSON object; missing fields take their defaults.
    ///
    /// Blank input yields the default config.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_capacity_bytes == 0 {
            return Err(ConfigError::Invalid {
                field: "storage_capacity_bytes",
                message: "must be greater than zero",
            });
        }
        if self.quota_retain_entries == 0 {
            return Err(ConfigError::Invalid {
                field: "quota_retain_entries",
                message: "must be greater than zero",
            });
        }
        let delays = [
            ("banner_visible_ms", self.banner_visible_ms),
            ("banner_fade_ms", self.banner_fade_ms),
            ("reply_delay_ms", self.reply_delay_ms),
        ];
        for (field, value) in delays {
            if value > MAX_DELAY_MS {
                return Err(ConfigError::Invalid {
                    field,
                    message: "must not exceed one day",
                });
            }
        }
        Ok(())
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            storage_capacity_bytes: DEFAULT_CAPACITY_BYTES,
            quota_retain_entries: DEFAULT_QUOTA_RETAIN_ENTRIES,
            banner_visible_ms: DEFAULT_BANNER_VISIBLE_MS,
            banner_fade_ms: DEFAULT_BANNER_FADE_MS,
            reply_delay_ms: DEFAULT_REPLY_DELAY_MS,
        }
    }
}
