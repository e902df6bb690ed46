//! Engine configuration.
//!
//! The only knob is an optional tick limit. It can come from the
//! `LEAKY_TICK_LIMIT` environment variable or a JSON file; the CLI flag
//! overrides both.

use serde::Deserialize;
use thiserror::Error;

/// Environment variable holding the tick limit.
pub const TICK_LIMIT_ENV: &str = "LEAKY_TICK_LIMIT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid LEAKY_TICK_LIMIT: {0}")]
    InvalidTickLimit(String),
    #[error("invalid engine config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Stop with `TickLimitExceeded` once the clock passes this many ticks.
    /// `None` runs forever.
    pub tick_limit: Option<u64>,
}

impl EngineConfig {
    /// Load from the environment. An unset or empty variable means no limit.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_tick_limit_var(std::env::var(TICK_LIMIT_ENV).ok().as_deref())
    }

    fn from_tick_limit_var(value: Option<&str>) -> Result<Self, ConfigError> {
        let tick_limit = match value.map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<u64>()
                    .map_err(|e| ConfigError::InvalidTickLimit(format!("{raw:?}: {e}")))?,
            ),
        };
        Ok(Self { tick_limit })
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn with_tick_limit(mut self, limit: u64) -> Self {
        self.tick_limit = Some(limit);
        self
    }
}
