//! Game configuration

use crate::error::{Error, Result};
use crate::session::Mode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Longest accepted delay before a finished game restarts
pub const MAX_RESTART_DELAY_MS: u64 = 60_000;

/// Settings shared by every front-end
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Mode new sessions start in
    pub mode: Mode,
    /// Delay before a finished game is cleared, in milliseconds
    pub restart_delay_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            mode: Mode::PlayerVsAi,
            restart_delay_ms: 3000,
        }
    }
}

impl GameConfig {
    /// Load from JSON file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read config {}", path.display()),
            source,
        })?;
        let config: GameConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.restart_delay_ms > MAX_RESTART_DELAY_MS {
            return Err(Error::InvalidConfig {
                message: format!(
                    "restart_delay_ms is {}, maximum is {}",
                    self.restart_delay_ms, MAX_RESTART_DELAY_MS
                ),
            });
        }
        Ok(())
    }

    pub fn restart_delay(&self) -> Duration {
        Duration::from_millis(self.restart_delay_ms)
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }
}
