//! Configuration for the simulator
//!
//! Defaults reproduce the original hard-coded behavior exactly: socket at
//! `/tmp/TelldusEvents`, one event every 5 seconds, default attributes.
//! Overrides come from `~/.telldus-sim/config.json`, then `TELLDUS_SIM_*`
//! environment variables, then CLI flags - later sources win.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::event::DeviceEvent;

/// Well-known socket path used by telldusd and its consumers.
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/TelldusEvents";

/// Seconds between event sends.
pub const DEFAULT_INTERVAL_SECS: u64 = 5;

/// Global simulator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Filesystem path the Unix domain socket binds to.
    #[serde(default = "default_socket_path")]
    pub socket_path: PathBuf,

    /// Cadence of event sends, in seconds. Must be non-zero.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// The event replayed to every connected peer.
    #[serde(default)]
    pub event: DeviceEvent,
}

fn default_socket_path() -> PathBuf {
    PathBuf::from(DEFAULT_SOCKET_PATH)
}

fn default_interval_secs() -> u64 {
    DEFAULT_INTERVAL_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
            interval_secs: default_interval_secs(),
            event: DeviceEvent::default(),
        }
    }
}

impl Config {
    /// Directory holding the config file (`~/.telldus-sim`).
    pub fn dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".telldus-sim")
    }

    /// Default config file location.
    pub fn default_path() -> PathBuf {
        Self::dir().join("config.json")
    }

    /// Load configuration from the default location, falling back to
    /// defaults when no file exists. Environment overrides are applied
    /// on top.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::default_path())?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file, or defaults if it is absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            SimError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            SimError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Apply `TELLDUS_SIM_SOCKET` and `TELLDUS_SIM_INTERVAL` overrides.
    pub fn apply_env(&mut self) {
        if let Ok(path) = std::env::var("TELLDUS_SIM_SOCKET") {
            if !path.is_empty() {
                self.socket_path = PathBuf::from(path);
            }
        }
        if let Ok(secs) = std::env::var("TELLDUS_SIM_INTERVAL") {
            if let Ok(secs) = secs.parse::<u64>() {
                self.interval_secs = secs;
            }
        }
    }

    /// Reject configurations the emitter cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.interval_secs == 0 {
            return Err(SimError::Config(
                "interval_secs must be non-zero".to_string(),
            ));
        }
        if self.socket_path.as_os_str().is_empty() {
            return Err(SimError::Config("socket_path must not be empty".to_string()));
        }
        Ok(())
    }
}
