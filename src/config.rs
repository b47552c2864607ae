//! Configuration for [`DataSource`](crate::DataSource).
//!
//! Configuration is loaded from TOML with the following resolution order:
//! 1. `--config <path>` (explicit path, must exist)
//! 2. `~/.huginn/config.toml` (user)
//! 3. built-in defaults
//!
//! Everything is read once at startup; nothing is re-read from the
//! environment afterwards.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::cache::DEFAULT_CACHE_CAPACITY;
use crate::transport::RetryConfig;
use crate::version;
use crate::{HuginnError, Result};

/// Default assignment server.
pub const DEFAULT_ASSIGNMENT_SERVER: &str = "https://bridges-cs.herokuapp.com";

/// Which family of dataset servers to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServerMode {
    /// Production servers.
    #[default]
    Live,
    /// Staging servers (where available).
    Testing,
    /// A data server running on localhost.
    Local,
}

impl ServerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServerMode::Live => "live",
            ServerMode::Testing => "testing",
            ServerMode::Local => "local",
        }
    }

    /// Non-live servers always get verbose protocol logging.
    pub fn forces_debug(&self) -> bool {
        !matches!(self, ServerMode::Live)
    }

    pub fn osm_base_url(&self) -> &'static str {
        match self {
            ServerMode::Local => "http://localhost:3000/",
            _ => "http://bridges-data-server-osm.bridgesuncc.org/",
        }
    }

    pub fn elevation_base_url(&self) -> &'static str {
        match self {
            ServerMode::Local => "http://localhost:3000/",
            _ => "http://bridges-data-server-elevation.bridgesuncc.org/",
        }
    }

    pub fn gutenberg_base_url(&self) -> &'static str {
        match self {
            ServerMode::Local => "http://localhost:3000/",
            ServerMode::Testing => "http://bridges-data-server-gutenberg-t.bridgesuncc.org/",
            ServerMode::Live => "http://bridges-data-server-gutenberg.bridgesuncc.org/",
        }
    }
}

impl FromStr for ServerMode {
    type Err = HuginnError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "live" => Ok(ServerMode::Live),
            "testing" => Ok(ServerMode::Testing),
            "local" => Ok(ServerMode::Local),
            other => Err(HuginnError::Configuration(format!(
                "incorrect data server type {other:?}, must be live, testing or local"
            ))),
        }
    }
}

impl fmt::Display for ServerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ServerMode {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Data source configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    /// Dataset server family (default: live).
    pub server_mode: ServerMode,
    /// Verbose protocol logging (default: false).
    pub debug: bool,
    /// Maximum number of cached documents (default: 120).
    pub cache_capacity: usize,
    /// `User-Agent` sent with every request.
    pub user_agent: String,
    /// Per-request timeout in seconds (default: 60).
    pub timeout_secs: u64,
    /// Server hosting stored assignments.
    pub assignment_server_url: String,
    /// Optional retry policy (disabled by default).
    pub retry: RetryConfig,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            server_mode: ServerMode::default(),
            debug: false,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            user_agent: version::default_user_agent(),
            timeout_secs: 60,
            assignment_server_url: DEFAULT_ASSIGNMENT_SERVER.to_string(),
            retry: RetryConfig::default(),
        }
    }
}

impl SourceConfig {
    /// Load configuration from the standard locations.
    ///
    /// An explicit path that does not exist is an error; a missing user
    /// config simply yields the defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Parse a specific config file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            HuginnError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        Self::from_toml(&content).map_err(|e| match e {
            HuginnError::Configuration(msg) => {
                HuginnError::Configuration(format!("Failed to parse config file {path:?}: {msg}"))
            }
            other => other,
        })
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| HuginnError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no data source can run with.
    pub fn validate(&self) -> Result<()> {
        if self.cache_capacity == 0 {
            return Err(HuginnError::Configuration(
                "cache_capacity must be at least 1".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(HuginnError::Configuration(
                "timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether verbose protocol logging is on, explicitly or via the server mode.
    pub fn debug_enabled(&self) -> bool {
        self.debug || self.server_mode.forces_debug()
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(HuginnError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".huginn").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        Ok(None)
    }
}
