//! Connection settings for the query client
//!
//! Supports loading config from:
//! - Environment variables (`NEO4J_HOST`, `NEO4J_USERNAME`, `NEO4J_PASSWORD`,
//!   `NEO4J_SECURE`, `NEO4J_TIMEOUT_SECS`)
//! - ~/.config/cypher-http/config.toml, or an explicit file

use crate::error::{CypherError, CypherResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_HOST_PORT: &str = "localhost:7474";
pub const DEFAULT_USERNAME: &str = "neo4j";
pub const DEFAULT_PASSWORD: &str = "neo4j";

/// Everything needed to build a [`crate::QueryClient`]
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// `host:port` of the server
    pub host_port: String,
    pub username: String,
    pub password: String,
    /// Use https instead of http
    pub secure: bool,
    /// Whole-request timeout. `None` keeps the transport default.
    pub timeout_secs: Option<u64>,
}

/// On-disk layout, every key optional
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub host_port: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub secure: Option<bool>,
    pub timeout_secs: Option<u64>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host_port: DEFAULT_HOST_PORT.to_string(),
            username: DEFAULT_USERNAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            secure: false,
            timeout_secs: None,
        }
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host_port", &self.host_port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("secure", &self.secure)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ConnectionConfig {
    /// Load config from all sources, with priority:
    /// 1. Environment variables (highest)
    /// 2. `path` if given, else the user config file when it exists
    /// 3. Built-in defaults
    pub fn load(path: Option<&Path>) -> CypherResult<Self> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    /// Same as [`ConnectionConfig::load`] with a custom environment lookup
    pub fn load_with_env<F>(path: Option<&Path>, env: F) -> CypherResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ConnectionConfig::default();

        match path {
            Some(path) => config.merge(ConfigFile::read(path)?),
            None => {
                if let Some(default_path) = Self::user_config_path().filter(|p| p.exists()) {
                    config.merge(ConfigFile::read(&default_path)?);
                }
            }
        }

        config.apply_env(env);
        Ok(config)
    }

    /// Get the user config file path
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cypher-http").join("config.toml"))
    }

    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Merge a config file into this one (file takes priority)
    fn merge(&mut self, other: ConfigFile) {
        if let Some(host_port) = other.host_port {
            self.host_port = host_port;
        }
        if let Some(username) = other.username {
            self.username = username;
        }
        if let Some(password) = other.password {
            self.password = password;
        }
        if let Some(secure) = other.secure {
            self.secure = secure;
        }
        if other.timeout_secs.is_some() {
            self.timeout_secs = other.timeout_secs;
        }
    }

    fn apply_env<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host_port) = env("NEO4J_HOST") {
            self.host_port = host_port;
        }
        if let Some(username) = env("NEO4J_USERNAME") {
            self.username = username;
        }
        if let Some(password) = env("NEO4J_PASSWORD") {
            self.password = password;
        }
        if let Some(raw) = env("NEO4J_SECURE") {
            match parse_flag(&raw) {
                Some(secure) => self.secure = secure,
                None => warn!("Ignoring NEO4J_SECURE={:?}: expected true or false", raw),
            }
        }
        if let Some(raw) = env("NEO4J_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) => self.timeout_secs = Some(secs),
                Err(_) => warn!("Ignoring NEO4J_TIMEOUT_SECS={:?}: not a number", raw),
            }
        }
    }
}

impl ConfigFile {
    pub fn read(path: &Path) -> CypherResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CypherError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let file = toml::from_str(&content).map_err(|e| {
            CypherError::Config(format!("cannot parse {}: {}", path.display(), e))
        })?;
        debug!("Loaded connection config from {}", path.display());
        Ok(file)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
