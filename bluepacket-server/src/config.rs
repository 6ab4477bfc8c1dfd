//! Server configuration.
//!
//! Configuration is loaded in the following order (later overrides earlier):
//! 1. Default values
//! 2. YAML config file (if specified via BLUEPACKET_CONFIG)
//! 3. Environment variables

use crate::server::ServerConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Network configuration.
    pub network: NetworkConfig,
    /// Worker pool configuration.
    pub pool: PoolConfig,
}

impl Config {
    /// Loads configuration from file, then applies environment variable overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("BLUEPACKET_CONFIG") {
            config = Self::from_file(&path)?;
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.to_path_buf(), e))?;
        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;
        Ok(config)
    }

    /// Loads configuration from environment variables only.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from a variable lookup.
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        self.network.apply_overrides(&var);
        self.pool.apply_overrides(&var);
    }

    /// Rejects configurations the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool.workers == 0 {
            return Err(ConfigError::ValidationError(
                "pool.workers must be at least 1".to_string(),
            ));
        }
        if self.pool.queue_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "pool.queue_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Saves configuration to a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = serde_yaml::to_string(self)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;
        std::fs::write(path, content).map_err(|e| ConfigError::IoError(path.to_path_buf(), e))?;
        Ok(())
    }

    /// Builds the runtime server configuration.
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig::new(self.network.bind_addr)
            .with_workers(self.pool.workers)
            .with_queue_capacity(self.pool.queue_capacity)
            .with_backlog(self.network.backlog_per_worker.saturating_mul(self.pool.workers as u32))
            .with_shrink_timeout(self.pool.shrink_timeout())
            .with_read_timeout(self.network.read_timeout())
    }
}

fn parse_var<T: std::str::FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    var(key).and_then(|value| value.parse().ok())
}

/// Network configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Address to bind to.
    #[serde(with = "socket_addr_serde")]
    pub bind_addr: SocketAddr,
    /// Listen backlog per worker.
    pub backlog_per_worker: u32,
    /// Time allowed for a client to deliver its request, in milliseconds.
    pub read_timeout_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], bluepacket_protocol::DEFAULT_PORT)),
            backlog_per_worker: 50,
            read_timeout_ms: 30_000,
        }
    }
}

impl NetworkConfig {
    fn apply_overrides(&mut self, var: &impl Fn(&str) -> Option<String>) {
        if let Some(addr) = parse_var(var, "BLUEPACKET_BIND") {
            self.bind_addr = addr;
        }

        if let Some(port) = parse_var(var, "BLUEPACKET_PORT") {
            self.bind_addr.set_port(port);
        }

        if let Some(n) = parse_var(var, "BLUEPACKET_BACKLOG_PER_WORKER") {
            self.backlog_per_worker = n;
        }

        if let Some(ms) = parse_var(var, "BLUEPACKET_READ_TIMEOUT_MS") {
            self.read_timeout_ms = ms;
        }
    }

    /// Returns the request read timeout as Duration.
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

/// Worker pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Workers started with the server.
    pub workers: usize,
    /// Accepted connections waiting for a worker.
    pub queue_capacity: usize,
    /// How long a shrink request waits to enqueue each exit signal, in milliseconds.
    pub shrink_timeout_ms: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: 10,
            queue_capacity: 1000,
            shrink_timeout_ms: 3000,
        }
    }
}

impl PoolConfig {
    fn apply_overrides(&mut self, var: &impl Fn(&str) -> Option<String>) {
        if let Some(n) = parse_var(var, "BLUEPACKET_WORKERS") {
            self.workers = n;
        }

        if let Some(n) = parse_var(var, "BLUEPACKET_QUEUE_CAPACITY") {
            self.queue_capacity = n;
        }

        if let Some(ms) = parse_var(var, "BLUEPACKET_SHRINK_TIMEOUT_MS") {
            self.shrink_timeout_ms = ms;
        }
    }

    /// Returns the shrink timeout as Duration.
    pub fn shrink_timeout(&self) -> Duration {
        Duration::from_millis(self.shrink_timeout_ms)
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    IoError(PathBuf, std::io::Error),
    ParseError(PathBuf, String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(path, e) => {
                write!(f, "failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::ValidationError(msg) => {
                write!(f, "configuration validation failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Serde helper for SocketAddr.
mod socket_addr_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::net::SocketAddr;

    pub fn serialize<S>(addr: &SocketAddr, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&addr.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SocketAddr, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
