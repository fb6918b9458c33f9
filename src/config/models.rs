// src/config/models.rs
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub servers: Vec<ServerConfig>,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub server: HttpConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// A monitored host as declared in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub name: String,
    pub host: String,
    /// When set, the host is probed with a TCP connect instead of an ICMP echo.
    #[serde(default)]
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

impl MonitorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            timeout_ms: default_timeout_ms(),
            max_concurrency: default_max_concurrency(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            static_dir: default_static_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_metrics_port")]
    pub port: u16,
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_metrics_port(),
            path: default_metrics_path(),
        }
    }
}

fn default_interval_secs() -> u64 { 10 }
fn default_timeout_ms() -> u64 { 1000 }
fn default_max_concurrency() -> usize { 1 }
fn default_listen() -> SocketAddr { SocketAddr::from(([0, 0, 0, 0], 8080)) }
fn default_static_dir() -> PathBuf { PathBuf::from("static") }
fn default_metrics_port() -> u16 { 9090 }
fn default_metrics_path() -> String { "/metrics".to_string() }

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No servers configured")]
    NoServers,

    #[error("Server #{0} has an empty name")]
    EmptyName(usize),

    #[error("Server '{0}' has an empty host")]
    EmptyHost(String),

    #[error("Duplicate server name '{0}'")]
    DuplicateName(String),

    #[error("monitor.{0} must be greater than zero")]
    ZeroValue(&'static str),

    #[error("Metrics path '{0}' must start with '/'")]
    InvalidMetricsPath(String),
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.servers.is_empty() {
            return Err(ConfigError::NoServers);
        }

        let mut seen = HashSet::new();
        for (i, server) in self.servers.iter().enumerate() {
            if server.name.trim().is_empty() {
                return Err(ConfigError::EmptyName(i));
            }
            if server.host.trim().is_empty() {
                return Err(ConfigError::EmptyHost(server.name.clone()));
            }
            if !seen.insert(server.name.as_str()) {
                return Err(ConfigError::DuplicateName(server.name.clone()));
            }
        }

        if self.monitor.interval_secs == 0 {
            return Err(ConfigError::ZeroValue("interval_secs"));
        }
        if self.monitor.timeout_ms == 0 {
            return Err(ConfigError::ZeroValue("timeout_ms"));
        }
        if self.monitor.max_concurrency == 0 {
            return Err(ConfigError::ZeroValue("max_concurrency"));
        }

        if !self.metrics.path.starts_with('/') {
            return Err(ConfigError::InvalidMetricsPath(self.metrics.path.clone()));
        }

        Ok(())
    }
}
