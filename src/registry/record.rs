// src/registry/record.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::ServerConfig;

/// Static identity of a monitored host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub name: String,
    pub host: String,
    pub port: Option<u16>,
}

impl Target {
    pub fn new(name: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }
}

impl From<&ServerConfig> for Target {
    fn from(config: &ServerConfig) -> Self {
        Self {
            name: config.name.clone(),
            host: config.host.clone(),
            port: config.port,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HealthRecord {
    pub reachable: bool,
    /// Unix epoch until the first probe completes.
    pub last_checked_at: DateTime<Utc>,
    pub last_latency: Duration,
    pub total_checks: u64,
    pub total_successes: u64,
}

impl HealthRecord {
    pub(crate) fn apply(&mut self, reachable: bool, latency: Duration, at: DateTime<Utc>) {
        self.reachable = reachable;
        self.last_checked_at = at;
        self.last_latency = if reachable { latency } else { Duration::ZERO };
        self.total_checks += 1;
        if reachable {
            self.total_successes += 1;
        }
    }

    pub fn uptime_percent(&self) -> f64 {
        if self.total_checks == 0 {
            return 0.0;
        }
        100.0 * self.total_successes as f64 / self.total_checks as f64
    }
}

/// One row of a registry snapshot, shaped for the status endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetStatus {
    pub name: String,
    pub host: String,
    pub status: bool,
    pub last_checked: DateTime<Utc>,
    /// Milliseconds.
    pub response_time: u64,
    pub uptime: f64,
    pub checks: u64,
    pub successes: u64,
}

impl TargetStatus {
    pub fn new(target: &Target, record: &HealthRecord) -> Self {
        Self {
            name: target.name.clone(),
            host: target.host.clone(),
            status: record.reachable,
            last_checked: record.last_checked_at,
            response_time: record.last_latency.as_millis() as u64,
            uptime: record.uptime_percent(),
            checks: record.total_checks,
            successes: record.total_successes,
        }
    }
}
