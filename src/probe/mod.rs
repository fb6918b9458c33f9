// src/probe/mod.rs
//! Reachability probes.
//!
//! A [`Probe`] performs one bounded attempt against a [`Target`] and reports
//! whether it answered and how long it took. Failures are not classified by
//! cause beyond the [`ProbeError`] message; the monitor treats every error as
//! "not reachable".

mod icmp;
mod tcp;

pub use icmp::IcmpProbe;
pub use tcp::TcpProbe;

use async_trait::async_trait;
use std::net::IpAddr;
use std::time::Duration;
use tokio::time::timeout;

use crate::registry::Target;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub reachable: bool,
    pub latency: Duration,
}

impl ProbeOutcome {
    pub fn up(latency: Duration) -> Self {
        Self { reachable: true, latency }
    }

    pub fn down() -> Self {
        Self { reachable: false, latency: Duration::ZERO }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("Failed to resolve {host}: {reason}")]
    Resolve { host: String, reason: String },

    #[error("Failed to open ICMP socket: {0}")]
    Socket(#[source] std::io::Error),

    #[error("ICMP error: {0}")]
    Icmp(#[from] surge_ping::SurgeError),

    #[error("Connection error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, target: &Target) -> Result<ProbeOutcome, ProbeError>;

    fn name(&self) -> &'static str;
}

/// Uses a TCP connect when the target names a port, an ICMP echo otherwise.
pub struct NetworkProbe {
    icmp: IcmpProbe,
    tcp: TcpProbe,
}

impl NetworkProbe {
    pub fn new(timeout: Duration) -> Self {
        Self {
            icmp: IcmpProbe::new(timeout),
            tcp: TcpProbe::new(timeout),
        }
    }
}

#[async_trait]
impl Probe for NetworkProbe {
    async fn probe(&self, target: &Target) -> Result<ProbeOutcome, ProbeError> {
        if target.port.is_some() {
            self.tcp.probe(target).await
        } else {
            self.icmp.probe(target).await
        }
    }

    fn name(&self) -> &'static str {
        "network"
    }
}

/// Resolve a literal IP or hostname to its first address, bounded by `limit`.
pub(crate) async fn resolve(host: &str, limit: Duration) -> Result<IpAddr, ProbeError> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(ip);
    }

    let resolve_err = |reason: String| ProbeError::Resolve {
        host: host.to_string(),
        reason,
    };

    let mut addrs = match timeout(limit, tokio::net::lookup_host((host, 0))).await {
        Ok(Ok(addrs)) => addrs,
        Ok(Err(e)) => return Err(resolve_err(e.to_string())),
        Err(_) => return Err(resolve_err("lookup timed out".to_string())),
    };

    addrs
        .next()
        .map(|addr| addr.ip())
        .ok_or_else(|| resolve_err("no addresses found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolve_literal_ip() {
        let ip = resolve("127.0.0.1", Duration::from_secs(1)).await.unwrap();
        assert_eq!(ip, IpAddr::from([127, 0, 0, 1]));

        let ip = resolve("::1", Duration::from_secs(1)).await.unwrap();
        assert!(ip.is_ipv6());
    }

    #[tokio::test]
    async fn test_resolve_invalid_host_is_error() {
        let result = resolve("no such host.invalid", Duration::from_secs(1)).await;
        assert!(matches!(result, Err(ProbeError::Resolve { .. })));
    }

    #[test]
    fn test_down_outcome_has_zero_latency() {
        let outcome = ProbeOutcome::down();
        assert!(!outcome.reachable);
        assert_eq!(outcome.latency, Duration::ZERO);
    }
}
