// src/probe/tcp.rs
use async_trait::async_trait;
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tokio::time::timeout;

use super::{resolve, Probe, ProbeError, ProbeOutcome};
use crate::registry::Target;

/// Single TCP handshake per probe. Targets without a port are probed on 80.
pub struct TcpProbe {
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Probe for TcpProbe {
    async fn probe(&self, target: &Target) -> Result<ProbeOutcome, ProbeError> {
        let ip = resolve(&target.host, self.timeout).await?;
        let addr = SocketAddr::new(ip, target.port.unwrap_or(80));

        let start = Instant::now();
        match timeout(self.timeout, TcpStream::connect(addr)).await {
            Ok(Ok(_)) => Ok(ProbeOutcome::up(start.elapsed())),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Ok(ProbeOutcome::down()),
        }
    }

    fn name(&self) -> &'static str {
        "tcp"
    }
}
