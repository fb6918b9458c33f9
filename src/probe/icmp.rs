// src/probe/icmp.rs
use async_trait::async_trait;
use std::net::IpAddr;
use std::time::Duration;
use surge_ping::{Client, Config, PingIdentifier, PingSequence, SurgeError, ICMP};
use tracing::trace;

use super::{resolve, Probe, ProbeError, ProbeOutcome};
use crate::registry::Target;

const PAYLOAD: [u8; 56] = [0; 56];

/// Single ICMP echo request per probe.
pub struct IcmpProbe {
    timeout: Duration,
}

impl IcmpProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    // A fresh client per probe so a missing socket permission surfaces as a
    // probe error instead of a startup failure.
    fn client_for(ip: IpAddr) -> Result<Client, ProbeError> {
        let config = match ip {
            IpAddr::V4(_) => Config::default(),
            IpAddr::V6(_) => Config::builder().kind(ICMP::V6).build(),
        };
        Client::new(&config).map_err(ProbeError::Socket)
    }
}

#[async_trait]
impl Probe for IcmpProbe {
    async fn probe(&self, target: &Target) -> Result<ProbeOutcome, ProbeError> {
        let ip = resolve(&target.host, self.timeout).await?;
        let client = Self::client_for(ip)?;

        let mut pinger = client.pinger(ip, PingIdentifier(rand::random())).await;
        pinger.timeout(self.timeout);

        match pinger.ping(PingSequence(0), &PAYLOAD).await {
            Ok((_, rtt)) => Ok(ProbeOutcome::up(rtt)),
            Err(SurgeError::Timeout { .. }) => {
                trace!(target = %target.name, %ip, "echo request timed out");
                Ok(ProbeOutcome::down())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn name(&self) -> &'static str {
        "icmp"
    }
}
