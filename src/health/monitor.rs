// src/health/monitor.rs
use crate::config::MonitorConfig;
use crate::metrics::MetricsCollector;
use crate::probe::{Probe, ProbeError, ProbeOutcome};
use crate::registry::{HealthRegistry, Target};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::error::Elapsed;
use tokio::time::{interval, timeout, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Background loop that probes every target once per sweep and feeds the
/// outcomes into the registry.
pub struct Monitor {
    config: MonitorConfig,
    registry: Arc<HealthRegistry>,
    probe: Arc<dyn Probe>,
    metrics: Option<Arc<MetricsCollector>>,
    shutdown_tx: tokio::sync::watch::Sender<bool>,
    shutdown_rx: tokio::sync::watch::Receiver<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub up: usize,
    pub down: usize,
    pub errors: usize,
}

impl Monitor {
    pub fn new(
        config: MonitorConfig,
        registry: Arc<HealthRegistry>,
        probe: Arc<dyn Probe>,
        metrics: Option<Arc<MetricsCollector>>,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

        Self {
            config,
            registry,
            probe,
            metrics,
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Sweep on every tick until [`Monitor::shutdown`] is called.
    ///
    /// The first sweep starts immediately. A sweep that outlasts the interval
    /// pushes the next one back rather than queueing a burst of catch-up ticks.
    pub async fn run(self: Arc<Self>) {
        let mut interval = interval(self.config.interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut shutdown_rx = self.shutdown_rx.clone();

        info!(
            "Starting monitor for {} targets with interval {:?}, probe timeout {:?}, using {} probe",
            self.registry.len(),
            self.config.interval(),
            self.config.timeout(),
            self.probe.name()
        );

        loop {
            if *shutdown_rx.borrow() {
                break;
            }

            tokio::select! {
                _ = interval.tick() => {
                    self.sweep().await;
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Monitor shutting down");
    }

    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Probe every target once and record the outcomes.
    ///
    /// With `max_concurrency == 1` targets are probed strictly in list order.
    pub async fn sweep(&self) -> SweepSummary {
        let started = Instant::now();

        let mut results = stream::iter(0..self.registry.len())
            .map(|index| self.probe_one(index))
            .buffer_unordered(self.config.max_concurrency.max(1));

        let mut summary = SweepSummary::default();
        while let Some((index, result, elapsed)) = results.next().await {
            let target = &self.registry.targets()[index];
            let outcome = self.absorb(target, result, &mut summary);
            self.registry
                .update(index, outcome.reachable, outcome.latency)
                .await;

            if let Some(metrics) = &self.metrics {
                metrics.record_probe(&target.name, outcome.reachable, elapsed);
            }
        }

        let elapsed = started.elapsed();
        if let Some(metrics) = &self.metrics {
            metrics.record_sweep(elapsed);
        }

        info!(
            "Sweep complete in {:.2}s: {} up, {} down ({} probe errors)",
            elapsed.as_secs_f64(),
            summary.up,
            summary.down,
            summary.errors
        );

        summary
    }

    /// Run one probe against the target at `index`, bounded by the configured timeout.
    async fn probe_one(
        &self,
        index: usize,
    ) -> (usize, Result<Result<ProbeOutcome, ProbeError>, Elapsed>, Duration) {
        let target = &self.registry.targets()[index];
        let started = Instant::now();
        let result = timeout(self.config.timeout(), self.probe.probe(target)).await;
        (index, result, started.elapsed())
    }

    // Probe errors and overruns never leave the monitor: they count as unreachable.
    fn absorb(
        &self,
        target: &Target,
        result: Result<Result<ProbeOutcome, ProbeError>, Elapsed>,
        summary: &mut SweepSummary,
    ) -> ProbeOutcome {
        match result {
            Ok(Ok(outcome)) if outcome.reachable => {
                summary.up += 1;
                info!(
                    "'{}' host is up, response time {}ms",
                    target.name,
                    outcome.latency.as_millis()
                );
                outcome
            }
            Ok(Ok(_)) => {
                summary.down += 1;
                warn!("'{}' host is down", target.name);
                ProbeOutcome::down()
            }
            Ok(Err(e)) => {
                summary.down += 1;
                summary.errors += 1;
                warn!("'{}' host is down, probe failed: {}", target.name, e);
                debug!(host = %target.host, error = ?e, "probe error detail");
                ProbeOutcome::down()
            }
            Err(_) => {
                summary.down += 1;
                warn!(
                    "'{}' host is down, no answer within {:?}",
                    target.name,
                    self.config.timeout()
                );
                ProbeOutcome::down()
            }
        }
    }
}
