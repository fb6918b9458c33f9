// src/metrics/collector.rs
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, Histogram, IntCounter, IntCounterVec, IntGaugeVec,
    Opts, Registry, TextEncoder,
};
use std::sync::Arc;
use std::time::Duration;
use anyhow::Result;

pub struct MetricsRegistry {
    registry: Registry,
    collector: Arc<MetricsCollector>,
}

impl MetricsRegistry {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let collector = Arc::new(MetricsCollector::new(&registry)?);

        Ok(Self {
            registry,
            collector,
        })
    }

    pub fn collector(&self) -> Arc<MetricsCollector> {
        self.collector.clone()
    }

    pub fn gather(&self) -> Result<Vec<u8>> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(buffer)
    }
}

pub struct MetricsCollector {
    // Probe metrics
    pub probes_total: IntCounterVec,
    pub probe_duration_seconds: HistogramVec,
    pub target_up: IntGaugeVec,

    // Sweep metrics
    pub sweeps_total: IntCounter,
    pub sweep_duration_seconds: Histogram,

    // Status API metrics
    pub status_requests_total: IntCounterVec,
}

impl MetricsCollector {
    pub fn new(registry: &Registry) -> Result<Self> {
        let probes_total = IntCounterVec::new(
            Opts::new("monitor_probes_total", "Total number of probes"),
            &["target", "result"],
        )?;
        registry.register(Box::new(probes_total.clone()))?;

        let probe_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "monitor_probe_duration_seconds",
                "Probe duration in seconds",
            ),
            &["target"],
        )?;
        registry.register(Box::new(probe_duration_seconds.clone()))?;

        let target_up = IntGaugeVec::new(
            Opts::new(
                "monitor_target_up",
                "Last observed reachability (1=up, 0=down)",
            ),
            &["target"],
        )?;
        registry.register(Box::new(target_up.clone()))?;

        let sweeps_total = IntCounter::new("monitor_sweeps_total", "Total completed sweeps")?;
        registry.register(Box::new(sweeps_total.clone()))?;

        let sweep_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "monitor_sweep_duration_seconds",
            "Duration of a full sweep in seconds",
        ))?;
        registry.register(Box::new(sweep_duration_seconds.clone()))?;

        let status_requests_total = IntCounterVec::new(
            Opts::new(
                "monitor_status_requests_total",
                "Status API requests by method and response code",
            ),
            &["method", "status"],
        )?;
        registry.register(Box::new(status_requests_total.clone()))?;

        Ok(Self {
            probes_total,
            probe_duration_seconds,
            target_up,
            sweeps_total,
            sweep_duration_seconds,
            status_requests_total,
        })
    }

    pub fn record_probe(&self, target: &str, reachable: bool, duration: Duration) {
        let result = if reachable { "up" } else { "down" };
        self.probes_total
            .with_label_values(&[target, result])
            .inc();

        self.probe_duration_seconds
            .with_label_values(&[target])
            .observe(duration.as_secs_f64());

        self.target_up
            .with_label_values(&[target])
            .set(if reachable { 1 } else { 0 });
    }

    pub fn record_sweep(&self, duration: Duration) {
        self.sweeps_total.inc();
        self.sweep_duration_seconds.observe(duration.as_secs_f64());
    }

    pub fn record_status_request(&self, method: &str, status_code: u16) {
        let status = status_code.to_string();
        self.status_requests_total
            .with_label_values(&[method, &status])
            .inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gather_exposes_recorded_metrics() {
        let registry = MetricsRegistry::new().unwrap();
        let metrics = registry.collector();

        metrics.record_probe("A", true, Duration::from_millis(5));
        metrics.record_probe("B", false, Duration::from_secs(1));
        metrics.record_sweep(Duration::from_secs(1));
        metrics.record_status_request("GET", 200);

        let text = String::from_utf8(registry.gather().unwrap()).unwrap();
        assert!(text.contains(r#"monitor_probes_total{result="up",target="A"} 1"#));
        assert!(text.contains(r#"monitor_target_up{target="B"} 0"#));
        assert!(text.contains("monitor_sweeps_total 1"));
        assert!(text.contains(r#"monitor_status_requests_total{method="GET",status="200"} 1"#));
    }
}
