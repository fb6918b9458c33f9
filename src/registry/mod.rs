// src/registry/mod.rs
mod record;

pub use record::{HealthRecord, Target, TargetStatus};

use std::time::Duration;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::config::ServerConfig;

/// Ordered list of monitored targets and their health records.
///
/// The target list is fixed at construction. A single reader/writer lock
/// guards every record, so a snapshot never observes a half-applied update.
#[derive(Debug)]
pub struct HealthRegistry {
    targets: Vec<Target>,
    records: RwLock<Vec<HealthRecord>>,
}

impl HealthRegistry {
    pub fn new(targets: Vec<Target>) -> Self {
        let records = vec![HealthRecord::default(); targets.len()];
        Self {
            targets,
            records: RwLock::new(records),
        }
    }

    pub fn from_config(servers: &[ServerConfig]) -> Self {
        Self::new(servers.iter().map(Target::from).collect())
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Record one probe outcome for the target at `index`.
    ///
    /// Latency is only kept for reachable outcomes; an unreachable probe
    /// stores zero.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range for the target list.
    pub async fn update(&self, index: usize, reachable: bool, latency: Duration) {
        assert!(
            index < self.targets.len(),
            "target index {} out of range ({} targets)",
            index,
            self.targets.len()
        );

        let now = Utc::now();
        let mut records = self.records.write().await;
        records[index].apply(reachable, latency, now);
    }

    /// Owned copy of every target with its current record.
    pub async fn snapshot(&self) -> Vec<TargetStatus> {
        let records = self.records.read().await.clone();

        self.targets
            .iter()
            .zip(records)
            .map(|(target, record)| TargetStatus::new(target, &record))
            .collect()
    }

    pub async fn record(&self, index: usize) -> Option<HealthRecord> {
        self.records.read().await.get(index).cloned()
    }
}
