//! Configuration for the metrics collector.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Base directory under which each run's archive directory is created.
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// Deadline for each individual file fetch.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Optional overall deadline for a fleet run. Nodes not reached before
    /// the deadline are recorded as skipped; the run still returns its
    /// report.
    #[serde(default)]
    pub fleet_deadline_secs: Option<u64>,
}

fn default_base_dir() -> PathBuf {
    PathBuf::from("/tmp/cloudera-metrics")
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            fleet_deadline_secs: None,
        }
    }
}

impl CollectorConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn fleet_deadline(&self) -> Option<Duration> {
        self.fleet_deadline_secs.map(Duration::from_secs)
    }
}
