use std::sync::Arc;
use std::time::Duration;

use cdhfleet_utils::PeriodicRunner;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::node::ClusterNode;

/// Configuration for the per-node liveness poller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Seconds between liveness observations of each node.
    #[serde(default = "default_period_secs")]
    pub period_secs: u64,
}

fn default_period_secs() -> u64 {
    30
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            period_secs: default_period_secs(),
        }
    }
}

impl PollerConfig {
    pub fn period(&self) -> Duration {
        Duration::from_secs(self.period_secs)
    }
}

/// Keeps `host_id` and `service_up` fresh on watched nodes.
///
/// One periodic task per node, all owned by this poller; a task observes
/// immediately when spawned and then once per period. A failed observation
/// publishes the unresolved fallback and never stops future ticks. The
/// owner must call [`LivenessPoller::shutdown`] when the watched nodes are
/// decommissioned; tasks are stopped explicitly, not dropped.
pub struct LivenessPoller {
    config: PollerConfig,
    runner: PeriodicRunner,
}

impl LivenessPoller {
    pub fn new(config: PollerConfig) -> Self {
        Self {
            config,
            runner: PeriodicRunner::new(),
        }
    }

    /// Start the periodic liveness task for one node.
    pub fn watch(&mut self, node: Arc<ClusterNode>) {
        let label = format!("liveness:{}", node.name());
        info!(node = %node.name(), period_secs = self.config.period_secs, "watching node");
        self.runner
            .spawn_periodic(label, self.config.period(), move || {
                let node = node.clone();
                async move {
                    node.refresh_identity();
                }
            });
    }

    /// Number of nodes currently being polled.
    pub fn watched_count(&self) -> usize {
        self.runner.task_count()
    }

    /// Stop every liveness task and wait for them to exit.
    pub async fn shutdown(self) {
        self.runner.shutdown().await;
    }
}
