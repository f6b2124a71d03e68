use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Spawns labeled periodic tokio tasks with graceful shutdown support.
///
/// Each task ticks immediately on spawn and then at the configured interval.
/// Dropping the runner without calling [`PeriodicRunner::shutdown`] leaves
/// tasks running until their handles are dropped by the runtime; owners are
/// expected to shut the runner down when the owning entity is decommissioned.
pub struct PeriodicRunner {
    shutdown_tx: watch::Sender<bool>,
    handles: Vec<(String, JoinHandle<()>)>,
}

impl PeriodicRunner {
    pub fn new() -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            shutdown_tx,
            handles: Vec::new(),
        }
    }

    /// Number of tasks currently owned by this runner.
    pub fn task_count(&self) -> usize {
        self.handles.len()
    }

    /// Spawn a one-off background task that observes the shutdown signal.
    pub fn spawn<F, Fut>(&mut self, label: impl Into<String>, f: F)
    where
        F: FnOnce(watch::Receiver<bool>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let rx = self.shutdown_tx.subscribe();
        self.handles.push((label.into(), tokio::spawn(f(rx))));
    }

    /// Spawn a task that invokes `f` immediately and then once per
    /// `interval` until shutdown.
    ///
    /// Ticks that overrun the interval delay subsequent ticks rather than
    /// bursting to catch up.
    pub fn spawn_periodic<F, Fut>(&mut self, label: impl Into<String>, interval: Duration, f: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let label = label.into();
        let mut rx = self.shutdown_tx.subscribe();
        let task_label = label.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            tracing::debug!(task = %task_label, ?interval, "periodic task started");
            loop {
                tokio::select! {
                    _ = ticker.tick() => { f().await; }
                    _ = rx.changed() => {
                        tracing::debug!(task = %task_label, "periodic task stopping");
                        break;
                    }
                }
            }
        });
        self.handles.push((label, handle));
    }

    /// Signal all tasks to stop and wait for them to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        for (label, handle) in self.handles {
            if handle.await.is_err() {
                tracing::warn!(task = %label, "background task panicked");
            }
        }
    }
}

impl Default for PeriodicRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_periodic_ticks_and_shutdown() {
        let mut runner = PeriodicRunner::new();
        let count = Arc::new(AtomicU32::new(0));
        let c = count.clone();

        runner.spawn_periodic("ticker", Duration::from_millis(10), move || {
            let c = c.clone();
            async move {
                c.fetch_add(1, Ordering::Relaxed);
            }
        });
        assert_eq!(runner.task_count(), 1);

        tokio::time::sleep(Duration::from_millis(55)).await;
        runner.shutdown().await;

        // First tick fires immediately, so at least a handful by now.
        let ticks = count.load(Ordering::Relaxed);
        assert!(ticks >= 2, "expected >= 2 ticks, got {}", ticks);
    }

    #[tokio::test]
    async fn test_spawn_observes_shutdown() {
        let mut runner = PeriodicRunner::new();
        let stopped = Arc::new(AtomicU32::new(0));
        let s = stopped.clone();

        runner.spawn("waiter", move |mut rx| async move {
            let _ = rx.changed().await;
            s.fetch_add(1, Ordering::Relaxed);
        });

        runner.shutdown().await;
        assert_eq!(stopped.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_shutdown_with_no_tasks() {
        let runner = PeriodicRunner::new();
        assert_eq!(runner.task_count(), 0);
        runner.shutdown().await;
    }
}
