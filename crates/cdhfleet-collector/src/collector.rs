use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use cdhfleet_machine::CopyOptions;
use cdhfleet_node::ClusterNode;
use cdhfleet_topology::{capability, discover, Entity};
use cdhfleet_types::{CollectCode, Result, RunId, Status, UtcTime};
use cdhfleet_utils::ensure_dir;
use tracing::{debug, info, warn};

use crate::config::CollectorConfig;
use crate::report::{FetchOutcome, FetchStatus, FleetReport, NodeReport};

/// Prefix of per-run archive directory names.
pub const ARCHIVE_PREFIX: &str = "cloudera-metrics-";

/// Roles whose diagnostics land in `/tmp/<role>-metrics.out`.
pub const METRICS_OUT_ROLES: [&str; 4] = ["datanode", "namenode", "master", "regionserver"];

/// Roles whose diagnostics land in `/tmp/<role>metrics.log`.
pub const METRICS_LOG_ROLES: [&str; 2] = ["mr", "jvm"];

/// Harvests diagnostics files from every discovered node into a
/// timestamped archive directory.
pub struct MetricsCollector {
    config: CollectorConfig,
    run_seq: AtomicU64,
}

impl MetricsCollector {
    pub fn new(config: CollectorConfig) -> Self {
        Self {
            config,
            run_seq: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Collect metrics from every cluster node reachable from `root`.
    ///
    /// Nodes are visited sequentially; fleets are small and a serial walk
    /// keeps failure attribution simple. Per-node and per-file faults are
    /// recorded in the report and never abort the run. Only a failure to
    /// create the archive itself is an error.
    pub async fn collect_fleet(&self, root: &Arc<dyn Entity>) -> Result<FleetReport> {
        let started_at = UtcTime::now();
        let run_id = RunId(self.run_seq.fetch_add(1, Ordering::Relaxed));

        ensure_dir(&self.config.base_dir).map_err(|e| {
            Status::with_message(CollectCode::BASE_DIR_CREATE_FAILED, e.describe())
        })?;
        let archive_path =
            Self::create_archive_dir(&self.config.base_dir, started_at.timestamp_millis())?;

        let nodes = discover(root, &capability::<ClusterNode>());
        info!(
            run = %run_id,
            nodes = nodes.len(),
            archive = %archive_path.display(),
            "collecting fleet metrics"
        );

        let deadline = self
            .config
            .fleet_deadline()
            .map(|d| Instant::now() + d);

        let mut reports = Vec::with_capacity(nodes.len());
        for node in &nodes {
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    warn!(node = %node.name(), "fleet deadline exceeded, skipping node");
                    reports.push(Self::skipped_node_report(
                        node,
                        &archive_path,
                        "fleet deadline exceeded",
                    ));
                    continue;
                }
            }
            reports.push(self.collect_node(node, &archive_path).await);
        }

        let report = FleetReport {
            run_id,
            archive_path,
            started_at,
            finished_at: UtcTime::now(),
            nodes: reports,
        };
        info!(
            run = %report.run_id,
            fetched = report.total_fetched(),
            failed = report.total_failed(),
            "fleet collection finished"
        );
        Ok(report)
    }

    /// Collect this node's diagnostics files into a subdirectory of
    /// `archive_root` named by its resolved host id.
    ///
    /// The node may not have a resolved identity yet (its poller may not
    /// have completed a successful tick); such nodes get a distinct
    /// `unresolved-<hostname>` directory rather than an empty name. Always
    /// returns a report; fetch faults are recorded, not raised.
    pub async fn collect_node(&self, node: &Arc<ClusterNode>, archive_root: &Path) -> NodeReport {
        let (host_label, resolved) = match node.host_id() {
            Some(id) if !id.is_empty() => (id, true),
            _ => (format!("unresolved-{}", node.hostname()), false),
        };
        let node_dir = archive_root.join(&host_label);

        if let Err(e) = ensure_dir(&node_dir) {
            warn!(node = %node.name(), dir = %node_dir.display(), error = %e, "node directory creation failed");
            let fetches = Self::planned_fetches(&node_dir)
                .map(|(role, remote, local)| FetchOutcome {
                    role,
                    remote_path: remote,
                    local_path: local,
                    status: FetchStatus::Skipped {
                        reason: "node directory creation failed".into(),
                    },
                })
                .collect();
            return NodeReport {
                node_name: node.name().to_string(),
                host_label,
                resolved,
                node_dir,
                dir_created: false,
                skipped_reason: Some("node directory creation failed".into()),
                fetches,
            };
        }

        let mut fetches = Vec::new();
        for (role, remote, local) in Self::planned_fetches(&node_dir) {
            fetches.push(self.fetch_one(node, role, remote, local).await);
        }

        let report = NodeReport {
            node_name: node.name().to_string(),
            host_label,
            resolved,
            node_dir,
            dir_created: true,
            skipped_reason: None,
            fetches,
        };
        debug!(
            node = %node.name(),
            fetched = report.fetched_count(),
            failed = report.failed_count(),
            "node collection finished"
        );
        report
    }

    /// The fixed list of (role, remote path, local path) fetches for one
    /// node directory.
    fn planned_fetches(node_dir: &Path) -> impl Iterator<Item = (String, PathBuf, PathBuf)> {
        let node_dir = node_dir.to_path_buf();
        let out = METRICS_OUT_ROLES
            .iter()
            .map(|role| (role.to_string(), format!("{}-metrics.out", role)));
        let log = METRICS_LOG_ROLES
            .iter()
            .map(|role| (role.to_string(), format!("{}metrics.log", role)));
        out.chain(log).map(move |(role, file)| {
            (
                role,
                PathBuf::from("/tmp").join(&file),
                node_dir.join(&file),
            )
        })
    }

    async fn fetch_one(
        &self,
        node: &Arc<ClusterNode>,
        role: String,
        remote_path: PathBuf,
        local_path: PathBuf,
    ) -> FetchOutcome {
        let timeout = self.config.fetch_timeout();
        let opts = CopyOptions::single_attempt().with_timeout(timeout);
        let copy = node.machine().copy_from(&remote_path, &local_path, &opts);
        let status = match tokio::time::timeout(timeout, copy).await {
            Ok(Ok(())) => FetchStatus::Fetched,
            Ok(Err(e)) => {
                // Not serious: the file probably does not exist on this node.
                debug!(
                    node = %node.name(),
                    remote = %remote_path.display(),
                    error = %e,
                    "unable to copy metrics file (file may not exist)"
                );
                FetchStatus::Failed {
                    reason: e.to_string(),
                }
            }
            Err(_) => {
                debug!(
                    node = %node.name(),
                    remote = %remote_path.display(),
                    "metrics fetch timed out"
                );
                FetchStatus::Failed {
                    reason: format!("timed out after {:?}", timeout),
                }
            }
        };
        FetchOutcome {
            role,
            remote_path,
            local_path,
            status,
        }
    }

    fn skipped_node_report(node: &Arc<ClusterNode>, archive_root: &Path, reason: &str) -> NodeReport {
        let (host_label, resolved) = match node.host_id() {
            Some(id) if !id.is_empty() => (id, true),
            _ => (format!("unresolved-{}", node.hostname()), false),
        };
        let node_dir = archive_root.join(&host_label);
        let fetches = Self::planned_fetches(&node_dir)
            .map(|(role, remote, local)| FetchOutcome {
                role,
                remote_path: remote,
                local_path: local,
                status: FetchStatus::Skipped {
                    reason: reason.into(),
                },
            })
            .collect();
        NodeReport {
            node_name: node.name().to_string(),
            host_label,
            resolved,
            node_dir,
            dir_created: false,
            skipped_reason: Some(reason.into()),
            fetches,
        }
    }

    /// Create the per-run archive directory.
    ///
    /// Millisecond timestamps are not collision-free across rapid
    /// successive runs; on collision a monotonic suffix is appended so the
    /// layout stays `cloudera-metrics-<millis>` in the common case.
    fn create_archive_dir(base: &Path, millis: i64) -> Result<PathBuf> {
        let mut seq = 0u32;
        loop {
            let name = if seq == 0 {
                format!("{}{}", ARCHIVE_PREFIX, millis)
            } else {
                format!("{}{}-{}", ARCHIVE_PREFIX, millis, seq)
            };
            let path = base.join(name);
            match std::fs::create_dir(&path) {
                Ok(()) => return Ok(path),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => seq += 1,
                Err(e) => {
                    return Err(Status::with_message(
                        CollectCode::ARCHIVE_DIR_CREATE_FAILED,
                        format!("mkdir {}: {}", path.display(), e),
                    ))
                }
            }
        }
    }
}
