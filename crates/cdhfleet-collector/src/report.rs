//! Structured results for collection runs.
//!
//! Best-effort suppression of per-file faults still needs to be
//! inspectable: every attempted fetch is recorded with its outcome and
//! aggregated per node and per run, instead of disappearing into log
//! lines.

use cdhfleet_types::{RunId, UtcTime};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of one attempted file fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FetchStatus {
    Fetched,
    Failed { reason: String },
    Skipped { reason: String },
}

impl FetchStatus {
    pub fn is_fetched(&self) -> bool {
        matches!(self, FetchStatus::Fetched)
    }
}

/// One attempted fetch of a remote diagnostics file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchOutcome {
    pub role: String,
    pub remote_path: PathBuf,
    pub local_path: PathBuf,
    #[serde(flatten)]
    pub status: FetchStatus,
}

/// Collection results for one node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeReport {
    pub node_name: String,

    /// Directory name used for this node under the archive: the resolved
    /// host id, or a distinct `unresolved-` label when the poller has not
    /// resolved one yet.
    pub host_label: String,

    /// Whether `host_label` is a resolved roster identifier.
    pub resolved: bool,

    pub node_dir: PathBuf,
    pub dir_created: bool,

    /// Set when the whole node was skipped (deadline, directory failure).
    pub skipped_reason: Option<String>,

    pub fetches: Vec<FetchOutcome>,
}

impl NodeReport {
    pub fn fetched_count(&self) -> usize {
        self.fetches.iter().filter(|f| f.status.is_fetched()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.fetches
            .iter()
            .filter(|f| matches!(f.status, FetchStatus::Failed { .. }))
            .count()
    }
}

/// Results of one fleet-wide collection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetReport {
    pub run_id: RunId,
    pub archive_path: PathBuf,
    pub started_at: UtcTime,
    pub finished_at: UtcTime,
    pub nodes: Vec<NodeReport>,
}

impl FleetReport {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn total_fetched(&self) -> usize {
        self.nodes.iter().map(|n| n.fetched_count()).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.nodes.iter().map(|n| n.failed_count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(role: &str, status: FetchStatus) -> FetchOutcome {
        FetchOutcome {
            role: role.into(),
            remote_path: format!("/tmp/{}-metrics.out", role).into(),
            local_path: format!("/archive/h1/{}-metrics.out", role).into(),
            status,
        }
    }

    #[test]
    fn test_node_report_counters() {
        let report = NodeReport {
            node_name: "n1".into(),
            host_label: "h1".into(),
            resolved: true,
            node_dir: "/archive/h1".into(),
            dir_created: true,
            skipped_reason: None,
            fetches: vec![
                outcome("datanode", FetchStatus::Fetched),
                outcome(
                    "namenode",
                    FetchStatus::Failed {
                        reason: "not found".into(),
                    },
                ),
                outcome(
                    "master",
                    FetchStatus::Skipped {
                        reason: "deadline".into(),
                    },
                ),
            ],
        };
        assert_eq!(report.fetched_count(), 1);
        assert_eq!(report.failed_count(), 1);
    }

    #[test]
    fn test_fleet_report_aggregation() {
        let node = NodeReport {
            node_name: "n1".into(),
            host_label: "h1".into(),
            resolved: true,
            node_dir: "/archive/h1".into(),
            dir_created: true,
            skipped_reason: None,
            fetches: vec![outcome("datanode", FetchStatus::Fetched)],
        };
        let report = FleetReport {
            run_id: RunId(1),
            archive_path: "/archive".into(),
            started_at: UtcTime::now(),
            finished_at: UtcTime::now(),
            nodes: vec![node.clone(), node],
        };
        assert_eq!(report.node_count(), 2);
        assert_eq!(report.total_fetched(), 2);
        assert_eq!(report.total_failed(), 0);
    }

    #[test]
    fn test_report_serde_roundtrip() {
        let report = NodeReport {
            node_name: "n1".into(),
            host_label: "unresolved-h1".into(),
            resolved: false,
            node_dir: "/archive/unresolved-h1".into(),
            dir_created: true,
            skipped_reason: None,
            fetches: vec![outcome(
                "jvm",
                FetchStatus::Failed {
                    reason: "timeout".into(),
                },
            )],
        };
        let json = serde_json::to_string(&report).unwrap();
        let back: NodeReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.host_label, "unresolved-h1");
        assert!(!back.resolved);
        assert_eq!(back.failed_count(), 1);
    }
}
