//! Fleet-wide metrics harvesting.
//!
//! The collector walks the composition tree for cluster nodes and copies
//! each node's per-role diagnostics files into a timestamped archive
//! directory on the local machine. Every fetch is a single best-effort
//! attempt: the remote files are optional diagnostics written by node-local
//! processes that may never have started, so absence is an expected
//! outcome, not an error. Faults local to one file or one node never abort
//! the run; every outcome lands in a structured [`FleetReport`].

pub mod collector;
pub mod config;
pub mod report;

pub use collector::{MetricsCollector, ARCHIVE_PREFIX, METRICS_LOG_ROLES, METRICS_OUT_ROLES};
pub use config::CollectorConfig;
pub use report::{FetchOutcome, FetchStatus, FleetReport, NodeReport};
