//! Cluster node entities and their liveness machinery.
//!
//! A [`ClusterNode`] is a provisioned fleet member. Its canonical host
//! identifier within the manager's roster is resolved best-effort
//! ([`identity::resolve_host_identity`]) and kept fresh by a per-node
//! [`LivenessPoller`] task.

pub mod identity;
pub mod node;
pub mod poller;

pub use identity::resolve_host_identity;
pub use node::ClusterNode;
pub use poller::{LivenessPoller, PollerConfig};
