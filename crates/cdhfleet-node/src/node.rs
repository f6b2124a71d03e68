use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use cdhfleet_machine::RemoteMachine;
use cdhfleet_mgmtd::ManagedHostRoster;
use cdhfleet_topology::{next_entity_id, Entity};
use cdhfleet_types::{EntityId, Result};
use tracing::{debug, warn};

use crate::identity::resolve_host_identity;

/// A provisioned fleet member.
///
/// `hostname` and `private_hostname` are assigned externally at provision
/// time. `host_id` and `service_up` are derived: they are written only by
/// the liveness machinery, always together from one resolution result, so
/// `service_up` is true exactly when `host_id` is set. Readers (the metrics
/// collector) may observe a stale value; writes are last-writer-wins.
pub struct ClusterNode {
    id: EntityId,
    name: String,
    hostname: String,
    private_hostname: String,
    host_id: ArcSwapOption<String>,
    service_up: AtomicBool,
    manager: Option<Arc<dyn ManagedHostRoster>>,
    machine: Arc<dyn RemoteMachine>,
}

impl ClusterNode {
    pub fn new(
        name: impl Into<String>,
        hostname: impl Into<String>,
        private_hostname: impl Into<String>,
        machine: Arc<dyn RemoteMachine>,
        manager: Option<Arc<dyn ManagedHostRoster>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            id: next_entity_id(),
            name: name.into(),
            hostname: hostname.into(),
            private_hostname: private_hostname.into(),
            host_id: ArcSwapOption::empty(),
            service_up: AtomicBool::new(false),
            manager,
            machine,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn private_hostname(&self) -> &str {
        &self.private_hostname
    }

    pub fn machine(&self) -> &Arc<dyn RemoteMachine> {
        &self.machine
    }

    /// The canonical identifier this node currently believes it has within
    /// the manager's roster.
    pub fn host_id(&self) -> Option<String> {
        self.host_id.load_full().map(|id| (*id).clone())
    }

    pub fn service_up(&self) -> bool {
        self.service_up.load(Ordering::Acquire)
    }

    /// Publish a resolution result to both derived attributes.
    pub fn set_identity(&self, resolved: Option<String>) {
        let up = resolved.is_some();
        self.host_id.store(resolved.map(Arc::new));
        self.service_up.store(up, Ordering::Release);
    }

    /// Resolve this node's identity against the manager's current roster.
    ///
    /// No configured manager means no roster, which resolves to nothing; a
    /// roster read failure is propagated.
    pub fn managed_host_id(&self) -> Result<Option<String>> {
        let roster = match &self.manager {
            Some(manager) => manager.managed_hosts()?,
            None => return Ok(None),
        };
        Ok(resolve_host_identity(
            &self.hostname,
            &self.private_hostname,
            &roster,
        ))
    }

    /// One liveness observation: resolve and publish.
    ///
    /// A roster fault downgrades to the unresolved state for this
    /// observation; it is never propagated.
    pub fn refresh_identity(&self) -> Option<String> {
        let resolved = match self.managed_host_id() {
            Ok(resolved) => resolved,
            Err(status) => {
                warn!(node = %self.name, %status, "roster read failed, marking unresolved");
                None
            }
        };
        debug!(node = %self.name, host_id = ?resolved, "liveness refreshed");
        self.set_identity(resolved.clone());
        resolved
    }
}

impl Entity for ClusterNode {
    fn entity_id(&self) -> EntityId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn children(&self) -> Vec<Arc<dyn Entity>> {
        Vec::new()
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdhfleet_machine::LocalMachine;
    use cdhfleet_mgmtd::CdhManager;
    use cdhfleet_types::{make_error, MgmtCode};

    struct FaultyRoster;

    impl ManagedHostRoster for FaultyRoster {
        fn managed_hosts(&self) -> Result<Vec<String>> {
            make_error(MgmtCode::ROSTER_UNAVAILABLE)
        }
    }

    fn machine() -> Arc<dyn RemoteMachine> {
        Arc::new(LocalMachine::new("test"))
    }

    fn assert_invariant(node: &ClusterNode) {
        assert_eq!(node.service_up(), node.host_id().is_some());
    }

    #[test]
    fn test_new_node_is_unresolved() {
        let node = ClusterNode::new("n1", "h1", "h1", machine(), None);
        assert_eq!(node.host_id(), None);
        assert!(!node.service_up());
        assert_invariant(&node);
    }

    #[test]
    fn test_refresh_without_manager_resolves_nothing() {
        let node = ClusterNode::new("n1", "h1", "h1", machine(), None);
        assert_eq!(node.refresh_identity(), None);
        assert_invariant(&node);
    }

    #[test]
    fn test_refresh_resolves_against_manager() {
        let mgr = CdhManager::new("cm");
        mgr.set_managed_hosts(vec!["h1".into(), "h2".into()]);
        let node = ClusterNode::new("n1", "h1", "h1", machine(), Some(mgr));

        assert_eq!(node.refresh_identity(), Some("h1".into()));
        assert!(node.service_up());
        assert_eq!(node.host_id(), Some("h1".into()));
        assert_invariant(&node);
    }

    #[test]
    fn test_refresh_prefix_resolution() {
        let mgr = CdhManager::new("cm");
        mgr.set_managed_hosts(vec!["ip-10-1-1-1.ec2.internal".into()]);
        let node = ClusterNode::new("n1", "ip-10-1-1-1-public", "ip-10-1-1-1", machine(), Some(mgr));

        assert_eq!(
            node.refresh_identity(),
            Some("ip-10-1-1-1.ec2.internal".into())
        );
        assert_invariant(&node);
    }

    #[test]
    fn test_deregistration_clears_identity() {
        let mgr = CdhManager::new("cm");
        mgr.set_managed_hosts(vec!["h1".into()]);
        let node = ClusterNode::new("n1", "h1", "h1", machine(), Some(mgr.clone()));

        node.refresh_identity();
        assert!(node.service_up());

        mgr.set_managed_hosts(vec![]);
        assert_eq!(node.refresh_identity(), None);
        assert!(!node.service_up());
        assert_invariant(&node);
    }

    #[test]
    fn test_roster_fault_downgrades_to_unresolved() {
        let node = ClusterNode::new("n1", "h1", "h1", machine(), Some(Arc::new(FaultyRoster)));
        assert!(node.managed_host_id().is_err());
        // The liveness path swallows the fault.
        assert_eq!(node.refresh_identity(), None);
        assert!(!node.service_up());
        assert_invariant(&node);
    }

    #[test]
    fn test_node_is_leaf_entity() {
        let node = ClusterNode::new("n1", "h1", "h1", machine(), None);
        let e: Arc<dyn Entity> = node;
        assert_eq!(e.name(), "n1");
        assert!(e.children().is_empty());
    }
}
