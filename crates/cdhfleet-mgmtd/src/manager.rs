use std::any::Any;
use std::sync::Arc;

use cdhfleet_topology::{next_entity_id, Entity};
use cdhfleet_types::{EntityId, Result};
use parking_lot::RwLock;
use tracing::debug;

use crate::ManagedHostRoster;

/// The manager entity holding the roster of registered host identifiers.
///
/// The roster is mutated only by external management-plane events
/// ([`CdhManager::set_managed_hosts`] and friends); from the node-management
/// core's perspective it is read-only, via [`ManagedHostRoster`]. Entries
/// keep the order in which the manager reported them.
pub struct CdhManager {
    id: EntityId,
    name: String,
    hosts: RwLock<Vec<String>>,
}

impl CdhManager {
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            id: next_entity_id(),
            name: name.into(),
            hosts: RwLock::new(Vec::new()),
        })
    }

    /// Replace the entire roster, preserving the given order.
    pub fn set_managed_hosts(&self, hosts: Vec<String>) {
        debug!(manager = %self.name, count = hosts.len(), "roster replaced");
        *self.hosts.write() = hosts;
    }

    /// Append a host identifier if not already present.
    pub fn add_managed_host(&self, host: impl Into<String>) {
        let host = host.into();
        let mut hosts = self.hosts.write();
        if !hosts.contains(&host) {
            debug!(manager = %self.name, %host, "host registered");
            hosts.push(host);
        }
    }

    /// Remove a host identifier. Returns whether it was present.
    pub fn remove_managed_host(&self, host: &str) -> bool {
        let mut hosts = self.hosts.write();
        let before = hosts.len();
        hosts.retain(|h| h != host);
        let removed = hosts.len() != before;
        if removed {
            debug!(manager = %self.name, %host, "host deregistered");
        }
        removed
    }

    pub fn host_count(&self) -> usize {
        self.hosts.read().len()
    }
}

impl ManagedHostRoster for CdhManager {
    fn managed_hosts(&self) -> Result<Vec<String>> {
        Ok(self.hosts.read().clone())
    }
}

impl Entity for CdhManager {
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

    #[test]
    fn test_empty_roster() {
        let mgr = CdhManager::new("cm");
        assert_eq!(mgr.host_count(), 0);
        assert!(mgr.managed_hosts().unwrap().is_empty());
    }

    #[test]
    fn test_set_managed_hosts_preserves_order() {
        let mgr = CdhManager::new("cm");
        mgr.set_managed_hosts(vec!["b".into(), "a".into(), "c".into()]);
        assert_eq!(
            mgr.managed_hosts().unwrap(),
            vec!["b".to_string(), "a".to_string(), "c".to_string()]
        );
    }

    #[test]
    fn test_add_managed_host_dedupes() {
        let mgr = CdhManager::new("cm");
        mgr.add_managed_host("h1");
        mgr.add_managed_host("h2");
        mgr.add_managed_host("h1");
        assert_eq!(mgr.host_count(), 2);
    }

    #[test]
    fn test_remove_managed_host() {
        let mgr = CdhManager::new("cm");
        mgr.add_managed_host("h1");
        assert!(mgr.remove_managed_host("h1"));
        assert!(!mgr.remove_managed_host("h1"));
        assert_eq!(mgr.host_count(), 0);
    }

    #[test]
    fn test_manager_is_leaf_entity() {
        let mgr = CdhManager::new("cm");
        let e: Arc<dyn Entity> = mgr;
        assert_eq!(e.name(), "cm");
        assert!(e.children().is_empty());
    }

    #[test]
    fn test_roster_read_is_snapshot() {
        let mgr = CdhManager::new("cm");
        mgr.add_managed_host("h1");
        let snapshot = mgr.managed_hosts().unwrap();
        mgr.add_managed_host("h2");
        assert_eq!(snapshot.len(), 1);
        assert_eq!(mgr.host_count(), 2);
    }
}
