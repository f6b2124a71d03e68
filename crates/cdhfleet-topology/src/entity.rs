use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use cdhfleet_types::EntityId;
use parking_lot::RwLock;

static NEXT_ENTITY_ID: AtomicU64 = AtomicU64::new(1);

/// Allocate a process-unique entity id.
pub fn next_entity_id() -> EntityId {
    EntityId(NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed))
}

/// A member of the composition tree.
///
/// The tree itself knows nothing about concrete entity types; capability
/// checks are done by downcasting through [`Entity::as_any`]. Callers must
/// supply an acyclic tree; cycle detection is not performed.
pub trait Entity: Send + Sync + 'static {
    /// Process-unique identifier of this entity.
    fn entity_id(&self) -> EntityId;

    /// Human-readable display name.
    fn name(&self) -> &str;

    /// Ordered children of this entity. Leaves return an empty vector.
    fn children(&self) -> Vec<Arc<dyn Entity>>;

    /// Upcast for capability downcasting.
    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// A generic container entity holding an ordered list of children.
pub struct Group {
    id: EntityId,
    name: String,
    children: RwLock<Vec<Arc<dyn Entity>>>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            id: next_entity_id(),
            name: name.into(),
            children: RwLock::new(Vec::new()),
        })
    }

    /// Append a child; children keep insertion order.
    pub fn add_child(&self, child: Arc<dyn Entity>) {
        self.children.write().push(child);
    }

    pub fn child_count(&self) -> usize {
        self.children.read().len()
    }
}

impl Entity for Group {
    fn entity_id(&self) -> EntityId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn children(&self) -> Vec<Arc<dyn Entity>> {
        self.children.read().clone()
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_ids_unique() {
        let a = next_entity_id();
        let b = next_entity_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_group_children_ordered() {
        let root = Group::new("root");
        let a = Group::new("a");
        let b = Group::new("b");
        root.add_child(a.clone());
        root.add_child(b.clone());

        assert_eq!(root.child_count(), 2);
        let children = Entity::children(&*root);
        assert_eq!(children[0].name(), "a");
        assert_eq!(children[1].name(), "b");
    }

    #[test]
    fn test_group_is_entity() {
        let g = Group::new("cluster");
        let e: Arc<dyn Entity> = g;
        assert_eq!(e.name(), "cluster");
        assert!(e.children().is_empty());
    }
}
