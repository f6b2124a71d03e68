use std::sync::Arc;

use crate::entity::Entity;

/// Walk the tree rooted at `root` in pre-order and collect every entity the
/// capability predicate selects.
///
/// A selected entity's subtree is not descended into: discovery never both
/// returns an entity and entities below it. The result preserves the
/// pre-order, left-to-right traversal order of the tree.
pub fn discover<T>(
    root: &Arc<dyn Entity>,
    select: &dyn Fn(&Arc<dyn Entity>) -> Option<T>,
) -> Vec<T> {
    let mut found = Vec::new();
    walk(root, select, &mut found);
    found
}

fn walk<T>(
    entity: &Arc<dyn Entity>,
    select: &dyn Fn(&Arc<dyn Entity>) -> Option<T>,
    out: &mut Vec<T>,
) {
    if let Some(hit) = select(entity) {
        out.push(hit);
        return;
    }
    for child in entity.children() {
        walk(&child, select, out);
    }
}

/// Build a capability predicate selecting entities of concrete type `T`.
///
/// `discover(&root, &capability::<ClusterNode>())` enumerates every cluster
/// node reachable from `root`.
pub fn capability<T: Send + Sync + 'static>() -> impl Fn(&Arc<dyn Entity>) -> Option<Arc<T>> {
    |entity| entity.clone().as_any().downcast::<T>().ok()
}
