use catalog_store::{CatalogStore, NodePath};
use std::collections::HashSet;

/// Destinations handed out during one run.
///
/// A destination is free only when it neither exists in the store nor was
/// claimed by an earlier accepted action of the same run.
#[derive(Debug, Default)]
pub struct CollisionGuard {
    claimed: HashSet<NodePath>,
}

impl CollisionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_taken(&self, store: &dyn CatalogStore, dest: &NodePath) -> bool {
        self.claimed.contains(dest) || store.exists(dest)
    }

    /// Claim `dest` if it is free. Returns `false` on a collision.
    pub fn try_claim(&mut self, store: &dyn CatalogStore, dest: &NodePath) -> bool {
        if self.is_taken(store, dest) {
            return false;
        }
        self.claimed.insert(dest.clone());
        true
    }

    pub fn claimed(&self) -> usize {
        self.claimed.len()
    }
}
