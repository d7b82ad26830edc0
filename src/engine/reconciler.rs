//! Active/Staging Reconciler - Match-or-create, then commit.
//!
//! [`ActiveStaging`] is the tree-diff core used for anything a component
//! re-declares every render pass (child trees, background workers). It keeps
//! two handle lists over one arena:
//!
//! - `active` - outside a pass, the surviving nodes from the previous pass.
//!   During a pass, the nodes that have *not yet* been matched.
//! - `staging` - during a pass, every node requested so far (moved over from
//!   `active` on a match, or freshly created on a miss). Empty between passes.
//!
//! The whole algorithm is two operations: [`retain_or_create`] during the
//! pass, [`commit_staging`] at the end. Anything left in `active` at commit
//! time was not requested this pass and is torn down exactly once.
//!
//! [`retain_or_create`]: ActiveStaging::retain_or_create
//! [`commit_staging`]: ActiveStaging::commit_staging

use super::arena::{NodeArena, NodeHandle};
use super::list::HandleList;

/// Two-list reconciler for keyed, matchable nodes.
#[derive(Debug, Default)]
pub struct ActiveStaging<T> {
    arena: NodeArena<T>,
    active: HandleList,
    staging: HandleList,
}

impl<T> ActiveStaging<T> {
    /// Create an empty reconciler.
    pub fn new() -> Self {
        Self {
            arena: NodeArena::new(),
            active: HandleList::new(),
            staging: HandleList::new(),
        }
    }

    /// Reuse the first active node satisfying `predicate`, or create one.
    ///
    /// On a match the node's handle moves from `active` to `staging` (the
    /// node itself never moves); on a miss `create()` builds a new node which
    /// is staged directly. Either way the returned handle is staged and valid
    /// at least until the next [`commit_staging`](Self::commit_staging).
    ///
    /// Match position carries no meaning: callers match on identity (key and
    /// equivalence), not on order.
    pub fn retain_or_create(
        &mut self,
        mut predicate: impl FnMut(&T) -> bool,
        create: impl FnOnce() -> T,
    ) -> NodeHandle {
        let retained = {
            let arena = &self.arena;
            self.active.remove_first(|&handle| predicate(arena.get(handle)))
        };
        let handle = match retained {
            Some(handle) => handle,
            None => self.arena.insert(create()),
        };
        self.staging.append(handle);
        handle
    }

    /// Finish the pass: tear down unmatched nodes, promote the staged set.
    ///
    /// Every node still in `active` was not requested this pass; it is
    /// removed from the arena and handed to `on_remove` by value, exactly
    /// once. The lists are then swapped, leaving `staging` empty and `active`
    /// holding precisely this pass's result set, in request order.
    pub fn commit_staging(&mut self, mut on_remove: impl FnMut(T)) {
        let unmatched = self.active.len();
        for handle in self.active.drain() {
            let node = self.arena.remove(handle);
            on_remove(node);
        }
        std::mem::swap(&mut self.active, &mut self.staging);

        if unmatched > 0 {
            tracing::trace!(removed = unmatched, "commit tore down unmatched nodes");
        }
    }

    /// Borrow the node at `handle`.
    pub fn get(&self, handle: NodeHandle) -> &T {
        self.arena.get(handle)
    }

    /// Mutably borrow the node at `handle`.
    pub fn get_mut(&mut self, handle: NodeHandle) -> &mut T {
        self.arena.get_mut(handle)
    }

    /// Handles of the current active set, in order.
    pub fn active_handles(&self) -> impl Iterator<Item = NodeHandle> + '_ {
        self.active.iter()
    }

    /// Number of nodes in the active set.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Number of nodes staged so far this pass.
    pub fn staging_count(&self) -> usize {
        self.staging.len()
    }

    /// True if any node staged this pass satisfies `predicate`.
    ///
    /// Used for duplicate-registration detection: two requests in one pass
    /// that would match the same node are a caller error.
    pub fn staged_any(&self, mut predicate: impl FnMut(&T) -> bool) -> bool {
        self.staging.iter().any(|handle| predicate(self.arena.get(handle)))
    }
}
