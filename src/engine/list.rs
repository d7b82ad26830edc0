//! Handle List - Ordered node membership.
//!
//! A [`HandleList`] records which nodes belong to one bookkeeping set, in
//! insertion order. Appending is O(1); removal scans linearly, which is fine
//! because list length is bounded by a component's fan-out (expected small).
//!
//! A handle belongs to exactly one list at a time. Moving a node between the
//! active and staging sets of the reconciler is expressed as removing the
//! handle here and appending it there - the node itself stays put in the
//! arena.

use super::arena::NodeHandle;

/// Ordered list of arena handles.
#[derive(Debug, Default)]
pub struct HandleList {
    handles: Vec<NodeHandle>,
}

impl HandleList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self {
            handles: Vec::new(),
        }
    }

    /// Append a handle at the end. O(1).
    pub fn append(&mut self, handle: NodeHandle) {
        self.handles.push(handle);
    }

    /// Remove and return the first handle satisfying `predicate`.
    ///
    /// Preserves the order of the remaining handles.
    pub fn remove_first(&mut self, predicate: impl FnMut(&NodeHandle) -> bool) -> Option<NodeHandle> {
        let position = self.handles.iter().position(predicate)?;
        Some(self.handles.remove(position))
    }

    /// Iterate the handles in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = NodeHandle> + '_ {
        self.handles.iter().copied()
    }

    /// Remove all handles, yielding them in insertion order.
    pub fn drain(&mut self) -> impl Iterator<Item = NodeHandle> + '_ {
        self.handles.drain(..)
    }

    /// Number of handles in the list.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// True when the list holds no handles.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Drop all handles without yielding them.
    pub fn clear(&mut self) {
        self.handles.clear();
    }
}
