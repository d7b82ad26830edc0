//! Node Arena - Slot storage with stable handles.
//!
//! Nodes live in a slot vector and are addressed by [`NodeHandle`]s that stay
//! valid until the node is removed. Freed slots go into a pool and are reused
//! by the next insert, so handle values stay small and storage stays compact
//! across many render passes.
//!
//! The arena owns its nodes outright. Moving a node between bookkeeping lists
//! (see [`HandleList`](super::HandleList)) moves only the handle - the node
//! itself never relocates.

/// Stable address of a node inside a [`NodeArena`].
///
/// Handles are plain indices: cheap to copy, hash, and compare. A handle is
/// only meaningful to the arena that issued it, and only until the node is
/// removed. Using a stale handle is a programming error and panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle(usize);

impl NodeHandle {
    /// Raw slot index, for debug output.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Slot-vector arena with a free-index pool.
///
/// `insert` is O(1) (freed slots are reused before the vector grows) and
/// `remove` returns the owned node, so teardown callbacks receive the node
/// by value.
#[derive(Debug)]
pub struct NodeArena<T> {
    slots: Vec<Option<T>>,
    free: Vec<usize>,
    len: usize,
}

impl<T> NodeArena<T> {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Insert a node, reusing a freed slot when one is available.
    pub fn insert(&mut self, node: T) -> NodeHandle {
        self.len += 1;
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(node);
                NodeHandle(index)
            }
            None => {
                self.slots.push(Some(node));
                NodeHandle(self.slots.len() - 1)
            }
        }
    }

    /// Remove a node, returning it by value and recycling its slot.
    ///
    /// Panics if the handle is stale (slot already vacant).
    pub fn remove(&mut self, handle: NodeHandle) -> T {
        let node = self.slots[handle.0]
            .take()
            .unwrap_or_else(|| panic!("stale NodeHandle({}): slot is vacant", handle.0));
        self.free.push(handle.0);
        self.len -= 1;
        node
    }

    /// Borrow the node at `handle`. Panics on a stale handle.
    pub fn get(&self, handle: NodeHandle) -> &T {
        self.slots[handle.0]
            .as_ref()
            .unwrap_or_else(|| panic!("stale NodeHandle({}): slot is vacant", handle.0))
    }

    /// Mutably borrow the node at `handle`. Panics on a stale handle.
    pub fn get_mut(&mut self, handle: NodeHandle) -> &mut T {
        self.slots[handle.0]
            .as_mut()
            .unwrap_or_else(|| panic!("stale NodeHandle({}): slot is vacant", handle.0))
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no nodes are live.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T> Default for NodeArena<T> {
    fn default() -> Self {
        Self::new()
    }
}
