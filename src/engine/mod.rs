//! Reconciliation Engine - Arena storage and the active/staging diff.
//!
//! The engine manages the core data structures:
//! - Arena: Slot storage with stable handles and a free-index pool
//! - HandleList: Ordered node membership, one list per node at a time
//! - ActiveStaging: The match-or-create / commit diff over both
//!
//! # Architecture
//!
//! Nodes are NOT linked objects. They live in an arena and are addressed by
//! stable handles; set membership is a handle in a list:
//!
//! ```text
//! arena:   [ worker "a" | worker "b" | worker "c" ]
//! active:  [ 0, 1 ]          (survivors of the previous pass)
//! staging: [ 1, 2 ]          (mid-pass: matched "b", created "c")
//! ```
//!
//! Relinking between sets is an index move, never a copy: the commit at the
//! end of a pass tears down whatever stayed in `active` and swaps the lists.

mod arena;
mod list;
mod reconciler;

pub use arena::*;
pub use list::*;
pub use reconciler::*;
