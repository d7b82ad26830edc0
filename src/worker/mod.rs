//! Workers - Background producers tracked across render passes.
//!
//! This module contains the worker side of the runtime:
//!
//! - **Worker** - Descriptor trait with semantic "does the same work"
//!   equivalence
//! - **Channel** - Per-worker delivery stream with an explicit terminal
//!   `Done` signal
//! - **WorkerNode** - Lifecycle state: descriptor, key, channel, tombstone,
//!   rebindable handler
//! - **WorkerPool** - The WorkerRunner capability: reconciles registrations,
//!   cancels stale workers, drains deliveries into the action queue

mod channel;
mod descriptor;
mod node;
mod pool;

pub use channel::*;
pub use descriptor::*;
pub use node::*;
pub use pool::*;
