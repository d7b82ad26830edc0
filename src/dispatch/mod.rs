//! Dispatch - Actions, the shared queue, and erased handlers.
//!
//! Everything that happens after a render pass flows through here:
//!
//! - **Action** - A one-shot state transition with an optional output
//! - **Queue** - The single ordered MPSC path into the external reducer
//! - **OutputHandler** - Type-checked erased value-to-action mappings that
//!   child and worker nodes store and rebind across passes

mod action;
mod handler;
mod queue;

pub use action::*;
pub use handler::*;
pub use queue::*;
