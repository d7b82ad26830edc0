//! # spark-flow
//!
//! Tree reconciliation and action dispatch runtime for reactive component
//! frameworks.
//!
//! ## Architecture
//!
//! A host drives the runtime in render passes. Each pass re-declares the
//! full set of children and workers it wants alive; the runtime diffs that
//! declaration against the previous pass, reusing what matches and tearing
//! down what doesn't. Everything that happens *between* passes - UI events,
//! worker deliveries, child outputs - is funneled through one strictly
//! ordered action queue and applied to state one action at a time:
//!
//! ```text
//! render pass ──▶ RenderContext ──▶ reconcilers (children, workers)
//!                      │
//!                      └──▶ callbacks / sinks ──▶ action queue ──▶ state
//! ```
//!
//! ## Modules
//!
//! - [`engine`] - Arena-backed node storage and the active/staging
//!   reconciler primitive
//! - [`dispatch`] - Actions, the ordered action queue, type-erased output
//!   handlers
//! - [`worker`] - Worker descriptors, delivery channels, lifecycle nodes,
//!   and the reconciling pool
//! - [`context`] - The per-pass registration surface with its one-way
//!   building/frozen phase

pub mod context;
pub mod dispatch;
pub mod engine;
pub mod worker;

// Re-export commonly used items
pub use context::{
    ActionSink, ChildComponent, EventCallback, RenderContext, Renderer, Rendering, WorkerRunner,
};
pub use dispatch::{action_queue, Action, ActionReceiver, ActionSender, OutputHandler};
pub use engine::{ActiveStaging, HandleList, NodeArena, NodeHandle};
pub use worker::{
    worker_channel, ValueOrDone, Worker, WorkerChannelClosed, WorkerNode, WorkerPool,
    WorkerReceiver, WorkerSender,
};
