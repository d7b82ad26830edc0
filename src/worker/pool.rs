//! Worker Pool - The WorkerRunner capability over the reconciler.
//!
//! The pool owns every worker lifecycle node and performs the worker half of
//! reconciliation: a pass's `running_worker` registrations are diffed against
//! the previous pass with [`ActiveStaging::retain_or_create`] and
//! [`WorkerNode::matches`], the commit tears down whatever was not
//! re-requested, and [`poll_deliveries`](WorkerPool::poll_deliveries) turns
//! ready channel deliveries into ordered actions.
//!
//! The pool never schedules anything itself. Producers are launched by a
//! spawn callback injected at construction, and the blocking/awaiting loop
//! that decides *when* to poll lives in the orchestrator.
//!
//! Per-pass protocol: `running_worker` for every requested worker, then
//! `commit` exactly once, then poll between passes.

use std::cell::RefCell;

use crate::context::WorkerRunner;
use crate::dispatch::{ActionSender, OutputHandler};
use crate::engine::{ActiveStaging, NodeHandle};

use super::channel::{worker_channel, ValueOrDone, WorkerSender};
use super::descriptor::Worker;
use super::node::WorkerNode;

/// Callback that hands a freshly created channel to the external scheduler.
pub type SpawnFn = Box<dyn Fn(&dyn Worker, WorkerSender)>;

/// Owns and reconciles all worker lifecycle nodes.
pub struct WorkerPool<S: 'static, O: 'static> {
    nodes: ActiveStaging<WorkerNode<S, O>>,
    spawn: SpawnFn,
}

impl<S: 'static, O: 'static> WorkerPool<S, O> {
    /// Create a pool. `spawn` launches the producer for a new worker.
    pub fn new(spawn: impl Fn(&dyn Worker, WorkerSender) + 'static) -> Self {
        Self {
            nodes: ActiveStaging::new(),
            spawn: Box::new(spawn),
        }
    }

    /// Register one worker for the current pass.
    ///
    /// A node from the previous pass that does the same work under the same
    /// key is reused as-is - no new channel, no new producer. Otherwise a
    /// channel is created, the spawn callback launches the producer, and a
    /// fresh node is staged. Either way the node ends up bound to `handler`.
    ///
    /// Registering two workers in one pass that match each other (equivalent
    /// work, equal key) is a caller error and panics: the reconciler cannot
    /// disambiguate them on the next pass.
    pub fn running_worker(
        &mut self,
        worker: Box<dyn Worker>,
        key: &str,
        handler: OutputHandler<S, O>,
    ) -> NodeHandle {
        if self.nodes.staged_any(|node| node.matches(worker.as_ref(), key)) {
            panic!(
                "duplicate worker registration in one render pass (key {key:?}); \
                 give equivalent workers distinct keys"
            );
        }

        // The predicate borrows the descriptor; create() consumes it. The
        // scan always completes before create() runs, so the slot is still
        // occupied there on a miss.
        let worker = RefCell::new(Some(worker));
        let spawn = &self.spawn;
        let handle = self.nodes.retain_or_create(
            |node| match worker.borrow().as_deref() {
                Some(requested) => node.matches(requested, key),
                None => false,
            },
            || {
                let worker = worker
                    .borrow_mut()
                    .take()
                    .expect("create() runs once, after the scan");
                let (tx, rx) = worker_channel();
                tracing::debug!(key, "spawning worker");
                spawn(worker.as_ref(), tx);
                WorkerNode::new(worker, key, rx, handler.clone())
            },
        );

        // Reused nodes must run this pass's closure, not last pass's; for a
        // fresh node this rebinds the handler it was created with.
        self.nodes.get_mut(handle).set_handler(handler);
        handle
    }

    /// Finish the pass: cancel and tear down every worker not re-requested.
    ///
    /// Closing the channel is the cancellation signal - the producer's next
    /// send fails. No further delivery is ever taken from a torn-down node.
    pub fn commit(&mut self) {
        self.nodes.commit_staging(|mut node| {
            node.close();
            tracing::debug!(key = node.key(), "worker torn down");
        });
    }

    /// Drain every ready delivery into the action queue, in arrival order.
    ///
    /// `Value` deliveries go through the node's current handler and are
    /// enqueued; `Done` (explicit, or a producer hanging up) tombstones the
    /// node so completion is never presented twice. Tombstoned nodes are
    /// skipped entirely. Returns the number of actions enqueued.
    ///
    /// Call between passes; the multi-source await that decides when lives
    /// in the orchestrator.
    pub fn poll_deliveries(&mut self, actions: &ActionSender<S, O>) -> usize {
        let handles: Vec<NodeHandle> = self.nodes.active_handles().collect();
        let mut delivered = 0;

        for handle in handles {
            let node = self.nodes.get_mut(handle);
            if node.is_tombstoned() {
                continue;
            }
            loop {
                match node.take_delivery() {
                    Some(ValueOrDone::Value(value)) => {
                        let action = node.accept_update(value);
                        actions.enqueue(action);
                        delivered += 1;
                    }
                    Some(ValueOrDone::Done) => {
                        node.mark_tombstoned();
                        node.close();
                        tracing::debug!(key = node.key(), "worker finished");
                        break;
                    }
                    None => break,
                }
            }
        }

        delivered
    }

    /// Number of workers currently tracked (post-commit: this pass's set).
    pub fn active_count(&self) -> usize {
        self.nodes.active_count()
    }

    /// Borrow a node by handle, for orchestrator bookkeeping.
    pub fn node(&self, handle: NodeHandle) -> &WorkerNode<S, O> {
        self.nodes.get(handle)
    }
}

impl<S: 'static, O: 'static> WorkerRunner<S, O> for WorkerPool<S, O> {
    fn running_worker(&mut self, worker: Box<dyn Worker>, key: &str, handler: OutputHandler<S, O>) {
        // Inherent method; the trait surface drops the handle
        let _ = WorkerPool::running_worker(self, worker, key, handler);
    }
}
