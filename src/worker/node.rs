//! Worker Lifecycle Nodes - One running producer, tracked across passes.
//!
//! A [`WorkerNode`] records everything the runtime knows about one running
//! background producer: the descriptor it was requested with, its
//! registration key, the inbound delivery channel, a one-way `tombstone`
//! flag, and the current value-to-action handler.
//!
//! The tombstone exists to make completion delivery at-most-once: after the
//! run loop has observed `Done` it marks the node, and a tombstoned node is
//! never presented as freshly completed again - even if a misbehaving
//! producer keeps emitting. Without it, a component that keeps requesting a
//! finished worker would see an endless stream of completions.

use std::any::Any;

use crate::dispatch::{Action, OutputHandler};

use super::channel::{ValueOrDone, WorkerReceiver};
use super::descriptor::Worker;

/// Lifecycle state of one running background producer.
pub struct WorkerNode<S: 'static, O: 'static> {
    worker: Box<dyn Worker>,
    key: String,
    receiver: WorkerReceiver,
    tombstone: bool,
    handler: OutputHandler<S, O>,
}

impl<S: 'static, O: 'static> WorkerNode<S, O> {
    /// Create a node for a freshly spawned worker.
    pub fn new(
        worker: Box<dyn Worker>,
        key: impl Into<String>,
        receiver: WorkerReceiver,
        handler: OutputHandler<S, O>,
    ) -> Self {
        Self {
            worker,
            key: key.into(),
            receiver,
            tombstone: false,
            handler,
        }
    }

    /// The descriptor this node was created with.
    pub fn worker(&self) -> &dyn Worker {
        self.worker.as_ref()
    }

    /// The registration key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// True iff this node does the same work as `other_worker` under `key`.
    ///
    /// Semantic equivalence plus key equality is the sole criterion the
    /// reconciler uses to decide reuse versus recreate. Equivalent work under
    /// a different key is a different worker.
    pub fn matches(&self, other_worker: &dyn Worker, key: &str) -> bool {
        self.worker.does_same_work_as(other_worker) && self.key == key
    }

    /// Rebind the value-to-action handler.
    ///
    /// Happens whenever an equivalent worker is re-requested with a fresh
    /// closure. The new handler must accept the same input type as the old
    /// one; a mismatch is a programming error and panics here, at rebind
    /// time, rather than at the next delivery.
    ///
    /// Rebinding a tombstoned node is allowed: deliveries have stopped, so
    /// the new handler is simply never applied.
    pub fn set_handler(&mut self, handler: OutputHandler<S, O>) {
        if !self.handler.accepts_same_input_as(&handler) {
            panic!(
                "worker {:?}: handler rebind changes input type from `{}` to `{}`",
                self.key,
                self.handler.input_name(),
                handler.input_name(),
            );
        }
        self.handler = handler;
    }

    /// Map a freshly delivered value to an action via the current handler.
    ///
    /// Panics if the value is not of the handler's input type; that can only
    /// happen through a broken run loop, never through the registration
    /// surface.
    pub fn accept_update(&self, value: Box<dyn Any>) -> Action<S, O> {
        self.handler.apply(value)
    }

    /// Poll the delivery channel without blocking.
    ///
    /// Returns `None` when nothing is ready. A channel whose producer hung up
    /// without an explicit `Done` reads as `Done`: completion without
    /// explicit signaling is normal termination, not an error.
    pub fn take_delivery(&mut self) -> Option<ValueOrDone> {
        match self.receiver.try_next() {
            Ok(Some(delivery)) => Some(delivery),
            Ok(None) => Some(ValueOrDone::Done),
            Err(_) => None,
        }
    }

    /// True once completion has been observed and delivered.
    pub fn is_tombstoned(&self) -> bool {
        self.tombstone
    }

    /// Mark completion as delivered. One-way; idempotent.
    pub fn mark_tombstoned(&mut self) {
        self.tombstone = true;
    }

    /// Close the delivery channel so the producer's next send fails.
    pub fn close(&mut self) {
        self.receiver.close();
    }
}
