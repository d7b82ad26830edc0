//! Action Queue - The single ordered path into the reducer.
//!
//! One unbounded multi-producer/single-consumer channel carries every action
//! in the order its triggering event occurred. The reducer side drains it
//! strictly in arrival order; no reordering, no order-changing batching. This
//! queue is the only synchronization point between the render side (event
//! callbacks, sinks, worker deliveries) and the reducer, which is the sole
//! mutator of state.

use futures_channel::mpsc;

use super::action::Action;

/// Create the shared action queue.
pub fn action_queue<S: 'static, O: 'static>() -> (ActionSender<S, O>, ActionReceiver<S, O>) {
    let (tx, rx) = mpsc::unbounded();
    (ActionSender { tx }, ActionReceiver { rx })
}

/// Producer half of the action queue. Cheap to clone.
pub struct ActionSender<S: 'static, O: 'static> {
    tx: mpsc::UnboundedSender<Action<S, O>>,
}

impl<S: 'static, O: 'static> ActionSender<S, O> {
    /// Append one action, preserving call order.
    ///
    /// If the reducer side is already gone the action is dropped with a
    /// warning - that only happens during shutdown, when there is no state
    /// left to transition.
    pub fn enqueue(&self, action: Action<S, O>) {
        if let Err(err) = self.tx.unbounded_send(action) {
            tracing::warn!(
                action = err.into_inner().label(),
                "action queue disconnected, dropping action"
            );
        }
    }
}

impl<S: 'static, O: 'static> Clone for ActionSender<S, O> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

/// Consumer half of the action queue.
///
/// The reducer owns this end. [`try_next_action`](Self::try_next_action)
/// supports synchronous tick-style loops and tests;
/// [`into_inner`](Self::into_inner) exposes the underlying `Stream` for
/// async run loops.
pub struct ActionReceiver<S: 'static, O: 'static> {
    rx: mpsc::UnboundedReceiver<Action<S, O>>,
}

impl<S: 'static, O: 'static> ActionReceiver<S, O> {
    /// Take the next action if one is ready.
    pub fn try_next_action(&mut self) -> Option<Action<S, O>> {
        match self.rx.try_next() {
            Ok(Some(action)) => Some(action),
            // Channel closed, or nothing ready yet
            Ok(None) | Err(_) => None,
        }
    }

    /// Drain every ready action, in arrival order.
    pub fn drain(&mut self) -> Vec<Action<S, O>> {
        let mut actions = Vec::new();
        while let Some(action) = self.try_next_action() {
            actions.push(action);
        }
        actions
    }

    /// Unwrap the underlying receiver (a `futures` `Stream`) for async loops.
    pub fn into_inner(self) -> mpsc::UnboundedReceiver<Action<S, O>> {
        self.rx
    }
}
