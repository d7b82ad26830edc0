//! Worker Channels - Per-node delivery streams.
//!
//! Each worker lifecycle node owns the receiving end of one single-producer
//! channel. The producer emits values as they become available and signals
//! completion with an explicit [`ValueOrDone::Done`], exactly once. A
//! producer that just hangs up instead is treated as having completed (see
//! [`WorkerNode::take_delivery`](super::WorkerNode::take_delivery)).
//!
//! The sender is handed to the external scheduler when the worker is
//! spawned; sends fail with [`WorkerChannelClosed`] after teardown, which is
//! the producer's signal to stop.

use std::any::Any;

use futures_channel::mpsc;
use thiserror::Error;

/// One item on a worker channel: a produced value, or the terminal signal.
pub enum ValueOrDone {
    /// A produced value, erased for storage in homogeneous nodes.
    Value(Box<dyn Any>),
    /// Terminal completion signal. Sent at most once per worker.
    Done,
}

impl ValueOrDone {
    /// Wrap a produced value.
    pub fn value<T: 'static>(value: T) -> Self {
        Self::Value(Box::new(value))
    }
}

/// The producer tried to deliver into a channel that was already torn down.
///
/// Recoverable from the producer's point of view: it should simply stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("worker channel closed")]
pub struct WorkerChannelClosed;

/// Receiving end of a worker channel, owned by the lifecycle node.
pub type WorkerReceiver = mpsc::UnboundedReceiver<ValueOrDone>;

/// Create a worker delivery channel.
pub fn worker_channel() -> (WorkerSender, WorkerReceiver) {
    let (tx, rx) = mpsc::unbounded();
    (WorkerSender { tx }, rx)
}

/// Producer half of a worker channel.
#[derive(Clone)]
pub struct WorkerSender {
    tx: mpsc::UnboundedSender<ValueOrDone>,
}

impl WorkerSender {
    /// Deliver one value.
    pub fn send<T: 'static>(&self, value: T) -> Result<(), WorkerChannelClosed> {
        self.tx
            .unbounded_send(ValueOrDone::value(value))
            .map_err(|_| WorkerChannelClosed)
    }

    /// Signal completion. Call at most once, after the last value.
    pub fn finish(&self) -> Result<(), WorkerChannelClosed> {
        self.tx
            .unbounded_send(ValueOrDone::Done)
            .map_err(|_| WorkerChannelClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_then_finish() {
        let (tx, mut rx) = worker_channel();

        tx.send("value").unwrap();
        tx.finish().unwrap();

        assert!(matches!(rx.try_next(), Ok(Some(ValueOrDone::Value(_)))));
        assert!(matches!(rx.try_next(), Ok(Some(ValueOrDone::Done))));
    }

    #[test]
    fn test_send_after_close_errors() {
        let (tx, mut rx) = worker_channel();
        rx.close();

        assert_eq!(tx.send(1), Err(WorkerChannelClosed));
        assert_eq!(tx.finish(), Err(WorkerChannelClosed));
    }
}
