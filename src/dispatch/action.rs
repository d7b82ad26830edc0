//! Actions - Queued state transitions.
//!
//! An [`Action`] is the only unit the reducer ever applies: a one-shot
//! transition over a mutable state reference that may additionally yield an
//! output value for the enclosing component. Everything the runtime observes
//! (events, child outputs, worker deliveries, direct sink sends) becomes an
//! action on the shared queue before it touches state.

use std::borrow::Cow;
use std::fmt;

/// A one-shot state transition, optionally producing an output.
///
/// Actions carry a label purely for logs and test output; two actions with
/// the same label are still distinct transitions.
pub struct Action<S: 'static, O: 'static> {
    label: Cow<'static, str>,
    apply: Box<dyn FnOnce(&mut S) -> Option<O>>,
}

impl<S: 'static, O: 'static> Action<S, O> {
    /// Create an action from a transition closure.
    pub fn new(
        label: impl Into<Cow<'static, str>>,
        apply: impl FnOnce(&mut S) -> Option<O> + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            apply: Box::new(apply),
        }
    }

    /// An action that changes nothing and yields no output.
    pub fn noop() -> Self {
        Self::new("noop", |_| None)
    }

    /// An action that leaves state untouched and only yields `output`.
    ///
    /// This is the event-sink adapter: an event becomes an output for the
    /// parent without any local state transition.
    pub fn set_output(output: O) -> Self {
        Self::new("set_output", move |_| Some(output))
    }

    /// Apply the transition. Consumes the action.
    pub fn apply(self, state: &mut S) -> Option<O> {
        (self.apply)(state)
    }

    /// The action's label.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<S: 'static, O: 'static> fmt::Debug for Action<S, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Action").field(&self.label).finish()
    }
}
