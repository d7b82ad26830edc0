//! Render-Phase Context - The per-pass mutation surface.
//!
//! A [`RenderContext`] is what a component's render logic writes to: child
//! registrations, worker registrations, event-callback creation, and
//! action-sink creation. Exactly one context is live per pass, and it moves
//! through a one-way phase transition:
//!
//! ```text
//! Building ──freeze()──▶ Frozen
//! ```
//!
//! While building, the four registration operations are legal and sink sends
//! are not; once frozen, only sink sends are. Splitting "declare this pass's
//! tree shape" from "react to what this pass produced" into non-overlapping
//! windows is what makes the queue's ordering guarantees provable: render
//! logic can never consume its own pass's effects.
//!
//! The context does no diffing itself. Child rendering and worker
//! registration are delegated to two capability interfaces ([`Renderer`] and
//! [`WorkerRunner`]) provided by the orchestrator; the context's own job is
//! phase gating, duplicate-key detection, and funneling everything into the
//! one shared action queue.

use std::any::{Any, TypeId};
use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::dispatch::{Action, ActionSender, OutputHandler};
use crate::worker::Worker;

// =============================================================================
// Phase
// =============================================================================

/// One-way phase flag, shared with sinks issued by the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Building,
    Frozen,
}

// =============================================================================
// Capability Interfaces
// =============================================================================

/// A child's computed rendering, erased for transport through the capability
/// seam. The orchestrator knows the concrete type and downcasts.
pub type Rendering = Box<dyn Any>;

/// A child component's identity, used for matching across passes.
///
/// The registration key disambiguates siblings; this trait answers whether
/// two registrations refer to the same kind of child at all.
pub trait ChildComponent: Any {
    /// True when `other` is the same component as `self`. Defaults to
    /// comparing concrete types.
    fn same_component_as(&self, other: &dyn ChildComponent) -> bool {
        // Upcast so type_id sees the concrete type, not the trait object
        let other: &dyn Any = other;
        self.type_id() == other.type_id()
    }
}

/// Capability that computes a child's rendering.
///
/// The implementation owns the child side of reconciliation: it diffs
/// (child, key) against the previous pass internally and binds `handler` so
/// a later child output becomes an action on the shared queue.
pub trait Renderer<S: 'static, O: 'static> {
    fn render(
        &mut self,
        child: Box<dyn ChildComponent>,
        props: Box<dyn Any>,
        key: &str,
        handler: OutputHandler<S, O>,
    ) -> Rendering;
}

/// Capability that tracks running workers. Side effect only.
///
/// [`WorkerPool`](crate::worker::WorkerPool) is the standard implementation.
pub trait WorkerRunner<S: 'static, O: 'static> {
    fn running_worker(&mut self, worker: Box<dyn Worker>, key: &str, handler: OutputHandler<S, O>);
}

// =============================================================================
// Sinks
// =============================================================================

/// A standalone event callback created by [`RenderContext::on_event`].
///
/// Invoking it - any number of times, before or after the freeze - runs the
/// bound handler and enqueues the resulting action. Only *creating* one is
/// phase-gated.
pub struct EventCallback<E: 'static> {
    deliver: Rc<dyn Fn(E)>,
}

impl<E> EventCallback<E> {
    /// Deliver one event, enqueueing the handler's action.
    pub fn send(&self, event: E) {
        (self.deliver)(event)
    }
}

impl<E> Clone for EventCallback<E> {
    fn clone(&self) -> Self {
        Self {
            deliver: Rc::clone(&self.deliver),
        }
    }
}

/// Direct action sink created by [`RenderContext::make_action_sink`].
///
/// Sends are the sole mutation permitted after the freeze; a send while the
/// pass is still building panics.
pub struct ActionSink<S: 'static, O: 'static> {
    actions: ActionSender<S, O>,
    phase: Rc<Cell<Phase>>,
}

impl<S, O> ActionSink<S, O> {
    /// Enqueue one action. Panics before `freeze()`.
    pub fn send(&self, action: Action<S, O>) {
        if self.phase.get() != Phase::Frozen {
            panic!("ActionSink::send() before freeze(): sink sends are only legal once the render pass is frozen");
        }
        self.actions.enqueue(action);
    }
}

impl<S, O> Clone for ActionSink<S, O> {
    fn clone(&self) -> Self {
        Self {
            actions: self.actions.clone(),
            phase: Rc::clone(&self.phase),
        }
    }
}

// =============================================================================
// Render Context
// =============================================================================

/// The mutation surface handed to a component's render logic for one pass.
pub struct RenderContext<'pass, S: 'static, O: 'static> {
    renderer: &'pass mut dyn Renderer<S, O>,
    workers: &'pass mut dyn WorkerRunner<S, O>,
    actions: ActionSender<S, O>,
    phase: Rc<Cell<Phase>>,
    child_keys: HashSet<(TypeId, String)>,
}

impl<'pass, S, O> RenderContext<'pass, S, O> {
    /// Create the context for one pass.
    ///
    /// The orchestrator must create a fresh context per pass and keep at most
    /// one live at a time; a pass runs as an uninterrupted synchronous unit.
    pub fn new(
        renderer: &'pass mut dyn Renderer<S, O>,
        workers: &'pass mut dyn WorkerRunner<S, O>,
        actions: ActionSender<S, O>,
    ) -> Self {
        Self {
            renderer,
            workers,
            actions,
            phase: Rc::new(Cell::new(Phase::Building)),
            child_keys: HashSet::new(),
        }
    }

    /// Create a callback that maps an event to an enqueued action.
    ///
    /// The *returned* callback may be invoked at any time, including after
    /// the freeze; calling `on_event` itself is legal only while building.
    pub fn on_event<E: 'static>(
        &mut self,
        handler: impl Fn(E) -> Action<S, O> + 'static,
    ) -> EventCallback<E> {
        self.ensure_building("on_event()");
        let actions = self.actions.clone();
        EventCallback {
            deliver: Rc::new(move |event| actions.enqueue(handler(event))),
        }
    }

    /// Register a child and compute its rendering for this pass.
    ///
    /// `handler` is bound so a later output of the child becomes
    /// `handler(output)` on the action queue. Two registrations of the same
    /// child type under the same key in one pass cannot be told apart by
    /// reconciliation and panic.
    pub fn render_child<C, P, U>(
        &mut self,
        child: C,
        props: P,
        key: impl Into<String>,
        handler: impl Fn(U) -> Action<S, O> + 'static,
    ) -> Rendering
    where
        C: ChildComponent,
        P: 'static,
        U: 'static,
    {
        self.ensure_building("render_child()");
        let key = key.into();
        if !self.child_keys.insert((TypeId::of::<C>(), key.clone())) {
            panic!(
                "duplicate child registration in one render pass: {} with key {key:?}; \
                 give siblings of the same type distinct keys",
                std::any::type_name::<C>(),
            );
        }
        self.renderer
            .render(Box::new(child), Box::new(props), &key, OutputHandler::new(handler))
    }

    /// Register a worker that should be running as of this pass.
    ///
    /// Delegates to the [`WorkerRunner`], which reuses an equivalent running
    /// worker (rebinding its handler to this pass's closure) or spawns a new
    /// one. Duplicate detection for workers lives in the runner, where
    /// semantic equivalence is known.
    pub fn running_worker<W, U>(
        &mut self,
        worker: W,
        key: impl Into<String>,
        handler: impl Fn(U) -> Action<S, O> + 'static,
    ) where
        W: Worker,
        U: 'static,
    {
        self.ensure_building("running_worker()");
        let key = key.into();
        self.workers
            .running_worker(Box::new(worker), &key, OutputHandler::new(handler));
    }

    /// Create a sink for direct action sends after the freeze.
    pub fn make_action_sink(&mut self) -> ActionSink<S, O> {
        self.ensure_building("make_action_sink()");
        ActionSink {
            actions: self.actions.clone(),
            phase: Rc::clone(&self.phase),
        }
    }

    /// Create a callback that turns an event into an output-only action.
    ///
    /// The enqueued action leaves state untouched and just surfaces
    /// `to_output(event)` to the parent.
    pub fn make_event_sink<E: 'static>(
        &mut self,
        to_output: impl Fn(E) -> O + 'static,
    ) -> EventCallback<E> {
        self.ensure_building("make_event_sink()");
        let actions = self.actions.clone();
        EventCallback {
            deliver: Rc::new(move |event| actions.enqueue(Action::set_output(to_output(event)))),
        }
    }

    /// End the registration window. One-way; a second call panics.
    pub fn freeze(&mut self) {
        self.ensure_building("freeze()");
        self.phase.set(Phase::Frozen);
    }

    /// True once the pass has been frozen.
    pub fn is_frozen(&self) -> bool {
        self.phase.get() == Phase::Frozen
    }

    fn ensure_building(&self, operation: &str) {
        if self.phase.get() == Phase::Frozen {
            panic!("render context is frozen: {operation} is only legal while the pass is rendering");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::dispatch::{action_queue, ActionReceiver};

    type State = String;
    type Output = String;

    // -------------------------------------------------------------------------
    // Test capabilities
    // -------------------------------------------------------------------------

    /// Renderer that records the registration and returns it as the rendering.
    struct TestRenderer;

    struct RecordedRender {
        child: Box<dyn ChildComponent>,
        props: Box<dyn Any>,
        key: String,
        handler: OutputHandler<State, Output>,
    }

    impl Renderer<State, Output> for TestRenderer {
        fn render(
            &mut self,
            child: Box<dyn ChildComponent>,
            props: Box<dyn Any>,
            key: &str,
            handler: OutputHandler<State, Output>,
        ) -> Rendering {
            Box::new(RecordedRender {
                child,
                props,
                key: key.to_string(),
                handler,
            })
        }
    }

    /// Runner that records registration keys.
    #[derive(Default)]
    struct RecordingRunner {
        keys: RefCell<Vec<String>>,
    }

    impl WorkerRunner<State, Output> for RecordingRunner {
        fn running_worker(
            &mut self,
            _worker: Box<dyn Worker>,
            key: &str,
            _handler: OutputHandler<State, Output>,
        ) {
            self.keys.borrow_mut().push(key.to_string());
        }
    }

    /// Capabilities that must never be reached.
    struct PoisonRenderer;

    impl Renderer<State, Output> for PoisonRenderer {
        fn render(
            &mut self,
            _child: Box<dyn ChildComponent>,
            _props: Box<dyn Any>,
            _key: &str,
            _handler: OutputHandler<State, Output>,
        ) -> Rendering {
            panic!("render must not be called in this test")
        }
    }

    struct PoisonRunner;

    impl WorkerRunner<State, Output> for PoisonRunner {
        fn running_worker(
            &mut self,
            _worker: Box<dyn Worker>,
            _key: &str,
            _handler: OutputHandler<State, Output>,
        ) {
            panic!("running_worker must not be called in this test")
        }
    }

    struct TestChild;
    impl ChildComponent for TestChild {}

    struct OtherChild;
    impl ChildComponent for OtherChild {}

    struct TestWorker;
    impl Worker for TestWorker {
        fn does_same_work_as(&self, other: &dyn Worker) -> bool {
            let other: &dyn Any = other;
            other.downcast_ref::<TestWorker>().is_some()
        }
    }

    fn labels(rx: &mut ActionReceiver<State, Output>) -> Vec<String> {
        rx.drain().iter().map(|a| a.label().to_string()).collect()
    }

    // -------------------------------------------------------------------------
    // Event callbacks
    // -------------------------------------------------------------------------

    #[test]
    fn test_on_event_enqueues_on_invoke() {
        let (tx, mut rx) = action_queue::<State, Output>();
        let (mut renderer, mut runner) = (PoisonRenderer, PoisonRunner);
        let mut context = RenderContext::new(&mut renderer, &mut runner, tx);

        let callback = context.on_event(|event: String| {
            Action::new("append", move |state: &mut String| {
                state.push_str(&event);
                None
            })
        });
        assert!(rx.try_next_action().is_none(), "creating the callback enqueues nothing");

        callback.send("!".to_string());

        let action = rx.try_next_action().expect("invocation enqueues the handler's action");
        let mut state = "state".to_string();
        assert_eq!(action.apply(&mut state), None);
        assert_eq!(state, "state!");
    }

    #[test]
    fn test_on_event_allows_multiple_invocations() {
        let (tx, mut rx) = action_queue::<State, Output>();
        let (mut renderer, mut runner) = (PoisonRenderer, PoisonRunner);
        let mut context = RenderContext::new(&mut renderer, &mut runner, tx);

        let callback = context.on_event(|n: i32| Action::new(format!("event{n}"), |_| None));

        callback.send(1);
        callback.send(2);
        context.freeze();
        // Invocation stays legal after the freeze; only creation is gated
        callback.send(3);

        assert_eq!(labels(&mut rx), vec!["event1", "event2", "event3"]);
    }

    #[test]
    #[should_panic(expected = "render context is frozen")]
    fn test_on_event_after_freeze_panics() {
        let (tx, _rx) = action_queue::<State, Output>();
        let (mut renderer, mut runner) = (PoisonRenderer, PoisonRunner);
        let mut context = RenderContext::new(&mut renderer, &mut runner, tx);

        context.freeze();
        let _ = context.on_event(|_: i32| Action::noop());
    }

    // -------------------------------------------------------------------------
    // Child rendering
    // -------------------------------------------------------------------------

    #[test]
    fn test_render_child_passes_registration_to_renderer() {
        let (tx, _rx) = action_queue::<State, Output>();
        let (mut renderer, mut runner) = (TestRenderer, PoisonRunner);
        let mut context = RenderContext::new(&mut renderer, &mut runner, tx);

        let rendering = context.render_child(TestChild, "props", "key", |output: String| {
            Action::new("child_output", move |_state: &mut String| {
                Some(format!("output:{output}"))
            })
        });

        let recorded = rendering.downcast::<RecordedRender>().expect("renderer's value passes through");
        assert!(recorded.child.same_component_as(&TestChild));
        assert_eq!(recorded.props.downcast_ref::<&str>(), Some(&"props"));
        assert_eq!(recorded.key, "key");

        // The bound handler maps a child output onto the action queue's terms
        let action = recorded.handler.apply(Box::new("output".to_string()));
        let mut state = "state".to_string();
        let output = action.apply(&mut state);
        assert_eq!(state, "state");
        assert_eq!(output, Some("output:output".to_string()));
    }

    #[test]
    #[should_panic(expected = "duplicate child registration")]
    fn test_duplicate_child_key_panics() {
        let (tx, _rx) = action_queue::<State, Output>();
        let (mut renderer, mut runner) = (TestRenderer, PoisonRunner);
        let mut context = RenderContext::new(&mut renderer, &mut runner, tx);

        let _ = context.render_child(TestChild, (), "dup", |_: ()| Action::noop());
        let _ = context.render_child(TestChild, (), "dup", |_: ()| Action::noop());
    }

    #[test]
    fn test_same_key_for_different_child_types_is_allowed() {
        let (tx, _rx) = action_queue::<State, Output>();
        let (mut renderer, mut runner) = (TestRenderer, PoisonRunner);
        let mut context = RenderContext::new(&mut renderer, &mut runner, tx);

        let _ = context.render_child(TestChild, (), "key", |_: ()| Action::noop());
        let _ = context.render_child(OtherChild, (), "key", |_: ()| Action::noop());
    }

    #[test]
    #[should_panic(expected = "render context is frozen")]
    fn test_render_child_after_freeze_panics() {
        let (tx, _rx) = action_queue::<State, Output>();
        let (mut renderer, mut runner) = (TestRenderer, PoisonRunner);
        let mut context = RenderContext::new(&mut renderer, &mut runner, tx);

        context.freeze();
        let _ = context.render_child(TestChild, (), "key", |_: ()| Action::noop());
    }

    // -------------------------------------------------------------------------
    // Worker registration
    // -------------------------------------------------------------------------

    #[test]
    fn test_running_worker_delegates_to_runner() {
        let (tx, _rx) = action_queue::<State, Output>();
        let (mut renderer, mut runner) = (PoisonRenderer, RecordingRunner::default());
        {
            let mut context = RenderContext::new(&mut renderer, &mut runner, tx);
            context.running_worker(TestWorker, "w1", |_: i32| Action::noop());
            context.running_worker(TestWorker, "w2", |_: i32| Action::noop());
        }

        assert_eq!(*runner.keys.borrow(), vec!["w1", "w2"]);
    }

    #[test]
    #[should_panic(expected = "render context is frozen")]
    fn test_running_worker_after_freeze_panics() {
        let (tx, _rx) = action_queue::<State, Output>();
        let (mut renderer, mut runner) = (PoisonRenderer, PoisonRunner);
        let mut context = RenderContext::new(&mut renderer, &mut runner, tx);

        context.freeze();
        context.running_worker(TestWorker, "key", |_: i32| Action::noop());
    }

    // -------------------------------------------------------------------------
    // Sinks and the freeze
    // -------------------------------------------------------------------------

    #[test]
    fn test_event_then_freeze_then_sink_send_preserves_order() {
        let (tx, mut rx) = action_queue::<State, Output>();
        let (mut renderer, mut runner) = (PoisonRenderer, PoisonRunner);
        let mut context = RenderContext::new(&mut renderer, &mut runner, tx);

        let callback = context.on_event(|_: ()| Action::new("a1", |_| None));
        callback.send(());
        assert_eq!(labels(&mut rx), vec!["a1"]);

        context.freeze();
        let sink = context.make_action_sink();
        sink.send(Action::new("a2", |_| None));

        assert_eq!(labels(&mut rx), vec!["a2"]);
    }

    #[test]
    fn test_action_sink_sends_in_call_order() {
        let (tx, mut rx) = action_queue::<State, Output>();
        let (mut renderer, mut runner) = (PoisonRenderer, PoisonRunner);
        let mut context = RenderContext::new(&mut renderer, &mut runner, tx);

        let sink = context.make_action_sink();
        context.freeze();

        sink.send(Action::new("first", |_| None));
        sink.send(Action::new("second", |_| None));

        assert_eq!(labels(&mut rx), vec!["first", "second"]);
    }

    #[test]
    #[should_panic(expected = "before freeze()")]
    fn test_action_sink_send_before_freeze_panics() {
        let (tx, _rx) = action_queue::<State, Output>();
        let (mut renderer, mut runner) = (PoisonRenderer, PoisonRunner);
        let mut context = RenderContext::new(&mut renderer, &mut runner, tx);

        let sink = context.make_action_sink();
        sink.send(Action::noop());
    }

    #[test]
    #[should_panic(expected = "render context is frozen")]
    fn test_make_action_sink_after_freeze_panics() {
        let (tx, _rx) = action_queue::<State, Output>();
        let (mut renderer, mut runner) = (PoisonRenderer, PoisonRunner);
        let mut context = RenderContext::new(&mut renderer, &mut runner, tx);

        context.freeze();
        let _ = context.make_action_sink();
    }

    #[test]
    fn test_make_event_sink_sets_output_only() {
        let (tx, mut rx) = action_queue::<State, Output>();
        let (mut renderer, mut runner) = (PoisonRenderer, PoisonRunner);
        let mut context = RenderContext::new(&mut renderer, &mut runner, tx);

        let sink = context.make_event_sink(|event: String| event);
        context.freeze();

        sink.send("foo".to_string());

        let action = rx.try_next_action().expect("event sink enqueues");
        let mut state = "state".to_string();
        let output = action.apply(&mut state);
        assert_eq!(state, "state", "event sink must leave state untouched");
        assert_eq!(output, Some("foo".to_string()));
    }

    #[test]
    #[should_panic(expected = "render context is frozen")]
    fn test_freeze_twice_panics() {
        let (tx, _rx) = action_queue::<State, Output>();
        let (mut renderer, mut runner) = (PoisonRenderer, PoisonRunner);
        let mut context = RenderContext::new(&mut renderer, &mut runner, tx);

        context.freeze();
        context.freeze();
    }

    #[test]
    fn test_is_frozen_reflects_phase() {
        let (tx, _rx) = action_queue::<State, Output>();
        let (mut renderer, mut runner) = (PoisonRenderer, PoisonRunner);
        let mut context = RenderContext::new(&mut renderer, &mut runner, tx);

        assert!(!context.is_frozen());
        context.freeze();
        assert!(context.is_frozen());
    }
}
