//! Worker Descriptors - Semantic equivalence across passes.
//!
//! A worker descriptor names one running background producer. Render logic
//! constructs a fresh descriptor every pass, so the runtime can never rely on
//! reference identity or structural equality to recognize "the same work"; it
//! asks the descriptor itself via [`Worker::does_same_work_as`].
//!
//! Two independently constructed descriptors for the same outstanding job
//! (say, the same network call) must report equivalence, otherwise the job is
//! cancelled and restarted on every pass.

use std::any::Any;

/// A descriptor for one externally scheduled background producer.
///
/// The `Any` supertrait lets implementations downcast `other` to their own
/// concrete type:
///
/// ```
/// use std::any::Any;
/// use spark_flow::worker::Worker;
///
/// struct Fetch {
///     url: String,
/// }
///
/// impl Worker for Fetch {
///     fn does_same_work_as(&self, other: &dyn Worker) -> bool {
///         let other: &dyn Any = other;
///         other
///             .downcast_ref::<Fetch>()
///             .is_some_and(|other| other.url == self.url)
///     }
/// }
/// ```
pub trait Worker: Any {
    /// True when `other` describes the same ongoing work as `self`.
    ///
    /// This is the sole reuse-vs-recreate criterion (together with the
    /// registration key). A descriptor of a different concrete type never
    /// does the same work.
    fn does_same_work_as(&self, other: &dyn Worker) -> bool;
}
