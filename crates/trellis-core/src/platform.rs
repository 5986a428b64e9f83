//! Platform abstraction for runtime scheduling.
//!
//! Trellis renders synchronously whenever state changes outside of a pass, so
//! the host platform is only asked for help with work that completes on its
//! own schedule: asynchronous resources. When a resource future is woken the
//! runtime calls [`RuntimeScheduler::schedule_frame`], and the host is expected
//! to call [`crate::Root::run_until_stalled`] from its event loop soon after.

/// Schedules work for the Trellis runtime.
///
/// Implementations must be safe to use from multiple threads because wakers
/// handed to resource futures may be invoked from anywhere.
pub trait RuntimeScheduler: Send + Sync {
    /// Request that the host drive the runtime again.
    fn schedule_frame(&self);
}

/// Scheduler that ignores frame requests. Suitable for tests and hosts that
/// poll resources on their own cadence.
#[derive(Debug, Default)]
pub struct DefaultScheduler;

impl RuntimeScheduler for DefaultScheduler {
    fn schedule_frame(&self) {}
}
