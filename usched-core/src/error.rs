//! Error taxonomy for the scheduler.
//!
//! Hand-rolled rather than built on `thiserror`/`anyhow`: the crate is
//! `no_std`, and the teacher's own `no_std` crates carry the same kind of
//! plain enum with a manual [`core::fmt::Display`] impl rather than a
//! proc-macro error derive.

use core::fmt;

/// A requested delay exceeded [`crate::timer::MAX_INTERVAL`].
///
/// Raised synchronously at waiter construction — callers fix the call site
/// by splitting the delay across multiple yields (see `usched::wait`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerError {
    /// The delay, in microseconds, that was rejected.
    pub requested_us: u32,
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "requested delay of {} us exceeds MAX_INTERVAL ({} us)",
            self.requested_us,
            crate::timer::MAX_INTERVAL
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TimerError {}

/// Top-level scheduler error.
///
/// `TaskStartupError` and `TaskFault` (spec.md §7) are not represented here:
/// both are logged-and-discarded conditions handled entirely inside
/// [`crate::sched::Scheduler`], never surfaced to the caller, matching the
/// reference scheduler's "no retries, no propagation" policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedError {
    /// A waiter was constructed with a delay that could not be represented.
    Timer(TimerError),
    /// A panic escaped the scheduler's own pass loop rather than a single
    /// task's `resume` (a faulty [`crate::platform::Clock`] impl, an
    /// allocation failure, and similar) — caught at the outermost
    /// scheduler boundary by [`crate::sched::Scheduler::try_run`] and
    /// reported instead of propagated. Only produced by that `std`-gated
    /// entry point; a `no_std` deployment has no unwinding to catch this
    /// with, so it only has [`crate::sched::Scheduler::run`].
    HostInterrupt,
}

impl fmt::Display for SchedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timer(e) => write!(f, "{e}"),
            Self::HostInterrupt => write!(f, "scheduler run loop interrupted by host"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SchedError {}

impl From<TimerError> for SchedError {
    fn from(e: TimerError) -> Self {
        Self::Timer(e)
    }
}
