//! The task contract (spec.md §9 Design Notes).
//!
//! The MicroPython reference uses generators: a thread `yield`s a `Waitfor`
//! object and receives a priority tuple via `send`. Stable Rust has no
//! stackful generators, and the protocol needs to pass a value in *and* get
//! a value out of the same suspension point — something `Future::poll`
//! cannot do in a single call (a `Waker` carries no payload). So a task is
//! instead an explicit resumable state machine: implementors write their
//! own enum of resumption points and drive it by hand, the same way the
//! teacher's async tasks are hand-written `Future` state machines, just
//! without `async`/`await` sugar to generate the state machine for us.

use crate::priority::Priority;
use crate::waiter::Waiter;

/// What a task produced when resumed.
pub enum Resumption {
    /// The task suspended again, yielding a new waiter.
    Yield(Waiter),
    /// The task ran to completion and will not be resumed again.
    Done,
}

/// A resumable, single-threaded unit of work.
///
/// Owned exclusively by the scheduler between resumes. A task must yield a
/// [`Waiter`] on its very first resume (the scheduler drives it once with
/// [`Priority::ZERO`] as a sentinel to obtain that first waiter) — a task
/// that returns [`Resumption::Done`] on that first call is a startup
/// failure (spec.md §7 `TaskStartupError`) and is logged and discarded
/// rather than scheduled.
pub trait Task: Send {
    /// Resumes the task, delivering the priority tuple its last-yielded
    /// waiter was ready with (or [`Priority::ZERO`] as the first-resume
    /// sentinel).
    fn resume(&mut self, priority: Priority) -> Resumption;
}
