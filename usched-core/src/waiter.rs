//! The `Waiter` readiness protocol (spec.md §4.2).
//!
//! A `Waiter` is a tagged variant describing why a task is parked. The
//! scheduler's only interaction with it is [`Waiter::readiness`]: a poll
//! that returns `None` ("still waiting") or a [`Priority`] tuple.

use alloc::boxed::Box;

use crate::interrupt::InterruptCell;
use crate::priority::Priority;
use crate::timer;

/// A deadline shared by the three timed waiter kinds.
///
/// A task has no direct clock access (spec.md §9 — tasks only ever see
/// priority tuples, never raw counter values), so a `Deadline` is built
/// [`Deadline::pending`] with just a duration and is *armed* — `target`
/// stamped relative to the actual moment of yield — by the scheduler the
/// instant it receives the waiter (see [`crate::sched::Scheduler`]). This
/// also covers invariant 5: re-yielding the same waiter re-arms it exactly
/// the same way a fresh one would be armed, so "refresh on reuse" and
/// "stamp on first yield" are the same code path.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    duration_us: u32,
    target: Option<u32>,
}

impl Deadline {
    /// Validates `duration_us` and builds an unarmed deadline.
    pub fn pending(duration_us: u32) -> Result<Self, crate::error::TimerError> {
        if duration_us > timer::MAX_INTERVAL {
            return Err(crate::error::TimerError {
                requested_us: duration_us,
            });
        }
        Ok(Self {
            duration_us,
            target: None,
        })
    }

    /// Builds a deadline already armed relative to `now`. A convenience for
    /// callers (tests, platform code) that already have a clock reading in
    /// hand; tasks themselves use [`Deadline::pending`].
    pub fn new(now: u32, duration_us: u32) -> Result<Self, crate::error::TimerError> {
        let mut d = Self::pending(duration_us)?;
        d.refresh(now);
        Ok(d)
    }

    /// (Re)stamps `target` relative to `now`, keeping the stored duration.
    pub fn refresh(&mut self, now: u32) {
        // `duration_us` was already validated at construction, so this
        // cannot fail.
        self.target = Some(
            timer::micros_when(now, self.duration_us).expect("duration validated at construction"),
        );
    }

    /// Microseconds overdue, or `0` if not yet due (or not yet armed).
    pub fn overdue(&self, now: u32) -> u32 {
        match self.target {
            Some(target) => timer::after(now, target),
            None => 0,
        }
    }
}

/// A function polled every scheduling pass for a non-interrupt, non-timeout
/// condition. Must return quickly and be idempotent when not ready
/// (spec.md §4.4).
pub type PollFn = Box<dyn FnMut() -> Option<i32> + Send>;

/// Why a task is parked, and what would make it ready again.
pub enum Waiter {
    /// Ready every pass, at the lowest priority.
    RoundRobin,
    /// Ready once `deadline` has passed.
    Timeout(Deadline),
    /// Ready when its bound interrupt has fired, or (optionally) when a
    /// deadline passes first.
    InterruptBlock {
        /// Shared ISR/scheduler handoff cell.
        cell: InterruptCell,
        /// Handle used to mask the originating interrupt during the
        /// read-reset critical section.
        irq: Box<dyn crate::platform::IrqHandle>,
        /// Optional timeout; `None` means "wait forever".
        deadline: Option<Deadline>,
    },
    /// Ready when `poll_fn` returns `Some`, or (optionally) when a deadline
    /// passes first.
    Poll {
        /// The user-supplied poll function.
        poll_fn: PollFn,
        /// Optional timeout; `None` means "wait forever".
        deadline: Option<Deadline>,
    },
}

impl Waiter {
    /// Constructs a `Timeout` waiter for `duration_us` microseconds. The
    /// deadline is armed by the scheduler at the moment this waiter is
    /// yielded, not at construction (see [`Deadline`]).
    pub fn timeout(duration_us: u32) -> Result<Self, crate::error::TimerError> {
        Ok(Self::Timeout(Deadline::pending(duration_us)?))
    }

    /// Evaluates readiness against the current counter value.
    ///
    /// Returns `None` if still waiting, otherwise the priority tuple to
    /// deliver to the task on resume.
    pub fn readiness(&mut self, now: u32) -> Option<Priority> {
        match self {
            Self::RoundRobin => Some(Priority::ZERO),
            Self::Timeout(deadline) => {
                let overdue = deadline.overdue(now);
                if overdue > 0 {
                    Some(Priority::overdue(overdue))
                } else {
                    None
                }
            }
            Self::InterruptBlock {
                cell,
                irq,
                deadline,
            } => {
                // The only critical section in the core (spec.md §4.2):
                // mask this waiter's own interrupt, read-and-reset the
                // count, unmask. Narrower than a global interrupt mask
                // because the external interface is per-pin (see
                // crate::interrupt module docs).
                irq.disable();
                let missed = cell.take_count();
                irq.enable();

                if missed > 0 {
                    return Some(Priority::interrupt(missed));
                }
                match deadline {
                    Some(d) => {
                        let overdue = d.overdue(now);
                        (overdue > 0).then(|| Priority::overdue(overdue))
                    }
                    None => None,
                }
            }
            Self::Poll { poll_fn, deadline } => {
                if let Some(value) = poll_fn() {
                    return Some(Priority::polled(value));
                }
                match deadline {
                    Some(d) => {
                        let overdue = d.overdue(now);
                        (overdue > 0).then(|| Priority::overdue(overdue))
                    }
                    None => None,
                }
            }
        }
    }

    /// Arms/re-arms this waiter's deadline(s) relative to `now`. Called by
    /// the scheduler every time it receives a yielded waiter, whether newly
    /// constructed or re-yielded unchanged (spec.md §9 "deadline refresh on
    /// waiter reuse").
    pub fn refresh(&mut self, now: u32) {
        match self {
            Self::RoundRobin => {}
            Self::Timeout(deadline) => deadline.refresh(now),
            Self::InterruptBlock { deadline, .. } | Self::Poll { deadline, .. } => {
                if let Some(d) = deadline {
                    d.refresh(now);
                }
            }
        }
    }
}
