//! The scheduler's priority tuple.
//!
//! `(interrupts missed, poll value, microseconds overdue)`, totally ordered
//! lexicographically on those three fields in field-declaration order so
//! the derived [`Ord`] matches spec.md's natural tuple order exactly:
//! `(3, 0, 0) > (2, 99, 99)`.

/// A waiter's readiness, expressed as a priority.
///
/// [`Priority::ZERO`] is the round-robin sentinel: it is not itself a
/// runnable priority during the priority pass (see
/// [`crate::sched::Scheduler`]), but is delivered back into round-robin
/// tasks on resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Priority {
    /// Interrupts missed since the waiter was last observed.
    pub interrupts: u32,
    /// The poll function's return value. Negative values are legal and
    /// sort lowest among ready poll results (spec.md §9 Open Questions).
    pub poll_value: i32,
    /// Microseconds past a timeout deadline. Zero unless this priority was
    /// produced by an expired `Timeout`, or by an `InterruptBlock`/`Poll`
    /// waiter's own deadline firing instead of its primary condition.
    pub overdue_us: u32,
}

impl Priority {
    /// The `(0, 0, 0)` round-robin sentinel.
    pub const ZERO: Self = Self {
        interrupts: 0,
        poll_value: 0,
        overdue_us: 0,
    };

    /// Priority produced by a fired interrupt.
    pub const fn interrupt(count: u32) -> Self {
        Self {
            interrupts: count,
            poll_value: 0,
            overdue_us: 0,
        }
    }

    /// Priority produced by a poll function returning a value.
    pub const fn polled(value: i32) -> Self {
        Self {
            interrupts: 0,
            poll_value: value,
            overdue_us: 0,
        }
    }

    /// Priority produced by an expired deadline.
    pub const fn overdue(us: u32) -> Self {
        Self {
            interrupts: 0,
            poll_value: 0,
            overdue_us: us,
        }
    }

    /// Whether this is the round-robin sentinel (invariant 4, spec.md §3).
    pub const fn is_round_robin(&self) -> bool {
        self.interrupts == 0 && self.poll_value == 0 && self.overdue_us == 0
    }
}
