//! The long-delay helper (spec.md §4.5).
//!
//! `MAX_INTERVAL` bounds any single `Timeout` waiter to about 536 seconds.
//! `LongDelay` composes as many `Timeout` segments as needed to cover an
//! arbitrarily long wait. There is no stackful coroutine to delegate to
//! here, so a task embeds a `LongDelay` as part of its own state and drives
//! it by hand on each resume — the same pattern the teacher uses for a
//! hand-written `Future` that polls a nested one.
//!
//! ```ignore
//! enum MyTask {
//!     Waiting(LongDelay),
//!     Done,
//! }
//!
//! impl Task for MyTask {
//!     fn resume(&mut self, _priority: Priority) -> Resumption {
//!         match self {
//!             Self::Waiting(delay) => match delay.next_waiter() {
//!                 Some(w) => Resumption::Yield(w),
//!                 None => {
//!                     *self = Self::Done;
//!                     Resumption::Yield(Waiter::RoundRobin)
//!                 }
//!             },
//!             Self::Done => Resumption::Done,
//!         }
//!     }
//! }
//! ```

use usched_core::timer::{self, MAX_INTERVAL};
use usched_core::waiter::Waiter;

/// Composes a wait of `total_us` microseconds out of `Timeout` segments each
/// no longer than [`MAX_INTERVAL`].
pub struct LongDelay {
    remaining_us: u32,
}

impl LongDelay {
    /// Builds a delay of `total_us` microseconds.
    pub const fn from_micros(total_us: u32) -> Self {
        Self {
            remaining_us: total_us,
        }
    }

    /// Builds a delay of `seconds` whole seconds.
    pub const fn from_seconds(seconds: u32) -> Self {
        Self::from_micros(timer::seconds(seconds))
    }

    /// Whether the full duration has already elapsed (no more segments to
    /// yield).
    pub const fn is_done(&self) -> bool {
        self.remaining_us == 0
    }

    /// Produces the next `Timeout` waiter to yield, or `None` once the
    /// requested duration has been fully covered.
    ///
    /// Each call accounts one segment's worth of `remaining_us` up front;
    /// the caller is expected to yield the returned waiter and call this
    /// again only after that waiter reports ready.
    pub fn next_waiter(&mut self) -> Option<Waiter> {
        if self.remaining_us == 0 {
            return None;
        }
        let segment = self.remaining_us.min(MAX_INTERVAL);
        self.remaining_us -= segment;
        Some(Waiter::timeout(segment).expect("segment is bounded by MAX_INTERVAL"))
    }
}
