//! Cooperative micro-scheduler for resource-constrained boards.
//!
//! This crate is a thin, platform-facing shell around
//! [`usched_core`]: it re-exports the scheduler, task, waiter, and
//! platform types a target program needs, and adds [`wait`] — the
//! long-delay helper for waits beyond the hardware timer's comparable
//! range.
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]

pub mod wait;

pub use usched_core::config::{self, SchedConfig};
pub use usched_core::error::{SchedError, TimerError};
pub use usched_core::interrupt::{InterruptCell, InterruptTrampoline};
pub use usched_core::log::{self, LogLevel};
pub use usched_core::platform::{Clock, IrqHandle};
pub use usched_core::priority::Priority;
pub use usched_core::sched::{Scheduler, Spawner, StopToken};
pub use usched_core::task::{Resumption, Task};
pub use usched_core::timer;
pub use usched_core::waiter::{Deadline, PollFn, Waiter};
pub use usched_core::{sdebug, serr, sinfo, slog, strace, swarn};
pub use wait::LongDelay;
