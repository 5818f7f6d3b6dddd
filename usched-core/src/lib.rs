//! Host-testable core of the `usched` cooperative micro-scheduler.
//!
//! This crate has no hardware dependency: timer arithmetic, the waiter
//! readiness protocol, the priority ordering, and the scheduling pass all
//! operate against the abstract [`platform::Clock`]/[`platform::IrqHandle`]
//! traits. A platform crate (see `usched`) supplies real implementations and
//! the `no_std` entry points.
//!
//! Platforms that pair this crate with a panic handler should reserve an
//! emergency exception buffer the way MicroPython's
//! `micropython.alloc_emergency_exception_buf` does, so an out-of-memory
//! panic raised from ISR context can still unwind or report. This crate
//! itself performs no allocation on any path reachable from
//! [`interrupt::InterruptTrampoline::fire`], so it places no additional
//! demand on that buffer.
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod config;
pub mod error;
pub mod interrupt;
pub mod log;
pub mod platform;
pub mod priority;
pub mod sched;
pub mod sync;
pub mod task;
pub mod timer;
pub mod waiter;

pub use config::SchedConfig;
pub use error::{SchedError, TimerError};
pub use platform::{Clock, IrqHandle};
pub use priority::Priority;
pub use sched::{Scheduler, Spawner, StopToken};
pub use task::{Resumption, Task};
pub use waiter::Waiter;
