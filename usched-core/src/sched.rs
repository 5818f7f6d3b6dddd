//! The scheduler core (spec.md §4.1).
//!
//! Owns a list of `(task, waiter)` slots and repeatedly: purges dead slots,
//! partitions the alive ones into priority-ready and round-robin-ready,
//! drains the priority list highest-first, then interleaves one
//! round-robin resume with a full priority re-poll until the round-robin
//! list drains for this pass. [`Scheduler::run`] drives this to completion;
//! [`Scheduler::tick`] runs a single pass for callers embedding the
//! scheduler in their own loop.

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicBool, Ordering};

use crate::config::SchedConfig;
use crate::platform::Clock;
use crate::priority::Priority;
use crate::sync::SpinLock;
use crate::task::{Resumption, Task};
use crate::waiter::Waiter;
use crate::{sdebug, sinfo, swarn};

#[cfg(feature = "std")]
use crate::error::SchedError;
#[cfg(feature = "std")]
use crate::serr;

struct Slot {
    task: Box<dyn Task>,
    waiter: Waiter,
}

/// Drives a task's `resume`, converting a panic into termination under the
/// `std` feature (spec.md §4.1 "task exceptions/panics ... treated as
/// normal termination"). A plain `no_std` build has no unwinding to catch;
/// a panicking task there aborts the whole program, same as any other
/// `panic = "abort"` crate.
#[cfg(feature = "std")]
fn drive(task: &mut dyn Task, priority: Priority) -> Resumption {
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| task.resume(priority))) {
        Ok(resumption) => resumption,
        Err(_) => {
            serr!("task panicked during resume; treating as termination");
            Resumption::Done
        }
    }
}

#[cfg(not(feature = "std"))]
fn drive(task: &mut dyn Task, priority: Priority) -> Resumption {
    task.resume(priority)
}

/// The cooperative scheduler. Generic over the platform [`Clock`] so the
/// core can be driven by a fake clock in tests and a real timer peripheral
/// on target.
pub struct Scheduler<C: Clock> {
    clock: C,
    slots: Vec<Option<Slot>>,
    stop_requested: Arc<AtomicBool>,
    pending: Arc<SpinLock<Vec<Box<dyn Task>>>>,
    config: SchedConfig,
}

/// A cloneable handle letting a running task request termination of the
/// whole scheduler (spec.md §8 scenario 1's "a fourth task ... calls
/// `stop`" — a task has no direct reference to its own `Scheduler`, so it
/// requests a stop through this handle instead).
#[derive(Clone)]
pub struct StopToken {
    stop_requested: Arc<AtomicBool>,
}

impl StopToken {
    /// Requests termination; takes effect the same way
    /// [`Scheduler::stop`] does.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
    }
}

/// A cloneable handle letting a running task register a new one.
///
/// Spawned tasks are queued, not driven immediately — a task holding a
/// `Spawner` has no clock reading to stamp a first waiter with, so the
/// queue is drained and each task driven at the top of the scheduler's next
/// pass (spec.md §9 "sub-task" pattern, analogous to the teacher
/// executor's deferred `spawn`).
#[derive(Clone)]
pub struct Spawner {
    pending: Arc<SpinLock<Vec<Box<dyn Task>>>>,
}

impl Spawner {
    /// Queues `task` for registration on the next pass.
    pub fn spawn(&self, task: Box<dyn Task>) {
        self.pending.lock().push(task);
    }
}

impl<C: Clock> Scheduler<C> {
    /// Creates an empty scheduler driven by `clock`, using
    /// [`SchedConfig::default`].
    pub fn new(clock: C) -> Self {
        Self::with_config(clock, SchedConfig::default())
    }

    /// Creates an empty scheduler driven by `clock`, with `config`
    /// governing the slot list's reserved capacity and whether
    /// [`Scheduler::add_thread`] warns on a task that fails to start.
    pub fn with_config(clock: C, config: SchedConfig) -> Self {
        Self {
            clock,
            slots: Vec::with_capacity(config.capacity_hint),
            stop_requested: Arc::new(AtomicBool::new(false)),
            pending: Arc::new(SpinLock::new(Vec::new())),
            config,
        }
    }

    /// Returns a handle that tasks can use to register new tasks from
    /// within their own `resume`.
    pub fn spawner(&self) -> Spawner {
        Spawner {
            pending: self.pending.clone(),
        }
    }

    /// Returns a handle that tasks can use to request termination from
    /// within their own `resume`.
    pub fn stop_token(&self) -> StopToken {
        StopToken {
            stop_requested: self.stop_requested.clone(),
        }
    }

    /// Registers `task`, driving it once with the [`Priority::ZERO`]
    /// sentinel to obtain its first waiter. A task that terminates before
    /// yielding is logged and discarded rather than scheduled.
    pub fn add_thread(&mut self, mut task: Box<dyn Task>) {
        let now = self.clock.now_micros();
        match drive(&mut *task, Priority::ZERO) {
            Resumption::Yield(mut waiter) => {
                waiter.refresh(now);
                self.slots.push(Some(Slot { task, waiter }));
                sdebug!("task added, {} slot(s) now alive", self.alive_count());
            }
            Resumption::Done => {
                if self.config.warn_on_startup_failure {
                    swarn!("task terminated on its first resume; discarding");
                }
            }
        }
    }

    /// Requests termination. The in-progress pass (if any) completes, then
    /// [`Scheduler::run`] returns.
    pub fn stop(&mut self) {
        self.stop_requested.store(true, Ordering::Release);
        sinfo!("scheduler stop requested");
    }

    /// Drives the task set until it is empty or [`Scheduler::stop`] (or a
    /// [`StopToken::request_stop`]) has been called.
    pub fn run(&mut self) {
        sinfo!("scheduler starting with {} task(s)", self.alive_count());
        loop {
            self.tick();
            if self.stop_requested.load(Ordering::Acquire) || self.alive_count() == 0 {
                break;
            }
        }
        sinfo!("scheduler stopped");
    }

    /// Drives the task set exactly like [`Scheduler::run`], but catches any
    /// panic that escapes the outer pass loop itself (spec.md §7
    /// `HostInterrupt`: "external interruption of `run()`, caught at the
    /// outermost scheduler boundary"). A panic inside a single task's
    /// `resume` is already caught and converted to termination by
    /// [`drive`] before it ever reaches this boundary — only a fault in
    /// the scheduler's own bookkeeping (a misbehaving [`Clock`] impl, an
    /// allocation failure, and similar) surfaces here as
    /// [`SchedError::HostInterrupt`]. `no_std` targets have no unwinding to
    /// catch, so this entry point only exists under the `std` feature;
    /// they use [`Scheduler::run`] instead.
    #[cfg(feature = "std")]
    pub fn try_run(&mut self) -> Result<(), SchedError> {
        sinfo!("scheduler starting with {} task(s)", self.alive_count());
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| loop {
            self.tick();
            if self.stop_requested.load(Ordering::Acquire) || self.alive_count() == 0 {
                break;
            }
        }));
        match outcome {
            Ok(()) => {
                sinfo!("scheduler stopped");
                Ok(())
            }
            Err(_) => {
                serr!("scheduler run loop interrupted at the outermost boundary");
                Err(SchedError::HostInterrupt)
            }
        }
    }

    /// Number of currently-alive slots.
    pub fn alive_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    fn purge_dead(&mut self) {
        self.slots.retain(Option::is_some);
    }

    fn drain_pending_spawns(&mut self) {
        let queued = core::mem::take(&mut *self.pending.lock());
        for task in queued {
            self.add_thread(task);
        }
    }

    /// Runs one outer pass (spec.md §4.1 "Scheduling algorithm").
    pub fn tick(&mut self) {
        self.purge_dead();
        self.drain_pending_spawns();

        let (mut priority_list, mut rr_list) = self.partition_ready();

        loop {
            // 4.a: drain priority_list highest-first without re-polling.
            while let Some((priority, idx)) = priority_list.pop() {
                self.resume_slot(idx, priority);
            }
            // 4.b
            let Some(idx) = rr_list.pop() else {
                break;
            };
            // 4.c
            self.resume_slot(idx, Priority::ZERO);
            // 4.d: re-poll all alive slots for newly-ready priority waiters.
            priority_list = self.collect_priority_ready();
            priority_list.sort_unstable_by_key(|(p, _)| *p);
        }
    }

    /// Evaluates every alive slot's readiness exactly once and partitions
    /// the result into a sorted priority list and a round-robin list.
    /// Readiness is not idempotent for every waiter kind (an
    /// `InterruptBlock` resets its count on read), so this must poll each
    /// slot a single time, never twice in the same sweep.
    fn partition_ready(&mut self) -> (Vec<(Priority, usize)>, Vec<usize>) {
        let now = self.clock.now_micros();
        let mut priority_list = Vec::new();
        let mut rr_list = Vec::new();
        for (i, slot) in self.slots.iter_mut().enumerate() {
            let Some(slot) = slot else { continue };
            match slot.waiter.readiness(now) {
                Some(p) if p.is_round_robin() => rr_list.push(i),
                Some(p) => priority_list.push((p, i)),
                None => {}
            }
        }
        priority_list.sort_unstable_by_key(|(p, _)| *p);
        (priority_list, rr_list)
    }

    /// Re-polls every alive slot for newly-ready priority waiters (step
    /// 4.d). Round-robin readiness is intentionally not re-collected here.
    fn collect_priority_ready(&mut self) -> Vec<(Priority, usize)> {
        let now = self.clock.now_micros();
        let mut list: Vec<(Priority, usize)> = self
            .slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, slot)| {
                let slot = slot.as_mut()?;
                match slot.waiter.readiness(now) {
                    Some(p) if !p.is_round_robin() => Some((p, i)),
                    _ => None,
                }
            })
            .collect();
        list.sort_unstable_by_key(|(p, _)| *p);
        list
    }

    fn resume_slot(&mut self, idx: usize, priority: Priority) {
        let now = self.clock.now_micros();
        let Some(slot) = self.slots[idx].as_mut() else {
            return;
        };
        match drive(&mut *slot.task, priority) {
            Resumption::Yield(mut waiter) => {
                waiter.refresh(now);
                slot.waiter = waiter;
            }
            Resumption::Done => {
                self.slots[idx] = None;
            }
        }
    }
}
