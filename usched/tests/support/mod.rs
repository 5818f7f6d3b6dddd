//! Test doubles shared across the scenario tests.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use usched::{Clock, IrqHandle};

/// A clock that advances by a fixed step every time it is read.
///
/// Models wall-clock time passing once per scheduler poll, so driving
/// `Scheduler::run()` to completion exercises the same passage of time a
/// real target would see between ticks, without a live wait.
#[derive(Clone)]
pub struct AutoAdvanceClock {
    value: Arc<AtomicU32>,
    step_us: u32,
}

impl AutoAdvanceClock {
    pub fn new(step_us: u32) -> Self {
        Self {
            value: Arc::new(AtomicU32::new(0)),
            step_us,
        }
    }

    pub fn now(&self) -> u32 {
        self.value.load(Ordering::SeqCst)
    }
}

impl Clock for AutoAdvanceClock {
    fn now_micros(&self) -> u32 {
        self.value.fetch_add(self.step_us, Ordering::SeqCst)
    }
}

/// An `IrqHandle` double that just tracks enabled/disabled state.
pub struct FakeIrq {
    enabled: Arc<AtomicBool>,
}

impl FakeIrq {
    pub fn new() -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(true)),
        }
    }
}

impl IrqHandle for FakeIrq {
    fn enable(&self) {
        self.enabled.store(true, Ordering::SeqCst);
    }
    fn disable(&self) {
        self.enabled.store(false, Ordering::SeqCst);
    }
}
