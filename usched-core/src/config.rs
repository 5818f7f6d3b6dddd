//! Scheduler configuration.
//!
//! A small builder, in the style of the teacher's `TaskMeta` (const `new`
//! plus consuming `with_*` methods) rather than a config file — an embedded
//! cooperative scheduler has nothing to read one from.

/// Configuration accepted by [`crate::sched::Scheduler::with_config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedConfig {
    /// Reserved capacity for the task slot list, to avoid reallocating
    /// while tasks are being added up front.
    pub capacity_hint: usize,
    /// Whether [`crate::sched::Scheduler::add_thread`] logs a warning when a
    /// task terminates before its first yield.
    pub warn_on_startup_failure: bool,
}

impl Default for SchedConfig {
    fn default() -> Self {
        Self {
            capacity_hint: 0,
            warn_on_startup_failure: true,
        }
    }
}

impl SchedConfig {
    /// Default configuration: no capacity reserved, startup failures
    /// logged.
    pub const fn new() -> Self {
        Self {
            capacity_hint: 0,
            warn_on_startup_failure: true,
        }
    }

    /// Reserves capacity for `hint` tasks up front.
    pub const fn with_capacity_hint(mut self, hint: usize) -> Self {
        self.capacity_hint = hint;
        self
    }

    /// Sets whether a task terminating before its first yield is logged.
    pub const fn with_startup_failure_warning(mut self, warn: bool) -> Self {
        self.warn_on_startup_failure = warn;
        self
    }
}
