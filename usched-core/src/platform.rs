//! Abstract platform services (spec.md §6).
//!
//! The scheduler core never touches hardware directly. It is driven through
//! these two traits, which a platform crate implements against its actual
//! timer and interrupt controller. Registering interrupts and configuring
//! the hardware timer are out of scope here (spec.md §1) — `usched-core`
//! only consumes an already-configured [`Clock`] and already-registered
//! [`IrqHandle`]s.

/// A free-running microsecond counter with period
/// [`crate::timer::TIMER_PERIOD`].
///
/// On real hardware this wraps a timer peripheral initialized with a
/// prescaler such that one tick equals one microsecond.
pub trait Clock {
    /// Returns the counter's current value.
    fn now_micros(&self) -> u32;
}

/// Enable/disable control for one externally-registered interrupt source.
///
/// Mirrors the handle returned by a platform's `register_ext_irq`-style API
/// (pin, edge, pull, handler in spec.md §6): `usched-core` only ever calls
/// `enable`/`disable` on an existing handle, never registers one itself.
pub trait IrqHandle: Send {
    /// Enables delivery of this interrupt.
    fn enable(&self);
    /// Disables delivery of this interrupt. Used to bracket the read-reset
    /// critical section in [`crate::waiter::Waiter::readiness`].
    fn disable(&self);
}
