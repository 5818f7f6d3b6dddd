//! spec.md §8 scenario 4: poll with timeout.

mod support;

use std::sync::atomic::{AtomicI32, AtomicU32, Ordering};
use std::sync::Arc;

use support::AutoAdvanceClock;
use usched::{Deadline, Priority, Resumption, Scheduler, Task, Waiter};

struct PollsExternalValue {
    external: Arc<AtomicI32>,
    last_seen: i32,
    threshold: i32,
    timeout_us: u32,
    value_ready_resumes: Arc<AtomicU32>,
    timeout_resumes: Arc<AtomicU32>,
}

impl Task for PollsExternalValue {
    fn resume(&mut self, priority: Priority) -> Resumption {
        if priority.poll_value == 1 {
            self.value_ready_resumes.fetch_add(1, Ordering::SeqCst);
        } else if priority.overdue_us > 0 {
            self.timeout_resumes.fetch_add(1, Ordering::SeqCst);
        }
        let external = self.external.clone();
        let threshold = self.threshold;
        let last_seen = self.last_seen;
        Resumption::Yield(
            Waiter::Poll {
                poll_fn: Box::new(move || {
                    let current = external.load(Ordering::SeqCst);
                    if (current - last_seen).abs() > threshold {
                        Some(1)
                    } else {
                        None
                    }
                }),
                deadline: Some(Deadline::pending(self.timeout_us).unwrap()),
            },
        )
    }
}

#[test]
fn poll_value_and_timeout_fallback_both_fire_over_a_long_run() {
    const HORIZON_US: u32 = 30_000_000;
    let clock = AutoAdvanceClock::new(1000);
    let mut sched = Scheduler::new(clock.clone());

    let external = Arc::new(AtomicI32::new(0));
    let value_ready = Arc::new(AtomicU32::new(0));
    let timeouts = Arc::new(AtomicU32::new(0));
    sched.add_thread(Box::new(PollsExternalValue {
        external: external.clone(),
        last_seen: 0,
        threshold: 5,
        timeout_us: 2_000_000,
        value_ready_resumes: value_ready.clone(),
        timeout_resumes: timeouts.clone(),
    }));

    let mut next_change_at = 3_000_000u32;
    let mut changes_made = 0;
    while clock.now() < HORIZON_US {
        if changes_made < 5 && clock.now() >= next_change_at {
            external.fetch_add(100, Ordering::SeqCst);
            changes_made += 1;
            next_change_at += 5_000_000;
        }
        sched.tick();
    }

    assert_eq!(changes_made, 5);
    assert!(
        value_ready.load(Ordering::SeqCst) >= 5,
        "expected at least one poll-ready resume per external change"
    );
    assert!(
        timeouts.load(Ordering::SeqCst) >= 1,
        "expected the 2s timeout to fall back at least once between changes"
    );
}
