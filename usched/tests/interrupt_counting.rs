//! spec.md §8 scenario 3: interrupt counting.

mod support;

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use support::{AutoAdvanceClock, FakeIrq};
use usched::{InterruptCell, Priority, Resumption, Scheduler, Task, Waiter};

struct BlockedOnInterrupt {
    cell: InterruptCell,
    resumes: Arc<AtomicU32>,
    bad_counts: Arc<AtomicU32>,
}

impl Task for BlockedOnInterrupt {
    fn resume(&mut self, priority: Priority) -> Resumption {
        self.resumes.fetch_add(1, Ordering::SeqCst);
        if priority.interrupts != 1 {
            self.bad_counts.fetch_add(1, Ordering::SeqCst);
        }
        Resumption::Yield(Waiter::InterruptBlock {
            cell: self.cell.clone(),
            irq: Box::new(FakeIrq::new()),
            deadline: None,
        })
    }
}

#[test]
fn each_pulse_resumes_the_blocked_task_exactly_once_with_count_one() {
    let clock = AutoAdvanceClock::new(1);
    let mut sched = Scheduler::new(clock);

    let cell = InterruptCell::new();
    let resumes = Arc::new(AtomicU32::new(0));
    let bad_counts = Arc::new(AtomicU32::new(0));
    sched.add_thread(Box::new(BlockedOnInterrupt {
        cell: cell.clone(),
        resumes: resumes.clone(),
        bad_counts: bad_counts.clone(),
    }));
    assert_eq!(resumes.load(Ordering::SeqCst), 0); // nothing fired yet

    let trampoline = cell.trampoline();
    for _ in 0..30 {
        trampoline.fire();
        sched.tick();
    }

    assert_eq!(resumes.load(Ordering::SeqCst), 30);
    assert_eq!(
        bad_counts.load(Ordering::SeqCst),
        0,
        "every resume must report exactly one missed interrupt"
    );
}
