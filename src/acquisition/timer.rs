use std::cell::{Cell, RefCell};
use std::thread::sleep;
use std::time::{Duration, Instant};

/// Callback run by a scheduler, receiving the scheduler so it can
/// arrange follow-up work.
pub type Task = Box<dyn FnOnce(&dyn Scheduler)>;

/// Runs tasks after a delay on the thread that drives the scheduler.
pub trait Scheduler {
    fn schedule_after(&self, delay: Duration, task: Task);
}

struct Pending {
    due: Instant,
    /// Breaks ties between tasks due at the same instant in
    /// scheduling order.
    seq: u64,
    task: Task,
}

/// Single-threaded timer queue.
///
/// Nothing runs on its own, the owner calls `run_due` from its main loop
/// and tasks run one after another inside that call.
#[derive(Default)]
pub struct Timers {
    pending: RefCell<Vec<Pending>>,
    next_seq: Cell<u64>,
}

impl Timers {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.borrow().is_empty()
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.pending.borrow().iter().map(|p| p.due).min()
    }

    /// Runs every task that is due now, earliest first, and returns the
    /// number of tasks that ran.
    ///
    /// Tasks scheduled while running become due no earlier than the next
    /// call, even with a zero delay.
    pub fn run_due(&self) -> usize {
        let due = self.take_due(Instant::now());
        let ran = due.len();
        for task in due {
            task(self);
        }
        ran
    }

    /// Sleeps until the next task is due, but no longer than `max_wait`.
    pub fn wait_due(&self, max_wait: Duration) {
        let wait = match self.next_due() {
            Some(due) => {
                let now = Instant::now();
                if due > now {
                    (due - now).min(max_wait)
                } else {
                    Duration::from_millis(0)
                }
            }
            None => max_wait,
        };

        if wait > Duration::from_millis(0) {
            sleep(wait);
        }
    }

    fn take_due(&self, now: Instant) -> Vec<Task> {
        let mut pending = self.pending.borrow_mut();
        let (mut due, later): (Vec<Pending>, Vec<Pending>) =
            pending.drain(..).partition(|p| p.due <= now);
        *pending = later;

        due.sort_by_key(|p| (p.due, p.seq));
        due.into_iter().map(|p| p.task).collect()
    }
}

impl Scheduler for Timers {
    fn schedule_after(&self, delay: Duration, task: Task) {
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);

        self.pending.borrow_mut().push(Pending {
            due: Instant::now() + delay,
            seq,
            task,
        });
    }
}
