//! Cancellable scheduled tasks.
//!
//! # Design
//! - Timers are owned handles: dropping a [`ScheduledTask`] cancels it, the same
//!   contract as `gloo_timers::callback::Timeout`.
//! - [`VirtualScheduler`] runs on a manual clock so debounce and refresh logic is
//!   tested by advancing time instead of sleeping.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::pin::Pin;
use std::rc::Rc;
use std::time::Duration;

/// One-shot task body.
pub type Task = Box<dyn FnOnce()>;
/// Repeating task body.
pub type RepeatingTask = Rc<dyn Fn()>;

/// Boxed `!Send` future run on the UI thread.
pub type LocalTask = Pin<Box<dyn Future<Output = ()>>>;

/// Runs detached futures on the UI thread.
pub trait Spawner {
    /// Start `task` without awaiting it.
    fn spawn(&self, task: LocalTask);
}

/// Source of timers for UI logic.
pub trait Scheduler {
    /// Milliseconds since an arbitrary origin.
    fn now_ms(&self) -> u64;

    /// Run `task` once after `delay`.
    fn schedule(&self, delay: Duration, task: Task) -> ScheduledTask;

    /// Run `task` every `period` until the handle is cancelled.
    fn every(&self, period: Duration, task: RepeatingTask) -> ScheduledTask;
}

/// Owned handle to a pending timer; cancels on drop.
pub struct ScheduledTask {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl ScheduledTask {
    /// Wrap a cancellation hook.
    #[must_use]
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Cancel the task if it has not fired yet.
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for ScheduledTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduledTask")
            .field("armed", &self.cancel.is_some())
            .finish()
    }
}

/// Debounce helper: only the most recently scheduled call fires.
#[derive(Default)]
pub struct Debouncer {
    pending: RefCell<Option<ScheduledTask>>,
}

impl Debouncer {
    /// Replace any pending call with `task`, due after `delay`.
    pub fn call(&self, scheduler: &dyn Scheduler, delay: Duration, task: Task) {
        let next = scheduler.schedule(delay, task);
        if let Some(previous) = self.pending.replace(Some(next)) {
            previous.cancel();
        }
    }

    /// Drop the pending call, if any.
    pub fn cancel(&self) {
        if let Some(previous) = self.pending.take() {
            previous.cancel();
        }
    }

    /// Whether a call has been scheduled since the last cancel.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.borrow().is_some()
    }
}

impl fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debouncer")
            .field("pending", &self.is_pending())
            .finish()
    }
}

enum Entry {
    Once(Task),
    Repeat { period: u64, task: RepeatingTask },
}

#[derive(Default)]
struct Queue {
    now: u64,
    seq: u64,
    entries: BTreeMap<(u64, u64), (u64, Entry)>,
    cancelled: Vec<u64>,
}

/// Deterministic scheduler driven by [`VirtualScheduler::advance`].
#[derive(Clone, Default)]
pub struct VirtualScheduler {
    queue: Rc<RefCell<Queue>>,
}

impl VirtualScheduler {
    /// Scheduler starting at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks still waiting.
    #[must_use]
    pub fn pending(&self) -> usize {
        let queue = self.queue.borrow();
        queue
            .entries
            .values()
            .filter(|(id, _)| !queue.cancelled.contains(id))
            .count()
    }

    /// Move the clock forward, running every task that falls due.
    ///
    /// Tasks scheduled by running tasks fire in the same call when they fall
    /// inside the window.
    pub fn advance(&self, by: Duration) {
        let target = {
            let queue = self.queue.borrow();
            queue.now + duration_ms(by)
        };
        loop {
            let next = {
                let mut queue = self.queue.borrow_mut();
                let due = queue
                    .entries
                    .keys()
                    .next()
                    .copied()
                    .filter(|(at, _)| *at <= target);
                due.and_then(|key| {
                    let (id, entry) = queue.entries.remove(&key)?;
                    queue.now = key.0;
                    if let Some(pos) = queue.cancelled.iter().position(|c| *c == id) {
                        queue.cancelled.swap_remove(pos);
                        return Some(None);
                    }
                    Some(Some((id, entry)))
                })
            };
            match next {
                None => break,
                Some(None) => {}
                Some(Some((_, Entry::Once(task)))) => task(),
                Some(Some((id, Entry::Repeat { period, task }))) => {
                    self.insert(id, period, Entry::Repeat {
                        period,
                        task: task.clone(),
                    });
                    task();
                }
            }
        }
        self.queue.borrow_mut().now = target;
    }

    fn insert(&self, id: u64, delay: u64, entry: Entry) {
        let mut queue = self.queue.borrow_mut();
        let due = queue.now + delay;
        queue.seq += 1;
        let seq = queue.seq;
        queue.entries.insert((due, seq), (id, entry));
    }

    fn register(&self, delay: Duration, entry: Entry) -> ScheduledTask {
        let id = {
            let mut queue = self.queue.borrow_mut();
            queue.seq += 1;
            queue.seq
        };
        self.insert(id, duration_ms(delay), entry);
        let queue = Rc::downgrade(&self.queue);
        ScheduledTask::new(move || {
            if let Some(queue) = queue.upgrade() {
                let mut queue = queue.borrow_mut();
                let live = queue.entries.values().any(|(entry_id, _)| *entry_id == id);
                if live {
                    queue.cancelled.push(id);
                }
            }
        })
    }
}

impl Scheduler for VirtualScheduler {
    fn now_ms(&self) -> u64 {
        self.queue.borrow().now
    }

    fn schedule(&self, delay: Duration, task: Task) -> ScheduledTask {
        self.register(delay, Entry::Once(task))
    }

    fn every(&self, period: Duration, task: RepeatingTask) -> ScheduledTask {
        let period_ms = duration_ms(period).max(1);
        self.register(
            period,
            Entry::Repeat {
                period: period_ms,
                task,
            },
        )
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
