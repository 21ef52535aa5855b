//! Browser implementations of the scheduler, spawner and confirm gate.

use crate::core::scheduler::{LocalTask, RepeatingTask, ScheduledTask, Scheduler, Spawner, Task};
use crate::features::columns::Confirm;
use gloo::dialogs;
use gloo_timers::callback::{Interval, Timeout};
use std::time::Duration;
use wasm_bindgen_futures::spawn_local;

/// Timers backed by `setTimeout` / `setInterval`.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn now_ms(&self) -> u64 {
        js_sys::Date::now().max(0.0) as u64
    }

    fn schedule(&self, delay: Duration, task: Task) -> ScheduledTask {
        let timeout = Timeout::new(millis(delay), task);
        // The handle may be dropped from inside the callback it owns, so the
        // closure is released on the next tick.
        ScheduledTask::new(move || {
            let closure = timeout.cancel();
            spawn_local(async move { drop(closure) });
        })
    }

    fn every(&self, period: Duration, task: RepeatingTask) -> ScheduledTask {
        let interval = Interval::new(millis(period), move || task());
        ScheduledTask::new(move || {
            let closure = interval.cancel();
            spawn_local(async move { drop(closure) });
        })
    }
}

fn millis(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}

/// Runs futures on the browser microtask queue.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct BrowserSpawner;

impl Spawner for BrowserSpawner {
    fn spawn(&self, task: LocalTask) {
        spawn_local(task);
    }
}

/// `window.confirm` gate.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct BrowserConfirm;

impl Confirm for BrowserConfirm {
    fn confirm(&self, message: &str) -> bool {
        dialogs::confirm(message)
    }
}
