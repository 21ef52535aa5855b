//! Transient user notifications.
//!
//! # Design
//! - Producers only see the [`Notifier`] trait; the toast list is a store slice
//!   rendered by the shell.
//! - Expiry is a scheduled task per toast, owned by the center, so dismissing
//!   early cancels the timer.

use crate::core::scheduler::{ScheduledTask, Scheduler};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;
use yewdux::Context;
use yewdux::prelude::Dispatch;
use yewdux::store::Store;

/// Toast severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ToastKind {
    /// Informational toast.
    Info,
    /// Success toast.
    Success,
    /// Warning toast.
    Warning,
    /// Error toast.
    Error,
}

impl ToastKind {
    /// CSS modifier used by the toast host.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Toast payload stored in the toast slice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    /// Monotonic toast identifier.
    pub id: u64,
    /// Display message.
    pub message: String,
    /// Severity.
    pub kind: ToastKind,
}

/// Visible toasts, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Store)]
pub struct ToastStack {
    /// Toasts in arrival order.
    pub items: Vec<Toast>,
}

/// Sink for fire-and-forget user feedback.
pub trait Notifier {
    /// Show `message` with the given severity.
    fn notify(&self, message: &str, kind: ToastKind);

    /// Shorthand for a success toast.
    fn success(&self, message: &str) {
        self.notify(message, ToastKind::Success);
    }

    /// Shorthand for an error toast.
    fn error(&self, message: &str) {
        self.notify(message, ToastKind::Error);
    }

    /// Shorthand for an informational toast.
    fn info(&self, message: &str) {
        self.notify(message, ToastKind::Info);
    }
}

/// Toast list with timed auto-dismissal.
pub struct ToastCenter {
    toasts: Dispatch<ToastStack>,
    scheduler: Rc<dyn Scheduler>,
    lifetime: Duration,
    next_id: Cell<u64>,
    timers: Rc<RefCell<HashMap<u64, ScheduledTask>>>,
}

impl ToastCenter {
    /// Create a center in `cx` whose toasts live for `lifetime`.
    #[must_use]
    pub fn new(cx: &Context, scheduler: Rc<dyn Scheduler>, lifetime: Duration) -> Self {
        Self {
            toasts: Dispatch::new(cx),
            scheduler,
            lifetime,
            next_id: Cell::new(0),
            timers: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    /// Visible toasts, oldest first.
    #[must_use]
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.get().items.clone()
    }

    /// Remove a toast before it expires.
    pub fn dismiss(&self, id: u64) {
        if let Some(timer) = self.timers.borrow_mut().remove(&id) {
            timer.cancel();
        }
        remove_toast(&self.toasts, id);
    }
}

impl Notifier for ToastCenter {
    fn notify(&self, message: &str, kind: ToastKind) {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.toasts.reduce_mut(|stack| {
            stack.items.push(Toast {
                id,
                message: message.to_string(),
                kind,
            });
        });
        let toasts = self.toasts.clone();
        let timers = Rc::downgrade(&self.timers);
        let timer = self.scheduler.schedule(
            self.lifetime,
            Box::new(move || {
                if let Some(timers) = timers.upgrade() {
                    timers.borrow_mut().remove(&id);
                }
                remove_toast(&toasts, id);
            }),
        );
        self.timers.borrow_mut().insert(id, timer);
    }
}

fn remove_toast(toasts: &Dispatch<ToastStack>, id: u64) {
    if toasts.get().items.iter().any(|toast| toast.id == id) {
        toasts.reduce_mut(|stack| stack.items.retain(|toast| toast.id != id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scheduler::VirtualScheduler;

    fn center() -> (VirtualScheduler, ToastCenter) {
        let scheduler = VirtualScheduler::new();
        let center = ToastCenter::new(
            &Context::new(),
            Rc::new(scheduler.clone()),
            Duration::from_millis(3_000),
        );
        (scheduler, center)
    }

    #[test]
    fn toasts_expire_after_lifetime() {
        let (scheduler, center) = center();
        center.success("saved");
        scheduler.advance(Duration::from_millis(1_000));
        center.error("boom");
        assert_eq!(center.toasts().len(), 2);
        scheduler.advance(Duration::from_millis(2_000));
        let remaining = center.toasts();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].kind, ToastKind::Error);
        scheduler.advance(Duration::from_millis(1_000));
        assert!(center.toasts().is_empty());
    }

    #[test]
    fn dismiss_removes_and_cancels_timer() {
        let (scheduler, center) = center();
        center.info("hello");
        let id = center.toasts()[0].id;
        center.dismiss(id);
        assert!(center.toasts().is_empty());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn ids_are_monotonic() {
        let (_scheduler, center) = center();
        center.info("a");
        center.info("b");
        let ids: Vec<u64> = center.toasts().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
