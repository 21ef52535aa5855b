//! Assistive live-region announcements.

use crate::core::scheduler::{ScheduledTask, Scheduler};
use crate::features::reorder::session::Announcement;
use crate::i18n::Localizer;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;
use yewdux::prelude::Dispatch;
use yewdux::store::Store;

/// Text currently exposed through the polite live region.
#[derive(Clone, Debug, Default, PartialEq, Eq, Store)]
pub struct LiveRegionState {
    /// Announcement text, `None` once cleared.
    pub text: Option<String>,
}

/// Publishes announcement text and clears it after a delay.
pub struct Announcer {
    region: Dispatch<LiveRegionState>,
    scheduler: Rc<dyn Scheduler>,
    i18n: Rc<Localizer>,
    clear_after: Duration,
    pending: RefCell<Option<ScheduledTask>>,
}

impl fmt::Debug for Announcer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Announcer")
            .field("text", &self.region.get().text)
            .field("clear_after", &self.clear_after)
            .finish_non_exhaustive()
    }
}

impl Announcer {
    /// Announcer writing into `region`.
    #[must_use]
    pub fn new(
        region: Dispatch<LiveRegionState>,
        scheduler: Rc<dyn Scheduler>,
        i18n: Rc<Localizer>,
        clear_after: Duration,
    ) -> Self {
        Self {
            region,
            scheduler,
            i18n,
            clear_after,
            pending: RefCell::new(None),
        }
    }

    /// Localized text for `announcement`.
    #[must_use]
    pub fn render(&self, announcement: &Announcement) -> String {
        match announcement {
            Announcement::Entered { name } => self
                .i18n
                .t("reorder.entered", &[("name", name.clone())]),
            Announcement::Moved {
                name,
                position,
                total,
            } => self.i18n.t(
                "reorder.moved",
                &[
                    ("name", name.clone()),
                    ("position", position.to_string()),
                    ("total", total.to_string()),
                ],
            ),
            Announcement::Confirmed { name, position } => self.i18n.t(
                "reorder.confirmed",
                &[("name", name.clone()), ("position", position.to_string())],
            ),
            Announcement::Exited { name } => {
                self.i18n.t("reorder.exited", &[("name", name.clone())])
            }
        }
    }

    /// Publish `announcement`; a newer one restarts the clear timer.
    pub fn announce(&self, announcement: &Announcement) {
        let text = self.render(announcement);
        self.region.set(LiveRegionState { text: Some(text) });
        let region = self.region.clone();
        let timer = self.scheduler.schedule(
            self.clear_after,
            Box::new(move || region.set(LiveRegionState::default())),
        );
        if let Some(previous) = self.pending.replace(Some(timer)) {
            previous.cancel();
        }
    }
}
