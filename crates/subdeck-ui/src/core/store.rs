//! App-wide yewdux store slices.
//!
//! # Design
//! - Every slice lives in one [`yewdux::Context`] created per app instance, so
//!   two dashboards (or two tests) never share state.
//! - Features hold a [`Dispatch`] per slice and reduce through it; views read
//!   the same slices with the yewdux hooks under a matching context provider.

use crate::features::channels::state::ChannelsState;
use crate::features::oauth::OAuthState;
use crate::features::reorder::announce::LiveRegionState;
use crate::features::settings::state::SettingsState;
use crate::features::stats::{ErrorsState, StatsState};
use crate::features::subscriptions::state::SubscriptionsState;
use crate::features::videos::state::VideoCacheState;
use std::fmt;
use yewdux::Context;
use yewdux::prelude::Dispatch;

/// One dispatch per shared slice, all bound to the same context.
#[derive(Clone)]
pub struct AppStores {
    cx: Context,
    /// Locale, auto-refresh and refresh bookkeeping.
    pub settings: Dispatch<SettingsState>,
    /// Channel list sorted by position.
    pub channels: Dispatch<ChannelsState>,
    /// Unwatched videos per channel.
    pub videos: Dispatch<VideoCacheState>,
    /// Subscriptions and their filters.
    pub subscriptions: Dispatch<SubscriptionsState>,
    /// Dashboard counters.
    pub stats: Dispatch<StatsState>,
    /// Recorded sync errors.
    pub errors: Dispatch<ErrorsState>,
    /// OAuth flow progress.
    pub oauth: Dispatch<OAuthState>,
    /// Assistive live-region text.
    pub announcement: Dispatch<LiveRegionState>,
}

impl AppStores {
    /// Bind every slice to `cx`.
    #[must_use]
    pub fn new(cx: &Context) -> Self {
        Self {
            cx: cx.clone(),
            settings: Dispatch::new(cx),
            channels: Dispatch::new(cx),
            videos: Dispatch::new(cx),
            subscriptions: Dispatch::new(cx),
            stats: Dispatch::new(cx),
            errors: Dispatch::new(cx),
            oauth: Dispatch::new(cx),
            announcement: Dispatch::new(cx),
        }
    }

    /// Context the slices live in; other owners bind their own slices to it.
    #[must_use]
    pub const fn context(&self) -> &Context {
        &self.cx
    }
}

impl Default for AppStores {
    fn default() -> Self {
        Self::new(&Context::new())
    }
}

impl fmt::Debug for AppStores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppStores")
            .field("channels", &self.channels.get().items().len())
            .field("settings", &*self.settings.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn slices_are_scoped_to_their_context() {
        let first = AppStores::default();
        let second = AppStores::default();
        first.stats.reduce_mut(|stats| stats.loading = true);
        assert!(first.stats.get().loading);
        assert!(!second.stats.get().loading);

        let rebound = Dispatch::<StatsState>::new(first.context());
        assert!(rebound.get().loading);
    }

    #[test]
    fn subscribers_see_changes_until_dropped() {
        let stores = AppStores::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let listener = {
            let seen = seen.clone();
            Dispatch::<StatsState>::new(stores.context())
                .subscribe_silent(move |state: Rc<StatsState>| seen.borrow_mut().push(state.loading))
        };
        stores.stats.reduce_mut(|stats| stats.loading = true);
        stores.stats.reduce_mut(|stats| stats.loading = true);
        stores.stats.reduce_mut(|stats| stats.loading = false);
        drop(listener);
        stores.stats.reduce_mut(|stats| stats.loading = true);
        assert_eq!(*seen.borrow(), vec![true, false]);
    }
}
