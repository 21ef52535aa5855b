//! Dashboard counters and recorded sync errors.

use crate::features::context::AppContext;
use crate::i18n::Localizer;
use subdeck_api_models::{Stats, SyncErrorRecord};
use tracing::debug;
use yewdux::store::Store;

/// Counters slice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Store)]
pub struct StatsState {
    /// Last counters received.
    pub stats: Option<Stats>,
    /// A request is in flight.
    pub loading: bool,
}

impl StatsState {
    /// Label and formatted value per counter; empty before the first load.
    #[must_use]
    pub fn tiles(&self, i18n: &Localizer) -> Vec<(String, String)> {
        let Some(stats) = self.stats else {
            return Vec::new();
        };
        [
            ("stats.channels", stats.total_channels),
            ("stats.subscriptions", stats.total_subscriptions),
            ("stats.videos", stats.total_videos),
            ("stats.unwatched", stats.unwatched_videos),
        ]
        .into_iter()
        .map(|(key, value)| (i18n.text(key), i18n.number(u64::from(value))))
        .collect()
    }
}

/// Sync error slice.
#[derive(Clone, Debug, Default, PartialEq, Eq, Store)]
pub struct ErrorsState {
    /// Recorded errors, newest first as served.
    pub items: Vec<SyncErrorRecord>,
    /// A request is in flight.
    pub loading: bool,
}

/// Reload the counters; the previous values stay on failure.
pub async fn load_stats(ctx: &AppContext) -> bool {
    ctx.stores.stats.reduce_mut(|state| state.loading = true);
    let result = ctx.api.stats().await;
    let loaded = result.is_ok();
    ctx.stores.stats.reduce_mut(|state| {
        if let Ok(stats) = result {
            state.stats = Some(stats);
        }
        state.loading = false;
    });
    loaded
}

/// Reload recorded sync errors; a failure clears the list.
pub async fn load_errors(ctx: &AppContext) -> bool {
    ctx.stores.errors.reduce_mut(|state| state.loading = true);
    let result = ctx.api.errors().await;
    let loaded = result.is_ok();
    let items = result.unwrap_or_default();
    debug!(count = items.len(), "sync errors loaded");
    ctx.stores.errors.reduce_mut(|state| {
        state.items = items;
        state.loading = false;
    });
    loaded
}
