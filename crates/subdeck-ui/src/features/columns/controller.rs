//! Async flows for one channel column.

use crate::core::scheduler::Debouncer;
use crate::features::columns::logic::{SortSpec, normalize_term};
use crate::features::columns::state::{ColumnState, ColumnView, LoadPhase};
use crate::features::context::AppContext;
use crate::features::videos::actions as videos;
use crate::features::videos::item::{OpenTarget, resolve_open_target};
use std::fmt;
use subdeck_api_models::{Channel, ChannelId, ChannelPatch, VideoId};
use tracing::{debug, info, warn};
use yewdux::Context;
use yewdux::prelude::Dispatch;

/// Yes/no gate shown before destructive actions.
pub trait Confirm {
    /// Ask the user; true means proceed.
    fn confirm(&self, message: &str) -> bool;
}

/// Result of [`ChannelColumn::load`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Videos replaced; carries the new count.
    Loaded(usize),
    /// Another load was already in flight.
    AlreadyLoading,
    /// The request failed; prior videos kept.
    Failed,
    /// The column was destroyed before the response arrived.
    Detached,
}

/// Result of [`ChannelColumn::mark_watched`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatchOutcome {
    /// Confirmed by the backend.
    Watched,
    /// Already watched, pending, unknown, or the column is gone.
    Ignored,
    /// The backend call failed; the control is available again.
    Failed,
}

/// Result of [`ChannelColumn::clear_watched`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClearOutcome {
    /// Removed this many watched videos.
    Cleared(usize),
    /// Nothing to clear.
    Nothing,
    /// The user declined.
    Declined,
    /// The backend call failed; nothing removed.
    Failed,
    /// The column was destroyed before the response arrived.
    Detached,
}

/// One channel's column: owns its video list, search and sort.
///
/// Column state lives in a context of its own so each column's view
/// re-renders independently of its siblings.
pub struct ChannelColumn {
    ctx: AppContext,
    cx: Context,
    state: Dispatch<ColumnState>,
    search: Debouncer,
}

impl fmt::Debug for ChannelColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelColumn")
            .field("channel_id", &self.id())
            .finish_non_exhaustive()
    }
}

impl ChannelColumn {
    /// Mounted column for `channel` with no videos loaded.
    #[must_use]
    pub fn new(ctx: AppContext, channel: Channel) -> Self {
        let cx = Context::new();
        let state = Dispatch::new(&cx);
        state.set(ColumnState::new(channel));
        Self {
            ctx,
            cx,
            state,
            search: Debouncer::default(),
        }
    }

    /// Bound channel id.
    #[must_use]
    pub fn id(&self) -> ChannelId {
        self.state.get().channel.id
    }

    /// Bound channel snapshot.
    #[must_use]
    pub fn channel(&self) -> Channel {
        self.state.get().channel.clone()
    }

    /// Store context holding this column's [`ColumnState`].
    #[must_use]
    pub fn context(&self) -> Context {
        self.cx.clone()
    }

    /// Current render model.
    #[must_use]
    pub fn view(&self) -> ColumnView {
        self.state.get().view()
    }

    /// Whether the column is still mounted.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.state.get().mounted
    }

    /// Whether `video` belongs to this column.
    #[must_use]
    pub fn contains(&self, video: VideoId) -> bool {
        self.state.get().find(video).is_some()
    }

    /// Fetch unwatched videos; re-entrant calls are ignored.
    pub async fn load(&self) -> LoadOutcome {
        let current = self.state.get();
        if !current.mounted {
            return LoadOutcome::Detached;
        }
        if current.phase == LoadPhase::Loading {
            return LoadOutcome::AlreadyLoading;
        }
        let channel = current.channel.id;
        self.state.reduce_mut(|state| state.phase = LoadPhase::Loading);
        let result = videos::fetch_for_channel(&self.ctx, channel).await;

        if !self.is_mounted() {
            warn!(channel_id = %channel, "column destroyed before videos arrived");
            return LoadOutcome::Detached;
        }
        match result {
            Ok(videos) => {
                let count = videos.len();
                self.state.reduce_mut(|state| {
                    state.videos = videos;
                    state.phase = LoadPhase::Idle;
                });
                debug!(channel_id = %channel, count, "column loaded");
                LoadOutcome::Loaded(count)
            }
            Err(_) => {
                self.state.reduce_mut(|state| state.phase = LoadPhase::Failed);
                LoadOutcome::Failed
            }
        }
    }

    /// Reload and confirm with a toast.
    pub async fn refresh(&self) -> LoadOutcome {
        let outcome = self.load().await;
        if matches!(outcome, LoadOutcome::Loaded(_)) {
            let name = self.state.get().channel.name.clone();
            self.ctx
                .notifier
                .success(&self.ctx.i18n.t("toast.channel_refreshed", &[("name", name)]));
        }
        outcome
    }

    /// Update the search box; the list follows after the debounce window.
    ///
    /// Clearing the box applies immediately.
    pub fn set_search_term(&self, raw: &str) {
        let term = normalize_term(raw);
        self.state
            .reduce_mut(|state| state.search_input = raw.to_string());
        if term.is_empty() {
            self.search.cancel();
            self.state.reduce_mut(|state| state.search_term.clear());
            return;
        }
        let state = self.state.clone();
        self.search.call(
            self.ctx.scheduler.as_ref(),
            self.ctx.config.search_debounce(),
            Box::new(move || {
                state.reduce_mut(|state| {
                    if state.mounted {
                        state.search_term = term;
                    }
                });
            }),
        );
    }

    /// Apply a sort immediately.
    pub fn set_sort(&self, sort: SortSpec) {
        self.state.reduce_mut(|state| state.sort = sort);
    }

    /// Apply a selector value such as `views-desc`; unknown values are ignored.
    pub fn set_sort_value(&self, raw: &str) -> bool {
        SortSpec::parse(raw).is_some_and(|sort| {
            self.set_sort(sort);
            true
        })
    }

    /// Mark `video` watched once the backend confirms.
    pub async fn mark_watched(&self, video: VideoId) -> WatchOutcome {
        let eligible = {
            let state = self.state.get();
            state.mounted
                && !state.pending.contains(&video)
                && state.find(video).is_some_and(|entry| !entry.is_watched)
        };
        if !eligible {
            return WatchOutcome::Ignored;
        }
        self.state.reduce_mut(|state| {
            state.pending.insert(video);
        });
        let confirmed = videos::mark_watched(&self.ctx, video).await;
        if !self.is_mounted() {
            warn!(video_id = %video, confirmed, "column destroyed before watch finished");
            return WatchOutcome::Ignored;
        }
        let mut applied = false;
        self.state.reduce_mut(|state| {
            state.pending.remove(&video);
            if confirmed {
                applied = state.mark_watched(video);
            }
        });
        if !confirmed {
            return WatchOutcome::Failed;
        }
        if !applied {
            warn!(channel_id = %self.id(), video_id = %video, "watched video no longer in column");
        }
        WatchOutcome::Watched
    }

    /// Remove watched videos after confirmation.
    pub async fn clear_watched(&self) -> ClearOutcome {
        let (unwatched, name, watched) = {
            let state = self.state.get();
            if !state.mounted {
                return ClearOutcome::Nothing;
            }
            (
                state.unwatched_count(),
                state.channel.name.clone(),
                state.watched_ids(),
            )
        };
        if unwatched == 0 {
            return ClearOutcome::Nothing;
        }
        let prompt = self.ctx.i18n.t("toast.clear_confirm", &[("name", name)]);
        if !self.ctx.confirm.confirm(&prompt) {
            return ClearOutcome::Declined;
        }
        let channel = self.id();
        if !videos::clear_watched(&self.ctx, channel).await {
            self.ctx
                .notifier
                .error(&self.ctx.i18n.text("toast.clear_failed"));
            return ClearOutcome::Failed;
        }
        if !self.is_mounted() {
            warn!(channel_id = %channel, "column destroyed before clear finished");
            return ClearOutcome::Detached;
        }
        let mut removed = 0;
        self.state
            .reduce_mut(|state| removed = state.remove_videos(&watched));
        info!(channel_id = %channel, removed, "watched videos cleared");
        self.ctx.notifier.success(
            &self
                .ctx
                .i18n
                .t("toast.cleared", &[("count", removed.to_string())]),
        );
        ClearOutcome::Cleared(removed)
    }

    /// Resolve where to open `video`, if it belongs here.
    pub async fn open(&self, video: VideoId) -> Option<OpenTarget> {
        let entry = self.state.get().find(video).cloned()?;
        Some(
            resolve_open_target(
                &self.ctx.api,
                self.ctx.notifier.as_ref(),
                &self.ctx.i18n,
                &entry,
            )
            .await,
        )
    }

    /// Merge a channel patch into the bound channel.
    pub fn update_channel(&self, patch: &ChannelPatch) {
        self.state
            .reduce_mut(|state| patch.apply_to(&mut state.channel));
    }

    /// Release children and detach; safe to call repeatedly.
    pub fn destroy(&self) {
        self.search.cancel();
        if self.is_mounted() {
            self.state.reduce_mut(ColumnState::release);
            debug!(channel_id = %self.id(), "column destroyed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::columns::logic::{SortKey, SortOrder};
    use crate::features::columns::state::EmptyState;
    use crate::features::videos::item::WatchControl;
    use crate::services::api::Method;
    use crate::testing::{Harness, envelope, ok, typed_channel, video, video_with};
    use serde_json::json;
    use std::time::Duration;

    fn column(harness: &Harness) -> ChannelColumn {
        ChannelColumn::new(harness.ctx.clone(), typed_channel(1, "News", 0))
    }

    fn script_videos(harness: &Harness, videos: serde_json::Value) {
        harness
            .transport
            .respond(Method::Get, "/channels/1/videos", envelope(videos));
    }

    fn visible_ids(column: &ChannelColumn) -> Vec<i64> {
        column
            .view()
            .items
            .iter()
            .map(|item| item.video.id.0)
            .collect()
    }

    #[tokio::test(flavor = "current_thread")]
    async fn load_requests_unwatched_only() {
        let harness = Harness::new();
        script_videos(&harness, json!([video(1, false), video(2, false)]));
        let column = column(&harness);
        assert_eq!(column.load().await, LoadOutcome::Loaded(2));
        assert_eq!(
            harness.transport.requests()[0].path_and_query(),
            "/channels/1/videos?include_watched=false"
        );
        assert_eq!(harness.ctx.stores.videos.get().videos(ChannelId(1)).len(), 2);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn concurrent_load_is_rejected() {
        let harness = Harness::new();
        let release = harness.transport.hold(Method::Get, "/channels/1/videos");
        let column = column(&harness);
        let (first, second) = tokio::join!(column.load(), async {
            let outcome = column.load().await;
            let _ = release.send(envelope(json!([video(1, false)])));
            outcome
        });
        assert_eq!(first, LoadOutcome::Loaded(1));
        assert_eq!(second, LoadOutcome::AlreadyLoading);
        assert_eq!(harness.transport.requests().len(), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn failed_load_keeps_prior_videos_and_offers_retry() {
        let harness = Harness::new();
        script_videos(&harness, json!([video(1, false)]));
        let column = column(&harness);
        column.load().await;
        harness.transport.fail(Method::Get, "/channels/1/videos");
        assert_eq!(column.load().await, LoadOutcome::Failed);
        let view = column.view();
        assert_eq!(view.phase, LoadPhase::Failed);
        assert_eq!(view.items.len(), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn destroy_during_load_is_safe() {
        let harness = Harness::new();
        let release = harness.transport.hold(Method::Get, "/channels/1/videos");
        let column = column(&harness);
        let (outcome, ()) = tokio::join!(column.load(), async {
            column.destroy();
            column.destroy();
            let _ = release.send(envelope(json!([video(1, false)])));
        });
        assert_eq!(outcome, LoadOutcome::Detached);
        assert!(!column.is_mounted());
        assert!(column.view().items.is_empty());
        assert_eq!(column.load().await, LoadOutcome::Detached);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn search_applies_after_debounce_and_clears_immediately() {
        let harness = Harness::new();
        script_videos(
            &harness,
            json!([video_with(1, "Rust news", 1, false), video_with(2, "Cooking", 2, false)]),
        );
        let column = column(&harness);
        column.load().await;

        column.set_search_term("ru");
        harness.scheduler.advance(Duration::from_millis(200));
        column.set_search_term("rust");
        harness.scheduler.advance(Duration::from_millis(299));
        assert_eq!(column.view().items.len(), 2);
        harness.scheduler.advance(Duration::from_millis(1));
        assert_eq!(visible_ids(&column), vec![1]);

        column.set_search_term("   ");
        assert_eq!(column.view().items.len(), 2);
        assert_eq!(harness.scheduler.pending(), 0);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn sort_value_reorders_immediately() {
        let harness = Harness::new();
        script_videos(
            &harness,
            json!([video_with(1, "a", 10, false), video_with(2, "b", 30, false), video_with(3, "c", 20, false)]),
        );
        let column = column(&harness);
        column.load().await;
        assert!(column.set_sort_value("views-desc"));
        assert_eq!(visible_ids(&column), vec![2, 3, 1]);
        assert!(!column.set_sort_value("bogus"));
        column.set_sort(SortSpec::new(SortKey::Views, SortOrder::Asc));
        assert_eq!(visible_ids(&column), vec![1, 3, 2]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn mark_watched_is_confirmed_and_idempotent() {
        let harness = Harness::new();
        script_videos(&harness, json!([video(1, false)]));
        harness.transport.respond(Method::Post, "/videos/1/watch", ok());
        let column = column(&harness);
        column.load().await;

        assert_eq!(column.mark_watched(VideoId(1)).await, WatchOutcome::Watched);
        assert_eq!(column.view().items[0].control, WatchControl::Watched);
        assert_eq!(column.mark_watched(VideoId(1)).await, WatchOutcome::Ignored);
        assert_eq!(
            harness.transport.requests_to(Method::Post, "/videos/1/watch").len(),
            1
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn watch_control_is_pending_during_request_and_restored_on_failure() {
        let harness = Harness::new();
        script_videos(&harness, json!([video(1, false)]));
        let release = harness.transport.hold(Method::Post, "/videos/1/watch");
        let column = column(&harness);
        column.load().await;

        let (outcome, ()) = tokio::join!(column.mark_watched(VideoId(1)), async {
            assert_eq!(column.view().items[0].control, WatchControl::Pending);
            assert_eq!(column.mark_watched(VideoId(1)).await, WatchOutcome::Ignored);
            drop(release);
        });
        assert_eq!(outcome, WatchOutcome::Failed);
        assert_eq!(column.view().items[0].control, WatchControl::Available);
        assert!(
            harness
                .notifier
                .errors()
                .contains(&"Failed to mark video as watched".to_string())
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn destroy_during_watch_keeps_column_detached() {
        let harness = Harness::new();
        script_videos(&harness, json!([video(1, false), video(2, false)]));
        let release = harness.transport.hold(Method::Post, "/videos/1/watch");
        let column = column(&harness);
        column.load().await;

        let (outcome, ()) = tokio::join!(column.mark_watched(VideoId(1)), async {
            column.destroy();
            let _ = release.send(ok());
        });
        assert_eq!(outcome, WatchOutcome::Ignored);
        assert!(!column.is_mounted());
        assert!(column.view().items.is_empty());
        assert_eq!(column.load().await, LoadOutcome::Detached);
        let cache = harness.ctx.stores.videos.get();
        let cached: Vec<VideoId> = cache.videos(ChannelId(1)).iter().map(|v| v.id).collect();
        assert_eq!(cached, vec![VideoId(2)]);
        assert_eq!(harness.notifier.successes(), vec!["Video marked as watched"]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn destroy_during_clear_reports_detached() {
        let harness = Harness::new();
        script_videos(&harness, json!([video(1, true), video(2, false)]));
        let release = harness.transport.hold(Method::Post, "/channels/1/clear");
        let column = column(&harness);
        column.load().await;

        let (outcome, ()) = tokio::join!(column.clear_watched(), async {
            column.destroy();
            let _ = release.send(ok());
        });
        assert_eq!(outcome, ClearOutcome::Detached);
        assert!(!column.is_mounted());
        assert!(column.view().items.is_empty());
        assert!(harness.notifier.successes().is_empty());
        assert_eq!(
            harness.transport.requests_to(Method::Get, "/channels/1/videos").len(),
            2
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn clear_removes_exactly_the_watched_set() {
        let harness = Harness::new();
        script_videos(
            &harness,
            json!([video(1, true), video(2, false), video(3, true)]),
        );
        harness.transport.respond(Method::Post, "/channels/1/clear", ok());
        let column = column(&harness);
        column.load().await;

        assert_eq!(column.clear_watched().await, ClearOutcome::Cleared(2));
        assert_eq!(visible_ids(&column), vec![2]);
        assert_eq!(harness.confirm.asked(), vec!["Clear watched videos from News?"]);
        assert_eq!(harness.notifier.successes(), vec!["Cleared 2 watched videos"]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn clear_requires_confirmation_and_unwatched_items() {
        let harness = Harness::with_confirm(false);
        script_videos(&harness, json!([video(1, true), video(2, false)]));
        let column = column(&harness);
        column.load().await;
        assert_eq!(column.clear_watched().await, ClearOutcome::Declined);
        assert_eq!(column.view().total, 2);

        let empty = Harness::new();
        let idle = ChannelColumn::new(empty.ctx.clone(), typed_channel(1, "News", 0));
        assert_eq!(idle.clear_watched().await, ClearOutcome::Nothing);
        assert!(empty.confirm.asked().is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn failed_clear_leaves_list_untouched() {
        let harness = Harness::new();
        script_videos(&harness, json!([video(1, true), video(2, false)]));
        harness.transport.fail(Method::Post, "/channels/1/clear");
        let column = column(&harness);
        column.load().await;
        assert_eq!(column.clear_watched().await, ClearOutcome::Failed);
        assert_eq!(column.view().total, 2);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn refresh_toasts_channel_name() {
        let harness = Harness::new();
        script_videos(&harness, json!([]));
        let column = column(&harness);
        column.refresh().await;
        assert_eq!(harness.notifier.successes(), vec!["Refreshed videos for News"]);
        assert_eq!(column.view().empty, Some(EmptyState::NoVideos));
    }
}
