//! Top-level orchestration of the board, settings and channel lifecycle.

use crate::core::shortcuts::Focus;
use crate::features::channels::actions as channels;
use crate::features::columns::board::ColumnBoard;
use crate::features::columns::controller::LoadOutcome;
use crate::features::context::AppContext;
use crate::features::oauth;
use crate::features::reorder::controller::ReorderController;
use crate::features::settings::controller::{RefreshHook, SettingsController, refresh};
use crate::features::stats;
use crate::features::subscriptions::actions as subscriptions;
use crate::features::subscriptions::state::SubscriptionFilter;
use std::fmt;
use std::rc::{Rc, Weak};
use subdeck_api_models::{
    ChannelId, ChannelPatch, NewChannel, SubscriptionId, SubscriptionPatch, VideoId,
};
use tracing::{debug, warn};

/// One dashboard instance.
pub struct Dashboard {
    ctx: AppContext,
    board: Rc<ColumnBoard>,
    reorder: ReorderController,
    settings: SettingsController,
}

impl fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dashboard")
            .field("board", &self.board)
            .finish_non_exhaustive()
    }
}

impl Dashboard {
    /// Wire a dashboard whose auto-refresh calls back into [`Dashboard::refresh`].
    #[must_use]
    pub fn new(ctx: AppContext) -> Rc<Self> {
        Rc::new_cyclic(|weak: &Weak<Self>| {
            let weak = weak.clone();
            let hook: RefreshHook = Rc::new(move || {
                let weak = weak.clone();
                Box::pin(async move {
                    if let Some(dashboard) = weak.upgrade() {
                        dashboard.refresh().await;
                    }
                })
            });
            let board = Rc::new(ColumnBoard::new(ctx.clone()));
            Self {
                reorder: ReorderController::new(ctx.clone(), board.clone()),
                settings: SettingsController::new(ctx.clone(), hook),
                board,
                ctx,
            }
        })
    }

    /// Shared services and stores.
    #[must_use]
    pub const fn ctx(&self) -> &AppContext {
        &self.ctx
    }

    /// Column registry.
    #[must_use]
    pub fn board(&self) -> Rc<ColumnBoard> {
        self.board.clone()
    }

    /// Reorder sessions.
    #[must_use]
    pub const fn reorder(&self) -> &ReorderController {
        &self.reorder
    }

    /// Settings and auto-refresh.
    #[must_use]
    pub const fn settings(&self) -> &SettingsController {
        &self.settings
    }

    /// Load settings and translations, then the data.
    pub async fn init(&self) {
        self.settings.init().await;
        self.refresh().await;
        stats::load_errors(&self.ctx).await;
    }

    /// Reload channels and stats, rebuild every column and load them.
    pub async fn refresh(&self) -> bool {
        if !refresh(&self.ctx).await {
            return false;
        }
        let channels = self.ctx.stores.channels.get().items().to_vec();
        self.reorder.reset();
        self.board.rebuild(&channels);
        self.board.load_all().await;
        debug!(columns = channels.len(), "dashboard refreshed");
        true
    }

    /// Create a channel and mount its column.
    pub async fn add_channel(&self, channel: &NewChannel) -> bool {
        let Some(created) = channels::add(&self.ctx, channel).await else {
            return false;
        };
        let column = self.board.add(created);
        column.load().await;
        true
    }

    /// Save a channel patch and reflect it in the column header.
    pub async fn update_channel(&self, id: ChannelId, patch: &ChannelPatch) -> bool {
        if !channels::update(&self.ctx, id, patch).await {
            return false;
        }
        self.board.update_channel(id, patch);
        true
    }

    /// Delete a channel and tear down its column.
    pub async fn delete_channel(&self, id: ChannelId) -> bool {
        if !channels::delete(&self.ctx, id).await {
            return false;
        }
        self.board.remove(id);
        true
    }

    /// Finish an OAuth flow and mount the linked channel's column.
    pub async fn complete_oauth(&self, state: &str, code: &str) -> bool {
        let Some(channel) = oauth::complete(&self.ctx, state, code).await else {
            return false;
        };
        if self.board.column(channel.id).is_none() {
            self.board.add(channel).load().await;
        }
        true
    }

    /// Fetch new videos for one channel, then reload its column.
    pub async fn sync_channel(&self, id: ChannelId) -> LoadOutcome {
        let max_videos = self.ctx.config.default_max_videos;
        if self.ctx.api.sync_videos(Some(id), max_videos).await.is_err() {
            return LoadOutcome::Failed;
        }
        match self.board.column(id) {
            Some(column) => column.refresh().await,
            None => {
                warn!(channel_id = %id, "synced channel has no column");
                LoadOutcome::Detached
            }
        }
    }

    /// Load the subscriptions of one channel, or all of them, and scope the
    /// channel filter to match.
    pub async fn load_subscriptions(&self, channel: Option<ChannelId>) -> bool {
        self.ctx
            .stores
            .subscriptions
            .reduce_mut(|state| state.filter.channel = channel);
        subscriptions::load(&self.ctx, channel).await
    }

    /// Ask the backend to resync subscriptions, then reload them.
    pub async fn sync_subscriptions(&self, channel: Option<ChannelId>) -> bool {
        subscriptions::sync(&self.ctx, channel).await
    }

    /// Replace the subscription filters.
    pub fn filter_subscriptions(&self, filter: SubscriptionFilter) {
        self.ctx
            .stores
            .subscriptions
            .reduce_mut(|state| state.filter = filter);
    }

    /// Turn a subscription on or off.
    pub async fn set_subscription_active(&self, id: SubscriptionId, active: bool) -> bool {
        let patch = SubscriptionPatch {
            is_active: Some(active),
        };
        subscriptions::update(&self.ctx, id, &patch).await
    }

    /// Delete a subscription.
    pub async fn delete_subscription(&self, id: SubscriptionId) -> bool {
        subscriptions::delete(&self.ctx, id).await
    }

    /// Visible video count per column, in display order.
    #[must_use]
    pub fn video_counts(&self) -> Vec<usize> {
        self.board
            .columns()
            .iter()
            .map(|column| column.view().items.len())
            .collect()
    }

    /// Video under keyboard focus.
    #[must_use]
    pub fn focused_video(&self, focus: Focus) -> Option<VideoId> {
        let column = self.board.columns().get(focus.column)?.clone();
        let index = focus.video?;
        column.view().items.get(index).map(|item| item.video.id)
    }

    /// Stop timers and unmount every column.
    pub fn shutdown(&self) {
        self.settings.stop();
        self.reorder.reset();
        self.board.destroy_all();
    }
}
