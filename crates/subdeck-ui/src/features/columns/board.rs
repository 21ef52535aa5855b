//! Registry of columns in display order.

use crate::features::columns::controller::{ChannelColumn, ClearOutcome, WatchOutcome};
use crate::features::context::AppContext;
use crate::features::videos::item::OpenTarget;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use subdeck_api_models::{Channel, ChannelId, ChannelPatch, VideoId};
use tracing::debug;
use yewdux::prelude::Dispatch;
use yewdux::store::Store;

/// Channel ids in display order, as rendered by the board view.
#[derive(Clone, Debug, Default, PartialEq, Eq, Store)]
pub struct ColumnOrder {
    /// Ids left to right.
    pub ids: Vec<ChannelId>,
}

/// One column per known channel, kept in display order.
pub struct ColumnBoard {
    ctx: AppContext,
    columns: RefCell<Vec<Rc<ChannelColumn>>>,
    order: Dispatch<ColumnOrder>,
}

impl fmt::Debug for ColumnBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnBoard")
            .field("order", &self.order.get().ids)
            .finish_non_exhaustive()
    }
}

impl ColumnBoard {
    /// Empty board.
    #[must_use]
    pub fn new(ctx: AppContext) -> Self {
        let order = Dispatch::new(ctx.stores.context());
        Self {
            ctx,
            columns: RefCell::new(Vec::new()),
            order,
        }
    }

    /// Display order of channel ids.
    #[must_use]
    pub fn order(&self) -> Vec<ChannelId> {
        self.order.get().ids.clone()
    }

    /// Columns in display order.
    #[must_use]
    pub fn columns(&self) -> Vec<Rc<ChannelColumn>> {
        self.columns.borrow().clone()
    }

    /// Column bound to `channel`.
    #[must_use]
    pub fn column(&self, channel: ChannelId) -> Option<Rc<ChannelColumn>> {
        self.columns
            .borrow()
            .iter()
            .find(|column| column.id() == channel)
            .cloned()
    }

    /// Column currently holding `video`.
    #[must_use]
    pub fn column_for_video(&self, video: VideoId) -> Option<Rc<ChannelColumn>> {
        self.columns
            .borrow()
            .iter()
            .find(|column| column.contains(video))
            .cloned()
    }

    /// Destroy every column and build fresh ones for `channels`, sorted by position.
    pub fn rebuild(&self, channels: &[Channel]) {
        self.destroy_all();
        let mut sorted = channels.to_vec();
        sorted.sort_by_key(|channel| channel.order_position);
        let columns: Vec<Rc<ChannelColumn>> = sorted
            .into_iter()
            .map(|channel| Rc::new(ChannelColumn::new(self.ctx.clone(), channel)))
            .collect();
        debug!(count = columns.len(), "column board rebuilt");
        *self.columns.borrow_mut() = columns;
        self.publish_order();
    }

    /// Add a column for a new channel at its position.
    pub fn add(&self, channel: Channel) -> Rc<ChannelColumn> {
        let position = channel.order_position;
        let column = Rc::new(ChannelColumn::new(self.ctx.clone(), channel));
        {
            let mut columns = self.columns.borrow_mut();
            let index = columns
                .iter()
                .position(|existing| existing.channel().order_position > position)
                .unwrap_or(columns.len());
            columns.insert(index, column.clone());
        }
        self.publish_order();
        column
    }

    /// Destroy and drop the column for `channel`.
    pub fn remove(&self, channel: ChannelId) -> bool {
        let removed = {
            let mut columns = self.columns.borrow_mut();
            columns
                .iter()
                .position(|column| column.id() == channel)
                .map(|index| columns.remove(index))
        };
        let Some(column) = removed else {
            return false;
        };
        column.destroy();
        self.publish_order();
        true
    }

    /// Move `channel` to display index `to` (clamped); returns the final index.
    pub fn move_column(&self, channel: ChannelId, to: usize) -> Option<usize> {
        let target = {
            let mut columns = self.columns.borrow_mut();
            let from = columns.iter().position(|column| column.id() == channel)?;
            let target = to.min(columns.len() - 1);
            if from != target {
                let column = columns.remove(from);
                columns.insert(target, column);
            }
            target
        };
        self.publish_order();
        Some(target)
    }

    /// Forward a patch to the owning column.
    pub fn update_channel(&self, channel: ChannelId, patch: &ChannelPatch) {
        if let Some(column) = self.column(channel) {
            column.update_channel(patch);
        }
    }

    /// Load every column in display order.
    pub async fn load_all(&self) {
        for column in self.columns() {
            column.load().await;
        }
    }

    /// Route a watch request to the column holding `video`.
    pub async fn mark_watched(&self, video: VideoId) -> WatchOutcome {
        match self.column_for_video(video) {
            Some(column) => column.mark_watched(video).await,
            None => WatchOutcome::Ignored,
        }
    }

    /// Route a clear request to `channel`'s column.
    pub async fn clear_watched(&self, channel: ChannelId) -> ClearOutcome {
        match self.column(channel) {
            Some(column) => column.clear_watched().await,
            None => ClearOutcome::Nothing,
        }
    }

    /// Resolve the open target for `video`.
    pub async fn open_video(&self, video: VideoId) -> Option<OpenTarget> {
        let column = self.column_for_video(video)?;
        column.open(video).await
    }

    /// Destroy every column.
    pub fn destroy_all(&self) {
        let columns = std::mem::take(&mut *self.columns.borrow_mut());
        for column in &columns {
            column.destroy();
        }
        if !columns.is_empty() {
            self.publish_order();
        }
    }

    fn publish_order(&self) {
        let ids: Vec<ChannelId> = self.columns.borrow().iter().map(|column| column.id()).collect();
        self.order.set(ColumnOrder { ids });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::api::Method;
    use crate::testing::{Harness, envelope, ok, typed_channel, video};
    use serde_json::json;

    fn channels() -> Vec<Channel> {
        vec![
            typed_channel(1, "A", 2),
            typed_channel(2, "B", 0),
            typed_channel(3, "C", 1),
        ]
    }

    #[test]
    fn rebuild_orders_by_position_and_destroys_old_columns() {
        let harness = Harness::new();
        let board = ColumnBoard::new(harness.ctx.clone());
        board.rebuild(&channels());
        let first = board.column(ChannelId(2)).expect("column");
        assert_eq!(board.order(), vec![ChannelId(2), ChannelId(3), ChannelId(1)]);
        board.rebuild(&channels());
        assert!(!first.is_mounted());
        assert!(board.column(ChannelId(2)).expect("column").is_mounted());
    }

    #[test]
    fn move_clamps_and_publishes_order() {
        let harness = Harness::new();
        let board = ColumnBoard::new(harness.ctx.clone());
        board.rebuild(&channels());
        assert_eq!(board.move_column(ChannelId(2), 10), Some(2));
        assert_eq!(board.order(), vec![ChannelId(3), ChannelId(1), ChannelId(2)]);
        assert_eq!(board.move_column(ChannelId(9), 0), None);
    }

    #[test]
    fn add_and_remove_keep_position_order() {
        let harness = Harness::new();
        let board = ColumnBoard::new(harness.ctx.clone());
        board.rebuild(&channels());
        board.add(typed_channel(4, "D", 1));
        assert_eq!(
            board.order(),
            vec![ChannelId(2), ChannelId(3), ChannelId(4), ChannelId(1)]
        );
        let removed = board.column(ChannelId(3)).expect("column");
        assert!(board.remove(ChannelId(3)));
        assert!(!removed.is_mounted());
        assert!(!board.remove(ChannelId(3)));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn watch_requests_route_to_owning_column() {
        let harness = Harness::new();
        harness
            .transport
            .respond(Method::Get, "/channels/1/videos", envelope(json!([video(10, false)])));
        harness
            .transport
            .respond(Method::Get, "/channels/2/videos", envelope(json!([video(20, false)])));
        harness.transport.respond(Method::Post, "/videos/20/watch", ok());
        let board = ColumnBoard::new(harness.ctx.clone());
        board.rebuild(&[typed_channel(1, "A", 0), typed_channel(2, "B", 1)]);
        board.load_all().await;
        assert_eq!(board.mark_watched(VideoId(20)).await, WatchOutcome::Watched);
        assert_eq!(board.mark_watched(VideoId(99)).await, WatchOutcome::Ignored);
        let owner = board.column(ChannelId(2)).expect("column");
        assert!(owner.view().items[0].video.is_watched);
    }
}
