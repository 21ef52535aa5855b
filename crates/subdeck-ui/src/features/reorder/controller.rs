//! Applies reorder effects to the board and persists the new order.

use crate::features::columns::board::ColumnBoard;
use crate::features::context::AppContext;
use crate::features::reorder::announce::Announcer;
use crate::features::reorder::geometry::ReorderLayout;
use crate::features::reorder::session::{
    Announcement, ReorderEffect, ReorderInput, ReorderState, ReorderVisuals, step,
};
use std::fmt;
use std::rc::Rc;
use subdeck_api_models::ChannelPatch;
use tracing::{debug, info, warn};
use yewdux::prelude::Dispatch;

/// Drives one board's reorder sessions.
pub struct ReorderController {
    ctx: AppContext,
    board: Rc<ColumnBoard>,
    state: Dispatch<ReorderState>,
    announcer: Announcer,
}

impl fmt::Debug for ReorderController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReorderController")
            .field("state", &*self.state.get())
            .finish_non_exhaustive()
    }
}

impl ReorderController {
    /// Controller for `board`, announcing into the context's live region.
    #[must_use]
    pub fn new(ctx: AppContext, board: Rc<ColumnBoard>) -> Self {
        let announcer = Announcer::new(
            ctx.stores.announcement.clone(),
            ctx.scheduler.clone(),
            ctx.i18n.clone(),
            ctx.config.announcement_clear(),
        );
        let state = Dispatch::new(ctx.stores.context());
        Self {
            ctx,
            board,
            state,
            announcer,
        }
    }

    /// Current session state.
    #[must_use]
    pub fn state(&self) -> ReorderState {
        (*self.state.get()).clone()
    }

    /// Current transient visuals.
    #[must_use]
    pub fn visuals(&self) -> ReorderVisuals {
        self.state.get().visuals()
    }

    /// Feed one interaction measured against `layout`.
    pub fn handle(&self, input: &ReorderInput, layout: &ReorderLayout) {
        let current = self.state.get();
        let threshold = self.ctx.config.touch_drag_threshold_px;
        let (next, effects) = step(&current, input, layout, threshold);
        if *current != next {
            self.state.set(next);
        }
        for effect in effects {
            self.apply(effect);
        }
    }

    /// Abandon any session without side effects.
    pub fn reset(&self) {
        if !self.state.get().is_idle() {
            self.state.set(ReorderState::Idle);
        }
    }

    fn apply(&self, effect: ReorderEffect) {
        match effect {
            ReorderEffect::Move { channel, to } => {
                self.board.move_column(channel, to);
            }
            ReorderEffect::Persist => {
                let ctx = self.ctx.clone();
                let board = self.board.clone();
                self.ctx.spawner.spawn(Box::pin(async move {
                    persist_order(&ctx, &board).await;
                }));
            }
            ReorderEffect::Announce(announcement) => {
                if let Announcement::Moved { position, .. } = &announcement {
                    self.ctx.notifier.info(&self.ctx.i18n.t(
                        "toast.column_moved",
                        &[("position", position.to_string())],
                    ));
                }
                self.announcer.announce(&announcement);
            }
        }
    }
}

/// Write the board's display order into channel positions and save them.
///
/// Positions become `0..N-1` in display order. Only channels whose position
/// changed are sent, one request at a time; the first failure stops the run
/// and earlier saves stay committed. An unchanged order saves nothing and
/// stays quiet.
pub async fn persist_order(ctx: &AppContext, board: &ColumnBoard) -> bool {
    let order = board.order();
    let mut changed = Vec::new();
    ctx.stores
        .channels
        .reduce_mut(|state| changed = state.assign_positions(&order));
    if changed.is_empty() {
        debug!("column order unchanged");
        return true;
    }
    for (channel, position) in &changed {
        board.update_channel(*channel, &ChannelPatch::position(*position));
    }
    let mut saved = 0_usize;
    for (channel, position) in &changed {
        let patch = ChannelPatch::position(*position);
        if ctx.api.update_channel(*channel, &patch).await.is_err() {
            warn!(
                channel_id = %channel,
                position,
                saved,
                remaining = changed.len() - saved,
                "column order save stopped"
            );
            ctx.notifier.error(&ctx.i18n.text("toast.order_failed"));
            return false;
        }
        saved += 1;
    }
    info!(saved, "column order saved");
    ctx.notifier.success(&ctx.i18n.text("toast.order_saved"));
    true
}
