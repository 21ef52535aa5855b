//! Channel operations backed by the API client.

use crate::features::context::AppContext;
use subdeck_api_models::{Channel, ChannelId, ChannelPatch, NewChannel};
use tracing::debug;

/// Reload the channel list; a failed request leaves the list empty.
pub async fn load(ctx: &AppContext) -> Vec<Channel> {
    let store = &ctx.stores.channels;
    store.reduce_mut(|state| state.loading = true);
    let channels = ctx.api.channels().await.unwrap_or_default();
    store.reduce_mut(|state| {
        state.replace(channels);
        state.loading = false;
    });
    let items = store.get().items().to_vec();
    debug!(count = items.len(), "channels loaded");
    items
}

/// Create a channel and add it to the store.
pub async fn add(ctx: &AppContext, channel: &NewChannel) -> Option<Channel> {
    let created = ctx.api.create_channel(channel).await.ok()?;
    ctx.stores.channels.reduce_mut(|state| state.upsert(created.clone()));
    ctx.notifier.success(&ctx.i18n.text("toast.channel_added"));
    Some(created)
}

/// Save `patch` and merge it into the stored channel.
pub async fn update(ctx: &AppContext, id: ChannelId, patch: &ChannelPatch) -> bool {
    if ctx.api.update_channel(id, patch).await.is_err() {
        return false;
    }
    ctx.stores.channels.reduce_mut(|state| {
        state.apply_patch(id, patch);
    });
    ctx.notifier.success(&ctx.i18n.text("toast.channel_updated"));
    true
}

/// Delete a channel and drop it from the store and the video cache.
pub async fn delete(ctx: &AppContext, id: ChannelId) -> bool {
    if ctx.api.delete_channel(id).await.is_err() {
        return false;
    }
    ctx.stores.channels.reduce_mut(|state| {
        state.remove(id);
    });
    ctx.stores.videos.reduce_mut(|state| state.evict(id));
    ctx.notifier.success(&ctx.i18n.text("toast.channel_deleted"));
    true
}
