//! Video cache operations backed by the API client.
//!
//! Columns go through these so the shared cache follows every load, watch
//! and clear.

use crate::core::error::ApiError;
use crate::features::context::AppContext;
use subdeck_api_models::{ChannelId, Video, VideoId};
use tracing::debug;

/// Fetch unwatched videos for `channel` and cache them on success.
///
/// # Errors
///
/// Returns the API error; the cached entry is left as it was.
pub async fn fetch_for_channel(
    ctx: &AppContext,
    channel: ChannelId,
) -> Result<Vec<Video>, ApiError> {
    let cache = &ctx.stores.videos;
    cache.reduce_mut(|state| state.set_loading(channel, true));
    let result = ctx.api.channel_videos(channel, false).await;
    cache.reduce_mut(|state| {
        if let Ok(videos) = &result {
            state.store(channel, videos);
        }
        state.set_loading(channel, false);
    });
    if let Ok(videos) = &result {
        debug!(channel_id = %channel, count = videos.len(), "video cache loaded");
    }
    result
}

/// Load unwatched videos for `channel` into the cache; failures yield an empty list.
pub async fn load_for_channel(ctx: &AppContext, channel: ChannelId) -> Vec<Video> {
    fetch_for_channel(ctx, channel).await.unwrap_or_default()
}

/// Mark `video` watched and drop it from every cached channel.
///
/// Both outcomes are reported with a toast.
pub async fn mark_watched(ctx: &AppContext, video: VideoId) -> bool {
    if ctx.api.mark_watched(video).await.is_err() {
        ctx.notifier.error(&ctx.i18n.text("toast.watch_failed"));
        return false;
    }
    ctx.stores.videos.reduce_mut(|state| {
        state.remove_video(video);
    });
    ctx.notifier.success(&ctx.i18n.text("toast.marked_watched"));
    true
}

/// Clear watched videos server-side and reload the channel's cache entry.
pub async fn clear_watched(ctx: &AppContext, channel: ChannelId) -> bool {
    if ctx.api.clear_watched(channel).await.is_err() {
        return false;
    }
    load_for_channel(ctx, channel).await;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::api::Method;
    use crate::testing::{Harness, envelope, ok, video};
    use serde_json::json;

    #[tokio::test(flavor = "current_thread")]
    async fn failed_load_yields_empty_list() {
        let harness = Harness::new();
        harness.transport.fail(Method::Get, "/channels/1/videos");
        let videos = load_for_channel(&harness.ctx, ChannelId(1)).await;
        assert!(videos.is_empty());
        assert!(!harness.ctx.stores.videos.get().is_loading(ChannelId(1)));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn mark_watched_removes_from_cache() {
        let harness = Harness::new();
        harness.transport.respond(
            Method::Get,
            "/channels/1/videos",
            envelope(json!([video(5, false), video(6, false)])),
        );
        harness.transport.respond(Method::Post, "/videos/5/watch", ok());
        load_for_channel(&harness.ctx, ChannelId(1)).await;
        assert!(mark_watched(&harness.ctx, VideoId(5)).await);
        let cached = harness.ctx.stores.videos.get();
        assert_eq!(cached.videos(ChannelId(1)).len(), 1);
        assert_eq!(harness.notifier.successes(), vec!["Video marked as watched"]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn failed_watch_keeps_cache_and_reports() {
        let harness = Harness::new();
        harness
            .transport
            .respond(Method::Get, "/channels/1/videos", envelope(json!([video(5, false)])));
        harness.transport.fail(Method::Post, "/videos/5/watch");
        load_for_channel(&harness.ctx, ChannelId(1)).await;
        assert!(!mark_watched(&harness.ctx, VideoId(5)).await);
        assert_eq!(harness.ctx.stores.videos.get().videos(ChannelId(1)).len(), 1);
        assert_eq!(harness.notifier.errors(), vec!["Failed to mark video as watched"]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn clear_reloads_channel() {
        let harness = Harness::new();
        harness.transport.respond(Method::Post, "/channels/1/clear", ok());
        harness
            .transport
            .respond(Method::Get, "/channels/1/videos", envelope(json!([])));
        assert!(clear_watched(&harness.ctx, ChannelId(1)).await);
        assert_eq!(
            harness.transport.requests_to(Method::Get, "/channels/1/videos").len(),
            1
        );
    }
}
