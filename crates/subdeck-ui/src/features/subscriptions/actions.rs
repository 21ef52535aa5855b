//! Subscription operations backed by the API client.

use crate::features::context::AppContext;
use subdeck_api_models::{ChannelId, SubscriptionId, SubscriptionPatch};
use tracing::debug;

/// Reload subscriptions, all or for one channel; failure empties the list.
pub async fn load(ctx: &AppContext, channel: Option<ChannelId>) -> bool {
    let store = &ctx.stores.subscriptions;
    store.reduce_mut(|state| state.loading = true);
    let result = ctx.api.subscriptions(channel).await;
    let loaded = result.is_ok();
    let items = result.unwrap_or_default();
    debug!(count = items.len(), ?channel, "subscriptions loaded");
    store.reduce_mut(|state| {
        state.items = items;
        state.loading = false;
    });
    loaded
}

/// Save `patch` and merge it on success.
pub async fn update(ctx: &AppContext, id: SubscriptionId, patch: &SubscriptionPatch) -> bool {
    if ctx.api.update_subscription(id, patch).await.is_err() {
        return false;
    }
    ctx.stores.subscriptions.reduce_mut(|state| {
        state.apply_patch(id, patch);
    });
    ctx.notifier
        .success(&ctx.i18n.text("toast.subscription_updated"));
    true
}

/// Delete a subscription and drop it from the store.
pub async fn delete(ctx: &AppContext, id: SubscriptionId) -> bool {
    if ctx.api.delete_subscription(id).await.is_err() {
        return false;
    }
    ctx.stores.subscriptions.reduce_mut(|state| {
        state.remove(id);
    });
    ctx.notifier
        .success(&ctx.i18n.text("toast.subscription_deleted"));
    true
}

/// Ask the backend to resync subscriptions, then reload them.
pub async fn sync(ctx: &AppContext, channel: Option<ChannelId>) -> bool {
    if ctx.api.sync_subscriptions(channel).await.is_err() {
        return false;
    }
    load(ctx, channel).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::api::Method;
    use crate::testing::{Harness, envelope, ok};
    use serde_json::json;

    fn subs() -> serde_json::Value {
        json!([
            {"id": 1, "personal_channel_id": 4, "channel_name": "One", "is_active": true},
            {"id": 2, "personal_channel_id": 4, "channel_name": "Two", "is_active": true}
        ])
    }

    #[tokio::test(flavor = "current_thread")]
    async fn channel_scoped_load_and_sync() {
        let harness = Harness::new();
        harness
            .transport
            .respond(Method::Get, "/channels/4/subscriptions", envelope(subs()));
        harness
            .transport
            .respond(Method::Post, "/sync/channels/4/subscriptions", ok());
        assert!(sync(&harness.ctx, Some(ChannelId(4))).await);
        assert_eq!(harness.ctx.stores.subscriptions.get().items.len(), 2);
        assert_eq!(harness.transport.requests().len(), 2);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn update_and_delete_follow_backend() {
        let harness = Harness::new();
        harness
            .transport
            .respond(Method::Get, "/subscriptions", envelope(subs()));
        harness.transport.respond(Method::Put, "/subscriptions/1", ok());
        harness.transport.fail(Method::Delete, "/subscriptions/2");
        assert!(load(&harness.ctx, None).await);

        let patch = SubscriptionPatch {
            is_active: Some(false),
        };
        assert!(update(&harness.ctx, SubscriptionId(1), &patch).await);
        assert!(!delete(&harness.ctx, SubscriptionId(2)).await);

        let state = harness.ctx.stores.subscriptions.get();
        assert!(!state.items[0].is_active);
        assert_eq!(state.items.len(), 2);
        assert_eq!(
            harness.notifier.successes(),
            vec!["Subscription updated successfully"]
        );
    }
}
