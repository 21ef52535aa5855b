//! OAuth channel-linking flow state.
//!
//! The shell opens `auth_url` in a popup and reports back the callback
//! parameters, or a cancel when the popup closes first.

use crate::core::notify::ToastKind;
use crate::features::context::AppContext;
use subdeck_api_models::Channel;
use tracing::{info, warn};
use yewdux::store::Store;

/// Flow progress.
#[derive(Clone, Debug, Default, PartialEq, Eq, Store)]
pub struct OAuthState {
    /// A popup is open.
    pub in_progress: bool,
    /// State token expected back from the callback.
    pub pending_state: Option<String>,
    /// Authorization URL for the popup.
    pub auth_url: Option<String>,
}

/// Begin linking a channel; returns the URL to open.
pub async fn start(ctx: &AppContext, channel_name: &str) -> Option<String> {
    let started = ctx.api.start_oauth(channel_name).await.ok()?;
    ctx.stores.oauth.set(OAuthState {
        in_progress: true,
        pending_state: Some(started.state),
        auth_url: Some(started.auth_url.clone()),
    });
    Some(started.auth_url)
}

/// Finish the flow with the callback parameters.
///
/// Only the pending state token is accepted. The returned channel is added to
/// the channel store.
pub async fn complete(ctx: &AppContext, state: &str, code: &str) -> Option<Channel> {
    let expected = ctx.stores.oauth.get().pending_state.clone();
    if expected.as_deref() != Some(state) {
        warn!("oauth callback with unexpected state ignored");
        return None;
    }
    let result = ctx.api.complete_oauth(state, code).await;
    ctx.stores.oauth.set(OAuthState::default());
    let Ok(channel) = result else {
        ctx.notifier.error(&ctx.i18n.text("toast.oauth_failed"));
        return None;
    };
    info!(channel_id = %channel.id, "channel linked");
    ctx.stores
        .channels
        .reduce_mut(|channels| channels.upsert(channel.clone()));
    ctx.notifier.success(&ctx.i18n.text("toast.oauth_added"));
    Some(channel)
}

/// The popup closed before the callback.
pub fn cancel(ctx: &AppContext) {
    if !ctx.stores.oauth.get().in_progress {
        return;
    }
    ctx.stores.oauth.set(OAuthState::default());
    ctx.notifier.notify(
        &ctx.i18n.text("toast.oauth_cancelled"),
        ToastKind::Warning,
    );
}
