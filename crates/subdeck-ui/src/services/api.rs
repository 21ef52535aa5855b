//! REST client for the dashboard backend.
//!
//! # Design
//! - Requests go through the [`Transport`] seam so the client runs against the
//!   browser `fetch` stack in the shell and a scripted fake in tests.
//! - Every failure is reported once (toast + `warn!`) here; callers receive a
//!   `Result` and only decide what state to keep.

use crate::core::error::ApiError;
use crate::core::notify::Notifier;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::rc::Rc;
use subdeck_api_models::{
    ApiEnvelope, Channel, ChannelId, ChannelPatch, NewChannel, OAuthStart, OAuthStartRequest,
    SettingsPayload, Stats, Subscription, SubscriptionId, SubscriptionPatch, SyncErrorRecord,
    SyncVideosRequest, Video, VideoId,
};
use tracing::{debug, warn};

/// HTTP verb.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    /// `GET`.
    Get,
    /// `POST`.
    Post,
    /// `PUT`.
    Put,
    /// `DELETE`.
    Delete,
}

impl Method {
    /// Upper-case verb name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// Request handed to a [`Transport`]; `path` is relative to the API base.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    /// Verb.
    pub method: Method,
    /// Path below the base URL, starting with `/`.
    pub path: String,
    /// Query parameters in insertion order.
    pub query: Vec<(String, String)>,
    /// JSON body, if any.
    pub body: Option<Value>,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    fn query(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    fn json(mut self, body: &impl Serialize) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|err| ApiError::Decode(err.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Path plus encoded query string.
    #[must_use]
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{query}", self.path)
    }
}

/// Status code and raw body returned by a [`Transport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status.
    pub status: u16,
    /// Response body text.
    pub body: String,
}

/// Wire-level request executor.
///
/// Implementations enforce the request timeout and map network failures to
/// [`ApiError::Transport`] or [`ApiError::Timeout`].
#[async_trait(?Send)]
pub trait Transport {
    /// Execute one request.
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError>;
}

/// Typed client for every backend endpoint.
#[derive(Clone)]
pub struct ApiClient {
    transport: Rc<dyn Transport>,
    notifier: Rc<dyn Notifier>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiClient")
    }
}

impl ApiClient {
    /// Build a client that reports failures through `notifier`.
    #[must_use]
    pub fn new(transport: Rc<dyn Transport>, notifier: Rc<dyn Notifier>) -> Self {
        Self {
            transport,
            notifier,
        }
    }

    async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<Option<T>, ApiError> {
        let label = format!("{} {}", request.method.as_str(), request.path);
        let outcome = self.exchange(request).await;
        if let Err(err) = &outcome {
            warn!(request = %label, error = %err, "api request failed");
            self.notifier.error(&err.user_message());
        } else {
            debug!(request = %label, "api request succeeded");
        }
        outcome
    }

    async fn exchange<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<Option<T>, ApiError> {
        let response = self.transport.send(request).await?;
        if !(200..300).contains(&response.status) {
            let message = serde_json::from_str::<ApiEnvelope<Value>>(&response.body)
                .ok()
                .and_then(|envelope| envelope.error)
                .unwrap_or_default();
            return Err(ApiError::Status {
                status: response.status,
                message,
            });
        }
        let envelope: ApiEnvelope<T> = serde_json::from_str(&response.body)
            .map_err(|err| ApiError::Decode(err.to_string()))?;
        envelope
            .into_result()
            .map_err(|message| ApiError::Rejected { message })
    }

    async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        match self.call(request).await? {
            Some(data) => Ok(data),
            None => {
                let err = ApiError::MissingData;
                warn!(error = %err, "api response carried no data");
                self.notifier.error(&err.user_message());
                Err(err)
            }
        }
    }

    async fn command(&self, request: ApiRequest) -> Result<(), ApiError> {
        self.call::<Value>(request).await.map(|_| ())
    }

    fn encode(
        &self,
        method: Method,
        path: String,
        body: &impl Serialize,
    ) -> Result<ApiRequest, ApiError> {
        ApiRequest::new(method, path).json(body).inspect_err(|err| {
            warn!(error = %err, "failed to encode request body");
            self.notifier.error(&err.user_message());
        })
    }

    /// `GET /channels`.
    pub async fn channels(&self) -> Result<Vec<Channel>, ApiError> {
        self.fetch(ApiRequest::new(Method::Get, "/channels")).await
    }

    /// `POST /channels`.
    pub async fn create_channel(&self, channel: &NewChannel) -> Result<Channel, ApiError> {
        let request = self.encode(Method::Post, "/channels".to_string(), channel)?;
        self.fetch(request).await
    }

    /// `PUT /channels/{id}`.
    pub async fn update_channel(&self, id: ChannelId, patch: &ChannelPatch) -> Result<(), ApiError> {
        let request = self.encode(Method::Put, format!("/channels/{id}"), patch)?;
        self.command(request).await
    }

    /// `DELETE /channels/{id}`.
    pub async fn delete_channel(&self, id: ChannelId) -> Result<(), ApiError> {
        self.command(ApiRequest::new(Method::Delete, format!("/channels/{id}")))
            .await
    }

    /// `GET /channels/{id}/videos?include_watched=`.
    pub async fn channel_videos(
        &self,
        id: ChannelId,
        include_watched: bool,
    ) -> Result<Vec<Video>, ApiError> {
        self.fetch(
            ApiRequest::new(Method::Get, format!("/channels/{id}/videos"))
                .query("include_watched", include_watched),
        )
        .await
    }

    /// `POST /videos/{id}/watch`.
    pub async fn mark_watched(&self, id: VideoId) -> Result<(), ApiError> {
        self.command(ApiRequest::new(Method::Post, format!("/videos/{id}/watch")))
            .await
    }

    /// `POST /channels/{id}/clear`.
    pub async fn clear_watched(&self, id: ChannelId) -> Result<(), ApiError> {
        self.command(ApiRequest::new(Method::Post, format!("/channels/{id}/clear")))
            .await
    }

    /// `GET /videos/{id}`.
    pub async fn video(&self, id: VideoId) -> Result<Video, ApiError> {
        self.fetch(ApiRequest::new(Method::Get, format!("/videos/{id}")))
            .await
    }

    /// `GET /subscriptions` or `GET /channels/{id}/subscriptions`.
    pub async fn subscriptions(
        &self,
        channel: Option<ChannelId>,
    ) -> Result<Vec<Subscription>, ApiError> {
        let path = channel.map_or_else(
            || "/subscriptions".to_string(),
            |id| format!("/channels/{id}/subscriptions"),
        );
        self.fetch(ApiRequest::new(Method::Get, path)).await
    }

    /// `PUT /subscriptions/{id}`.
    pub async fn update_subscription(
        &self,
        id: SubscriptionId,
        patch: &SubscriptionPatch,
    ) -> Result<(), ApiError> {
        let request = self.encode(Method::Put, format!("/subscriptions/{id}"), patch)?;
        self.command(request).await
    }

    /// `DELETE /subscriptions/{id}`.
    pub async fn delete_subscription(&self, id: SubscriptionId) -> Result<(), ApiError> {
        self.command(ApiRequest::new(
            Method::Delete,
            format!("/subscriptions/{id}"),
        ))
        .await
    }

    /// `POST /sync/subscriptions` or `POST /sync/channels/{id}/subscriptions`.
    pub async fn sync_subscriptions(&self, channel: Option<ChannelId>) -> Result<(), ApiError> {
        let path = channel.map_or_else(
            || "/sync/subscriptions".to_string(),
            |id| format!("/sync/channels/{id}/subscriptions"),
        );
        self.command(ApiRequest::new(Method::Post, path)).await
    }

    /// `POST /sync/videos` or `POST /sync/channels/{id}/videos` with `{max_videos}`.
    pub async fn sync_videos(
        &self,
        channel: Option<ChannelId>,
        max_videos: u32,
    ) -> Result<(), ApiError> {
        let path = channel.map_or_else(
            || "/sync/videos".to_string(),
            |id| format!("/sync/channels/{id}/videos"),
        );
        let request = self.encode(Method::Post, path, &SyncVideosRequest { max_videos })?;
        self.command(request).await
    }

    /// `GET /stats`.
    pub async fn stats(&self) -> Result<Stats, ApiError> {
        self.fetch(ApiRequest::new(Method::Get, "/stats")).await
    }

    /// `GET /errors`.
    pub async fn errors(&self) -> Result<Vec<SyncErrorRecord>, ApiError> {
        self.fetch(ApiRequest::new(Method::Get, "/errors")).await
    }

    /// `GET /settings`.
    pub async fn settings(&self) -> Result<SettingsPayload, ApiError> {
        self.fetch(ApiRequest::new(Method::Get, "/settings")).await
    }

    /// `PUT /settings`.
    pub async fn save_settings(&self, settings: &SettingsPayload) -> Result<(), ApiError> {
        let request = self.encode(Method::Put, "/settings".to_string(), settings)?;
        self.command(request).await
    }

    /// `GET /i18n/{locale}`.
    pub async fn load_translations(&self, locale: &str) -> Result<Value, ApiError> {
        self.fetch(ApiRequest::new(Method::Get, format!("/i18n/{locale}")))
            .await
    }

    /// `GET /i18n/{locale}`; any failure yields an empty object.
    pub async fn translations(&self, locale: &str) -> Value {
        self.load_translations(locale)
            .await
            .unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
    }

    /// `POST /auth/start` with `{channel_name}`.
    pub async fn start_oauth(&self, channel_name: &str) -> Result<OAuthStart, ApiError> {
        let request = self.encode(
                Method::Post,
                "/auth/start".to_string(),
                &OAuthStartRequest {
                    channel_name: channel_name.to_string(),
                },
            )?;
        self.fetch(request).await
    }

    /// `GET /auth/callback?state&code`.
    pub async fn complete_oauth(&self, state: &str, code: &str) -> Result<Channel, ApiError> {
        self.fetch(
            ApiRequest::new(Method::Get, "/auth/callback")
                .query("state", state)
                .query("code", code),
        )
        .await
    }
}
