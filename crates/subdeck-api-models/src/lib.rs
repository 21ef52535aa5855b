#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::multiple_crate_versions)]
//! Shared HTTP DTOs for the SubDeck dashboard API.
//!
//! Every backend response is wrapped in an [`ApiEnvelope`]; the payload types
//! below mirror the JSON the server emits. Deserialisation is lenient where the
//! backend is: numeric columns stored as text and naive timestamps are accepted.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Response wrapper used by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiEnvelope<T> {
    /// Whether the server considers the call successful.
    pub success: bool,
    #[serde(default = "Option::default")]
    /// Payload, when the endpoint returns one.
    pub data: Option<T>,
    #[serde(default)]
    /// Server-provided failure message.
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Build a successful envelope.
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Build a failed envelope carrying `message`.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Split the envelope into payload or the server message.
    ///
    /// A falsy `success` is a failure regardless of the payload.
    ///
    /// # Errors
    /// Returns the server message (or an empty string) when `success` is false.
    pub fn into_result(self) -> Result<Option<T>, String> {
        if self.success {
            Ok(self.data)
        } else {
            Err(self.error.unwrap_or_default())
        }
    }
}

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

id_type!(
    /// Identifier of a personal channel (one dashboard column).
    ChannelId
);
id_type!(
    /// Identifier of a video row.
    VideoId
);
id_type!(
    /// Identifier of a subscription row.
    SubscriptionId
);
id_type!(
    /// Identifier of a recorded sync error.
    SyncErrorId
);

/// Cached per-channel counters attached to the channel list.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChannelStats {
    #[serde(default)]
    /// Videos known for the channel, watched or not.
    pub total_videos: u32,
    #[serde(default)]
    /// Unwatched videos at the time of the listing.
    pub unwatched_videos: u32,
    #[serde(default)]
    /// Active subscriptions feeding the channel.
    pub subscriptions: u32,
}

/// Personal channel rendered as a dashboard column.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Channel {
    /// Channel identifier.
    pub id: ChannelId,
    /// Display name.
    pub name: String,
    #[serde(default)]
    /// Display colour tag (CSS colour string).
    pub color: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    /// Column position; the board renders channels sorted by this value.
    pub order_position: i64,
    #[serde(default)]
    /// Account index used when opening videos of this channel.
    pub authuser_index: Option<u32>,
    #[serde(default)]
    /// Cached counters; may be stale relative to the loaded video list.
    pub stats: ChannelStats,
}

/// Partial channel update accepted by `PUT /channels/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChannelPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// New display name.
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// New colour tag.
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// New column position.
    pub order_position: Option<i64>,
}

impl ChannelPatch {
    /// Patch carrying only a new column position.
    #[must_use]
    pub const fn position(order_position: i64) -> Self {
        Self {
            name: None,
            color: None,
            order_position: Some(order_position),
        }
    }

    /// Apply the patch to a channel in place.
    pub fn apply_to(&self, channel: &mut Channel) {
        if let Some(name) = &self.name {
            channel.name.clone_from(name);
        }
        if let Some(color) = &self.color {
            channel.color = Some(color.clone());
        }
        if let Some(position) = self.order_position {
            channel.order_position = position;
        }
    }
}

/// Payload for `POST /channels`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewChannel {
    /// Display name.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional colour tag.
    pub color: Option<String>,
}

/// Video entry as listed under a channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Video {
    /// Video row identifier.
    pub id: VideoId,
    #[serde(default)]
    /// External YouTube identifier; immutable.
    pub youtube_video_id: String,
    #[serde(default)]
    /// Video title.
    pub title: String,
    #[serde(default)]
    /// Name of the publishing channel.
    pub channel_name: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    /// Publication timestamp.
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_u64")]
    /// Duration in seconds; `0` marks a live stream.
    pub duration: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    /// View counter.
    pub view_count: u64,
    #[serde(default, deserialize_with = "lenient_bool")]
    /// Whether the user marked the video watched.
    pub is_watched: bool,
    #[serde(default)]
    /// Account index owning the video; absent on list payloads.
    pub authuser_index: Option<u32>,
}

impl Video {
    /// Whether the entry carries the identifiers needed to render it.
    #[must_use]
    pub fn is_renderable(&self) -> bool {
        !self.youtube_video_id.is_empty()
    }
}

/// Subscription feeding a personal channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subscription {
    /// Subscription identifier.
    pub id: SubscriptionId,
    /// Owning personal channel.
    pub personal_channel_id: ChannelId,
    #[serde(default)]
    /// External channel identifier.
    pub youtube_channel_id: String,
    #[serde(default)]
    /// External channel name.
    pub channel_name: String,
    #[serde(default)]
    /// Thumbnail URL.
    pub channel_thumbnail: Option<String>,
    #[serde(default = "default_true", deserialize_with = "lenient_bool")]
    /// Whether the subscription is still followed.
    pub is_active: bool,
}

/// Partial subscription update accepted by `PUT /subscriptions/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubscriptionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Toggle the subscription.
    pub is_active: Option<bool>,
}

impl SubscriptionPatch {
    /// Apply the patch to a subscription in place.
    pub const fn apply_to(&self, subscription: &mut Subscription) {
        if let Some(active) = self.is_active {
            subscription.is_active = active;
        }
    }
}

/// Dashboard-wide counters from `GET /stats`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stats {
    #[serde(default)]
    /// Number of personal channels.
    pub total_channels: u32,
    #[serde(default)]
    /// Number of active subscriptions.
    pub total_subscriptions: u32,
    #[serde(default)]
    /// Number of known videos.
    pub total_videos: u32,
    #[serde(default)]
    /// Number of unwatched videos.
    pub unwatched_videos: u32,
}

/// Unresolved synchronisation failure from `GET /errors`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncErrorRecord {
    /// Error identifier.
    pub id: SyncErrorId,
    #[serde(default)]
    /// Affected personal channel.
    pub personal_channel_id: Option<ChannelId>,
    #[serde(default)]
    /// Affected subscription.
    pub subscription_id: Option<SubscriptionId>,
    #[serde(default)]
    /// External channel name.
    pub channel_name: Option<String>,
    /// Error category.
    pub error_type: String,
    /// Error message.
    pub error_message: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    /// When the failure happened.
    pub occurred_at: Option<DateTime<Utc>>,
}

/// User settings stored by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SettingsPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Active locale code.
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Periodic refresh toggle.
    pub auto_refresh: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Refresh period in minutes.
    pub refresh_interval: Option<u32>,
}

/// Body for `POST /sync/videos` and its per-channel variant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncVideosRequest {
    /// Maximum videos to fetch per subscription.
    pub max_videos: u32,
}

/// Body for `POST /auth/start`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OAuthStartRequest {
    /// Name for the channel being connected.
    pub channel_name: String,
}

/// Response of `POST /auth/start`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OAuthStart {
    /// Provider consent URL to open.
    pub auth_url: String,
    /// Anti-forgery state echoed back by the callback.
    pub state: String,
}

/// Empty acknowledgement payload for endpoints that return none.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ack {}

const fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Int(i64),
    Float(f64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagOrNumber {
    Flag(bool),
    Number(NumberOrText),
}

/// SQLite rows carry booleans as `0`/`1`.
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<FlagOrNumber>::deserialize(deserializer)?;
    Ok(match raw {
        Some(FlagOrNumber::Flag(flag)) => flag,
        Some(FlagOrNumber::Number(NumberOrText::Int(value))) => value != 0,
        Some(FlagOrNumber::Number(NumberOrText::Float(value))) => value.abs() > f64::EPSILON,
        Some(FlagOrNumber::Number(NumberOrText::Text(text))) => {
            matches!(text.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
        }
        None => false,
    })
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(match raw {
        Some(NumberOrText::Int(value)) => value,
        #[allow(clippy::cast_possible_truncation)]
        Some(NumberOrText::Float(value)) => value as i64,
        Some(NumberOrText::Text(text)) => text.trim().parse().unwrap_or_default(),
        None => 0,
    })
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_i64(deserializer).map(|value| u64::try_from(value).unwrap_or_default())
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

/// Parse the timestamp formats emitted by the backend (RFC 3339 or naive UTC).
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|naive| naive.and_utc())
}
