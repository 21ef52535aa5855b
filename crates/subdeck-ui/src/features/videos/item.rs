//! Presentation state for one video card.
//!
//! # Design
//! - The card is a pure function of its [`Video`] plus the pending flag owned
//!   by the column.
//! - The watch control only ever moves toward `Watched`; failures fall back to
//!   `Available`.

use crate::core::format::{
    ThumbnailQuality, fallback_watch_url, format_duration, format_view_count, thumbnail_url,
    watch_url,
};
use crate::core::notify::Notifier;
use crate::i18n::Localizer;
use crate::services::api::ApiClient;
use chrono::{DateTime, Utc};
use subdeck_api_models::Video;
use tracing::warn;

/// State of the "mark as watched" control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatchControl {
    /// Clickable.
    Available,
    /// Disabled while the request is in flight.
    Pending,
    /// Replaced by the disabled "watched" badge.
    Watched,
}

/// Render model for a video card.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoItem {
    /// Bound video.
    pub video: Video,
    /// Watch control state.
    pub control: WatchControl,
}

impl VideoItem {
    /// Derive the card from the video and whether a watch call is in flight.
    #[must_use]
    pub fn new(video: &Video, pending: bool) -> Self {
        let control = if video.is_watched {
            WatchControl::Watched
        } else if pending {
            WatchControl::Pending
        } else {
            WatchControl::Available
        };
        Self {
            video: video.clone(),
            control,
        }
    }

    /// Whether the watch action is exposed.
    #[must_use]
    pub fn can_watch(&self) -> bool {
        self.control == WatchControl::Available
    }

    /// Medium thumbnail URL.
    #[must_use]
    pub fn thumbnail(&self) -> String {
        thumbnail_url(&self.video.youtube_video_id, ThumbnailQuality::Medium)
    }

    /// Duration badge text.
    #[must_use]
    pub fn duration_label(&self) -> String {
        format_duration(self.video.duration)
    }

    /// Localized view counter.
    #[must_use]
    pub fn views_label(&self, i18n: &Localizer) -> String {
        i18n.t(
            "videos.views",
            &[("count", format_view_count(self.video.view_count))],
        )
    }

    /// Localized publication age, when known.
    #[must_use]
    pub fn published_label(&self, i18n: &Localizer, now: DateTime<Utc>) -> Option<String> {
        self.video
            .published_at
            .map(|published| i18n.relative_time(published, now))
    }
}

/// Where to navigate when a video is opened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenTarget {
    /// Destination URL.
    pub url: String,
    /// False when details could not be fetched and only local data was used.
    pub resolved: bool,
}

/// Resolve the watch URL for `video`, asking the backend for its account index.
pub async fn resolve_open_target(
    api: &ApiClient,
    notifier: &dyn Notifier,
    i18n: &Localizer,
    video: &Video,
) -> OpenTarget {
    match api.video(video.id).await {
        Ok(details) => {
            notifier.info(&i18n.text("toast.opened"));
            OpenTarget {
                url: watch_url(
                    &details.youtube_video_id,
                    details.authuser_index.unwrap_or_default(),
                ),
                resolved: true,
            }
        }
        Err(err) => {
            warn!(video_id = %video.id, error = %err, "falling back to local video link");
            notifier.error(&i18n.text("toast.open_failed"));
            OpenTarget {
                url: fallback_watch_url(video),
                resolved: false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::api::Method;
    use crate::testing::{FakeTransport, RecordingNotifier, envelope, typed_video};
    use serde_json::json;
    use std::rc::Rc;

    #[test]
    fn control_reflects_video_and_pending_flag() {
        let mut video = typed_video(1, "a", 10, false);
        assert!(VideoItem::new(&video, false).can_watch());
        assert_eq!(VideoItem::new(&video, true).control, WatchControl::Pending);
        video.is_watched = true;
        let watched = VideoItem::new(&video, true);
        assert_eq!(watched.control, WatchControl::Watched);
        assert!(!watched.can_watch());
    }

    #[test]
    fn labels_use_formatters() {
        let item = VideoItem::new(&typed_video(7, "a", 1_500, false), false);
        let i18n = Localizer::default();
        assert_eq!(item.views_label(&i18n), "1.5K views");
        assert_eq!(item.duration_label(), "1:07");
        assert!(item.thumbnail().ends_with("/yt7/mqdefault.jpg"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn open_uses_resolved_account_index() {
        let transport = Rc::new(FakeTransport::default());
        let notifier = Rc::new(RecordingNotifier::default());
        let api = ApiClient::new(transport.clone(), notifier.clone());
        let mut details = serde_json::to_value(typed_video(3, "a", 1, false)).expect("json");
        details["authuser_index"] = json!(2);
        transport.respond(Method::Get, "/videos/3", envelope(details));
        let video = typed_video(3, "a", 1, false);
        let i18n = Localizer::default();
        let target = resolve_open_target(&api, notifier.as_ref(), &i18n, &video).await;
        assert!(target.resolved);
        assert_eq!(target.url, "https://www.youtube.com/watch?v=yt3&authuser=2");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn open_falls_back_to_local_link() {
        let transport = Rc::new(FakeTransport::default());
        let notifier = Rc::new(RecordingNotifier::default());
        let api = ApiClient::new(transport.clone(), notifier.clone());
        transport.fail(Method::Get, "/videos/3");
        let video = typed_video(3, "a", 1, false);
        let i18n = Localizer::default();
        let target = resolve_open_target(&api, notifier.as_ref(), &i18n, &video).await;
        assert!(!target.resolved);
        assert_eq!(target.url, "https://www.youtube.com/watch?v=yt3");
        assert!(notifier.errors().contains(&"Failed to open video".to_string()));
    }
}
