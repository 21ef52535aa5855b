//! Client-side configuration knobs.
//!
//! # Design
//! - Every timing constant used by the UI lives here so tests can shrink them.
//! - Values deserialize with defaults; a partial config is valid.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Static configuration for one app instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// REST base path.
    pub base_url: String,
    /// Fixed timeout applied to every request.
    pub request_timeout_ms: u32,
    /// Quiet period before a search re-render.
    pub search_debounce_ms: u32,
    /// Lifetime of a toast before it dismisses itself.
    pub toast_duration_ms: u32,
    /// Touch movement needed before a press becomes a drag.
    pub touch_drag_threshold_px: f64,
    /// How long an assistive announcement stays in the live region.
    pub announcement_clear_ms: u32,
    /// Default `max_videos` sent with sync requests.
    pub default_max_videos: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "/api".to_string(),
            request_timeout_ms: 30_000,
            search_debounce_ms: 300,
            toast_duration_ms: 3_000,
            touch_drag_threshold_px: 10.0,
            announcement_clear_ms: 1_000,
            default_max_videos: 5,
        }
    }
}

impl ClientConfig {
    /// Request timeout as a [`Duration`].
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.request_timeout_ms))
    }

    /// Search debounce window as a [`Duration`].
    #[must_use]
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(u64::from(self.search_debounce_ms))
    }

    /// Toast lifetime as a [`Duration`].
    #[must_use]
    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.toast_duration_ms))
    }

    /// Announcement lifetime as a [`Duration`].
    #[must_use]
    pub fn announcement_clear(&self) -> Duration {
        Duration::from_millis(u64::from(self.announcement_clear_ms))
    }
}
