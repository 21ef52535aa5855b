//! Display formatting for video metadata and links.

use chrono::{DateTime, Utc};
use subdeck_api_models::Video;

/// Thumbnail size variants served by the image CDN.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ThumbnailQuality {
    /// 120x90.
    Default,
    /// 320x180.
    #[default]
    Medium,
    /// 480x360.
    High,
    /// Largest available.
    MaxRes,
}

/// Thumbnail URL for an external video id.
#[must_use]
pub fn thumbnail_url(youtube_video_id: &str, quality: ThumbnailQuality) -> String {
    let file = match quality {
        ThumbnailQuality::Default => "default",
        ThumbnailQuality::Medium => "mqdefault",
        ThumbnailQuality::High => "hqdefault",
        ThumbnailQuality::MaxRes => "maxresdefault",
    };
    format!("https://img.youtube.com/vi/{youtube_video_id}/{file}.jpg")
}

/// Watch URL bound to an account index.
#[must_use]
pub fn watch_url(youtube_video_id: &str, authuser: u32) -> String {
    format!(
        "https://www.youtube.com/watch?v={}&authuser={authuser}",
        urlencoding::encode(youtube_video_id)
    )
}

/// Watch URL built from local data only.
#[must_use]
pub fn fallback_watch_url(video: &Video) -> String {
    format!(
        "https://www.youtube.com/watch?v={}",
        urlencoding::encode(&video.youtube_video_id)
    )
}

/// `h:mm:ss` / `m:ss`, or `LIVE` for zero-length streams.
#[must_use]
pub fn format_duration(seconds: u64) -> String {
    if seconds == 0 {
        return "LIVE".to_string();
    }
    let hours = seconds / 3_600;
    let minutes = (seconds % 3_600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

/// Compact view counter: `1.2M`, `3.4K`, or the raw number.
#[must_use]
pub fn format_view_count(count: u64) -> String {
    if count >= 1_000_000 {
        format!("{}M", one_decimal(count, 1_000_000))
    } else if count >= 1_000 {
        format!("{}K", one_decimal(count, 1_000))
    } else {
        count.to_string()
    }
}

fn one_decimal(count: u64, unit: u64) -> String {
    let tenths = (count.saturating_mul(10) + unit / 2) / unit;
    format!("{}.{}", tenths / 10, tenths % 10)
}

/// Integer with thousands separators.
#[must_use]
pub fn format_number(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

/// Coarse relative-time bucket for "published ... ago" labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelativeTime {
    /// Less than a minute ago (or in the future).
    JustNow,
    /// Minutes ago.
    Minutes(i64),
    /// Hours ago.
    Hours(i64),
    /// Days ago.
    Days(i64),
    /// Months ago (30-day months).
    Months(i64),
    /// Years ago (365-day years).
    Years(i64),
}

impl RelativeTime {
    /// Bucket the distance between `then` and `now`.
    #[must_use]
    pub fn between(then: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let elapsed = now.signed_duration_since(then);
        let minutes = elapsed.num_minutes();
        if minutes < 1 {
            Self::JustNow
        } else if minutes < 60 {
            Self::Minutes(minutes)
        } else if elapsed.num_hours() < 24 {
            Self::Hours(elapsed.num_hours())
        } else if elapsed.num_days() < 30 {
            Self::Days(elapsed.num_days())
        } else if elapsed.num_days() < 365 {
            Self::Months(elapsed.num_days() / 30)
        } else {
            Self::Years(elapsed.num_days() / 365)
        }
    }

    /// Translation key and count for the bucket.
    #[must_use]
    pub const fn key(self) -> (&'static str, i64) {
        match self {
            Self::JustNow => ("time.just_now", 0),
            Self::Minutes(n) => ("time.minutes_ago", n),
            Self::Hours(n) => ("time.hours_ago", n),
            Self::Days(n) => ("time.days_ago", n),
            Self::Months(n) => ("time.months_ago", n),
            Self::Years(n) => ("time.years_ago", n),
        }
    }
}
