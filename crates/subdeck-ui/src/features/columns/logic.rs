//! Pure filter and sort helpers for column video lists.

use std::cmp::Ordering;
use subdeck_api_models::Video;

/// Field a column sorts by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// Publication time.
    Date,
    /// Title, case-insensitive.
    Title,
    /// View count.
    Views,
    /// Length in seconds.
    Duration,
}

impl SortKey {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Title => "title",
            Self::Views => "views",
            Self::Duration => "duration",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "date" => Some(Self::Date),
            "title" => Some(Self::Title),
            "views" => Some(Self::Views),
            "duration" => Some(Self::Duration),
            _ => None,
        }
    }
}

/// Sort direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// Smallest first.
    Asc,
    /// Largest first.
    Desc,
}

/// Sort key plus direction; defaults to newest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SortSpec {
    /// Field.
    pub key: SortKey,
    /// Direction.
    pub order: SortOrder,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::new(SortKey::Date, SortOrder::Desc)
    }
}

impl SortSpec {
    /// Options offered by the sort selector, in display order.
    pub const OPTIONS: [Self; 8] = [
        Self::new(SortKey::Date, SortOrder::Desc),
        Self::new(SortKey::Date, SortOrder::Asc),
        Self::new(SortKey::Title, SortOrder::Asc),
        Self::new(SortKey::Title, SortOrder::Desc),
        Self::new(SortKey::Views, SortOrder::Desc),
        Self::new(SortKey::Views, SortOrder::Asc),
        Self::new(SortKey::Duration, SortOrder::Desc),
        Self::new(SortKey::Duration, SortOrder::Asc),
    ];

    /// Build a spec.
    #[must_use]
    pub const fn new(key: SortKey, order: SortOrder) -> Self {
        Self { key, order }
    }

    /// Parse a selector value such as `views-desc`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let (key, order) = raw.trim().split_once('-')?;
        let order = match order {
            "asc" => SortOrder::Asc,
            "desc" => SortOrder::Desc,
            _ => return None,
        };
        Some(Self::new(SortKey::parse(key)?, order))
    }

    /// Selector value, the inverse of [`SortSpec::parse`].
    #[must_use]
    pub fn value(self) -> String {
        let order = match self.order {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        };
        format!("{}-{order}", self.key.as_str())
    }

    /// Translation key for the selector label.
    #[must_use]
    pub const fn label_key(self) -> &'static str {
        match (self.key, self.order) {
            (SortKey::Date, SortOrder::Desc) => "videos.sort_date_newest",
            (SortKey::Date, SortOrder::Asc) => "videos.sort_date_oldest",
            (SortKey::Title, SortOrder::Asc) => "videos.sort_title_az",
            (SortKey::Title, SortOrder::Desc) => "videos.sort_title_za",
            (SortKey::Views, SortOrder::Desc) => "videos.sort_views_most",
            (SortKey::Views, SortOrder::Asc) => "videos.sort_views_least",
            (SortKey::Duration, SortOrder::Desc) => "videos.sort_duration_longest",
            (SortKey::Duration, SortOrder::Asc) => "videos.sort_duration_shortest",
        }
    }

    fn compare(self, a: &Video, b: &Video) -> Ordering {
        let ascending = match self.key {
            SortKey::Date => a.published_at.cmp(&b.published_at),
            SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            SortKey::Views => a.view_count.cmp(&b.view_count),
            SortKey::Duration => a.duration.cmp(&b.duration),
        };
        match self.order {
            SortOrder::Asc => ascending,
            SortOrder::Desc => ascending.reverse(),
        }
    }
}

/// Normalize raw search input into the folded term used for matching.
#[must_use]
pub fn normalize_term(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Case-insensitive substring match on title and channel name.
///
/// `term` must already be normalized.
#[must_use]
pub fn matches_search(video: &Video, term: &str) -> bool {
    term.is_empty()
        || video.title.to_lowercase().contains(term)
        || video.channel_name.to_lowercase().contains(term)
}

/// Filter by `term` and sort by `spec`; ties keep load order.
#[must_use]
pub fn visible_videos<'a>(videos: &'a [Video], term: &str, spec: SortSpec) -> Vec<&'a Video> {
    let mut visible: Vec<&Video> = videos
        .iter()
        .filter(|video| matches_search(video, term))
        .collect();
    visible.sort_by(|a, b| spec.compare(a, b));
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::typed_video;

    fn sample() -> Vec<Video> {
        vec![
            typed_video(1, "Rust async deep dive", 500, false),
            typed_video(2, "Cooking pasta", 1_500, false),
            typed_video(3, "rust macros", 50, true),
            typed_video(4, "Trail running", 9_000, false),
        ]
    }

    fn ids(videos: &[&Video]) -> Vec<i64> {
        videos.iter().map(|video| video.id.0).collect()
    }

    #[test]
    fn parse_round_trips_selector_values() {
        for spec in SortSpec::OPTIONS {
            assert_eq!(SortSpec::parse(&spec.value()), Some(spec));
        }
        assert_eq!(SortSpec::parse("views"), None);
        assert_eq!(SortSpec::parse("likes-desc"), None);
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_channel() {
        let videos = sample();
        let hits = visible_videos(&videos, &normalize_term("  RUST "), SortSpec::default());
        assert_eq!(hits.len(), 2);
        let by_channel = visible_videos(&videos, "uploader", SortSpec::default());
        assert_eq!(by_channel.len(), videos.len());
    }

    #[test]
    fn narrowing_the_term_never_grows_results() {
        let videos = sample();
        let mut previous = usize::MAX;
        for term in ["", "r", "ru", "run", "runn", "running"] {
            let count = visible_videos(&videos, term, SortSpec::default()).len();
            assert!(count <= previous, "{term} grew the result set");
            previous = count;
        }
    }

    #[test]
    fn views_desc_is_reverse_of_asc() {
        let videos = sample();
        let desc = ids(&visible_videos(
            &videos,
            "",
            SortSpec::new(SortKey::Views, SortOrder::Desc),
        ));
        let mut asc = ids(&visible_videos(
            &videos,
            "",
            SortSpec::new(SortKey::Views, SortOrder::Asc),
        ));
        asc.reverse();
        assert_eq!(desc, vec![4, 2, 1, 3]);
        assert_eq!(desc, asc);
    }

    #[test]
    fn title_sort_ignores_case() {
        let videos = sample();
        let sorted = visible_videos(&videos, "", SortSpec::new(SortKey::Title, SortOrder::Asc));
        assert_eq!(ids(&sorted), vec![2, 1, 3, 4]);
    }

    #[test]
    fn ties_keep_load_order() {
        let videos = vec![
            typed_video(1, "a", 10, false),
            typed_video(2, "b", 10, false),
            typed_video(3, "c", 10, false),
        ];
        let sorted = visible_videos(&videos, "", SortSpec::new(SortKey::Views, SortOrder::Desc));
        assert_eq!(ids(&sorted), vec![1, 2, 3]);
    }
}
