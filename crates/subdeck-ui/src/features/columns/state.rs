//! Column view-state and its derived render model.

use crate::features::columns::logic::{SortSpec, visible_videos};
use crate::features::videos::item::VideoItem;
use crate::i18n::Localizer;
use std::collections::BTreeSet;
use subdeck_api_models::{Channel, Video, VideoId};
use tracing::warn;
use yewdux::store::Store;

/// Load lifecycle of a column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadPhase {
    /// Nothing in flight.
    #[default]
    Idle,
    /// A load is in flight.
    Loading,
    /// The last load failed; the view offers a retry.
    Failed,
}

/// Which empty placeholder to show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmptyState {
    /// The channel has no videos.
    NoVideos,
    /// Videos exist but none match the search.
    NoMatches,
}

/// Mutable state owned by one column.
///
/// The default value is an unmounted placeholder with no channel bound.
#[derive(Clone, Debug, Default, PartialEq, Store)]
pub struct ColumnState {
    /// Bound channel.
    pub channel: Channel,
    /// Videos in load order.
    pub videos: Vec<Video>,
    /// Raw text in the search box.
    pub search_input: String,
    /// Normalized term the rendered list is filtered by.
    pub search_term: String,
    /// Active sort.
    pub sort: SortSpec,
    /// Load lifecycle.
    pub phase: LoadPhase,
    /// Videos with a watch request in flight.
    pub pending: BTreeSet<VideoId>,
    /// False once the column has been destroyed.
    pub mounted: bool,
}

impl ColumnState {
    /// Fresh, mounted state for `channel`.
    #[must_use]
    pub fn new(channel: Channel) -> Self {
        Self {
            channel,
            videos: Vec::new(),
            search_input: String::new(),
            search_term: String::new(),
            sort: SortSpec::default(),
            phase: LoadPhase::Idle,
            pending: BTreeSet::new(),
            mounted: true,
        }
    }

    /// Look up a video by id.
    #[must_use]
    pub fn find(&self, id: VideoId) -> Option<&Video> {
        self.videos.iter().find(|video| video.id == id)
    }

    /// Unwatched videos in the whole list.
    #[must_use]
    pub fn unwatched_count(&self) -> usize {
        self.videos.iter().filter(|video| !video.is_watched).count()
    }

    /// Ids of videos currently marked watched.
    #[must_use]
    pub fn watched_ids(&self) -> BTreeSet<VideoId> {
        self.videos
            .iter()
            .filter(|video| video.is_watched)
            .map(|video| video.id)
            .collect()
    }

    /// Flip `id` to watched; false when the video is gone.
    pub fn mark_watched(&mut self, id: VideoId) -> bool {
        self.videos
            .iter_mut()
            .find(|video| video.id == id)
            .map(|video| video.is_watched = true)
            .is_some()
    }

    /// Remove every video in `ids`.
    pub fn remove_videos(&mut self, ids: &BTreeSet<VideoId>) -> usize {
        let before = self.videos.len();
        self.videos.retain(|video| !ids.contains(&video.id));
        before - self.videos.len()
    }

    /// Drop children and mark the column detached.
    pub fn release(&mut self) {
        self.videos.clear();
        self.pending.clear();
        self.phase = LoadPhase::Idle;
        self.mounted = false;
    }

    /// Derive the render model.
    #[must_use]
    pub fn view(&self) -> ColumnView {
        let visible = visible_videos(&self.videos, &self.search_term, self.sort);
        let searching = !self.search_term.is_empty();
        let unwatched = if searching {
            visible.iter().filter(|video| !video.is_watched).count()
        } else {
            self.unwatched_count()
        };
        let items: Vec<VideoItem> = visible
            .into_iter()
            .filter(|video| {
                let renderable = video.is_renderable();
                if !renderable {
                    warn!(channel_id = %self.channel.id, video_id = %video.id, "skipping video without external id");
                }
                renderable
            })
            .map(|video| VideoItem::new(video, self.pending.contains(&video.id)))
            .collect();
        let empty = match (items.is_empty(), self.videos.is_empty()) {
            (false, _) => None,
            (true, true) => Some(EmptyState::NoVideos),
            (true, false) => Some(EmptyState::NoMatches),
        };
        ColumnView {
            items,
            unwatched,
            total: self.videos.len(),
            searching,
            clear_count: self.unwatched_count(),
            empty,
            phase: self.phase,
        }
    }
}

/// Everything a column view renders.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnView {
    /// Cards in display order.
    pub items: Vec<VideoItem>,
    /// Unwatched count for the header (filtered while searching).
    pub unwatched: usize,
    /// Size of the whole list.
    pub total: usize,
    /// Whether a search term is applied.
    pub searching: bool,
    /// Count shown on the clear button; disabled at zero.
    pub clear_count: usize,
    /// Placeholder to show instead of cards.
    pub empty: Option<EmptyState>,
    /// Load lifecycle.
    pub phase: LoadPhase,
}

impl ColumnView {
    /// Header counter text.
    #[must_use]
    pub fn header_label(&self, i18n: &Localizer) -> String {
        if self.searching {
            i18n.t(
                "videos.unwatched_filtered",
                &[
                    ("count", self.unwatched.to_string()),
                    ("total", self.total.to_string()),
                ],
            )
        } else {
            i18n.t("videos.unwatched", &[("count", self.unwatched.to_string())])
        }
    }

    /// Whether the clear button is enabled.
    #[must_use]
    pub const fn can_clear(&self) -> bool {
        self.clear_count > 0
    }
}
