//! Unwatched-video cache keyed by channel.

use std::collections::{BTreeMap, BTreeSet};
use subdeck_api_models::{ChannelId, Video, VideoId};
use yewdux::store::Store;

/// Cached unwatched videos per channel.
#[derive(Clone, Debug, Default, PartialEq, Store)]
pub struct VideoCacheState {
    by_channel: BTreeMap<ChannelId, Vec<Video>>,
    loading: BTreeSet<ChannelId>,
}

impl VideoCacheState {
    /// Cached list for `channel`, empty when never loaded.
    #[must_use]
    pub fn videos(&self, channel: ChannelId) -> &[Video] {
        self.by_channel
            .get(&channel)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether a load for `channel` is in flight.
    #[must_use]
    pub fn is_loading(&self, channel: ChannelId) -> bool {
        self.loading.contains(&channel)
    }

    /// Unwatched videos across every cached channel.
    #[must_use]
    pub fn unwatched_total(&self) -> usize {
        self.by_channel
            .values()
            .flatten()
            .filter(|video| !video.is_watched)
            .count()
    }

    /// Flag a load as started or finished.
    pub fn set_loading(&mut self, channel: ChannelId, loading: bool) {
        if loading {
            self.loading.insert(channel);
        } else {
            self.loading.remove(&channel);
        }
    }

    /// Replace the cached list for `channel`, keeping unwatched entries only.
    pub fn store(&mut self, channel: ChannelId, videos: &[Video]) {
        let unwatched = videos
            .iter()
            .filter(|video| !video.is_watched)
            .cloned()
            .collect();
        self.by_channel.insert(channel, unwatched);
    }

    /// Drop `video` from every cached channel.
    pub fn remove_video(&mut self, video: VideoId) -> bool {
        let mut removed = false;
        for videos in self.by_channel.values_mut() {
            let before = videos.len();
            videos.retain(|entry| entry.id != video);
            removed |= videos.len() != before;
        }
        removed
    }

    /// Forget a channel entirely.
    pub fn evict(&mut self, channel: ChannelId) {
        self.by_channel.remove(&channel);
        self.loading.remove(&channel);
    }
}
