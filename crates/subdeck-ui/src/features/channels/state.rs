//! Channel list slice.

use subdeck_api_models::{Channel, ChannelId, ChannelPatch};
use yewdux::store::Store;

/// Channels sorted by `order_position`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Store)]
pub struct ChannelsState {
    items: Vec<Channel>,
    /// A list request is in flight.
    pub loading: bool,
}

impl ChannelsState {
    /// Channels in display order.
    #[must_use]
    pub fn items(&self) -> &[Channel] {
        &self.items
    }

    /// Channel by id.
    #[must_use]
    pub fn get_by_id(&self, id: ChannelId) -> Option<&Channel> {
        self.items.iter().find(|channel| channel.id == id)
    }

    /// Replace the list.
    pub fn replace(&mut self, channels: Vec<Channel>) {
        self.items = channels;
        self.sort();
    }

    /// Insert or replace one channel.
    pub fn upsert(&mut self, channel: Channel) {
        match self.items.iter_mut().find(|existing| existing.id == channel.id) {
            Some(existing) => *existing = channel,
            None => self.items.push(channel),
        }
        self.sort();
    }

    /// Merge `patch` into the channel; false when unknown.
    pub fn apply_patch(&mut self, id: ChannelId, patch: &ChannelPatch) -> bool {
        let Some(channel) = self.items.iter_mut().find(|channel| channel.id == id) else {
            return false;
        };
        patch.apply_to(channel);
        self.sort();
        true
    }

    /// Drop a channel; false when unknown.
    pub fn remove(&mut self, id: ChannelId) -> bool {
        let before = self.items.len();
        self.items.retain(|channel| channel.id != id);
        self.items.len() != before
    }

    /// Give every channel in `order` its index as position, then append the
    /// rest in their current order.
    ///
    /// Returns the channels whose stored position changed, in display order.
    pub fn assign_positions(&mut self, order: &[ChannelId]) -> Vec<(ChannelId, i64)> {
        let mut ordered: Vec<Channel> = order
            .iter()
            .filter_map(|id| self.get_by_id(*id).cloned())
            .collect();
        ordered.extend(
            self.items
                .iter()
                .filter(|channel| !order.contains(&channel.id))
                .cloned(),
        );
        let mut changed = Vec::new();
        for (position, channel) in (0_i64..).zip(ordered.iter_mut()) {
            if channel.order_position != position {
                channel.order_position = position;
                changed.push((channel.id, position));
            }
        }
        self.items = ordered;
        changed
    }

    fn sort(&mut self) {
        self.items.sort_by_key(|channel| channel.order_position);
    }
}
