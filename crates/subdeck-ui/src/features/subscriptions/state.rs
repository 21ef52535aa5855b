//! Subscriptions slice and its filters.

use subdeck_api_models::{ChannelId, Subscription, SubscriptionId, SubscriptionPatch};
use yewdux::store::Store;

/// Status filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    /// Active and inactive.
    #[default]
    All,
    /// Active only.
    Active,
    /// Inactive only.
    Inactive,
}

impl StatusFilter {
    /// Parse a select value; unknown values mean `All`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "active" => Self::Active,
            "inactive" => Self::Inactive,
            _ => Self::All,
        }
    }

    /// Translation key for the option label.
    #[must_use]
    pub const fn label_key(self) -> &'static str {
        match self {
            Self::All => "subscriptions.all",
            Self::Active => "subscriptions.active",
            Self::Inactive => "subscriptions.inactive",
        }
    }

    const fn admits(self, active: bool) -> bool {
        match self {
            Self::All => true,
            Self::Active => active,
            Self::Inactive => !active,
        }
    }
}

/// Filters applied by [`SubscriptionsState::filtered`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubscriptionFilter {
    /// Owning channel.
    pub channel: Option<ChannelId>,
    /// Status.
    pub status: StatusFilter,
    /// Case-insensitive name search.
    pub search: String,
}

/// Loaded subscriptions plus the active filters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Store)]
pub struct SubscriptionsState {
    /// Subscriptions as served.
    pub items: Vec<Subscription>,
    /// A list request is in flight.
    pub loading: bool,
    /// Active filters.
    pub filter: SubscriptionFilter,
}

impl SubscriptionsState {
    /// Subscriptions passing every filter.
    #[must_use]
    pub fn filtered(&self) -> Vec<&Subscription> {
        let needle = self.filter.search.trim().to_lowercase();
        self.items
            .iter()
            .filter(|sub| {
                self.filter
                    .channel
                    .is_none_or(|channel| sub.personal_channel_id == channel)
            })
            .filter(|sub| self.filter.status.admits(sub.is_active))
            .filter(|sub| needle.is_empty() || sub.channel_name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Merge `patch` into a stored subscription; false when unknown.
    pub fn apply_patch(&mut self, id: SubscriptionId, patch: &SubscriptionPatch) -> bool {
        let Some(sub) = self.items.iter_mut().find(|sub| sub.id == id) else {
            return false;
        };
        patch.apply_to(sub);
        true
    }

    /// Drop a subscription; false when unknown.
    pub fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.items.len();
        self.items.retain(|sub| sub.id != id);
        self.items.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(id: i64, channel: i64, name: &str, active: bool) -> Subscription {
        Subscription {
            id: SubscriptionId(id),
            personal_channel_id: ChannelId(channel),
            youtube_channel_id: format!("UC{id}"),
            channel_name: name.to_string(),
            channel_thumbnail: None,
            is_active: active,
        }
    }

    fn state() -> SubscriptionsState {
        SubscriptionsState {
            items: vec![
                sub(1, 1, "Rust Weekly", true),
                sub(2, 1, "Cooking", false),
                sub(3, 2, "rustacean station", true),
            ],
            ..SubscriptionsState::default()
        }
    }

    fn ids(state: &SubscriptionsState) -> Vec<i64> {
        state.filtered().iter().map(|sub| sub.id.0).collect()
    }

    #[test]
    fn filters_combine() {
        let mut state = state();
        assert_eq!(ids(&state), vec![1, 2, 3]);
        state.filter.search = "  RUST ".into();
        assert_eq!(ids(&state), vec![1, 3]);
        state.filter.channel = Some(ChannelId(2));
        assert_eq!(ids(&state), vec![3]);
        state.filter = SubscriptionFilter {
            status: StatusFilter::parse("inactive"),
            ..SubscriptionFilter::default()
        };
        assert_eq!(ids(&state), vec![2]);
        assert_eq!(StatusFilter::parse("bogus"), StatusFilter::All);
    }

    #[test]
    fn patch_and_remove() {
        let mut state = state();
        let patch = SubscriptionPatch {
            is_active: Some(true),
        };
        assert!(state.apply_patch(SubscriptionId(2), &patch));
        assert!(state.items[1].is_active);
        assert!(state.remove(SubscriptionId(2)));
        assert!(!state.apply_patch(SubscriptionId(2), &patch));
    }
}
