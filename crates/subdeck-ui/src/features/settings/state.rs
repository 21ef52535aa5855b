//! Settings slice.

use crate::i18n::{DEFAULT_LOCALE, LocaleCode};
use std::time::Duration;
use subdeck_api_models::SettingsPayload;
use yewdux::store::Store;

/// Refresh period used when none is stored.
pub const DEFAULT_REFRESH_MINUTES: u32 = 5;

/// Locale, auto-refresh and refresh bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Store)]
pub struct SettingsState {
    /// Active locale.
    pub locale: LocaleCode,
    /// Periodic refresh enabled.
    pub auto_refresh: bool,
    /// Refresh period in minutes, never zero.
    pub refresh_interval: u32,
    /// A refresh is running.
    pub refreshing: bool,
    /// Scheduler time of the last successful refresh.
    pub last_refresh_ms: Option<u64>,
}

impl Default for SettingsState {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE,
            auto_refresh: true,
            refresh_interval: DEFAULT_REFRESH_MINUTES,
            refreshing: false,
            last_refresh_ms: None,
        }
    }
}

impl SettingsState {
    /// Apply stored settings; missing or invalid values keep their defaults.
    #[must_use]
    pub fn from_payload(payload: &SettingsPayload) -> Self {
        let locale = payload
            .locale
            .as_deref()
            .and_then(LocaleCode::from_lang_tag)
            .unwrap_or(DEFAULT_LOCALE);
        Self {
            locale,
            auto_refresh: payload.auto_refresh != Some(false),
            refresh_interval: normalize_interval(payload.refresh_interval),
            ..Self::default()
        }
    }

    /// Payload saved back to the backend.
    #[must_use]
    pub fn to_payload(&self) -> SettingsPayload {
        SettingsPayload {
            locale: Some(self.locale.code().to_string()),
            auto_refresh: Some(self.auto_refresh),
            refresh_interval: Some(self.refresh_interval),
        }
    }

    /// Refresh period as a [`Duration`].
    #[must_use]
    pub fn refresh_period(&self) -> Duration {
        Duration::from_secs(u64::from(self.refresh_interval) * 60)
    }
}

/// Zero or absent intervals fall back to the default.
#[must_use]
pub fn normalize_interval(minutes: Option<u32>) -> u32 {
    minutes
        .filter(|minutes| *minutes > 0)
        .unwrap_or(DEFAULT_REFRESH_MINUTES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_explicit_false_disables_auto_refresh() {
        let absent = SettingsState::from_payload(&SettingsPayload::default());
        assert!(absent.auto_refresh);
        assert_eq!(absent.refresh_interval, 5);
        let off = SettingsState::from_payload(&SettingsPayload {
            locale: Some("ru-RU".into()),
            auto_refresh: Some(false),
            refresh_interval: Some(0),
        });
        assert!(!off.auto_refresh);
        assert_eq!(off.refresh_interval, 5);
        assert_eq!(off.locale, LocaleCode::Ru);
    }

    #[test]
    fn payload_carries_all_three_fields() {
        let state = SettingsState {
            refresh_interval: 15,
            ..SettingsState::default()
        };
        let payload = state.to_payload();
        assert_eq!(payload.locale.as_deref(), Some("en"));
        assert_eq!(payload.auto_refresh, Some(true));
        assert_eq!(payload.refresh_interval, Some(15));
        assert_eq!(state.refresh_period(), Duration::from_secs(900));
    }
}
