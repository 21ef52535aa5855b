//! JSON-backed translations with runtime-loaded locales.
//!
//! # Design
//! - English ships with the bundle and is always the fallback table.
//! - Other locales are fetched from the backend on first use.
//! - A [`LocaleRevision`] store slice changes after every switch so views
//!   re-render.

use crate::core::format::{RelativeTime, format_number};
use crate::services::api::ApiClient;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};
use yewdux::Context;
use yewdux::prelude::Dispatch;
use yewdux::store::Store;

/// Supported locale codes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocaleCode {
    /// English.
    #[default]
    En,
    /// Russian.
    Ru,
}

impl LocaleCode {
    /// All supported locales in display order.
    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::En, Self::Ru]
    }

    /// Two-letter code used by the backend.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ru => "ru",
        }
    }

    /// Native label for the language menu.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Ru => "Русский",
        }
    }

    /// Map a stored code or browser language tag to a supported locale.
    #[must_use]
    pub fn from_lang_tag(tag: &str) -> Option<Self> {
        let lowered = tag.trim().to_ascii_lowercase();
        let base = lowered.split(['-', '_']).next().unwrap_or_default();
        Self::all().into_iter().find(|locale| locale.code() == base)
    }

    const fn group_separator(self) -> char {
        match self {
            Self::En => ',',
            Self::Ru => '\u{a0}',
        }
    }
}

impl fmt::Display for LocaleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Default fallback locale.
pub const DEFAULT_LOCALE: LocaleCode = LocaleCode::En;

/// Parsed translation tree for one locale.
#[derive(Clone, Debug)]
pub struct TranslationBundle {
    /// Locale backing this bundle.
    pub locale: LocaleCode,
    tree: Value,
}

impl PartialEq for TranslationBundle {
    fn eq(&self, other: &Self) -> bool {
        self.locale == other.locale
    }
}

impl TranslationBundle {
    /// Bundle built from an already parsed tree.
    #[must_use]
    pub const fn from_tree(locale: LocaleCode, tree: Value) -> Self {
        Self { locale, tree }
    }

    /// English table compiled into the binary.
    #[must_use]
    pub fn builtin() -> Self {
        let tree = serde_json::from_str(include_str!("../../i18n/en.json")).unwrap_or(Value::Null);
        Self::from_tree(DEFAULT_LOCALE, tree)
    }

    /// Whether the tree holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.as_object().is_none_or(serde_json::Map::is_empty)
    }

    /// Resolve a dotted path (`section.key`).
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&str> {
        let mut node = &self.tree;
        for segment in path.split('.') {
            node = node.get(segment)?;
        }
        node.as_str()
    }
}

/// Replace `{name}` placeholders; unknown placeholders stay as written.
#[must_use]
pub fn interpolate(template: &str, params: &[(&str, String)]) -> String {
    let mut out = template.to_string();
    for (name, value) in params {
        out = out.replace(&format!("{{{name}}}"), value);
    }
    out
}

/// Store slice bumped on every locale switch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Store)]
pub struct LocaleRevision {
    /// Locale made active by the last switch.
    pub locale: LocaleCode,
    /// Number of switches so far.
    pub revision: u64,
}

/// Active locale plus every loaded translation table.
pub struct Localizer {
    active: Cell<LocaleCode>,
    bundles: RefCell<HashMap<LocaleCode, TranslationBundle>>,
    revision: Dispatch<LocaleRevision>,
}

impl fmt::Debug for Localizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Localizer")
            .field("active", &self.active.get())
            .field("revision", &self.revision())
            .finish_non_exhaustive()
    }
}

impl Default for Localizer {
    fn default() -> Self {
        Self::new(&Context::new())
    }
}

impl Localizer {
    /// Localizer with the builtin English table active, publishing its
    /// revision into `cx`.
    #[must_use]
    pub fn new(cx: &Context) -> Self {
        let mut bundles = HashMap::new();
        bundles.insert(DEFAULT_LOCALE, TranslationBundle::builtin());
        Self {
            active: Cell::new(DEFAULT_LOCALE),
            bundles: RefCell::new(bundles),
            revision: Dispatch::new(cx),
        }
    }

    /// Currently active locale.
    #[must_use]
    pub fn locale(&self) -> LocaleCode {
        self.active.get()
    }

    /// Counter bumped after every locale switch.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision.get().revision
    }

    /// Whether a table for `locale` has been loaded.
    #[must_use]
    pub fn is_loaded(&self, locale: LocaleCode) -> bool {
        self.bundles.borrow().contains_key(&locale)
    }

    /// Translate `key` without parameters.
    #[must_use]
    pub fn text(&self, key: &str) -> String {
        self.t(key, &[])
    }

    /// Translate `key`, falling back to English and then to `[key]`.
    #[must_use]
    pub fn t(&self, key: &str, params: &[(&str, String)]) -> String {
        let bundles = self.bundles.borrow();
        let active = bundles
            .get(&self.active.get())
            .and_then(|bundle| bundle.lookup(key));
        let resolved = active.or_else(|| {
            bundles
                .get(&DEFAULT_LOCALE)
                .and_then(|bundle| bundle.lookup(key))
        });
        if let Some(template) = resolved {
            interpolate(template, params)
        } else {
            warn!(key, locale = %self.active.get(), "translation missing");
            format!("[{key}]")
        }
    }

    /// Register a table; empty tables are ignored.
    pub fn install(&self, bundle: TranslationBundle) -> bool {
        if bundle.is_empty() {
            warn!(locale = %bundle.locale, "empty translation table received");
            return false;
        }
        self.bundles.borrow_mut().insert(bundle.locale, bundle);
        true
    }

    /// Switch to `locale`, loading its table through `api` when needed.
    ///
    /// Returns the locale that ended up active.
    pub async fn set_locale(&self, locale: LocaleCode, api: &ApiClient) -> LocaleCode {
        if self.locale() == locale && self.is_loaded(locale) {
            return locale;
        }
        if !self.is_loaded(locale) {
            match api.load_translations(locale.code()).await {
                Ok(tree) => {
                    self.install(TranslationBundle::from_tree(locale, tree));
                }
                Err(err) => {
                    warn!(%locale, error = %err, "failed to load translations, using fallback");
                    self.activate(DEFAULT_LOCALE);
                    return DEFAULT_LOCALE;
                }
            }
        }
        self.activate(locale);
        locale
    }

    /// Make `locale` active and bump the revision.
    pub fn activate(&self, locale: LocaleCode) {
        debug!(%locale, "locale activated");
        self.active.set(locale);
        self.revision.reduce_mut(|state| {
            state.locale = locale;
            state.revision += 1;
        });
    }

    /// Integer with the active locale's digit grouping.
    #[must_use]
    pub fn number(&self, value: u64) -> String {
        format_number(value, self.locale().group_separator())
    }

    /// "5 min ago" style label.
    #[must_use]
    pub fn relative_time(&self, then: DateTime<Utc>, now: DateTime<Utc>) -> String {
        let (key, count) = RelativeTime::between(then, now).key();
        self.t(key, &[("count", count.to_string())])
    }
}
