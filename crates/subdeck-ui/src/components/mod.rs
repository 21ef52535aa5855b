//! Shell-level components shared by the dashboard.

pub(crate) mod live_region;
pub(crate) mod locale_menu;
pub(crate) mod shortcuts_help;
pub(crate) mod stats_bar;
pub(crate) mod toast;

use crate::i18n::Localizer;
use std::rc::Rc;
use yew::prelude::*;

/// Active localizer, tagged with the locale revision it was provided at.
#[derive(Clone)]
pub(crate) struct I18nContext {
    pub(crate) localizer: Rc<Localizer>,
    pub(crate) revision: u64,
}

impl PartialEq for I18nContext {
    fn eq(&self, other: &Self) -> bool {
        self.revision == other.revision && Rc::ptr_eq(&self.localizer, &other.localizer)
    }
}

/// Localizer of the surrounding dashboard, or a builtin English one.
///
/// Consumers re-render whenever the provider's revision moves.
#[hook]
pub(crate) fn use_i18n() -> Rc<Localizer> {
    let fallback = use_memo((), |_| Rc::new(Localizer::default()));
    use_context::<I18nContext>().map_or_else(|| (*fallback).clone(), |cx| cx.localizer)
}
