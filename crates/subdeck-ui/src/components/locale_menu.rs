//! Locale and auto-refresh controls in the top bar.
//!
//! # Design
//! - Selection state lives in the settings slice; the component only emits.

use crate::components::use_i18n;
use crate::features::settings::state::SettingsState;
use crate::i18n::LocaleCode;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

const INTERVAL_CHOICES: [u32; 5] = [1, 5, 10, 15, 30];

#[derive(Properties, PartialEq)]
pub(crate) struct LocaleMenuProps {
    pub node_ref: NodeRef,
    pub settings: SettingsState,
    pub on_locale: Callback<LocaleCode>,
    pub on_auto_refresh: Callback<bool>,
    pub on_interval: Callback<u32>,
}

#[function_component(LocaleMenu)]
pub(crate) fn locale_menu(props: &LocaleMenuProps) -> Html {
    let i18n = use_i18n();
    let settings = props.settings;

    let on_locale = {
        let emit = props.on_locale.clone();
        Callback::from(move |event: Event| {
            let select: HtmlSelectElement = event.target_unchecked_into();
            if let Some(locale) = LocaleCode::from_lang_tag(&select.value()) {
                emit.emit(locale);
            }
        })
    };
    let on_auto_refresh = {
        let emit = props.on_auto_refresh.clone();
        Callback::from(move |event: Event| {
            let input: HtmlInputElement = event.target_unchecked_into();
            emit.emit(input.checked());
        })
    };
    let on_interval = {
        let emit = props.on_interval.clone();
        Callback::from(move |event: Event| {
            let select: HtmlSelectElement = event.target_unchecked_into();
            if let Ok(minutes) = select.value().parse::<u32>() {
                emit.emit(minutes);
            }
        })
    };

    html! {
        <div class="settings-menu">
            <label class="locale">
                <span>{i18n.text("settings.language")}</span>
                <select ref={props.node_ref.clone()} id="locale-select" onchange={on_locale}>
                    {for LocaleCode::all().into_iter().map(|locale| html! {
                        <option value={locale.code()} selected={locale == settings.locale}>
                            {locale.label()}
                        </option>
                    })}
                </select>
            </label>
            <label class="auto-refresh">
                <input type="checkbox" checked={settings.auto_refresh} onchange={on_auto_refresh} />
                <span>{i18n.text("settings.auto_refresh")}</span>
            </label>
            <select
                class="refresh-interval"
                disabled={!settings.auto_refresh}
                onchange={on_interval}
            >
                {for INTERVAL_CHOICES.into_iter().map(|minutes| html! {
                    <option value={minutes.to_string()} selected={minutes == settings.refresh_interval}>
                        {i18n.t("settings.refresh_interval", &[("minutes", minutes.to_string())])}
                    </option>
                })}
            </select>
        </div>
    }
}
