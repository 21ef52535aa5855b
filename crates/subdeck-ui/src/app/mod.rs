//! Application shell: wires browser services into an [`AppContext`] and
//! renders the dashboard.

use crate::app::browser::{BrowserConfirm, BrowserScheduler, BrowserSpawner};
use crate::components::I18nContext;
use crate::components::live_region::LiveRegion;
use crate::components::locale_menu::LocaleMenu;
use crate::components::shortcuts_help::ShortcutsHelp;
use crate::components::stats_bar::StatsBar;
use crate::components::toast::ToastHost;
use crate::core::config::ClientConfig;
use crate::core::notify::{ToastCenter, ToastStack};
use crate::core::scheduler::Scheduler;
use crate::core::shortcuts::{Focus, Modifiers, Shortcut, interpret_shortcut, move_focus};
use crate::core::store::AppStores;
use crate::features::columns::view::ColumnBoardView;
use crate::features::context::AppContext;
use crate::features::dashboard::Dashboard;
use crate::features::reorder::announce::LiveRegionState;
use crate::features::settings::state::SettingsState;
use crate::features::stats::StatsState;
use crate::i18n::{LocaleCode, LocaleRevision, Localizer};
use crate::services::api::ApiClient;
use crate::services::http::FetchTransport;
use anyhow::{Context, anyhow};
use gloo::console;
use gloo::events::EventListener;
use gloo::utils::{document, window};
use std::rc::Rc;
use subdeck_api_models::VideoId;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlElement, KeyboardEvent};
use yew::prelude::*;
use yewdux::prelude::use_selector;

mod browser;

const CONFIG_ATTRIBUTE: &str = "data-subdeck-config";

/// Shared handle to the running dashboard, compared by identity.
#[derive(Clone)]
pub(crate) struct DashboardHandle(pub(crate) Rc<Dashboard>);

impl PartialEq for DashboardHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

struct Shell {
    dashboard: Rc<Dashboard>,
    toasts: Rc<ToastCenter>,
}

impl Shell {
    fn new() -> Self {
        let config = load_config().unwrap_or_else(|err| {
            console::warn!(format!("using default config: {err:#}"));
            ClientConfig::default()
        });
        let scheduler: Rc<dyn Scheduler> = Rc::new(BrowserScheduler);
        let stores = AppStores::default();
        let toasts = Rc::new(ToastCenter::new(
            stores.context(),
            scheduler.clone(),
            config.toast_duration(),
        ));
        let transport = Rc::new(FetchTransport::new(
            config.base_url.clone(),
            config.request_timeout_ms,
        ));
        let ctx = AppContext {
            api: ApiClient::new(transport, toasts.clone()),
            notifier: toasts.clone(),
            scheduler,
            spawner: Rc::new(BrowserSpawner),
            confirm: Rc::new(BrowserConfirm),
            i18n: Rc::new(Localizer::new(stores.context())),
            stores,
            config,
        };
        Self {
            dashboard: Dashboard::new(ctx),
            toasts,
        }
    }
}

fn load_config() -> anyhow::Result<ClientConfig> {
    let body = document().body().context("document has no body")?;
    let Some(raw) = body.get_attribute(CONFIG_ATTRIBUTE) else {
        return Ok(ClientConfig::default());
    };
    serde_json::from_str(&raw).map_err(|err| anyhow!("invalid {CONFIG_ATTRIBUTE}: {err}"))
}

fn typing_in(event: &KeyboardEvent) -> bool {
    event
        .target()
        .and_then(|target| target.dyn_into::<HtmlElement>().ok())
        .is_some_and(|element| {
            matches!(element.tag_name().as_str(), "INPUT" | "TEXTAREA" | "SELECT")
                || element.is_content_editable()
        })
}

#[function_component(SubDeckApp)]
fn subdeck_app() -> Html {
    let shell = use_memo((), |_| Shell::new());
    let handle = DashboardHandle(shell.dashboard.clone());
    let stores = shell.dashboard.ctx().stores.context().clone();
    let on_dismiss = {
        let toasts = shell.toasts.clone();
        Callback::from(move |id: u64| toasts.dismiss(id))
    };

    html! {
        <ContextProvider<DashboardHandle> context={handle.clone()}>
            <ContextProvider<yewdux::Context> context={stores}>
                <Workspace dashboard={handle} on_dismiss={on_dismiss} />
            </ContextProvider<yewdux::Context>>
        </ContextProvider<DashboardHandle>>
    }
}

#[derive(Properties, PartialEq)]
struct WorkspaceProps {
    dashboard: DashboardHandle,
    on_dismiss: Callback<u64>,
}

#[function_component(Workspace)]
fn workspace(props: &WorkspaceProps) -> Html {
    let dashboard = props.dashboard.0.clone();
    let ctx = dashboard.ctx().clone();
    let revision = use_selector(|locale: &LocaleRevision| locale.revision);
    let settings = use_selector(|settings: &SettingsState| *settings);
    let stats = use_selector(|stats: &StatsState| stats.clone());
    let toasts = use_selector(|stack: &ToastStack| stack.items.clone());
    let announcement = use_selector(|region: &LiveRegionState| region.text.clone());
    let focus = use_state_eq(Focus::default);
    let show_help = use_state_eq(|| false);
    let locale_ref = use_node_ref();

    {
        let dashboard = dashboard.clone();
        use_effect_with((), move |_| {
            let starting = dashboard.clone();
            spawn_local(async move { starting.init().await });
            move || dashboard.shutdown()
        });
    }

    {
        let dashboard = dashboard.clone();
        let focus = focus.clone();
        let show_help = show_help.clone();
        let locale_ref = locale_ref.clone();
        use_effect_with(*focus, move |current: &Focus| {
            let current = *current;
            let listener = EventListener::new(&document(), "keydown", move |event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                let modifiers = Modifiers {
                    command: event.ctrl_key() || event.meta_key(),
                    shift: event.shift_key(),
                    typing: typing_in(event),
                };
                let Some(shortcut) = interpret_shortcut(&event.key(), modifiers) else {
                    return;
                };
                event.prevent_default();
                run_shortcut(&dashboard, shortcut, current, &focus, &show_help, &locale_ref);
            });
            move || drop(listener)
        });
    }

    let on_refresh = {
        let dashboard = dashboard.clone();
        Callback::from(move |_: MouseEvent| {
            let dashboard = dashboard.clone();
            spawn_local(async move {
                dashboard.refresh().await;
            });
        })
    };
    let on_locale = {
        let dashboard = dashboard.clone();
        Callback::from(move |locale: LocaleCode| {
            let dashboard = dashboard.clone();
            spawn_local(async move {
                dashboard.settings().set_locale(locale).await;
            });
        })
    };
    let on_auto_refresh = {
        let dashboard = dashboard.clone();
        Callback::from(move |enabled: bool| {
            let dashboard = dashboard.clone();
            spawn_local(async move { dashboard.settings().set_auto_refresh(enabled).await });
        })
    };
    let on_interval = {
        let dashboard = dashboard.clone();
        Callback::from(move |minutes: u32| {
            let dashboard = dashboard.clone();
            spawn_local(async move { dashboard.settings().set_refresh_interval(minutes).await });
        })
    };
    let on_close_help = {
        let show_help = show_help.clone();
        Callback::from(move |()| show_help.set(false))
    };

    let i18n = ctx.i18n.clone();
    let refresh_label = if settings.refreshing {
        i18n.text("common.refreshing")
    } else {
        i18n.text("common.refresh")
    };
    let i18n_context = I18nContext {
        localizer: i18n.clone(),
        revision: *revision,
    };

    html! {
        <ContextProvider<I18nContext> context={i18n_context}>
            <div class="subdeck-app">
                <header class="topbar">
                    <h1 class="brand">{i18n.text("app.name")}</h1>
                    <StatsBar stats={(*stats).clone()} />
                    <button
                        type="button"
                        class="btn refresh"
                        disabled={settings.refreshing}
                        onclick={on_refresh}
                    >
                        {refresh_label}
                    </button>
                    <LocaleMenu
                        node_ref={locale_ref}
                        settings={*settings}
                        on_locale={on_locale}
                        on_auto_refresh={on_auto_refresh}
                        on_interval={on_interval}
                    />
                </header>
                <ColumnBoardView focus={*focus} />
                <ToastHost toasts={(*toasts).clone()} on_dismiss={props.on_dismiss.clone()} />
                <LiveRegion text={(*announcement).clone()} />
                if *show_help {
                    <ShortcutsHelp on_close={on_close_help} />
                }
            </div>
        </ContextProvider<I18nContext>>
    }
}

fn run_shortcut(
    dashboard: &Rc<Dashboard>,
    shortcut: Shortcut,
    current: Focus,
    focus: &UseStateHandle<Focus>,
    show_help: &UseStateHandle<bool>,
    locale_ref: &NodeRef,
) {
    match shortcut {
        Shortcut::Refresh => {
            let dashboard = dashboard.clone();
            spawn_local(async move {
                dashboard.refresh().await;
            });
        }
        Shortcut::FocusLocale => {
            if let Some(element) = locale_ref.cast::<HtmlElement>() {
                if let Err(err) = element.focus() {
                    console::warn!(format!("locale selector focus failed: {err:?}"));
                }
            }
        }
        Shortcut::ShowHelp => show_help.set(true),
        Shortcut::CloseOverlays => {
            show_help.set(false);
            dashboard.reorder().reset();
        }
        Shortcut::WatchFocused => {
            if let Some(video) = dashboard.focused_video(current) {
                let board = dashboard.board();
                spawn_local(async move {
                    board.mark_watched(video).await;
                });
            }
        }
        Shortcut::OpenFocused => {
            if let Some(video) = dashboard.focused_video(current) {
                open_video(dashboard, video);
            }
        }
        Shortcut::PrevVideo | Shortcut::NextVideo | Shortcut::PrevColumn | Shortcut::NextColumn => {
            focus.set(move_focus(current, shortcut, &dashboard.video_counts()));
        }
    }
}

/// Resolve and open `video` in a new tab.
pub(crate) fn open_video(dashboard: &Rc<Dashboard>, video: VideoId) {
    let board = dashboard.board();
    spawn_local(async move {
        let Some(target) = board.open_video(video).await else {
            return;
        };
        if let Err(err) = window().open_with_url_and_target(&target.url, "_blank") {
            console::error!(format!("window.open failed: {err:?}"));
        }
    });
}

/// Mount the dashboard on the document body.
pub fn run_app() {
    console_error_panic_hook::set_once();
    yew::Renderer::<SubDeckApp>::new().render();
}
