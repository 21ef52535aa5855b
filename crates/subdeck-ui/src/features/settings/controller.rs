//! Settings persistence, locale switching and the auto-refresh timer.

use crate::core::scheduler::{LocalTask, ScheduledTask};
use crate::features::context::AppContext;
use crate::features::settings::state::{SettingsState, normalize_interval};
use crate::i18n::LocaleCode;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, info};

/// Produces the work run on every auto-refresh tick.
pub type RefreshHook = Rc<dyn Fn() -> LocalTask>;

/// Owns the settings slice and the auto-refresh timer.
pub struct SettingsController {
    ctx: AppContext,
    on_refresh: RefreshHook,
    timer: RefCell<Option<ScheduledTask>>,
}

impl fmt::Debug for SettingsController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsController")
            .field("settings", &self.state())
            .field("timer", &self.timer.borrow().is_some())
            .finish_non_exhaustive()
    }
}

impl SettingsController {
    /// Controller running `on_refresh` on each auto-refresh tick.
    #[must_use]
    pub fn new(ctx: AppContext, on_refresh: RefreshHook) -> Self {
        Self {
            ctx,
            on_refresh,
            timer: RefCell::new(None),
        }
    }

    /// Current settings.
    #[must_use]
    pub fn state(&self) -> SettingsState {
        *self.ctx.stores.settings.get()
    }

    /// Load stored settings and translations, then start auto-refresh.
    pub async fn init(&self) {
        let payload = self.ctx.api.settings().await.unwrap_or_default();
        let loaded = SettingsState::from_payload(&payload);
        let locale = self.ctx.i18n.set_locale(loaded.locale, &self.ctx.api).await;
        self.ctx.i18n.activate(locale);
        self.ctx.stores.settings.reduce_mut(|state| {
            state.locale = locale;
            state.auto_refresh = loaded.auto_refresh;
            state.refresh_interval = loaded.refresh_interval;
        });
        debug!(%locale, auto_refresh = loaded.auto_refresh, "settings initialised");
        self.restart_timer();
    }

    /// Switch locale and save; returns the locale that ended up active.
    pub async fn set_locale(&self, locale: LocaleCode) -> LocaleCode {
        let active = self.ctx.i18n.set_locale(locale, &self.ctx.api).await;
        self.ctx.stores.settings.reduce_mut(|state| state.locale = active);
        self.save().await;
        active
    }

    /// Toggle auto-refresh and save.
    pub async fn set_auto_refresh(&self, enabled: bool) {
        self.ctx
            .stores
            .settings
            .reduce_mut(|state| state.auto_refresh = enabled);
        self.restart_timer();
        self.save().await;
    }

    /// Change the refresh period and save; zero means the default.
    pub async fn set_refresh_interval(&self, minutes: u32) {
        let minutes = normalize_interval(Some(minutes));
        self.ctx
            .stores
            .settings
            .reduce_mut(|state| state.refresh_interval = minutes);
        self.restart_timer();
        self.save().await;
    }

    /// Stop auto-refresh without changing the stored setting.
    pub fn stop(&self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }

    fn restart_timer(&self) {
        self.stop();
        let settings = self.ctx.stores.settings.get();
        if !settings.auto_refresh {
            return;
        }
        let hook = self.on_refresh.clone();
        let spawner = self.ctx.spawner.clone();
        let timer = self.ctx.scheduler.every(
            settings.refresh_period(),
            Rc::new(move || spawner.spawn(hook())),
        );
        debug!(minutes = settings.refresh_interval, "auto refresh scheduled");
        *self.timer.borrow_mut() = Some(timer);
    }

    async fn save(&self) -> bool {
        let payload = self.ctx.stores.settings.get().to_payload();
        self.ctx.api.save_settings(&payload).await.is_ok()
    }
}

/// Reload channels and stats, tracking `refreshing` and `last_refresh_ms`.
///
/// Returns false without doing anything while another refresh runs.
pub async fn refresh(ctx: &AppContext) -> bool {
    let settings = &ctx.stores.settings;
    if settings.get().refreshing {
        return false;
    }
    settings.reduce_mut(|state| state.refreshing = true);
    let (channels, stats) = (ctx.api.channels().await, ctx.api.stats().await);
    let ok = channels.is_ok() && stats.is_ok();
    if let Ok(channels) = channels {
        ctx.stores
            .channels
            .reduce_mut(|state| state.replace(channels));
    }
    if let Ok(stats) = stats {
        ctx.stores.stats.reduce_mut(|state| state.stats = Some(stats));
    }
    let now = ctx.scheduler.now_ms();
    settings.reduce_mut(|state| {
        state.refreshing = false;
        if ok {
            state.last_refresh_ms = Some(now);
        }
    });
    if ok {
        info!("dashboard data refreshed");
        ctx.notifier.success(&ctx.i18n.text("toast.refresh_ok"));
    } else {
        ctx.notifier.error(&ctx.i18n.text("toast.refresh_failed"));
    }
    ok
}
