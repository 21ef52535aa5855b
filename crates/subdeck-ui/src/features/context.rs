//! Per-instance dependencies.
//!
//! # Design
//! - Everything a feature touches is reached through [`AppContext`]; there are
//!   no globals, so two dashboards can coexist and tests build their own.

use crate::core::config::ClientConfig;
use crate::core::notify::Notifier;
use crate::core::scheduler::{Scheduler, Spawner};
use crate::core::store::AppStores;
use crate::features::columns::Confirm;
use crate::i18n::Localizer;
use crate::services::api::ApiClient;
use std::fmt;
use std::rc::Rc;

/// Services and stores shared by every feature.
#[derive(Clone)]
pub struct AppContext {
    /// Timing and endpoint configuration.
    pub config: ClientConfig,
    /// REST client.
    pub api: ApiClient,
    /// Toast sink.
    pub notifier: Rc<dyn Notifier>,
    /// Timer source.
    pub scheduler: Rc<dyn Scheduler>,
    /// Background task runner.
    pub spawner: Rc<dyn Spawner>,
    /// Yes/no gate for destructive actions.
    pub confirm: Rc<dyn Confirm>,
    /// Translations.
    pub i18n: Rc<Localizer>,
    /// Store slices.
    pub stores: AppStores,
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("config", &self.config)
            .field("locale", &self.i18n.locale())
            .finish_non_exhaustive()
    }
}
