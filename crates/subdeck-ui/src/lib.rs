#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::future_not_send)]
//! SubDeck web UI.
//!
//! The crate is split in two halves:
//! - `core`, `features`, `i18n` and `services::api` are DOM-free. They hold the
//!   stores, the per-column view state, the reorder state machine and the REST
//!   client, and are unit-tested natively.
//! - `app`, `components` and `services::http` only build for `wasm32` and render
//!   that state with Yew.

pub mod core;
pub mod features;
pub mod i18n;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod components;

#[cfg(target_arch = "wasm32")]
pub use app::run_app;
