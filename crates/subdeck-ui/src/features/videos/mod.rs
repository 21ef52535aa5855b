//! Video items and the per-channel video cache.

pub mod actions;
pub mod item;
pub mod state;
#[cfg(target_arch = "wasm32")]
pub(crate) mod view;
