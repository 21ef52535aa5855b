//! Backend access.
pub mod api;
#[cfg(target_arch = "wasm32")]
pub(crate) mod http;
