//! Per-channel video columns.
//!
//! # Design
//! - [`state::ColumnState`] is plain data; [`state::ColumnView`] is derived
//!   from it on every render.
//! - [`controller::ChannelColumn`] owns the async flows and guards every late
//!   result with the mounted flag.
//! - [`board::ColumnBoard`] keeps one column per known channel in display order.

pub mod board;
pub mod controller;
pub mod logic;
pub mod state;
#[cfg(target_arch = "wasm32")]
pub(crate) mod view;

pub use controller::Confirm;
