//! Feature slices: state, actions and views per dashboard area.

pub mod channels;
pub mod columns;
pub mod context;
pub mod dashboard;
pub mod oauth;
pub mod reorder;
pub mod settings;
pub mod stats;
pub mod subscriptions;
pub mod videos;
