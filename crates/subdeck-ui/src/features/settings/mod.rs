//! User settings, locale switching and auto-refresh.

pub mod controller;
pub mod state;
