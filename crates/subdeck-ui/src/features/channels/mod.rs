//! Channel list store and its backend operations.

pub mod actions;
pub mod state;
