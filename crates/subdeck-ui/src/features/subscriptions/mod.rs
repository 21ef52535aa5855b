//! Subscription list, filters and backend operations.

pub mod actions;
pub mod state;
