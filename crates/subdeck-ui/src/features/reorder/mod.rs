//! Column reordering by pointer drag, touch drag and keyboard.
//!
//! # Design
//! - [`session`] is a pure reducer: input plus layout snapshot in, next state
//!   plus effects out. No DOM and no I/O.
//! - [`controller::ReorderController`] applies effects to the board, the
//!   channel store and the live region, and persists positions.
//! - Persistence saves each changed channel in display order and stops at the
//!   first failure; already-saved positions are not rolled back.

pub mod announce;
pub mod controller;
pub mod geometry;
pub mod session;
