#![forbid(unsafe_code)]

//! Core: terminal lifecycle, events, and geometry.

pub mod event;
pub mod geometry;
pub mod logging;
pub mod terminal_session;
