#![forbid(unsafe_code)]

//! Sizer lessons: small interactive terminal lessons on component state,
//! recurring timers, and passing a value down a component chain.
//!
//! The binary wraps [`app::AppModel`] in a live terminal program, or in a
//! [`sizer_runtime::ProgramSimulator`] when run headless.

pub mod app;
pub mod cli;
pub mod headless;
pub mod lessons;
pub mod theme;
