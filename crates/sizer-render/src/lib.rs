#![forbid(unsafe_code)]

//! Render kernel: cells, buffers, frames, and the terminal presenter.
//!
//! Models draw into a [`frame::Frame`]; the runtime hands the finished
//! [`buffer::Buffer`] to a [`presenter::Presenter`], which rewrites only the
//! rows that changed since the previous frame.

pub mod buffer;
pub mod cell;
pub mod frame;
pub mod presenter;
pub mod style;
