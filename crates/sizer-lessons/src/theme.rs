#![forbid(unsafe_code)]

//! Shared colors and styles for the lesson shell.

use sizer_render::cell::{PackedRgba, StyleFlags};
use sizer_render::style::Style;

pub const ACCENT: PackedRgba = PackedRgba::rgb(97, 218, 251);
pub const TEXT: PackedRgba = PackedRgba::rgb(220, 223, 228);
pub const MUTED: PackedRgba = PackedRgba::rgb(124, 130, 142);
pub const BORDER: PackedRgba = PackedRgba::rgb(86, 92, 104);
pub const PLAYING: PackedRgba = PackedRgba::rgb(152, 195, 121);
pub const BAR_BG: PackedRgba = PackedRgba::rgb(40, 44, 52);

/// Horizontal gap between buttons in a row.
pub const BUTTON_GAP: u16 = 2;

pub fn body() -> Style {
    Style::new().fg(TEXT)
}

pub fn muted() -> Style {
    Style::new().fg(MUTED)
}

pub fn border() -> Style {
    Style::new().fg(BORDER)
}

pub fn title() -> Style {
    Style::new().fg(ACCENT).bold()
}

pub fn key_hint() -> Style {
    Style::new().fg(ACCENT).bold()
}

pub fn disabled() -> Style {
    Style::new().fg(BORDER).attrs(StyleFlags::DIM)
}

pub fn playing() -> Style {
    Style::new().fg(PLAYING).bold()
}

pub fn tab_active() -> Style {
    Style::new().fg(BAR_BG).bg(ACCENT).bold()
}

pub fn tab_inactive() -> Style {
    Style::new().fg(MUTED).bg(BAR_BG)
}

pub fn status_bar() -> Style {
    Style::new().fg(MUTED).bg(BAR_BG)
}

pub fn image_frame() -> Style {
    Style::new().fg(ACCENT)
}

pub fn image_fill() -> Style {
    Style::new().fg(ACCENT).attrs(StyleFlags::DIM)
}
