#![forbid(unsafe_code)]

//! Widgets for the sizer lessons.

pub mod block;
pub mod button;
pub mod image_display;
pub mod paragraph;

pub use block::{Block, Borders};
pub use button::Button;
pub use image_display::ImageDisplay;
pub use paragraph::Paragraph;

use sizer_core::geometry::Rect;
use sizer_render::frame::Frame;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// A `Widget` is a renderable component.
///
/// Widgets render themselves into a `Frame` within a given `Rect` and never
/// draw outside it.
pub trait Widget {
    /// Render the widget into the frame at the given area.
    fn render(&self, area: Rect, frame: &mut Frame);
}

/// Display width of `text` in terminal columns.
pub fn text_width(text: &str) -> u16 {
    text.graphemes(true)
        .map(|g| UnicodeWidthStr::width(g).min(2))
        .sum::<usize>()
        .min(u16::MAX as usize) as u16
}

/// Truncate `text` to at most `max` columns, appending `…` when cut.
pub fn truncate_to_width(text: &str, max: u16) -> String {
    if text_width(text) <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0u16;
    for g in text.graphemes(true) {
        let w = UnicodeWidthStr::width(g).min(2) as u16;
        if used + w > max - 1 {
            break;
        }
        out.push_str(g);
        used += w;
    }
    out.push('…');
    out
}
