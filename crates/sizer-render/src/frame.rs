#![forbid(unsafe_code)]

//! Frame = Buffer + drawing helpers for a render pass.
//!
//! The `Frame` is the render target that `Model::view()` methods write to.
//!
//! # Usage
//!
//! ```
//! use sizer_render::frame::Frame;
//! use sizer_render::style::Style;
//!
//! let mut frame = Frame::new(20, 3);
//! frame.print_text(0, 0, "Hi", Style::new(), 20);
//! assert!(frame.buffer.contains_text("Hi"));
//! ```

use crate::buffer::Buffer;
use crate::cell::Cell;
use crate::style::Style;
use sizer_core::geometry::Rect;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Characters used to draw a box outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderChars {
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
    pub horizontal: char,
    pub vertical: char,
}

impl BorderChars {
    /// Square corners.
    pub const SQUARE: Self = Self {
        top_left: '┌',
        top_right: '┐',
        bottom_left: '└',
        bottom_right: '┘',
        horizontal: '─',
        vertical: '│',
    };

    /// Rounded corners.
    pub const ROUNDED: Self = Self {
        top_left: '╭',
        top_right: '╮',
        bottom_left: '╰',
        bottom_right: '╯',
        horizontal: '─',
        vertical: '│',
    };

    /// Plain ASCII, for terminals without box drawing glyphs.
    pub const ASCII: Self = Self {
        top_left: '+',
        top_right: '+',
        bottom_left: '+',
        bottom_right: '+',
        horizontal: '-',
        vertical: '|',
    };
}

/// A render target for one frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// The cell grid being drawn.
    pub buffer: Buffer,
}

impl Frame {
    /// Create a blank frame.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            buffer: Buffer::new(width, height),
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.buffer.width()
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.buffer.height()
    }

    /// The full frame area.
    #[inline]
    pub fn area(&self) -> Rect {
        self.buffer.bounds()
    }

    /// Consume the frame, returning its buffer.
    pub fn into_buffer(self) -> Buffer {
        self.buffer
    }

    /// Draw a text span at (x, y), stopping at `max_x` (exclusive).
    ///
    /// Wide graphemes take two cells; a grapheme that would straddle `max_x`
    /// is not drawn. Returns the x position after the last drawn grapheme.
    pub fn print_text(&mut self, mut x: u16, y: u16, text: &str, style: Style, max_x: u16) -> u16 {
        let max_x = max_x.min(self.width());
        if y >= self.height() {
            return x;
        }
        for grapheme in text.graphemes(true) {
            let w = UnicodeWidthStr::width(grapheme);
            if w == 0 {
                continue;
            }
            let w = w.min(2) as u16;
            if x.saturating_add(w) > max_x {
                break;
            }
            if let Some(c) = grapheme.chars().next() {
                let mut cell = Cell::from_char(c);
                style.apply(&mut cell);
                self.buffer.set(x, y, cell);
                if w == 2 {
                    let mut cont = Cell::continuation();
                    style.apply(&mut cont);
                    self.buffer.set(x + 1, y, cont);
                }
            }
            x += w;
        }
        x
    }

    /// Draw text centered horizontally inside `area` on row `y`.
    pub fn print_centered(&mut self, area: Rect, y: u16, text: &str, style: Style) {
        let width = (UnicodeWidthStr::width(text) as u16).min(area.width);
        let x = area.x + (area.width - width) / 2;
        self.print_text(x, y, text, style, area.right());
    }

    /// Fill `area` with `ch`, layering `style` over each cell.
    pub fn fill(&mut self, area: Rect, ch: char, style: Style) {
        let mut cell = Cell::from_char(ch);
        style.apply(&mut cell);
        self.buffer.fill(area, cell);
    }

    /// Apply `style` to every cell in `area` without changing content.
    pub fn set_style(&mut self, area: Rect, style: Style) {
        if style.is_empty() {
            return;
        }
        let area = area.intersection(&self.area());
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                if let Some(cell) = self.buffer.get_mut(x, y) {
                    style.apply(cell);
                }
            }
        }
    }

    /// Draw a box outline around `area`.
    ///
    /// Areas narrower or shorter than two cells have no room for an outline
    /// and are left untouched.
    pub fn draw_border(&mut self, area: Rect, chars: BorderChars, style: Style) {
        if area.width < 2 || area.height < 2 {
            return;
        }
        let right = area.right() - 1;
        let bottom = area.bottom() - 1;
        let put = |frame: &mut Frame, x: u16, y: u16, c: char| {
            let mut cell = Cell::from_char(c);
            style.apply(&mut cell);
            frame.buffer.set(x, y, cell);
        };

        for x in area.x + 1..right {
            put(self, x, area.y, chars.horizontal);
            put(self, x, bottom, chars.horizontal);
        }
        for y in area.y + 1..bottom {
            put(self, area.x, y, chars.vertical);
            put(self, right, y, chars.vertical);
        }
        put(self, area.x, area.y, chars.top_left);
        put(self, right, area.y, chars.top_right);
        put(self, area.x, bottom, chars.bottom_left);
        put(self, right, bottom, chars.bottom_right);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{PackedRgba, StyleFlags};

    #[test]
    fn print_text_clips_at_max_x() {
        let mut frame = Frame::new(10, 1);
        let end = frame.print_text(0, 0, "Hello world", Style::new(), 5);
        assert_eq!(end, 5);
        assert_eq!(frame.buffer.to_text(), "Hello");
    }

    #[test]
    fn print_text_off_screen_row_is_noop() {
        let mut frame = Frame::new(5, 1);
        assert_eq!(frame.print_text(0, 3, "abc", Style::new(), 5), 0);
        assert_eq!(frame.buffer.to_text(), "");
    }

    #[test]
    fn print_text_wide_grapheme_uses_two_cells() {
        let mut frame = Frame::new(6, 1);
        let end = frame.print_text(0, 0, "界x", Style::new(), 6);
        assert_eq!(end, 3);
        assert!(frame.buffer.get(1, 0).unwrap().is_continuation());
    }

    #[test]
    fn print_text_applies_style() {
        let mut frame = Frame::new(3, 1);
        frame.print_text(0, 0, "a", Style::new().bold().fg(PackedRgba::WHITE), 3);
        let cell = frame.buffer.get(0, 0).unwrap();
        assert!(cell.attrs.contains(StyleFlags::BOLD));
        assert_eq!(cell.fg, PackedRgba::WHITE);
    }

    #[test]
    fn print_centered_pads_evenly() {
        let mut frame = Frame::new(7, 1);
        frame.print_centered(frame.area(), 0, "abc", Style::new());
        assert_eq!(frame.buffer.row_text(0), "  abc  ");
    }

    #[test]
    fn draw_border_outlines_area() {
        let mut frame = Frame::new(4, 3);
        frame.draw_border(frame.area(), BorderChars::ASCII, Style::new());
        assert_eq!(frame.buffer.to_text(), "+--+\n|  |\n+--+");
    }

    #[test]
    fn draw_border_skips_tiny_areas() {
        let mut frame = Frame::new(4, 3);
        frame.draw_border(Rect::new(0, 0, 1, 3), BorderChars::ASCII, Style::new());
        assert_eq!(frame.buffer.to_text(), "\n\n");
    }
}
