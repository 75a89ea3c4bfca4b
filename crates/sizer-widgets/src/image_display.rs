#![forbid(unsafe_code)]

//! Passive image display.
//!
//! A terminal cannot show the logo itself, so the image is drawn as a box
//! whose on-screen size follows the pixel width it was given, with a caption
//! naming the image and its width underneath. The widget owns no state:
//! everything it draws comes from its three parameters.
//!
//! # Size mapping
//!
//! - One column per [`PX_PER_CELL`] pixels, at least one column.
//! - One row per four columns (cells are roughly twice as tall as wide and
//!   the logo is square), at least one row.
//! - A width of zero or less draws no box at all; the caption still shows.

use sizer_core::geometry::Rect;
use sizer_render::frame::{BorderChars, Frame};
use sizer_render::style::Style;

use crate::{Widget, truncate_to_width};

/// Pixels represented by one terminal column.
pub const PX_PER_CELL: i32 = 10;

/// Rows reserved below the box for the caption.
pub const CAPTION_ROWS: u16 = 2;

/// Box size in cells for a pixel width, or `None` when nothing is visible.
pub fn cells_for(width_px: i32) -> Option<(u16, u16)> {
    if width_px <= 0 {
        return None;
    }
    let cols = (width_px / PX_PER_CELL).clamp(1, u16::MAX as i32) as u16;
    let rows = (cols / 4).max(1);
    Some((cols, rows))
}

/// Shows an image reference at a given pixel width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDisplay<'a> {
    src: &'a str,
    alt: &'a str,
    width: i32,
    frame_style: Style,
    fill_style: Style,
    caption_style: Style,
}

impl<'a> ImageDisplay<'a> {
    /// An image with no width yet; call [`width`](Self::width) to size it.
    pub fn new(src: &'a str, alt: &'a str) -> Self {
        Self {
            src,
            alt,
            width: 0,
            frame_style: Style::new(),
            fill_style: Style::new(),
            caption_style: Style::new(),
        }
    }

    /// Rendered width in pixels. Any integer is accepted.
    pub fn width(mut self, width_px: i32) -> Self {
        self.width = width_px;
        self
    }

    pub fn frame_style(mut self, style: Style) -> Self {
        self.frame_style = style;
        self
    }

    pub fn fill_style(mut self, style: Style) -> Self {
        self.fill_style = style;
        self
    }

    pub fn caption_style(mut self, style: Style) -> Self {
        self.caption_style = style;
        self
    }

    /// The caption line, e.g. `React logo · 300px`.
    pub fn caption(&self) -> String {
        format!("{} · {}px", self.alt, self.width)
    }

    /// Rows needed to draw the unclipped image and its caption.
    pub fn height(&self) -> u16 {
        cells_for(self.width).map_or(0, |(_, rows)| rows) + CAPTION_ROWS
    }

    fn render_box(&self, area: Rect, frame: &mut Frame) {
        if area.width >= 2 && area.height >= 2 {
            frame.draw_border(area, BorderChars::ROUNDED, self.frame_style);
            let inner = Rect::new(area.x + 1, area.y + 1, area.width - 2, area.height - 2);
            frame.fill(inner, '░', self.fill_style);
            if !inner.is_empty() {
                let label = truncate_to_width(self.alt, inner.width);
                frame.print_centered(inner, inner.y + inner.height / 2, &label, self.fill_style);
            }
        } else {
            // Too small for an outline: a solid bar still shows the width.
            frame.fill(area, '▄', self.frame_style);
        }
    }
}

impl Widget for ImageDisplay<'_> {
    fn render(&self, area: Rect, frame: &mut Frame) {
        let area = area.intersection(&frame.area());
        if area.is_empty() {
            return;
        }

        let box_rows = match cells_for(self.width) {
            Some((cols, rows)) => {
                let room = area.height.saturating_sub(CAPTION_ROWS).max(1);
                let image = Rect::new(area.x, area.y, cols.min(area.width), rows.min(room));
                self.render_box(image, frame);
                image.height
            }
            None => 0,
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(width_px = self.width, box_rows, "image display rendered");

        let caption_y = area.y + box_rows;
        if caption_y < area.bottom() {
            frame.print_text(area.x, caption_y, &self.caption(), self.caption_style, area.right());
        }
        if caption_y + 1 < area.bottom() {
            let src = format!("src: {}", self.src);
            frame.print_text(area.x, caption_y + 1, &src, self.caption_style, area.right());
        }
    }
}
