#![forbid(unsafe_code)]

use sizer_core::geometry::Rect;
use sizer_render::frame::Frame;
use sizer_render::style::Style;

use crate::Widget;

/// Lines of text drawn top to bottom, clipped to the area.
#[derive(Debug, Clone, Default)]
pub struct Paragraph<'a> {
    lines: Vec<(&'a str, Style)>,
    centered: bool,
}

impl<'a> Paragraph<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line with its own style.
    pub fn line(mut self, text: &'a str, style: Style) -> Self {
        self.lines.push((text, style));
        self
    }

    /// Center every line horizontally.
    pub fn centered(mut self) -> Self {
        self.centered = true;
        self
    }

    /// Rows needed to show every line.
    pub fn height(&self) -> u16 {
        self.lines.len().min(u16::MAX as usize) as u16
    }
}

impl Widget for Paragraph<'_> {
    fn render(&self, area: Rect, frame: &mut Frame) {
        for (row, (text, style)) in self.lines.iter().enumerate().take(area.height as usize) {
            let y = area.y + row as u16;
            if self.centered {
                frame.print_centered(area, y, text, *style);
            } else {
                frame.print_text(area.x, y, text, *style, area.right());
            }
        }
    }
}
