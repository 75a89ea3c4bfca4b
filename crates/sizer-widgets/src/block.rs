#![forbid(unsafe_code)]

use bitflags::bitflags;
use sizer_core::geometry::{Rect, Sides};
use sizer_render::frame::{BorderChars, Frame};
use sizer_render::style::Style;

use crate::{Widget, truncate_to_width};

bitflags! {
    /// Which sides of a block get a border.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Borders: u8 {
        const TOP    = 0b0001;
        const RIGHT  = 0b0010;
        const BOTTOM = 0b0100;
        const LEFT   = 0b1000;
        const ALL    = Self::TOP.bits() | Self::RIGHT.bits() | Self::BOTTOM.bits() | Self::LEFT.bits();
    }
}

/// A widget that draws a block with optional borders and a title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block<'a> {
    borders: Borders,
    border_style: Style,
    border_chars: BorderChars,
    title: Option<&'a str>,
    title_style: Style,
}

impl Default for Block<'_> {
    fn default() -> Self {
        Self {
            borders: Borders::empty(),
            border_style: Style::new(),
            border_chars: BorderChars::ROUNDED,
            title: None,
            title_style: Style::new(),
        }
    }
}

impl<'a> Block<'a> {
    /// No borders, no title.
    pub fn new() -> Self {
        Self::default()
    }

    /// Borders on all four sides.
    pub fn bordered() -> Self {
        Self::default().borders(Borders::ALL)
    }

    pub fn borders(mut self, borders: Borders) -> Self {
        self.borders = borders;
        self
    }

    pub fn border_style(mut self, style: Style) -> Self {
        self.border_style = style;
        self
    }

    pub fn border_chars(mut self, chars: BorderChars) -> Self {
        self.border_chars = chars;
        self
    }

    /// Label drawn into the top border. Ignored without [`Borders::TOP`].
    pub fn title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    pub fn title_style(mut self, style: Style) -> Self {
        self.title_style = style;
        self
    }

    /// Area left for content once the enabled borders are drawn.
    pub fn inner(&self, area: Rect) -> Rect {
        let edge = |side: Borders| u16::from(self.borders.contains(side));
        area.inner(Sides::new(
            edge(Borders::TOP),
            edge(Borders::RIGHT),
            edge(Borders::BOTTOM),
            edge(Borders::LEFT),
        ))
    }

    fn render_borders(&self, area: Rect, frame: &mut Frame) {
        if self.borders == Borders::ALL {
            frame.draw_border(area, self.border_chars, self.border_style);
            return;
        }
        let chars = self.border_chars;
        let horizontal = chars.horizontal.to_string();
        if self.borders.contains(Borders::TOP) {
            let line = horizontal.repeat(area.width as usize);
            frame.print_text(area.x, area.y, &line, self.border_style, area.right());
        }
        if self.borders.contains(Borders::BOTTOM) && area.height > 0 {
            let line = horizontal.repeat(area.width as usize);
            frame.print_text(area.x, area.bottom() - 1, &line, self.border_style, area.right());
        }
        for y in area.y..area.bottom() {
            if self.borders.contains(Borders::LEFT) {
                frame.fill(Rect::new(area.x, y, 1, 1), chars.vertical, self.border_style);
            }
            if self.borders.contains(Borders::RIGHT) && area.width > 0 {
                frame.fill(Rect::new(area.right() - 1, y, 1, 1), chars.vertical, self.border_style);
            }
        }
    }
}

impl Widget for Block<'_> {
    fn render(&self, area: Rect, frame: &mut Frame) {
        let area = area.intersection(&frame.area());
        if area.is_empty() {
            return;
        }

        self.render_borders(area, frame);

        if let Some(title) = self.title
            && self.borders.contains(Borders::TOP)
            && area.width > 4
        {
            let label = truncate_to_width(title, area.width - 4);
            let x = area.x + 1;
            let x = frame.print_text(x, area.y, " ", self.border_style, area.right() - 1);
            let x = frame.print_text(x, area.y, &label, self.title_style, area.right() - 1);
            frame.print_text(x, area.y, " ", self.border_style, area.right() - 1);
        }
    }
}
