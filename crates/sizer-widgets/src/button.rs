#![forbid(unsafe_code)]

//! Key-hinted buttons.
//!
//! The lessons are keyboard driven, so a button is its key hint plus a
//! label: `[+] increase`.

use sizer_core::geometry::Rect;
use sizer_render::frame::Frame;
use sizer_render::style::Style;

use crate::{Widget, text_width};

/// A single key-hinted button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button<'a> {
    key: &'a str,
    label: &'a str,
    key_style: Style,
    label_style: Style,
    disabled_style: Style,
    enabled: bool,
}

impl<'a> Button<'a> {
    pub fn new(key: &'a str, label: &'a str) -> Self {
        Self {
            key,
            label,
            key_style: Style::new().bold(),
            label_style: Style::new(),
            disabled_style: Style::new(),
            enabled: true,
        }
    }

    pub fn key_style(mut self, style: Style) -> Self {
        self.key_style = style;
        self
    }

    pub fn label_style(mut self, style: Style) -> Self {
        self.label_style = style;
        self
    }

    /// Style layered over the whole button when it is disabled.
    pub fn disabled_style(mut self, style: Style) -> Self {
        self.disabled_style = style;
        self
    }

    /// A disabled button is still drawn, in `disabled_style`.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Columns the button occupies.
    pub fn width(&self) -> u16 {
        text_width(self.key) + text_width(self.label) + 3
    }
}

impl Widget for Button<'_> {
    fn render(&self, area: Rect, frame: &mut Frame) {
        if area.is_empty() {
            return;
        }
        let max_x = area.right();
        let y = area.y;
        let (key_style, label_style) = if self.enabled {
            (self.key_style, self.label_style)
        } else {
            (self.disabled_style, self.disabled_style)
        };
        let x = frame.print_text(area.x, y, "[", label_style, max_x);
        let x = frame.print_text(x, y, self.key, key_style, max_x);
        let x = frame.print_text(x, y, "] ", label_style, max_x);
        frame.print_text(x, y, self.label, label_style, max_x);
    }
}

/// Lay buttons out left to right with `gap` columns between them.
///
/// Buttons that do not fit are dropped.
pub fn render_row(buttons: &[Button<'_>], gap: u16, area: Rect, frame: &mut Frame) {
    let mut x = area.x;
    for button in buttons {
        let w = button.width();
        if x.saturating_add(w) > area.right() {
            break;
        }
        button.render(Rect::new(x, area.y, w, 1), frame);
        x = x.saturating_add(w).saturating_add(gap);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sizer_render::cell::{PackedRgba, StyleFlags};

    #[test]
    fn renders_key_hint_and_label() {
        let mut frame = Frame::new(20, 1);
        let button = Button::new("+", "increase");
        assert_eq!(button.width(), 12);
        button.render(frame.area(), &mut frame);
        assert_eq!(frame.buffer.to_text(), "[+] increase");
        assert!(frame.buffer.get(1, 0).unwrap().attrs.contains(StyleFlags::BOLD));
    }

    #[test]
    fn disabled_button_uses_disabled_style() {
        let grey = PackedRgba::rgb(90, 90, 90);
        let mut frame = Frame::new(20, 1);
        Button::new("-", "decrease")
            .disabled_style(Style::new().fg(grey))
            .enabled(false)
            .render(frame.area(), &mut frame);
        assert_eq!(frame.buffer.get(1, 0).unwrap().fg, grey);
        assert!(!frame.buffer.get(1, 0).unwrap().attrs.contains(StyleFlags::BOLD));
    }

    #[test]
    fn row_drops_buttons_that_do_not_fit() {
        let mut frame = Frame::new(20, 1);
        let buttons = [Button::new("+", "increase"), Button::new("-", "decrease")];
        render_row(&buttons, 2, frame.area(), &mut frame);
        assert_eq!(frame.buffer.to_text(), "[+] increase");
    }

    #[test]
    fn row_spaces_buttons() {
        let mut frame = Frame::new(30, 1);
        let buttons = [Button::new("+", "up"), Button::new("p", "Play")];
        render_row(&buttons, 2, frame.area(), &mut frame);
        assert_eq!(frame.buffer.to_text(), "[+] up  [p] Play");
    }
}
