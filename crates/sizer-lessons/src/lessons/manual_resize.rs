#![forbid(unsafe_code)]

//! Week 4 starter: two buttons resize the image by a fixed step.

use sizer_core::event::{Event, KeyCode};
use sizer_core::geometry::Rect;
use sizer_render::frame::Frame;
use sizer_widgets::button::{Button, render_row};

use super::{INITIAL_WIDTH, KeyHint, Lesson, LessonId, STEP, render_intro, render_logo};
use crate::theme;

/// Size state changed only by the buttons. No bounds are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualResize {
    size: i32,
}

impl Default for ManualResize {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualResize {
    pub fn new() -> Self {
        Self {
            size: INITIAL_WIDTH,
        }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn increment(&mut self) {
        self.size = self.size.saturating_add(STEP);
    }

    pub fn decrement(&mut self) {
        self.size = self.size.saturating_sub(STEP);
    }
}

impl Lesson for ManualResize {
    fn id(&self) -> LessonId {
        LessonId::ManualResize
    }

    fn update(&mut self, event: &Event) -> bool {
        match event.pressed_key().map(|k| k.code) {
            Some(KeyCode::Char('+' | '=')) => self.increment(),
            Some(KeyCode::Char('-' | '_')) => self.decrement(),
            _ => return false,
        }
        true
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let rest = render_intro(
            frame,
            area,
            &["Each click re-renders the image with the new size."],
        );
        let (buttons_row, rest) = rest.split_top(2);
        let buttons = [
            Button::new("+", "increase")
                .key_style(theme::key_hint())
                .label_style(theme::body()),
            Button::new("-", "decrease")
                .key_style(theme::key_hint())
                .label_style(theme::body()),
        ];
        render_row(&buttons, theme::BUTTON_GAP, buttons_row, frame);
        render_logo(frame, rest, self.size);
    }

    fn keybindings(&self) -> Vec<KeyHint> {
        vec![KeyHint::new("+", "increase"), KeyHint::new("-", "decrease")]
    }
}
