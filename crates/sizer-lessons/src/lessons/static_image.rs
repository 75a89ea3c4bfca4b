#![forbid(unsafe_code)]

//! Week 3: a passive image display at a fixed width.

use sizer_core::event::Event;
use sizer_core::geometry::Rect;
use sizer_render::frame::Frame;

use super::{INITIAL_WIDTH, Lesson, LessonId, render_intro, render_logo};

/// Shows the logo at its initial width. Holds no state.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticImage;

impl Lesson for StaticImage {
    fn id(&self) -> LessonId {
        LessonId::StaticImage
    }

    fn update(&mut self, _event: &Event) -> bool {
        false
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let rest = render_intro(
            frame,
            area,
            &["The image component only receives a source, a label, and a width."],
        );
        render_logo(frame, rest, INITIAL_WIDTH);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_logo_at_initial_width() {
        let mut frame = Frame::new(60, 16);
        let area = frame.area();
        StaticImage.view(&mut frame, area);
        assert!(frame.buffer.contains_text("React logo · 300px"));
        assert!(frame.buffer.contains_text("src: logo.svg"));
    }

    #[test]
    fn ignores_input() {
        let mut lesson = StaticImage;
        assert!(!lesson.update(&Event::char('+')));
        assert!(lesson.timer().is_none());
    }
}
