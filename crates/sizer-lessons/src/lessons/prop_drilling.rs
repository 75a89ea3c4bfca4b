#![forbid(unsafe_code)]

//! Week 5 starter: the width is handed down through every child.
//!
//! `Child1` to `Child3` never use the width themselves; they take it as a
//! parameter only so they can pass it on to `Child4`.

use sizer_core::event::Event;
use sizer_core::geometry::Rect;
use sizer_render::frame::Frame;

use super::{
    INITIAL_WIDTH, KeyHint, Lesson, LessonId, render_chain_block, render_logo,
    render_week5_controls, step_width,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropDrilling {
    width: i32,
}

impl Default for PropDrilling {
    fn default() -> Self {
        Self::new()
    }
}

impl PropDrilling {
    pub fn new() -> Self {
        Self {
            width: INITIAL_WIDTH,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }
}

impl Lesson for PropDrilling {
    fn id(&self) -> LessonId {
        LessonId::PropDrilling
    }

    fn update(&mut self, event: &Event) -> bool {
        step_width(&mut self.width, event)
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let rest = render_week5_controls(frame, area);
        parent(frame, rest, self.width);
    }

    fn keybindings(&self) -> Vec<KeyHint> {
        vec![KeyHint::new("+", "increase"), KeyHint::new("-", "decrease")]
    }
}

fn parent(frame: &mut Frame, area: Rect, width: i32) {
    let inner = render_chain_block(frame, area, "Parent");
    child1(frame, inner, width);
}

fn child1(frame: &mut Frame, area: Rect, width: i32) {
    let inner = render_chain_block(frame, area, "Child1");
    child2(frame, inner, width);
}

fn child2(frame: &mut Frame, area: Rect, width: i32) {
    let inner = render_chain_block(frame, area, "Child2");
    child3(frame, inner, width);
}

fn child3(frame: &mut Frame, area: Rect, width: i32) {
    let inner = render_chain_block(frame, area, "Child3");
    child4(frame, inner, width);
}

fn child4(frame: &mut Frame, area: Rect, width: i32) {
    let inner = render_chain_block(frame, area, "Child4");
    render_logo(frame, inner, width);
}
