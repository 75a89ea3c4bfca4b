#![forbid(unsafe_code)]

//! Week 5 final: the width is provided once and read where it is needed.
//!
//! `Parent` provides a [`Width`] for its subtree. The intermediate children
//! take no width at all; `Child4` looks up the nearest provided value.

use sizer_core::event::Event;
use sizer_core::geometry::Rect;
use sizer_render::frame::Frame;
use sizer_runtime::Context;

use super::{
    INITIAL_WIDTH, KeyHint, Lesson, LessonId, render_chain_block, render_logo,
    render_week5_controls, step_width,
};

/// The shared width channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Width(pub i32);

impl Width {
    /// What `Child4` sees when no ancestor provides a width.
    pub const DEFAULT: Width = Width(INITIAL_WIDTH);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedContext {
    width: i32,
}

impl Default for SharedContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedContext {
    pub fn new() -> Self {
        Self {
            width: INITIAL_WIDTH,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }
}

impl Lesson for SharedContext {
    fn id(&self) -> LessonId {
        LessonId::SharedContext
    }

    fn update(&mut self, event: &Event) -> bool {
        step_width(&mut self.width, event)
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let rest = render_week5_controls(frame, area);
        let mut cx = Context::new();
        parent(frame, rest, &mut cx, self.width);
    }

    fn keybindings(&self) -> Vec<KeyHint> {
        vec![KeyHint::new("+", "increase"), KeyHint::new("-", "decrease")]
    }
}

fn parent(frame: &mut Frame, area: Rect, cx: &mut Context, width: i32) {
    cx.provide(Width(width), |cx| {
        let inner = render_chain_block(frame, area, "Parent");
        child1(frame, inner, cx);
    });
}

fn child1(frame: &mut Frame, area: Rect, cx: &Context) {
    let inner = render_chain_block(frame, area, "Child1");
    child2(frame, inner, cx);
}

fn child2(frame: &mut Frame, area: Rect, cx: &Context) {
    let inner = render_chain_block(frame, area, "Child2");
    child3(frame, inner, cx);
}

fn child3(frame: &mut Frame, area: Rect, cx: &Context) {
    let inner = render_chain_block(frame, area, "Child3");
    child4(frame, inner, cx);
}

fn child4(frame: &mut Frame, area: Rect, cx: &Context) {
    let Width(width) = *cx.consume_or(&Width::DEFAULT);
    let inner = render_chain_block(frame, area, "Child4");
    render_logo(frame, inner, width);
}
