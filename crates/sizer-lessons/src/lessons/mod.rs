#![forbid(unsafe_code)]

//! Lesson modules.
//!
//! Each lesson implements the [`Lesson`] trait and can be reached through
//! the tab bar or its number key. A lesson is mounted when it becomes the
//! active tab and dropped when another tab is selected, so any timer it
//! declared disappears with it.

pub mod auto_resize;
pub mod manual_resize;
pub mod prop_drilling;
pub mod shared_context;
pub mod static_image;

use std::fmt;
use std::time::Duration;

use sizer_core::event::{Event, KeyCode};
use sizer_core::geometry::Rect;
use sizer_render::frame::Frame;
use sizer_widgets::button::{Button, render_row};
use sizer_widgets::{Block, ImageDisplay, Paragraph, Widget};

use crate::theme;

/// Source reference of the logo every lesson displays.
pub const LOGO_SRC: &str = "logo.svg";

/// Accessible label of the logo.
pub const LOGO_ALT: &str = "React logo";

/// Width every lesson starts with, in pixels.
pub const INITIAL_WIDTH: i32 = 300;

/// Pixels added or removed per manual click.
pub const STEP: i32 = 10;

/// Identifies a lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LessonId {
    StaticImage,
    ManualResize,
    AutoResize,
    PropDrilling,
    SharedContext,
}

impl LessonId {
    /// Lessons in tab order.
    pub const ALL: [LessonId; 5] = [
        LessonId::StaticImage,
        LessonId::ManualResize,
        LessonId::AutoResize,
        LessonId::PropDrilling,
        LessonId::SharedContext,
    ];

    /// Position in tab order, 0-based.
    pub fn index(self) -> usize {
        match self {
            LessonId::StaticImage => 0,
            LessonId::ManualResize => 1,
            LessonId::AutoResize => 2,
            LessonId::PropDrilling => 3,
            LessonId::SharedContext => 4,
        }
    }

    /// Lesson by 1-based tab number.
    pub fn from_number(n: usize) -> Option<Self> {
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    /// Name used on the command line.
    pub const fn slug(self) -> &'static str {
        match self {
            LessonId::StaticImage => "static-image",
            LessonId::ManualResize => "manual-resize",
            LessonId::AutoResize => "auto-resize",
            LessonId::PropDrilling => "prop-drilling",
            LessonId::SharedContext => "shared-context",
        }
    }

    /// Resolve a slug or a 1-based number.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Ok(n) = value.parse::<usize>() {
            return Self::from_number(n);
        }
        let value = value.to_ascii_lowercase().replace('_', "-");
        Self::ALL.into_iter().find(|id| id.slug() == value)
    }

    /// Title shown on the content block.
    pub const fn title(self) -> &'static str {
        match self {
            LessonId::StaticImage => "Week 3 · Displaying an image",
            LessonId::ManualResize => "Week 4 · Resizing with state",
            LessonId::AutoResize => "Week 4 · Auto resize with a timer",
            LessonId::PropDrilling => "Week 5 · Prop drilling",
            LessonId::SharedContext => "Week 5 · Shared context",
        }
    }

    /// Short name for the tab bar.
    pub const fn tab_label(self) -> &'static str {
        match self {
            LessonId::StaticImage => "Image",
            LessonId::ManualResize => "Resize",
            LessonId::AutoResize => "Auto",
            LessonId::PropDrilling => "Props",
            LessonId::SharedContext => "Context",
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Keybinding entry for the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyHint {
    pub key: &'static str,
    pub action: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self { key, action }
    }
}

/// An interactive lesson.
pub trait Lesson {
    /// Which lesson this is.
    fn id(&self) -> LessonId;

    /// Handle an input event. Returns whether lesson state changed.
    fn update(&mut self, event: &Event) -> bool;

    /// Render the lesson into the given area.
    fn view(&self, frame: &mut Frame, area: Rect);

    /// Interval of the recurring timer this lesson currently needs, if any.
    ///
    /// Re-read after every update; the runtime keeps exactly one timer
    /// running while this returns `Some` and none otherwise.
    fn timer(&self) -> Option<Duration> {
        None
    }

    /// Apply one firing of the lesson's timer.
    fn tick(&mut self) {}

    /// Keybindings specific to this lesson.
    fn keybindings(&self) -> Vec<KeyHint> {
        vec![]
    }
}

/// Construct a fresh lesson. `interval` is the auto-resize cadence.
pub fn mount(id: LessonId, interval: Duration) -> Box<dyn Lesson> {
    match id {
        LessonId::StaticImage => Box::new(static_image::StaticImage),
        LessonId::ManualResize => Box::new(manual_resize::ManualResize::new()),
        LessonId::AutoResize => {
            Box::new(auto_resize::AutoResize::new().with_interval(interval))
        }
        LessonId::PropDrilling => Box::new(prop_drilling::PropDrilling::new()),
        LessonId::SharedContext => Box::new(shared_context::SharedContext::new()),
    }
}

/// Draw a lesson's intro text, returning the area below it.
pub(crate) fn render_intro(frame: &mut Frame, area: Rect, lines: &[&str]) -> Rect {
    let mut paragraph = Paragraph::new();
    for line in lines {
        paragraph = paragraph.line(line, theme::muted());
    }
    let (top, rest) = area.split_top(paragraph.height() + 1);
    paragraph.render(top, frame);
    rest
}

/// Draw the logo at `width` pixels inside `area`.
pub(crate) fn render_logo(frame: &mut Frame, area: Rect, width: i32) {
    ImageDisplay::new(LOGO_SRC, LOGO_ALT)
        .width(width)
        .frame_style(theme::image_frame())
        .fill_style(theme::image_fill())
        .caption_style(theme::body())
        .render(area, frame);
}

/// Intro and +/- buttons shared by the week 5 lessons, returning the area below.
///
/// Both week 5 lessons draw exactly the same screen; only the way the width
/// reaches `Child4` differs.
pub(crate) fn render_week5_controls(frame: &mut Frame, area: Rect) -> Rect {
    let rest = render_intro(
        frame,
        area,
        &["Parent owns the width; only Child4 draws the image."],
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
    rest
}

/// Apply a +/- key to a week 5 width. Returns whether the width changed.
pub(crate) fn step_width(width: &mut i32, event: &Event) -> bool {
    match event.pressed_key().map(|k| k.code) {
        Some(KeyCode::Char('+' | '=')) => *width = width.saturating_add(STEP),
        Some(KeyCode::Char('-' | '_')) => *width = width.saturating_sub(STEP),
        _ => return false,
    }
    true
}

/// Draw one link of the Parent → Child4 chain, returning its inner area.
pub(crate) fn render_chain_block(frame: &mut Frame, area: Rect, name: &str) -> Rect {
    let block = Block::bordered()
        .title(name)
        .border_style(theme::border())
        .title_style(theme::title());
    block.render(area, frame);
    block.inner(area)
}
