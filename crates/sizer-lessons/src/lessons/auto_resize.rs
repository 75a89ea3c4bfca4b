#![forbid(unsafe_code)]

//! Auto-resize controller.
//!
//! One size and one auto flag. In manual mode the buttons change the size
//! by [`STEP`]; in auto mode they are ignored and a recurring timer cycles
//! the size instead (300, 400, 500, 100, 200, ... from the initial size).
//!
//! The controller never owns a timer handle. It reports the timer it needs
//! through [`AutoResize::timer`], and the runtime starts or cancels the
//! single recurring callback to match after every update, including the
//! update that unmounts the lesson.

use std::time::Duration;

use sizer_core::event::{Event, KeyCode};
use sizer_core::geometry::Rect;
use sizer_render::frame::Frame;
use sizer_widgets::button::{Button, render_row};

use super::{INITIAL_WIDTH, KeyHint, Lesson, LessonId, STEP, render_intro, render_logo};
use crate::theme;

/// Default cadence of the auto-resize timer.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);

/// Sizes produced by the timer repeat with this period.
pub const CYCLE_MODULUS: i32 = 500;

/// Smallest size produced by the timer.
pub const CYCLE_FLOOR: i32 = 100;

/// The size after one timer firing.
///
/// For non-negative sizes this is `(size mod 500) + 100`. Negative sizes
/// (reachable by decrementing in manual mode) use the Euclidean remainder,
/// so the result is always in `[100, 600)`: -10 becomes 590. The JavaScript
/// lesson this follows uses a truncating `%` and would give 90 there.
pub const fn next_cycle_size(size: i32) -> i32 {
    size.rem_euclid(CYCLE_MODULUS) + CYCLE_FLOOR
}

/// Manual or auto mode, as observed by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Manual,
    Auto,
}

/// The auto-resize controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoResize {
    size: i32,
    auto: bool,
    interval: Duration,
}

impl Default for AutoResize {
    fn default() -> Self {
        Self::new()
    }
}

impl AutoResize {
    /// Size 300, manual mode, one-second cadence.
    pub fn new() -> Self {
        Self {
            size: INITIAL_WIDTH,
            auto: false,
            interval: DEFAULT_INTERVAL,
        }
    }

    /// Use a different timer cadence. A zero interval keeps the default.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        if !interval.is_zero() {
            self.interval = interval;
        }
        self
    }

    /// Start from a given size.
    pub fn with_size(mut self, size: i32) -> Self {
        self.size = size;
        self
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn is_auto(&self) -> bool {
        self.auto
    }

    pub fn mode(&self) -> Mode {
        if self.auto { Mode::Auto } else { Mode::Manual }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Grow by [`STEP`] in manual mode. Ignored in auto mode.
    ///
    /// Returns whether the size changed.
    pub fn increment(&mut self) -> bool {
        if self.auto {
            return false;
        }
        self.size = self.size.saturating_add(STEP);
        true
    }

    /// Shrink by [`STEP`] in manual mode. Ignored in auto mode.
    ///
    /// No lower bound: the size may go to zero or below.
    pub fn decrement(&mut self) -> bool {
        if self.auto {
            return false;
        }
        self.size = self.size.saturating_sub(STEP);
        true
    }

    /// Flip between manual and auto mode.
    pub fn toggle_auto(&mut self) {
        self.auto = !self.auto;
        tracing::info!(auto = self.auto, size = self.size, "auto mode toggled");
    }

    /// Apply one timer firing. Auto mode is left untouched.
    pub fn advance(&mut self) {
        let before = self.size;
        self.size = next_cycle_size(before);
        tracing::trace!(before, after = self.size, "auto resize tick");
    }

    /// The recurring timer this controller needs: `Some` iff in auto mode.
    pub fn timer(&self) -> Option<Duration> {
        self.auto.then_some(self.interval)
    }

    /// Label of the toggle button.
    pub fn toggle_label(&self) -> &'static str {
        if self.auto { "Pause" } else { "Play" }
    }
}

impl Lesson for AutoResize {
    fn id(&self) -> LessonId {
        LessonId::AutoResize
    }

    fn update(&mut self, event: &Event) -> bool {
        let Some(key) = event.pressed_key() else {
            return false;
        };
        match key.code {
            KeyCode::Char('+' | '=') => self.increment(),
            KeyCode::Char('-' | '_') => self.decrement(),
            KeyCode::Char('p' | ' ') | KeyCode::MediaPlayPause => {
                self.toggle_auto();
                true
            }
            _ => false,
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let rest = render_intro(
            frame,
            area,
            &[
                "Play starts a timer that cycles the size every tick; Pause cancels it.",
                "While playing, the +/- buttons are ignored.",
            ],
        );
        let (buttons_row, rest) = rest.split_top(1);
        let manual = !self.auto;
        let buttons = [
            Button::new("+", "increase")
                .key_style(theme::key_hint())
                .label_style(theme::body())
                .disabled_style(theme::disabled())
                .enabled(manual),
            Button::new("-", "decrease")
                .key_style(theme::key_hint())
                .label_style(theme::body())
                .disabled_style(theme::disabled())
                .enabled(manual),
            Button::new("p", self.toggle_label())
                .key_style(theme::key_hint())
                .label_style(if self.auto {
                    theme::playing()
                } else {
                    theme::body()
                }),
        ];
        render_row(&buttons, theme::BUTTON_GAP, buttons_row, frame);

        let (status_row, rest) = rest.split_top(2);
        let status = match self.mode() {
            Mode::Manual => format!("size {}px · manual", self.size),
            Mode::Auto => format!(
                "size {}px · auto, every {}ms",
                self.size,
                self.interval.as_millis()
            ),
        };
        frame.print_text(status_row.x, status_row.y, &status, theme::muted(), status_row.right());

        render_logo(frame, rest, self.size);
    }

    fn timer(&self) -> Option<Duration> {
        AutoResize::timer(self)
    }

    fn tick(&mut self) {
        self.advance();
    }

    fn keybindings(&self) -> Vec<KeyHint> {
        vec![
            KeyHint::new("+", "increase"),
            KeyHint::new("-", "decrease"),
            KeyHint::new("p", if self.auto { "pause" } else { "play" }),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_manual_at_300() {
        let c = AutoResize::new();
        assert_eq!(c.size(), 300);
        assert_eq!(c.mode(), Mode::Manual);
        assert_eq!(c.timer(), None);
        assert_eq!(c.toggle_label(), "Play");
    }

    #[test]
    fn manual_buttons_step_by_ten() {
        let mut c = AutoResize::new();
        assert!(c.increment());
        assert!(c.increment());
        assert!(c.decrement());
        assert_eq!(c.size(), 310);
    }

    #[test]
    fn buttons_ignored_in_auto() {
        let mut c = AutoResize::new();
        c.toggle_auto();
        assert!(!c.increment());
        assert!(!c.decrement());
        assert_eq!(c.size(), 300);
        assert!(c.is_auto());
    }

    #[test]
    fn toggle_controls_timer() {
        let mut c = AutoResize::new();
        c.toggle_auto();
        assert_eq!(c.timer(), Some(DEFAULT_INTERVAL));
        assert_eq!(c.toggle_label(), "Pause");
        c.toggle_auto();
        assert_eq!(c.timer(), None);
    }

    #[test]
    fn cycle_from_300() {
        let mut c = AutoResize::new();
        c.toggle_auto();
        let mut seen = Vec::new();
        for _ in 0..6 {
            c.advance();
            seen.push(c.size());
        }
        assert_eq!(seen, [400, 500, 100, 200, 300, 400]);
        assert!(c.is_auto());
    }

    #[test]
    fn cycle_handles_out_of_range_sizes() {
        assert_eq!(next_cycle_size(0), 100);
        assert_eq!(next_cycle_size(499), 599);
        assert_eq!(next_cycle_size(1230), 330);
        assert_eq!(next_cycle_size(-10), 590);
        assert_eq!(next_cycle_size(-500), 100);
    }

    #[test]
    fn manual_decrement_is_unclamped() {
        let mut c = AutoResize::new().with_size(0);
        c.decrement();
        assert_eq!(c.size(), -10);
    }

    #[test]
    fn zero_interval_keeps_default() {
        let c = AutoResize::new().with_interval(Duration::ZERO);
        assert_eq!(c.interval(), DEFAULT_INTERVAL);
        let c = AutoResize::new().with_interval(Duration::from_millis(250));
        assert_eq!(c.interval(), Duration::from_millis(250));
    }

    #[test]
    fn keys_map_to_operations() {
        let mut c = AutoResize::new();
        assert!(c.update(&Event::char('+')));
        assert!(c.update(&Event::char('=')));
        assert!(c.update(&Event::char('_')));
        assert_eq!(c.size(), 310);
        assert!(c.update(&Event::char(' ')));
        assert!(c.is_auto());
        assert!(!c.update(&Event::char('-')));
        assert!(c.update(&Event::char('p')));
        assert!(!c.is_auto());
        assert!(!c.update(&Event::char('x')));
    }

    #[test]
    fn view_shows_buttons_and_logo() {
        let mut frame = Frame::new(80, 20);
        let c = AutoResize::new();
        let area = frame.area();
        c.view(&mut frame, area);
        assert!(frame.buffer.contains_text("[+] increase"));
        assert!(frame.buffer.contains_text("[-] decrease"));
        assert!(frame.buffer.contains_text("[p] Play"));
        assert!(frame.buffer.contains_text("React logo · 300px"));
    }
}
