#![forbid(unsafe_code)]

//! Top-level lesson shell.
//!
//! A tab bar across the top, the active lesson in a titled block, and a
//! status line with key hints. Only the active lesson exists: switching tabs
//! drops the current lesson and mounts a fresh one, and because the shell
//! declares timers from the active lesson's state, the old lesson's timer is
//! cancelled by the same update that unmounts it.

use std::time::Duration;

use sizer_core::event::{Event, KeyCode};
use sizer_core::geometry::{Rect, Sides};
use sizer_render::frame::Frame;
use sizer_runtime::program::{Cmd, Model};
use sizer_runtime::subscription::{Every, SubId, Subscription};
use sizer_widgets::{Block, Widget};
use tracing::{debug, info, trace};

use crate::lessons::auto_resize::DEFAULT_INTERVAL;
use crate::lessons::{self, Lesson, LessonId};
use crate::theme;

/// Subscription id of a lesson timer; the lesson index is added.
const LESSON_TIMER_BASE: SubId = 0x4c45_5353_4f4e_0000;

/// Subscription id of the auto-quit timer.
const EXIT_TIMER_ID: SubId = 0x4558_4954_0000_0000;

/// Messages handled by [`AppModel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppMsg {
    /// A raw terminal event, offered to the shell and then the lesson.
    LessonEvent(Event),
    /// Switch to a specific lesson.
    SwitchLesson(LessonId),
    /// Advance to the next lesson tab.
    NextLesson,
    /// Go back to the previous lesson tab.
    PrevLesson,
    /// One firing of the active lesson's timer.
    LessonTick,
    /// Terminal resize.
    Resize { width: u16, height: u16 },
    /// Quit the application.
    Quit,
}

impl From<Event> for AppMsg {
    fn from(event: Event) -> Self {
        if let Event::Resize { width, height } = event {
            return Self::Resize { width, height };
        }
        Self::LessonEvent(event)
    }
}

/// Top-level application state.
pub struct AppModel {
    current: LessonId,
    lesson: Box<dyn Lesson>,
    interval: Duration,
    exit_after: Option<Duration>,
    lesson_ticks: u64,
    switches: u64,
}

impl Default for AppModel {
    fn default() -> Self {
        Self::new(LessonId::AutoResize)
    }
}

impl AppModel {
    /// Start on `lesson` with the default auto-resize cadence.
    pub fn new(lesson: LessonId) -> Self {
        Self {
            current: lesson,
            lesson: lessons::mount(lesson, DEFAULT_INTERVAL),
            interval: DEFAULT_INTERVAL,
            exit_after: None,
            lesson_ticks: 0,
            switches: 0,
        }
    }

    /// Use `interval` as the auto-resize cadence. Zero keeps the default.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        if !interval.is_zero() {
            self.interval = interval;
            self.lesson = lessons::mount(self.current, interval);
        }
        self
    }

    /// Quit on its own after `after`. `None` or zero disables.
    pub fn with_exit_after(mut self, after: Option<Duration>) -> Self {
        self.exit_after = after.filter(|d| !d.is_zero());
        self
    }

    pub fn current_lesson(&self) -> LessonId {
        self.current
    }

    pub fn lesson(&self) -> &dyn Lesson {
        self.lesson.as_ref()
    }

    /// Timer firings delivered to lessons so far.
    pub fn lesson_ticks(&self) -> u64 {
        self.lesson_ticks
    }

    /// Number of lesson switches so far.
    pub fn switches(&self) -> u64 {
        self.switches
    }

    fn switch_to(&mut self, id: LessonId) {
        if id == self.current {
            return;
        }
        info!(from = %self.current, to = %id, "lesson switched");
        // Dropping the old lesson is its unmount; the reconcile after this
        // update stops whatever timer it had declared.
        self.lesson = lessons::mount(id, self.interval);
        self.current = id;
        self.switches += 1;
    }

    /// Shell-level keys, checked before the lesson sees the event.
    fn global_action(event: &Event) -> Option<AppMsg> {
        let key = event.pressed_key()?;
        if key.ctrl() && key.is_char('c') {
            return Some(AppMsg::Quit);
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Escape => Some(AppMsg::Quit),
            KeyCode::Tab => Some(AppMsg::NextLesson),
            KeyCode::BackTab => Some(AppMsg::PrevLesson),
            KeyCode::Char(c @ '1'..='9') => c
                .to_digit(10)
                .and_then(|n| LessonId::from_number(n as usize))
                .map(AppMsg::SwitchLesson),
            _ => None,
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        frame.fill(area, ' ', theme::tab_inactive());
        let mut x = area.x;
        for id in LessonId::ALL {
            let label = format!(" {} {} ", id.index() + 1, id.tab_label());
            let style = if id == self.current {
                theme::tab_active()
            } else {
                theme::tab_inactive()
            };
            x = frame.print_text(x, area.y, &label, style, area.right());
        }
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        frame.fill(area, ' ', theme::status_bar());
        let mut parts: Vec<String> = self
            .lesson
            .keybindings()
            .iter()
            .map(|hint| format!("{} {}", hint.key, hint.action))
            .collect();
        parts.push("1-5 lesson".into());
        parts.push("Tab next".into());
        parts.push("q quit".into());
        let text = format!(" {}", parts.join("  "));
        frame.print_text(area.x, area.y, &text, theme::status_bar(), area.right());
    }
}

impl Model for AppModel {
    type Message = AppMsg;

    fn init(&mut self) -> Cmd<AppMsg> {
        info!(lesson = %self.current, interval_ms = self.interval.as_millis() as u64, "lessons started");
        Cmd::none()
    }

    fn update(&mut self, msg: AppMsg) -> Cmd<AppMsg> {
        match msg {
            AppMsg::LessonEvent(event) => {
                if let Some(action) = Self::global_action(&event) {
                    return self.update(action);
                }
                if self.lesson.update(&event) {
                    debug!(lesson = %self.current, "lesson state changed");
                }
            }
            AppMsg::SwitchLesson(id) => self.switch_to(id),
            AppMsg::NextLesson => self.switch_to(self.current.next()),
            AppMsg::PrevLesson => self.switch_to(self.current.prev()),
            AppMsg::LessonTick => {
                self.lesson_ticks += 1;
                trace!(lesson = %self.current, ticks = self.lesson_ticks, "lesson tick");
                self.lesson.tick();
            }
            AppMsg::Resize { width, height } => {
                debug!(width, height, "terminal resized");
            }
            AppMsg::Quit => {
                info!(ticks = self.lesson_ticks, switches = self.switches, "quitting");
                return Cmd::quit();
            }
        }
        Cmd::none()
    }

    fn view(&self, frame: &mut Frame) {
        let area = frame.area();
        let (tabs, rest) = area.split_top(1);
        let (body, status) = rest.split_bottom(1);

        self.render_tab_bar(frame, tabs);

        let block = Block::bordered()
            .title(self.current.title())
            .border_style(theme::border())
            .title_style(theme::title());
        block.render(body, frame);
        let content = block.inner(body).inner(Sides::horizontal(1));
        self.lesson.view(frame, content);

        self.render_status(frame, status);
    }

    fn subscriptions(&self) -> Vec<Box<dyn Subscription<AppMsg>>> {
        let mut subs: Vec<Box<dyn Subscription<AppMsg>>> = Vec::new();
        if let Some(interval) = self.lesson.timer() {
            let id = LESSON_TIMER_BASE + self.current.index() as SubId;
            subs.push(Box::new(Every::with_id(id, interval, || AppMsg::LessonTick)));
        }
        if let Some(after) = self.exit_after {
            subs.push(Box::new(Every::with_id(EXIT_TIMER_ID, after, || AppMsg::Quit)));
        }
        subs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sizer_core::event::{KeyEvent, Modifiers};

    #[test]
    fn resize_events_become_resize_messages() {
        assert_eq!(
            AppMsg::from(Event::Resize {
                width: 10,
                height: 4
            }),
            AppMsg::Resize {
                width: 10,
                height: 4
            }
        );
        assert_eq!(
            AppMsg::from(Event::char('+')),
            AppMsg::LessonEvent(Event::char('+'))
        );
    }

    #[test]
    fn global_keys() {
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c')).with_modifiers(Modifiers::CTRL));
        assert_eq!(AppModel::global_action(&ctrl_c), Some(AppMsg::Quit));
        assert_eq!(AppModel::global_action(&Event::char('q')), Some(AppMsg::Quit));
        assert_eq!(AppModel::global_action(&Event::key(KeyCode::Escape)), Some(AppMsg::Quit));
        assert_eq!(AppModel::global_action(&Event::key(KeyCode::Tab)), Some(AppMsg::NextLesson));
        assert_eq!(
            AppModel::global_action(&Event::char('4')),
            Some(AppMsg::SwitchLesson(LessonId::PropDrilling))
        );
        assert_eq!(AppModel::global_action(&Event::char('9')), None);
        assert_eq!(AppModel::global_action(&Event::char('p')), None);
    }

    #[test]
    fn switching_mounts_fresh_lesson() {
        let mut app = AppModel::new(LessonId::AutoResize);
        app.update(AppMsg::LessonEvent(Event::char('p')));
        assert!(app.lesson().timer().is_some());

        app.update(AppMsg::NextLesson);
        assert_eq!(app.current_lesson(), LessonId::PropDrilling);
        assert!(app.subscriptions().is_empty());

        app.update(AppMsg::PrevLesson);
        assert_eq!(app.current_lesson(), LessonId::AutoResize);
        assert!(app.lesson().timer().is_none(), "state is recreated on return");
        assert_eq!(app.switches(), 2);
    }

    #[test]
    fn switching_to_current_lesson_keeps_state() {
        let mut app = AppModel::new(LessonId::AutoResize);
        app.update(AppMsg::LessonEvent(Event::char('p')));
        app.update(AppMsg::SwitchLesson(LessonId::AutoResize));
        assert!(app.lesson().timer().is_some());
        assert_eq!(app.switches(), 0);
    }

    #[test]
    fn exit_timer_is_declared_when_configured() {
        let app = AppModel::new(LessonId::StaticImage)
            .with_exit_after(Some(Duration::from_millis(500)));
        assert_eq!(app.subscriptions().len(), 1);
        let app = AppModel::new(LessonId::StaticImage).with_exit_after(Some(Duration::ZERO));
        assert!(app.subscriptions().is_empty());
    }

    #[test]
    fn view_draws_shell() {
        let app = AppModel::new(LessonId::AutoResize);
        let mut frame = Frame::new(80, 24);
        app.view(&mut frame);
        let text = frame.buffer.to_text();
        assert!(text.lines().next().unwrap().contains("3 Auto"));
        assert!(text.contains("Week 4 · Auto resize with a timer"));
        assert!(text.lines().last().unwrap().contains("q quit"));
        assert!(text.contains("[p] Play"));
    }

    #[test]
    fn view_survives_tiny_frames() {
        let app = AppModel::new(LessonId::SharedContext);
        for (w, h) in [(1, 1), (5, 2), (12, 3)] {
            let mut frame = Frame::new(w, h);
            app.view(&mut frame);
        }
    }
}
