#![forbid(unsafe_code)]

//! Headless driver with a virtual clock.
//!
//! [`ProgramSimulator`] runs a [`Model`] with no terminal and no threads.
//! Events and messages go straight to `update`; frames are drawn on request.
//! Timers never sleep. Any subscription that reports an
//! [`interval`](crate::subscription::Subscription::interval) is scheduled
//! on a virtual clock and fired by [`advance`](ProgramSimulator::advance)
//! exactly at its deadlines. Like the live loop, every update is followed
//! by a reconcile. Subscriptions with no interval are skipped.
//!
//! ```ignore
//! let mut sim = ProgramSimulator::new(Meter::default());
//! sim.init();
//! sim.inject_event(Event::char('p'));
//! sim.advance(Duration::from_secs(2));
//! assert_eq!(sim.capture_frame(40, 1).to_text(), "size 500");
//! ```

use std::collections::HashSet;
use std::time::Duration;

use sizer_core::event::Event;
use sizer_render::buffer::Buffer;
use sizer_render::frame::Frame;

use crate::program::{Cmd, Model};
use crate::subscription::{SubId, Subscription};

/// Trace of one executed [`Cmd`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CmdRecord {
    None,
    Quit,
    /// The message itself is not kept.
    Msg,
    /// Batch with this many direct children.
    Batch(usize),
    Log(String),
    /// Task closure, run inline.
    Task,
}

struct VirtualTimer<M: Send + 'static> {
    id: SubId,
    sub: Box<dyn Subscription<M>>,
    interval: Duration,
    next_due: Duration,
}

#[derive(Debug, Default, Clone, Copy)]
struct TimerStats {
    started: u64,
    stopped: u64,
    fired: u64,
}

/// Single-threaded stand-in for [`Program`](crate::program::Program).
pub struct ProgramSimulator<M: Model> {
    model: M,
    running: bool,
    now: Duration,
    timers: Vec<VirtualTimer<M::Message>>,
    stats: TimerStats,
    frames: Vec<Buffer>,
    command_log: Vec<CmdRecord>,
    logs: Vec<String>,
}

impl<M: Model> ProgramSimulator<M> {
    /// Wrap `model`. Nothing runs until [`init`](Self::init).
    pub fn new(model: M) -> Self {
        Self {
            model,
            running: true,
            now: Duration::ZERO,
            timers: Vec::new(),
            stats: TimerStats::default(),
            frames: Vec::new(),
            command_log: Vec::new(),
            logs: Vec::new(),
        }
    }

    /// Run `Model::init`, its commands, and the first reconcile.
    pub fn init(&mut self) {
        let startup = self.model.init();
        self.run_cmd(startup);
        self.reconcile();
    }

    /// Convert each event with `From<Event>` and dispatch it. Stops early
    /// if the model quits partway through.
    pub fn inject_events(&mut self, events: &[Event]) {
        for event in events.iter().cloned() {
            if !self.running {
                return;
            }
            self.dispatch(event.into());
        }
    }

    pub fn inject_event(&mut self, event: Event) {
        self.inject_events(&[event]);
    }

    /// Dispatch `msg` directly, skipping event conversion. Ignored after
    /// quit.
    pub fn send(&mut self, msg: M::Message) {
        if self.running {
            self.dispatch(msg);
        }
    }

    /// Move the virtual clock forward by `by`.
    ///
    /// Every timer deadline that falls inside the window fires in deadline
    /// order (ties in start order), each followed by a reconcile. A timer
    /// started inside the window is scheduled from the moment it started.
    pub fn advance(&mut self, by: Duration) {
        let target = self.now.saturating_add(by);
        while self.running {
            let Some(idx) = self.next_due_timer(target) else {
                break;
            };
            let timer = &mut self.timers[idx];
            self.now = timer.next_due;
            timer.next_due += timer.interval;
            let id = timer.id;
            let msg = timer.sub.fire();
            self.stats.fired += 1;
            tracing::trace!(sub_id = id, now_ms = self.now.as_millis() as u64, "virtual timer fired");
            if let Some(msg) = msg {
                self.dispatch(msg);
            }
        }
        if self.running {
            self.now = target;
        }
    }

    fn next_due_timer(&self, target: Duration) -> Option<usize> {
        self.timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.next_due <= target)
            .min_by_key(|(_, t)| t.next_due)
            .map(|(i, _)| i)
    }

    /// End the run: every timer is dropped and later calls do nothing.
    pub fn teardown(&mut self) {
        self.stats.stopped += self.timers.len() as u64;
        self.timers.clear();
        self.running = false;
    }

    /// Draw the model into a fresh `width` x `height` frame and keep it.
    pub fn capture_frame(&mut self, width: u16, height: u16) -> &Buffer {
        let mut frame = Frame::new(width, height);
        self.model.view(&mut frame);
        let index = self.frames.len();
        self.frames.push(frame.into_buffer());
        &self.frames[index]
    }

    pub fn frames(&self) -> &[Buffer] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&Buffer> {
        self.frames.last()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Direct model access. No reconcile follows.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// False after quit or [`teardown`](Self::teardown).
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Virtual time elapsed since construction.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Timers scheduled right now.
    pub fn active_timers(&self) -> usize {
        self.timers.len()
    }

    /// `(started, stopped)` over the whole run.
    pub fn timer_lifecycle_counts(&self) -> (u64, u64) {
        (self.stats.started, self.stats.stopped)
    }

    pub fn timer_fires(&self) -> u64 {
        self.stats.fired
    }

    /// Lines produced by `Cmd::Log`, oldest first.
    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    pub fn command_log(&self) -> &[CmdRecord] {
        &self.command_log
    }

    fn dispatch(&mut self, msg: M::Message) {
        let follow_up = self.model.update(msg);
        self.run_cmd(follow_up);
        self.reconcile();
    }

    fn reconcile(&mut self) {
        if !self.running {
            self.teardown();
            return;
        }
        let declared = self.model.subscriptions();
        let wanted: HashSet<SubId> = declared.iter().map(|s| s.id()).collect();

        let before = self.timers.len();
        self.timers.retain(|t| wanted.contains(&t.id));
        self.stats.stopped += (before - self.timers.len()) as u64;

        for sub in declared {
            let id = sub.id();
            if self.timers.iter().any(|t| t.id == id) {
                continue;
            }
            match sub.interval() {
                None => tracing::debug!(sub_id = id, "subscription has no interval, not simulated"),
                Some(interval) if interval.is_zero() => {
                    tracing::debug!(sub_id = id, "zero-interval timer ignored");
                }
                Some(interval) => {
                    self.stats.started += 1;
                    self.timers.push(VirtualTimer {
                        id,
                        sub,
                        interval,
                        next_due: self.now + interval,
                    });
                }
            }
        }
    }

    fn run_cmd(&mut self, cmd: Cmd<M::Message>) {
        let record = match cmd {
            Cmd::None => CmdRecord::None,
            Cmd::Quit => {
                self.running = false;
                CmdRecord::Quit
            }
            Cmd::Log(line) => {
                self.logs.push(line.clone());
                CmdRecord::Log(line)
            }
            Cmd::Msg(msg) => {
                self.command_log.push(CmdRecord::Msg);
                let next = self.model.update(msg);
                return self.run_cmd(next);
            }
            Cmd::Task(work) => {
                self.command_log.push(CmdRecord::Task);
                let next = self.model.update(work());
                return self.run_cmd(next);
            }
            Cmd::Batch(cmds) => {
                self.command_log.push(CmdRecord::Batch(cmds.len()));
                for cmd in cmds {
                    if !self.running {
                        break;
                    }
                    self.run_cmd(cmd);
                }
                return;
            }
        };
        self.command_log.push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscription::Every;
    use sizer_core::event::KeyCode;

    #[derive(Debug)]
    enum MeterMsg {
        Increment,
        Toggle,
        Tick,
        Quit,
        LogValue,
        Noop,
    }

    impl From<Event> for MeterMsg {
        fn from(event: Event) -> Self {
            match event.pressed_key().map(|k| k.code) {
                Some(KeyCode::Char('+')) => MeterMsg::Increment,
                Some(KeyCode::Char('t')) => MeterMsg::Toggle,
                Some(KeyCode::Char('q')) => MeterMsg::Quit,
                _ => MeterMsg::Noop,
            }
        }
    }

    struct Meter {
        value: i32,
        ticking: bool,
    }

    impl Model for Meter {
        type Message = MeterMsg;

        fn update(&mut self, msg: MeterMsg) -> Cmd<MeterMsg> {
            match msg {
                MeterMsg::Increment => self.value += 1,
                MeterMsg::Toggle => self.ticking = !self.ticking,
                MeterMsg::Tick => self.value += 100,
                MeterMsg::Quit => return Cmd::quit(),
                MeterMsg::LogValue => return Cmd::log(format!("value={}", self.value)),
                MeterMsg::Noop => {}
            }
            Cmd::none()
        }

        fn view(&self, frame: &mut Frame) {
            let text = format!("level {}", self.value);
            frame.print_text(0, 0, &text, Default::default(), frame.width());
        }

        fn subscriptions(&self) -> Vec<Box<dyn Subscription<MeterMsg>>> {
            if self.ticking {
                vec![Box::new(Every::with_id(
                    1,
                    Duration::from_millis(1000),
                    || MeterMsg::Tick,
                ))]
            } else {
                vec![]
            }
        }
    }

    fn sim(ticking: bool) -> ProgramSimulator<Meter> {
        let mut sim = ProgramSimulator::new(Meter { value: 0, ticking });
        sim.init();
        sim
    }

    #[test]
    fn inject_events_update_model() {
        let mut sim = sim(false);
        sim.inject_events(&[Event::char('+'), Event::char('+')]);
        assert_eq!(sim.model().value, 2);
    }

    #[test]
    fn capture_frame_renders_view() {
        let mut sim = sim(false);
        sim.send(MeterMsg::Increment);
        let buf = sim.capture_frame(20, 1);
        assert_eq!(buf.to_text(), "level 1");
        assert_eq!(sim.frame_count(), 1);
    }

    #[test]
    fn timer_fires_once_per_interval() {
        let mut sim = sim(true);
        assert_eq!(sim.active_timers(), 1);
        sim.advance(Duration::from_millis(999));
        assert_eq!(sim.model().value, 0);
        sim.advance(Duration::from_millis(1));
        assert_eq!(sim.model().value, 100);
        sim.advance(Duration::from_millis(3000));
        assert_eq!(sim.model().value, 400);
        assert_eq!(sim.timer_fires(), 4);
        assert_eq!(sim.now(), Duration::from_millis(4000));
    }

    #[test]
    fn toggling_off_cancels_timer() {
        let mut sim = sim(true);
        sim.advance(Duration::from_millis(1500));
        sim.inject_event(Event::char('t'));
        assert_eq!(sim.active_timers(), 0);
        sim.advance(Duration::from_secs(10));
        assert_eq!(sim.model().value, 100);
        assert_eq!(sim.timer_lifecycle_counts(), (1, 1));
    }

    #[test]
    fn restarted_timer_is_scheduled_from_restart() {
        let mut sim = sim(false);
        sim.advance(Duration::from_millis(700));
        sim.inject_event(Event::char('t'));
        sim.advance(Duration::from_millis(999));
        assert_eq!(sim.model().value, 0);
        sim.advance(Duration::from_millis(1));
        assert_eq!(sim.model().value, 100);
    }

    #[test]
    fn quit_stops_timers_and_events() {
        let mut sim = sim(true);
        sim.inject_event(Event::char('q'));
        assert!(!sim.is_running());
        assert_eq!(sim.active_timers(), 0);
        sim.advance(Duration::from_secs(5));
        sim.inject_event(Event::char('+'));
        assert_eq!(sim.model().value, 0);
    }

    #[test]
    fn teardown_stops_timers() {
        let mut sim = sim(true);
        sim.teardown();
        sim.advance(Duration::from_secs(5));
        assert_eq!(sim.model().value, 0);
        assert_eq!(sim.timer_lifecycle_counts(), (1, 1));
    }

    #[test]
    fn log_commands_are_recorded() {
        let mut sim = sim(false);
        sim.send(MeterMsg::Increment);
        sim.send(MeterMsg::LogValue);
        assert_eq!(sim.logs(), ["value=1".to_string()]);
        assert!(sim.command_log().contains(&CmdRecord::Log("value=1".into())));
    }
}
