#![forbid(unsafe_code)]

//! The update/view loop.
//!
//! A [`Model`] owns all state. Input becomes a message, `update` mutates
//! the model and may hand back a [`Cmd`], `view` draws the result, and
//! `subscriptions` says which timers should exist right now. [`Program`]
//! drives that cycle against a real terminal or a scripted event source.
//!
//! ```ignore
//! use sizer_core::event::Event;
//! use sizer_render::frame::Frame;
//! use sizer_runtime::program::{Cmd, Model};
//!
//! struct Clicks(u32);
//!
//! enum Msg {
//!     Click,
//!     Quit,
//! }
//!
//! impl From<Event> for Msg {
//!     fn from(event: Event) -> Self {
//!         match event.pressed_key() {
//!             Some(k) if k.is_char('q') => Msg::Quit,
//!             _ => Msg::Click,
//!         }
//!     }
//! }
//!
//! impl Model for Clicks {
//!     type Message = Msg;
//!
//!     fn update(&mut self, msg: Msg) -> Cmd<Msg> {
//!         match msg {
//!             Msg::Click => self.0 += 1,
//!             Msg::Quit => return Cmd::quit(),
//!         }
//!         Cmd::none()
//!     }
//!
//!     fn view(&self, frame: &mut Frame) {
//!         frame.print_text(0, 0, &self.0.to_string(), Default::default(), frame.width());
//!     }
//! }
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::io::{self, Stdout, Write};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use sizer_core::event::Event;
use sizer_core::terminal_session::{SessionOptions, TerminalSession};
use sizer_render::frame::Frame;
use sizer_render::presenter::Presenter;
use tracing::{debug, debug_span, info, info_span, warn};

use crate::subscription::{Subscription, SubscriptionManager};

/// State plus the functions that evolve and draw it.
pub trait Model: Sized {
    /// What `update` consumes. Every terminal event converts into one.
    type Message: From<Event> + Send + 'static;

    /// Startup work, run once before the first frame.
    fn init(&mut self) -> Cmd<Self::Message> {
        Cmd::none()
    }

    /// Apply `msg` and return any follow-up effect.
    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message>;

    /// Draw the current state. Must not mutate anything.
    fn view(&self, frame: &mut Frame);

    /// Timers and other sources that should be running in the current
    /// state.
    ///
    /// Queried after every `update`. Ids present last time and still
    /// declared keep running, new ids start, missing ids stop. The default
    /// declares nothing.
    fn subscriptions(&self) -> Vec<Box<dyn Subscription<Self::Message>>> {
        Vec::new()
    }
}

/// An effect requested by `init` or `update`.
#[derive(Default)]
pub enum Cmd<M> {
    #[default]
    None,
    /// Stop the loop. Anything after it in a batch is skipped.
    Quit,
    /// Run each command in order.
    Batch(Vec<Cmd<M>>),
    /// Feed `M` straight back into `update`.
    Msg(M),
    /// Write a line to the `sizer::log` tracing target.
    Log(String),
    /// Run the closure on a worker thread and deliver its result to
    /// `update`.
    Task(Box<dyn FnOnce() -> M + Send>),
}

impl<M: fmt::Debug> fmt::Debug for Cmd<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Batch(cmds) => f.debug_list().entries(cmds).finish(),
            Self::Msg(msg) => write!(f, "Msg({msg:?})"),
            Self::Log(line) => write!(f, "Log({line:?})"),
            other => f.write_str(other.type_name()),
        }
    }
}

impl<M> Cmd<M> {
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    #[inline]
    pub fn quit() -> Self {
        Self::Quit
    }

    #[inline]
    pub fn msg(m: M) -> Self {
        Self::Msg(m)
    }

    #[inline]
    pub fn log(line: impl Into<String>) -> Self {
        Self::Log(line.into())
    }

    /// Group commands. Zero commands become [`Cmd::None`]; one command is
    /// returned unwrapped.
    pub fn batch(mut cmds: Vec<Self>) -> Self {
        if cmds.len() > 1 {
            return Self::Batch(cmds);
        }
        cmds.pop().unwrap_or_default()
    }

    pub fn task(work: impl FnOnce() -> M + Send + 'static) -> Self {
        Self::Task(Box::new(work))
    }

    /// Variant name, used as a tracing field.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Quit => "Quit",
            Self::Batch(_) => "Batch",
            Self::Msg(_) => "Msg",
            Self::Log(_) => "Log",
            Self::Task(_) => "Task",
        }
    }

    /// Number of effects inside, with batches flattened and `None` counted
    /// as zero.
    pub fn count(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Batch(cmds) => cmds.iter().map(Self::count).sum(),
            _ => 1,
        }
    }
}

/// Where a [`Program`] gets its input and terminal size from.
pub trait EventSource {
    /// Current terminal size (columns, rows).
    fn size(&self) -> io::Result<(u16, u16)>;

    /// Wait up to `timeout` for the next event.
    ///
    /// Returns `Ok(None)` when nothing usable arrived in time.
    fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<Event>>;
}

/// Live terminal input backed by a [`TerminalSession`].
///
/// Dropping the source restores the terminal.
#[derive(Debug)]
pub struct CrosstermEventSource {
    session: TerminalSession,
}

impl CrosstermEventSource {
    /// Enter raw mode with the given options.
    pub fn new(options: SessionOptions) -> io::Result<Self> {
        Ok(Self {
            session: TerminalSession::new(options)?,
        })
    }

    /// The session this source reads from.
    pub fn session(&self) -> &TerminalSession {
        &self.session
    }
}

impl EventSource for CrosstermEventSource {
    fn size(&self) -> io::Result<(u16, u16)> {
        self.session.size()
    }

    fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<Event>> {
        if self.session.poll_event(timeout)? {
            self.session.read_event()
        } else {
            Ok(None)
        }
    }
}

/// A fixed script of events and a fixed size, for headless runs.
///
/// Once the script is exhausted every poll waits out its timeout (capped
/// at a few milliseconds) and returns nothing, so timers keep running.
#[derive(Debug, Clone)]
pub struct ScriptedEventSource {
    width: u16,
    height: u16,
    events: VecDeque<Event>,
}

impl ScriptedEventSource {
    const IDLE_WAIT: Duration = Duration::from_millis(5);

    pub fn new(width: u16, height: u16, events: impl IntoIterator<Item = Event>) -> Self {
        Self {
            width,
            height,
            events: events.into_iter().collect(),
        }
    }

    /// Events not yet delivered.
    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl EventSource for ScriptedEventSource {
    fn size(&self) -> io::Result<(u16, u16)> {
        Ok((self.width, self.height))
    }

    fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<Event>> {
        match self.events.pop_front() {
            Some(event) => Ok(Some(event)),
            None => {
                thread::sleep(timeout.min(Self::IDLE_WAIT));
                Ok(None)
            }
        }
    }
}

/// Configuration for a [`Program`].
#[derive(Debug, Clone)]
pub struct ProgramConfig {
    /// Longest wait for input before timers and tasks are serviced.
    pub poll_timeout: Duration,
    /// Terminal session options for the live backend.
    pub session: SessionOptions,
    /// Size used instead of querying the event source.
    pub forced_size: Option<(u16, u16)>,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            poll_timeout: Duration::from_millis(50),
            session: SessionOptions {
                alternate_screen: true,
                hide_cursor: true,
            },
            forced_size: None,
        }
    }
}

impl ProgramConfig {
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    pub fn with_forced_size(mut self, width: u16, height: u16) -> Self {
        self.forced_size = Some((width, height));
        self
    }
}

/// Runs a [`Model`] until it returns [`Cmd::Quit`].
pub struct Program<M: Model, E: EventSource, W: Write> {
    model: M,
    presenter: Presenter<W>,
    subscriptions: SubscriptionManager<M::Message>,
    task_sender: mpsc::Sender<M::Message>,
    task_receiver: mpsc::Receiver<M::Message>,
    task_handles: Vec<JoinHandle<()>>,
    running: bool,
    dirty: bool,
    width: u16,
    height: u16,
    forced_size: Option<(u16, u16)>,
    poll_timeout: Duration,
    frames_rendered: u64,
    // Last, so the terminal is restored after everything else is dropped.
    events: E,
}

impl<M: Model> Program<M, CrosstermEventSource, Stdout> {
    /// Create a program on the live terminal with default config.
    pub fn new(model: M) -> io::Result<Self> {
        Self::with_config(model, ProgramConfig::default())
    }

    /// Create a program on the live terminal.
    pub fn with_config(model: M, config: ProgramConfig) -> io::Result<Self> {
        let events = CrosstermEventSource::new(config.session)?;
        Ok(Self::with_event_source(model, events, io::stdout(), config))
    }
}

impl<M: Model, E: EventSource, W: Write> Program<M, E, W> {
    /// Build a program over any input source and output writer.
    ///
    /// Terminal restoration is left to the event source's `Drop`.
    pub fn with_event_source(model: M, events: E, writer: W, config: ProgramConfig) -> Self {
        let (width, height) = config
            .forced_size
            .unwrap_or_else(|| events.size().unwrap_or((80, 24)));
        let (task_sender, task_receiver) = mpsc::channel();

        Self {
            model,
            presenter: Presenter::new(writer),
            subscriptions: SubscriptionManager::new(),
            task_sender,
            task_receiver,
            task_handles: Vec::new(),
            running: true,
            dirty: true,
            width: width.max(1),
            height: height.max(1),
            forced_size: config.forced_size,
            poll_timeout: config.poll_timeout,
            frames_rendered: 0,
            events,
        }
    }

    /// Run the main event loop until the model quits.
    ///
    /// All subscriptions are stopped and every `Cmd::Task` thread is joined
    /// before this returns, on success or error. Results of tasks that finish
    /// after quit are discarded.
    pub fn run(&mut self) -> io::Result<()> {
        let result = self.run_event_loop();
        self.subscriptions.stop_all();
        let pending = self.task_handles.len();
        for handle in self.task_handles.drain(..) {
            if handle.join().is_err() {
                warn!("background task panicked");
            }
        }
        debug!(pending, "background tasks joined");
        info!(frames = self.frames_rendered, "program exited");
        result
    }

    fn run_event_loop(&mut self) -> io::Result<()> {
        let cmd = {
            let _span = info_span!("sizer.program.init").entered();
            self.model.init()
        };
        self.execute_cmd(cmd);
        self.reconcile_subscriptions();
        self.render_frame()?;

        while self.running {
            if let Some(event) = self.events.poll_event(self.poll_timeout)? {
                self.handle_event(event);
            }

            self.process_subscription_messages();
            self.process_task_results();

            if self.dirty && self.running {
                self.render_frame()?;
            }
        }
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Resize { width, height } = event
            && self.forced_size.is_none()
        {
            self.width = width.max(1);
            self.height = height.max(1);
            self.presenter.invalidate();
        }
        self.dispatch(M::Message::from(event), "event");
    }

    /// Run one update, its commands, and the follow-up reconcile.
    fn dispatch(&mut self, msg: M::Message, msg_type: &'static str) {
        let cmd = {
            let _span = debug_span!("sizer.program.update", msg_type).entered();
            self.model.update(msg)
        };
        self.dirty = true;
        self.execute_cmd(cmd);
        self.reconcile_subscriptions();
    }

    fn reconcile_subscriptions(&mut self) {
        let subs = self.model.subscriptions();
        let before = self.subscriptions.active_count();
        self.subscriptions.reconcile(subs);
        let after = self.subscriptions.active_count();
        if before != after {
            debug!(before, after, "subscriptions reconciled");
        }
    }

    /// Deliver subscription messages one at a time.
    ///
    /// Each delivery reconciles before the next is taken, so a timer stopped
    /// by an update never delivers again.
    fn process_subscription_messages(&mut self) {
        while self.running {
            let Some(msg) = self.subscriptions.next_message() else {
                break;
            };
            self.dispatch(msg, "subscription");
        }
    }

    fn process_task_results(&mut self) {
        while self.running {
            let Ok(msg) = self.task_receiver.try_recv() else {
                break;
            };
            self.dispatch(msg, "task");
        }
        self.task_handles.retain(|h| !h.is_finished());
    }

    fn execute_cmd(&mut self, cmd: Cmd<M::Message>) {
        match cmd {
            Cmd::None => {}
            Cmd::Quit => {
                debug!("quit requested");
                self.running = false;
            }
            Cmd::Msg(m) => {
                let cmd = self.model.update(m);
                self.dirty = true;
                self.execute_cmd(cmd);
            }
            Cmd::Batch(cmds) => {
                for c in cmds {
                    self.execute_cmd(c);
                    if !self.running {
                        break;
                    }
                }
            }
            Cmd::Log(text) => {
                info!(target: "sizer::log", "{}", text.trim_end());
            }
            Cmd::Task(f) => {
                let sender = self.task_sender.clone();
                self.task_handles.push(thread::spawn(move || {
                    let _ = sender.send(f());
                }));
            }
        }
    }

    fn render_frame(&mut self) -> io::Result<()> {
        let mut frame = Frame::new(self.width, self.height);
        self.model.view(&mut frame);
        self.presenter.present(&frame.buffer)?;
        self.frames_rendered += 1;
        self.dirty = false;
        Ok(())
    }

    /// Access the model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// False once the model has quit.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of subscriptions currently running.
    pub fn active_subscriptions(&self) -> usize {
        self.subscriptions.active_count()
    }

    /// Frames rendered so far.
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Access the output writer.
    pub fn writer(&self) -> &W {
        self.presenter.writer()
    }
}
