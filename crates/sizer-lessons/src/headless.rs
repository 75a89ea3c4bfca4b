#![forbid(unsafe_code)]

//! Headless mode: drive the lessons through the simulator from a key script
//! and return the final frame as text.
//!
//! A script is a string of key presses. Plain characters press that key;
//! angle-bracket tokens name special keys or move the virtual clock:
//!
//! ```text
//! p<wait:3000>p+   play, let three ticks pass, pause, grow by one step
//! ```

use std::fmt;
use std::time::Duration;

use sizer_core::event::{Event, KeyCode};
use sizer_runtime::ProgramSimulator;
use tracing::{debug, info};

use crate::app::AppModel;
use crate::cli::Opts;

/// One step of a key script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Press a key.
    Key(Event),
    /// Advance the virtual clock.
    Wait(Duration),
}

/// Errors from parsing a key script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// A `<` without a closing `>`.
    Unterminated(usize),
    /// A token that names no key.
    UnknownToken(String),
    /// A `<wait:N>` whose N is not a number of milliseconds.
    InvalidWait(String),
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unterminated(at) => write!(f, "unterminated token at offset {at}"),
            Self::UnknownToken(token) => write!(f, "unknown key token <{token}>"),
            Self::InvalidWait(value) => write!(f, "invalid wait duration: {value}"),
        }
    }
}

impl std::error::Error for ScriptError {}

fn token_step(token: &str) -> Result<Step, ScriptError> {
    if let Some(ms) = token.strip_prefix("wait:") {
        return ms
            .trim()
            .parse::<u64>()
            .map(|ms| Step::Wait(Duration::from_millis(ms)))
            .map_err(|_| ScriptError::InvalidWait(ms.to_string()));
    }
    let code = match token.to_ascii_lowercase().as_str() {
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "esc" => KeyCode::Escape,
        "enter" => KeyCode::Enter,
        "space" => KeyCode::Char(' '),
        "lt" => KeyCode::Char('<'),
        "playpause" => KeyCode::MediaPlayPause,
        _ => return Err(ScriptError::UnknownToken(token.to_string())),
    };
    Ok(Step::Key(Event::key(code)))
}

/// Parse a key script into steps.
pub fn parse_script(script: &str) -> Result<Vec<Step>, ScriptError> {
    let mut steps = Vec::new();
    let mut rest = script;
    let mut offset = 0;
    while let Some(c) = rest.chars().next() {
        if c == '<' {
            let Some(end) = rest.find('>') else {
                return Err(ScriptError::Unterminated(offset));
            };
            steps.push(token_step(&rest[1..end])?);
            offset += end + 1;
            rest = &rest[end + 1..];
        } else {
            steps.push(Step::Key(Event::char(c)));
            offset += c.len_utf8();
            rest = &rest[c.len_utf8()..];
        }
    }
    Ok(steps)
}

/// Run the lessons headless and return the final frame.
pub fn run(opts: &Opts) -> Result<String, ScriptError> {
    let steps = parse_script(&opts.keys)?;
    let model = AppModel::new(opts.lesson)
        .with_interval(Duration::from_millis(opts.interval_ms))
        .with_exit_after(Some(Duration::from_millis(opts.exit_after_ms)));

    let mut sim = ProgramSimulator::new(model);
    sim.init();
    for step in steps {
        match step {
            Step::Key(event) => sim.inject_event(event),
            Step::Wait(by) => sim.advance(by),
        }
    }
    sim.advance(Duration::from_millis(opts.advance_ms));

    let (width, height) = opts.size;
    let text = sim.capture_frame(width, height).to_text();
    debug!(
        now_ms = sim.now().as_millis() as u64,
        fires = sim.timer_fires(),
        "headless script finished"
    );
    sim.teardown();
    info!(lesson = %sim.model().current_lesson(), "headless run complete");
    Ok(text)
}
