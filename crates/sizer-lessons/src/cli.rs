#![forbid(unsafe_code)]

//! Command-line argument parsing for the lessons binary.
//!
//! Parses args by hand and supports environment variable overrides via the
//! `SIZER_*` prefix. Flags win over the environment; an environment value
//! that does not parse is ignored.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::process;

use crate::lessons::LessonId;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const HELP_TEXT: &str = "\
Sizer Lessons: state, timers and shared context in the terminal

USAGE:
    sizer-lessons [OPTIONS]

OPTIONS:
    --lesson=NAME|N      Start on a lesson by name or number (default: auto-resize)
    --interval-ms=N      Auto-resize timer cadence in ms, > 0 (default: 1000)
    --exit-after-ms=N    Quit after N milliseconds, 0 disables (default: 0)
    --log-file=PATH      Append JSON logs to PATH
    --headless           Run without a terminal and print the final frame
    --keys=SEQ           Headless key script, e.g. \"p<wait:3000>p\"
    --advance-ms=N       Headless: advance the clock N ms after the script
    --size=WxH           Headless frame size (default: 80x24)
    --help, -h           Show this help message
    --version, -V        Show version

LESSONS:
    1  static-image       Week 3: display the logo at a fixed width
    2  manual-resize      Week 4: grow and shrink the logo with buttons
    3  auto-resize        Week 4: Play/Pause a timer that cycles the size
    4  prop-drilling      Week 5: pass the width through every component
    5  shared-context     Week 5: provide the width once, consume it deep down

KEYBINDINGS:
    1-5             Switch lesson
    Tab / Shift-Tab Cycle lessons
    + / -           Increase / decrease the width
    p / Space       Play or pause the auto-resize timer
    q / Esc / Ctrl+C Quit

HEADLESS KEY SCRIPT:
    Plain characters are key presses. Tokens: <tab> <backtab> <esc>
    <enter> <space> <wait:N> (advance the clock N ms).

ENVIRONMENT VARIABLES:
    SIZER_LESSON          Override --lesson
    SIZER_INTERVAL_MS     Override --interval-ms
    SIZER_EXIT_AFTER_MS   Override --exit-after-ms
    SIZER_LOG_FILE        Override --log-file
    SIZER_LOG             Log filter directive (default: info)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Lesson shown first.
    pub lesson: LessonId,
    /// Auto-resize cadence in milliseconds.
    pub interval_ms: u64,
    /// Auto-exit after this many milliseconds (0 = disabled).
    pub exit_after_ms: u64,
    /// JSON log destination.
    pub log_file: Option<PathBuf>,
    /// Run the simulator instead of a terminal.
    pub headless: bool,
    /// Headless key script.
    pub keys: String,
    /// Headless clock advance after the script, in milliseconds.
    pub advance_ms: u64,
    /// Headless frame size.
    pub size: (u16, u16),
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            lesson: LessonId::AutoResize,
            interval_ms: 1000,
            exit_after_ms: 0,
            log_file: None,
            headless: false,
            keys: String::new(),
            advance_ms: 0,
            size: (80, 24),
        }
    }
}

/// Outcome of parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    Run(Opts),
    Help,
    Version,
}

/// Errors from argument parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    /// A flag was given a value it cannot use.
    InvalidValue { flag: &'static str, value: String },
    /// An argument nobody recognizes.
    UnknownArgument(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { flag, value } => write!(f, "Invalid {flag} value: {value}"),
            Self::UnknownArgument(arg) => write!(f, "Unknown argument: {arg}"),
        }
    }
}

impl std::error::Error for CliError {}

fn parse_lesson(value: &str) -> Option<LessonId> {
    LessonId::parse(value)
}

fn parse_interval(value: &str) -> Option<u64> {
    value.trim().parse().ok().filter(|&n: &u64| n > 0)
}

fn parse_millis(value: &str) -> Option<u64> {
    value.trim().parse().ok()
}

fn parse_size(value: &str) -> Option<(u16, u16)> {
    let (w, h) = value.trim().split_once(['x', 'X'])?;
    let w: u16 = w.parse().ok()?;
    let h: u16 = h.parse().ok()?;
    (w > 0 && h > 0).then_some((w, h))
}

fn invalid(flag: &'static str, value: &str) -> CliError {
    CliError::InvalidValue {
        flag,
        value: value.to_string(),
    }
}

impl Opts {
    /// Parse `args` (without the program name) on top of environment values
    /// looked up through `env`.
    pub fn parse_from<I, S, F>(args: I, env: F) -> Result<Parsed, CliError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        // Environment first; unparsable values are ignored.
        if let Some(val) = env("SIZER_LESSON")
            && let Some(id) = parse_lesson(&val)
        {
            opts.lesson = id;
        }
        if let Some(val) = env("SIZER_INTERVAL_MS")
            && let Some(n) = parse_interval(&val)
        {
            opts.interval_ms = n;
        }
        if let Some(val) = env("SIZER_EXIT_AFTER_MS")
            && let Some(n) = parse_millis(&val)
        {
            opts.exit_after_ms = n;
        }
        if let Some(val) = env("SIZER_LOG_FILE")
            && !val.is_empty()
        {
            opts.log_file = Some(PathBuf::from(val));
        }

        for arg in args {
            let arg = arg.as_ref();
            match arg {
                "--help" | "-h" => return Ok(Parsed::Help),
                "--version" | "-V" => return Ok(Parsed::Version),
                "--headless" => opts.headless = true,
                other => {
                    if let Some(val) = other.strip_prefix("--lesson=") {
                        opts.lesson = parse_lesson(val).ok_or_else(|| invalid("--lesson", val))?;
                    } else if let Some(val) = other.strip_prefix("--interval-ms=") {
                        opts.interval_ms =
                            parse_interval(val).ok_or_else(|| invalid("--interval-ms", val))?;
                    } else if let Some(val) = other.strip_prefix("--exit-after-ms=") {
                        opts.exit_after_ms =
                            parse_millis(val).ok_or_else(|| invalid("--exit-after-ms", val))?;
                    } else if let Some(val) = other.strip_prefix("--log-file=") {
                        if val.is_empty() {
                            return Err(invalid("--log-file", val));
                        }
                        opts.log_file = Some(PathBuf::from(val));
                    } else if let Some(val) = other.strip_prefix("--keys=") {
                        opts.keys = val.to_string();
                    } else if let Some(val) = other.strip_prefix("--advance-ms=") {
                        opts.advance_ms =
                            parse_millis(val).ok_or_else(|| invalid("--advance-ms", val))?;
                    } else if let Some(val) = other.strip_prefix("--size=") {
                        opts.size = parse_size(val).ok_or_else(|| invalid("--size", val))?;
                    } else {
                        return Err(CliError::UnknownArgument(other.to_string()));
                    }
                }
            }
        }

        Ok(Parsed::Run(opts))
    }

    /// Parse the process arguments and environment.
    ///
    /// Prints help or version and exits when asked to; exits with status 1
    /// on a bad argument.
    pub fn parse() -> Self {
        match Self::parse_from(env::args().skip(1), |key| env::var(key).ok()) {
            Ok(Parsed::Run(opts)) => opts,
            Ok(Parsed::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Parsed::Version) => {
                println!("sizer-lessons {VERSION}");
                process::exit(0);
            }
            Err(err) => {
                eprintln!("{err}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }
}
