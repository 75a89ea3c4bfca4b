#![forbid(unsafe_code)]

//! Raw-mode guard for the interactive shell.
//!
//! Holding a [`TerminalSession`] means the terminal is in raw mode and,
//! when requested, on the alternate screen with the cursor hidden. Dropping
//! it undoes each of those steps in reverse, whether the caller returns
//! normally, bails out with `?`, or unwinds from a panic. A process-wide
//! panic hook restores the terminal before the panic message is printed.
//!
//! ```no_run
//! use sizer_core::terminal_session::{SessionOptions, TerminalSession};
//!
//! let session = TerminalSession::new(SessionOptions {
//!     alternate_screen: true,
//!     hide_cursor: true,
//! })?;
//! let (cols, rows) = session.size()?;
//! # let _ = (cols, rows);
//! # Ok::<(), std::io::Error>(())
//! ```

use std::io::{self, Stdout, Write};
use std::sync::Once;
use std::time::Duration;

use crossterm::{cursor, event, execute, terminal};

use crate::event::Event;

/// What the session switches on besides raw mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Draw on the alternate screen so the shell scrollback is untouched.
    pub alternate_screen: bool,
    /// Keep the hardware cursor hidden while the session is alive.
    pub hide_cursor: bool,
}

/// Terminal modes that are currently switched on.
#[derive(Debug, Default)]
struct Engaged {
    raw: bool,
    alt_screen: bool,
    cursor_hidden: bool,
}

/// RAII guard over raw mode, the alternate screen and cursor visibility.
#[derive(Debug)]
pub struct TerminalSession {
    options: SessionOptions,
    engaged: Engaged,
}

impl TerminalSession {
    /// Switch the terminal into raw mode plus whatever `options` ask for.
    ///
    /// If a later step fails, the steps that already succeeded are rolled
    /// back before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error from crossterm.
    pub fn new(options: SessionOptions) -> io::Result<Self> {
        install_restore_hook();

        let mut session = Self {
            options,
            engaged: Engaged::default(),
        };
        session.engage(&mut io::stdout())?;
        Ok(session)
    }

    fn engage(&mut self, out: &mut Stdout) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        self.engaged.raw = true;

        if self.options.alternate_screen {
            execute!(out, terminal::EnterAlternateScreen)?;
            self.engaged.alt_screen = true;
        }
        if self.options.hide_cursor {
            execute!(out, cursor::Hide)?;
            self.engaged.cursor_hidden = true;
        }

        #[cfg(feature = "tracing")]
        tracing::info!(
            alt_screen = self.engaged.alt_screen,
            cursor_hidden = self.engaged.cursor_hidden,
            "terminal session engaged"
        );
        Ok(())
    }

    /// Current terminal dimensions as `(columns, rows)`.
    pub fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    /// Wait up to `timeout` for input. `Ok(false)` means nothing arrived.
    pub fn poll_event(&self, timeout: Duration) -> io::Result<bool> {
        event::poll(timeout)
    }

    /// Block for the next input event.
    ///
    /// Events the shell has no use for (focus, paste, key releases) come
    /// back as `Ok(None)`.
    pub fn read_event(&self) -> io::Result<Option<Event>> {
        Ok(Event::from_crossterm(event::read()?))
    }

    /// Options this session was opened with.
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    fn release(&mut self) {
        let mut out = io::stdout();
        if std::mem::take(&mut self.engaged.cursor_hidden) {
            let _ = execute!(out, cursor::Show);
        }
        if std::mem::take(&mut self.engaged.alt_screen) {
            let _ = execute!(out, terminal::LeaveAlternateScreen);
        }
        if std::mem::take(&mut self.engaged.raw) {
            let _ = terminal::disable_raw_mode();
        }
        let _ = out.flush();

        #[cfg(feature = "tracing")]
        tracing::info!("terminal session released");
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.release();
    }
}

fn install_restore_hook() {
    static INSTALLED: Once = Once::new();
    INSTALLED.call_once(|| {
        let chained = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            force_restore();
            chained(info);
        }));
    });
}

/// Undo every mode unconditionally. Runs from the panic hook, where the
/// session handle is out of reach.
fn force_restore() {
    let mut out = io::stdout();
    let _ = execute!(out, cursor::Show, terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_default_to_raw_mode_only() {
        assert_eq!(
            SessionOptions::default(),
            SessionOptions {
                alternate_screen: false,
                hide_cursor: false,
            }
        );
    }

    #[test]
    fn nothing_engaged_before_setup() {
        let engaged = Engaged::default();
        assert!(!engaged.raw && !engaged.alt_screen && !engaged.cursor_hidden);
    }
}
