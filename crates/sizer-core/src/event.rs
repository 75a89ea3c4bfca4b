#![forbid(unsafe_code)]

//! Input vocabulary shared by the live terminal and the simulator.
//!
//! Models match on [`Event`] only. Crossterm input is translated at the edge
//! by [`Event::from_crossterm`], so a scripted run and a real keyboard drive
//! a model through exactly the same values.
//!
//! Terminals that cannot report key kinds produce [`KeyEventKind::Press`].
//! Releases are kept in the vocabulary but [`Event::pressed_key`] hides them.

use bitflags::bitflags;
use crossterm::event as cte;

/// Something that happened at the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    /// The terminal now has `width` columns and `height` rows.
    Resize { width: u16, height: u16 },
    /// Focus entered (`true`) or left (`false`) the terminal window.
    Focus(bool),
    /// Runtime heartbeat with no payload.
    Tick,
}

impl Event {
    /// Translate crossterm input.
    ///
    /// Mouse, paste and keys with no [`KeyCode`] equivalent yield `None`.
    #[must_use]
    pub fn from_crossterm(raw: cte::Event) -> Option<Self> {
        Some(match raw {
            cte::Event::Key(key) => Event::Key(KeyEvent::from_crossterm(key)?),
            cte::Event::Resize(width, height) => Event::Resize { width, height },
            cte::Event::FocusGained => Event::Focus(true),
            cte::Event::FocusLost => Event::Focus(false),
            cte::Event::Mouse(_) | cte::Event::Paste(_) => return None,
        })
    }

    /// A bare press of `code`.
    #[must_use]
    pub const fn key(code: KeyCode) -> Self {
        Self::Key(KeyEvent::new(code))
    }

    /// A bare press of the character `c`.
    #[must_use]
    pub const fn char(c: char) -> Self {
        Self::key(KeyCode::Char(c))
    }

    /// The key behind a press or repeat. Releases and non-key events give
    /// `None`, so handlers act once per keystroke.
    #[must_use]
    pub fn pressed_key(&self) -> Option<&KeyEvent> {
        match self {
            Self::Key(key) if key.kind != KeyEventKind::Release => Some(key),
            _ => None,
        }
    }
}

/// One keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Unmodified press of `code`.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    #[must_use]
    pub const fn with_modifiers(self, modifiers: Modifiers) -> Self {
        Self { modifiers, ..self }
    }

    #[must_use]
    pub const fn with_kind(self, kind: KeyEventKind) -> Self {
        Self { kind, ..self }
    }

    /// True when the key is the character `c`, whatever the modifiers.
    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        self.code == KeyCode::Char(c)
    }

    /// True while Control is held.
    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    fn from_crossterm(raw: cte::KeyEvent) -> Option<Self> {
        let kind = match raw.kind {
            cte::KeyEventKind::Press => KeyEventKind::Press,
            cte::KeyEventKind::Repeat => KeyEventKind::Repeat,
            cte::KeyEventKind::Release => KeyEventKind::Release,
        };
        Some(Self {
            code: KeyCode::from_crossterm(raw.code)?,
            modifiers: Modifiers::from_crossterm(raw.modifiers),
            kind,
        })
    }
}

/// Keys the lessons react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Tab,
    /// Shift+Tab as reported by the terminal.
    BackTab,
    Up,
    Down,
    Left,
    Right,
    /// `F1` through `F24`.
    F(u8),
    /// Play, Pause and Play/Pause media keys all map here.
    MediaPlayPause,
}

impl KeyCode {
    fn from_crossterm(raw: cte::KeyCode) -> Option<Self> {
        use cte::KeyCode as C;
        use cte::MediaKeyCode as Media;

        let code = match raw {
            C::Char(c) => Self::Char(c),
            C::F(n) => Self::F(n),
            C::Enter => Self::Enter,
            C::Esc => Self::Escape,
            C::Backspace => Self::Backspace,
            C::Tab => Self::Tab,
            C::BackTab => Self::BackTab,
            C::Up => Self::Up,
            C::Down => Self::Down,
            C::Left => Self::Left,
            C::Right => Self::Right,
            C::Media(Media::Play | Media::Pause | Media::PlayPause) => Self::MediaPlayPause,
            _ => return None,
        };
        Some(code)
    }
}

/// Press, auto-repeat or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    #[default]
    Press,
    Repeat,
    Release,
}

bitflags! {
    /// Held modifier keys.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const NONE  = 0;
        const SHIFT = 1;
        const ALT   = 1 << 1;
        const CTRL  = 1 << 2;
        const SUPER = 1 << 3;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

impl Modifiers {
    fn from_crossterm(raw: cte::KeyModifiers) -> Self {
        [
            (cte::KeyModifiers::SHIFT, Self::SHIFT),
            (cte::KeyModifiers::ALT, Self::ALT),
            (cte::KeyModifiers::CONTROL, Self::CTRL),
            (cte::KeyModifiers::SUPER, Self::SUPER),
        ]
        .into_iter()
        .filter(|(ct, _)| raw.contains(*ct))
        .fold(Self::NONE, |acc, (_, ours)| acc | ours)
    }
}
