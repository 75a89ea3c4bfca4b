#![forbid(unsafe_code)]

//! Cell types: one terminal grid position.

/// RGBA color packed into a `u32` (`0xRRGGBBAA`).
///
/// Alpha 0 means "transparent": the presenter leaves the terminal default
/// color in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PackedRgba(pub u32);

impl PackedRgba {
    /// Fully transparent (terminal default).
    pub const TRANSPARENT: Self = Self(0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Create an opaque color.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Create a color with explicit alpha.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | a as u32)
    }

    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    /// Whether the color is fully transparent.
    #[inline]
    pub const fn is_transparent(self) -> bool {
        self.a() == 0
    }
}

bitflags::bitflags! {
    /// Text attributes applied to a cell.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleFlags: u8 {
        const BOLD      = 0b0000_0001;
        const DIM       = 0b0000_0010;
        const ITALIC    = 0b0000_0100;
        const UNDERLINE = 0b0000_1000;
        const REVERSE   = 0b0001_0000;
    }
}

/// A single terminal cell: one character plus colors and attributes.
///
/// Wide characters occupy their own cell followed by a continuation cell
/// holding `'\0'`; the presenter skips continuation cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Displayed character.
    pub ch: char,
    /// Foreground color.
    pub fg: PackedRgba,
    /// Background color.
    pub bg: PackedRgba,
    /// Text attributes.
    pub attrs: StyleFlags,
}

impl Default for Cell {
    fn default() -> Self {
        Self::from_char(' ')
    }
}

impl Cell {
    /// Marker stored in the trailing half of a wide character.
    pub const CONTINUATION: char = '\0';

    /// Create an unstyled cell.
    #[inline]
    pub const fn from_char(ch: char) -> Self {
        Self {
            ch,
            fg: PackedRgba::TRANSPARENT,
            bg: PackedRgba::TRANSPARENT,
            attrs: StyleFlags::empty(),
        }
    }

    /// Continuation cell for the second column of a wide character.
    #[inline]
    pub const fn continuation() -> Self {
        Self::from_char(Self::CONTINUATION)
    }

    /// Whether this cell is the trailing half of a wide character.
    #[inline]
    pub const fn is_continuation(&self) -> bool {
        self.ch == Self::CONTINUATION
    }

    #[inline]
    pub const fn with_char(mut self, ch: char) -> Self {
        self.ch = ch;
        self
    }

    #[inline]
    pub const fn with_fg(mut self, fg: PackedRgba) -> Self {
        self.fg = fg;
        self
    }

    #[inline]
    pub const fn with_bg(mut self, bg: PackedRgba) -> Self {
        self.bg = bg;
        self
    }

    #[inline]
    pub const fn with_attrs(mut self, attrs: StyleFlags) -> Self {
        self.attrs = attrs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_round_trips_channels() {
        let c = PackedRgba::rgba(10, 20, 30, 40);
        assert_eq!((c.r(), c.g(), c.b(), c.a()), (10, 20, 30, 40));
    }

    #[test]
    fn default_cell_is_blank_and_transparent() {
        let cell = Cell::default();
        assert_eq!(cell.ch, ' ');
        assert!(cell.fg.is_transparent());
        assert!(cell.bg.is_transparent());
        assert!(cell.attrs.is_empty());
    }

    #[test]
    fn builders_set_fields() {
        let cell = Cell::from_char('x')
            .with_fg(PackedRgba::WHITE)
            .with_attrs(StyleFlags::BOLD);
        assert_eq!(cell.ch, 'x');
        assert_eq!(cell.fg, PackedRgba::WHITE);
        assert!(cell.attrs.contains(StyleFlags::BOLD));
    }

    #[test]
    fn continuation_marker() {
        assert!(Cell::continuation().is_continuation());
        assert!(!Cell::from_char('a').is_continuation());
    }
}
