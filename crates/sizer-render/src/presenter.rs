#![forbid(unsafe_code)]

//! Presenter: row-diffed terminal output.
//!
//! The presenter remembers the last buffer it wrote and, on the next
//! [`Presenter::present`], rewrites only the rows that changed. A size change
//! (or the first frame) repaints everything. Style changes are tracked so
//! color and attribute sequences are only emitted when they differ from the
//! previous cell.

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};

use crate::buffer::Buffer;
use crate::cell::{Cell, PackedRgba, StyleFlags};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct CellStyle {
    fg: PackedRgba,
    bg: PackedRgba,
    attrs: StyleFlags,
}

impl CellStyle {
    fn from_cell(cell: &Cell) -> Self {
        Self {
            fg: cell.fg,
            bg: cell.bg,
            attrs: cell.attrs,
        }
    }
}

/// Writes buffers to a terminal writer.
#[derive(Debug)]
pub struct Presenter<W: Write> {
    writer: W,
    previous: Option<Buffer>,
    rows_written: u64,
}

impl<W: Write> Presenter<W> {
    /// Create a presenter that has not drawn anything yet.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            previous: None,
            rows_written: 0,
        }
    }

    /// Draw `buffer`, rewriting only rows that differ from the last frame.
    ///
    /// Returns the number of rows written.
    pub fn present(&mut self, buffer: &Buffer) -> io::Result<usize> {
        let rows = match &self.previous {
            Some(prev) if prev.width() == buffer.width() && prev.height() == buffer.height() => {
                buffer.changed_rows(prev)
            }
            _ => {
                queue!(self.writer, ResetColor, Clear(ClearType::All))?;
                (0..buffer.height()).collect()
            }
        };

        for &y in &rows {
            self.write_row(buffer, y)?;
        }
        queue!(self.writer, SetAttribute(Attribute::Reset), ResetColor)?;
        self.writer.flush()?;

        #[cfg(feature = "tracing")]
        tracing::trace!(rows = rows.len(), "presented frame");

        self.rows_written += rows.len() as u64;
        self.previous = Some(buffer.clone());
        Ok(rows.len())
    }

    /// Forget the last frame so the next present repaints everything.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    /// Total rows written over the presenter's lifetime.
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Access the underlying writer.
    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Consume the presenter, returning the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_row(&mut self, buffer: &Buffer, y: u16) -> io::Result<()> {
        queue!(self.writer, MoveTo(0, y), SetAttribute(Attribute::Reset), ResetColor)?;
        let mut current = CellStyle::default();
        for cell in buffer.row_cells(y) {
            if cell.is_continuation() {
                continue;
            }
            let style = CellStyle::from_cell(cell);
            if style != current {
                self.apply_style(style)?;
                current = style;
            }
            queue!(self.writer, Print(cell.ch))?;
        }
        Ok(())
    }

    fn apply_style(&mut self, style: CellStyle) -> io::Result<()> {
        queue!(self.writer, SetAttribute(Attribute::Reset), ResetColor)?;
        if !style.fg.is_transparent() {
            queue!(self.writer, SetForegroundColor(to_color(style.fg)))?;
        }
        if !style.bg.is_transparent() {
            queue!(self.writer, SetBackgroundColor(to_color(style.bg)))?;
        }
        for (flag, attr) in [
            (StyleFlags::BOLD, Attribute::Bold),
            (StyleFlags::DIM, Attribute::Dim),
            (StyleFlags::ITALIC, Attribute::Italic),
            (StyleFlags::UNDERLINE, Attribute::Underlined),
            (StyleFlags::REVERSE, Attribute::Reverse),
        ] {
            if style.attrs.contains(flag) {
                queue!(self.writer, SetAttribute(attr))?;
            }
        }
        Ok(())
    }
}

fn to_color(c: PackedRgba) -> Color {
    Color::Rgb {
        r: c.r(),
        g: c.g(),
        b: c.b(),
    }
}
