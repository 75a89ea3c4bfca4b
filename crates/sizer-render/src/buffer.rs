#![forbid(unsafe_code)]

//! Fixed-size cell grid that a frame draws into and the presenter diffs.
//!
//! Storage is one row-major `Vec`, row `y` starting at `y * width`. The
//! dimensions are fixed at construction, so the vector length always equals
//! `width * height`. Writes outside the grid are dropped silently.

use crate::cell::Cell;
use sizer_core::geometry::Rect;

/// Grid of [`Cell`]s.
///
/// # Example
///
/// ```
/// use sizer_render::buffer::Buffer;
/// use sizer_render::cell::Cell;
///
/// let mut buffer = Buffer::new(80, 24);
/// buffer.set(0, 0, Cell::from_char('H'));
/// buffer.set(1, 0, Cell::from_char('i'));
/// assert_eq!(buffer.row_text(0).trim_end(), "Hi");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Buffer {
    /// Blank grid of `width` x `height`.
    ///
    /// # Panics
    ///
    /// If either dimension is zero.
    pub fn new(width: u16, height: u16) -> Self {
        assert!(width > 0, "buffer width must be > 0");
        assert!(height > 0, "buffer height must be > 0");

        let cells = std::iter::repeat_n(Cell::default(), usize::from(width) * usize::from(height))
            .collect();
        Self {
            width,
            height,
            cells,
        }
    }

    /// Columns.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Rows.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// The whole grid as a rect at the origin.
    #[inline]
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    /// Cell at column `x`, row `y`.
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    #[inline]
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        self.index(x, y).map(move |i| &mut self.cells[i])
    }

    /// Set the cell at (x, y). Out-of-bounds writes are ignored.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    /// Fill a rectangular region (clipped to the buffer) with a cell.
    pub fn fill(&mut self, rect: Rect, cell: Cell) {
        let clip = rect.intersection(&self.bounds());
        let (left, right) = (usize::from(clip.x), usize::from(clip.right()));
        for y in clip.y..clip.bottom() {
            let row = usize::from(y) * usize::from(self.width);
            self.cells[row + left..row + right].fill(cell);
        }
    }

    /// Reset every cell to the default.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Cells of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn row_cells(&self, y: u16) -> &[Cell] {
        assert!(y < self.height, "row {y} out of bounds");
        let width = usize::from(self.width);
        let start = usize::from(y) * width;
        &self.cells[start..start + width]
    }

    /// Plain text of row `y`, continuation cells skipped.
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        self.row_cells(y)
            .iter()
            .filter(|c| !c.is_continuation())
            .map(|c| c.ch)
            .collect()
    }

    /// The whole buffer as text: one line per row, trailing spaces trimmed.
    pub fn to_text(&self) -> String {
        (0..self.height)
            .map(|y| self.row_text(y).trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether any row contains `needle`.
    pub fn contains_text(&self, needle: &str) -> bool {
        (0..self.height).any(|y| self.row_text(y).contains(needle))
    }

    /// Rows whose cells differ from `other`.
    ///
    /// Every row is reported when the dimensions differ.
    pub fn changed_rows(&self, other: &Buffer) -> Vec<u16> {
        if self.width != other.width || self.height != other.height {
            return (0..self.height).collect();
        }
        (0..self.height)
            .filter(|&y| self.row_cells(y) != other.row_cells(y))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_blank() {
        let buf = Buffer::new(4, 2);
        assert_eq!(buf.width(), 4);
        assert_eq!(buf.height(), 2);
        assert_eq!(buf.to_text(), "\n");
    }

    #[test]
    #[should_panic(expected = "buffer width must be > 0")]
    fn zero_width_panics() {
        let _ = Buffer::new(0, 1);
    }

    #[test]
    fn out_of_bounds_set_is_ignored() {
        let mut buf = Buffer::new(2, 2);
        buf.set(5, 5, Cell::from_char('x'));
        assert!(buf.get(5, 5).is_none());
        assert!(!buf.contains_text("x"));
    }

    #[test]
    fn fill_is_clipped() {
        let mut buf = Buffer::new(3, 2);
        buf.fill(Rect::new(1, 0, 10, 10), Cell::from_char('#'));
        assert_eq!(buf.to_text(), " ##\n ##");
    }

    #[test]
    fn row_text_skips_continuation() {
        let mut buf = Buffer::new(4, 1);
        buf.set(0, 0, Cell::from_char('界'));
        buf.set(1, 0, Cell::continuation());
        buf.set(2, 0, Cell::from_char('a'));
        assert_eq!(buf.row_text(0), "界a ");
    }

    #[test]
    fn changed_rows_reports_differences() {
        let a = Buffer::new(3, 3);
        let mut b = a.clone();
        assert!(a.changed_rows(&b).is_empty());
        b.set(0, 1, Cell::from_char('z'));
        assert_eq!(b.changed_rows(&a), vec![1]);
        assert_eq!(Buffer::new(2, 2).changed_rows(&a), vec![0, 1]);
    }

    #[test]
    fn clear_resets_cells() {
        let mut buf = Buffer::new(2, 1);
        buf.set(0, 0, Cell::from_char('q'));
        buf.clear();
        assert_eq!(buf, Buffer::new(2, 1));
    }
}
