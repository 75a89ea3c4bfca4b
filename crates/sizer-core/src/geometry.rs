#![forbid(unsafe_code)]

//! Cell-grid rectangles and insets.

/// Axis-aligned area on the cell grid. `(0, 0)` is the top-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    /// First column.
    pub x: u16,
    /// First row.
    pub y: u16,
    /// Width in cells.
    pub width: u16,
    /// Height in cells.
    pub height: u16,
}

impl Rect {
    #[inline]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// `width` x `height` anchored at the origin.
    #[inline]
    pub const fn from_size(width: u16, height: u16) -> Self {
        Self::new(0, 0, width, height)
    }

    /// One past the last column.
    #[inline]
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// One past the last row.
    #[inline]
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    /// No cells at all.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether cell `(x, y)` lies inside.
    #[inline]
    pub const fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Overlap of two rects, or the zero rect when they are disjoint.
    pub fn intersection(&self, other: &Rect) -> Rect {
        let (left, top) = (self.x.max(other.x), self.y.max(other.y));
        let (right, bottom) = (
            self.right().min(other.right()),
            self.bottom().min(other.bottom()),
        );
        if left >= right || top >= bottom {
            return Rect::default();
        }
        Rect::new(left, top, right - left, bottom - top)
    }

    /// Shrink by `pad` on each side, bottoming out at zero size.
    pub fn inner(&self, pad: Sides) -> Rect {
        Rect::new(
            self.x.saturating_add(pad.left),
            self.y.saturating_add(pad.top),
            self.width.saturating_sub(pad.left.saturating_add(pad.right)),
            self.height.saturating_sub(pad.top.saturating_add(pad.bottom)),
        )
    }

    /// Split off `rows` rows from the top.
    ///
    /// Returns `(top, rest)`. When the rectangle is shorter than `rows`, the
    /// top part takes everything and the rest is empty.
    pub fn split_top(&self, rows: u16) -> (Rect, Rect) {
        let rows = rows.min(self.height);
        let top = Rect::new(self.x, self.y, self.width, rows);
        let rest = Rect::new(
            self.x,
            self.y.saturating_add(rows),
            self.width,
            self.height - rows,
        );
        (top, rest)
    }

    /// Split off `rows` rows from the bottom.
    ///
    /// Returns `(rest, bottom)`.
    pub fn split_bottom(&self, rows: u16) -> (Rect, Rect) {
        let rows = rows.min(self.height);
        let rest = Rect::new(self.x, self.y, self.width, self.height - rows);
        let bottom = Rect::new(self.x, self.y + (self.height - rows), self.width, rows);
        (rest, bottom)
    }
}

/// Per-edge inset, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sides {
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
    pub left: u16,
}

impl Sides {
    pub const fn all(n: u16) -> Self {
        Self::new(n, n, n, n)
    }

    /// `n` on the left and right only.
    pub const fn horizontal(n: u16) -> Self {
        Self::new(0, n, 0, n)
    }

    /// Clockwise from the top, like CSS.
    pub const fn new(top: u16, right: u16, bottom: u16, left: u16) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}
