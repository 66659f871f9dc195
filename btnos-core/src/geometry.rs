//! Screen coordinates and rectangles
//!
//! The panel reports points in display pixels with the origin at the top
//! left. The touch surface extends 40 pixels below the visible area for the
//! three frame buttons, so points with `y >= 240` are valid.

use core::fmt;

/// A touch or drawing coordinate in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: u16,
    pub y: u16,
}

impl Point {
    /// Reported by some panels when no finger is down
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// True for the `(0, 0)` "no touch" sentinel
    pub const fn is_origin(&self) -> bool {
        self.x == 0 && self.y == 0
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Axis-aligned rectangle
///
/// Hit testing is half-open: a point on the left or top edge is inside,
/// a point on the right or bottom edge is not. Adjacent buttons therefore
/// never both claim the same pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }

    /// One past the rightmost column
    pub const fn right(&self) -> u32 {
        self.x as u32 + self.w as u32
    }

    /// One past the bottom row
    pub const fn bottom(&self) -> u32 {
        self.y as u32 + self.h as u32
    }

    pub const fn contains(&self, p: Point) -> bool {
        self.contains_x(p.x) && self.contains_y(p.y)
    }

    pub const fn contains_x(&self, x: u16) -> bool {
        x >= self.x && (x as u32) < self.right()
    }

    pub const fn contains_y(&self, y: u16) -> bool {
        y >= self.y && (y as u32) < self.bottom()
    }

    /// Top-left corner offset by `(dx, dy)`, saturating at the panel edge
    pub const fn offset(&self, dx: u16, dy: u16) -> Point {
        Point {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}
