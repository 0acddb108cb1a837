// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cell-grid coordinates.
//!
//! All coordinates are in terminal cells, `y` (row) before `x` (column).
//! Positions are signed because a surface may hang partly off the viewport.

use core::ops::{Add, Sub};

/// A signed cell position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    /// Row.
    pub y: i32,
    /// Column.
    pub x: i32,
}

impl Point {
    /// The origin `(0, 0)`.
    pub const ORIGIN: Self = Self { y: 0, x: 0 };

    /// Creates a point.
    #[inline]
    #[must_use]
    pub const fn new(y: i32, x: i32) -> Self {
        Self { y, x }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.y.saturating_add(rhs.y), self.x.saturating_add(rhs.x))
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.y.saturating_sub(rhs.y), self.x.saturating_sub(rhs.x))
    }
}

/// The dimensions of a surface, in cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    /// Height.
    pub rows: u32,
    /// Width.
    pub cols: u32,
}

impl Size {
    /// Creates a size.
    #[inline]
    #[must_use]
    pub const fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }

    /// Number of cells covered.
    #[inline]
    #[must_use]
    pub const fn area(self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Returns `true` if either dimension is zero.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Returns `true` if `(y, x)` lies inside a grid of this size.
    #[inline]
    #[must_use]
    pub const fn contains(self, y: u32, x: u32) -> bool {
        y < self.rows && x < self.cols
    }
}

/// The last write position within a surface.
///
/// Always inside the surface: `y < rows` and `x < cols`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cursor {
    /// Row.
    pub y: u32,
    /// Column.
    pub x: u32,
}

impl Cursor {
    /// Creates a cursor position.
    #[inline]
    #[must_use]
    pub const fn new(y: u32, x: u32) -> Self {
        Self { y, x }
    }
}

/// An axis-aligned rectangle of cells in absolute coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CellRect {
    /// Top-left cell.
    pub origin: Point,
    /// Extent.
    pub size: Size,
}

impl CellRect {
    /// Creates a rectangle.
    #[inline]
    #[must_use]
    pub const fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Returns `true` if the rectangle covers no cells.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    /// One past the last row, widened so it cannot overflow.
    #[inline]
    #[must_use]
    pub const fn bottom(&self) -> i64 {
        self.origin.y as i64 + self.size.rows as i64
    }

    /// One past the last column, widened so it cannot overflow.
    #[inline]
    #[must_use]
    pub const fn right(&self) -> i64 {
        self.origin.x as i64 + self.size.cols as i64
    }

    /// Returns `true` if `p` lies inside the rectangle.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        let (y, x) = (i64::from(p.y), i64::from(p.x));
        y >= i64::from(self.origin.y)
            && y < self.bottom()
            && x >= i64::from(self.origin.x)
            && x < self.right()
    }

    /// Returns the overlap of two rectangles, or `None` if they are disjoint.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let top = self.origin.y.max(other.origin.y);
        let left = self.origin.x.max(other.origin.x);
        let bottom = self.bottom().min(other.bottom());
        let right = self.right().min(other.right());
        let rows = bottom - i64::from(top);
        let cols = right - i64::from(left);
        if rows <= 0 || cols <= 0 {
            return None;
        }
        // Both extents are bounded by the smaller input, which fits in u32.
        Some(Self::new(
            Point::new(top, left),
            Size::new(
                u32::try_from(rows).unwrap_or(u32::MAX),
                u32::try_from(cols).unwrap_or(u32::MAX),
            ),
        ))
    }
}
