// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The composited cell grid for one render pass.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use lamina_core::{Cell, Size};

use crate::damage::DamageRegion;

/// A viewport-sized grid of composited cells.
///
/// Row-major; `(0, 0)` is the viewport's top-left corner. Cells no surface
/// covered with opaque content stay [`Cell::Transparent`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    size: Size,
    cells: Vec<Cell>,
    /// What changed relative to the previous frame from the same
    /// [`Compositor`](crate::Compositor).
    pub damage: DamageRegion,
}

impl Frame {
    /// Creates a fully transparent frame with full damage.
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            size,
            cells: vec![Cell::Transparent; size.area()],
            damage: DamageRegion::Full,
        }
    }

    /// Returns the frame's dimensions.
    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Returns the cell at `(y, x)`, or `None` outside the frame.
    #[must_use]
    pub fn get(&self, y: u32, x: u32) -> Option<Cell> {
        self.size
            .contains(y, x)
            .then(|| self.cells[self.offset(y, x)])
    }

    /// Returns row `y`, or `None` past the last row.
    #[must_use]
    pub fn row(&self, y: u32) -> Option<&[Cell]> {
        if y >= self.size.rows {
            return None;
        }
        let start = self.offset(y, 0);
        Some(&self.cells[start..start + self.size.cols as usize])
    }

    /// Iterates rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks_exact(self.size.cols.max(1) as usize)
    }

    /// All cells, row-major.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Renders the frame as text, one line per row, transparent cells as
    /// spaces.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() + self.size.rows as usize);
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.extend(row.iter().map(|c| c.glyph().unwrap_or(' ')));
        }
        out
    }

    pub(crate) fn cell_mut(&mut self, y: u32, x: u32) -> &mut Cell {
        let offset = self.offset(y, x);
        &mut self.cells[offset]
    }

    fn offset(&self, y: u32, x: u32) -> usize {
        y as usize * self.size.cols as usize + x as usize
    }
}
