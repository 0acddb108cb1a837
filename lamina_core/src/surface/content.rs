// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry and cell content mutation.

use alloc::vec;

use understory_dirty::EagerPolicy;

use crate::cell::Cell;
use crate::dirty;
use crate::error::{GraphError, Result};
use crate::geometry::{Cursor, Point, Size};

use super::id::SurfaceId;
use super::store::SurfaceStore;

impl SurfaceStore {
    // -- Geometry --

    /// Sets the stored origin: relative to the parent when bound, absolute
    /// otherwise. Bound descendants move along.
    pub fn move_to(&mut self, surface: SurfaceId, y: i32, x: i32) -> Result<()> {
        let idx = self.check(surface)?;
        self.origin[idx as usize] = Point::new(y, x);
        self.dirty.mark_with(idx, dirty::POSITION, &EagerPolicy);
        if idx == self.root {
            self.viewport_changed = true;
        }
        tracing::debug!(surface = %surface, y, x, "surface moved");
        Ok(())
    }

    /// Changes a surface's geometry.
    ///
    /// Cells in the overlap of the old and new extents are kept; new cells
    /// are transparent. The cursor is clamped into the new extent.
    pub fn resize(&mut self, surface: SurfaceId, rows: u32, cols: u32) -> Result<()> {
        let idx = self.check(surface)?;
        let new = Size::new(rows, cols);
        if new.is_empty() {
            return Err(GraphError::InvalidGeometry { rows, cols });
        }

        let i = idx as usize;
        let old = self.size[i];
        let mut grid = vec![Cell::Transparent; new.area()];
        let keep_rows = old.rows.min(new.rows) as usize;
        let keep_cols = old.cols.min(new.cols) as usize;
        for row in 0..keep_rows {
            let src = row * old.cols as usize;
            let dst = row * new.cols as usize;
            grid[dst..dst + keep_cols].copy_from_slice(&self.cells[i][src..src + keep_cols]);
        }
        self.cells[i] = grid;
        self.size[i] = new;
        let cursor = self.cursor[i];
        self.cursor[i] = Cursor::new(cursor.y.min(rows - 1), cursor.x.min(cols - 1));

        self.dirty.mark(idx, dirty::POSITION);
        if idx == self.root {
            self.viewport_changed = true;
        }
        tracing::debug!(surface = %surface, rows, cols, "surface resized");
        Ok(())
    }

    /// Resizes the root surface, and with it the viewport.
    pub fn resize_viewport(&mut self, rows: u32, cols: u32) -> Result<()> {
        let root = self.root();
        self.resize(root, rows, cols)
    }

    // -- Content --

    /// Writes one cell and moves the cursor there.
    pub fn put(&mut self, surface: SurfaceId, y: u32, x: u32, cell: Cell) -> Result<()> {
        let idx = self.check_cell(surface, y, x)?;
        let i = idx as usize;
        let offset = y as usize * self.size[i].cols as usize + x as usize;
        self.cells[i][offset] = cell;
        self.cursor[i] = Cursor::new(y, x);
        self.dirty.mark(idx, dirty::CONTENT);
        tracing::trace!(surface = %surface, y, x, ?cell, "cell written");
        Ok(())
    }

    /// Writes `text` left to right starting at `(y, x)`, one character per
    /// cell, stopping at the right edge.
    ///
    /// Returns the number of cells written. The cursor ends on the last cell
    /// written.
    pub fn put_str(&mut self, surface: SurfaceId, y: u32, x: u32, text: &str) -> Result<usize> {
        let idx = self.check_cell(surface, y, x)?;
        let i = idx as usize;
        let cols = self.size[i].cols;
        let row_start = y as usize * cols as usize;
        let mut written = 0;
        for (col, ch) in (x..cols).zip(text.chars()) {
            self.cells[i][row_start + col as usize] = Cell::Glyph(ch);
            self.cursor[i] = Cursor::new(y, col);
            written += 1;
        }
        if written > 0 {
            self.dirty.mark(idx, dirty::CONTENT);
        }
        tracing::trace!(surface = %surface, y, x, written, "text written");
        Ok(written)
    }

    /// Sets every cell of the surface to `cell`.
    pub fn fill(&mut self, surface: SurfaceId, cell: Cell) -> Result<()> {
        let idx = self.check(surface)?;
        self.cells[idx as usize].fill(cell);
        self.dirty.mark(idx, dirty::CONTENT);
        Ok(())
    }

    /// Makes every cell transparent and homes the cursor.
    pub fn clear(&mut self, surface: SurfaceId) -> Result<()> {
        self.fill(surface, Cell::Transparent)?;
        self.cursor[surface.idx as usize] = Cursor::default();
        Ok(())
    }

    /// Reads one cell.
    pub fn cell_at(&self, surface: SurfaceId, y: u32, x: u32) -> Result<Cell> {
        let idx = self.check_cell(surface, y, x)?;
        let i = idx as usize;
        Ok(self.cells[i][y as usize * self.size[i].cols as usize + x as usize])
    }

    /// Moves the cursor without writing.
    pub fn cursor_move(&mut self, surface: SurfaceId, y: u32, x: u32) -> Result<()> {
        let idx = self.check_cell(surface, y, x)?;
        self.cursor[idx as usize] = Cursor::new(y, x);
        Ok(())
    }

    fn check_cell(&self, surface: SurfaceId, y: u32, x: u32) -> Result<u32> {
        let idx = self.check(surface)?;
        if self.size[idx as usize].contains(y, x) {
            Ok(idx)
        } else {
            Err(GraphError::OutOfBounds { surface, y, x })
        }
    }
}
