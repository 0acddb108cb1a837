// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Z-stack: the global paint order.
//!
//! Every live surface sits in one doubly linked list running from the store's
//! `top` anchor (via `below`) to its `bottom` anchor (via `above`). A surface
//! nearer the top occludes surfaces nearer the bottom. The root surface is
//! always present, so the list is never empty.

use crate::dirty;
use crate::error::{GraphError, Result};

use super::id::{INVALID, SurfaceId};
use super::store::SurfaceStore;
use super::traverse::ZOrder;

impl SurfaceStore {
    // -- Restack API --

    /// Moves `surface` to the top of the z-stack.
    pub fn raise_to_top(&mut self, surface: SurfaceId) -> Result<()> {
        let idx = self.check(surface)?;
        if self.top != idx {
            self.unlink_z(idx);
            self.push_top(idx);
            self.dirty.mark(idx, dirty::STACKING);
        }
        tracing::debug!(surface = %surface, "surface raised to top");
        Ok(())
    }

    /// Moves `surface` to the bottom of the z-stack.
    pub fn lower_to_bottom(&mut self, surface: SurfaceId) -> Result<()> {
        let idx = self.check(surface)?;
        if self.bottom != idx {
            self.unlink_z(idx);
            self.push_bottom(idx);
            self.dirty.mark(idx, dirty::STACKING);
        }
        tracing::debug!(surface = %surface, "surface lowered to bottom");
        Ok(())
    }

    /// Moves `surface` directly above `target`.
    ///
    /// Fails with [`GraphError::NotInStack`] if `target` is not present and
    /// with [`GraphError::SelfRestack`] if the two are the same surface.
    pub fn move_above(&mut self, surface: SurfaceId, target: SurfaceId) -> Result<()> {
        let (idx, t) = self.check_restack(surface, target)?;
        if self.below[idx as usize] != t {
            self.unlink_z(idx);
            self.insert_above(idx, t);
            self.dirty.mark(idx, dirty::STACKING);
        }
        tracing::debug!(surface = %surface, target = %target, "surface moved above");
        Ok(())
    }

    /// Moves `surface` directly below `target`.
    ///
    /// Fails with [`GraphError::NotInStack`] if `target` is not present and
    /// with [`GraphError::SelfRestack`] if the two are the same surface.
    pub fn move_below(&mut self, surface: SurfaceId, target: SurfaceId) -> Result<()> {
        let (idx, t) = self.check_restack(surface, target)?;
        if self.above[idx as usize] != t {
            self.unlink_z(idx);
            self.insert_below(idx, t);
            self.dirty.mark(idx, dirty::STACKING);
        }
        tracing::debug!(surface = %surface, target = %target, "surface moved below");
        Ok(())
    }

    // -- Queries --

    /// Returns the topmost surface.
    #[must_use]
    pub fn top(&self) -> SurfaceId {
        self.id_at(self.top)
    }

    /// Returns the bottommost surface.
    #[must_use]
    pub fn bottom(&self) -> SurfaceId {
        self.id_at(self.bottom)
    }

    /// Returns the surface directly above `id`, or `None` at the top.
    pub fn above(&self, id: SurfaceId) -> Result<Option<SurfaceId>> {
        let idx = self.check(id)?;
        let a = self.above[idx as usize];
        Ok((a != INVALID).then(|| self.id_at(a)))
    }

    /// Returns the surface directly below `id`, or `None` at the bottom.
    pub fn below(&self, id: SurfaceId) -> Result<Option<SurfaceId>> {
        let idx = self.check(id)?;
        let b = self.below[idx as usize];
        Ok((b != INVALID).then(|| self.id_at(b)))
    }

    /// Iterates every surface from top to bottom (paint order, front first).
    #[must_use]
    pub fn z_order(&self) -> ZOrder<'_> {
        ZOrder::top_down(self)
    }

    /// Iterates every surface from bottom to top.
    #[must_use]
    pub fn z_order_rev(&self) -> ZOrder<'_> {
        ZOrder::bottom_up(self)
    }

    // -- Internal helpers --

    fn check_restack(&self, surface: SurfaceId, target: SurfaceId) -> Result<(u32, u32)> {
        let idx = self.check(surface)?;
        let t = self.check_in_stack(target)?;
        if idx == t {
            return Err(GraphError::SelfRestack(surface));
        }
        Ok((idx, t))
    }

    /// Links a detached `idx` above the current top.
    pub(crate) fn push_top(&mut self, idx: u32) {
        self.above[idx as usize] = INVALID;
        self.below[idx as usize] = self.top;
        if self.top != INVALID {
            self.above[self.top as usize] = idx;
        } else {
            self.bottom = idx;
        }
        self.top = idx;
    }

    /// Links a detached `idx` beneath the current bottom.
    pub(crate) fn push_bottom(&mut self, idx: u32) {
        self.below[idx as usize] = INVALID;
        self.above[idx as usize] = self.bottom;
        if self.bottom != INVALID {
            self.below[self.bottom as usize] = idx;
        } else {
            self.top = idx;
        }
        self.bottom = idx;
    }

    /// Links a detached `idx` directly above `target`.
    pub(crate) fn insert_above(&mut self, idx: u32, target: u32) {
        let over = self.above[target as usize];
        self.above[idx as usize] = over;
        self.below[idx as usize] = target;
        if over != INVALID {
            self.below[over as usize] = idx;
        } else {
            self.top = idx;
        }
        self.above[target as usize] = idx;
    }

    /// Links a detached `idx` directly below `target`.
    pub(crate) fn insert_below(&mut self, idx: u32, target: u32) {
        let under = self.below[target as usize];
        self.below[idx as usize] = under;
        self.above[idx as usize] = target;
        if under != INVALID {
            self.above[under as usize] = idx;
        } else {
            self.bottom = idx;
        }
        self.below[target as usize] = idx;
    }

    /// Unlinks `idx`, promoting a neighbor to anchor if `idx` was one.
    pub(crate) fn unlink_z(&mut self, idx: u32) {
        let over = self.above[idx as usize];
        let under = self.below[idx as usize];
        if over != INVALID {
            self.below[over as usize] = under;
        } else {
            self.top = under;
        }
        if under != INVALID {
            self.above[under as usize] = over;
        } else {
            self.bottom = over;
        }
        self.above[idx as usize] = INVALID;
        self.below[idx as usize] = INVALID;
    }
}
