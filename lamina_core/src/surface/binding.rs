// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Binding tree: parent/child links with O(1) attach and detach.
//!
//! Each parent's children form a singly linked list headed by the parent's
//! `first_child` field. Instead of a previous-sibling link, every bound
//! surface records a [`BackSlot`]: the one field that currently points at it.
//! Unlinking rewrites that field to skip the surface, which treats the first
//! child and any later sibling identically.

use understory_dirty::EagerPolicy;

use crate::dirty;
use crate::error::{BindingConflict, GraphError, Result};

use super::id::{INVALID, SurfaceId};
use super::store::SurfaceStore;
use super::traverse::Children;

/// The link field that currently holds a bound surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BackSlot {
    /// Not in any sibling list.
    #[default]
    Detached,
    /// The `first_child` field of the parent at this slot index.
    FirstChild(u32),
    /// The `next_sibling` field of the sibling at this slot index.
    NextSibling(u32),
}

impl SurfaceStore {
    // -- Binding API --

    /// Binds an unbound `surface` to `parent`, inserting it at the head of
    /// the parent's children.
    ///
    /// The surface keeps its on-screen position. Fails with
    /// [`GraphError::InvalidBinding`] if `surface` is the root, is already
    /// bound, is `parent` itself, or is an ancestor of `parent`.
    pub fn bind(&mut self, surface: SurfaceId, parent: SurfaceId) -> Result<()> {
        let c = self.check(surface)?;
        let p = self.check(parent)?;
        if self.parent[c as usize] != INVALID {
            return Err(GraphError::InvalidBinding {
                surface,
                parent,
                reason: BindingConflict::AlreadyBound,
            });
        }
        self.check_binding(surface, parent)?;

        let absolute = self.absolute_at(c);
        self.link_child(c, p);
        self.origin[c as usize] = absolute - self.absolute_at(p);
        self.dirty.mark_with(c, dirty::POSITION, &EagerPolicy);
        tracing::debug!(surface = %surface, parent = %parent, "surface bound");
        Ok(())
    }

    /// Detaches `surface` from its parent.
    ///
    /// The surface keeps its on-screen position, which becomes its stored
    /// (absolute) origin. Fails with [`GraphError::NotBound`] if it has no
    /// parent.
    pub fn unbind(&mut self, surface: SurfaceId) -> Result<()> {
        let c = self.check(surface)?;
        if self.parent[c as usize] == INVALID {
            return Err(GraphError::NotBound(surface));
        }

        let absolute = self.absolute_at(c);
        self.unlink_child(c);
        self.origin[c as usize] = absolute;
        self.dirty.mark_with(c, dirty::POSITION, &EagerPolicy);
        tracing::debug!(surface = %surface, "surface unbound");
        Ok(())
    }

    /// Moves `surface` under `new_parent`, whether or not it is currently
    /// bound.
    ///
    /// All checks run before the old link is touched, so a refused reparent
    /// leaves the surface bound where it was, at the same sibling position.
    pub fn reparent(&mut self, surface: SurfaceId, new_parent: SurfaceId) -> Result<()> {
        let c = self.check(surface)?;
        let p = self.check(new_parent)?;
        self.check_binding(surface, new_parent)?;

        let absolute = self.absolute_at(c);
        if self.parent[c as usize] != INVALID {
            self.unlink_child(c);
        }
        self.link_child(c, p);
        self.origin[c as usize] = absolute - self.absolute_at(p);
        self.dirty.mark_with(c, dirty::POSITION, &EagerPolicy);
        tracing::debug!(surface = %surface, parent = %new_parent, "surface reparented");
        Ok(())
    }

    /// Returns the parent of a surface, if any.
    pub fn parent(&self, id: SurfaceId) -> Result<Option<SurfaceId>> {
        let idx = self.check(id)?;
        let p = self.parent[idx as usize];
        Ok((p != INVALID).then(|| self.id_at(p)))
    }

    /// Returns an iterator over the direct children of a surface, most
    /// recently bound first.
    ///
    /// The iterator borrows the store, so the children cannot change while
    /// it is alive. Clone it to restart from the same point.
    pub fn children(&self, id: SurfaceId) -> Result<Children<'_>> {
        let idx = self.check(id)?;
        Ok(Children::new(self, self.first_child[idx as usize]))
    }

    /// Returns the back slot of a surface.
    pub fn back_slot(&self, id: SurfaceId) -> Result<BackSlot> {
        let idx = self.check(id)?;
        Ok(self.back_slot[idx as usize])
    }

    /// Returns whether `id` is a strict descendant of `ancestor`.
    pub fn is_descendant_of(&self, id: SurfaceId, ancestor: SurfaceId) -> Result<bool> {
        let c = self.check(id)?;
        let a = self.check(ancestor)?;
        Ok(self.is_descendant_at(c, a))
    }

    /// Resolves what a back slot currently points at.
    #[must_use]
    pub fn slot_target(&self, slot: BackSlot) -> u32 {
        match slot {
            BackSlot::Detached => INVALID,
            BackSlot::FirstChild(p) if p < self.len => self.first_child[p as usize],
            BackSlot::NextSibling(s) if s < self.len => self.next_sibling[s as usize],
            _ => INVALID,
        }
    }

    // -- Internal helpers --

    fn check_binding(&self, surface: SurfaceId, parent: SurfaceId) -> Result<()> {
        let reason = if surface.idx == self.root {
            BindingConflict::Root
        } else if surface.idx == parent.idx {
            BindingConflict::SelfBinding
        } else if self.is_descendant_at(parent.idx, surface.idx) {
            BindingConflict::Cycle
        } else {
            return Ok(());
        };
        Err(GraphError::InvalidBinding {
            surface,
            parent,
            reason,
        })
    }

    /// Walks `idx`'s ancestors looking for `ancestor`.
    fn is_descendant_at(&self, idx: u32, ancestor: u32) -> bool {
        let mut p = self.parent[idx as usize];
        let mut budget = self.len;
        while p != INVALID && p < self.len && budget > 0 {
            if p == ancestor {
                return true;
            }
            p = self.parent[p as usize];
            budget -= 1;
        }
        false
    }

    /// Inserts `c` at the head of `p`'s children. `c` must be detached.
    pub(crate) fn link_child(&mut self, c: u32, p: u32) {
        let old_first = self.first_child[p as usize];
        self.next_sibling[c as usize] = old_first;
        if old_first != INVALID {
            self.back_slot[old_first as usize] = BackSlot::NextSibling(c);
        }
        self.first_child[p as usize] = c;
        self.back_slot[c as usize] = BackSlot::FirstChild(p);
        self.parent[c as usize] = p;

        // Absolute position of `c` now depends on `p`.
        let _ = self.dirty.add_dependency(c, p, dirty::POSITION);
    }

    /// Removes `c` from its sibling list by rewriting its back slot.
    pub(crate) fn unlink_child(&mut self, c: u32) {
        let slot = self.back_slot[c as usize];
        let next = self.next_sibling[c as usize];
        match slot {
            BackSlot::Detached => return,
            BackSlot::FirstChild(p) => self.first_child[p as usize] = next,
            BackSlot::NextSibling(s) => self.next_sibling[s as usize] = next,
        }
        if next != INVALID {
            // Whatever held `c` now holds `next`.
            self.back_slot[next as usize] = slot;
        }

        let p = self.parent[c as usize];
        if p != INVALID {
            self.dirty.remove_dependency(c, p, dirty::POSITION);
        }
        self.parent[c as usize] = INVALID;
        self.next_sibling[c as usize] = INVALID;
        self.back_slot[c as usize] = BackSlot::Detached;
    }
}
