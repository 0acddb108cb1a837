// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change collection between render passes.
//!
//! Evaluation drains each dirty channel once:
//!
//! 1. **POSITION**: surfaces that moved, were resized, or were rebound,
//!    plus every bound descendant of such a surface.
//! 2. **CONTENT**: surfaces whose cells were written.
//! 3. **STACKING**: surfaces that were restacked.
//!
//! [`SceneChanges`] uses raw slot indices (`u32`) rather than
//! [`SurfaceId`](super::SurfaceId) handles, so consumers can index the
//! store's `*_at()` accessors and their own per-slot caches directly. An
//! index in `removed` may reappear in `added` when its slot was reused.

use alloc::vec::Vec;

use crate::dirty;

use super::store::SurfaceStore;

/// The set of changes accumulated since the previous
/// [`SurfaceStore::evaluate`] call.
#[derive(Clone, Debug, Default)]
pub struct SceneChanges {
    /// Surfaces whose absolute bounds may have changed.
    pub moved: Vec<u32>,
    /// Surfaces whose cells changed.
    pub content: Vec<u32>,
    /// Surfaces whose z-stack position changed.
    pub restacked: Vec<u32>,
    /// Surfaces created since the last evaluate.
    pub added: Vec<u32>,
    /// Surfaces destroyed since the last evaluate.
    pub removed: Vec<u32>,
    /// Whether the root surface (the viewport) moved or was resized.
    pub viewport_changed: bool,
}

impl SceneChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.moved.clear();
        self.content.clear();
        self.restacked.clear();
        self.added.clear();
        self.removed.clear();
        self.viewport_changed = false;
    }

    /// Returns `true` if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moved.is_empty()
            && self.content.is_empty()
            && self.restacked.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
            && !self.viewport_changed
    }

    /// Iterates every slot mentioned in any change list. A slot may appear
    /// more than once.
    pub fn touched(&self) -> impl Iterator<Item = u32> + '_ {
        self.moved
            .iter()
            .chain(&self.content)
            .chain(&self.restacked)
            .chain(&self.added)
            .chain(&self.removed)
            .copied()
    }
}

impl SurfaceStore {
    /// Drains the dirty channels and returns the changes since the previous
    /// call.
    pub fn evaluate(&mut self) -> SceneChanges {
        let mut changes = SceneChanges::default();
        self.evaluate_into(&mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), but reuses a caller-provided buffer
    /// to avoid allocation.
    pub fn evaluate_into(&mut self, changes: &mut SceneChanges) {
        changes.clear();

        // POSITION propagates to bound descendants through dependency edges.
        changes.moved = self
            .dirty
            .drain(dirty::POSITION)
            .affected()
            .deterministic()
            .run()
            .collect();

        changes.content = self
            .dirty
            .drain(dirty::CONTENT)
            .deterministic()
            .run()
            .collect();

        changes.restacked = self
            .dirty
            .drain(dirty::STACKING)
            .deterministic()
            .run()
            .collect();

        // Move lifecycle lists.
        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);
        changes.viewport_changed = core::mem::take(&mut self.viewport_changed);

        tracing::trace!(
            moved = changes.moved.len(),
            content = changes.content.len(),
            restacked = changes.restacked.len(),
            added = changes.added.len(),
            removed = changes.removed.len(),
            "scene evaluated"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use crate::config::SceneConfig;
    use crate::surface::{ChildDisposition, SurfaceOptions};

    fn settled() -> SurfaceStore {
        let mut s = SurfaceStore::new(SceneConfig::new(24, 80)).unwrap();
        let _ = s.evaluate();
        s
    }

    #[test]
    fn first_evaluate_reports_root_and_viewport() {
        let mut s = SurfaceStore::new(SceneConfig::new(24, 80)).unwrap();
        let changes = s.evaluate();
        assert!(changes.viewport_changed);
        assert_eq!(changes.added, [s.root().index()]);
    }

    #[test]
    fn no_change_evaluate_returns_empty() {
        let mut s = settled();
        let changes = s.evaluate();
        assert!(changes.is_empty());
    }

    #[test]
    fn moving_a_parent_marks_descendants() {
        let mut s = settled();
        let p = s.create(SurfaceOptions::new(5, 5)).unwrap();
        let c = s.create(SurfaceOptions::new(2, 2).bound_to(p)).unwrap();
        let g = s.create(SurfaceOptions::new(1, 1).bound_to(c)).unwrap();
        let loner = s.create(SurfaceOptions::new(1, 1)).unwrap();
        let _ = s.evaluate();

        s.move_to(p, 3, 3).unwrap();
        let changes = s.evaluate();
        assert!(changes.moved.contains(&p.index()));
        assert!(changes.moved.contains(&c.index()));
        assert!(changes.moved.contains(&g.index()));
        assert!(!changes.moved.contains(&loner.index()));
    }

    #[test]
    fn content_and_stacking_are_local() {
        let mut s = settled();
        let p = s.create(SurfaceOptions::new(5, 5)).unwrap();
        let c = s.create(SurfaceOptions::new(2, 2).bound_to(p)).unwrap();
        let _ = s.evaluate();

        s.put(p, 0, 0, Cell::Glyph('a')).unwrap();
        s.lower_to_bottom(p).unwrap();
        let changes = s.evaluate();
        assert_eq!(changes.content, [p.index()]);
        assert_eq!(changes.restacked, [p.index()]);
        assert!(!changes.content.contains(&c.index()));
        assert!(changes.moved.is_empty());
    }

    #[test]
    fn lifecycle_is_reported() {
        let mut s = settled();
        let a = s.create(SurfaceOptions::new(1, 1)).unwrap();
        let changes = s.evaluate();
        assert_eq!(changes.added, [a.index()]);

        s.destroy(a, ChildDisposition::Promote).unwrap();
        let changes = s.evaluate();
        assert_eq!(changes.removed, [a.index()]);
        assert!(changes.added.is_empty());
    }
}
