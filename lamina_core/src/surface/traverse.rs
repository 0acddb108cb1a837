// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Traversal utilities.

use super::id::{INVALID, SurfaceId};
use super::store::SurfaceStore;

/// An iterator over the direct children of a surface.
///
/// Created by [`SurfaceStore::children`]. Cloning yields an independent
/// iterator positioned at the same child. The walk stops after
/// [`SurfaceStore::slot_count`] steps, so a cyclic sibling list still ends.
#[derive(Clone, Debug)]
pub struct Children<'a> {
    store: &'a SurfaceStore,
    current: u32,
    remaining: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(store: &'a SurfaceStore, first: u32) -> Self {
        Self {
            store,
            current: first,
            remaining: store.len,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = SurfaceId;

    fn next(&mut self) -> Option<SurfaceId> {
        if self.current == INVALID || self.current >= self.store.len || self.remaining == 0 {
            return None;
        }
        let idx = self.current;
        self.remaining -= 1;
        self.current = self.store.next_sibling[idx as usize];
        Some(self.store.id_at(idx))
    }
}

/// An iterator over the z-stack.
///
/// Created by [`SurfaceStore::z_order`] (top to bottom) and
/// [`SurfaceStore::z_order_rev`] (bottom to top). The walk stops after
/// [`SurfaceStore::len`] steps, so it terminates even on a corrupted stack.
#[derive(Clone, Debug)]
pub struct ZOrder<'a> {
    store: &'a SurfaceStore,
    current: u32,
    remaining: usize,
    downward: bool,
}

impl<'a> ZOrder<'a> {
    pub(crate) fn top_down(store: &'a SurfaceStore) -> Self {
        Self {
            store,
            current: store.top,
            remaining: store.len(),
            downward: true,
        }
    }

    pub(crate) fn bottom_up(store: &'a SurfaceStore) -> Self {
        Self {
            store,
            current: store.bottom,
            remaining: store.len(),
            downward: false,
        }
    }

    /// Returns the raw slot index of the next surface, advancing past it.
    pub fn next_index(&mut self) -> Option<u32> {
        if self.current == INVALID || self.current >= self.store.len || self.remaining == 0 {
            return None;
        }
        let idx = self.current;
        self.remaining -= 1;
        self.current = if self.downward {
            self.store.below[idx as usize]
        } else {
            self.store.above[idx as usize]
        };
        Some(idx)
    }
}

impl Iterator for ZOrder<'_> {
    type Item = SurfaceId;

    fn next(&mut self) -> Option<SurfaceId> {
        self.next_index().map(|idx| self.store.id_at(idx))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}
