// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hooks that overwrite raw links, bypassing every check.
//!
//! These exist so tests can build deliberately inconsistent graphs and assert
//! what [`validate`](crate::validate::validate) reports. They are compiled
//! only for this crate's tests and under the `test-util` feature.

use super::binding::BackSlot;
use super::id::{INVALID, SurfaceId};
use super::store::SurfaceStore;

/// A per-surface link field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Link {
    /// The binding parent.
    Parent,
    /// Head of the children list.
    FirstChild,
    /// Next sibling in the parent's list.
    NextSibling,
    /// Z-stack neighbor toward the top.
    Above,
    /// Z-stack neighbor toward the bottom.
    Below,
}

/// One of the store's z-stack anchors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// The topmost surface.
    Top,
    /// The bottommost surface.
    Bottom,
}

impl SurfaceStore {
    /// Overwrites one link of `id` with `target` (or "none").
    #[doc(hidden)]
    pub fn corrupt_link(&mut self, id: SurfaceId, link: Link, target: Option<SurfaceId>) {
        let value = target.map_or(INVALID, SurfaceId::index);
        let i = id.index() as usize;
        match link {
            Link::Parent => self.parent[i] = value,
            Link::FirstChild => self.first_child[i] = value,
            Link::NextSibling => self.next_sibling[i] = value,
            Link::Above => self.above[i] = value,
            Link::Below => self.below[i] = value,
        }
    }

    /// Overwrites the back slot of `id`.
    #[doc(hidden)]
    pub fn corrupt_back_slot(&mut self, id: SurfaceId, slot: BackSlot) {
        self.back_slot[id.index() as usize] = slot;
    }

    /// Overwrites a z-stack anchor.
    #[doc(hidden)]
    pub fn corrupt_anchor(&mut self, anchor: Anchor, target: Option<SurfaceId>) {
        let value = target.map_or(INVALID, SurfaceId::index);
        match anchor {
            Anchor::Top => self.top = value,
            Anchor::Bottom => self.bottom = value,
        }
    }
}
