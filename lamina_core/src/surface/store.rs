// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays surface storage with allocation, lifecycle, and queries.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use crate::cell::Cell;
use crate::config::SceneConfig;
use crate::dirty;
use crate::error::{GraphError, Result};
use crate::geometry::{CellRect, Cursor, Point, Size};

use super::binding::BackSlot;
use super::id::{INVALID, SurfaceId};
use super::options::{ChildDisposition, Placement, SurfaceOptions};

/// Struct-of-arrays storage for every surface of one rendering context.
///
/// Surfaces are addressed by [`SurfaceId`] handles. Internally each surface
/// occupies a slot in parallel arrays; destroyed surfaces are recycled via a
/// free list, and generation counters reject stale handles.
///
/// The store owns the two z-stack anchors and the root surface. Both live
/// exactly as long as the store.
#[derive(Debug)]
pub struct SurfaceStore {
    // -- Binding tree --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) back_slot: Vec<BackSlot>,

    // -- Z-stack --
    pub(crate) above: Vec<u32>,
    pub(crate) below: Vec<u32>,
    pub(crate) top: u32,
    pub(crate) bottom: u32,

    // -- Geometry and content --
    pub(crate) origin: Vec<Point>,
    pub(crate) size: Vec<Size>,
    pub(crate) cursor: Vec<Cursor>,
    pub(crate) cells: Vec<Vec<Cell>>,
    pub(crate) name: Vec<Option<String>>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) live: Vec<bool>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,
    pub(crate) count: u32,
    pub(crate) root: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Lifecycle tracking --
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,
    pub(crate) viewport_changed: bool,
}

impl SurfaceStore {
    /// Creates a store and its root surface.
    ///
    /// The root sits at absolute origin `(0, 0)` with the configured viewport
    /// size and is the only surface in the z-stack.
    pub fn new(config: SceneConfig) -> Result<Self> {
        check_geometry(config.size())?;
        let mut store = Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            back_slot: Vec::new(),
            above: Vec::new(),
            below: Vec::new(),
            top: INVALID,
            bottom: INVALID,
            origin: Vec::new(),
            size: Vec::new(),
            cursor: Vec::new(),
            cells: Vec::new(),
            name: Vec::new(),
            generation: Vec::new(),
            live: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            count: 0,
            root: INVALID,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
            viewport_changed: true,
        };
        let root = store.allocate(Point::ORIGIN, config.size(), Some(String::from("root")));
        store.push_top(root);
        store.root = root;
        tracing::debug!(rows = config.rows, cols = config.cols, "surface store created");
        Ok(store)
    }

    // -- Lifecycle API --

    /// Creates a surface and returns its handle.
    ///
    /// The geometry, the parent, and the placement target are all checked
    /// before anything is linked. When `options.parent` is set the origin is
    /// relative to the parent's origin.
    pub fn create(&mut self, options: SurfaceOptions) -> Result<SurfaceId> {
        check_geometry(options.size)?;
        let parent = match options.parent {
            Some(p) => Some(self.check(p)?),
            None => None,
        };
        let target = match options.placement {
            Placement::Above(t) | Placement::Below(t) => Some(self.check_in_stack(t)?),
            Placement::Top | Placement::Bottom => None,
        };

        let idx = self.allocate(options.origin, options.size, options.name);
        if let Some(p) = parent {
            self.link_child(idx, p);
        }
        match (options.placement, target) {
            (Placement::Above(_), Some(t)) => self.insert_above(idx, t),
            (Placement::Below(_), Some(t)) => self.insert_below(idx, t),
            (Placement::Bottom, _) => self.push_bottom(idx),
            _ => self.push_top(idx),
        }

        let id = self.id_at(idx);
        tracing::debug!(surface = %id, parent = ?options.parent, placement = ?options.placement, "surface created");
        Ok(id)
    }

    /// Destroys a surface, unlinking it from the binding tree and the
    /// z-stack.
    ///
    /// Children are handled according to `disposition`. Fails with
    /// [`GraphError::RootDestruction`] for the root surface; the root is
    /// released only when the store is dropped.
    pub fn destroy(&mut self, id: SurfaceId, disposition: ChildDisposition) -> Result<()> {
        let idx = self.check(id)?;
        if idx == self.root {
            return Err(GraphError::RootDestruction);
        }

        match disposition {
            ChildDisposition::Promote => {
                let grandparent = self.parent[idx as usize];
                let mut kids = self.child_indices(idx);
                // Head insertion reverses; walk backwards to keep sibling order.
                kids.reverse();
                for kid in kids {
                    let absolute = self.absolute_at(kid);
                    self.unlink_child(kid);
                    let base = if grandparent == INVALID {
                        Point::ORIGIN
                    } else {
                        self.link_child(kid, grandparent);
                        self.absolute_at(grandparent)
                    };
                    self.origin[kid as usize] = absolute - base;
                    self.dirty.mark_with(kid, dirty::POSITION, &EagerPolicy);
                }
            }
            ChildDisposition::Cascade => {
                let mut doomed = Vec::new();
                let mut stack = self.child_indices(idx);
                while let Some(next) = stack.pop() {
                    stack.extend(self.child_indices(next));
                    doomed.push(next);
                }
                // Parents precede their children in `doomed`; release leaves first.
                for &victim in doomed.iter().rev() {
                    self.release(victim);
                }
            }
        }

        self.release(idx);
        tracing::debug!(surface = %id, ?disposition, "surface destroyed");
        Ok(())
    }

    /// Returns whether the given handle refers to a live surface.
    #[must_use]
    pub fn is_alive(&self, id: SurfaceId) -> bool {
        id.idx < self.len && self.live[id.idx as usize] && self.generation[id.idx as usize] == id.generation
    }

    /// Returns the root surface.
    #[must_use]
    pub fn root(&self) -> SurfaceId {
        self.id_at(self.root)
    }

    /// Returns whether `id` is the root surface.
    #[must_use]
    pub fn is_root(&self, id: SurfaceId) -> bool {
        self.is_alive(id) && id.idx == self.root
    }

    /// Number of live surfaces, including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count as usize
    }

    /// Always `false`: the root surface exists for the store's lifetime.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    // -- Queries --

    /// Returns the stored origin: relative to the parent when bound, absolute
    /// otherwise.
    pub fn origin(&self, id: SurfaceId) -> Result<Point> {
        let idx = self.check(id)?;
        Ok(self.origin[idx as usize])
    }

    /// Resolves the absolute position by summing origins up the binding
    /// chain.
    pub fn absolute(&self, id: SurfaceId) -> Result<Point> {
        let idx = self.check(id)?;
        Ok(self.absolute_at(idx))
    }

    /// Returns the surface's geometry.
    pub fn size(&self, id: SurfaceId) -> Result<Size> {
        let idx = self.check(id)?;
        Ok(self.size[idx as usize])
    }

    /// Returns the absolute rectangle covered by the surface.
    pub fn bounds(&self, id: SurfaceId) -> Result<CellRect> {
        let idx = self.check(id)?;
        Ok(CellRect::new(self.absolute_at(idx), self.size[idx as usize]))
    }

    /// Returns the last write position.
    pub fn cursor(&self, id: SurfaceId) -> Result<Cursor> {
        let idx = self.check(id)?;
        Ok(self.cursor[idx as usize])
    }

    /// Returns the diagnostic label, if one was given.
    pub fn name(&self, id: SurfaceId) -> Result<Option<&str>> {
        let idx = self.check(id)?;
        Ok(self.name[idx as usize].as_deref())
    }

    // -- Raw-index accessors --
    //
    // These accept raw slot indices (as produced by `ZOrder`, `SceneChanges`,
    // or `SurfaceId::index`) and skip generation checks. The compositor and
    // the diagnostic dump use them to read links exactly as stored.

    /// Number of slots ever allocated. Raw indices are below this bound.
    #[must_use]
    pub fn slot_count(&self) -> u32 {
        self.len
    }

    /// Returns whether slot `idx` holds a live surface.
    #[must_use]
    pub fn is_live_at(&self, idx: u32) -> bool {
        idx < self.len && self.live[idx as usize]
    }

    /// Returns the current handle for slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.slot_count()`.
    #[must_use]
    pub fn id_at(&self, idx: u32) -> SurfaceId {
        self.assert_slot(idx);
        SurfaceId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Returns the raw index of the root surface.
    #[must_use]
    pub fn root_index(&self) -> u32 {
        self.root
    }

    /// Returns the raw index of the topmost surface.
    #[must_use]
    pub fn top_index(&self) -> u32 {
        self.top
    }

    /// Returns the raw index of the bottommost surface.
    #[must_use]
    pub fn bottom_index(&self) -> u32 {
        self.bottom
    }

    /// Returns the parent link at slot `idx`, or [`INVALID`].
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.slot_count()`.
    #[must_use]
    pub fn parent_at(&self, idx: u32) -> u32 {
        self.assert_slot(idx);
        self.parent[idx as usize]
    }

    /// Returns the first-child link at slot `idx`, or [`INVALID`].
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.slot_count()`.
    #[must_use]
    pub fn first_child_at(&self, idx: u32) -> u32 {
        self.assert_slot(idx);
        self.first_child[idx as usize]
    }

    /// Returns the next-sibling link at slot `idx`, or [`INVALID`].
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.slot_count()`.
    #[must_use]
    pub fn next_sibling_at(&self, idx: u32) -> u32 {
        self.assert_slot(idx);
        self.next_sibling[idx as usize]
    }

    /// Returns the back slot at `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.slot_count()`.
    #[must_use]
    pub fn back_slot_at(&self, idx: u32) -> BackSlot {
        self.assert_slot(idx);
        self.back_slot[idx as usize]
    }

    /// Returns the `above` link at slot `idx`, or [`INVALID`].
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.slot_count()`.
    #[must_use]
    pub fn above_at(&self, idx: u32) -> u32 {
        self.assert_slot(idx);
        self.above[idx as usize]
    }

    /// Returns the `below` link at slot `idx`, or [`INVALID`].
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.slot_count()`.
    #[must_use]
    pub fn below_at(&self, idx: u32) -> u32 {
        self.assert_slot(idx);
        self.below[idx as usize]
    }

    /// Returns the stored origin at slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.slot_count()`.
    #[must_use]
    pub fn origin_at(&self, idx: u32) -> Point {
        self.assert_slot(idx);
        self.origin[idx as usize]
    }

    /// Returns the geometry at slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.slot_count()`.
    #[must_use]
    pub fn size_at(&self, idx: u32) -> Size {
        self.assert_slot(idx);
        self.size[idx as usize]
    }

    /// Returns the cursor at slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.slot_count()`.
    #[must_use]
    pub fn cursor_at(&self, idx: u32) -> Cursor {
        self.assert_slot(idx);
        self.cursor[idx as usize]
    }

    /// Returns the row-major cell grid at slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.slot_count()`.
    #[must_use]
    pub fn cells_at(&self, idx: u32) -> &[Cell] {
        self.assert_slot(idx);
        &self.cells[idx as usize]
    }

    /// Resolves the absolute position of slot `idx` through its binding
    /// chain.
    ///
    /// The walk is bounded by the slot count, so a corrupted chain yields a
    /// wrong answer rather than a hang.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.slot_count()`.
    #[must_use]
    pub fn absolute_at(&self, idx: u32) -> Point {
        self.assert_slot(idx);
        let mut position = self.origin[idx as usize];
        let mut p = self.parent[idx as usize];
        let mut budget = self.len;
        while p != INVALID && p < self.len && budget > 0 {
            position = position + self.origin[p as usize];
            p = self.parent[p as usize];
            budget -= 1;
        }
        position
    }

    // -- Internal helpers --

    /// Resolves a handle to its slot, or reports it stale.
    pub(crate) fn check(&self, id: SurfaceId) -> Result<u32> {
        if self.is_alive(id) {
            Ok(id.idx)
        } else {
            Err(GraphError::StaleSurface(id))
        }
    }

    /// Resolves a restack or placement target. Every live surface is in the
    /// z-stack, so only a stale target can be missing from it.
    pub(crate) fn check_in_stack(&self, id: SurfaceId) -> Result<u32> {
        self.check(id).map_err(|_| GraphError::NotInStack(id))
    }

    fn assert_slot(&self, idx: u32) {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
    }

    /// Collects the direct children of `idx` in sibling order, stopping
    /// after as many steps as there are slots.
    pub(crate) fn child_indices(&self, idx: u32) -> Vec<u32> {
        let mut out = Vec::new();
        let mut child = self.first_child[idx as usize];
        while child != INVALID && child < self.len && out.len() < self.len as usize {
            out.push(child);
            child = self.next_sibling[child as usize];
        }
        out
    }

    /// Claims a slot, reusing a freed one when possible. The surface is not
    /// yet linked into either structure.
    fn allocate(&mut self, origin: Point, size: Size, name: Option<String>) -> u32 {
        let grid = vec![Cell::Transparent; size.area()];
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot. The generation was bumped on release.
            let i = idx as usize;
            self.parent[i] = INVALID;
            self.first_child[i] = INVALID;
            self.next_sibling[i] = INVALID;
            self.back_slot[i] = BackSlot::Detached;
            self.above[i] = INVALID;
            self.below[i] = INVALID;
            self.origin[i] = origin;
            self.size[i] = size;
            self.cursor[i] = Cursor::default();
            self.cells[i] = grid;
            self.name[i] = name;
            self.live[i] = true;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.back_slot.push(BackSlot::Detached);
            self.above.push(INVALID);
            self.below.push(INVALID);
            self.origin.push(origin);
            self.size.push(size);
            self.cursor.push(Cursor::default());
            self.cells.push(grid);
            self.name.push(name);
            self.generation.push(0);
            self.live.push(true);
            idx
        };

        self.count += 1;
        self.pending_added.push(idx);
        self.dirty.mark(idx, dirty::POSITION);
        idx
    }

    /// Unlinks `idx` from both structures and frees its slot.
    ///
    /// Callers must have dealt with the surface's children already.
    fn release(&mut self, idx: u32) {
        debug_assert!(
            self.first_child[idx as usize] == INVALID,
            "released surface still has children"
        );
        if self.parent[idx as usize] != INVALID {
            self.unlink_child(idx);
        }
        self.unlink_z(idx);

        // Remove dirty tracking dependencies.
        self.dirty.remove_key(idx);

        // Bump generation so old handles immediately fail validation.
        let i = idx as usize;
        self.generation[i] = self.generation[i].wrapping_add(1);
        self.live[i] = false;
        self.cells[i] = Vec::new();
        self.name[i] = None;

        self.count -= 1;
        self.free_list.push(idx);
        self.pending_removed.push(idx);
    }
}

fn check_geometry(size: Size) -> Result<()> {
    if size.is_empty() {
        Err(GraphError::InvalidGeometry {
            rows: size.rows,
            cols: size.cols,
        })
    } else {
        Ok(())
    }
}
