// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Painter's-algorithm compositing of a surface store into a [`Frame`].
//!
//! The z-stack is walked top to bottom. Each cell of the frame takes the
//! first opaque glyph any surface offers there; surfaces further down only
//! show through cells that everything above left transparent. The viewport
//! is the root surface's absolute rectangle, and anything outside it is
//! clipped.
//!
//! Absolute positions are resolved once per pass: each binding chain is
//! walked until it meets an already-resolved ancestor, so the whole pass is
//! linear in surfaces plus covered cells.

use alloc::vec;
use alloc::vec::Vec;

use lamina_core::surface::INVALID;
use lamina_core::{CellRect, Point, SceneChanges, SurfaceStore};

use crate::damage::DamageRegion;
use crate::frame::Frame;

/// Composites every surface in `store` into a new frame with full damage.
#[must_use]
pub fn render(store: &SurfaceStore) -> Frame {
    let mut positions = Positions::default();
    let mut bounds = Vec::new();
    compose(store, &mut positions, &mut bounds)
}

/// Compositing state kept between passes, used to compute damage.
///
/// Pair each [`render`](Self::render) with the [`SceneChanges`] returned by
/// [`SurfaceStore::evaluate`] since the previous pass:
///
/// ```
/// use lamina_core::{Cell, SceneConfig, SurfaceOptions, SurfaceStore};
/// use lamina_render::Compositor;
///
/// let mut store = SurfaceStore::new(SceneConfig::new(4, 8)).unwrap();
/// let mut compositor = Compositor::new();
/// let changes = store.evaluate();
/// let first = compositor.render(&store, &changes);
/// assert!(first.damage.is_full());
///
/// let s = store.create(SurfaceOptions::new(1, 2).at(1, 1)).unwrap();
/// store.put(s, 0, 0, Cell::Glyph('x')).unwrap();
/// let changes = store.evaluate();
/// let frame = compositor.render(&store, &changes);
/// assert!(frame.damage.contains(1, 1));
/// assert!(!frame.damage.contains(3, 7));
/// ```
#[derive(Debug, Default)]
pub struct Compositor {
    positions: Positions,
    /// Absolute bounds of each slot as of the previous pass.
    previous: Vec<Option<CellRect>>,
    current: Vec<Option<CellRect>>,
    viewport: Option<CellRect>,
}

impl Compositor {
    /// Creates a compositor whose first pass reports full damage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets the previous pass, so the next one reports full damage.
    pub fn reset(&mut self) {
        self.previous.clear();
        self.viewport = None;
    }

    /// Composites `store` and computes damage relative to the previous pass.
    ///
    /// Damage covers the old and new bounds of every surface named in
    /// `changes`. It is [`DamageRegion::Full`] on the first pass and whenever
    /// the viewport moved or was resized.
    pub fn render(&mut self, store: &SurfaceStore, changes: &SceneChanges) -> Frame {
        let mut frame = compose(store, &mut self.positions, &mut self.current);
        let viewport = viewport(store);

        let full = changes.viewport_changed || self.viewport != Some(viewport);
        frame.damage = if full {
            DamageRegion::Full
        } else {
            let mut damage = DamageRegion::None;
            let mut seen = vec![false; self.current.len().max(self.previous.len())];
            for idx in changes.touched() {
                let i = idx as usize;
                if i >= seen.len() || seen[i] {
                    continue;
                }
                seen[i] = true;
                for rect in [self.previous.get(i), self.current.get(i)] {
                    if let Some(Some(rect)) = rect {
                        if let Some(r) = to_frame(rect, &viewport) {
                            damage.push(r);
                        }
                    }
                }
            }
            damage
        };

        let damaged = match &frame.damage {
            DamageRegion::Rects(rects) => rects.len(),
            _ => 0,
        };
        tracing::debug!(full, damaged, "frame composited");

        core::mem::swap(&mut self.previous, &mut self.current);
        self.viewport = Some(viewport);
        frame
    }
}

fn viewport(store: &SurfaceStore) -> CellRect {
    let root = store.root_index();
    CellRect::new(store.absolute_at(root), store.size_at(root))
}

/// Clips an absolute rectangle to the viewport and converts it to frame
/// coordinates.
fn to_frame(rect: &CellRect, viewport: &CellRect) -> Option<CellRect> {
    rect.intersection(viewport)
        .map(|r| CellRect::new(r.origin - viewport.origin, r.size))
}

/// Runs one pass, recording each live slot's absolute bounds in `bounds`.
fn compose(
    store: &SurfaceStore,
    positions: &mut Positions,
    bounds: &mut Vec<Option<CellRect>>,
) -> Frame {
    let _span = tracing::debug_span!("compose", surfaces = store.len()).entered();

    let viewport = viewport(store);
    let mut frame = Frame::new(viewport.size);
    positions.reset(store.slot_count());
    bounds.clear();
    bounds.resize(store.slot_count() as usize, None);

    let mut order = store.z_order();
    while let Some(idx) = order.next_index() {
        let origin = positions.resolve(store, idx);
        let size = store.size_at(idx);
        let rect = CellRect::new(origin, size);
        bounds[idx as usize] = Some(rect);

        let Some(clip) = rect.intersection(&viewport) else {
            continue;
        };
        let cells = store.cells_at(idx);
        let cols = size.cols as usize;
        let (src_y, src_x) = (offset(clip.origin.y, origin.y), offset(clip.origin.x, origin.x));
        let (dst_y, dst_x) = (
            offset(clip.origin.y, viewport.origin.y),
            offset(clip.origin.x, viewport.origin.x),
        );
        for dy in 0..clip.size.rows {
            let row = (src_y + dy) as usize * cols;
            for dx in 0..clip.size.cols {
                let src = cells[row + (src_x + dx) as usize];
                if !src.is_opaque() {
                    continue;
                }
                let dst = frame.cell_mut(dst_y + dy, dst_x + dx);
                if !dst.is_opaque() {
                    *dst = src;
                }
            }
        }
    }
    frame
}

/// Distance from `from` to `to` along one axis. A clipped rectangle never
/// starts before either rectangle it was clipped from.
fn offset(to: i32, from: i32) -> u32 {
    u32::try_from(i64::from(to) - i64::from(from)).unwrap_or(0)
}

/// Per-pass memo of resolved absolute positions.
#[derive(Debug, Default)]
struct Positions {
    memo: Vec<Option<Point>>,
    chain: Vec<u32>,
}

impl Positions {
    fn reset(&mut self, slots: u32) {
        self.memo.clear();
        self.memo.resize(slots as usize, None);
    }

    /// Resolves `idx` and every unresolved ancestor on its chain.
    fn resolve(&mut self, store: &SurfaceStore, idx: u32) -> Point {
        let slots = store.slot_count();
        self.chain.clear();
        let mut base = Point::ORIGIN;
        let mut cur = idx;
        while cur != INVALID && cur < slots && self.chain.len() <= slots as usize {
            if let Some(p) = self.memo[cur as usize] {
                base = p;
                break;
            }
            self.chain.push(cur);
            cur = store.parent_at(cur);
        }
        for &i in self.chain.iter().rev() {
            base = base + store.origin_at(i);
            self.memo[i as usize] = Some(base);
        }
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lamina_core::{Cell, ChildDisposition, SceneConfig, Size, SurfaceId, SurfaceOptions};

    fn glyph(frame: &Frame, y: u32, x: u32) -> Option<char> {
        frame.get(y, x).and_then(Cell::glyph)
    }

    fn filled(store: &mut SurfaceStore, options: SurfaceOptions, ch: char) -> SurfaceId {
        let id = store.create(options).unwrap();
        store.fill(id, Cell::Glyph(ch)).unwrap();
        id
    }

    #[test]
    fn upper_surface_occludes_lower_until_restacked() {
        let mut s = SurfaceStore::new(SceneConfig::new(10, 20)).unwrap();
        let b = filled(&mut s, SurfaceOptions::new(4, 4).at(1, 1), 'B');
        let _a = filled(&mut s, SurfaceOptions::new(4, 4).at(2, 2), 'A');

        let frame = render(&s);
        assert_eq!(glyph(&frame, 2, 3), Some('A'));
        assert_eq!(glyph(&frame, 1, 1), Some('B'));

        s.raise_to_top(b).unwrap();
        let frame = render(&s);
        assert_eq!(glyph(&frame, 2, 3), Some('B'));
        assert_eq!(glyph(&frame, 5, 5), Some('A'));
    }

    #[test]
    fn root_only_frame_equals_root_content() {
        let mut s = SurfaceStore::new(SceneConfig::new(2, 4)).unwrap();
        let root = s.root();
        s.put_str(root, 0, 0, "ab").unwrap();
        s.put_str(root, 1, 1, "xyz").unwrap();
        let frame = render(&s);
        assert_eq!(frame.size(), Size::new(2, 4));
        assert_eq!(frame.to_text(), "ab  \n xyz");
    }

    #[test]
    fn transparent_cells_show_through() {
        let mut s = SurfaceStore::new(SceneConfig::new(3, 3)).unwrap();
        let _under = filled(&mut s, SurfaceOptions::new(3, 3), '.');
        let over = s.create(SurfaceOptions::new(3, 3)).unwrap();
        s.put(over, 1, 1, Cell::Glyph('o')).unwrap();
        assert_eq!(render(&s).to_text(), "...\n.o.\n...");
    }

    #[test]
    fn surfaces_are_clipped_to_the_viewport() {
        let mut s = SurfaceStore::new(SceneConfig::new(3, 3)).unwrap();
        let _corner = filled(&mut s, SurfaceOptions::new(2, 2).at(-1, -1), '#');
        let _edge = filled(&mut s, SurfaceOptions::new(5, 5).at(2, 2), '+');
        let _gone = filled(&mut s, SurfaceOptions::new(1, 1).at(10, 10), '!');
        assert_eq!(render(&s).to_text(), "#  \n   \n  +");
    }

    #[test]
    fn bound_surfaces_render_at_resolved_position() {
        let mut s = SurfaceStore::new(SceneConfig::new(24, 80)).unwrap();
        let root = s.root();
        let p = s
            .create(SurfaceOptions::new(5, 10).at(2, 2).bound_to(root))
            .unwrap();
        let c = filled(&mut s, SurfaceOptions::new(3, 3).at(1, 1).bound_to(p), 'c');
        assert_eq!(glyph(&render(&s), 3, 3), Some('c'));

        s.destroy(p, ChildDisposition::Promote).unwrap();
        assert_eq!(s.absolute(c).unwrap(), Point::new(3, 3));
        assert_eq!(glyph(&render(&s), 3, 3), Some('c'));
    }

    #[test]
    fn viewport_follows_root_position() {
        let mut s = SurfaceStore::new(SceneConfig::new(2, 2)).unwrap();
        let _dot = filled(&mut s, SurfaceOptions::new(1, 1).at(5, 5), '*');
        let root = s.root();
        s.move_to(root, 4, 4).unwrap();
        assert_eq!(render(&s).to_text(), "  \n *");
    }

    #[test]
    fn damage_tracks_changed_surfaces() {
        let mut s = SurfaceStore::new(SceneConfig::new(10, 10)).unwrap();
        let a = filled(&mut s, SurfaceOptions::new(2, 2).at(1, 1), 'a');
        let mut compositor = Compositor::new();

        let changes = s.evaluate();
        let frame = compositor.render(&s, &changes);
        assert!(frame.damage.is_full());

        let changes = s.evaluate();
        let frame = compositor.render(&s, &changes);
        assert!(frame.damage.is_empty());

        s.move_to(a, 5, 5).unwrap();
        let changes = s.evaluate();
        let frame = compositor.render(&s, &changes);
        let old = CellRect::new(Point::new(1, 1), Size::new(2, 2));
        let new = CellRect::new(Point::new(5, 5), Size::new(2, 2));
        assert_eq!(frame.damage, DamageRegion::Rects(vec![old, new]));

        s.destroy(a, ChildDisposition::Promote).unwrap();
        let changes = s.evaluate();
        let frame = compositor.render(&s, &changes);
        assert_eq!(frame.damage, DamageRegion::Rects(vec![new]));
        assert_eq!(glyph(&frame, 5, 5), None);
    }

    #[test]
    fn viewport_change_forces_full_damage() {
        let mut s = SurfaceStore::new(SceneConfig::new(10, 10)).unwrap();
        let mut compositor = Compositor::new();
        let changes = s.evaluate();
        let _ = compositor.render(&s, &changes);

        s.resize_viewport(5, 5).unwrap();
        let changes = s.evaluate();
        let frame = compositor.render(&s, &changes);
        assert!(frame.damage.is_full());
        assert_eq!(frame.size(), Size::new(5, 5));

        compositor.reset();
        let changes = s.evaluate();
        let frame = compositor.render(&s, &changes);
        assert!(frame.damage.is_full());
    }
}
