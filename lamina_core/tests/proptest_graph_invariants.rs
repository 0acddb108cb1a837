// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property-based invariant tests for the surface graph.
//!
//! Random operation sequences (create, destroy, bind, unbind, reparent,
//! restack, move, resize, write) are applied to a store. After every step:
//!
//! 1. `validate` reports nothing, whether the operation succeeded or not.
//! 2. The z-stack walked top-down is the bottom-up walk reversed, visits
//!    every live surface exactly once, and ends at the root-owning anchors.
//! 3. Absolute positions match the sum of stored origins up the chain.
//!
//! Separately, binding a surface under its own descendant is refused and
//! leaves the graph exactly as it was.

use std::collections::HashSet;

use lamina_core::{
    ChildDisposition, GraphError, Placement, Point, SceneConfig, SurfaceId, SurfaceOptions,
    SurfaceStore, validate,
};
use proptest::prelude::*;

// ── Operations ──────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
enum Op {
    Create {
        parent: Option<usize>,
        placement: u8,
        target: usize,
        y: i8,
        x: i8,
    },
    Destroy(usize, bool),
    Bind(usize, usize),
    Unbind(usize),
    Reparent(usize, usize),
    Raise(usize),
    Lower(usize),
    MoveAbove(usize, usize),
    MoveBelow(usize, usize),
    MoveTo(usize, i8, i8),
    Resize(usize, u8, u8),
    Write(usize, u8, u8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let pick = any::<usize>();
    prop_oneof![
        3 => (proptest::option::of(pick), 0u8..4, pick, any::<i8>(), any::<i8>()).prop_map(
            |(parent, placement, target, y, x)| Op::Create { parent, placement, target, y, x }
        ),
        1 => (pick, any::<bool>()).prop_map(|(i, c)| Op::Destroy(i, c)),
        2 => (pick, pick).prop_map(|(a, b)| Op::Bind(a, b)),
        1 => pick.prop_map(Op::Unbind),
        2 => (pick, pick).prop_map(|(a, b)| Op::Reparent(a, b)),
        1 => pick.prop_map(Op::Raise),
        1 => pick.prop_map(Op::Lower),
        1 => (pick, pick).prop_map(|(a, b)| Op::MoveAbove(a, b)),
        1 => (pick, pick).prop_map(|(a, b)| Op::MoveBelow(a, b)),
        1 => (pick, any::<i8>(), any::<i8>()).prop_map(|(i, y, x)| Op::MoveTo(i, y, x)),
        1 => (pick, 0u8..6, 0u8..6).prop_map(|(i, r, c)| Op::Resize(i, r, c)),
        1 => (pick, 0u8..4, 0u8..4).prop_map(|(i, y, x)| Op::Write(i, y, x)),
    ]
}

/// Handles ever issued, including stale ones, so stale-handle paths are
/// exercised too.
struct Harness {
    store: SurfaceStore,
    handles: Vec<SurfaceId>,
}

impl Harness {
    fn new() -> Self {
        let store = SurfaceStore::new(SceneConfig::new(16, 32)).unwrap();
        let handles = vec![store.root()];
        Self { store, handles }
    }

    fn apply(&mut self, op: &Op) {
        if let Some(id) = self.step(op) {
            self.handles.push(id);
        }
    }

    fn step(&mut self, op: &Op) -> Option<SurfaceId> {
        let s = &mut self.store;
        let handles = &self.handles;
        let h = |i: usize| handles[i % handles.len()];
        match *op {
            Op::Create { parent, placement, target, y, x } => {
                let mut options = SurfaceOptions::new(2, 3).at(y.into(), x.into());
                if let Some(p) = parent {
                    options = options.bound_to(h(p));
                }
                let placement = match placement {
                    0 => Placement::Top,
                    1 => Placement::Bottom,
                    2 => Placement::Above(h(target)),
                    _ => Placement::Below(h(target)),
                };
                return s.create(options.placement(placement)).ok();
            }
            Op::Destroy(i, cascade) => {
                let disposition = if cascade {
                    ChildDisposition::Cascade
                } else {
                    ChildDisposition::Promote
                };
                let _ = s.destroy(h(i), disposition);
            }
            Op::Bind(a, b) => {
                let _ = s.bind(h(a), h(b));
            }
            Op::Unbind(a) => {
                let _ = s.unbind(h(a));
            }
            Op::Reparent(a, b) => {
                let _ = s.reparent(h(a), h(b));
            }
            Op::Raise(a) => {
                let _ = s.raise_to_top(h(a));
            }
            Op::Lower(a) => {
                let _ = s.lower_to_bottom(h(a));
            }
            Op::MoveAbove(a, b) => {
                let _ = s.move_above(h(a), h(b));
            }
            Op::MoveBelow(a, b) => {
                let _ = s.move_below(h(a), h(b));
            }
            Op::MoveTo(a, y, x) => {
                let _ = s.move_to(h(a), y.into(), x.into());
            }
            Op::Resize(a, r, c) => {
                let _ = s.resize(h(a), r.into(), c.into());
            }
            Op::Write(a, y, x) => {
                let _ = s.put_str(h(a), y.into(), x.into(), "ab");
            }
        }
        None
    }
}

fn live_handles(store: &SurfaceStore) -> HashSet<SurfaceId> {
    (0..store.slot_count())
        .filter(|&i| store.is_live_at(i))
        .map(|i| store.id_at(i))
        .collect()
}

fn summed_origin(store: &SurfaceStore, id: SurfaceId) -> Point {
    let mut p = store.origin(id).unwrap();
    let mut cur = store.parent(id).unwrap();
    while let Some(parent) = cur {
        p = p + store.origin(parent).unwrap();
        cur = store.parent(parent).unwrap();
    }
    p
}

// ═════════════════════════════════════════════════════════════════════════
// 1–3. Structural invariants hold after every operation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn random_operations_keep_graph_consistent(ops in proptest::collection::vec(op_strategy(), 1..60)) {
        let mut harness = Harness::new();
        for op in &ops {
            harness.apply(op);
            let s = &harness.store;

            let violations = validate(s);
            prop_assert!(violations.is_empty(), "after {:?}: {:?}", op, violations);

            let forward: Vec<_> = s.z_order().collect();
            let mut backward: Vec<_> = s.z_order_rev().collect();
            backward.reverse();
            prop_assert_eq!(&forward, &backward);
            prop_assert_eq!(forward.len(), s.len());
            prop_assert_eq!(forward.iter().copied().collect::<HashSet<_>>(), live_handles(s));
            prop_assert_eq!(forward.last().copied(), Some(s.bottom()));
            prop_assert!(s.is_alive(s.root()));
            prop_assert_eq!(s.parent(s.root()).unwrap(), None);

            for &id in &forward {
                prop_assert_eq!(s.absolute(id).unwrap(), summed_origin(s, id));
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Cycle-forming bindings are refused without side effects
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn binding_under_a_descendant_is_refused(depth in 1usize..8, pick in any::<usize>(), via_reparent in any::<bool>()) {
        let mut harness = Harness::new();
        let mut chain = vec![harness.store.create(SurfaceOptions::new(1, 1)).unwrap()];
        for _ in 0..depth {
            let last = *chain.last().unwrap();
            chain.push(harness.store.create(SurfaceOptions::new(1, 1).at(1, 1).bound_to(last)).unwrap());
        }
        harness.handles.extend(&chain);
        let head = chain[0];
        let descendant = chain[1 + pick % depth];

        let order: Vec<_> = harness.store.z_order().collect();
        let parents: Vec<_> = chain.iter().map(|&c| harness.store.parent(c).unwrap()).collect();
        let absolute: Vec<_> = chain.iter().map(|&c| harness.store.absolute(c).unwrap()).collect();

        let result = if via_reparent {
            harness.store.reparent(head, descendant)
        } else {
            harness.store.bind(head, descendant)
        };
        let refused = matches!(result, Err(GraphError::InvalidBinding { .. }));
        prop_assert!(refused, "expected refusal, got {:?}", result);

        prop_assert!(validate(&harness.store).is_empty());
        prop_assert_eq!(harness.store.z_order().collect::<Vec<_>>(), order);
        let after: Vec<_> = chain.iter().map(|&c| harness.store.parent(c).unwrap()).collect();
        prop_assert_eq!(after, parents);
        let after: Vec<_> = chain.iter().map(|&c| harness.store.absolute(c).unwrap()).collect();
        prop_assert_eq!(after, absolute);
        prop_assert!(harness.store.is_root(harness.handles[0]));
    }
}
