// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read-only consistency checking.
//!
//! [`validate`] walks the z-stack once from `top` to `bottom` and, for each
//! surface it visits, cross-checks the binding links against the stack
//! links. It never stops at the first problem: every inconsistency becomes
//! one [`Violation`], so a test can assert the complete set for a
//! deliberately corrupted graph. A correct sequence of operations never
//! produces any.
//!
//! Checks per visited surface:
//!
//! - its back slot currently holds it, and belongs to its parent's list;
//! - neither `parent` nor `next_sibling` points at itself;
//! - the surfaces its `first_child` and `next_sibling` name claim those
//!   fields as their back slots;
//! - its child list ends within as many steps as there are slots;
//! - its `above` link names the surface visited just before it.
//!
//! After the walk: the last surface visited is the stored `bottom`, the root
//! was reached and has no parent, and every live surface was reached.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use crate::surface::{BackSlot, INVALID, SurfaceId, SurfaceStore};

/// The kind of inconsistency found.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// The back slot does not currently hold the surface.
    BackSlotMismatch,
    /// The back slot lies in a different parent's list than `parent` names.
    ParentMismatch,
    /// `parent` or `next_sibling` points at the surface itself.
    SelfReference,
    /// `first_child` or `next_sibling` names a surface whose back slot is
    /// elsewhere.
    ForwardLinkMismatch,
    /// The child list does not terminate.
    SiblingCycle,
    /// `above` does not name the previously visited surface.
    AboveMismatch,
    /// The walk ended somewhere other than the stored `bottom`.
    BottomMismatch,
    /// A destroyed slot is still linked into the z-stack.
    DeadSurfaceInStack,
    /// The walk revisited a surface.
    ZStackCycle,
    /// A `below` link points outside the arena.
    DanglingLink,
    /// The root surface was not reached from `top`.
    RootMissing,
    /// The root surface has a parent.
    RootHasParent,
    /// A live surface was not reached from `top`.
    UnreachableSurface,
}

/// One detected inconsistency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Violation {
    /// What went wrong.
    pub kind: ViolationKind,
    /// The surface being checked, if the violation concerns one.
    pub surface: Option<SurfaceId>,
    /// The reference the invariant requires.
    pub expected: Option<SurfaceId>,
    /// The reference actually stored.
    pub observed: Option<SurfaceId>,
}

struct Ref(Option<SurfaceId>);

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(id) => write!(f, "{id}"),
            None => f.write_str("none"),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (s, e, o) = (Ref(self.surface), Ref(self.expected), Ref(self.observed));
        match self.kind {
            ViolationKind::BackSlotMismatch => {
                write!(f, "expected back slot of {s} to hold {e}, got {o}")
            }
            ViolationKind::ParentMismatch => {
                write!(f, "back slot of {s} is in the list of {e}, but parent is {o}")
            }
            ViolationKind::SelfReference => write!(f, "bound pointers of {s} target self"),
            ViolationKind::ForwardLinkMismatch => {
                write!(f, "{e} links to {s}, but the back slot of {s} is owned by {o}")
            }
            ViolationKind::SiblingCycle => write!(f, "child list of {s} does not terminate"),
            ViolationKind::AboveMismatch => write!(f, "expected above of {s} to be {e}, got {o}"),
            ViolationKind::BottomMismatch => write!(f, "expected bottom {e}, got {o}"),
            ViolationKind::DeadSurfaceInStack => {
                write!(f, "destroyed surface {s} is linked into the z-stack")
            }
            ViolationKind::ZStackCycle => write!(f, "z-stack revisits {s} after {o}"),
            ViolationKind::DanglingLink => write!(f, "below link of {s} leaves the arena"),
            ViolationKind::RootMissing => write!(f, "root surface {s} is not reachable from top"),
            ViolationKind::RootHasParent => write!(f, "root surface {s} is bound to {o}"),
            ViolationKind::UnreachableSurface => {
                write!(f, "live surface {s} is not reachable from top")
            }
        }
    }
}

/// Checks the store's structural invariants and returns every violation.
///
/// Never mutates the store. The walk is bounded by the slot count, so it
/// terminates on cyclic or dangling links.
#[must_use]
pub fn validate(store: &SurfaceStore) -> Vec<Violation> {
    let slots = store.slot_count();
    let id = |idx: u32| (idx != INVALID && idx < slots).then(|| store.id_at(idx));

    let mut out = Vec::new();
    let mut seen = vec![false; slots as usize];
    let mut prev = INVALID;
    let mut cur = store.top_index();
    let mut walk_complete = true;

    while cur != INVALID {
        if cur >= slots {
            out.push(Violation {
                kind: ViolationKind::DanglingLink,
                surface: id(prev),
                expected: None,
                observed: None,
            });
            walk_complete = false;
            break;
        }
        if seen[cur as usize] {
            out.push(Violation {
                kind: ViolationKind::ZStackCycle,
                surface: id(cur),
                expected: None,
                observed: id(prev),
            });
            walk_complete = false;
            break;
        }
        seen[cur as usize] = true;
        check_surface(store, cur, prev, &mut out);
        prev = cur;
        cur = store.below_at(cur);
    }

    if walk_complete && store.bottom_index() != prev {
        out.push(Violation {
            kind: ViolationKind::BottomMismatch,
            surface: None,
            expected: id(prev),
            observed: id(store.bottom_index()),
        });
    }

    let root = store.root_index();
    if !store.is_live_at(root) || !seen[root as usize] {
        out.push(Violation {
            kind: ViolationKind::RootMissing,
            surface: id(root),
            expected: None,
            observed: None,
        });
    } else if store.parent_at(root) != INVALID {
        out.push(Violation {
            kind: ViolationKind::RootHasParent,
            surface: id(root),
            expected: None,
            observed: id(store.parent_at(root)),
        });
    }

    for idx in 0..slots {
        if store.is_live_at(idx) && !seen[idx as usize] && idx != root {
            out.push(Violation {
                kind: ViolationKind::UnreachableSurface,
                surface: id(idx),
                expected: None,
                observed: None,
            });
        }
    }

    if !out.is_empty() {
        tracing::warn!(violations = out.len(), "surface graph is inconsistent");
    }
    out
}

fn check_surface(store: &SurfaceStore, idx: u32, prev: u32, out: &mut Vec<Violation>) {
    let slots = store.slot_count();
    let id = |i: u32| (i != INVALID && i < slots).then(|| store.id_at(i));
    let me = Some(store.id_at(idx));

    if !store.is_live_at(idx) {
        out.push(Violation {
            kind: ViolationKind::DeadSurfaceInStack,
            surface: me,
            expected: None,
            observed: None,
        });
    }

    let parent = store.parent_at(idx);
    let next = store.next_sibling_at(idx);
    if parent == idx || next == idx {
        out.push(Violation {
            kind: ViolationKind::SelfReference,
            surface: me,
            expected: None,
            observed: me,
        });
    }

    let slot = store.back_slot_at(idx);
    if parent != INVALID || slot != BackSlot::Detached {
        let held = store.slot_target(slot);
        if held != idx {
            out.push(Violation {
                kind: ViolationKind::BackSlotMismatch,
                surface: me,
                expected: me,
                observed: id(held),
            });
        }
        let owner = match slot {
            BackSlot::Detached => INVALID,
            BackSlot::FirstChild(p) => p,
            BackSlot::NextSibling(s) if s < slots => store.parent_at(s),
            BackSlot::NextSibling(_) => INVALID,
        };
        if owner != parent {
            out.push(Violation {
                kind: ViolationKind::ParentMismatch,
                surface: me,
                expected: id(owner),
                observed: id(parent),
            });
        }
    }

    check_forward(store, idx, store.first_child_at(idx), BackSlot::FirstChild(idx), out);
    if next != idx {
        check_forward(store, idx, next, BackSlot::NextSibling(idx), out);
    }

    let mut steps = 0_u32;
    let mut child = store.first_child_at(idx);
    while child != INVALID && child < slots {
        if steps == slots {
            out.push(Violation {
                kind: ViolationKind::SiblingCycle,
                surface: me,
                expected: None,
                observed: None,
            });
            break;
        }
        steps += 1;
        child = store.next_sibling_at(child);
    }

    let above = store.above_at(idx);
    if above != prev {
        out.push(Violation {
            kind: ViolationKind::AboveMismatch,
            surface: me,
            expected: id(prev),
            observed: id(above),
        });
    }
}

/// Checks that `target`, reached through one of `idx`'s forward links,
/// names that same link as its back slot.
fn check_forward(
    store: &SurfaceStore,
    idx: u32,
    target: u32,
    expected: BackSlot,
    out: &mut Vec<Violation>,
) {
    if target == INVALID {
        return;
    }
    let slots = store.slot_count();
    let id = |i: u32| (i != INVALID && i < slots).then(|| store.id_at(i));
    let actual = if target < slots {
        store.back_slot_at(target)
    } else {
        BackSlot::Detached
    };
    if actual != expected {
        let owner = match actual {
            BackSlot::Detached => INVALID,
            BackSlot::FirstChild(i) | BackSlot::NextSibling(i) => i,
        };
        out.push(Violation {
            kind: ViolationKind::ForwardLinkMismatch,
            surface: id(target),
            expected: id(idx),
            observed: id(owner),
        });
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;
    use crate::config::SceneConfig;
    use crate::surface::{Anchor, ChildDisposition, Link, SurfaceOptions};

    fn store() -> SurfaceStore {
        SurfaceStore::new(SceneConfig::new(24, 80)).unwrap()
    }

    fn kinds(violations: &[Violation]) -> Vec<ViolationKind> {
        violations.iter().map(|v| v.kind).collect()
    }

    #[test]
    fn healthy_graph_has_no_violations() {
        let mut s = store();
        let root = s.root();
        let p = s.create(SurfaceOptions::new(5, 5).bound_to(root)).unwrap();
        let _ = s.create(SurfaceOptions::new(2, 2).bound_to(p)).unwrap();
        let q = s.create(SurfaceOptions::new(2, 2)).unwrap();
        s.lower_to_bottom(q).unwrap();
        assert!(validate(&s).is_empty());
    }

    #[test]
    fn back_slot_mismatch_is_reported() {
        let mut s = store();
        let p = s.create(SurfaceOptions::new(5, 5)).unwrap();
        let a = s.create(SurfaceOptions::new(1, 1).bound_to(p)).unwrap();
        let b = s.create(SurfaceOptions::new(1, 1).bound_to(p)).unwrap();
        // b is first; point a's back slot at p's first-child field too.
        s.corrupt_back_slot(a, BackSlot::FirstChild(p.index()));

        // b still links to a, so both sides of the desync are reported.
        let v = validate(&s);
        assert_eq!(
            v,
            [
                Violation {
                    kind: ViolationKind::ForwardLinkMismatch,
                    surface: Some(a),
                    expected: Some(b),
                    observed: Some(p),
                },
                Violation {
                    kind: ViolationKind::BackSlotMismatch,
                    surface: Some(a),
                    expected: Some(a),
                    observed: Some(b),
                },
            ]
        );
    }

    #[test]
    fn forward_link_to_unbound_surface_is_reported() {
        let mut s = store();
        let p = s.create(SurfaceOptions::new(5, 5)).unwrap();
        let x = s.create(SurfaceOptions::new(1, 1)).unwrap();
        s.corrupt_link(p, Link::FirstChild, Some(x));

        assert_eq!(s.children(p).unwrap().collect::<Vec<_>>(), [x]);
        assert_eq!(s.parent(x).unwrap(), None);
        assert_eq!(
            validate(&s),
            [Violation {
                kind: ViolationKind::ForwardLinkMismatch,
                surface: Some(x),
                expected: Some(p),
                observed: None,
            }]
        );
    }

    #[test]
    fn sibling_cycle_is_reported() {
        let mut s = store();
        let p = s.create(SurfaceOptions::new(5, 5)).unwrap();
        let a = s.create(SurfaceOptions::new(1, 1).bound_to(p)).unwrap();
        let b = s.create(SurfaceOptions::new(1, 1).bound_to(p)).unwrap();
        // List is b, a; close it back onto b.
        s.corrupt_link(a, Link::NextSibling, Some(b));

        assert_eq!(
            validate(&s),
            [
                Violation {
                    kind: ViolationKind::ForwardLinkMismatch,
                    surface: Some(b),
                    expected: Some(a),
                    observed: Some(p),
                },
                Violation {
                    kind: ViolationKind::SiblingCycle,
                    surface: Some(p),
                    expected: None,
                    observed: None,
                },
            ]
        );
    }

    #[test]
    fn self_reference_is_reported() {
        let mut s = store();
        let a = s.create(SurfaceOptions::new(1, 1)).unwrap();
        s.corrupt_link(a, Link::NextSibling, Some(a));
        assert_eq!(kinds(&validate(&s)), [ViolationKind::SelfReference]);
    }

    #[test]
    fn asymmetric_stack_reports_above_and_bottom() {
        let mut s = store();
        let root = s.root();
        let a = s.create(SurfaceOptions::new(1, 1)).unwrap();
        let b = s.create(SurfaceOptions::new(1, 1)).unwrap();
        // Stack is b, a, root. Break a's above link and the bottom anchor.
        s.corrupt_link(a, Link::Above, Some(root));
        s.corrupt_anchor(Anchor::Bottom, Some(a));

        let v = validate(&s);
        assert_eq!(
            v,
            [
                Violation {
                    kind: ViolationKind::AboveMismatch,
                    surface: Some(a),
                    expected: Some(b),
                    observed: Some(root),
                },
                Violation {
                    kind: ViolationKind::BottomMismatch,
                    surface: None,
                    expected: Some(root),
                    observed: Some(a),
                },
            ]
        );
    }

    #[test]
    fn every_violation_is_reported_in_one_pass() {
        let mut s = store();
        let root = s.root();
        let p = s.create(SurfaceOptions::new(5, 5).bound_to(root)).unwrap();
        let c = s.create(SurfaceOptions::new(1, 1).bound_to(p)).unwrap();
        s.corrupt_link(c, Link::Parent, Some(c));
        s.corrupt_link(p, Link::Above, None);
        s.corrupt_link(root, Link::Parent, Some(p));

        let found = kinds(&validate(&s));
        assert!(found.contains(&ViolationKind::SelfReference));
        assert!(found.contains(&ViolationKind::ParentMismatch));
        assert!(found.contains(&ViolationKind::AboveMismatch));
        assert!(found.contains(&ViolationKind::RootHasParent));
        assert!(found.contains(&ViolationKind::BackSlotMismatch));
    }

    #[test]
    fn cycle_terminates_the_walk() {
        let mut s = store();
        let a = s.create(SurfaceOptions::new(1, 1)).unwrap();
        let b = s.create(SurfaceOptions::new(1, 1)).unwrap();
        // Stack is b, a, root; send a back up to b.
        s.corrupt_link(a, Link::Below, Some(b));
        let found = kinds(&validate(&s));
        assert_eq!(
            found,
            [
                ViolationKind::ZStackCycle,
                ViolationKind::RootMissing,
            ]
        );
    }

    #[test]
    fn unlinked_surfaces_are_unreachable() {
        let mut s = store();
        let root = s.root();
        let a = s.create(SurfaceOptions::new(1, 1)).unwrap();
        let b = s.create(SurfaceOptions::new(1, 1)).unwrap();
        // Skip a entirely: b -> root.
        s.corrupt_link(b, Link::Below, Some(root));
        s.corrupt_link(root, Link::Above, Some(b));
        let v = validate(&s);
        assert_eq!(
            v,
            [Violation {
                kind: ViolationKind::UnreachableSurface,
                surface: Some(a),
                expected: None,
                observed: None,
            }]
        );
    }

    #[test]
    fn violations_render_as_warnings() {
        let mut s = store();
        let a = s.create(SurfaceOptions::new(1, 1)).unwrap();
        s.corrupt_link(a, Link::Parent, Some(a));
        let text = validate(&s)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        assert!(text.iter().any(|t| t.contains("target self")), "got: {text:?}");
    }

    #[test]
    fn validate_never_mutates() {
        let mut s = store();
        let a = s.create(SurfaceOptions::new(1, 1)).unwrap();
        s.destroy(a, ChildDisposition::Promote).unwrap();
        let before: Vec<_> = s.z_order().collect();
        let _ = validate(&s);
        assert_eq!(s.z_order().collect::<Vec<_>>(), before);
    }
}
