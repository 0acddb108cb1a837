// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Surface graph data model.
//!
//! A *surface* is a positioned, sized grid of cells. Each surface has:
//!
//! - An identity ([`SurfaceId`]): a generational handle that becomes stale
//!   when the surface is destroyed. Stale handles are rejected with
//!   [`GraphError::StaleSurface`](crate::GraphError::StaleSurface).
//! - A **binding**: an optional parent, a `next_sibling` link, and a
//!   [`BackSlot`] naming the one link field that currently points at it.
//!   Children are inserted at the head of their parent's list, and the back
//!   slot lets any child be unlinked in O(1) without a previous-sibling link.
//! - A **z-stack position**: `above`/`below` links in the single paint order
//!   shared by every surface. The store owns the `top` and `bottom` anchors.
//! - Geometry: a stored origin (relative to the parent when bound, absolute
//!   otherwise), a size, and a cursor.
//! - Content: a row-major grid of [`Cell`](crate::Cell)s.
//!
//! Exactly one surface is the *root*: it is created with the store, sized to
//! the viewport, and never destroyed or bound.
//!
//! # Offsets across rebinding
//!
//! [`bind`](SurfaceStore::bind), [`unbind`](SurfaceStore::unbind),
//! [`reparent`](SurfaceStore::reparent), and child promotion during
//! [`destroy`](SurfaceStore::destroy) keep a surface where it is on screen:
//! the stored origin is recomputed against the new parent. Only
//! [`create`](SurfaceStore::create) interprets an origin as relative to the
//! given parent.

mod binding;
mod content;
#[cfg(any(test, feature = "test-util"))]
mod corrupt;
mod evaluate;
mod id;
mod options;
mod store;
mod traverse;
mod zstack;

pub use binding::BackSlot;
#[cfg(any(test, feature = "test-util"))]
pub use corrupt::{Anchor, Link};
pub use evaluate::SceneChanges;
pub use id::{INVALID, SurfaceId};
pub use options::{ChildDisposition, Placement, SurfaceOptions};
pub use store::SurfaceStore;
pub use traverse::{Children, ZOrder};
