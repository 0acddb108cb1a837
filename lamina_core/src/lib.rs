// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Surface graph for a terminal compositor.
//!
//! `lamina_core` tracks any number of independent drawable *surfaces* and
//! maintains two orthogonal structures over them:
//!
//! - a **binding tree**, giving each surface an optional parent whose origin
//!   its position is relative to, and
//! - a **z-stack**, a single paint order across every surface regardless of
//!   binding, anchored by a `top` and a `bottom`.
//!
//! It is `no_std` compatible (with `alloc`) and stores surfaces in
//! struct-of-arrays slots addressed by generational [`SurfaceId`] handles, so
//! both structures are index links rather than pointers.
//!
//! # Architecture
//!
//! ```text
//!   create / destroy / bind / restack / put
//!                 │
//!                 ▼
//!   SurfaceStore ──► evaluate() ──► SceneChanges ──► lamina_render::Compositor
//!        │                                                  │
//!        └──────────────► validate() ──► Vec<Violation>     ▼
//!                                                         Frame
//! ```
//!
//! **[`surface`]**: The arena, binding tree, z-stack, and cell content.
//! Every mutation checks its arguments before touching any link, so a failed
//! call leaves the graph exactly as it was.
//!
//! **[`validate`]**: A read-only traversal that cross-checks the z-stack
//! against the binding tree and reports every inconsistency it finds.
//!
//! **[`dirty`]**: Damage channels via `understory_dirty`. Position changes
//! propagate to bound descendants; content and stacking changes are local.
//!
//! **[`geometry`]** / **[`cell`]**: Cell-grid coordinates and the minimal
//! cell model the compositor needs (opaque glyph or transparent).
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `test-util` (disabled by default): Exposes hooks that corrupt graph
//!   links, for exercising the validator from other crates.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod cell;
pub mod config;
pub mod dirty;
pub mod error;
pub mod geometry;
pub mod surface;
pub mod validate;

pub use cell::Cell;
pub use config::SceneConfig;
pub use error::{BindingConflict, GraphError, Result};
pub use geometry::{CellRect, Cursor, Point, Size};
pub use surface::{
    BackSlot, ChildDisposition, Children, Placement, SceneChanges, SurfaceId, SurfaceOptions,
    SurfaceStore, ZOrder,
};
pub use validate::{Violation, ViolationKind, validate};
