// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by graph mutations.
//!
//! Every fallible operation checks its arguments before writing any link, so
//! an `Err` always means the graph is unchanged and the call can be retried
//! with corrected arguments.

use core::fmt;

use crate::surface::SurfaceId;

/// Convenience alias for results of graph operations.
pub type Result<T> = core::result::Result<T, GraphError>;

/// Why a bind or reparent was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BindingConflict {
    /// A surface cannot be its own parent.
    SelfBinding,
    /// The requested parent is a descendant of the surface.
    Cycle,
    /// The root surface is never bound to anything.
    Root,
    /// `bind` was called on a surface that already has a parent; use
    /// `reparent` to move it.
    AlreadyBound,
}

impl fmt::Display for BindingConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SelfBinding => "a surface cannot be bound to itself",
            Self::Cycle => "the parent is a descendant of the surface",
            Self::Root => "the root surface cannot be bound",
            Self::AlreadyBound => "the surface is already bound",
        })
    }
}

/// Errors returned by [`SurfaceStore`](crate::surface::SurfaceStore)
/// operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// The handle refers to a destroyed surface.
    #[error("stale surface handle {0:?}")]
    StaleSurface(SurfaceId),
    /// The binding would create a cycle or targets a disallowed surface.
    #[error("cannot bind {surface:?} to {parent:?}: {reason}")]
    InvalidBinding {
        /// The surface being bound.
        surface: SurfaceId,
        /// The requested parent.
        parent: SurfaceId,
        /// Why the binding was refused.
        reason: BindingConflict,
    },
    /// A restack or placement target is not present in the z-stack.
    #[error("{0:?} is not in the z-stack")]
    NotInStack(SurfaceId),
    /// An unbind target has no parent.
    #[error("{0:?} is not bound")]
    NotBound(SurfaceId),
    /// A surface was restacked relative to itself.
    #[error("cannot restack {0:?} relative to itself")]
    SelfRestack(SurfaceId),
    /// The root surface lives exactly as long as its store.
    #[error("the root surface cannot be destroyed independently of its store")]
    RootDestruction,
    /// A surface must cover at least one cell.
    #[error("invalid geometry {rows}x{cols}")]
    InvalidGeometry {
        /// Requested height.
        rows: u32,
        /// Requested width.
        cols: u32,
    },
    /// A cell coordinate lies outside the surface.
    #[error("cell ({y}, {x}) is outside {surface:?}")]
    OutOfBounds {
        /// The surface addressed.
        surface: SurfaceId,
        /// Requested row.
        y: u32,
        /// Requested column.
        x: u32,
    },
}
