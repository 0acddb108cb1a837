// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Creation and destruction options.

use alloc::string::String;

use crate::geometry::{Point, Size};

use super::id::SurfaceId;

/// Where a new surface enters the z-stack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Above every other surface.
    #[default]
    Top,
    /// Beneath every other surface.
    Bottom,
    /// Directly above the given surface.
    Above(SurfaceId),
    /// Directly beneath the given surface.
    Below(SurfaceId),
}

/// What happens to the children of a destroyed surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ChildDisposition {
    /// Children are rebound to the destroyed surface's parent, keeping their
    /// on-screen position. If it had no parent they become unbound.
    #[default]
    Promote,
    /// Every descendant is destroyed too.
    Cascade,
}

/// Parameters for [`SurfaceStore::create`](super::SurfaceStore::create).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SurfaceOptions {
    /// Top-left corner; relative to `parent`'s origin when bound.
    pub origin: Point,
    /// Geometry. Both dimensions must be non-zero.
    pub size: Size,
    /// Surface to bind to, if any.
    pub parent: Option<SurfaceId>,
    /// Initial z-stack position.
    pub placement: Placement,
    /// Label shown in diagnostics.
    pub name: Option<String>,
}

impl SurfaceOptions {
    /// Options for an unbound surface at the origin, placed on top.
    #[must_use]
    pub fn new(rows: u32, cols: u32) -> Self {
        Self {
            origin: Point::ORIGIN,
            size: Size::new(rows, cols),
            parent: None,
            placement: Placement::Top,
            name: None,
        }
    }

    /// Sets the origin.
    #[must_use]
    pub fn at(mut self, y: i32, x: i32) -> Self {
        self.origin = Point::new(y, x);
        self
    }

    /// Binds the new surface to `parent`.
    #[must_use]
    pub fn bound_to(mut self, parent: SurfaceId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Sets the initial z-stack position.
    #[must_use]
    pub fn placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// Sets the diagnostic label.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
