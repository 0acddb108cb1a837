// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rendering-context configuration.

use crate::geometry::Size;

/// Configuration for a new [`SurfaceStore`](crate::surface::SurfaceStore).
///
/// The viewport size becomes the geometry of the root surface, which sits at
/// absolute origin `(0, 0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SceneConfig {
    /// Viewport height in cells.
    pub rows: u32,
    /// Viewport width in cells.
    pub cols: u32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self { rows: 24, cols: 80 }
    }
}

impl SceneConfig {
    /// Creates a configuration with the given viewport size.
    #[must_use]
    pub const fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }

    /// Replaces the viewport size.
    #[must_use]
    pub const fn with_size(mut self, rows: u32, cols: u32) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    /// Returns the viewport size.
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.rows, self.cols)
    }
}
