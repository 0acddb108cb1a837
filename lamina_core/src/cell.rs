// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cell content as seen by the compositor.

/// The content of one cell of a surface.
///
/// Styling, colors, and multi-column glyphs belong to the terminal cell model
/// and are not represented here. The compositor only needs to know whether a
/// cell hides whatever is beneath it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    /// Nothing drawn; lower surfaces show through.
    #[default]
    Transparent,
    /// A single-column glyph that fully occludes lower surfaces.
    Glyph(char),
}

impl Cell {
    /// Returns `true` if the cell occludes cells beneath it.
    #[inline]
    #[must_use]
    pub const fn is_opaque(self) -> bool {
        matches!(self, Self::Glyph(_))
    }

    /// Returns the glyph, if any.
    #[inline]
    #[must_use]
    pub const fn glyph(self) -> Option<char> {
        match self {
            Self::Glyph(c) => Some(c),
            Self::Transparent => None,
        }
    }
}

impl From<char> for Cell {
    fn from(c: char) -> Self {
        Self::Glyph(c)
    }
}
