// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spatial damage tracking for partial re-rendering.

use alloc::vec::Vec;

use lamina_core::{CellRect, Point};

/// The part of a frame that changed since the previous one.
///
/// An output stage can use this to re-emit only the cells that changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DamageRegion {
    /// The entire frame needs redrawing.
    #[default]
    Full,
    /// A list of rectangles, in frame coordinates, that need redrawing.
    ///
    /// Rectangles may overlap.
    Rects(Vec<CellRect>),
    /// Nothing changed; the previous frame can be reused.
    None,
}

impl DamageRegion {
    /// Returns `true` if no region needs redrawing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns `true` if the whole frame needs redrawing.
    #[must_use]
    pub fn is_full(&self) -> bool {
        matches!(self, Self::Full)
    }

    /// Adds one rectangle. Empty rectangles are ignored.
    pub fn push(&mut self, rect: CellRect) {
        if rect.is_empty() {
            return;
        }
        match self {
            Self::Full => {}
            Self::None => *self = Self::Rects(alloc::vec![rect]),
            Self::Rects(rects) => rects.push(rect),
        }
    }

    /// Merges another damage region into this one.
    pub fn merge(&mut self, other: &Self) {
        match (&*self, other) {
            (Self::Full, _) | (_, Self::Full) => *self = Self::Full,
            (Self::None, _) => *self = other.clone(),
            (_, Self::None) => {}
            (Self::Rects(a), Self::Rects(b)) => {
                let mut merged = a.clone();
                merged.extend_from_slice(b);
                *self = Self::Rects(merged);
            }
        }
    }

    /// Returns whether the cell at frame coordinates `(y, x)` is damaged.
    #[must_use]
    pub fn contains(&self, y: u32, x: u32) -> bool {
        match self {
            Self::Full => true,
            Self::None => false,
            Self::Rects(rects) => {
                let (Ok(y), Ok(x)) = (i32::try_from(y), i32::try_from(x)) else {
                    return false;
                };
                rects.iter().any(|r| r.contains(Point::new(y, x)))
            }
        }
    }
}
