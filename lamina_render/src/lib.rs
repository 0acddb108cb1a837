// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compositing and damage tracking for lamina.
//!
//! This crate turns a [`lamina_core::SurfaceStore`] into the cell grid an
//! output stage encodes for the terminal. It defines:
//!
//! - [`render`]: a one-shot painter's-algorithm pass with full damage
//! - [`Compositor`]: the same pass, plus damage computed from
//!   [`SceneChanges`](lamina_core::SceneChanges)
//! - [`Frame`]: the composited grid for one pass
//! - [`DamageRegion`]: which cells changed since the previous frame

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

mod compositor;
mod damage;
mod frame;

pub use compositor::{Compositor, render};
pub use damage::DamageRegion;
pub use frame::Frame;
