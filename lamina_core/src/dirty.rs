// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! Lamina uses multi-channel dirty tracking (via [`understory_dirty`]) so a
//! compositor can limit repainting to the cells that may have changed since
//! its previous pass.
//!
//! # Propagation semantics
//!
//! - **Propagating**: [`POSITION`] uses
//!   [`EagerPolicy`](understory_dirty::EagerPolicy) and has dependency edges
//!   from each bound surface to its parent. Moving, binding, or unbinding a
//!   surface marks every bound descendant too, since their absolute positions
//!   are derived from the parent's.
//!
//! - **Local-only**: [`CONTENT`] and [`STACKING`] are marked with the default
//!   policy. Only the written or restacked surface appears in the drain
//!   output.
//!
//! # Consumption
//!
//! Callers never query dirty state directly. Each
//! [`SurfaceStore::evaluate`](crate::surface::SurfaceStore::evaluate) call
//! drains all channels and reports the results as
//! [`SceneChanges`](crate::surface::SceneChanges).

use understory_dirty::Channel;

/// Absolute position or geometry changed.
pub const POSITION: Channel = Channel::new(0);

/// Cell content changed.
pub const CONTENT: Channel = Channel::new(1);

/// Z-order position changed.
pub const STACKING: Channel = Channel::new(2);
