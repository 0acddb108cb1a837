// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stack dumps and JSON snapshots for diagnosing lamina surface graphs.
//!
//! Both read the store without mutating it and run
//! [`validate`](lamina_core::validate) along the way:
//!
//! - [`pretty::dump`]: one line per surface in z-order, with ` WARNING:`
//!   lines for every inconsistency.
//! - [`snapshot::export`]: the same state as pretty-printed JSON, for
//!   tooling.

pub mod pretty;
pub mod snapshot;
