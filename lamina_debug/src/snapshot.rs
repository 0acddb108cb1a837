// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON snapshot of a surface graph.
//!
//! [`export`] writes one pretty-printed JSON object:
//!
//! - `viewport`: the root's absolute rectangle,
//! - `surfaces`: every surface in z-order, top first, with its links as
//!   stored (handles as `"idx@genN"` strings, `null` for no link),
//! - `violations`: everything [`validate`] reports.
//!
//! Links are read raw, so a corrupted graph still exports.

use std::io::{self, Write};

use serde_json::{Value, json};

use lamina_core::surface::INVALID;
use lamina_core::{CellRect, SurfaceStore, Violation, validate};

use crate::pretty::slot_name;

/// Exports `store` as a JSON snapshot to `writer`.
pub fn export(store: &SurfaceStore, writer: &mut dyn Write) -> io::Result<()> {
    let doc = snapshot(store);
    serde_json::to_writer_pretty(&mut *writer, &doc)?;
    writeln!(writer)
}

/// Builds the snapshot as a [`Value`].
#[must_use]
pub fn snapshot(store: &SurfaceStore) -> Value {
    let root = store.root_index();
    let viewport = CellRect::new(store.absolute_at(root), store.size_at(root));

    let mut surfaces = Vec::with_capacity(store.len());
    let mut order = store.z_order();
    while let Some(idx) = order.next_index() {
        surfaces.push(surface(store, idx));
    }

    let violations: Vec<Value> = validate(store).iter().map(violation).collect();

    json!({
        "viewport": rect(&viewport),
        "root": handle(store, root),
        "top": handle(store, store.top_index()),
        "bottom": handle(store, store.bottom_index()),
        "surfaces": surfaces,
        "violations": violations,
    })
}

fn surface(store: &SurfaceStore, idx: u32) -> Value {
    let id = store.id_at(idx);
    let origin = store.origin_at(idx);
    let cursor = store.cursor_at(idx);
    let name = store.name(id).ok().flatten();
    json!({
        "id": id.to_string(),
        "name": name,
        "root": idx == store.root_index(),
        "live": store.is_live_at(idx),
        "origin": { "y": origin.y, "x": origin.x },
        "bounds": rect(&CellRect::new(store.absolute_at(idx), store.size_at(idx))),
        "cursor": { "y": cursor.y, "x": cursor.x },
        "parent": handle(store, store.parent_at(idx)),
        "children": children(store, idx),
        "back_slot": slot_name(store, store.back_slot_at(idx)),
        "above": handle(store, store.above_at(idx)),
        "below": handle(store, store.below_at(idx)),
        "opaque_cells": store.cells_at(idx).iter().filter(|c| c.is_opaque()).count(),
    })
}

fn violation(v: &Violation) -> Value {
    let id = |s: Option<lamina_core::SurfaceId>| s.map(|s| s.to_string());
    json!({
        "kind": format!("{:?}", v.kind),
        "surface": id(v.surface),
        "expected": id(v.expected),
        "observed": id(v.observed),
        "message": v.to_string(),
    })
}

/// Follows the sibling list from `first_child`, stopping after as many steps
/// as there are slots.
fn children(store: &SurfaceStore, idx: u32) -> Vec<Value> {
    let slots = store.slot_count();
    let mut out = Vec::new();
    let mut child = store.first_child_at(idx);
    while child != INVALID && child < slots && out.len() < slots as usize {
        out.push(Value::String(store.id_at(child).to_string()));
        child = store.next_sibling_at(child);
    }
    out
}

fn handle(store: &SurfaceStore, idx: u32) -> Value {
    if idx == INVALID || idx >= store.slot_count() {
        Value::Null
    } else {
        Value::String(store.id_at(idx).to_string())
    }
}

fn rect(r: &CellRect) -> Value {
    json!({
        "y": r.origin.y,
        "x": r.origin.x,
        "rows": r.size.rows,
        "cols": r.size.cols,
    })
}
