// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable stack dump.
//!
//! [`dump`] writes one line per surface in z-order, top first, with its
//! absolute position, geometry, cursor, a `std` marker on the root, and its
//! handle. Bound surfaces get a second line with their binding links. Every
//! violation [`validate`] finds is written as a ` WARNING:` line under the
//! surface it concerns, and logged through `tracing`.
//!
//! ```text
//! ******************************* lamina stack dump *******************************
//! 0000 off y:   3 x:   3 geom y:   3 x:   3 curs y:   0 x:   0     2@gen0
//!  bound to 0@gen0, next bound none, bind first_child of 0@gen0
//! 0001 off y:   0 x:   0 geom y:  24 x:  80 curs y:   0 x:   0 std 0@gen0 "root"
//! **********************************************************************************
//! ```

use std::io::{self, Write};

use lamina_core::surface::INVALID;
use lamina_core::{BackSlot, SurfaceStore, Violation, validate};

const BANNER: &str =
    "******************************* lamina stack dump *******************************";
const RULE: &str =
    "**********************************************************************************";

/// Writes the stack dump for `store` to `writer`.
pub fn dump(store: &SurfaceStore, writer: &mut dyn Write) -> io::Result<()> {
    let mut violations = validate(store);
    for v in &violations {
        tracing::warn!(kind = ?v.kind, "{v}");
    }

    writeln!(writer, "{BANNER}")?;
    let mut order = store.z_order();
    let mut line = 0_usize;
    while let Some(idx) = order.next_index() {
        write_surface(store, idx, line, writer)?;
        let id = store.id_at(idx);
        // Violations are reported once, under the first listing of their surface.
        let (mine, rest): (Vec<_>, Vec<_>) =
            violations.into_iter().partition(|v| v.surface == Some(id));
        for v in &mine {
            writeln!(writer, " WARNING: {v}")?;
        }
        violations = rest;
        line += 1;
    }
    for v in &violations {
        writeln!(writer, " WARNING: {v}")?;
    }
    writeln!(writer, "{RULE}")
}

fn write_surface(
    store: &SurfaceStore,
    idx: u32,
    line: usize,
    writer: &mut dyn Write,
) -> io::Result<()> {
    let off = store.absolute_at(idx);
    let size = store.size_at(idx);
    let cursor = store.cursor_at(idx);
    let marker = if idx == store.root_index() { "std" } else { "   " };
    write!(
        writer,
        "{line:04} off y: {:3} x: {:3} geom y: {:3} x: {:3} curs y: {:3} x: {:3} {marker} {}",
        off.y,
        off.x,
        size.rows,
        size.cols,
        cursor.y,
        cursor.x,
        store.id_at(idx),
    )?;
    if let Ok(Some(name)) = store.name(store.id_at(idx)) {
        write!(writer, " {name:?}")?;
    }
    writeln!(writer)?;

    let parent = store.parent_at(idx);
    let next = store.next_sibling_at(idx);
    let slot = store.back_slot_at(idx);
    if parent != INVALID || next != INVALID || slot != BackSlot::Detached {
        writeln!(
            writer,
            " bound to {}, next bound {}, bind {}",
            link(store, parent),
            link(store, next),
            slot_name(store, slot),
        )?;
    }
    Ok(())
}

fn link(store: &SurfaceStore, idx: u32) -> String {
    if idx == INVALID || idx >= store.slot_count() {
        String::from("none")
    } else {
        store.id_at(idx).to_string()
    }
}

pub(crate) fn slot_name(store: &SurfaceStore, slot: BackSlot) -> String {
    match slot {
        BackSlot::Detached => String::from("detached"),
        BackSlot::FirstChild(p) => format!("first_child of {}", link(store, p)),
        BackSlot::NextSibling(s) => format!("next_sibling of {}", link(store, s)),
    }
}

/// Renders the dump into a string.
#[must_use]
pub fn dump_string(store: &SurfaceStore) -> String {
    let mut out = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = dump(store, &mut out);
    String::from_utf8_lossy(&out).into_owned()
}

/// Returns the dump lines flagged as anomalies.
#[must_use]
pub fn warnings(text: &str) -> Vec<&str> {
    text.lines()
        .filter(|l| l.trim_start().starts_with("WARNING:"))
        .collect()
}

/// Writes one ` WARNING:` line per violation, without the surface listing.
pub fn write_violations(violations: &[Violation], writer: &mut dyn Write) -> io::Result<()> {
    for v in violations {
        writeln!(writer, " WARNING: {v}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lamina_core::surface::Link;
    use lamina_core::{SceneConfig, SurfaceOptions};

    fn worked_example() -> (SurfaceStore, lamina_core::SurfaceId) {
        let mut s = SurfaceStore::new(SceneConfig::new(24, 80)).unwrap();
        let root = s.root();
        let p = s
            .create(SurfaceOptions::new(5, 10).at(2, 2).bound_to(root))
            .unwrap();
        let c = s
            .create(SurfaceOptions::new(3, 3).at(1, 1).bound_to(p))
            .unwrap();
        (s, c)
    }

    #[test]
    fn dump_lists_every_surface_top_down() {
        let (s, c) = worked_example();
        let text = dump_string(&s);
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.first(), Some(&BANNER));
        assert_eq!(lines.last(), Some(&RULE));
        let surfaces: Vec<_> = lines
            .iter()
            .filter(|l| l.contains(" off y:"))
            .collect();
        assert_eq!(surfaces.len(), 3);
        assert!(surfaces[0].starts_with("0000 off y:   3 x:   3 geom y:   3 x:   3"));
        assert!(surfaces[0].ends_with(&c.to_string()), "got: {}", surfaces[0]);
        assert!(surfaces[2].contains(" std "), "got: {}", surfaces[2]);
        assert!(surfaces[2].ends_with("\"root\""), "got: {}", surfaces[2]);
        assert!(warnings(&text).is_empty(), "got: {text}");
    }

    #[test]
    fn bound_surfaces_get_a_binding_line() {
        let (s, _) = worked_example();
        let text = dump_string(&s);
        let bound: Vec<_> = text
            .lines()
            .filter(|l| l.starts_with(" bound to "))
            .collect();
        assert_eq!(bound.len(), 2);
        assert!(bound[0].contains("bind first_child of 1@gen0"), "got: {}", bound[0]);
        assert!(bound[1].contains("next bound none"), "got: {}", bound[1]);
    }

    #[test]
    fn corrupted_links_are_flagged() {
        let (mut s, c) = worked_example();
        s.corrupt_link(c, Link::NextSibling, Some(c));
        let text = dump_string(&s);
        let flagged = warnings(&text);
        assert!(
            flagged.iter().any(|l| l.contains("target self")),
            "got: {text}"
        );
        // The warning follows the surface it concerns.
        let lines: Vec<_> = text.lines().collect();
        let at = lines
            .iter()
            .position(|l| l.contains("target self"))
            .unwrap();
        assert!(lines[..at].iter().any(|l| l.ends_with(&c.to_string())));
    }

    #[test]
    fn write_violations_prefixes_each_line() {
        let (mut s, c) = worked_example();
        s.corrupt_link(c, Link::Parent, None);
        let mut out = Vec::new();
        write_violations(&validate(&s), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with(" WARNING: "), "got: {text}");
    }
}
