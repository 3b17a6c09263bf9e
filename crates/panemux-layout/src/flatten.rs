use panemux_core::FlatLayout;

use crate::node::{Arena, CellId};
use crate::Layout;

// ──────────────────────────────────────────────
// Serializer: tree → flat coordinate tables
// ──────────────────────────────────────────────

/// A split-bar registration: the group a coordinate value was first seen
/// under, and the value itself. Sibling cells of that group reuse the
/// entry, so shared edges come out as one bar id.
type SplitTable = Vec<(Option<CellId>, f64)>;

pub(crate) fn to_flat(layout: &Layout) -> FlatLayout {
    if layout.panes.len() == 1 {
        return FlatLayout::single();
    }

    let arena = &layout.arena;
    let mut cols: SplitTable = Vec::new();
    let mut rows: SplitTable = Vec::new();

    // Register bars in tree order first so panes share ids with the other
    // cells of their parent groups, then sort both tables by coordinate so
    // the bars come out in an order the host accepts.
    for id in arena.depth_walk(layout.root) {
        let rect = arena[id].rect;
        split_id(arena, id, rect.left, &mut cols);
        split_id(arena, id, rect.top, &mut rows);
        split_id(arena, id, rect.right, &mut cols);
        split_id(arena, id, rect.bottom, &mut rows);
    }

    cols.sort_by(|a, b| a.1.total_cmp(&b.1));
    rows.sort_by(|a, b| a.1.total_cmp(&b.1));

    // Re-emit the panes in their external order; every edge is registered
    // by now, so these lookups only resolve ids against the sorted tables.
    let cells = layout
        .panes
        .iter()
        .map(|&id| {
            let rect = arena[id].rect;
            [
                split_id(arena, id, rect.left, &mut cols),
                split_id(arena, id, rect.top, &mut rows),
                split_id(arena, id, rect.right, &mut cols),
                split_id(arena, id, rect.bottom, &mut rows),
            ]
        })
        .collect();

    FlatLayout {
        cells,
        rows: rows.iter().map(|entry| entry.1).collect(),
        cols: cols.iter().map(|entry| entry.1).collect(),
    }
}

/// Resolve the bar id for `value` on `cell`'s edge, registering it if no
/// ancestor of the cell already owns a bar at that coordinate.
///
/// The upward walk is what lets a nested cell reuse the id of an enclosing
/// group's edge when they coincide.
fn split_id(arena: &Arena, cell: CellId, value: f64, table: &mut SplitTable) -> usize {
    let mut cur = Some(cell);
    while let Some(c) = cur {
        let group = arena[c].parent;
        if let Some(pos) = table
            .iter()
            .position(|&(owner, v)| owner == group && v == value)
        {
            return pos;
        }
        cur = group;
    }

    table.push((arena[cell].parent, value));
    table.len() - 1
}
