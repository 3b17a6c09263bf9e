// Tiling pane layout engine.
//
// Rebuilds a hierarchical group tree from the flat rectangle list a host
// editor supplies, applies structural edits (split, delete, directional
// find, split-bar moves) that keep the tiling gapless and overlap-free,
// and re-serializes the tree into the flat coordinate-indexed form the
// host consumes.

mod flatten;
mod group;
mod node;

use std::fmt;

pub use panemux_core::{FlatLayout, LayoutError, Rect, SplitDirection};

use node::{Arena, CellId, CellKind};

// ──────────────────────────────────────────────
// Layout
// ──────────────────────────────────────────────

/// A window's pane tiling.
///
/// `panes` is the externally addressable identity space: the host names a
/// pane by its position in this list. `root` is the group tree over the
/// same arena cells, so a pane's rectangle is stored exactly once.
///
/// Index contract: deleting pane `k` shifts every later index down by one;
/// splitting always appends, so existing indices never move.
#[derive(Debug, PartialEq)]
pub struct Layout {
    pub(crate) arena: Arena,
    pub(crate) panes: Vec<CellId>,
    pub(crate) root: CellId,
}

impl Layout {
    /// Build a layout from the host's flat form and group it into a tree.
    ///
    /// Fails on malformed input: out-of-range coordinate indices, an empty
    /// cell list, or a rectangle set that cannot be clustered into a
    /// single root.
    pub fn from_flat(flat: &FlatLayout) -> Result<Self, LayoutError> {
        if flat.cells.is_empty() {
            return Err(LayoutError::EmptyLayout);
        }

        let mut arena = Arena::new();
        let mut panes = Vec::with_capacity(flat.cells.len());
        for (cell, ids) in flat.cells.iter().enumerate() {
            let col = |index: usize| {
                flat.cols.get(index).copied().ok_or(LayoutError::BadCellIndex {
                    cell,
                    index,
                    len: flat.cols.len(),
                })
            };
            let row = |index: usize| {
                flat.rows.get(index).copied().ok_or(LayoutError::BadCellIndex {
                    cell,
                    index,
                    len: flat.rows.len(),
                })
            };
            let rect = Rect::new(col(ids[0])?, row(ids[1])?, col(ids[2])?, row(ids[3])?);
            panes.push(arena.alloc_pane(rect));
        }

        let root = group::build_tree(&mut arena, panes.clone())?;
        Ok(Self { arena, panes, root })
    }

    /// Serialize back into the host's flat coordinate-indexed form.
    ///
    /// Deterministic: structurally identical layouts produce identical
    /// output.
    pub fn to_flat(&self) -> FlatLayout {
        flatten::to_flat(self)
    }

    pub fn pane_count(&self) -> usize {
        self.panes.len()
    }

    pub fn pane_rect(&self, index: usize) -> Option<Rect> {
        self.panes.get(index).map(|&id| self.arena[id].rect)
    }

    /// All pane rectangles in external order.
    pub fn pane_rects(&self) -> Vec<Rect> {
        self.panes.iter().map(|&id| self.arena[id].rect).collect()
    }

    // ──────────────────────────────────────────
    // Split
    // ──────────────────────────────────────────

    /// Bisect pane `index` at its midpoint along `direction`.
    ///
    /// The new pane lands to the right (`Horizontal`) or below
    /// (`Vertical`), is appended to the pane list, and its index is
    /// returned. If the target's parent group already runs in `direction`
    /// the new pane joins it directly; otherwise the pair is wrapped in a
    /// fresh group installed in the target's slot.
    ///
    /// Panics if `index` names no pane; this is the one operation that
    /// must hand back a new index, so there is nothing sensible to
    /// return for a missing target.
    pub fn split_pane(&mut self, index: usize, direction: SplitDirection) -> usize {
        let pane = self.panes[index];

        let Some(parent) = self.arena[pane].parent else {
            // Sole parentless pane: rebuild the two-pane root directly.
            let (first, second) = match direction {
                SplitDirection::Horizontal => (
                    Rect::new(0.0, 0.0, 0.5, 1.0),
                    Rect::new(0.5, 0.0, 1.0, 1.0),
                ),
                SplitDirection::Vertical => (
                    Rect::new(0.0, 0.0, 1.0, 0.5),
                    Rect::new(0.0, 0.5, 1.0, 1.0),
                ),
            };
            let first = self.arena.alloc_pane(first);
            let second = self.arena.alloc_pane(second);
            self.root = self.arena.alloc_group(vec![first, second], direction);
            self.panes = vec![first, second];
            return 1;
        };

        let rect = self.arena[pane].rect;
        let new_rect = match direction {
            SplitDirection::Horizontal => {
                let mid = rect.h_mid();
                self.arena[pane].rect.right = mid;
                Rect::new(mid, rect.top, rect.right, rect.bottom)
            }
            SplitDirection::Vertical => {
                let mid = rect.v_mid();
                self.arena[pane].rect.bottom = mid;
                Rect::new(rect.left, mid, rect.right, rect.bottom)
            }
        };
        let new_pane = self.arena.alloc_pane(new_rect);

        // Always append so existing pane indices stay valid.
        self.panes.push(new_pane);

        let slot = self.child_slot(parent, pane);
        if self.arena[parent].direction() == Some(direction) {
            self.arena[new_pane].parent = Some(parent);
            self.arena.children_mut(parent).insert(slot + 1, new_pane);
        } else {
            let split = self.arena.alloc_group(vec![pane, new_pane], direction);
            self.arena[split].parent = Some(parent);
            self.arena.children_mut(parent)[slot] = split;
        }

        self.panes.len() - 1
    }

    // ──────────────────────────────────────────
    // Delete
    // ──────────────────────────────────────────

    /// Remove pane `index`, letting a tree-adjacent sibling absorb its
    /// rectangle. A no-op for the sole remaining pane and for an
    /// out-of-range index.
    pub fn delete_pane(&mut self, index: usize) {
        if let Some(&cell) = self.panes.get(index) {
            self.delete_cell(cell);
        }
    }

    fn delete_cell(&mut self, cell: CellId) {
        let Some(parent) = self.arena[cell].parent else {
            return;
        };
        let target = self.arena[cell].rect;
        // Parent is always a group; a pane cannot parent another cell.
        let direction = self.arena[parent].direction().unwrap_or(SplitDirection::Horizontal);

        let (prev, next) = self.adjacent(cell);
        if prev.is_none() && next.is_none() {
            // Only child: a group this small should already have been
            // collapsed, but if we ever see one, delete it instead.
            self.delete_cell(parent);
        } else if let Some(prev) = prev {
            // The previous sibling grows forward over the freed rectangle.
            // Only the leaves whose edge sits on the vacated bar may move;
            // cells deeper in the subtree that do not touch it stay fixed.
            match direction {
                SplitDirection::Horizontal => {
                    for sub in self.arena.depth_walk(prev) {
                        if self.arena[sub].rect.right == target.left {
                            self.arena[sub].rect.right = target.right;
                        }
                    }
                }
                SplitDirection::Vertical => {
                    for sub in self.arena.depth_walk(prev) {
                        if self.arena[sub].rect.bottom == target.top {
                            self.arena[sub].rect.bottom = target.bottom;
                        }
                    }
                }
            }
        } else if let Some(next) = next {
            // No previous sibling: the following one grows backward.
            match direction {
                SplitDirection::Horizontal => {
                    for sub in self.arena.depth_walk(next) {
                        if self.arena[sub].rect.left == target.right {
                            self.arena[sub].rect.left = target.left;
                        }
                    }
                }
                SplitDirection::Vertical => {
                    for sub in self.arena.depth_walk(next) {
                        if self.arena[sub].rect.top == target.bottom {
                            self.arena[sub].rect.top = target.top;
                        }
                    }
                }
            }
        }

        self.arena.children_mut(parent).retain(|&c| c != cell);

        // Collapse any group the removal reduced to a single child,
        // walking the ancestor chain up to (and including) the root.
        let mut group = Some(parent);
        while let Some(gid) = group {
            if self.arena.children(gid).len() != 1 {
                break;
            }
            let sole = self.arena.children(gid)[0];
            let grandparent = self.arena[gid].parent;
            match grandparent {
                Some(p) => {
                    let slot = self.child_slot(p, gid);
                    self.arena.children_mut(p)[slot] = sole;
                }
                None => {
                    // Deleted all the way up: the sole child is the new root.
                    self.root = sole;
                }
            }
            self.arena[sole].parent = grandparent;
            group = grandparent;
        }

        if let Some(pos) = self.panes.iter().position(|&p| p == cell) {
            self.panes.remove(pos);
        }
    }

    // ──────────────────────────────────────────
    // Directional find
    // ──────────────────────────────────────────

    /// Pane whose right edge meets this pane's left edge, with its
    /// vertical midpoint inside this pane's span. `wrap` retries against
    /// the far window edge. First match in pane order wins; no match is
    /// not an error.
    pub fn find_left(&self, index: usize, wrap: bool) -> Option<usize> {
        let cell = self.pane_rect(index)?;
        let mut bars = vec![cell.left];
        if wrap {
            bars.push(1.0);
        }
        for bar in bars {
            for (idx, &id) in self.panes.iter().enumerate() {
                let rect = self.arena[id].rect;
                if rect.right == bar && rect.v_mid() >= cell.top && rect.v_mid() <= cell.bottom {
                    return Some(idx);
                }
            }
        }
        None
    }

    pub fn find_right(&self, index: usize, wrap: bool) -> Option<usize> {
        let cell = self.pane_rect(index)?;
        let mut bars = vec![cell.right];
        if wrap {
            bars.push(0.0);
        }
        for bar in bars {
            for (idx, &id) in self.panes.iter().enumerate() {
                let rect = self.arena[id].rect;
                if rect.left == bar && rect.v_mid() >= cell.top && rect.v_mid() <= cell.bottom {
                    return Some(idx);
                }
            }
        }
        None
    }

    pub fn find_above(&self, index: usize, wrap: bool) -> Option<usize> {
        let cell = self.pane_rect(index)?;
        let mut bars = vec![cell.top];
        if wrap {
            bars.push(1.0);
        }
        for bar in bars {
            for (idx, &id) in self.panes.iter().enumerate() {
                let rect = self.arena[id].rect;
                if rect.bottom == bar && rect.h_mid() >= cell.left && rect.h_mid() <= cell.right {
                    return Some(idx);
                }
            }
        }
        None
    }

    pub fn find_below(&self, index: usize, wrap: bool) -> Option<usize> {
        let cell = self.pane_rect(index)?;
        let mut bars = vec![cell.bottom];
        if wrap {
            bars.push(0.0);
        }
        for bar in bars {
            for (idx, &id) in self.panes.iter().enumerate() {
                let rect = self.arena[id].rect;
                if rect.top == bar && rect.h_mid() >= cell.left && rect.h_mid() <= cell.right {
                    return Some(idx);
                }
            }
        }
        None
    }

    // ──────────────────────────────────────────
    // Split-bar moves
    // ──────────────────────────────────────────

    /// Move the horizontal bar below pane `index` by `by` (positive is
    /// down). Rejected moves — anything that would squeeze a neighbor
    /// below the `|by|` clearance margin — are silent no-ops.
    pub fn move_horizontal_split(&mut self, index: usize, by: f64) {
        if let Some(&pane) = self.panes.get(index) {
            self.move_split_cell(pane, by, SplitDirection::Vertical);
        }
    }

    /// Move the vertical bar to the right of pane `index` by `by`
    /// (positive is rightward). Same clearance rule as the horizontal
    /// variant.
    pub fn move_vertical_split(&mut self, index: usize, by: f64) {
        if let Some(&pane) = self.panes.get(index) {
            self.move_split_cell(pane, by, SplitDirection::Horizontal);
        }
    }

    /// Shared bar-move walk. `bar_axis` is the orientation of the group
    /// that owns the bar: a horizontal bar separates vertically stacked
    /// cells, a vertical bar separates a horizontal run.
    fn move_split_cell(&mut self, cell: CellId, by: f64, bar_axis: SplitDirection) {
        // A bar perpendicular to the parent's run is a property of some
        // enclosing group; walk up until the parent runs along `bar_axis`.
        let mut cell = cell;
        while let Some(parent) = self.arena[cell].parent {
            if self.arena[parent].direction() == Some(bar_axis) {
                break;
            }
            cell = parent;
        }

        let (prev, next) = self.adjacent(cell);
        let next = match next {
            Some(next) => next,
            None => {
                // Last cell of its run: act on the bar before it instead.
                let Some(prev) = prev else {
                    log::debug!("no bar to move for cell {cell:?}");
                    return;
                };
                cell = prev;
                let (_, next) = self.adjacent(cell);
                match next {
                    Some(next) => next,
                    None => return,
                }
            }
        };

        match bar_axis {
            SplitDirection::Vertical => {
                let old_top = self.arena[next].rect.top;
                let new_top = old_top + by;
                if new_top > self.arena[cell].rect.top + by.abs()
                    && new_top < self.arena[next].rect.bottom - by.abs()
                {
                    for sub in self.arena.depth_walk(cell) {
                        if self.arena[sub].rect.bottom == old_top {
                            self.arena[sub].rect.bottom = new_top;
                        }
                    }
                    for sub in self.arena.depth_walk(next) {
                        if self.arena[sub].rect.top == old_top {
                            self.arena[sub].rect.top = new_top;
                        }
                    }
                } else {
                    log::debug!("rejected horizontal bar move by {by}: too little clearance");
                }
            }
            SplitDirection::Horizontal => {
                let old_left = self.arena[next].rect.left;
                let new_left = old_left + by;
                if new_left > self.arena[cell].rect.left + by.abs()
                    && new_left < self.arena[next].rect.right - by.abs()
                {
                    for sub in self.arena.depth_walk(cell) {
                        if self.arena[sub].rect.right == old_left {
                            self.arena[sub].rect.right = new_left;
                        }
                    }
                    for sub in self.arena.depth_walk(next) {
                        if self.arena[sub].rect.left == old_left {
                            self.arena[sub].rect.left = new_left;
                        }
                    }
                } else {
                    log::debug!("rejected vertical bar move by {by}: too little clearance");
                }
            }
        }
    }

    // ──────────────────────────────────────────
    // Helpers
    // ──────────────────────────────────────────

    /// The siblings spatially before and after `cell` inside its parent
    /// group, with siblings ordered by `(left, top)`. Either side is
    /// `None` at the ends of the run, and both are `None` for a parentless
    /// cell.
    fn adjacent(&self, cell: CellId) -> (Option<CellId>, Option<CellId>) {
        let Some(parent) = self.arena[cell].parent else {
            return (None, None);
        };
        let mut siblings = self.arena.children(parent).to_vec();
        siblings.sort_by(|&a, &b| {
            let ra = self.arena[a].rect;
            let rb = self.arena[b].rect;
            ra.left
                .total_cmp(&rb.left)
                .then(ra.top.total_cmp(&rb.top))
        });

        match siblings.iter().position(|&c| c == cell) {
            Some(pos) => (
                pos.checked_sub(1).map(|p| siblings[p]),
                siblings.get(pos + 1).copied(),
            ),
            None => (None, None),
        }
    }

    /// Position of `child` in `parent`'s child list.
    fn child_slot(&self, parent: CellId, child: CellId) -> usize {
        self.arena
            .children(parent)
            .iter()
            .position(|&c| c == child)
            .unwrap_or_else(|| unreachable!("child not in parent's list"))
    }
}

// ──────────────────────────────────────────────
// Display: indented tree dump
// ──────────────────────────────────────────────

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Layout ({} panes)", self.panes.len())?;
        // (depth, cell) stack; children pushed in reverse so the dump
        // reads top to bottom in list order.
        let mut stack = vec![(1usize, self.root)];
        while let Some((depth, id)) = stack.pop() {
            let cell = &self.arena[id];
            let r = cell.rect;
            let indent = "  ".repeat(depth);
            match &cell.kind {
                CellKind::Pane => {
                    let pane = self.panes.iter().position(|&p| p == id);
                    match pane {
                        Some(n) => writeln!(
                            f,
                            "{indent}pane {n} ({:.3}, {:.3}, {:.3}, {:.3})",
                            r.left, r.top, r.right, r.bottom
                        )?,
                        None => writeln!(
                            f,
                            "{indent}pane ? ({:.3}, {:.3}, {:.3}, {:.3})",
                            r.left, r.top, r.right, r.bottom
                        )?,
                    }
                }
                CellKind::Group {
                    children,
                    direction,
                } => {
                    writeln!(
                        f,
                        "{indent}group {direction:?} ({:.3}, {:.3}, {:.3}, {:.3})",
                        r.left, r.top, r.right, r.bottom
                    )?;
                    for &child in children.iter().rev() {
                        stack.push((depth + 1, child));
                    }
                }
            }
        }
        Ok(())
    }
}
