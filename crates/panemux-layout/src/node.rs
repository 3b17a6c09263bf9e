use std::ops::{Index, IndexMut};

use panemux_core::{Rect, SplitDirection};

// ──────────────────────────────────────────────
// Arena: cells addressed by handle
// ──────────────────────────────────────────────

/// Handle into the cell arena.
///
/// The parent "pointer" of a cell is a `CellId` lookup relation, not an
/// ownership edge; children are owned by index inside their group's child
/// vector, so the graph stays acyclic for the borrow checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellId(pub(crate) usize);

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CellKind {
    Pane,
    Group {
        children: Vec<CellId>,
        direction: SplitDirection,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Cell {
    pub rect: Rect,
    pub parent: Option<CellId>,
    pub kind: CellKind,
}

impl Cell {
    /// Group direction, if this cell is a group.
    pub fn direction(&self) -> Option<SplitDirection> {
        match self.kind {
            CellKind::Group { direction, .. } => Some(direction),
            CellKind::Pane => None,
        }
    }
}

/// Flat storage for every cell a layout has ever created.
///
/// Cells removed from the tree are simply left unreferenced; a layout
/// lives for one editing session of a window, so slots are never reused.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Arena {
    cells: Vec<Cell>,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc_pane(&mut self, rect: Rect) -> CellId {
        self.cells.push(Cell {
            rect,
            parent: None,
            kind: CellKind::Pane,
        });
        CellId(self.cells.len() - 1)
    }

    /// Allocate a group over `children`, computing its bounding rectangle
    /// and rewiring each child's parent back-reference. The group's own
    /// parent starts out unset; the caller installs it in a slot.
    pub fn alloc_group(&mut self, children: Vec<CellId>, direction: SplitDirection) -> CellId {
        debug_assert!(children.len() >= 2, "groups need at least two children");
        let mut bounds = self[children[0]].rect;
        for &child in &children[1..] {
            bounds = bounds.union(&self[child].rect);
        }
        self.cells.push(Cell {
            rect: bounds,
            parent: None,
            kind: CellKind::Group {
                children: children.clone(),
                direction,
            },
        });
        let id = CellId(self.cells.len() - 1);
        for child in children {
            self[child].parent = Some(id);
        }
        id
    }

    /// Ordered children of a group; empty for a pane.
    pub fn children(&self, id: CellId) -> &[CellId] {
        match &self[id].kind {
            CellKind::Group { children, .. } => children,
            CellKind::Pane => &[],
        }
    }

    pub fn children_mut(&mut self, id: CellId) -> &mut Vec<CellId> {
        match &mut self[id].kind {
            CellKind::Group { children, .. } => children,
            CellKind::Pane => unreachable!("pane has no children"),
        }
    }

    pub fn edge_pair(&self, id: CellId, direction: SplitDirection) -> (SplitDirection, f64, f64) {
        self[id].rect.edge_pair(direction)
    }

    /// Every cell in the subtree rooted at `start`, parent before child.
    ///
    /// Iterative on an explicit stack; deeply nested groups must not
    /// recurse. Children are pushed in list order.
    pub fn depth_walk(&self, start: CellId) -> Vec<CellId> {
        let mut out = Vec::new();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            out.push(id);
            if let CellKind::Group { children, .. } = &self[id].kind {
                stack.extend(children.iter().copied());
            }
        }
        out
    }
}

impl Index<CellId> for Arena {
    type Output = Cell;

    fn index(&self, id: CellId) -> &Cell {
        &self.cells[id.0]
    }
}

impl IndexMut<CellId> for Arena {
    fn index_mut(&mut self, id: CellId) -> &mut Cell {
        &mut self.cells[id.0]
    }
}
