use std::fmt;

use serde::{Deserialize, Serialize};

// ──────────────────────────────────────────────
// Geometry
// ──────────────────────────────────────────────

/// An axis-aligned rectangle in window-relative fractions.
///
/// All four coordinates live in `[0.0, 1.0]`, with `left <= right` and
/// `top <= bottom`. Coordinates are compared with exact `f64` equality:
/// every value in a layout is produced by the same arithmetic, so panes
/// that share an edge share it bit-for-bit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub const UNIT: Self = Self {
        left: 0.0,
        top: 0.0,
        right: 1.0,
        bottom: 1.0,
    };

    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Horizontal midpoint.
    pub fn h_mid(&self) -> f64 {
        self.left + (self.right - self.left) / 2.0
    }

    /// Vertical midpoint.
    pub fn v_mid(&self) -> f64 {
        self.top + (self.bottom - self.top) / 2.0
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// The two coordinates orthogonal to `direction`, tagged with the
    /// direction itself. Two cells sit side by side in a `Horizontal` run
    /// exactly when their `Horizontal` edge pairs are equal, and stack in a
    /// `Vertical` run when their `Vertical` edge pairs are equal.
    pub fn edge_pair(&self, direction: SplitDirection) -> (SplitDirection, f64, f64) {
        match direction {
            SplitDirection::Horizontal => (direction, self.top, self.bottom),
            SplitDirection::Vertical => (direction, self.left, self.right),
        }
    }
}

// ──────────────────────────────────────────────
// Direction
// ──────────────────────────────────────────────

/// Orientation of a split or of a group's children.
///
/// `Horizontal` lays cells out side by side (a horizontal split puts the
/// new pane to the right); `Vertical` stacks them (the new pane goes
/// below).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplitDirection {
    Horizontal,
    Vertical,
}

// ──────────────────────────────────────────────
// Host wire shape
// ──────────────────────────────────────────────

/// The flat coordinate-indexed layout the host editor speaks.
///
/// Each cell is `[left, top, right, bottom]` where `left`/`right` index
/// into `cols` and `top`/`bottom` index into `rows`. Cell order is the
/// host's pane order and must be preserved across edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatLayout {
    pub cells: Vec<[usize; 4]>,
    pub rows: Vec<f64>,
    pub cols: Vec<f64>,
}

impl FlatLayout {
    /// A single pane covering the whole window.
    pub fn single() -> Self {
        Self {
            cells: vec![[0, 0, 1, 1]],
            rows: vec![0.0, 1.0],
            cols: vec![0.0, 1.0],
        }
    }
}

// ──────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────

/// Structural failures while reconstructing a layout tree.
///
/// These all indicate malformed input: a rectangle list that does not tile
/// the window cannot be grouped, and is rejected rather than guessed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// A cluster mixes members that align with neither of its axes.
    UnmatchedPanes,
    /// Consecutive members of one cluster imply two different orientations.
    OrientationFlip,
    /// A grouping pass made no progress while more than one node remained.
    GroupingStalled { remaining: usize },
    /// A flat cell references a coordinate index outside its table.
    BadCellIndex {
        cell: usize,
        index: usize,
        len: usize,
    },
    /// The flat layout contains no cells at all.
    EmptyLayout,
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnmatchedPanes => write!(f, "unmatched panes in the same group"),
            Self::OrientationFlip => write!(f, "unexpected flip in group orientation"),
            Self::GroupingStalled { remaining } => {
                write!(f, "grouping stalled with {remaining} cells remaining")
            }
            Self::BadCellIndex { cell, index, len } => write!(
                f,
                "cell {cell} references coordinate index {index} outside table of length {len}"
            ),
            Self::EmptyLayout => write!(f, "layout has no cells"),
        }
    }
}

impl std::error::Error for LayoutError {}
