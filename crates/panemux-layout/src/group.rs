use panemux_core::{LayoutError, SplitDirection};

use crate::node::{Arena, CellId};

// ──────────────────────────────────────────────
// Grouping engine
// ──────────────────────────────────────────────

/// Cluster a flat list of cells into a single root cell.
///
/// Runs clustering passes to a fixed point. A pass that merges nothing
/// while more than one node remains means the rectangles do not tile the
/// window, and the whole construction is rejected.
pub(crate) fn build_tree(arena: &mut Arena, cells: Vec<CellId>) -> Result<CellId, LayoutError> {
    let mut nodes = cells;
    loop {
        if nodes.len() == 1 {
            return Ok(nodes[0]);
        }
        let before = nodes.len();
        nodes = cluster_pass(arena, nodes)?;
        if nodes.len() == before && nodes.len() > 1 {
            log::debug!("grouping stalled with {} cells left", nodes.len());
            return Err(LayoutError::GroupingStalled {
                remaining: nodes.len(),
            });
        }
    }
}

/// One clustering pass over the worklist.
///
/// The first unconsumed node is the pivot; every later node whose
/// horizontal or vertical edge pair equals the pivot's joins the pivot's
/// cluster. Clusters of two or more become a group, singletons pass
/// through, and whatever did not match seeds the next pivot.
fn cluster_pass(arena: &mut Arena, nodes: Vec<CellId>) -> Result<Vec<CellId>, LayoutError> {
    let mut out = Vec::new();
    let mut queue = nodes;
    while !queue.is_empty() {
        let pivot = queue.remove(0);
        let mut cluster = vec![pivot];
        let mut rest = Vec::new();
        for cell in queue {
            if arena.edge_pair(cell, SplitDirection::Horizontal)
                == arena.edge_pair(pivot, SplitDirection::Horizontal)
                || arena.edge_pair(cell, SplitDirection::Vertical)
                    == arena.edge_pair(pivot, SplitDirection::Vertical)
            {
                cluster.push(cell);
            } else {
                rest.push(cell);
            }
        }
        if cluster.len() > 1 {
            let direction = detect_direction(arena, &cluster)?;
            out.push(arena.alloc_group(cluster, direction));
        } else {
            out.push(pivot);
        }
        queue = rest;
    }
    Ok(out)
}

/// Validate that `cluster` forms one run along a single axis and return
/// that axis.
///
/// Consecutive members sharing left and right edges stack vertically;
/// sharing top and bottom lays them out horizontally. Anything else is a
/// structural error, as is a change of axis partway through the run.
pub(crate) fn detect_direction(
    arena: &Arena,
    cluster: &[CellId],
) -> Result<SplitDirection, LayoutError> {
    let mut detected = None;
    let mut last = &arena[cluster[0]].rect;
    for &id in &cluster[1..] {
        let rect = &arena[id].rect;
        let direction = if rect.left == last.left && rect.right == last.right {
            SplitDirection::Vertical
        } else if rect.top == last.top && rect.bottom == last.bottom {
            SplitDirection::Horizontal
        } else {
            return Err(LayoutError::UnmatchedPanes);
        };

        match detected {
            Some(d) if d != direction => return Err(LayoutError::OrientationFlip),
            _ => detected = Some(direction),
        }
        last = rect;
    }

    // cluster always has >= 2 members, so an axis was detected.
    Ok(detected.unwrap_or(SplitDirection::Horizontal))
}
