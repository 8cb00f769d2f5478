//! Longest-path depth of every item from the roots of the blocking structure.

use std::collections::BTreeMap;

use flowcast_core::types::IssueId;
use petgraph::graph::NodeIndex;

use super::dependency_graph::DependencyGraph;

struct Frame {
    node: NodeIndex,
    cursor: usize,
    /// Deepest blocker seen so far; `None` until one counts.
    best: Option<u32>,
}

/// Depth per known item: 0 with no live blocker, else 1 + the deepest blocker.
///
/// Only unresolved edges from blockers present in the snapshot count. A
/// blocker already on the current path contributes 0, which clamps depth
/// inside cycles instead of looping; cycles are reported separately.
pub fn calculate_depths(graph: &DependencyGraph) -> BTreeMap<IssueId, u32> {
    let mut memo: Vec<Option<u32>> = vec![None; graph.vertex_count()];
    let mut on_path = vec![false; graph.vertex_count()];
    let mut stack: Vec<Frame> = Vec::new();

    for start in graph.known_vertices() {
        if memo[start.index()].is_some() {
            continue;
        }
        on_path[start.index()] = true;
        stack.push(Frame {
            node: start,
            cursor: 0,
            best: None,
        });

        while let Some(frame) = stack.last_mut() {
            let blockers = graph.blocked_by(frame.node);
            if let Some(&(blocker, edge)) = blockers.get(frame.cursor) {
                frame.cursor += 1;
                if graph.is_edge_resolved(edge) || !graph.is_known(blocker) {
                    continue;
                }
                if let Some(depth) = memo[blocker.index()] {
                    frame.best = frame.best.max(Some(depth));
                } else if on_path[blocker.index()] {
                    frame.best = frame.best.max(Some(0));
                } else {
                    on_path[blocker.index()] = true;
                    stack.push(Frame {
                        node: blocker,
                        cursor: 0,
                        best: None,
                    });
                }
                continue;
            }

            let depth = frame.best.map_or(0, |d| d + 1);
            let node = frame.node;
            memo[node.index()] = Some(depth);
            on_path[node.index()] = false;
            stack.pop();
            if let Some(parent) = stack.last_mut() {
                parent.best = parent.best.max(Some(depth));
            }
        }
    }

    graph
        .known_vertices()
        .map(|idx| (graph.id(idx), memo[idx.index()].unwrap_or(0)))
        .collect()
}
