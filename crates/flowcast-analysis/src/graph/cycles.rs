//! Cycle detection: three-color DFS over the blocked-by adjacency.
//!
//! Explicit frame stack instead of recursion, so deep chains cannot overflow
//! the native stack. O(V + E).

use flowcast_core::types::{FxHashSet, IssueId};
use petgraph::graph::NodeIndex;

use super::dependency_graph::DependencyGraph;
use super::types::Cycle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Find every distinct dependency cycle.
///
/// Traverses from each item to its blockers. Reaching a gray vertex closes a
/// loop: the slice of the current path from that vertex onward is the cycle.
/// Cycles with the same member set are reported once, whatever the start point.
pub fn detect_cycles(graph: &DependencyGraph) -> Vec<Cycle> {
    let mut color = vec![Color::White; graph.vertex_count()];
    let mut seen: FxHashSet<Vec<IssueId>> = FxHashSet::default();
    let mut cycles = Vec::new();
    // Each frame: vertex and the cursor into its blocker list. The frame
    // stack doubles as the current DFS path.
    let mut stack: Vec<(NodeIndex, usize)> = Vec::new();

    for start in graph.vertices() {
        if color[start.index()] != Color::White {
            continue;
        }
        color[start.index()] = Color::Gray;
        stack.push((start, 0));

        while let Some(&(node, cursor)) = stack.last() {
            let Some(&(next, _)) = graph.blocked_by(node).get(cursor) else {
                color[node.index()] = Color::Black;
                stack.pop();
                continue;
            };
            if let Some(top) = stack.last_mut() {
                top.1 += 1;
            }

            match color[next.index()] {
                Color::White => {
                    color[next.index()] = Color::Gray;
                    stack.push((next, 0));
                }
                Color::Gray => {
                    if let Some(pos) = stack.iter().position(|&(n, _)| n == next) {
                        let cycle = Cycle {
                            nodes: stack[pos..].iter().map(|&(n, _)| graph.id(n)).collect(),
                        };
                        if seen.insert(cycle.key()) {
                            cycles.push(cycle);
                        }
                    }
                }
                Color::Black => {}
            }
        }
    }

    if !cycles.is_empty() {
        tracing::debug!(count = cycles.len(), "dependency cycles detected");
    }
    cycles
}
