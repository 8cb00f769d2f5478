//! Bottleneck ranking, transitive dependents, and orphaned-blocked detection.

use flowcast_core::types::{FxHashSet, IssueId};
use petgraph::graph::NodeIndex;

use super::dependency_graph::DependencyGraph;
use super::types::{BottleneckEntry, BottleneckSeverity};

/// Every vertex reachable by following "blocks" edges from `start`, excluding
/// `start` itself. Discovery order, explicit-stack DFS.
pub fn transitive_dependents(graph: &DependencyGraph, start: NodeIndex) -> Vec<NodeIndex> {
    let mut visited = vec![false; graph.vertex_count()];
    visited[start.index()] = true;
    let mut found = Vec::new();
    let mut stack = vec![start];

    while let Some(node) = stack.pop() {
        // Reverse push keeps edge-list order on pop.
        for &(next, _) in graph.blocks(node).iter().rev() {
            if !visited[next.index()] {
                visited[next.index()] = true;
                found.push(next);
                stack.push(next);
            }
        }
    }
    found
}

/// Distinct items `idx` blocks directly, self-loops excluded.
pub fn direct_dependents(graph: &DependencyGraph, idx: NodeIndex) -> usize {
    let targets: FxHashSet<NodeIndex> = graph
        .blocks(idx)
        .iter()
        .map(|&(n, _)| n)
        .filter(|&n| n != idx)
        .collect();
    targets.len()
}

/// Open, non-terminal items that block something, ranked by transitive reach.
/// Ties keep snapshot order. At most `limit` entries.
pub fn find_bottlenecks(graph: &DependencyGraph, limit: usize) -> Vec<BottleneckEntry> {
    let mut entries: Vec<BottleneckEntry> = graph
        .known_vertices()
        .filter(|&idx| graph.is_open(idx) && !graph.is_terminal(idx))
        .filter_map(|idx| {
            let direct_blocks = direct_dependents(graph, idx);
            if direct_blocks == 0 {
                return None;
            }
            let transitive_blocks = transitive_dependents(graph, idx).len();
            Some(BottleneckEntry {
                node_id: graph.id(idx),
                title: graph.node(idx).map(|n| n.title.clone()).unwrap_or_default(),
                direct_blocks,
                transitive_blocks,
                severity: BottleneckSeverity::from_transitive_blocks(transitive_blocks),
            })
        })
        .collect();

    entries.sort_by(|a, b| b.transitive_blocks.cmp(&a.transitive_blocks));
    entries.truncate(limit);
    entries
}

/// Open items that are still marked blocked although every blocker is resolved.
pub fn find_orphaned_blocked(graph: &DependencyGraph) -> Vec<IssueId> {
    graph
        .known_vertices()
        .filter(|&idx| graph.is_open(idx))
        .filter(|&idx| {
            let blockers = graph.blocked_by(idx);
            !blockers.is_empty() && blockers.iter().all(|&(_, e)| graph.is_edge_resolved(e))
        })
        .map(|idx| graph.id(idx))
        .collect()
}
