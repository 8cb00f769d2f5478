//! Connected components and network metrics.

use std::collections::{BTreeMap, VecDeque};

use flowcast_core::types::IssueId;

use super::dependency_graph::DependencyGraph;
use super::types::NetworkMetrics;
use crate::stats::round_to;

/// Partition the vertices that have at least one edge into weakly connected
/// components (BFS over blocks ∪ blocked-by). Components appear in order of
/// their first vertex; members in BFS order.
pub fn find_connected_components(graph: &DependencyGraph) -> Vec<Vec<IssueId>> {
    let mut visited = vec![false; graph.vertex_count()];
    let mut components = Vec::new();
    let mut queue = VecDeque::new();

    for start in graph.vertices() {
        if visited[start.index()] || !graph.has_edges(start) {
            continue;
        }
        visited[start.index()] = true;
        queue.push_back(start);
        let mut component = Vec::new();

        while let Some(node) = queue.pop_front() {
            component.push(graph.id(node));
            let neighbors = graph
                .blocks(node)
                .iter()
                .chain(graph.blocked_by(node).iter())
                .map(|&(n, _)| n);
            for next in neighbors {
                if !visited[next.index()] {
                    visited[next.index()] = true;
                    queue.push_back(next);
                }
            }
        }
        components.push(component);
    }
    components
}

/// Degree, density, and size metrics. `max_depth` comes from the depth pass.
///
/// Density is `edges / (n·(n−1))` over the `n` vertices with at least one
/// edge, rounded to 4 decimal places, and 0 when `n ≤ 1`.
pub fn network_metrics(graph: &DependencyGraph, max_depth: u32) -> NetworkMetrics {
    let mut in_degree: BTreeMap<IssueId, usize> = BTreeMap::new();
    let mut out_degree: BTreeMap<IssueId, usize> = BTreeMap::new();
    let mut connected = 0usize;
    let mut degree_sum = 0usize;

    for idx in graph.vertices() {
        if !graph.has_edges(idx) {
            continue;
        }
        let indeg = graph.blocked_by(idx).len();
        let outdeg = graph.blocks(idx).len();
        in_degree.insert(graph.id(idx), indeg);
        out_degree.insert(graph.id(idx), outdeg);
        degree_sum += indeg + outdeg;
        connected += 1;
    }

    let total_edges = graph.edge_count();
    let avg_degree = if connected == 0 {
        0.0
    } else {
        degree_sum as f64 / connected as f64
    };
    let density = if connected <= 1 {
        0.0
    } else {
        let n = connected as f64;
        round_to(total_edges as f64 / (n * (n - 1.0)), 4)
    };

    let unresolved_edges = graph
        .graph
        .edge_indices()
        .filter(|&e| !graph.is_edge_resolved(e))
        .count();

    NetworkMetrics {
        total_nodes: graph.known_vertices().count(),
        total_edges,
        open_nodes: graph.known_vertices().filter(|&i| graph.is_open(i)).count(),
        unresolved_edges,
        connected_nodes: connected,
        max_depth,
        avg_degree,
        density,
        in_degree,
        out_degree,
    }
}
