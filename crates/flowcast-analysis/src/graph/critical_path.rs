//! Critical path: the longest chain of unresolved blocking edges among open items.

use petgraph::graph::NodeIndex;

use super::dependency_graph::DependencyGraph;
use super::types::CriticalPath;

/// Find the longest simple path over active edges (unresolved, both ends open).
///
/// Exhaustive DFS from every root, i.e. every open item that blocks something
/// and has no active incoming edge. When every candidate has an active
/// blocker (the active subgraph is cyclic), every item with an outgoing active
/// edge is tried instead. The first path reaching the maximal length wins;
/// equal-length alternatives are not otherwise ordered.
///
/// `budget` caps DFS expansions; when it runs out the longest path found so
/// far is returned. Returns `None` when there are no active edges.
pub fn find_critical_path(graph: &DependencyGraph, budget: u64) -> Option<CriticalPath> {
    let has_active_out =
        |idx: NodeIndex| graph.blocks(idx).iter().any(|&(_, e)| graph.is_active_edge(e));
    let has_active_in =
        |idx: NodeIndex| graph.blocked_by(idx).iter().any(|&(_, e)| graph.is_active_edge(e));

    let sources: Vec<NodeIndex> = graph
        .known_vertices()
        .filter(|&idx| graph.is_open(idx) && has_active_out(idx))
        .collect();
    if sources.is_empty() {
        return None;
    }

    let roots: Vec<NodeIndex> = sources
        .iter()
        .copied()
        .filter(|&idx| !has_active_in(idx))
        .collect();
    let starts = if roots.is_empty() {
        tracing::debug!("no critical-path roots, active subgraph is cyclic");
        sources
    } else {
        roots
    };

    let mut best: Vec<NodeIndex> = Vec::new();
    let mut on_path = vec![false; graph.vertex_count()];
    let mut stack: Vec<(NodeIndex, usize)> = Vec::new();
    let mut expansions: u64 = 0;

    'search: for start in starts {
        on_path[start.index()] = true;
        stack.push((start, 0));
        if best.is_empty() {
            best.push(start);
        }

        while let Some(&(node, cursor)) = stack.last() {
            let Some(&(next, edge)) = graph.blocks(node).get(cursor) else {
                on_path[node.index()] = false;
                stack.pop();
                continue;
            };
            if let Some(top) = stack.last_mut() {
                top.1 += 1;
            }
            if !graph.is_active_edge(edge) || on_path[next.index()] {
                continue;
            }

            expansions += 1;
            if expansions > budget {
                tracing::warn!(
                    budget,
                    best_len = best.len(),
                    "critical path search budget exhausted, returning best so far"
                );
                break 'search;
            }

            on_path[next.index()] = true;
            stack.push((next, 0));
            if stack.len() > best.len() {
                best = stack.iter().map(|&(n, _)| n).collect();
            }
        }
    }

    let nodes: Vec<_> = best.into_iter().map(|idx| graph.id(idx)).collect();
    Some(CriticalPath {
        length: nodes.len(),
        nodes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::types::{DependencyEdge, GraphNode};
    use flowcast_core::constants::DEFAULT_PATH_SEARCH_BUDGET;
    use flowcast_core::types::IssueId;

    fn open_nodes(ids: &[IssueId]) -> Vec<GraphNode> {
        ids.iter().map(|&i| GraphNode::open(i, format!("#{i}"))).collect()
    }

    fn path(nodes: &[GraphNode], edges: &[DependencyEdge]) -> Option<CriticalPath> {
        let graph = DependencyGraph::build(nodes, edges, &[]);
        find_critical_path(&graph, DEFAULT_PATH_SEARCH_BUDGET)
    }

    #[test]
    fn test_simple_chain() {
        let edges = vec![DependencyEdge::unresolved(1, 2), DependencyEdge::unresolved(2, 3)];
        let cp = path(&open_nodes(&[1, 2, 3]), &edges).unwrap();
        assert_eq!(cp.nodes, vec![1, 2, 3]);
        assert_eq!(cp.length, 3);
    }

    #[test]
    fn test_no_unresolved_edges_is_none() {
        let edges = vec![DependencyEdge::resolved(1, 2)];
        assert!(path(&open_nodes(&[1, 2]), &edges).is_none());
        assert!(path(&open_nodes(&[1, 2]), &[]).is_none());
    }

    #[test]
    fn test_closed_nodes_break_the_chain() {
        let mut nodes = open_nodes(&[1, 3, 4]);
        nodes.push(GraphNode::closed(2, "#2"));
        let edges = vec![
            DependencyEdge::unresolved(1, 2),
            DependencyEdge::unresolved(2, 3),
            DependencyEdge::unresolved(3, 4),
        ];
        let cp = path(&nodes, &edges).unwrap();
        assert_eq!(cp.nodes, vec![3, 4]);
    }

    #[test]
    fn test_longest_branch_wins_and_first_tie_kept() {
        let edges = vec![
            DependencyEdge::unresolved(1, 2),
            DependencyEdge::unresolved(1, 3),
            DependencyEdge::unresolved(3, 4),
            DependencyEdge::unresolved(5, 6),
            DependencyEdge::unresolved(6, 7),
        ];
        let cp = path(&open_nodes(&[1, 2, 3, 4, 5, 6, 7]), &edges).unwrap();
        // [1,3,4] and [5,6,7] tie; root 1 is explored first.
        assert_eq!(cp.nodes, vec![1, 3, 4]);
    }

    #[test]
    fn test_cycle_only_falls_back_to_all_sources() {
        let edges = vec![
            DependencyEdge::unresolved(1, 2),
            DependencyEdge::unresolved(2, 3),
            DependencyEdge::unresolved(3, 1),
        ];
        let cp = path(&open_nodes(&[1, 2, 3]), &edges).unwrap();
        assert_eq!(cp.length, 3);
        assert_eq!(cp.nodes, vec![1, 2, 3]);
    }

    #[test]
    fn test_budget_returns_best_so_far() {
        let ids: Vec<IssueId> = (1..=10).collect();
        let edges: Vec<DependencyEdge> = (1..10).map(|i| DependencyEdge::unresolved(i, i + 1)).collect();
        let graph = DependencyGraph::build(&open_nodes(&ids), &edges, &[]);
        let cp = find_critical_path(&graph, 3).unwrap();
        assert_eq!(cp.nodes, vec![1, 2, 3, 4]);
    }
}
