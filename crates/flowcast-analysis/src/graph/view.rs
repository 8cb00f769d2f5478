//! Single-item dependency view: direct links, chains, and an execution order.

use std::collections::BTreeSet;

use flowcast_core::errors::GraphError;
use flowcast_core::types::{FxHashMap, FxHashSet, IssueId};
use petgraph::graph::NodeIndex;

use super::bottlenecks::transitive_dependents;
use super::dependency_graph::{Adjacent, DependencyGraph};
use super::types::{EdgeSummary, IssueDependencyView};

/// Build the dependency view for `id`.
///
/// Ids that only appear as dangling edge endpoints are not part of the
/// snapshot and yield [`GraphError::NodeNotFound`].
pub fn issue_dependencies(
    graph: &DependencyGraph,
    id: IssueId,
) -> Result<IssueDependencyView, GraphError> {
    let idx = graph
        .index_of(id)
        .filter(|&idx| graph.is_known(idx))
        .ok_or(GraphError::NodeNotFound { id })?;
    let title = graph.node(idx).map(|n| n.title.clone()).unwrap_or_default();

    let blocked_by = summarize(graph, graph.blocked_by(idx));
    let blocks = summarize(graph, graph.blocks(idx));
    let is_unblocked = blocked_by.iter().all(|e| e.resolved);

    let upstream = upstream_chain(graph, idx);
    let downstream_chain = transitive_dependents(graph, idx)
        .into_iter()
        .map(|n| graph.id(n))
        .collect();

    let mut execution_order = execution_order(graph, &upstream);
    execution_order.push(id);

    Ok(IssueDependencyView {
        node_id: id,
        title,
        blocked_by,
        blocks,
        upstream_chain: upstream.iter().map(|&n| graph.id(n)).collect(),
        downstream_chain,
        is_unblocked,
        execution_order,
    })
}

fn summarize(graph: &DependencyGraph, links: &[Adjacent]) -> Vec<EdgeSummary> {
    links
        .iter()
        .map(|&(other, edge)| EdgeSummary {
            node_id: graph.id(other),
            title: graph.node(other).map(|n| n.title.clone()),
            resolved: graph.is_edge_resolved(edge),
        })
        .collect()
}

/// Transitive blockers of `start` through unresolved edges, discovery order.
fn upstream_chain(graph: &DependencyGraph, start: NodeIndex) -> Vec<NodeIndex> {
    let mut visited = vec![false; graph.vertex_count()];
    visited[start.index()] = true;
    let mut found = Vec::new();
    let mut stack = vec![start];

    while let Some(node) = stack.pop() {
        for &(blocker, edge) in graph.blocked_by(node).iter().rev() {
            if visited[blocker.index()] || graph.is_edge_resolved(edge) {
                continue;
            }
            visited[blocker.index()] = true;
            found.push(blocker);
            stack.push(blocker);
        }
    }
    found
}

/// Kahn's algorithm over the open members of `chain`, lowest id first among
/// ready items. Members left over by a cycle are appended in id order.
fn execution_order(graph: &DependencyGraph, chain: &[NodeIndex]) -> Vec<IssueId> {
    let members: FxHashSet<NodeIndex> = chain
        .iter()
        .copied()
        .filter(|&n| graph.is_open(n))
        .collect();

    let mut pending: FxHashMap<NodeIndex, usize> = FxHashMap::default();
    for &node in &members {
        let count = graph
            .blocked_by(node)
            .iter()
            .filter(|&&(b, e)| members.contains(&b) && b != node && !graph.is_edge_resolved(e))
            .count();
        pending.insert(node, count);
    }

    let mut ready: BTreeSet<(IssueId, NodeIndex)> = pending
        .iter()
        .filter(|&(_, &count)| count == 0)
        .map(|(&n, _)| (graph.id(n), n))
        .collect();
    let mut order = Vec::with_capacity(members.len());

    while let Some(entry) = ready.pop_first() {
        let (id, node) = entry;
        order.push(id);
        pending.remove(&node);
        for &(next, edge) in graph.blocks(node) {
            if next == node || graph.is_edge_resolved(edge) {
                continue;
            }
            if let Some(count) = pending.get_mut(&next) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    ready.insert((graph.id(next), next));
                }
            }
        }
    }

    if !pending.is_empty() {
        let mut leftover: Vec<IssueId> = pending.keys().map(|&n| graph.id(n)).collect();
        leftover.sort_unstable();
        tracing::debug!(count = leftover.len(), "cyclic blockers appended to execution order");
        order.extend(leftover);
    }
    order
}
