//! petgraph `DiGraph` wrapper indexing a dependency snapshot by issue id.
//!
//! Edges may reference ids that are absent from the node list. Those ids get a
//! placeholder vertex (`node == None`) so traversals stay total; placeholders
//! count as closed everywhere.

use flowcast_core::types::{FxHashMap, IssueId};
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use super::types::{DependencyEdge, GraphNode};

/// A vertex: a known node, or a dangling id referenced only by edges.
#[derive(Debug, Clone)]
pub struct Vertex {
    pub id: IssueId,
    pub node: Option<GraphNode>,
}

/// Adjacency entry: neighbor vertex and the edge that links it.
pub type Adjacent = (NodeIndex, EdgeIndex);

/// Underlying directed graph; an edge points from blocker to blocked.
pub type BlockingGraph = DiGraph<Vertex, DependencyEdge>;

/// Indexed, immutable view over one snapshot.
///
/// Adjacency lists keep edge-list order so traversal results are stable for
/// a given input ordering.
pub struct DependencyGraph {
    pub graph: BlockingGraph,
    index: FxHashMap<IssueId, NodeIndex>,
    blocks: Vec<Vec<Adjacent>>,
    blocked_by: Vec<Vec<Adjacent>>,
    terminal_labels: Vec<String>,
}

impl DependencyGraph {
    /// Index `nodes` and `edges`. Duplicate node ids keep the first occurrence.
    pub fn build(nodes: &[GraphNode], edges: &[DependencyEdge], terminal_labels: &[String]) -> Self {
        let mut graph = BlockingGraph::with_capacity(nodes.len(), edges.len());
        let mut index: FxHashMap<IssueId, NodeIndex> = FxHashMap::default();

        for node in nodes {
            if index.contains_key(&node.id) {
                tracing::debug!(id = node.id, "duplicate node id in snapshot, keeping first");
                continue;
            }
            let idx = graph.add_node(Vertex {
                id: node.id,
                node: Some(node.clone()),
            });
            index.insert(node.id, idx);
        }

        let mut dangling = 0usize;
        for edge in edges {
            let from = Self::ensure_vertex(&mut graph, &mut index, edge.from, &mut dangling);
            let to = Self::ensure_vertex(&mut graph, &mut index, edge.to, &mut dangling);
            graph.add_edge(from, to, *edge);
        }
        if dangling > 0 {
            tracing::debug!(dangling, "edges reference ids missing from the node list");
        }

        let mut blocks = vec![Vec::new(); graph.node_count()];
        let mut blocked_by = vec![Vec::new(); graph.node_count()];
        for edge in graph.edge_references() {
            blocks[edge.source().index()].push((edge.target(), edge.id()));
            blocked_by[edge.target().index()].push((edge.source(), edge.id()));
        }

        Self {
            graph,
            index,
            blocks,
            blocked_by,
            terminal_labels: terminal_labels.to_vec(),
        }
    }

    fn ensure_vertex(
        graph: &mut BlockingGraph,
        index: &mut FxHashMap<IssueId, NodeIndex>,
        id: IssueId,
        dangling: &mut usize,
    ) -> NodeIndex {
        *index.entry(id).or_insert_with(|| {
            *dangling += 1;
            graph.add_node(Vertex { id, node: None })
        })
    }

    pub fn index_of(&self, id: IssueId) -> Option<NodeIndex> {
        self.index.get(&id).copied()
    }

    pub fn id(&self, idx: NodeIndex) -> IssueId {
        self.graph[idx].id
    }

    /// The snapshot node, or `None` for a dangling id.
    pub fn node(&self, idx: NodeIndex) -> Option<&GraphNode> {
        self.graph[idx].node.as_ref()
    }

    pub fn is_known(&self, idx: NodeIndex) -> bool {
        self.graph[idx].node.is_some()
    }

    /// Open snapshot node. Dangling ids are never open.
    pub fn is_open(&self, idx: NodeIndex) -> bool {
        self.node(idx).is_some_and(|n| n.is_open)
    }

    pub fn is_terminal(&self, idx: NodeIndex) -> bool {
        self.node(idx)
            .is_some_and(|n| n.is_terminal(&self.terminal_labels))
    }

    /// Edges where `idx` is the blocker, in edge-list order.
    pub fn blocks(&self, idx: NodeIndex) -> &[Adjacent] {
        &self.blocks[idx.index()]
    }

    /// Edges where `idx` is blocked, in edge-list order.
    pub fn blocked_by(&self, idx: NodeIndex) -> &[Adjacent] {
        &self.blocked_by[idx.index()]
    }

    pub fn edge(&self, edge: EdgeIndex) -> &DependencyEdge {
        &self.graph[edge]
    }

    /// Resolved as supplied, or implicitly resolved because the blocker is unknown.
    pub fn is_edge_resolved(&self, edge: EdgeIndex) -> bool {
        if self.graph[edge].resolved {
            return true;
        }
        match self.graph.edge_endpoints(edge) {
            Some((blocker, _)) => !self.is_known(blocker),
            None => true,
        }
    }

    /// Unresolved edge with both endpoints open; the only edges the critical path may use.
    pub fn is_active_edge(&self, edge: EdgeIndex) -> bool {
        if self.graph[edge].resolved {
            return false;
        }
        self.graph
            .edge_endpoints(edge)
            .is_some_and(|(from, to)| self.is_open(from) && self.is_open(to))
    }

    /// All vertices in insertion order: snapshot nodes first, then dangling ids.
    pub fn vertices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Snapshot nodes only, in node-list order.
    pub fn known_vertices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices().filter(|&idx| self.is_known(idx))
    }

    pub fn has_edges(&self, idx: NodeIndex) -> bool {
        !self.blocks(idx).is_empty() || !self.blocked_by(idx).is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terminal() -> Vec<String> {
        vec!["done".to_string()]
    }

    #[test]
    fn test_dangling_ids_get_placeholder_vertices() {
        let nodes = vec![GraphNode::open(1, "one")];
        let edges = vec![DependencyEdge::unresolved(99, 1)];
        let graph = DependencyGraph::build(&nodes, &edges, &terminal());

        assert_eq!(graph.vertex_count(), 2);
        let missing = graph.index_of(99).unwrap();
        assert!(!graph.is_known(missing));
        assert!(!graph.is_open(missing));

        // An unknown blocker counts as resolved even if the flag says otherwise.
        let (_, edge) = graph.blocked_by(graph.index_of(1).unwrap())[0];
        assert!(graph.is_edge_resolved(edge));
        assert!(!graph.is_active_edge(edge));
    }

    #[test]
    fn test_adjacency_preserves_edge_order() {
        let nodes: Vec<GraphNode> = (1..=4).map(|i| GraphNode::open(i, format!("n{i}"))).collect();
        let edges = vec![
            DependencyEdge::unresolved(1, 4),
            DependencyEdge::unresolved(1, 2),
            DependencyEdge::unresolved(1, 3),
        ];
        let graph = DependencyGraph::build(&nodes, &edges, &terminal());
        let targets: Vec<IssueId> = graph
            .blocks(graph.index_of(1).unwrap())
            .iter()
            .map(|&(n, _)| graph.id(n))
            .collect();
        assert_eq!(targets, vec![4, 2, 3]);
    }

    #[test]
    fn test_duplicate_nodes_keep_first() {
        let nodes = vec![GraphNode::open(1, "first"), GraphNode::closed(1, "second")];
        let graph = DependencyGraph::build(&nodes, &[], &terminal());
        assert_eq!(graph.vertex_count(), 1);
        assert_eq!(graph.node(graph.index_of(1).unwrap()).unwrap().title, "first");
    }

    #[test]
    fn test_terminal_label_matching_is_case_insensitive() {
        let nodes = vec![GraphNode::open(1, "x").with_workflow_label(" Done ")];
        let graph = DependencyGraph::build(&nodes, &[], &terminal());
        assert!(graph.is_terminal(graph.index_of(1).unwrap()));
    }
}
