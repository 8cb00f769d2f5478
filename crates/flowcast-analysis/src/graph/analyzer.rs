//! Configured entry point running every graph analysis over one snapshot.

use std::time::Instant;

use flowcast_core::config::GraphConfig;
use flowcast_core::errors::GraphError;
use flowcast_core::types::IssueId;

use super::dependency_graph::DependencyGraph;
use super::types::{
    BottleneckEntry, CriticalPath, Cycle, DependencyEdge, GraphAnalysisResult, GraphNode,
    IssueDependencyView,
};
use super::{bottlenecks, components, critical_path, cycles, depth, view};

/// Stateless analyzer; every call indexes its own snapshot, so one analyzer
/// can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct GraphAnalyzer {
    terminal_labels: Vec<String>,
    bottleneck_limit: usize,
    path_search_budget: u64,
}

impl GraphAnalyzer {
    pub fn new(config: &GraphConfig) -> Self {
        Self {
            terminal_labels: config.effective_terminal_labels(),
            bottleneck_limit: config.effective_bottleneck_limit(),
            path_search_budget: config.effective_path_search_budget(),
        }
    }

    /// Index a snapshot for repeated queries.
    pub fn index(&self, nodes: &[GraphNode], edges: &[DependencyEdge]) -> DependencyGraph {
        DependencyGraph::build(nodes, edges, &self.terminal_labels)
    }

    /// Run every analysis and assemble the full result.
    pub fn analyze(&self, nodes: &[GraphNode], edges: &[DependencyEdge]) -> GraphAnalysisResult {
        let start = Instant::now();
        let graph = self.index(nodes, edges);
        let result = self.analyze_indexed(&graph);
        tracing::debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            cycles = result.cycles.len(),
            critical_path_len = result.critical_path.as_ref().map_or(0, |p| p.length),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "dependency graph analyzed"
        );
        result
    }

    /// Run every analysis over an already indexed snapshot.
    pub fn analyze_indexed(&self, graph: &DependencyGraph) -> GraphAnalysisResult {
        let depths = depth::calculate_depths(graph);
        let max_depth = depths.values().copied().max().unwrap_or(0);
        GraphAnalysisResult {
            cycles: cycles::detect_cycles(graph),
            critical_path: critical_path::find_critical_path(graph, self.path_search_budget),
            bottlenecks: bottlenecks::find_bottlenecks(graph, self.bottleneck_limit),
            orphaned_blocked: bottlenecks::find_orphaned_blocked(graph),
            components: components::find_connected_components(graph),
            metrics: components::network_metrics(graph, max_depth),
            depths,
        }
    }

    pub fn detect_cycles(&self, nodes: &[GraphNode], edges: &[DependencyEdge]) -> Vec<Cycle> {
        cycles::detect_cycles(&self.index(nodes, edges))
    }

    pub fn calculate_depths(
        &self,
        nodes: &[GraphNode],
        edges: &[DependencyEdge],
    ) -> std::collections::BTreeMap<IssueId, u32> {
        depth::calculate_depths(&self.index(nodes, edges))
    }

    pub fn find_critical_path(
        &self,
        nodes: &[GraphNode],
        edges: &[DependencyEdge],
    ) -> Option<CriticalPath> {
        critical_path::find_critical_path(&self.index(nodes, edges), self.path_search_budget)
    }

    pub fn find_bottlenecks(
        &self,
        nodes: &[GraphNode],
        edges: &[DependencyEdge],
    ) -> Vec<BottleneckEntry> {
        bottlenecks::find_bottlenecks(&self.index(nodes, edges), self.bottleneck_limit)
    }

    pub fn find_orphaned_blocked(
        &self,
        nodes: &[GraphNode],
        edges: &[DependencyEdge],
    ) -> Vec<IssueId> {
        bottlenecks::find_orphaned_blocked(&self.index(nodes, edges))
    }

    pub fn find_connected_components(
        &self,
        nodes: &[GraphNode],
        edges: &[DependencyEdge],
    ) -> Vec<Vec<IssueId>> {
        components::find_connected_components(&self.index(nodes, edges))
    }

    /// All items `node_id` blocks, directly or indirectly. Empty for an id
    /// that appears nowhere in the snapshot.
    pub fn transitive_dependents(
        &self,
        node_id: IssueId,
        nodes: &[GraphNode],
        edges: &[DependencyEdge],
    ) -> Vec<IssueId> {
        let graph = self.index(nodes, edges);
        match graph.index_of(node_id) {
            Some(idx) => bottlenecks::transitive_dependents(&graph, idx)
                .into_iter()
                .map(|n| graph.id(n))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Dependency view for one item; [`GraphError::NodeNotFound`] if the id is
    /// not in the node list.
    pub fn issue_dependencies(
        &self,
        node_id: IssueId,
        nodes: &[GraphNode],
        edges: &[DependencyEdge],
    ) -> Result<IssueDependencyView, GraphError> {
        view::issue_dependencies(&self.index(nodes, edges), node_id)
    }
}

impl Default for GraphAnalyzer {
    fn default() -> Self {
        Self::new(&GraphConfig::default())
    }
}
