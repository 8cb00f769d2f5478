//! Dependency graph analyzer tests over realistic snapshots.

use flowcast_analysis::graph::*;
use flowcast_core::config::GraphConfig;
use flowcast_core::errors::{FlowcastErrorCode, GraphError};

fn open(ids: &[u64]) -> Vec<GraphNode> {
    ids.iter().map(|&i| GraphNode::open(i, format!("Issue {i}"))).collect()
}

/// A release train: 10 blocks 11 and 12, both block 13, 13 blocks 14.
/// 20 blocks 21 but is already closed; 30 is isolated.
fn release_train() -> (Vec<GraphNode>, Vec<DependencyEdge>) {
    let mut nodes = open(&[10, 11, 12, 13, 14, 21, 30]);
    nodes.push(GraphNode::closed(20, "Legacy cleanup"));
    let edges = vec![
        DependencyEdge::unresolved(10, 11),
        DependencyEdge::unresolved(10, 12),
        DependencyEdge::unresolved(11, 13),
        DependencyEdge::unresolved(12, 13),
        DependencyEdge::unresolved(13, 14),
        DependencyEdge::resolved(20, 21),
    ];
    (nodes, edges)
}

#[test]
fn chain_critical_path_and_transitive_reach() {
    let analyzer = GraphAnalyzer::default();
    let nodes = open(&[1, 2, 3]);
    let edges = vec![DependencyEdge::unresolved(1, 2), DependencyEdge::unresolved(2, 3)];

    let result = analyzer.analyze(&nodes, &edges);
    let cp = result.critical_path.expect("chain has a critical path");
    assert_eq!(cp.nodes, vec![1, 2, 3]);
    assert_eq!(cp.length, 3);

    let top = &result.bottlenecks[0];
    assert_eq!(top.node_id, 1);
    assert_eq!(top.transitive_blocks, 2);
    assert_eq!(top.direct_blocks, 1);

    let mut reach = analyzer.transitive_dependents(1, &nodes, &edges);
    reach.sort_unstable();
    assert_eq!(reach, vec![2, 3]);
}

#[test]
fn release_train_full_analysis() {
    let (nodes, edges) = release_train();
    let result = GraphAnalyzer::default().analyze(&nodes, &edges);

    assert!(!result.has_cycles());
    assert_eq!(result.depths[&10], 0);
    assert_eq!(result.depths[&11], 1);
    assert_eq!(result.depths[&13], 2);
    assert_eq!(result.depths[&14], 3);
    assert_eq!(result.depths[&30], 0);
    assert_eq!(result.metrics.max_depth, 3);

    let cp = result.critical_path.unwrap();
    assert_eq!(cp.length, 4);
    assert_eq!(cp.nodes.first(), Some(&10));
    assert_eq!(cp.nodes.last(), Some(&14));

    assert_eq!(result.orphaned_blocked, vec![21]);
    assert_eq!(result.components.len(), 2);
    assert_eq!(result.metrics.total_edges, 6);
    assert_eq!(result.metrics.connected_nodes, 7);

    let top = &result.bottlenecks[0];
    assert_eq!(top.node_id, 10);
    assert_eq!(top.transitive_blocks, 4);
    assert_eq!(top.severity, BottleneckSeverity::High);
}

#[test]
fn three_cycle_reported_once() {
    let nodes = open(&[1, 2, 3]);
    let edges = vec![
        DependencyEdge::unresolved(1, 2),
        DependencyEdge::unresolved(2, 3),
        DependencyEdge::unresolved(3, 1),
    ];
    let cycles = GraphAnalyzer::default().detect_cycles(&nodes, &edges);
    assert_eq!(cycles.len(), 1);
    let mut members = cycles[0].nodes.clone();
    members.sort_unstable();
    assert_eq!(members, vec![1, 2, 3]);
}

#[test]
fn terminal_labels_from_config() {
    let nodes = vec![
        GraphNode::open(1, "Waiting on release").with_workflow_label("Shipped"),
        GraphNode::open(2, "Downstream"),
        GraphNode::open(3, "Shelved").with_workflow_label("Archived"),
        GraphNode::open(4, "Downstream"),
    ];
    let edges = vec![DependencyEdge::unresolved(1, 2), DependencyEdge::unresolved(3, 4)];

    let default = GraphAnalyzer::default().find_bottlenecks(&nodes, &edges);
    assert_eq!(default.iter().map(|b| b.node_id).collect::<Vec<_>>(), vec![3]);

    let config = GraphConfig {
        terminal_labels: vec!["archived".to_string()],
        ..GraphConfig::default()
    };
    let custom = GraphAnalyzer::new(&config).find_bottlenecks(&nodes, &edges);
    assert_eq!(custom.iter().map(|b| b.node_id).collect::<Vec<_>>(), vec![1]);
}

#[test]
fn dangling_blockers_are_ignored_for_depth() {
    let nodes = open(&[1]);
    let edges = vec![DependencyEdge::unresolved(99, 1)];
    let analyzer = GraphAnalyzer::default();
    let depths = analyzer.calculate_depths(&nodes, &edges);
    assert_eq!(depths[&1], 0);
    assert!(analyzer.find_critical_path(&nodes, &edges).is_none());
    assert_eq!(analyzer.find_orphaned_blocked(&nodes, &edges), vec![1]);
}

#[test]
fn issue_view_and_not_found() {
    let (nodes, edges) = release_train();
    let analyzer = GraphAnalyzer::default();

    let view = analyzer.issue_dependencies(13, &nodes, &edges).unwrap();
    assert_eq!(view.title, "Issue 13");
    assert!(!view.is_unblocked);
    assert_eq!(view.downstream_chain, vec![14]);
    assert_eq!(view.execution_order, vec![10, 11, 12, 13]);

    let err = analyzer.issue_dependencies(404, &nodes, &edges).unwrap_err();
    assert_eq!(err, GraphError::NodeNotFound { id: 404 });
    assert_eq!(err.error_code(), "NODE_NOT_FOUND");

    assert!(analyzer.transitive_dependents(404, &nodes, &edges).is_empty());
}

#[test]
fn empty_snapshot() {
    let result = GraphAnalyzer::default().analyze(&[], &[]);
    assert!(result.cycles.is_empty());
    assert!(result.critical_path.is_none());
    assert!(result.bottlenecks.is_empty());
    assert!(result.components.is_empty());
    assert_eq!(result.metrics.density, 0.0);
    assert_eq!(result.metrics.avg_degree, 0.0);
}

#[test]
fn result_serializes_to_snake_case_json() {
    let (nodes, edges) = release_train();
    let result = GraphAnalyzer::default().analyze(&nodes, &edges);
    let json = serde_json::to_value(&result).unwrap();
    assert!(json.get("critical_path").is_some());
    assert!(json.get("orphaned_blocked").is_some());
    assert_eq!(json["metrics"]["total_edges"], 6);
    assert_eq!(json["bottlenecks"][0]["severity"], "high");
}
