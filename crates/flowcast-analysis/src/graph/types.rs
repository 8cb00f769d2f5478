//! Dependency graph types: input snapshot and analysis results.

use std::collections::{BTreeMap, BTreeSet};

use flowcast_core::types::IssueId;
use serde::{Deserialize, Serialize};

/// A work item in the dependency snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: IssueId,
    pub title: String,
    pub is_open: bool,
    /// Workflow/status label (e.g. "in-progress", "done").
    #[serde(default)]
    pub workflow_label: Option<String>,
    #[serde(default)]
    pub labels: BTreeSet<String>,
}

impl GraphNode {
    /// An open node with no workflow label.
    pub fn open(id: IssueId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            is_open: true,
            workflow_label: None,
            labels: BTreeSet::new(),
        }
    }

    /// A closed node with no workflow label.
    pub fn closed(id: IssueId, title: impl Into<String>) -> Self {
        Self {
            is_open: false,
            ..Self::open(id, title)
        }
    }

    pub fn with_workflow_label(mut self, label: impl Into<String>) -> Self {
        self.workflow_label = Some(label.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.insert(label.into());
        self
    }

    /// Whether the workflow label matches one of the (lowercased) terminal labels.
    pub fn is_terminal(&self, terminal_labels: &[String]) -> bool {
        self.workflow_label.as_deref().is_some_and(|label| {
            let label = label.trim().to_ascii_lowercase();
            terminal_labels.iter().any(|t| *t == label)
        })
    }
}

/// `from` blocks `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub from: IssueId,
    pub to: IssueId,
    /// True when the blocker is closed or has reached a terminal workflow label.
    pub resolved: bool,
}

impl DependencyEdge {
    pub fn new(from: IssueId, to: IssueId, resolved: bool) -> Self {
        Self { from, to, resolved }
    }

    pub fn unresolved(from: IssueId, to: IssueId) -> Self {
        Self::new(from, to, false)
    }

    pub fn resolved(from: IssueId, to: IssueId) -> Self {
        Self::new(from, to, true)
    }
}

/// A dependency cycle, in traversal order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycle {
    pub nodes: Vec<IssueId>,
}

impl Cycle {
    /// Sorted member set, used as the deduplication key.
    pub fn key(&self) -> Vec<IssueId> {
        let mut key = self.nodes.clone();
        key.sort_unstable();
        key.dedup();
        key
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Longest chain of unresolved blocking edges among open nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriticalPath {
    pub nodes: Vec<IssueId>,
    pub length: usize,
}

/// Bottleneck severity, from transitive blocking reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BottleneckSeverity {
    Medium,
    High,
    Critical,
}

impl BottleneckSeverity {
    /// ≥ 5 transitive dependents → critical, ≥ 3 → high, else medium.
    pub fn from_transitive_blocks(transitive: usize) -> Self {
        if transitive >= 5 {
            Self::Critical
        } else if transitive >= 3 {
            Self::High
        } else {
            Self::Medium
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for BottleneckSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BottleneckEntry {
    pub node_id: IssueId,
    pub title: String,
    /// Distinct items this node blocks directly.
    pub direct_blocks: usize,
    /// All items reachable through "blocks" edges.
    pub transitive_blocks: usize,
    pub severity: BottleneckSeverity,
}

/// Connectivity metrics for the whole snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct NetworkMetrics {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub open_nodes: usize,
    pub unresolved_edges: usize,
    /// Vertices with at least one edge (dangling ids included).
    pub connected_nodes: usize,
    pub max_depth: u32,
    pub avg_degree: f64,
    pub density: f64,
    pub in_degree: BTreeMap<IssueId, usize>,
    pub out_degree: BTreeMap<IssueId, usize>,
}

/// Everything the analyzer derives from one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphAnalysisResult {
    pub cycles: Vec<Cycle>,
    pub depths: BTreeMap<IssueId, u32>,
    pub critical_path: Option<CriticalPath>,
    pub bottlenecks: Vec<BottleneckEntry>,
    pub orphaned_blocked: Vec<IssueId>,
    pub components: Vec<Vec<IssueId>>,
    pub metrics: NetworkMetrics,
}

impl GraphAnalysisResult {
    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }
}

/// One side of a blocking relationship as seen from a single node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSummary {
    pub node_id: IssueId,
    /// None when the id is absent from the snapshot.
    pub title: Option<String>,
    pub resolved: bool,
}

/// Single-node dependency view for downstream report builders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueDependencyView {
    pub node_id: IssueId,
    pub title: String,
    pub blocked_by: Vec<EdgeSummary>,
    pub blocks: Vec<EdgeSummary>,
    /// Transitive blockers through unresolved edges.
    pub upstream_chain: Vec<IssueId>,
    /// Transitive dependents through any edge.
    pub downstream_chain: Vec<IssueId>,
    /// True when every blocking edge is resolved (or there are none).
    pub is_unblocked: bool,
    /// Open upstream items in dependency order, ending with this node.
    pub execution_order: Vec<IssueId>,
}
