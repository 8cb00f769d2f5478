//! Dependency graph analyzer: what is blocking what, and how badly.
//!
//! Consumes a `{nodes, edges}` snapshot from a graph data provider and derives:
//! - **Cycles**: three-color DFS, deduplicated by member set
//! - **Depths**: memoized longest path from the roots
//! - **Critical path**: longest unresolved chain among open items
//! - **Bottlenecks**: items ranked by transitive blocking reach
//! - **Orphaned-blocked**: open items whose blockers are all resolved
//! - **Components & metrics**: weak connectivity, degree, density
//!
//! All traversals use explicit stacks. Nothing here fails on malformed input;
//! dangling edge endpoints are treated as closed.

pub mod analyzer;
pub mod bottlenecks;
pub mod components;
pub mod critical_path;
pub mod cycles;
pub mod dependency_graph;
pub mod depth;
pub mod types;
pub mod view;

pub use analyzer::GraphAnalyzer;
pub use dependency_graph::DependencyGraph;
pub use types::*;
