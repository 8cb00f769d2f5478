//! Dependency graph errors.

use super::error_code::{self, FlowcastErrorCode};

/// Errors surfaced by dependency graph queries.
///
/// Malformed input (dangling edges, cycles) is never an error; it is
/// reported as data. Only lookups of an id absent from the snapshot fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("Node #{id} is not part of the dependency graph")]
    NodeNotFound { id: u64 },
}

impl FlowcastErrorCode for GraphError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NodeNotFound { .. } => error_code::NODE_NOT_FOUND,
        }
    }
}
