//! Shared data structures for Flowcast.

pub mod collections;
pub mod identifiers;

pub use collections::{FxHashMap, FxHashSet};
pub use identifiers::IssueId;
