//! Identifier types shared by the graph and forecasting engines.

/// Issue / work-item number as assigned by the tracker (e.g. `#123`).
pub type IssueId = u64;
