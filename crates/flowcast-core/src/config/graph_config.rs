//! Dependency graph analyzer configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BOTTLENECK_LIMIT, DEFAULT_PATH_SEARCH_BUDGET, DEFAULT_TERMINAL_LABELS,
};

/// Configuration for the dependency graph analyzer.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GraphConfig {
    /// Workflow labels that mark an item as finished. Default: done, released, shipped.
    #[serde(default)]
    pub terminal_labels: Vec<String>,
    /// Maximum bottlenecks reported. Default: 10.
    pub bottleneck_limit: Option<usize>,
    /// DFS expansion budget for the critical-path search. Default: 1,000,000.
    pub path_search_budget: Option<u64>,
}

impl GraphConfig {
    /// Returns the effective terminal labels, lowercased.
    pub fn effective_terminal_labels(&self) -> Vec<String> {
        if self.terminal_labels.is_empty() {
            DEFAULT_TERMINAL_LABELS.iter().map(|s| s.to_string()).collect()
        } else {
            self.terminal_labels
                .iter()
                .map(|s| s.trim().to_ascii_lowercase())
                .collect()
        }
    }

    /// Returns the effective bottleneck limit, defaulting to 10.
    pub fn effective_bottleneck_limit(&self) -> usize {
        self.bottleneck_limit.unwrap_or(DEFAULT_BOTTLENECK_LIMIT).max(1)
    }

    /// Returns the effective path search budget, defaulting to 1,000,000.
    pub fn effective_path_search_budget(&self) -> u64 {
        self.path_search_budget
            .unwrap_or(DEFAULT_PATH_SEARCH_BUDGET)
            .max(1)
    }
}
