//! Monte Carlo forecasting configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BREAKDOWN_TRIAL_CAP, DEFAULT_MAX_BREAKDOWN_SPRINTS, DEFAULT_MIN_AREA_SAMPLES,
    DEFAULT_MIN_SAMPLES, DEFAULT_SPRINT_DAYS, DEFAULT_TRIALS, DEFAULT_WIP_LIMIT, MAX_TRIALS,
    MAX_WIP_LIMIT,
};

/// Configuration for the forecasting subsystem.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ForecastConfig {
    /// Monte Carlo trials per forecast. Default: 10,000, max 50,000.
    pub trials: Option<u32>,
    /// Concurrent work-in-progress slots. Default: 3, max 1,000.
    pub wip_limit: Option<u32>,
    /// Sprint length in days. Default: 14.
    pub sprint_days: Option<f64>,
    /// Fixed RNG seed for reproducible forecasts.
    pub seed: Option<u64>,
    /// Run trials on the rayon thread pool. Default: false.
    pub parallel: Option<bool>,
    /// Max sprint trials per backlog breakdown point. Default: 2,000.
    pub breakdown_trial_cap: Option<u32>,
    /// Max sprints in a backlog breakdown. Default: 26.
    pub max_breakdown_sprints: Option<u32>,
    /// Minimum area-filtered samples before the filter is dropped. Default: 5.
    pub min_area_samples: Option<usize>,
    /// Minimum samples before a synthetic distribution is used. Default: 3.
    pub min_samples: Option<usize>,
}

impl ForecastConfig {
    /// Returns the effective trial count, clamped to `[1, 50_000]`.
    pub fn effective_trials(&self) -> u32 {
        self.trials.unwrap_or(DEFAULT_TRIALS).clamp(1, MAX_TRIALS)
    }

    /// Returns the effective WIP limit, clamped to `[1, 1_000]`.
    pub fn effective_wip_limit(&self) -> u32 {
        self.wip_limit
            .unwrap_or(DEFAULT_WIP_LIMIT)
            .clamp(1, MAX_WIP_LIMIT)
    }

    /// Returns the effective sprint length in days, defaulting to 14.
    pub fn effective_sprint_days(&self) -> f64 {
        self.sprint_days.unwrap_or(DEFAULT_SPRINT_DAYS)
    }

    /// Returns whether trials run in parallel, defaulting to false.
    pub fn effective_parallel(&self) -> bool {
        self.parallel.unwrap_or(false)
    }

    /// Returns the effective breakdown trial cap, defaulting to 2,000.
    pub fn effective_breakdown_trial_cap(&self) -> u32 {
        self.breakdown_trial_cap
            .unwrap_or(DEFAULT_BREAKDOWN_TRIAL_CAP)
            .max(1)
    }

    /// Returns the effective max breakdown sprints, defaulting to 26.
    pub fn effective_max_breakdown_sprints(&self) -> u32 {
        self.max_breakdown_sprints
            .unwrap_or(DEFAULT_MAX_BREAKDOWN_SPRINTS)
            .max(1)
    }

    /// Returns the effective minimum area sample count, defaulting to 5.
    pub fn effective_min_area_samples(&self) -> usize {
        self.min_area_samples
            .unwrap_or(DEFAULT_MIN_AREA_SAMPLES)
            .max(1)
    }

    /// Returns the effective minimum sample count, defaulting to 3.
    pub fn effective_min_samples(&self) -> usize {
        self.min_samples.unwrap_or(DEFAULT_MIN_SAMPLES).max(1)
    }
}
