//! Shared constants for the Flowcast engines.

/// Flowcast version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default number of Monte Carlo trials.
pub const DEFAULT_TRIALS: u32 = 10_000;

/// Hard upper bound on Monte Carlo trials per forecast.
pub const MAX_TRIALS: u32 = 50_000;

/// Default WIP limit (concurrent simulation slots).
pub const DEFAULT_WIP_LIMIT: u32 = 3;

/// Upper bound on WIP slots per trial.
pub const MAX_WIP_LIMIT: u32 = 1_000;

/// Default sprint length in days.
pub const DEFAULT_SPRINT_DAYS: f64 = 14.0;

/// Simulation time step in days.
pub const SIMULATION_STEP_DAYS: f64 = 0.25;

/// Backlog trials stop after this many simulated days.
pub const MAX_SIMULATED_DAYS: f64 = 365.0;

/// Cycle-time samples must be strictly below this many days.
pub const MAX_CYCLE_TIME_DAYS: f64 = 90.0;

/// Area-filtered sample sets smaller than this fall back to all samples.
pub const DEFAULT_MIN_AREA_SAMPLES: usize = 5;

/// Sample sets smaller than this are replaced by a synthetic distribution.
pub const DEFAULT_MIN_SAMPLES: usize = 3;

/// Number of synthetic samples generated when history is too sparse.
pub const SYNTHETIC_SAMPLE_COUNT: usize = 20;

/// Synthetic samples are drawn uniformly from `[min, max)` days.
pub const SYNTHETIC_MIN_DAYS: f64 = 3.0;
pub const SYNTHETIC_MAX_DAYS: f64 = 7.0;

/// Maximum sprint trials per breakdown point in a backlog forecast.
pub const DEFAULT_BREAKDOWN_TRIAL_CAP: u32 = 2_000;

/// Maximum number of sprints reported in a backlog breakdown.
pub const DEFAULT_MAX_BREAKDOWN_SPRINTS: u32 = 26;

/// Default number of bottlenecks reported.
pub const DEFAULT_BOTTLENECK_LIMIT: usize = 10;

/// Default DFS expansion budget for the critical-path search.
pub const DEFAULT_PATH_SEARCH_BUDGET: u64 = 1_000_000;

/// Workflow labels treated as terminal when none are configured.
pub const DEFAULT_TERMINAL_LABELS: &[&str] = &["done", "released", "shipped"];
