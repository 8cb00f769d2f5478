//! Top-level Flowcast configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ForecastConfig, GraphConfig};
use crate::constants::{MAX_TRIALS, MAX_WIP_LIMIT};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`FLOWCAST_*`)
/// 3. Project config (`flowcast.toml` in project root)
/// 4. User config (`~/.flowcast/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FlowcastConfig {
    pub graph: GraphConfig,
    pub forecast: ForecastConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub trials: Option<u32>,
    pub wip_limit: Option<u32>,
    pub sprint_days: Option<f64>,
    pub seed: Option<u64>,
    pub parallel: Option<bool>,
}

impl FlowcastConfig {
    /// Load configuration with layered resolution.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        // Layer 3: project config
        let project_config_path = root.join("flowcast.toml");
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        tracing::debug!(
            trials = config.forecast.effective_trials(),
            wip_limit = config.forecast.effective_wip_limit(),
            "flowcast config resolved"
        );
        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &FlowcastConfig) -> Result<(), ConfigError> {
        if let Some(trials) = config.forecast.trials {
            if trials == 0 || trials > MAX_TRIALS {
                return Err(ConfigError::ValidationFailed {
                    field: "forecast.trials".to_string(),
                    message: format!("must be between 1 and {MAX_TRIALS}"),
                });
            }
        }
        if let Some(wip) = config.forecast.wip_limit {
            if wip == 0 || wip > MAX_WIP_LIMIT {
                return Err(ConfigError::ValidationFailed {
                    field: "forecast.wip_limit".to_string(),
                    message: format!("must be between 1 and {MAX_WIP_LIMIT}"),
                });
            }
        }
        if let Some(days) = config.forecast.sprint_days {
            if !(days.is_finite() && days > 0.0) {
                return Err(ConfigError::ValidationFailed {
                    field: "forecast.sprint_days".to_string(),
                    message: "must be a positive number of days".to_string(),
                });
            }
        }
        let forecast = &config.forecast;
        let graph = &config.graph;
        let at_least_one = [
            ("forecast.breakdown_trial_cap", forecast.breakdown_trial_cap.map(u64::from)),
            ("forecast.max_breakdown_sprints", forecast.max_breakdown_sprints.map(u64::from)),
            ("forecast.min_area_samples", forecast.min_area_samples.map(|v| v as u64)),
            ("forecast.min_samples", forecast.min_samples.map(|v| v as u64)),
            ("graph.bottleneck_limit", graph.bottleneck_limit.map(|v| v as u64)),
            ("graph.path_search_budget", graph.path_search_budget),
        ];
        for (field, value) in at_least_one {
            if value == Some(0) {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Returns the user config path: `~/.flowcast/config.toml`.
    fn user_config_path() -> Option<std::path::PathBuf> {
        dirs_path().map(|d| d.join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut FlowcastConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: FlowcastConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`. Set values in `other` win.
    fn merge(base: &mut FlowcastConfig, other: &FlowcastConfig) {
        // Graph
        if !other.graph.terminal_labels.is_empty() {
            base.graph.terminal_labels = other.graph.terminal_labels.clone();
        }
        if other.graph.bottleneck_limit.is_some() {
            base.graph.bottleneck_limit = other.graph.bottleneck_limit;
        }
        if other.graph.path_search_budget.is_some() {
            base.graph.path_search_budget = other.graph.path_search_budget;
        }

        // Forecast
        let (b, o) = (&mut base.forecast, &other.forecast);
        if o.trials.is_some() {
            b.trials = o.trials;
        }
        if o.wip_limit.is_some() {
            b.wip_limit = o.wip_limit;
        }
        if o.sprint_days.is_some() {
            b.sprint_days = o.sprint_days;
        }
        if o.seed.is_some() {
            b.seed = o.seed;
        }
        if o.parallel.is_some() {
            b.parallel = o.parallel;
        }
        if o.breakdown_trial_cap.is_some() {
            b.breakdown_trial_cap = o.breakdown_trial_cap;
        }
        if o.max_breakdown_sprints.is_some() {
            b.max_breakdown_sprints = o.max_breakdown_sprints;
        }
        if o.min_area_samples.is_some() {
            b.min_area_samples = o.min_area_samples;
        }
        if o.min_samples.is_some() {
            b.min_samples = o.min_samples;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `FLOWCAST_FORECAST_TRIALS`, `FLOWCAST_GRAPH_BOTTLENECK_LIMIT`, etc.
    fn apply_env_overrides(config: &mut FlowcastConfig) {
        if let Ok(val) = std::env::var("FLOWCAST_FORECAST_TRIALS") {
            if let Ok(v) = val.parse::<u32>() {
                config.forecast.trials = Some(v);
            }
        }
        if let Ok(val) = std::env::var("FLOWCAST_FORECAST_WIP_LIMIT") {
            if let Ok(v) = val.parse::<u32>() {
                config.forecast.wip_limit = Some(v);
            }
        }
        if let Ok(val) = std::env::var("FLOWCAST_FORECAST_SPRINT_DAYS") {
            if let Ok(v) = val.parse::<f64>() {
                config.forecast.sprint_days = Some(v);
            }
        }
        if let Ok(val) = std::env::var("FLOWCAST_FORECAST_SEED") {
            if let Ok(v) = val.parse::<u64>() {
                config.forecast.seed = Some(v);
            }
        }
        if let Ok(val) = std::env::var("FLOWCAST_FORECAST_PARALLEL") {
            if let Ok(v) = val.parse::<bool>() {
                config.forecast.parallel = Some(v);
            }
        }
        if let Ok(val) = std::env::var("FLOWCAST_GRAPH_BOTTLENECK_LIMIT") {
            if let Ok(v) = val.parse::<usize>() {
                config.graph.bottleneck_limit = Some(v);
            }
        }
        if let Ok(val) = std::env::var("FLOWCAST_GRAPH_TERMINAL_LABELS") {
            let labels: Vec<String> = val
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !labels.is_empty() {
                config.graph.terminal_labels = labels;
            }
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut FlowcastConfig, cli: &CliOverrides) {
        if let Some(v) = cli.trials {
            config.forecast.trials = Some(v);
        }
        if let Some(v) = cli.wip_limit {
            config.forecast.wip_limit = Some(v);
        }
        if let Some(v) = cli.sprint_days {
            config.forecast.sprint_days = Some(v);
        }
        if let Some(v) = cli.seed {
            config.forecast.seed = Some(v);
        }
        if let Some(v) = cli.parallel {
            config.forecast.parallel = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Returns the user-level config directory: `~/.flowcast/`.
fn dirs_path() -> Option<std::path::PathBuf> {
    home_dir().map(|h| h.join(".flowcast"))
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<std::path::PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(std::path::PathBuf::from)
}
