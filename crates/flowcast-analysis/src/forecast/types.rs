//! Forecasting types: history records, sample sets, inputs, and results.

use flowcast_core::constants::{
    DEFAULT_BREAKDOWN_TRIAL_CAP, DEFAULT_MAX_BREAKDOWN_SPRINTS, DEFAULT_SPRINT_DAYS,
    DEFAULT_TRIALS, DEFAULT_WIP_LIMIT, MAX_CYCLE_TIME_DAYS, MAX_TRIALS, MAX_WIP_LIMIT,
};
use flowcast_core::errors::ForecastError;
use flowcast_core::types::IssueId;
use serde::{Deserialize, Serialize};

/// One completed work item as supplied by the history provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub issue_id: IssueId,
    pub completed_duration_days: f64,
    #[serde(default)]
    pub area: Option<String>,
}

impl HistoryRecord {
    pub fn new(issue_id: IssueId, completed_duration_days: f64) -> Self {
        Self {
            issue_id,
            completed_duration_days,
            area: None,
        }
    }

    pub fn with_area(mut self, area: impl Into<String>) -> Self {
        self.area = Some(area.into());
        self
    }
}

/// A validated cycle time: strictly between 0 and 90 days.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct CycleTimeSample(f64);

impl CycleTimeSample {
    pub fn new(days: f64) -> Result<Self, ForecastError> {
        if days.is_finite() && days > 0.0 && days < MAX_CYCLE_TIME_DAYS {
            Ok(Self(days))
        } else {
            Err(ForecastError::InvalidDuration {
                days,
                max: MAX_CYCLE_TIME_DAYS,
            })
        }
    }

    pub fn days(self) -> f64 {
        self.0
    }
}

/// Where the effective sample set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleSource {
    /// Area-filtered history.
    AreaHistory,
    /// All history (no filter requested, or the filter was too sparse).
    History,
    /// Placeholder distribution; history was too sparse.
    Synthetic,
}

/// Non-empty empirical distribution of cycle times, ready for bootstrap draws.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleSet {
    durations: Vec<f64>,
    source: SampleSource,
    warning: Option<String>,
}

impl SampleSet {
    /// Build from raw durations. Every value must be a valid cycle time and
    /// the list must not be empty.
    pub fn from_durations(durations: &[f64]) -> Result<Self, ForecastError> {
        if durations.is_empty() {
            return Err(ForecastError::EmptySamples);
        }
        let durations = durations
            .iter()
            .map(|&d| CycleTimeSample::new(d).map(CycleTimeSample::days))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            durations,
            source: SampleSource::History,
            warning: None,
        })
    }

    /// Internal constructor for already-validated samples.
    pub(crate) fn from_validated(
        samples: Vec<CycleTimeSample>,
        source: SampleSource,
        warning: Option<String>,
    ) -> Self {
        debug_assert!(!samples.is_empty());
        Self {
            durations: samples.into_iter().map(CycleTimeSample::days).collect(),
            source,
            warning,
        }
    }

    pub fn durations(&self) -> &[f64] {
        &self.durations
    }

    pub fn len(&self) -> usize {
        self.durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    pub fn source(&self) -> SampleSource {
        self.source
    }

    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    pub fn is_synthetic(&self) -> bool {
        self.source == SampleSource::Synthetic
    }

    pub fn data_quality(&self) -> DataQuality {
        let confidence = if self.is_synthetic() {
            DataConfidence::Low
        } else {
            DataConfidence::from_sample_count(self.len())
        };
        DataQuality {
            sample_count: self.len(),
            source: self.source,
            confidence,
            warning: self.warning.clone(),
        }
    }
}

/// Confidence in the input distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataConfidence {
    Low,
    Medium,
    High,
}

impl DataConfidence {
    /// ≥ 20 samples → high, ≥ 10 → medium, else low.
    pub fn from_sample_count(count: usize) -> Self {
        if count >= 20 {
            Self::High
        } else if count >= 10 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataQuality {
    pub sample_count: usize,
    pub source: SampleSource,
    pub confidence: DataConfidence,
    pub warning: Option<String>,
}

/// Likelihood label for hitting a throughput target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLabel {
    VeryLikely,
    Likely,
    Uncertain,
    Unlikely,
    VeryUnlikely,
}

impl ConfidenceLabel {
    pub fn from_probability(p: f64) -> Self {
        if p >= 0.9 {
            Self::VeryLikely
        } else if p >= 0.7 {
            Self::Likely
        } else if p >= 0.4 {
            Self::Uncertain
        } else if p >= 0.15 {
            Self::Unlikely
        } else {
            Self::VeryUnlikely
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::VeryLikely => "very_likely",
            Self::Likely => "likely",
            Self::Uncertain => "uncertain",
            Self::Unlikely => "unlikely",
            Self::VeryUnlikely => "very_unlikely",
        }
    }
}

impl std::fmt::Display for ConfidenceLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameters for a sprint throughput simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SprintSimulationInput {
    pub sprint_days: f64,
    pub wip_limit: u32,
    pub trials: u32,
    /// Items the team hopes to finish; enables the target assessment.
    pub target_items: Option<u32>,
}

impl Default for SprintSimulationInput {
    fn default() -> Self {
        Self {
            sprint_days: DEFAULT_SPRINT_DAYS,
            wip_limit: DEFAULT_WIP_LIMIT,
            trials: DEFAULT_TRIALS,
            target_items: None,
        }
    }
}

impl SprintSimulationInput {
    /// Copy with trials clamped to `[1, 50_000]` and WIP to `[1, 1_000]`.
    pub fn clamped(&self) -> Self {
        Self {
            wip_limit: clamp_wip(self.wip_limit),
            trials: clamp_trials(self.trials),
            ..self.clone()
        }
    }
}

/// Clamp a requested trial count into `[1, 50_000]`.
pub fn clamp_trials(trials: u32) -> u32 {
    trials.clamp(1, MAX_TRIALS)
}

/// Clamp a WIP limit into `[1, 1_000]`.
pub fn clamp_wip(wip_limit: u32) -> u32 {
    wip_limit.clamp(1, MAX_WIP_LIMIT)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThroughputPercentiles {
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
}

impl ThroughputPercentiles {
    pub fn is_monotonic(&self) -> bool {
        self.p10 <= self.p25 && self.p25 <= self.p50 && self.p50 <= self.p75 && self.p75 <= self.p90
    }
}

/// One bar of the completion-count distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBucket {
    pub items: u32,
    pub count: u32,
    pub probability: f64,
    /// Probability of completing at least `items`.
    pub cumulative_probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetAssessment {
    pub target_items: u32,
    /// Fraction of trials completing at least `target_items`.
    pub probability: f64,
    pub confidence: ConfidenceLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SprintForecastResult {
    pub trials: u32,
    pub sprint_days: f64,
    pub wip_limit: u32,
    pub throughput: ThroughputPercentiles,
    pub mean: f64,
    pub std_dev: f64,
    pub histogram: Vec<HistogramBucket>,
    pub target: Option<TargetAssessment>,
    pub data_quality: DataQuality,
}

/// Parameters for a backlog completion-time forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacklogForecastInput {
    pub item_count: u32,
    pub wip_limit: u32,
    pub trials: u32,
    /// Sprint length used for the sprint-by-sprint breakdown.
    pub sprint_days: f64,
    pub breakdown_trial_cap: u32,
    pub max_breakdown_sprints: u32,
}

impl BacklogForecastInput {
    pub fn new(item_count: u32) -> Self {
        Self {
            item_count,
            wip_limit: DEFAULT_WIP_LIMIT,
            trials: DEFAULT_TRIALS,
            sprint_days: DEFAULT_SPRINT_DAYS,
            breakdown_trial_cap: DEFAULT_BREAKDOWN_TRIAL_CAP,
            max_breakdown_sprints: DEFAULT_MAX_BREAKDOWN_SPRINTS,
        }
    }

    /// Copy with trials clamped to `[1, 50_000]` and WIP to `[1, 1_000]`.
    pub fn clamped(&self) -> Self {
        Self {
            wip_limit: clamp_wip(self.wip_limit),
            trials: clamp_trials(self.trials),
            breakdown_trial_cap: self.breakdown_trial_cap.max(1),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompletionPercentiles {
    pub p50_days: f64,
    pub p80_days: f64,
    pub p95_days: f64,
}

/// Expected state of the backlog at the end of one sprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SprintBreakdown {
    pub sprint: u32,
    pub end_day: f64,
    /// Median cumulative completions, capped at the backlog size.
    pub expected_completed: u32,
    pub completed_p10: u32,
    pub completed_p90: u32,
    /// Fraction of backlog trials finished by `end_day`.
    pub probability_complete: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// p95 − p50 in days.
    pub tail_risk: f64,
    /// std dev / mean.
    pub variability_ratio: f64,
    pub level: RiskLevel,
}

impl RiskAssessment {
    /// `high` if ratio > 0.5 or tail > p50; `medium` if ratio > 0.3 or
    /// tail > p50 / 2; else `low`.
    pub fn assess(p50: f64, p95: f64, mean: f64, std_dev: f64) -> Self {
        let tail_risk = p95 - p50;
        let variability_ratio = if mean > 0.0 { std_dev / mean } else { 0.0 };
        let level = if variability_ratio > 0.5 || tail_risk > p50 {
            RiskLevel::High
        } else if variability_ratio > 0.3 || tail_risk > 0.5 * p50 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        };
        Self {
            tail_risk,
            variability_ratio,
            level,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacklogForecastResult {
    pub item_count: u32,
    pub wip_limit: u32,
    pub trials: u32,
    pub completion: CompletionPercentiles,
    pub mean_days: f64,
    pub std_dev_days: f64,
    /// Trials that hit the 365-day simulation cap.
    pub capped_trials: u32,
    pub sprint_breakdown: Vec<SprintBreakdown>,
    pub risk: RiskAssessment,
    pub data_quality: DataQuality,
}
