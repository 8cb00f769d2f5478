//! Cycle-time sampler: turns raw history into a usable empirical distribution.

use flowcast_core::constants::{
    DEFAULT_MIN_AREA_SAMPLES, DEFAULT_MIN_SAMPLES, SYNTHETIC_MAX_DAYS, SYNTHETIC_MIN_DAYS,
    SYNTHETIC_SAMPLE_COUNT,
};

use super::rng::RandomSource;
use super::types::{CycleTimeSample, HistoryRecord, SampleSet, SampleSource};

/// Sparse-data thresholds for [`get_cycle_time_samples_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerThresholds {
    /// Area-filtered sets smaller than this fall back to all history.
    pub min_area_samples: usize,
    /// Sets smaller than this are replaced by a synthetic distribution.
    pub min_samples: usize,
}

impl Default for SamplerThresholds {
    fn default() -> Self {
        Self {
            min_area_samples: DEFAULT_MIN_AREA_SAMPLES,
            min_samples: DEFAULT_MIN_SAMPLES,
        }
    }
}

/// Build the sample set with default thresholds (5 area samples, 3 overall).
pub fn get_cycle_time_samples<R: RandomSource + ?Sized>(
    records: &[HistoryRecord],
    area: Option<&str>,
    rng: &mut R,
) -> SampleSet {
    get_cycle_time_samples_with(records, area, SamplerThresholds::default(), rng)
}

/// Filter history to valid durations `(0, 90)` days, optionally by area.
///
/// Never fails: a too-sparse area filter is dropped, and too-sparse history
/// is replaced by 20 synthetic draws from `[3, 7)` days. Either fallback
/// attaches a warning to the returned set.
pub fn get_cycle_time_samples_with<R: RandomSource + ?Sized>(
    records: &[HistoryRecord],
    area: Option<&str>,
    thresholds: SamplerThresholds,
    rng: &mut R,
) -> SampleSet {
    let valid: Vec<(CycleTimeSample, Option<&str>)> = records
        .iter()
        .filter_map(|r| {
            CycleTimeSample::new(r.completed_duration_days)
                .ok()
                .map(|s| (s, r.area.as_deref()))
        })
        .collect();
    let discarded = records.len() - valid.len();
    if discarded > 0 {
        tracing::debug!(discarded, "cycle-time outliers discarded");
    }

    let mut warnings: Vec<String> = Vec::new();

    if let Some(area) = area {
        let filtered: Vec<CycleTimeSample> = valid
            .iter()
            .filter(|(_, a)| a.is_some_and(|a| a.eq_ignore_ascii_case(area)))
            .map(|&(s, _)| s)
            .collect();
        let required = thresholds.min_area_samples.max(thresholds.min_samples).max(1);
        if filtered.len() >= required {
            return SampleSet::from_validated(filtered, SampleSource::AreaHistory, None);
        }
        let warning = format!(
            "only {} samples for area '{area}', using all history instead",
            filtered.len()
        );
        tracing::warn!(area, samples = filtered.len(), "area filter too sparse");
        warnings.push(warning);
    }

    let all: Vec<CycleTimeSample> = valid.into_iter().map(|(s, _)| s).collect();
    if all.len() >= thresholds.min_samples.max(1) {
        let warning = (!warnings.is_empty()).then(|| warnings.join("; "));
        return SampleSet::from_validated(all, SampleSource::History, warning);
    }

    tracing::warn!(
        samples = all.len(),
        "insufficient cycle-time history, using synthetic distribution"
    );
    warnings.push(format!(
        "only {} historical samples, using a synthetic {}-{} day distribution; forecast confidence is low",
        all.len(),
        SYNTHETIC_MIN_DAYS,
        SYNTHETIC_MAX_DAYS
    ));
    SampleSet::from_validated(
        synthetic_samples(rng),
        SampleSource::Synthetic,
        Some(warnings.join("; ")),
    )
}

fn synthetic_samples<R: RandomSource + ?Sized>(rng: &mut R) -> Vec<CycleTimeSample> {
    let span = SYNTHETIC_MAX_DAYS - SYNTHETIC_MIN_DAYS;
    (0..SYNTHETIC_SAMPLE_COUNT)
        .filter_map(|_| CycleTimeSample::new(SYNTHETIC_MIN_DAYS + rng.next_f64() * span).ok())
        .collect()
}

/// Bootstrap draw: one duration chosen uniformly, with replacement.
pub fn sample_cycle_time<R: RandomSource + ?Sized>(samples: &SampleSet, rng: &mut R) -> f64 {
    let durations = samples.durations();
    let idx = (rng.next_f64() * durations.len() as f64) as usize;
    durations[idx.min(durations.len() - 1)]
}
