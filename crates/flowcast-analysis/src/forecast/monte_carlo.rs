//! Trial aggregation: sprint throughput and backlog completion forecasts.

use std::collections::BTreeMap;

use flowcast_core::constants::MAX_SIMULATED_DAYS;

use super::rng::RandomSource;
use super::trials::{run_backlog_trial, run_sprint_trial};
use super::types::{
    BacklogForecastInput, BacklogForecastResult, CompletionPercentiles, ConfidenceLabel,
    HistogramBucket, RiskAssessment, SampleSet, SprintBreakdown, SprintForecastResult,
    SprintSimulationInput, TargetAssessment, ThroughputPercentiles,
};
use crate::stats::{mean, percentile, round_to, sort_ascending, std_dev};

/// Run `input.trials` sprint trials and summarize the completion counts.
pub fn simulate_sprint<R: RandomSource + ?Sized>(
    samples: &SampleSet,
    input: &SprintSimulationInput,
    rng: &mut R,
) -> SprintForecastResult {
    let input = input.clamped();
    let counts: Vec<u32> = (0..input.trials)
        .map(|_| run_sprint_trial(samples, input.sprint_days, input.wip_limit, rng))
        .collect();
    summarize_sprint(&counts, &input, samples)
}

/// Percentiles, moments, histogram and target assessment over trial counts.
/// `input` must already be clamped.
pub(crate) fn summarize_sprint(
    counts: &[u32],
    input: &SprintSimulationInput,
    samples: &SampleSet,
) -> SprintForecastResult {
    let mut values: Vec<f64> = counts.iter().map(|&c| f64::from(c)).collect();
    sort_ascending(&mut values);

    let throughput = ThroughputPercentiles {
        p10: percentile(&values, 10.0),
        p25: percentile(&values, 25.0),
        p50: percentile(&values, 50.0),
        p75: percentile(&values, 75.0),
        p90: percentile(&values, 90.0),
    };

    let target = input.target_items.map(|target_items| {
        let hits = counts.iter().filter(|&&c| c >= target_items).count();
        let probability = round_to(fraction(hits, counts.len()), 4);
        TargetAssessment {
            target_items,
            probability,
            confidence: ConfidenceLabel::from_probability(probability),
        }
    });

    tracing::debug!(
        trials = counts.len(),
        p50 = throughput.p50,
        "sprint simulation complete"
    );

    SprintForecastResult {
        trials: input.trials,
        sprint_days: input.sprint_days,
        wip_limit: input.wip_limit,
        throughput,
        mean: round_to(mean(&values), 2),
        std_dev: round_to(std_dev(&values), 2),
        histogram: histogram(counts),
        target,
        data_quality: samples.data_quality(),
    }
}

/// Completion-count → probability table, ascending by item count.
fn histogram(counts: &[u32]) -> Vec<HistogramBucket> {
    let mut tally: BTreeMap<u32, u32> = BTreeMap::new();
    for &c in counts {
        *tally.entry(c).or_insert(0) += 1;
    }

    let total = counts.len();
    let mut at_least = total;
    let mut buckets = Vec::with_capacity(tally.len());
    for (items, count) in tally {
        buckets.push(HistogramBucket {
            items,
            count,
            probability: round_to(fraction(count as usize, total), 4),
            cumulative_probability: round_to(fraction(at_least, total), 4),
        });
        at_least -= count as usize;
    }
    buckets
}

/// Run `input.trials` backlog trials, then a sprint-by-sprint breakdown.
pub fn forecast_backlog<R: RandomSource + ?Sized>(
    samples: &SampleSet,
    input: &BacklogForecastInput,
    rng: &mut R,
) -> BacklogForecastResult {
    let input = input.clamped();
    let durations: Vec<f64> = (0..input.trials)
        .map(|_| run_backlog_trial(samples, input.item_count, input.wip_limit, rng))
        .collect();
    let wip_limit = input.wip_limit;
    build_backlog_result(samples, &input, durations, |days, n| {
        (0..n)
            .map(|_| run_sprint_trial(samples, days, wip_limit, rng))
            .collect()
    })
}

/// Aggregate backlog trial durations. `run_sprints(days, n)` must return `n`
/// sprint-trial completion counts for a sprint of `days` days.
pub(crate) fn build_backlog_result<F>(
    samples: &SampleSet,
    input: &BacklogForecastInput,
    mut durations: Vec<f64>,
    mut run_sprints: F,
) -> BacklogForecastResult
where
    F: FnMut(f64, u32) -> Vec<u32>,
{
    sort_ascending(&mut durations);
    let capped_trials = durations
        .iter()
        .filter(|&&d| d >= MAX_SIMULATED_DAYS)
        .count() as u32;
    if capped_trials > 0 {
        tracing::warn!(
            capped_trials,
            item_count = input.item_count,
            "backlog trials hit the simulation cap"
        );
    }

    let completion = CompletionPercentiles {
        p50_days: percentile(&durations, 50.0),
        p80_days: percentile(&durations, 80.0),
        p95_days: percentile(&durations, 95.0),
    };
    let mean_days = mean(&durations);
    let std_dev_days = std_dev(&durations);

    let sprint_breakdown = sprint_breakdown(input, &durations, completion.p95_days, &mut run_sprints);

    let mut risk = RiskAssessment::assess(
        completion.p50_days,
        completion.p95_days,
        mean_days,
        std_dev_days,
    );
    risk.tail_risk = round_to(risk.tail_risk, 1);
    risk.variability_ratio = round_to(risk.variability_ratio, 3);

    tracing::debug!(
        trials = durations.len(),
        item_count = input.item_count,
        p50_days = completion.p50_days,
        "backlog forecast complete"
    );

    BacklogForecastResult {
        item_count: input.item_count,
        wip_limit: input.wip_limit,
        trials: input.trials,
        completion,
        mean_days: round_to(mean_days, 1),
        std_dev_days: round_to(std_dev_days, 1),
        capped_trials,
        sprint_breakdown,
        risk,
        data_quality: samples.data_quality(),
    }
}

fn sprint_breakdown<F>(
    input: &BacklogForecastInput,
    sorted_durations: &[f64],
    p95_days: f64,
    run_sprints: &mut F,
) -> Vec<SprintBreakdown>
where
    F: FnMut(f64, u32) -> Vec<u32>,
{
    if input.item_count == 0 || !(input.sprint_days.is_finite() && input.sprint_days > 0.0) {
        return Vec::new();
    }
    let max_sprints = input.max_breakdown_sprints.max(1);
    let sprints = ((p95_days / input.sprint_days).ceil() as u32).clamp(1, max_sprints);
    let trials = input.trials.min(input.breakdown_trial_cap);

    (1..=sprints)
        .map(|sprint| {
            let end_day = f64::from(sprint) * input.sprint_days;
            let mut completed: Vec<f64> = run_sprints(end_day, trials)
                .into_iter()
                .map(|c| f64::from(c.min(input.item_count)))
                .collect();
            sort_ascending(&mut completed);
            let done = sorted_durations.partition_point(|&d| d <= end_day);
            SprintBreakdown {
                sprint,
                end_day: round_to(end_day, 1),
                expected_completed: percentile(&completed, 50.0) as u32,
                completed_p10: percentile(&completed, 10.0) as u32,
                completed_p90: percentile(&completed, 90.0) as u32,
                probability_complete: round_to(fraction(done, sorted_durations.len()), 4),
            }
        })
        .collect()
}

fn fraction(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}
