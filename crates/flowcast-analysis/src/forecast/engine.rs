//! Configured forecasting façade with sequential and parallel trial runners.

use flowcast_core::config::ForecastConfig;
use rayon::prelude::*;

use super::monte_carlo::{self, build_backlog_result, summarize_sprint};
use super::rng::{derive_chunk_seed, EntropyRandom, RandomSource, SeededRandom};
use super::sampler::{get_cycle_time_samples_with, SamplerThresholds};
use super::trials::{run_backlog_trial, run_sprint_trial};
use super::types::{
    BacklogForecastInput, BacklogForecastResult, HistoryRecord, SampleSet, SprintForecastResult,
    SprintSimulationInput,
};

/// Trials per parallel chunk. Each chunk owns one seeded generator.
const CHUNK_SIZE: u32 = 1024;

/// Mixed into the base seed for sprint-breakdown runs of a backlog forecast.
const BREAKDOWN_SEED_SALT: u64 = 0xB4EA_4D0F_5EED_0001;

/// Mixed into the base seed for synthetic sample generation.
const SAMPLER_SEED_SALT: u64 = 0x5A3B_1E00_5EED_0002;

/// Monte Carlo engine built from [`ForecastConfig`].
#[derive(Debug, Clone)]
pub struct MonteCarloEngine {
    trials: u32,
    wip_limit: u32,
    sprint_days: f64,
    seed: Option<u64>,
    parallel: bool,
    breakdown_trial_cap: u32,
    max_breakdown_sprints: u32,
    thresholds: SamplerThresholds,
}

impl MonteCarloEngine {
    pub fn new(config: &ForecastConfig) -> Self {
        Self {
            trials: config.effective_trials(),
            wip_limit: config.effective_wip_limit(),
            sprint_days: config.effective_sprint_days(),
            seed: config.seed,
            parallel: config.effective_parallel(),
            breakdown_trial_cap: config.effective_breakdown_trial_cap(),
            max_breakdown_sprints: config.effective_max_breakdown_sprints(),
            thresholds: SamplerThresholds {
                min_area_samples: config.effective_min_area_samples(),
                min_samples: config.effective_min_samples(),
            },
        }
    }

    /// Fix the seed so every run of this engine is reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Sprint input from the configured trials, WIP limit and sprint length.
    pub fn sprint_input(&self, target_items: Option<u32>) -> SprintSimulationInput {
        SprintSimulationInput {
            sprint_days: self.sprint_days,
            wip_limit: self.wip_limit,
            trials: self.trials,
            target_items,
        }
    }

    pub fn backlog_input(&self, item_count: u32) -> BacklogForecastInput {
        BacklogForecastInput {
            item_count,
            wip_limit: self.wip_limit,
            trials: self.trials,
            sprint_days: self.sprint_days,
            breakdown_trial_cap: self.breakdown_trial_cap,
            max_breakdown_sprints: self.max_breakdown_sprints,
        }
    }

    /// Cycle-time samples using the configured sparse-data thresholds.
    pub fn samples(&self, records: &[HistoryRecord], area: Option<&str>) -> SampleSet {
        let mut rng: Box<dyn RandomSource + Send> = match self.seed {
            Some(seed) => {
                Box::new(SeededRandom::new(derive_chunk_seed(seed ^ SAMPLER_SEED_SALT, 0)))
            }
            None => Box::new(EntropyRandom::new()),
        };
        get_cycle_time_samples_with(records, area, self.thresholds, rng.as_mut())
    }

    /// Sprint throughput forecast. Runs on the rayon pool when parallel is set.
    pub fn simulate_sprint(
        &self,
        samples: &SampleSet,
        input: &SprintSimulationInput,
    ) -> SprintForecastResult {
        if self.parallel {
            return self.simulate_sprint_parallel(samples, input);
        }
        let mut rng = self.rng();
        monte_carlo::simulate_sprint(samples, input, rng.as_mut())
    }

    /// Backlog completion forecast. Runs on the rayon pool when parallel is set.
    pub fn forecast_backlog(
        &self,
        samples: &SampleSet,
        input: &BacklogForecastInput,
    ) -> BacklogForecastResult {
        if self.parallel {
            return self.forecast_backlog_parallel(samples, input);
        }
        let mut rng = self.rng();
        monte_carlo::forecast_backlog(samples, input, rng.as_mut())
    }

    /// Parallel sprint forecast. With a fixed seed the result does not depend
    /// on the number of worker threads.
    pub fn simulate_sprint_parallel(
        &self,
        samples: &SampleSet,
        input: &SprintSimulationInput,
    ) -> SprintForecastResult {
        let input = input.clamped();
        let base = self.base_seed();
        let counts = run_chunked(input.trials, base, |rng| {
            run_sprint_trial(samples, input.sprint_days, input.wip_limit, rng)
        });
        summarize_sprint(&counts, &input, samples)
    }

    /// Parallel backlog forecast, including the sprint breakdown.
    pub fn forecast_backlog_parallel(
        &self,
        samples: &SampleSet,
        input: &BacklogForecastInput,
    ) -> BacklogForecastResult {
        let input = input.clamped();
        let base = self.base_seed();
        let durations = run_chunked(input.trials, base, |rng| {
            run_backlog_trial(samples, input.item_count, input.wip_limit, rng)
        });

        let wip_limit = input.wip_limit;
        let mut point = 0u64;
        build_backlog_result(samples, &input, durations, |days, n| {
            point += 1;
            let seed = derive_chunk_seed(base ^ BREAKDOWN_SEED_SALT, point);
            run_chunked(n, seed, |rng| run_sprint_trial(samples, days, wip_limit, rng))
        })
    }

    fn rng(&self) -> Box<dyn RandomSource + Send> {
        match self.seed {
            Some(seed) => Box::new(SeededRandom::new(seed)),
            None => Box::new(EntropyRandom::new()),
        }
    }

    fn base_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random::<u64>)
    }
}

impl Default for MonteCarloEngine {
    fn default() -> Self {
        Self::new(&ForecastConfig::default())
    }
}

/// Run `trials` trials in fixed-size chunks on the rayon pool. Chunk `i` uses
/// a generator seeded with `derive_chunk_seed(base, i)`; results keep chunk
/// order.
fn run_chunked<T, F>(trials: u32, base: u64, trial: F) -> Vec<T>
where
    T: Send,
    F: Fn(&mut SeededRandom) -> T + Sync,
{
    let chunks = trials.div_ceil(CHUNK_SIZE);
    let per_chunk: Vec<Vec<T>> = (0..chunks)
        .into_par_iter()
        .map(|chunk| {
            let start = chunk * CHUNK_SIZE;
            let len = CHUNK_SIZE.min(trials - start);
            let mut rng = SeededRandom::new(derive_chunk_seed(base, u64::from(chunk)));
            (0..len).map(|_| trial(&mut rng)).collect()
        })
        .collect();
    per_chunk.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::types::SampleSource;

    fn samples() -> SampleSet {
        SampleSet::from_durations(&[1.5, 2.0, 3.0, 4.5, 6.0, 8.0, 2.5, 3.5]).unwrap()
    }

    #[test]
    fn test_engine_uses_config() {
        let config = ForecastConfig {
            trials: Some(250),
            wip_limit: Some(2),
            sprint_days: Some(10.0),
            ..ForecastConfig::default()
        };
        let engine = MonteCarloEngine::new(&config);
        let input = engine.sprint_input(Some(3));
        assert_eq!(input.trials, 250);
        assert_eq!(input.wip_limit, 2);
        assert_eq!(input.sprint_days, 10.0);
        assert_eq!(engine.backlog_input(7).item_count, 7);
    }

    #[test]
    fn test_seeded_sequential_is_reproducible() {
        let engine = MonteCarloEngine::default().with_seed(11);
        let input = SprintSimulationInput {
            trials: 300,
            ..SprintSimulationInput::default()
        };
        let a = engine.simulate_sprint(&samples(), &input);
        let b = engine.simulate_sprint(&samples(), &input);
        assert_eq!(a, b);
    }

    #[test]
    fn test_parallel_matches_across_pool_sizes() {
        let engine = MonteCarloEngine::default().with_seed(99).with_parallel(true);
        let input = BacklogForecastInput {
            trials: 3000,
            ..BacklogForecastInput::new(12)
        };
        let single = rayon::ThreadPoolBuilder::new()
            .num_threads(1)
            .build()
            .unwrap()
            .install(|| engine.forecast_backlog(&samples(), &input));
        let many = rayon::ThreadPoolBuilder::new()
            .num_threads(4)
            .build()
            .unwrap()
            .install(|| engine.forecast_backlog(&samples(), &input));
        assert_eq!(single, many);
        assert_eq!(single.trials, 3000);
    }

    #[test]
    fn test_run_chunked_keeps_count_and_order() {
        let out = run_chunked(2500, 3, |rng| rng.next_f64());
        assert_eq!(out.len(), 2500);
        let again = run_chunked(2500, 3, |rng| rng.next_f64());
        assert_eq!(out, again);

        let mut first_chunk = SeededRandom::new(derive_chunk_seed(3, 0));
        assert_eq!(out[0], first_chunk.next_f64());
        let mut second_chunk = SeededRandom::new(derive_chunk_seed(3, 1));
        assert_eq!(out[CHUNK_SIZE as usize], second_chunk.next_f64());
    }

    #[test]
    fn test_samples_use_configured_thresholds() {
        let config = ForecastConfig {
            min_samples: Some(10),
            ..ForecastConfig::default()
        };
        let engine = MonteCarloEngine::new(&config).with_seed(4);
        let records: Vec<HistoryRecord> = (0..5).map(|i| HistoryRecord::new(i, 2.0)).collect();
        assert!(engine.samples(&records, None).is_synthetic());
        assert!(!MonteCarloEngine::default().samples(&records, None).is_synthetic());
    }

    #[test]
    fn test_zero_thresholds_with_unmatched_area() {
        let config = ForecastConfig {
            min_area_samples: Some(0),
            min_samples: Some(0),
            ..ForecastConfig::default()
        };
        let engine = MonteCarloEngine::new(&config).with_seed(2);
        let records: Vec<HistoryRecord> = (0..5)
            .map(|i| HistoryRecord::new(i, 2.0).with_area("api"))
            .collect();
        let set = engine.samples(&records, Some("ui"));
        assert_eq!(set.len(), 5);
        assert_eq!(set.source(), SampleSource::History);

        let result = engine.simulate_sprint(&set, &engine.sprint_input(None));
        assert!(result.throughput.p50 > 0.0);
    }

    #[test]
    fn test_synthetic_samples_use_a_separate_stream() {
        let config = ForecastConfig {
            min_samples: Some(10),
            ..ForecastConfig::default()
        };
        let engine = MonteCarloEngine::new(&config).with_seed(4);
        let set = engine.samples(&[], None);
        assert!(set.is_synthetic());

        let mut salted = SeededRandom::new(derive_chunk_seed(4 ^ SAMPLER_SEED_SALT, 0));
        assert_eq!(set.durations()[0], 3.0 + salted.next_f64() * 4.0);
        let mut unsalted = SeededRandom::new(4);
        assert_ne!(set.durations()[0], 3.0 + unsalted.next_f64() * 4.0);

        assert_eq!(engine.samples(&[], None), set);
    }
}
