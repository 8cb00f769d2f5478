//! Monte Carlo forecasting over empirical cycle times.
//!
//! History records are reduced to a [`SampleSet`] by the sampler, then
//! bootstrapped through a WIP-constrained queue in 0.25-day steps. Sprint
//! forecasts report throughput percentiles; backlog forecasts report
//! completion-day percentiles, a sprint breakdown and a risk level.
//!
//! All functions take an injected [`RandomSource`]; [`MonteCarloEngine`]
//! wires configuration, seeding and the optional rayon-parallel runners.

pub mod engine;
pub mod monte_carlo;
pub mod rng;
pub mod sampler;
pub mod trials;
pub mod types;

pub use engine::MonteCarloEngine;
pub use monte_carlo::{forecast_backlog, simulate_sprint};
pub use rng::{derive_chunk_seed, EntropyRandom, RandomSource, SeededRandom};
pub use sampler::{
    get_cycle_time_samples, get_cycle_time_samples_with, sample_cycle_time, SamplerThresholds,
};
pub use trials::{run_backlog_trial, run_sprint_trial};
pub use types::*;
