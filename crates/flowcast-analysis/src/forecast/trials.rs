//! Single Monte Carlo trials over a WIP-constrained, time-stepped queue.
//!
//! Each of `wip_limit` slots holds the remaining duration of one in-progress
//! item. Every 0.25-day step decrements all slots; a slot reaching zero counts
//! a completion and is refilled with a fresh bootstrap draw.

use flowcast_core::constants::{MAX_SIMULATED_DAYS, SIMULATION_STEP_DAYS};

use super::rng::RandomSource;
use super::sampler::sample_cycle_time;
use super::types::{clamp_wip, SampleSet};
use crate::stats::round_to;

/// Items completed within `sprint_days`. Slots are always busy: a finished
/// item is replaced immediately.
pub fn run_sprint_trial<R: RandomSource + ?Sized>(
    samples: &SampleSet,
    sprint_days: f64,
    wip_limit: u32,
    rng: &mut R,
) -> u32 {
    let steps = step_count(sprint_days);
    let mut slots: Vec<f64> = (0..clamp_wip(wip_limit))
        .map(|_| sample_cycle_time(samples, rng))
        .collect();
    let mut completed = 0u32;

    for _ in 0..steps {
        for remaining in slots.iter_mut() {
            *remaining -= SIMULATION_STEP_DAYS;
            if *remaining <= 0.0 {
                completed += 1;
                *remaining = sample_cycle_time(samples, rng);
            }
        }
    }
    completed
}

/// Days until `item_count` items are done, rounded to 0.1. Stops pulling new
/// items once the backlog is fully started; gives up at 365 simulated days.
pub fn run_backlog_trial<R: RandomSource + ?Sized>(
    samples: &SampleSet,
    item_count: u32,
    wip_limit: u32,
    rng: &mut R,
) -> f64 {
    if item_count == 0 {
        return 0.0;
    }
    let initial = clamp_wip(wip_limit).min(item_count);
    let mut slots: Vec<Option<f64>> = (0..initial)
        .map(|_| Some(sample_cycle_time(samples, rng)))
        .collect();
    let mut started = initial;
    let mut completed = 0u32;
    let mut elapsed = 0.0;

    for step in 1..=step_count(MAX_SIMULATED_DAYS) {
        elapsed = step as f64 * SIMULATION_STEP_DAYS;
        for slot in slots.iter_mut() {
            let finished = match slot {
                Some(remaining) => {
                    *remaining -= SIMULATION_STEP_DAYS;
                    *remaining <= 0.0
                }
                None => false,
            };
            if finished {
                completed += 1;
                *slot = if started < item_count {
                    started += 1;
                    Some(sample_cycle_time(samples, rng))
                } else {
                    None
                };
            }
        }
        if completed >= item_count {
            break;
        }
    }
    round_to(elapsed, 1)
}

fn step_count(days: f64) -> u64 {
    if days.is_finite() && days > 0.0 {
        (days / SIMULATION_STEP_DAYS).floor() as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::rng::SeededRandom;
    use flowcast_core::constants::MAX_WIP_LIMIT;

    fn constant(days: f64) -> SampleSet {
        SampleSet::from_durations(&[days; 5]).unwrap()
    }

    #[test]
    fn test_sprint_trial_constant_durations() {
        let mut rng = SeededRandom::new(1);
        assert_eq!(run_sprint_trial(&constant(3.0), 14.0, 1, &mut rng), 4);
        assert_eq!(run_sprint_trial(&constant(3.0), 14.0, 2, &mut rng), 8);
        assert_eq!(run_sprint_trial(&constant(2.0), 10.0, 3, &mut rng), 15);
    }

    #[test]
    fn test_sprint_trial_zero_days() {
        let mut rng = SeededRandom::new(1);
        assert_eq!(run_sprint_trial(&constant(3.0), 0.0, 2, &mut rng), 0);
    }

    #[test]
    fn test_zero_wip_is_clamped() {
        let mut rng = SeededRandom::new(1);
        assert_eq!(run_sprint_trial(&constant(3.0), 14.0, 0, &mut rng), 4);
        assert_eq!(run_backlog_trial(&constant(3.0), 2, 0, &mut rng), 6.0);
    }

    #[test]
    fn test_wip_is_capped() {
        let mut rng = SeededRandom::new(1);
        let capped = run_sprint_trial(&constant(3.0), 3.0, 200_000_000, &mut rng);
        assert_eq!(capped, MAX_WIP_LIMIT);
        let days = run_backlog_trial(&constant(3.0), MAX_WIP_LIMIT * 2, u32::MAX, &mut rng);
        assert_eq!(days, 6.0);
    }

    #[test]
    fn test_backlog_trial_constant_durations() {
        let mut rng = SeededRandom::new(1);
        assert_eq!(run_backlog_trial(&constant(3.0), 4, 1, &mut rng), 12.0);
        assert_eq!(run_backlog_trial(&constant(3.0), 4, 2, &mut rng), 6.0);
        // WIP above the backlog size does not speed things up.
        assert_eq!(run_backlog_trial(&constant(3.0), 2, 8, &mut rng), 3.0);
        assert_eq!(run_backlog_trial(&constant(3.0), 0, 2, &mut rng), 0.0);
    }

    #[test]
    fn test_backlog_trial_hits_the_cap() {
        let mut rng = SeededRandom::new(1);
        assert_eq!(run_backlog_trial(&constant(80.0), 10, 1, &mut rng), 365.0);
    }
}
