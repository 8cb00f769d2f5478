//! Summary statistics over numeric sample sets.

use statrs::statistics::Statistics;

/// Arithmetic mean. Returns 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().mean()
}

/// Population standard deviation. Returns 0.0 for fewer than two values.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    values.iter().population_std_dev()
}

/// The k-th percentile (0–100) of an ascending-sorted slice, nearest-rank on
/// `k/100 * (n-1)`. Returns 0.0 for an empty slice.
pub fn percentile(sorted: &[f64], k: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = (k.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f64).round() as usize;
    sorted[rank.min(sorted.len() - 1)]
}

/// Sort a sample vector ascending, NaN-tolerant.
pub fn sort_ascending(values: &mut [f64]) {
    values.sort_by(|a, b| a.total_cmp(b));
}

/// Round to `decimals` decimal places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_inputs_are_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(std_dev(&[]), 0.0);
        assert_eq!(percentile(&[], 50.0), 0.0);
    }

    #[test]
    fn test_mean_and_std_dev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&values) - 5.0).abs() < 1e-12);
        assert!((std_dev(&values) - 2.0).abs() < 1e-12);
        assert_eq!(std_dev(&[3.0]), 0.0);
        assert_eq!(std_dev(&[4.0, 4.0, 4.0]), 0.0);
    }

    #[test]
    fn test_percentile_nearest_rank() {
        let sorted: Vec<f64> = (1..=11).map(f64::from).collect();
        assert_eq!(percentile(&sorted, 0.0), 1.0);
        assert_eq!(percentile(&sorted, 50.0), 6.0);
        assert_eq!(percentile(&sorted, 90.0), 10.0);
        assert_eq!(percentile(&sorted, 100.0), 11.0);
        assert_eq!(percentile(&[7.5], 10.0), 7.5);
    }

    #[test]
    fn test_percentiles_monotonic() {
        let mut values = vec![9.0, 1.0, 4.0, 4.0, 12.5, 0.5, 3.0];
        sort_ascending(&mut values);
        let ks = [10.0, 25.0, 50.0, 75.0, 90.0];
        let ps: Vec<f64> = ks.iter().map(|&k| percentile(&values, k)).collect();
        assert!(ps.windows(2).all(|w| w[0] <= w[1]), "{ps:?}");
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.123456, 4), 0.1235);
        assert_eq!(round_to(12.349, 1), 12.3);
        assert_eq!(round_to(2.0, 1), 2.0);
    }
}
