//! Small descriptive-statistics helpers shared by the analyzers
//!
//! All helpers return `0.0` on empty input instead of NaN so callers can
//! guard on length once and then compose freely.

use statrs::statistics::{Data, Median, Statistics};

/// Arithmetic mean
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().mean()
}

/// Population standard deviation (divides by n)
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().population_std_dev()
}

/// Population variance (divides by n)
pub fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().population_variance()
}

/// Coefficient of variation as a percentage of the mean.
/// Returns `0.0` when the mean is not positive.
pub fn coefficient_of_variation_pct(values: &[f64]) -> f64 {
    let avg = mean(values);
    if avg <= 0.0 {
        return 0.0;
    }
    population_std_dev(values) / avg * 100.0
}

/// Median, averaging the two middle values for even lengths
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    Data::new(values.to_vec()).median()
}

/// Largest value, or `0.0` for an empty slice
pub fn max_value(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::max).unwrap_or(0.0)
}

/// Smallest value, or `0.0` for an empty slice
pub fn min_value(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::min).unwrap_or(0.0)
}

/// Mean of the first and second halves split at `len / 2`
pub fn half_means(values: &[f64]) -> (f64, f64) {
    let mid = values.len() / 2;
    (mean(&values[..mid]), mean(&values[mid..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_std_dev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&values) - 5.0).abs() < 1e-9);
        assert!((population_std_dev(&values) - 2.0).abs() < 1e-9);
        assert!((population_variance(&values) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_inputs_are_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(population_std_dev(&[]), 0.0);
        assert_eq!(median(&[]), 0.0);
        assert_eq!(coefficient_of_variation_pct(&[]), 0.0);
        assert_eq!(max_value(&[]), 0.0);
    }

    #[test]
    fn test_median() {
        assert!((median(&[3.0, 1.0, 2.0]) - 2.0).abs() < 1e-9);
        assert!((median(&[4.0, 1.0, 3.0, 2.0]) - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_coefficient_of_variation() {
        let cv = coefficient_of_variation_pct(&[10.0, 10.0, 10.0]);
        assert_eq!(cv, 0.0);

        let cv = coefficient_of_variation_pct(&[8.0, 12.0]);
        assert!((cv - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_half_means() {
        let (first, second) = half_means(&[1.0, 1.0, 3.0, 3.0, 3.0]);
        assert!((first - 1.0).abs() < 1e-9);
        assert!((second - 3.0).abs() < 1e-9);
    }
}
