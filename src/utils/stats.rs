//! Shared numeric helpers used by the metrics calculator, the product
//! analyzer and the detectors.
//!
//! Every function here is total: degenerate input (empty slices, zero
//! denominators) yields the sentinel `0.0` instead of `NaN` or an error, so
//! callers can always assemble a complete record.

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance (n-1 denominator).
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    sum_sq / (values.len() - 1) as f64
}

/// Sample standard deviation.
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Standard deviation normalised by the magnitude of the mean.
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    let m = mean(values);
    if m == 0.0 {
        return 0.0;
    }
    std_dev(values) / m.abs()
}

/// Smallest and largest value, `(0, 0)` for an empty slice.
pub fn min_max(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

/// Percentage change between the sum of the last `window` values and the
/// sum of the `window` values preceding them.
///
/// The previous sum enters the denominator by magnitude, so the sign of the
/// result always follows the direction of change. Growth from a zero
/// previous sum is ±100% by the sign of the recent sum. Returns `0.0` with
/// fewer than `2 * window` values.
pub fn growth_rate(values: &[f64], window: usize) -> f64 {
    let n = values.len();
    if window == 0 || n < 2 * window {
        return 0.0;
    }
    let recent: f64 = values[n - window..].iter().sum();
    let previous: f64 = values[n - 2 * window..n - window].iter().sum();
    if previous == 0.0 {
        return match recent.partial_cmp(&0.0) {
            Some(std::cmp::Ordering::Greater) => 100.0,
            Some(std::cmp::Ordering::Less) => -100.0,
            _ => 0.0,
        };
    }
    (recent - previous) / previous.abs() * 100.0
}

/// Ordinary least squares line fitted against the observation index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl LinearFit {
    /// Fitted value at index `x`.
    pub fn at(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fit `y = slope * i + intercept` over the indices of `values`.
pub fn linear_fit(values: &[f64]) -> LinearFit {
    let n = values.len();
    if n < 2 {
        return LinearFit {
            slope: 0.0,
            intercept: values.first().copied().unwrap_or(0.0),
            r_squared: 0.0,
        };
    }

    let nf = n as f64;
    let mean_x = (nf - 1.0) / 2.0;
    let mean_y = mean(values);

    let mut ss_xx = 0.0;
    let mut ss_xy = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let dx = i as f64 - mean_x;
        ss_xx += dx * dx;
        ss_xy += dx * (y - mean_y);
    }

    let slope = ss_xy / ss_xx;
    let intercept = mean_y - slope * mean_x;

    let ss_yy: f64 = values.iter().map(|&y| (y - mean_y).powi(2)).sum();
    let ss_res: f64 = values
        .iter()
        .enumerate()
        .map(|(i, &y)| (y - (intercept + slope * i as f64)).powi(2))
        .sum();
    let r_squared = if ss_yy < 1e-12 {
        0.0
    } else {
        (1.0 - ss_res / ss_yy).clamp(0.0, 1.0)
    };

    LinearFit {
        slope,
        intercept,
        r_squared,
    }
}

/// Weighted mean and weighted (population) standard deviation.
///
/// Weights are normalised internally; a zero weight sum yields `(0, 0)`.
pub fn weighted_mean_std(values: &[f64], weights: &[f64]) -> (f64, f64) {
    let total: f64 = weights.iter().take(values.len()).sum();
    if values.is_empty() || total <= 0.0 {
        return (0.0, 0.0);
    }
    let m: f64 = values
        .iter()
        .zip(weights)
        .map(|(v, w)| v * w)
        .sum::<f64>()
        / total;
    let var: f64 = values
        .iter()
        .zip(weights)
        .map(|(v, w)| w * (v - m).powi(2))
        .sum::<f64>()
        / total;
    (m, var.max(0.0).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mean_and_dispersion() {
        assert_relative_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3.0, epsilon = 1e-10);
        assert_relative_eq!(variance(&[1.0, 2.0, 3.0, 4.0, 5.0]), 2.5, epsilon = 1e-10);
        assert_relative_eq!(
            std_dev(&[1.0, 2.0, 3.0, 4.0, 5.0]),
            2.5_f64.sqrt(),
            epsilon = 1e-10
        );
    }

    #[test]
    fn degenerate_inputs_yield_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(variance(&[4.0]), 0.0);
        assert_eq!(coefficient_of_variation(&[0.0, 0.0]), 0.0);
        assert_eq!(min_max(&[]), (0.0, 0.0));
        assert_eq!(growth_rate(&[1.0, 2.0, 3.0], 2), 0.0);
        assert_eq!(growth_rate(&[0.0, 0.0, 0.0, 0.0], 2), 0.0);
    }

    #[test]
    fn growth_from_an_empty_window_is_full() {
        assert_eq!(growth_rate(&[0.0, 0.0, 5.0, 5.0], 2), 100.0);
        // crosses from negative to positive with a zero previous sum
        assert_eq!(growth_rate(&[-1.0, 1.0, 2.0, 3.0], 2), 100.0);
        assert_eq!(growth_rate(&[0.0, 0.0, -5.0, 0.0], 2), -100.0);
    }

    #[test]
    fn growth_rate_compares_adjacent_windows() {
        let values = [10.0, 10.0, 15.0, 15.0];
        assert_relative_eq!(growth_rate(&values, 2), 50.0, epsilon = 1e-10);

        let flat = [7.0; 60];
        assert_eq!(growth_rate(&flat, 30), 0.0);
    }

    #[test]
    fn growth_rate_sign_follows_direction_for_negative_sums() {
        let values = [-10.0, -10.0, -5.0, -5.0];
        assert!(growth_rate(&values, 2) > 0.0);
    }

    #[test]
    fn linear_fit_recovers_line() {
        let values: Vec<f64> = (0..20).map(|i| 3.0 + 2.0 * i as f64).collect();
        let fit = linear_fit(&values);

        assert_relative_eq!(fit.slope, 2.0, epsilon = 1e-10);
        assert_relative_eq!(fit.intercept, 3.0, epsilon = 1e-10);
        assert_relative_eq!(fit.r_squared, 1.0, epsilon = 1e-10);
        assert_relative_eq!(fit.at(20.0), 43.0, epsilon = 1e-10);
    }

    #[test]
    fn linear_fit_of_constant_is_flat() {
        let fit = linear_fit(&[5.0; 10]);
        assert_relative_eq!(fit.slope, 0.0, epsilon = 1e-12);
        assert_relative_eq!(fit.intercept, 5.0, epsilon = 1e-12);
        assert_eq!(fit.r_squared, 0.0);
    }

    #[test]
    fn weighted_dispersion() {
        let (m, s) = weighted_mean_std(&[1.0, 3.0], &[0.5, 0.5]);
        assert_relative_eq!(m, 2.0, epsilon = 1e-12);
        assert_relative_eq!(s, 1.0, epsilon = 1e-12);

        let (m, s) = weighted_mean_std(&[4.0, 4.0, 4.0], &[0.2, 0.3, 0.5]);
        assert_relative_eq!(m, 4.0, epsilon = 1e-12);
        assert_relative_eq!(s, 0.0, epsilon = 1e-12);
    }
}
