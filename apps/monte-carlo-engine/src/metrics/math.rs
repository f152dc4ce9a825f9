//! Order statistics and rolling-window extrema.

use std::collections::VecDeque;

/// Median, averaging the two middle values for even counts.
///
/// Reorders `values`. Any NaN makes the median NaN.
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    if values.iter().any(|v| v.is_nan()) {
        return Some(f64::NAN);
    }

    let n = values.len();
    let (lower, upper, _) = values.select_nth_unstable_by(n / 2, f64::total_cmp);
    let upper = *upper;
    if n % 2 == 1 {
        return Some(upper);
    }
    let lower = lower.iter().copied().max_by(f64::total_cmp)?;
    Some((lower + upper) / 2.0)
}

/// Trailing maximum over at most `window` points, including the current one.
pub fn rolling_max(values: &[f64], window: usize) -> Vec<f64> {
    rolling_extreme(values, window, |candidate, held| candidate >= held)
}

/// Trailing minimum over at most `window` points, including the current one.
pub fn rolling_min(values: &[f64], window: usize) -> Vec<f64> {
    rolling_extreme(values, window, |candidate, held| candidate <= held)
}

/// Monotonic-deque sliding extreme; `dominates(new, old)` evicts `old`.
fn rolling_extreme(
    values: &[f64],
    window: usize,
    dominates: impl Fn(f64, f64) -> bool,
) -> Vec<f64> {
    let window = window.max(1);
    let mut out = Vec::with_capacity(values.len());
    let mut candidates: VecDeque<usize> = VecDeque::with_capacity(window.min(values.len()));

    for (i, &value) in values.iter().enumerate() {
        while candidates.back().is_some_and(|&j| dominates(value, values[j])) {
            candidates.pop_back();
        }
        candidates.push_back(i);
        while candidates.front().is_some_and(|&j| j + window <= i) {
            candidates.pop_front();
        }
        if let Some(&j) = candidates.front() {
            out.push(values[j]);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd() {
        let mut values = vec![5.0, 1.0, 3.0];
        assert_eq!(median(&mut values), Some(3.0));
    }

    #[test]
    fn test_median_even_averages_middle() {
        let mut values = vec![4.0, 1.0, 3.0, 2.0];
        assert_eq!(median(&mut values), Some(2.5));
    }

    #[test]
    fn test_median_empty() {
        assert_eq!(median(&mut []), None);
    }

    #[test]
    fn test_median_nan_propagates() {
        let mut values = vec![1.0, f64::NAN, 2.0];
        assert!(median(&mut values).is_some_and(f64::is_nan));
    }

    #[test]
    fn test_rolling_max_grows_window_at_start() {
        let values = [3.0, 1.0, 4.0, 1.0, 5.0];
        assert_eq!(rolling_max(&values, 100), vec![3.0, 3.0, 4.0, 4.0, 5.0]);
    }

    #[test]
    fn test_rolling_max_forgets_outside_window() {
        let values = [9.0, 1.0, 2.0, 1.0, 0.0];
        assert_eq!(rolling_max(&values, 2), vec![9.0, 9.0, 2.0, 2.0, 1.0]);
    }

    #[test]
    fn test_rolling_min_forgets_outside_window() {
        let values = [-0.5, 0.0, -0.1, 0.0, 0.0];
        assert_eq!(rolling_min(&values, 3), vec![-0.5, -0.5, -0.5, -0.1, -0.1]);
    }

    #[test]
    fn test_rolling_matches_naive_window() {
        let values: Vec<f64> = (0..250)
            .map(|i| ((i * 37) % 101) as f64 - 50.0)
            .collect();
        let window = 100;

        let fast_max = rolling_max(&values, window);
        let fast_min = rolling_min(&values, window);

        for i in 0..values.len() {
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            let naive_max = slice.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let naive_min = slice.iter().copied().fold(f64::INFINITY, f64::min);
            assert_eq!(fast_max[i], naive_max, "max at {i}");
            assert_eq!(fast_min[i], naive_min, "min at {i}");
        }
    }
}
