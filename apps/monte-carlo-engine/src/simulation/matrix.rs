//! Equity-curve matrix: the only artifact passed from simulation to metrics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::error::SimulationError;

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// Simulated equity curves, one row per path.
///
/// Stored row-major: row `m`, column `n` is the portfolio value after trade
/// `n` of path `m`. Every matrix carries a process-unique generation number;
/// memoized metrics are keyed on it.
#[derive(Debug, Clone, Serialize)]
pub struct EquityCurveMatrix {
    #[serde(skip)]
    generation: u64,
    sample_n: usize,
    yearly_trades: usize,
    initial_value: f64,
    margin_call: f64,
    values: Vec<f64>,
}

impl EquityCurveMatrix {
    /// Wrap an already-filled row-major buffer.
    pub(crate) fn from_buffer(
        values: Vec<f64>,
        sample_n: usize,
        yearly_trades: usize,
        initial_value: f64,
        margin_call: f64,
    ) -> Self {
        debug_assert_eq!(values.len(), sample_n * yearly_trades);
        Self {
            generation: next_generation(),
            sample_n,
            yearly_trades,
            initial_value,
            margin_call,
            values,
        }
    }

    /// Build a matrix from explicit rows.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidParameter`] if there are no rows,
    /// a row is empty, or rows differ in length.
    pub fn from_rows(
        rows: Vec<Vec<f64>>,
        initial_value: f64,
        margin_call: f64,
    ) -> Result<Self, SimulationError> {
        let sample_n = rows.len();
        let yearly_trades = rows.first().map_or(0, Vec::len);
        if sample_n == 0 || yearly_trades == 0 {
            return Err(SimulationError::invalid(
                "rows",
                "equity curves need at least one row and one column",
            ));
        }
        if let Some(bad) = rows.iter().position(|r| r.len() != yearly_trades) {
            return Err(SimulationError::invalid(
                "rows",
                format!(
                    "row {bad} has {} points, expected {yearly_trades}",
                    rows[bad].len()
                ),
            ));
        }
        let values = rows.into_iter().flatten().collect();
        Ok(Self::from_buffer(
            values,
            sample_n,
            yearly_trades,
            initial_value,
            margin_call,
        ))
    }

    /// Memoization key for metrics derived from this matrix.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of simulated paths (rows).
    #[must_use]
    pub const fn sample_n(&self) -> usize {
        self.sample_n
    }

    /// Trades per path (columns).
    #[must_use]
    pub const fn yearly_trades(&self) -> usize {
        self.yearly_trades
    }

    /// Starting equity every path was built from.
    #[must_use]
    pub const fn initial_value(&self) -> f64 {
        self.initial_value
    }

    /// Ruin floor the matrix is scored against.
    #[must_use]
    pub const fn margin_call(&self) -> f64 {
        self.margin_call
    }

    /// Row-major values.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// One path's equity curve.
    #[must_use]
    pub fn row(&self, m: usize) -> Option<&[f64]> {
        self.rows().nth(m)
    }

    /// Iterate over paths.
    pub fn rows(&self) -> std::slice::ChunksExact<'_, f64> {
        self.values.chunks_exact(self.yearly_trades)
    }

    /// Final equity of every path.
    pub fn final_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows().filter_map(|row| row.last().copied())
    }

    /// Whether every value is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_shape() {
        let matrix =
            EquityCurveMatrix::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]], 1.0, 0.0)
                .unwrap();

        assert_eq!(matrix.sample_n(), 2);
        assert_eq!(matrix.yearly_trades(), 3);
        assert_eq!(matrix.row(1), Some(&[4.0, 5.0, 6.0][..]));
        assert_eq!(matrix.row(2), None);
        assert_eq!(matrix.final_values().collect::<Vec<_>>(), vec![3.0, 6.0]);
    }

    #[test]
    fn test_from_rows_rejects_ragged_rows() {
        let err = EquityCurveMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]], 1.0, 0.0)
            .unwrap_err();
        assert!(err.to_string().contains("row 1 has 1 points"));
    }

    #[test]
    fn test_from_rows_rejects_empty() {
        assert!(EquityCurveMatrix::from_rows(vec![], 1.0, 0.0).is_err());
        assert!(EquityCurveMatrix::from_rows(vec![vec![]], 1.0, 0.0).is_err());
    }

    #[test]
    fn test_generations_are_unique() {
        let a = EquityCurveMatrix::from_rows(vec![vec![1.0]], 1.0, 0.0).unwrap();
        let b = a.clone();
        let c = EquityCurveMatrix::from_rows(vec![vec![1.0]], 1.0, 0.0).unwrap();

        assert_eq!(a.generation(), b.generation());
        assert_ne!(a.generation(), c.generation());
    }

    #[test]
    fn test_is_finite() {
        let finite = EquityCurveMatrix::from_rows(vec![vec![1.0, -2.0]], 1.0, 0.0).unwrap();
        let infinite =
            EquityCurveMatrix::from_rows(vec![vec![1.0, f64::INFINITY]], 1.0, 0.0).unwrap();
        assert!(finite.is_finite());
        assert!(!infinite.is_finite());
    }
}
