//! Risk statistics over an equity-curve matrix.

use super::constants::DRAWDOWN_WINDOW;
use super::math::{median, rolling_max, rolling_min};
use super::types::MetricsReport;
use crate::error::MetricsError;
use crate::simulation::EquityCurveMatrix;

/// Stateless calculator borrowing one matrix.
///
/// Every method recomputes from the matrix; memoization lives in
/// [`crate::analysis::MonteCarloAnalysis`].
#[derive(Debug, Clone, Copy)]
pub struct RiskCalculator<'a> {
    matrix: &'a EquityCurveMatrix,
    window: usize,
}

impl<'a> RiskCalculator<'a> {
    /// Create a calculator using the standard drawdown window.
    #[must_use]
    pub const fn new(matrix: &'a EquityCurveMatrix) -> Self {
        Self {
            matrix,
            window: DRAWDOWN_WINDOW,
        }
    }

    /// Override the rolling drawdown window (minimum one point).
    #[must_use]
    pub const fn with_window(mut self, window: usize) -> Self {
        self.window = if window == 0 { 1 } else { window };
        self
    }

    /// Fraction of paths that dip below the margin call at any point.
    #[must_use]
    pub fn risk_of_ruin(&self) -> f64 {
        let floor = self.matrix.margin_call();
        let ruined = self
            .matrix
            .rows()
            .filter(|row| row.iter().any(|&equity| equity < floor))
            .count();
        ruined as f64 / self.matrix.sample_n() as f64
    }

    /// Median over paths of `final / initial - 1`.
    pub fn median_return(&self) -> Result<f64, MetricsError> {
        let initial = self.matrix.initial_value();
        let mut returns: Vec<f64> = self
            .matrix
            .final_values()
            .map(|last| last / initial - 1.0)
            .collect();
        finite("median_return", median(&mut returns))
    }

    /// Fraction of paths whose final equity strictly exceeds initial equity.
    #[must_use]
    pub fn probability_of_profit(&self) -> f64 {
        let initial = self.matrix.initial_value();
        let profitable = self
            .matrix
            .final_values()
            .filter(|&last| last > initial)
            .count();
        profitable as f64 / self.matrix.sample_n() as f64
    }

    /// Median maximum drawdown, as a positive fraction.
    ///
    /// Every point of every path's running worst drawdown is pooled before
    /// taking the median, so long paths weigh in per trade, not per path.
    pub fn median_drawdown(&self) -> Result<f64, MetricsError> {
        let mut pooled = Vec::with_capacity(self.matrix.values().len());
        for row in self.matrix.rows() {
            pooled.extend(running_max_drawdown(row, self.window));
        }
        // Flip sign without turning a zero median into -0.0.
        let drawdown = median(&mut pooled).map(|m| if m == 0.0 { 0.0 } else { -m });
        finite("median_drawdown", drawdown)
    }

    /// Median return over median drawdown.
    pub fn return_over_drawdown(&self) -> Result<f64, MetricsError> {
        return_over_drawdown(self.median_return()?, self.median_drawdown()?)
    }

    /// Compute all five statistics.
    ///
    /// A zero drawdown leaves `return_over_drawdown` empty; other errors abort.
    pub fn calculate(&self) -> Result<MetricsReport, MetricsError> {
        let median_return = self.median_return()?;
        let median_drawdown = self.median_drawdown()?;
        Ok(MetricsReport {
            risk_of_ruin: self.risk_of_ruin(),
            median_drawdown,
            median_return,
            return_over_drawdown: defined(return_over_drawdown(median_return, median_drawdown))?,
            probability_of_profit: self.probability_of_profit(),
        })
    }
}

/// Running worst drawdown at every point of one equity curve (values ≤ 0).
///
/// Drawdown is measured against the trailing `window`-point peak, then the
/// worst drawdown over the trailing `window` points is kept.
#[must_use]
pub fn running_max_drawdown(equity: &[f64], window: usize) -> Vec<f64> {
    let peaks = rolling_max(equity, window);
    let drawdowns: Vec<f64> = equity
        .iter()
        .zip(&peaks)
        .map(|(value, peak)| value / peak - 1.0)
        .collect();
    rolling_min(&drawdowns, window)
}

/// `median_return / drawdown`, rejecting a zero or non-finite result.
pub fn return_over_drawdown(median_return: f64, drawdown: f64) -> Result<f64, MetricsError> {
    if drawdown == 0.0 {
        return Err(MetricsError::ZeroDrawdown { median_return });
    }
    finite("return_over_drawdown", Some(median_return / drawdown))
}

/// Turn `ZeroDrawdown` into an absent value, keeping other errors.
pub(crate) fn defined(result: Result<f64, MetricsError>) -> Result<Option<f64>, MetricsError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(MetricsError::ZeroDrawdown { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

fn finite(metric: &'static str, value: Option<f64>) -> Result<f64, MetricsError> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        Some(v) => Err(MetricsError::NonFiniteMetric { metric, value: v }),
        // Matrices always have at least one row and column.
        None => Err(MetricsError::NonFiniteMetric {
            metric,
            value: f64::NAN,
        }),
    }
}
