//! Core types for Monte Carlo risk metrics.

use serde::{Deserialize, Serialize};

use super::constants::{
    MAX_DRAWDOWN, MAX_RISK_OF_RUIN, MIN_MEDIAN_RETURN, MIN_RETURN_OVER_DRAWDOWN,
};

/// The five statistics derived from an equity-curve matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Share of paths that breach the margin call at any point.
    RiskOfRuin,
    /// Negated median of the pooled running maximum drawdowns.
    MedianDrawdown,
    /// Median total return over the simulated year.
    MedianReturn,
    /// Median return divided by median drawdown.
    ReturnOverDrawdown,
    /// Share of paths ending above initial equity.
    ProbabilityOfProfit,
}

impl Metric {
    /// Console label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::RiskOfRuin => "Risk of Ruin",
            Self::MedianDrawdown => "Median Maximum Drawdown",
            Self::MedianReturn => "Median Return",
            Self::ReturnOverDrawdown => "Return/Drawdown",
            Self::ProbabilityOfProfit => "Prob > 0",
        }
    }
}

/// Direction of a pass/fail threshold. Both comparisons are strict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bound {
    /// Value must be strictly below the limit.
    Below,
    /// Value must be strictly above the limit.
    Above,
}

/// A pass/fail threshold on one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    /// Metric under test.
    pub metric: Metric,
    /// Comparison direction.
    pub bound: Bound,
    /// Limit value (fraction or ratio).
    pub limit: f64,
}

impl Threshold {
    /// Thresholds applied by the performance test, in report order.
    pub const STANDARD: [Self; 4] = [
        Self {
            metric: Metric::RiskOfRuin,
            bound: Bound::Below,
            limit: MAX_RISK_OF_RUIN,
        },
        Self {
            metric: Metric::MedianDrawdown,
            bound: Bound::Below,
            limit: MAX_DRAWDOWN,
        },
        Self {
            metric: Metric::MedianReturn,
            bound: Bound::Above,
            limit: MIN_MEDIAN_RETURN,
        },
        Self {
            metric: Metric::ReturnOverDrawdown,
            bound: Bound::Above,
            limit: MIN_RETURN_OVER_DRAWDOWN,
        },
    ];

    /// Evaluate `value` against this threshold.
    #[must_use]
    pub fn evaluate(&self, value: Option<f64>) -> Verdict {
        let Some(value) = value else {
            return Verdict::Undefined;
        };
        let passed = match self.bound {
            Bound::Below => value < self.limit,
            Bound::Above => value > self.limit,
        };
        if passed { Verdict::Pass } else { Verdict::Fail }
    }
}

/// Outcome of a threshold check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// Threshold met.
    Pass,
    /// Threshold missed.
    Fail,
    /// Metric undefined (return/drawdown with zero drawdown).
    Undefined,
}

impl Verdict {
    /// Console label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Undefined => "UNDEFINED",
        }
    }
}

/// All five statistics for one equity-curve matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Fraction of paths that breached the margin call (0..=1).
    pub risk_of_ruin: f64,
    /// Median maximum drawdown as a positive fraction.
    pub median_drawdown: f64,
    /// Median total return (decimal, e.g. 0.45 = 45%).
    pub median_return: f64,
    /// Median return over median drawdown; `None` when drawdown is zero.
    pub return_over_drawdown: Option<f64>,
    /// Fraction of paths ending above initial equity (0..=1).
    pub probability_of_profit: f64,
}

impl MetricsReport {
    /// Value of `metric`, `None` if undefined.
    #[must_use]
    pub const fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::RiskOfRuin => Some(self.risk_of_ruin),
            Metric::MedianDrawdown => Some(self.median_drawdown),
            Metric::MedianReturn => Some(self.median_return),
            Metric::ReturnOverDrawdown => self.return_over_drawdown,
            Metric::ProbabilityOfProfit => Some(self.probability_of_profit),
        }
    }

    /// Run the standard threshold checks.
    #[must_use]
    pub fn performance_test(&self) -> PerformanceTest {
        let checks = Threshold::STANDARD
            .iter()
            .map(|threshold| {
                let value = self.value(threshold.metric);
                ThresholdCheck {
                    threshold: *threshold,
                    value,
                    verdict: threshold.evaluate(value),
                }
            })
            .collect();
        PerformanceTest { checks }
    }
}

/// One evaluated threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdCheck {
    /// Threshold applied.
    pub threshold: Threshold,
    /// Observed value.
    pub value: Option<f64>,
    /// Outcome.
    pub verdict: Verdict,
}

/// PASS/FAIL results for every standard threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceTest {
    /// Checks in report order.
    pub checks: Vec<ThresholdCheck>,
}

impl PerformanceTest {
    /// True when every check passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.checks.iter().all(|c| c.verdict == Verdict::Pass)
    }

    /// Verdict for `metric`, if it is tested.
    #[must_use]
    pub fn verdict(&self, metric: Metric) -> Option<Verdict> {
        self.checks
            .iter()
            .find(|c| c.threshold.metric == metric)
            .map(|c| c.verdict)
    }
}
