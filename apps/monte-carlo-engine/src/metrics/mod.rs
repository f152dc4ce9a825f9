//! Risk metrics derived from simulated equity curves.
//!
//! Implements the five statistics scored by the performance test:
//! - Risk of ruin (any point below the margin call)
//! - Median maximum drawdown (rolling 100-trade window, pooled per point)
//! - Median return
//! - Return over drawdown
//! - Probability of profit

mod cache;
mod calculator;
mod constants;
mod format;
mod math;
mod types;

pub use cache::MetricsCache;
pub use calculator::{RiskCalculator, return_over_drawdown, running_max_drawdown};
pub(crate) use calculator::defined;
pub use constants::{
    DRAWDOWN_WINDOW, MAX_DRAWDOWN, MAX_RISK_OF_RUIN, MIN_MEDIAN_RETURN, MIN_RETURN_OVER_DRAWDOWN,
};
pub use format::{format_pct, format_ratio, format_threshold, render_performance, render_test};
pub use math::{median, rolling_max, rolling_min};
pub use types::{Bound, Metric, MetricsReport, PerformanceTest, Threshold, ThresholdCheck, Verdict};
