//! Constants for risk metric calculations.

/// Trailing window, in trades, for the rolling peak and the rolling worst
/// drawdown. Shorter at the start of a path (minimum one point).
pub const DRAWDOWN_WINDOW: usize = 100;

/// Risk of ruin must stay strictly below this fraction.
pub const MAX_RISK_OF_RUIN: f64 = 0.10;
/// Median maximum drawdown must stay strictly below this fraction.
pub const MAX_DRAWDOWN: f64 = 0.40;
/// Median return must strictly exceed this fraction.
pub const MIN_MEDIAN_RETURN: f64 = 0.40;
/// Return/drawdown must strictly exceed this ratio.
pub const MIN_RETURN_OVER_DRAWDOWN: f64 = 2.0;

pub const HUNDRED: f64 = 100.0;
