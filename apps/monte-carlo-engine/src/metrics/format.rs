//! Console formatting for risk reports.

use std::fmt::Write;

use super::constants::HUNDRED;
use super::types::{Bound, Metric, MetricsReport, PerformanceTest, Threshold};

/// Format a fraction as percentage string.
#[must_use]
pub fn format_pct(value: f64) -> String {
    format!("{:.2}%", value * HUNDRED)
}

/// Format an optional ratio.
#[must_use]
pub fn format_ratio(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}"))
}

/// Format a threshold the way the report lists it, e.g. `< 10%` or `> 2.0`.
#[must_use]
pub fn format_threshold(threshold: &Threshold) -> String {
    let op = match threshold.bound {
        Bound::Below => '<',
        Bound::Above => '>',
    };
    match threshold.metric {
        Metric::ReturnOverDrawdown => format!("{op} {:.1}", threshold.limit),
        _ => format!("{op} {}%", threshold.limit * HUNDRED),
    }
}

/// Render the performance block: every metric, then the thresholds.
#[must_use]
pub fn render_performance(report: &MetricsReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n\n\tMonte Carlo Analysis\n\n");
    let _ = writeln!(out, "\tPerformance\n");

    for metric in [
        Metric::RiskOfRuin,
        Metric::MedianDrawdown,
        Metric::MedianReturn,
        Metric::ReturnOverDrawdown,
        Metric::ProbabilityOfProfit,
    ] {
        let value = match metric {
            Metric::ReturnOverDrawdown => format_ratio(report.return_over_drawdown),
            _ => report.value(metric).map_or_else(|| "N/A".to_string(), format_pct),
        };
        let _ = writeln!(out, "\t{}: {value}", metric.label());
    }

    let _ = writeln!(out, "\n\n\tThreshold\n");
    for threshold in &Threshold::STANDARD {
        let _ = writeln!(
            out,
            "\t{}: {}",
            threshold.metric.label(),
            format_threshold(threshold)
        );
    }
    out.push('\n');
    out
}

/// Render PASS/FAIL lines for a performance test.
#[must_use]
pub fn render_test(test: &PerformanceTest) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\tTest\n");
    for check in &test.checks {
        let _ = writeln!(
            out,
            "\t{}: {}",
            check.threshold.metric.label(),
            check.verdict.label()
        );
    }
    out.push('\n');
    out
}
