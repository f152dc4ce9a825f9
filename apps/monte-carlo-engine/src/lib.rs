// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::panic,
        clippy::cast_precision_loss,
        clippy::items_after_statements
    )
)]

//! Monte Carlo Engine - Trading System Risk Analysis
//!
//! Bootstraps synthetic trading years from a historical trade journal and
//! scores the resulting equity curves against fixed risk thresholds.
//!
//! # Pipeline
//!
//! ```text
//! *.csv journals ─> TradePool ─┐
//!                              ├─> SimulationInput ─> EquityCurveSimulator::compose
//! SimulationParams ────────────┘                          │
//!                                                         v
//!              MetricsReport <── RiskCalculator <── EquityCurveMatrix
//!                   │
//!                   v
//!            PerformanceTest (PASS / FAIL per threshold)
//! ```
//!
//! # Modules
//!
//! - `simulation`: trade pool, parameters, equity-curve matrix, simulator
//! - `metrics`: risk of ruin, drawdown, returns, thresholds, formatting
//! - `analysis`: memoizing wrapper that ties simulator and metrics together
//! - `journal`: CSV trade journal ingestion
//! - `config`: YAML configuration with environment interpolation
//! - `telemetry`: tracing subscriber setup
//! - `error`: error types and stable error codes
//!
//! # Example
//!
//! ```rust
//! use monte_carlo_engine::analysis::MonteCarloAnalysis;
//! use monte_carlo_engine::simulation::{SimulationParams, SimulatorBuilder, Trade};
//!
//! let simulator = SimulatorBuilder::new()
//!     .trades(vec![Trade::new(4.0, 1.0), Trade::new(-2.0, 1.0)])
//!     .params(SimulationParams::default())
//!     .seed(42)
//!     .build()?;
//!
//! let mut analysis = MonteCarloAnalysis::new(simulator);
//! analysis.compose(100, 30)?;
//! let report = analysis.report()?;
//! assert!((0.0..=1.0).contains(&report.risk_of_ruin));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod journal;
pub mod metrics;
pub mod simulation;
pub mod telemetry;

pub use analysis::MonteCarloAnalysis;
pub use config::{Config, load_config};
pub use error::{AnalysisError, ErrorCode, MetricsError, SimulationError};
pub use metrics::{MetricsReport, PerformanceTest, Verdict};
pub use simulation::{EquityCurveMatrix, EquityCurveSimulator, SimulationParams, Trade, TradePool};
