//! Error handling for the Monte Carlo engine.
//!
//! Each concern owns a `thiserror` enum:
//!
//! | Error | Raised by | Meaning |
//! |-------|-----------|---------|
//! | [`SimulationError`] | pool, parameters, simulator | Configuration rejected before sampling |
//! | [`MetricsError`] | metrics engine | Degenerate or non-finite statistic |
//! | [`JournalError`] | journal loader | Trade journal could not be ingested |
//! | [`ConfigError`] | config loader | Config file unreadable or invalid |
//!
//! [`AnalysisError`] unifies them for callers driving the whole pipeline and
//! maps every variant onto a stable [`ErrorCode`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::config::ConfigError;
pub use crate::journal::JournalError;

/// Error codes for the Monte Carlo engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Configuration errors
    /// A simulation parameter is out of range.
    InvalidParameter,
    /// The trade pool has no trades to sample from.
    EmptyTradePool,
    /// The rayon thread pool could not be built.
    ThreadPool,
    /// The configuration file is unreadable or invalid.
    InvalidConfig,

    // Metric errors
    /// Median drawdown is zero, so return/drawdown is undefined.
    ZeroDrawdown,
    /// A metric evaluated to NaN or infinity.
    NonFiniteMetric,
    /// A metric was requested before any equity curves were composed.
    NotComposed,

    // Ingestion errors
    /// A trade journal could not be read or parsed.
    JournalUnreadable,
}

impl ErrorCode {
    /// Get the error reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidParameter => "INVALID_PARAMETER",
            Self::EmptyTradePool => "EMPTY_TRADE_POOL",
            Self::ThreadPool => "THREAD_POOL",
            Self::InvalidConfig => "INVALID_CONFIG",
            Self::ZeroDrawdown => "ZERO_DRAWDOWN",
            Self::NonFiniteMetric => "NON_FINITE_METRIC",
            Self::NotComposed => "NOT_COMPOSED",
            Self::JournalUnreadable => "JOURNAL_UNREADABLE",
        }
    }

    /// Whether the error stems from caller-supplied configuration.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidParameter | Self::EmptyTradePool | Self::ThreadPool | Self::InvalidConfig
        )
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// Errors raised while building equity curves.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    /// A simulation parameter is out of range.
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Why the value was rejected.
        message: String,
    },

    /// Sampling from an empty pool is undefined.
    #[error("Trade pool is empty; nothing to resample")]
    EmptyTradePool,

    /// Thread pool initialization failed.
    #[error("Failed to initialize thread pool: {message}")]
    ThreadPoolError {
        /// Error message.
        message: String,
    },
}

impl SimulationError {
    /// Build an [`SimulationError::InvalidParameter`].
    pub fn invalid(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            message: message.into(),
        }
    }
}

/// Errors raised while deriving risk statistics.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MetricsError {
    /// Median drawdown of exactly zero makes return/drawdown undefined.
    #[error("Median drawdown is zero; return/drawdown undefined (median return {median_return})")]
    ZeroDrawdown {
        /// Median return that would have been divided.
        median_return: f64,
    },

    /// A metric evaluated to NaN or infinity.
    #[error("Metric '{metric}' is not finite: {value}")]
    NonFiniteMetric {
        /// Metric name.
        metric: &'static str,
        /// Offending value.
        value: f64,
    },

    /// No equity-curve matrix exists yet.
    #[error("No equity curves composed; call compose first")]
    NotComposed,
}

/// Top-level error for the full analysis pipeline.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Simulation failed.
    #[error(transparent)]
    Simulation(#[from] SimulationError),

    /// Metric computation failed.
    #[error(transparent)]
    Metrics(#[from] MetricsError),

    /// Trade journal ingestion failed.
    #[error(transparent)]
    Journal(#[from] JournalError),

    /// Configuration loading failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AnalysisError {
    /// Stable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Simulation(SimulationError::InvalidParameter { .. }) => {
                ErrorCode::InvalidParameter
            }
            Self::Simulation(SimulationError::EmptyTradePool) => ErrorCode::EmptyTradePool,
            Self::Simulation(SimulationError::ThreadPoolError { .. }) => ErrorCode::ThreadPool,
            Self::Metrics(MetricsError::ZeroDrawdown { .. }) => ErrorCode::ZeroDrawdown,
            Self::Metrics(MetricsError::NonFiniteMetric { .. }) => ErrorCode::NonFiniteMetric,
            Self::Metrics(MetricsError::NotComposed) => ErrorCode::NotComposed,
            Self::Journal(JournalError::NoTrades { .. }) => ErrorCode::EmptyTradePool,
            Self::Journal(_) => ErrorCode::JournalUnreadable,
            Self::Config(_) => ErrorCode::InvalidConfig,
        }
    }
}
