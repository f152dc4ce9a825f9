//! Memoizing Monte Carlo analysis.
//!
//! [`MonteCarloAnalysis`] owns a simulator, the most recent equity-curve
//! matrix and one cache slot per metric. Slots are keyed on the matrix
//! generation and cleared whenever [`MonteCarloAnalysis::compose`] installs a
//! new matrix, so a metric can never be read from a previous run.

use tracing::{debug, info};

use crate::config::Config;
use crate::error::{AnalysisError, MetricsError, SimulationError};
use crate::journal::load_trade_pool;
use crate::metrics::{self, Metric, MetricsCache, MetricsReport, PerformanceTest, RiskCalculator};
use crate::simulation::{EquityCurveMatrix, EquityCurveSimulator, SimulationInput};

/// Simulator plus lazily computed, memoized risk statistics.
#[derive(Debug)]
pub struct MonteCarloAnalysis {
    simulator: EquityCurveSimulator,
    matrix: Option<EquityCurveMatrix>,
    cache: MetricsCache,
}

impl MonteCarloAnalysis {
    /// Wrap a simulator. No matrix exists until [`Self::compose`] runs.
    #[must_use]
    pub fn new(simulator: EquityCurveSimulator) -> Self {
        Self {
            simulator,
            matrix: None,
            cache: MetricsCache::new(),
        }
    }

    /// Load the trade journals and build a simulator from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the journals cannot be loaded or the simulation
    /// parameters are rejected.
    pub fn from_config(config: &Config) -> Result<Self, AnalysisError> {
        let pool = load_trade_pool(&config.journal)?;
        let input = SimulationInput::new(pool, config.simulation.params())?;
        let simulator =
            EquityCurveSimulator::new(input, config.parallel.clone(), config.simulation.seed)?;
        Ok(Self::new(simulator))
    }

    /// The underlying simulator.
    #[must_use]
    pub const fn simulator(&self) -> &EquityCurveSimulator {
        &self.simulator
    }

    /// Seed of the random source.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.simulator.seed()
    }

    /// The current matrix, if one has been composed.
    #[must_use]
    pub const fn matrix(&self) -> Option<&EquityCurveMatrix> {
        self.matrix.as_ref()
    }

    /// Simulate a new matrix, replacing the previous one and every cached metric.
    ///
    /// # Errors
    ///
    /// Returns error if either dimension is zero. The previous matrix and its
    /// cached metrics are kept in that case.
    pub fn compose(
        &mut self,
        yearly_trades: usize,
        sample_n: usize,
    ) -> Result<&EquityCurveMatrix, SimulationError> {
        let matrix = self.simulator.compose(yearly_trades, sample_n)?;
        self.cache.invalidate();
        info!(generation = matrix.generation(), "Equity curve matrix installed");
        Ok(&*self.matrix.insert(matrix))
    }

    /// Fraction of paths that breach the margin call.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::NotComposed`] before the first compose.
    pub fn risk_of_ruin(&mut self) -> Result<f64, MetricsError> {
        self.cached(Metric::RiskOfRuin, |calc| Ok(calc.risk_of_ruin()))
    }

    /// Median maximum drawdown as a positive fraction.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::NotComposed`] before the first compose, or
    /// [`MetricsError::NonFiniteMetric`] if a path reaches a zero peak.
    pub fn drawdown(&mut self) -> Result<f64, MetricsError> {
        self.cached(Metric::MedianDrawdown, |calc| calc.median_drawdown())
    }

    /// Median total return over paths.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::NotComposed`] before the first compose.
    pub fn median_return(&mut self) -> Result<f64, MetricsError> {
        self.cached(Metric::MedianReturn, |calc| calc.median_return())
    }

    /// Median return divided by median drawdown.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::ZeroDrawdown`] when the median drawdown is zero.
    pub fn return_over_drawdown(&mut self) -> Result<f64, MetricsError> {
        let median_return = self.median_return()?;
        let drawdown = self.drawdown()?;
        self.cached(Metric::ReturnOverDrawdown, |_| {
            metrics::return_over_drawdown(median_return, drawdown)
        })
    }

    /// Fraction of paths ending above initial equity.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::NotComposed`] before the first compose.
    pub fn probability_of_profit(&mut self) -> Result<f64, MetricsError> {
        self.cached(Metric::ProbabilityOfProfit, |calc| {
            Ok(calc.probability_of_profit())
        })
    }

    /// All five statistics, computing any that are not cached yet.
    ///
    /// # Errors
    ///
    /// Returns the first metric error other than a zero drawdown, which
    /// leaves `return_over_drawdown` empty instead.
    pub fn report(&mut self) -> Result<MetricsReport, MetricsError> {
        Ok(MetricsReport {
            risk_of_ruin: self.risk_of_ruin()?,
            median_drawdown: self.drawdown()?,
            median_return: self.median_return()?,
            return_over_drawdown: metrics::defined(self.return_over_drawdown())?,
            probability_of_profit: self.probability_of_profit()?,
        })
    }

    /// Score the report against the standard thresholds.
    ///
    /// # Errors
    ///
    /// Same as [`Self::report`].
    pub fn performance_test(&mut self) -> Result<PerformanceTest, MetricsError> {
        let test = self.report()?.performance_test();
        debug!(passed = test.passed(), "Performance test evaluated");
        Ok(test)
    }

    fn cached<F>(&mut self, metric: Metric, compute: F) -> Result<f64, MetricsError>
    where
        F: FnOnce(&RiskCalculator<'_>) -> Result<f64, MetricsError>,
    {
        let matrix = self.matrix.as_ref().ok_or(MetricsError::NotComposed)?;
        let calc = RiskCalculator::new(matrix);
        self.cache
            .get_or_try_insert_with(matrix.generation(), metric, || compute(&calc))
    }
}
