//! Per-matrix memoization of metric values.

use super::types::Metric;
use crate::error::MetricsError;

/// One cache slot per metric, valid for a single matrix generation.
///
/// Looking up a different generation clears every slot first. Failed
/// computations are never stored.
#[derive(Debug, Clone, Default)]
pub struct MetricsCache {
    generation: Option<u64>,
    risk_of_ruin: Option<f64>,
    median_drawdown: Option<f64>,
    median_return: Option<f64>,
    return_over_drawdown: Option<f64>,
    probability_of_profit: Option<f64>,
}

impl MetricsCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every cached value.
    pub fn invalidate(&mut self) {
        *self = Self::default();
    }

    /// Generation the cached values belong to.
    #[must_use]
    pub const fn generation(&self) -> Option<u64> {
        self.generation
    }

    /// Cached value of `metric` for `generation`, if any.
    #[must_use]
    pub const fn get(&self, generation: u64, metric: Metric) -> Option<f64> {
        match self.generation {
            Some(current) if current == generation => *self.slot(metric),
            _ => None,
        }
    }

    /// Return the cached value or compute, store and return it.
    pub fn get_or_try_insert_with<F>(
        &mut self,
        generation: u64,
        metric: Metric,
        compute: F,
    ) -> Result<f64, MetricsError>
    where
        F: FnOnce() -> Result<f64, MetricsError>,
    {
        if self.generation != Some(generation) {
            self.invalidate();
            self.generation = Some(generation);
        }
        let slot = self.slot_mut(metric);
        if let Some(value) = *slot {
            return Ok(value);
        }
        let value = compute()?;
        *slot = Some(value);
        Ok(value)
    }

    const fn slot(&self, metric: Metric) -> &Option<f64> {
        match metric {
            Metric::RiskOfRuin => &self.risk_of_ruin,
            Metric::MedianDrawdown => &self.median_drawdown,
            Metric::MedianReturn => &self.median_return,
            Metric::ReturnOverDrawdown => &self.return_over_drawdown,
            Metric::ProbabilityOfProfit => &self.probability_of_profit,
        }
    }

    const fn slot_mut(&mut self, metric: Metric) -> &mut Option<f64> {
        match metric {
            Metric::RiskOfRuin => &mut self.risk_of_ruin,
            Metric::MedianDrawdown => &mut self.median_drawdown,
            Metric::MedianReturn => &mut self.median_return,
            Metric::ReturnOverDrawdown => &mut self.return_over_drawdown,
            Metric::ProbabilityOfProfit => &mut self.probability_of_profit,
        }
    }
}
