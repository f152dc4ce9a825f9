//! Simulation parameters and the immutable simulation input.

use serde::{Deserialize, Serialize};

use super::pool::TradePool;
use crate::error::SimulationError;

/// Portfolio and cost parameters applied to every simulated path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    /// Starting portfolio equity.
    pub initial_value: f64,
    /// Equity floor; any point below it counts as ruin.
    pub margin_call: f64,
    /// Flat slippage charged per contract.
    pub slippage: f64,
    /// Flat commission charged per contract.
    pub commission: f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            initial_value: 300_000.0,
            margin_call: 80_000.0,
            slippage: 0.0,
            commission: 0.0,
        }
    }
}

impl SimulationParams {
    /// Total flat cost per contract traded.
    #[must_use]
    pub fn cost_per_contract(&self) -> f64 {
        self.slippage + self.commission
    }

    /// Validate parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidParameter`] for a non-positive or
    /// non-finite initial value, a non-finite margin call, or negative costs.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !self.initial_value.is_finite() || self.initial_value <= 0.0 {
            return Err(SimulationError::invalid(
                "initial_value",
                format!("must be positive, got {}", self.initial_value),
            ));
        }
        if !self.margin_call.is_finite() {
            return Err(SimulationError::invalid(
                "margin_call",
                format!("must be finite, got {}", self.margin_call),
            ));
        }
        for (name, value) in [("slippage", self.slippage), ("commission", self.commission)] {
            if !value.is_finite() || value < 0.0 {
                return Err(SimulationError::invalid(
                    name,
                    format!("must be a non-negative amount, got {value}"),
                ));
            }
        }
        Ok(())
    }
}

/// Trade pool plus parameters: everything a simulation reads.
#[derive(Debug, Clone)]
pub struct SimulationInput {
    pool: TradePool,
    params: SimulationParams,
}

impl SimulationInput {
    /// Pair a pool with validated parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if `params` fails [`SimulationParams::validate`].
    pub fn new(pool: TradePool, params: SimulationParams) -> Result<Self, SimulationError> {
        params.validate()?;
        Ok(Self { pool, params })
    }

    /// The trade pool.
    #[must_use]
    pub const fn pool(&self) -> &TradePool {
        &self.pool
    }

    /// The simulation parameters.
    #[must_use]
    pub const fn params(&self) -> &SimulationParams {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::Trade;

    #[test]
    fn test_defaults_match_cli_defaults() {
        let params = SimulationParams::default();
        assert_eq!(params.initial_value, 300_000.0);
        assert_eq!(params.margin_call, 80_000.0);
        assert_eq!(params.cost_per_contract(), 0.0);
    }

    #[test]
    fn test_cost_per_contract_sums_fees() {
        let params = SimulationParams {
            slippage: 12.5,
            commission: 2.25,
            ..Default::default()
        };
        assert_eq!(params.cost_per_contract(), 14.75);
    }

    #[test]
    fn test_validate_rejects_non_positive_initial_value() {
        let params = SimulationParams {
            initial_value: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(SimulationError::InvalidParameter {
                name: "initial_value",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_negative_costs() {
        let params = SimulationParams {
            commission: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(SimulationError::InvalidParameter {
                name: "commission",
                ..
            })
        ));
    }

    #[test]
    fn test_margin_call_above_initial_value_is_allowed() {
        let params = SimulationParams {
            initial_value: 1_000.0,
            margin_call: 5_000.0,
            ..Default::default()
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_input_validates_params() {
        let pool = TradePool::new(vec![Trade::new(1.0, 1.0)]).unwrap();
        let params = SimulationParams {
            slippage: f64::NAN,
            ..Default::default()
        };
        assert!(SimulationInput::new(pool, params).is_err());
    }
}
