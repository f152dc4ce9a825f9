//! Trade pool: the immutable population every bootstrap draw samples from.

use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

/// Dollar value of one point of `profit`, per contract.
///
/// Journal profits are recorded in points; every sampled trade is scaled by
/// this factor before costs are charged. It is tied to the instrument the
/// journals were recorded on and is deliberately not configurable.
pub const POINT_VALUE: f64 = 200.0;

/// One historical trade outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Signed profit in points (unscaled).
    pub profit: f64,
    /// Signed position size. Only the magnitude is charged for.
    pub contracts: f64,
}

impl Trade {
    /// Create a trade.
    #[must_use]
    pub const fn new(profit: f64, contracts: f64) -> Self {
        Self { profit, contracts }
    }

    /// Net P&L after point scaling and flat per-contract costs.
    #[must_use]
    pub fn net_pnl(&self, cost_per_contract: f64) -> f64 {
        self.profit * POINT_VALUE - self.contracts.abs() * cost_per_contract
    }
}

/// Immutable, randomly indexable pool of trades.
///
/// Cloning is cheap; clones share the same backing slice.
#[derive(Debug, Clone)]
pub struct TradePool {
    trades: Arc<[Trade]>,
}

impl TradePool {
    /// Create a pool from trades.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::EmptyTradePool`] if `trades` is empty.
    pub fn new(trades: Vec<Trade>) -> Result<Self, SimulationError> {
        if trades.is_empty() {
            return Err(SimulationError::EmptyTradePool);
        }
        Ok(Self {
            trades: trades.into(),
        })
    }

    /// Number of trades in the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.trades.len()
    }

    /// Always false; an empty pool cannot be constructed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    /// All trades in ingestion order.
    #[must_use]
    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    /// Draw one trade uniformly at random.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Trade {
        self.trades[rng.random_range(0..self.trades.len())]
    }

    /// Draw `n` trades uniformly at random, with replacement.
    ///
    /// Draws are independent: a trade may appear several times or not at all.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Vec<Trade> {
        (0..n).map(|_| self.draw(rng)).collect()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn sample_trades() -> Vec<Trade> {
        vec![
            Trade::new(12.5, 1.0),
            Trade::new(-4.0, 2.0),
            Trade::new(7.25, -1.0),
            Trade::new(-1.5, 3.0),
        ]
    }

    #[test]
    fn test_empty_pool_rejected() {
        assert_eq!(
            TradePool::new(vec![]).unwrap_err(),
            SimulationError::EmptyTradePool
        );
    }

    #[test]
    fn test_net_pnl_scales_profit() {
        let trade = Trade::new(100.0, 1.0);
        assert_eq!(trade.net_pnl(0.0), 20_000.0);
    }

    #[test]
    fn test_net_pnl_charges_absolute_contracts() {
        let short = Trade::new(-50.0, -2.0);
        let long = Trade::new(-50.0, 2.0);
        assert_eq!(short.net_pnl(10.0), -10_020.0);
        assert_eq!(short.net_pnl(10.0), long.net_pnl(10.0));
    }

    #[test]
    fn test_sample_draws_requested_count_from_pool() {
        let pool = TradePool::new(sample_trades()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let drawn = pool.sample(&mut rng, 250);

        assert_eq!(drawn.len(), 250);
        assert!(drawn.iter().all(|t| pool.trades().contains(t)));
    }

    #[test]
    fn test_sample_is_with_replacement() {
        let pool = TradePool::new(sample_trades()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        // More draws than trades can only succeed with replacement.
        let drawn = pool.sample(&mut rng, pool.len() * 25);

        for trade in pool.trades() {
            assert!(drawn.contains(trade), "every trade should appear in 100 draws");
        }
    }

    #[test]
    fn test_single_trade_pool_always_draws_it() {
        let pool = TradePool::new(vec![Trade::new(3.0, 1.0)]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        assert!(pool.sample(&mut rng, 20).iter().all(|t| t.profit == 3.0));
    }

    #[test]
    fn test_clones_share_storage() {
        let pool = TradePool::new(sample_trades()).unwrap();
        let clone = pool.clone();
        assert!(std::ptr::eq(pool.trades(), clone.trades()));
    }
}
