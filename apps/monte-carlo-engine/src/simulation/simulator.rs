//! Bootstrap equity-curve simulator.

use std::sync::Arc;
use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info};

use super::matrix::EquityCurveMatrix;
use super::params::{SimulationInput, SimulationParams};
use super::pool::{Trade, TradePool};
use crate::config::ParallelConfig;
use crate::error::SimulationError;

/// Builds equity-curve matrices by resampling a trade pool.
///
/// A master generator seeded once hands every path its own sub-seed, in path
/// order, before any row is filled. Rows are therefore identical whether they
/// are built sequentially or across the rayon pool.
#[derive(Debug)]
pub struct EquityCurveSimulator {
    input: SimulationInput,
    parallel: ParallelConfig,
    thread_pool: Option<Arc<rayon::ThreadPool>>,
    seed: u64,
    rng: ChaCha8Rng,
}

impl EquityCurveSimulator {
    /// Create a simulator.
    ///
    /// Without a seed, one is drawn from the thread RNG; read it back with
    /// [`Self::seed`] to reproduce the run.
    ///
    /// # Errors
    ///
    /// Returns error if a dedicated thread pool was requested and cannot be built.
    pub fn new(
        input: SimulationInput,
        parallel: ParallelConfig,
        seed: Option<u64>,
    ) -> Result<Self, SimulationError> {
        let thread_pool = if parallel.enabled && parallel.max_threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(parallel.max_threads)
                .build()
                .map_err(|e| SimulationError::ThreadPoolError {
                    message: e.to_string(),
                })?;
            Some(Arc::new(pool))
        } else {
            None
        };

        let seed = seed.unwrap_or_else(|| rand::rng().random());

        Ok(Self {
            input,
            parallel,
            thread_pool,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    /// Seed the random source was last initialized with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Pool and parameters this simulator reads.
    #[must_use]
    pub const fn input(&self) -> &SimulationInput {
        &self.input
    }

    /// Restart the random source from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    /// Draw `n` trades from the pool, with replacement.
    pub fn sample(&mut self, n: usize) -> Vec<Trade> {
        self.input.pool().sample(&mut self.rng, n)
    }

    /// Simulate `sample_n` paths of `yearly_trades` trades each.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidParameter`] if either dimension is
    /// zero or the matrix would not fit in memory.
    pub fn compose(
        &mut self,
        yearly_trades: usize,
        sample_n: usize,
    ) -> Result<EquityCurveMatrix, SimulationError> {
        if yearly_trades == 0 {
            return Err(SimulationError::invalid(
                "yearly_trades",
                "must be a positive number of trades",
            ));
        }
        if sample_n == 0 {
            return Err(SimulationError::invalid(
                "sample_n",
                "must be a positive number of paths",
            ));
        }
        let len = yearly_trades.checked_mul(sample_n).ok_or_else(|| {
            SimulationError::invalid(
                "sample_n",
                format!("{sample_n} paths of {yearly_trades} trades overflow the matrix"),
            )
        })?;

        let parallel = self.parallel.should_parallelize(sample_n);
        info!(
            paths = sample_n,
            trades_per_path = yearly_trades,
            pool_size = self.input.pool().len(),
            seed = self.seed,
            parallel,
            "Composing equity curves"
        );
        let start = Instant::now();

        let mut values: Vec<f64> = allocate(len, yearly_trades, sample_n)?;
        let mut seeds: Vec<u64> = allocate(sample_n, yearly_trades, sample_n)?;
        seeds.iter_mut().for_each(|seed| *seed = self.rng.random());
        let pool = self.input.pool();
        let params = self.input.params();

        if parallel {
            let fill = |values: &mut [f64]| {
                values
                    .par_chunks_mut(yearly_trades)
                    .zip(seeds.par_iter())
                    .for_each(|(row, &seed)| fill_path(row, pool, params, seed));
            };
            match &self.thread_pool {
                Some(thread_pool) => thread_pool.install(|| fill(&mut values)),
                None => fill(&mut values),
            }
        } else {
            values
                .chunks_mut(yearly_trades)
                .zip(&seeds)
                .for_each(|(row, &seed)| fill_path(row, pool, params, seed));
        }

        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Equity curves composed"
        );

        Ok(EquityCurveMatrix::from_buffer(
            values,
            sample_n,
            yearly_trades,
            params.initial_value,
            params.margin_call,
        ))
    }
}

/// Zeroed buffer of `len` elements, or an error if it cannot be allocated.
fn allocate<T: Copy + Default>(
    len: usize,
    yearly_trades: usize,
    sample_n: usize,
) -> Result<Vec<T>, SimulationError> {
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(len).map_err(|e| {
        SimulationError::invalid(
            "sample_n",
            format!("{sample_n} paths of {yearly_trades} trades do not fit in memory: {e}"),
        )
    })?;
    buffer.resize(len, T::default());
    Ok(buffer)
}

/// Fill one path: cumulative net P&L in draw order, offset by initial equity.
fn fill_path(row: &mut [f64], pool: &TradePool, params: &SimulationParams, seed: u64) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let cost = params.cost_per_contract();
    let mut cumulative = 0.0;
    for point in row {
        cumulative += pool.draw(&mut rng).net_pnl(cost);
        *point = cumulative + params.initial_value;
    }
}

/// Builder for [`EquityCurveSimulator`].
#[derive(Debug, Default)]
pub struct SimulatorBuilder {
    trades: Vec<Trade>,
    params: SimulationParams,
    parallel: ParallelConfig,
    seed: Option<u64>,
}

impl SimulatorBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the trade pool contents.
    #[must_use]
    pub fn trades(mut self, trades: Vec<Trade>) -> Self {
        self.trades = trades;
        self
    }

    /// Set portfolio and cost parameters.
    #[must_use]
    pub const fn params(mut self, params: SimulationParams) -> Self {
        self.params = params;
        self
    }

    /// Set parallel execution options.
    #[must_use]
    pub const fn parallel(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set random seed for reproducibility.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the simulator.
    ///
    /// # Errors
    ///
    /// Returns error if the pool is empty, parameters are invalid, or the
    /// thread pool cannot be built.
    pub fn build(self) -> Result<EquityCurveSimulator, SimulationError> {
        let pool = TradePool::new(self.trades)?;
        let input = SimulationInput::new(pool, self.params)?;
        EquityCurveSimulator::new(input, self.parallel, self.seed)
    }
}
