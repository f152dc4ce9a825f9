//! Equity curve simulation by bootstrap resampling.
//!
//! Turns a historical trade pool into many synthetic trading years:
//! - Trades are drawn uniformly with replacement
//! - Each draw is scaled by [`POINT_VALUE`] and charged flat per-contract costs
//! - Cumulative P&L plus initial equity forms one row of the matrix
//!
//! Rows are independent and may be built on the rayon pool.

mod matrix;
mod params;
mod pool;
mod simulator;

pub use matrix::EquityCurveMatrix;
pub use params::{SimulationInput, SimulationParams};
pub use pool::{POINT_VALUE, Trade, TradePool};
pub use simulator::{EquityCurveSimulator, SimulatorBuilder};
