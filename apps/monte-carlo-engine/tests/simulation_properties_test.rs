//! Property tests for equity-curve simulation and risk metrics.

use monte_carlo_engine::config::ParallelConfig;
use monte_carlo_engine::metrics::RiskCalculator;
use monte_carlo_engine::simulation::{POINT_VALUE, SimulationParams, SimulatorBuilder, Trade};
use proptest::prelude::*;

fn nonzero_profit() -> impl Strategy<Value = f64> {
    prop_oneof![-50.0..-0.01_f64, 0.01..50.0_f64]
}

fn trade() -> impl Strategy<Value = Trade> {
    (nonzero_profit(), -5.0..5.0_f64).prop_map(|(profit, contracts)| Trade::new(profit, contracts))
}

fn pool() -> impl Strategy<Value = Vec<Trade>> {
    prop::collection::vec(trade(), 1..20)
}

fn costs() -> impl Strategy<Value = (f64, f64)> {
    (0.0..25.0_f64, 0.0..10.0_f64)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_matrix_shape_and_metric_ranges(
        trades in pool(),
        (slippage, commission) in costs(),
        yearly_trades in 1_usize..60,
        sample_n in 1_usize..40,
        seed in any::<u64>(),
    ) {
        let mut sim = SimulatorBuilder::new()
            .trades(trades)
            .params(SimulationParams { slippage, commission, ..Default::default() })
            .seed(seed)
            .build()
            .unwrap();

        let matrix = sim.compose(yearly_trades, sample_n).unwrap();
        prop_assert_eq!(matrix.values().len(), yearly_trades * sample_n);
        prop_assert_eq!(matrix.rows().count(), sample_n);
        prop_assert!(matrix.is_finite());

        let calc = RiskCalculator::new(&matrix);
        let ruin = calc.risk_of_ruin();
        let profit = calc.probability_of_profit();
        prop_assert!((0.0..=1.0).contains(&ruin));
        prop_assert!((0.0..=1.0).contains(&profit));
    }

    #[test]
    fn test_seed_determines_matrix(
        trades in pool(),
        seed in any::<u64>(),
        sample_n in 1_usize..80,
    ) {
        let build = |parallel: ParallelConfig| {
            SimulatorBuilder::new()
                .trades(trades.clone())
                .parallel(parallel)
                .seed(seed)
                .build()
                .unwrap()
        };
        let sequential = ParallelConfig { enabled: false, ..Default::default() };
        let parallel = ParallelConfig { enabled: true, max_threads: 0, min_parallel_paths: 1 };

        let a = build(sequential.clone()).compose(25, sample_n).unwrap();
        let b = build(sequential).compose(25, sample_n).unwrap();
        let c = build(parallel).compose(25, sample_n).unwrap();

        prop_assert_eq!(a.values(), b.values());
        prop_assert_eq!(a.values(), c.values());
    }

    #[test]
    fn test_zero_cost_single_trade_is_scaled_profit(
        profit in nonzero_profit(),
        contracts in -5.0..5.0_f64,
        seed in any::<u64>(),
    ) {
        let mut sim = SimulatorBuilder::new()
            .trades(vec![Trade::new(profit, contracts)])
            .params(SimulationParams { initial_value: 1_000.0, ..Default::default() })
            .seed(seed)
            .build()
            .unwrap();

        let matrix = sim.compose(1, 3).unwrap();
        for &value in matrix.values() {
            prop_assert_eq!(value, profit * POINT_VALUE + 1_000.0);
        }
    }

    #[test]
    fn test_gaining_paths_have_no_drawdown_or_ruin(
        profits in prop::collection::vec(0.01..50.0_f64, 1..10),
        yearly_trades in 1_usize..150,
        sample_n in 1_usize..20,
        seed in any::<u64>(),
    ) {
        let trades = profits.into_iter().map(|p| Trade::new(p, 1.0)).collect();
        let mut sim = SimulatorBuilder::new()
            .trades(trades)
            .seed(seed)
            .build()
            .unwrap();

        let matrix = sim.compose(yearly_trades, sample_n).unwrap();
        let calc = RiskCalculator::new(&matrix);

        prop_assert_eq!(calc.median_drawdown().unwrap(), 0.0);
        prop_assert_eq!(calc.risk_of_ruin(), 0.0);
        prop_assert_eq!(calc.probability_of_profit(), 1.0);
    }

    #[test]
    fn test_margin_below_worst_reachable_equity_never_ruins(
        trades in pool(),
        (slippage, commission) in costs(),
        yearly_trades in 1_usize..120,
        sample_n in 1_usize..30,
        seed in any::<u64>(),
    ) {
        let params = SimulationParams { slippage, commission, ..Default::default() };
        let worst = trades
            .iter()
            .map(|t| t.net_pnl(params.cost_per_contract()))
            .fold(0.0_f64, f64::min);
        let floor = params.initial_value + yearly_trades as f64 * worst;

        let mut sim = SimulatorBuilder::new()
            .trades(trades)
            .params(SimulationParams { margin_call: floor - 1.0, ..params })
            .seed(seed)
            .build()
            .unwrap();

        let matrix = sim.compose(yearly_trades, sample_n).unwrap();
        prop_assert_eq!(RiskCalculator::new(&matrix).risk_of_ruin(), 0.0);
    }

    #[test]
    fn test_losing_trades_above_margin_always_ruin(
        losses in prop::collection::vec(-50.0..-0.01_f64, 1..10),
        sample_n in 1_usize..20,
        seed in any::<u64>(),
    ) {
        let trades = losses.into_iter().map(|p| Trade::new(p, 1.0)).collect();
        let mut sim = SimulatorBuilder::new()
            .trades(trades)
            .params(SimulationParams {
                initial_value: 10_000.0,
                margin_call: 20_000.0,
                ..Default::default()
            })
            .seed(seed)
            .build()
            .unwrap();

        let matrix = sim.compose(10, sample_n).unwrap();
        let calc = RiskCalculator::new(&matrix);

        prop_assert_eq!(calc.risk_of_ruin(), 1.0);
        prop_assert_eq!(calc.probability_of_profit(), 0.0);
    }
}
