//! Monte Carlo analysis command-line tool.
//!
//! Loads every `*.csv` trade journal in the data directory, simulates a set
//! of trading years and prints the risk report with its PASS/FAIL test.
//!
//! # Usage
//!
//! ```bash
//! monte-carlo --data-dir data --samples 500 --slippage 12.5 --seed 7
//! monte-carlo --config monte-carlo.yaml --json
//! ```
//!
//! Flags override values from the configuration file.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::float_cmp))]

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::Serialize;
use tracing::info;

use monte_carlo_engine::config::{Config, load_config};
use monte_carlo_engine::metrics::{MetricsReport, PerformanceTest, render_performance, render_test};
use monte_carlo_engine::telemetry::init_tracing;
use monte_carlo_engine::{MonteCarloAnalysis, SimulationParams};

/// Monte Carlo risk analysis of a trading system's historical trades.
#[derive(Debug, Parser)]
#[command(name = "monte-carlo")]
#[command(version)]
#[command(about = "Bootstrap equity curves from a trade journal and score their risk")]
struct Cli {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding *.csv trade journals [default: data]
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Starting portfolio equity [default: 300000]
    #[arg(short, long)]
    initial_value: Option<f64>,

    /// Margin-call equity floor [default: 80000]
    #[arg(short, long)]
    margin: Option<f64>,

    /// Trades per simulated year [default: 100]
    #[arg(short, long)]
    yearly_trade: Option<usize>,

    /// Number of simulated years [default: 30]
    #[arg(short, long)]
    samples: Option<usize>,

    /// Slippage per contract [default: 0]
    #[arg(long)]
    slippage: Option<f64>,

    /// Commission per contract [default: 0]
    #[arg(long)]
    commission: Option<f64>,

    /// Profit column header [default: profit]
    #[arg(long)]
    profit_column: Option<String>,

    /// Contracts column header [default: contracts]
    #[arg(long)]
    contract_column: Option<String>,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Print the performance block without the PASS/FAIL test
    #[arg(long)]
    report_only: bool,
}

impl Cli {
    /// Load the configuration file (or defaults) and apply flag overrides.
    fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => Config::default(),
        };

        let sim = &mut config.simulation;
        if let Some(v) = self.initial_value {
            sim.initial_value = v;
        }
        if let Some(v) = self.margin {
            sim.margin_call = v;
        }
        if let Some(v) = self.yearly_trade {
            sim.yearly_trades = v;
        }
        if let Some(v) = self.samples {
            sim.samples = v;
        }
        if let Some(v) = self.slippage {
            sim.slippage = v;
        }
        if let Some(v) = self.commission {
            sim.commission = v;
        }
        if self.seed.is_some() {
            sim.seed = self.seed;
        }

        let journal = &mut config.journal;
        if let Some(dir) = &self.data_dir {
            journal.data_dir.clone_from(dir);
        }
        if let Some(column) = &self.profit_column {
            journal.profit_column.clone_from(column);
        }
        if let Some(column) = &self.contract_column {
            journal.contracts_column.clone_from(column);
        }

        monte_carlo_engine::config::validate_config(&config).context("invalid options")?;
        Ok(config)
    }
}

/// Machine-readable run output.
#[derive(Debug, Serialize)]
struct JsonOutput {
    generated_at: DateTime<Utc>,
    seed: u64,
    yearly_trades: usize,
    samples: usize,
    pool_size: usize,
    parameters: SimulationParams,
    report: MetricsReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    test: Option<PerformanceTest>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    init_tracing(&config.logging);

    let mut analysis = MonteCarloAnalysis::from_config(&config).with_context(|| {
        format!(
            "preparing simulation from {}",
            config.journal.data_dir.display()
        )
    })?;

    let yearly_trades = config.simulation.yearly_trades;
    let samples = config.simulation.samples;
    analysis
        .compose(yearly_trades, samples)
        .context("composing equity curves")?;

    let report = analysis.report().context("computing risk metrics")?;
    let test = if cli.report_only {
        None
    } else {
        Some(analysis.performance_test().context("scoring performance")?)
    };
    info!(
        seed = analysis.seed(),
        passed = test.as_ref().map(PerformanceTest::passed),
        "Analysis complete"
    );

    if cli.json {
        let output = JsonOutput {
            generated_at: Utc::now(),
            seed: analysis.seed(),
            yearly_trades,
            samples,
            pool_size: analysis.simulator().input().pool().len(),
            parameters: config.simulation.params(),
            report,
            test,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", render_performance(&report));
        if let Some(test) = &test {
            print!("{}", render_test(test));
        }
    }

    Ok(())
}
