//! Trade journal ingestion.
//!
//! A journal directory holds any number of `*.csv` exports with a header
//! row. Files are read in lexical path order and concatenated into a single
//! [`TradePool`]; only the profit and contracts columns are used, selected
//! by header name. Rows with zero profit never traded and are dropped.

use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::JournalConfig;
use crate::simulation::{Trade, TradePool};

/// Errors raised while ingesting trade journals.
#[derive(Debug, Error)]
pub enum JournalError {
    /// The journal directory does not exist or is not a directory.
    #[error("Journal directory '{}' not found", dir.display())]
    MissingDirectory {
        /// Configured directory.
        dir: PathBuf,
    },

    /// Listing the journal directory failed.
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The directory holds no CSV files.
    #[error("No *.csv journals in '{}'", dir.display())]
    NoJournals {
        /// Directory scanned.
        dir: PathBuf,
    },

    /// The CSV reader failed.
    #[error("Malformed CSV in '{}': {source}", path.display())]
    Csv {
        /// Journal file.
        path: PathBuf,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// A required column is absent from the header row.
    #[error("Column '{column}' not found in '{}'", path.display())]
    MissingColumn {
        /// Journal file.
        path: PathBuf,
        /// Missing header name.
        column: String,
    },

    /// A cell could not be parsed as a number.
    #[error("Invalid {column} value '{value}' on line {line} of '{}'", path.display())]
    InvalidValue {
        /// Journal file.
        path: PathBuf,
        /// 1-based line number, header included.
        line: u64,
        /// Column name.
        column: String,
        /// Raw cell contents.
        value: String,
    },

    /// Every row was filtered out.
    #[error("Journals in '{}' contain no trades with non-zero profit", dir.display())]
    NoTrades {
        /// Directory scanned.
        dir: PathBuf,
    },
}

/// List `*.csv` files in `dir`, sorted by path.
///
/// # Errors
///
/// Returns error if the directory is missing, unreadable, or has no CSV files.
pub fn discover_journals(dir: &Path) -> Result<Vec<PathBuf>, JournalError> {
    if !dir.is_dir() {
        return Err(JournalError::MissingDirectory {
            dir: dir.to_path_buf(),
        });
    }
    let io_err = |source| JournalError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv && path.is_file() {
            paths.push(path);
        }
    }

    if paths.is_empty() {
        return Err(JournalError::NoJournals {
            dir: dir.to_path_buf(),
        });
    }
    paths.sort();
    Ok(paths)
}

/// Read the trades of one journal file.
///
/// # Errors
///
/// Returns error if the file is malformed, lacks either column, or holds a
/// cell that is not a number.
pub fn read_journal(
    path: &Path,
    profit_column: &str,
    contracts_column: &str,
) -> Result<Vec<Trade>, JournalError> {
    let csv_err = |source| JournalError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    let headers = reader.headers().map_err(csv_err)?.clone();
    let profit_idx = column_index(&headers, profit_column, path)?;
    let contracts_idx = column_index(&headers, contracts_column, path)?;

    let mut trades = Vec::new();
    let mut skipped = 0_usize;
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        let profit = parse_cell(&record, profit_idx, profit_column, path)?;
        if profit == 0.0 {
            skipped += 1;
            continue;
        }
        let contracts = parse_cell(&record, contracts_idx, contracts_column, path)?;
        trades.push(Trade::new(profit, contracts));
    }

    debug!(
        path = %path.display(),
        trades = trades.len(),
        skipped,
        "Journal read"
    );
    Ok(trades)
}

/// Load every journal under the configured directory into one pool.
///
/// # Errors
///
/// Returns error if any journal fails to load or no trade survives filtering.
pub fn load_trade_pool(config: &JournalConfig) -> Result<TradePool, JournalError> {
    let journals = discover_journals(&config.data_dir)?;

    let mut trades = Vec::new();
    for path in &journals {
        trades.extend(read_journal(
            path,
            &config.profit_column,
            &config.contracts_column,
        )?);
    }

    info!(
        dir = %config.data_dir.display(),
        journals = journals.len(),
        trades = trades.len(),
        "Trade pool loaded"
    );

    TradePool::new(trades).map_err(|_| JournalError::NoTrades {
        dir: config.data_dir.clone(),
    })
}

fn column_index(headers: &StringRecord, column: &str, path: &Path) -> Result<usize, JournalError> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| JournalError::MissingColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
        })
}

fn parse_cell(
    record: &StringRecord,
    idx: usize,
    column: &str,
    path: &Path,
) -> Result<f64, JournalError> {
    let raw = record.get(idx).unwrap_or_default();
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| JournalError::InvalidValue {
            path: path.to_path_buf(),
            line: record.position().map_or(0, csv::Position::line),
            column: column.to_string(),
            value: raw.to_string(),
        })
}
