//! forensic-scanner: score a company's financial statements and print a
//! forensic alpha report.
//!
//! Reads a JSON statement grid, runs the forensic pipeline and writes the
//! report as JSON to stdout. Logs go to stderr.
//!
//! Input shape:
//!   { "columns": ["Statement", "Item", "2022", "2023"],
//!     "rows": [["Income Statement", "Net Sales", 1000000, 1200000], ...] }
//!
//! Usage:
//!   forensic-scanner statements.json
//!   cat statements.json | forensic-scanner
//!   FORENSIC_NORMALIZATION=expanding forensic-scanner statements.json

mod config;

use anyhow::{Context, Result};
use config::ScannerConfig;
use forensic_alpha::run_pipeline;
use forensic_core::{RawCell, RawStatementTable};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "forensic_scanner=info,forensic_alpha=info,statement_normalizer=warn";

/// Column grid as it arrives on the wire
#[derive(Debug, Deserialize)]
struct StatementGrid {
    columns: Vec<serde_json::Value>,
    #[serde(default)]
    rows: Vec<Vec<serde_json::Value>>,
}

impl StatementGrid {
    fn into_table(self) -> Result<RawStatementTable> {
        // Year headers may be JSON numbers
        let columns: Vec<String> = self
            .columns
            .into_iter()
            .map(|c| match c {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .collect();
        let rows = self
            .rows
            .into_iter()
            .map(|row| row.into_iter().map(RawCell::from).collect())
            .collect();

        RawStatementTable::from_grid(&columns, rows).context("Invalid statement table")
    }
}

fn init_tracing(json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read statements from stdin")?;
            Ok(buf)
        }
    }
}

fn parse_table(raw: &str) -> Result<RawStatementTable> {
    let grid: StatementGrid =
        serde_json::from_str(raw).context("Statement input is not a valid JSON grid")?;
    grid.into_table()
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = ScannerConfig::from_env()?.with_input_arg(std::env::args().nth(1));
    init_tracing(config.log_json);

    match &config.input {
        Some(path) => tracing::info!("Reading statements from {}", path.display()),
        None => tracing::info!("Reading statements from stdin"),
    }
    let raw = read_input(config.input.as_deref())?;
    let table = parse_table(&raw)?;

    let report = run_pipeline(&table, &config.pipeline());
    tracing::info!(
        "{} years, {:.1}% complete, {} diagnostics",
        report.years.len(),
        report.quality.completeness_pct,
        report.diagnostics.len()
    );
    match report.latest() {
        Some((year, rec)) => tracing::info!("Latest recommendation: {} ({})", rec, year),
        None => tracing::warn!("No year has all four scores; no recommendation"),
    }

    let json = report.to_json(config.pretty).context("Failed to serialize report")?;
    println!("{}", json);

    Ok(())
}
