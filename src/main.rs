//! # salescast
//!
//! Command-line front end: analyze one CSV file and print the result as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use salescast::core::{Cell, RawTable};
use salescast::insights::RuleBasedInsights;
use salescast::{AnalysisConfig, SalesAnalyzer};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "salescast")]
#[command(about = "Sales analytics and ensemble forecasting", long_about = None)]
struct Cli {
    /// Sales data (CSV with a header row)
    file: PathBuf,

    /// Configuration file (TOML)
    #[arg(short, long, env = "SALESCAST_CONFIG")]
    config: Option<PathBuf>,

    /// Annotate the result with rule-based insights and recommendations
    #[arg(long)]
    rules: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = AnalysisConfig::load(cli.config.as_deref()).context("loading configuration")?;
    let table = read_csv(&cli.file)?;

    let mut analyzer = SalesAnalyzer::new(config);
    if cli.rules {
        analyzer = analyzer.with_provider(Arc::new(RuleBasedInsights));
    }
    let report = analyzer
        .analyze(&table)
        .with_context(|| format!("analyzing {}", cli.file.display()))?;

    let json = if cli.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");
    Ok(())
}

/// Read a CSV file into a table; short rows are padded with empty cells.
fn read_csv(path: &Path) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV header")?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("reading CSV record {}", line + 1))?;
        let mut row: Vec<Cell> = record.iter().take(headers.len()).map(Cell::from_text).collect();
        row.resize(headers.len(), Cell::Empty);
        rows.push(row);
    }

    RawTable::new(headers, rows).context("building table")
}
