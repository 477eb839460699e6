use analytics::{AnalyticsEngine, AnalyticsError};
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use configuration::{Config, LogFormat, load_config};
use core_types::TradeSet;
use dataset::TradeCsvReader;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};

mod logging;
mod render;

/// The main entry point for the Tradelens performance dashboard.
fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    let format = cli.log_format.unwrap_or(config.logging.format);
    let _log_guard = logging::init_tracing(&config.logging, format);

    // Logged here, once a subscriber exists.
    tracing::debug!(?config, "Configuration loaded");
    tracing::debug!(command = ?cli.command, "Starting Tradelens");

    // Execute the appropriate command
    match cli.command {
        Commands::Report(args) => handle_report(args, &config),
        Commands::Export(args) => handle_export(args, &config),
        Commands::Sessions => {
            println!("{}", render::render_session_map());
            Ok(())
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Trading performance dashboard for broker trade exports.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (defaults to ./tradelens.toml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log output format; overrides `logging.format`.
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the performance dashboard for a trade export.
    Report(DataArgs),
    /// Write the full performance report as JSON.
    Export(ExportArgs),
    /// Show which trading session each close hour belongs to.
    Sessions,
}

#[derive(Parser, Debug)]
struct DataArgs {
    /// The CSV trade export to analyse; overrides `data.path`.
    #[arg(long, short)]
    file: Option<PathBuf>,

    /// The account balance before the first trade; overrides `dashboard.starting_balance`.
    #[arg(long, short)]
    balance: Option<Decimal>,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    #[command(flatten)]
    data: DataArgs,

    /// Write the JSON to this file instead of stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// Loads the trade export and resolves the starting balance for a command.
fn load_inputs(args: &DataArgs, config: &Config) -> Result<(TradeSet, Decimal)> {
    let Some(path) = args.file.as_ref().or(config.data.path.as_ref()) else {
        bail!("No trade export given: pass --file or set data.path in the configuration");
    };

    let starting_balance = args.balance.unwrap_or(config.dashboard.starting_balance);
    if starting_balance <= Decimal::ZERO {
        bail!("The starting balance must be positive, got {starting_balance}");
    }

    let trades = TradeCsvReader::new(&config.data.timestamp_format)
        .load(path)
        .with_context(|| format!("Failed to load trade export {}", path.display()))?;

    Ok((trades, starting_balance))
}

fn engine_for(config: &Config) -> AnalyticsEngine {
    AnalyticsEngine::with_presentation(
        config.dashboard.smoothing_points,
        config.dashboard.histogram_bins,
    )
}

/// Handles the `report` command.
fn handle_report(args: DataArgs, config: &Config) -> Result<()> {
    let (trades, starting_balance) = load_inputs(&args, config)?;

    match engine_for(config).calculate(&trades, starting_balance) {
        Ok(report) => {
            print!(
                "{}",
                render::render_report(&report, &config.dashboard.currency_symbol)
            );
            Ok(())
        }
        Err(AnalyticsError::InsufficientData) => {
            tracing::warn!("Trade export has no usable trades");
            print!("{}", render::render_placeholder(trades.skipped_count()));
            Ok(())
        }
        Err(e) => Err(e).context("Failed to calculate performance report"),
    }
}

/// Handles the `export` command.
fn handle_export(args: ExportArgs, config: &Config) -> Result<()> {
    let (trades, starting_balance) = load_inputs(&args.data, config)?;

    let json = match engine_for(config).calculate(&trades, starting_balance) {
        Ok(report) => serde_json::to_string_pretty(&report)?,
        Err(AnalyticsError::InsufficientData) => {
            tracing::warn!("Trade export has no usable trades");
            serde_json::to_string_pretty(&serde_json::json!({
                "status": "insufficient_data",
                "skipped_records": trades.skipped_count(),
            }))?
        }
        Err(e) => return Err(e).context("Failed to calculate performance report"),
    };

    match args.output {
        Some(path) => write_output(&path, &json),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

fn write_output(path: &Path, json: &str) -> Result<()> {
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    tracing::info!(path = %path.display(), "Report exported");
    Ok(())
}
