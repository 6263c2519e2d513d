//! Ledger filter stage
//!
//! Reads newline-delimited JSON transactions (file or stdin), runs them
//! through the account and asset filters, and writes kept transactions as
//! JSON lines to stdout. Filter configs are re-read from the config file
//! every `check_interval_secs`.
//!
//! Force an immediate config re-check via SIGHUP:
//!   kill -HUP $(pgrep ledger-filter)
//!
//! Usage:
//!   ledger-filter --settings config/filter.toml --input txs.jsonl

use anyhow::{Context, Result};
use clap::Parser;
use futures::StreamExt;
use ledger_filters::{
    FilterContext, FilterPipeline, FilterStats, Filters, JsonFileConfigSource, LedgerTransaction,
    ServiceSettings,
};
use signal_hook::consts::SIGHUP;
use signal_hook_tokio::Signals;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Ledger transaction filter stage
#[derive(Parser)]
#[command(name = "ledger-filter")]
struct Args {
    /// TOML settings file (defaults apply when omitted)
    #[arg(short, long, env = "LEDGER_FILTER_SETTINGS")]
    settings: Option<PathBuf>,

    /// Filter config JSON file, overrides the settings value
    #[arg(short, long, env = "LEDGER_FILTER_CONFIG")]
    config_file: Option<PathBuf>,

    /// Newline-delimited JSON transactions; stdin when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let settings = match &args.settings {
        Some(path) => ServiceSettings::load(path)?,
        None => ServiceSettings::default(),
    };

    // Initialize logging (RUST_LOG wins over the settings file)
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.general.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = args
        .config_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(&settings.filters.config_file));
    let source = JsonFileConfigSource::new(&config_path);
    let filters = Arc::new(Filters::new(settings.filters.check_interval()));
    info!(
        "Filter configs: {} (check every {}s)",
        source.path().display(),
        settings.filters.check_interval_secs
    );

    // SIGHUP forces a config re-check on the next transaction
    let mut signals = Signals::new([SIGHUP])?;
    let sighup_filters = Arc::clone(&filters);
    tokio::spawn(async move {
        while let Some(sig) = signals.next().await {
            if sig == SIGHUP {
                info!("Received SIGHUP - forcing filter config re-check");
                sighup_filters.force_refresh();
            }
        }
    });

    let reader: Box<dyn AsyncRead + Unpin + Send> = match &args.input {
        Some(path) => Box::new(
            tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open input: {}", path.display()))?,
        ),
        None => Box::new(tokio::io::stdin()),
    };

    let stats = run(reader, &filters, &source).await?;
    info!(
        "Done: {} transactions, kept {}, dropped {}",
        stats.total, stats.kept, stats.dropped
    );
    Ok(())
}

async fn run(
    reader: Box<dyn AsyncRead + Unpin + Send>,
    filters: &Filters,
    source: &JsonFileConfigSource,
) -> Result<FilterStats> {
    let mut lines = BufReader::new(reader).lines();
    let mut stdout = tokio::io::stdout();
    let mut stats = FilterStats::default();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let tx: LedgerTransaction = match serde_json::from_str(line) {
            Ok(tx) => tx,
            Err(e) => {
                warn!("Skipping undecodable transaction line: {}", e);
                continue;
            }
        };

        let pipeline = FilterPipeline::from_filters(filters.get_filters(source).await);
        let ctx = FilterContext::for_ledger(tx.ledger_sequence);
        let keep = pipeline
            .filter_transaction(&ctx, &tx)
            .await
            .with_context(|| format!("Filtering failed for tx {}", tx.hash))?;

        stats.total += 1;
        if keep {
            stats.kept += 1;
            let mut out = serde_json::to_vec(&tx)?;
            out.push(b'\n');
            stdout.write_all(&out).await?;
        } else {
            stats.dropped += 1;
        }
    }

    stdout.flush().await?;
    Ok(stats)
}
