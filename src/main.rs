//! stocknews - headline sentiment and trading-day outcome collector
//!
//! # Usage
//! ```sh
//! STOCKNEWS_SYMBOLS=AAPL,NFLX stocknews ingest
//! stocknews summarize
//! MARKET_DATA_API_KEY=... stocknews enrich --symbol AAPL
//! stocknews run
//! ```
//!
//! Configuration comes from the environment (and `.env`); flags override it.

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use stocknews::application::Application;
use stocknews::config::{Config, parse_symbols};
use stocknews::domain::trading_day::MarketClose;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Symbols to ingest (comma separated)
    #[arg(short, long, global = true)]
    symbols: Option<String>,

    /// Directory holding the news and summary tables
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Market close hour (UTC)
    #[arg(long, global = true)]
    close_hour: Option<u32>,

    /// Market close minute
    #[arg(long, global = true)]
    close_minute: Option<u32>,

    /// Market data API key
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Keep tables in memory instead of CSV files
    #[arg(long, global = true)]
    in_memory: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, score and store new headlines
    Ingest,
    /// Build daily summaries for days without one
    Summarize,
    /// Resolve closed trading days against market data
    Enrich {
        /// Only enrich this stock
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Ingest, summarize and enrich
    Run,
}

impl Cli {
    fn apply(&self, mut config: Config) -> Result<Config> {
        if let Some(symbols) = &self.symbols {
            config.symbols = parse_symbols(symbols);
        }
        if let Some(dir) = &self.data_dir {
            config.storage.data_dir = dir.clone();
        }
        if self.close_hour.is_some() || self.close_minute.is_some() {
            config.close = MarketClose::new(
                self.close_hour.unwrap_or(config.close.hour()),
                self.close_minute.unwrap_or(config.close.minute()),
            )?;
        }
        if let Some(key) = &self.api_key {
            config.market_data.api_key = Some(key.clone()).filter(|k| !k.trim().is_empty());
        }
        if self.in_memory {
            config.storage.use_csv = false;
        }
        Ok(config)
    }
}

async fn execute(cli: Cli) -> Result<()> {
    let config = cli.apply(Config::from_env()?)?;
    let app = Application::build(config)?;

    match cli.command {
        Commands::Ingest => {
            let report = app.ingest().await?;
            if !report.failed_symbols.is_empty() {
                info!("Feeds to retry next run: {:?}", report.failed_symbols);
            }
        }
        Commands::Summarize => {
            app.summarize().await?;
        }
        Commands::Enrich { symbol } => {
            app.enrich(symbol, Utc::now()).await?;
        }
        Commands::Run => {
            let report = app.run_all(Utc::now()).await?;
            info!(
                "Run complete: {} headlines added, {} summaries created, {} outcomes resolved",
                report.ingest.added, report.aggregation.created, report.enrichment.resolved
            );
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    info!("stocknews {} starting...", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    if let Err(e) = execute(cli).await {
        error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}
