use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use fetchstat::{report, storage, Capabilities, Config};

#[derive(Parser)]
#[command(
    name = "fetchstat",
    about = "Run-outcome statistics and chart reports for scheduled feed-fetch tasks",
    version,
    long_about = None
)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record one run outcome
    Record {
        /// Feed name
        #[arg(long)]
        feed: String,

        /// Entries that survived the run
        #[arg(long)]
        success: u64,

        /// Entries dropped during the run
        #[arg(long, default_value = "0")]
        failure: u64,
    },

    /// Generate the statistics report (HTML)
    Report {
        /// Report destination (overrides configuration)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(p) => Config::load(p),
        None => Ok(Config::default()),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Record {
            feed,
            success,
            failure,
        } => {
            let pool = storage::open_pool(&config.db_path())?;
            storage::record_outcome(&pool, &feed, success, failure, chrono::Utc::now())?;
            tracing::info!(%feed, success, failure, "outcome recorded");
        }
        Commands::Report { output } => {
            let mut config = config;
            if output.is_some() {
                config.report_path = output;
            }
            let capabilities = Capabilities::probe(&config);
            let destination = report::generate_statistics(&config, &capabilities)?;
            println!("Report written to {}", destination.display());
        }
    }

    Ok(())
}
