//! Pullo CLI - Main entry point
//!
//! Operator tooling for the catalog: run the Alko ingestion once without the
//! HTTP server, and inspect the audit trail of recent runs.

use clap::{Parser, Subcommand};
use pullo_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use pullo_common::{PulloError, Result};
use pullo_server::audit;
use pullo_server::ingest::alko::{AlkoPipeline, AlkoSourceConfig};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::process;
use tracing::error;

#[derive(Parser)]
#[command(name = "pullo", version, about = "Pullo catalog tools")]
struct Cli {
    /// Verbose console logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the Alko price-list ingestion once
    Ingest {
        /// Price-list page URL (overrides ALKO_PRODUCTS_URL)
        #[arg(long)]
        url: Option<String>,
    },

    /// Show recent ingestion runs, newest first
    Runs {
        /// Maximum number of runs to show
        #[arg(short, long)]
        limit: Option<i64>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging based on verbose flag and environment
    let log_config = if cli.verbose {
        LogConfig::builder()
            .level(LogLevel::Debug)
            .output(LogOutput::Console)
            .log_file_prefix("pullo-cli".to_string())
            .build()
    } else {
        LogConfig::builder()
            .level(LogLevel::Warn)
            .output(LogOutput::Console)
            .log_file_prefix("pullo-cli".to_string())
            .build()
    };

    // Merge with environment variables (they take precedence)
    let log_config = LogConfig::from_env().unwrap_or(log_config);

    // The CLI should still work when logging cannot be set up
    let _ = init_logging(&log_config);

    if let Err(e) = execute_command(&cli).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn execute_command(cli: &Cli) -> Result<()> {
    dotenvy::dotenv().ok();

    match &cli.command {
        Commands::Ingest { url } => ingest(url.clone()).await,
        Commands::Runs { limit } => runs(*limit).await,
    }
}

/// Run the full ingestion pipeline once and print the outcome
async fn ingest(url: Option<String>) -> Result<()> {
    let mut config = AlkoSourceConfig::from_env();
    if let Some(url) = url {
        config = config.with_products_url(url);
    }

    let pool = connect_db().await?;

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .map_err(|e| PulloError::Database(format!("Failed to run migrations: {}", e)))?;

    let pipeline = AlkoPipeline::new(config, pool);
    let outcome = pipeline.run("cli").await;

    // The outcome carries its own detail string on both paths
    println!("{}", outcome.details());

    if !outcome.success {
        process::exit(1);
    }

    Ok(())
}

/// Print recent ingestion runs from the audit trail
async fn runs(limit: Option<i64>) -> Result<()> {
    let pool = connect_db().await?;

    let records = audit::recent_runs(&pool, limit)
        .await
        .map_err(|e| PulloError::Database(e.to_string()))?;

    if records.is_empty() {
        println!("No ingestion runs recorded yet");
        return Ok(());
    }

    for run in records {
        let status = if run.success { "ok  " } else { "FAIL" };
        println!(
            "{}  {}  {}  [{}]  {}",
            run.created_at.format("%Y-%m-%d %H:%M:%S"),
            status,
            run.integration,
            run.domain,
            run.details
        );
    }

    Ok(())
}

async fn connect_db() -> Result<PgPool> {
    let url = std::env::var("DATABASE_URL")
        .map_err(|_| PulloError::Config("DATABASE_URL is not set".to_string()))?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .map_err(|e| PulloError::Database(e.to_string()))?;

    Ok(pool)
}
