//! Command-line interface for buzz-stream
//!
//! # Usage Examples
//!
//! ## Producer
//! ```bash
//! # Replay a JSON array file onto a topic, one record per second
//! buzz-stream produce --topic buzz_topic --data-file data/buzz.json
//!
//! # Same, configured from the environment
//! KAFKA_BROKERS=localhost:9092 BUZZ_TOPIC=buzz_topic BUZZ_INTERVAL_SECONDS=0 \
//!   buzz-stream produce
//!
//! # Repeat one custom message (JSON object or plain text)
//! buzz-stream produce --custom-message "I love Rust!"
//! ```
//!
//! ## Monitor
//! ```bash
//! buzz-stream monitor --file data/food_temperatures.csv --stall-min 150 --stall-max 190
//! ```
//!
//! ## Exit Codes
//! - 0: stopped normally (Ctrl+C, failed send, or message limit)
//! - 1: data file missing
//! - 2: data file malformed or not a list of objects
//! - 3: unexpected error
//! - 4: Kafka unreachable
//! - 5: Kafka producer could not be created
//! - 6: topic could not be created
//! - 7: invalid configuration

use anyhow::Context;
use buzz_stream::{exit_code_for, producer, stall_monitor};
use clap::{Parser, Subcommand};
use producer::exit_code;

#[derive(Parser)]
#[command(name = "buzz-stream")]
#[command(about = "Replay JSON records onto Kafka and monitor CSV temperature readings")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish records from a JSON file (or a custom message) to a Kafka topic
    Produce {
        #[command(flatten)]
        config: producer::Config,
    },

    /// Classify CSV temperature readings against the stall range
    Monitor {
        #[command(flatten)]
        config: stall_monitor::Config,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(exit_code::INVALID_CONFIG);
        }
        Err(e) => e.exit(),
    };

    if let Err(e) = run(cli).await {
        tracing::error!("{e:#}");
        std::process::exit(exit_code_for(&e));
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Produce { config } => {
            let shutdown = producer::bootstrap::interrupt_token();
            let report = producer::run(&config, shutdown).await?;
            tracing::info!(
                "Producer finished: {} message(s) sent ({:?})",
                report.sent,
                report.stop_reason
            );
        }
        Commands::Monitor { config } => {
            let summary = stall_monitor::monitor(&config).context("Stall monitor failed")?;
            tracing::info!(
                "Monitor finished: {} of {} reading(s) in stall range",
                summary.stalled,
                summary.rows
            );
        }
    }

    Ok(())
}
