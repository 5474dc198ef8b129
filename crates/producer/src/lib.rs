//! JSON record producer for buzz-stream
//!
//! Replays records from a JSON file (or a single custom message) onto a Kafka
//! topic at a fixed cadence, forever or until interrupted.
//!
//! ## Pipeline
//!
//! ```text
//! Config ──► SourceKind ──► RecordSequence ──► DeliveryLoop ──► Broker
//!  (env)     literal|file    endless cursor     paced sends     (Kafka)
//! ```
//!
//! - A file source is re-read from disk each time it is exhausted, so edits
//!   show up on the next pass.
//! - Source failures are fatal and carry an exit code (see [`exit_code`]).
//! - A failed send or Ctrl+C stops the loop normally; the broker is always
//!   closed exactly once.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use buzz_stream_producer::{bootstrap, Config};
//! use clap::Parser;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::parse();
//!     let report = buzz_stream_producer::run(&config, bootstrap::interrupt_token()).await?;
//!     println!("sent {} messages", report.sent);
//!     Ok(())
//! }
//! ```

pub mod bootstrap;
pub mod broker;
pub mod config;
pub mod delivery;
pub mod error;
pub mod record;
pub mod sequence;
pub mod source;
pub mod testing;

pub use broker::{Broker, KafkaBroker};
pub use config::{Config, KafkaOpts};
pub use delivery::{DeliveryLoop, DeliveryReport, StopReason};
pub use error::{exit_code, ProducerError, Result, SourceError};
pub use record::Record;
pub use sequence::RecordSequence;
pub use source::SourceKind;

use tokio_util::sync::CancellationToken;
use tracing::info;

/// Run the producer against Kafka until it stops.
pub async fn run(config: &Config, shutdown: CancellationToken) -> Result<DeliveryReport> {
    info!("START producer.");
    config.validate()?;
    config.log_summary();

    let broker = KafkaBroker::new(&config.kafka)?;
    let report = run_with_broker(config, config.source_kind(), broker, shutdown).await?;

    info!("END producer.");
    Ok(report)
}

/// Bootstrap `broker`, check the record source, and run the delivery loop.
///
/// Reachability is checked before the source, so an unreachable broker is
/// reported even when the data file is also missing.
pub async fn run_with_broker<B: Broker>(
    config: &Config,
    source: SourceKind,
    broker: B,
    shutdown: CancellationToken,
) -> Result<DeliveryReport> {
    bootstrap::check_reachable(&broker).await?;

    source.preflight()?;
    info!("Using {} for production.", source.describe());

    bootstrap::ensure_topic(&broker, &config.topic).await?;

    let mut sequence = RecordSequence::new(source);
    DeliveryLoop::new(broker, config.topic.clone(), config.interval())
        .with_max_messages(config.max_messages)
        .run(&mut sequence, shutdown)
        .await
}
