//! Producer configuration, resolved once from flags and environment variables.

use crate::error::{ProducerError, Result};
use crate::source::SourceKind;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Kafka connection and topic settings.
#[derive(Debug, Clone, Parser)]
pub struct KafkaOpts {
    /// Kafka brokers (comma-separated, e.g., "localhost:9092")
    #[clap(long, env = "KAFKA_BROKERS", default_value = "localhost:9092")]
    pub brokers: String,

    /// Partitions to request when the topic has to be created
    #[clap(long, env = "BUZZ_TOPIC_PARTITIONS", default_value_t = 1)]
    pub partitions: i32,

    /// Replication factor to request when the topic has to be created
    #[clap(long, env = "BUZZ_TOPIC_REPLICATION", default_value_t = 1)]
    pub replication_factor: i32,

    /// How long a send may wait for delivery before it fails
    #[clap(long, env = "KAFKA_MESSAGE_TIMEOUT_MS", default_value_t = 5000)]
    pub message_timeout_ms: u64,

    /// Timeout for the broker reachability check and topic administration
    #[clap(long, env = "KAFKA_METADATA_TIMEOUT_SECS", default_value_t = 5)]
    pub metadata_timeout_secs: u64,
}

impl KafkaOpts {
    pub fn message_timeout(&self) -> Duration {
        Duration::from_millis(self.message_timeout_ms)
    }

    pub fn metadata_timeout(&self) -> Duration {
        Duration::from_secs(self.metadata_timeout_secs)
    }
}

impl Default for KafkaOpts {
    fn default() -> Self {
        Self {
            brokers: "localhost:9092".to_string(),
            partitions: 1,
            replication_factor: 1,
            message_timeout_ms: 5000,
            metadata_timeout_secs: 5,
        }
    }
}

/// Configuration for the JSON producer.
#[derive(Debug, Clone, Parser)]
pub struct Config {
    /// Topic to publish to
    #[clap(long, env = "BUZZ_TOPIC", default_value = "unknown_topic")]
    pub topic: String,

    /// Seconds to wait between messages. Negative values are treated as zero.
    #[clap(
        long,
        env = "BUZZ_INTERVAL_SECONDS",
        default_value_t = 1,
        allow_negative_numbers = true
    )]
    pub interval_secs: i64,

    /// Send this message forever instead of replaying the data file.
    /// Parsed as JSON when it is an object, otherwise sent as {"message": ...}.
    #[clap(long, env = "CUSTOM_MESSAGE")]
    pub custom_message: Option<String>,

    /// JSON file holding an array of objects to replay
    #[clap(long, env = "BUZZ_DATA_FILE", default_value = "data/buzz.json")]
    pub data_file: PathBuf,

    /// Stop after this many messages (runs until interrupted when unset)
    #[clap(long, env = "BUZZ_MAX_MESSAGES")]
    pub max_messages: Option<u64>,

    #[clap(flatten)]
    pub kafka: KafkaOpts,
}

impl Config {
    /// Check settings clap cannot express as types.
    pub fn validate(&self) -> Result<()> {
        if self.topic.trim().is_empty() {
            return Err(ProducerError::InvalidConfig(
                "topic name must not be empty".to_string(),
            ));
        }
        if self.kafka.partitions < 1 {
            return Err(ProducerError::InvalidConfig(format!(
                "partitions must be at least 1, got {}",
                self.kafka.partitions
            )));
        }
        if self.kafka.replication_factor < 1 {
            return Err(ProducerError::InvalidConfig(format!(
                "replication factor must be at least 1, got {}",
                self.kafka.replication_factor
            )));
        }
        Ok(())
    }

    /// Pacing delay between sends.
    pub fn interval(&self) -> Duration {
        if self.interval_secs < 0 {
            warn!(
                "Message interval {} is negative; using 0 seconds",
                self.interval_secs
            );
            return Duration::ZERO;
        }
        Duration::from_secs(self.interval_secs.unsigned_abs())
    }

    pub fn source_kind(&self) -> SourceKind {
        SourceKind::resolve(self.custom_message.as_deref(), &self.data_file)
    }

    /// Log the resolved settings, one line each.
    pub fn log_summary(&self) {
        info!("Kafka brokers: {}", self.kafka.brokers);
        info!("Kafka topic: {}", self.topic);
        info!("Message interval: {} seconds", self.interval().as_secs());
        match self.max_messages {
            Some(max) => info!("Message limit: {max}"),
            None => info!("Message limit: none"),
        }
    }
}
