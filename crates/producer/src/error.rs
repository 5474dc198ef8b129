//! Error types for the producer.

use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes for fatal producer errors.
///
/// Normal loop termination (interrupt, failed send, message limit) exits with 0.
pub mod exit_code {
    pub const SOURCE_MISSING: i32 = 1;
    pub const SOURCE_INVALID: i32 = 2;
    pub const UNEXPECTED: i32 = 3;
    pub const BROKER_UNREACHABLE: i32 = 4;
    pub const CLIENT_CREATION: i32 = 5;
    pub const TOPIC_CREATION: i32 = 6;
    pub const INVALID_CONFIG: i32 = 7;
}

/// Errors raised while loading records from the data file.
///
/// Every variant is fatal: the sequence cannot continue without its source.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Data file not found: {}", path.display())]
    Missing { path: PathBuf },

    #[error("Invalid JSON format in file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Expected a list of JSON objects in {}, got {found}", path.display())]
    Schema { path: PathBuf, found: String },

    #[error("Failed to read data file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SourceError {
    pub fn exit_code(&self) -> i32 {
        match self {
            SourceError::Missing { .. } => exit_code::SOURCE_MISSING,
            SourceError::Parse { .. } | SourceError::Schema { .. } => exit_code::SOURCE_INVALID,
            SourceError::Io { .. } => exit_code::UNEXPECTED,
        }
    }
}

/// Errors that can occur while bootstrapping or running the producer.
#[derive(Error, Debug)]
pub enum ProducerError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Kafka broker unreachable at {brokers}: {reason}")]
    BrokerUnreachable { brokers: String, reason: String },

    #[error("Failed to create Kafka producer: {0}")]
    ClientCreation(#[source] rdkafka::error::KafkaError),

    #[error("Failed to create or verify topic '{topic}': {reason}")]
    TopicCreation { topic: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to send record to topic '{topic}': {reason}")]
    Delivery { topic: String, reason: String },

    #[error("Failed to serialize record: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to flush Kafka producer: {0}")]
    Flush(String),
}

impl ProducerError {
    /// Exit code the binary should terminate with for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ProducerError::Source(e) => e.exit_code(),
            ProducerError::BrokerUnreachable { .. } => exit_code::BROKER_UNREACHABLE,
            ProducerError::ClientCreation(_) => exit_code::CLIENT_CREATION,
            ProducerError::TopicCreation { .. } => exit_code::TOPIC_CREATION,
            ProducerError::InvalidConfig(_) => exit_code::INVALID_CONFIG,
            ProducerError::Delivery { .. }
            | ProducerError::Serialization(_)
            | ProducerError::Flush(_) => exit_code::UNEXPECTED,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProducerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_exit_codes_are_distinct() {
        let missing = SourceError::Missing {
            path: PathBuf::from("data/buzz.json"),
        };
        let schema = SourceError::Schema {
            path: PathBuf::from("data/buzz.json"),
            found: "object".to_string(),
        };
        let io = SourceError::Io {
            path: PathBuf::from("data/buzz.json"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };

        assert_eq!(missing.exit_code(), 1);
        assert_eq!(schema.exit_code(), 2);
        assert_eq!(io.exit_code(), 3);
    }

    #[test]
    fn test_bootstrap_exit_codes() {
        let unreachable = ProducerError::BrokerUnreachable {
            brokers: "localhost:9092".to_string(),
            reason: "timed out".to_string(),
        };
        let topic = ProducerError::TopicCreation {
            topic: "buzz".to_string(),
            reason: "not authorized".to_string(),
        };

        assert_eq!(unreachable.exit_code(), exit_code::BROKER_UNREACHABLE);
        assert_eq!(topic.exit_code(), exit_code::TOPIC_CREATION);
        assert_eq!(
            ProducerError::InvalidConfig("bad".to_string()).exit_code(),
            exit_code::INVALID_CONFIG
        );
    }

    #[test]
    fn test_source_error_message_names_path() {
        let err = ProducerError::from(SourceError::Missing {
            path: PathBuf::from("/tmp/nope.json"),
        });
        assert_eq!(err.to_string(), "Data file not found: /tmp/nope.json");
        assert_eq!(err.exit_code(), exit_code::SOURCE_MISSING);
    }
}
