//! buzz-stream
//!
//! A small streaming utility pair:
//!
//! - `producer`: replays JSON records from a file (or one custom message) onto
//!   a Kafka topic at a fixed interval until interrupted.
//! - `stall_monitor`: reads `time,temperature` rows from a CSV file and logs
//!   which readings fall inside the stall range.
//!
//! # CLI Usage
//!
//! ```bash
//! # Replay data/buzz.json onto the buzz topic every 2 seconds
//! BUZZ_TOPIC=buzz BUZZ_INTERVAL_SECONDS=2 buzz-stream produce
//!
//! # Send the same custom message forever
//! CUSTOM_MESSAGE='{"message": "hello", "author": "Eve"}' buzz-stream produce --topic buzz
//!
//! # Classify temperature readings
//! buzz-stream monitor --file data/food_temperatures.csv
//! ```

pub use buzz_stream_producer as producer;
pub use buzz_stream_stall_monitor as stall_monitor;

/// Exit code for a failed command, given the error that ended it.
///
/// Producer errors carry their own code; anything else exits with 1.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<producer::ProducerError>()
        .map(producer::ProducerError::exit_code)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use producer::{exit_code, ProducerError, SourceError};
    use std::path::PathBuf;

    #[test]
    fn test_producer_errors_keep_their_code() {
        let err = anyhow::Error::from(ProducerError::from(SourceError::Missing {
            path: PathBuf::from("data/buzz.json"),
        }));
        assert_eq!(exit_code_for(&err), exit_code::SOURCE_MISSING);
    }

    #[test]
    fn test_other_errors_exit_one() {
        let err = anyhow::anyhow!("Failed to open CSV file");
        assert_eq!(exit_code_for(&err), 1);
    }
}
