//! The paced send loop.

use crate::broker::Broker;
use crate::error::Result;
use crate::sequence::RecordSequence;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Why the delivery loop stopped without a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The shutdown token was cancelled between sends.
    Interrupted,
    /// A send failed. The loop does not retry or skip ahead.
    DeliveryFailed,
    /// The configured message limit was reached.
    LimitReached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReport {
    pub sent: u64,
    pub stop_reason: StopReason,
}

/// Sends one record at a time to a single topic, sleeping between sends.
///
/// The loop owns the broker and closes it exactly once when [`run`] returns,
/// whether it stopped normally or because the record source failed.
///
/// [`run`]: DeliveryLoop::run
pub struct DeliveryLoop<B: Broker> {
    broker: B,
    topic: String,
    interval: Duration,
    max_messages: Option<u64>,
}

impl<B: Broker> DeliveryLoop<B> {
    pub fn new(broker: B, topic: impl Into<String>, interval: Duration) -> Self {
        Self {
            broker,
            topic: topic.into(),
            interval,
            max_messages: None,
        }
    }

    pub fn with_max_messages(mut self, max_messages: Option<u64>) -> Self {
        self.max_messages = max_messages;
        self
    }

    /// Run until interrupted, a send fails, or the message limit is reached.
    ///
    /// A record source failure is returned as an error after the broker has
    /// been closed.
    pub async fn run(
        mut self,
        sequence: &mut RecordSequence,
        shutdown: CancellationToken,
    ) -> Result<DeliveryReport> {
        info!("Starting message production to topic '{}'...", self.topic);
        let outcome = self.pump(sequence, &shutdown).await;

        if let Err(e) = self.broker.close().await {
            warn!("Error while closing Kafka producer: {e}");
        }

        if let Ok(report) = &outcome {
            info!(
                "Producer stopped after {} message(s): {:?}",
                report.sent, report.stop_reason
            );
        }
        outcome
    }

    async fn pump(
        &mut self,
        sequence: &mut RecordSequence,
        shutdown: &CancellationToken,
    ) -> Result<DeliveryReport> {
        let mut sent = 0u64;

        loop {
            if shutdown.is_cancelled() {
                warn!("Producer interrupted by user.");
                return Ok(self.report(sent, StopReason::Interrupted));
            }
            if self.limit_reached(sent) {
                info!("Reached message limit of {sent}");
                return Ok(self.report(sent, StopReason::LimitReached));
            }

            let record = sequence.next_record()?;

            if let Err(e) = self.broker.send(&self.topic, &record).await {
                error!("Error during message production: {e}");
                return Ok(self.report(sent, StopReason::DeliveryFailed));
            }
            sent += 1;
            info!("Sent message to topic '{}': {record}", self.topic);

            if self.limit_reached(sent) {
                continue;
            }

            tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    warn!("Producer interrupted by user.");
                    return Ok(self.report(sent, StopReason::Interrupted));
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }

    fn limit_reached(&self, sent: u64) -> bool {
        self.max_messages.is_some_and(|max| sent >= max)
    }

    fn report(&self, sent: u64, stop_reason: StopReason) -> DeliveryReport {
        DeliveryReport { sent, stop_reason }
    }
}
