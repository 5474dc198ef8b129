//! In-memory [`Broker`] for exercising the delivery loop without Kafka.

use crate::broker::Broker;
use crate::error::{ProducerError, Result};
use crate::record::Record;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

/// Everything a [`RecordingBroker`] observed.
#[derive(Debug, Default, Clone)]
pub struct BrokerLog {
    pub sent: Vec<(String, Record)>,
    pub send_attempts: usize,
    pub topics_created: Vec<String>,
    pub close_calls: usize,
    pub sends_after_close: usize,
}

/// Broker double that records calls and can inject failures.
///
/// Clones share the same log, so a test can keep a handle after moving the
/// broker into the delivery loop.
#[derive(Debug, Clone, Default)]
pub struct RecordingBroker {
    log: Arc<Mutex<BrokerLog>>,
    fail_on_send: Option<usize>,
    cancel_after: Option<(usize, CancellationToken)>,
    unreachable: bool,
    reject_topic: bool,
}

impl RecordingBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the n-th send attempt (1-based) fail.
    pub fn fail_on_send(mut self, attempt: usize) -> Self {
        self.fail_on_send = Some(attempt);
        self
    }

    /// Cancel `token` once the n-th send (1-based) has completed.
    pub fn cancel_after(mut self, sends: usize, token: CancellationToken) -> Self {
        self.cancel_after = Some((sends, token));
        self
    }

    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    pub fn reject_topic(mut self) -> Self {
        self.reject_topic = true;
        self
    }

    pub fn log(&self) -> BrokerLog {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    /// The `message` field of every sent record, in send order.
    pub fn sent_messages(&self) -> Vec<String> {
        self.log()
            .sent
            .iter()
            .map(|(_, record)| {
                record
                    .get("message")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string()
            })
            .collect()
    }

    pub fn close_calls(&self) -> usize {
        self.log().close_calls
    }

    fn with_log<T>(&self, f: impl FnOnce(&mut BrokerLog) -> T) -> Result<T> {
        let mut log = self
            .log
            .lock()
            .map_err(|e| ProducerError::Flush(format!("broker log poisoned: {e}")))?;
        Ok(f(&mut log))
    }
}

#[async_trait]
impl Broker for RecordingBroker {
    async fn verify_reachable(&self) -> Result<()> {
        if self.unreachable {
            return Err(ProducerError::BrokerUnreachable {
                brokers: "memory".to_string(),
                reason: "broker marked unreachable".to_string(),
            });
        }
        Ok(())
    }

    async fn create_topic(&self, topic: &str) -> Result<()> {
        if self.reject_topic {
            return Err(ProducerError::TopicCreation {
                topic: topic.to_string(),
                reason: "topic rejected".to_string(),
            });
        }
        self.with_log(|log| {
            if !log.topics_created.iter().any(|t| t == topic) {
                log.topics_created.push(topic.to_string());
            }
        })
    }

    async fn send(&self, topic: &str, record: &Record) -> Result<()> {
        let attempt = self.with_log(|log| {
            if log.close_calls > 0 {
                log.sends_after_close += 1;
            }
            log.send_attempts += 1;
            log.send_attempts
        })?;

        if self.fail_on_send == Some(attempt) {
            return Err(ProducerError::Delivery {
                topic: topic.to_string(),
                reason: format!("injected failure on send {attempt}"),
            });
        }

        self.with_log(|log| log.sent.push((topic.to_string(), record.clone())))?;

        if let Some((after, token)) = &self.cancel_after {
            if *after == attempt {
                token.cancel();
            }
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.with_log(|log| log.close_calls += 1)
    }
}

/// Log output captured from a scoped `tracing` subscriber.
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

#[cfg(test)]
impl CapturedLogs {
    /// A DEBUG-level subscriber writing plain text into this buffer.
    pub(crate) fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync {
        let logs = self.clone();
        tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || logs.clone())
            .finish()
    }

    pub(crate) fn contents(&self) -> String {
        let buf = self.0.lock().unwrap();
        String::from_utf8_lossy(&buf).into_owned()
    }
}

#[cfg(test)]
impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
