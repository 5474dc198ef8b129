//! Broker client seam and its Kafka implementation.

use crate::config::KafkaOpts;
use crate::error::{ProducerError, Result};
use crate::record::Record;
use async_trait::async_trait;
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::types::RDKafkaErrorCode;
use rdkafka::ClientConfig;
use std::time::Duration;
use tracing::{debug, info};

/// Operations the producer needs from a publish/subscribe broker.
///
/// The delivery loop owns its broker and calls [`Broker::close`] exactly once.
#[async_trait]
pub trait Broker: Send + Sync {
    /// Fail unless the broker answers a metadata request.
    async fn verify_reachable(&self) -> Result<()>;

    /// Create the topic, treating "already exists" as success.
    async fn create_topic(&self, topic: &str) -> Result<()>;

    /// Publish one record and wait for the broker to acknowledge it.
    async fn send(&self, topic: &str, record: &Record) -> Result<()>;

    /// Flush outstanding messages and release the connection.
    async fn close(&mut self) -> Result<()>;
}

/// [`Broker`] backed by an rdkafka `FutureProducer`.
pub struct KafkaBroker {
    producer: FutureProducer,
    opts: KafkaOpts,
}

impl KafkaBroker {
    /// Create the Kafka producer client.
    pub fn new(opts: &KafkaOpts) -> Result<Self> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &opts.brokers)
            .set("message.timeout.ms", opts.message_timeout_ms.to_string())
            .create()
            .map_err(ProducerError::ClientCreation)?;

        info!("Kafka producer created for {}", opts.brokers);
        Ok(Self {
            producer,
            opts: opts.clone(),
        })
    }

    fn admin_client(&self) -> Result<AdminClient<DefaultClientContext>> {
        ClientConfig::new()
            .set("bootstrap.servers", &self.opts.brokers)
            .create()
            .map_err(ProducerError::ClientCreation)
    }
}

#[async_trait]
impl Broker for KafkaBroker {
    async fn verify_reachable(&self) -> Result<()> {
        let producer = self.producer.clone();
        let timeout = self.opts.metadata_timeout();
        let unreachable_err = |reason: String| ProducerError::BrokerUnreachable {
            brokers: self.opts.brokers.clone(),
            reason,
        };

        // fetch_metadata blocks the calling thread until the broker answers.
        let broker_count = tokio::task::spawn_blocking(move || {
            producer
                .client()
                .fetch_metadata(None, timeout)
                .map(|metadata| metadata.brokers().len())
        })
        .await
        .map_err(|e| unreachable_err(e.to_string()))?
        .map_err(|e| unreachable_err(e.to_string()))?;

        if broker_count == 0 {
            return Err(unreachable_err("metadata listed no brokers".to_string()));
        }

        info!(
            "Kafka is reachable at {} ({broker_count} broker(s))",
            self.opts.brokers
        );
        Ok(())
    }

    async fn create_topic(&self, topic: &str) -> Result<()> {
        let admin_client = self.admin_client()?;
        let new_topic = NewTopic::new(
            topic,
            self.opts.partitions,
            TopicReplication::Fixed(self.opts.replication_factor),
        );
        let opts = AdminOptions::new().operation_timeout(Some(self.opts.metadata_timeout()));

        let results = admin_client
            .create_topics(&[new_topic], &opts)
            .await
            .map_err(|e| ProducerError::TopicCreation {
                topic: topic.to_string(),
                reason: e.to_string(),
            })?;

        for result in results {
            match result {
                Ok(topic_name) => info!("Topic '{topic_name}' created successfully"),
                Err((topic_name, RDKafkaErrorCode::TopicAlreadyExists)) => {
                    info!("Topic '{topic_name}' already exists")
                }
                Err((topic_name, code)) => {
                    return Err(ProducerError::TopicCreation {
                        topic: topic_name,
                        reason: code.to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    async fn send(&self, topic: &str, record: &Record) -> Result<()> {
        let payload = record.to_payload()?;
        let message = FutureRecord::<(), Vec<u8>>::to(topic).payload(&payload);

        let delivery = self
            .producer
            .send(message, self.opts.message_timeout())
            .await
            .map_err(|(err, _)| ProducerError::Delivery {
                topic: topic.to_string(),
                reason: err.to_string(),
            })?;

        debug!("Delivered to topic '{topic}': {delivery:?}");
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        let producer = self.producer.clone();
        let timeout: Duration = self.opts.message_timeout();

        tokio::task::spawn_blocking(move || producer.flush(timeout))
            .await
            .map_err(|e| ProducerError::Flush(e.to_string()))?
            .map_err(|e| ProducerError::Flush(e.to_string()))?;

        info!("Kafka producer closed.");
        Ok(())
    }
}
