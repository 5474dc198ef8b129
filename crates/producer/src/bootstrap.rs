//! Preflight checks run before the first record is sent.

use crate::broker::Broker;
use crate::error::Result;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Fail unless the broker answers. Runs before the record source is checked.
pub async fn check_reachable<B: Broker>(broker: &B) -> Result<()> {
    broker.verify_reachable().await
}

/// Make sure the topic exists, creating it if needed.
pub async fn ensure_topic<B: Broker>(broker: &B, topic: &str) -> Result<()> {
    broker.create_topic(topic).await?;
    info!("Kafka topic '{topic}' is ready.");
    Ok(())
}

/// Returns a token that is cancelled when the process receives Ctrl+C.
pub fn interrupt_token() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received interrupt signal (Ctrl+C)");
                trigger.cancel();
            }
            Err(e) => error!("Failed to install Ctrl+C handler: {e}"),
        }
    });

    token
}
