// ============================================================================
// Messaging
// ============================================================================
//
// - StatusPublisher: sends order status events to a broker exchange
// - ClientNotifier:  pushes events to live clients subscribed to a destination
//
// ============================================================================

mod client_channel;
mod redpanda;

pub use client_channel::ClientChannel;
pub use redpanda::{RedpandaClient, RedpandaConsumer};

use async_trait::async_trait;

use crate::domain::order::OrderStatusEvent;

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Broker error: {0}")]
    Broker(String),
}

#[async_trait]
pub trait StatusPublisher: Send + Sync {
    async fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        event: &OrderStatusEvent,
    ) -> Result<(), PublishError>;
}

#[async_trait]
pub trait ClientNotifier: Send + Sync {
    async fn send_to(&self, destination: &str, event: &OrderStatusEvent) -> Result<(), PublishError>;
}
