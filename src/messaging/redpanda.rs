use async_trait::async_trait;
use rdkafka::{
    config::ClientConfig,
    consumer::{Consumer, StreamConsumer},
    producer::{FutureProducer, FutureRecord},
    Message,
};
use std::sync::Arc;
use std::time::Duration;
use anyhow::Result;

use crate::domain::order::{OrderStatusEvent, OrderStatusListener};
use super::{PublishError, StatusPublisher};

const SEND_TIMEOUT: Duration = Duration::from_secs(5);
const RECEIVE_BACKOFF: Duration = Duration::from_secs(1);

// ============================================================================
// Producer - exchange maps to topic, routing key maps to record key
// ============================================================================

pub struct RedpandaClient {
    producer: FutureProducer,
}

impl RedpandaClient {
    pub fn new(brokers: &str) -> Result<Self> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()?;

        Ok(Self { producer })
    }

    pub async fn publish_raw(&self, topic: &str, key: &str, payload: &str) -> Result<(), PublishError> {
        let record = FutureRecord::to(topic).key(key).payload(payload);

        self.producer
            .send(record, rdkafka::util::Timeout::After(SEND_TIMEOUT))
            .await
            .map_err(|(e, _)| PublishError::Broker(e.to_string()))?;

        tracing::info!(
            topic = %topic,
            key = %key,
            "Published to Redpanda"
        );
        Ok(())
    }
}

#[async_trait]
impl StatusPublisher for RedpandaClient {
    async fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        event: &OrderStatusEvent,
    ) -> Result<(), PublishError> {
        let payload = serde_json::to_string(event)?;

        if let Err(e) = self.publish_raw(exchange, routing_key, &payload).await {
            tracing::error!(
                error = %e,
                topic = %exchange,
                order_id = event.order_id,
                "Failed to publish order status"
            );
            return Err(e);
        }

        Ok(())
    }
}

// ============================================================================
// Consumer - feeds the processed-order queue into the status listener
// ============================================================================

pub struct RedpandaConsumer {
    consumer: StreamConsumer,
    queue: String,
}

impl RedpandaConsumer {
    pub fn new(brokers: &str, group_id: &str, queue: &str) -> Result<Self> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("group.id", group_id)
            .set("enable.auto.commit", "true")
            .set("auto.offset.reset", "latest")
            .create()?;

        consumer.subscribe(&[queue])?;

        tracing::info!(queue = %queue, group_id = %group_id, "Subscribed to order status queue");

        Ok(Self {
            consumer,
            queue: queue.to_string(),
        })
    }

    /// Receive until the future is dropped. Receive errors are logged and
    /// the loop continues after a short pause.
    pub async fn run(self, listener: Arc<OrderStatusListener>) {
        loop {
            match self.consumer.recv().await {
                Ok(message) => match message.payload() {
                    Some(payload) => listener.handle_payload(payload).await,
                    None => {
                        tracing::warn!(
                            queue = %self.queue,
                            offset = message.offset(),
                            "Skipping message without payload"
                        );
                    }
                },
                Err(e) => {
                    tracing::error!(error = %e, queue = %self.queue, "Failed to receive from queue");
                    tokio::time::sleep(RECEIVE_BACKOFF).await;
                }
            }
        }
    }
}
