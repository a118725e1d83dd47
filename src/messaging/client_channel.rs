use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::{broadcast, Mutex};

use crate::domain::order::OrderStatusEvent;
use super::{ClientNotifier, PublishError};

const CHANNEL_CAPACITY: usize = 256;

/// Fan-out of status events to live subscribers, one broadcast channel per
/// destination. Events sent while nobody is subscribed are dropped.
#[derive(Default)]
pub struct ClientChannel {
    destinations: Mutex<HashMap<String, broadcast::Sender<OrderStatusEvent>>>,
}

impl ClientChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn subscribe(&self, destination: &str) -> broadcast::Receiver<OrderStatusEvent> {
        let mut destinations = self.destinations.lock().await;
        destinations
            .entry(destination.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }
}

#[async_trait]
impl ClientNotifier for ClientChannel {
    async fn send_to(&self, destination: &str, event: &OrderStatusEvent) -> Result<(), PublishError> {
        let destinations = self.destinations.lock().await;

        let delivered = destinations
            .get(destination)
            .and_then(|sender| sender.send(event.clone()).ok())
            .unwrap_or(0);

        tracing::debug!(
            destination = %destination,
            order_id = event.order_id,
            subscribers = delivered,
            "Pushed order status to clients"
        );

        Ok(())
    }
}
