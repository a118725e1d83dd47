use std::sync::Arc;

use crate::messaging::{ClientNotifier, PublishError};
use crate::metrics::Metrics;
use super::events::OrderStatusEvent;

/// Relays processed-order status events from the broker to live clients.
/// Pass-through: nothing is persisted and the event is forwarded unchanged.
pub struct OrderStatusListener {
    notifier: Arc<dyn ClientNotifier>,
    destination: String,
    metrics: Arc<Metrics>,
}

impl OrderStatusListener {
    pub fn new(notifier: Arc<dyn ClientNotifier>, destination: impl Into<String>, metrics: Arc<Metrics>) -> Self {
        Self {
            notifier,
            destination: destination.into(),
            metrics,
        }
    }

    pub async fn receive(&self, event: OrderStatusEvent) -> Result<(), PublishError> {
        tracing::info!(
            order_id = event.order_id,
            status = %event.status,
            "New order status received"
        );

        self.notifier.send_to(&self.destination, &event).await?;
        self.metrics.status_events_relayed.inc();
        Ok(())
    }

    /// Entry point for raw broker payloads. Undecodable messages are logged
    /// and dropped.
    pub async fn handle_payload(&self, payload: &[u8]) {
        let event: OrderStatusEvent = match serde_json::from_slice(payload) {
            Ok(event) => event,
            Err(e) => {
                self.metrics.status_events_dropped.inc();
                tracing::warn!(
                    error = %e,
                    payload = %String::from_utf8_lossy(payload),
                    "Dropping malformed order status message"
                );
                return;
            }
        };

        if let Err(e) = self.receive(event).await {
            self.metrics.status_events_dropped.inc();
            tracing::error!(error = %e, "Failed to relay order status");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::ClientChannel;

    const DESTINATION: &str = "/order_out/order";

    fn listener(channel: Arc<ClientChannel>) -> (OrderStatusListener, Arc<Metrics>) {
        let metrics = Arc::new(Metrics::new().unwrap());
        (OrderStatusListener::new(channel, DESTINATION, metrics.clone()), metrics)
    }

    #[tokio::test]
    async fn test_event_is_relayed_verbatim() {
        let channel = Arc::new(ClientChannel::new());
        let mut rx = channel.subscribe(DESTINATION).await;
        let (listener, metrics) = listener(channel);

        let event = OrderStatusEvent { order_id: 12, status: "IN_DELIVERY".to_string() };
        listener.receive(event.clone()).await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), event);
        assert_eq!(metrics.status_events_relayed.get(), 1);
    }

    #[tokio::test]
    async fn test_raw_payload_is_decoded_and_relayed() {
        let channel = Arc::new(ClientChannel::new());
        let mut rx = channel.subscribe(DESTINATION).await;
        let (listener, _) = listener(channel);

        listener
            .handle_payload(br#"{"orderId": 5, "status": "SOMETHING_NEW"}"#)
            .await;

        let relayed = rx.recv().await.unwrap();
        assert_eq!(relayed.order_id, 5);
        assert_eq!(relayed.status, "SOMETHING_NEW");
    }

    #[tokio::test]
    async fn test_malformed_payload_is_dropped() {
        let channel = Arc::new(ClientChannel::new());
        let mut rx = channel.subscribe(DESTINATION).await;
        let (listener, metrics) = listener(channel);

        listener.handle_payload(b"not json").await;

        assert!(rx.try_recv().is_err());
        assert_eq!(metrics.status_events_dropped.get(), 1);
        assert_eq!(metrics.status_events_relayed.get(), 0);
    }
}
