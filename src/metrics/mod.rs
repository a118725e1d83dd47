// Private module declaration
mod server;

use prometheus::{IntCounter, IntCounterVec, Opts, Registry};

// Re-export for public API
pub use server::{health_handler, metrics_handler};

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Provides metrics for:
// - Order creation outcomes
// - Order status relay
// - File import throughput and failures
//
// All metrics are registered with Prometheus and can be scraped via /metrics
// ============================================================================

/// Central metrics registry for the entire application
pub struct Metrics {
    registry: Registry,

    // Order Metrics
    pub orders_created: IntCounter,
    pub orders_failed: IntCounterVec,
    pub empty_cart_skips: IntCounter,

    // Status Relay Metrics
    pub status_events_relayed: IntCounter,
    pub status_events_dropped: IntCounter,

    // Import Metrics
    pub import_files: IntCounterVec,
    pub import_records_persisted: IntCounter,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let orders_created = IntCounter::new("orders_created_total", "Total orders created")?;
        registry.register(Box::new(orders_created.clone()))?;

        let orders_failed = IntCounterVec::new(
            Opts::new("orders_failed_total", "Total order creations that failed"),
            &["reason"],
        )?;
        registry.register(Box::new(orders_failed.clone()))?;

        let empty_cart_skips = IntCounter::new(
            "orders_empty_cart_skips_total",
            "Order creations skipped because the cart was empty",
        )?;
        registry.register(Box::new(empty_cart_skips.clone()))?;

        let status_events_relayed = IntCounter::new(
            "order_status_events_relayed_total",
            "Order status events pushed to clients",
        )?;
        registry.register(Box::new(status_events_relayed.clone()))?;

        let status_events_dropped = IntCounter::new(
            "order_status_events_dropped_total",
            "Order status messages that could not be parsed or relayed",
        )?;
        registry.register(Box::new(status_events_dropped.clone()))?;

        let import_files = IntCounterVec::new(
            Opts::new("import_files_total", "Imported files by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(import_files.clone()))?;

        let import_records_persisted = IntCounter::new(
            "import_records_persisted_total",
            "Records persisted by the file import",
        )?;
        registry.register(Box::new(import_records_persisted.clone()))?;

        Ok(Self {
            registry,
            orders_created,
            orders_failed,
            empty_cart_skips,
            status_events_relayed,
            status_events_dropped,
            import_files,
            import_records_persisted,
        })
    }

    /// Get the Prometheus registry for exposing metrics via HTTP
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_order_failure(&self, reason: &str) {
        self.orders_failed.with_label_values(&[reason]).inc();
    }

    pub fn record_import_file(&self, success: bool) {
        let outcome = if success { "imported" } else { "failed" };
        self.import_files.with_label_values(&[outcome]).inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_metrics_registered() {
        let metrics = Metrics::new().unwrap();
        metrics.record_order_failure("user_not_found");
        metrics.record_import_file(true);

        assert_eq!(metrics.registry().gather().len(), 7);
        assert_eq!(metrics.orders_failed.with_label_values(&["user_not_found"]).get(), 1);
        assert_eq!(metrics.import_files.with_label_values(&["imported"]).get(), 1);
    }
}
