use serde::{Deserialize, Serialize};

use super::value_objects::OrderStatus;

// ============================================================================
// Order Status Event - broker payload
// ============================================================================
//
// Published on order creation and received back from the downstream
// processor. `status` stays a plain string so that statuses this service
// does not know about are still relayed verbatim.
//
// Wire shape: {"orderId": 42, "status": "CREATED"}
//
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusEvent {
    pub order_id: i64,
    pub status: String,
}

impl OrderStatusEvent {
    pub fn new(order_id: i64, status: OrderStatus) -> Self {
        Self {
            order_id,
            status: status.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape_uses_camel_case() {
        let event = OrderStatusEvent::new(7, OrderStatus::Created);
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json, serde_json::json!({"orderId": 7, "status": "CREATED"}));
    }

    #[test]
    fn test_unknown_status_string_survives_parsing() {
        let event: OrderStatusEvent =
            serde_json::from_str(r#"{"orderId": 3, "status": "AWAITING_PICKUP"}"#).unwrap();

        assert_eq!(event.order_id, 3);
        assert_eq!(event.status, "AWAITING_PICKUP");
    }
}
