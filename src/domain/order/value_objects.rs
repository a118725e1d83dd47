use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Order Value Objects
// ============================================================================

/// Lifecycle of an order. Orders are created in `Created`; the later states
/// are set out-of-band by the downstream order processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Created,
    Processed,
    InDelivery,
    Delivered,
    Closed,
    Canceled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "CREATED",
            OrderStatus::Processed => "PROCESSED",
            OrderStatus::InDelivery => "IN_DELIVERY",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Closed => "CLOSED",
            OrderStatus::Canceled => "CANCELED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown order status: {0}")]
pub struct UnknownOrderStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATED" => Ok(OrderStatus::Created),
            "PROCESSED" => Ok(OrderStatus::Processed),
            "IN_DELIVERY" => Ok(OrderStatus::InDelivery),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            "CLOSED" => Ok(OrderStatus::Closed),
            "CANCELED" => Ok(OrderStatus::Canceled),
            other => Err(UnknownOrderStatus(other.to_string())),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
