// ============================================================================
// Order Domain
// ============================================================================
//
// - Value objects (OrderStatus)
// - Events (OrderStatusEvent, the broker payload)
// - Errors (OrderError)
// - Aggregate construction from cart contents
// - Read model (OrderDto)
// - OrderService (create / list) and OrderStatusListener (relay)
//
// ============================================================================

pub mod value_objects;
pub mod events;
pub mod errors;
pub mod aggregate;
pub mod dto;
pub mod service;
pub mod status_listener;

// Re-export for convenience
pub use value_objects::*;
pub use events::*;
pub use errors::*;
pub use dto::*;
pub use service::{OrderRouting, OrderService};
pub use status_listener::OrderStatusListener;
