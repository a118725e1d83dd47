use crate::db::StoreError;
use crate::messaging::PublishError;

// ============================================================================
// Order Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("No product with id {0}")]
    ProductNotFound(i64),

    #[error("Order items cannot be empty")]
    EmptyItems,

    #[error("Invalid item quantity: {0}")]
    InvalidQuantity(i32),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to publish order status: {0}")]
    Publish(#[from] PublishError),
}
