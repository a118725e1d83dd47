// ============================================================================
// Persistence Layer
// ============================================================================
//
// Repository seams used by the order service and the import pipeline.
//
// - OrderStore / OrderTransaction: order creation runs every read and write
//   inside one transaction; dropping an uncommitted transaction rolls back.
// - RecordSink: persists one imported record per transaction.
//
// ============================================================================

mod postgres;
mod schema;

#[cfg(test)]
pub mod memory;

pub use postgres::PgStore;
pub use schema::ensure_schema;

use async_trait::async_trait;

use crate::models::{NewOrder, Order, Product, User};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid stored data: {0}")]
    InvalidData(String),
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Open a transaction boundary for order creation
    async fn begin(&self) -> Result<Box<dyn OrderTransaction>, StoreError>;

    /// All orders of a user, with line items and their products
    async fn find_orders_by_username(&self, username: &str) -> Result<Vec<Order>, StoreError>;
}

#[async_trait]
pub trait OrderTransaction: Send {
    async fn find_user_by_username(&mut self, username: &str) -> Result<Option<User>, StoreError>;

    async fn find_product_by_id(&mut self, id: i64) -> Result<Option<Product>, StoreError>;

    /// Insert the order and all of its line items, returning them with ids
    async fn insert_order(&mut self, order: &NewOrder) -> Result<Order, StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;

    async fn rollback(self: Box<Self>) -> Result<(), StoreError>;
}

#[async_trait]
pub trait RecordSink<R>: Send + Sync {
    async fn persist(&self, record: R) -> Result<(), StoreError>;
}
