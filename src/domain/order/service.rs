use chrono::Utc;
use std::sync::Arc;

use crate::db::{OrderStore, OrderTransaction};
use crate::domain::cart::{CartLineItem, CartService};
use crate::messaging::StatusPublisher;
use crate::metrics::Metrics;
use crate::models::{NewOrder, Order};

use super::dto::OrderDto;
use super::errors::OrderError;
use super::events::OrderStatusEvent;

// ============================================================================
// Order Service
// ============================================================================
//
// Orchestrates: Cart → Transaction (user, products, insert) → Broker → Commit
//
// The status event is published before commit, so a publish failure rolls the
// order back. Once the commit succeeded, the ordered lines are taken out of
// the cart; lines added while the order was in flight stay.
//
// ============================================================================

/// Where "new order" status events are sent
#[derive(Debug, Clone)]
pub struct OrderRouting {
    pub exchange: String,
    pub routing_key: String,
}

pub struct OrderService {
    store: Arc<dyn OrderStore>,
    cart: Arc<dyn CartService>,
    publisher: Arc<dyn StatusPublisher>,
    routing: OrderRouting,
    metrics: Arc<Metrics>,
}

impl OrderService {
    pub fn new(
        store: Arc<dyn OrderStore>,
        cart: Arc<dyn CartService>,
        publisher: Arc<dyn StatusPublisher>,
        routing: OrderRouting,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            store,
            cart,
            publisher,
            routing,
            metrics,
        }
    }

    /// Create an order from the user's cart.
    ///
    /// Returns `Ok(None)` without touching anything when the cart is empty.
    pub async fn create_order(&self, username: &str) -> Result<Option<i64>, OrderError> {
        let cart_items = self.cart.line_items(username).await;
        if cart_items.is_empty() {
            tracing::info!(username = %username, "Can't create order for empty cart");
            self.metrics.empty_cart_skips.inc();
            return Ok(None);
        }

        let item_count = cart_items.len();

        match self.create_in_transaction(username, cart_items.clone()).await {
            Ok(order_id) => {
                self.cart.remove_lines(username, &cart_items).await;
                self.metrics.orders_created.inc();

                tracing::info!(
                    order_id = order_id,
                    username = %username,
                    item_count = item_count,
                    "✅ Order created"
                );
                Ok(Some(order_id))
            }
            Err(e) => {
                self.metrics.record_order_failure(failure_reason(&e));
                tracing::error!(error = %e, username = %username, "Order creation failed");
                Err(e)
            }
        }
    }

    /// Every order of the user in the flat read representation
    pub async fn find_orders_by_username(&self, username: &str) -> Result<Vec<OrderDto>, OrderError> {
        let orders = self.store.find_orders_by_username(username).await?;
        Ok(orders.iter().map(OrderDto::from).collect())
    }

    async fn create_in_transaction(
        &self,
        username: &str,
        cart_items: Vec<CartLineItem>,
    ) -> Result<i64, OrderError> {
        let mut tx = self.store.begin().await?;

        let result = self.persist_and_publish(tx.as_mut(), username, cart_items).await;

        match result {
            Ok(order) => {
                tx.commit().await?;
                Ok(order.id)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!(error = %rollback_err, "Rollback failed");
                }
                Err(e)
            }
        }
    }

    async fn persist_and_publish(
        &self,
        tx: &mut dyn OrderTransaction,
        username: &str,
        cart_items: Vec<CartLineItem>,
    ) -> Result<Order, OrderError> {
        let user = tx
            .find_user_by_username(username)
            .await?
            .ok_or_else(|| OrderError::UserNotFound(username.to_string()))?;

        let mut entries = Vec::with_capacity(cart_items.len());
        for item in cart_items {
            let product = tx
                .find_product_by_id(item.product_id)
                .await?
                .ok_or(OrderError::ProductNotFound(item.product_id))?;
            entries.push((item, product));
        }

        let new_order = NewOrder::from_cart(user, Utc::now(), entries)?;
        let order = tx.insert_order(&new_order).await?;

        let event = OrderStatusEvent::new(order.id, order.status);
        self.publisher
            .publish(&self.routing.exchange, &self.routing.routing_key, &event)
            .await?;

        Ok(order)
    }
}

fn failure_reason(error: &OrderError) -> &'static str {
    match error {
        OrderError::UserNotFound(_) => "user_not_found",
        OrderError::ProductNotFound(_) => "product_not_found",
        OrderError::EmptyItems | OrderError::InvalidQuantity(_) => "invalid_items",
        OrderError::Store(_) => "store",
        OrderError::Publish(_) => "publish",
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
