use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::Mutex;

// ============================================================================
// Cart - per-user list of line items awaiting order creation
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub product_id: i64,
    pub qty: i32,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub material: Option<String>,
}

impl CartLineItem {
    /// Entries for the same product with the same attributes are one line
    fn same_line(&self, other: &CartLineItem) -> bool {
        self.product_id == other.product_id
            && self.color == other.color
            && self.material == other.material
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CartError {
    #[error("Invalid item quantity: {0}")]
    InvalidQuantity(i32),

    #[error("Quantity of product {product_id} would exceed {max}", max = i32::MAX)]
    QuantityOverflow { product_id: i64 },
}

#[async_trait]
pub trait CartService: Send + Sync {
    async fn add_item(&self, username: &str, item: CartLineItem) -> Result<(), CartError>;

    async fn line_items(&self, username: &str) -> Vec<CartLineItem>;

    async fn clear(&self, username: &str);

    /// Take the given lines out of the cart, leaving anything added since
    async fn remove_lines(&self, username: &str, lines: &[CartLineItem]);
}

#[derive(Default)]
pub struct InMemoryCart {
    carts: Mutex<HashMap<String, Vec<CartLineItem>>>,
}

impl InMemoryCart {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CartService for InMemoryCart {
    async fn add_item(&self, username: &str, item: CartLineItem) -> Result<(), CartError> {
        if item.qty <= 0 {
            return Err(CartError::InvalidQuantity(item.qty));
        }

        let mut carts = self.carts.lock().await;
        let lines = carts.entry(username.to_string()).or_default();

        match lines.iter_mut().find(|line| line.same_line(&item)) {
            Some(line) => {
                line.qty = line
                    .qty
                    .checked_add(item.qty)
                    .ok_or(CartError::QuantityOverflow { product_id: item.product_id })?;
            }
            None => lines.push(item),
        }

        tracing::debug!(username = %username, line_count = lines.len(), "Cart updated");
        Ok(())
    }

    async fn line_items(&self, username: &str) -> Vec<CartLineItem> {
        self.carts
            .lock()
            .await
            .get(username)
            .cloned()
            .unwrap_or_default()
    }

    async fn clear(&self, username: &str) {
        self.carts.lock().await.remove(username);
    }

    async fn remove_lines(&self, username: &str, removed: &[CartLineItem]) {
        let mut carts = self.carts.lock().await;
        let Some(lines) = carts.get_mut(username) else {
            return;
        };

        for item in removed {
            if let Some(line) = lines.iter_mut().find(|line| line.same_line(item)) {
                line.qty -= item.qty.min(line.qty);
            }
        }
        lines.retain(|line| line.qty > 0);

        if lines.is_empty() {
            carts.remove(username);
        }
    }
}
