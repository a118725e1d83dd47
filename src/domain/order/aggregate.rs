use chrono::{DateTime, Utc};

use crate::domain::cart::CartLineItem;
use crate::models::{NewOrder, NewOrderLineItem, Product, User};
use super::errors::OrderError;
use super::value_objects::OrderStatus;

// ============================================================================
// Order construction from cart contents
// ============================================================================

impl NewOrder {
    /// Build a `Created` order. Each cart entry is paired with the product it
    /// references; the line item price is a snapshot of the product price.
    pub fn from_cart(
        user: User,
        order_date: DateTime<Utc>,
        entries: Vec<(CartLineItem, Product)>,
    ) -> Result<Self, OrderError> {
        let line_items: Vec<NewOrderLineItem> = entries
            .into_iter()
            .map(|(item, product)| NewOrderLineItem {
                price: product.price,
                product,
                qty: item.qty,
                color: item.color,
                material: item.material,
            })
            .collect();

        validate_items(&line_items)?;

        Ok(Self {
            order_date,
            status: OrderStatus::Created,
            user,
            line_items,
        })
    }
}

fn validate_items(items: &[NewOrderLineItem]) -> Result<(), OrderError> {
    if items.is_empty() {
        return Err(OrderError::EmptyItems);
    }

    for item in items {
        if item.qty <= 0 {
            return Err(OrderError::InvalidQuantity(item.qty));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn user() -> User {
        User { id: 1, username: "alice".to_string() }
    }

    fn product(id: i64, cents: i64) -> Product {
        Product { id, name: format!("product-{}", id), price: Decimal::new(cents, 2) }
    }

    fn cart_item(product_id: i64, qty: i32) -> CartLineItem {
        CartLineItem {
            product_id,
            qty,
            color: Some("red".to_string()),
            material: None,
        }
    }

    #[test]
    fn test_snapshots_product_price() {
        let now = Utc::now();
        let order = NewOrder::from_cart(
            user(),
            now,
            vec![(cart_item(1, 2), product(1, 1999)), (cart_item(2, 1), product(2, 500))],
        )
        .unwrap();

        assert_eq!(order.status, OrderStatus::Created);
        assert_eq!(order.order_date, now);
        assert_eq!(order.line_items.len(), 2);
        assert_eq!(order.line_items[0].price, Decimal::new(1999, 2));
        assert_eq!(order.line_items[0].qty, 2);
        assert_eq!(order.line_items[0].color.as_deref(), Some("red"));
        assert_eq!(order.line_items[1].price, Decimal::new(500, 2));
    }

    #[test]
    fn test_empty_items_rejected() {
        let result = NewOrder::from_cart(user(), Utc::now(), vec![]);
        assert!(matches!(result, Err(OrderError::EmptyItems)));
    }

    #[test]
    fn test_non_positive_quantity_rejected() {
        let result = NewOrder::from_cart(user(), Utc::now(), vec![(cart_item(1, 0), product(1, 100))]);
        assert!(matches!(result, Err(OrderError::InvalidQuantity(0))));
    }
}
