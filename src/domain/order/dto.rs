use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Order, OrderLineItem};

// ============================================================================
// Order read model - flat representation returned by order listing
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    pub id: i64,
    pub order_date: DateTime<Utc>,
    pub status: String,
    pub username: String,
    pub line_items: Vec<OrderLineItemDto>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItemDto {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub price: Decimal,
    pub qty: i32,
    pub color: Option<String>,
    pub material: Option<String>,
}

impl From<&OrderLineItem> for OrderLineItemDto {
    fn from(li: &OrderLineItem) -> Self {
        Self {
            id: li.id,
            order_id: li.order_id,
            product_id: li.product.id,
            product_name: li.product.name.clone(),
            price: li.price,
            qty: li.qty,
            color: li.color.clone(),
            material: li.material.clone(),
        }
    }
}

impl From<&Order> for OrderDto {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            order_date: order.order_date,
            status: order.status.to_string(),
            username: order.user.username.clone(),
            line_items: order.line_items.iter().map(OrderLineItemDto::from).collect(),
        }
    }
}
