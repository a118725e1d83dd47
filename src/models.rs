use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::order::OrderStatus;

// ============================================================================
// Persistent Entities
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Order {
    pub id: i64,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub user: User,
    pub line_items: Vec<OrderLineItem>,
}

/// One product entry of an order. `order_id` is a back-reference; the
/// line item is owned by the order's `line_items`.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct OrderLineItem {
    pub id: i64,
    pub order_id: i64,
    pub product: Product,
    pub price: Decimal,
    pub qty: i32,
    pub color: Option<String>,
    pub material: Option<String>,
}

// ============================================================================
// Insert Payloads
// These carry no ids; the store assigns them on insert
// ============================================================================

#[derive(Clone, Debug)]
pub struct NewOrder {
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub user: User,
    pub line_items: Vec<NewOrderLineItem>,
}

#[derive(Clone, Debug)]
pub struct NewOrderLineItem {
    pub product: Product,
    pub price: Decimal,
    pub qty: i32,
    pub color: Option<String>,
    pub material: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
}
