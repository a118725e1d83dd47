use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashMap;

use crate::domain::order::OrderStatus;
use crate::models::{NewOrder, NewProduct, Order, OrderLineItem, Product, User};
use super::{OrderStore, OrderTransaction, RecordSink, StoreError};

// ============================================================================
// PostgreSQL Store
// ============================================================================

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User { id: row.id, username: row.username }
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    price: Decimal,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product { id: row.id, name: row.name, price: row.price }
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    order_date: DateTime<Utc>,
    status: String,
    user_id: i64,
    username: String,
}

#[derive(sqlx::FromRow)]
struct LineItemRow {
    id: i64,
    order_id: i64,
    price: Decimal,
    qty: i32,
    color: Option<String>,
    material: Option<String>,
    product_id: i64,
    product_name: String,
    product_price: Decimal,
}

impl From<LineItemRow> for OrderLineItem {
    fn from(row: LineItemRow) -> Self {
        OrderLineItem {
            id: row.id,
            order_id: row.order_id,
            product: Product {
                id: row.product_id,
                name: row.product_name,
                price: row.product_price,
            },
            price: row.price,
            qty: row.qty,
            color: row.color,
            material: row.material,
        }
    }
}

#[async_trait]
impl OrderStore for PgStore {
    async fn begin(&self) -> Result<Box<dyn OrderTransaction>, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgOrderTransaction { tx }))
    }

    async fn find_orders_by_username(&self, username: &str) -> Result<Vec<Order>, StoreError> {
        let order_rows = sqlx::query_as::<_, OrderRow>(
            "SELECT o.id, o.order_date, o.status, u.id AS user_id, u.username
             FROM orders o
             JOIN users u ON u.id = o.user_id
             WHERE u.username = $1",
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await?;

        if order_rows.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids: Vec<i64> = order_rows.iter().map(|row| row.id).collect();

        let item_rows = sqlx::query_as::<_, LineItemRow>(
            "SELECT li.id, li.order_id, li.price, li.qty, li.color, li.material,
                    p.id AS product_id, p.name AS product_name, p.price AS product_price
             FROM order_line_items li
             JOIN products p ON p.id = li.product_id
             WHERE li.order_id = ANY($1)
             ORDER BY li.id",
        )
        .bind(order_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut items_by_order: HashMap<i64, Vec<OrderLineItem>> = HashMap::new();
        for row in item_rows {
            items_by_order.entry(row.order_id).or_default().push(row.into());
        }

        let mut orders = Vec::with_capacity(order_rows.len());
        for row in order_rows {
            let status = row
                .status
                .parse::<OrderStatus>()
                .map_err(|e| StoreError::InvalidData(e.to_string()))?;

            orders.push(Order {
                id: row.id,
                order_date: row.order_date,
                status,
                user: User { id: row.user_id, username: row.username },
                line_items: items_by_order.remove(&row.id).unwrap_or_default(),
            });
        }

        tracing::debug!(username = %username, order_count = orders.len(), "Loaded orders");
        Ok(orders)
    }
}

pub struct PgOrderTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl OrderTransaction for PgOrderTransaction {
    async fn find_user_by_username(&mut self, username: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT id, username FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&mut *self.tx)
            .await?;

        Ok(row.map(User::from))
    }

    async fn find_product_by_id(&mut self, id: i64) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query_as::<_, ProductRow>("SELECT id, name, price FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;

        Ok(row.map(Product::from))
    }

    async fn insert_order(&mut self, order: &NewOrder) -> Result<Order, StoreError> {
        let order_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO orders (order_date, status, user_id) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(order.order_date)
        .bind(order.status.as_str())
        .bind(order.user.id)
        .fetch_one(&mut *self.tx)
        .await?;

        let mut line_items = Vec::with_capacity(order.line_items.len());
        for item in &order.line_items {
            let id = sqlx::query_scalar::<_, i64>(
                "INSERT INTO order_line_items (order_id, product_id, price, qty, color, material)
                 VALUES ($1, $2, $3, $4, $5, $6)
                 RETURNING id",
            )
            .bind(order_id)
            .bind(item.product.id)
            .bind(item.price)
            .bind(item.qty)
            .bind(item.color.as_deref())
            .bind(item.material.as_deref())
            .fetch_one(&mut *self.tx)
            .await?;

            line_items.push(OrderLineItem {
                id,
                order_id,
                product: item.product.clone(),
                price: item.price,
                qty: item.qty,
                color: item.color.clone(),
                material: item.material.clone(),
            });
        }

        tracing::debug!(
            order_id = order_id,
            line_item_count = line_items.len(),
            "Inserted order with line items"
        );

        Ok(Order {
            id: order_id,
            order_date: order.order_date,
            status: order.status,
            user: order.user.clone(),
            line_items,
        })
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.rollback().await?;
        Ok(())
    }
}

#[async_trait]
impl RecordSink<NewProduct> for PgStore {
    async fn persist(&self, record: NewProduct) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO products (name, price) VALUES ($1, $2) RETURNING id",
        )
        .bind(&record.name)
        .bind(record.price)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(product_id = id, name = %record.name, "Persisted imported product");
        Ok(())
    }
}
