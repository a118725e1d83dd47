use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::models::{NewOrder, NewProduct, Order, OrderLineItem, Product, User};
use super::{OrderStore, OrderTransaction, RecordSink, StoreError};

// In-memory store for tests. Writes made through a transaction stay
// invisible until commit; ids come from sequences, so a rollback leaves gaps
// the way database sequences do.

#[derive(Default)]
struct MemoryState {
    users: Vec<User>,
    products: Vec<Product>,
    orders: Vec<Order>,
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<MemoryState>>,
    user_seq: Arc<AtomicI64>,
    product_seq: Arc<AtomicI64>,
    order_seq: Arc<AtomicI64>,
    line_item_seq: Arc<AtomicI64>,
}

fn next(seq: &AtomicI64) -> i64 {
    seq.fetch_add(1, Ordering::SeqCst) + 1
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_user(&self, username: &str) -> User {
        let user = User { id: next(&self.user_seq), username: username.to_string() };
        self.state.lock().await.users.push(user.clone());
        user
    }

    pub async fn add_product(&self, name: &str, price: Decimal) -> Product {
        let product = Product { id: next(&self.product_seq), name: name.to_string(), price };
        self.state.lock().await.products.push(product.clone());
        product
    }

    pub async fn set_product_price(&self, id: i64, price: Decimal) {
        let mut state = self.state.lock().await;
        if let Some(product) = state.products.iter_mut().find(|p| p.id == id) {
            product.price = price;
        }
    }

    pub async fn products(&self) -> Vec<Product> {
        self.state.lock().await.products.clone()
    }

    pub async fn orders(&self) -> Vec<Order> {
        self.state.lock().await.orders.clone()
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn OrderTransaction>, StoreError> {
        Ok(Box::new(MemoryTransaction {
            store: self.clone(),
            pending: Vec::new(),
        }))
    }

    async fn find_orders_by_username(&self, username: &str) -> Result<Vec<Order>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .orders
            .iter()
            .filter(|o| o.user.username == username)
            .cloned()
            .collect())
    }
}

pub struct MemoryTransaction {
    store: InMemoryStore,
    pending: Vec<Order>,
}

#[async_trait]
impl OrderTransaction for MemoryTransaction {
    async fn find_user_by_username(&mut self, username: &str) -> Result<Option<User>, StoreError> {
        let state = self.store.state.lock().await;
        Ok(state.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_product_by_id(&mut self, id: i64) -> Result<Option<Product>, StoreError> {
        let state = self.store.state.lock().await;
        Ok(state.products.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_order(&mut self, order: &NewOrder) -> Result<Order, StoreError> {
        let order_id = next(&self.store.order_seq);
        let line_items = order
            .line_items
            .iter()
            .map(|item| OrderLineItem {
                id: next(&self.store.line_item_seq),
                order_id,
                product: item.product.clone(),
                price: item.price,
                qty: item.qty,
                color: item.color.clone(),
                material: item.material.clone(),
            })
            .collect();

        let persisted = Order {
            id: order_id,
            order_date: order.order_date,
            status: order.status,
            user: order.user.clone(),
            line_items,
        };
        self.pending.push(persisted.clone());
        Ok(persisted)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let MemoryTransaction { store, pending } = *self;
        store.state.lock().await.orders.extend(pending);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl RecordSink<NewProduct> for InMemoryStore {
    async fn persist(&self, record: NewProduct) -> Result<(), StoreError> {
        self.add_product(&record.name, record.price).await;
        Ok(())
    }
}
