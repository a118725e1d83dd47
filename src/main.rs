use actix::prelude::*;
use actix_web::web;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod actors;
mod api;
mod config;
mod db;
mod domain;
mod import;
mod messaging;
mod metrics;
mod models;

use actors::{CoordinatorActor, Shutdown};
use config::AppConfig;
use db::PgStore;
use domain::cart::InMemoryCart;
use domain::order::{OrderRouting, OrderService, OrderStatusListener};
use import::{ImportPipeline, ProductLineMapper};
use messaging::{ClientChannel, RedpandaClient, RedpandaConsumer};

#[actix::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging with environment-based filtering
    // Default to INFO level, can be overridden with RUST_LOG env var
    // Example: RUST_LOG=debug cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,shop_backend=debug"))
        )
        .init();

    tracing::info!("🚀 Starting shop backend");

    let config = AppConfig::load()?;

    // === 1. Metrics ===
    let metrics = Arc::new(metrics::Metrics::new()?);

    // === 2. Database ===
    tracing::info!("Connecting to PostgreSQL...");
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    db::ensure_schema(&pool).await?;
    let store = Arc::new(PgStore::new(pool));

    // === 3. Broker ===
    let redpanda = Arc::new(RedpandaClient::new(&config.broker.brokers)?);
    let consumer = RedpandaConsumer::new(
        &config.broker.brokers,
        &config.broker.group_id,
        &config.broker.processed_order_queue,
    )?;

    // === 4. Order service and status relay ===
    let cart = Arc::new(InMemoryCart::new());
    let orders = Arc::new(OrderService::new(
        store.clone(),
        cart.clone(),
        redpanda,
        OrderRouting {
            exchange: config.broker.order_exchange.clone(),
            routing_key: config.broker.new_order_routing_key.clone(),
        },
        metrics.clone(),
    ));

    let channel = Arc::new(ClientChannel::new());
    let listener = Arc::new(OrderStatusListener::new(
        channel.clone(),
        config.broker.order_status_destination.clone(),
        metrics.clone(),
    ));

    // === 5. File import ===
    let import = config.import.enabled.then(|| {
        Arc::new(ImportPipeline::new(
            config.import.clone(),
            ProductLineMapper,
            store.clone(),
            metrics.clone(),
        ))
    });

    // === 6. Background actors ===
    let coordinator = CoordinatorActor::new(import, consumer, listener).start();

    // === 7. HTTP API (runs until SIGINT / SIGTERM) ===
    let state = web::Data::new(api::AppState {
        orders,
        cart,
        channel,
        status_destination: config.broker.order_status_destination.clone(),
    });
    api::start_http_server(&config.http, state, metrics).await?;

    coordinator.send(Shutdown).await?;
    tracing::info!("👋 Shop backend stopped");

    Ok(())
}
