use sqlx::PgPool;

use super::StoreError;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        username VARCHAR(255) NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS products (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        price NUMERIC(19, 2) NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS orders (
        id BIGSERIAL PRIMARY KEY,
        order_date TIMESTAMPTZ NOT NULL,
        status VARCHAR(32) NOT NULL,
        user_id BIGINT NOT NULL REFERENCES users (id)
    )",
    "CREATE TABLE IF NOT EXISTS order_line_items (
        id BIGSERIAL PRIMARY KEY,
        order_id BIGINT NOT NULL REFERENCES orders (id),
        product_id BIGINT NOT NULL REFERENCES products (id),
        price NUMERIC(19, 2) NOT NULL,
        qty INTEGER NOT NULL,
        color VARCHAR(255),
        material VARCHAR(255)
    )",
    "CREATE INDEX IF NOT EXISTS idx_orders_user_id ON orders (user_id)",
    "CREATE INDEX IF NOT EXISTS idx_order_line_items_order_id ON order_line_items (order_id)",
];

/// Create the tables if they do not exist yet
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::info!(tables = 4, "Database schema ready");
    Ok(())
}
