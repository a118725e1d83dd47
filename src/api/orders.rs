use actix_web::{web, HttpResponse};

use crate::domain::order::OrderError;
use super::AppState;

pub async fn create_order(
    state: web::Data<AppState>,
    username: web::Path<String>,
) -> Result<HttpResponse, OrderError> {
    match state.orders.create_order(&username).await? {
        Some(order_id) => Ok(HttpResponse::Created().json(serde_json::json!({ "orderId": order_id }))),
        None => Ok(HttpResponse::NoContent().finish()),
    }
}

pub async fn list_orders(
    state: web::Data<AppState>,
    username: web::Path<String>,
) -> Result<HttpResponse, OrderError> {
    let orders = state.orders.find_orders_by_username(&username).await?;
    Ok(HttpResponse::Ok().json(orders))
}
