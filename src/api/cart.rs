use actix_web::{web, HttpResponse};

use crate::domain::cart::{CartError, CartLineItem};
use super::AppState;

pub async fn get_cart(state: web::Data<AppState>, username: web::Path<String>) -> HttpResponse {
    HttpResponse::Ok().json(state.cart.line_items(&username).await)
}

pub async fn add_item(
    state: web::Data<AppState>,
    username: web::Path<String>,
    item: web::Json<CartLineItem>,
) -> Result<HttpResponse, CartError> {
    state.cart.add_item(&username, item.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn clear_cart(state: web::Data<AppState>, username: web::Path<String>) -> HttpResponse {
    state.cart.clear(&username).await;
    HttpResponse::NoContent().finish()
}
