// ============================================================================
// HTTP API
// ============================================================================
//
//   GET    /cart/{username}         cart contents
//   POST   /cart/{username}/items   add a line item
//   DELETE /cart/{username}         clear the cart
//   POST   /orders/{username}       create an order from the cart
//   GET    /orders/{username}       list orders
//   GET    <status destination>     server-sent events of relayed statuses
//   GET    /metrics, /health
//
// ============================================================================

mod cart;
mod orders;
mod stream;

use actix_web::{http::StatusCode, web, App, HttpResponse, HttpServer, ResponseError};
use std::sync::Arc;

use crate::config::HttpConfig;
use crate::domain::cart::{CartError, CartService};
use crate::domain::order::{OrderError, OrderService};
use crate::messaging::ClientChannel;
use crate::metrics::{health_handler, metrics_handler, Metrics};

pub struct AppState {
    pub orders: Arc<OrderService>,
    pub cart: Arc<dyn CartService>,
    pub channel: Arc<ClientChannel>,
    pub status_destination: String,
}

pub fn configure(cfg: &mut web::ServiceConfig, status_destination: &str) {
    cfg.route("/cart/{username}", web::get().to(cart::get_cart))
        .route("/cart/{username}", web::delete().to(cart::clear_cart))
        .route("/cart/{username}/items", web::post().to(cart::add_item))
        .route("/orders/{username}", web::post().to(orders::create_order))
        .route("/orders/{username}", web::get().to(orders::list_orders))
        .route(status_destination, web::get().to(stream::order_status_stream))
        .route("/metrics", web::get().to(metrics_handler))
        .route("/health", web::get().to(health_handler));
}

pub async fn start_http_server(
    config: &HttpConfig,
    state: web::Data<AppState>,
    metrics: Arc<Metrics>,
) -> std::io::Result<()> {
    tracing::info!("🌐 Starting HTTP server on http://{}:{}", config.host, config.port);

    let metrics = web::Data::new(metrics);

    HttpServer::new(move || {
        let destination = state.status_destination.clone();
        App::new()
            .app_data(state.clone())
            .app_data(metrics.clone())
            .configure(|cfg| configure(cfg, &destination))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

fn error_body(status: StatusCode, message: String) -> HttpResponse {
    HttpResponse::build(status).json(serde_json::json!({ "error": message }))
}

impl ResponseError for OrderError {
    fn status_code(&self) -> StatusCode {
        match self {
            OrderError::UserNotFound(_) | OrderError::ProductNotFound(_) => StatusCode::NOT_FOUND,
            OrderError::EmptyItems | OrderError::InvalidQuantity(_) => StatusCode::BAD_REQUEST,
            OrderError::Store(_) | OrderError::Publish(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        error_body(self.status_code(), self.to_string())
    }
}

impl ResponseError for CartError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        error_body(self.status_code(), self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;
    use rust_decimal::Decimal;

    use crate::domain::cart::CartLineItem;
    use crate::domain::order::service::tests::{fixture, Fixture};
    use crate::domain::order::OrderDto;

    const DESTINATION: &str = "/order_out/order";

    fn state(f: Fixture) -> (web::Data<AppState>, crate::db::memory::InMemoryStore) {
        let Fixture { service, store, cart, .. } = f;
        let state = web::Data::new(AppState {
            orders: Arc::new(service),
            cart,
            channel: Arc::new(ClientChannel::new()),
            status_destination: DESTINATION.to_string(),
        });
        (state, store)
    }

    #[actix_web::test]
    async fn test_cart_to_order_round_trip() {
        let f = fixture();
        f.store.add_user("alice").await;
        let lamp = f.store.add_product("lamp", Decimal::new(4_000, 2)).await;
        let (state, _store) = state(f);

        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .configure(|cfg| configure(cfg, DESTINATION)),
        )
        .await;

        let add = test::TestRequest::post()
            .uri("/cart/alice/items")
            .set_json(CartLineItem { product_id: lamp.id, qty: 2, color: None, material: None })
            .to_request();
        assert_eq!(test::call_service(&app, add).await.status(), StatusCode::NO_CONTENT);

        let create = test::TestRequest::post().uri("/orders/alice").to_request();
        let resp = test::call_service(&app, create).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        let order_id = body["orderId"].as_i64().unwrap();

        let list = test::TestRequest::get().uri("/orders/alice").to_request();
        let orders: Vec<OrderDto> = test::call_and_read_body_json(&app, list).await;
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].id, order_id);
        assert_eq!(orders[0].line_items[0].product_name, "lamp");

        let cart = test::TestRequest::get().uri("/cart/alice").to_request();
        let items: Vec<CartLineItem> = test::call_and_read_body_json(&app, cart).await;
        assert!(items.is_empty());
    }

    #[actix_web::test]
    async fn test_empty_cart_returns_no_content() {
        let f = fixture();
        f.store.add_user("alice").await;
        let (state, store) = state(f);

        let app = test::init_service(
            App::new()
                .app_data(state)
                .configure(|cfg| configure(cfg, DESTINATION)),
        )
        .await;

        let req = test::TestRequest::post().uri("/orders/alice").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);
        assert!(store.orders().await.is_empty());
    }

    #[actix_web::test]
    async fn test_unknown_user_is_not_found() {
        let f = fixture();
        let lamp = f.store.add_product("lamp", Decimal::new(4_000, 2)).await;
        f.cart
            .add_item("ghost", CartLineItem { product_id: lamp.id, qty: 1, color: None, material: None })
            .await
            .unwrap();
        let (state, _store) = state(f);

        let app = test::init_service(
            App::new()
                .app_data(state)
                .configure(|cfg| configure(cfg, DESTINATION)),
        )
        .await;

        let req = test::TestRequest::post().uri("/orders/ghost").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_invalid_quantity_is_bad_request() {
        let (state, _store) = state(fixture());

        let app = test::init_service(
            App::new()
                .app_data(state)
                .configure(|cfg| configure(cfg, DESTINATION)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/cart/alice/items")
            .set_json(serde_json::json!({"productId": 1, "qty": -1}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_status_stream_relays_events() {
        use actix_web::body::MessageBody;
        use std::pin::Pin;
        use std::time::Duration;

        use crate::domain::order::OrderStatusEvent;
        use crate::messaging::ClientNotifier;

        let (state, _store) = state(fixture());
        let channel = state.channel.clone();

        let app = test::init_service(
            App::new()
                .app_data(state)
                .configure(|cfg| configure(cfg, DESTINATION)),
        )
        .await;

        let req = test::TestRequest::get().uri(DESTINATION).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("content-type").and_then(|v| v.to_str().ok()),
            Some("text/event-stream")
        );

        let event = OrderStatusEvent { order_id: 7, status: "PROCESSED".to_string() };
        channel.send_to(DESTINATION, &event).await.unwrap();

        let mut body = resp.into_body();
        let mut received = String::new();
        tokio::time::timeout(Duration::from_secs(5), async {
            while !received.contains("\n\n") {
                let chunk = futures_util::future::poll_fn(|cx| Pin::new(&mut body).poll_next(cx))
                    .await
                    .expect("stream ended")
                    .unwrap();
                received.push_str(&String::from_utf8_lossy(&chunk));
            }
        })
        .await
        .unwrap();

        assert!(received.contains("event: order-status"), "got {:?}", received);
        assert!(received.contains(r#"data: {"orderId":7,"status":"PROCESSED"}"#), "got {:?}", received);
    }
}
