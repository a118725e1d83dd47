use actix_web::{web, Responder};
use actix_web_lab::sse;
use futures_util::StreamExt;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;

use super::AppState;

const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

/// Server-sent events of every status relayed to the client destination.
/// Lagging subscribers skip the events they missed.
pub async fn order_status_stream(state: web::Data<AppState>) -> impl Responder {
    let rx = state.channel.subscribe(&state.status_destination).await;

    let events = BroadcastStream::new(rx).filter_map(|msg| async move {
        let event = msg.ok()?;
        let data = serde_json::to_string(&event).ok()?;
        Some(Ok::<_, Infallible>(sse::Event::Data(
            sse::Data::new(data).event("order-status"),
        )))
    });

    sse::Sse::from_stream(events).with_keep_alive(KEEP_ALIVE_INTERVAL)
}
