//! Event Stream API Module
//!
//! SSE bridge onto the topic notifier. A subscriber gets events from the
//! moment it connects; anything earlier must come from a state read. A
//! lagging consumer loses the skipped events and should resubscribe after
//! re-reading.

use std::convert::Infallible;

use axum::{
    Router,
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
};
use tokio_stream::{StreamExt, wrappers::BroadcastStream};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tracing::warn;

use shared::{StreamEvent, Topic};

use crate::core::ServerState;
use crate::utils::error::AppError;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/events/{topic}", get(subscribe))
}

/// GET /api/events/:topic - SSE 订阅
///
/// `topic` is the wire form: `order:{id}`, `table:{id}` or `kitchen:all`.
pub async fn subscribe(
    State(state): State<ServerState>,
    Path(topic): Path<String>,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>>, AppError> {
    let topic: Topic = topic
        .parse()
        .map_err(|e: shared::TopicParseError| AppError::validation(e.to_string()))?;

    let receiver = state.notifier.subscribe(&topic);
    let stream = BroadcastStream::new(receiver).filter_map(|item| match item {
        Ok(event) => to_sse_event(&event).map(Ok),
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            warn!(skipped, "SSE subscriber lagged, events dropped");
            None
        }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

fn to_sse_event(event: &StreamEvent) -> Option<Event> {
    serde_json::to_string(event)
        .map(|data| {
            Event::default()
                .event(event.payload.kind())
                .id(event.event_id.clone())
                .data(data)
        })
        .ok()
}
