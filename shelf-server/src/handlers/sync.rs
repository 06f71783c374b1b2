//! Server-Sent Events handler for real-time inventory updates

use crate::state::{AppState, ServerEvent};
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::Stream;
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// Event name and JSON payload for an inventory event
pub fn event_payload(event: &ServerEvent) -> (&'static str, serde_json::Value) {
    match event {
        ServerEvent::BookCreated { book, at } => (
            "book_created",
            serde_json::json!({ "book": book, "at": at }),
        ),
        ServerEvent::BookCheckedOut { id, quantity, at } => (
            "book_checked_out",
            serde_json::json!({ "id": id, "quantity": quantity, "at": at }),
        ),
        ServerEvent::BookReturned { id, quantity, at } => (
            "book_returned",
            serde_json::json!({ "id": id, "quantity": quantity, "at": at }),
        ),
    }
}

/// SSE endpoint for real-time updates
pub async fn sync_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.subscribe();
    let stream = BroadcastStream::new(rx);

    let event_stream = stream.filter_map(|result| match result {
        Ok(event) => {
            let (event_type, data) = event_payload(&event);
            Some(Ok(Event::default().event(event_type).data(data.to_string())))
        }
        Err(err) => {
            tracing::warn!("SSE subscriber lagged: {}", err);
            None
        }
    });

    Sse::new(event_stream).keep_alive(KeepAlive::default())
}
