use std::convert::Infallible;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use futures::stream::Stream;
use serde::Deserialize;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::state::AppState;

pub const SSE_KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize, IntoParams)]
pub struct EventsQuery {
    /// Only deliver events for this run.
    pub run_id: Option<Uuid>,
}

#[utoipa::path(
    get,
    path = "/api/events",
    params(EventsQuery),
    responses((status = 200, description = "SSE stream of suite and run events")),
    tag = "events"
)]
pub async fn events_stream(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let run_filter = query.run_id;
    let receiver = state.event_bus.subscribe();

    let stream = BroadcastStream::new(receiver).filter_map(move |result| {
        // Lagged receivers drop events rather than closing the stream.
        let envelope = result.ok()?;

        if let Some(run_id) = run_filter {
            if envelope.event.run_id() != Some(run_id) {
                return None;
            }
        }

        let data = serde_json::to_string(&envelope).ok()?;
        Some(Ok(SseEvent::default().data(data)))
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(SSE_KEEP_ALIVE_INTERVAL))
}
