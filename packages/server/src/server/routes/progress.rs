//! Analysis progress: polling snapshot and SSE stream.
//!
//! GET /progress/:session_id
//! GET /progress/:session_id/stream
//!
//! The stream starts with the current snapshot (when one exists) so late
//! subscribers see where the run is, then forwards every update.

use std::convert::Infallible;

use axum::{
    extract::{Extension, Path},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tokio_stream::{Stream, StreamExt};

use crate::kernel::ProgressSnapshot;
use crate::server::app::AppState;
use crate::server::error::ApiError;

pub async fn progress_handler(
    Extension(state): Extension<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ProgressSnapshot>, ApiError> {
    state
        .deps
        .progress
        .snapshot(&session_id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Sessão não encontrada"))
}

fn snapshot_event(snapshot: &ProgressSnapshot) -> Option<Event> {
    let name = if snapshot.completed { "complete" } else { "progress" };
    Event::default().event(name).json_data(snapshot).ok()
}

pub async fn progress_stream_handler(
    Extension(state): Extension<AppState>,
    Path(session_id): Path<String>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // Subscribe before reading the snapshot so no update falls in between.
    let rx = state.deps.progress.subscribe(&session_id).await;
    let current = state.deps.progress.snapshot(&session_id).await;

    let initial = tokio_stream::iter(
        current
            .as_ref()
            .and_then(snapshot_event)
            .map(Ok::<_, Infallible>),
    );

    let updates = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(snapshot) => snapshot_event(&snapshot).map(Ok),
        Err(BroadcastStreamRecvError::Lagged(n)) => Event::default()
            .event("lagged")
            .json_data(serde_json::json!({ "missed": n }))
            .ok()
            .map(Ok),
    });

    Sse::new(initial.chain(updates)).keep_alive(KeepAlive::default())
}
