use axum::{
    body::Body,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use replikv::{Ack, Entry, GetRequest, GetResponse};
use std::sync::Arc;

use super::NodeContext;

pub const NDJSON: &str = "application/x-ndjson";

/// Store a value locally and replicate it to every peer before answering.
///
/// An empty key, or a peer that missed the write, yields `ok: false` with a
/// 200 status. The local write is kept either way.
#[utoipa::path(
    post,
    path = "/v1/put",
    tag = "kv",
    request_body = Entry,
    responses(
        (status = 200, description = "Write outcome", body = Ack)
    )
)]
pub async fn put(State(ctx): State<Arc<NodeContext>>, Json(entry): Json<Entry>) -> Json<Ack> {
    match ctx.coordinator.put(&entry.key, &entry.value).await {
        Ok(outcome) if outcome.is_ok() => Json(Ack::ok(outcome.message())),
        Ok(outcome) => Json(Ack::not_ok(outcome.message())),
        Err(e) => {
            tracing::debug!("rejected put: {}", e);
            Json(Ack::not_ok(e.to_string()))
        }
    }
}

#[utoipa::path(
    post,
    path = "/v1/get",
    tag = "kv",
    request_body = GetRequest,
    responses(
        (status = 200, description = "Current value, empty if the key is absent", body = GetResponse)
    )
)]
pub async fn get(
    State(ctx): State<Arc<NodeContext>>,
    Json(req): Json<GetRequest>,
) -> Json<GetResponse> {
    Json(GetResponse {
        value: ctx.store.get(&req.key),
    })
}

/// Stream every entry as newline-delimited JSON.
///
/// Entries come from a snapshot taken before the first byte is sent, so a
/// slow reader never holds up writers. If the connection breaks mid-stream
/// the lines already sent stand.
#[utoipa::path(
    get,
    path = "/v1/list",
    tag = "kv",
    responses(
        (status = 200, description = "One entry per line", content_type = "application/x-ndjson", body = Entry)
    )
)]
pub async fn list(State(ctx): State<Arc<NodeContext>>) -> Response {
    let entries = ctx.store.snapshot();
    tracing::debug!("streaming {} entries", entries.len());

    let lines = futures::stream::iter(entries.into_iter().map(|entry| {
        serde_json::to_vec(&entry).map(|mut line| {
            line.push(b'\n');
            line
        })
    }));

    ([(header::CONTENT_TYPE, NDJSON)], Body::from_stream(lines)).into_response()
}
