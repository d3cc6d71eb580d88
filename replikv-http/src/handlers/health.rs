use axum::{extract::State, Json};
use std::sync::Arc;

use super::NodeContext;

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Node is serving", body = serde_json::Value)
    )
)]
pub async fn health(State(ctx): State<Arc<NodeContext>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "node": ctx.config.node_id,
        "peers": ctx.config.peers.len(),
        "keys": ctx.store.len(),
    }))
}
