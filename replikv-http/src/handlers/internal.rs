use axum::{extract::State, Json};
use replikv::{Ack, Entry, MSG_APPLIED};
use replikv_replication::types::{PeerStatus, ReplicationStatus};
use std::sync::Arc;

use super::NodeContext;

/// POST /internal/replicate
/// Apply a write forwarded by a peer. Never re-broadcast.
#[utoipa::path(
    post,
    path = "/internal/replicate",
    tag = "internal",
    request_body = Entry,
    responses(
        (status = 200, description = "Write applied", body = Ack)
    )
)]
pub async fn replicate(State(ctx): State<Arc<NodeContext>>, Json(entry): Json<Entry>) -> Json<Ack> {
    match ctx.coordinator.apply_replicated(&entry) {
        Ok(()) => Json(Ack::ok(MSG_APPLIED)),
        Err(e) => {
            tracing::warn!("[REPL] refused replicated write: {}", e);
            Json(Ack::not_ok(e.to_string()))
        }
    }
}

/// GET /internal/status
/// Replication status for monitoring. Does not build peer handles.
#[utoipa::path(
    get,
    path = "/internal/status",
    tag = "internal",
    responses(
        (status = 200, description = "Replication status", body = ReplicationStatus)
    )
)]
pub async fn replication_status(State(ctx): State<Arc<NodeContext>>) -> Json<ReplicationStatus> {
    let active_peers = ctx
        .registry
        .active()
        .map(|clients| {
            clients
                .values()
                .map(|peer| PeerStatus {
                    addr: peer.addr().to_string(),
                    last_success: peer.last_success_timestamp(),
                })
                .collect()
        })
        .unwrap_or_default();

    Json(ReplicationStatus {
        node_id: ctx.config.node_id.clone(),
        peer_addrs: ctx.registry.addrs().to_vec(),
        registry_initialized: ctx.registry.is_initialized(),
        active_peers,
        replication_timeout_ms: ctx.coordinator.timeout().as_millis() as u64,
    })
}
