use axum::{
    routing::{get, post},
    Json, Router,
};
use replikv::KvError;
use replikv_replication::NodeConfig;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;

use crate::handlers::{get as get_value, health, list, put, replicate, replication_status, NodeContext};
use crate::openapi::ApiDoc;

/// Install the global tracing subscriber (`RUST_LOG`, default `info`).
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

pub fn router(ctx: Arc<NodeContext>) -> Router {
    let client_routes = Router::new()
        .route("/v1/put", post(put))
        .route("/v1/get", post(get_value))
        .route("/v1/list", get(list));

    // Peer-facing, never called by end clients
    let internal = Router::new()
        .route("/internal/replicate", post(replicate))
        .route("/internal/status", get(replication_status));

    Router::new()
        .route("/health", get(health))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .merge(client_routes)
        .merge(internal)
        .with_state(ctx)
        .layer(TraceLayer::new_for_http())
}

/// Bind `config.bind_addr` and serve until Ctrl-C. A bind failure is returned
/// to the caller and is fatal for the node.
pub async fn serve(config: NodeConfig) -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .map_err(|e| KvError::Io(format!("listen {}: {}", config.bind_addr, e)))?;

    tracing::info!(
        node_id = %config.node_id,
        peers = ?config.peers,
        replication_timeout_ms = config.replication_timeout_ms,
        "replikv node listening on {}",
        config.bind_addr
    );

    let ctx = NodeContext::new(config);
    axum::serve(listener, router(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("replikv node stopped");
    Ok(())
}

/// Serve an already bound listener. Used by tests to run several nodes in
/// one process.
pub async fn serve_on(listener: TcpListener, ctx: Arc<NodeContext>) -> std::io::Result<()> {
    axum::serve(listener, router(ctx)).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
