use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "replikv",
        description = "Replicated in-memory key-value store"
    ),
    paths(
        crate::handlers::health::health,
        crate::handlers::kv::put,
        crate::handlers::kv::get,
        crate::handlers::kv::list,
        crate::handlers::internal::replicate,
        crate::handlers::internal::replication_status,
    ),
    components(schemas(
        replikv::Entry,
        replikv::Ack,
        replikv::GetRequest,
        replikv::GetResponse,
        replikv_replication::types::ReplicationStatus,
        replikv_replication::types::PeerStatus,
    )),
    tags(
        (name = "kv", description = "Client-facing reads and writes"),
        (name = "internal", description = "Peer-to-peer replication"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;
