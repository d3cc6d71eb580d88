use serde::{Deserialize, Serialize};

/// Replication status of one node, served on `/internal/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ReplicationStatus {
    pub node_id: String,
    pub peer_addrs: Vec<String>,
    pub registry_initialized: bool,
    /// Peers with a usable handle; empty until the registry is initialized.
    pub active_peers: Vec<PeerStatus>,
    pub replication_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PeerStatus {
    pub addr: String,
    /// Unix seconds of the last acknowledged replication, 0 if none yet.
    pub last_success: u64,
}
