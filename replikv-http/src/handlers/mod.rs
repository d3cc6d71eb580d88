use replikv::Store;
use replikv_replication::{NodeConfig, PeerRegistry, ReplicationCoordinator};
use std::sync::Arc;

pub mod health;
pub mod internal;
pub mod kv;

/// Everything one node owns. Passed to every handler as axum state, so
/// several nodes can run side by side in one process.
pub struct NodeContext {
    pub config: NodeConfig,
    pub store: Arc<Store>,
    pub registry: Arc<PeerRegistry>,
    pub coordinator: ReplicationCoordinator,
}

impl NodeContext {
    pub fn new(config: NodeConfig) -> Arc<Self> {
        let store = Arc::new(Store::new());
        let registry = Arc::new(PeerRegistry::new(config.peers.clone()));
        let coordinator = ReplicationCoordinator::new(
            Arc::clone(&store),
            Arc::clone(&registry),
            config.replication_timeout(),
        );

        Arc::new(Self {
            config,
            store,
            registry,
            coordinator,
        })
    }
}

pub use health::health;
pub use internal::{replicate, replication_status};
pub use kv::{get, list, put};
