use super::peer::PeerClient;
use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use std::sync::Arc;

pub type PeerClientMap = IndexMap<String, Arc<PeerClient>>;

/// Configured peer addresses plus the handles built from them.
///
/// Handles are built lazily on first use, exactly once. Concurrent first
/// callers block until that single build finishes and then all see the same
/// map. A peer whose handle could not be built stays out of the map for the
/// life of the process.
#[derive(Debug)]
pub struct PeerRegistry {
    addrs: Vec<String>,
    clients: OnceCell<PeerClientMap>,
}

impl PeerRegistry {
    pub fn new(addrs: Vec<String>) -> Self {
        Self {
            addrs,
            clients: OnceCell::new(),
        }
    }

    pub fn addrs(&self) -> &[String] {
        &self.addrs
    }

    pub fn is_initialized(&self) -> bool {
        self.clients.get().is_some()
    }

    /// The built map, without triggering a build.
    pub fn active(&self) -> Option<&PeerClientMap> {
        self.clients.get()
    }

    /// The build runs inline on whichever thread gets here first, usually a
    /// runtime worker, and holds every other caller until it returns. It must
    /// not do I/O: handles are constructed here, never dialed.
    pub fn ensure_initialized(&self) -> &PeerClientMap {
        self.clients.get_or_init(|| build_clients(&self.addrs))
    }

    /// Handles for one fan-out round, in configured order.
    pub fn snapshot(&self) -> Vec<Arc<PeerClient>> {
        self.ensure_initialized().values().cloned().collect()
    }
}

fn build_clients(addrs: &[String]) -> PeerClientMap {
    let mut clients = IndexMap::with_capacity(addrs.len());
    for addr in addrs {
        match PeerClient::new(addr) {
            Ok(client) => {
                tracing::info!("peer handle ready for {}", addr);
                clients.insert(addr.clone(), Arc::new(client));
            }
            Err(e) => {
                tracing::warn!("dropping peer {}: {}", addr, e);
            }
        }
    }
    tracing::info!(
        "peer registry initialized: {}/{} peers active",
        clients.len(),
        addrs.len()
    );
    clients
}
