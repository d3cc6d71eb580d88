use super::peer::PeerClient;
use super::registry::PeerRegistry;
use replikv::{Entry, KvError, Result, Store, MSG_STORED_AND_REPLICATED};
use std::sync::Arc;
use std::time::Duration;

/// Result of one peer's replication call.
#[derive(Debug, Clone)]
pub struct PeerOutcome {
    pub addr: String,
    pub result: std::result::Result<(), KvError>,
}

/// What happened to a committed Put across the peer set.
#[derive(Debug, Clone, Default)]
pub struct PutOutcome {
    /// Number of peers a replication call was issued to.
    pub attempted: usize,
    /// Peers that missed the write, in configured order.
    pub failures: Vec<KvError>,
}

impl PutOutcome {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failed_addrs(&self) -> Vec<&str> {
        self.failures.iter().filter_map(|e| e.peer_addr()).collect()
    }

    pub fn message(&self) -> String {
        if self.is_ok() {
            MSG_STORED_AND_REPLICATED.to_string()
        } else {
            format!(
                "stored locally; failed to replicate to: {}",
                self.failed_addrs().join(",")
            )
        }
    }
}

/// Applies writes locally and broadcasts them to every registered peer.
///
/// The local commit always happens first and is never rolled back. Peers are
/// best effort: each gets one call, bounded by `timeout`, with no retry.
pub struct ReplicationCoordinator {
    store: Arc<Store>,
    registry: Arc<PeerRegistry>,
    timeout: Duration,
}

impl ReplicationCoordinator {
    pub fn new(store: Arc<Store>, registry: Arc<PeerRegistry>, timeout: Duration) -> Self {
        Self {
            store,
            registry,
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Client-facing write: commit locally, then replicate to all peers and
    /// wait for every call to finish or time out.
    ///
    /// Returns `Err(KvError::InvalidKey)` for an empty key, before any
    /// mutation or network activity.
    pub async fn put(&self, key: &str, value: &str) -> Result<PutOutcome> {
        self.store.put(key, value)?;

        let peers = self.registry.snapshot();
        let entry = Entry::new(key, value);
        let outcomes = self.fan_out(entry, peers).await;

        let attempted = outcomes.len();
        let failures: Vec<KvError> = outcomes
            .into_iter()
            .filter_map(|outcome| outcome.result.err())
            .collect();

        if failures.is_empty() {
            tracing::debug!("[REPL {}] replicated to {} peers", key, attempted);
        } else {
            tracing::warn!(
                "[REPL {}] stored locally, {}/{} peers failed",
                key,
                failures.len(),
                attempted
            );
        }

        Ok(PutOutcome {
            attempted,
            failures,
        })
    }

    /// Peer-facing write: apply without re-broadcasting, so a replicated
    /// write never fans out again. Last applied wins.
    pub fn apply_replicated(&self, entry: &Entry) -> Result<()> {
        self.store.put(&entry.key, &entry.value)?;
        tracing::debug!("[REPL {}] applied replicated write", entry.key);
        Ok(())
    }

    /// One detached task per peer; outcomes are collected from the join
    /// handles in peer order. Dropping the returned future does not cancel
    /// the spawned calls.
    async fn fan_out(&self, entry: Entry, peers: Vec<Arc<PeerClient>>) -> Vec<PeerOutcome> {
        let entry = Arc::new(entry);
        let handles: Vec<_> = peers
            .into_iter()
            .map(|peer| {
                let addr = peer.addr().to_string();
                let entry = Arc::clone(&entry);
                let timeout = self.timeout;
                let handle = tokio::spawn(async move { replicate_one(peer, entry, timeout).await });
                (addr, handle)
            })
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for (addr, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!("[REPL {}] replication task for {} died: {}", entry.key, addr, e);
                    PeerOutcome {
                        result: Err(KvError::Transport {
                            addr: addr.clone(),
                            reason: format!("replication task failed: {}", e),
                        }),
                        addr,
                    }
                }
            };
            outcomes.push(outcome);
        }
        outcomes
    }
}

async fn replicate_one(peer: Arc<PeerClient>, entry: Arc<Entry>, timeout: Duration) -> PeerOutcome {
    let addr = peer.addr().to_string();
    let result = match tokio::time::timeout(timeout, peer.replicate(&entry)).await {
        Ok(Ok(_ack)) => {
            tracing::info!("[REPL {}] peer {} acked", entry.key, addr);
            Ok(())
        }
        Ok(Err(e)) => {
            tracing::warn!("[REPL {}] failed to replicate to peer {}: {}", entry.key, addr, e);
            Err(e)
        }
        Err(_) => {
            tracing::warn!(
                "[REPL {}] replication to peer {} timed out after {:?}",
                entry.key,
                addr,
                timeout
            );
            Err(KvError::Timeout {
                addr: addr.clone(),
                timeout_ms: timeout.as_millis() as u64,
            })
        }
    };
    PeerOutcome { addr, result }
}
