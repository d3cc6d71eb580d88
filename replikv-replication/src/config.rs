use replikv::{KvError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BIND_HOST: &str = "127.0.0.1";
/// Host every port-derived peer address points at, whatever the bind host.
pub const PEER_HOST: &str = "127.0.0.1";
pub const DEFAULT_REPLICATION_TIMEOUT_MS: u64 = 2000;

fn default_replication_timeout_ms() -> u64 {
    DEFAULT_REPLICATION_TIMEOUT_MS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    pub node_id: String,
    pub bind_addr: String,
    /// Peer addresses ("host:port"), in the order replication failures are reported.
    pub peers: Vec<String>,
    /// Per-peer bound on a single replication call.
    #[serde(default = "default_replication_timeout_ms")]
    pub replication_timeout_ms: u64,
}

impl NodeConfig {
    /// Build a config, dropping blank, duplicate and self-referencing peer addresses.
    pub fn new(node_id: impl Into<String>, bind_addr: impl Into<String>, peers: Vec<String>) -> Self {
        let mut config = NodeConfig {
            node_id: node_id.into(),
            bind_addr: bind_addr.into(),
            peers,
            replication_timeout_ms: DEFAULT_REPLICATION_TIMEOUT_MS,
        };
        config.normalize_peers();
        config
    }

    /// Node listening on `host:port` with peers at `127.0.0.1:<each port in peer_ports_csv>`.
    /// A peer port equal to `port` is this node and is skipped.
    pub fn from_ports(host: &str, port: u16, peer_ports_csv: &str) -> Result<Self> {
        let self_addr = peer_addr(PEER_HOST, port);
        let peers = parse_peer_ports(PEER_HOST, peer_ports_csv)?
            .into_iter()
            .filter(|addr| *addr != self_addr)
            .collect();
        let bind_addr = peer_addr(host, port);
        Ok(Self::new(default_node_id(port), bind_addr, peers))
    }

    /// Load a full config from a JSON file. Unlike the positional form, a
    /// broken file is an error rather than a silent fallback.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            KvError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let mut config: NodeConfig = serde_json::from_str(&content).map_err(|e| {
            KvError::Config(format!("failed to parse {}: {}", path.display(), e))
        })?;
        config.normalize_peers();

        tracing::info!(
            "Loaded node config: node_id={}, bind_addr={}, peers={}",
            config.node_id,
            config.bind_addr,
            config.peers.len()
        );
        Ok(config)
    }

    pub fn with_replication_timeout(mut self, timeout: Duration) -> Self {
        self.replication_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn replication_timeout(&self) -> Duration {
        Duration::from_millis(self.replication_timeout_ms)
    }

    fn normalize_peers(&mut self) {
        let mut kept: Vec<String> = Vec::with_capacity(self.peers.len());
        for addr in self.peers.drain(..) {
            let addr = addr.trim().to_string();
            if addr.is_empty() || addr == self.bind_addr || kept.contains(&addr) {
                continue;
            }
            kept.push(addr);
        }
        self.peers = kept;
    }
}

pub fn peer_addr(host: &str, port: u16) -> String {
    format!("{}:{}", host, port)
}

/// Parse a comma separated list of ports ("5002, 5003,") into peer addresses.
pub fn parse_peer_ports(host: &str, csv: &str) -> Result<Vec<String>> {
    csv.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            p.parse::<u16>()
                .map(|port| peer_addr(host, port))
                .map_err(|_| KvError::Config(format!("invalid peer port: {:?}", p)))
        })
        .collect()
}

/// `REPLIKV_NODE_ID`, else `<hostname>-<port>`.
pub fn default_node_id(port: u16) -> String {
    std::env::var("REPLIKV_NODE_ID").unwrap_or_else(|_| {
        let host = hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_else(|| "unknown".to_string());
        format!("{}-{}", host, port)
    })
}
