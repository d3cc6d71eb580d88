use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KvError {
    #[error("empty key")]
    InvalidKey,

    #[error("peer {0} is not available")]
    PeerUnavailable(String),

    #[error("replication to {addr} timed out after {timeout_ms}ms")]
    Timeout { addr: String, timeout_ms: u64 },

    #[error("transport error talking to {addr}: {reason}")]
    Transport { addr: String, reason: String },

    #[error("peer {addr} rejected the write: {message}")]
    Rejected { addr: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("JSON error: {0}")]
    Json(String),
}

pub type Result<T> = std::result::Result<T, KvError>;

impl From<std::io::Error> for KvError {
    fn from(e: std::io::Error) -> Self {
        KvError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for KvError {
    fn from(e: serde_json::Error) -> Self {
        KvError::Json(e.to_string())
    }
}

impl KvError {
    /// Address of the peer this error concerns, if any.
    pub fn peer_addr(&self) -> Option<&str> {
        match self {
            KvError::PeerUnavailable(addr)
            | KvError::Timeout { addr, .. }
            | KvError::Transport { addr, .. }
            | KvError::Rejected { addr, .. } => Some(addr),
            _ => None,
        }
    }
}
