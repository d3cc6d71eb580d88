use replikv::{Ack, Entry, KvError, Result};
use reqwest::Url;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// HTTP handle for one peer's Replicate endpoint. Cheap to clone; the
/// underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct PeerClient {
    addr: String,
    replicate_url: Url,
    http_client: reqwest::Client,
    last_success: Arc<AtomicU64>, // Unix timestamp in seconds
}

impl PeerClient {
    /// Build a handle for `addr` ("host:port" or a full `http://` base URL).
    ///
    /// No connection is made here; this fails only if the address cannot be
    /// turned into a URL or the HTTP client cannot be built.
    pub fn new(addr: &str) -> Result<Self> {
        let base = if addr.contains("://") {
            addr.to_string()
        } else {
            format!("http://{}", addr)
        };
        let replicate_url = Url::parse(&base)
            .and_then(|u| u.join("/internal/replicate"))
            .map_err(|e| KvError::PeerUnavailable(format!("{} ({})", addr, e)))?;
        if replicate_url.host_str().is_none() {
            return Err(KvError::PeerUnavailable(format!("{} (no host)", addr)));
        }

        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| KvError::Transport {
                addr: addr.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            addr: addr.to_string(),
            replicate_url,
            http_client,
            last_success: Arc::new(AtomicU64::new(0)),
        })
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    pub fn last_success_timestamp(&self) -> u64 {
        self.last_success.load(Ordering::Relaxed)
    }

    /// Send one entry to this peer's Replicate endpoint.
    ///
    /// No deadline is applied here; the caller bounds the call.
    pub async fn replicate(&self, entry: &Entry) -> Result<Ack> {
        let response = self
            .http_client
            .post(self.replicate_url.clone())
            .json(entry)
            .send()
            .await
            .map_err(|e| self.transport_error(format!("failed to send request: {}", e)))?;

        if !response.status().is_success() {
            return Err(self.transport_error(format!("returned status {}", response.status())));
        }

        let ack: Ack = response
            .json()
            .await
            .map_err(|e| self.transport_error(format!("failed to parse response: {}", e)))?;

        if !ack.ok {
            return Err(KvError::Rejected {
                addr: self.addr.clone(),
                message: ack.message,
            });
        }

        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        self.last_success.store(now, Ordering::Relaxed);

        Ok(ack)
    }

    fn transport_error(&self, reason: String) -> KvError {
        KvError::Transport {
            addr: self.addr.clone(),
            reason,
        }
    }
}
