use replikv::{Ack, Entry, GetRequest, GetResponse, KvError, Result};
use std::time::Duration;

/// Per-operation deadlines for client calls. These bound only the client's
/// own request; they never shorten the server's replication timeout.
#[derive(Debug, Clone, Copy)]
pub struct ClientTimeouts {
    pub put: Duration,
    pub get: Duration,
    pub list: Duration,
}

impl Default for ClientTimeouts {
    fn default() -> Self {
        Self {
            put: Duration::from_secs(3),
            get: Duration::from_secs(2),
            list: Duration::from_secs(5),
        }
    }
}

/// Typed client for a node's client-facing endpoints.
#[derive(Debug, Clone)]
pub struct KvClient {
    addr: String,
    base_url: String,
    http_client: reqwest::Client,
    timeouts: ClientTimeouts,
}

impl KvClient {
    /// Client for the node at `addr` ("host:port"). Does not connect.
    pub fn new(addr: &str) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| KvError::Transport {
                addr: addr.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            addr: addr.to_string(),
            base_url: format!("http://{}", addr),
            http_client,
            timeouts: ClientTimeouts::default(),
        })
    }

    pub fn with_timeouts(mut self, timeouts: ClientTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    pub async fn put(&self, key: &str, value: &str) -> Result<Ack> {
        let response = self
            .http_client
            .post(format!("{}/v1/put", self.base_url))
            .timeout(self.timeouts.put)
            .json(&Entry::new(key, value))
            .send()
            .await
            .map_err(|e| self.request_error(e, self.timeouts.put))?;

        self.check_status(&response)?;
        response
            .json()
            .await
            .map_err(|e| self.request_error(e, self.timeouts.put))
    }

    /// Value for `key`; `""` if the node has never seen it.
    pub async fn get(&self, key: &str) -> Result<String> {
        let response = self
            .http_client
            .post(format!("{}/v1/get", self.base_url))
            .timeout(self.timeouts.get)
            .json(&GetRequest {
                key: key.to_string(),
            })
            .send()
            .await
            .map_err(|e| self.request_error(e, self.timeouts.get))?;

        self.check_status(&response)?;
        let resp: GetResponse = response
            .json()
            .await
            .map_err(|e| self.request_error(e, self.timeouts.get))?;
        Ok(resp.value)
    }

    /// Read the List stream, handing each entry to `on_entry` as soon as its
    /// line arrives. Returns the number of entries seen. On error, entries
    /// already handed over stay delivered.
    pub async fn list_each<F>(&self, mut on_entry: F) -> Result<usize>
    where
        F: FnMut(Entry),
    {
        let mut response = self
            .http_client
            .get(format!("{}/v1/list", self.base_url))
            .timeout(self.timeouts.list)
            .send()
            .await
            .map_err(|e| self.request_error(e, self.timeouts.list))?;

        self.check_status(&response)?;

        let mut buf: Vec<u8> = Vec::new();
        let mut count = 0;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| self.request_error(e, self.timeouts.list))?
        {
            buf.extend_from_slice(&chunk);
            while let Some(pos) = buf.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = buf.drain(..=pos).collect();
                if let Some(entry) = parse_line(&line[..line.len() - 1])? {
                    on_entry(entry);
                    count += 1;
                }
            }
        }
        if let Some(entry) = parse_line(&buf)? {
            on_entry(entry);
            count += 1;
        }
        Ok(count)
    }

    pub async fn list(&self) -> Result<Vec<Entry>> {
        let mut entries = Vec::new();
        self.list_each(|entry| entries.push(entry)).await?;
        Ok(entries)
    }

    fn check_status(&self, response: &reqwest::Response) -> Result<()> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(KvError::Transport {
                addr: self.addr.clone(),
                reason: format!("server returned {}", response.status()),
            })
        }
    }

    fn request_error(&self, e: reqwest::Error, timeout: Duration) -> KvError {
        if e.is_timeout() {
            KvError::Timeout {
                addr: self.addr.clone(),
                timeout_ms: timeout.as_millis() as u64,
            }
        } else {
            KvError::Transport {
                addr: self.addr.clone(),
                reason: e.to_string(),
            }
        }
    }
}

fn parse_line(line: &[u8]) -> Result<Option<Entry>> {
    if line.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    Ok(Some(serde_json::from_slice(line)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_default_timeouts() {
        let t = ClientTimeouts::default();
        assert_eq!(t.put, Duration::from_secs(3));
        assert_eq!(t.get, Duration::from_secs(2));
        assert_eq!(t.list, Duration::from_secs(5));
    }

    #[test]
    fn test_parse_line_skips_blank() {
        assert_eq!(parse_line(b"").unwrap(), None);
        assert_eq!(parse_line(b"  \r").unwrap(), None);
        assert_eq!(
            parse_line(br#"{"key":"a","value":"1"}"#).unwrap(),
            Some(Entry::new("a", "1"))
        );
        assert!(matches!(parse_line(b"{oops"), Err(KvError::Json(_))));
    }

    #[tokio::test]
    async fn test_list_parses_ndjson_without_trailing_newline() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/list"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "{\"key\":\"a\",\"value\":\"1\"}\n{\"key\":\"b\",\"value\":\"2\"}",
            ))
            .mount(&server)
            .await;

        let client = KvClient::new(&server.address().to_string()).unwrap();
        let entries = client.list().await.unwrap();

        assert_eq!(entries, vec![Entry::new("a", "1"), Entry::new("b", "2")]);
    }

    #[tokio::test]
    async fn test_list_each_keeps_entries_delivered_before_bad_line() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/list"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("{\"key\":\"a\",\"value\":\"1\"}\n{garbage\n"),
            )
            .mount(&server)
            .await;

        let client = KvClient::new(&server.address().to_string()).unwrap();
        let mut seen = Vec::new();
        let result = client.list_each(|entry| seen.push(entry)).await;

        assert_eq!(seen, vec![Entry::new("a", "1")]);
        assert!(matches!(result, Err(KvError::Json(_))));
    }

    #[tokio::test]
    async fn test_get_times_out_with_client_deadline() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/get"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"value": "late"}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = KvClient::new(&server.address().to_string())
            .unwrap()
            .with_timeouts(ClientTimeouts {
                get: Duration::from_millis(100),
                ..ClientTimeouts::default()
            });

        let err = client.get("k").await.unwrap_err();
        assert!(matches!(err, KvError::Timeout { timeout_ms: 100, .. }));
    }

    #[tokio::test]
    async fn test_server_error_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = KvClient::new(&server.address().to_string()).unwrap();
        let err = client.put("k", "v").await.unwrap_err();
        assert!(matches!(err, KvError::Transport { ref reason, .. } if reason.contains("503")));
    }
}
