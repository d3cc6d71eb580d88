//! End-to-end tests: real nodes on loopback ports talking over HTTP.

use replikv::Entry;
use replikv_http::KvClient;
use std::time::Duration;

mod common;

// ---------------------------------------------------------------------------
// Single node
// ---------------------------------------------------------------------------

#[tokio::test]
async fn standalone_put_then_get() {
    let (addr, _ctx) = common::spawn_standalone().await;
    let client = KvClient::new(&addr).unwrap();

    let ack = client.put("foo", "bar").await.unwrap();
    assert!(ack.ok, "unexpected ack: {:?}", ack);
    assert_eq!(ack.message, "Stored and replicated");

    assert_eq!(client.get("foo").await.unwrap(), "bar");
}

#[tokio::test]
async fn standalone_empty_key_rejected() {
    let (addr, ctx) = common::spawn_standalone().await;
    let client = KvClient::new(&addr).unwrap();
    client.put("a", "1").await.unwrap();

    let ack = client.put("", "whatever").await.unwrap();

    assert!(!ack.ok);
    assert_eq!(ack.message, "empty key");
    assert_eq!(ctx.store.len(), 1);
}

#[tokio::test]
async fn standalone_get_unknown_key_is_empty() {
    let (addr, _ctx) = common::spawn_standalone().await;
    let client = KvClient::new(&addr).unwrap();
    assert_eq!(client.get("never").await.unwrap(), "");
}

#[tokio::test]
async fn list_returns_last_value_per_key() {
    let (addr, _ctx) = common::spawn_standalone().await;
    let client = KvClient::new(&addr).unwrap();

    for i in 0..20 {
        client.put(&format!("k{}", i), "old").await.unwrap();
    }
    for i in 0..20 {
        client.put(&format!("k{}", i), &format!("v{}", i)).await.unwrap();
    }

    let mut entries = client.list().await.unwrap();
    entries.sort_by_key(|e| e.key[1..].parse::<u32>().unwrap());

    assert_eq!(entries.len(), 20);
    for (i, entry) in entries.iter().enumerate() {
        assert_eq!(entry, &Entry::new(format!("k{}", i), format!("v{}", i)));
    }
}

#[tokio::test]
async fn concurrent_puts_to_distinct_keys() {
    let (addr, _ctx) = common::spawn_standalone().await;
    let client = KvClient::new(&addr).unwrap();

    let (a, b) = tokio::join!(client.put("a", "1"), client.put("b", "2"));
    assert!(a.unwrap().ok);
    assert!(b.unwrap().ok);

    assert_eq!(client.get("a").await.unwrap(), "1");
    assert_eq!(client.get("b").await.unwrap(), "2");
}

// ---------------------------------------------------------------------------
// Replication
// ---------------------------------------------------------------------------

#[tokio::test]
async fn two_nodes_replicate_each_other() {
    let a = common::reserve().await;
    let b = common::reserve().await;
    let (addr_a, addr_b) = (a.addr.clone(), b.addr.clone());
    let _ctx_a = common::start(a, vec![addr_b.clone()]);
    let _ctx_b = common::start(b, vec![addr_a.clone()]);

    let client_a = KvClient::new(&addr_a).unwrap();
    let client_b = KvClient::new(&addr_b).unwrap();

    let ack = client_a.put("foo", "bar").await.unwrap();
    assert!(ack.ok, "unexpected ack: {:?}", ack);
    assert_eq!(client_b.get("foo").await.unwrap(), "bar");

    // And the other direction.
    assert!(client_b.put("baz", "qux").await.unwrap().ok);
    assert_eq!(client_a.get("baz").await.unwrap(), "qux");
}

#[tokio::test]
async fn replicated_write_is_not_rebroadcast() {
    let a = common::reserve().await;
    let b = common::reserve().await;
    let (addr_a, addr_b) = (a.addr.clone(), b.addr.clone());
    let _ctx_a = common::start(a, vec![addr_b.clone()]);
    let ctx_b = common::start(b, vec![addr_a.clone()]);

    KvClient::new(&addr_a).unwrap().put("k", "v").await.unwrap();

    // B applied the write but never needed its own peer handles.
    assert_eq!(ctx_b.store.get("k"), "v");
    assert!(!ctx_b.registry.is_initialized());
}

#[tokio::test]
async fn three_nodes_all_receive_write() {
    let nodes = [common::reserve().await, common::reserve().await, common::reserve().await];
    let addrs: Vec<String> = nodes.iter().map(|n| n.addr.clone()).collect();
    let mut contexts = Vec::new();
    for node in nodes {
        let peers = addrs.iter().filter(|a| **a != node.addr).cloned().collect();
        contexts.push(common::start(node, peers));
    }

    let ack = KvClient::new(&addrs[0]).unwrap().put("x", "1").await.unwrap();

    assert!(ack.ok);
    for ctx in &contexts {
        assert_eq!(ctx.store.get("x"), "1");
    }
}

#[tokio::test]
async fn unreachable_peer_reported_and_local_write_kept() {
    let a = common::reserve().await;
    let b = common::reserve().await;
    let dead = common::refused_addr();
    let (addr_a, addr_b) = (a.addr.clone(), b.addr.clone());
    let _ctx_a = common::start(a, vec![addr_b.clone(), dead.clone()]);
    let ctx_b = common::start(b, vec![]);

    let client = KvClient::new(&addr_a).unwrap();
    let ack = client.put("foo", "bar").await.unwrap();

    assert!(!ack.ok);
    assert_eq!(
        ack.message,
        format!("stored locally; failed to replicate to: {}", dead)
    );
    assert_eq!(client.get("foo").await.unwrap(), "bar");
    assert_eq!(ctx_b.store.get("foo"), "bar");
}

#[tokio::test]
async fn slow_peer_bounded_by_replication_timeout() {
    let slow = wiremock::MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::method("POST"))
        .respond_with(
            wiremock::ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"ok": true, "message": "applied"}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&slow)
        .await;
    let slow_addr = slow.address().to_string();

    let a = common::reserve().await;
    let addr_a = a.addr.clone();
    let _ctx = common::start_with_timeout(a, vec![slow_addr.clone()], Duration::from_millis(300));

    let started = std::time::Instant::now();
    let ack = KvClient::new(&addr_a).unwrap().put("k", "v").await.unwrap();

    assert!(!ack.ok);
    assert!(ack.message.ends_with(&slow_addr));
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn status_reports_peers_after_first_put() {
    let a = common::reserve().await;
    let b = common::reserve().await;
    let (addr_a, addr_b) = (a.addr.clone(), b.addr.clone());
    let _ctx_a = common::start(a, vec![addr_b.clone()]);
    let _ctx_b = common::start(b, vec![]);

    let http = reqwest::Client::new();
    let status: serde_json::Value = http
        .get(format!("http://{}/internal/status", addr_a))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["registry_initialized"], false);

    KvClient::new(&addr_a).unwrap().put("k", "v").await.unwrap();

    let status: serde_json::Value = http
        .get(format!("http://{}/internal/status", addr_a))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["registry_initialized"], true);
    assert_eq!(status["active_peers"][0]["addr"], addr_b);
    assert!(status["active_peers"][0]["last_success"].as_u64().unwrap() > 0);
}
