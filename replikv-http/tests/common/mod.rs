use replikv_http::{serve_on, NodeContext};
use replikv_replication::NodeConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// A node bound to an ephemeral loopback port but not serving yet, so its
/// address can be handed to other nodes as a peer first.
pub struct PendingNode {
    pub listener: TcpListener,
    pub addr: String,
}

pub async fn reserve() -> PendingNode {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    PendingNode { listener, addr }
}

pub fn start(node: PendingNode, peers: Vec<String>) -> Arc<NodeContext> {
    start_with_timeout(node, peers, Duration::from_secs(2))
}

pub fn start_with_timeout(node: PendingNode, peers: Vec<String>, timeout: Duration) -> Arc<NodeContext> {
    let config = NodeConfig::new(format!("node-{}", node.addr), node.addr.clone(), peers)
        .with_replication_timeout(timeout);
    let ctx = NodeContext::new(config);
    let served = Arc::clone(&ctx);
    tokio::spawn(async move {
        serve_on(node.listener, served).await.unwrap();
    });
    ctx
}

#[allow(dead_code)]
pub async fn spawn_standalone() -> (String, Arc<NodeContext>) {
    let node = reserve().await;
    let addr = node.addr.clone();
    (addr, start(node, vec![]))
}

/// An address nothing listens on.
#[allow(dead_code)]
pub fn refused_addr() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);
    addr
}
