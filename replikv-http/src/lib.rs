pub mod client;
pub mod handlers;
pub mod openapi;
pub mod server;

pub use client::KvClient;
pub use handlers::NodeContext;
pub use server::{init_tracing, router, serve, serve_on};
