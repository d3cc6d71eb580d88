//! # replikv
//!
//! An in-memory key-value store whose writes are pushed to a fixed set of
//! peer nodes before the writer is acknowledged.
//!
//! This crate holds the pieces every node shares: the locally owned
//! [`Store`], the wire types ([`Entry`], [`Ack`], [`GetRequest`],
//! [`GetResponse`]) and the error taxonomy. Peer handling and fan-out live in
//! `replikv-replication`; the HTTP endpoints in `replikv-http`.
//!
//! ```rust
//! use replikv::Store;
//!
//! let store = Store::new();
//! store.put("foo", "bar").unwrap();
//! assert_eq!(store.get("foo"), "bar");
//! assert_eq!(store.get("missing"), "");
//! assert!(store.put("", "x").is_err());
//! ```
//!
//! ## Feature flags
//!
//! | Feature | Dependencies | Use case |
//! |---------|-------------|----------|
//! | `openapi` | utoipa | wire types implement `ToSchema` |

pub mod error;
pub mod store;
pub mod types;

pub use error::{KvError, Result};
pub use store::Store;
pub use types::*;
