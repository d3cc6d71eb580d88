pub mod config;
pub mod coordinator;
pub mod peer;
pub mod registry;
pub mod types;

pub use config::NodeConfig;
pub use coordinator::{PeerOutcome, PutOutcome, ReplicationCoordinator};
pub use peer::PeerClient;
pub use registry::{PeerClientMap, PeerRegistry};
