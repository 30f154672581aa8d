//! Connection state machine and reconnection policy

mod manager;
mod policy;

pub use manager::{ConnectionManager, ConnectionPhase, ConnectionStatus, Connector, Lease};
pub use policy::ReconnectPolicy;
