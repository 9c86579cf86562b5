//! HTTP transport adapters.

pub mod transport;

pub use transport::{DEFAULT_USER_AGENT, ReqwestTransport, TransportConfig};
