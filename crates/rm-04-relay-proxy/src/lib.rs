//! # Relay Proxy Subsystem (rm-04)
//!
//! Builds, per on-chain-advertised service, a relay server bound to a
//! local listener. Each server forwards relay payloads to its proxied
//! backend service, signs the relay response with the supplier's key, and
//! publishes the completed relay onto the channel feeding the relay miner.
//!
//! ```text
//! client ──relay request──→ [JsonRpcRelayServer] ──payload──→ backend
//!                                  │    ↑ response payload
//!                   sign response  │
//!                                  ├──→ served-relay publish channel ──→ miner
//!                                  └──→ signed relay response to client
//! ```
//!
//! Unsupported advertised transport types are a fatal configuration error
//! at assembly time, not a skip.

pub mod backend;
pub mod errors;
pub mod json_rpc;
pub mod ports;
pub mod server_builder;

pub use backend::HttpBackend;
pub use errors::ProxyError;
pub use json_rpc::JsonRpcRelayServer;
pub use ports::outbound::{BackendForwarder, RelayResponseSigner, SupplierQuerier};
pub use server_builder::{build_provided_services, ProxyConfig, ServiceBinding};
