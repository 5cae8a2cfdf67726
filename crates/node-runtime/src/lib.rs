//! # Node Runtime
//!
//! Wiring for the RelayMesh node: configuration, query adapters, and the
//! assembly that connects relay servers → served-relay stream → miner,
//! with the ring cache shared across servers and the block stream feeding
//! the claim-window scheduler.

pub mod adapters;
pub mod config;
pub mod runtime;

pub use config::NodeConfig;
pub use runtime::RelayNode;
