//! Node configuration.
//!
//! Loaded from a TOML file given as the first CLI argument:
//!
//! ```toml
//! query_endpoint = "http://127.0.0.1:1317"
//! supplier_address = "rm1supplier"
//! signing_key_hex = "4f3edf983ac636a65a842ce7c78d9aa706d3b113bce9c46f30d7d21715b23b1d"
//! block_poll_interval_ms = 1000
//!
//! [[services]]
//! service_id = "anvil"
//! listen_addr = "127.0.0.1:8545"
//! backend_url = "http://127.0.0.1:9545"
//! ```

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use rm_04_relay_proxy::{ProxyConfig, ServiceBinding};

/// Configuration errors surfaced at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file could not be parsed.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The signing key is not 32 hex-encoded bytes.
    #[error("signing_key_hex must be 32 hex-encoded bytes")]
    InvalidSigningKey,
}

/// Local wiring for one advertised service.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Advertised service id this binding applies to.
    pub service_id: String,
    /// Address the relay server listens on.
    pub listen_addr: SocketAddr,
    /// URL of the proxied backend service.
    pub backend_url: String,
}

/// Top-level node configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeConfig {
    /// Base URL of the on-chain query endpoint.
    pub query_endpoint: String,
    /// The supplier operator address this node serves for.
    pub supplier_address: String,
    /// Hex-encoded secp256k1 secret key used for response signing and
    /// ring membership.
    pub signing_key_hex: String,
    /// Interval between latest-block polls, in milliseconds.
    #[serde(default = "default_block_poll_interval_ms")]
    pub block_poll_interval_ms: u64,
    /// Per-service bindings.
    #[serde(default)]
    pub services: Vec<ServiceConfig>,
}

fn default_block_poll_interval_ms() -> u64 {
    1000
}

impl NodeConfig {
    /// Load and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Decode the configured signing key.
    pub fn signing_key(&self) -> Result<[u8; 32], ConfigError> {
        let bytes = hex::decode(&self.signing_key_hex)
            .map_err(|_| ConfigError::InvalidSigningKey)?;
        bytes.try_into().map_err(|_| ConfigError::InvalidSigningKey)
    }

    /// The proxy-assembly view of the service bindings.
    #[must_use]
    pub fn proxy_config(&self) -> ProxyConfig {
        let bindings: HashMap<String, ServiceBinding> = self
            .services
            .iter()
            .map(|service| {
                (
                    service.service_id.clone(),
                    ServiceBinding {
                        listen_addr: service.listen_addr,
                        backend_url: service.backend_url.clone(),
                    },
                )
            })
            .collect();
        ProxyConfig { bindings }
    }
}
