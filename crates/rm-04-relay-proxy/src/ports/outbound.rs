//! Outbound ports (SPI) for the relay proxy subsystem.

use async_trait::async_trait;
use shared_types::{AccountAddress, QueryError, RelayResponse, SupplierRecord};

use crate::errors::ProxyError;

/// Resolves a supplier record (advertised services) by operator address.
#[async_trait]
pub trait SupplierQuerier: Send + Sync {
    /// Fetch the supplier record for `address`.
    async fn supplier(&self, address: &AccountAddress) -> Result<SupplierRecord, QueryError>;
}

/// Forwards a relay payload to a proxied backend service and returns the
/// backend's response payload.
#[async_trait]
pub trait BackendForwarder: Send + Sync {
    /// Forward `payload` and return the backend's raw response bytes.
    async fn forward(&self, payload: &[u8]) -> Result<Vec<u8>, ProxyError>;
}

/// Signs relay responses on the supplier's behalf. Implemented by the ring
/// signing subsystem; every relay server shares one signer.
pub trait RelayResponseSigner: Send + Sync {
    /// Sign `response` in place, setting its supplier signature field.
    fn sign_relay_response(&self, response: &mut RelayResponse) -> Result<(), ProxyError>;
}
