//! Outbound ports (SPI) for the ring signing subsystem.
//!
//! The query capability: synchronous request/response lookups against
//! on-chain state, implemented by adapters in node-runtime. The core never
//! retries these; retry policy belongs to the transport owner.

use async_trait::async_trait;
use shared_types::{AccountAddress, AccountRecord, ApplicationRecord, QueryError};

/// Resolves an application record (delegatee list) by address.
#[async_trait]
pub trait ApplicationQuerier: Send + Sync {
    /// Fetch the application record for `address`.
    async fn application(&self, address: &AccountAddress)
        -> Result<ApplicationRecord, QueryError>;
}

/// Resolves an account record (public key) by address.
#[async_trait]
pub trait AccountQuerier: Send + Sync {
    /// Fetch the account record for `address`.
    async fn account(&self, address: &AccountAddress) -> Result<AccountRecord, QueryError>;
}
