//! Inbound ports (API) for the ring signing subsystem.

use async_trait::async_trait;
use shared_crypto::ring::{RingPoint, RingSigner};
use shared_types::{AccountAddress, RelayResponse};

use crate::errors::RingError;

/// Primary API for obtaining ring signers, signing relay responses, and
/// managing the ring cache.
#[async_trait]
pub trait RingSigningApi: Send + Sync {
    /// A ring signer for the given application, built from the cached ring
    /// when one exists. A cache miss triggers a refresh through the query
    /// capability.
    async fn signer_for(&self, address: &AccountAddress) -> Result<RingSigner, RingError>;

    /// Rebuild the ring for `address` from on-chain state, overwriting any
    /// cached entry, and return the new points.
    ///
    /// On failure the previous cache entry (if any) is left intact.
    async fn refresh_ring(&self, address: &AccountAddress)
        -> Result<Vec<RingPoint>, RingError>;

    /// Drop the cached ring for `address`, if any. The next `signer_for`
    /// will refresh. Callers wire this to delegation-change events; the
    /// cache never invalidates itself.
    fn invalidate(&self, address: &AccountAddress);

    /// Sign `response` in place with the node's own key (non-ring): hash
    /// the signable bytes, sign the hash, set the supplier signature
    /// field.
    ///
    /// # Errors
    ///
    /// [`RingError::InvalidRelayResponse`] when signable-bytes extraction
    /// or signing fails; never silently swallowed.
    fn sign_relay_response(&self, response: &mut RelayResponse) -> Result<(), RingError>;
}
