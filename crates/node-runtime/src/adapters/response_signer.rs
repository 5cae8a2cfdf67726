//! Adapter wiring the ring signing subsystem into the relay proxy's
//! response-signer port.

use std::sync::Arc;

use rm_02_ring_signing::RingSigningApi;
use rm_04_relay_proxy::{ProxyError, RelayResponseSigner};
use shared_types::RelayResponse;

/// Exposes any [`RingSigningApi`] as the proxy's [`RelayResponseSigner`].
pub struct ResponseSignerAdapter<S: RingSigningApi> {
    ring_signing: Arc<S>,
}

impl<S: RingSigningApi> ResponseSignerAdapter<S> {
    pub fn new(ring_signing: Arc<S>) -> Self {
        Self { ring_signing }
    }
}

impl<S: RingSigningApi> RelayResponseSigner for ResponseSignerAdapter<S> {
    fn sign_relay_response(&self, response: &mut RelayResponse) -> Result<(), ProxyError> {
        self.ring_signing
            .sign_relay_response(response)
            .map_err(|err| ProxyError::InvalidRelayResponse(err.to_string()))
    }
}
