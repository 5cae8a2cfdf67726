//! # Ring Cache Service
//!
//! Owns the application-address → curve-points mapping and the node's
//! signing key. Reads take only the map lock; a cache miss refreshes under
//! a per-address lock so concurrent misses for the same application
//! collapse into one in-flight refresh, and a miss for one application
//! never blocks a hit for another.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use tracing::debug;

use shared_crypto::ring::{Ring, RingPoint, RingSigner};
use shared_crypto::{sha256, SimpleSigner, SigningKeypair};
use shared_types::{AccountAddress, RelayResponse};

use crate::domain::{account_ring_point, ring_addresses};
use crate::errors::RingError;
use crate::ports::inbound::RingSigningApi;
use crate::ports::outbound::{AccountQuerier, ApplicationQuerier};

/// Ring cache plus the node's own signing key.
///
/// Thread-safe; share across tasks via `Arc`. Cached entries are
/// overwritten wholesale by refresh and removed only by
/// [`RingSigningApi::invalidate`] — there is no TTL.
pub struct RingCacheService<A, C>
where
    A: ApplicationQuerier,
    C: AccountQuerier,
{
    /// Application query adapter.
    applications: Arc<A>,
    /// Account query adapter.
    accounts: Arc<C>,
    /// The node's signing key, wrapped into every ring signer handed out.
    keypair: SigningKeypair,
    /// The same key as a plain signer, for relay responses.
    response_signer: SimpleSigner,
    /// Cached ring points per application address.
    points: RwLock<HashMap<AccountAddress, Vec<RingPoint>>>,
    /// Per-address refresh guards (single-flight).
    refresh_locks: Mutex<HashMap<AccountAddress, Arc<tokio::sync::Mutex<()>>>>,
}

impl<A, C> RingCacheService<A, C>
where
    A: ApplicationQuerier,
    C: AccountQuerier,
{
    pub fn new(applications: Arc<A>, accounts: Arc<C>, keypair: SigningKeypair) -> Self {
        Self {
            applications,
            accounts,
            response_signer: SimpleSigner::new(keypair.clone()),
            keypair,
            points: RwLock::new(HashMap::new()),
            refresh_locks: Mutex::new(HashMap::new()),
        }
    }

    /// The node's public key, for clients verifying response signatures.
    #[must_use]
    pub fn public_key_bytes(&self) -> [u8; 33] {
        self.response_signer.public_key_bytes()
    }

    /// Number of cached rings. Exposed for diagnostics.
    #[must_use]
    pub fn cached_rings(&self) -> usize {
        self.points.read().len()
    }

    /// The per-address refresh guard, created on first use.
    fn refresh_lock(&self, address: &AccountAddress) -> Arc<tokio::sync::Mutex<()>> {
        Arc::clone(
            self.refresh_locks
                .lock()
                .entry(address.clone())
                .or_default(),
        )
    }

    /// Query on-chain state and overwrite the cache entry for `address`.
    ///
    /// Caller must hold the address's refresh guard.
    async fn refresh_locked(
        &self,
        address: &AccountAddress,
    ) -> Result<Vec<RingPoint>, RingError> {
        let application = self.applications.application(address).await?;
        let addresses = ring_addresses(&application);

        debug!(%address, ring_size = addresses.len(), "refreshing ring");

        let mut points = Vec::with_capacity(addresses.len());
        for member in &addresses {
            let account = self.accounts.account(member).await?;
            points.push(account_ring_point(&account)?);
        }

        self.points.write().insert(address.clone(), points.clone());
        Ok(points)
    }

    fn signer_from_points(&self, points: Vec<RingPoint>) -> Result<RingSigner, RingError> {
        let ring = Ring::from_points(points)?;
        Ok(RingSigner::new(ring, self.keypair.clone())?)
    }
}

#[async_trait]
impl<A, C> RingSigningApi for RingCacheService<A, C>
where
    A: ApplicationQuerier,
    C: AccountQuerier,
{
    async fn signer_for(&self, address: &AccountAddress) -> Result<RingSigner, RingError> {
        // Fast path: rebuild from cached points, no query round trip.
        if let Some(points) = self.points.read().get(address).cloned() {
            debug!(%address, "ring cache hit");
            return self.signer_from_points(points);
        }

        // Miss: refresh under the per-address guard. Whoever loses the race
        // finds the winner's points in the cache and skips the queries.
        let guard = self.refresh_lock(address);
        let _held = guard.lock().await;

        if let Some(points) = self.points.read().get(address).cloned() {
            debug!(%address, "ring cached while awaiting refresh guard");
            return self.signer_from_points(points);
        }

        debug!(%address, "ring cache miss");
        let points = self.refresh_locked(address).await?;
        self.signer_from_points(points)
    }

    async fn refresh_ring(
        &self,
        address: &AccountAddress,
    ) -> Result<Vec<RingPoint>, RingError> {
        let guard = self.refresh_lock(address);
        let _held = guard.lock().await;
        self.refresh_locked(address).await
    }

    fn invalidate(&self, address: &AccountAddress) {
        if self.points.write().remove(address).is_some() {
            debug!(%address, "ring cache entry invalidated");
        }
    }

    fn sign_relay_response(&self, response: &mut RelayResponse) -> Result<(), RingError> {
        let signable = response.signable_bytes().map_err(|err| {
            RingError::InvalidRelayResponse(format!("error getting signable bytes: {err}"))
        })?;
        let digest = sha256(&signable);

        response.meta.supplier_signature = Some(self.response_signer.sign(&digest));
        Ok(())
    }
}
