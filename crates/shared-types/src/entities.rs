//! # Core Domain Entities
//!
//! Defines the relay, session, and on-chain record types shared across
//! subsystems.
//!
//! ## Clusters
//!
//! - **Relay**: `Relay`, `RelayRequest`, `RelayResponse`, `MinedRelay`
//! - **Chain**: `BlockInfo`, `AccountAddress`
//! - **On-chain records**: `ApplicationRecord`, `AccountRecord`,
//!   `SupplierRecord`, `ServiceAdvertisement`

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};

use crate::codec::{to_canonical_bytes, CodecError};

// =============================================================================
// CLUSTER A: THE CHAIN
// =============================================================================

/// A 32-byte digest (SHA-256).
pub type Hash = [u8; 32];

/// A 64-byte ECDSA signature (r || s).
pub type Signature = [u8; 64];

/// A bech32-style account address, kept opaque.
///
/// Addresses are resolved to public keys through the account query
/// capability; the core never derives keys from the address itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct AccountAddress(pub String);

impl AccountAddress {
    /// Borrow the underlying address string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AccountAddress {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl std::fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A block event from the external block stream: height plus hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BlockInfo {
    /// Block height in the chain.
    pub height: u64,
    /// The block's hash.
    pub hash: Hash,
}

impl BlockInfo {
    /// Render the block hash as lowercase hex for logging.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }
}

// =============================================================================
// CLUSTER B: RELAYS
// =============================================================================

/// Session context a relay is served under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SessionHeader {
    /// The application the relay is served on behalf of.
    pub application_address: AccountAddress,
    /// Identifier of the advertised service handling the relay.
    pub service_id: String,
    /// Height at which the session started.
    pub session_start_height: u64,
}

/// Metadata attached to a relay request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RequestMeta {
    /// Session the request belongs to.
    pub session_header: SessionHeader,
    /// Ring signature produced by the application or one of its delegated
    /// gateways. Variable length; verified by the supplier, not here.
    pub application_signature: Option<Vec<u8>>,
}

/// A relay request: metadata plus the opaque payload destined for the
/// proxied backend service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RelayRequest {
    /// Request metadata.
    pub meta: RequestMeta,
    /// Opaque request payload (e.g. a JSON-RPC body).
    pub payload: Vec<u8>,
}

/// Metadata attached to a relay response.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ResponseMeta {
    /// Session the response belongs to.
    pub session_header: SessionHeader,
    /// The supplier's signature over the response hash. `None` until
    /// the response has been signed.
    #[serde_as(as = "Option<Bytes>")]
    pub supplier_signature: Option<Signature>,
}

/// A relay response: metadata plus the opaque payload returned by the
/// proxied backend service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RelayResponse {
    /// Response metadata.
    pub meta: ResponseMeta,
    /// Opaque response payload.
    pub payload: Vec<u8>,
}

impl RelayResponse {
    /// Canonical bytes of the response with the supplier signature cleared.
    ///
    /// This is the exact byte string the supplier signs: the signature field
    /// cannot cover itself.
    pub fn signable_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let mut unsigned = self.clone();
        unsigned.meta.supplier_signature = None;
        to_canonical_bytes(&unsigned)
    }
}

/// A complete served relay: the signed request and the signed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Relay {
    /// The client's relay request.
    pub request: RelayRequest,
    /// The supplier's relay response.
    pub response: RelayResponse,
}

impl Relay {
    /// The canonical serialization of this relay, as hashed by the miner.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, CodecError> {
        to_canonical_bytes(self)
    }
}

/// A relay whose digest satisfied the mining difficulty.
///
/// Only the miner constructs these, and only for relays whose digest
/// passes the difficulty predicate; holding a `MinedRelay` implies the
/// relay is volume / reward applicable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinedRelay {
    /// The relay itself.
    pub relay: Relay,
    /// The canonical bytes the digest was computed over.
    pub bytes: Vec<u8>,
    /// SHA-256 digest of `bytes`.
    pub hash: Hash,
}

// =============================================================================
// CLUSTER C: ON-CHAIN RECORDS (query capability results)
// =============================================================================

/// An application record as returned by the application query capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ApplicationRecord {
    /// The application's address.
    pub address: AccountAddress,
    /// Gateways the application has delegated ring-signing rights to.
    pub delegatee_gateway_addresses: Vec<AccountAddress>,
}

/// The key scheme an on-chain account's public key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyType {
    /// secp256k1, the only scheme rings are built over.
    Secp256k1,
    /// ed25519; present on chain but rejected for ring membership.
    Ed25519,
}

/// An account record as returned by the account query capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// The account's address.
    pub address: AccountAddress,
    /// The account's public key bytes (SEC1 compressed for secp256k1).
    pub public_key: Vec<u8>,
    /// The scheme `public_key` belongs to.
    pub key_type: KeyType,
}

/// RPC dispatch type of an advertised service endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RpcType {
    /// JSON-RPC over HTTP. The only type the proxy currently serves.
    JsonRpc,
    /// WebSocket subscriptions. Advertised on chain, not yet served.
    WebSocket,
    /// gRPC. Advertised on chain, not yet served.
    Grpc,
}

/// A single endpoint of an advertised service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEndpoint {
    /// Publicly advertised URL of the endpoint.
    pub url: String,
    /// Dispatch type the endpoint speaks.
    pub rpc_type: RpcType,
}

/// A service a supplier advertises on chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAdvertisement {
    /// Identifier of the service (e.g. a chain id).
    pub service_id: String,
    /// Endpoints the service is reachable at.
    pub endpoints: Vec<ServiceEndpoint>,
}

/// A supplier record as returned by the supplier query capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SupplierRecord {
    /// The supplier's operator address.
    pub address: AccountAddress,
    /// Services the supplier advertises.
    pub services: Vec<ServiceAdvertisement>,
}
