//! # Ring Signing Subsystem (rm-02)
//!
//! Builds, caches, and invalidates the rings of delegated public keys used
//! to sign relays on behalf of an application. A ring contains the
//! application's own key (twice, when it has no delegatees) followed by
//! its delegated gateway keys.
//!
//! ## Architecture Role
//!
//! ```text
//! [Relay serving] ──signer_for(app)──→ [Ring Cache] ──miss──→ [Queriers]
//!                                           │                  app + account
//!                                           └─hit──→ ring rebuilt from
//!                                                    cached curve points
//! ```
//!
//! The cache has no expiry: entries stay until an explicit
//! `invalidate`/`refresh_ring`. Staleness is bounded only by external
//! delegation-change triggers.

pub mod domain;
pub mod errors;
pub mod ports;
pub mod service;

pub use domain::{account_ring_point, ring_addresses};
pub use errors::RingError;
pub use ports::inbound::RingSigningApi;
pub use ports::outbound::{AccountQuerier, ApplicationQuerier};
pub use service::RingCacheService;
