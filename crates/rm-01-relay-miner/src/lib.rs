//! # Relay Miner Subsystem (rm-01)
//!
//! Consumes the stream of served relays, hashes each one, and filters by
//! mining difficulty. Relays whose digest satisfies the difficulty are
//! volume / reward applicable and emitted as [`shared_types::MinedRelay`];
//! the rest are dropped silently. Marshaling failures are routed to a
//! logged error stream and never reach the mined stream.
//!
//! ```text
//! served relays ──→ [serialize → hash → difficulty check] ──→ mined relays
//!                        │ (per-element task)
//!                        └─ errors ──→ log sink
//! ```

pub mod errors;
pub mod miner;

pub use errors::MiningError;
pub use miner::{RelayMiner, DEFAULT_RELAY_DIFFICULTY};
