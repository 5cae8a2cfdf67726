//! # Claim Windows Subsystem (rm-03)
//!
//! Derives the earliest block heights at which a supplier may submit a
//! claim or a proof. The height offset is a deterministic function of the
//! window-start block's hash, so independently operating nodes observing
//! the same block agree on legality while their submissions spread across
//! the window instead of bursting at its first height.

pub mod scheduler;
pub mod seed;

pub use scheduler::{earliest_claim_height, earliest_proof_height, WindowParams};
pub use seed::read_varint;
