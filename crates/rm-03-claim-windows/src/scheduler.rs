//! Earliest claim/proof height derivation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use shared_types::BlockInfo;

use crate::seed::read_varint;

/// Governance-sourced window widths, in blocks.
///
/// Both widths are pinned to zero until the on-chain parameter is wired
/// in: every node currently targets the window-start height itself. The
/// seeding path below is live regardless, so widening a window is a
/// parameter change, not a logic change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowParams {
    /// Width of the claim submission window.
    pub claim_window_width: u64,
    /// Width of the proof submission window.
    pub proof_window_width: u64,
}

/// Earliest height at which a claim for a session whose claim window opens
/// at `start_block` may be created.
#[must_use]
pub fn earliest_claim_height(start_block: &BlockInfo, params: &WindowParams) -> u64 {
    let offset = seeded_offset(start_block, params.claim_window_width);
    start_block.height + offset
}

/// Earliest height at which a proof for a session whose proof window opens
/// at `start_block` may be submitted.
#[must_use]
pub fn earliest_proof_height(start_block: &BlockInfo, params: &WindowParams) -> u64 {
    let offset = seeded_offset(start_block, params.proof_window_width);
    start_block.height + offset
}

/// Deterministic offset within `[0, width)`, seeded purely from the block
/// hash. Wall-clock time must never leak in here: all observers of the
/// same block have to agree on the same offset.
fn seeded_offset(start_block: &BlockInfo, width: u64) -> u64 {
    debug!(
        height = start_block.height,
        hash = %start_block.hash_hex(),
        "using window start block hash as randomness"
    );

    let seed = read_varint(&start_block.hash).unwrap_or(0);
    let drawn = StdRng::seed_from_u64(seed as u64).gen::<u64>();

    if width == 0 {
        return 0;
    }
    drawn % width
}
