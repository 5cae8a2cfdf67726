//! # Relay Miner
//!
//! Hashes served relays and difficulty-filters them into the mined-relay
//! stream. The pipeline is wired once and runs asynchronously per element;
//! [`RelayMiner::mined_relays`] itself never blocks.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use shared_crypto::hashing::Hash;
use shared_crypto::{difficulty_is_met, sha256};
use shared_observable::{errors, log_errors, map, successes, ChannelObservable, StageOutput};
use shared_types::{MinedRelay, Relay};

use crate::errors::MiningError;

/// Placeholder difficulty until the governance parameter is wired in:
/// every relay whose digest clears a single leading zero bit is treated
/// as reward applicable.
pub const DEFAULT_RELAY_DIFFICULTY: u32 = 0;

type HasherFn = Arc<dyn Fn(&[u8]) -> Hash + Send + Sync>;

/// Hashes and difficulty-filters served relays.
///
/// The hasher and difficulty are injectable for tests; production wiring
/// uses SHA-256 at [`DEFAULT_RELAY_DIFFICULTY`].
#[derive(Clone)]
pub struct RelayMiner {
    difficulty: u32,
    hasher: HasherFn,
}

impl Default for RelayMiner {
    fn default() -> Self {
        Self::new()
    }
}

impl RelayMiner {
    /// A miner with the default hasher and difficulty.
    #[must_use]
    pub fn new() -> Self {
        Self {
            difficulty: DEFAULT_RELAY_DIFFICULTY,
            hasher: Arc::new(|bytes| sha256(bytes)),
        }
    }

    /// Override the difficulty threshold.
    #[must_use]
    pub fn with_difficulty(mut self, difficulty: u32) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Override the relay hasher.
    #[must_use]
    pub fn with_hasher(mut self, hasher: impl Fn(&[u8]) -> Hash + Send + Sync + 'static) -> Self {
        self.hasher = Arc::new(hasher);
        self
    }

    /// Wire the mining pipeline over a served-relay stream.
    ///
    /// Returns the mined-relay observable immediately; hashing and
    /// filtering run asynchronously per relay as relays arrive. Marshaling
    /// errors are split off to a logged error stream and never appear on
    /// the returned observable.
    pub fn mined_relays(
        &self,
        ctx: CancellationToken,
        served_relays: &ChannelObservable<Relay>,
    ) -> ChannelObservable<MinedRelay> {
        let miner = self.clone();
        let mined = map(ctx.clone(), served_relays, move |relay| {
            let miner = miner.clone();
            async move { miner.mine(&relay) }
        });

        log_errors(ctx.clone(), &errors(ctx.clone(), &mined), "relay-miner");

        successes(ctx, &mined)
    }

    /// Mine a single relay.
    ///
    /// - Marshaling failure → [`StageOutput::Error`]
    /// - Digest below difficulty → [`StageOutput::Skipped`] (not reward
    ///   applicable, dropped silently)
    /// - Otherwise → [`StageOutput::Value`] with the [`MinedRelay`]
    #[must_use]
    pub fn mine(&self, relay: &Relay) -> StageOutput<MinedRelay, MiningError> {
        let bytes = match relay.canonical_bytes() {
            Ok(bytes) => bytes,
            Err(err) => return StageOutput::Error(MiningError::Marshal(err)),
        };

        let hash = (self.hasher)(&bytes);

        if !difficulty_is_met(&hash, self.difficulty) {
            return StageOutput::Skipped;
        }

        StageOutput::Value(MinedRelay {
            relay: relay.clone(),
            bytes,
            hash,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_crypto::leading_zero_bits;
    use shared_observable::channel;
    use shared_types::{RelayRequest, MAX_RELAY_BYTES};

    /// A relay whose SHA-256 digest has at least one leading zero bit,
    /// found by walking a nonce through the payload.
    fn minable_relay() -> Relay {
        for nonce in 0u32.. {
            let relay = Relay {
                request: RelayRequest {
                    payload: nonce.to_be_bytes().to_vec(),
                    ..Default::default()
                },
                ..Default::default()
            };
            let digest = sha256(&relay.canonical_bytes().unwrap());
            if leading_zero_bits(&digest) >= 1 {
                return relay;
            }
        }
        unreachable!()
    }

    fn oversize_relay() -> Relay {
        Relay {
            request: RelayRequest {
                payload: vec![0u8; (MAX_RELAY_BYTES + 1) as usize],
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_mine_emits_value_for_sufficient_difficulty() {
        let miner = RelayMiner::new();
        let relay = minable_relay();

        let output = miner.mine(&relay);
        match output {
            StageOutput::Value(mined) => {
                assert_eq!(mined.relay, relay);
                assert_eq!(mined.bytes, relay.canonical_bytes().unwrap());
                assert_eq!(mined.hash, sha256(&mined.bytes));
                assert!(leading_zero_bits(&mined.hash) > DEFAULT_RELAY_DIFFICULTY);
            }
            other => panic!("expected mined relay, got {other:?}"),
        }
    }

    #[test]
    fn test_mine_skips_insufficient_difficulty() {
        // A hasher pinned to a digest with zero leading zero bits.
        let miner = RelayMiner::new().with_hasher(|_| {
            let mut digest = [0u8; 32];
            digest[0] = 0x80;
            digest
        });

        assert!(miner.mine(&Relay::default()).is_skipped());
    }

    #[test]
    fn test_mine_reports_marshal_error() {
        let miner = RelayMiner::new();
        let output = miner.mine(&oversize_relay());
        assert!(matches!(
            output,
            StageOutput::Error(MiningError::Marshal(_))
        ));
    }

    #[test]
    fn test_difficulty_gate_tightens() {
        // Pinned digest with exactly 8 leading zero bits.
        let miner_ok = RelayMiner::new().with_difficulty(7).with_hasher(|_| {
            let mut digest = [0u8; 32];
            digest[1] = 0xFF;
            digest
        });
        let miner_strict = miner_ok.clone().with_difficulty(8);

        assert!(miner_ok.mine(&Relay::default()).is_value());
        assert!(miner_strict.mine(&Relay::default()).is_skipped());
    }

    #[tokio::test]
    async fn test_pipeline_mines_known_relay() {
        let miner = RelayMiner::new();
        let ctx = CancellationToken::new();
        let (publisher, served) = channel();

        let mined = miner.mined_relays(ctx.clone(), &served);
        let mut observer = mined.subscribe(CancellationToken::new());

        let relay = minable_relay();
        publisher.publish(relay.clone()).await.unwrap();
        drop(publisher);

        let got = observer.recv().await.expect("one mined relay");
        assert_eq!(got.relay, relay);
        assert_eq!(observer.recv().await, None);
    }

    #[tokio::test]
    async fn test_pipeline_drops_marshal_failures_from_mined_stream() {
        let miner = RelayMiner::new();
        let ctx = CancellationToken::new();
        let (publisher, served) = channel();

        let mined = miner.mined_relays(ctx.clone(), &served);
        let mut observer = mined.subscribe(CancellationToken::new());

        publisher.publish(oversize_relay()).await.unwrap();
        publisher.publish(minable_relay()).await.unwrap();
        drop(publisher);

        // Only the minable relay arrives; the marshal failure went to the
        // error sink.
        assert!(observer.recv().await.is_some());
        assert_eq!(observer.recv().await, None);
    }
}
