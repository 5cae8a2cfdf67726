//! Served relays through the full mining pipeline: success and error
//! streams observed side by side.

#[cfg(test)]
mod tests {
    use rm_01_relay_miner::{MiningError, RelayMiner};
    use shared_crypto::{leading_zero_bits, sha256};
    use shared_observable::{channel, errors, map, successes, StageOutput};
    use shared_types::{MinedRelay, Relay, RelayRequest, MAX_RELAY_BYTES};
    use tokio_util::sync::CancellationToken;

    fn small_relay(tag: u8) -> Relay {
        Relay {
            request: RelayRequest {
                payload: vec![tag; 16],
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn oversize_relay(tag: u8) -> Relay {
        Relay {
            request: RelayRequest {
                payload: vec![tag; (MAX_RELAY_BYTES + 1) as usize],
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// A hasher pinned to a digest that satisfies difficulty 0.
    fn always_minable(_: &[u8]) -> [u8; 32] {
        let mut digest = [0u8; 32];
        digest[31] = 1;
        digest
    }

    #[tokio::test]
    async fn test_five_relays_three_mine_two_fail_marshaling() {
        let ctx = CancellationToken::new();
        let miner = RelayMiner::new().with_hasher(always_minable);

        let (publisher, served) = channel::<Relay>();
        let mined_stage = map(ctx.clone(), &served, {
            let miner = miner.clone();
            move |relay| {
                let miner = miner.clone();
                async move { miner.mine(&relay) }
            }
        });
        let mut mined = successes(ctx.clone(), &mined_stage).subscribe(CancellationToken::new());
        let mut failed = errors(ctx.clone(), &mined_stage).subscribe(CancellationToken::new());

        for tag in 0..3u8 {
            publisher.publish(small_relay(tag)).await.unwrap();
        }
        for tag in 3..5u8 {
            publisher.publish(oversize_relay(tag)).await.unwrap();
        }
        drop(publisher);

        let mut mined_count = 0;
        while let Some(mined_relay) = mined.recv().await {
            assert_eq!(mined_relay.hash, always_minable(&mined_relay.bytes));
            mined_count += 1;
        }
        assert_eq!(mined_count, 3);

        let mut error_count = 0;
        while let Some(err) = failed.recv().await {
            assert!(matches!(err, MiningError::Marshal(_)));
            error_count += 1;
        }
        assert_eq!(error_count, 2);
    }

    #[tokio::test]
    async fn test_success_stream_bounded_by_marshalable_relays() {
        // Same scenario against the real SHA-256 difficulty gate: some of
        // the three marshalable relays may be mined away, none of the
        // failing two ever can be.
        let ctx = CancellationToken::new();
        let miner = RelayMiner::new();

        let (publisher, served) = channel::<Relay>();
        let mined = miner.mined_relays(ctx.clone(), &served);
        let mut observer = mined.subscribe(CancellationToken::new());

        for tag in 0..3u8 {
            publisher.publish(small_relay(tag)).await.unwrap();
        }
        for tag in 3..5u8 {
            publisher.publish(oversize_relay(tag)).await.unwrap();
        }
        drop(publisher);

        let mut mined_count = 0;
        while let Some(MinedRelay { bytes, hash, .. }) = observer.recv().await {
            // Every emitted relay genuinely cleared the difficulty.
            assert_eq!(hash, sha256(&bytes));
            assert!(leading_zero_bits(&hash) > 0);
            mined_count += 1;
        }
        assert!(mined_count <= 3);
    }

    #[tokio::test]
    async fn test_skipped_relays_reach_neither_stream() {
        let ctx = CancellationToken::new();
        // Difficulty impossible to satisfy: everything marshalable skips.
        let miner = RelayMiner::new().with_difficulty(256);

        let (publisher, served) = channel::<Relay>();
        let mined_stage = map(ctx.clone(), &served, {
            let miner = miner.clone();
            move |relay| {
                let miner = miner.clone();
                async move { miner.mine(&relay) }
            }
        });
        let mut mined = successes(ctx.clone(), &mined_stage).subscribe(CancellationToken::new());
        let mut failed = errors(ctx.clone(), &mined_stage).subscribe(CancellationToken::new());

        for tag in 0..4u8 {
            publisher.publish(small_relay(tag)).await.unwrap();
        }
        drop(publisher);

        assert_eq!(mined.recv().await, None);
        assert_eq!(failed.recv().await, None);
    }

    #[test]
    fn test_mine_is_tristate() {
        let miner = RelayMiner::new().with_hasher(always_minable);
        assert!(matches!(
            miner.mine(&small_relay(1)),
            StageOutput::Value(_)
        ));
        assert!(matches!(
            miner.mine(&oversize_relay(1)),
            StageOutput::Error(_)
        ));

        let strict = RelayMiner::new().with_difficulty(256);
        assert!(matches!(strict.mine(&small_relay(1)), StageOutput::Skipped));
    }
}
