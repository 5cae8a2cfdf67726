//! The broadcast primitive under concurrency: ordering per observer,
//! unsubscription during delivery, many publishers and subscribers.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use shared_observable::channel;
    use tokio::time::timeout;
    use tokio_util::sync::CancellationToken;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_every_observer_gets_every_value_in_order() {
        const OBSERVERS: usize = 8;
        const VALUES: u32 = 100;

        let (publisher, observable) = channel::<u32>();

        let consumers: Vec<_> = (0..OBSERVERS)
            .map(|_| {
                let mut observer = observable.subscribe(CancellationToken::new());
                tokio::spawn(async move {
                    let mut received = Vec::new();
                    while let Some(value) = observer.recv().await {
                        received.push(value);
                    }
                    received
                })
            })
            .collect();

        for value in 0..VALUES {
            publisher.publish(value).await.unwrap();
        }
        drop(publisher);

        let expected: Vec<u32> = (0..VALUES).collect();
        for consumer in consumers {
            let received = timeout(Duration::from_secs(10), consumer)
                .await
                .expect("consumer finished")
                .unwrap();
            assert_eq!(received, expected, "no drop, no duplication, in order");
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_mid_stream_unsubscribe_leaves_others_untouched() {
        let (publisher, observable) = channel::<u32>();

        let mut quitter = observable.subscribe(CancellationToken::new());
        let mut stayer = observable.subscribe(CancellationToken::new());

        publisher.publish(0).await.unwrap();
        assert_eq!(quitter.recv().await, Some(0));
        assert_eq!(stayer.recv().await, Some(0));

        quitter.unsubscribe();

        for value in 1..50u32 {
            publisher.publish(value).await.unwrap();
            assert_eq!(stayer.recv().await, Some(value));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_unsubscribe_races_in_flight_deliveries() {
        // Repeatedly race a publisher against unsubscribing observers; the
        // invariant is simply that nothing faults or wedges.
        for _ in 0..20 {
            let (publisher, observable) = channel::<u64>();

            let feeder = tokio::spawn(async move {
                for value in 0..200u64 {
                    if publisher.publish(value).await.is_err() {
                        break;
                    }
                }
            });

            let racers: Vec<_> = (0..4)
                .map(|i| {
                    let mut observer = observable.subscribe(CancellationToken::new());
                    tokio::spawn(async move {
                        // Consume a few values, then bail mid-stream.
                        for _ in 0..=i {
                            if observer.recv().await.is_none() {
                                return;
                            }
                        }
                        observer.unsubscribe();
                        // Repeated unsubscribe stays a no-op.
                        observer.unsubscribe();
                    })
                })
                .collect();

            for racer in racers {
                timeout(Duration::from_secs(10), racer)
                    .await
                    .expect("racer finished")
                    .unwrap();
            }

            observable.close();
            timeout(Duration::from_secs(10), feeder)
                .await
                .expect("feeder finished")
                .unwrap();
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_cancellation_does_not_deregister() {
        let (publisher, observable) = channel::<u32>();

        let ctx = CancellationToken::new();
        let mut paused = observable.subscribe(ctx.clone());
        let mut live = observable.subscribe(CancellationToken::new());

        ctx.cancel();

        // Deliveries to the cancelled observer stop, but the stream keeps
        // flowing for everyone else.
        for value in 0..10u32 {
            publisher.publish(value).await.unwrap();
            assert_eq!(live.recv().await, Some(value));
        }

        // Explicit unsubscription is what releases the registration.
        paused.unsubscribe();
        publisher.publish(10).await.unwrap();
        assert_eq!(live.recv().await, Some(10));
    }
}
