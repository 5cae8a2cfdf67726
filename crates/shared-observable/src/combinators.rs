//! # Pipeline Combinators
//!
//! Compose observables into transformation chains. Every transform runs in
//! its own task, so a slow transform never blocks the upstream delivery
//! path or the next element's arrival.

use std::future::Future;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::observable::{channel, ChannelObservable};
use crate::stage::StageOutput;

/// Map every element of `upstream` through `transform`, publishing values
/// and errors to the returned observable. [`StageOutput::Skipped`] elements
/// are dropped at the source.
///
/// Each element's transform is spawned independently; output order across
/// elements is therefore not guaranteed. Transforms that touch shared
/// mutable state must synchronize internally.
pub fn map<T, U, E, F, Fut>(
    ctx: CancellationToken,
    upstream: &ChannelObservable<T>,
    transform: F,
) -> ChannelObservable<StageOutput<U, E>>
where
    T: Clone + Send + 'static,
    U: Clone + Send + 'static,
    E: Clone + Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + Clone + 'static,
    Fut: Future<Output = StageOutput<U, E>> + Send + 'static,
{
    let (publisher, downstream) = channel();
    let mut observer = upstream.subscribe(ctx.child_token());

    tokio::spawn(async move {
        loop {
            let value = tokio::select! {
                biased;
                () = ctx.cancelled() => break,
                value = observer.recv() => match value {
                    Some(value) => value,
                    None => break,
                },
            };

            let transform = transform.clone();
            let publisher = publisher.clone();
            tokio::spawn(async move {
                match transform(value).await {
                    StageOutput::Skipped => {}
                    output => {
                        // The only publish failure is a closed downstream,
                        // at which point the output has no audience anyway.
                        let _ = publisher.publish(output).await;
                    }
                }
            });
        }
    });

    downstream
}

/// Forward only the [`StageOutput::Value`] elements of `upstream`.
pub fn successes<T, E>(
    ctx: CancellationToken,
    upstream: &ChannelObservable<StageOutput<T, E>>,
) -> ChannelObservable<T>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    let (publisher, downstream) = channel();
    let mut observer = upstream.subscribe(ctx.child_token());

    tokio::spawn(async move {
        loop {
            let output = tokio::select! {
                biased;
                () = ctx.cancelled() => break,
                output = observer.recv() => match output {
                    Some(output) => output,
                    None => break,
                },
            };
            if let StageOutput::Value(value) = output {
                if publisher.publish(value).await.is_err() {
                    break;
                }
            }
        }
    });

    downstream
}

/// Forward only the [`StageOutput::Error`] elements of `upstream`.
pub fn errors<T, E>(
    ctx: CancellationToken,
    upstream: &ChannelObservable<StageOutput<T, E>>,
) -> ChannelObservable<E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    let (publisher, downstream) = channel();
    let mut observer = upstream.subscribe(ctx.child_token());

    tokio::spawn(async move {
        loop {
            let output = tokio::select! {
                biased;
                () = ctx.cancelled() => break,
                output = observer.recv() => match output {
                    Some(output) => output,
                    None => break,
                },
            };
            if let StageOutput::Error(err) = output {
                if publisher.publish(err).await.is_err() {
                    break;
                }
            }
        }
    });

    downstream
}

/// Terminal sink: drain an error stream into the log.
///
/// Errors routed here are observed, never re-injected into any success
/// stream, and never terminate the pipeline.
pub fn log_errors<E>(ctx: CancellationToken, upstream: &ChannelObservable<E>, stage: &'static str)
where
    E: Clone + Send + std::fmt::Display + 'static,
{
    let mut observer = upstream.subscribe(ctx.child_token());

    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                () = ctx.cancelled() => break,
                err = observer.recv() => match err {
                    Some(err) => warn!(%err, stage, "pipeline stage error"),
                    None => break,
                },
            }
        }
    });
}
