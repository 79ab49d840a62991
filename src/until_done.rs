use crate::condition::{await_condition, inspect_with};
use crate::options::WaitOptions;
use crate::runtime::{Actor, AnyOutput, Event, Label};

/// Runs a completable actor to completion (or timeout) and fulfills with its
/// output.
///
/// Resolves with `Some(output)` when the actor reaches its done status, or
/// `None` when it stops without completing. An underlying actor failure
/// rejects with [`Error::ActorFailed`](crate::Error::ActorFailed); the
/// default 1s deadline rejects with a Timeout error.
pub async fn run_until_done<E, O>(actor: &Actor<E, O>) -> crate::Result<Option<O>>
where
    E: Event + Label,
    O: Clone + Send + Sync + 'static,
{
    run_until_done_with(actor, WaitOptions::default()).await
}

/// [`run_until_done`] with options (timeout, logger, extra inspector).
pub async fn run_until_done_with<E, O>(
    actor: &Actor<E, O>,
    options: WaitOptions<E>,
) -> crate::Result<Option<O>>
where
    E: Event + Label,
    O: Clone + Send + Sync + 'static,
{
    let opts = options.resolve(false);
    let message = opts
        .timeout_ms()
        .map(|ms| format!("Actor did not complete in {ms}ms"));

    let output: Option<AnyOutput> = await_condition(actor, &opts, message, |settler, signal| {
        let subscription = inspect_with(actor, &opts, None);

        let watched = actor.actor_ref();
        let settler = settler.clone();
        let signal = signal.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = signal.cancelled() => {}
                result = watched.completion() => match result {
                    Ok(output) => settler.resolve(output),
                    Err(error) => {
                        watched.stop();
                        settler.reject(error);
                    }
                }
            }
        });

        Ok(vec![subscription])
    })
    .await?;

    Ok(output
        .and_then(|output| output.downcast::<O>().ok())
        .map(|output| (*output).clone()))
}
