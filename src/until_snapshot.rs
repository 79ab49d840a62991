use crate::condition::inspect_with;
use crate::options::{Resolved, WaitOptions};
use crate::runtime::{ActorRef, Event, Label, Snapshot, WaitError};
use crate::Error;

/// Runs an actor until its snapshot satisfies `predicate`, then stops it.
/// Resolves with the first matching snapshot.
///
/// Unlike the sequence conditions, this one is not stream-matched: it rides
/// the runtime's snapshot-wait primitive and reclassifies its two failure
/// shapes - the deadline becomes a Timeout error, termination before a match
/// becomes [`Error::TerminatedEarly`].
pub async fn run_until_snapshot<E, F>(actor: &ActorRef<E>, predicate: F) -> crate::Result<Snapshot>
where
    E: Event + Label,
    F: FnMut(&Snapshot) -> bool,
{
    until_snapshot(actor, WaitOptions::default().resolve(true), predicate).await
}

/// [`run_until_snapshot`] with options.
pub async fn run_until_snapshot_with<E, F>(
    actor: &ActorRef<E>,
    options: WaitOptions<E>,
    predicate: F,
) -> crate::Result<Snapshot>
where
    E: Event + Label,
    F: FnMut(&Snapshot) -> bool,
{
    until_snapshot(actor, options.resolve(true), predicate).await
}

/// Like [`run_until_snapshot`], but leaves the actor running on success.
pub async fn wait_for_snapshot<E, F>(actor: &ActorRef<E>, predicate: F) -> crate::Result<Snapshot>
where
    E: Event + Label,
    F: FnMut(&Snapshot) -> bool,
{
    until_snapshot(actor, WaitOptions::default().resolve(false), predicate).await
}

/// [`wait_for_snapshot`] with options.
pub async fn wait_for_snapshot_with<E, F>(
    actor: &ActorRef<E>,
    options: WaitOptions<E>,
    predicate: F,
) -> crate::Result<Snapshot>
where
    E: Event + Label,
    F: FnMut(&Snapshot) -> bool,
{
    until_snapshot(actor, options.resolve(false), predicate).await
}

async fn until_snapshot<E, F>(
    actor: &ActorRef<E>,
    opts: Resolved<E>,
    predicate: F,
) -> crate::Result<Snapshot>
where
    E: Event + Label,
    F: FnMut(&Snapshot) -> bool,
{
    let subscription = inspect_with(actor, &opts, None);
    actor.start();

    let result = actor.wait_for(predicate, opts.timeout).await;
    drop(subscription);

    let result = result.map_err(|error| match error {
        WaitError::Timeout => Error::Timeout {
            message: format!(
                "Snapshot did not match predicate in {}ms",
                opts.timeout_ms().unwrap_or_default()
            ),
        },
        WaitError::Terminated => Error::TerminatedEarly {
            message: "Actor terminated before satisfying predicate".to_string(),
        },
    });

    if opts.stop || result.is_err() {
        actor.stop();
    }
    result
}
