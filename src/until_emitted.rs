use std::sync::Arc;

use crate::condition::{await_condition, driver_hook, inspect_with};
use crate::matcher::OrderedMatcher;
use crate::options::{Resolved, WaitOptions};
use crate::runtime::{ActorRef, Event, Label};

/// Runs an actor until it emits the given event types, in order, then stops
/// it. Resolves with the matching emitted events.
///
/// Emitted events are a separate channel from sent/received events: this
/// condition consumes the actor's emitted-event listeners, not the
/// inspection stream. Events that don't match the current front of the
/// expected list are dropped, not buffered.
pub async fn run_until_emitted<E>(actor: &ActorRef<E>, emitted_types: &[&str]) -> crate::Result<Vec<E>>
where
    E: Event + Label,
{
    until_emitted(actor, WaitOptions::default().resolve(true), emitted_types).await
}

/// [`run_until_emitted`] with options.
pub async fn run_until_emitted_with<E>(
    actor: &ActorRef<E>,
    options: WaitOptions<E>,
    emitted_types: &[&str],
) -> crate::Result<Vec<E>>
where
    E: Event + Label,
{
    until_emitted(actor, options.resolve(true), emitted_types).await
}

/// Like [`run_until_emitted`], but leaves the actor running on success.
pub async fn wait_for_emitted<E>(actor: &ActorRef<E>, emitted_types: &[&str]) -> crate::Result<Vec<E>>
where
    E: Event + Label,
{
    until_emitted(actor, WaitOptions::default().resolve(false), emitted_types).await
}

/// [`wait_for_emitted`] with options.
pub async fn wait_for_emitted_with<E>(
    actor: &ActorRef<E>,
    options: WaitOptions<E>,
    emitted_types: &[&str],
) -> crate::Result<Vec<E>>
where
    E: Event + Label,
{
    until_emitted(actor, options.resolve(false), emitted_types).await
}

async fn until_emitted<E>(
    actor: &ActorRef<E>,
    opts: Resolved<E>,
    emitted_types: &[&str],
) -> crate::Result<Vec<E>>
where
    E: Event + Label,
{
    let expected: Vec<String> = emitted_types.iter().map(|s| s.to_string()).collect();
    let message = opts
        .timeout_ms()
        .map(|ms| format!("Event not emitted in {ms}ms"));

    await_condition(actor, &opts, message, |settler, signal| {
        let matcher = Arc::new(OrderedMatcher::new(
            expected,
            |event: &E, front: &String| (event.label() == *front).then(|| event.clone()),
            None,
            |remaining| {
                format!(
                    "Event(s) not emitted before actor completed: {}",
                    remaining.join(", ")
                )
            },
            settler.clone(),
            signal.clone(),
        )?);

        let emitted = {
            let matcher = matcher.clone();
            actor.on_emitted(move |event| matcher.observe(event))
        };
        let hook = driver_hook(actor, settler, signal, |_| {}, move || matcher.on_complete());
        let inspector = inspect_with(actor, &opts, Some(hook));

        Ok(vec![emitted, inspector])
    })
    .await
}
