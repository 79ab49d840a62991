use std::sync::Arc;

use crate::condition::{await_condition, driver_hook, inspect_with};
use crate::matcher::OrderedMatcher;
use crate::options::{Resolved, WaitOptions};
use crate::runtime::{ActorRef, Event, InspectionEvent, Label};

/// Runs an actor until events of the given types have been delivered to it,
/// in order, then stops it. Resolves with the matching events.
///
/// Use [`WaitOptions::with_other_actor`] to additionally require a specific
/// sender; deliveries from anyone else are ignored without consuming the
/// expectation.
pub async fn run_until_event_received<E>(
    actor: &ActorRef<E>,
    event_types: &[&str],
) -> crate::Result<Vec<E>>
where
    E: Event + Label,
{
    until_event_received(actor, WaitOptions::default().resolve(true), event_types).await
}

/// [`run_until_event_received`] with options.
pub async fn run_until_event_received_with<E>(
    actor: &ActorRef<E>,
    options: WaitOptions<E>,
    event_types: &[&str],
) -> crate::Result<Vec<E>>
where
    E: Event + Label,
{
    until_event_received(actor, options.resolve(true), event_types).await
}

/// Like [`run_until_event_received`], but leaves the actor running on
/// success.
pub async fn wait_for_event_received<E>(
    actor: &ActorRef<E>,
    event_types: &[&str],
) -> crate::Result<Vec<E>>
where
    E: Event + Label,
{
    until_event_received(actor, WaitOptions::default().resolve(false), event_types).await
}

/// [`wait_for_event_received`] with options.
pub async fn wait_for_event_received_with<E>(
    actor: &ActorRef<E>,
    options: WaitOptions<E>,
    event_types: &[&str],
) -> crate::Result<Vec<E>>
where
    E: Event + Label,
{
    until_event_received(actor, options.resolve(false), event_types).await
}

async fn until_event_received<E>(
    actor: &ActorRef<E>,
    opts: Resolved<E>,
    event_types: &[&str],
) -> crate::Result<Vec<E>>
where
    E: Event + Label,
{
    let expected: Vec<String> = event_types.iter().map(|s| s.to_string()).collect();
    let message = opts
        .timeout_ms()
        .map(|ms| format!("Event(s) not received in {ms}ms"));

    await_condition(actor, &opts, message, |settler, signal| {
        let target = actor.id().clone();
        let sender = opts.other_actor_id.clone();

        let matcher = Arc::new(OrderedMatcher::new(
            expected,
            move |event: &InspectionEvent<E>, front: &String| match event {
                InspectionEvent::EventDelivered {
                    target: delivered_to,
                    event,
                    ..
                } if delivered_to.id() == &target && event.label().as_ref() == front => {
                    Some(event.clone())
                }
                _ => None,
            },
            sender.map(|sender| -> Box<dyn Fn(&InspectionEvent<E>) -> bool + Send + Sync> {
                Box::new(move |event| match event {
                    InspectionEvent::EventDelivered { source, .. } => {
                        source.as_ref().is_some_and(|s| s.name() == sender)
                    }
                    _ => false,
                })
            }),
            |remaining| {
                format!(
                    "Event(s) not received before actor completed: {}",
                    remaining.join(", ")
                )
            },
            settler.clone(),
            signal.clone(),
        )?);

        let hook = {
            let matcher = matcher.clone();
            let completer = matcher.clone();
            driver_hook(
                actor,
                settler,
                signal,
                move |event| matcher.observe(event),
                move || completer.on_complete(),
            )
        };
        Ok(vec![inspect_with(actor, &opts, Some(hook))])
    })
    .await
}
