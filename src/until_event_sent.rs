use std::sync::Arc;

use crate::condition::{await_condition, driver_hook, inspect_with};
use crate::matcher::OrderedMatcher;
use crate::options::{Resolved, WaitOptions};
use crate::runtime::{ActorRef, Event, InspectionEvent, Label};

/// Runs an actor until it has sent events of the given types to other actors,
/// in order, then stops it. Resolves with the matching events.
///
/// A "sent" event is one delivered to some other actor in the tree with this
/// actor as its source. Use [`WaitOptions::with_other_actor`] to additionally
/// require a specific recipient.
pub async fn run_until_event_sent<E>(
    actor: &ActorRef<E>,
    event_types: &[&str],
) -> crate::Result<Vec<E>>
where
    E: Event + Label,
{
    until_event_sent(actor, WaitOptions::default().resolve(true), event_types).await
}

/// [`run_until_event_sent`] with options.
pub async fn run_until_event_sent_with<E>(
    actor: &ActorRef<E>,
    options: WaitOptions<E>,
    event_types: &[&str],
) -> crate::Result<Vec<E>>
where
    E: Event + Label,
{
    until_event_sent(actor, options.resolve(true), event_types).await
}

/// Like [`run_until_event_sent`], but leaves the actor running on success.
pub async fn wait_for_event_sent<E>(
    actor: &ActorRef<E>,
    event_types: &[&str],
) -> crate::Result<Vec<E>>
where
    E: Event + Label,
{
    until_event_sent(actor, WaitOptions::default().resolve(false), event_types).await
}

/// [`wait_for_event_sent`] with options.
pub async fn wait_for_event_sent_with<E>(
    actor: &ActorRef<E>,
    options: WaitOptions<E>,
    event_types: &[&str],
) -> crate::Result<Vec<E>>
where
    E: Event + Label,
{
    until_event_sent(actor, options.resolve(false), event_types).await
}

async fn until_event_sent<E>(
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
        .map(|ms| format!("Event(s) not sent in {ms}ms"));

    await_condition(actor, &opts, message, |settler, signal| {
        let source = actor.id().clone();
        let recipient = opts.other_actor_id.clone();

        let matcher = Arc::new(OrderedMatcher::new(
            expected,
            move |event: &InspectionEvent<E>, front: &String| match event {
                InspectionEvent::EventDelivered {
                    source: Some(sent_by),
                    target,
                    event,
                } if sent_by == &source
                    && target.id() != &source
                    && event.label().as_ref() == front =>
                {
                    Some(event.clone())
                }
                _ => None,
            },
            recipient.map(
                |recipient| -> Box<dyn Fn(&InspectionEvent<E>) -> bool + Send + Sync> {
                    Box::new(move |event| match event {
                        InspectionEvent::EventDelivered { target, .. } => {
                            target.id().name() == recipient
                        }
                        _ => false,
                    })
                },
            ),
            |remaining| {
                format!(
                    "Event(s) not sent before actor completed: {}",
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
