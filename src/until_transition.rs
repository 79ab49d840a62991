use std::sync::Arc;

use crate::condition::{await_condition, driver_hook, inspect_with};
use crate::matcher::OrderedMatcher;
use crate::options::{Resolved, WaitOptions};
use crate::runtime::{ActorRef, Event, InspectionEvent, Label};
use crate::Error;

/// Runs a machine actor until it takes a transition from the `source` state
/// to the `target` state, then stops it.
///
/// Both state ids are validated against the machine's state-id index before
/// anything starts; an unknown id fails synchronously with
/// [`Error::UnknownStateId`]. Only the direct transition counts - reaching
/// `target` from `source` through an intermediate state does not resolve.
pub async fn run_until_transition<E>(
    actor: &ActorRef<E>,
    source: &str,
    target: &str,
) -> crate::Result<()>
where
    E: Event + Label,
{
    until_transition(actor, WaitOptions::default().resolve(true), source, target).await
}

/// [`run_until_transition`] with options.
pub async fn run_until_transition_with<E>(
    actor: &ActorRef<E>,
    options: WaitOptions<E>,
    source: &str,
    target: &str,
) -> crate::Result<()>
where
    E: Event + Label,
{
    until_transition(actor, options.resolve(true), source, target).await
}

/// Like [`run_until_transition`], but leaves the actor running on success.
pub async fn wait_for_transition<E>(
    actor: &ActorRef<E>,
    source: &str,
    target: &str,
) -> crate::Result<()>
where
    E: Event + Label,
{
    until_transition(actor, WaitOptions::default().resolve(false), source, target).await
}

/// [`wait_for_transition`] with options.
pub async fn wait_for_transition_with<E>(
    actor: &ActorRef<E>,
    options: WaitOptions<E>,
    source: &str,
    target: &str,
) -> crate::Result<()>
where
    E: Event + Label,
{
    until_transition(actor, options.resolve(false), source, target).await
}

#[derive(Clone)]
struct TransitionPair {
    source: Arc<str>,
    target: Arc<str>,
}

async fn until_transition<E>(
    actor: &ActorRef<E>,
    opts: Resolved<E>,
    source: &str,
    target: &str,
) -> crate::Result<()>
where
    E: Event + Label,
{
    let index = actor
        .state_index()
        .ok_or_else(|| Error::UnknownStateId(source.to_string()))?;
    for id in [source, target] {
        if !index.contains(id) {
            return Err(Error::UnknownStateId(id.to_string()));
        }
    }

    let pair = TransitionPair {
        source: Arc::from(source),
        target: Arc::from(target),
    };
    let message = opts.timeout_ms().map(|ms| {
        format!("Transition from {source} to {target} not detected in {ms}ms")
    });

    await_condition(actor, &opts, message, |settler, signal| {
        let watched = actor.id().clone();
        let matcher = Arc::new(OrderedMatcher::new(
            vec![pair],
            move |event: &InspectionEvent<E>, pair: &TransitionPair| match event {
                InspectionEvent::Microstep { actor, transitions }
                    if actor.id() == &watched
                        && transitions.iter().any(|t| {
                            t.source == pair.source
                                && t.targets.iter().any(|id| *id == pair.target)
                        }) =>
                {
                    Some(())
                }
                _ => None,
            },
            None,
            |remaining| {
                let pair = &remaining[0];
                format!(
                    "Transition from {} to {} not detected before actor completion",
                    pair.source, pair.target
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
    .map(|_: Vec<()>| ())
}
