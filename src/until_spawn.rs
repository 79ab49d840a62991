use std::sync::Arc;

use crate::condition::{await_condition, driver_hook, inspect_with};
use crate::matcher::OrderedMatcher;
use crate::options::{Resolved, WaitOptions};
use crate::runtime::{ActorRef, Event, InspectionEvent, Label};
use crate::Error;

/// How to match the id of a newly-spawned actor.
#[derive(Clone)]
pub enum IdMatcher {
    /// Exact string equality.
    Exact(String),
    /// Arbitrary predicate over the id.
    Predicate(Arc<dyn Fn(&str) -> bool + Send + Sync>),
}

impl IdMatcher {
    pub fn matching(predicate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self::Predicate(Arc::new(predicate))
    }

    fn matches(&self, id: &str) -> bool {
        match self {
            Self::Exact(expected) => expected == id,
            Self::Predicate(predicate) => predicate(id),
        }
    }
}

impl From<&str> for IdMatcher {
    fn from(id: &str) -> Self {
        Self::Exact(id.to_string())
    }
}

impl From<String> for IdMatcher {
    fn from(id: String) -> Self {
        Self::Exact(id)
    }
}

impl std::fmt::Display for IdMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact(id) => write!(f, "{id}"),
            Self::Predicate(_) => write!(f, "<predicate>"),
        }
    }
}

impl std::fmt::Debug for IdMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "IdMatcher({self})")
    }
}

/// Runs an actor until it (or any of its descendants) spawns an actor whose
/// id matches `target`, then stops it. Resolves with a handle to the
/// spawned actor; the match does not require the spawned actor to do
/// anything further.
pub async fn run_until_spawn<E>(
    actor: &ActorRef<E>,
    target: impl Into<IdMatcher>,
) -> crate::Result<ActorRef<E>>
where
    E: Event + Label,
{
    until_spawn(actor, WaitOptions::default().resolve(true), target.into()).await
}

/// [`run_until_spawn`] with options.
pub async fn run_until_spawn_with<E>(
    actor: &ActorRef<E>,
    options: WaitOptions<E>,
    target: impl Into<IdMatcher>,
) -> crate::Result<ActorRef<E>>
where
    E: Event + Label,
{
    until_spawn(actor, options.resolve(true), target.into()).await
}

/// Like [`run_until_spawn`], but leaves the actor running on success - e.g.
/// to keep interacting with both parent and child.
pub async fn wait_for_spawn<E>(
    actor: &ActorRef<E>,
    target: impl Into<IdMatcher>,
) -> crate::Result<ActorRef<E>>
where
    E: Event + Label,
{
    until_spawn(actor, WaitOptions::default().resolve(false), target.into()).await
}

/// [`wait_for_spawn`] with options.
pub async fn wait_for_spawn_with<E>(
    actor: &ActorRef<E>,
    options: WaitOptions<E>,
    target: impl Into<IdMatcher>,
) -> crate::Result<ActorRef<E>>
where
    E: Event + Label,
{
    until_spawn(actor, options.resolve(false), target.into()).await
}

async fn until_spawn<E>(
    actor: &ActorRef<E>,
    opts: Resolved<E>,
    target: IdMatcher,
) -> crate::Result<ActorRef<E>>
where
    E: Event + Label,
{
    let message = opts.timeout_ms().map(|ms| {
        format!("Failed to detect a spawned actor matching {target} in {ms}ms")
    });

    let mut matched = await_condition(actor, &opts, message, |settler, signal| {
        let matcher = Arc::new(OrderedMatcher::new(
            vec![target],
            |event: &InspectionEvent<E>, target: &IdMatcher| match event {
                InspectionEvent::ActorRegistered { actor } if target.matches(actor.id()) => {
                    Some(actor.clone())
                }
                _ => None,
            },
            None,
            |remaining| {
                format!(
                    "Actor completed before spawning actor matching {}",
                    remaining[0]
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
    .await?;

    matched.pop().ok_or(Error::Aborted)
}
