use std::sync::Arc;

use crate::completion::{AbortSignal, CompletionKit, Settler};
use crate::options::Resolved;
use crate::overlay::{PatchOptions, Patcher, patch_actor};
use crate::runtime::{ActorRef, ActorStatus, Event, InspectionEvent, InspectorFn, Subscription};
use crate::timer::start_timer;
use crate::Error;

/// The shared skeleton of every stream-matched condition: create the
/// completion kit, install the driver's listeners, arm the deadline, start
/// the actor and await exactly one settlement. Cleanup runs no matter which
/// path settled: listeners drop, the timer disarms through the signal, and
/// the actor stops on failure or per the driver's stop policy.
///
/// `setup` runs before the actor starts; contract violations it returns
/// surface synchronously, without any asynchronous work having begun.
pub(crate) async fn await_condition<E, T, S>(
    actor: &ActorRef<E>,
    opts: &Resolved<E>,
    timeout_message: Option<String>,
    setup: S,
) -> crate::Result<T>
where
    E: Event,
    T: Send + 'static,
    S: FnOnce(&Settler<T>, &AbortSignal) -> crate::Result<Vec<Subscription>>,
{
    let kit = CompletionKit::new(None);
    let subscriptions = setup(&kit.settler(), &kit.signal())?;

    let stopper = actor.clone();
    start_timer(
        &kit.signal(),
        opts.timeout,
        timeout_message,
        Some(Box::new(move || stopper.stop())),
    );

    actor.start();
    let result = kit.settled().await;
    drop(subscriptions);

    match &result {
        Ok(_) if opts.stop => actor.stop(),
        Err(_) => actor.stop(),
        Ok(_) => {}
    }
    result
}

/// Subscribe the condition's inspector: chains the caller's inspector (when
/// supplied), feeds the idempotent-additive patch overlay, then the driver's
/// hook. Also patches the root's logger up front so log lines emitted before
/// the first inspection event aren't lost.
pub(crate) fn inspect_with<E: Event>(
    actor: &ActorRef<E>,
    opts: &Resolved<E>,
    hook: Option<InspectorFn<E>>,
) -> Subscription {
    if opts.logger.is_some() {
        patch_actor(
            actor,
            &PatchOptions {
                logger: opts.logger.clone(),
                inspector: None,
            },
        );
    }
    let patcher = Patcher::new(opts.logger.clone());
    patcher.seed(actor);

    let user = opts.inspector.clone();
    actor.system().inspect(Arc::new(move |event| {
        if let Some(user) = &user {
            user(event);
        }
        patcher.observe(event);
        if let Some(hook) = &hook {
            hook(event);
        }
    }))
}

/// Build the driver hook shared by the stream-matched conditions: routes the
/// watched actor's terminal event to rejection (underlying failure) or the
/// driver's completion handler, and everything else to the driver's matcher.
/// Becomes a no-op once the signal has aborted.
pub(crate) fn driver_hook<E, T>(
    actor: &ActorRef<E>,
    settler: &Settler<T>,
    signal: &AbortSignal,
    on_event: impl Fn(&InspectionEvent<E>) + Send + Sync + 'static,
    on_complete: impl Fn() + Send + Sync + 'static,
) -> InspectorFn<E>
where
    E: Event,
    T: Send + 'static,
{
    let target = actor.id().clone();
    let settler = settler.clone();
    let signal = signal.clone();
    Arc::new(move |event| {
        if signal.is_aborted() {
            return;
        }
        if let InspectionEvent::ActorStopped { actor, status } = event {
            if actor.id() == &target {
                if *status == ActorStatus::Failed {
                    let cause = actor
                        .snapshot()
                        .error
                        .unwrap_or_else(|| Arc::new(Error::Aborted));
                    settler.reject(Error::ActorFailed(cause));
                } else {
                    on_complete();
                }
                return;
            }
        }
        on_event(event);
    })
}
