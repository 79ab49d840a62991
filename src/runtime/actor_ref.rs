use std::{
    any::Any,
    collections::HashSet,
    marker::PhantomData,
    ops::Deref,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use tokio::sync::{Notify, mpsc, watch};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::Error;

use super::{
    ActorId, ActorStatus, Event, Label, Snapshot, Subscription, system::ActorSystem,
};

/// Type-erased terminal output of an actor.
pub type AnyOutput = Arc<dyn Any + Send + Sync>;

/// Domain logger callback, the thing the instrumentation overlay patches.
/// Distinct from `tracing`, which the runtime uses for its own diagnostics.
pub type LoggerFn = Arc<dyn Fn(&str) + Send + Sync>;

/// An event together with the identity of its sender, queued in a mailbox.
#[derive(Clone)]
pub struct Delivery<E: Event> {
    /// `None` when the event was injected from outside the actor tree.
    pub source: Option<ActorId>,
    pub event: E,
}

/// Failure shapes of [`ActorRef::wait_for`], the snapshot-wait primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WaitError {
    #[error("timeout waiting for snapshot")]
    Timeout,
    #[error("actor terminated without satisfying predicate")]
    Terminated,
}

type EmittedListener<E> = (Uuid, Arc<dyn Fn(&E) + Send + Sync>);

pub(crate) struct ActorShared<E: Event> {
    pub(crate) id: ActorId,
    pub(crate) parent: Option<ActorId>,
    pub(crate) system: ActorSystem<E>,
    pub(crate) mailbox: mpsc::Sender<Delivery<E>>,
    pub(crate) snapshot: watch::Sender<Snapshot>,
    /// For the root actor this is the system's logger slot itself.
    pub(crate) logger: Arc<Mutex<Option<LoggerFn>>>,
    emitted: Mutex<Vec<EmittedListener<E>>>,
    pub(crate) started: Notify,
    pub(crate) start_flag: AtomicBool,
    pub(crate) token: CancellationToken,
    pub(crate) state_index: Option<Arc<HashSet<Arc<str>>>>,
}

impl<E: Event> ActorShared<E> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: ActorId,
        parent: Option<ActorId>,
        system: ActorSystem<E>,
        mailbox: mpsc::Sender<Delivery<E>>,
        snapshot: watch::Sender<Snapshot>,
        logger: Arc<Mutex<Option<LoggerFn>>>,
        token: CancellationToken,
        state_index: Option<Arc<HashSet<Arc<str>>>>,
    ) -> Self {
        Self {
            id,
            parent,
            system,
            mailbox,
            snapshot,
            logger,
            emitted: Mutex::new(Vec::new()),
            started: Notify::new(),
            start_flag: AtomicBool::new(false),
            token,
            state_index,
        }
    }
}

/// A cheap, clonable handle to a live (or finished) actor.
///
/// Handles identify actors in inspection events, let tests inject events
/// while a condition is pending, and expose the lifecycle surface the
/// condition engine builds on: `start`, `stop`, `send`, `subscribe`, `on`,
/// `completion` and `wait_for`.
pub struct ActorRef<E: Event> {
    pub(crate) shared: Arc<ActorShared<E>>,
}

impl<E: Event> Clone for ActorRef<E> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<E: Event> PartialEq for ActorRef<E> {
    fn eq(&self, other: &Self) -> bool {
        self.shared.id == other.shared.id
    }
}

impl<E: Event> std::fmt::Debug for ActorRef<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActorRef").field("id", &self.shared.id).finish()
    }
}

impl<E: Event> ActorRef<E> {
    #[inline]
    pub fn id(&self) -> &ActorId {
        &self.shared.id
    }

    pub fn parent_id(&self) -> Option<&ActorId> {
        self.shared.parent.as_ref()
    }

    /// Whether this actor is the root of its system.
    pub fn is_root(&self) -> bool {
        self.shared.parent.is_none()
    }

    pub fn system(&self) -> &ActorSystem<E> {
        &self.shared.system
    }

    /// State-id index of the underlying machine, if the actor runs one.
    pub fn state_index(&self) -> Option<&Arc<HashSet<Arc<str>>>> {
        self.shared.state_index.as_ref()
    }

    /// Begin executing the actor's logic. Idempotent.
    pub fn start(&self) {
        if !self.shared.start_flag.swap(true, Ordering::AcqRel) {
            self.shared.started.notify_one();
        }
    }

    /// Request the actor (and its descendants) to stop. Idempotent;
    /// a no-op on actors that already reached a terminal status.
    pub fn stop(&self) {
        self.shared.snapshot.send_if_modified(|snap| {
            if snap.status.is_terminal() {
                false
            } else {
                snap.status = ActorStatus::Stopped;
                true
            }
        });
        self.shared.token.cancel();
    }

    /// Send an event to this actor from outside the tree.
    pub async fn send(&self, event: E) -> crate::Result<()> {
        self.deliver(Delivery {
            source: None,
            event,
        })
        .await
    }

    pub(crate) async fn send_from(&self, source: ActorId, event: E) -> crate::Result<()> {
        self.deliver(Delivery {
            source: Some(source),
            event,
        })
        .await
    }

    async fn deliver(&self, delivery: Delivery<E>) -> crate::Result<()> {
        self.shared
            .mailbox
            .send(delivery)
            .await
            .map_err(|e| Error::SendError(e.to_string()))
    }

    /// Current snapshot, cloned from the watch channel.
    pub fn snapshot(&self) -> Snapshot {
        self.shared.snapshot.borrow().clone()
    }

    /// Watch snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.shared.snapshot.subscribe()
    }

    /// Listen for every event this actor emits, regardless of type.
    pub fn on_emitted(&self, listener: impl Fn(&E) + Send + Sync + 'static) -> Subscription {
        self.add_emitted_listener(Arc::new(listener))
    }

    fn add_emitted_listener(&self, listener: Arc<dyn Fn(&E) + Send + Sync>) -> Subscription {
        let id = Uuid::new_v4();
        self.shared.emitted.lock().unwrap().push((id, listener));
        let shared = Arc::downgrade(&self.shared);
        Subscription::new(move || {
            if let Some(shared) = shared.upgrade() {
                shared
                    .emitted
                    .lock()
                    .unwrap()
                    .retain(|(lid, _)| *lid != id);
            }
        })
    }

    /// Dispatch an emitted event to this actor's listeners, synchronously.
    pub(crate) fn emit(&self, event: &E) {
        let listeners: Vec<Arc<dyn Fn(&E) + Send + Sync>> = self
            .shared
            .emitted
            .lock()
            .unwrap()
            .iter()
            .map(|(_, f)| f.clone())
            .collect();
        for listener in listeners {
            listener(event);
        }
    }

    /// Invoke this actor's logger, falling back to a `tracing` debug line
    /// when none is installed.
    pub fn log(&self, message: &str) {
        let logger = self.shared.logger.lock().unwrap().clone();
        match logger {
            Some(logger) => logger(message),
            None => tracing::debug!(actor = %self.shared.id, "{message}"),
        }
    }

    pub(crate) fn logger_slot(&self) -> &Arc<Mutex<Option<LoggerFn>>> {
        &self.shared.logger
    }

    /// Resolves when the actor reaches a terminal status: `Some(output)` for
    /// done, `None` for stopped, `Err` when the actor's own logic failed.
    pub async fn completion(&self) -> crate::Result<Option<AnyOutput>> {
        let mut rx = self.subscribe();
        loop {
            {
                let snap = rx.borrow_and_update().clone();
                match snap.status {
                    ActorStatus::Done => return Ok(snap.output),
                    ActorStatus::Stopped => return Ok(None),
                    ActorStatus::Failed => {
                        let cause = snap.error.unwrap_or_else(|| Arc::new(Error::Aborted));
                        return Err(Error::ActorFailed(cause));
                    }
                    _ => {}
                }
            }
            if rx.changed().await.is_err() {
                return Ok(None);
            }
        }
    }

    /// Wait until a snapshot satisfies `predicate`, with an optional
    /// deadline. This is the primitive the snapshot condition adapts; its
    /// two failure shapes are [`WaitError::Timeout`] and
    /// [`WaitError::Terminated`].
    pub async fn wait_for<F>(
        &self,
        mut predicate: F,
        timeout: Option<Duration>,
    ) -> std::result::Result<Snapshot, WaitError>
    where
        F: FnMut(&Snapshot) -> bool,
    {
        let mut rx = self.subscribe();
        let wait = async move {
            loop {
                {
                    let snap = rx.borrow_and_update().clone();
                    if predicate(&snap) {
                        return Ok(snap);
                    }
                    if snap.status.is_terminal() {
                        return Err(WaitError::Terminated);
                    }
                }
                if rx.changed().await.is_err() {
                    return Err(WaitError::Terminated);
                }
            }
        };
        match timeout {
            Some(limit) => tokio::time::timeout(limit, wait)
                .await
                .unwrap_or(Err(WaitError::Timeout)),
            None => wait.await,
        }
    }
}

impl<E: Event + Label> ActorRef<E> {
    /// Listen for emitted events of one type, by label.
    pub fn on(
        &self,
        label: &str,
        listener: impl Fn(&E) + Send + Sync + 'static,
    ) -> Subscription {
        let label = label.to_string();
        self.add_emitted_listener(Arc::new(move |event: &E| {
            if event.label() == label {
                listener(event);
            }
        }))
    }
}

/// An owned, typed handle to a root actor, as returned by
/// [`create_actor`](crate::create_actor).
///
/// Dereferences to [`ActorRef`] for the untyped surface; additionally knows
/// the logic's output type so terminal output can be recovered without
/// downcasting at the call site. Holds the subscriptions installed through
/// `CreateActorOptions` so they live as long as the handle.
pub struct Actor<E: Event, O> {
    pub(crate) actor: ActorRef<E>,
    pub(crate) subscriptions: Vec<Subscription>,
    pub(crate) _output: PhantomData<fn() -> O>,
}

impl<E: Event, O> Deref for Actor<E, O> {
    type Target = ActorRef<E>;
    fn deref(&self) -> &Self::Target {
        &self.actor
    }
}

impl<E: Event, O> Actor<E, O> {
    /// Clone the untyped handle, e.g. to send events from another task.
    pub fn actor_ref(&self) -> ActorRef<E> {
        self.actor.clone()
    }

    /// Detach the options-installed subscriptions from this handle's
    /// lifetime, keeping them active for the life of the system.
    pub fn forget_subscriptions(&mut self) {
        for sub in self.subscriptions.drain(..) {
            std::mem::forget(sub);
        }
    }
}

impl<E: Event, O: Clone + Send + Sync + 'static> Actor<E, O> {
    /// Terminal output, if the actor is done and produced one.
    pub fn output(&self) -> Option<O> {
        self.actor
            .snapshot()
            .output
            .and_then(|out| out.downcast::<O>().ok())
            .map(|out| (*out).clone())
    }
}

impl<E: Event, O> std::fmt::Debug for Actor<E, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Actor").field("id", self.actor.id()).finish()
    }
}
