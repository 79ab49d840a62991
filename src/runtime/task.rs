use std::sync::{
    Arc, Mutex,
    atomic::Ordering,
};

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use super::{
    ActorContext, ActorId, ActorRef, ActorStatus, Delivery, Event, InspectionEvent, Snapshot,
    actor_ref::ActorShared,
    logic::{DynLogic, DynOutcome},
    system::ActorSystem,
};

const MAILBOX_SIZE: usize = 128;

/// Build an actor (shared state + Tokio task) without running its logic yet.
///
/// The task waits for `start()` unless `auto_start` is set (children spawned
/// from a running parent start immediately). Stop tokens are chained, so
/// stopping a parent cancels its whole subtree.
pub(crate) fn spawn_actor<E: Event>(
    system: &ActorSystem<E>,
    logic: Box<dyn DynLogic<E>>,
    id: Option<String>,
    parent: Option<&ActorRef<E>>,
    auto_start: bool,
) -> ActorRef<E> {
    let id = ActorId::new(
        id.unwrap_or_else(|| system.next_anonymous_id()).into(),
    );
    let token = match parent {
        Some(parent) => parent.shared.token.child_token(),
        None => CancellationToken::new(),
    };
    let logger = match parent {
        // The root's logger slot is the system-wide one.
        Some(_) => Arc::new(Mutex::new(None)),
        None => system.shared.logger.clone(),
    };
    let (mailbox_tx, mailbox_rx) = mpsc::channel(MAILBOX_SIZE);
    let (snapshot_tx, _) = watch::channel(Snapshot::idle());

    let shared = Arc::new(ActorShared::new(
        id.clone(),
        parent.map(|p| p.id().clone()),
        system.clone(),
        mailbox_tx,
        snapshot_tx,
        logger,
        token,
        logic.state_index(),
    ));
    system.register(id, Arc::downgrade(&shared));

    let actor = ActorRef { shared };
    if auto_start {
        actor.shared.start_flag.store(true, Ordering::Release);
    }
    tokio::spawn(run_actor(actor.clone(), logic, mailbox_rx));
    actor
}

async fn run_actor<E: Event>(
    actor: ActorRef<E>,
    logic: Box<dyn DynLogic<E>>,
    receiver: mpsc::Receiver<Delivery<E>>,
) {
    let shared = &actor.shared;
    if !shared.start_flag.load(Ordering::Acquire) {
        tokio::select! {
            _ = shared.started.notified() => {}
            _ = shared.token.cancelled() => {
                finalize(&actor, DynOutcome::Stopped);
                return;
            }
        }
    }

    tracing::trace!(actor = %actor.id(), "actor running");
    shared
        .snapshot
        .send_modify(|snap| snap.status = ActorStatus::Running);
    actor
        .system()
        .publish(InspectionEvent::ActorRegistered {
            actor: actor.clone(),
        });

    let ctx = ActorContext::new(actor.clone(), receiver);
    let outcome = tokio::select! {
        result = logic.run_boxed(ctx) => match result {
            Ok(outcome) => outcome,
            Err(error) => DynOutcome::Failed(error),
        },
        _ = shared.token.cancelled() => DynOutcome::Stopped,
    };
    finalize(&actor, outcome);
}

fn finalize<E: Event>(actor: &ActorRef<E>, outcome: DynOutcome) {
    actor.shared.snapshot.send_modify(|snap| {
        if snap.status.is_terminal() {
            return;
        }
        match outcome {
            DynOutcome::Done(output) => {
                snap.status = ActorStatus::Done;
                snap.output = output;
            }
            DynOutcome::Stopped => snap.status = ActorStatus::Stopped,
            DynOutcome::Failed(error) => {
                snap.status = ActorStatus::Failed;
                snap.error = Some(Arc::new(error));
            }
        }
    });

    let status = actor.shared.snapshot.borrow().status;
    tracing::trace!(actor = %actor.id(), %status, "actor finished");
    actor.system().unregister(actor.id());
    actor.system().publish(InspectionEvent::ActorStopped {
        actor: actor.clone(),
        status,
    });
    // Cascade to any children still running.
    actor.shared.token.cancel();
}
