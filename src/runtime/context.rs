use std::sync::Arc;

use tokio::sync::mpsc;

use crate::Error;

use super::{
    ActorLogic, ActorRef, Delivery, Event, InspectionEvent, TransitionRecord,
    logic::DynLogic,
    task::spawn_actor,
};

/// Runtime-provided context for an actor's logic to interact with its tree.
///
/// Owned by the logic for the duration of [`ActorLogic::run`]. Receiving,
/// emitting, spawning and sending all echo onto the system's inspection
/// channel as a side effect, which is what the condition engine observes.
pub struct ActorContext<E: Event> {
    actor: ActorRef<E>,
    receiver: mpsc::Receiver<Delivery<E>>,
}

impl<E: Event> ActorContext<E> {
    pub(crate) fn new(actor: ActorRef<E>, receiver: mpsc::Receiver<Delivery<E>>) -> Self {
        Self { actor, receiver }
    }

    pub fn actor(&self) -> &ActorRef<E> {
        &self.actor
    }

    /// Await the next event delivered to this actor. Publishes the delivery
    /// on the inspection channel before handing it over.
    pub async fn recv(&mut self) -> Option<Delivery<E>> {
        let delivery = self.receiver.recv().await?;
        self.actor.system().publish(InspectionEvent::EventDelivered {
            source: delivery.source.clone(),
            target: self.actor.clone(),
            event: delivery.event.clone(),
        });
        Some(delivery)
    }

    /// Broadcast an event to this actor's emitted-event listeners.
    pub fn emit(&self, event: &E) {
        self.actor.emit(event);
    }

    /// Log through this actor's (patchable) logger.
    pub fn log(&self, message: &str) {
        self.actor.log(message);
    }

    /// Spawn a child actor in the same system. Children start immediately
    /// and are stopped when this actor stops.
    pub fn spawn<L: ActorLogic<E>>(&self, id: Option<&str>, logic: L) -> ActorRef<E> {
        self.spawn_boxed(id, Box::new(logic))
    }

    pub(crate) fn spawn_boxed(&self, id: Option<&str>, logic: Box<dyn DynLogic<E>>) -> ActorRef<E> {
        spawn_actor(
            self.actor.system(),
            logic,
            id.map(String::from),
            Some(&self.actor),
            true,
        )
    }

    /// Send an event to another actor in this system, carrying this actor's
    /// identity as the source.
    pub async fn send_to(&self, target: &str, event: E) -> crate::Result<()> {
        let Some(target) = self.actor.system().actor(target) else {
            return Err(Error::UnknownActor(target.into()));
        };
        target.send_from(self.actor.id().clone(), event).await
    }

    pub(crate) fn set_state(&self, state: Arc<str>) {
        self.actor
            .shared
            .snapshot
            .send_modify(|snap| snap.state = Some(state));
    }

    pub(crate) fn publish_microstep(&self, source: Arc<str>, target: Arc<str>) {
        self.actor.system().publish(InspectionEvent::Microstep {
            actor: self.actor.clone(),
            transitions: vec![TransitionRecord {
                source,
                targets: vec![target],
            }],
        });
    }
}
