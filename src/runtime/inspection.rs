use std::sync::Arc;

use super::{ActorId, ActorRef, ActorStatus, Event};

/// One state transition taken within a microstep.
#[derive(Debug, Clone)]
pub struct TransitionRecord {
    pub source: Arc<str>,
    pub targets: Vec<Arc<str>>,
}

/// A lifecycle event observed on the shared inspection channel.
///
/// The channel is the single inspection point per actor tree: every
/// subscriber sees every event for the root and all of its descendants, in
/// the same total order. Delivery is synchronous; subscribers must not block.
#[derive(Clone)]
pub enum InspectionEvent<E: Event> {
    /// A new actor started running. Emitted once per spawn, including the
    /// root.
    ActorRegistered { actor: ActorRef<E> },

    /// An event was delivered to `target`. `source` is the sending actor,
    /// or `None` when the event was injected from outside the tree.
    EventDelivered {
        source: Option<ActorId>,
        target: ActorRef<E>,
        event: E,
    },

    /// A machine actor evaluated one atomic transition step.
    Microstep {
        actor: ActorRef<E>,
        transitions: Vec<TransitionRecord>,
    },

    /// The actor reached a terminal status.
    ActorStopped {
        actor: ActorRef<E>,
        status: ActorStatus,
    },
}

impl<E: Event> InspectionEvent<E> {
    /// The actor this event is about (the target for deliveries).
    pub fn actor(&self) -> &ActorRef<E> {
        match self {
            Self::ActorRegistered { actor } => actor,
            Self::EventDelivered { target, .. } => target,
            Self::Microstep { actor, .. } => actor,
            Self::ActorStopped { actor, .. } => actor,
        }
    }
}

impl<E: Event> std::fmt::Debug for InspectionEvent<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ActorRegistered { actor } => {
                f.debug_struct("ActorRegistered").field("actor", actor.id()).finish()
            }
            Self::EventDelivered { source, target, .. } => f
                .debug_struct("EventDelivered")
                .field("source", source)
                .field("target", target.id())
                .finish(),
            Self::Microstep { actor, transitions } => f
                .debug_struct("Microstep")
                .field("actor", actor.id())
                .field("transitions", transitions)
                .finish(),
            Self::ActorStopped { actor, status } => f
                .debug_struct("ActorStopped")
                .field("actor", actor.id())
                .field("status", status)
                .finish(),
        }
    }
}
