use std::marker::PhantomData;

use crate::runtime::{
    Actor, ActorLogic, ActorSystem, Event, InspectorFn, LoggerFn, task::spawn_actor,
};

/// Options for [`create_actor`].
pub struct CreateActorOptions<E: Event> {
    /// Actor id; an `actor-{n}` fallback is generated when absent.
    pub id: Option<String>,
    /// Initial system-wide logger.
    pub logger: Option<LoggerFn>,
    /// Inspector subscribed before the actor can produce any event.
    pub inspector: Option<InspectorFn<E>>,
}

impl<E: Event> Default for CreateActorOptions<E> {
    fn default() -> Self {
        Self {
            id: None,
            logger: None,
            inspector: None,
        }
    }
}

impl<E: Event> CreateActorOptions<E> {
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_logger(mut self, logger: LoggerFn) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_inspector(mut self, inspector: InspectorFn<E>) -> Self {
        self.inspector = Some(inspector);
        self
    }
}

/// Construct a root actor (and its system) without starting it.
///
/// The actor's logic runs only after `start()` - the conditions call it for
/// you. Must be called within a Tokio runtime.
pub fn create_actor<E, L>(logic: L, options: CreateActorOptions<E>) -> Actor<E, L::Output>
where
    E: Event,
    L: ActorLogic<E>,
{
    let system = ActorSystem::new();
    let mut subscriptions = Vec::new();
    if let Some(inspector) = options.inspector {
        subscriptions.push(system.inspect(inspector));
    }
    if let Some(logger) = options.logger {
        system.set_logger(Some(logger));
    }
    let actor = spawn_actor(&system, Box::new(logic), options.id, None, false);
    Actor {
        actor,
        subscriptions,
        _output: PhantomData,
    }
}
