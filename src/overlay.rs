use std::{
    collections::HashSet,
    sync::Mutex,
};

use crate::runtime::{
    ActorId, ActorRef, Event, InspectionEvent, InspectorFn, LoggerFn, Subscription,
};

/// What to install on an actor (tree) when patching.
pub struct PatchOptions<E: Event> {
    pub logger: Option<LoggerFn>,
    pub inspector: Option<InspectorFn<E>>,
}

impl<E: Event> Default for PatchOptions<E> {
    fn default() -> Self {
        Self {
            logger: None,
            inspector: None,
        }
    }
}

impl<E: Event> PatchOptions<E> {
    pub fn with_logger(mut self, logger: LoggerFn) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_inspector(mut self, inspector: InspectorFn<E>) -> Self {
        self.inspector = Some(inspector);
        self
    }
}

/// One reversible attachment: what to restore on `unpatch_actor`.
///
/// `prev_logger` is `Some` only when the logger was actually replaced; its
/// inner value is the slot's prior content (which may itself be empty).
pub(crate) struct PatchRecord {
    prev_logger: Option<Option<LoggerFn>>,
    subscription: Option<Subscription>,
}

/// Attach a logger and/or inspector to `actor`, recording how to undo it.
///
/// The inspector always subscribes system-wide - the runtime exposes a
/// single inspection point per tree. The logger is scoped: a child actor
/// gets only its own logger slot replaced, while patching the root replaces
/// the system-wide logger. Repeated calls stack; [`unpatch_actor`] pops in
/// reverse order.
pub fn patch_actor<E: Event>(actor: &ActorRef<E>, options: &PatchOptions<E>) {
    let mut record = PatchRecord {
        prev_logger: None,
        subscription: None,
    };

    if let Some(inspector) = &options.inspector {
        record.subscription = Some(actor.system().inspect(inspector.clone()));
    }

    if let Some(logger) = &options.logger {
        let previous = if actor.is_root() {
            actor.system().set_logger(Some(logger.clone()))
        } else {
            let slot = actor.logger_slot();
            let mut slot = slot.lock().unwrap();
            std::mem::replace(&mut *slot, Some(logger.clone()))
        };
        record.prev_logger = Some(previous);
    }

    if record.prev_logger.is_none() && record.subscription.is_none() {
        return;
    }

    let system = actor.system();
    let mut patches = system.shared.patches.lock().unwrap();
    patches.entry(actor.id().clone()).or_default().push(record);
}

/// Undo the most recent [`patch_actor`] call for `actor`: restore the
/// logger that was in place immediately before it and drop the inspector
/// subscription it owns. LIFO - after two attaches, one detach restores the
/// first-attached logger, not the original. Identity when the actor was
/// never patched.
pub fn unpatch_actor<E: Event>(actor: &ActorRef<E>) {
    let record = {
        let system = actor.system();
        let mut patches = system.shared.patches.lock().unwrap();
        let Some(stack) = patches.get_mut(actor.id()) else {
            return;
        };
        let record = stack.pop();
        if stack.is_empty() {
            patches.remove(actor.id());
        }
        record
    };
    let Some(record) = record else { return };

    if let Some(previous) = record.prev_logger {
        if actor.is_root() {
            actor.system().set_logger(previous);
        } else {
            *actor.logger_slot().lock().unwrap() = previous;
        }
    }
    drop(record.subscription);
}

/// Idempotent-additive overlay used by the condition drivers.
///
/// Fed every inspection event, it patches each actor the first time it is
/// seen by this instance - the same inspector callback receives events for
/// the whole tree, so logger-patching must be applied per newly-observed
/// actor as spawns are discovered, not just at condition start. When no
/// logger was supplied, nothing is attached at all.
pub(crate) struct Patcher {
    seen: Mutex<HashSet<ActorId>>,
    logger: Option<LoggerFn>,
}

impl Patcher {
    pub fn new(logger: Option<LoggerFn>) -> Self {
        Self {
            seen: Mutex::new(HashSet::new()),
            logger,
        }
    }

    /// Mark an actor as already instrumented (the condition's own target).
    pub fn seed<E: Event>(&self, actor: &ActorRef<E>) {
        self.seen.lock().unwrap().insert(actor.id().clone());
    }

    pub fn observe<E: Event>(&self, event: &InspectionEvent<E>) {
        let actor = event.actor();
        if !self.seen.lock().unwrap().insert(actor.id().clone()) {
            return;
        }
        if self.logger.is_some() {
            patch_actor(
                actor,
                &PatchOptions {
                    logger: self.logger.clone(),
                    inspector: None,
                },
            );
        }
    }
}
