use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex, Weak,
        atomic::{AtomicU64, Ordering},
    },
};

use uuid::Uuid;

use crate::overlay::PatchRecord;

use super::{
    ActorId, Event, InspectionEvent, Subscription,
    actor_ref::{ActorRef, ActorShared, LoggerFn},
};

/// Callback receiving every inspection event of an actor tree.
pub type InspectorFn<E> = Arc<dyn Fn(&InspectionEvent<E>) + Send + Sync>;

/// Shared state of one actor tree.
///
/// Created implicitly by [`create_actor`](crate::create_actor); children
/// spawned from within the tree join the same system. Holds the single
/// inspection point, the system-wide logger slot (which is also the root
/// actor's logger), the instrumentation patch arena and the anonymous-id
/// counter.
pub struct ActorSystem<E: Event> {
    pub(crate) shared: Arc<SystemShared<E>>,
}

impl<E: Event> Clone for ActorSystem<E> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

pub(crate) struct SystemShared<E: Event> {
    /// System-wide logger slot. The root actor's slot is this very value.
    pub(crate) logger: Arc<Mutex<Option<LoggerFn>>>,
    inspectors: Mutex<Vec<(Uuid, InspectorFn<E>)>>,
    /// Serializes inspection delivery so every subscriber observes the same
    /// total order even with actors on different tasks.
    dispatch: Mutex<()>,
    pub(crate) patches: Mutex<HashMap<ActorId, Vec<PatchRecord>>>,
    registry: Mutex<HashMap<ActorId, Weak<ActorShared<E>>>>,
    anon_counter: AtomicU64,
}

impl<E: Event> ActorSystem<E> {
    pub(crate) fn new() -> Self {
        Self {
            shared: Arc::new(SystemShared {
                logger: Arc::new(Mutex::new(None)),
                inspectors: Mutex::new(Vec::new()),
                dispatch: Mutex::new(()),
                patches: Mutex::new(HashMap::new()),
                registry: Mutex::new(HashMap::new()),
                anon_counter: AtomicU64::new(0),
            }),
        }
    }

    /// Install an inspection callback for the whole tree.
    ///
    /// This is the single inspection point: there is no way to inspect only
    /// one actor. The callback fires for events that occur after this call.
    pub fn inspect(&self, inspector: InspectorFn<E>) -> Subscription {
        let id = Uuid::new_v4();
        self.shared
            .inspectors
            .lock()
            .unwrap()
            .push((id, inspector));
        let shared = Arc::downgrade(&self.shared);
        Subscription::new(move || {
            if let Some(shared) = shared.upgrade() {
                shared
                    .inspectors
                    .lock()
                    .unwrap()
                    .retain(|(sid, _)| *sid != id);
            }
        })
    }

    /// Deliver one inspection event to every subscriber, synchronously and
    /// under the dispatch lock. Subscribers may subscribe/unsubscribe or
    /// patch actors from within the callback, but must not publish.
    pub(crate) fn publish(&self, event: InspectionEvent<E>) {
        let _ordered = self.shared.dispatch.lock().unwrap();
        let subscribers: Vec<InspectorFn<E>> = self
            .shared
            .inspectors
            .lock()
            .unwrap()
            .iter()
            .map(|(_, f)| f.clone())
            .collect();
        for subscriber in subscribers {
            subscriber(&event);
        }
    }

    pub fn logger(&self) -> Option<LoggerFn> {
        self.shared.logger.lock().unwrap().clone()
    }

    /// Replace the system-wide logger, returning the previous one.
    pub fn set_logger(&self, logger: Option<LoggerFn>) -> Option<LoggerFn> {
        std::mem::replace(&mut *self.shared.logger.lock().unwrap(), logger)
    }

    /// Look up a live actor by id.
    pub fn actor(&self, id: &str) -> Option<ActorRef<E>> {
        let registry = self.shared.registry.lock().unwrap();
        registry
            .get(&ActorId::from(id))
            .and_then(Weak::upgrade)
            .map(|shared| ActorRef { shared })
    }

    pub(crate) fn register(&self, id: ActorId, actor: Weak<ActorShared<E>>) {
        self.shared.registry.lock().unwrap().insert(id, actor);
    }

    pub(crate) fn unregister(&self, id: &ActorId) {
        self.shared.registry.lock().unwrap().remove(id);
    }

    pub(crate) fn next_anonymous_id(&self) -> String {
        let n = self.shared.anon_counter.fetch_add(1, Ordering::Relaxed);
        format!("actor-{n}")
    }
}
