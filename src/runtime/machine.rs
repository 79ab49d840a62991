use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
    time::Duration,
};

use crate::Error;

use super::{
    ActorContext, ActorLogic, AnyOutput, Delivery, Event, Label, Outcome,
    logic::DynLogic,
};

type OutputFn = Arc<dyn Fn() -> AnyOutput + Send + Sync>;
type SpawnFn<E> = Arc<dyn Fn() -> Box<dyn DynLogic<E>> + Send + Sync>;

/// An action performed on entering a state.
#[derive(Clone)]
pub enum Action<E: Event> {
    /// Broadcast an event to the actor's own listeners.
    Emit(E),
    /// Write through the actor's (patchable) logger.
    Log(String),
    /// Send an event to another actor in the system, by id.
    SendTo { target: String, event: E },
    /// Spawn a child actor.
    Spawn {
        id: Option<String>,
        logic: SpawnFn<E>,
    },
}

/// One state of a [`Machine`]: entry actions, event-driven transitions,
/// an optional delayed transition, and optionally a final marker + output.
#[derive(Clone)]
pub struct State<E: Event> {
    id: Arc<str>,
    entry: Vec<Action<E>>,
    on: Vec<(String, Arc<str>)>,
    after: Option<(Duration, Arc<str>)>,
    terminal: bool,
    output: Option<OutputFn>,
}

impl<E: Event> State<E> {
    pub fn new(id: &str) -> Self {
        Self {
            id: Arc::from(id),
            entry: Vec::new(),
            on: Vec::new(),
            after: None,
            terminal: false,
            output: None,
        }
    }

    pub fn entry(mut self, action: Action<E>) -> Self {
        self.entry.push(action);
        self
    }

    /// Emit `event` on entering this state.
    pub fn emit(self, event: E) -> Self {
        self.entry(Action::Emit(event))
    }

    pub fn log(self, message: &str) -> Self {
        self.entry(Action::Log(message.to_string()))
    }

    pub fn send_to(self, target: &str, event: E) -> Self {
        self.entry(Action::SendTo {
            target: target.to_string(),
            event,
        })
    }

    /// Spawn a child actor with the given id on entering this state.
    pub fn spawn<L, F>(self, id: Option<&str>, factory: F) -> Self
    where
        L: ActorLogic<E>,
        F: Fn() -> L + Send + Sync + 'static,
    {
        self.entry(Action::Spawn {
            id: id.map(String::from),
            logic: Arc::new(move || Box::new(factory())),
        })
    }

    /// Transition to `target` when an event with the given label arrives.
    pub fn on(mut self, event: &str, target: &str) -> Self {
        self.on.push((event.to_string(), Arc::from(target)));
        self
    }

    /// Transition to `target` after `delay`, unless an event-driven
    /// transition fires first.
    pub fn after(mut self, delay: Duration, target: &str) -> Self {
        self.after = Some((delay, Arc::from(target)));
        self
    }

    /// Mark as a final state: entering it completes the actor.
    pub fn terminal(mut self) -> Self {
        self.terminal = true;
        self
    }

    /// Mark as final and complete with `value` as the actor's output.
    pub fn output<T: Send + Sync + 'static>(mut self, value: T) -> Self {
        let value: AnyOutput = Arc::new(value);
        self.output = Some(Arc::new(move || value.clone()));
        self.terminal = true;
        self
    }
}

/// A small declarative state machine interpreted by an actor task.
///
/// ```ignore
/// let machine = Machine::new("first")
///     .state(State::new("first").after(Duration::from_millis(100), "second"))
///     .state(State::new("second").after(Duration::from_millis(100), "third"))
///     .state(State::new("third").terminal());
/// ```
#[derive(Clone)]
pub struct Machine<E: Event> {
    initial: Arc<str>,
    states: HashMap<Arc<str>, State<E>>,
}

impl<E: Event> Machine<E> {
    pub fn new(initial: &str) -> Self {
        Self {
            initial: Arc::from(initial),
            states: HashMap::new(),
        }
    }

    pub fn state(mut self, state: State<E>) -> Self {
        self.states.insert(state.id.clone(), state);
        self
    }

    pub fn state_ids(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(|id| id.as_ref())
    }
}

impl<E: Event + Label> ActorLogic<E> for Machine<E> {
    type Output = AnyOutput;

    async fn run(self, mut ctx: ActorContext<E>) -> crate::Result<Outcome<AnyOutput>> {
        let mut current = self.initial.clone();
        loop {
            let state = self
                .states
                .get(&current)
                .ok_or_else(|| Error::UnknownStateId(current.to_string()))?;
            ctx.set_state(current.clone());
            for action in &state.entry {
                run_action(&ctx, action).await?;
            }
            if state.terminal {
                return Ok(Outcome::Done(state.output.as_ref().map(|f| f())));
            }
            match next_transition(state, &mut ctx).await {
                Some(target) => {
                    ctx.publish_microstep(current.clone(), target.clone());
                    current = target;
                }
                None => return Ok(Outcome::Stopped),
            }
        }
    }

    fn state_index(&self) -> Option<Arc<HashSet<Arc<str>>>> {
        Some(Arc::new(self.states.keys().cloned().collect()))
    }

    fn erase_output(output: AnyOutput) -> AnyOutput {
        output
    }
}

async fn run_action<E: Event>(ctx: &ActorContext<E>, action: &Action<E>) -> crate::Result<()> {
    match action {
        Action::Emit(event) => ctx.emit(event),
        Action::Log(message) => ctx.log(message),
        Action::SendTo { target, event } => ctx.send_to(target, event.clone()).await?,
        Action::Spawn { id, logic } => {
            ctx.spawn_boxed(id.as_deref(), logic());
        }
    }
    Ok(())
}

/// Wait in `state` until a transition fires. Returns the target state id, or
/// `None` when the mailbox closed (the actor winds down as stopped).
async fn next_transition<E: Event + Label>(
    state: &State<E>,
    ctx: &mut ActorContext<E>,
) -> Option<Arc<str>> {
    if state.on.is_empty() && state.after.is_none() {
        // Passive state: keep consuming deliveries so they stay observable
        // on the inspection channel.
        loop {
            ctx.recv().await?;
        }
    }

    let after = state.after.clone();
    let timer = async move {
        match after {
            Some((delay, target)) => {
                tokio::time::sleep(delay).await;
                target
            }
            None => std::future::pending().await,
        }
    };
    tokio::pin!(timer);

    loop {
        tokio::select! {
            target = &mut timer => return Some(target),
            delivery = ctx.recv() => {
                let Delivery { event, .. } = delivery?;
                let label = event.label();
                if let Some((_, target)) = state.on.iter().find(|(on, _)| on == label.as_ref()) {
                    return Some(target.clone());
                }
            }
        }
    }
}
