use std::{collections::HashSet, future::Future, marker::PhantomData, sync::Arc};

use futures_util::future::BoxFuture;

use crate::Error;

use super::{ActorContext, AnyOutput, Event};

/// How an actor's logic finished, as reported by [`ActorLogic::run`].
pub enum Outcome<O> {
    /// Reached completion; promise-backed logic always carries an output,
    /// machines only when their final state declares one.
    Done(Option<O>),
    /// Wound down without completing (e.g. mailbox closed).
    Stopped,
}

/// Behavior executed by an actor task.
///
/// `run` is the whole lifecycle: it receives the actor's [`ActorContext`]
/// and returns once the logic completes or decides to stop. External
/// stop requests cancel the future from the outside; no cooperation is
/// required beyond being cancel-safe at `.await` points.
pub trait ActorLogic<E: Event>: Send + 'static {
    type Output: Send + Sync + 'static;

    fn run(
        self,
        ctx: ActorContext<E>,
    ) -> impl Future<Output = crate::Result<Outcome<Self::Output>>> + Send;

    /// State-id index, for machine-backed logic.
    fn state_index(&self) -> Option<Arc<HashSet<Arc<str>>>> {
        None
    }

    /// Erase the output for storage in a snapshot. Logic whose output is
    /// already erased overrides this to the identity.
    fn erase_output(output: Self::Output) -> AnyOutput {
        Arc::new(output)
    }
}

/// Promise-backed logic: runs one future to completion and finishes done
/// with its output.
///
/// ```ignore
/// let logic = from_async(async move {
///     tokio::time::sleep(Duration::from_millis(100)).await;
///     Ok(format!("hello {input}"))
/// });
/// let actor: Actor<MyEvent, String> = create_actor(logic, Default::default());
/// ```
pub struct PromiseLogic<E: Event, O> {
    future: BoxFuture<'static, crate::Result<O>>,
    _event: PhantomData<fn(&E)>,
}

pub fn from_async<E, O, Fut>(future: Fut) -> PromiseLogic<E, O>
where
    E: Event,
    O: Send + Sync + 'static,
    Fut: Future<Output = crate::Result<O>> + Send + 'static,
{
    PromiseLogic {
        future: Box::pin(future),
        _event: PhantomData,
    }
}

impl<E: Event, O: Send + Sync + 'static> ActorLogic<E> for PromiseLogic<E, O> {
    type Output = O;

    async fn run(self, _ctx: ActorContext<E>) -> crate::Result<Outcome<O>> {
        let output = self.future.await?;
        Ok(Outcome::Done(Some(output)))
    }
}

/// Erased outcome used by the actor task.
pub(crate) enum DynOutcome {
    Done(Option<AnyOutput>),
    Stopped,
    Failed(Error),
}

/// Object-safe form of [`ActorLogic`], so machines can spawn children of
/// arbitrary logic types.
pub(crate) trait DynLogic<E: Event>: Send {
    fn run_boxed(
        self: Box<Self>,
        ctx: ActorContext<E>,
    ) -> BoxFuture<'static, crate::Result<DynOutcome>>;

    fn state_index(&self) -> Option<Arc<HashSet<Arc<str>>>>;
}

impl<E: Event, L: ActorLogic<E>> DynLogic<E> for L {
    fn run_boxed(
        self: Box<Self>,
        ctx: ActorContext<E>,
    ) -> BoxFuture<'static, crate::Result<DynOutcome>> {
        Box::pin(async move {
            match (*self).run(ctx).await? {
                Outcome::Done(output) => Ok(DynOutcome::Done(output.map(L::erase_output))),
                Outcome::Stopped => Ok(DynOutcome::Stopped),
            }
        })
    }

    fn state_index(&self) -> Option<Arc<HashSet<Arc<str>>>> {
        ActorLogic::state_index(self)
    }
}
