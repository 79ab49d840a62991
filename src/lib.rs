//! Audition - awaited-condition assertions for actor trees
//!
//! Deterministic, timeout-bounded assertions about the runtime behavior of
//! hierarchical actors: "did the actor finish with output X", "did it emit
//! events E1,E2 in order", "did it reach a snapshot satisfying P", "did it
//! spawn a child matching M", "did it transition from state A to B".
//!
//! Each condition attaches a shared instrumentation channel to an actor and
//! everything it transitively spawns, drives an ordered matcher against the
//! single inspection stream, and races the match against a cancellable
//! timeout. Whichever settles first wins; cleanup is idempotent.
//!
//! See `run_until_*` (stops the actor on success) and `wait_for_*` (leaves it
//! running) in the module list below.

mod completion;
mod condition;
mod create;
mod error;
mod matcher;
mod options;
mod overlay;
mod timer;
mod until_done;
mod until_emitted;
mod until_event_received;
mod until_event_sent;
mod until_snapshot;
mod until_spawn;
mod until_transition;

pub mod runtime;

pub use completion::AbortSignal;
pub use create::{CreateActorOptions, create_actor};
pub use error::Error;
pub use options::{DEFAULT_TIMEOUT, WaitOptions};
pub use overlay::{PatchOptions, patch_actor, unpatch_actor};
pub use until_done::{run_until_done, run_until_done_with};
pub use until_emitted::{
    run_until_emitted, run_until_emitted_with, wait_for_emitted, wait_for_emitted_with,
};
pub use until_event_received::{
    run_until_event_received, run_until_event_received_with, wait_for_event_received,
    wait_for_event_received_with,
};
pub use until_event_sent::{
    run_until_event_sent, run_until_event_sent_with, wait_for_event_sent,
    wait_for_event_sent_with,
};
pub use until_snapshot::{
    run_until_snapshot, run_until_snapshot_with, wait_for_snapshot, wait_for_snapshot_with,
};
pub use until_spawn::{
    IdMatcher, run_until_spawn, run_until_spawn_with, wait_for_spawn, wait_for_spawn_with,
};
pub use until_transition::{
    run_until_transition, run_until_transition_with, wait_for_transition,
    wait_for_transition_with,
};

pub use runtime::{
    Action, Actor, ActorContext, ActorId, ActorLogic, ActorRef, ActorStatus, ActorSystem,
    AnyOutput, Delivery, Event, InspectionEvent, InspectorFn, Label, LoggerFn, Machine, Outcome,
    PromiseLogic, Snapshot, State, Subscription, TransitionRecord, WaitError, from_async,
};

pub type Result<T = ()> = std::result::Result<T, Error>;
