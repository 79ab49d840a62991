//! Minimal actor runtime the condition engine observes.
//!
//! Actors run as Tokio tasks. Each actor tree shares one [`ActorSystem`]
//! holding the single inspection point, the system logger slot and the patch
//! arena. Two logic flavors are provided: [`from_async`] (promise-backed,
//! completes with an output) and [`Machine`] (declarative state machine with
//! timed and event-driven transitions, entry actions and final states).

mod actor_id;
mod actor_ref;
mod context;
mod event;
mod inspection;
mod label;
mod logic;
mod machine;
mod snapshot;
mod subscription;
mod system;

pub(crate) mod task;

pub use actor_id::ActorId;
pub use actor_ref::{Actor, ActorRef, AnyOutput, Delivery, LoggerFn, WaitError};
pub use context::ActorContext;
pub use event::Event;
pub use inspection::{InspectionEvent, TransitionRecord};
pub use label::Label;
pub use logic::{ActorLogic, Outcome, PromiseLogic, from_async};
pub use machine::{Action, Machine, State};
pub use snapshot::{ActorStatus, Snapshot};
pub use subscription::Subscription;
pub use system::{ActorSystem, InspectorFn};
