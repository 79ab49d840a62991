use std::sync::Arc;

use crate::Error;

use super::actor_ref::AnyOutput;

/// Lifecycle phase of an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorStatus {
    /// Created but not yet started.
    Idle,
    Running,
    /// Reached a final state; `Snapshot::output` may be set.
    Done,
    /// Stopped before reaching a final state.
    Stopped,
    /// The actor's logic returned an error; `Snapshot::error` is set.
    Failed,
}

impl ActorStatus {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Stopped | Self::Failed)
    }
}

impl std::fmt::Display for ActorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Done => "done",
            Self::Stopped => "stopped",
            Self::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// Point-in-time view of one actor, published on a watch channel.
///
/// Snapshot predicates (see `wait_for_snapshot`) receive this type. For
/// machine actors `state` carries the current state id; for promise-backed
/// actors it stays `None`.
#[derive(Clone)]
pub struct Snapshot {
    pub status: ActorStatus,
    pub state: Option<Arc<str>>,
    pub output: Option<AnyOutput>,
    pub error: Option<Arc<Error>>,
}

impl Snapshot {
    pub(crate) fn idle() -> Self {
        Self {
            status: ActorStatus::Idle,
            state: None,
            output: None,
            error: None,
        }
    }

    /// Current state id as a `&str`, if the actor is a machine.
    pub fn state_id(&self) -> Option<&str> {
        self.state.as_deref()
    }
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("status", &self.status)
            .field("state", &self.state)
            .field("output", &self.output.as_ref().map(|_| "<output>"))
            .field("error", &self.error)
            .finish()
    }
}
