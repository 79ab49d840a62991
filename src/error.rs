use std::sync::Arc;

/// Error taxonomy for awaited conditions and the underlying actor runtime.
///
/// Every asynchronous failure of a condition surfaces as exactly one of these
/// through the returned future. Contract violations (`EmptyExpectation`,
/// `UnknownStateId`) are returned before any actor is started.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// The deadline elapsed before the condition matched.
    /// The message embeds the configured timeout.
    #[error("{message}")]
    Timeout { message: String },

    /// The actor reached a terminal state while expected discriminants
    /// remained unmatched. The message enumerates them.
    #[error("{message}")]
    Unmatched { message: String },

    /// The actor terminated before a snapshot satisfied the predicate.
    #[error("{message}")]
    TerminatedEarly { message: String },

    /// The actor's own execution failed; the original error is carried as-is.
    #[error("actor failed: {0}")]
    ActorFailed(Arc<Error>),

    #[error("expected one or more event types")]
    EmptyExpectation,

    #[error("unknown state id: {0}")]
    UnknownStateId(String),

    #[error("no actor registered under id '{0}'")]
    UnknownActor(String),

    #[error("couldn't send the message: {0}")]
    SendError(String),

    /// Cancellation raced ahead of a match without a more specific reason.
    #[error("operation aborted")]
    Aborted,

    /// Error external to audition, raised by user-supplied actor logic.
    #[error("{0}")]
    External(Arc<str>),
}
