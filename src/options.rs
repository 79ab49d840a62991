use std::{sync::OnceLock, time::Duration};

use crate::runtime::{Event, InspectorFn, LoggerFn};

/// Default deadline for every condition.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

/// Options accepted by the `*_with` variants of every condition.
///
/// ```ignore
/// let opts = WaitOptions::default()
///     .with_timeout(Duration::from_millis(250))
///     .with_other_actor("replier");
/// ```
pub struct WaitOptions<E: Event> {
    /// Additional inspector, invoked before the condition's own for every
    /// inspection event.
    pub inspector: Option<InspectorFn<E>>,
    /// Logger patched onto the actor and every actor discovered during the
    /// condition.
    pub logger: Option<LoggerFn>,
    /// Deadline; `None` means [`DEFAULT_TIMEOUT`]. A zero duration disables
    /// the deadline entirely.
    pub timeout: Option<Duration>,
    /// Identity filter for the event conditions: required sender for
    /// received-sequences, required target for sent-sequences.
    pub other_actor_id: Option<String>,
}

impl<E: Event> Default for WaitOptions<E> {
    fn default() -> Self {
        Self {
            inspector: None,
            logger: None,
            timeout: None,
            other_actor_id: None,
        }
    }
}

impl<E: Event> WaitOptions<E> {
    pub fn with_inspector(mut self, inspector: InspectorFn<E>) -> Self {
        self.inspector = Some(inspector);
        self
    }

    pub fn with_logger(mut self, logger: LoggerFn) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_other_actor(mut self, id: &str) -> Self {
        self.other_actor_id = Some(id.to_string());
        self
    }

    pub(crate) fn resolve(self, stop: bool) -> Resolved<E> {
        let timeout = match self.timeout {
            Some(t) if t.is_zero() => None,
            Some(t) => Some(t),
            None if debug_mode() => None,
            None => Some(DEFAULT_TIMEOUT),
        };
        Resolved {
            inspector: self.inspector,
            logger: self.logger,
            timeout,
            other_actor_id: self.other_actor_id,
            stop,
        }
    }
}

/// Options with defaults applied and the driver's stop policy threaded in.
pub(crate) struct Resolved<E: Event> {
    pub inspector: Option<InspectorFn<E>>,
    pub logger: Option<LoggerFn>,
    /// `None` means no deadline at all.
    pub timeout: Option<Duration>,
    pub other_actor_id: Option<String>,
    /// Stop the actor once the condition succeeds ("run until") rather than
    /// leaving it running ("wait for").
    pub stop: bool,
}

impl<E: Event> Resolved<E> {
    pub fn timeout_ms(&self) -> Option<u128> {
        self.timeout.map(|t| t.as_millis())
    }
}

/// With `AUDITION_DEBUG` set, default timeouts are disabled so a paused
/// debugger doesn't trip deadlines. Explicit timeouts are honored as given.
fn debug_mode() -> bool {
    static DEBUG: OnceLock<bool> = OnceLock::new();
    *DEBUG.get_or_init(|| {
        let debug = std::env::var_os("AUDITION_DEBUG").is_some_and(|v| !v.is_empty());
        if debug {
            tracing::warn!("debug mode detected; default timeouts disabled");
        }
        debug
    })
}
