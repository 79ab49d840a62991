use std::sync::{Arc, Mutex, OnceLock};

use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::Error;

/// A cancellation signal carrying a typed reason.
///
/// Wraps a [`CancellationToken`] with a write-once reason slot: the first
/// abort wins both the cancellation and the reason; later aborts are no-ops.
/// This is the single source of truth for "stop paying attention" shared by
/// the matcher, the deadline timer and the instrumentation overlay of one
/// condition.
#[derive(Clone)]
pub struct AbortSignal {
    token: CancellationToken,
    reason: Arc<OnceLock<Error>>,
}

impl AbortSignal {
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
            reason: Arc::new(OnceLock::new()),
        }
    }

    /// Cancel the signal with `reason`. Only the first reason is kept.
    pub fn abort(&self, reason: Error) {
        let _ = self.reason.set(reason);
        self.token.cancel();
    }

    pub fn is_aborted(&self) -> bool {
        self.token.is_cancelled()
    }

    /// The recorded abort reason, defaulting to [`Error::Aborted`].
    pub fn reason(&self) -> Error {
        self.reason.get().cloned().unwrap_or(Error::Aborted)
    }

    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }
}

impl Default for AbortSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AbortSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AbortSignal")
            .field("aborted", &self.is_aborted())
            .finish()
    }
}

/// Resolve/reject-once handle for a pending condition.
///
/// Clonable so the matcher, the completion watcher and inspection callbacks
/// can each hold one. Settling by any path cancels the coupled signal, which
/// is how "the match happened" propagates to "stop listening" without an
/// explicit call from every driver.
pub(crate) struct Settler<T> {
    sender: Arc<Mutex<Option<oneshot::Sender<Result<T, Error>>>>>,
    signal: AbortSignal,
}

impl<T> Clone for Settler<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            signal: self.signal.clone(),
        }
    }
}

impl<T> Settler<T> {
    pub fn resolve(&self, value: T) {
        self.settle(Ok(value));
    }

    pub fn reject(&self, error: Error) {
        self.settle(Err(error));
    }

    fn settle(&self, result: Result<T, Error>) {
        if let Some(sender) = self.sender.lock().unwrap().take() {
            let _ = sender.send(result);
        }
        self.signal.abort(Error::Aborted);
    }
}

/// One future result coupled one-to-one with an [`AbortSignal`].
///
/// Created per condition; settles exactly once, from the settler, from the
/// signal's cancellation, or immediately when constructed over an
/// already-cancelled signal. Awaiting the settlement also cancels the signal
/// on the way out, so cleanup hooks fire no matter which path won.
pub(crate) struct CompletionKit<T> {
    signal: AbortSignal,
    settler: Settler<T>,
    receiver: oneshot::Receiver<Result<T, Error>>,
}

impl<T> CompletionKit<T> {
    pub fn new(signal: Option<AbortSignal>) -> Self {
        let signal = signal.unwrap_or_default();
        let (sender, receiver) = oneshot::channel();
        let settler = Settler {
            sender: Arc::new(Mutex::new(Some(sender))),
            signal: signal.clone(),
        };
        Self {
            signal,
            settler,
            receiver,
        }
    }

    pub fn signal(&self) -> AbortSignal {
        self.signal.clone()
    }

    pub fn settler(&self) -> Settler<T> {
        self.settler.clone()
    }

    /// Await the settlement. A settled value beats a concurrent
    /// cancellation; a cancellation that arrives first rejects with its
    /// recorded reason.
    pub async fn settled(mut self) -> Result<T, Error> {
        let result = tokio::select! {
            biased;
            settled = &mut self.receiver => match settled {
                Ok(result) => result,
                Err(_) => Err(self.signal.reason()),
            },
            _ = self.signal.cancelled() => Err(self.signal.reason()),
        };
        self.signal.abort(Error::Aborted);
        result
    }
}
