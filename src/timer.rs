use std::time::Duration;

use crate::completion::AbortSignal;
use crate::Error;

/// Arm a deadline against `signal`.
///
/// A no-op when `timeout` is `None` or zero. Otherwise, after `timeout`
/// elapses, aborts the signal with a Timeout reason and runs `on_fire`
/// (typically "stop the actor"). If the signal is cancelled first - by a
/// match or an external abort - the pending sleep is dropped and nothing
/// fires.
pub(crate) fn start_timer(
    signal: &AbortSignal,
    timeout: Option<Duration>,
    message: Option<String>,
    on_fire: Option<Box<dyn FnOnce() + Send>>,
) {
    let Some(timeout) = timeout else { return };
    if timeout.is_zero() {
        return;
    }
    let signal = signal.clone();
    let message =
        message.unwrap_or_else(|| format!("Timeout of {}ms exceeded", timeout.as_millis()));
    tokio::spawn(async move {
        tokio::select! {
            _ = signal.cancelled() => {}
            _ = tokio::time::sleep(timeout) => {
                if signal.is_aborted() {
                    return;
                }
                tracing::debug!(timeout_ms = timeout.as_millis() as u64, "condition timed out");
                signal.abort(Error::Timeout { message });
                if let Some(on_fire) = on_fire {
                    on_fire();
                }
            }
        }
    });
}
