//! User-facing notification sink.

/// Receives outcome messages meant for the user (toasts in a UI, lines on a
/// terminal). Fire-and-forget.
pub trait Notifier: Send + Sync {
    fn notify_success(&self, message: &str);
    fn notify_error(&self, message: &str);
}

/// Notifier that only writes to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify_success(&self, message: &str) {
        tracing::info!(target: "votechain::notify", "{message}");
    }

    fn notify_error(&self, message: &str) {
        tracing::error!(target: "votechain::notify", "{message}");
    }
}
