use log::{error, info};

/// Where user-facing messages go. Kept separate from logging: a failed
/// background read is logged but never shown, a failed write is both.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Routes notifications into the log. Used when nothing displays them.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, message: &str) {
        info!(target: "notify", "{}", message);
    }

    fn error(&self, message: &str) {
        error!(target: "notify", "{}", message);
    }
}
