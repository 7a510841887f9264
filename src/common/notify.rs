use tracing::{error, info};

/// Fire-and-forget toast surface. The view layer supplies a real
/// implementation; the default logs through tracing.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        info!(target: "moviehub_admin::notify", "{message}");
    }

    fn error(&self, message: &str) {
        error!(target: "moviehub_admin::notify", "{message}");
    }
}