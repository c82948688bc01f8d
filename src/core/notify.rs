//! Local notification seam used while a running session is in the background.

use chrono::Duration;
use tracing::info;

pub trait Notifier {
    /// Ask the platform for permission to post notifications.
    fn request_authorization(&mut self) -> bool;

    /// Post `message` once `after` has elapsed.
    fn schedule(&mut self, after: Duration, message: &str);

    /// Drop any notification scheduled earlier.
    fn cancel(&mut self);
}

/// Notifier for environments without a notification center: scheduled
/// notifications only end up in the diagnostic log.
#[derive(Debug, Default)]
pub struct LogNotifier {
    scheduled: Option<(Duration, String)>,
}

impl LogNotifier {
    pub fn scheduled(&self) -> Option<&(Duration, String)> {
        self.scheduled.as_ref()
    }
}

impl Notifier for LogNotifier {
    fn request_authorization(&mut self) -> bool {
        true
    }

    fn schedule(&mut self, after: Duration, message: &str) {
        info!(after_secs = after.num_seconds(), message, "notification scheduled");
        self.scheduled = Some((after, message.to_string()));
    }

    fn cancel(&mut self) {
        if self.scheduled.take().is_some() {
            info!("notification cancelled");
        }
    }
}
