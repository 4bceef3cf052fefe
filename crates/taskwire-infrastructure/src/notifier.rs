//! Logging system notifier.

use async_trait::async_trait;
use taskwire_core::notifier::SystemNotifier;
use tokio::sync::RwLock;
use tracing::info;

/// [`SystemNotifier`] that mirrors toasts into the log stream.
///
/// The headless client has no OS notification surface of its own; the
/// trait seam is where a desktop shell plugs one in. Permission is
/// modelled the same way regardless: undetermined until first requested,
/// then remembered for the process lifetime.
#[derive(Default)]
pub struct LoggingNotifier {
    permission: RwLock<Option<bool>>,
}

impl LoggingNotifier {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SystemNotifier for LoggingNotifier {
    async fn request_permission(&self) -> bool {
        let mut permission = self.permission.write().await;
        *permission.get_or_insert(true)
    }

    async fn notify(&self, title: &str, body: &str) {
        if self.permission.read().await.unwrap_or(false) {
            info!(title, body, "system notification");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_permission_is_granted_once_and_remembered() {
        let notifier = LoggingNotifier::new();
        assert!(notifier.request_permission().await);
        assert!(notifier.request_permission().await);
    }
}
