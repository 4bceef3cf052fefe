//! System-level notification mirror.

use async_trait::async_trait;

/// Best-effort mirror of in-app toasts as system-level notifications.
///
/// Strictly fire-and-forget: permission is requested once if
/// undetermined, and every failure is swallowed (logged at debug at
/// most), never surfaced to the user.
#[async_trait]
pub trait SystemNotifier: Send + Sync {
    /// Requests permission if it has not been determined yet.
    ///
    /// # Returns
    ///
    /// `true` if system notifications may be shown.
    async fn request_permission(&self) -> bool;

    /// Shows a notification. Infallible by contract - implementations
    /// swallow their own errors.
    async fn notify(&self, title: &str, body: &str);
}
