//! Toast service.
//!
//! Owns the toast queue and its timers: every pushed toast gets an
//! independent expiry task, and dismissal (explicit or by expiry) is
//! observable through a broadcast stream so a UI layer can mirror the
//! queue without polling.

use std::sync::Arc;
use std::time::Duration;
use taskwire_core::toast::{TOAST_TTL, Toast, ToastId, ToastQueue};
use tokio::sync::{RwLock, broadcast};
use tokio::time::sleep;

const EVENT_BUFFER: usize = 32;

/// Queue changes, in order.
#[derive(Debug, Clone)]
pub enum ToastEvent {
    Shown(Toast),
    Dismissed(ToastId),
}

/// The live toast queue with per-item expiry timers.
pub struct ToastService {
    queue: Arc<RwLock<ToastQueue>>,
    events: broadcast::Sender<ToastEvent>,
    ttl: Duration,
}

impl ToastService {
    pub fn new() -> Self {
        Self::with_ttl(TOAST_TTL)
    }

    /// A service with a custom TTL; tests shorten it.
    pub fn with_ttl(ttl: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            queue: Arc::new(RwLock::new(ToastQueue::new())),
            events,
            ttl,
        }
    }

    /// Queues a toast and schedules its expiry.
    ///
    /// Identical messages each get their own toast and their own timer.
    pub async fn push(&self, message: impl Into<String>) -> ToastId {
        let toast = self.queue.write().await.push(message);
        let id = toast.id;
        let _ = self.events.send(ToastEvent::Shown(toast));

        let queue = Arc::clone(&self.queue);
        let events = self.events.clone();
        let ttl = self.ttl;
        tokio::spawn(async move {
            sleep(ttl).await;
            // Already-dismissed toasts make this a no-op.
            if queue.write().await.dismiss(id) {
                let _ = events.send(ToastEvent::Dismissed(id));
            }
        });

        id
    }

    /// Dismisses a toast. Idempotent; expiry and explicit dismissal race
    /// harmlessly.
    pub async fn dismiss(&self, id: ToastId) -> bool {
        let removed = self.queue.write().await.dismiss(id);
        if removed {
            let _ = self.events.send(ToastEvent::Dismissed(id));
        }
        removed
    }

    pub async fn toasts(&self) -> Vec<Toast> {
        self.queue.read().await.toasts().to_vec()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ToastEvent> {
        self.events.subscribe()
    }
}

impl Default for ToastService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_toast_expires_after_ttl() {
        let service = ToastService::with_ttl(Duration::from_millis(30));
        service.push("short-lived").await;
        assert_eq!(service.toasts().await.len(), 1);

        sleep(Duration::from_millis(80)).await;
        assert!(service.toasts().await.is_empty());
    }

    #[tokio::test]
    async fn test_expiry_of_one_toast_leaves_others_alone() {
        let service = ToastService::with_ttl(Duration::from_millis(60));
        service.push("first").await;
        sleep(Duration::from_millis(40)).await;
        service.push("second").await;

        // First expires, second is still inside its own TTL.
        sleep(Duration::from_millis(40)).await;
        let remaining = service.toasts().await;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].message, "second");
    }

    #[tokio::test]
    async fn test_dismiss_before_expiry_is_idempotent() {
        let service = ToastService::with_ttl(Duration::from_secs(5));
        let id = service.push("go away").await;
        assert!(service.dismiss(id).await);
        assert!(!service.dismiss(id).await);
        assert!(service.toasts().await.is_empty());
    }

    #[tokio::test]
    async fn test_events_mirror_queue_changes() {
        let service = ToastService::with_ttl(Duration::from_secs(5));
        let mut events = service.subscribe();

        let id = service.push("hello").await;
        service.dismiss(id).await;

        match events.recv().await.unwrap() {
            ToastEvent::Shown(toast) => assert_eq!(toast.message, "hello"),
            other => panic!("expected Shown, got {other:?}"),
        }
        match events.recv().await.unwrap() {
            ToastEvent::Dismissed(dismissed) => assert_eq!(dismissed, id),
            other => panic!("expected Dismissed, got {other:?}"),
        }
    }
}
