//! Notification service.
//!
//! Wraps the pure reconciler with its I/O: snapshot fetches, push
//! handling (toast + system mirror), and read-state confirmation calls.
//! Read-state reconciliation tolerates eventual consistency - a failed
//! confirm keeps the optimistic local flip and logs, because
//! overcounting "read" is low-cost and a rollback would be noisier than
//! the drift.

use crate::toasts::ToastService;
use std::sync::Arc;
use taskwire_core::error::Result;
use taskwire_core::gateway::ApiGateway;
use taskwire_core::notification::{Notification, NotificationReconciler, PushOutcome};
use taskwire_core::notifier::SystemNotifier;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Owns the reconciled notification collection.
pub struct NotificationService {
    api: Arc<dyn ApiGateway>,
    reconciler: Arc<RwLock<NotificationReconciler>>,
    toasts: Arc<ToastService>,
    notifier: Arc<dyn SystemNotifier>,
}

impl NotificationService {
    pub fn new(
        api: Arc<dyn ApiGateway>,
        toasts: Arc<ToastService>,
        notifier: Arc<dyn SystemNotifier>,
    ) -> Self {
        Self {
            api,
            reconciler: Arc::new(RwLock::new(NotificationReconciler::new())),
            toasts,
            notifier,
        }
    }

    /// Fetches the authoritative snapshot and replaces the collection.
    ///
    /// On failure the existing collection is left untouched -
    /// stale-but-present beats wiped-on-error.
    pub async fn refresh(&self, user_id: &str) -> Result<()> {
        let fetched = self.api.list_notifications(user_id).await?;
        self.reconciler.write().await.apply_snapshot(fetched);
        Ok(())
    }

    /// Applies one push-delivered notification event.
    ///
    /// A new id is surfaced as a toast and mirrored to the system
    /// notifier; a duplicate delivery is dropped silently. The outcome
    /// tells the caller whether a task re-fetch is warranted.
    pub async fn handle_push(&self, notification: Notification) -> PushOutcome {
        let outcome = self
            .reconciler
            .write()
            .await
            .apply_push(notification.clone());

        match outcome {
            PushOutcome::Inserted => {
                self.toasts.push(notification.message.clone()).await;
                if self.notifier.request_permission().await {
                    self.notifier.notify("Taskwire", &notification.message).await;
                }
            }
            PushOutcome::DuplicateIgnored => {
                debug!(id = %notification.id, "duplicate push event ignored");
            }
        }

        outcome
    }

    /// Optimistically marks one notification read, then confirms.
    ///
    /// Auth failures propagate (fatal to the session); any other confirm
    /// failure keeps the flip and logs.
    pub async fn mark_read(&self, id: &str) -> Result<()> {
        let flipped = self.reconciler.write().await.mark_read(id);
        if !flipped {
            // Unknown or already read: nothing to confirm.
            return Ok(());
        }

        match self.api.mark_notification_read(id).await {
            Ok(()) => Ok(()),
            Err(err) if err.is_auth() => Err(err),
            Err(err) => {
                warn!(id, %err, "mark-read confirm failed, keeping local flip");
                Ok(())
            }
        }
    }

    /// Marks everything read with one batch confirm call.
    ///
    /// No-ops entirely - no network call - when nothing is unread.
    pub async fn mark_all_read(&self, user_id: &str) -> Result<()> {
        let flipped = self.reconciler.write().await.mark_all_read();
        if flipped.is_empty() {
            return Ok(());
        }

        match self.api.mark_all_notifications_read(user_id).await {
            Ok(()) => Ok(()),
            Err(err) if err.is_auth() => Err(err),
            Err(err) => {
                warn!(count = flipped.len(), %err, "mark-all-read confirm failed, keeping local flips");
                Ok(())
            }
        }
    }

    pub async fn notifications(&self) -> Vec<Notification> {
        self.reconciler.read().await.entries().to_vec()
    }

    pub async fn unread_count(&self) -> usize {
        self.reconciler.read().await.unread_count()
    }

    /// Empties the collection, as part of the full reset on logout.
    pub async fn clear(&self) {
        self.reconciler.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use taskwire_core::TaskwireError;
    use taskwire_core::activity::ActivityLogEntry;
    use taskwire_core::filter::TaskFilter;
    use taskwire_core::session::{Credentials, RegisterPayload, Session};
    use taskwire_core::task::{Task, TaskDraft};
    use taskwire_core::user::User;

    struct MockApi {
        notifications: Mutex<Vec<Notification>>,
        list_calls: AtomicUsize,
        mark_read_calls: AtomicUsize,
        mark_all_calls: AtomicUsize,
        fail_confirms_with: Mutex<Option<TaskwireError>>,
    }

    impl MockApi {
        fn new(notifications: Vec<Notification>) -> Self {
            Self {
                notifications: Mutex::new(notifications),
                list_calls: AtomicUsize::new(0),
                mark_read_calls: AtomicUsize::new(0),
                mark_all_calls: AtomicUsize::new(0),
                fail_confirms_with: Mutex::new(None),
            }
        }

        fn fail_confirms_with(&self, err: TaskwireError) {
            *self.fail_confirms_with.lock().unwrap() = Some(err);
        }

        fn confirm_failure(&self) -> Option<TaskwireError> {
            self.fail_confirms_with.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ApiGateway for MockApi {
        async fn login(&self, _credentials: &Credentials) -> Result<Session> {
            unimplemented!("not used in these tests")
        }

        async fn register(&self, _payload: &RegisterPayload) -> Result<Session> {
            unimplemented!("not used in these tests")
        }

        async fn set_token(&self, _token: Option<String>) {}

        async fn list_users(&self) -> Result<Vec<User>> {
            Ok(Vec::new())
        }

        async fn list_tasks(&self, _filter: &TaskFilter) -> Result<Vec<Task>> {
            Ok(Vec::new())
        }

        async fn create_task(&self, _draft: &TaskDraft) -> Result<Task> {
            unimplemented!("not used in these tests")
        }

        async fn update_task(&self, _id: &str, _draft: &TaskDraft) -> Result<Task> {
            unimplemented!("not used in these tests")
        }

        async fn delete_task(&self, _id: &str) -> Result<()> {
            Ok(())
        }

        async fn list_notifications(&self, _user_id: &str) -> Result<Vec<Notification>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.notifications.lock().unwrap().clone())
        }

        async fn mark_notification_read(&self, _id: &str) -> Result<()> {
            self.mark_read_calls.fetch_add(1, Ordering::SeqCst);
            match self.confirm_failure() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }

        async fn mark_all_notifications_read(&self, _user_id: &str) -> Result<()> {
            self.mark_all_calls.fetch_add(1, Ordering::SeqCst);
            match self.confirm_failure() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }

        async fn list_logs(&self, _task_id: &str) -> Result<Vec<ActivityLogEntry>> {
            Ok(Vec::new())
        }
    }

    struct SilentNotifier;

    #[async_trait]
    impl SystemNotifier for SilentNotifier {
        async fn request_permission(&self) -> bool {
            false
        }

        async fn notify(&self, _title: &str, _body: &str) {}
    }

    fn notification(id: &str, is_read: bool) -> Notification {
        let at = Utc::now();
        Notification {
            id: id.to_string(),
            user_id: "u1".to_string(),
            message: format!("Notification {}", id),
            is_read,
            related_task_id: None,
            created_at: at,
            updated_at: at,
        }
    }

    fn service(api: Arc<MockApi>) -> NotificationService {
        NotificationService::new(
            api,
            Arc::new(ToastService::with_ttl(Duration::from_secs(60))),
            Arc::new(SilentNotifier),
        )
    }

    #[tokio::test]
    async fn test_push_inserts_once_and_toasts_once() {
        let api = Arc::new(MockApi::new(Vec::new()));
        let service = service(api);

        assert_eq!(
            service.handle_push(notification("n1", false)).await,
            PushOutcome::Inserted
        );
        assert_eq!(
            service.handle_push(notification("n1", false)).await,
            PushOutcome::DuplicateIgnored
        );

        assert_eq!(service.notifications().await.len(), 1);
        assert_eq!(service.toasts.toasts().await.len(), 1);
    }

    #[tokio::test]
    async fn test_mark_all_read_skips_network_when_nothing_unread() {
        let api = Arc::new(MockApi::new(vec![notification("a", true)]));
        let service = service(api.clone());
        service.refresh("u1").await.unwrap();

        service.mark_all_read("u1").await.unwrap();
        assert_eq!(api.mark_all_calls.load(Ordering::SeqCst), 0);
        assert_eq!(service.notifications().await.len(), 1);
    }

    #[tokio::test]
    async fn test_mark_all_read_issues_one_batch_call() {
        let api = Arc::new(MockApi::new(vec![
            notification("a", false),
            notification("b", false),
        ]));
        let service = service(api.clone());
        service.refresh("u1").await.unwrap();

        service.mark_all_read("u1").await.unwrap();
        assert_eq!(api.mark_all_calls.load(Ordering::SeqCst), 1);
        assert_eq!(service.unread_count().await, 0);
    }

    #[tokio::test]
    async fn test_failed_confirm_keeps_optimistic_flip() {
        let api = Arc::new(MockApi::new(vec![notification("a", false)]));
        api.fail_confirms_with(TaskwireError::transient("boom"));
        let service = service(api.clone());
        service.refresh("u1").await.unwrap();

        // The transient confirm failure is swallowed and logged.
        service.mark_read("a").await.unwrap();
        assert_eq!(service.unread_count().await, 0);
        assert_eq!(api.mark_read_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_auth_failure_on_confirm_propagates() {
        let api = Arc::new(MockApi::new(vec![notification("a", false)]));
        api.fail_confirms_with(TaskwireError::auth("expired"));
        let service = service(api);
        service.refresh("u1").await.unwrap();

        let err = service.mark_read("a").await.unwrap_err();
        assert!(err.is_auth());
    }

    #[tokio::test]
    async fn test_mark_read_of_known_read_entry_skips_confirm() {
        let api = Arc::new(MockApi::new(vec![notification("a", true)]));
        let service = service(api.clone());
        service.refresh("u1").await.unwrap();

        service.mark_read("a").await.unwrap();
        assert_eq!(api.mark_read_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_refresh_failure_leaves_collection_untouched() {
        let service = service_with_failing_list();
        service.handle_push(notification("n1", false)).await;

        assert!(service.refresh("u1").await.is_err());
        assert_eq!(service.notifications().await.len(), 1);
    }

    fn service_with_failing_list() -> NotificationService {
        struct FailingListApi;

        #[async_trait]
        impl ApiGateway for FailingListApi {
            async fn login(&self, _c: &Credentials) -> Result<Session> {
                unimplemented!()
            }
            async fn register(&self, _p: &RegisterPayload) -> Result<Session> {
                unimplemented!()
            }
            async fn set_token(&self, _t: Option<String>) {}
            async fn list_users(&self) -> Result<Vec<User>> {
                Ok(Vec::new())
            }
            async fn list_tasks(&self, _f: &TaskFilter) -> Result<Vec<Task>> {
                Ok(Vec::new())
            }
            async fn create_task(&self, _d: &TaskDraft) -> Result<Task> {
                unimplemented!()
            }
            async fn update_task(&self, _i: &str, _d: &TaskDraft) -> Result<Task> {
                unimplemented!()
            }
            async fn delete_task(&self, _i: &str) -> Result<()> {
                Ok(())
            }
            async fn list_notifications(&self, _u: &str) -> Result<Vec<Notification>> {
                Err(TaskwireError::transient("network down"))
            }
            async fn mark_notification_read(&self, _i: &str) -> Result<()> {
                Ok(())
            }
            async fn mark_all_notifications_read(&self, _u: &str) -> Result<()> {
                Ok(())
            }
            async fn list_logs(&self, _t: &str) -> Result<Vec<ActivityLogEntry>> {
                Ok(Vec::new())
            }
        }

        NotificationService::new(
            Arc::new(FailingListApi),
            Arc::new(ToastService::with_ttl(Duration::from_secs(60))),
            Arc::new(SilentNotifier),
        )
    }
}
