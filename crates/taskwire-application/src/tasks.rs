//! Task view service.
//!
//! Owns the filter state and the reconciled task collection. Filter
//! changes trigger a debounced re-fetch where rapid consecutive changes
//! collapse to one request; responses are discriminated by a
//! monotonically increasing sequence number so the last-issued fetch
//! wins even when the network reorders replies. Mutations reconcile the
//! single affected entry from the server's confirmed representation -
//! no full re-fetch.

use crate::toasts::ToastService;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use taskwire_core::error::{Result, TaskwireError};
use taskwire_core::filter::{TaskFilter, TaskFilterPatch};
use taskwire_core::gateway::ApiGateway;
use taskwire_core::task::{Task, TaskBoard, TaskDraft};
use tokio::sync::RwLock;
use tokio::time::sleep;
use tracing::{debug, warn};

/// How long to wait for further filter changes before fetching.
const FILTER_DEBOUNCE: Duration = Duration::from_millis(250);

/// Callback invoked when a background (debounced) refresh fails, so the
/// owner can apply session-level error policy.
pub type RefreshErrorCallback = Arc<dyn Fn(TaskwireError) + Send + Sync>;

/// Owns the current filter predicate and the task collection.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct TaskService {
    inner: Arc<Inner>,
}

struct Inner {
    api: Arc<dyn ApiGateway>,
    board: RwLock<TaskBoard>,
    filter: RwLock<TaskFilter>,
    /// Sequence attached to each snapshot fetch at issue time.
    fetch_seq: AtomicU64,
    /// Generation counter collapsing rapid filter changes.
    filter_generation: AtomicU64,
    toasts: Arc<ToastService>,
    refresh_error_callback: RwLock<Option<RefreshErrorCallback>>,
}

impl Inner {
    /// Fetches a snapshot for the current filter and applies it.
    async fn refresh(&self) -> Result<()> {
        let seq = self.fetch_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let filter = self.filter.read().await.clone();

        let tasks = self.api.list_tasks(&filter).await?;
        if !self.board.write().await.apply_snapshot(tasks, seq) {
            debug!(seq, "discarded superseded task snapshot");
        }
        Ok(())
    }
}

impl TaskService {
    pub fn new(api: Arc<dyn ApiGateway>, toasts: Arc<ToastService>) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                board: RwLock::new(TaskBoard::new()),
                filter: RwLock::new(TaskFilter::default()),
                fetch_seq: AtomicU64::new(0),
                filter_generation: AtomicU64::new(0),
                toasts,
                refresh_error_callback: RwLock::new(None),
            }),
        }
    }

    /// Registers the error policy for background refreshes.
    pub async fn set_refresh_error_callback(&self, callback: RefreshErrorCallback) {
        *self.inner.refresh_error_callback.write().await = Some(callback);
    }

    /// Fetches a snapshot for the current filter and applies it.
    ///
    /// The sequence number is taken when the fetch is issued; if a
    /// later-issued fetch has already landed by the time this response
    /// arrives, the response is discarded. Failures leave the collection
    /// untouched.
    pub async fn refresh(&self) -> Result<()> {
        self.inner.refresh().await
    }

    /// Merges a partial filter change and schedules the debounced
    /// re-fetch. A patch that changes nothing does not fetch.
    pub async fn set_filter(&self, patch: TaskFilterPatch) {
        if !self.inner.filter.write().await.merge(patch) {
            return;
        }

        let generation = self.inner.filter_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            sleep(FILTER_DEBOUNCE).await;
            if inner.filter_generation.load(Ordering::SeqCst) != generation {
                // A newer change superseded this one.
                return;
            }
            if let Err(err) = inner.refresh().await {
                warn!(%err, "filter refresh failed");
                inner
                    .toasts
                    .push(format!("Could not load tasks: {err}"))
                    .await;
                if let Some(callback) = inner.refresh_error_callback.read().await.as_ref() {
                    callback(err);
                }
            }
        });
    }

    /// Creates a task and reconciles the confirmed result at the front
    /// of the collection. No re-fetch.
    pub async fn create(&self, draft: TaskDraft) -> Result<Task> {
        match self.inner.api.create_task(&draft).await {
            Ok(task) => {
                self.inner.board.write().await.apply_created(task.clone());
                Ok(task)
            }
            Err(err) => {
                self.inner
                    .toasts
                    .push(format!("Could not create task: {err}"))
                    .await;
                Err(err)
            }
        }
    }

    /// Updates a task and reconciles the confirmed result in place.
    pub async fn update(&self, id: &str, draft: TaskDraft) -> Result<Task> {
        match self.inner.api.update_task(id, &draft).await {
            Ok(task) => {
                self.inner.board.write().await.apply_updated(task.clone());
                Ok(task)
            }
            Err(err) => {
                self.inner
                    .toasts
                    .push(format!("Could not update task: {err}"))
                    .await;
                Err(err)
            }
        }
    }

    /// Deletes a task and removes its entry.
    ///
    /// Deletion is irreversible; the boundary that talks to the user
    /// must have obtained explicit confirmation before calling this.
    pub async fn delete(&self, id: &str) -> Result<()> {
        match self.inner.api.delete_task(id).await {
            Ok(()) => {
                self.inner.board.write().await.apply_deleted(id);
                Ok(())
            }
            Err(err) => {
                self.inner
                    .toasts
                    .push(format!("Could not delete task: {err}"))
                    .await;
                Err(err)
            }
        }
    }

    pub async fn tasks(&self) -> Vec<Task> {
        self.inner.board.read().await.tasks().to_vec()
    }

    pub async fn get(&self, id: &str) -> Option<Task> {
        self.inner.board.read().await.get(id).cloned()
    }

    pub async fn current_filter(&self) -> TaskFilter {
        self.inner.filter.read().await.clone()
    }

    /// Empties the collection and resets the filter, as part of the
    /// full reset on logout.
    pub async fn clear(&self) {
        self.inner.board.write().await.clear();
        *self.inner.filter.write().await = TaskFilter::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;
    use taskwire_core::activity::ActivityLogEntry;
    use taskwire_core::filter::StatusFilter;
    use taskwire_core::notification::Notification;
    use taskwire_core::session::{Credentials, RegisterPayload, Session};
    use taskwire_core::task::{TaskPriority, TaskStatus};
    use taskwire_core::user::User;

    fn task(id: &str) -> Task {
        let now = Utc::now();
        Task {
            id: id.to_string(),
            title: format!("Task {}", id),
            description: String::new(),
            priority: TaskPriority::Medium,
            status: TaskStatus::Pending,
            due_date: None,
            assigned_to: None,
            created_by: "u1".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    struct MockApi {
        tasks: Mutex<Vec<Task>>,
        list_calls: AtomicUsize,
        seen_filters: Mutex<Vec<TaskFilter>>,
        fail_writes: Mutex<Option<TaskwireError>>,
    }

    impl MockApi {
        fn new(tasks: Vec<Task>) -> Arc<Self> {
            Arc::new(Self {
                tasks: Mutex::new(tasks),
                list_calls: AtomicUsize::new(0),
                seen_filters: Mutex::new(Vec::new()),
                fail_writes: Mutex::new(None),
            })
        }

        fn fail_writes_with(&self, err: TaskwireError) {
            *self.fail_writes.lock().unwrap() = Some(err);
        }

        fn write_failure(&self) -> Option<TaskwireError> {
            self.fail_writes.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ApiGateway for MockApi {
        async fn login(&self, _c: &Credentials) -> Result<Session> {
            unimplemented!("not used in these tests")
        }

        async fn register(&self, _p: &RegisterPayload) -> Result<Session> {
            unimplemented!("not used in these tests")
        }

        async fn set_token(&self, _t: Option<String>) {}

        async fn list_users(&self) -> Result<Vec<User>> {
            Ok(Vec::new())
        }

        async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            self.seen_filters.lock().unwrap().push(filter.clone());
            Ok(self.tasks.lock().unwrap().clone())
        }

        async fn create_task(&self, draft: &TaskDraft) -> Result<Task> {
            if let Some(err) = self.write_failure() {
                return Err(err);
            }
            let mut created = task("t9");
            created.title = draft.title.clone();
            Ok(created)
        }

        async fn update_task(&self, id: &str, draft: &TaskDraft) -> Result<Task> {
            if let Some(err) = self.write_failure() {
                return Err(err);
            }
            let mut updated = task(id);
            updated.title = draft.title.clone();
            updated.status = draft.status;
            Ok(updated)
        }

        async fn delete_task(&self, _id: &str) -> Result<()> {
            match self.write_failure() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }

        async fn list_notifications(&self, _u: &str) -> Result<Vec<Notification>> {
            Ok(Vec::new())
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

    fn service(api: Arc<MockApi>) -> TaskService {
        TaskService::new(
            api,
            Arc::new(ToastService::with_ttl(Duration::from_secs(60))),
        )
    }

    async fn toast_count(service: &TaskService) -> usize {
        service.inner.toasts.toasts().await.len()
    }

    #[tokio::test]
    async fn test_create_reconciles_single_entry_without_refetch() {
        let api = MockApi::new(vec![task("a")]);
        let service = service(api.clone());
        service.refresh().await.unwrap();
        let lists_before = api.list_calls.load(Ordering::SeqCst);

        let created = service.create(TaskDraft::new("X")).await.unwrap();
        assert_eq!(created.id, "t9");

        let tasks = service.tasks().await;
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id, "t9");
        // Exactly one entry gained, no snapshot fetch triggered.
        assert_eq!(api.list_calls.load(Ordering::SeqCst), lists_before);
    }

    #[tokio::test]
    async fn test_failed_create_leaves_collection_untouched() {
        let api = MockApi::new(vec![task("a")]);
        let service = service(api.clone());
        service.refresh().await.unwrap();

        api.fail_writes_with(TaskwireError::validation("title is required"));
        assert!(service.create(TaskDraft::new("")).await.is_err());

        assert_eq!(service.tasks().await.len(), 1);
        // Exactly one toast for the failed user-initiated action.
        assert_eq!(toast_count(&service).await, 1);
    }

    #[tokio::test]
    async fn test_rapid_filter_changes_collapse_to_one_fetch() {
        let api = MockApi::new(vec![task("a")]);
        let service = service(api.clone());

        for status in [
            StatusFilter::Pending,
            StatusFilter::InProgress,
            StatusFilter::Completed,
        ] {
            service
                .set_filter(TaskFilterPatch {
                    status: Some(status),
                    ..Default::default()
                })
                .await;
        }

        sleep(Duration::from_millis(400)).await;

        assert_eq!(api.list_calls.load(Ordering::SeqCst), 1);
        let seen = api.seen_filters.lock().unwrap();
        assert_eq!(seen[0].status, StatusFilter::Completed);
    }

    #[tokio::test]
    async fn test_noop_filter_patch_does_not_fetch() {
        let api = MockApi::new(Vec::new());
        let service = service(api.clone());

        service.set_filter(TaskFilterPatch::default()).await;
        sleep(Duration::from_millis(350)).await;

        assert_eq!(api.list_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_update_failure_keeps_existing_entry() {
        let api = MockApi::new(vec![task("a")]);
        let service = service(api.clone());
        service.refresh().await.unwrap();

        api.fail_writes_with(TaskwireError::transient("down"));
        assert!(
            service
                .update("a", TaskDraft::new("renamed"))
                .await
                .is_err()
        );
        assert_eq!(service.tasks().await[0].title, "Task a");
    }

    #[tokio::test]
    async fn test_delete_removes_entry_on_confirmation() {
        let api = MockApi::new(vec![task("a"), task("b")]);
        let service = service(api);
        service.refresh().await.unwrap();

        service.delete("a").await.unwrap();
        let tasks = service.tasks().await;
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "b");
    }

    #[tokio::test]
    async fn test_clear_resets_filter_and_collection() {
        let api = MockApi::new(vec![task("a")]);
        let service = service(api);
        service.refresh().await.unwrap();
        service
            .set_filter(TaskFilterPatch {
                status: Some(StatusFilter::Pending),
                ..Default::default()
            })
            .await;

        service.clear().await;
        assert!(service.tasks().await.is_empty());
        assert_eq!(service.current_filter().await, TaskFilter::default());
    }
}
