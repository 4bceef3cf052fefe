//! Activity log service.
//!
//! Per-task activity logs are read-only and fetched on demand, then
//! cached by task id until invalidated or the session resets.

use std::collections::HashMap;
use std::sync::Arc;
use taskwire_core::activity::ActivityLogEntry;
use taskwire_core::error::Result;
use taskwire_core::gateway::ApiGateway;
use tokio::sync::RwLock;

/// Fetch-once cache of per-task activity logs.
pub struct ActivityLogService {
    api: Arc<dyn ApiGateway>,
    cache: RwLock<HashMap<String, Vec<ActivityLogEntry>>>,
}

impl ActivityLogService {
    pub fn new(api: Arc<dyn ApiGateway>) -> Self {
        Self {
            api,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the cached log for a task, fetching it on first access.
    pub async fn logs_for(&self, task_id: &str) -> Result<Vec<ActivityLogEntry>> {
        if let Some(cached) = self.cache.read().await.get(task_id) {
            return Ok(cached.clone());
        }

        let fetched = self.api.list_logs(task_id).await?;
        self.cache
            .write()
            .await
            .insert(task_id.to_string(), fetched.clone());
        Ok(fetched)
    }

    /// Drops one task's cached log so the next access re-fetches.
    pub async fn invalidate(&self, task_id: &str) {
        self.cache.write().await.remove(task_id);
    }

    /// Empties the cache, as part of the full reset on logout.
    pub async fn clear(&self) {
        self.cache.write().await.clear();
    }

    pub async fn is_empty(&self) -> bool {
        self.cache.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use taskwire_core::filter::TaskFilter;
    use taskwire_core::notification::Notification;
    use taskwire_core::session::{Credentials, RegisterPayload, Session};
    use taskwire_core::task::{Task, TaskDraft};
    use taskwire_core::user::User;

    struct MockApi {
        log_calls: AtomicUsize,
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
        async fn list_tasks(&self, _f: &TaskFilter) -> Result<Vec<Task>> {
            Ok(Vec::new())
        }
        async fn create_task(&self, _d: &TaskDraft) -> Result<Task> {
            unimplemented!("not used in these tests")
        }
        async fn update_task(&self, _i: &str, _d: &TaskDraft) -> Result<Task> {
            unimplemented!("not used in these tests")
        }
        async fn delete_task(&self, _i: &str) -> Result<()> {
            Ok(())
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

        async fn list_logs(&self, task_id: &str) -> Result<Vec<ActivityLogEntry>> {
            self.log_calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![ActivityLogEntry {
                id: "l1".to_string(),
                task_id: task_id.to_string(),
                action: "created".to_string(),
                details: None,
                performed_by: "u1".to_string(),
                created_at: Utc::now(),
            }])
        }
    }

    #[tokio::test]
    async fn test_logs_are_fetched_once_per_task() {
        let api = Arc::new(MockApi {
            log_calls: AtomicUsize::new(0),
        });
        let service = ActivityLogService::new(api.clone());

        service.logs_for("t1").await.unwrap();
        service.logs_for("t1").await.unwrap();
        assert_eq!(api.log_calls.load(Ordering::SeqCst), 1);

        service.logs_for("t2").await.unwrap();
        assert_eq!(api.log_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let api = Arc::new(MockApi {
            log_calls: AtomicUsize::new(0),
        });
        let service = ActivityLogService::new(api.clone());

        service.logs_for("t1").await.unwrap();
        service.invalidate("t1").await;
        service.logs_for("t1").await.unwrap();
        assert_eq!(api.log_calls.load(Ordering::SeqCst), 2);
    }
}
