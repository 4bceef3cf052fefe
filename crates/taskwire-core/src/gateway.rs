//! HTTP API gateway contract.
//!
//! Defines the request/response boundary the sync engine consumes:
//! authoritative snapshots per resource, plus the mutations whose
//! confirmed results are reconciled into the local collections. The
//! concrete client lives in the transport crate.

use crate::activity::ActivityLogEntry;
use crate::error::Result;
use crate::filter::TaskFilter;
use crate::notification::Notification;
use crate::session::{Credentials, RegisterPayload, Session};
use crate::task::{Task, TaskDraft};
use crate::user::User;
use async_trait::async_trait;

/// The resource-oriented API surface.
///
/// Every authenticated call attaches the current credential. A response
/// signaling an expired/invalid credential surfaces as
/// [`TaskwireError::Auth`](crate::TaskwireError::Auth) and is not retried
/// here - expired auth is fatal to the session. Transport failures
/// surface as `Transient` and must not have mutated anything the caller
/// holds.
#[async_trait]
pub trait ApiGateway: Send + Sync {
    /// Exchanges credentials for a session.
    async fn login(&self, credentials: &Credentials) -> Result<Session>;

    /// Creates an account and returns the resulting session.
    async fn register(&self, payload: &RegisterPayload) -> Result<Session>;

    /// Sets (or clears) the bearer credential attached to subsequent
    /// calls.
    async fn set_token(&self, token: Option<String>);

    async fn list_users(&self) -> Result<Vec<User>>;

    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>>;

    async fn create_task(&self, draft: &TaskDraft) -> Result<Task>;

    async fn update_task(&self, id: &str, draft: &TaskDraft) -> Result<Task>;

    async fn delete_task(&self, id: &str) -> Result<()>;

    async fn list_notifications(&self, user_id: &str) -> Result<Vec<Notification>>;

    /// Confirms a single read-state flip server-side.
    async fn mark_notification_read(&self, id: &str) -> Result<()>;

    /// Confirms a batch read-state flip server-side.
    async fn mark_all_notifications_read(&self, user_id: &str) -> Result<()>;

    async fn list_logs(&self, task_id: &str) -> Result<Vec<ActivityLogEntry>>;
}
