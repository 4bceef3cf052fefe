//! Notification domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A notification as delivered by the server.
///
/// Arrives over two independent paths: full snapshots fetched over the
/// HTTP boundary, and push events over the persistent channel. Both
/// carry this same record. `is_read` is the only field the client ever
/// mutates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique notification identifier
    pub id: String,
    /// The user this notification belongs to
    pub user_id: String,
    /// Human-readable message
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    /// The task whose change produced this notification, if any
    #[serde(default)]
    pub related_task_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
