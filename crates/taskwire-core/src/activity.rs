//! Per-task activity log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry in a task's activity log.
///
/// Read-only from the client's perspective; fetched on demand and cached
/// per task id. Not part of the push stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogEntry {
    pub id: String,
    pub task_id: String,
    /// What happened ("created", "status_changed", ...)
    pub action: String,
    #[serde(default)]
    pub details: Option<String>,
    /// User id of whoever performed the action
    pub performed_by: String,
    pub created_at: DateTime<Utc>,
}
