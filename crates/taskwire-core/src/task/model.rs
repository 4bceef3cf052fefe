//! Task domain model.
//!
//! This module contains the core Task entity and its value objects as
//! they travel over the wire and live in the reconciled collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

/// Task urgency, as chosen by the creator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

/// Represents the current status of a task.
///
/// Tasks progress through these states as people work on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum TaskStatus {
    /// The task has been created but nobody has started it.
    Pending,
    /// Someone is actively working on the task.
    #[strum(serialize = "In Progress")]
    InProgress,
    /// The task is done.
    Completed,
}

impl TaskStatus {
    /// Returns the next status in the Pending → InProgress → Completed
    /// progression. Completed stays Completed.
    pub fn advanced(self) -> Self {
        match self {
            Self::Pending => Self::InProgress,
            Self::InProgress => Self::Completed,
            Self::Completed => Self::Completed,
        }
    }
}

/// A task as reported by the server.
///
/// The server is authoritative for every field; local edits are
/// provisional until the confirmed representation replaces them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task identifier
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    /// Optional deadline
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    /// User id of the assignee, if any
    #[serde(default)]
    pub assigned_to: Option<String>,
    /// User id of the creator
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// True when the due date has passed and the task is not completed.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        match self.due_date {
            Some(due) => due < now && self.status != TaskStatus::Completed,
            None => false,
        }
    }
}

/// The create/update payload for a task.
///
/// Sent as-is to the server; the reconciled entry always comes from the
/// server's returned representation, never from this draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

impl TaskDraft {
    /// Starts a draft with the given title and the defaults a fresh task
    /// gets: medium priority, pending status, nothing else set.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            priority: TaskPriority::Medium,
            status: TaskStatus::Pending,
            due_date: None,
            assigned_to: None,
        }
    }

    /// Builds a draft from an existing task, for partial edits.
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
            status: task.status,
            due_date: task.due_date,
            assigned_to: task.assigned_to.clone(),
        }
    }
}
