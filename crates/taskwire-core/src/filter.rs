//! Task filter state.
//!
//! One process-wide filter drives the task snapshot fetches. Partial
//! changes merge into the current state; the serialized form is the
//! `scope|status|priority|q` query parameters the server understands.

use serde::{Deserialize, Serialize};

/// Whose tasks to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskScope {
    /// Every task visible to the user
    #[default]
    All,
    /// Tasks the user created
    Created,
    /// Tasks assigned to the user
    Assigned,
}

impl TaskScope {
    fn as_param(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Created => "created",
            Self::Assigned => "assigned",
        }
    }
}

/// Status filter, `All` meaning no constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    InProgress,
    Completed,
}

impl StatusFilter {
    fn as_param(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

/// Priority filter, `All` meaning no constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityFilter {
    #[default]
    All,
    Low,
    Medium,
    High,
}

impl PriorityFilter {
    fn as_param(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// The current filter predicate for the task view.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskFilter {
    pub scope: TaskScope,
    pub status: StatusFilter,
    pub priority: PriorityFilter,
    /// Free-text search, empty meaning no constraint
    #[serde(default)]
    pub search: String,
}

impl TaskFilter {
    /// Merges a partial change into this filter.
    ///
    /// # Returns
    ///
    /// `true` if any field actually changed (only then is a re-fetch
    /// warranted).
    pub fn merge(&mut self, patch: TaskFilterPatch) -> bool {
        let before = self.clone();
        if let Some(scope) = patch.scope {
            self.scope = scope;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(search) = patch.search {
            self.search = search;
        }
        *self != before
    }

    /// The query parameters for a task list fetch.
    ///
    /// Fields at their unconstrained defaults are omitted, matching what
    /// the server expects.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if self.scope != TaskScope::All {
            pairs.push(("scope", self.scope.as_param().to_string()));
        }
        if self.status != StatusFilter::All {
            pairs.push(("status", self.status.as_param().to_string()));
        }
        if self.priority != PriorityFilter::All {
            pairs.push(("priority", self.priority.as_param().to_string()));
        }
        if !self.search.trim().is_empty() {
            pairs.push(("q", self.search.trim().to_string()));
        }
        pairs
    }
}

/// A partial filter change; `None` fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct TaskFilterPatch {
    pub scope: Option<TaskScope>,
    pub status: Option<StatusFilter>,
    pub priority: Option<PriorityFilter>,
    pub search: Option<String>,
}
