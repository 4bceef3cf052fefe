//! Ephemeral toast messages.
//!
//! Toasts are short-lived UI feedback, fully decoupled from the data
//! model: never persisted, never deduplicated, each with an independent
//! lifetime. The queue here is the pure collection; timer scheduling
//! lives with the service that owns a runtime.

use chrono::{DateTime, Utc};
use std::time::Duration;
use uuid::Uuid;

/// How long a toast stays up unless dismissed earlier.
pub const TOAST_TTL: Duration = Duration::from_secs(5);

/// Identifier for a queued toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToastId(Uuid);

/// A single feedback message.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// The append-only queue of live toasts.
///
/// Repeated identical messages each get their own entry; dismissing one
/// never affects the others.
#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a toast and returns it.
    pub fn push(&mut self, message: impl Into<String>) -> Toast {
        let toast = Toast {
            id: ToastId(Uuid::new_v4()),
            message: message.into(),
            created_at: Utc::now(),
        };
        self.toasts.push(toast.clone());
        toast
    }

    /// Removes a toast. Idempotent: dismissing an expired or unknown id
    /// is a no-op.
    ///
    /// # Returns
    ///
    /// `true` if the toast was still live and got removed.
    pub fn dismiss(&mut self, id: ToastId) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}
