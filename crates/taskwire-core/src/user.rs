//! User domain model.

use serde::{Deserialize, Serialize};

/// A user account as reported by the server.
///
/// Users are referenced from tasks (`assigned_to`, `created_by`) and
/// notifications (`user_id`) by their `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier
    pub id: String,
    /// Human-readable display name
    pub display_name: String,
    /// Email address, also the login identifier
    pub email: String,
}
