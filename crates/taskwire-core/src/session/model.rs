//! Session domain model.

use crate::user::User;
use serde::{Deserialize, Serialize};

/// The active authenticated session.
///
/// Holds the identity returned by the server together with the opaque
/// bearer token every subsequent call must carry. Created on successful
/// authentication or restored from persisted storage at startup;
/// destroyed on logout or credential invalidation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The authenticated user
    pub user: User,
    /// Opaque credential token attached to every authenticated call
    pub token: String,
}

/// The on-disk twin of [`Session`].
///
/// Kept as a separate type so the persisted shape can evolve without
/// leaking storage concerns into the domain model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub token: String,
    pub user: User,
}

impl From<Session> for PersistedSession {
    fn from(session: Session) -> Self {
        Self {
            token: session.token,
            user: session.user,
        }
    }
}

impl From<PersistedSession> for Session {
    fn from(persisted: PersistedSession) -> Self {
        Self {
            user: persisted.user,
            token: persisted.token,
        }
    }
}

/// Login credentials submitted to the auth boundary.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Account creation payload submitted to the auth boundary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    pub display_name: String,
    pub email: String,
    pub password: String,
}

/// Lifecycle events broadcast on every session change.
///
/// Subscribers (push channel wiring, view state) react to these instead
/// of polling the session holder.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A session became active (login, register, or restore)
    LoggedIn(Session),
    /// The active session was torn down
    LoggedOut,
}
