//! Session store trait.
//!
//! Defines the interface for persisting the credential token and
//! last-known identity across process restarts.

use super::model::PersistedSession;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract store for the persisted session.
///
/// This trait decouples the session lifecycle from the specific storage
/// mechanism (a JSON file under the platform config directory in the
/// default implementation). The store is read once at startup, written
/// on login, and cleared on logout.
///
/// # Implementation Notes
///
/// `load` must treat invalid or corrupt data as absent: it returns
/// `Ok(None)` and clears the underlying storage rather than surfacing a
/// parse error to the caller.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Reads the persisted session, if any.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(session))`: A valid persisted session was found
    /// - `Ok(None)`: Nothing persisted, or the data was corrupt (storage
    ///   is cleared in that case)
    /// - `Err(_)`: Storage could not be accessed at all
    async fn load(&self) -> Result<Option<PersistedSession>>;

    /// Persists the session atomically (token and identity together).
    async fn save(&self, session: &PersistedSession) -> Result<()>;

    /// Removes any persisted session. Idempotent.
    async fn clear(&self) -> Result<()>;
}
