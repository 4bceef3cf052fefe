pub mod notifications;
pub mod session;
pub mod tasks;
pub mod users;
pub mod watch;

use anyhow::{Result, bail};
use taskwire_application::App;
use taskwire_core::session::Session;

/// Restores the persisted session or fails with a hint.
///
/// Every command except login/register needs an active session; the
/// restore also bootstraps the push channel and the initial snapshots.
pub async fn require_session(app: &App) -> Result<Session> {
    match app.restore().await? {
        Some(session) => Ok(session),
        None => bail!("Not logged in. Run `taskwire login` first."),
    }
}
