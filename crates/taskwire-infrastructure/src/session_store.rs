//! File-backed session store.
//!
//! Persists the credential token and last-known identity as a single
//! JSON file under the taskwire config directory. Read once at startup,
//! written on login, removed on logout.

use crate::paths::TaskwirePaths;
use async_trait::async_trait;
use std::path::PathBuf;
use taskwire_core::error::Result;
use taskwire_core::session::{PersistedSession, SessionStore};
use tokio::fs;
use tracing::warn;

/// [`SessionStore`] implementation over a JSON file.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Creates a store rooted at the default config directory.
    pub fn new() -> Result<Self> {
        Self::with_paths(&TaskwirePaths::new())
    }

    /// Creates a store rooted at the given paths (tests point this at a
    /// temp directory).
    pub fn with_paths(paths: &TaskwirePaths) -> Result<Self> {
        Ok(Self {
            path: paths.session_file()?,
        })
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<PersistedSession>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        match serde_json::from_str::<PersistedSession>(&content) {
            Ok(session) => Ok(Some(session)),
            Err(err) => {
                // Corrupt data is treated as absent and removed so the
                // next startup does not trip over it again.
                warn!(path = %self.path.display(), %err, "discarding corrupt session file");
                let _ = fs::remove_file(&self.path).await;
                Ok(None)
            }
        }
    }

    async fn save(&self, session: &PersistedSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, content).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
